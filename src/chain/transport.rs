//! EIP-1193 transport seam
//!
//! A transport forwards `{ method, params }` requests to whatever sits on the
//! other side: a browser wallet extension or a JSON-RPC node.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use super::error::ChainResult;

/// Anything that can answer EIP-1193 requests.
///
/// Futures are not required to be `Send`: the browser implementation holds
/// JS handles and everything runs on one thread.
#[async_trait(?Send)]
pub trait WalletTransport {
    /// Send one request and return its `result` value
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value>;

    /// Suspend the caller, used between receipt polls
    async fn sleep(&self, duration: Duration);
}
