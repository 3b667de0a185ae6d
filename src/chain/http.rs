//! JSON-RPC over HTTP
//!
//! Native transport for talking to a node directly. Signing happens on the
//! node, so writes need an unlocked account (a local dev node, or a
//! node-side signer).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::error::{ChainError, ChainResult, RpcError};
use super::transport::WalletTransport;

/// JSON-RPC 2.0 client
pub struct HttpTransport {
    client: Client,
    url: String,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, request_timeout: Duration) -> ChainResult<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| ChainError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait(?Send)]
impl WalletTransport for HttpTransport {
    async fn request(&self, method: &str, params: Value) -> ChainResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChainError::Timeout
                } else if e.is_connect() {
                    ChainError::ProviderUnavailable
                } else {
                    ChainError::Transport(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ChainError::Transport(format!("HTTP {}: {}", status, text)));
        }

        let reply: RpcResponse = response
            .json()
            .await
            .map_err(|e| ChainError::UnexpectedResponse(e.to_string()))?;

        reply.into_result()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ============================================
// Wire DTOs
// ============================================

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

impl RpcResponse {
    fn into_result(self) -> ChainResult<Value> {
        match (self.error, self.result) {
            (Some(error), _) => Err(ChainError::Rpc(error)),
            (None, Some(result)) => Ok(result),
            // `null` results (pending receipts) deserialize as absent
            (None, None) => Ok(Value::Null),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = RpcRequest {
            jsonrpc: "2.0",
            id: 7,
            method: "eth_chainId",
            params: serde_json::json!([]),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "eth_chainId");
    }

    #[test]
    fn test_response_error_wins() {
        let reply: RpcResponse = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"error":{"code":3,"message":"execution reverted"}}"#,
        )
        .unwrap();
        let err = reply.into_result().unwrap_err();
        assert!(err.is_revert());
    }

    #[test]
    fn test_response_null_result() {
        let reply: RpcResponse =
            serde_json::from_str(r#"{"jsonrpc":"2.0","id":1,"result":null}"#).unwrap();
        assert_eq!(reply.into_result().unwrap(), Value::Null);
    }

    #[test]
    fn test_new_transport() {
        let transport = HttpTransport::new("http://127.0.0.1:8545", Duration::from_secs(5)).unwrap();
        assert_eq!(transport.url(), "http://127.0.0.1:8545");
    }
}
