//! Wallet / chain boundary error types

use serde::Deserialize;
use thiserror::Error;

/// EIP-1193: the user rejected the request
pub const USER_REJECTED: i64 = 4001;
/// EIP-1193: the requested method or account has not been authorized
pub const UNAUTHORIZED: i64 = 4100;
/// EIP-3326: the wallet does not know the requested chain
pub const UNRECOGNIZED_CHAIN: i64 = 4902;
/// JSON-RPC: method not found
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Geth-style execution revert on `eth_call`
pub const EXECUTION_REVERTED: i64 = 3;

/// An error object returned by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl RpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED || self.code == UNAUTHORIZED
    }

    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN
    }

    pub fn is_method_not_found(&self) -> bool {
        self.code == METHOD_NOT_FOUND
    }

    /// Whether the node reported that the call reverted.
    ///
    /// Nodes disagree on the code (3, -32000, -32015), so the message is
    /// checked as well.
    pub fn is_revert(&self) -> bool {
        self.code == EXECUTION_REVERTED || self.message.to_ascii_lowercase().contains("revert")
    }
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Errors that can occur talking to the wallet or node
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    /// No EIP-1193 provider is available
    #[error("Wallet provider unavailable")]
    ProviderUnavailable,

    /// The provider answered with an error object
    #[error("RPC error: {0}")]
    Rpc(RpcError),

    /// The request never produced a provider answer
    #[error("Transport error: {0}")]
    Transport(String),

    /// Request timed out
    #[error("Request timeout")]
    Timeout,

    /// The provider answered with something we could not interpret
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Malformed hex in an address, hash, quantity or payload
    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}

impl ChainError {
    pub fn rpc(&self) -> Option<&RpcError> {
        match self {
            ChainError::Rpc(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        self.rpc().is_some_and(RpcError::is_user_rejection)
    }

    pub fn is_revert(&self) -> bool {
        self.rpc().is_some_and(RpcError::is_revert)
    }
}

impl From<serde_json::Error> for ChainError {
    fn from(err: serde_json::Error) -> Self {
        ChainError::UnexpectedResponse(err.to_string())
    }
}

/// Result type alias for chain operations
pub type ChainResult<T> = Result<T, ChainError>;
