//! Registry workflow errors
//!
//! One taxonomy for everything a user-facing workflow (connect, load,
//! register, search) can run into. Lower-layer errors are mapped according to
//! the phase they happened in, never through a blanket `From`.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

use super::types::PetId;
use crate::abi::AbiError;
use crate::chain::{ChainError, TxHash};

/// Problems with form input (registration, edit, transfer)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid birth date {0}")]
    InvalidBirthDate(String),

    #[error("invalid owner address {0}")]
    InvalidAddress(String),
}

/// Why a submitted write did not become final
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationFailure {
    /// Mined, but execution reverted
    Reverted { block: Option<u64> },
    /// No receipt within the confirmation window
    TimedOut { waited: Duration },
    /// Polling for the receipt failed
    Unreachable(ChainError),
    /// Mined and successful, but the expected event was not emitted
    MissingEvent(&'static str),
}

impl fmt::Display for ConfirmationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfirmationFailure::Reverted { block: Some(b) } => {
                write!(f, "reverted in block {}", b)
            }
            ConfirmationFailure::Reverted { block: None } => write!(f, "reverted"),
            ConfirmationFailure::TimedOut { waited } => {
                write!(f, "not confirmed after {}s", waited.as_secs())
            }
            ConfirmationFailure::Unreachable(e) => write!(f, "receipt unavailable: {}", e),
            ConfirmationFailure::MissingEvent(event) => write!(f, "no {} event emitted", event),
        }
    }
}

/// Errors surfaced by registry workflows
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No wallet provider is present
    #[error("No wallet found. Install a browser wallet to continue")]
    WalletUnavailable,

    /// The user declined account access or the signature
    #[error("Authorization declined: {0}")]
    AuthorizationDeclined(String),

    /// The wallet could not be moved to the registry's chain
    #[error("Wallet is not on the registry network (chain {expected}): {reason}")]
    NetworkMismatch {
        expected: u64,
        actual: Option<u64>,
        reason: String,
    },

    /// The contract has no record for this id
    #[error("Pet #{0} not found")]
    NotFound(PetId),

    /// The write was rejected before a transaction hash existed
    #[error("Transaction not submitted: {0}")]
    Submission(String),

    /// The write was submitted but did not become final
    #[error("Transaction {tx} failed: {failure}")]
    Confirmation {
        tx: TxHash,
        failure: ConfirmationFailure,
    },

    /// A read did not reach the contract
    #[error("Request failed: {0}")]
    Transport(ChainError),

    /// The contract answered with data we could not decode
    #[error("Malformed contract response: {0}")]
    Decode(AbiError),

    /// A form is incomplete or malformed
    #[error("Invalid input: {0}")]
    InvalidDraft(DraftError),

    /// No wallet session yet
    #[error("Wallet not connected")]
    NotConnected,
}

impl RegistryError {
    /// Map an error from the account-authorization step
    pub fn from_connect(err: ChainError) -> Self {
        match err {
            ChainError::ProviderUnavailable => RegistryError::WalletUnavailable,
            ChainError::Rpc(ref e) if e.is_user_rejection() => {
                RegistryError::AuthorizationDeclined(e.message.clone())
            }
            other => RegistryError::Transport(other),
        }
    }

    /// Map an error from the submit phase of a write
    pub fn from_submit(err: ChainError) -> Self {
        match err {
            ChainError::Rpc(ref e) if e.is_user_rejection() => {
                RegistryError::Submission(format!("signature rejected: {}", e.message))
            }
            other => RegistryError::Submission(other.to_string()),
        }
    }

    pub fn is_submission(&self) -> bool {
        matches!(self, RegistryError::Submission(_))
    }

    pub fn is_confirmation(&self) -> bool {
        matches!(self, RegistryError::Confirmation { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }
}

impl From<DraftError> for RegistryError {
    fn from(err: DraftError) -> Self {
        RegistryError::InvalidDraft(err)
    }
}

/// Result type alias for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
