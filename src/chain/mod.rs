//! Chain / Wallet Boundary
//!
//! Everything between the registry client and the wallet:
//!
//! - [`WalletTransport`]: the EIP-1193 `request` seam (browser wallet, node)
//! - [`Wallet`]: typed calls on top of a transport
//! - [`ChainParams`], [`Deployment`]: static description of where the
//!   registry lives
//! - wire types ([`Address`], [`TxHash`], [`Receipt`], ...)

mod error;
#[cfg(feature = "native")]
mod http;
mod network;
pub(crate) mod transport;
mod types;
mod wallet;

pub use error::{
    ChainError, ChainResult, RpcError, EXECUTION_REVERTED, METHOD_NOT_FOUND, UNAUTHORIZED,
    UNRECOGNIZED_CHAIN, USER_REJECTED,
};
#[cfg(feature = "native")]
pub use http::HttpTransport;
pub use network::{ChainParams, ConfirmationPolicy, Deployment, NativeCurrency, DEFAULT_CONTRACT_ADDRESS};
pub use transport::WalletTransport;
pub use types::{
    format_quantity, parse_quantity, Address, Bytes, Log, Receipt, TransactionRequest, TxHash,
    H256,
};
pub use wallet::{NetworkSwitch, Wallet};
