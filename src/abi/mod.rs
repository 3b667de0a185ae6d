//! Contract ABI
//!
//! Just enough of the Solidity ABI to talk to the registry contract:
//! a head/tail codec over [`Token`]s and keccak-based selectors and topics.

mod codec;
mod error;
mod signature;

pub use codec::{decode, encode, ParamType, Token, WORD};
pub use error::{AbiError, AbiResult};
pub use signature::{encode_call, event_topic, keccak256, selector};
