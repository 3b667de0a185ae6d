//! Chain primitive types
//!
//! Fixed-width identifiers and the JSON shapes exchanged with an EIP-1193
//! provider. Everything crosses the wire as `0x`-prefixed hex strings.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::error::ChainError;

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

fn decode_fixed<const N: usize>(s: &str, what: &str) -> Result<[u8; N], ChainError> {
    let digits = strip_hex_prefix(s.trim());
    if digits.len() != N * 2 {
        return Err(ChainError::InvalidHex(format!(
            "{} must be {} hex digits, got {:?}",
            what,
            N * 2,
            s
        )));
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(digits, &mut out)
        .map_err(|e| ChainError::InvalidHex(format!("{}: {}", what, e)))?;
    Ok(out)
}

/// A 20-byte account or contract address
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl FromStr for Address {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<20>(s, "address").map(Address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// A 32-byte hash (transaction hashes, log topics)
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct H256([u8; 32]);

/// Transaction hash returned by `eth_sendTransaction`
pub type TxHash = H256;

impl H256 {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl FromStr for H256 {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_fixed::<32>(s, "hash").map(H256)
    }
}

impl fmt::Display for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for H256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Arbitrary-length byte payload (calldata, return data, log data)
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(v: Vec<u8>) -> Self {
        Bytes(v)
    }
}

impl FromStr for Bytes {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex::decode(strip_hex_prefix(s.trim()))
            .map(Bytes)
            .map_err(|e| ChainError::InvalidHex(format!("bytes: {}", e)))
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

macro_rules! hex_string_serde {
    ($($ty:ty),*) => {
        $(
            impl Serialize for $ty {
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $ty {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    let s = String::deserialize(deserializer)?;
                    s.parse().map_err(de::Error::custom)
                }
            }
        )*
    };
}

hex_string_serde!(Address, H256, Bytes);

/// Parse a JSON-RPC quantity (`0x`-prefixed, no leading zeros required)
pub fn parse_quantity(s: &str) -> Result<u64, ChainError> {
    let digits = strip_hex_prefix(s.trim());
    if digits.is_empty() {
        return Err(ChainError::InvalidHex(format!("empty quantity {:?}", s)));
    }
    u64::from_str_radix(digits, 16)
        .map_err(|e| ChainError::InvalidHex(format!("quantity {:?}: {}", s, e)))
}

/// Format a JSON-RPC quantity
pub fn format_quantity(value: u64) -> String {
    format!("0x{:x}", value)
}

/// Transaction or call object passed to `eth_sendTransaction` / `eth_call`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub from: Option<Address>,
    pub to: Address,
    pub data: Bytes,
}

/// A log entry carried by a receipt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    pub address: Address,
    #[serde(default)]
    pub topics: Vec<H256>,
    #[serde(default)]
    pub data: Bytes,
}

/// Transaction receipt as returned by `eth_getTransactionReceipt`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub transaction_hash: TxHash,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub logs: Vec<Log>,
}

impl Receipt {
    /// Whether the transaction executed without reverting.
    ///
    /// Receipts without a status field predate EIP-658 and are treated as
    /// successful.
    pub fn succeeded(&self) -> bool {
        match self.status.as_deref() {
            Some(status) => parse_quantity(status).map(|s| s == 1).unwrap_or(false),
            None => true,
        }
    }

    /// Block the transaction was included in
    pub fn block(&self) -> Option<u64> {
        self.block_number
            .as_deref()
            .and_then(|b| parse_quantity(b).ok())
    }
}
