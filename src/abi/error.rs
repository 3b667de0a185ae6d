//! ABI codec error types

use thiserror::Error;

/// Errors raised while decoding contract return data, calldata or logs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Data ended before the expected word or byte range
    #[error("ABI data truncated: needed {needed} bytes at offset {offset}, have {available}")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A uint256 word does not fit the target integer type
    #[error("Integer overflow: {0} does not fit the target type")]
    Overflow(String),

    /// An offset or length word points outside the data
    #[error("Invalid offset: {0}")]
    InvalidOffset(usize),

    /// A bool word held something other than 0 or 1
    #[error("Invalid bool word")]
    InvalidBool,

    /// An address word carried non-zero padding
    #[error("Invalid address word")]
    InvalidAddress,

    /// A string payload was not valid UTF-8
    #[error("Invalid UTF-8 in string: {0}")]
    InvalidUtf8(String),

    /// Decoded tokens did not have the expected shape
    #[error("Unexpected token: expected {0}")]
    UnexpectedToken(&'static str),
}

/// Result type alias for ABI operations
pub type AbiResult<T> = Result<T, AbiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AbiError::Truncated {
            offset: 32,
            needed: 32,
            available: 40,
        };
        assert_eq!(
            err.to_string(),
            "ABI data truncated: needed 32 bytes at offset 32, have 40"
        );
        assert_eq!(AbiError::InvalidBool.to_string(), "Invalid bool word");
    }
}
