//! Function selectors and event topics

use sha3::{Digest, Keccak256};

use crate::chain::H256;

/// Keccak-256 digest
pub fn keccak256(data: impl AsRef<[u8]>) -> [u8; 32] {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Keccak256::digest(data.as_ref()));
    out
}

/// 4-byte selector of a canonical function signature, e.g. `getPet(uint256)`
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Topic 0 of a canonical event signature
pub fn event_topic(signature: &str) -> H256 {
    H256::from_bytes(keccak256(signature.as_bytes()))
}

/// Selector followed by the encoded arguments
pub fn encode_call(signature: &str, args: &[super::Token]) -> Vec<u8> {
    let mut data = selector(signature).to_vec();
    data.extend_from_slice(&super::encode(args));
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_empty() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[test]
    fn test_well_known_selectors() {
        assert_eq!(hex::encode(selector("transfer(address,uint256)")), "a9059cbb");
        assert_eq!(hex::encode(selector("balanceOf(address)")), "70a08231");
    }

    #[test]
    fn test_well_known_event_topic() {
        assert_eq!(
            event_topic("Transfer(address,address,uint256)").to_string(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }

    #[test]
    fn test_encode_call_prefixes_selector() {
        let data = encode_call("getPet(uint256)", &[super::super::Token::Uint(1)]);
        assert_eq!(data.len(), 4 + 32);
        assert_eq!(&data[..4], &selector("getPet(uint256)"));
    }
}
