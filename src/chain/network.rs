//! Target network and confirmation settings

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::types::{format_quantity, Address};

/// Chain the registry is deployed on, in the shape `wallet_addEthereumChain`
/// expects (EIP-3085)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainParams {
    pub chain_id: u64,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    #[serde(default)]
    pub block_explorer_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

impl Default for ChainParams {
    fn default() -> Self {
        Self::sepolia()
    }
}

impl ChainParams {
    /// Sepolia testnet
    pub fn sepolia() -> Self {
        Self {
            chain_id: 11_155_111,
            chain_name: "Sepolia".to_string(),
            rpc_urls: vec!["https://rpc.sepolia.org".to_string()],
            native_currency: NativeCurrency {
                name: "Sepolia Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            block_explorer_urls: vec!["https://sepolia.etherscan.io".to_string()],
        }
    }

    /// A local development node (anvil / hardhat defaults)
    pub fn local() -> Self {
        Self {
            chain_id: 31_337,
            chain_name: "Localhost".to_string(),
            rpc_urls: vec!["http://127.0.0.1:8545".to_string()],
            native_currency: NativeCurrency {
                name: "Ether".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            },
            block_explorer_urls: Vec::new(),
        }
    }

    /// Parameter object for `wallet_switchEthereumChain`
    pub fn switch_params(&self) -> serde_json::Value {
        serde_json::json!([{ "chainId": format_quantity(self.chain_id) }])
    }

    /// Parameter object for `wallet_addEthereumChain`
    pub fn add_params(&self) -> serde_json::Value {
        serde_json::json!([{
            "chainId": format_quantity(self.chain_id),
            "chainName": self.chain_name,
            "rpcUrls": self.rpc_urls,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "blockExplorerUrls": self.block_explorer_urls,
        }])
    }
}

/// How long to wait for a submitted write to be mined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationPolicy {
    pub poll_interval: Duration,
    pub max_wait: Duration,
}

impl Default for ConfirmationPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            max_wait: Duration::from_secs(120),
        }
    }
}

impl ConfirmationPolicy {
    /// Number of receipt polls before giving up (at least one)
    pub fn max_polls(&self) -> u32 {
        if self.poll_interval.is_zero() {
            return 1;
        }
        let polls = self.max_wait.as_millis() / self.poll_interval.as_millis().max(1);
        polls.clamp(1, u32::MAX as u128) as u32
    }
}

/// Static description of the deployed registry, baked into the client
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    pub contract_address: Address,
    pub network: ChainParams,
    pub confirmation: ConfirmationPolicy,
}

/// Address the registry contract is deployed at
pub const DEFAULT_CONTRACT_ADDRESS: Address = Address::from_bytes([
    0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90, 0x12, 0x34, 0x56, 0x78, 0x90,
    0x12, 0x34, 0x56, 0x78, 0x90,
]);

impl Default for Deployment {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS,
            network: ChainParams::default(),
            confirmation: ConfirmationPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_deployment() {
        let deployment = Deployment::default();
        assert_eq!(
            deployment.contract_address.to_string(),
            "0x1234567890123456789012345678901234567890"
        );
        assert_eq!(deployment.network.chain_id, 11_155_111);
    }

    #[test]
    fn test_switch_params_hex_chain_id() {
        let params = ChainParams::local().switch_params();
        assert_eq!(params[0]["chainId"], "0x7a69");
    }

    #[test]
    fn test_add_params_shape() {
        let params = ChainParams::sepolia().add_params();
        assert_eq!(params[0]["chainName"], "Sepolia");
        assert_eq!(params[0]["nativeCurrency"]["decimals"], 18);
    }

    #[test]
    fn test_max_polls() {
        let policy = ConfirmationPolicy {
            poll_interval: Duration::from_millis(500),
            max_wait: Duration::from_secs(10),
        };
        assert_eq!(policy.max_polls(), 20);

        let tiny = ConfirmationPolicy {
            poll_interval: Duration::from_secs(5),
            max_wait: Duration::from_secs(1),
        };
        assert_eq!(tiny.max_polls(), 1);
    }
}
