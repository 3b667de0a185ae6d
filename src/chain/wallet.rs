//! Typed wallet calls
//!
//! Wraps a [`WalletTransport`] with the handful of EIP-1193 methods the
//! registry needs and turns their JSON answers into chain types.

use serde_json::{json, Value};
use std::rc::Rc;

use super::error::{ChainError, ChainResult};
use super::network::{ChainParams, ConfirmationPolicy};
use super::transport::WalletTransport;
use super::types::{parse_quantity, Address, Bytes, Receipt, TransactionRequest, TxHash};

/// Outcome of the best-effort network selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkSwitch {
    /// The wallet is on the deployment's chain
    OnTarget { chain_id: u64 },
    /// Switching failed; calls go to whatever chain the wallet is on
    ProceedingOnCurrent {
        current: Option<u64>,
        reason: String,
    },
}

impl NetworkSwitch {
    pub fn is_on_target(&self) -> bool {
        matches!(self, NetworkSwitch::OnTarget { .. })
    }

    /// Chain the wallet was on when the session was made, if known
    pub fn chain_id(&self) -> Option<u64> {
        match self {
            NetworkSwitch::OnTarget { chain_id } => Some(*chain_id),
            NetworkSwitch::ProceedingOnCurrent { current, .. } => *current,
        }
    }
}

/// Typed handle over a wallet transport. Cloning shares the transport.
pub struct Wallet<T> {
    transport: Rc<T>,
}

impl<T> Clone for Wallet<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Rc::clone(&self.transport),
        }
    }
}

impl<T: WalletTransport> Wallet<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport: Rc::new(transport),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn request<R: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> ChainResult<R> {
        tracing::debug!(method, "wallet request");
        let value = self.transport.request(method, params).await?;
        serde_json::from_value(value).map_err(|e| {
            ChainError::UnexpectedResponse(format!("{} returned unexpected shape: {}", method, e))
        })
    }

    /// Ask the wallet for account access (may prompt the user).
    ///
    /// Plain nodes do not implement `eth_requestAccounts`; for those the
    /// already-unlocked `eth_accounts` list is used instead.
    pub async fn request_accounts(&self) -> ChainResult<Vec<Address>> {
        match self.request("eth_requestAccounts", json!([])).await {
            Err(ChainError::Rpc(e)) if e.is_method_not_found() => self.accounts().await,
            other => other,
        }
    }

    pub async fn accounts(&self) -> ChainResult<Vec<Address>> {
        self.request("eth_accounts", json!([])).await
    }

    pub async fn chain_id(&self) -> ChainResult<u64> {
        let id: String = self.request("eth_chainId", json!([])).await?;
        parse_quantity(&id)
    }

    /// Try to put the wallet on `target`, registering the chain when the
    /// wallet does not know it. Never fails: a wallet that refuses is
    /// reported as [`NetworkSwitch::ProceedingOnCurrent`].
    pub async fn ensure_network(&self, target: &ChainParams) -> NetworkSwitch {
        let current = match self.chain_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Could not read wallet chain id: {}", e);
                None
            }
        };

        if current == Some(target.chain_id) {
            return NetworkSwitch::OnTarget {
                chain_id: target.chain_id,
            };
        }

        let outcome = match self
            .transport
            .request("wallet_switchEthereumChain", target.switch_params())
            .await
        {
            Ok(_) => Ok(()),
            Err(ChainError::Rpc(e)) if e.is_unrecognized_chain() => {
                tracing::info!(chain_id = target.chain_id, "Registering chain with wallet");
                match self
                    .transport
                    .request("wallet_addEthereumChain", target.add_params())
                    .await
                {
                    Ok(_) => self.confirm_chain(target.chain_id).await,
                    Err(e) => Err(e.to_string()),
                }
            }
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(()) => NetworkSwitch::OnTarget {
                chain_id: target.chain_id,
            },
            Err(reason) => {
                tracing::warn!(
                    target_chain = target.chain_id,
                    ?current,
                    "Network switch failed, proceeding on current chain: {}",
                    reason
                );
                NetworkSwitch::ProceedingOnCurrent { current, reason }
            }
        }
    }

    /// Some wallets accept `wallet_addEthereumChain` without switching
    async fn confirm_chain(&self, expected: u64) -> Result<(), String> {
        match self.chain_id().await {
            Ok(id) if id == expected => Ok(()),
            Ok(id) => Err(format!("wallet stayed on chain {}", id)),
            Err(e) => Err(e.to_string()),
        }
    }

    /// Read-only contract call against the latest block
    pub async fn call(&self, to: Address, data: Vec<u8>) -> ChainResult<Bytes> {
        let call = TransactionRequest {
            from: None,
            to,
            data: Bytes(data),
        };
        self.request("eth_call", json!([call, "latest"])).await
    }

    /// Ask the wallet to sign and broadcast a transaction
    pub async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Vec<u8>,
    ) -> ChainResult<TxHash> {
        let tx = TransactionRequest {
            from: Some(from),
            to,
            data: Bytes(data),
        };
        self.request("eth_sendTransaction", json!([tx])).await
    }

    /// Receipt for `hash`, or `None` while the transaction is pending
    pub async fn transaction_receipt(&self, hash: &TxHash) -> ChainResult<Option<Receipt>> {
        self.request("eth_getTransactionReceipt", json!([hash]))
            .await
    }

    /// Poll for a receipt under `policy`. `Ok(None)` means the wait ran out.
    pub async fn wait_for_receipt(
        &self,
        hash: &TxHash,
        policy: &ConfirmationPolicy,
    ) -> ChainResult<Option<Receipt>> {
        let polls = policy.max_polls();
        for attempt in 0..polls {
            if attempt > 0 {
                self.transport.sleep(policy.poll_interval).await;
            }
            if let Some(receipt) = self.transaction_receipt(hash).await? {
                tracing::debug!(%hash, attempt, "receipt available");
                return Ok(Some(receipt));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::error::RpcError;
    use crate::chain::transport::scripted::ScriptedTransport;
    use std::time::Duration;

    fn rpc_err(code: i64, message: &str) -> ChainResult<Value> {
        Err(ChainError::Rpc(RpcError::new(code, message)))
    }

    #[tokio::test]
    async fn test_request_accounts_falls_back_to_eth_accounts() {
        let transport = ScriptedTransport::new()
            .expect("eth_requestAccounts", rpc_err(-32601, "Method not found"))
            .expect(
                "eth_accounts",
                Ok(json!(["0x00000000000000000000000000000000000000aa"])),
            );
        let wallet = Wallet::new(transport);

        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            wallet.transport().methods(),
            vec!["eth_requestAccounts", "eth_accounts"]
        );
    }

    #[tokio::test]
    async fn test_request_accounts_propagates_rejection() {
        let transport = ScriptedTransport::new()
            .expect("eth_requestAccounts", rpc_err(4001, "User rejected the request."));
        let wallet = Wallet::new(transport);

        let err = wallet.request_accounts().await.unwrap_err();
        assert!(err.is_user_rejection());
    }

    #[tokio::test]
    async fn test_ensure_network_already_on_target() {
        let transport = ScriptedTransport::new().expect("eth_chainId", Ok(json!("0x7a69")));
        let wallet = Wallet::new(transport);

        let outcome = wallet.ensure_network(&ChainParams::local()).await;
        assert_eq!(outcome, NetworkSwitch::OnTarget { chain_id: 31_337 });
    }

    #[tokio::test]
    async fn test_ensure_network_adds_unknown_chain() {
        let transport = ScriptedTransport::new()
            .expect("eth_chainId", Ok(json!("0x1")))
            .expect("wallet_switchEthereumChain", rpc_err(4902, "Unrecognized chain"))
            .expect("wallet_addEthereumChain", Ok(Value::Null))
            .expect("eth_chainId", Ok(json!("0x7a69")));
        let wallet = Wallet::new(transport);

        let outcome = wallet.ensure_network(&ChainParams::local()).await;
        assert!(outcome.is_on_target());
    }

    #[tokio::test]
    async fn test_ensure_network_proceeds_when_switch_refused() {
        let transport = ScriptedTransport::new()
            .expect("eth_chainId", Ok(json!("0x1")))
            .expect("wallet_switchEthereumChain", rpc_err(4001, "User rejected"));
        let wallet = Wallet::new(transport);

        match wallet.ensure_network(&ChainParams::local()).await {
            NetworkSwitch::ProceedingOnCurrent { current, reason } => {
                assert_eq!(current, Some(1));
                assert!(reason.contains("User rejected"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_for_receipt_polls_until_mined() {
        let hash = format!("0x{}", "ab".repeat(32));
        let transport = ScriptedTransport::new()
            .expect("eth_getTransactionReceipt", Ok(Value::Null))
            .expect("eth_getTransactionReceipt", Ok(Value::Null))
            .expect(
                "eth_getTransactionReceipt",
                Ok(json!({ "transactionHash": hash, "status": "0x1", "logs": [] })),
            );
        let wallet = Wallet::new(transport);
        let policy = ConfirmationPolicy {
            poll_interval: Duration::from_millis(10),
            max_wait: Duration::from_millis(100),
        };

        let receipt = wallet
            .wait_for_receipt(&hash.parse().unwrap(), &policy)
            .await
            .unwrap()
            .expect("receipt");
        assert!(receipt.succeeded());
    }

    #[tokio::test]
    async fn test_wait_for_receipt_gives_up() {
        let hash: TxHash = format!("0x{}", "cd".repeat(32)).parse().unwrap();
        let transport = ScriptedTransport::new()
            .expect("eth_getTransactionReceipt", Ok(Value::Null))
            .expect("eth_getTransactionReceipt", Ok(Value::Null));
        let wallet = Wallet::new(transport);
        let policy = ConfirmationPolicy {
            poll_interval: Duration::from_millis(50),
            max_wait: Duration::from_millis(100),
        };

        assert_eq!(wallet.wait_for_receipt(&hash, &policy).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_call_encodes_latest_block() {
        let transport = ScriptedTransport::new().expect("eth_call", Ok(json!("0x01")));
        let wallet = Wallet::new(transport);

        let out = wallet.call(Address::ZERO, vec![0xaa]).await.unwrap();
        assert_eq!(out, Bytes(vec![1]));

        let (_, params) = &wallet.transport().requests()[0];
        assert_eq!(params[0]["data"], "0xaa");
        assert_eq!(params[1], "latest");
    }
}
