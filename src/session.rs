//! Chain Session Provider
//!
//! Turns a wallet transport into a connected [`Session`]: account access,
//! best-effort network selection, and a registry client bound to both.

use async_trait::async_trait;

use crate::chain::{Address, Deployment, NetworkSwitch, Wallet, WalletTransport};
use crate::registry::{PetRegistry, RegistryClient, RegistryError, RegistryResult};

/// A connected wallet account and the registry handle acting for it
#[derive(Debug, Clone)]
pub struct Session<R> {
    pub account: Address,
    pub network: NetworkSwitch,
    pub registry: R,
}

impl<R> Session<R> {
    /// The wallet ended up somewhere other than the deployment's chain
    pub fn network_warning(&self, expected: u64) -> Option<RegistryError> {
        match &self.network {
            NetworkSwitch::OnTarget { .. } => None,
            NetworkSwitch::ProceedingOnCurrent { current, reason } => {
                Some(RegistryError::NetworkMismatch {
                    expected,
                    actual: *current,
                    reason: reason.clone(),
                })
            }
        }
    }
}

/// Anything that can establish a session
#[async_trait(?Send)]
pub trait Connector {
    type Registry: PetRegistry;

    /// Chain id the registry is deployed on
    fn target_chain(&self) -> u64;

    async fn connect(&self) -> RegistryResult<Session<Self::Registry>>;
}

/// Connects through a [`Wallet`] to the registry described by a [`Deployment`]
pub struct ChainSessionProvider<T> {
    wallet: Wallet<T>,
    deployment: Deployment,
}

impl<T: WalletTransport> ChainSessionProvider<T> {
    pub fn new(wallet: Wallet<T>, deployment: Deployment) -> Self {
        Self { wallet, deployment }
    }

    pub fn wallet(&self) -> &Wallet<T> {
        &self.wallet
    }

    pub fn deployment(&self) -> &Deployment {
        &self.deployment
    }

    pub async fn connect(&self) -> RegistryResult<Session<RegistryClient<T>>> {
        let accounts = self
            .wallet
            .request_accounts()
            .await
            .map_err(RegistryError::from_connect)?;

        let account = match accounts.first() {
            Some(account) => *account,
            None => {
                tracing::warn!("Wallet returned no accounts");
                return Err(RegistryError::AuthorizationDeclined(
                    "wallet returned no accounts".to_string(),
                ));
            }
        };

        let network = self.wallet.ensure_network(&self.deployment.network).await;
        if let NetworkSwitch::ProceedingOnCurrent { current, reason } = &network {
            tracing::warn!(
                expected = self.deployment.network.chain_id,
                current = ?current,
                "Proceeding on current network: {}",
                reason
            );
        }

        tracing::info!(%account, on_target = network.is_on_target(), "Wallet connected");

        Ok(Session {
            account,
            network,
            registry: RegistryClient::new(
                self.wallet.clone(),
                self.deployment.contract_address,
                account,
                self.deployment.confirmation,
            ),
        })
    }
}

#[async_trait(?Send)]
impl<T: WalletTransport> Connector for ChainSessionProvider<T> {
    type Registry = RegistryClient<T>;

    fn target_chain(&self) -> u64 {
        self.deployment.network.chain_id
    }

    async fn connect(&self) -> RegistryResult<Session<Self::Registry>> {
        ChainSessionProvider::connect(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ChainParams, ConfirmationPolicy};
    use crate::registry::simulated::SimulatedChain;

    fn account() -> Address {
        "0x00000000000000000000000000000000000000a1".parse().unwrap()
    }

    fn contract() -> Address {
        crate::chain::DEFAULT_CONTRACT_ADDRESS
    }

    fn deployment() -> Deployment {
        Deployment {
            contract_address: contract(),
            network: ChainParams::local(),
            confirmation: ConfirmationPolicy::default(),
        }
    }

    fn provider(chain: SimulatedChain) -> ChainSessionProvider<SimulatedChain> {
        ChainSessionProvider::new(Wallet::new(chain), deployment())
    }

    #[tokio::test]
    async fn test_connect_on_target() {
        let provider = provider(SimulatedChain::new(contract()).with_account(account()));

        let session = provider.connect().await.unwrap();
        assert_eq!(session.account, account());
        assert!(session.network.is_on_target());
        assert_eq!(session.registry.account(), account());
        assert!(session.network_warning(31_337).is_none());
    }

    #[tokio::test]
    async fn test_connect_without_wallet() {
        let provider = provider(SimulatedChain::new(contract()).without_wallet());
        let err = provider.connect().await.unwrap_err();
        assert_eq!(err, RegistryError::WalletUnavailable);
    }

    #[tokio::test]
    async fn test_connect_declined() {
        let provider = provider(
            SimulatedChain::new(contract())
                .with_account(account())
                .declining_accounts(),
        );
        let err = provider.connect().await.unwrap_err();
        assert!(matches!(err, RegistryError::AuthorizationDeclined(_)));
    }

    #[tokio::test]
    async fn test_connect_no_accounts_is_declined() {
        let provider = provider(SimulatedChain::new(contract()));
        let err = provider.connect().await.unwrap_err();
        assert!(matches!(err, RegistryError::AuthorizationDeclined(_)));
    }

    #[tokio::test]
    async fn test_connect_switches_network() {
        let chain = SimulatedChain::new(contract())
            .with_account(account())
            .on_chain(1);
        let provider = provider(chain);

        let session = provider.connect().await.unwrap();
        assert!(session.network.is_on_target());
        assert_eq!(provider.wallet().transport().current_chain(), 31_337);
    }

    #[tokio::test]
    async fn test_connect_adds_unknown_network() {
        let chain = SimulatedChain::new(contract())
            .with_account(account())
            .on_chain(1)
            .forgetting_chain(31_337);
        let provider = provider(chain);

        let session = provider.connect().await.unwrap();
        assert!(session.network.is_on_target());
        assert_eq!(provider.wallet().transport().count("wallet_addEthereumChain"), 1);
    }

    #[tokio::test]
    async fn test_refused_switch_proceeds_with_warning() {
        let chain = SimulatedChain::new(contract())
            .with_account(account())
            .on_chain(1)
            .refusing_switch();
        let provider = provider(chain);

        let session = provider.connect().await.unwrap();
        assert!(!session.network.is_on_target());
        match session.network_warning(31_337) {
            Some(RegistryError::NetworkMismatch {
                expected, actual, ..
            }) => {
                assert_eq!(expected, 31_337);
                assert_eq!(actual, Some(1));
            }
            other => panic!("unexpected warning {:?}", other),
        }
    }
}
