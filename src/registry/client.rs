//! Registry contract client
//!
//! Typed operations over a [`Wallet`] bound to one account and the deployed
//! contract address.

use async_trait::async_trait;
use std::fmt;

use super::contract;
use super::error::{ConfirmationFailure, RegistryError, RegistryResult};
use super::types::{NewPet, PetId, PetRecord, PetUpdate, WriteCall};
use super::PetRegistry;
use crate::chain::{Address, Bytes, ChainError, ConfirmationPolicy, Receipt, TxHash, Wallet, WalletTransport};

/// Registry handle bound to the connected account
pub struct RegistryClient<T> {
    wallet: Wallet<T>,
    contract: Address,
    account: Address,
    confirmation: ConfirmationPolicy,
}

impl<T> Clone for RegistryClient<T> {
    fn clone(&self) -> Self {
        Self {
            wallet: self.wallet.clone(),
            contract: self.contract,
            account: self.account,
            confirmation: self.confirmation,
        }
    }
}

impl<T> fmt::Debug for RegistryClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryClient")
            .field("contract", &self.contract)
            .field("account", &self.account)
            .field("confirmation", &self.confirmation)
            .finish_non_exhaustive()
    }
}

/// A write that has a transaction hash but is not yet final
pub struct PendingWrite<'a, T> {
    client: &'a RegistryClient<T>,
    tx: TxHash,
    label: &'static str,
}

impl<'a, T: WalletTransport> PendingWrite<'a, T> {
    pub fn tx(&self) -> TxHash {
        self.tx
    }

    /// Wait for the receipt; fails if the write reverted or never landed
    pub async fn confirm(self) -> RegistryResult<Receipt> {
        tracing::debug!(tx = %self.tx, call = self.label, "waiting for confirmation");
        self.client.confirm_tx(&self.tx).await
    }
}

impl<T: WalletTransport> RegistryClient<T> {
    pub fn new(
        wallet: Wallet<T>,
        contract: Address,
        account: Address,
        confirmation: ConfirmationPolicy,
    ) -> Self {
        Self {
            wallet,
            contract,
            account,
            confirmation,
        }
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn wallet(&self) -> &Wallet<T> {
        &self.wallet
    }

    /// Submit phase of any write
    pub async fn submit_write(&self, call: &WriteCall) -> RegistryResult<PendingWrite<'_, T>> {
        let data = contract::write_calldata(call);
        let tx = self
            .wallet
            .send_transaction(self.account, self.contract, data)
            .await
            .map_err(|e| {
                tracing::warn!(call = call.label(), "Write not submitted: {}", e);
                RegistryError::from_submit(e)
            })?;

        tracing::info!(call = call.label(), %tx, "Transaction submitted");
        Ok(PendingWrite {
            client: self,
            tx,
            label: call.label(),
        })
    }

    pub async fn submit_register(&self, pet: &NewPet) -> RegistryResult<PendingWrite<'_, T>> {
        self.submit_write(&WriteCall::Register(pet.clone())).await
    }

    pub async fn submit_transfer(
        &self,
        pet_id: PetId,
        new_owner: &Address,
    ) -> RegistryResult<PendingWrite<'_, T>> {
        self.submit_write(&WriteCall::Transfer {
            pet_id,
            new_owner: *new_owner,
        })
        .await
    }

    pub async fn submit_update(
        &self,
        pet_id: PetId,
        update: &PetUpdate,
    ) -> RegistryResult<PendingWrite<'_, T>> {
        self.submit_write(&WriteCall::Update {
            pet_id,
            update: update.clone(),
        })
        .await
    }

    async fn confirm_tx(&self, tx: &TxHash) -> RegistryResult<Receipt> {
        let failure = match self.wallet.wait_for_receipt(tx, &self.confirmation).await {
            Ok(Some(receipt)) if receipt.succeeded() => {
                tracing::info!(%tx, block = ?receipt.block(), "Transaction confirmed");
                return Ok(receipt);
            }
            Ok(Some(receipt)) => ConfirmationFailure::Reverted {
                block: receipt.block(),
            },
            Ok(None) => ConfirmationFailure::TimedOut {
                waited: self.confirmation.max_wait,
            },
            Err(e) => ConfirmationFailure::Unreachable(e),
        };

        tracing::warn!(%tx, "Transaction not confirmed: {}", failure);
        Err(RegistryError::Confirmation { tx: *tx, failure })
    }

    async fn read(&self, data: Vec<u8>) -> Result<Bytes, ChainError> {
        self.wallet.call(self.contract, data).await
    }
}

#[async_trait(?Send)]
impl<T: WalletTransport> PetRegistry for RegistryClient<T> {
    fn contract_address(&self) -> Address {
        self.contract
    }

    async fn submit(&self, call: &WriteCall) -> RegistryResult<TxHash> {
        self.submit_write(call).await.map(|pending| pending.tx())
    }

    async fn confirm(&self, tx: &TxHash) -> RegistryResult<Receipt> {
        self.confirm_tx(tx).await
    }

    async fn get_pet(&self, id: PetId) -> RegistryResult<PetRecord> {
        let data = match self.read(contract::get_pet_call(id)).await {
            Ok(data) => data,
            Err(e) if e.is_revert() => return Err(RegistryError::NotFound(id)),
            Err(e) => return Err(RegistryError::Transport(e)),
        };

        let record = contract::decode_pet(id, data.as_slice()).map_err(RegistryError::Decode)?;

        // Unset mapping slots come back zeroed instead of reverting
        if record.owner.is_zero() {
            return Err(RegistryError::NotFound(id));
        }
        Ok(record)
    }

    async fn get_owner_pets(&self, owner: &Address) -> RegistryResult<Vec<PetId>> {
        let data = self
            .read(contract::get_owner_pets_call(owner))
            .await
            .map_err(RegistryError::Transport)?;
        contract::decode_pet_ids(data.as_slice()).map_err(RegistryError::Decode)
    }

    async fn get_total_pets(&self) -> RegistryResult<u64> {
        let data = self
            .read(contract::get_total_pets_call())
            .await
            .map_err(RegistryError::Transport)?;
        contract::decode_uint(data.as_slice()).map_err(RegistryError::Decode)
    }
}
