//! Pet Registry Client
//!
//! Typed access to the registry contract.
//!
//! ## Writes
//!
//! Every write has two phases that fail differently:
//!
//! 1. **submit**: the wallet signs and broadcasts. Fails with
//!    [`RegistryError::Submission`] (e.g. the user rejects the signature).
//! 2. **confirm**: the transaction is mined. Fails with
//!    [`RegistryError::Confirmation`] when it reverts or never lands.
//!
//! Reads go through `eth_call` and are never retried.

pub mod contract;
mod client;
mod error;
#[cfg(test)]
pub(crate) mod simulated;
mod types;

pub use client::{PendingWrite, RegistryClient};
pub use contract::RegistryEvent;
pub use error::{ConfirmationFailure, DraftError, RegistryError, RegistryResult};
pub use types::{
    parse_birth_date, parse_new_owner, NewPet, PetId, PetRecord, PetUpdate, RegisterDraft,
    WriteCall,
};

use async_trait::async_trait;

use crate::chain::{Address, Receipt, TxHash};

/// The registry contract surface
#[async_trait(?Send)]
pub trait PetRegistry {
    /// Address whose logs count as registry events
    fn contract_address(&self) -> Address;

    /// Sign and broadcast a write
    async fn submit(&self, call: &WriteCall) -> RegistryResult<TxHash>;

    /// Wait until a submitted write is final
    async fn confirm(&self, tx: &TxHash) -> RegistryResult<Receipt>;

    /// Fetch one record; [`RegistryError::NotFound`] if the id is unknown
    async fn get_pet(&self, id: PetId) -> RegistryResult<PetRecord>;

    /// Ids owned by `owner`, empty when there are none
    async fn get_owner_pets(&self, owner: &Address) -> RegistryResult<Vec<PetId>>;

    async fn get_total_pets(&self) -> RegistryResult<u64>;

    /// Register a pet and return the id the contract assigned
    async fn register_pet(&self, pet: &NewPet) -> RegistryResult<PetId> {
        let tx = self.submit(&WriteCall::Register(pet.clone())).await?;
        let receipt = self.confirm(&tx).await?;
        pet_id_from_receipt(&receipt, self.contract_address())
    }

    async fn transfer_ownership(&self, pet_id: PetId, new_owner: &Address) -> RegistryResult<Receipt> {
        let tx = self
            .submit(&WriteCall::Transfer {
                pet_id,
                new_owner: *new_owner,
            })
            .await?;
        self.confirm(&tx).await
    }

    async fn update_pet_info(&self, pet_id: PetId, update: &PetUpdate) -> RegistryResult<Receipt> {
        let tx = self
            .submit(&WriteCall::Update {
                pet_id,
                update: update.clone(),
            })
            .await?;
        self.confirm(&tx).await
    }
}

/// Id assigned by a confirmed `registerPet`
pub fn pet_id_from_receipt(receipt: &Receipt, contract: Address) -> RegistryResult<PetId> {
    contract::registered_pet_id(receipt, contract).ok_or(RegistryError::Confirmation {
        tx: receipt.transaction_hash,
        failure: ConfirmationFailure::MissingEvent("PetRegistered"),
    })
}
