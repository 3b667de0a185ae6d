//! Registry contract ABI bindings
//!
//! Calldata builders, return-data decoders and event decoding for the
//! deployed `PetRegistry` contract.

use crate::abi::{self, AbiError, AbiResult, ParamType, Token};
use crate::chain::{Address, Log, Receipt, H256};

use super::types::{NewPet, PetId, PetRecord, PetUpdate, WriteCall};

pub const REGISTER_PET: &str = "registerPet(string,string,uint256,string,string)";
pub const GET_PET: &str = "getPet(uint256)";
pub const GET_OWNER_PETS: &str = "getOwnerPets(address)";
pub const TRANSFER_OWNERSHIP: &str = "transferOwnership(uint256,address)";
pub const UPDATE_PET_INFO: &str = "updatePetInfo(uint256,string,string,string,string)";
pub const GET_TOTAL_PETS: &str = "getTotalPets()";

pub const PET_REGISTERED: &str = "PetRegistered(uint256,string,address)";
pub const OWNERSHIP_TRANSFERRED: &str = "OwnershipTransferred(uint256,address,address)";

fn uint(value: u64) -> Token {
    Token::Uint(u128::from(value))
}

fn to_u64(value: u128) -> AbiResult<u64> {
    u64::try_from(value).map_err(|_| AbiError::Overflow(value.to_string()))
}

// ============================================
// Calldata
// ============================================

pub fn register_pet_call(pet: &NewPet) -> Vec<u8> {
    abi::encode_call(
        REGISTER_PET,
        &[
            Token::String(pet.name.clone()),
            Token::String(pet.breed.clone()),
            uint(pet.birth_date),
            Token::String(pet.image_url.clone()),
            Token::String(pet.description.clone()),
        ],
    )
}

pub fn get_pet_call(id: PetId) -> Vec<u8> {
    abi::encode_call(GET_PET, &[uint(id.0)])
}

pub fn get_owner_pets_call(owner: &Address) -> Vec<u8> {
    abi::encode_call(GET_OWNER_PETS, &[Token::Address(*owner)])
}

pub fn transfer_ownership_call(id: PetId, new_owner: &Address) -> Vec<u8> {
    abi::encode_call(TRANSFER_OWNERSHIP, &[uint(id.0), Token::Address(*new_owner)])
}

pub fn update_pet_info_call(id: PetId, update: &PetUpdate) -> Vec<u8> {
    abi::encode_call(
        UPDATE_PET_INFO,
        &[
            uint(id.0),
            Token::String(update.name.clone()),
            Token::String(update.breed.clone()),
            Token::String(update.image_url.clone()),
            Token::String(update.description.clone()),
        ],
    )
}

pub fn get_total_pets_call() -> Vec<u8> {
    abi::encode_call(GET_TOTAL_PETS, &[])
}

pub fn write_calldata(call: &WriteCall) -> Vec<u8> {
    match call {
        WriteCall::Register(pet) => register_pet_call(pet),
        WriteCall::Transfer { pet_id, new_owner } => transfer_ownership_call(*pet_id, new_owner),
        WriteCall::Update { pet_id, update } => update_pet_info_call(*pet_id, update),
    }
}

// ============================================
// Return data
// ============================================

/// The `Pet` struct returned by `getPet`
pub fn pet_record_type() -> ParamType {
    ParamType::Tuple(vec![
        ParamType::String,  // name
        ParamType::String,  // breed
        ParamType::Uint,    // birthDate
        ParamType::String,  // imageUrl
        ParamType::String,  // description
        ParamType::Address, // owner
        ParamType::Uint,    // registrationDate
        ParamType::Bool,    // isActive
    ])
}

pub fn decode_pet(id: PetId, data: &[u8]) -> AbiResult<PetRecord> {
    let mut tokens = abi::decode(&[pet_record_type()], data)?;
    let fields = tokens
        .pop()
        .ok_or(AbiError::UnexpectedToken("pet tuple"))?
        .into_tuple()?;
    let mut fields = fields.into_iter();
    let mut next = || fields.next().ok_or(AbiError::UnexpectedToken("pet field"));

    Ok(PetRecord {
        id,
        name: next()?.into_string()?,
        breed: next()?.into_string()?,
        birth_date: to_u64(next()?.into_uint()?)?,
        image_url: next()?.into_string()?,
        description: next()?.into_string()?,
        owner: next()?.into_address()?,
        registration_date: to_u64(next()?.into_uint()?)?,
        is_active: next()?.into_bool()?,
    })
}

/// Inverse of [`decode_pet`], the shape a node returns for `getPet`
pub fn encode_pet(record: &PetRecord) -> Vec<u8> {
    abi::encode(&[Token::Tuple(vec![
        Token::String(record.name.clone()),
        Token::String(record.breed.clone()),
        uint(record.birth_date),
        Token::String(record.image_url.clone()),
        Token::String(record.description.clone()),
        Token::Address(record.owner),
        uint(record.registration_date),
        Token::Bool(record.is_active),
    ])])
}

pub fn decode_pet_ids(data: &[u8]) -> AbiResult<Vec<PetId>> {
    let ty = ParamType::Array(Box::new(ParamType::Uint));
    let mut tokens = abi::decode(&[ty], data)?;
    tokens
        .pop()
        .ok_or(AbiError::UnexpectedToken("uint256[]"))?
        .into_array()?
        .into_iter()
        .map(|t| t.into_uint().and_then(to_u64).map(PetId))
        .collect()
}

pub fn encode_pet_ids(ids: &[PetId]) -> Vec<u8> {
    abi::encode(&[Token::Array(ids.iter().map(|id| uint(id.0)).collect())])
}

pub fn decode_uint(data: &[u8]) -> AbiResult<u64> {
    let mut tokens = abi::decode(&[ParamType::Uint], data)?;
    tokens
        .pop()
        .ok_or(AbiError::UnexpectedToken("uint256"))?
        .into_uint()
        .and_then(to_u64)
}

// ============================================
// Events
// ============================================

/// Events declared by the registry contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    PetRegistered {
        pet_id: PetId,
        name: String,
        owner: Address,
    },
    OwnershipTransferred {
        pet_id: PetId,
        previous_owner: Address,
        new_owner: Address,
    },
}

fn topic_uint(topic: &H256) -> AbiResult<u64> {
    abi::decode(&[ParamType::Uint], topic.as_bytes())?
        .pop()
        .ok_or(AbiError::UnexpectedToken("uint256 topic"))?
        .into_uint()
        .and_then(to_u64)
}

fn topic_address(topic: &H256) -> AbiResult<Address> {
    abi::decode(&[ParamType::Address], topic.as_bytes())?
        .pop()
        .ok_or(AbiError::UnexpectedToken("address topic"))?
        .into_address()
}

/// Decode a registry log. `Ok(None)` for logs of other events.
pub fn decode_event(log: &Log) -> AbiResult<Option<RegistryEvent>> {
    let Some(signature) = log.topics.first() else {
        return Ok(None);
    };

    if *signature == abi::event_topic(PET_REGISTERED) {
        if log.topics.len() != 3 {
            return Err(AbiError::UnexpectedToken("3 topics for PetRegistered"));
        }
        let name = abi::decode(&[ParamType::String], log.data.as_slice())?
            .pop()
            .ok_or(AbiError::UnexpectedToken("name"))?
            .into_string()?;
        return Ok(Some(RegistryEvent::PetRegistered {
            pet_id: PetId(topic_uint(&log.topics[1])?),
            name,
            owner: topic_address(&log.topics[2])?,
        }));
    }

    if *signature == abi::event_topic(OWNERSHIP_TRANSFERRED) {
        if log.topics.len() != 4 {
            return Err(AbiError::UnexpectedToken("4 topics for OwnershipTransferred"));
        }
        return Ok(Some(RegistryEvent::OwnershipTransferred {
            pet_id: PetId(topic_uint(&log.topics[1])?),
            previous_owner: topic_address(&log.topics[2])?,
            new_owner: topic_address(&log.topics[3])?,
        }));
    }

    Ok(None)
}

/// Registry events in `receipt` emitted by `contract`, skipping undecodable logs
pub fn receipt_events(receipt: &Receipt, contract: Address) -> Vec<RegistryEvent> {
    receipt
        .logs
        .iter()
        .filter(|log| log.address == contract)
        .filter_map(|log| match decode_event(log) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping malformed registry log: {}", e);
                None
            }
        })
        .collect()
}

/// Id assigned by the `PetRegistered` event in `receipt`
pub fn registered_pet_id(receipt: &Receipt, contract: Address) -> Option<PetId> {
    receipt_events(receipt, contract)
        .into_iter()
        .find_map(|event| match event {
            RegistryEvent::PetRegistered { pet_id, .. } => Some(pet_id),
            _ => None,
        })
}

/// Topic encoding of an indexed `uint256`
pub fn uint_topic(value: u64) -> H256 {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    H256::from_bytes(word)
}

/// Topic encoding of an indexed `address`
pub fn address_topic(address: &Address) -> H256 {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_bytes());
    H256::from_bytes(word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Bytes;

    fn owner() -> Address {
        "0x2222222222222222222222222222222222222222".parse().unwrap()
    }

    fn record() -> PetRecord {
        PetRecord {
            id: PetId(3),
            name: "Buddy".into(),
            breed: "Labrador".into(),
            birth_date: 1_577_836_800,
            image_url: "https://example.com/buddy.jpg".into(),
            description: String::new(),
            owner: owner(),
            registration_date: 1_700_000_000,
            is_active: true,
        }
    }

    #[test]
    fn test_get_pet_decodes_node_encoding() {
        let data = encode_pet(&record());
        // Dynamic tuple: first word is the offset to the struct
        assert_eq!(data[31], 0x20);
        assert_eq!(decode_pet(PetId(3), &data).unwrap(), record());
    }

    #[test]
    fn test_decode_pet_rejects_truncated() {
        let data = encode_pet(&record());
        assert!(decode_pet(PetId(3), &data[..100]).is_err());
    }

    #[test]
    fn test_owner_pets_empty_and_many() {
        assert_eq!(
            decode_pet_ids(&encode_pet_ids(&[])).unwrap(),
            Vec::<PetId>::new()
        );
        let ids = vec![PetId(1), PetId(5), PetId(8)];
        assert_eq!(decode_pet_ids(&encode_pet_ids(&ids)).unwrap(), ids);
    }

    #[test]
    fn test_calldata_selectors_differ() {
        let a = get_pet_call(PetId(1));
        let b = get_owner_pets_call(&owner());
        let c = get_total_pets_call();
        assert_ne!(a[..4], b[..4]);
        assert_ne!(a[..4], c[..4]);
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn test_register_call_layout() {
        let pet = NewPet {
            name: "Buddy".into(),
            breed: "Labrador".into(),
            birth_date: 1_577_836_800,
            image_url: String::new(),
            description: String::new(),
        };
        let data = register_pet_call(&pet);
        let args = abi::decode(
            &[
                ParamType::String,
                ParamType::String,
                ParamType::Uint,
                ParamType::String,
                ParamType::String,
            ],
            &data[4..],
        )
        .unwrap();
        assert_eq!(args[0], Token::String("Buddy".into()));
        assert_eq!(args[2], Token::Uint(1_577_836_800));
    }

    #[test]
    fn test_registered_pet_id_from_receipt() {
        let contract: Address = "0x1234567890123456789012345678901234567890".parse().unwrap();
        let log = Log {
            address: contract,
            topics: vec![
                abi::event_topic(PET_REGISTERED),
                uint_topic(42),
                address_topic(&owner()),
            ],
            data: Bytes(abi::encode(&[Token::String("Buddy".into())])),
        };
        let receipt = Receipt {
            transaction_hash: H256::default(),
            block_number: Some("0x1".into()),
            status: Some("0x1".into()),
            logs: vec![log.clone()],
        };

        assert_eq!(registered_pet_id(&receipt, contract), Some(PetId(42)));
        assert_eq!(
            decode_event(&log).unwrap(),
            Some(RegistryEvent::PetRegistered {
                pet_id: PetId(42),
                name: "Buddy".into(),
                owner: owner(),
            })
        );

        // Same log from another contract is ignored
        assert_eq!(registered_pet_id(&receipt, Address::ZERO), None);
    }

    #[test]
    fn test_ownership_transferred_event() {
        let new_owner: Address = "0x3333333333333333333333333333333333333333".parse().unwrap();
        let log = Log {
            address: Address::ZERO,
            topics: vec![
                abi::event_topic(OWNERSHIP_TRANSFERRED),
                uint_topic(7),
                address_topic(&owner()),
                address_topic(&new_owner),
            ],
            data: Bytes::default(),
        };
        assert_eq!(
            decode_event(&log).unwrap(),
            Some(RegistryEvent::OwnershipTransferred {
                pet_id: PetId(7),
                previous_owner: owner(),
                new_owner,
            })
        );
    }

    #[test]
    fn test_unrelated_event_is_ignored() {
        let log = Log {
            address: Address::ZERO,
            topics: vec![abi::event_topic("Transfer(address,address,uint256)")],
            data: Bytes::default(),
        };
        assert_eq!(decode_event(&log).unwrap(), None);
    }
}
