//! Registry data types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DraftError;
use crate::chain::Address;

/// Contract-assigned pet identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub u64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PetId {
    type Err = std::num::ParseIntError;

    /// Accepts `42` and `#42`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        s.strip_prefix('#').unwrap_or(s).parse().map(PetId)
    }
}

/// A pet record exactly as the contract stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetRecord {
    pub id: PetId,
    pub name: String,
    pub breed: String,
    /// Seconds since the Unix epoch
    pub birth_date: u64,
    pub image_url: String,
    pub description: String,
    pub owner: Address,
    /// Seconds since the Unix epoch
    pub registration_date: u64,
    pub is_active: bool,
}

/// Arguments of `registerPet`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPet {
    pub name: String,
    pub breed: String,
    pub birth_date: u64,
    pub image_url: String,
    pub description: String,
}

/// Arguments of `updatePetInfo`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PetUpdate {
    pub name: String,
    pub breed: String,
    pub image_url: String,
    pub description: String,
}

impl From<&PetRecord> for PetUpdate {
    fn from(record: &PetRecord) -> Self {
        Self {
            name: record.name.clone(),
            breed: record.breed.clone(),
            image_url: record.image_url.clone(),
            description: record.description.clone(),
        }
    }
}

impl PetUpdate {
    /// Trimmed copy; name and breed stay required
    pub fn validated(&self) -> Result<PetUpdate, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingField("name"));
        }
        let breed = self.breed.trim();
        if breed.is_empty() {
            return Err(DraftError::MissingField("breed"));
        }
        Ok(PetUpdate {
            name: name.to_string(),
            breed: breed.to_string(),
            image_url: self.image_url.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// New owner as typed by the user; the zero address is refused
pub fn parse_new_owner(input: &str) -> Result<Address, DraftError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DraftError::MissingField("new owner"));
    }
    match input.parse::<Address>() {
        Ok(address) if !address.is_zero() => Ok(address),
        _ => Err(DraftError::InvalidAddress(input.to_string())),
    }
}

/// A state-changing contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Register(NewPet),
    Transfer { pet_id: PetId, new_owner: Address },
    Update { pet_id: PetId, update: PetUpdate },
}

impl WriteCall {
    pub fn label(&self) -> &'static str {
        match self {
            WriteCall::Register(_) => "registerPet",
            WriteCall::Transfer { .. } => "transferOwnership",
            WriteCall::Update { .. } => "updatePetInfo",
        }
    }
}

/// Registration form contents, as typed by the user
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegisterDraft {
    pub name: String,
    pub breed: String,
    /// `YYYY-MM-DD`, as produced by a date input
    pub birth_date: String,
    pub image_url: String,
    pub description: String,
}

impl RegisterDraft {
    pub fn is_empty(&self) -> bool {
        *self == RegisterDraft::default()
    }

    pub fn clear(&mut self) {
        *self = RegisterDraft::default();
    }

    /// Convert to contract arguments. The birth date is taken as midnight
    /// UTC of the given day.
    pub fn to_new_pet(&self) -> Result<NewPet, DraftError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DraftError::MissingField("name"));
        }
        let breed = self.breed.trim();
        if breed.is_empty() {
            return Err(DraftError::MissingField("breed"));
        }

        Ok(NewPet {
            name: name.to_string(),
            breed: breed.to_string(),
            birth_date: parse_birth_date(&self.birth_date)?,
            image_url: self.image_url.trim().to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

/// `YYYY-MM-DD` to epoch seconds at midnight UTC
pub fn parse_birth_date(input: &str) -> Result<u64, DraftError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(DraftError::MissingField("birth date"));
    }
    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|e| DraftError::InvalidBirthDate(format!("{:?}: {}", input, e)))?;
    let seconds = date
        .and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .ok_or_else(|| DraftError::InvalidBirthDate(input.to_string()))?;
    u64::try_from(seconds)
        .map_err(|_| DraftError::InvalidBirthDate(format!("{:?} is before 1970-01-01", input)))
}
