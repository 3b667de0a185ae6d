//! Pet Projection
//!
//! Pure conversion from contract records to what the views render.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use std::fmt;

use crate::chain::Address;
use crate::registry::{PetId, PetRecord, PetUpdate};

/// A contract timestamp, keeping the original seconds intact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainDate {
    Calendar(DateTime<Utc>),
    /// Too large for a calendar date
    OutOfRange(u64),
}

impl ChainDate {
    pub fn from_epoch_seconds(seconds: u64) -> Self {
        i64::try_from(seconds)
            .ok()
            .and_then(|s| Utc.timestamp_opt(s, 0).single())
            .map(ChainDate::Calendar)
            .unwrap_or(ChainDate::OutOfRange(seconds))
    }

    pub fn epoch_seconds(&self) -> u64 {
        match self {
            // Only constructed from non-negative seconds
            ChainDate::Calendar(dt) => dt.timestamp() as u64,
            ChainDate::OutOfRange(seconds) => *seconds,
        }
    }

    /// Long-form date, e.g. `January 1, 2020`
    pub fn display(&self) -> String {
        match self {
            ChainDate::Calendar(dt) => dt.format("%B %-d, %Y").to_string(),
            ChainDate::OutOfRange(seconds) => format!("{} seconds after epoch", seconds),
        }
    }
}

impl fmt::Display for ChainDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl Serialize for ChainDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.epoch_seconds())
    }
}

/// `0x1234...7890` form of an address
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// A pet as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewPet {
    pub id: PetId,
    pub name: String,
    pub breed: String,
    pub birth_date: ChainDate,
    pub registration_date: ChainDate,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Full address, for transfers
    pub owner: Address,
    pub owner_short: String,
    pub is_active: bool,
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

pub fn project(record: &PetRecord) -> ViewPet {
    ViewPet {
        id: record.id,
        name: record.name.clone(),
        breed: record.breed.clone(),
        birth_date: ChainDate::from_epoch_seconds(record.birth_date),
        registration_date: ChainDate::from_epoch_seconds(record.registration_date),
        image_url: non_empty(&record.image_url),
        description: non_empty(&record.description),
        owner: record.owner,
        owner_short: short_address(&record.owner),
        is_active: record.is_active,
    }
}

impl From<&ViewPet> for PetUpdate {
    /// Starting point for an edit form
    fn from(pet: &ViewPet) -> Self {
        Self {
            name: pet.name.clone(),
            breed: pet.breed.clone(),
            image_url: pet.image_url.clone().unwrap_or_default(),
            description: pet.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PetRecord {
        PetRecord {
            id: PetId(7),
            name: "Buddy".into(),
            breed: "Labrador".into(),
            birth_date: 1_577_836_800,
            image_url: String::new(),
            description: "Loves the beach".into(),
            owner: "0x1234567890abcdef1234567890abcdef12345678".parse().unwrap(),
            registration_date: 1_700_000_000,
            is_active: true,
        }
    }

    #[test]
    fn test_display_date() {
        let date = ChainDate::from_epoch_seconds(1_577_836_800);
        assert_eq!(date.display(), "January 1, 2020");
    }

    #[test]
    fn test_epoch_seconds_exact() {
        for seconds in [0, 1, 1_577_836_800, 1_700_000_123, u64::MAX] {
            assert_eq!(ChainDate::from_epoch_seconds(seconds).epoch_seconds(), seconds);
        }
        assert!(matches!(
            ChainDate::from_epoch_seconds(u64::MAX),
            ChainDate::OutOfRange(_)
        ));
    }

    #[test]
    fn test_short_address() {
        let addr: Address = "0x1234567890abcdef1234567890abcdef12345678".parse().unwrap();
        assert_eq!(short_address(&addr), "0x1234...5678");
    }

    #[test]
    fn test_project_keeps_owner() {
        let rec = record();
        let view = project(&rec);
        assert_eq!(view.owner, rec.owner);
        assert_eq!(view.owner_short, "0x1234...5678");
        assert_eq!(view.birth_date.display(), "January 1, 2020");
        assert_eq!(view.image_url, None);
        assert_eq!(view.description.as_deref(), Some("Loves the beach"));
    }

    #[test]
    fn test_edit_form_from_view() {
        let update = PetUpdate::from(&project(&record()));
        assert_eq!(update.name, "Buddy");
        assert_eq!(update.image_url, "");
        assert_eq!(update.description, "Loves the beach");
    }

    #[test]
    fn test_serialize_dates_as_seconds() {
        let json = serde_json::to_value(project(&record())).unwrap();
        assert_eq!(json["birth_date"], 1_577_836_800u64);
        assert_eq!(json["id"], 7);
    }
}
