//! View state handed to listeners

use crate::chain::{Address, NetworkSwitch, TxHash};
use crate::projection::ViewPet;
use crate::registry::{PetId, RegisterDraft, RegistryError};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected {
        account: Address,
        network: NetworkSwitch,
    },
}

/// The connected account's pets
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PetListState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<ViewPet>),
    Failed(RegistryError),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RegistrationState {
    #[default]
    Editing,
    Submitting,
    Confirming {
        tx: TxHash,
    },
}

/// Transfer or edit of an owned pet. One runs at a time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PetActionState {
    #[default]
    Idle,
    Submitting {
        id: PetId,
    },
    Confirming {
        id: PetId,
        tx: TxHash,
    },
}

impl PetActionState {
    /// Pet currently being written, if any
    pub fn pet(&self) -> Option<PetId> {
        match self {
            PetActionState::Idle => None,
            PetActionState::Submitting { id } | PetActionState::Confirming { id, .. } => Some(*id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchState {
    #[default]
    Idle,
    Searching {
        id: PetId,
    },
    Found(ViewPet),
    NotFound {
        id: PetId,
    },
    Failed {
        id: PetId,
        error: RegistryError,
    },
}

/// A message for the user, shown until dismissed or replaced
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Info(String),
    Warning(RegistryError),
    Error(RegistryError),
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Info(msg) => msg.clone(),
            Notice::Warning(e) | Notice::Error(e) => e.to_string(),
        }
    }
}

/// Everything the pages render
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub connection: ConnectionState,
    pub pets: PetListState,
    pub registration: RegistrationState,
    pub draft: RegisterDraft,
    pub pet_action: PetActionState,
    pub search: SearchState,
    pub notice: Option<Notice>,
}

impl ViewState {
    pub fn account(&self) -> Option<Address> {
        match &self.connection {
            ConnectionState::Connected { account, .. } => Some(*account),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self.connection, ConnectionState::Connected { .. })
    }

    /// Loaded pets; empty while loading or before the first load
    pub fn pets(&self) -> &[ViewPet] {
        match &self.pets {
            PetListState::Loaded(pets) => pets,
            _ => &[],
        }
    }

    pub fn is_registering(&self) -> bool {
        !matches!(self.registration, RegistrationState::Editing)
    }

    /// Drop everything tied to the connected account
    pub(crate) fn clear_session(&mut self) {
        self.connection = ConnectionState::Disconnected;
        self.pets = PetListState::Idle;
        self.registration = RegistrationState::Editing;
        self.pet_action = PetActionState::Idle;
        self.search = SearchState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disconnected() {
        let state = ViewState::default();
        assert!(!state.is_connected());
        assert_eq!(state.account(), None);
        assert!(state.pets().is_empty());
        assert!(!state.is_registering());
        assert!(state.notice.is_none());
    }

    #[test]
    fn test_clear_session_keeps_draft() {
        let mut state = ViewState {
            connection: ConnectionState::Connected {
                account: Address::ZERO,
                network: NetworkSwitch::OnTarget { chain_id: 1 },
            },
            pets: PetListState::Loaded(Vec::new()),
            registration: RegistrationState::Submitting,
            pet_action: PetActionState::Submitting { id: PetId(4) },
            ..Default::default()
        };
        state.draft.name = "Buddy".into();

        state.clear_session();

        assert_eq!(state.connection, ConnectionState::Disconnected);
        assert_eq!(state.pets, PetListState::Idle);
        assert_eq!(state.registration, RegistrationState::Editing);
        assert_eq!(state.pet_action.pet(), None);
        assert_eq!(state.draft.name, "Buddy");
    }

    #[test]
    fn test_notice_message() {
        let notice = Notice::Error(RegistryError::NotFound(PetId(3)));
        assert_eq!(notice.message(), "Pet #3 not found");
        assert_eq!(Notice::Info("ok".into()).message(), "ok");
    }
}
