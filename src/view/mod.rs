//! View state and the workflows that drive it
//!
//! [`Coordinator`] runs connect, list, register, transfer, edit and search against the
//! current session and publishes a fresh [`ViewState`] to every listener on
//! each change. Renderers only ever read the state.

mod coordinator;
mod state;

pub use coordinator::Coordinator;
pub use state::{
    ConnectionState, Notice, PetActionState, PetListState, RegistrationState, SearchState,
    ViewState,
};
