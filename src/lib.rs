//! # Pet Registry
//!
//! Client core for an on-chain pet ownership registry: wallet session,
//! typed contract client and the view state a front-end renders.
//!
//! ## Modules
//!
//! - [`abi`]: Solidity ABI encoding for the registry's calls and events
//! - [`chain`]: EIP-1193 wallet boundary and chain wire types
//! - [`session`]: account access and network selection
//! - [`registry`]: the contract client (two-phase writes, reads)
//! - [`projection`]: records to displayable pets
//! - [`view`]: view state and the workflows driving it
//! - [`config`]: TOML / environment configuration (native only)
//!
//! The core is single-threaded and runtime-agnostic so it runs unchanged in
//! the browser; the `native` feature adds the HTTP transport, configuration
//! and the `petreg` binary.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pet_registry::chain::{Deployment, HttpTransport, Wallet};
//! use pet_registry::registry::{PetRegistry, RegisterDraft};
//! use pet_registry::session::ChainSessionProvider;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = HttpTransport::new("http://127.0.0.1:8545", Duration::from_secs(30))?;
//!     let provider = ChainSessionProvider::new(Wallet::new(transport), Deployment::default());
//!     let session = provider.connect().await?;
//!
//!     let draft = RegisterDraft {
//!         name: "Buddy".into(),
//!         breed: "Labrador".into(),
//!         birth_date: "2020-01-01".into(),
//!         ..Default::default()
//!     };
//!     let id = session.registry.register_pet(&draft.to_new_pet()?).await?;
//!     println!("Registered pet #{}", id);
//!
//!     Ok(())
//! }
//! ```

pub mod abi;
pub mod chain;
#[cfg(feature = "native")]
pub mod config;
pub mod projection;
pub mod registry;
pub mod session;
pub mod view;

pub use projection::{project, ChainDate, ViewPet};
pub use registry::{PetId, PetRecord, PetRegistry, RegistryError, RegistryResult};
pub use session::{ChainSessionProvider, Connector, Session};
pub use view::{Coordinator, ViewState};
