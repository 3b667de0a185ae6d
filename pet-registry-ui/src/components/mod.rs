//! UI Components

pub mod header;
pub mod loading;
pub mod pet_card;
pub mod pet_form;
pub mod register_modal;
pub mod search_section;
pub mod toast;

pub use header::Header;
pub use loading::Loading;
pub use pet_card::PetCard;
pub use pet_form::PetFormModal;
pub use register_modal::RegisterModal;
pub use search_section::SearchSection;
pub use toast::Toast;
