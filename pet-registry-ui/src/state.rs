//! Application State
//!
//! Bridges the registry [`Coordinator`] to Leptos signals. Components read
//! `view` and call the controller's methods; every workflow runs on the
//! coordinator and its state changes flow back into the signal.

use leptos::*;
use std::rc::Rc;

use pet_registry::chain::{Deployment, Wallet};
use pet_registry::registry::{PetId, PetUpdate, RegisterDraft};
use pet_registry::view::{Coordinator, Notice, ViewState};
use pet_registry::ChainSessionProvider;

use crate::wallet::{on_accounts_changed, on_chain_changed, BrowserTransport};

pub type AppCoordinator = Coordinator<ChainSessionProvider<BrowserTransport>>;

/// The open edit or transfer form of an owned pet
#[derive(Debug, Clone, PartialEq)]
pub enum PetForm {
    Edit { id: PetId, update: PetUpdate },
    Transfer { id: PetId, new_owner: String },
}

/// Shared handle provided to every component
#[derive(Clone)]
pub struct Controller {
    coordinator: Rc<AppCoordinator>,
    /// Latest coordinator state
    pub view: RwSignal<ViewState>,
    /// Registration modal visibility
    pub show_register: RwSignal<bool>,
    /// Raw contents of the search box
    pub search_input: RwSignal<String>,
    pub pet_form: RwSignal<Option<PetForm>>,
}

/// Build the controller, subscribe to wallet events and provide it as context
pub fn provide_controller() -> Controller {
    let provider = ChainSessionProvider::new(Wallet::new(BrowserTransport), Deployment::default());
    let coordinator = Rc::new(Coordinator::new(provider));

    let view = create_rw_signal(coordinator.snapshot());
    coordinator.subscribe(move |state| view.set(state.clone()));

    let controller = Controller {
        coordinator,
        view,
        show_register: create_rw_signal(false),
        search_input: create_rw_signal(String::new()),
        pet_form: create_rw_signal(None),
    };
    controller.watch_wallet();

    provide_context(controller.clone());
    controller
}

pub fn use_controller() -> Controller {
    use_context::<Controller>().expect("Controller not found")
}

impl Controller {
    fn watch_wallet(&self) {
        let coordinator = Rc::clone(&self.coordinator);
        let watching = on_accounts_changed(move |accounts| {
            let coordinator = Rc::clone(&coordinator);
            spawn_local(async move { coordinator.handle_accounts_changed(&accounts).await });
        });

        let coordinator = Rc::clone(&self.coordinator);
        on_chain_changed(move |chain_id| {
            let coordinator = Rc::clone(&coordinator);
            spawn_local(async move { coordinator.handle_chain_changed(chain_id).await });
        });

        if !watching {
            web_sys::console::log_1(&"No wallet provider; wallet events disabled".into());
        }
    }

    pub fn connect(&self) {
        let coordinator = Rc::clone(&self.coordinator);
        spawn_local(async move { coordinator.connect().await });
    }

    pub fn update_draft(&self, f: impl FnOnce(&mut RegisterDraft)) {
        self.coordinator.update_draft(f);
    }

    /// Submit the draft; the modal closes once the pet is registered
    pub fn register(&self) {
        let coordinator = Rc::clone(&self.coordinator);
        let show_register = self.show_register;
        spawn_local(async move {
            if coordinator.register().await.is_some() {
                show_register.set(false);
            }
        });
    }

    /// Submit the open pet form; it closes once the write is final
    pub fn submit_pet_form(&self) {
        let Some(form) = self.pet_form.get_untracked() else {
            return;
        };
        let coordinator = Rc::clone(&self.coordinator);
        let pet_form = self.pet_form;
        spawn_local(async move {
            let done = match &form {
                PetForm::Edit { id, update } => coordinator.update_pet(*id, update).await,
                PetForm::Transfer { id, new_owner } => coordinator.transfer(*id, new_owner).await,
            };
            if done && pet_form.get_untracked().as_ref() == Some(&form) {
                pet_form.set(None);
            }
        });
    }

    pub fn search(&self) {
        let coordinator = Rc::clone(&self.coordinator);
        let input = self.search_input.get_untracked();
        spawn_local(async move { coordinator.search_text(&input).await });
    }

    pub fn dismiss_notice(&self) {
        self.coordinator.dismiss_notice();
    }

    /// Dismiss `notice` after `millis`, unless another notice replaced it
    pub fn expire_notice(&self, notice: Notice, millis: u32) {
        let controller = self.clone();
        gloo_timers::callback::Timeout::new(millis, move || {
            if controller.view.get_untracked().notice.as_ref() == Some(&notice) {
                controller.dismiss_notice();
            }
        })
        .forget();
    }
}
