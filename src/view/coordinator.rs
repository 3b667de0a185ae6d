//! View State Coordinator
//!
//! Owns the [`ViewState`] and runs the user workflows against the current
//! session. Runs on a single thread: state sits in `RefCell`/`Cell` and is
//! never borrowed across an `.await`.
//!
//! Late results are dropped rather than cancelled:
//!
//! - every session gets a new epoch; list loads and registrations started
//!   under an older epoch do not touch the state
//! - every search takes a ticket; only the newest ticket may publish
//!
//! At most one list load runs per session. A load left over from an older
//! session does not hold back the new session's first load.

use futures_util::future::try_join_all;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::state::{
    ConnectionState, Notice, PetActionState, PetListState, RegistrationState, SearchState,
    ViewState,
};
use crate::chain::Address;
use crate::projection::{project, ViewPet};
use crate::registry::{
    parse_new_owner, pet_id_from_receipt, PetId, PetRegistry, PetUpdate, RegisterDraft,
    RegistryError, RegistryResult, WriteCall,
};
use crate::session::{Connector, Session};

type Listener = Box<dyn Fn(&ViewState)>;

pub struct Coordinator<C: Connector> {
    connector: C,
    session: RefCell<Option<Rc<Session<C::Registry>>>>,
    state: RefCell<ViewState>,
    listeners: RefCell<Vec<Listener>>,
    epoch: Cell<u64>,
    search_ticket: Cell<u64>,
    /// Epoch of the list load in flight
    loading: Cell<Option<u64>>,
    reload_queued: Cell<bool>,
}

async fn load_pets<R: PetRegistry>(registry: &R, owner: &Address) -> RegistryResult<Vec<ViewPet>> {
    let ids = registry.get_owner_pets(owner).await?;
    let records = try_join_all(ids.iter().map(|id| registry.get_pet(*id))).await?;
    Ok(records.iter().map(project).collect())
}

impl<C: Connector> Coordinator<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            session: RefCell::new(None),
            state: RefCell::new(ViewState::default()),
            listeners: RefCell::new(Vec::new()),
            epoch: Cell::new(0),
            search_ticket: Cell::new(0),
            loading: Cell::new(None),
            reload_queued: Cell::new(false),
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn snapshot(&self) -> ViewState {
        self.state.borrow().clone()
    }

    /// Called with the new state after every change. Listeners must not
    /// subscribe further listeners from inside the callback.
    pub fn subscribe(&self, listener: impl Fn(&ViewState) + 'static) {
        self.listeners.borrow_mut().push(Box::new(listener));
    }

    fn update(&self, f: impl FnOnce(&mut ViewState)) {
        f(&mut self.state.borrow_mut());
        let snapshot = self.snapshot();
        for listener in self.listeners.borrow().iter() {
            listener(&snapshot);
        }
    }

    fn current_session(&self) -> Option<Rc<Session<C::Registry>>> {
        self.session.borrow().clone()
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch
    }

    fn next_epoch(&self) -> u64 {
        let epoch = self.epoch.get() + 1;
        self.epoch.set(epoch);
        epoch
    }

    /// Request wallet access and load the account's pets
    pub async fn connect(&self) {
        if !matches!(self.state.borrow().connection, ConnectionState::Disconnected) {
            return;
        }

        let epoch = self.next_epoch();
        self.update(|s| s.connection = ConnectionState::Connecting);

        let result = self.connector.connect().await;
        if !self.is_current(epoch) {
            tracing::warn!("Discarding connection for a superseded session");
            return;
        }

        match result {
            Ok(session) => {
                let warning = session.network_warning(self.connector.target_chain());
                let connection = ConnectionState::Connected {
                    account: session.account,
                    network: session.network.clone(),
                };
                *self.session.borrow_mut() = Some(Rc::new(session));
                self.update(|s| {
                    s.connection = connection;
                    if let Some(warning) = warning {
                        s.notice = Some(Notice::Warning(warning));
                    }
                });
                self.reload_pets().await;
            }
            Err(e) => {
                tracing::warn!("Connection failed: {}", e);
                self.update(|s| {
                    s.connection = ConnectionState::Disconnected;
                    s.notice = Some(Notice::Error(e));
                });
            }
        }
    }

    /// Reload the connected account's pets. A reload requested while this
    /// session's load is running is queued and runs right after it.
    pub async fn reload_pets(&self) {
        let Some(session) = self.current_session() else {
            return;
        };
        let epoch = self.epoch.get();
        if self.loading.get() == Some(epoch) {
            tracing::debug!("Pet list load in flight, queueing reload");
            self.reload_queued.set(true);
            return;
        }

        self.loading.set(Some(epoch));
        loop {
            self.reload_queued.set(false);
            self.update(|s| s.pets = PetListState::Loading);
            let result = load_pets(&session.registry, &session.account).await;

            if !self.is_current(epoch) {
                tracing::warn!("Discarding pet list for a superseded session");
                break;
            }
            match result {
                Ok(pets) => {
                    tracing::info!(count = pets.len(), "Pet list loaded");
                    self.update(|s| s.pets = PetListState::Loaded(pets));
                }
                Err(e) => {
                    tracing::warn!("Pet list load failed: {}", e);
                    self.update(|s| {
                        s.pets = PetListState::Failed(e.clone());
                        s.notice = Some(Notice::Error(e));
                    });
                }
            }

            if !self.reload_queued.get() {
                break;
            }
        }

        if self.loading.get() == Some(epoch) {
            self.loading.set(None);
        }
    }

    /// Edit the registration form
    pub fn update_draft(&self, f: impl FnOnce(&mut RegisterDraft)) {
        if !self.state.borrow().is_connected() {
            return;
        }
        self.update(|s| f(&mut s.draft));
    }

    /// Register the drafted pet, then reload the list once it is confirmed.
    /// Returns the new id when the registration became final.
    pub async fn register(&self) -> Option<PetId> {
        let session = self.current_session()?;
        let draft = {
            let state = self.state.borrow();
            if state.is_registering() {
                return None;
            }
            state.draft.clone()
        };

        let pet = match draft.to_new_pet() {
            Ok(pet) => pet,
            Err(e) => {
                self.update(|s| s.notice = Some(Notice::Error(RegistryError::from(e))));
                return None;
            }
        };

        let epoch = self.epoch.get();
        self.update(|s| {
            s.registration = RegistrationState::Submitting;
            s.notice = None;
        });

        let registry = &session.registry;
        let tx = match registry.submit(&WriteCall::Register(pet)).await {
            Ok(tx) => tx,
            Err(e) => return self.finish_registration(epoch, Err(e)).await,
        };

        if !self.is_current(epoch) {
            tracing::warn!(%tx, "Session changed while submitting");
            return None;
        }
        self.update(|s| s.registration = RegistrationState::Confirming { tx });

        let result = match registry.confirm(&tx).await {
            Ok(receipt) => pet_id_from_receipt(&receipt, registry.contract_address()),
            Err(e) => Err(e),
        };
        self.finish_registration(epoch, result).await
    }

    async fn finish_registration(
        &self,
        epoch: u64,
        result: RegistryResult<PetId>,
    ) -> Option<PetId> {
        if !self.is_current(epoch) {
            tracing::warn!("Discarding registration outcome for a superseded session");
            return None;
        }

        match result {
            Ok(id) => {
                tracing::info!(%id, "Pet registered");
                self.update(|s| {
                    s.registration = RegistrationState::Editing;
                    s.draft.clear();
                    s.notice = Some(Notice::Info(format!("Pet registered with ID {}", id)));
                });
                self.reload_pets().await;
                Some(id)
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                self.update(|s| {
                    s.registration = RegistrationState::Editing;
                    s.notice = Some(Notice::Error(e));
                });
                None
            }
        }
    }

    /// Hand an owned pet to the address typed by the user. Returns true once
    /// the transfer is final.
    pub async fn transfer(&self, id: PetId, new_owner: &str) -> bool {
        if !self.state.borrow().is_connected() {
            return false;
        }
        let new_owner = match parse_new_owner(new_owner) {
            Ok(address) => address,
            Err(e) => {
                self.update(|s| s.notice = Some(Notice::Error(RegistryError::from(e))));
                return false;
            }
        };
        let done = format!("Pet #{} transferred to {}", id, new_owner);
        self.write_pet(id, WriteCall::Transfer { pet_id: id, new_owner }, done)
            .await
    }

    /// Replace the editable fields of an owned pet. Returns true once the
    /// update is final.
    pub async fn update_pet(&self, id: PetId, update: &PetUpdate) -> bool {
        if !self.state.borrow().is_connected() {
            return false;
        }
        let update = match update.validated() {
            Ok(update) => update,
            Err(e) => {
                self.update(|s| s.notice = Some(Notice::Error(RegistryError::from(e))));
                return false;
            }
        };
        let done = format!("Pet #{} updated", id);
        self.write_pet(id, WriteCall::Update { pet_id: id, update }, done)
            .await
    }

    async fn write_pet(&self, id: PetId, call: WriteCall, done: String) -> bool {
        let Some(session) = self.current_session() else {
            return false;
        };
        if self.state.borrow().pet_action.pet().is_some() {
            return false;
        }

        let epoch = self.epoch.get();
        self.update(|s| {
            s.pet_action = PetActionState::Submitting { id };
            s.notice = None;
        });

        let registry = &session.registry;
        let result = match registry.submit(&call).await {
            Ok(tx) if self.is_current(epoch) => {
                self.update(|s| s.pet_action = PetActionState::Confirming { id, tx });
                registry.confirm(&tx).await
            }
            Ok(tx) => {
                tracing::warn!(%tx, "Session changed while submitting");
                return false;
            }
            Err(e) => Err(e),
        };

        if !self.is_current(epoch) {
            tracing::warn!(
                call = call.label(),
                "Discarding write outcome for a superseded session"
            );
            return false;
        }
        match result {
            Ok(_) => {
                tracing::info!(%id, call = call.label(), "Pet write confirmed");
                self.update(|s| {
                    s.pet_action = PetActionState::Idle;
                    s.notice = Some(Notice::Info(done));
                });
                self.reload_pets().await;
                true
            }
            Err(e) => {
                tracing::warn!(%id, call = call.label(), "Pet write failed: {}", e);
                self.update(|s| {
                    s.pet_action = PetActionState::Idle;
                    s.notice = Some(Notice::Error(e));
                });
                false
            }
        }
    }

    /// Look up any pet by id. Only the most recent search is shown.
    pub async fn search(&self, id: PetId) {
        let Some(session) = self.current_session() else {
            return;
        };

        let ticket = self.search_ticket.get() + 1;
        self.search_ticket.set(ticket);
        self.update(|s| s.search = SearchState::Searching { id });

        let result = session.registry.get_pet(id).await;
        if self.search_ticket.get() != ticket {
            tracing::debug!(%id, "Discarding stale search result");
            return;
        }

        let search = match result {
            Ok(record) => SearchState::Found(project(&record)),
            Err(RegistryError::NotFound(id)) => SearchState::NotFound { id },
            Err(error) => SearchState::Failed { id, error },
        };
        self.update(|s| s.search = search);
    }

    /// Search from free text; blank input clears the result
    pub async fn search_text(&self, input: &str) {
        if !self.state.borrow().is_connected() {
            return;
        }

        let input = input.trim();
        if input.is_empty() {
            self.search_ticket.set(self.search_ticket.get() + 1);
            self.update(|s| s.search = SearchState::Idle);
            return;
        }

        match input.parse::<PetId>() {
            Ok(id) => self.search(id).await,
            Err(_) => self.update(|s| {
                s.notice = Some(Notice::Info(format!("\"{}\" is not a pet ID", input)));
            }),
        }
    }

    /// The wallet switched or revoked accounts
    pub async fn handle_accounts_changed(&self, accounts: &[Address]) {
        let account = self.state.borrow().account();
        if matches!(self.state.borrow().connection, ConnectionState::Disconnected) {
            return;
        }
        if account.is_some() && account.as_ref() == accounts.first() {
            return;
        }

        tracing::info!(accounts = accounts.len(), "Wallet accounts changed");
        self.reset_session();
        if accounts.is_empty() {
            self.update(|s| s.notice = Some(Notice::Info("Wallet disconnected".to_string())));
        } else {
            self.connect().await;
        }
    }

    /// The wallet moved to another chain
    pub async fn handle_chain_changed(&self, chain_id: u64) {
        let unchanged = match &self.state.borrow().connection {
            ConnectionState::Disconnected => return,
            // connect() is switching networks itself
            ConnectionState::Connecting => true,
            ConnectionState::Connected { network, .. } => network.chain_id() == Some(chain_id),
        };
        if unchanged {
            tracing::debug!(chain_id, "Ignoring chain event for the current session");
            return;
        }
        tracing::info!(chain_id, "Wallet chain changed");
        self.reset_session();
        self.connect().await;
    }

    fn reset_session(&self) {
        self.next_epoch();
        self.search_ticket.set(self.search_ticket.get() + 1);
        self.reload_queued.set(false);
        *self.session.borrow_mut() = None;
        self.update(ViewState::clear_session);
    }

    pub fn dismiss_notice(&self) {
        self.update(|s| s.notice = None);
    }
}
