// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::VecDeque;

use anyhow::{Result, bail};
use helpdesk_app::forms::{Credentials, Registration};
use helpdesk_app::{
    ApiError, Authenticator, Customer, CustomerId, Directory, Entity, Linked, LoginGrant, Module,
    NavigationSink, Notice, NotificationSink, RecordStore, Route, Saved, SearchField,
    SessionStore, Severity, StoredSession, Technician, TechnicianId, TicketId, TicketRecord, User,
};

use crate::DeskFaker;

/// One collaborator call, as seen by the in-memory backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAll(Module),
    FindBy(Module, SearchField, String),
    Fetch(Module, String),
    Create(Module),
    Update(Module, String),
    Delete(Module, String),
    Login(String),
    Register(String),
}

struct Account {
    password: String,
    user: User,
}

/// Backend double holding every table in memory and logging each call.
#[derive(Default)]
pub struct InMemoryBackend {
    pub customers: Vec<Customer>,
    pub technicians: Vec<Technician>,
    pub tickets: Vec<TicketRecord>,
    pub token: Option<String>,
    /// Message echoed by create, update and delete when set.
    pub reply_message: Option<String>,
    accounts: Vec<Account>,
    calls: Vec<Call>,
    failures: VecDeque<ApiError>,
    next_id: u64,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` customers and technicians plus one ticket per pair.
    pub fn seeded(faker: &mut DeskFaker, count: usize) -> Self {
        let mut backend = Self::new();
        for _ in 0..count {
            let customer = faker.customer();
            let technician = faker.technician();
            backend.tickets.push(faker.ticket(&customer, &technician));
            backend.customers.push(customer);
            backend.technicians.push(technician);
        }
        backend
    }

    pub fn with_account(mut self, password: &str, user: User) -> Self {
        self.accounts.push(Account {
            password: password.to_owned(),
            user,
        });
        self
    }

    /// The next collaborator call fails with `error` instead of running.
    pub fn fail_next(&mut self, error: ApiError) {
        self.failures.push_back(error);
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    fn record(&mut self, call: Call) -> Result<(), ApiError> {
        self.calls.push(call);
        match self.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn fresh_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}-mem-{}", self.next_id)
    }
}

/// Records the in-memory backend can store.
pub trait StoredRecord: Entity + Sized {
    const ID_PREFIX: &'static str;

    fn table(backend: &mut InMemoryBackend) -> &mut Vec<Self>;
    fn matches(&self, field: SearchField, value: &str) -> bool;
    fn build(backend: &InMemoryBackend, id: String, draft: &Self::Draft) -> Self;
}

fn person_matches(national_id: &str, surname: &str, field: SearchField, value: &str) -> bool {
    match field {
        SearchField::NationalId => national_id == value,
        SearchField::Surname => surname.to_lowercase().contains(&value.to_lowercase()),
        SearchField::Code => false,
    }
}

impl StoredRecord for Customer {
    const ID_PREFIX: &'static str = "c";

    fn table(backend: &mut InMemoryBackend) -> &mut Vec<Self> {
        &mut backend.customers
    }

    fn matches(&self, field: SearchField, value: &str) -> bool {
        person_matches(&self.details.national_id, &self.details.surname, field, value)
    }

    fn build(_backend: &InMemoryBackend, id: String, draft: &Self::Draft) -> Self {
        Self {
            id: CustomerId::new(id),
            details: draft.clone(),
        }
    }
}

impl StoredRecord for Technician {
    const ID_PREFIX: &'static str = "k";

    fn table(backend: &mut InMemoryBackend) -> &mut Vec<Self> {
        &mut backend.technicians
    }

    fn matches(&self, field: SearchField, value: &str) -> bool {
        person_matches(&self.details.national_id, &self.details.surname, field, value)
    }

    fn build(_backend: &InMemoryBackend, id: String, draft: &Self::Draft) -> Self {
        Self {
            id: TechnicianId::new(id),
            details: draft.clone(),
        }
    }
}

impl StoredRecord for TicketRecord {
    const ID_PREFIX: &'static str = "t";

    fn table(backend: &mut InMemoryBackend) -> &mut Vec<Self> {
        &mut backend.tickets
    }

    fn matches(&self, field: SearchField, value: &str) -> bool {
        field == SearchField::Code && self.code.eq_ignore_ascii_case(value)
    }

    fn build(backend: &InMemoryBackend, id: String, draft: &Self::Draft) -> Self {
        let customer = draft.customer.as_ref().map(|id| {
            backend
                .customers
                .iter()
                .find(|customer| &customer.id == id)
                .map_or_else(|| Linked::Id(id.clone()), |found| Linked::Record(found.clone()))
        });
        let technician = draft.technician.as_ref().map(|id| {
            backend
                .technicians
                .iter()
                .find(|technician| &technician.id == id)
                .map_or_else(|| Linked::Id(id.clone()), |found| Linked::Record(found.clone()))
        });
        Self {
            id: TicketId::new(id),
            code: draft.code.clone(),
            description: draft.description.clone(),
            customer,
            technician,
        }
    }
}

impl<E: StoredRecord> Directory<E> for InMemoryBackend {
    fn list_all(&mut self) -> Result<Vec<E>, ApiError> {
        self.record(Call::ListAll(E::MODULE))?;
        Ok(E::table(self).clone())
    }

    fn find_by(&mut self, field: SearchField, value: &str) -> Result<Vec<E>, ApiError> {
        self.record(Call::FindBy(E::MODULE, field, value.to_owned()))?;
        Ok(E::table(self)
            .iter()
            .filter(|record| record.matches(field, value))
            .cloned()
            .collect())
    }

    fn fetch(&mut self, id: &E::Id) -> Result<Option<E>, ApiError> {
        self.record(Call::Fetch(E::MODULE, id.to_string()))?;
        Ok(E::table(self).iter().find(|record| record.id() == id).cloned())
    }
}

impl<E: StoredRecord> RecordStore<E> for InMemoryBackend {
    fn create(&mut self, draft: &E::Draft) -> Result<Saved<E>, ApiError> {
        self.record(Call::Create(E::MODULE))?;
        let id = self.fresh_id(E::ID_PREFIX);
        let record = E::build(self, id, draft);
        E::table(self).push(record.clone());
        Ok(Saved::new(Some(record), self.reply_message.clone()))
    }

    fn update(&mut self, id: &E::Id, draft: &E::Draft) -> Result<Saved<E>, ApiError> {
        self.record(Call::Update(E::MODULE, id.to_string()))?;
        let record = E::build(self, id.to_string(), draft);
        let table = E::table(self);
        let Some(slot) = table.iter_mut().find(|existing| existing.id() == id) else {
            return Err(ApiError::rejected(404, "Registro no encontrado"));
        };
        *slot = record.clone();
        Ok(Saved::new(Some(record), self.reply_message.clone()))
    }

    fn delete(&mut self, id: &E::Id) -> Result<Option<String>, ApiError> {
        self.record(Call::Delete(E::MODULE, id.to_string()))?;
        let table = E::table(self);
        let before = table.len();
        table.retain(|existing| existing.id() != id);
        if table.len() == before {
            return Err(ApiError::rejected(404, "Registro no encontrado"));
        }
        Ok(self.reply_message.clone())
    }
}

impl Authenticator for InMemoryBackend {
    fn login(&mut self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        self.record(Call::Login(credentials.email.clone()))?;
        let Some(account) = self
            .accounts
            .iter()
            .find(|account| account.user.email == credentials.email)
        else {
            return Err(ApiError::rejected(404, "Usuario no encontrado"));
        };
        if account.password != credentials.password {
            return Err(ApiError::rejected(401, "Contraseña incorrecta"));
        }
        let user = account.user.clone();
        Ok(LoginGrant {
            token: format!("token-{}", user.id),
            message: Some(format!("Bienvenido {}", user.name)),
            user,
        })
    }

    fn register(&mut self, registration: &Registration) -> Result<Option<String>, ApiError> {
        self.record(Call::Register(registration.email.clone()))?;
        if self
            .accounts
            .iter()
            .any(|account| account.user.email == registration.email)
        {
            return Err(ApiError::rejected(400, "El usuario ya existe"));
        }
        let id = self.fresh_id("u");
        self.accounts.push(Account {
            password: registration.password.clone(),
            user: User {
                id: id.into(),
                name: registration.name.clone(),
                surname: registration.surname.clone(),
                email: registration.email.clone(),
            },
        });
        Ok(None)
    }

    fn use_token(&mut self, token: Option<&str>) {
        self.token = token.map(str::to_owned);
    }
}

/// Notification and navigation sink that keeps everything it receives.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub notices: Vec<Notice>,
    pub routes: Vec<Route>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_notice(&self) -> Option<&Notice> {
        self.notices.last()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.notices
            .iter()
            .map(|notice| notice.message.as_str())
            .collect()
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.notices
            .iter()
            .filter(|notice| notice.severity == severity)
            .count()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl NavigationSink for RecordingSink {
    fn navigate(&mut self, route: Route) {
        self.routes.push(route);
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    pub saved: Option<StoredSession>,
    /// Makes `load` fail the way a truncated session file would.
    pub corrupt: bool,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<StoredSession>> {
        if self.corrupt {
            bail!("parse saved session: EOF while parsing an object at line 1 column 9");
        }
        Ok(self.saved.clone())
    }

    fn save(&mut self, session: &StoredSession) -> Result<()> {
        self.saved = Some(session.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.saved = None;
        self.corrupt = false;
        Ok(())
    }
}
