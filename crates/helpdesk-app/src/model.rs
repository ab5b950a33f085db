// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

use crate::forms::{CustomerDraft, TechnicianDraft};
use crate::ids::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "Masculino")]
    Male,
    #[serde(rename = "Femenino")]
    Female,
    #[serde(rename = "Otro")]
    Other,
}

impl Gender {
    pub const ALL: [Self; 3] = [Self::Male, Self::Female, Self::Other];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Masculino",
            Self::Female => "Femenino",
            Self::Other => "Otro",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Masculino" => Some(Self::Male),
            "Femenino" => Some(Self::Female),
            "Otro" => Some(Self::Other),
            _ => None,
        }
    }

    /// Next option in `ALL` order, starting from the first when `current` is
    /// not a recognized value.
    pub fn cycle(current: &str, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let next = match Self::parse(current) {
            Some(gender) => {
                let index = Self::ALL
                    .iter()
                    .position(|candidate| *candidate == gender)
                    .unwrap_or(0) as isize;
                (index + delta).rem_euclid(len)
            }
            None if delta < 0 => len - 1,
            None => 0,
        };
        Self::ALL[next as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Module {
    Customers,
    Technicians,
    Tickets,
}

impl Module {
    pub const ALL: [Self; 3] = [Self::Customers, Self::Technicians, Self::Tickets];

    /// Path segment the backend and the route table use for this module.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Customers => "clientes",
            Self::Technicians => "tecnicos",
            Self::Tickets => "tickets",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Customers => "Clientes",
            Self::Technicians => "Técnicos",
            Self::Tickets => "Tickets",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavSection {
    Customers,
    Technicians,
    Tickets,
    None,
}

impl NavSection {
    pub const fn module(self) -> Option<Module> {
        match self {
            Self::Customers => Some(Module::Customers),
            Self::Technicians => Some(Module::Technicians),
            Self::Tickets => Some(Module::Tickets),
            Self::None => None,
        }
    }
}

impl From<Module> for NavSection {
    fn from(module: Module) -> Self {
        match module {
            Module::Customers => Self::Customers,
            Module::Technicians => Self::Technicians,
            Module::Tickets => Self::Tickets,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Login,
    Register,
    Home,
    List(Module),
    Create(Module),
    Edit(Module, String),
}

impl Route {
    pub fn section(&self) -> NavSection {
        match self {
            Self::Login | Self::Register | Self::Home => NavSection::None,
            Self::List(module) | Self::Create(module) | Self::Edit(module, _) => {
                NavSection::from(*module)
            }
        }
    }

    pub const fn requires_session(&self) -> bool {
        !matches!(self, Self::Login | Self::Register)
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/".to_owned(),
            Self::Register => "/register".to_owned(),
            Self::Home => "/home".to_owned(),
            Self::List(module) => format!("/{}/listar", module.slug()),
            Self::Create(module) => format!("/{}/crear", module.slug()),
            Self::Edit(module, id) => format!("/{}/actualizar/{id}", module.slug()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Success,
    Error,
    Info,
    Warning,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success => "ok",
            Self::Error => "error",
            Self::Info => "info",
            Self::Warning => "aviso",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
}

impl Notice {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchField {
    NationalId,
    Surname,
    Code,
}

impl SearchField {
    /// Query-string key the backend expects for this field.
    pub const fn key(self) -> &'static str {
        match self {
            Self::NationalId => "cedula",
            Self::Surname => "apellido",
            Self::Code => "codigo",
        }
    }

    /// Person lookups search by cédula for all-digit terms and by surname
    /// otherwise.
    pub fn for_person_term(term: &str) -> Self {
        let trimmed = term.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|ch| ch.is_ascii_digit()) {
            Self::NationalId
        } else {
            Self::Surname
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormPhase {
    Empty,
    Editing,
    Submitting,
    Succeeded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "_id")]
    pub id: CustomerId,
    #[serde(flatten)]
    pub details: CustomerDraft,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technician {
    #[serde(rename = "_id")]
    pub id: TechnicianId,
    #[serde(flatten)]
    pub details: TechnicianDraft,
}

/// A ticket's reference to another record; the backend answers with the bare
/// id or with the populated record depending on the endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linked<R, I> {
    Record(R),
    Id(I),
}

impl Linked<Customer, CustomerId> {
    pub fn id(&self) -> &CustomerId {
        match self {
            Self::Record(record) => &record.id,
            Self::Id(id) => id,
        }
    }

    pub fn customer(&self) -> Option<&Customer> {
        match self {
            Self::Record(record) => Some(record),
            Self::Id(_) => None,
        }
    }
}

impl Linked<Technician, TechnicianId> {
    pub fn id(&self) -> &TechnicianId {
        match self {
            Self::Record(record) => &record.id,
            Self::Id(id) => id,
        }
    }

    pub fn technician(&self) -> Option<&Technician> {
        match self {
            Self::Record(record) => Some(record),
            Self::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    #[serde(rename = "_id")]
    pub id: TicketId,
    #[serde(rename = "codigo", default)]
    pub code: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "cliente", default)]
    pub customer: Option<Linked<Customer, CustomerId>>,
    #[serde(rename = "tecnico", default)]
    pub technician: Option<Linked<Technician, TechnicianId>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(rename = "nombre", default)]
    pub name: String,
    #[serde(rename = "apellido", default)]
    pub surname: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    pub user: User,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}
