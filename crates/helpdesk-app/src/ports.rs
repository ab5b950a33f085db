// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::error::Error;
use std::fmt;

use crate::entity::Entity;
use crate::forms::{Credentials, Registration};
use crate::{LoginGrant, Notice, Route, SearchField, StoredSession};

/// Failure talking to the remote backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The backend answered with a non-success status, or a success status
    /// carrying an `error` body.
    Rejected {
        status: u16,
        message: Option<String>,
    },
    Unreachable {
        base_url: String,
        detail: String,
    },
    Decode {
        detail: String,
    },
}

impl ApiError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: Some(message.into()),
        }
    }

    /// Text the backend supplied for the user, when it supplied any.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Rejected { status: 404, .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected {
                status,
                message: Some(message),
            } => write!(f, "backend rejected request ({status}): {message}"),
            Self::Rejected {
                status,
                message: None,
            } => write!(f, "backend returned status {status}"),
            Self::Unreachable { base_url, detail } => write!(
                f,
                "cannot reach backend at {base_url} -- check [api].base_url and that the server is running ({detail})"
            ),
            Self::Decode { detail } => write!(f, "decode backend response: {detail}"),
        }
    }
}

impl Error for ApiError {}

/// Result of a create or update: the stored record when the backend echoes
/// it, and the backend's message when it sends one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved<E> {
    pub record: Option<E>,
    pub message: Option<String>,
}

impl<E> Saved<E> {
    pub fn new(record: Option<E>, message: Option<String>) -> Self {
        Self { record, message }
    }
}

impl<E> Default for Saved<E> {
    fn default() -> Self {
        Self {
            record: None,
            message: None,
        }
    }
}

pub trait Directory<E: Entity> {
    fn list_all(&mut self) -> Result<Vec<E>, ApiError>;
    /// An empty vector means nothing matched.
    fn find_by(&mut self, field: SearchField, value: &str) -> Result<Vec<E>, ApiError>;
    fn fetch(&mut self, id: &E::Id) -> Result<Option<E>, ApiError>;
}

pub trait RecordStore<E: Entity> {
    fn create(&mut self, draft: &E::Draft) -> Result<Saved<E>, ApiError>;
    fn update(&mut self, id: &E::Id, draft: &E::Draft) -> Result<Saved<E>, ApiError>;
    fn delete(&mut self, id: &E::Id) -> Result<Option<String>, ApiError>;
}

pub trait Authenticator {
    fn login(&mut self, credentials: &Credentials) -> Result<LoginGrant, ApiError>;
    fn register(&mut self, registration: &Registration) -> Result<Option<String>, ApiError>;
    /// Token attached to every later request; `None` signs requests out.
    fn use_token(&mut self, token: Option<&str>);
}

pub trait SessionStore {
    fn load(&self) -> anyhow::Result<Option<StoredSession>>;
    fn save(&mut self, session: &StoredSession) -> anyhow::Result<()>;
    fn clear(&mut self) -> anyhow::Result<()>;
}

pub trait NotificationSink {
    fn notify(&mut self, notice: Notice);
}

pub trait NavigationSink {
    fn navigate(&mut self, route: Route);
}
