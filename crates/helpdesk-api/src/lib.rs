// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use helpdesk_app::forms::{Credentials, Registration};
use helpdesk_app::{
    ApiError, Authenticator, Customer, Directory, Entity, LoginGrant, RecordStore, Saved,
    SearchField, Technician, TicketRecord, User,
};
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// A record type the backend serves under `/{slug}/...`, wrapped in
/// `{SINGULAR: {...}}` or `{PLURAL: [...]}` envelopes.
pub trait Resource: Entity<Draft: Serialize> + DeserializeOwned {
    const SINGULAR: &'static str;
    const PLURAL: &'static str;
}

impl Resource for Customer {
    const SINGULAR: &'static str = "cliente";
    const PLURAL: &'static str = "clientes";
}

impl Resource for Technician {
    const SINGULAR: &'static str = "tecnico";
    const PLURAL: &'static str = "tecnicos";
}

impl Resource for TicketRecord {
    const SINGULAR: &'static str = "ticket";
    const PLURAL: &'static str = "tickets";
}

/// Blocking client for the helpdesk REST backend.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    timeout: Duration,
    token: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed = Url::parse(trimmed)
            .with_context(|| format!("parse api.base_url {trimmed:?} -- expected e.g. http://localhost:3000/api"))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            bail!("api.base_url must be an http(s) URL, got {trimmed:?}");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url: parsed,
            timeout,
            token: None,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Checks that something answers at the base URL. Any HTTP status counts.
    pub fn ping(&self) -> Result<()> {
        self.http
            .get(self.base_url.clone())
            .send()
            .map_err(|error| connection_error(self.base_url(), &error))?;
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = method.as_str(), path = url.path(), "backend request");
        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .send()
            .map_err(|error| connection_error(self.base_url(), &error))
            .inspect_err(|error| warn!(%error, "backend unreachable"))?;
        let status = response.status();
        let body = response.text().map_err(|error| ApiError::Decode {
            detail: format!("read response body: {error}"),
        })?;
        if !status.is_success() {
            let error = clean_error_response(status, &body);
            debug!(status = status.as_u16(), %error, "backend rejected request");
            return Err(error);
        }
        let value = parse_body(&body)?;
        if let Some(message) = string_field(&value, "error") {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: Some(message),
            });
        }
        Ok(value)
    }

    /// Like `send`, but a 404 means "nothing there" rather than a failure.
    fn send_optional(&self, request: RequestBuilder) -> Result<Option<Value>, ApiError> {
        match self.send(request) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.is_not_found() => Ok(None),
            Err(error) => Err(error),
        }
    }
}

fn parse_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|error| ApiError::Decode {
        detail: format!("invalid JSON: {error}"),
    })
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

/// Backend confirmation text; creation endpoints use `msg` or `message`.
fn message_from(value: &Value) -> Option<String> {
    string_field(value, "msg").or_else(|| string_field(value, "message"))
}

/// Normalizes the shapes the backend answers with: a bare array, a bare
/// record, `{plural: [...]}`, or `{singular: {...}}`.
pub fn records_from<E: DeserializeOwned>(
    value: Value,
    singular: &str,
    plural: &str,
) -> Result<Vec<E>, ApiError> {
    let items = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(inner) = map.remove(plural).or_else(|| map.remove(singular)) {
                match inner {
                    Value::Array(items) => items,
                    Value::Null => Vec::new(),
                    other => vec![other],
                }
            } else if map.contains_key("_id") {
                vec![Value::Object(map)]
            } else {
                Vec::new()
            }
        }
        other => {
            return Err(ApiError::Decode {
                detail: format!("expected {plural} but got {other}"),
            });
        }
    };
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|error| ApiError::Decode {
                detail: format!("decode {singular}: {error}"),
            })
        })
        .collect()
}

impl<E: Resource> Directory<E> for Client {
    fn list_all(&mut self) -> Result<Vec<E>, ApiError> {
        let url = self.endpoint(&[E::MODULE.slug(), "listar"]);
        let value = self.send(self.request(Method::GET, url))?;
        records_from(value, E::SINGULAR, E::PLURAL)
    }

    fn find_by(&mut self, field: SearchField, value: &str) -> Result<Vec<E>, ApiError> {
        let mut url = self.endpoint(&[E::MODULE.slug(), "buscar"]);
        url.query_pairs_mut().append_pair(field.key(), value);
        match self.send_optional(self.request(Method::GET, url))? {
            Some(body) => records_from(body, E::SINGULAR, E::PLURAL),
            None => Ok(Vec::new()),
        }
    }

    fn fetch(&mut self, id: &E::Id) -> Result<Option<E>, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::MODULE.slug(), "buscarid", &id]);
        match self.send_optional(self.request(Method::GET, url))? {
            Some(body) => Ok(records_from(body, E::SINGULAR, E::PLURAL)?.into_iter().next()),
            None => Ok(None),
        }
    }
}

impl<E: Resource> RecordStore<E> for Client {
    fn create(&mut self, draft: &E::Draft) -> Result<Saved<E>, ApiError> {
        let url = self.endpoint(&[E::MODULE.slug(), "crear"]);
        let value = self.send(self.request(Method::POST, url).json(draft))?;
        saved_from(value)
    }

    fn update(&mut self, id: &E::Id, draft: &E::Draft) -> Result<Saved<E>, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::MODULE.slug(), "actualizar", &id]);
        let value = self.send(self.request(Method::PUT, url).json(draft))?;
        saved_from(value)
    }

    fn delete(&mut self, id: &E::Id) -> Result<Option<String>, ApiError> {
        let id = id.to_string();
        let url = self.endpoint(&[E::MODULE.slug(), "eliminar", &id]);
        let value = self.send(self.request(Method::DELETE, url))?;
        Ok(message_from(&value))
    }
}

/// The echoed record is optional: some endpoints answer with only a message.
fn saved_from<E: Resource>(value: Value) -> Result<Saved<E>, ApiError> {
    let message = message_from(&value);
    let record = records_from::<E>(value, E::SINGULAR, E::PLURAL)
        .ok()
        .and_then(|records| records.into_iter().next());
    Ok(Saved::new(record, message))
}

#[derive(serde::Deserialize)]
struct LoginResponse {
    token: String,
    #[serde(alias = "user")]
    usuario: User,
    #[serde(default, alias = "message")]
    msg: Option<String>,
}

impl Authenticator for Client {
    fn login(&mut self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
        let url = self.endpoint(&["auth", "login"]);
        let value = self.send(self.request(Method::POST, url).json(credentials))?;
        let parsed: LoginResponse =
            serde_json::from_value(value).map_err(|error| ApiError::Decode {
                detail: format!("decode login response: {error}"),
            })?;
        Ok(LoginGrant {
            token: parsed.token,
            user: parsed.usuario,
            message: parsed.msg,
        })
    }

    fn register(&mut self, registration: &Registration) -> Result<Option<String>, ApiError> {
        let url = self.endpoint(&["auth", "register"]);
        let value = self.send(self.request(Method::POST, url).json(registration))?;
        Ok(message_from(&value))
    }

    fn use_token(&mut self, token: Option<&str>) {
        self.token = token.map(str::to_owned);
    }
}

fn connection_error(base_url: &str, error: &reqwest::Error) -> ApiError {
    ApiError::Unreachable {
        base_url: base_url.to_owned(),
        detail: error.to_string(),
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> ApiError {
    let code = status.as_u16();
    if let Ok(parsed) = serde_json::from_str::<Value>(body)
        && let Some(message) = string_field(&parsed, "msg")
            .or_else(|| string_field(&parsed, "error"))
            .or_else(|| string_field(&parsed, "message"))
    {
        return ApiError::rejected(code, message);
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') && !trimmed.contains('<')
    {
        return ApiError::rejected(code, trimmed);
    }

    ApiError::Rejected {
        status: code,
        message: None,
    }
}
