// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::forms::{Credentials, Registration};
use crate::ports::{Authenticator, NavigationSink, NotificationSink, SessionStore};
use crate::{Notice, Route, StoredSession, User};

pub const LOGIN_FAILED: &str = "Error al iniciar sesión";
pub const LOGIN_SUCCEEDED: &str = "Sesión iniciada";
pub const REGISTERED: &str = "Usuario registrado correctamente";
pub const REGISTER_FAILED: &str = "Error al registrarse";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(User),
    SignedOut,
}

/// The signed-in user and token, persisted through a `SessionStore` and
/// broadcast to subscribers on every change.
pub struct AuthSession<S: SessionStore> {
    store: S,
    current: Option<StoredSession>,
    subscribers: Vec<Sender<SessionEvent>>,
}

impl<S: SessionStore> AuthSession<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            current: None,
            subscribers: Vec::new(),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|session| &session.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|session| session.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&mut self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn broadcast(&mut self, event: SessionEvent) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event.clone()).is_ok());
    }

    fn sign_in(&mut self, auth: &mut impl Authenticator, session: StoredSession) {
        auth.use_token(Some(&session.token));
        let user = session.user.clone();
        self.current = Some(session);
        self.broadcast(SessionEvent::SignedIn(user));
    }

    /// Picks up a session saved by an earlier run. Unreadable storage is
    /// cleared and the session stays signed out.
    pub fn restore(&mut self, auth: &mut impl Authenticator) -> Result<bool> {
        match self.store.load() {
            Ok(Some(session)) => {
                info!(user = %session.user.id, "restored saved session");
                self.sign_in(auth, session);
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(error) => {
                warn!(error = %format!("{error:#}"), "discarding unreadable saved session");
                self.store
                    .clear()
                    .context("clear unreadable saved session")?;
                Ok(false)
            }
        }
    }

    pub fn login<N>(
        &mut self,
        auth: &mut impl Authenticator,
        credentials: &Credentials,
        sink: &mut N,
    ) -> bool
    where
        N: NotificationSink + NavigationSink,
    {
        if let Err(errors) = credentials.validate() {
            if let Some(message) = errors.first_message() {
                sink.notify(Notice::error(message));
            }
            return false;
        }
        match auth.login(credentials) {
            Ok(grant) => {
                info!(user = %grant.user.id, "signed in");
                let session = StoredSession {
                    token: grant.token,
                    user: grant.user,
                };
                if let Err(error) = self.store.save(&session) {
                    warn!(error = %format!("{error:#}"), "session not persisted");
                }
                self.sign_in(auth, session);
                let message = grant
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| LOGIN_SUCCEEDED.to_owned());
                sink.notify(Notice::success(message));
                sink.navigate(Route::Home);
                true
            }
            Err(error) => {
                warn!(%error, "sign-in rejected");
                sink.notify(Notice::error(error.user_message().unwrap_or(LOGIN_FAILED)));
                false
            }
        }
    }

    /// Signs out in memory first; a failure to clear storage is returned
    /// after subscribers have been told.
    pub fn logout(
        &mut self,
        auth: &mut impl Authenticator,
        sink: &mut impl NavigationSink,
    ) -> Result<()> {
        auth.use_token(None);
        let was_signed_in = self.current.take().is_some();
        if was_signed_in {
            info!("signed out");
        }
        self.broadcast(SessionEvent::SignedOut);
        sink.navigate(Route::Login);
        self.store.clear().context("clear saved session")
    }

    pub fn register<N>(
        &mut self,
        auth: &mut impl Authenticator,
        registration: &Registration,
        sink: &mut N,
    ) -> bool
    where
        N: NotificationSink + NavigationSink,
    {
        if let Err(message) = registration.validate() {
            sink.notify(Notice::error(message));
            return false;
        }
        match auth.register(registration) {
            Ok(message) => {
                info!(email = %registration.email, "account registered");
                let message = message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| REGISTERED.to_owned());
                sink.notify(Notice::success(message));
                sink.navigate(Route::Login);
                true
            }
            Err(error) => {
                warn!(%error, "registration rejected");
                sink.notify(Notice::error(
                    error.user_message().unwrap_or(REGISTER_FAILED),
                ));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::{Result, anyhow};

    use super::{AuthSession, SessionEvent};
    use crate::forms::{Credentials, Registration};
    use crate::ports::{ApiError, Authenticator, NavigationSink, NotificationSink, SessionStore};
    use crate::{LoginGrant, Notice, Route, StoredSession, User, UserId};

    #[derive(Default)]
    struct Store {
        saved: Option<StoredSession>,
        corrupt: bool,
        loads: RefCell<usize>,
    }

    impl SessionStore for Store {
        fn load(&self) -> Result<Option<StoredSession>> {
            *self.loads.borrow_mut() += 1;
            if self.corrupt {
                return Err(anyhow!("expected value at line 1 column 1"));
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

    #[derive(Default)]
    struct Gate {
        token: Option<String>,
        reject: bool,
    }

    impl Authenticator for Gate {
        fn login(&mut self, credentials: &Credentials) -> Result<LoginGrant, ApiError> {
            if self.reject {
                return Err(ApiError::rejected(401, "Credenciales inválidas"));
            }
            Ok(LoginGrant {
                token: "tok-1".to_owned(),
                user: user(&credentials.email),
                message: Some("Bienvenido".to_owned()),
            })
        }

        fn register(&mut self, _registration: &Registration) -> Result<Option<String>, ApiError> {
            Err(ApiError::Rejected {
                status: 400,
                message: None,
            })
        }

        fn use_token(&mut self, token: Option<&str>) {
            self.token = token.map(str::to_owned);
        }
    }

    #[derive(Default)]
    struct Sink {
        notices: Vec<Notice>,
        routes: Vec<Route>,
    }

    impl NotificationSink for Sink {
        fn notify(&mut self, notice: Notice) {
            self.notices.push(notice);
        }
    }

    impl NavigationSink for Sink {
        fn navigate(&mut self, route: Route) {
            self.routes.push(route);
        }
    }

    fn user(email: &str) -> User {
        User {
            id: UserId::new("u1"),
            name: "Ana".to_owned(),
            surname: "Ruiz".to_owned(),
            email: email.to_owned(),
        }
    }

    #[test]
    fn login_persists_hands_token_over_and_broadcasts() {
        let mut session = AuthSession::new(Store::default());
        let events = session.subscribe();
        let mut gate = Gate::default();
        let mut sink = Sink::default();
        assert!(session.login(
            &mut gate,
            &Credentials::new("ana@example.com", "secret"),
            &mut sink
        ));
        assert_eq!(gate.token.as_deref(), Some("tok-1"));
        assert_eq!(session.store().saved.as_ref().map(|s| s.token.as_str()), Some("tok-1"));
        assert_eq!(
            events.try_recv().ok(),
            Some(SessionEvent::SignedIn(user("ana@example.com")))
        );
        assert_eq!(sink.notices, vec![Notice::success("Bienvenido")]);
        assert_eq!(sink.routes, vec![Route::Home]);
    }

    #[test]
    fn missing_credentials_never_reach_the_backend() {
        let mut session = AuthSession::new(Store::default());
        let mut gate = Gate {
            reject: true,
            ..Gate::default()
        };
        let mut sink = Sink::default();
        assert!(!session.login(&mut gate, &Credentials::default(), &mut sink));
        assert_eq!(sink.notices, vec![Notice::error("El correo es obligatorio")]);
    }

    #[test]
    fn rejected_login_shows_backend_message() {
        let mut session = AuthSession::new(Store::default());
        let mut gate = Gate {
            reject: true,
            ..Gate::default()
        };
        let mut sink = Sink::default();
        assert!(!session.login(&mut gate, &Credentials::new("a@b.co", "x"), &mut sink));
        assert_eq!(sink.notices, vec![Notice::error("Credenciales inválidas")]);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn corrupt_storage_is_cleared_on_restore() {
        let store = Store {
            corrupt: true,
            ..Store::default()
        };
        let mut session = AuthSession::new(store);
        let mut gate = Gate::default();
        assert!(!session.restore(&mut gate).expect("restore"));
        assert!(!session.is_authenticated());
        assert!(!session.store().corrupt);
        assert_eq!(*session.store().loads.borrow(), 1);
    }

    #[test]
    fn logout_clears_everything_and_prunes_dropped_subscribers() {
        let store = Store {
            saved: Some(StoredSession {
                token: "tok-9".to_owned(),
                user: user("ana@example.com"),
            }),
            ..Store::default()
        };
        let mut session = AuthSession::new(store);
        let mut gate = Gate::default();
        assert!(session.restore(&mut gate).expect("restore"));
        let dropped = session.subscribe();
        drop(dropped);
        let kept = session.subscribe();
        let mut sink = Sink::default();
        session.logout(&mut gate, &mut sink).expect("logout");
        assert_eq!(gate.token, None);
        assert!(session.store().saved.is_none());
        assert_eq!(kept.try_recv().ok(), Some(SessionEvent::SignedOut));
        assert_eq!(session.subscribers.len(), 1);
        assert_eq!(sink.routes, vec![Route::Login]);
    }

    #[test]
    fn registration_failure_uses_default_message() {
        let mut session = AuthSession::new(Store::default());
        let mut gate = Gate::default();
        let mut sink = Sink::default();
        let registration = Registration {
            name: "Ana".to_owned(),
            surname: "Ruiz".to_owned(),
            email: "ana@example.com".to_owned(),
            password: "secret123".to_owned(),
            confirm_password: "secret123".to_owned(),
        };
        assert!(!session.register(&mut gate, &registration, &mut sink));
        assert_eq!(sink.notices, vec![Notice::error("Error al registrarse")]);
        assert!(sink.routes.is_empty());
    }
}
