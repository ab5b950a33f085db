// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod render;
mod screens;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use helpdesk_app::{
    AppCommand, AppEvent, AppState, AuthSession, Authenticator, Customer, Directory, Entity,
    Module, NavigationSink, Notice, NotificationSink, RecordForm, RecordStore, Route,
    SessionEvent, SessionStore, Technician, TicketForm, TicketRecord,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::mem;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use tracing::{debug, warn};

pub use render::Tabular;
pub use screens::{
    Action, HomeScreen, ListScreen, LoginScreen, PersonScreen, RegisterScreen, Screen,
    TicketFocus, TicketScreen,
};

/// Everything the console reads and writes through: the three modules'
/// directories and stores plus authentication.
pub trait Backend:
    Authenticator
    + Directory<Customer>
    + RecordStore<Customer>
    + Directory<Technician>
    + RecordStore<Technician>
    + Directory<TicketRecord>
    + RecordStore<TicketRecord>
{
}

impl<T> Backend for T where
    T: Authenticator
        + Directory<Customer>
        + RecordStore<Customer>
        + Directory<Technician>
        + RecordStore<Technician>
        + Directory<TicketRecord>
        + RecordStore<TicketRecord>
{
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// Notices and navigation requests raised while a key is handled; applied
/// once the handler returns.
#[derive(Debug, Default)]
struct Outbox {
    notices: Vec<Notice>,
    routes: Vec<Route>,
}

impl NotificationSink for Outbox {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

impl NavigationSink for Outbox {
    fn navigate(&mut self, route: Route) {
        self.routes.push(route);
    }
}

pub struct Console<B: Backend, S: SessionStore> {
    backend: B,
    session: AuthSession<S>,
    session_rx: Receiver<SessionEvent>,
    state: AppState,
    screen: Screen,
    clock: fn() -> Date,
    outbox: Outbox,
    status_token: u64,
    internal_tx: Sender<InternalEvent>,
    internal_rx: Receiver<InternalEvent>,
}

impl<B: Backend, S: SessionStore> Console<B, S> {
    /// `clock` is read on every render and form submit.
    pub fn new(backend: B, store: S, clock: fn() -> Date) -> Self {
        let mut session = AuthSession::new(store);
        let session_rx = session.subscribe();
        let (internal_tx, internal_rx) = mpsc::channel();
        Self {
            backend,
            session,
            session_rx,
            state: AppState::default(),
            screen: Screen::Login(LoginScreen::default()),
            clock,
            outbox: Outbox::default(),
            status_token: 0,
            internal_tx,
            internal_rx,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn session(&self) -> &AuthSession<S> {
        &self.session
    }

    pub fn today(&self) -> Date {
        (self.clock)()
    }

    /// Signs in from a saved session, landing on the home screen.
    pub fn restore_session(&mut self) -> Result<bool> {
        let restored = self.session.restore(&mut self.backend)?;
        self.flush();
        Ok(restored)
    }

    /// Returns true when the console should exit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if screens::ctrl(key, 'q') {
            return true;
        }
        let today = self.today();
        let action = match &mut self.screen {
            Screen::Login(screen) => screen.handle_key(key),
            Screen::Register(screen) => screen.handle_key(key),
            Screen::Home(screen) => screen.handle_key(key),
            Screen::Customers(screen) => screen.handle_key(&mut self.backend, &mut self.outbox, key),
            Screen::Technicians(screen) => {
                screen.handle_key(&mut self.backend, &mut self.outbox, key)
            }
            Screen::Tickets(screen) => screen.handle_key(&mut self.backend, &mut self.outbox, key),
            Screen::CustomerForm(screen) => {
                screen.handle_key(&mut self.backend, today, &mut self.outbox, key)
            }
            Screen::TechnicianForm(screen) => {
                screen.handle_key(&mut self.backend, today, &mut self.outbox, key)
            }
            Screen::TicketForm(screen) => {
                screen.handle_key(&mut self.backend, &mut self.outbox, key)
            }
        };
        self.apply(action);
        self.flush();
        false
    }

    pub fn process_internal_events(&mut self) {
        while let Ok(event) = self.internal_rx.try_recv() {
            match event {
                InternalEvent::ClearStatus { token } if token == self.status_token => {
                    self.state.dispatch(AppCommand::ClearStatus);
                }
                InternalEvent::ClearStatus { .. } => {}
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::None => {}
            Action::Go(route) => self.go(route),
            Action::NextSection => {
                let events = self.state.dispatch(AppCommand::NextSection);
                self.apply_events(events);
            }
            Action::PrevSection => {
                let events = self.state.dispatch(AppCommand::PrevSection);
                self.apply_events(events);
            }
            Action::Logout => {
                if let Err(error) = self.session.logout(&mut self.backend, &mut self.outbox) {
                    warn!(error = %format!("{error:#}"), "saved session not cleared");
                    self.outbox
                        .notify(Notice::warning("No se pudo borrar la sesión guardada"));
                }
            }
            Action::Login(credentials) => {
                self.session
                    .login(&mut self.backend, &credentials, &mut self.outbox);
            }
            Action::Register(registration) => {
                self.session
                    .register(&mut self.backend, &registration, &mut self.outbox);
            }
        }
    }

    /// Applies session changes first so route guards see the new user, then
    /// queued notices and navigation, until nothing is left.
    fn flush(&mut self) {
        loop {
            let mut changed = false;
            while let Ok(event) = self.session_rx.try_recv() {
                changed = true;
                let user = match event {
                    SessionEvent::SignedIn(user) => Some(user),
                    SessionEvent::SignedOut => None,
                };
                let events = self.state.dispatch(AppCommand::SessionChanged(user));
                self.apply_events(events);
            }
            let notices = mem::take(&mut self.outbox.notices);
            let routes = mem::take(&mut self.outbox.routes);
            if !changed && notices.is_empty() && routes.is_empty() {
                break;
            }
            for notice in notices {
                self.emit_status(notice);
            }
            for route in routes {
                self.go(route);
            }
        }
    }

    fn go(&mut self, route: Route) {
        let events = self.state.dispatch(AppCommand::Navigate(route));
        self.apply_events(events);
    }

    fn apply_events(&mut self, events: Vec<AppEvent>) {
        for event in events {
            match event {
                AppEvent::RouteChanged(route) => self.open(route),
                AppEvent::Redirected { requested, to } => {
                    debug!(requested = %requested.path(), to = %to.path(), "route redirected");
                }
                AppEvent::UserChanged(_) | AppEvent::StatusUpdated(_) | AppEvent::StatusCleared => {}
            }
        }
    }

    fn open(&mut self, route: Route) {
        debug!(path = %route.path(), "opening screen");
        let screen = match route {
            Route::Login => Screen::Login(LoginScreen::default()),
            Route::Register => Screen::Register(RegisterScreen::default()),
            Route::Home => Screen::Home(HomeScreen::default()),
            Route::List(Module::Customers) => Screen::Customers(self.open_list()),
            Route::List(Module::Technicians) => Screen::Technicians(self.open_list()),
            Route::List(Module::Tickets) => Screen::Tickets(self.open_list()),
            Route::Create(Module::Customers) => {
                Screen::CustomerForm(PersonScreen::new(RecordForm::create()))
            }
            Route::Create(Module::Technicians) => {
                Screen::TechnicianForm(PersonScreen::new(RecordForm::create()))
            }
            Route::Create(Module::Tickets) => {
                let mut form = TicketForm::create();
                form.load_lookups(&mut self.backend, &mut self.outbox);
                Screen::TicketForm(TicketScreen::new(form))
            }
            Route::Edit(Module::Customers, id) => match self.fetch::<Customer>(id) {
                Some(record) => Screen::CustomerForm(PersonScreen::new(RecordForm::edit(&record))),
                None => return,
            },
            Route::Edit(Module::Technicians, id) => match self.fetch::<Technician>(id) {
                Some(record) => {
                    Screen::TechnicianForm(PersonScreen::new(RecordForm::edit(&record)))
                }
                None => return,
            },
            Route::Edit(Module::Tickets, id) => match self.fetch::<TicketRecord>(id) {
                Some(record) => {
                    let mut form = TicketForm::edit(&record);
                    form.load_lookups(&mut self.backend, &mut self.outbox);
                    Screen::TicketForm(TicketScreen::new(form))
                }
                None => return,
            },
        };
        self.screen = screen;
    }

    fn open_list<E: Entity>(&mut self) -> ListScreen<E>
    where
        B: Directory<E>,
    {
        let mut screen = ListScreen::default();
        screen.roster.load(&mut self.backend, &mut self.outbox);
        screen
    }

    /// Loads the record an edit route names. When it cannot be loaded the
    /// console falls back to the module's listing.
    fn fetch<E: Entity>(&mut self, id: String) -> Option<E>
    where
        B: Directory<E>,
        E::Id: From<String>,
    {
        let id = E::Id::from(id);
        let failure = match self.backend.fetch(&id) {
            Ok(Some(record)) => return Some(record),
            Ok(None) => E::PHRASES.missing,
            Err(error) => {
                warn!(module = E::MODULE.slug(), %id, %error, "record load failed");
                E::PHRASES.load_failed
            }
        };
        self.outbox.notify(Notice::error(failure));
        self.outbox.navigate(Route::List(E::MODULE));
        None
    }

    fn emit_status(&mut self, notice: Notice) {
        self.state.dispatch(AppCommand::SetStatus(notice));
        self.status_token = self.status_token.saturating_add(1);
        schedule_status_clear(&self.internal_tx, self.status_token);
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

/// One poll of the terminal; `None` when no key arrived.
fn next_key(
    poll: impl FnOnce() -> io::Result<bool>,
    read: impl FnOnce() -> io::Result<Event>,
) -> Result<Option<KeyEvent>> {
    if !poll().context("poll event")? {
        return Ok(None);
    }
    match read().context("read event")? {
        Event::Key(key) => Ok(Some(key)),
        _ => Ok(None),
    }
}

pub fn run_app<B: Backend, S: SessionStore>(console: &mut Console<B, S>) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    if let Err(error) = console.restore_session() {
        warn!(error = %format!("{error:#}"), "saved session not restored");
        console.emit_status(Notice::warning("No se pudo restaurar la sesión"));
    }

    let mut result = Ok(());
    loop {
        console.process_internal_events();

        let today = console.today();
        if let Err(error) =
            terminal.draw(|frame| render::render(frame, &console.state, &console.screen, today))
        {
            result = Err(error).context("draw frame");
            break;
        }

        match next_key(|| event::poll(Duration::from_millis(120)), event::read) {
            Ok(Some(key)) => {
                if console.handle_key(key) {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}
