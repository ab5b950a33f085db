// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use helpdesk_app::forms::{
    Credentials, Draft, FormField, LoginField, Registration, RegistrationField,
};
use helpdesk_app::{
    Customer, Directory, Entity, FieldOf, Lookup, Module, NavigationSink, NotificationSink,
    RecordForm, RecordStore, Roster, Route, Technician, TicketForm, TicketRecord,
};
use time::Date;

/// What the console does after a screen handled a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Go(Route),
    NextSection,
    PrevSection,
    Logout,
    Login(Credentials),
    Register(Registration),
}

pub enum Screen {
    Login(LoginScreen),
    Register(RegisterScreen),
    Home(HomeScreen),
    Customers(ListScreen<Customer>),
    Technicians(ListScreen<Technician>),
    Tickets(ListScreen<TicketRecord>),
    CustomerForm(PersonScreen<Customer>),
    TechnicianForm(PersonScreen<Technician>),
    TicketForm(TicketScreen),
}

impl Screen {
    /// Screens where plain letters are typed into an input.
    pub fn is_typing(&self) -> bool {
        match self {
            Self::Login(_)
            | Self::Register(_)
            | Self::CustomerForm(_)
            | Self::TechnicianForm(_)
            | Self::TicketForm(_) => true,
            Self::Customers(screen) => screen.searching,
            Self::Technicians(screen) => screen.searching,
            Self::Tickets(screen) => screen.searching,
            Self::Home(_) => false,
        }
    }
}

pub(crate) fn ctrl(key: KeyEvent, ch: char) -> bool {
    key.code == KeyCode::Char(ch) && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn edit_text(value: &mut String, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            value.push(ch);
            true
        }
        KeyCode::Backspace => value.pop().is_some(),
        _ => false,
    }
}

fn step_focus(focus: usize, len: usize, key: KeyEvent) -> Option<usize> {
    if len == 0 {
        return None;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => Some((focus + 1) % len),
        KeyCode::BackTab | KeyCode::Up => Some((focus + len - 1) % len),
        _ => None,
    }
}

fn nav_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('f') => Action::NextSection,
        KeyCode::Char('b') => Action::PrevSection,
        KeyCode::Char('h') => Action::Go(Route::Home),
        KeyCode::Char('L') => Action::Logout,
        _ => Action::None,
    }
}

#[derive(Debug, Default)]
pub struct LoginScreen {
    pub credentials: Credentials,
    pub focus: usize,
}

impl LoginScreen {
    pub fn field(&self) -> LoginField {
        LoginField::ALL[self.focus.min(LoginField::ALL.len() - 1)]
    }

    pub fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::Email => &self.credentials.email,
            LoginField::Password => &self.credentials.password,
        }
    }

    fn value_mut(&mut self, field: LoginField) -> &mut String {
        match field {
            LoginField::Email => &mut self.credentials.email,
            LoginField::Password => &mut self.credentials.password,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        if ctrl(key, 'r') {
            return Action::Go(Route::Register);
        }
        if key.code == KeyCode::Enter {
            return Action::Login(self.credentials.clone());
        }
        if let Some(focus) = step_focus(self.focus, LoginField::ALL.len(), key) {
            self.focus = focus;
            return Action::None;
        }
        let field = self.field();
        edit_text(self.value_mut(field), key);
        Action::None
    }
}

#[derive(Debug, Default)]
pub struct RegisterScreen {
    pub registration: Registration,
    pub focus: usize,
}

impl RegisterScreen {
    pub fn field(&self) -> RegistrationField {
        RegistrationField::ALL[self.focus.min(RegistrationField::ALL.len() - 1)]
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Esc => return Action::Go(Route::Login),
            KeyCode::Enter => return Action::Register(self.registration.clone()),
            _ => {}
        }
        if let Some(focus) = step_focus(self.focus, RegistrationField::ALL.len(), key) {
            self.focus = focus;
            return Action::None;
        }
        let field = self.field();
        edit_text(self.registration.value_mut(field), key);
        Action::None
    }
}

#[derive(Debug, Default)]
pub struct HomeScreen {
    pub cursor: usize,
}

impl HomeScreen {
    pub fn handle_key(&mut self, key: KeyEvent) -> Action {
        let len = Module::ALL.len();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.cursor = (self.cursor + 1).min(len - 1);
                Action::None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.cursor = self.cursor.saturating_sub(1);
                Action::None
            }
            KeyCode::Enter => Action::Go(Route::List(Module::ALL[self.cursor.min(len - 1)])),
            _ => nav_key(key),
        }
    }
}

/// A module listing: search line, table, detail pane and delete prompt.
pub struct ListScreen<E: Entity> {
    pub roster: Roster<E>,
    pub searching: bool,
}

impl<E: Entity> Default for ListScreen<E> {
    fn default() -> Self {
        Self {
            roster: Roster::new(),
            searching: false,
        }
    }
}

impl<E: Entity> ListScreen<E> {
    pub fn handle_key<B>(
        &mut self,
        backend: &mut B,
        sink: &mut impl NotificationSink,
        key: KeyEvent,
    ) -> Action
    where
        B: Directory<E> + RecordStore<E>,
    {
        if self.roster.pending_delete().is_some() {
            match key.code {
                KeyCode::Char('y') => {
                    self.roster.confirm_delete(backend, sink);
                }
                KeyCode::Char('n') | KeyCode::Esc => self.roster.cancel_delete(),
                _ => {}
            }
            return Action::None;
        }

        if self.searching {
            match key.code {
                KeyCode::Enter => {
                    self.searching = false;
                    self.roster.search(backend, sink);
                }
                KeyCode::Esc => self.searching = false,
                _ => {
                    let mut term = self.roster.term().to_owned();
                    if edit_text(&mut term, key) {
                        self.roster.set_term(term);
                    }
                }
            }
            return Action::None;
        }

        match key.code {
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('j') | KeyCode::Down => self.roster.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => self.roster.move_cursor(-1),
            KeyCode::Enter => {
                self.roster.select_current(sink);
            }
            KeyCode::Esc => self.roster.clear_selection(),
            KeyCode::Char('r') => {
                self.roster.reset(backend, sink);
            }
            KeyCode::Char('n') => return Action::Go(Route::Create(E::MODULE)),
            KeyCode::Char('e') => {
                if let Some(record) = self.roster.current() {
                    return Action::Go(Route::Edit(E::MODULE, record.id().to_string()));
                }
            }
            KeyCode::Char('d') => {
                self.roster.request_delete();
            }
            _ => return nav_key(key),
        }
        Action::None
    }
}

/// Customer or technician form with one focused field.
pub struct PersonScreen<E: Entity>
where
    E::Draft: Draft,
{
    pub form: RecordForm<E>,
    pub focus: usize,
}

impl<E: Entity> PersonScreen<E>
where
    E::Draft: Draft,
{
    pub fn new(form: RecordForm<E>) -> Self {
        Self { form, focus: 0 }
    }

    pub fn field(&self) -> FieldOf<E> {
        let fields = <FieldOf<E> as FormField>::ALL;
        fields[self.focus.min(fields.len() - 1)]
    }

    pub fn handle_key<S>(
        &mut self,
        store: &mut impl RecordStore<E>,
        today: Date,
        sink: &mut S,
        key: KeyEvent,
    ) -> Action
    where
        S: NotificationSink + NavigationSink,
    {
        if ctrl(key, 's') {
            self.form.submit(today, store, sink);
            return Action::None;
        }
        if key.code == KeyCode::Esc {
            return Action::Go(Route::List(E::MODULE));
        }
        let fields = <FieldOf<E> as FormField>::ALL;
        if let Some(focus) = step_focus(self.focus, fields.len(), key) {
            self.focus = focus;
            return Action::None;
        }

        let field = self.field();
        let delta = match key.code {
            KeyCode::Left => Some(-1),
            KeyCode::Right => Some(1),
            _ => None,
        };
        if let Some(delta) = delta {
            if let Some(next) = field.cycle(self.form.value(field), delta) {
                self.form.set_field(field, next);
            }
            return Action::None;
        }

        let mut value = self.form.value(field).to_owned();
        if edit_text(&mut value, key) {
            self.form.set_field(field, &value);
        }
        Action::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketFocus {
    Code,
    Description,
    Customers,
    Technicians,
}

impl TicketFocus {
    pub const ALL: [Self; 4] = [
        Self::Code,
        Self::Description,
        Self::Customers,
        Self::Technicians,
    ];
}

/// Ticket form plus a highlighted row in each lookup pane.
pub struct TicketScreen {
    pub form: TicketForm,
    pub focus: TicketFocus,
    pub customer_row: usize,
    pub technician_row: usize,
}

impl TicketScreen {
    pub fn new(form: TicketForm) -> Self {
        Self {
            form,
            focus: TicketFocus::Code,
            customer_row: 0,
            technician_row: 0,
        }
    }

    pub fn handle_key<B, S>(&mut self, backend: &mut B, sink: &mut S, key: KeyEvent) -> Action
    where
        B: Directory<Customer> + Directory<Technician> + RecordStore<TicketRecord>,
        S: NotificationSink + NavigationSink,
    {
        if ctrl(key, 's') {
            self.form.submit(backend, sink);
            return Action::None;
        }
        if key.code == KeyCode::Esc {
            return Action::Go(Route::List(Module::Tickets));
        }
        match key.code {
            KeyCode::Tab => {
                self.focus = cycle_focus(self.focus, 1);
                return Action::None;
            }
            KeyCode::BackTab => {
                self.focus = cycle_focus(self.focus, -1);
                return Action::None;
            }
            _ => {}
        }

        match self.focus {
            TicketFocus::Code => {
                let mut code = self.form.draft().code.clone();
                if edit_text(&mut code, key) {
                    self.form.set_code(code);
                }
            }
            TicketFocus::Description => {
                let mut description = self.form.draft().description.clone();
                if edit_text(&mut description, key) {
                    self.form.set_description(description);
                }
            }
            TicketFocus::Customers => {
                if ctrl(key, 'l') {
                    self.form.select_customer(self.customer_row, sink);
                } else if ctrl(key, 'r') {
                    self.form.reset_customer(backend, sink);
                    self.customer_row = 0;
                } else {
                    match key.code {
                        KeyCode::Enter => {
                            self.form.search_customers(backend, sink);
                            self.customer_row = 0;
                        }
                        KeyCode::Up | KeyCode::Down => {
                            self.customer_row =
                                move_row(self.customer_row, self.form.customers(), key.code);
                        }
                        _ => {
                            let mut term = self.form.customers().term().to_owned();
                            if edit_text(&mut term, key) {
                                self.form.set_customer_term(term);
                            }
                        }
                    }
                }
            }
            TicketFocus::Technicians => {
                if ctrl(key, 'l') {
                    self.form.select_technician(self.technician_row, sink);
                } else if ctrl(key, 'r') {
                    self.form.reset_technician(backend, sink);
                    self.technician_row = 0;
                } else {
                    match key.code {
                        KeyCode::Enter => {
                            self.form.search_technicians(backend, sink);
                            self.technician_row = 0;
                        }
                        KeyCode::Up | KeyCode::Down => {
                            self.technician_row =
                                move_row(self.technician_row, self.form.technicians(), key.code);
                        }
                        _ => {
                            let mut term = self.form.technicians().term().to_owned();
                            if edit_text(&mut term, key) {
                                self.form.set_technician_term(term);
                            }
                        }
                    }
                }
            }
        }
        Action::None
    }
}

fn cycle_focus(focus: TicketFocus, delta: isize) -> TicketFocus {
    let len = TicketFocus::ALL.len() as isize;
    let current = TicketFocus::ALL
        .iter()
        .position(|candidate| *candidate == focus)
        .unwrap_or(0) as isize;
    TicketFocus::ALL[(current + delta).rem_euclid(len) as usize]
}

fn move_row<E: Entity>(row: usize, lookup: &Lookup<E>, code: KeyCode) -> usize {
    let last = lookup.results().len().saturating_sub(1);
    match code {
        KeyCode::Down => (row + 1).min(last),
        KeyCode::Up => row.saturating_sub(1),
        _ => row,
    }
}

#[cfg(test)]
mod tests {
    use super::{Action, HomeScreen, LoginScreen, TicketFocus, cycle_focus, edit_text};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use helpdesk_app::{Module, Route};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn edit_text_ignores_control_chords() {
        let mut value = "ab".to_owned();
        assert!(edit_text(&mut value, key(KeyCode::Char('c'))));
        assert!(!edit_text(
            &mut value,
            KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL)
        ));
        assert!(edit_text(&mut value, key(KeyCode::Backspace)));
        assert_eq!(value, "ab");
    }

    #[test]
    fn login_typing_follows_focus() {
        let mut screen = LoginScreen::default();
        for ch in "ana@x.io".chars() {
            screen.handle_key(key(KeyCode::Char(ch)));
        }
        screen.handle_key(key(KeyCode::Tab));
        screen.handle_key(key(KeyCode::Char('q')));
        assert_eq!(screen.credentials.email, "ana@x.io");
        assert_eq!(screen.credentials.password, "q");
        assert!(matches!(
            screen.handle_key(key(KeyCode::Enter)),
            Action::Login(credentials) if credentials.password == "q"
        ));
    }

    #[test]
    fn home_cursor_clamps_and_opens_module() {
        let mut screen = HomeScreen::default();
        for _ in 0..5 {
            screen.handle_key(key(KeyCode::Down));
        }
        assert_eq!(
            screen.handle_key(key(KeyCode::Enter)),
            Action::Go(Route::List(Module::Tickets))
        );
        assert_eq!(screen.handle_key(key(KeyCode::Char('L'))), Action::Logout);
    }

    #[test]
    fn ticket_focus_wraps() {
        assert_eq!(cycle_focus(TicketFocus::Technicians, 1), TicketFocus::Code);
        assert_eq!(cycle_focus(TicketFocus::Code, -1), TicketFocus::Technicians);
    }
}
