// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use helpdesk_app::forms::{
    Draft, FormField, LoginField, RegistrationField, TicketField, age_on, parse_date,
};
use helpdesk_app::{
    AppState, Customer, Entity, FieldOf, FormMode, Lookup, Module, Technician, TicketRecord,
};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs},
};
use time::Date;

use crate::screens::{
    HomeScreen, ListScreen, LoginScreen, PersonScreen, RegisterScreen, Screen, TicketFocus,
    TicketScreen,
};

/// How a record shows up as a table row and in the detail pane.
pub trait Tabular: Entity {
    const COLUMNS: &'static [&'static str];

    fn cells(&self) -> Vec<String>;
    fn detail(&self, today: Date) -> Vec<(&'static str, String)>;
}

fn age_text(birth_date: &str, today: Date) -> String {
    parse_date(birth_date)
        .map(|birth| format!("{} años", age_on(birth, today)))
        .unwrap_or_else(|| "-".to_owned())
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "-".to_owned()
    } else {
        value.to_owned()
    }
}

impl Tabular for Customer {
    const COLUMNS: &'static [&'static str] = &["Cédula", "Apellido", "Nombre", "Ciudad", "Teléfono"];

    fn cells(&self) -> Vec<String> {
        let details = &self.details;
        vec![
            details.national_id.clone(),
            details.surname.clone(),
            details.name.clone(),
            details.city.clone(),
            details.phone.clone(),
        ]
    }

    fn detail(&self, today: Date) -> Vec<(&'static str, String)> {
        let details = &self.details;
        vec![
            ("Nombre", format!("{} {}", details.name, details.surname)),
            ("Cédula", or_dash(&details.national_id)),
            ("Edad", age_text(&self.to_draft().birth_date, today)),
            ("Ciudad", or_dash(&details.city)),
            ("Dirección", or_dash(&details.address)),
            ("Teléfono", or_dash(&details.phone)),
            ("Email", or_dash(&details.email)),
            ("Dependencia", or_dash(&details.department)),
        ]
    }
}

impl Tabular for Technician {
    const COLUMNS: &'static [&'static str] = &["Cédula", "Apellido", "Nombre", "Género", "Teléfono"];

    fn cells(&self) -> Vec<String> {
        let details = &self.details;
        vec![
            details.national_id.clone(),
            details.surname.clone(),
            details.name.clone(),
            details.gender.clone(),
            details.phone.clone(),
        ]
    }

    fn detail(&self, today: Date) -> Vec<(&'static str, String)> {
        let details = &self.details;
        vec![
            ("Nombre", format!("{} {}", details.name, details.surname)),
            ("Cédula", or_dash(&details.national_id)),
            ("Edad", age_text(&self.to_draft().birth_date, today)),
            ("Género", or_dash(&details.gender)),
            ("Ciudad", or_dash(&details.city)),
            ("Dirección", or_dash(&details.address)),
            ("Teléfono", or_dash(&details.phone)),
            ("Email", or_dash(&details.email)),
        ]
    }
}

impl Tabular for TicketRecord {
    const COLUMNS: &'static [&'static str] = &["Código", "Descripción", "Cliente", "Técnico"];

    fn cells(&self) -> Vec<String> {
        let customer = self.customer.as_ref().map(|linked| match linked.customer() {
            Some(customer) => customer.details.surname.clone(),
            None => linked.id().to_string(),
        });
        let technician = self.technician.as_ref().map(|linked| match linked.technician() {
            Some(technician) => technician.details.surname.clone(),
            None => linked.id().to_string(),
        });
        vec![
            self.code.clone(),
            self.description.clone(),
            customer.unwrap_or_else(|| "-".to_owned()),
            technician.unwrap_or_else(|| "-".to_owned()),
        ]
    }

    fn detail(&self, _today: Date) -> Vec<(&'static str, String)> {
        let customer = self.customer.as_ref().map(|linked| match linked.customer() {
            Some(customer) => customer.summary(),
            None => linked.id().to_string(),
        });
        let technician = self.technician.as_ref().map(|linked| match linked.technician() {
            Some(technician) => technician.summary(),
            None => linked.id().to_string(),
        });
        vec![
            ("Código", or_dash(&self.code)),
            ("Descripción", or_dash(&self.description)),
            ("Cliente", customer.unwrap_or_else(|| "-".to_owned())),
            ("Técnico", technician.unwrap_or_else(|| "-".to_owned())),
        ]
    }
}

pub(crate) fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, screen: &Screen, today: Date) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().title("helpdesk").borders(Borders::ALL));
    frame.render_widget(header, layout[0]);

    match screen {
        Screen::Login(screen) => {
            let area = centered_rect(60, 50, layout[1]);
            let body = Paragraph::new(login_text(screen))
                .block(Block::default().title("Iniciar sesión").borders(Borders::ALL));
            frame.render_widget(body, area);
        }
        Screen::Register(screen) => {
            let area = centered_rect(60, 60, layout[1]);
            let body = Paragraph::new(register_text(screen))
                .block(Block::default().title("Registro").borders(Borders::ALL));
            frame.render_widget(body, area);
        }
        _ => {
            let columns = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Length(18), Constraint::Min(1)])
                .split(layout[1]);
            let sidebar = Paragraph::new(sidebar_text(state))
                .block(Block::default().title("Menú").borders(Borders::ALL));
            frame.render_widget(sidebar, columns[0]);
            render_main(frame, columns[1], screen, today);
        }
    }

    let status = Paragraph::new(status_text(state, screen))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);
}

fn render_main(frame: &mut ratatui::Frame<'_>, area: Rect, screen: &Screen, today: Date) {
    match screen {
        Screen::Login(_) | Screen::Register(_) => {}
        Screen::Home(screen) => {
            let body = Paragraph::new(home_text(screen))
                .block(Block::default().title("Inicio").borders(Borders::ALL));
            frame.render_widget(body, area);
        }
        Screen::Customers(screen) => render_list(frame, area, screen, today),
        Screen::Technicians(screen) => render_list(frame, area, screen, today),
        Screen::Tickets(screen) => render_list(frame, area, screen, today),
        Screen::CustomerForm(screen) => render_person_form(frame, area, screen),
        Screen::TechnicianForm(screen) => render_person_form(frame, area, screen),
        Screen::TicketForm(screen) => render_ticket_form(frame, area, screen),
    }
}

fn render_list<E: Tabular>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    screen: &ListScreen<E>,
    today: Date,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);
    let search_style = if screen.searching {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let search = Paragraph::new(search_line_text(screen))
        .style(search_style)
        .block(Block::default().title("Buscar").borders(Borders::ALL));
    frame.render_widget(search, rows[0]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(64), Constraint::Percentage(36)])
        .split(rows[1]);

    let header = Row::new(E::COLUMNS.iter().map(|label| {
        Cell::from(*label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let cursor = screen.roster.cursor();
    let body = table_rows(screen)
        .into_iter()
        .enumerate()
        .map(|(index, cells)| {
            let style = if index == cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            Row::new(cells.into_iter().map(Cell::from)).style(style)
        });
    let widths = vec![Constraint::Min(8); E::COLUMNS.len()];
    let table = Table::new(body, widths).header(header).block(
        Block::default()
            .title(E::MODULE.label())
            .borders(Borders::ALL),
    );
    frame.render_widget(table, panes[0]);

    let detail = Paragraph::new(detail_text(screen, today))
        .block(Block::default().title("Detalle").borders(Borders::ALL));
    frame.render_widget(detail, panes[1]);

    if let Some(prompt) = delete_prompt_text(screen) {
        let area = centered_rect(50, 20, area);
        frame.render_widget(Clear, area);
        let dialog = Paragraph::new(prompt).block(
            Block::default()
                .title("Eliminar")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(dialog, area);
    }
}

fn render_person_form<E: Entity>(frame: &mut ratatui::Frame<'_>, area: Rect, screen: &PersonScreen<E>)
where
    E::Draft: Draft,
{
    let body = Paragraph::new(person_form_text(screen)).block(
        Block::default()
            .title(form_title(screen.form.mode(), E::MODULE))
            .borders(Borders::ALL),
    );
    frame.render_widget(body, area);
}

fn render_ticket_form(frame: &mut ratatui::Frame<'_>, area: Rect, screen: &TicketScreen) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(8), Constraint::Min(1)])
        .split(area);

    let focus = TicketFocus::ALL
        .iter()
        .position(|candidate| *candidate == screen.focus)
        .unwrap_or(0);
    let tabs = Tabs::new(vec!["Código", "Descripción", "Clientes", "Técnicos"])
        .block(
            Block::default()
                .title(form_title(screen.form.mode(), Module::Tickets))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(focus);
    frame.render_widget(tabs, rows[0]);

    let fields = Paragraph::new(ticket_form_text(screen))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(fields, rows[1]);

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    let customers = Paragraph::new(lookup_text(
        screen.form.customers(),
        screen.customer_row,
        screen.focus == TicketFocus::Customers,
    ))
    .block(Block::default().title("Clientes").borders(Borders::ALL));
    frame.render_widget(customers, panes[0]);
    let technicians = Paragraph::new(lookup_text(
        screen.form.technicians(),
        screen.technician_row,
        screen.focus == TicketFocus::Technicians,
    ))
    .block(Block::default().title("Técnicos").borders(Borders::ALL));
    frame.render_widget(technicians, panes[1]);
}

fn form_title<I>(mode: &FormMode<I>, module: Module) -> String {
    let verb = if mode.is_edit() { "Editar" } else { "Crear" };
    format!("{verb} {}", module.label())
}

pub(crate) fn header_text(state: &AppState) -> String {
    match &state.user {
        Some(user) => format!("Bienvenido {} | {}", user.name, state.route.path()),
        None => state.route.path(),
    }
}

pub(crate) fn sidebar_text(state: &AppState) -> String {
    let active = state.route.section().module();
    Module::ALL
        .iter()
        .map(|module| {
            let marker = if active == Some(*module) { ">" } else { " " };
            format!("{marker} {}", module.label())
        })
        .collect::<Vec<String>>()
        .join("\n")
}

fn field_line(focused: bool, label: &str, value: &str, error: Option<&str>) -> String {
    let marker = if focused { ">" } else { " " };
    let mut line = format!("{marker} {label}: {value}");
    if let Some(error) = error {
        line.push_str(&format!("\n    ! {error}"));
    }
    line
}

fn masked(value: &str) -> String {
    "*".repeat(value.chars().count())
}

pub(crate) fn login_text(screen: &LoginScreen) -> String {
    let mut lines: Vec<String> = LoginField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                LoginField::Password => masked(screen.value(*field)),
                LoginField::Email => screen.value(*field).to_owned(),
            };
            field_line(*field == screen.field(), field.label(), &value, None)
        })
        .collect();
    lines.push(String::new());
    lines.push("enter entrar | ctrl+r crear cuenta".to_owned());
    lines.join("\n")
}

pub(crate) fn register_text(screen: &RegisterScreen) -> String {
    let mut lines: Vec<String> = RegistrationField::ALL
        .iter()
        .map(|field| {
            let raw = screen.registration.value(*field);
            let value = match field {
                RegistrationField::Password | RegistrationField::ConfirmPassword => masked(raw),
                _ => raw.to_owned(),
            };
            field_line(*field == screen.field(), field.label(), &value, None)
        })
        .collect();
    lines.push(String::new());
    lines.push("enter registrarse | esc volver".to_owned());
    lines.join("\n")
}

pub(crate) fn home_text(screen: &HomeScreen) -> String {
    Module::ALL
        .iter()
        .enumerate()
        .map(|(index, module)| {
            let marker = if index == screen.cursor { ">" } else { " " };
            format!("{marker} {}", module.label())
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub(crate) fn search_line_text<E: Entity>(screen: &ListScreen<E>) -> String {
    let hint = match E::MODULE {
        Module::Tickets => "código",
        Module::Customers | Module::Technicians => "cédula o apellido",
    };
    let caret = if screen.searching { "_" } else { "" };
    format!("{hint}: {}{caret}", screen.roster.term())
}

pub(crate) fn table_rows<E: Tabular>(screen: &ListScreen<E>) -> Vec<Vec<String>> {
    screen.roster.rows().iter().map(Tabular::cells).collect()
}

pub(crate) fn detail_text<E: Tabular>(screen: &ListScreen<E>, today: Date) -> String {
    match screen.roster.selected() {
        Some(record) => record
            .detail(today)
            .into_iter()
            .map(|(label, value)| format!("{label}: {value}"))
            .collect::<Vec<String>>()
            .join("\n"),
        None => "enter para ver el detalle".to_owned(),
    }
}

pub(crate) fn delete_prompt_text<E: Entity>(screen: &ListScreen<E>) -> Option<String> {
    screen
        .roster
        .pending_delete()
        .map(|record| format!("¿Eliminar {}?\n\ny confirmar | n cancelar", record.summary()))
}

pub(crate) fn person_form_text<E: Entity>(screen: &PersonScreen<E>) -> String
where
    E::Draft: Draft,
{
    let focused = screen.field();
    <FieldOf<E> as FormField>::ALL
        .iter()
        .map(|field| {
            field_line(
                *field == focused,
                field.label(),
                screen.form.value(*field),
                screen.form.error(*field),
            )
        })
        .collect::<Vec<String>>()
        .join("\n")
}

pub(crate) fn ticket_form_text(screen: &TicketScreen) -> String {
    let draft = screen.form.draft();
    let errors = screen.form.errors();
    let customer = screen
        .form
        .selected_customer()
        .map(Entity::summary)
        .or_else(|| draft.customer.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "-".to_owned());
    let technician = screen
        .form
        .selected_technician()
        .map(Entity::summary)
        .or_else(|| draft.technician.as_ref().map(ToString::to_string))
        .unwrap_or_else(|| "-".to_owned());
    [
        field_line(
            screen.focus == TicketFocus::Code,
            TicketField::Code.label(),
            &draft.code,
            errors.get(TicketField::Code),
        ),
        field_line(
            screen.focus == TicketFocus::Description,
            TicketField::Description.label(),
            &draft.description,
            errors.get(TicketField::Description),
        ),
        field_line(
            false,
            TicketField::Customer.label(),
            &customer,
            errors.get(TicketField::Customer),
        ),
        field_line(
            false,
            TicketField::Technician.label(),
            &technician,
            errors.get(TicketField::Technician),
        ),
    ]
    .join("\n")
}

pub(crate) fn lookup_text<E: Entity>(lookup: &Lookup<E>, row: usize, focused: bool) -> String {
    let caret = if focused { "_" } else { "" };
    let mut lines = vec![format!("buscar: {}{caret}", lookup.term())];
    lines.extend(lookup.results().iter().enumerate().map(|(index, record)| {
        let marker = if focused && index == row { ">" } else { " " };
        format!("{marker} {}", record.summary())
    }));
    lines.join("\n")
}

fn screen_hints(screen: &Screen) -> &'static str {
    match screen {
        Screen::Login(_) => "tab campo | enter entrar | ctrl+r registro | ctrl+q",
        Screen::Register(_) => "tab campo | enter registrar | esc volver | ctrl+q",
        Screen::Home(_) => "j/k | enter abrir | f/b sección | L salir | ctrl+q",
        Screen::Customers(ListScreen { searching: true, .. })
        | Screen::Technicians(ListScreen { searching: true, .. })
        | Screen::Tickets(ListScreen { searching: true, .. }) => "enter buscar | esc cerrar",
        Screen::Customers(_) | Screen::Technicians(_) | Screen::Tickets(_) => {
            "/ buscar | r todos | j/k | enter ver | n nuevo | e editar | d eliminar | f/b | h | L"
        }
        Screen::CustomerForm(_) | Screen::TechnicianForm(_) => {
            "tab campo | ←/→ opción | ctrl+s guardar | esc volver"
        }
        Screen::TicketForm(_) => {
            "tab campo | enter buscar | ↑/↓ fila | ctrl+l elegir | ctrl+r todos | ctrl+s guardar | esc"
        }
    }
}

pub(crate) fn status_text(state: &AppState, screen: &Screen) -> String {
    let mode = if screen.is_typing() { "EDIT" } else { "NAV" };
    let hints = screen_hints(screen);
    match &state.status {
        Some(notice) => format!(
            "{mode} | {}: {} | {hints}",
            notice.severity.label(),
            notice.message
        ),
        None => format!("{mode} | {hints}"),
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
