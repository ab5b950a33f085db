// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Module, Notice, Route, User};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub route: Route,
    pub user: Option<User>,
    pub status: Option<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            route: Route::Login,
            user: None,
            status: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Navigate(Route),
    NextSection,
    PrevSection,
    SessionChanged(Option<User>),
    SetStatus(Notice),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    RouteChanged(Route),
    Redirected { requested: Route, to: Route },
    UserChanged(Option<User>),
    StatusUpdated(Notice),
    StatusCleared,
}

impl AppState {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::Navigate(route) => self.navigate(route),
            AppCommand::NextSection => self.rotate_section(1),
            AppCommand::PrevSection => self.rotate_section(-1),
            AppCommand::SessionChanged(user) => {
                self.user = user;
                let mut events = vec![AppEvent::UserChanged(self.user.clone())];
                let current = self.route.clone();
                let guarded = self.guard(&current);
                if guarded != current {
                    self.route = guarded.clone();
                    events.push(AppEvent::RouteChanged(guarded));
                }
                events
            }
            AppCommand::SetStatus(notice) => {
                self.status = Some(notice.clone());
                vec![AppEvent::StatusUpdated(notice)]
            }
            AppCommand::ClearStatus => {
                self.status = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    /// Where `route` actually lands given the current session.
    pub fn guard(&self, route: &Route) -> Route {
        match (route.requires_session(), self.is_signed_in()) {
            (true, false) => Route::Login,
            (false, true) => Route::Home,
            _ => route.clone(),
        }
    }

    fn navigate(&mut self, requested: Route) -> Vec<AppEvent> {
        let to = self.guard(&requested);
        self.route = to.clone();
        if to == requested {
            vec![AppEvent::RouteChanged(to)]
        } else {
            vec![
                AppEvent::Redirected {
                    requested,
                    to: to.clone(),
                },
                AppEvent::RouteChanged(to),
            ]
        }
    }

    fn rotate_section(&mut self, delta: isize) -> Vec<AppEvent> {
        let modules = Module::ALL;
        let len = modules.len() as isize;
        let next = match self.route.section().module() {
            Some(module) => {
                let current = modules
                    .iter()
                    .position(|candidate| *candidate == module)
                    .unwrap_or(0) as isize;
                (current + delta).rem_euclid(len)
            }
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.navigate(Route::List(modules[next as usize]))
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::{Module, NavSection, Notice, Route, User, UserId};

    fn ana() -> User {
        User {
            id: UserId::new("u1"),
            name: "Ana".to_owned(),
            surname: "Ruiz".to_owned(),
            email: "ana@example.com".to_owned(),
        }
    }

    fn signed_in() -> AppState {
        AppState {
            route: Route::Home,
            user: Some(ana()),
            status: None,
        }
    }

    #[test]
    fn protected_routes_redirect_to_login_when_signed_out() {
        let mut state = AppState::default();
        let events = state.dispatch(AppCommand::Navigate(Route::List(Module::Tickets)));
        assert_eq!(state.route, Route::Login);
        assert_eq!(
            events,
            vec![
                AppEvent::Redirected {
                    requested: Route::List(Module::Tickets),
                    to: Route::Login,
                },
                AppEvent::RouteChanged(Route::Login),
            ],
        );
    }

    #[test]
    fn auth_screens_redirect_home_when_signed_in() {
        let mut state = signed_in();
        state.dispatch(AppCommand::Navigate(Route::Register));
        assert_eq!(state.route, Route::Home);
    }

    #[test]
    fn section_rotation_wraps_and_lands_on_lists() {
        let mut state = signed_in();
        state.dispatch(AppCommand::NextSection);
        assert_eq!(state.route, Route::List(Module::Customers));

        state.route = Route::Edit(Module::Tickets, "t1".to_owned());
        let events = state.dispatch(AppCommand::NextSection);
        assert_eq!(state.route, Route::List(Module::Customers));
        assert_eq!(events, vec![AppEvent::RouteChanged(Route::List(Module::Customers))]);

        state.dispatch(AppCommand::PrevSection);
        assert_eq!(state.route.section(), NavSection::Tickets);
    }

    #[test]
    fn signing_out_leaves_protected_route() {
        let mut state = signed_in();
        state.route = Route::List(Module::Technicians);
        let events = state.dispatch(AppCommand::SessionChanged(None));
        assert_eq!(state.route, Route::Login);
        assert_eq!(
            events,
            vec![
                AppEvent::UserChanged(None),
                AppEvent::RouteChanged(Route::Login),
            ],
        );
    }

    #[test]
    fn signing_in_from_login_moves_home() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SessionChanged(Some(ana())));
        assert_eq!(state.route, Route::Home);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = signed_in();
        let notice = Notice::info("Cliente seleccionado");
        let events = state.dispatch(AppCommand::SetStatus(notice.clone()));
        assert_eq!(state.status, Some(notice.clone()));
        assert_eq!(events, vec![AppEvent::StatusUpdated(notice)]);
        state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status, None);
    }
}
