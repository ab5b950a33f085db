// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{info, warn};

use crate::Notice;
use crate::entity::Entity;
use crate::lookup::{Lookup, SearchOutcome};
use crate::ports::{Directory, NotificationSink, RecordStore};

/// List-screen controller: a lookup with a row cursor, a detail selection,
/// and a delete that must be confirmed.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster<E: Entity> {
    lookup: Lookup<E>,
    cursor: usize,
    selected: Option<E::Id>,
    pending_delete: Option<E::Id>,
}

impl<E: Entity> Default for Roster<E> {
    fn default() -> Self {
        Self {
            lookup: Lookup::new(),
            cursor: 0,
            selected: None,
            pending_delete: None,
        }
    }
}

impl<E: Entity> Roster<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        self.lookup.term()
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.lookup.set_term(term);
    }

    pub fn rows(&self) -> &[E] {
        self.lookup.results()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn load(
        &mut self,
        directory: &mut impl Directory<E>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        let loaded = self.lookup.load(directory, sink);
        self.clamp_cursor();
        loaded
    }

    pub fn search(
        &mut self,
        directory: &mut impl Directory<E>,
        sink: &mut impl NotificationSink,
    ) -> SearchOutcome {
        let outcome = self.lookup.search(directory, sink);
        if matches!(outcome, SearchOutcome::Found(_) | SearchOutcome::NotFound) {
            self.cursor = 0;
        }
        outcome
    }

    pub fn reset(
        &mut self,
        directory: &mut impl Directory<E>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        let loaded = self.lookup.reset(directory, &mut self.selected, sink);
        self.cursor = 0;
        loaded
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn clamp_cursor(&mut self) {
        let len = self.rows().len();
        self.cursor = self.cursor.min(len.saturating_sub(1));
    }

    pub fn current(&self) -> Option<&E> {
        self.rows().get(self.cursor)
    }

    /// Shows the row under the cursor in the detail pane.
    /// The search term stays as typed.
    pub fn select_current(&mut self, sink: &mut impl NotificationSink) -> bool {
        let Some(id) = self.current().map(|record| record.id().clone()) else {
            return false;
        };
        self.selected = Some(id);
        sink.notify(Notice::info(E::PHRASES.selected));
        true
    }

    pub fn selected(&self) -> Option<&E> {
        self.selected.as_ref().and_then(|id| self.lookup.find(id))
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Marks the row under the cursor for deletion.
    pub fn request_delete(&mut self) -> Option<&E> {
        let id = self.current()?.id().clone();
        self.pending_delete = Some(id);
        self.current()
    }

    pub fn pending_delete(&self) -> Option<&E> {
        self.pending_delete
            .as_ref()
            .and_then(|id| self.lookup.find(id))
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete<D>(&mut self, backend: &mut D, sink: &mut impl NotificationSink) -> bool
    where
        D: RecordStore<E> + Directory<E>,
    {
        let Some(id) = self.pending_delete.take() else {
            return false;
        };
        match backend.delete(&id) {
            Ok(message) => {
                info!(module = E::MODULE.slug(), id = %id, "record deleted");
                let message = message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| E::PHRASES.deleted.to_owned());
                sink.notify(Notice::success(message));
                if self.selected.as_ref() == Some(&id) {
                    self.selected = None;
                }
                self.load(backend, sink);
                true
            }
            Err(error) => {
                warn!(module = E::MODULE.slug(), id = %id, %error, "delete failed");
                sink.notify(Notice::error(
                    error.user_message().unwrap_or(E::PHRASES.delete_failed),
                ));
                false
            }
        }
    }
}
