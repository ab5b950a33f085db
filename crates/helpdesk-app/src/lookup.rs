// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, warn};

use crate::Notice;
use crate::entity::Entity;
use crate::ports::{Directory, NotificationSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    EmptyTerm,
    Found(usize),
    NotFound,
    Failed,
}

/// Search term plus the records it matched, for one referenced record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup<E: Entity> {
    term: String,
    results: Vec<E>,
}

impl<E: Entity> Default for Lookup<E> {
    fn default() -> Self {
        Self {
            term: String::new(),
            results: Vec::new(),
        }
    }
}

impl<E: Entity> Lookup<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn set_term(&mut self, term: impl Into<String>) {
        self.term = term.into();
    }

    pub fn results(&self) -> &[E] {
        &self.results
    }

    pub fn find(&self, id: &E::Id) -> Option<&E> {
        self.results.iter().find(|entity| entity.id() == id)
    }

    /// Replaces the results with the full listing.
    pub fn load(
        &mut self,
        directory: &mut impl Directory<E>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        match directory.list_all() {
            Ok(records) => {
                debug!(module = E::MODULE.slug(), count = records.len(), "listing loaded");
                self.results = records;
                true
            }
            Err(error) => {
                warn!(module = E::MODULE.slug(), %error, "listing failed");
                sink.notify(Notice::error(
                    error.user_message().unwrap_or(E::PHRASES.list_failed),
                ));
                false
            }
        }
    }

    pub fn search(
        &mut self,
        directory: &mut impl Directory<E>,
        sink: &mut impl NotificationSink,
    ) -> SearchOutcome {
        let term = self.term.trim();
        if term.is_empty() {
            sink.notify(Notice::warning(E::PHRASES.empty_term));
            return SearchOutcome::EmptyTerm;
        }
        let field = E::search_field(term);
        match directory.find_by(field, term) {
            Ok(records) if records.is_empty() => {
                self.results.clear();
                sink.notify(Notice::warning(E::PHRASES.not_found));
                SearchOutcome::NotFound
            }
            Ok(records) => {
                let count = records.len();
                self.results = records;
                let message = if count == 1 {
                    E::PHRASES.found_one
                } else {
                    E::PHRASES.found_many
                };
                sink.notify(Notice::success(message));
                SearchOutcome::Found(count)
            }
            Err(error) => {
                warn!(module = E::MODULE.slug(), field = field.key(), %error, "search failed");
                sink.notify(Notice::error(E::PHRASES.search_failed));
                SearchOutcome::Failed
            }
        }
    }

    /// Clears the term and the committed selection, then relists.
    pub fn reset(
        &mut self,
        directory: &mut impl Directory<E>,
        selection: &mut Option<E::Id>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        self.term.clear();
        *selection = None;
        self.load(directory, sink)
    }

    pub fn select(
        &mut self,
        entity: &E,
        selection: &mut Option<E::Id>,
        sink: &mut impl NotificationSink,
    ) {
        *selection = Some(entity.id().clone());
        self.term = entity.search_key().to_owned();
        sink.notify(Notice::info(entity.selected_notice()));
    }

    /// Selects the result at `index`; false when out of range.
    pub fn select_index(
        &mut self,
        index: usize,
        selection: &mut Option<E::Id>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        let Some(entity) = self.results.get(index).cloned() else {
            return false;
        };
        self.select(&entity, selection, sink);
        true
    }
}
