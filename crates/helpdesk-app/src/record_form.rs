// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use time::Date;
use tracing::{debug, info, warn};

use crate::entity::Entity;
use crate::forms::{Draft, FieldErrors};
use crate::ports::{ApiError, NavigationSink, NotificationSink, RecordStore, Saved};
use crate::{FormPhase, Notice, Route};

pub type FieldOf<E> = <<E as Entity>::Draft as Draft>::Field;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<I> {
    Create,
    Edit(I),
}

impl<I> FormMode<I> {
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<E> {
    Invalid,
    Saved(Saved<E>),
    Failed(ApiError),
}

/// Create/edit controller for a person record.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordForm<E: Entity>
where
    E::Draft: Draft,
{
    mode: FormMode<E::Id>,
    draft: E::Draft,
    errors: FieldErrors<FieldOf<E>>,
    phase: FormPhase,
}

impl<E: Entity> Default for RecordForm<E>
where
    E::Draft: Draft,
{
    fn default() -> Self {
        Self::create()
    }
}

impl<E: Entity> RecordForm<E>
where
    E::Draft: Draft,
{
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: E::Draft::default(),
            errors: FieldErrors::new(),
            phase: FormPhase::Empty,
        }
    }

    /// Edit form seeded from a stored record.
    pub fn edit(record: &E) -> Self {
        let mut form = Self::create();
        form.seed(record);
        form
    }

    pub fn seed(&mut self, record: &E) {
        self.mode = FormMode::Edit(record.id().clone());
        self.draft = record.to_draft();
        self.errors.clear();
        self.phase = FormPhase::Editing;
    }

    pub fn mode(&self) -> &FormMode<E::Id> {
        &self.mode
    }

    pub fn draft(&self) -> &E::Draft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors<FieldOf<E>> {
        &self.errors
    }

    pub fn error(&self, field: FieldOf<E>) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn value(&self, field: FieldOf<E>) -> &str {
        self.draft.value(field)
    }

    /// Stores the typed value and drops that field's error until the next
    /// submit.
    pub fn set_field(&mut self, field: FieldOf<E>, raw: &str) {
        self.draft.set_value(field, raw);
        self.errors.remove(field);
        self.phase = FormPhase::Editing;
    }

    pub fn submit_with<S, F>(&mut self, today: Date, on_submit: F, sink: &mut S) -> SubmitOutcome<E>
    where
        S: NotificationSink + NavigationSink,
        F: FnOnce(&E::Draft) -> Result<Saved<E>, ApiError>,
    {
        if let Err(errors) = self.draft.validate(today) {
            debug!(
                module = E::MODULE.slug(),
                invalid = errors.len(),
                "form has field errors"
            );
            self.errors = errors;
            self.phase = FormPhase::Editing;
            return SubmitOutcome::Invalid;
        }
        self.errors.clear();
        self.phase = FormPhase::Submitting;

        let (saved_default, failed_default) = if self.mode.is_edit() {
            (E::PHRASES.updated, E::PHRASES.update_failed)
        } else {
            (E::PHRASES.created, E::PHRASES.create_failed)
        };
        match on_submit(&self.draft) {
            Ok(saved) => {
                info!(module = E::MODULE.slug(), edit = self.mode.is_edit(), "record saved");
                self.phase = FormPhase::Succeeded;
                let message = saved
                    .message
                    .clone()
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| saved_default.to_owned());
                sink.notify(Notice::success(message));
                sink.navigate(Route::List(E::MODULE));
                SubmitOutcome::Saved(saved)
            }
            Err(error) => {
                warn!(module = E::MODULE.slug(), %error, "save failed");
                self.phase = FormPhase::Editing;
                sink.notify(Notice::error(
                    error.user_message().unwrap_or(failed_default),
                ));
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Creates or updates through `store` depending on the form's mode.
    pub fn submit<S>(
        &mut self,
        today: Date,
        store: &mut impl RecordStore<E>,
        sink: &mut S,
    ) -> SubmitOutcome<E>
    where
        S: NotificationSink + NavigationSink,
    {
        let mode = self.mode.clone();
        self.submit_with(
            today,
            |draft| match &mode {
                FormMode::Create => store.create(draft),
                FormMode::Edit(id) => store.update(id, draft),
            },
            sink,
        )
    }
}
