// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use tracing::{debug, info, warn};

use crate::entity::Entity;
use crate::forms::{FieldErrors, TicketDraft, TicketField};
use crate::lookup::{Lookup, SearchOutcome};
use crate::ports::{Directory, NavigationSink, NotificationSink, RecordStore};
use crate::record_form::{FormMode, SubmitOutcome};
use crate::{Customer, FormPhase, Notice, Route, Technician, TicketId, TicketRecord};

/// Ticket editor: code and description plus one customer lookup and one
/// technician lookup whose selections become the ticket's references.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketForm {
    mode: FormMode<TicketId>,
    draft: TicketDraft,
    errors: FieldErrors<TicketField>,
    phase: FormPhase,
    customers: Lookup<Customer>,
    technicians: Lookup<Technician>,
    linked_customer: Option<Customer>,
    linked_technician: Option<Technician>,
}

impl Default for TicketForm {
    fn default() -> Self {
        Self::create()
    }
}

impl TicketForm {
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: TicketDraft::default(),
            errors: FieldErrors::new(),
            phase: FormPhase::Empty,
            customers: Lookup::new(),
            technicians: Lookup::new(),
            linked_customer: None,
            linked_technician: None,
        }
    }

    pub fn edit(record: &TicketRecord) -> Self {
        let mut form = Self::create();
        form.seed(record);
        form
    }

    /// Copies the record's fields and mirrors populated references' cédula
    /// into the lookup terms.
    pub fn seed(&mut self, record: &TicketRecord) {
        self.mode = FormMode::Edit(record.id.clone());
        self.draft = record.to_draft();
        self.errors.clear();
        self.phase = FormPhase::Editing;
        self.linked_customer = record
            .customer
            .as_ref()
            .and_then(|linked| linked.customer())
            .cloned();
        self.linked_technician = record
            .technician
            .as_ref()
            .and_then(|linked| linked.technician())
            .cloned();
        let customer_term = self
            .linked_customer
            .as_ref()
            .map(|customer| customer.search_key().to_owned())
            .unwrap_or_default();
        let technician_term = self
            .linked_technician
            .as_ref()
            .map(|technician| technician.search_key().to_owned())
            .unwrap_or_default();
        self.customers.set_term(customer_term);
        self.technicians.set_term(technician_term);
    }

    pub fn mode(&self) -> &FormMode<TicketId> {
        &self.mode
    }

    pub fn draft(&self) -> &TicketDraft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors<TicketField> {
        &self.errors
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn customers(&self) -> &Lookup<Customer> {
        &self.customers
    }

    pub fn technicians(&self) -> &Lookup<Technician> {
        &self.technicians
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.draft.code = code.into();
        self.touch(TicketField::Code);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
        self.touch(TicketField::Description);
    }

    pub fn set_customer_term(&mut self, term: impl Into<String>) {
        self.customers.set_term(term);
    }

    pub fn set_technician_term(&mut self, term: impl Into<String>) {
        self.technicians.set_term(term);
    }

    fn touch(&mut self, field: TicketField) {
        self.errors.remove(field);
        self.phase = FormPhase::Editing;
    }

    /// Initial listings for both lookups.
    pub fn load_lookups<D>(&mut self, directory: &mut D, sink: &mut impl NotificationSink)
    where
        D: Directory<Customer> + Directory<Technician>,
    {
        self.customers.load(directory, sink);
        self.technicians.load(directory, sink);
    }

    pub fn search_customers(
        &mut self,
        directory: &mut impl Directory<Customer>,
        sink: &mut impl NotificationSink,
    ) -> SearchOutcome {
        self.customers.search(directory, sink)
    }

    pub fn search_technicians(
        &mut self,
        directory: &mut impl Directory<Technician>,
        sink: &mut impl NotificationSink,
    ) -> SearchOutcome {
        self.technicians.search(directory, sink)
    }

    pub fn select_customer(&mut self, index: usize, sink: &mut impl NotificationSink) -> bool {
        let selected = self
            .customers
            .select_index(index, &mut self.draft.customer, sink);
        if selected {
            self.linked_customer = self.customers.results().get(index).cloned();
            self.touch(TicketField::Customer);
        }
        selected
    }

    pub fn select_technician(&mut self, index: usize, sink: &mut impl NotificationSink) -> bool {
        let selected = self
            .technicians
            .select_index(index, &mut self.draft.technician, sink);
        if selected {
            self.linked_technician = self.technicians.results().get(index).cloned();
            self.touch(TicketField::Technician);
        }
        selected
    }

    pub fn reset_customer(
        &mut self,
        directory: &mut impl Directory<Customer>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        self.linked_customer = None;
        self.customers
            .reset(directory, &mut self.draft.customer, sink)
    }

    pub fn reset_technician(
        &mut self,
        directory: &mut impl Directory<Technician>,
        sink: &mut impl NotificationSink,
    ) -> bool {
        self.linked_technician = None;
        self.technicians
            .reset(directory, &mut self.draft.technician, sink)
    }

    /// The linked customer as it was when selected or seeded. Later searches
    /// do not replace it; an id-only reference falls back to the results.
    pub fn selected_customer(&self) -> Option<&Customer> {
        let id = self.draft.customer.as_ref()?;
        self.linked_customer
            .as_ref()
            .filter(|customer| &customer.id == id)
            .or_else(|| self.customers.find(id))
    }

    pub fn selected_technician(&self) -> Option<&Technician> {
        let id = self.draft.technician.as_ref()?;
        self.linked_technician
            .as_ref()
            .filter(|technician| &technician.id == id)
            .or_else(|| self.technicians.find(id))
    }

    pub fn submit<S>(
        &mut self,
        store: &mut impl RecordStore<TicketRecord>,
        sink: &mut S,
    ) -> SubmitOutcome<TicketRecord>
    where
        S: NotificationSink + NavigationSink,
    {
        if let Err(errors) = self.draft.validate() {
            debug!(invalid = errors.len(), "ticket form has field errors");
            if let Some(message) = errors.first_message() {
                sink.notify(Notice::error(message));
            }
            self.errors = errors;
            self.phase = FormPhase::Editing;
            return SubmitOutcome::Invalid;
        }
        self.errors.clear();
        self.phase = FormPhase::Submitting;

        let payload = self.draft.canonical();
        let phrases = TicketRecord::PHRASES;
        let (result, saved_default, failed_default) = match &self.mode {
            FormMode::Create => (store.create(&payload), phrases.created, phrases.create_failed),
            FormMode::Edit(id) => (
                store.update(id, &payload),
                phrases.updated,
                phrases.update_failed,
            ),
        };
        match result {
            Ok(saved) => {
                info!(code = %payload.code, edit = self.mode.is_edit(), "ticket saved");
                self.phase = FormPhase::Succeeded;
                let message = saved
                    .message
                    .clone()
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| saved_default.to_owned());
                sink.notify(Notice::success(message));
                sink.navigate(Route::List(TicketRecord::MODULE));
                SubmitOutcome::Saved(saved)
            }
            Err(error) => {
                warn!(%error, "ticket save failed");
                self.phase = FormPhase::Editing;
                sink.notify(Notice::error(
                    error.user_message().unwrap_or(failed_default),
                ));
                SubmitOutcome::Failed(error)
            }
        }
    }
}
