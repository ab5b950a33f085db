// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::fmt;

use crate::forms::{CustomerDraft, TechnicianDraft, TicketDraft, normalize_date_text};
use crate::{Customer, CustomerId, Module, SearchField, Technician, TechnicianId, TicketId, TicketRecord};

/// User-facing notice texts for one kind of record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phrases {
    pub empty_term: &'static str,
    pub found_one: &'static str,
    pub found_many: &'static str,
    pub not_found: &'static str,
    pub search_failed: &'static str,
    pub list_failed: &'static str,
    pub load_failed: &'static str,
    pub missing: &'static str,
    pub selected: &'static str,
    pub created: &'static str,
    pub create_failed: &'static str,
    pub updated: &'static str,
    pub update_failed: &'static str,
    pub deleted: &'static str,
    pub delete_failed: &'static str,
}

/// A stored record the console lists, searches, links and edits.
pub trait Entity: Clone + fmt::Debug + PartialEq {
    type Id: Clone + fmt::Debug + fmt::Display + PartialEq + Eq;
    type Draft: Clone + fmt::Debug + Default + PartialEq;

    const MODULE: Module;
    const PHRASES: Phrases;

    fn id(&self) -> &Self::Id;

    /// The field a lookup shows in its term box once this record is picked.
    fn search_key(&self) -> &str;

    /// One-line description for tables and lookup rows.
    fn summary(&self) -> String;

    fn search_field(term: &str) -> SearchField;

    /// Editable copy, with stored date-times cut to their date.
    fn to_draft(&self) -> Self::Draft;

    fn selected_notice(&self) -> String {
        Self::PHRASES.selected.to_owned()
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    type Draft = CustomerDraft;

    const MODULE: Module = Module::Customers;
    const PHRASES: Phrases = Phrases {
        empty_term: "Ingrese la cédula",
        found_one: "Cliente encontrado",
        found_many: "Resultados encontrados",
        not_found: "No se encontró el cliente",
        search_failed: "Error en la búsqueda",
        list_failed: "Error al cargar clientes",
        load_failed: "Error al cargar el cliente",
        missing: "Cliente no encontrado",
        selected: "Cliente seleccionado",
        created: "Cliente creado correctamente",
        create_failed: "Error al crear",
        updated: "Cliente actualizado correctamente",
        update_failed: "Error al actualizar cliente",
        deleted: "Cliente eliminado correctamente",
        delete_failed: "Error al eliminar cliente",
    };

    fn id(&self) -> &CustomerId {
        &self.id
    }

    fn search_key(&self) -> &str {
        &self.details.national_id
    }

    fn summary(&self) -> String {
        format!(
            "{} {} ({})",
            self.details.name, self.details.surname, self.details.national_id
        )
    }

    fn search_field(term: &str) -> SearchField {
        SearchField::for_person_term(term)
    }

    fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            birth_date: normalize_date_text(&self.details.birth_date),
            ..self.details.clone()
        }
    }

    fn selected_notice(&self) -> String {
        format!("Cliente: {} seleccionado", self.details.surname)
    }
}

impl Entity for Technician {
    type Id = TechnicianId;
    type Draft = TechnicianDraft;

    const MODULE: Module = Module::Technicians;
    const PHRASES: Phrases = Phrases {
        empty_term: "Ingrese la cédula",
        found_one: "Técnico encontrado",
        found_many: "Resultados encontrados",
        not_found: "No se encontró el técnico",
        search_failed: "Error en la búsqueda",
        list_failed: "Error al cargar técnicos",
        load_failed: "Error al obtener técnico",
        missing: "Técnico no encontrado",
        selected: "Técnico seleccionado",
        created: "Técnico creado correctamente",
        create_failed: "Error al crear técnico",
        updated: "Técnico actualizado correctamente",
        update_failed: "Error al actualizar técnico",
        deleted: "Técnico eliminado correctamente",
        delete_failed: "Error al eliminar técnico",
    };

    fn id(&self) -> &TechnicianId {
        &self.id
    }

    fn search_key(&self) -> &str {
        &self.details.national_id
    }

    fn summary(&self) -> String {
        format!(
            "{} {} ({})",
            self.details.name, self.details.surname, self.details.national_id
        )
    }

    fn search_field(term: &str) -> SearchField {
        SearchField::for_person_term(term)
    }

    fn to_draft(&self) -> TechnicianDraft {
        TechnicianDraft {
            birth_date: normalize_date_text(&self.details.birth_date),
            ..self.details.clone()
        }
    }

    fn selected_notice(&self) -> String {
        format!("Técnico: {} seleccionado", self.details.surname)
    }
}

impl Entity for TicketRecord {
    type Id = TicketId;
    type Draft = TicketDraft;

    const MODULE: Module = Module::Tickets;
    const PHRASES: Phrases = Phrases {
        empty_term: "Ingrese el código del ticket",
        found_one: "Ticket encontrado",
        found_many: "Resultados encontrados",
        not_found: "No se encontró el ticket",
        search_failed: "Error al buscar ticket",
        list_failed: "Error al cargar tickets",
        load_failed: "Error al cargar el ticket",
        missing: "Ticket no encontrado",
        selected: "Ticket seleccionado",
        created: "Ticket Creado",
        create_failed: "Error 400: Datos inválidos",
        updated: "Ticket actualizado correctamente",
        update_failed: "Error al actualizar ticket",
        deleted: "Ticket eliminado correctamente",
        delete_failed: "Error al eliminar ticket",
    };

    fn id(&self) -> &TicketId {
        &self.id
    }

    fn search_key(&self) -> &str {
        &self.code
    }

    fn summary(&self) -> String {
        format!("{} - {}", self.code, self.description)
    }

    fn search_field(_term: &str) -> SearchField {
        SearchField::Code
    }

    fn to_draft(&self) -> TicketDraft {
        TicketDraft {
            code: self.code.clone(),
            description: self.description.clone(),
            customer: self.customer.as_ref().map(|linked| linked.id().clone()),
            technician: self.technician.as_ref().map(|linked| linked.id().clone()),
        }
    }
}
