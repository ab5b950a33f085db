// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod backend;

use anyhow::{Context, Result};
use helpdesk_app::forms::{CustomerDraft, TechnicianDraft, TicketDraft};
use helpdesk_app::{
    Customer, CustomerId, Gender, Linked, Technician, TechnicianId, TicketId, TicketRecord, User,
    UserId,
};
use std::path::PathBuf;
use time::macros::{date, format_description};
use time::{Date, Duration};

pub use backend::{Call, InMemoryBackend, MemorySessionStore, RecordingSink, StoredRecord};

const FIRST_NAMES: [&str; 16] = [
    "Ana", "Luis", "María", "Jorge", "Lucía", "Andrés", "Sofía", "Diego", "Valeria", "Carlos",
    "Daniela", "Mateo", "Camila", "Pablo", "Gabriela", "Tomás",
];
const LAST_NAMES: [&str; 16] = [
    "Ruiz", "Mora", "Paredes", "Cevallos", "Andrade", "Vega", "Salazar", "Torres", "Jaramillo",
    "Naranjo", "Benítez", "Zambrano", "Ortiz", "Castro", "Guerrero", "Villacís",
];
const CITIES: [&str; 8] = [
    "Quito",
    "Guayaquil",
    "Cuenca",
    "Ambato",
    "Loja",
    "Manta",
    "Ibarra",
    "Riobamba",
];
const STREETS: [&str; 8] = [
    "Av. Amazonas",
    "Av. 10 de Agosto",
    "Calle Bolívar",
    "Av. de las Américas",
    "Calle Sucre",
    "Av. Colón",
    "Calle García Moreno",
    "Av. Shyris",
];
const DEPARTMENTS: [&str; 6] = [
    "Contabilidad",
    "Recursos Humanos",
    "Ventas",
    "Sistemas",
    "Bodega",
    "Gerencia",
];
const ISSUES: [&str; 8] = [
    "Impresora no responde en recepción",
    "Computador se reinicia al abrir el correo",
    "Sin acceso a la red inalámbrica",
    "Pantalla parpadea después del almuerzo",
    "Teclado con teclas trabadas",
    "Respaldo nocturno falló dos veces",
    "Licencia de ofimática vencida",
    "Proyector de la sala no detecta señal",
];

/// Date every fixture's ages are computed against.
pub const REFERENCE_TODAY: Date = date!(2024 - 06 - 15);

struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of valid drafts and stored records.
pub struct DeskFaker {
    rng: DeterministicRng,
    sequence: u64,
}

impl DeskFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            sequence: 0,
        }
    }

    pub fn customer_draft(&mut self) -> CustomerDraft {
        let name = self.pick(&FIRST_NAMES).to_owned();
        let surname = self.pick(&LAST_NAMES).to_owned();
        CustomerDraft {
            email: email_for(&name, &surname, self.rng.int_n(90) + 10),
            name,
            surname,
            national_id: self.digits(10),
            birth_date: self.birth_date(18, 70),
            city: self.pick(&CITIES).to_owned(),
            address: format!("{} {}", self.pick(&STREETS), self.rng.int_n(900) + 100),
            phone: format!("09{}", self.digits(8)),
            department: self.pick(&DEPARTMENTS).to_owned(),
        }
    }

    pub fn technician_draft(&mut self) -> TechnicianDraft {
        let name = self.pick(&FIRST_NAMES).to_owned();
        let surname = self.pick(&LAST_NAMES).to_owned();
        let gender = Gender::ALL[self.rng.int_n(Gender::ALL.len())];
        TechnicianDraft {
            email: email_for(&name, &surname, self.rng.int_n(90) + 10),
            name,
            surname,
            national_id: self.digits(10),
            birth_date: self.birth_date(20, 60),
            gender: gender.as_str().to_owned(),
            city: self.pick(&CITIES).to_owned(),
            address: format!("{} {}", self.pick(&STREETS), self.rng.int_n(900) + 100),
            phone: format!("09{}", self.digits(8)),
        }
    }

    pub fn customer(&mut self) -> Customer {
        let id = CustomerId::new(self.next_id("c"));
        Customer {
            id,
            details: self.customer_draft(),
        }
    }

    pub fn technician(&mut self) -> Technician {
        let id = TechnicianId::new(self.next_id("k"));
        Technician {
            id,
            details: self.technician_draft(),
        }
    }

    pub fn ticket_draft(&mut self, customer: &CustomerId, technician: &TechnicianId) -> TicketDraft {
        TicketDraft {
            code: format!("tkt-{}", self.digits(4)),
            description: self.pick(&ISSUES).to_owned(),
            customer: Some(customer.clone()),
            technician: Some(technician.clone()),
        }
    }

    /// Stored ticket with both references populated, as the listing
    /// endpoint returns them.
    pub fn ticket(&mut self, customer: &Customer, technician: &Technician) -> TicketRecord {
        let draft = self.ticket_draft(&customer.id, &technician.id).canonical();
        TicketRecord {
            id: TicketId::new(self.next_id("t")),
            code: draft.code,
            description: draft.description,
            customer: Some(Linked::Record(customer.clone())),
            technician: Some(Linked::Record(technician.clone())),
        }
    }

    pub fn user(&mut self) -> User {
        let name = self.pick(&FIRST_NAMES).to_owned();
        let surname = self.pick(&LAST_NAMES).to_owned();
        User {
            id: UserId::new(self.next_id("u")),
            email: email_for(&name, &surname, self.rng.int_n(90) + 10),
            name,
            surname,
        }
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.sequence += 1;
        format!("{prefix}{:04}", self.sequence)
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }

    fn digits(&mut self, count: usize) -> String {
        (0..count)
            .map(|_| char::from(b'0' + self.rng.int_n(10) as u8))
            .collect()
    }

    fn birth_date(&mut self, min_age: i64, max_age: i64) -> String {
        let span_days = (max_age - min_age) * 365;
        let offset = self.rng.int_n(span_days.max(1) as usize) as i64;
        let birth = REFERENCE_TODAY - Duration::days(min_age * 366 + offset);
        format_date(birth)
    }
}

fn email_for(name: &str, surname: &str, suffix: usize) -> String {
    let local: String = format!("{name}.{surname}")
        .chars()
        .filter_map(|ch| match ch {
            'á' | 'Á' => Some('a'),
            'é' | 'É' => Some('e'),
            'í' | 'Í' => Some('i'),
            'ó' | 'Ó' => Some('o'),
            'ú' | 'Ú' => Some('u'),
            'ñ' | 'Ñ' => Some('n'),
            ch if ch.is_ascii_alphanumeric() || ch == '.' => Some(ch.to_ascii_lowercase()),
            _ => None,
        })
        .collect();
    format!("{local}{suffix}@example.com")
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .expect("date formats")
}

/// A path inside a fresh temp dir; keep the dir alive while the path is used.
pub fn temp_file_path(file_name: &str) -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let path = dir.path().join(file_name);
    Ok((dir, path))
}
