// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, Month};

use crate::{CustomerId, Gender, TechnicianId};

pub const REQUIRED_MESSAGE: &str = "Campo obligatorio";
pub const EMAIL_FORMAT_MESSAGE: &str = "Formato de email inválido";
pub const BIRTH_DATE_MESSAGE: &str = "Fecha de nacimiento inválida";

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A named input of a draft. `key` is the backend's wire name.
pub trait FormField: Copy + Ord + fmt::Debug + 'static {
    const ALL: &'static [Self];

    fn key(self) -> &'static str;
    fn label(self) -> &'static str;

    /// Fields that keep only ASCII digits as they are typed.
    fn digits_only(self) -> bool {
        false
    }

    /// Next value for fields restricted to a fixed set of options.
    fn cycle(self, _current: &str, _delta: isize) -> Option<&'static str> {
        None
    }
}

/// Ordered field -> message map. A field absent from the map is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord>(BTreeMap<F, String>);

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<F: FormField> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: F, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn remove(&mut self, field: F) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, field: F) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub fn first_message(&self) -> Option<&str> {
        self.0.values().next().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Editable string-field draft of a person record.
pub trait Draft: Clone + Default + fmt::Debug + PartialEq {
    type Field: FormField;

    fn value(&self, field: Self::Field) -> &str;
    fn value_mut(&mut self, field: Self::Field) -> &mut String;
    fn validate(&self, today: Date) -> Result<(), FieldErrors<Self::Field>>;

    fn set_value(&mut self, field: Self::Field, raw: &str) {
        let value = if field.digits_only() {
            digits_only(raw)
        } else {
            raw.to_owned()
        };
        *self.value_mut(field) = value;
    }
}

pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_ten_digits(value: &str) -> bool {
    value.len() == 10 && value.bytes().all(|byte| byte.is_ascii_digit())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Drops any time component the backend attaches to a stored date.
pub fn normalize_date_text(raw: &str) -> String {
    raw.split('T').next().unwrap_or_default().trim().to_owned()
}

/// The same calendar day `years` earlier. Feb 29 falls back to Feb 28 when
/// the target year is not a leap year.
pub fn years_before(today: Date, years: i32) -> Option<Date> {
    let year = today.year().checked_sub(years)?;
    today
        .replace_year(year)
        .ok()
        .or_else(|| Date::from_calendar_date(year, Month::February, 28).ok())
}

/// Whole years elapsed between `birth` and `today`.
pub fn age_on(birth: Date, today: Date) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month() as u8, today.day()) < (birth.month() as u8, birth.day()) {
        age -= 1;
    }
    age
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeRange {
    pub min_years: i32,
    pub max_years: i32,
}

impl AgeRange {
    pub fn contains(self, birth: Date, today: Date) -> bool {
        let (Some(earliest), Some(latest)) = (
            years_before(today, self.max_years),
            years_before(today, self.min_years),
        ) else {
            return false;
        };
        earliest <= birth && birth <= latest
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BirthDateCheck {
    Valid,
    Unparsable,
    OutOfRange,
}

pub fn check_birth_date(raw: &str, today: Date, range: AgeRange) -> BirthDateCheck {
    match parse_date(raw) {
        None => BirthDateCheck::Unparsable,
        Some(birth) if range.contains(birth, today) => BirthDateCheck::Valid,
        Some(_) => BirthDateCheck::OutOfRange,
    }
}

fn require_all<D: Draft>(draft: &D, errors: &mut FieldErrors<D::Field>) {
    for field in D::Field::ALL {
        if draft.value(*field).trim().is_empty() {
            errors.insert(*field, REQUIRED_MESSAGE);
        }
    }
}

fn has_value(value: &str) -> bool {
    !value.trim().is_empty()
}

struct PersonRules {
    national_id_message: &'static str,
    phone_message: &'static str,
    age_range: AgeRange,
    age_message: &'static str,
}

struct PersonFields<F> {
    national_id: F,
    phone: F,
    email: F,
    birth_date: F,
}

fn check_person<D: Draft>(
    draft: &D,
    fields: PersonFields<D::Field>,
    rules: &PersonRules,
    today: Date,
    errors: &mut FieldErrors<D::Field>,
) {
    let national_id = draft.value(fields.national_id);
    if has_value(national_id) && !is_ten_digits(national_id) {
        errors.insert(fields.national_id, rules.national_id_message);
    }
    let phone = draft.value(fields.phone);
    if has_value(phone) && !is_ten_digits(phone) {
        errors.insert(fields.phone, rules.phone_message);
    }
    let email = draft.value(fields.email);
    if has_value(email) && !is_valid_email(email) {
        errors.insert(fields.email, EMAIL_FORMAT_MESSAGE);
    }
    let birth = draft.value(fields.birth_date);
    if has_value(birth) {
        match check_birth_date(birth, today, rules.age_range) {
            BirthDateCheck::Valid => {}
            BirthDateCheck::Unparsable => errors.insert(fields.birth_date, BIRTH_DATE_MESSAGE),
            BirthDateCheck::OutOfRange => errors.insert(fields.birth_date, rules.age_message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CustomerField {
    Name,
    Surname,
    NationalId,
    BirthDate,
    City,
    Address,
    Phone,
    Email,
    Department,
}

impl FormField for CustomerField {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::Surname,
        Self::NationalId,
        Self::BirthDate,
        Self::City,
        Self::Address,
        Self::Phone,
        Self::Email,
        Self::Department,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::Surname => "apellido",
            Self::NationalId => "cedula",
            Self::BirthDate => "fecha_nacimiento",
            Self::City => "ciudad",
            Self::Address => "direccion",
            Self::Phone => "telefono",
            Self::Email => "email",
            Self::Department => "dependencia",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::Surname => "Apellido",
            Self::NationalId => "Cédula",
            Self::BirthDate => "Fecha de nacimiento",
            Self::City => "Ciudad",
            Self::Address => "Dirección",
            Self::Phone => "Teléfono",
            Self::Email => "Email",
            Self::Department => "Dependencia",
        }
    }

    fn digits_only(self) -> bool {
        matches!(self, Self::NationalId | Self::Phone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "cedula")]
    pub national_id: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
    #[serde(rename = "dependencia")]
    pub department: String,
}

impl CustomerDraft {
    pub const AGE_RANGE: AgeRange = AgeRange {
        min_years: 16,
        max_years: 100,
    };

    const RULES: PersonRules = PersonRules {
        national_id_message: "La cédula debe tener 10 dígitos",
        phone_message: "El teléfono debe tener 10 dígitos",
        age_range: Self::AGE_RANGE,
        age_message: "La edad debe estar entre 16 y 100 años",
    };
}

impl Draft for CustomerDraft {
    type Field = CustomerField;

    fn value(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::Surname => &self.surname,
            CustomerField::NationalId => &self.national_id,
            CustomerField::BirthDate => &self.birth_date,
            CustomerField::City => &self.city,
            CustomerField::Address => &self.address,
            CustomerField::Phone => &self.phone,
            CustomerField::Email => &self.email,
            CustomerField::Department => &self.department,
        }
    }

    fn value_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::Name => &mut self.name,
            CustomerField::Surname => &mut self.surname,
            CustomerField::NationalId => &mut self.national_id,
            CustomerField::BirthDate => &mut self.birth_date,
            CustomerField::City => &mut self.city,
            CustomerField::Address => &mut self.address,
            CustomerField::Phone => &mut self.phone,
            CustomerField::Email => &mut self.email,
            CustomerField::Department => &mut self.department,
        }
    }

    fn validate(&self, today: Date) -> Result<(), FieldErrors<CustomerField>> {
        let mut errors = FieldErrors::new();
        require_all(self, &mut errors);
        check_person(
            self,
            PersonFields {
                national_id: CustomerField::NationalId,
                phone: CustomerField::Phone,
                email: CustomerField::Email,
                birth_date: CustomerField::BirthDate,
            },
            &Self::RULES,
            today,
            &mut errors,
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TechnicianField {
    Name,
    Surname,
    NationalId,
    BirthDate,
    Gender,
    City,
    Address,
    Phone,
    Email,
}

impl FormField for TechnicianField {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::Surname,
        Self::NationalId,
        Self::BirthDate,
        Self::Gender,
        Self::City,
        Self::Address,
        Self::Phone,
        Self::Email,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::Surname => "apellido",
            Self::NationalId => "cedula",
            Self::BirthDate => "fecha_nacimiento",
            Self::Gender => "genero",
            Self::City => "ciudad",
            Self::Address => "direccion",
            Self::Phone => "telefono",
            Self::Email => "email",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::Surname => "Apellido",
            Self::NationalId => "Cédula",
            Self::BirthDate => "Fecha de nacimiento",
            Self::Gender => "Género",
            Self::City => "Ciudad",
            Self::Address => "Dirección",
            Self::Phone => "Teléfono",
            Self::Email => "Email",
        }
    }

    fn digits_only(self) -> bool {
        matches!(self, Self::NationalId | Self::Phone)
    }

    fn cycle(self, current: &str, delta: isize) -> Option<&'static str> {
        match self {
            Self::Gender => Some(Gender::cycle(current, delta).as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechnicianDraft {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    #[serde(rename = "cedula")]
    pub national_id: String,
    #[serde(rename = "fecha_nacimiento")]
    pub birth_date: String,
    #[serde(rename = "genero")]
    pub gender: String,
    #[serde(rename = "ciudad")]
    pub city: String,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "telefono")]
    pub phone: String,
    pub email: String,
}

impl TechnicianDraft {
    pub const AGE_RANGE: AgeRange = AgeRange {
        min_years: 0,
        max_years: 100,
    };

    const RULES: PersonRules = PersonRules {
        national_id_message: "La cédula debe tener 10 números",
        phone_message: "El teléfono debe tener 10 números",
        age_range: Self::AGE_RANGE,
        age_message: "Edad inválida (0-100 años)",
    };
}

impl Draft for TechnicianDraft {
    type Field = TechnicianField;

    fn value(&self, field: TechnicianField) -> &str {
        match field {
            TechnicianField::Name => &self.name,
            TechnicianField::Surname => &self.surname,
            TechnicianField::NationalId => &self.national_id,
            TechnicianField::BirthDate => &self.birth_date,
            TechnicianField::Gender => &self.gender,
            TechnicianField::City => &self.city,
            TechnicianField::Address => &self.address,
            TechnicianField::Phone => &self.phone,
            TechnicianField::Email => &self.email,
        }
    }

    fn value_mut(&mut self, field: TechnicianField) -> &mut String {
        match field {
            TechnicianField::Name => &mut self.name,
            TechnicianField::Surname => &mut self.surname,
            TechnicianField::NationalId => &mut self.national_id,
            TechnicianField::BirthDate => &mut self.birth_date,
            TechnicianField::Gender => &mut self.gender,
            TechnicianField::City => &mut self.city,
            TechnicianField::Address => &mut self.address,
            TechnicianField::Phone => &mut self.phone,
            TechnicianField::Email => &mut self.email,
        }
    }

    fn validate(&self, today: Date) -> Result<(), FieldErrors<TechnicianField>> {
        let mut errors = FieldErrors::new();
        require_all(self, &mut errors);
        check_person(
            self,
            PersonFields {
                national_id: TechnicianField::NationalId,
                phone: TechnicianField::Phone,
                email: TechnicianField::Email,
                birth_date: TechnicianField::BirthDate,
            },
            &Self::RULES,
            today,
            &mut errors,
        );
        if has_value(&self.gender) && Gender::parse(self.gender.trim()).is_none() {
            errors.insert(TechnicianField::Gender, "Género inválido");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TicketField {
    Code,
    Description,
    Customer,
    Technician,
}

impl FormField for TicketField {
    const ALL: &'static [Self] = &[
        Self::Code,
        Self::Description,
        Self::Customer,
        Self::Technician,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Code => "codigo",
            Self::Description => "descripcion",
            Self::Customer => "cliente",
            Self::Technician => "tecnico",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Code => "Código",
            Self::Description => "Descripción",
            Self::Customer => "Cliente",
            Self::Technician => "Técnico",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketDraft {
    #[serde(rename = "codigo")]
    pub code: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "cliente", skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerId>,
    #[serde(rename = "tecnico", skip_serializing_if = "Option::is_none")]
    pub technician: Option<TechnicianId>,
}

impl TicketDraft {
    pub const MIN_DESCRIPTION_CHARS: usize = 10;

    pub fn validate(&self) -> Result<(), FieldErrors<TicketField>> {
        let mut errors = FieldErrors::new();
        if !has_value(&self.code) {
            errors.insert(TicketField::Code, "El código es obligatorio");
        }
        if self.description.chars().count() < Self::MIN_DESCRIPTION_CHARS {
            errors.insert(TicketField::Description, "Descripción muy corta");
        }
        if self.customer.is_none() || self.technician.is_none() {
            let message = "Seleccione Cliente y Técnico";
            if self.customer.is_none() {
                errors.insert(TicketField::Customer, message);
            }
            if self.technician.is_none() {
                errors.insert(TicketField::Technician, message);
            }
        }
        errors.into_result()
    }

    /// Copy with the code trimmed and upper-cased, as the backend stores it.
    pub fn canonical(&self) -> Self {
        Self {
            code: self.code.trim().to_uppercase(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FormField for LoginField {
    const ALL: &'static [Self] = &[Self::Email, Self::Password];

    fn key(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Email => "Correo",
            Self::Password => "Contraseña",
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors<LoginField>> {
        let mut errors = FieldErrors::new();
        if !has_value(&self.email) {
            errors.insert(LoginField::Email, "El correo es obligatorio");
        }
        if self.password.is_empty() {
            errors.insert(LoginField::Password, "La contraseña es obligatoria");
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistrationField {
    Name,
    Surname,
    Email,
    Password,
    ConfirmPassword,
}

impl FormField for RegistrationField {
    const ALL: &'static [Self] = &[
        Self::Name,
        Self::Surname,
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
    ];

    fn key(self) -> &'static str {
        match self {
            Self::Name => "nombre",
            Self::Surname => "apellido",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Name => "Nombre",
            Self::Surname => "Apellido",
            Self::Email => "Correo",
            Self::Password => "Contraseña",
            Self::ConfirmPassword => "Confirmar contraseña",
        }
    }
}

#[derive(Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellido")]
    pub surname: String,
    pub email: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl Registration {
    pub const MIN_PASSWORD_CHARS: usize = 8;

    pub fn value(&self, field: RegistrationField) -> &str {
        match field {
            RegistrationField::Name => &self.name,
            RegistrationField::Surname => &self.surname,
            RegistrationField::Email => &self.email,
            RegistrationField::Password => &self.password,
            RegistrationField::ConfirmPassword => &self.confirm_password,
        }
    }

    pub fn value_mut(&mut self, field: RegistrationField) -> &mut String {
        match field {
            RegistrationField::Name => &mut self.name,
            RegistrationField::Surname => &mut self.surname,
            RegistrationField::Email => &mut self.email,
            RegistrationField::Password => &mut self.password,
            RegistrationField::ConfirmPassword => &mut self.confirm_password,
        }
    }

    /// First failing rule, checked in the order the sign-up screen reports
    /// them.
    pub fn validate(&self) -> Result<(), &'static str> {
        if RegistrationField::ALL
            .iter()
            .any(|field| !has_value(self.value(*field)))
        {
            return Err("Todos los campos son obligatorios");
        }
        if self.password.chars().count() < Self::MIN_PASSWORD_CHARS {
            return Err("La contraseña debe tener al menos 8 caracteres");
        }
        if self.password != self.confirm_password {
            return Err("Las contraseñas no coinciden");
        }
        if !is_valid_email(self.email.trim()) {
            return Err("Ingrese un correo válido");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    const TODAY: Date = date!(2024 - 06 - 15);

    fn valid_customer() -> CustomerDraft {
        CustomerDraft {
            name: "Ana".to_owned(),
            surname: "Ruiz".to_owned(),
            national_id: "1712345678".to_owned(),
            birth_date: "1990-04-12".to_owned(),
            city: "Quito".to_owned(),
            address: "Av. Amazonas 123".to_owned(),
            phone: "0991234567".to_owned(),
            email: "ana@example.com".to_owned(),
            department: "Contabilidad".to_owned(),
        }
    }

    fn valid_technician() -> TechnicianDraft {
        TechnicianDraft {
            name: "Luis".to_owned(),
            surname: "Mora".to_owned(),
            national_id: "0912345678".to_owned(),
            birth_date: "1985-01-30".to_owned(),
            gender: "Masculino".to_owned(),
            city: "Guayaquil".to_owned(),
            address: "Calle 9".to_owned(),
            phone: "0987654321".to_owned(),
            email: "luis@example.com".to_owned(),
        }
    }

    #[test]
    fn empty_customer_reports_every_field_as_required() {
        let errors = CustomerDraft::default()
            .validate(TODAY)
            .expect_err("empty draft should fail");
        assert_eq!(errors.len(), CustomerField::ALL.len());
        assert!(errors.iter().all(|(_, message)| message == REQUIRED_MESSAGE));
    }

    #[test]
    fn whitespace_only_values_count_as_missing() {
        let mut draft = valid_customer();
        draft.city = "   ".to_owned();
        let errors = draft.validate(TODAY).expect_err("blank city");
        assert_eq!(errors.get(CustomerField::City), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn customer_digit_rules_use_customer_wording() {
        let mut draft = valid_customer();
        draft.national_id = "123".to_owned();
        draft.phone = "12345".to_owned();
        let errors = draft.validate(TODAY).expect_err("short digits");
        assert_eq!(
            errors.get(CustomerField::NationalId),
            Some("La cédula debe tener 10 dígitos")
        );
        assert_eq!(
            errors.get(CustomerField::Phone),
            Some("El teléfono debe tener 10 dígitos")
        );
    }

    #[test]
    fn technician_digit_rules_use_technician_wording() {
        let mut draft = valid_technician();
        draft.national_id = "99".to_owned();
        let errors = draft.validate(TODAY).expect_err("short cedula");
        assert_eq!(
            errors.get(TechnicianField::NationalId),
            Some("La cédula debe tener 10 números")
        );
    }

    #[test]
    fn set_value_strips_non_digits_for_digit_fields_only() {
        let mut draft = CustomerDraft::default();
        draft.set_value(CustomerField::Phone, "099-123 4567");
        draft.set_value(CustomerField::Address, "Calle 10 #4");
        assert_eq!(draft.phone, "0991234567");
        assert_eq!(draft.address, "Calle 10 #4");
    }

    #[test]
    fn email_pattern_requires_at_and_dot() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        let mut draft = valid_technician();
        draft.email = "luis@example".to_owned();
        let errors = draft.validate(TODAY).expect_err("bad email");
        assert_eq!(
            errors.get(TechnicianField::Email),
            Some(EMAIL_FORMAT_MESSAGE)
        );
    }

    #[test]
    fn customer_age_boundaries_are_inclusive() {
        let mut draft = valid_customer();
        draft.birth_date = "2008-06-15".to_owned();
        assert!(draft.validate(TODAY).is_ok(), "exactly 16 passes");
        draft.birth_date = "1924-06-15".to_owned();
        assert!(draft.validate(TODAY).is_ok(), "exactly 100 passes");

        draft.birth_date = "2008-06-16".to_owned();
        let errors = draft.validate(TODAY).expect_err("one day short of 16");
        assert_eq!(
            errors.get(CustomerField::BirthDate),
            Some("La edad debe estar entre 16 y 100 años")
        );
        draft.birth_date = "1924-06-14".to_owned();
        assert!(draft.validate(TODAY).is_err(), "older than 100");
    }

    #[test]
    fn technician_accepts_newborns_but_not_future_dates() {
        let mut draft = valid_technician();
        draft.birth_date = "2024-06-15".to_owned();
        assert!(draft.validate(TODAY).is_ok());
        draft.birth_date = "2024-06-16".to_owned();
        let errors = draft.validate(TODAY).expect_err("born tomorrow");
        assert_eq!(
            errors.get(TechnicianField::BirthDate),
            Some("Edad inválida (0-100 años)")
        );
    }

    #[test]
    fn unparsable_birth_date_is_reported() {
        let mut draft = valid_customer();
        draft.birth_date = "15/06/1990".to_owned();
        let errors = draft.validate(TODAY).expect_err("bad date");
        assert_eq!(
            errors.get(CustomerField::BirthDate),
            Some(BIRTH_DATE_MESSAGE)
        );
    }

    #[test]
    fn leap_day_anchor_falls_back_to_february_28() {
        let today = date!(2024 - 02 - 29);
        assert_eq!(years_before(today, 16), Some(date!(2008 - 02 - 29)));
        assert_eq!(years_before(today, 1), Some(date!(2023 - 02 - 28)));
    }

    #[test]
    fn age_on_counts_whole_years() {
        assert_eq!(age_on(date!(1990 - 06 - 16), TODAY), 33);
        assert_eq!(age_on(date!(1990 - 06 - 15), TODAY), 34);
    }

    #[test]
    fn date_time_values_normalize_to_the_date() {
        assert_eq!(
            normalize_date_text("1990-04-12T00:00:00.000Z"),
            "1990-04-12"
        );
        assert_eq!(normalize_date_text("1990-04-12"), "1990-04-12");
    }

    #[test]
    fn unknown_gender_is_rejected_and_empty_is_required() {
        let mut draft = valid_technician();
        draft.gender = "Robot".to_owned();
        let errors = draft.validate(TODAY).expect_err("bad gender");
        assert_eq!(errors.get(TechnicianField::Gender), Some("Género inválido"));
        draft.gender.clear();
        let errors = draft.validate(TODAY).expect_err("missing gender");
        assert_eq!(errors.get(TechnicianField::Gender), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn ticket_description_counts_characters_not_bytes() {
        let draft = TicketDraft {
            code: "tk-1".to_owned(),
            description: "ñññññññññ".to_owned(),
            customer: Some(CustomerId::new("c1")),
            technician: Some(TechnicianId::new("k1")),
        };
        let errors = draft.validate().expect_err("nine characters");
        assert_eq!(
            errors.get(TicketField::Description),
            Some("Descripción muy corta")
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn ticket_requires_both_references() {
        let draft = TicketDraft {
            code: "TK-1".to_owned(),
            description: "Pantalla rota en recepción".to_owned(),
            customer: Some(CustomerId::new("c1")),
            technician: None,
        };
        let errors = draft.validate().expect_err("missing technician");
        assert_eq!(
            errors.get(TicketField::Technician),
            Some("Seleccione Cliente y Técnico")
        );
        assert!(!errors.contains(TicketField::Customer));
    }

    #[test]
    fn canonical_ticket_code_is_trimmed_and_uppercased() {
        let draft = TicketDraft {
            code: "  tk-9 ".to_owned(),
            ..TicketDraft::default()
        };
        assert_eq!(draft.canonical().code, "TK-9");
        assert_eq!(draft.code, "  tk-9 ");
    }

    #[test]
    fn ticket_draft_serializes_backend_keys() {
        let draft = TicketDraft {
            code: "TK-1".to_owned(),
            description: "Cambio de disco".to_owned(),
            customer: Some(CustomerId::new("c1")),
            technician: Some(TechnicianId::new("k1")),
        };
        let value = serde_json::to_value(&draft).expect("serialize");
        assert_eq!(value["codigo"], "TK-1");
        assert_eq!(value["cliente"], "c1");
        assert_eq!(value["tecnico"], "k1");
    }

    #[test]
    fn login_requires_email_and_password() {
        let errors = Credentials::default().validate().expect_err("empty login");
        assert_eq!(
            errors.first_message(),
            Some("El correo es obligatorio")
        );
        assert_eq!(
            errors.get(LoginField::Password),
            Some("La contraseña es obligatoria")
        );
    }

    #[test]
    fn registration_rules_report_in_order() {
        let mut registration = Registration {
            name: "Ana".to_owned(),
            surname: "Ruiz".to_owned(),
            email: "ana@example".to_owned(),
            password: "short".to_owned(),
            confirm_password: "other".to_owned(),
        };
        assert_eq!(
            registration.validate(),
            Err("La contraseña debe tener al menos 8 caracteres")
        );
        registration.password = "longenough".to_owned();
        assert_eq!(registration.validate(), Err("Las contraseñas no coinciden"));
        registration.confirm_password = "longenough".to_owned();
        assert_eq!(registration.validate(), Err("Ingrese un correo válido"));
        registration.email = "ana@example.com".to_owned();
        assert_eq!(registration.validate(), Ok(()));
    }

    #[test]
    fn registration_payload_omits_confirmation() {
        let registration = Registration {
            name: "Ana".to_owned(),
            surname: "Ruiz".to_owned(),
            email: "ana@example.com".to_owned(),
            password: "secret123".to_owned(),
            confirm_password: "secret123".to_owned(),
        };
        let value = serde_json::to_value(&registration).expect("serialize");
        assert_eq!(value["nombre"], "Ana");
        assert!(value.get("confirm_password").is_none());
    }

    #[test]
    fn only_gender_cycles_through_options() {
        assert_eq!(TechnicianField::Gender.cycle("", 1), Some("Masculino"));
        assert_eq!(TechnicianField::Gender.cycle("Masculino", -1), Some("Otro"));
        assert_eq!(TechnicianField::City.cycle("Quito", 1), None);
        assert_eq!(CustomerField::Department.cycle("Ventas", 1), None);
    }
}
