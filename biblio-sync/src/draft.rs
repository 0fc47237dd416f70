//! Form drafts for the three record types.
//!
//! A draft holds raw form input (text boxes, a checkbox, select values) for a
//! record being created or edited. It turns into a JSON payload only on
//! submit, after validation.

use crate::error::{CatalogError, CatalogResult, ValidationError};
use biblio_types::{Author, Book, Entity, Publisher, Reference, calendar_date, parse_calendar_date};
use serde_json::{Map, Value, json};
use std::fmt;

/// A value typed into one form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

/// Editable form state for one record type.
///
/// Field names are the server's JSON names (`titulo`, `nombre`, ...); the
/// English names (`title`, `name`, ...) are accepted as aliases.
pub trait Draft: Default + Clone + fmt::Debug + Send + Sync {
    /// The record type this draft creates or edits.
    type Record: Entity;

    /// Name of the required text field.
    const REQUIRED_FIELD: &'static str;

    /// Pre-populates a draft from a stored record.
    fn from_record(record: &Self::Record) -> Self;

    /// Current value of the required text field.
    fn required_value(&self) -> &str;

    /// Sets one field. No validation beyond the value's type happens here.
    fn set_field(&mut self, name: &str, value: FieldValue) -> CatalogResult<()>;

    /// Builds the request body. Empty year fields are left out.
    fn to_payload(&self) -> Result<Value, ValidationError>;

    /// Checks the required field is not blank.
    fn validate(&self) -> Result<(), ValidationError> {
        if self.required_value().trim().is_empty() {
            return Err(ValidationError::required(Self::REQUIRED_FIELD));
        }
        Ok(())
    }
}

fn text(field: &'static str, value: FieldValue) -> CatalogResult<String> {
    match value {
        FieldValue::Text(s) => Ok(s),
        FieldValue::Flag(_) => Err(ValidationError::invalid(field, "expected text").into()),
    }
}

fn flag(field: &'static str, value: FieldValue) -> CatalogResult<bool> {
    match value {
        FieldValue::Flag(b) => Ok(b),
        FieldValue::Text(s) => match s.trim() {
            "true" | "1" | "on" => Ok(true),
            "false" | "0" | "off" | "" => Ok(false),
            _ => Err(ValidationError::invalid(field, format!("expected true/false, got {s:?}")).into()),
        },
    }
}

/// Parses a year text box. Blank input means "no year".
fn parse_year(field: &'static str, raw: &str) -> Result<Option<i32>, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<i32>()
        .map(Some)
        .map_err(|_| ValidationError::invalid(field, format!("{raw:?} is not a year")))
}

fn year_text(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_default()
}

fn insert_year(body: &mut Value, key: &str, year: Option<i32>) {
    if let (Some(year), Some(map)) = (year, body.as_object_mut()) {
        map.insert(key.to_string(), json!(year));
    }
}

fn selection(raw: &str) -> Value {
    match raw.trim() {
        "" => Value::Null,
        id => Value::String(id.to_string()),
    }
}

// ── Author ──────────────────────────────────────────────────────

/// Author form: name, nationality, birth date (`YYYY-MM-DD`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorDraft {
    pub name: String,
    pub nationality: String,
    pub birth_date: String,
}

impl Draft for AuthorDraft {
    type Record = Author;
    const REQUIRED_FIELD: &'static str = "nombre";

    fn from_record(author: &Author) -> Self {
        Self {
            name: author.name.clone(),
            nationality: author.nationality.clone().unwrap_or_default(),
            birth_date: author
                .birth_date
                .as_deref()
                .map(|raw| calendar_date(raw).to_string())
                .unwrap_or_default(),
        }
    }

    fn required_value(&self) -> &str {
        &self.name
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> CatalogResult<()> {
        match name {
            "nombre" | "name" => self.name = text("nombre", value)?,
            "nacionalidad" | "nationality" => self.nationality = text("nacionalidad", value)?,
            "fechaNacimiento" | "birth_date" => self.birth_date = text("fechaNacimiento", value)?,
            other => return Err(CatalogError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_payload(&self) -> Result<Value, ValidationError> {
        self.validate()?;
        let birth_date = match self.birth_date.trim() {
            "" => Value::Null,
            raw => {
                let date = parse_calendar_date(raw)
                    .map_err(|e| ValidationError::invalid("fechaNacimiento", e.to_string()))?;
                Value::String(date.format("%Y-%m-%d").to_string())
            }
        };
        Ok(json!({
            "nombre": self.name.trim(),
            "nacionalidad": self.nationality,
            "fechaNacimiento": birth_date,
        }))
    }
}

// ── Publisher ───────────────────────────────────────────────────

/// Publisher form: name, country, founding year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherDraft {
    pub name: String,
    pub country: String,
    pub founded: String,
}

impl Draft for PublisherDraft {
    type Record = Publisher;
    const REQUIRED_FIELD: &'static str = "nombre";

    fn from_record(publisher: &Publisher) -> Self {
        Self {
            name: publisher.name.clone(),
            country: publisher.country.clone().unwrap_or_default(),
            founded: year_text(publisher.founded),
        }
    }

    fn required_value(&self) -> &str {
        &self.name
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> CatalogResult<()> {
        match name {
            "nombre" | "name" => self.name = text("nombre", value)?,
            "pais" | "country" => self.country = text("pais", value)?,
            "anioFundacion" | "founded" => self.founded = text("anioFundacion", value)?,
            other => return Err(CatalogError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_payload(&self) -> Result<Value, ValidationError> {
        self.validate()?;
        let founded = parse_year("anioFundacion", &self.founded)?;
        let mut body = json!({
            "nombre": self.name.trim(),
            "pais": self.country,
        });
        insert_year(&mut body, "anioFundacion", founded);
        Ok(body)
    }
}

// ── Book ────────────────────────────────────────────────────────

/// Book form. `author` and `publisher` hold the selected raw ids, or empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookDraft {
    pub title: String,
    pub category: String,
    pub year: String,
    pub available: bool,
    pub author: String,
    pub publisher: String,
}

impl Default for BookDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            category: String::new(),
            year: String::new(),
            available: true,
            author: String::new(),
            publisher: String::new(),
        }
    }
}

impl Draft for BookDraft {
    type Record = Book;
    const REQUIRED_FIELD: &'static str = "titulo";

    fn from_record(book: &Book) -> Self {
        let raw_id = |r: &Option<Reference>| {
            r.as_ref()
                .map(|r| r.id().to_string())
                .unwrap_or_default()
        };
        Self {
            title: book.title.clone(),
            category: book.category.clone().unwrap_or_default(),
            year: year_text(book.year),
            available: book.available,
            author: raw_id(&book.author),
            publisher: raw_id(&book.publisher),
        }
    }

    fn required_value(&self) -> &str {
        &self.title
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> CatalogResult<()> {
        match name {
            "titulo" | "title" => self.title = text("titulo", value)?,
            "categoria" | "category" => self.category = text("categoria", value)?,
            "anio" | "year" => self.year = text("anio", value)?,
            "disponible" | "available" => self.available = flag("disponible", value)?,
            "autor" | "author" => self.author = text("autor", value)?,
            "editorial" | "publisher" => self.publisher = text("editorial", value)?,
            other => return Err(CatalogError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn to_payload(&self) -> Result<Value, ValidationError> {
        self.validate()?;
        let year = parse_year("anio", &self.year)?;
        let mut map = Map::new();
        map.insert("titulo".into(), json!(self.title.trim()));
        map.insert("categoria".into(), json!(self.category));
        map.insert("disponible".into(), json!(self.available));
        map.insert("autor".into(), selection(&self.author));
        map.insert("editorial".into(), selection(&self.publisher));
        let mut body = Value::Object(map);
        insert_year(&mut body, "anio", year);
        Ok(body)
    }
}
