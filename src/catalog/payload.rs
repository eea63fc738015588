//! Request body construction for the catalog endpoints
//!
//! Form input arrives as raw strings. Empty strings, empty lists and zero
//! mean "not provided" and never reach the wire. Update payloads can still
//! clear a field: fields marked clear are listed by name under `borrar`.

use super::links::normalize_drive_link;
use super::model::split_list;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value, json};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Admin operation applied server-side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Create,
    Delete,
    Update,
}

impl AdminAction {
    pub const ALL: [AdminAction; 3] = [AdminAction::Create, AdminAction::Delete, AdminAction::Update];

    /// Value of the `accion` field
    pub fn wire_name(&self) -> &'static str {
        match self {
            AdminAction::Create => "alta",
            AdminAction::Delete => "baja",
            AdminAction::Update => "actualizacion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AdminAction::Create => "Alta",
            AdminAction::Delete => "Baja",
            AdminAction::Update => "Actualización",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            AdminAction::Create => AdminAction::Delete,
            AdminAction::Delete => AdminAction::Update,
            AdminAction::Update => AdminAction::Create,
        }
    }
}

/// How a form field is encoded on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Text,
    Link,
    List,
}

/// Editable fields of the admin form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    SetNumber,
    Name,
    Theme,
    Year,
    Pieces,
    Storage,
    StorageBox,
    Condition,
    ImageUrl,
    LegoWebUrl,
    Manuals,
    MinifigNames,
    MinifigNumbers,
    Tags,
}

impl FormField {
    pub const ALL: [FormField; 14] = [
        FormField::SetNumber,
        FormField::Name,
        FormField::Theme,
        FormField::Year,
        FormField::Pieces,
        FormField::Storage,
        FormField::StorageBox,
        FormField::Condition,
        FormField::ImageUrl,
        FormField::LegoWebUrl,
        FormField::Manuals,
        FormField::MinifigNames,
        FormField::MinifigNumbers,
        FormField::Tags,
    ];

    pub fn wire_name(&self) -> &'static str {
        match self {
            FormField::SetNumber => "set_number",
            FormField::Name => "name",
            FormField::Theme => "theme",
            FormField::Year => "year",
            FormField::Pieces => "pieces",
            FormField::Storage => "storage",
            FormField::StorageBox => "storage_box",
            FormField::Condition => "condition",
            FormField::ImageUrl => "image_url",
            FormField::LegoWebUrl => "lego_web_url",
            FormField::Manuals => "manuals",
            FormField::MinifigNames => "minifig_names",
            FormField::MinifigNumbers => "minifigs_numbers",
            FormField::Tags => "tags",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::SetNumber => "Número de set",
            FormField::Name => "Nombre",
            FormField::Theme => "Tema",
            FormField::Year => "Año",
            FormField::Pieces => "Piezas",
            FormField::Storage => "Ubicación",
            FormField::StorageBox => "Caja",
            FormField::Condition => "Estado",
            FormField::ImageUrl => "Imagen",
            FormField::LegoWebUrl => "Página LEGO",
            FormField::Manuals => "Manuales",
            FormField::MinifigNames => "Minifigs",
            FormField::MinifigNumbers => "Nº minifigs",
            FormField::Tags => "Etiquetas",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::SetNumber | FormField::Year | FormField::Pieces | FormField::StorageBox => {
                FieldKind::Integer
            }
            FormField::ImageUrl | FormField::LegoWebUrl => FieldKind::Link,
            FormField::Manuals
            | FormField::MinifigNames
            | FormField::MinifigNumbers
            | FormField::Tags => FieldKind::List,
            FormField::Name | FormField::Theme | FormField::Storage | FormField::Condition => {
                FieldKind::Text
            }
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum PayloadError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{names} minifig names but {numbers} minifig numbers")]
    MisalignedMinifigs { names: usize, numbers: usize },
}

/// Raw admin form input
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemForm {
    values: BTreeMap<FormField, String>,
    cleared: BTreeSet<FormField>,
}

impl ItemForm {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn get(&self, field: FormField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Mark a field to be cleared at the backend on update
    pub fn mark_cleared(&mut self, field: FormField) {
        self.cleared.insert(field);
    }

    pub fn is_cleared(&self, field: FormField) -> bool {
        self.cleared.contains(&field)
    }

    fn set_number(&self) -> Result<i64, PayloadError> {
        match field_value(FormField::SetNumber, self.get(FormField::SetNumber))? {
            Some(Value::Number(n)) => n.as_i64().ok_or(PayloadError::MissingField("set_number")),
            _ => Err(PayloadError::MissingField("set_number")),
        }
    }

    /// Every provided field, encoded for the wire, skipping empties and zero
    fn provided_fields(&self) -> Result<Map<String, Value>, PayloadError> {
        let mut fields = Map::new();
        for field in FormField::ALL {
            if let Some(value) = field_value(field, self.get(field))? {
                fields.insert(field.wire_name().to_string(), value);
            }
        }

        let names = list_len(&fields, FormField::MinifigNames);
        let numbers = list_len(&fields, FormField::MinifigNumbers);
        if names > 0 && numbers > 0 && names != numbers {
            return Err(PayloadError::MisalignedMinifigs { names, numbers });
        }

        Ok(fields)
    }
}

fn list_len(fields: &Map<String, Value>, field: FormField) -> usize {
    fields
        .get(field.wire_name())
        .and_then(Value::as_array)
        .map(Vec::len)
        .unwrap_or(0)
}

/// Encode one raw field. `None` means "not provided".
fn field_value(field: FormField, raw: &str) -> Result<Option<Value>, PayloadError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let value = match field.kind() {
        FieldKind::Integer => {
            let n: i64 = raw.parse().map_err(|_| PayloadError::InvalidNumber {
                field: field.wire_name(),
                value: raw.to_string(),
            })?;
            if n == 0 {
                return Ok(None);
            }
            json!(n)
        }
        FieldKind::Text => json!(raw),
        FieldKind::Link => json!(normalize_drive_link(raw)),
        FieldKind::List => {
            let items = split_list(raw);
            if items.is_empty() {
                return Ok(None);
            }
            json!(items)
        }
    };

    Ok(Some(value))
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Body for the search endpoint
pub fn search_payload(question: &str) -> Value {
    json!({ "pregunta": question.trim() })
}

/// Body for the filtered listing endpoint
pub fn listing_payload(theme: &str) -> Value {
    json!({ "tema": theme.trim() })
}

/// Body for the admin endpoint
pub fn build_admin_payload(
    action: AdminAction,
    form: &ItemForm,
    now: DateTime<Utc>,
) -> Result<Value, PayloadError> {
    match action {
        AdminAction::Delete => Ok(json!({
            "accion": action.wire_name(),
            "set_number": form.set_number()?,
        })),
        AdminAction::Create => {
            form.set_number()?;
            let mut lego = form.provided_fields()?;
            if !lego.contains_key(FormField::Name.wire_name()) {
                return Err(PayloadError::MissingField("name"));
            }
            let stamp = timestamp(now);
            lego.insert("created_at".to_string(), json!(stamp));
            lego.insert("updated_at".to_string(), json!(stamp));

            Ok(json!({
                "accion": action.wire_name(),
                "lego": lego,
            }))
        }
        AdminAction::Update => {
            let set_number = form.set_number()?;
            let mut campos = form.provided_fields()?;
            campos.remove(FormField::SetNumber.wire_name());
            campos.insert("updated_at".to_string(), json!(timestamp(now)));

            let mut body = json!({
                "accion": action.wire_name(),
                "set_number": set_number,
                "campos": campos,
            });

            let borrar: Vec<&str> = FormField::ALL
                .iter()
                .filter(|f| **f != FormField::SetNumber && form.is_cleared(**f))
                .map(|f| f.wire_name())
                .collect();
            if !borrar.is_empty() {
                body["borrar"] = json!(borrar);
            }

            Ok(body)
        }
    }
}
