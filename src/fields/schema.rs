//! Backend-declared field schemas and validation of dynamic records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::value::*;
use crate::utils::coerce::amount_from_value;

/// One attribute declared by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    /// Key used in record payloads
    pub key: String,
    /// Label shown in forms
    pub label: String,
    /// Declared type
    pub field_type: FieldType,
    /// Whether a record must carry this field
    #[serde(default)]
    pub required: bool,
    /// Allowed values for SELECT fields
    #[serde(default)]
    pub options: Vec<String>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            required: false,
            options: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Convert a loosely typed backend value into this field's typed value
    pub fn parse_value(&self, raw: &Value) -> Result<FieldValue, FieldError> {
        let mismatch = || FieldError::TypeMismatch {
            key: self.key.clone(),
            expected: self.field_type,
            found: describe(raw),
        };

        let value = match self.field_type {
            FieldType::Text => match raw {
                Value::String(text) => FieldValue::Text(text.clone()),
                Value::Number(number) => FieldValue::Text(number.to_string()),
                _ => return Err(mismatch()),
            },
            FieldType::Number => {
                FieldValue::Number(amount_from_value(raw).ok_or_else(mismatch)?)
            }
            FieldType::Select => match raw {
                Value::String(choice) => FieldValue::Select(choice.clone()),
                _ => return Err(mismatch()),
            },
            FieldType::Checkbox => match raw {
                Value::Bool(checked) => FieldValue::Checkbox(*checked),
                Value::String(text) if text.eq_ignore_ascii_case("true") => {
                    FieldValue::Checkbox(true)
                }
                Value::String(text) if text.eq_ignore_ascii_case("false") => {
                    FieldValue::Checkbox(false)
                }
                _ => return Err(mismatch()),
            },
            FieldType::Date => match raw {
                Value::String(text) => FieldValue::Date(parse_date(text).ok_or_else(mismatch)?),
                _ => return Err(mismatch()),
            },
        };

        self.check_option(&value)?;
        Ok(value)
    }

    fn check_option(&self, value: &FieldValue) -> Result<(), FieldError> {
        if let FieldValue::Select(choice) = value {
            if !self.options.iter().any(|option| option == choice) {
                return Err(FieldError::InvalidOption {
                    key: self.key.clone(),
                    value: choice.clone(),
                });
            }
        }
        Ok(())
    }
}

/// The set of dynamic attributes for one entity kind (leads, units)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub fields: Vec<FieldDefinition>,
}

impl FieldSchema {
    pub fn new(fields: Vec<FieldDefinition>) -> Self {
        Self { fields }
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|field| field.key == key)
    }

    /// Check the schema itself before using it
    pub fn validate(&self) -> Result<(), FieldError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.key.trim().is_empty() {
                return Err(FieldError::InvalidSchema(
                    "Field key cannot be empty".to_string(),
                ));
            }

            if !seen.insert(field.key.as_str()) {
                return Err(FieldError::InvalidSchema(format!(
                    "Field '{}' is declared more than once",
                    field.key
                )));
            }

            if field.field_type == FieldType::Select && field.options.is_empty() {
                return Err(FieldError::InvalidSchema(format!(
                    "Select field '{}' has no options",
                    field.key
                )));
            }
        }

        Ok(())
    }

    /// Parse one raw value by key
    pub fn parse_value(&self, key: &str, raw: &Value) -> Result<FieldValue, FieldError> {
        self.field(key)
            .ok_or_else(|| FieldError::UnknownField(key.to_string()))?
            .parse_value(raw)
    }

    /// Parse a raw attribute object; `null` values count as absent
    pub fn parse_record(&self, raw: &Map<String, Value>) -> Result<DynamicRecord, FieldError> {
        let mut record = DynamicRecord::new();
        for (key, value) in raw {
            if value.is_null() {
                continue;
            }
            record.insert(key.clone(), self.parse_value(key, value)?);
        }

        self.check_required(&record)?;
        Ok(record)
    }

    /// Validate a typed record that was built or edited in the client
    pub fn validate_record(&self, record: &DynamicRecord) -> Result<(), FieldError> {
        for (key, value) in record.iter() {
            let field = self
                .field(key)
                .ok_or_else(|| FieldError::UnknownField(key.clone()))?;

            if value.field_type() != field.field_type {
                return Err(FieldError::TypeMismatch {
                    key: key.clone(),
                    expected: field.field_type,
                    found: value.field_type().as_str().to_string(),
                });
            }

            field.check_option(value)?;
        }

        self.check_required(record)
    }

    fn check_required(&self, record: &DynamicRecord) -> Result<(), FieldError> {
        match self
            .fields
            .iter()
            .find(|field| field.required && !record.contains(&field.key))
        {
            Some(field) => Err(FieldError::MissingRequired(field.key.clone())),
            None => Ok(()),
        }
    }
}

/// Accepts `YYYY-MM-DD`, or a timestamp starting with one
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            text.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

/// Dynamic field errors
#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Field '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: FieldType,
        found: String,
    },
    #[error("Missing required field: {0}")]
    MissingRequired(String),
    #[error("Invalid option '{value}' for field '{key}'")]
    InvalidOption { key: String, value: String },
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}
