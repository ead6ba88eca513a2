//! Value validation against a [`Schema`]
//!
//! `validate` never short-circuits: it walks the whole value and reports
//! every violation with a slash-separated path (`/profile/userId`,
//! `/tags/2`). An empty list means the value is valid.

use crate::schema::{PrimitiveType, Schema};
use serde_json::Value;
use std::fmt;

/// One schema violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Location of the violation (`""` is the root)
    pub path: String,
    /// What was wrong
    pub message: String,
}

impl ValidationError {
    /// Create a validation error
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Validate `value` against `schema`, collecting every violation
pub fn validate(schema: &Schema, value: &Value) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    walk(schema, value, String::new(), &mut errors);
    errors
}

/// Shorthand for `validate(..).is_empty()`
pub fn is_valid(schema: &Schema, value: &Value) -> bool {
    validate(schema, value).is_empty()
}

fn walk(schema: &Schema, value: &Value, path: String, errors: &mut Vec<ValidationError>) {
    match schema {
        Schema::Primitive(ty) => {
            if !primitive_matches(*ty, value) {
                errors.push(ValidationError::new(
                    path,
                    format!("expected {}, found {}", ty, type_name(value)),
                ));
            }
        }
        Schema::Nullable(inner) => {
            if !value.is_null() {
                walk(inner, value, path, errors);
            }
        }
        Schema::Array(items) => match value {
            Value::Array(elements) => {
                for (i, element) in elements.iter().enumerate() {
                    walk(items, element, format!("{}/{}", path, i), errors);
                }
            }
            other => errors.push(ValidationError::new(
                path,
                format!("expected array, found {}", type_name(other)),
            )),
        },
        Schema::Object(obj) => {
            let map = match value {
                Value::Object(map) => map,
                other => {
                    errors.push(ValidationError::new(
                        path,
                        format!("expected object, found {}", type_name(other)),
                    ));
                    return;
                }
            };
            for field in obj.fields() {
                let field_path = format!("{}/{}", path, field.name);
                match map.get(&field.name) {
                    Some(v) => walk(&field.schema, v, field_path, errors),
                    None if field.schema.is_nullable() => {}
                    None => errors.push(ValidationError::new(field_path, "required field is missing")),
                }
            }
            for key in map.keys() {
                if obj.field(key).is_none() {
                    errors.push(ValidationError::new(
                        format!("{}/{}", path, key),
                        "unexpected field",
                    ));
                }
            }
        }
    }
}

fn primitive_matches(ty: PrimitiveType, value: &Value) -> bool {
    match ty {
        PrimitiveType::String => value.is_string(),
        PrimitiveType::Number => value.is_number(),
        PrimitiveType::Integer => value.is_i64() || value.is_u64(),
        PrimitiveType::Boolean => value.is_boolean(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
