//! Positional-array codec
//!
//! Object values are compressed into arrays whose slots follow the schema's
//! field declaration order; nested object fields become nested arrays.
//! Everything else (scalars, arrays, nullables) passes through unchanged.
//!
//! ```text
//! schema  object{ profile: object{ userId, userName }, active }
//! value   {"profile": {"userId": "1", "userName": "bob"}, "active": true}
//! wire    [["1","bob"],true]
//! ```
//!
//! Decoding reverses the walk and then validates the rebuilt value against
//! the whole schema. Parse and shape errors are hard errors; a value that
//! rebuilds but fails validation is reported as [`Decoded::Invalid`] so read
//! paths can treat it as a miss.

use crate::error::{Error, Result};
use crate::schema::{ObjectSchema, Schema};
use crate::validate::{validate, ValidationError};
use serde_json::{Map, Value};

/// Outcome of decoding wire text that parsed and lined up with the schema
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    /// Rebuilt value satisfies the schema
    Valid(Value),
    /// Rebuilt value violates the schema
    Invalid(Vec<ValidationError>),
}

impl Decoded {
    /// The value if valid, `None` otherwise
    pub fn into_option(self) -> Option<Value> {
        match self {
            Decoded::Valid(v) => Some(v),
            Decoded::Invalid(_) => None,
        }
    }

    /// The value if valid, `Error::Validation` otherwise
    pub fn into_result(self) -> Result<Value> {
        match self {
            Decoded::Valid(v) => Ok(v),
            Decoded::Invalid(errors) => Err(Error::Validation { errors }),
        }
    }

    /// True for [`Decoded::Valid`]
    pub fn is_valid(&self) -> bool {
        matches!(self, Decoded::Valid(_))
    }
}

/// Encode `value` into its positional form
///
/// Absent non-object fields occupy their slot as `null`.
pub fn encode(schema: &Schema, value: &Value) -> Result<Value> {
    match schema {
        Schema::Object(obj) => encode_object(obj, value, ""),
        _ => Ok(value.clone()),
    }
}

/// Encode `value` and serialize it to wire text
pub fn encode_to_wire(schema: &Schema, value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&encode(schema, value)?)?)
}

fn encode_object(obj: &ObjectSchema, value: &Value, path: &str) -> Result<Value> {
    let map = value
        .as_object()
        .ok_or_else(|| Error::shape(root(path), "expected an object value for an object schema"))?;

    let mut slots = Vec::with_capacity(obj.len());
    for field in obj.fields() {
        let field_path = format!("{}/{}", path, field.name);
        let slot = match (&field.schema, map.get(&field.name)) {
            (Schema::Object(child), Some(v)) => encode_object(child, v, &field_path)?,
            (Schema::Object(_), None) => {
                return Err(Error::shape(field_path, "nested object field is missing"));
            }
            (_, Some(v)) => v.clone(),
            (_, None) => Value::Null,
        };
        slots.push(slot);
    }
    Ok(Value::Array(slots))
}

/// Parse wire text and rebuild the value it encodes
///
/// For object schemas the top level must be a JSON array. Elements beyond
/// the declared field count are ignored; missing trailing elements leave
/// their fields absent, except nested object fields, which must be present
/// as arrays.
pub fn decode(schema: &Schema, wire: &str) -> Result<Decoded> {
    let parsed: Value = serde_json::from_str(wire).map_err(|e| Error::Parse {
        reason: e.to_string(),
    })?;

    let value = match schema {
        Schema::Object(obj) => match parsed {
            Value::Array(elements) => rebuild(obj, elements, "")?,
            other => {
                return Err(Error::Parse {
                    reason: format!(
                        "expected a JSON array at top level, found {}",
                        json_kind(&other)
                    ),
                });
            }
        },
        _ => parsed,
    };

    let errors = validate(schema, &value);
    Ok(if errors.is_empty() {
        Decoded::Valid(value)
    } else {
        Decoded::Invalid(errors)
    })
}

/// Decode raw bytes read from the store
pub fn decode_bytes(schema: &Schema, wire: &[u8]) -> Result<Decoded> {
    let text = std::str::from_utf8(wire).map_err(|e| Error::Parse {
        reason: format!("payload is not UTF-8: {}", e),
    })?;
    decode(schema, text)
}

fn rebuild(obj: &ObjectSchema, elements: Vec<Value>, path: &str) -> Result<Value> {
    let mut map = Map::new();
    let mut elements = elements.into_iter();

    for field in obj.fields() {
        let field_path = format!("{}/{}", path, field.name);
        match (&field.schema, elements.next()) {
            (Schema::Object(child), Some(Value::Array(inner))) => {
                map.insert(field.name.clone(), rebuild(child, inner, &field_path)?);
            }
            (Schema::Object(_), Some(other)) => {
                return Err(Error::shape(
                    field_path,
                    format!("expected nested array, found {}", json_kind(&other)),
                ));
            }
            (Schema::Object(_), None) => {
                return Err(Error::shape(field_path, "expected nested array, found nothing"));
            }
            (_, Some(element)) => {
                map.insert(field.name.clone(), element);
            }
            (_, None) => {}
        }
    }
    Ok(Value::Object(map))
}

fn root(path: &str) -> &str {
    if path.is_empty() {
        "/"
    } else {
        path
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
