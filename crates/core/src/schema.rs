//! Schema representation
//!
//! A [`Schema`] is a tagged description of a value's shape. Every codec and
//! validation walk dispatches on the variant tag, never on the runtime shape
//! of the value being processed.
//!
//! ## Composition rules
//!
//! - `Nullable` wraps a primitive or an array
//! - `Array` items are primitive or nullable
//! - `Object` fields have non-empty, unique names; order is declaration order
//!
//! Schemas built through the registry are checked with [`Schema::check`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Scalar types a primitive schema can describe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// UTF-8 string
    String,
    /// Any JSON number
    Number,
    /// Integral JSON number
    Integer,
    /// `true` / `false`
    Boolean,
}

impl PrimitiveType {
    /// Lowercase name used in descriptions and error messages
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveType::String => "string",
            PrimitiveType::Number => "number",
            PrimitiveType::Integer => "integer",
            PrimitiveType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declarative, recursively composable value shape
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    /// Scalar value
    Primitive(PrimitiveType),
    /// Wrapped schema that also permits `null` or absence
    Nullable(Box<Schema>),
    /// Ordered sequence of items
    Array(Box<Schema>),
    /// Named, ordered set of child schemas
    Object(ObjectSchema),
}

/// One named field of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field schema
    pub schema: Schema,
}

/// Object schema with fields in declaration order
///
/// The order is fixed for the lifetime of the instance; it is the slot
/// order of the positional wire encoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    fields: Vec<Field>,
}

impl ObjectSchema {
    /// Build an object schema, preserving iteration order
    pub fn new<I, N>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Schema)>,
        N: Into<String>,
    {
        Self {
            fields: fields
                .into_iter()
                .map(|(name, schema)| Field {
                    name: name.into(),
                    schema,
                })
                .collect(),
        }
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of declared fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True if the object declares no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field schema by name
    pub fn field(&self, name: &str) -> Option<&Schema> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.schema)
    }
}

impl Schema {
    /// `string` primitive
    pub fn string() -> Self {
        Schema::Primitive(PrimitiveType::String)
    }

    /// `number` primitive
    pub fn number() -> Self {
        Schema::Primitive(PrimitiveType::Number)
    }

    /// `integer` primitive
    pub fn integer() -> Self {
        Schema::Primitive(PrimitiveType::Integer)
    }

    /// `boolean` primitive
    pub fn boolean() -> Self {
        Schema::Primitive(PrimitiveType::Boolean)
    }

    /// Nullable wrapper
    pub fn nullable(inner: Schema) -> Self {
        Schema::Nullable(Box::new(inner))
    }

    /// Array of `items`
    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    /// Object schema from `(name, schema)` pairs in declaration order
    pub fn object<I, N>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, Schema)>,
        N: Into<String>,
    {
        Schema::Object(ObjectSchema::new(fields))
    }

    /// Object view, if this is an object schema
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// True if the schema permits `null` and absence
    pub fn is_nullable(&self) -> bool {
        matches!(self, Schema::Nullable(_))
    }

    /// Enforce composition rules recursively
    pub fn check(&self) -> Result<()> {
        self.check_at("")
    }

    fn check_at(&self, path: &str) -> Result<()> {
        match self {
            Schema::Primitive(_) => Ok(()),
            Schema::Nullable(inner) => match inner.as_ref() {
                Schema::Primitive(_) => Ok(()),
                Schema::Array(_) => inner.check_at(path),
                other => Err(invalid(
                    path,
                    format!("nullable must wrap a primitive or array, found {}", other.kind()),
                )),
            },
            Schema::Array(items) => match items.as_ref() {
                Schema::Primitive(_) | Schema::Nullable(_) => items.check_at(&format!("{}/*", path)),
                other => Err(invalid(
                    path,
                    format!("array items must be primitive or nullable, found {}", other.kind()),
                )),
            },
            Schema::Object(obj) => {
                let mut seen = HashSet::with_capacity(obj.len());
                for field in obj.fields() {
                    if field.name.is_empty() {
                        return Err(invalid(path, "object field names must be non-empty"));
                    }
                    if !seen.insert(field.name.as_str()) {
                        return Err(invalid(
                            path,
                            format!("duplicate object field '{}'", field.name),
                        ));
                    }
                    field.schema.check_at(&format!("{}/{}", path, field.name))?;
                }
                Ok(())
            }
        }
    }

    /// Variant name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Schema::Primitive(p) => p.name(),
            Schema::Nullable(_) => "nullable",
            Schema::Array(_) => "array",
            Schema::Object(_) => "object",
        }
    }

    /// Ordered, serializable description of this schema
    ///
    /// Two schemas with the same shape and field order produce identical
    /// descriptions, which is what namespace derivation hashes.
    pub fn describe(&self) -> SchemaDescription {
        match self {
            Schema::Primitive(PrimitiveType::String) => SchemaDescription::String,
            Schema::Primitive(PrimitiveType::Number) => SchemaDescription::Number,
            Schema::Primitive(PrimitiveType::Integer) => SchemaDescription::Integer,
            Schema::Primitive(PrimitiveType::Boolean) => SchemaDescription::Boolean,
            Schema::Nullable(inner) => SchemaDescription::Nullable {
                inner: Box::new(inner.describe()),
            },
            Schema::Array(items) => SchemaDescription::Array {
                items: Box::new(items.describe()),
            },
            Schema::Object(obj) => SchemaDescription::Object {
                fields: obj
                    .fields()
                    .iter()
                    .map(|f| FieldDescription {
                        name: f.name.clone(),
                        schema: f.schema.describe(),
                    })
                    .collect(),
            },
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(obj: ObjectSchema) -> Self {
        Schema::Object(obj)
    }
}

fn invalid(path: &str, reason: impl Into<String>) -> Error {
    let reason = reason.into();
    Error::InvalidSchema {
        reason: if path.is_empty() {
            reason
        } else {
            format!("{}: {}", path, reason)
        },
    }
}

/// Serializable schema description
///
/// Serializes as `{"type": "object", "fields": [{"name": .., "schema": ..}]}`
/// and so on; object fields keep declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SchemaDescription {
    /// `string`
    String,
    /// `number`
    Number,
    /// `integer`
    Integer,
    /// `boolean`
    Boolean,
    /// Nullable wrapper
    Nullable {
        /// Wrapped description
        inner: Box<SchemaDescription>,
    },
    /// Array
    Array {
        /// Item description
        items: Box<SchemaDescription>,
    },
    /// Object
    Object {
        /// Fields in declaration order
        fields: Vec<FieldDescription>,
    },
}

/// Named field inside an object description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescription {
    /// Field name
    pub name: String,
    /// Field description
    pub schema: SchemaDescription,
}
