//! Compiled object schemas and data-driven validation.
//!
//! An [`ObjectSchema`] is the runtime form of a declared entity shape. It
//! performs the structural checks a generated client/server pair would
//! otherwise encode in types: required-field presence, JSON type checks and
//! enum membership. The same validator works for any schema the definition
//! loader produces.
//!
//! # Example
//!
//! ```
//! use order_api_core::schema::{FieldSchema, FieldType, ObjectSchema};
//! use serde_json::json;
//!
//! let schema = ObjectSchema::new("Order")
//!     .with_field(FieldSchema::optional("item", FieldType::enumeration(["Tea Table Green"])))
//!     .with_field(FieldSchema::optional("price", FieldType::Integer));
//!
//! assert!(schema.validate(&json!({"item": "Tea Table Green", "price": 14})).is_ok());
//! assert!(schema.validate(&json!({"item": "Sofa"})).is_err());
//! ```

use crate::error::{ValidationError, ValidationErrors};
use serde_json::{Map, Value};

/// The JSON type a field must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Any JSON string.
    String,
    /// A string restricted to a closed set of members.
    Enum(Vec<String>),
    /// A JSON number without fractional part that fits in an `i64`.
    Integer,
    /// Any JSON number.
    Number,
    /// `true` or `false`.
    Boolean,
}

impl FieldType {
    /// Builds an enum-constrained string type.
    pub fn enumeration<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(members.into_iter().map(Into::into).collect())
    }

    /// Name used in violation messages.
    #[must_use]
    pub const fn expected(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }

    fn check(&self, field: &str, value: &Value) -> Option<ValidationError> {
        let matches = match (self, value) {
            (Self::String | Self::Enum(_), Value::String(_))
            | (Self::Number, Value::Number(_))
            | (Self::Boolean, Value::Bool(_)) => true,
            (Self::Integer, Value::Number(n)) => n.is_i64(),
            _ => false,
        };

        if !matches {
            let found = match (self, value) {
                (Self::Integer, Value::Number(n)) if n.is_u64() => "integer out of range",
                _ => json_type(value),
            };
            return Some(ValidationError::TypeMismatch {
                field: field.to_string(),
                expected: self.expected(),
                found,
            });
        }

        if let (Self::Enum(allowed), Value::String(s)) = (self, value) {
            if !allowed.iter().any(|member| member == s) {
                return Some(ValidationError::NotInEnum {
                    field: field.to_string(),
                    value: s.clone(),
                    allowed: allowed.clone(),
                });
            }
        }

        None
    }
}

/// One declared property of an object schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Property name as it appears on the wire.
    pub name: String,
    /// Declared type.
    pub field_type: FieldType,
    /// Whether the property must be present and non-null.
    pub required: bool,
}

impl FieldSchema {
    /// A field that must be present.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
        }
    }

    /// A field that may be absent (or null).
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
        }
    }
}

/// A flat object shape: named fields plus an open/closed flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSchema {
    name: String,
    fields: Vec<FieldSchema>,
    additional_properties: bool,
}

impl ObjectSchema {
    /// An empty open schema. Fields are added with [`with_field`](Self::with_field).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            additional_properties: true,
        }
    }

    /// Adds a declared field.
    #[must_use]
    pub fn with_field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Whether undeclared properties are tolerated (the OpenAPI default).
    #[must_use]
    pub const fn with_additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = allowed;
        self
    }

    /// Schema name, e.g. `Order`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Looks up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Whether undeclared properties are tolerated.
    #[must_use]
    pub const fn additional_properties(&self) -> bool {
        self.additional_properties
    }

    /// Checks `value` against this schema.
    ///
    /// All violations are collected. Optional fields that are absent or
    /// `null` are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing every violation found.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationErrors> {
        let Value::Object(object) = value else {
            return Err(ValidationErrors::new(
                self.name.clone(),
                vec![ValidationError::NotAnObject {
                    found: json_type(value),
                }],
            ));
        };

        let mut errors = self.check_fields(object);

        if !self.additional_properties {
            errors.extend(
                object
                    .keys()
                    .filter(|key| self.field(key).is_none())
                    .map(|key| ValidationError::UnknownField { field: key.clone() }),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            tracing::debug!(schema = %self.name, violations = errors.len(), "payload rejected");
            Err(ValidationErrors::new(self.name.clone(), errors))
        }
    }

    fn check_fields(&self, object: &Map<String, Value>) -> Vec<ValidationError> {
        self.fields
            .iter()
            .filter_map(|field| match object.get(&field.name) {
                None | Some(Value::Null) if field.required => Some(ValidationError::MissingField {
                    field: field.name.clone(),
                }),
                None | Some(Value::Null) => None,
                Some(value) => field.field_type.check(&field.name, value),
            })
            .collect()
    }
}

const fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
