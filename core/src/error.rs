//! Error types for loading definitions and validating payloads.

use std::fmt;
use thiserror::Error;

/// Errors raised while loading or compiling an API definition document.
///
/// These surface at startup, before any request is served.
#[derive(Error, Debug)]
pub enum DefinitionError {
    /// The document is not valid YAML or does not match the expected layout.
    #[error("Failed to parse API definition: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A path template is malformed (unbalanced braces, empty variable, ...).
    #[error("Invalid path template '{template}': {reason}")]
    InvalidPathTemplate {
        /// The offending template.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A template variable has no matching `in: path` parameter, or the reverse.
    #[error("Path parameter mismatch in '{template}': {reason}")]
    PathParameterMismatch {
        /// The path template of the operation.
        template: String,
        /// Which parameter is missing or extra.
        reason: String,
    },

    /// A path parameter required by the template was not supplied.
    #[error("Missing value for path parameter '{0}'")]
    MissingPathValue(String),

    /// A path parameter value cannot be sent as one segment.
    #[error("Value {value:?} for path parameter '{name}' is not a valid segment")]
    InvalidPathValue {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: String,
    },

    /// A `$ref` does not resolve to a component schema.
    #[error("Unresolved schema reference: {0}")]
    UnresolvedReference(String),

    /// The schema uses a construct this compiler does not support.
    #[error("Unsupported schema at '{location}': {reason}")]
    UnsupportedSchema {
        /// Where in the document the schema appears.
        location: String,
        /// What is unsupported.
        reason: String,
    },

    /// A request body declares a content type other than JSON.
    #[error("Unsupported content type '{content_type}' for operation {operation}")]
    UnsupportedContentType {
        /// The operation id.
        operation: String,
        /// The declared content type.
        content_type: String,
    },

    /// A response key is not a numeric HTTP status code.
    #[error("Invalid response status '{status}' for operation {operation}")]
    InvalidResponseStatus {
        /// The operation id.
        operation: String,
        /// The offending response key.
        status: String,
    },

    /// The operation declares no 2xx response.
    #[error("Operation {0} declares no success response")]
    NoSuccessResponse(String),

    /// Two operations share the same `operationId`.
    #[error("Duplicate operationId: {0}")]
    DuplicateOperation(String),
}

/// A single structural violation found while validating a payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The payload is not a JSON object.
    #[error("expected an object, found {found}")]
    NotAnObject {
        /// JSON type actually found.
        found: &'static str,
    },

    /// A required field is absent or null.
    #[error("field '{field}' is required")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// A field holds a value of the wrong JSON type.
    #[error("field '{field}' must be {expected}, found {found}")]
    TypeMismatch {
        /// Field name.
        field: String,
        /// Expected type.
        expected: &'static str,
        /// JSON type actually found.
        found: &'static str,
    },

    /// An enum-constrained field holds a value outside the enumeration.
    #[error("field '{field}' must be one of [{}], found '{value}'", .allowed.join(", "))]
    NotInEnum {
        /// Field name.
        field: String,
        /// The rejected value.
        value: String,
        /// The declared members.
        allowed: Vec<String>,
    },

    /// A field not declared by a closed schema.
    #[error("field '{field}' is not allowed")]
    UnknownField {
        /// Field name.
        field: String,
    },
}

/// Every violation found in one payload, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    schema: String,
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub(crate) const fn new(schema: String, errors: Vec<ValidationError>) -> Self {
        Self { schema, errors }
    }

    /// Name of the schema that rejected the payload.
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// The individual violations.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes `self`, returning the violations.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} payload is invalid", self.schema)?;
        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_in_enum_display() {
        let err = ValidationError::NotInEnum {
            field: "item".to_string(),
            value: "Chair".to_string(),
            allowed: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(err.to_string(), "field 'item' must be one of [A, B], found 'Chair'");
    }

    #[test]
    fn test_validation_errors_display_joins_violations() {
        let errors = ValidationErrors::new(
            "Order".to_string(),
            vec![
                ValidationError::MissingField {
                    field: "item".to_string(),
                },
                ValidationError::TypeMismatch {
                    field: "price".to_string(),
                    expected: "integer",
                    found: "string",
                },
            ],
        );

        assert_eq!(
            errors.to_string(),
            "Order payload is invalid: field 'item' is required; field 'price' must be integer, found string"
        );
        assert_eq!(errors.errors().len(), 2);
    }
}
