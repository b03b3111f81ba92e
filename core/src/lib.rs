//! # Order API Core
//!
//! Schema definition and data-driven validation for the Order API.
//!
//! The API is declared once, as data, in an OpenAPI 3 document embedded in
//! this crate (`openapi.yaml`). At startup the document is compiled into an
//! [`ApiDefinition`]: operations with their HTTP method, [`PathTemplate`],
//! path parameters, request body contract and response codes, plus one
//! [`ObjectSchema`] per component schema. The web dispatcher and the client
//! both work from that compiled form.
//!
//! ## Example
//!
//! ```
//! use order_api_core::{order_api, PUT_ORDER_ID};
//! use serde_json::json;
//!
//! let api = order_api().unwrap();
//! let op = api.operation(PUT_ORDER_ID).unwrap();
//! assert_eq!(op.success_status(), 201);
//!
//! let body = op.request_body().unwrap();
//! assert!(body.schema.validate(&json!({"item": "Tea Table Green", "price": 14})).is_ok());
//! assert!(body.schema.validate(&json!({"item": "Nonexistent Item"})).is_err());
//! ```

pub mod definition;
mod document;
pub mod error;
pub mod order;
pub mod path;
pub mod schema;

use std::sync::OnceLock;

pub use definition::{
    ApiDefinition, DeclaredResponse, HttpMethod, JSON_CONTENT_TYPE, Operation, PathParameter,
    RequestBodySpec,
};
pub use error::{DefinitionError, ValidationError, ValidationErrors};
pub use order::{Order, OrderItem, UnknownOrderItem};
pub use path::PathTemplate;
pub use schema::{FieldSchema, FieldType, ObjectSchema};

/// The Order API document, as shipped.
pub const ORDER_API_YAML: &str = include_str!("../openapi.yaml");

/// `operationId` of the create-order operation.
pub const PUT_ORDER_ID: &str = "PutOrderId";

/// Component schema name of the order body.
pub const ORDER_SCHEMA: &str = "Order";

static ORDER_API: OnceLock<ApiDefinition> = OnceLock::new();

/// The compiled Order API, built on first use.
///
/// # Errors
///
/// Returns a [`DefinitionError`] if the embedded document fails to compile.
pub fn order_api() -> Result<&'static ApiDefinition, DefinitionError> {
    if let Some(definition) = ORDER_API.get() {
        return Ok(definition);
    }
    let definition = ApiDefinition::from_yaml(ORDER_API_YAML)?;
    Ok(ORDER_API.get_or_init(|| definition))
}
