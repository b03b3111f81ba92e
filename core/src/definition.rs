//! Compiled API definitions.
//!
//! [`ApiDefinition::from_yaml`] reads an OpenAPI 3 document and turns every
//! operation and component schema into plain data the dispatcher and client
//! can act on: HTTP method, [`PathTemplate`], path parameters, request body
//! contract and declared response codes.

use crate::document::{Document, OperationDoc, ParameterDoc, PathItem, SchemaDoc};
use crate::error::DefinitionError;
use crate::path::PathTemplate;
use crate::schema::{FieldSchema, FieldType, ObjectSchema};
use std::collections::BTreeMap;
use std::fmt;

/// The only request body encoding the dispatcher accepts.
pub const JSON_CONTENT_TYPE: &str = "application/json";

const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// HTTP methods an operation can be declared on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
    /// `PATCH`
    Patch,
}

impl HttpMethod {
    /// Upper-case method name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParameter {
    /// Parameter name, matching a template variable.
    pub name: String,
    /// Declared type. Path parameters are carried as strings on the wire.
    pub field_type: FieldType,
}

/// The request body contract of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestBodySpec {
    /// Whether a non-empty body must be sent.
    pub required: bool,
    /// Declared media type (always [`JSON_CONTENT_TYPE`]).
    pub content_type: String,
    /// The shape the body must satisfy.
    pub schema: ObjectSchema,
}

/// A documented response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredResponse {
    /// HTTP status code.
    pub status: u16,
    /// Description from the document.
    pub description: String,
}

/// One compiled operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    id: String,
    method: HttpMethod,
    path: PathTemplate,
    parameters: Vec<PathParameter>,
    request_body: Option<RequestBodySpec>,
    responses: Vec<DeclaredResponse>,
}

impl Operation {
    /// The `operationId`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Path template.
    #[must_use]
    pub const fn path(&self) -> &PathTemplate {
        &self.path
    }

    /// Path parameters in template order.
    #[must_use]
    pub fn parameters(&self) -> &[PathParameter] {
        &self.parameters
    }

    /// Request body contract, if the operation takes a body.
    #[must_use]
    pub const fn request_body(&self) -> Option<&RequestBodySpec> {
        self.request_body.as_ref()
    }

    /// Documented responses sorted by status.
    #[must_use]
    pub fn responses(&self) -> &[DeclaredResponse] {
        &self.responses
    }

    /// The status a successful call responds with: the lowest declared 2xx.
    #[must_use]
    pub fn success_status(&self) -> u16 {
        // compile() guarantees at least one 2xx entry
        self.responses
            .iter()
            .map(|r| r.status)
            .find(|s| (200..300).contains(s))
            .unwrap_or(200)
    }
}

/// A compiled API document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiDefinition {
    openapi: String,
    title: String,
    version: String,
    operations: Vec<Operation>,
    schemas: BTreeMap<String, ObjectSchema>,
}

impl ApiDefinition {
    /// Parses and compiles an OpenAPI 3 YAML document.
    ///
    /// # Errors
    ///
    /// Returns a [`DefinitionError`] if the document does not parse or uses
    /// constructs outside the supported subset.
    pub fn from_yaml(text: &str) -> Result<Self, DefinitionError> {
        let document: Document = serde_yaml::from_str(text)?;
        Self::compile(document)
    }

    fn compile(document: Document) -> Result<Self, DefinitionError> {
        let schemas = document
            .components
            .schemas
            .iter()
            .map(|(name, doc)| Ok((name.clone(), compile_object(name, doc)?)))
            .collect::<Result<BTreeMap<_, _>, DefinitionError>>()?;

        let mut operations: Vec<Operation> = Vec::new();
        for (raw_path, item) in &document.paths {
            let template = PathTemplate::parse(raw_path)?;
            for (method, doc) in methods(item) {
                let operation = compile_operation(method, &template, item, doc, &schemas)?;
                if operations.iter().any(|op| op.id == operation.id) {
                    return Err(DefinitionError::DuplicateOperation(operation.id));
                }
                tracing::debug!(
                    operation = %operation.id,
                    method = %method,
                    path = %template,
                    "compiled operation"
                );
                operations.push(operation);
            }
        }

        Ok(Self {
            openapi: document.openapi,
            title: document.info.title,
            version: document.info.version,
            operations,
            schemas,
        })
    }

    /// OpenAPI version string of the source document.
    #[must_use]
    pub fn openapi_version(&self) -> &str {
        &self.openapi
    }

    /// API title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// API version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// All compiled operations.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Looks up an operation by `operationId`.
    #[must_use]
    pub fn operation(&self, operation_id: &str) -> Option<&Operation> {
        self.operations.iter().find(|op| op.id == operation_id)
    }

    /// Looks up a component schema by name.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<&ObjectSchema> {
        self.schemas.get(name)
    }
}

fn methods(item: &PathItem) -> impl Iterator<Item = (HttpMethod, &OperationDoc)> {
    [
        (HttpMethod::Get, item.get.as_ref()),
        (HttpMethod::Put, item.put.as_ref()),
        (HttpMethod::Post, item.post.as_ref()),
        (HttpMethod::Delete, item.delete.as_ref()),
        (HttpMethod::Patch, item.patch.as_ref()),
    ]
    .into_iter()
    .filter_map(|(method, doc)| doc.map(|d| (method, d)))
}

fn compile_operation(
    method: HttpMethod,
    template: &PathTemplate,
    item: &PathItem,
    doc: &OperationDoc,
    schemas: &BTreeMap<String, ObjectSchema>,
) -> Result<Operation, DefinitionError> {
    let parameters = compile_parameters(template, &item.parameters, &doc.parameters)?;

    let request_body = doc
        .request_body
        .as_ref()
        .map(|body| {
            let (content_type, media) = body.content.iter().next().ok_or_else(|| {
                DefinitionError::UnsupportedSchema {
                    location: format!("{} requestBody", doc.operation_id),
                    reason: "no content declared".to_string(),
                }
            })?;
            if body.content.len() > 1 || content_type != JSON_CONTENT_TYPE {
                return Err(DefinitionError::UnsupportedContentType {
                    operation: doc.operation_id.clone(),
                    content_type: body.content.keys().cloned().collect::<Vec<_>>().join(", "),
                });
            }
            Ok(RequestBodySpec {
                required: body.required,
                content_type: content_type.clone(),
                schema: resolve_body_schema(&doc.operation_id, &media.schema, schemas)?,
            })
        })
        .transpose()?;

    let mut responses = doc
        .responses
        .iter()
        .map(|(status, response)| {
            status
                .parse::<u16>()
                .ok()
                .filter(|code| (100..600).contains(code))
                .map(|status| DeclaredResponse {
                    status,
                    description: response.description.clone(),
                })
                .ok_or_else(|| DefinitionError::InvalidResponseStatus {
                    operation: doc.operation_id.clone(),
                    status: status.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    responses.sort_by_key(|r| r.status);

    if !responses.iter().any(|r| (200..300).contains(&r.status)) {
        return Err(DefinitionError::NoSuccessResponse(doc.operation_id.clone()));
    }

    Ok(Operation {
        id: doc.operation_id.clone(),
        method,
        path: template.clone(),
        parameters,
        request_body,
        responses,
    })
}

fn compile_parameters(
    template: &PathTemplate,
    shared: &[ParameterDoc],
    own: &[ParameterDoc],
) -> Result<Vec<PathParameter>, DefinitionError> {
    let mismatch = |reason: String| DefinitionError::PathParameterMismatch {
        template: template.to_string(),
        reason,
    };

    // operation-level parameters override path-level ones of the same name
    let mut declared: BTreeMap<&str, &ParameterDoc> = BTreeMap::new();
    for param in shared.iter().chain(own).filter(|p| p.location == "path") {
        declared.insert(param.name.as_str(), param);
    }

    let mut parameters = Vec::new();
    for variable in template.variables() {
        let param = declared
            .remove(variable)
            .ok_or_else(|| mismatch(format!("'{variable}' has no path parameter")))?;
        if !param.required {
            return Err(mismatch(format!("path parameter '{variable}' must be required")));
        }
        let field_type = match &param.schema {
            Some(schema) => compile_field(&format!("parameter {variable}"), schema)?,
            None => FieldType::String,
        };
        parameters.push(PathParameter {
            name: variable.to_string(),
            field_type,
        });
    }

    if let Some(extra) = declared.keys().next() {
        return Err(mismatch(format!("parameter '{extra}' is not in the template")));
    }
    Ok(parameters)
}

fn resolve_body_schema(
    operation: &str,
    doc: &SchemaDoc,
    schemas: &BTreeMap<String, ObjectSchema>,
) -> Result<ObjectSchema, DefinitionError> {
    match &doc.reference {
        Some(reference) => reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .and_then(|name| schemas.get(name))
            .cloned()
            .ok_or_else(|| DefinitionError::UnresolvedReference(reference.clone())),
        None => compile_object(&format!("{operation}Body"), doc),
    }
}

fn compile_object(name: &str, doc: &SchemaDoc) -> Result<ObjectSchema, DefinitionError> {
    if doc.kind.as_deref() != Some("object") {
        return Err(DefinitionError::UnsupportedSchema {
            location: name.to_string(),
            reason: format!(
                "expected type 'object', found {}",
                doc.kind.as_deref().unwrap_or("no type")
            ),
        });
    }

    if let Some(missing) = doc.required.iter().find(|r| !doc.properties.contains_key(*r)) {
        return Err(DefinitionError::UnsupportedSchema {
            location: name.to_string(),
            reason: format!("required field '{missing}' is not declared"),
        });
    }

    let mut schema = ObjectSchema::new(name)
        .with_additional_properties(doc.additional_properties.unwrap_or(true));
    for (field, property) in &doc.properties {
        let field_type = compile_field(&format!("{name}.{field}"), property)?;
        let field_schema = if doc.required.contains(field) {
            FieldSchema::required(field.clone(), field_type)
        } else {
            FieldSchema::optional(field.clone(), field_type)
        };
        schema = schema.with_field(field_schema);
    }
    Ok(schema)
}

fn compile_field(location: &str, doc: &SchemaDoc) -> Result<FieldType, DefinitionError> {
    let unsupported = |reason: String| DefinitionError::UnsupportedSchema {
        location: location.to_string(),
        reason,
    };

    if doc.reference.is_some() {
        return Err(unsupported("nested references are not supported".to_string()));
    }

    match (doc.kind.as_deref(), &doc.enumeration) {
        (Some("string"), Some(members)) if members.is_empty() => {
            Err(unsupported("enum must declare at least one member".to_string()))
        }
        (Some("string"), Some(members)) => Ok(FieldType::Enum(members.clone())),
        (Some("string"), None) => Ok(FieldType::String),
        (Some("integer"), None) => Ok(FieldType::Integer),
        (Some("number"), None) => Ok(FieldType::Number),
        (Some("boolean"), None) => Ok(FieldType::Boolean),
        (Some(kind), Some(_)) => Err(unsupported(format!("enum on type '{kind}'"))),
        (Some(kind), None) => Err(unsupported(format!("type '{kind}'"))),
        (None, _) => Err(unsupported("missing type".to_string())),
    }
}
