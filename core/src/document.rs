//! Serde model of the OpenAPI 3 subset the definition loader understands.
//!
//! Only the fields the compiler reads are modelled; everything else in the
//! document (summaries, descriptions, servers, ...) is ignored.

use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub(crate) struct Document {
    pub openapi: String,
    pub info: Info,
    #[serde(default)]
    pub paths: BTreeMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Info {
    pub title: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Components {
    #[serde(default)]
    pub schemas: BTreeMap<String, SchemaDoc>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct PathItem {
    pub get: Option<OperationDoc>,
    pub put: Option<OperationDoc>,
    pub post: Option<OperationDoc>,
    pub delete: Option<OperationDoc>,
    pub patch: Option<OperationDoc>,
    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OperationDoc {
    pub operation_id: String,
    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,
    pub request_body: Option<RequestBodyDoc>,
    #[serde(default)]
    pub responses: BTreeMap<String, ResponseDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ParameterDoc {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<SchemaDoc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RequestBodyDoc {
    #[serde(default)]
    pub required: bool,
    pub content: BTreeMap<String, MediaTypeDoc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaTypeDoc {
    pub schema: SchemaDoc,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseDoc {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaDoc {
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaDoc>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(rename = "enum")]
    pub enumeration: Option<Vec<String>>,
    pub additional_properties: Option<bool>,
}
