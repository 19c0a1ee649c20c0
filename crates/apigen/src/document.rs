//! OpenAPI 3.x document model.
//!
//! Only the parts of the document that drive generation are modeled. Maps
//! use [`IndexMap`] so document order survives deserialization; emission
//! order follows it.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";
pub const PARAMETER_REF_PREFIX: &str = "#/components/parameters/";
pub const REQUEST_BODY_REF_PREFIX: &str = "#/components/requestBodies/";
pub const RESPONSE_REF_PREFIX: &str = "#/components/responses/";

/// A normalized OpenAPI 3.x document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub openapi: String,
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default)]
    pub schemas: IndexMap<String, SchemaOrRef>,
    #[serde(default)]
    pub parameters: IndexMap<String, RefOr<Parameter>>,
    #[serde(default)]
    pub request_bodies: IndexMap<String, RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
}

/// `{ "$ref": "..." }`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    #[serde(rename = "$ref")]
    pub reference: String,
}

/// Either a `$ref` or an inline value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RefOr<T> {
    Ref(Reference),
    Item(T),
}

/// A schema position: `$ref`, boolean schema, or inline schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref(Reference),
    Bool(bool),
    Schema(Box<Schema>),
}

impl SchemaOrRef {
    /// `{ "$ref": "#/components/schemas/{name}" }`
    pub fn component(name: &str) -> Self {
        SchemaOrRef::Ref(Reference {
            reference: format!("{SCHEMA_REF_PREFIX}{name}"),
        })
    }

    pub fn inline(schema: Schema) -> Self {
        SchemaOrRef::Schema(Box::new(schema))
    }

    pub fn as_schema(&self) -> Option<&Schema> {
        match self {
            SchemaOrRef::Schema(schema) => Some(schema),
            _ => None,
        }
    }
}

/// `type` is a single name or, in OpenAPI 3.1, a list of names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type", default)]
    pub ty: Option<SchemaType>,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(rename = "enum", default)]
    pub enumeration: Option<Vec<Value>>,
    #[serde(default)]
    pub properties: IndexMap<String, SchemaOrRef>,
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub items: Option<SchemaOrRef>,
    #[serde(default)]
    pub additional_properties: Option<SchemaOrRef>,
    #[serde(default)]
    pub one_of: Option<Vec<SchemaOrRef>>,
    #[serde(default)]
    pub any_of: Option<Vec<SchemaOrRef>>,
    #[serde(default)]
    pub all_of: Option<Vec<SchemaOrRef>>,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub read_only: bool,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

impl Schema {
    /// The single declared type name, if exactly one is declared.
    pub fn single_type(&self) -> Option<&str> {
        match &self.ty {
            Some(SchemaType::Single(name)) => Some(name),
            Some(SchemaType::Multiple(names)) if names.len() == 1 => Some(&names[0]),
            _ => None,
        }
    }
}

/// Operations under one path, keyed by method.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    #[serde(default)]
    pub get: Option<Operation>,
    #[serde(default)]
    pub put: Option<Operation>,
    #[serde(default)]
    pub post: Option<Operation>,
    #[serde(default)]
    pub delete: Option<Operation>,
    #[serde(default)]
    pub options: Option<Operation>,
    #[serde(default)]
    pub head: Option<Operation>,
    #[serde(default)]
    pub patch: Option<Operation>,
    #[serde(default)]
    pub trace: Option<Operation>,
    /// Parameters shared by every operation under this path.
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(default)]
    pub operation_id: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RefOr<Parameter>>,
    #[serde(default)]
    pub request_body: Option<RefOr<RequestBody>>,
    #[serde(default)]
    pub responses: IndexMap<String, RefOr<Response>>,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Path => "path",
            ParameterLocation::Header => "header",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "in")]
    pub location: ParameterLocation,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub schema: Option<SchemaOrRef>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaType {
    #[serde(default)]
    pub schema: Option<SchemaOrRef>,
}

/// HTTP methods an OpenAPI path item can declare, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    /// Read-only methods get query descriptors; everything else gets mutations.
    pub fn is_query(self) -> bool {
        matches!(self, HttpMethod::Get | HttpMethod::Head)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One operation together with where it lives in the document.
#[derive(Debug, Clone, Copy)]
pub struct OperationRef<'a> {
    pub path: &'a str,
    pub method: HttpMethod,
    pub operation: &'a Operation,
    pub path_parameters: &'a [RefOr<Parameter>],
}

impl Document {
    /// Normalize a parsed JSON/YAML value into the OpenAPI 3.x model.
    ///
    /// Swagger 2.0 and other versions are rejected; so is any document whose
    /// shape does not match the model.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(version) = value.get("swagger") {
            return Err(Error::DocumentUpgradeFailure {
                message: format!(
                    "Swagger {} documents must be converted to OpenAPI 3.x first",
                    version.as_str().unwrap_or("2.0")
                ),
                cause: None,
            });
        }
        match value.get("openapi").and_then(Value::as_str) {
            Some(version) if version.starts_with("3.") => {}
            Some(version) => {
                return Err(Error::DocumentUpgradeFailure {
                    message: format!("OpenAPI version {version} not supported (expected 3.x)"),
                    cause: None,
                });
            }
            None => {
                return Err(Error::DocumentUpgradeFailure {
                    message: "missing `openapi` version field".to_string(),
                    cause: None,
                });
            }
        }
        serde_json::from_value(value)
            .map_err(|e| Error::upgrade("document does not match the OpenAPI 3.x model", e))
    }

    /// All operations in document order: paths in order, methods in
    /// [`HttpMethod::ALL`] order within each path.
    pub fn operations(&self) -> impl Iterator<Item = OperationRef<'_>> {
        self.paths.iter().flat_map(|(path, item)| {
            HttpMethod::ALL.into_iter().filter_map(move |method| {
                item.operation(method).map(|operation| OperationRef {
                    path,
                    method,
                    operation,
                    path_parameters: &item.parameters,
                })
            })
        })
    }
}

/// Resolve a `$ref` to a named component under `prefix`.
///
/// References into other sections, missing targets and chained references
/// are all unsupported.
pub fn resolve_component<'d, T>(
    reference: &str,
    prefix: &str,
    components: &'d IndexMap<String, RefOr<T>>,
    context: &str,
) -> Result<&'d T> {
    let name = reference.strip_prefix(prefix).ok_or_else(|| {
        Error::unsupported(format!("$ref {reference} in {context}"))
    })?;
    match components.get(name) {
        Some(RefOr::Item(item)) => Ok(item),
        Some(RefOr::Ref(_)) => Err(Error::unsupported(format!(
            "chained $ref {reference} in {context}"
        ))),
        None => Err(Error::unsupported(format!(
            "missing $ref {reference} in {context}"
        ))),
    }
}

impl<T> RefOr<T> {
    /// Inline item, or the component a `$ref` points at.
    pub fn resolve<'d>(
        &'d self,
        prefix: &str,
        components: &'d IndexMap<String, RefOr<T>>,
        context: &str,
    ) -> Result<&'d T> {
        match self {
            RefOr::Item(item) => Ok(item),
            RefOr::Ref(reference) => {
                resolve_component(&reference.reference, prefix, components, context)
            }
        }
    }
}
