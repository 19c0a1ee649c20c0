//! Parameter codecs: decoded call arguments to a transport request.
//!
//! For each operation a `{Key}_Parameters` codec is registered. Its decoded
//! side is an object with one member per parameter plus `data` for the
//! request body. Encoding produces the shared `ParametersSchema` shape:
//!
//! ```text
//! { path: `/pets/${from.id}?${new URLSearchParams([...])}`,
//!   headers: new Headers([...]),
//!   body: from.data }
//! ```

use crate::backend::{Transformer, not_implemented};
use crate::document::{Document, OperationRef, PARAMETER_REF_PREFIX, Parameter, ParameterLocation};
use crate::error::{Error, Result};
use crate::keys::OperationKey;
use crate::path::build_path_expression;
use crate::request::build_request_body;
use crate::schema::{build_schema, resolve_schema};
use crate::session::{GenerationSession, NamedCodec};
use apigen_syntax::{ArrowBody, BinaryOp, Expr, Param, Property, Stmt, TsType};
use indexmap::IndexMap;
use tracing::debug;

pub const PARAMETERS_SCHEMA: &str = "ParametersSchema";

/// Register the shared transport request schema once and return its name.
pub fn ensure_parameters_schema(session: &mut GenerationSession<'_>) -> Expr {
    if !session.is_registered(PARAMETERS_SCHEMA) {
        let backend = session.backend;
        let optional = backend.modifiers.optional;
        let body = (backend.combinators.union)(vec![
            backend.primitives.string.clone(),
            backend.instance_of("Blob"),
            backend.instance_of("FormData"),
            backend.instance_of("URLSearchParams"),
        ]);
        let schema = backend.object(Expr::object(vec![
            Property::new("path", backend.primitives.string.clone()),
            Property::new("headers", optional(backend.instance_of("Headers"))),
            Property::new("body", optional(body)),
        ]));
        session.register(
            PARAMETERS_SCHEMA,
            vec![Stmt::export_const(PARAMETERS_SCHEMA, None, schema)],
        );
    }
    Expr::ident(PARAMETERS_SCHEMA)
}

/// Path-item parameters first, unless the operation redeclares them, then
/// the operation's own parameters.
fn collect_parameters<'d>(
    document: &'d Document,
    operation: &OperationRef<'d>,
    context: &str,
) -> Result<Vec<&'d Parameter>> {
    let components = &document.components.parameters;
    let own = operation
        .operation
        .parameters
        .iter()
        .map(|p| p.resolve(PARAMETER_REF_PREFIX, components, context))
        .collect::<Result<Vec<_>>>()?;

    let mut all = Vec::with_capacity(own.len() + operation.path_parameters.len());
    for shared in operation.path_parameters {
        let shared = shared.resolve(PARAMETER_REF_PREFIX, components, context)?;
        let overridden = own
            .iter()
            .any(|p| p.name == shared.name && p.location == shared.location);
        if !overridden {
            all.push(shared);
        }
    }
    all.extend(own);
    Ok(all)
}

fn from_member(name: &str) -> Expr {
    Expr::member(Expr::ident("from"), name)
}

/// `["name", String(from.name)]`
fn pair(name: &str) -> Expr {
    Expr::array(vec![
        Expr::string(name),
        Expr::call(Expr::ident("String"), vec![from_member(name)]),
    ])
}

/// A `[name, value]` entry for a scalar parameter. Optional values are
/// spread in only when present.
fn scalar_entry(name: &str, required: bool) -> Expr {
    if required {
        return pair(name);
    }
    Expr::spread(Expr::conditional(
        Expr::binary(from_member(name), BinaryOp::Eq, Expr::ident("undefined")),
        Expr::array(vec![]),
        Expr::array(vec![pair(name)]),
    ))
}

/// `...(from.name?.map<[string, string]>((value) => ["name", String(value)]) ?? [])`
fn array_entries(name: &str) -> Expr {
    let map = Expr::call_generic(
        Expr::optional_member(from_member(name), "map"),
        vec![TsType::Tuple(vec![TsType::String, TsType::String])],
        vec![Expr::arrow(
            vec![Param::new("value")],
            Expr::array(vec![
                Expr::string(name),
                Expr::call(Expr::ident("String"), vec![Expr::ident("value")]),
            ]),
        )],
    );
    Expr::spread(Expr::binary(map, BinaryOp::Nullish, Expr::array(vec![])))
}

/// How generated identifiers name the operation they come from.
pub fn operation_source(operation: &OperationRef<'_>) -> String {
    format!("operation `{} {}`", operation.method, operation.path)
}

/// Build and register `{Key}_Parameters` for `operation`.
pub fn build_parameters(
    session: &mut GenerationSession<'_>,
    key: &OperationKey,
    operation: &OperationRef<'_>,
) -> Result<NamedCodec> {
    let document = session.document;
    let backend = session.backend;
    let name = format!("{}_Parameters", key.upper);
    session.claim(&name, &operation_source(operation))?;
    let parameters = collect_parameters(document, operation, &format!("parameters of {}", key.upper))?;

    let mut properties = Vec::with_capacity(parameters.len() + 1);
    let mut path_params = IndexMap::new();
    let mut query = Vec::new();
    let mut headers = Vec::new();

    for parameter in parameters {
        if parameter.location == ParameterLocation::Cookie {
            return Err(Error::unsupported(format!(
                "parameter `{}` in {} in {}",
                parameter.name,
                parameter.location.as_str(),
                key.upper
            )));
        }
        let schema = parameter.schema.as_ref().ok_or_else(|| {
            Error::unsupported(format!(
                "parameter `{}` without schema in {}",
                parameter.name, key.upper
            ))
        })?;
        let built = build_schema(session, schema)?;
        let required = parameter.required && !built.type_meta.optional;
        let expression = if required {
            built.expression
        } else {
            (backend.modifiers.optional)(built.expression)
        };
        properties.push(
            Property::new(&parameter.name, expression).with_comment(parameter.description.clone()),
        );

        match parameter.location {
            ParameterLocation::Path => {
                path_params.insert(parameter.name.clone(), from_member(&parameter.name));
            }
            ParameterLocation::Query => {
                let is_array = resolve_schema(document, schema)?.single_type() == Some("array");
                query.push(if is_array {
                    array_entries(&parameter.name)
                } else {
                    scalar_entry(&parameter.name, required)
                });
            }
            ParameterLocation::Header => {
                headers.push(scalar_entry(&parameter.name, required));
            }
            ParameterLocation::Cookie => {}
        }
    }

    let body = build_request_body(session, key, operation.operation)?;
    let has_body = body.is_some();
    if let Some(body) = body {
        let data = if body.required {
            body.data
        } else {
            (backend.modifiers.optional)(body.data)
        };
        properties.push(Property::new("data", data));
        headers.extend(body.headers);
    }

    let query = (!query.is_empty()).then(|| {
        Expr::new_(Expr::ident("URLSearchParams"), vec![Expr::array(query)])
    });
    let mut request = vec![Property::new(
        "path",
        build_path_expression(operation.path, &path_params, query, &key.upper)?,
    )];
    if !headers.is_empty() {
        request.push(Property::new(
            "headers",
            Expr::new_(Expr::ident("Headers"), vec![Expr::array(headers)]),
        ));
    }
    if has_body {
        request.push(Property::new("body", from_member("data")));
    }

    let encoded = ensure_parameters_schema(session);
    let codec = (backend.transformer)(Transformer::new(
        encoded,
        backend.object(Expr::object(properties)),
        not_implemented(),
        ArrowBody::Expr(Expr::object(request)),
    ));
    session.register(&name, vec![Stmt::export_const(&name, None, codec)]);
    debug!(codec = %name, path = operation.path, "registered parameters codec");
    Ok(NamedCodec::new(&name, backend.types.decoded_of(&name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HttpMethod;
    use crate::keys::get_key;
    use crate::options::GeneratorOptions;
    use apigen_syntax::{Program, TypeScriptWriter};
    use serde_json::{Value, json};

    fn emit_parameters(path_item: Value) -> Result<String> {
        let document = Document::from_value(json!({
            "openapi": "3.0.0",
            "paths": {"/pets/{petId}": path_item},
            "components": {
                "parameters": {
                    "Trace": {"name": "x-trace-id", "in": "header", "required": true, "schema": {"type": "string"}}
                },
                "requestBodies": {
                    "PetBody": {"required": true, "content": {"application/json": {"schema": {"type": "object"}}}}
                }
            }
        }))
        .unwrap();
        let options = GeneratorOptions::default();
        let backend = options.backend.backend();
        let mut session = GenerationSession::new(&document, &backend, &options);
        let operation = document
            .operations()
            .find(|op| op.method == HttpMethod::Put)
            .unwrap();
        let codec = build_parameters(&mut session, &get_key("updatePet").unwrap(), &operation)?;
        assert_eq!(codec.name, "UpdatePet_Parameters");
        Ok(TypeScriptWriter::emit(&Program::new(
            session.schemas.into_values().flatten().collect(),
        )))
    }

    #[test]
    fn test_full_parameters_codec() {
        let out = emit_parameters(json!({
            "parameters": [
                {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}
            ],
            "put": {
                "parameters": [
                    {"name": "tags", "in": "query", "schema": {"type": "array", "items": {"type": "string"}}},
                    {"name": "limit", "in": "query", "required": true, "schema": {"type": "integer"}, "description": "Page size"},
                    {"$ref": "#/components/parameters/Trace"}
                ],
                "requestBody": {"$ref": "#/components/requestBodies/PetBody"},
                "responses": {}
            }
        }))
        .unwrap();
        insta::assert_snapshot!(out, @r#"
        export const ParametersSchema = z.object({
          path: z.string(),
          headers: z.instanceof(Headers).optional(),
          body: z.union([z.string(), z.instanceof(Blob), z.instanceof(FormData), z.instanceof(URLSearchParams)]).optional(),
        });

        export const UpdatePet_Parameters = z.codec(ParametersSchema, z.object({
          petId: z.int(),
          tags: z.array(z.string()).optional(),
          /** Page size */
          limit: z.int(),
          "x-trace-id": z.string(),
          data: z.codec(z.string(), z.object({}), {
            decode: (from, ctx) => {
              throw new Error("Not implemented");
            },
            encode: (from, ctx) => JSON.stringify(from),
          }),
        }), {
          decode: (from, ctx) => {
            throw new Error("Not implemented");
          },
          encode: (from, ctx) => ({
            path: `/pets/${from.petId}?${new URLSearchParams([...(from.tags?.map<[string, string]>((value) => ["tags", String(value)]) ?? []), ["limit", String(from.limit)]])}`,
            headers: new Headers([["x-trace-id", String(from["x-trace-id"])], ["Content-Type", "application/json"]]),
            body: from.data,
          }),
        });
        "#);
    }

    #[test]
    fn test_optional_scalar_query_is_skipped_when_undefined() {
        let out = emit_parameters(json!({
            "put": {
                "parameters": [
                    {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}},
                    {"name": "q", "in": "query", "schema": {"type": "string"}}
                ],
                "responses": {}
            }
        }))
        .unwrap();
        assert!(out.contains(
            r#"path: `/pets/${from.petId}?${new URLSearchParams([...((from.q === undefined) ? [] : [["q", String(from.q)]])])}`,"#
        ));
        assert!(!out.contains("headers: new Headers"));
        assert!(!out.contains("body: from.data"));
    }

    #[test]
    fn test_operation_overrides_path_parameter() {
        let out = emit_parameters(json!({
            "parameters": [
                {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}
            ],
            "put": {
                "parameters": [
                    {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}}
                ],
                "responses": {}
            }
        }))
        .unwrap();
        assert!(out.contains("petId: z.string(),"));
        assert!(!out.contains("petId: z.int(),"));
    }

    #[test]
    fn test_deprecated_parameter_is_optional() {
        let out = emit_parameters(json!({
            "put": {
                "parameters": [
                    {"name": "petId", "in": "path", "required": true, "schema": {"type": "string"}},
                    {"name": "old", "in": "query", "required": true, "schema": {"type": "string", "deprecated": true}}
                ],
                "responses": {}
            }
        }))
        .unwrap();
        assert!(out.contains("old: z.unknown().optional(),"));
        assert!(out.contains(r#"[...((from.old === undefined) ? [] : [["old", String(from.old)]])]"#));
    }

    #[test]
    fn test_cookie_parameter_fails() {
        let err = emit_parameters(json!({
            "put": {
                "parameters": [{"name": "session", "in": "cookie", "schema": {"type": "string"}}],
                "responses": {}
            }
        }))
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported construct: parameter `session` in cookie in UpdatePet"
        );
    }

    #[test]
    fn test_parameter_without_schema_fails() {
        let err = emit_parameters(json!({
            "put": {
                "parameters": [{"name": "petId", "in": "path", "required": true}],
                "responses": {}
            }
        }))
        .unwrap_err();
        assert!(err.to_string().contains("parameter `petId` without schema in UpdatePet"));
    }

    #[test]
    fn test_foreign_parameter_ref_fails() {
        let err = emit_parameters(json!({
            "put": {
                "parameters": [{"$ref": "#/components/schemas/Trace"}],
                "responses": {}
            }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedConstruct(_)));
    }
}
