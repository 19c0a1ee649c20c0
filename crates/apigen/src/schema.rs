//! Schema builder: OpenAPI schemas to backend expressions and types.
//!
//! [`build_schema`] turns one schema position into an [`ExpressionWithType`].
//! Component references are registered in the session as named
//! declarations the first time they are reached, after everything they
//! depend on eagerly, so declaration order is always a valid evaluation
//! order.
//!
//! # Cycles
//!
//! A reference to a component that is still being built cannot point at its
//! constant yet. The builder re-enters the component once more in a
//! types-only pass to compute its decoded and encoded types, then emits a
//! lazy thunk annotated with those types. A reference reached during that
//! types-only pass yields only `decoded<typeof Name>` and stops recursion.

use crate::document::{Document, SCHEMA_REF_PREFIX, Schema, SchemaOrRef, SchemaType};
use crate::error::{Error, Result};
use crate::keys::get_key;
use crate::options::DeprecationHandling;
use crate::session::{ExpressionWithType, GenerationSession, TypeMeta};
use apigen_syntax::{Arrow, ArrowBody, Expr, Literal, Property, Stmt, TsType, TypeMember};
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::{debug, trace};

const MAX_REF_HOPS: usize = 10;

/// Stands in for boolean schema `true`.
static ANY_SCHEMA: LazyLock<Schema> = LazyLock::new(Schema::default);

/// Follow `$ref`s to the inline schema they name.
pub fn resolve_schema<'d>(document: &'d Document, schema: &'d SchemaOrRef) -> Result<&'d Schema> {
    let mut current = schema;
    for _ in 0..=MAX_REF_HOPS {
        match current {
            SchemaOrRef::Schema(schema) => return Ok(schema),
            SchemaOrRef::Bool(true) => return Ok(LazyLock::force(&ANY_SCHEMA)),
            SchemaOrRef::Bool(false) => return Err(Error::unsupported("boolean schema `false`")),
            SchemaOrRef::Ref(reference) => {
                let name = schema_ref_name(&reference.reference)?;
                current = document.components.schemas.get(name).ok_or_else(|| {
                    Error::unsupported(format!("missing $ref {}", reference.reference))
                })?;
            }
        }
    }
    Err(Error::unsupported(format!(
        "too many $ref hops (more than {MAX_REF_HOPS})"
    )))
}

fn schema_ref_name(reference: &str) -> Result<&str> {
    reference
        .strip_prefix(SCHEMA_REF_PREFIX)
        .ok_or_else(|| Error::unsupported(format!("$ref {reference}")))
}

/// Build a schema position.
pub fn build_schema(
    session: &mut GenerationSession<'_>,
    schema: &SchemaOrRef,
) -> Result<ExpressionWithType> {
    let variants = flatten(schema);
    let mut results = Vec::with_capacity(variants.len());
    for variant in &variants {
        let base = build_variant(session, variant)?;
        results.push(apply_modifiers(session, base, variant));
    }

    let mut result = match results.len() {
        0 => return Err(Error::unsupported("schema with no variants")),
        1 => results.remove(0),
        _ => union_of(session, results),
    };

    // Per-variant modifiers cannot see nullability of a schema that was split.
    if let Some(inline) = schema.as_schema() {
        if inline.nullable && is_composite(inline) {
            result = make_nullable(session, result);
        }
    }
    Ok(result)
}

/// Build the component schema `name`, registering it on first use.
pub fn ensure_named_schema(
    session: &mut GenerationSession<'_>,
    name: &str,
) -> Result<ExpressionWithType> {
    let document = session.document;
    let backend = session.backend;
    let ident = get_key(name)?.upper;
    let resolved = document.components.schemas.get(name).ok_or_else(|| {
        Error::unsupported(format!("missing $ref {SCHEMA_REF_PREFIX}{name}"))
    })?;
    let type_only = || {
        ExpressionWithType::new(
            Expr::null(),
            backend.types.decoded_of(&ident),
            backend.types.encoded_of(&ident),
        )
    };

    if session.processing_schemas.contains(name) {
        if session.processing_schema_types.contains(name) {
            trace!(schema = name, "type-only reference");
            return Ok(type_only());
        }

        session.processing_schema_types.insert(name.to_string());
        let typed = build_schema(session, resolved);
        session.processing_schema_types.remove(name);
        let typed = typed?;

        trace!(schema = name, "deferring cyclic reference");
        let thunk = Expr::Arrow(Box::new(Arrow {
            params: vec![],
            body: ArrowBody::Expr(Expr::ident(&ident)),
            is_async: false,
            return_type: Some(
                backend
                    .types
                    .schema_of(typed.type_decoded, typed.type_encoded),
            ),
        }));
        let deferred = type_only();
        return Ok(ExpressionWithType {
            expression: (backend.modifiers.lazy)(thunk),
            ..deferred
        });
    }

    if !session.is_registered(name) {
        session.claim(&ident, &format!("schema `{name}`"))?;
        session.processing_schemas.insert(name.to_string());
        let built = build_schema(session, resolved);
        session.processing_schemas.remove(name);
        let built = built?;

        let annotation = session.options.include_types.then(|| {
            backend
                .types
                .schema_of(built.type_decoded.clone(), built.type_encoded.clone())
        });
        session.register(
            name,
            vec![
                Stmt::export_const(&ident, annotation, built.expression),
                Stmt::export_type(&ident, backend.types.decoded_of(&ident)),
            ],
        );
        session
            .schema_type_meta
            .insert(name.to_string(), built.type_meta);
        debug!(schema = name, ident = %ident, "registered schema");
    }

    let meta = session
        .schema_type_meta
        .get(name)
        .copied()
        .unwrap_or_default();
    Ok(ExpressionWithType {
        expression: Expr::ident(&ident),
        ..type_only()
    }
    .with_meta(meta))
}

/// `oneOf`/`anyOf` members and `type` lists become separate variants.
fn flatten(schema: &SchemaOrRef) -> Vec<Cow<'_, SchemaOrRef>> {
    let members: Vec<&SchemaOrRef> = match schema.as_schema() {
        Some(inline) => match inline.one_of.as_ref().or(inline.any_of.as_ref()) {
            Some(members) => members.iter().collect(),
            None => vec![schema],
        },
        None => vec![schema],
    };
    members.into_iter().flat_map(split_types).collect()
}

fn split_types(schema: &SchemaOrRef) -> Vec<Cow<'_, SchemaOrRef>> {
    if let Some(inline) = schema.as_schema() {
        if let Some(SchemaType::Multiple(types)) = &inline.ty {
            if types.len() > 1 {
                return types
                    .iter()
                    .map(|ty| {
                        let mut variant = inline.clone();
                        variant.ty = Some(SchemaType::Single(ty.clone()));
                        variant.nullable = false;
                        Cow::Owned(SchemaOrRef::inline(variant))
                    })
                    .collect();
            }
        }
    }
    vec![Cow::Borrowed(schema)]
}

fn is_composite(schema: &Schema) -> bool {
    schema.one_of.is_some()
        || schema.any_of.is_some()
        || matches!(&schema.ty, Some(SchemaType::Multiple(types)) if types.len() > 1)
}

fn build_variant(
    session: &mut GenerationSession<'_>,
    variant: &SchemaOrRef,
) -> Result<ExpressionWithType> {
    match variant {
        SchemaOrRef::Ref(reference) => {
            let name = schema_ref_name(&reference.reference)?;
            ensure_named_schema(session, name)
        }
        SchemaOrRef::Bool(true) => Ok(unknown(session)),
        SchemaOrRef::Bool(false) => Err(Error::unsupported("boolean schema `false`")),
        SchemaOrRef::Schema(schema) => build_inline(session, schema),
    }
}

fn build_inline(session: &mut GenerationSession<'_>, schema: &Schema) -> Result<ExpressionWithType> {
    let backend = session.backend;
    let options = session.options;
    let mut meta = TypeMeta::default();

    if schema.deprecated {
        match options.deprecation_handling {
            DeprecationHandling::Optional => meta.optional = true,
            DeprecationHandling::Unknown => {
                // The containing object applies the optional modifier.
                meta.optional = true;
                return Ok(ExpressionWithType::symmetric(
                    backend.primitives.unknown.clone(),
                    TsType::union(vec![TsType::Unknown, TsType::Undefined]),
                )
                .with_meta(meta));
            }
        }
    }

    if let Some(hook) = &options.custom {
        if let Some(reference) = hook(schema) {
            let callee = session
                .imports
                .ensure_import(&reference.name, &reference.from, false);
            let returned = TsType::generic("ReturnType", vec![TsType::query(&reference.name)]);
            return Ok(ExpressionWithType::new(
                Expr::call(callee, vec![]),
                TsType::generic(backend.types.decoded, vec![returned.clone()]),
                TsType::generic(backend.types.encoded, vec![returned]),
            )
            .with_meta(meta));
        }
    }

    if let Some(members) = &schema.all_of {
        return build_all_of(session, members, meta);
    }

    if let Some(values) = &schema.enumeration {
        return Ok(build_enum(session, values)?.with_meta(meta));
    }

    let ty = schema.single_type().or_else(|| {
        let object_like = !schema.properties.is_empty() || schema.additional_properties.is_some();
        object_like.then_some("object")
    });
    let primitives = &backend.primitives;
    let result = match ty {
        Some("boolean") => ExpressionWithType::symmetric(primitives.boolean.clone(), TsType::Boolean),
        Some("string") if schema.format.as_deref() == Some("binary") => {
            ExpressionWithType::symmetric(backend.instance_of("Blob"), TsType::reference("Blob"))
        }
        Some("string") => {
            let mut expression = primitives.string.clone();
            if let Some(pattern) = &schema.pattern {
                expression = (backend.modifiers.regex)(expression, pattern);
            }
            ExpressionWithType::symmetric(expression, TsType::String)
        }
        Some("number") => ExpressionWithType::symmetric(primitives.number.clone(), TsType::Number),
        Some("integer") => ExpressionWithType::symmetric(primitives.integer.clone(), TsType::Number),
        Some("null") => ExpressionWithType::symmetric(primitives.null.clone(), TsType::Null),
        Some("object") => return build_object(session, schema, meta),
        Some("array") => return build_array(session, schema, meta),
        Some(other) => return Err(Error::unsupported(format!("schema type `{other}`"))),
        None => unknown(session),
    };
    Ok(result.with_meta(meta))
}

fn build_all_of(
    session: &mut GenerationSession<'_>,
    members: &[SchemaOrRef],
    mut meta: TypeMeta,
) -> Result<ExpressionWithType> {
    let backend = session.backend;
    let mut results = Vec::with_capacity(members.len());
    for member in members {
        results.push(build_schema(session, member)?);
    }
    if results.len() <= 1 {
        let mut single = results.pop().unwrap_or_else(|| unknown(session));
        single.type_meta.optional |= meta.optional;
        return Ok(single);
    }

    let all_objects = results.iter().all(|r| r.type_meta.is_object);
    let combinators = &backend.combinators;
    let combine = if all_objects {
        combinators.object_extend.or(combinators.intersection)
    } else {
        combinators.intersection
    };
    let combine = combine.ok_or_else(|| {
        Error::unsupported(format!("allOf with the {} backend", backend.name))
    })?;

    let mut expressions = Vec::with_capacity(results.len());
    let mut decoded = Vec::with_capacity(results.len());
    let mut encoded = Vec::with_capacity(results.len());
    for result in results {
        expressions.push(result.expression);
        decoded.push(result.type_decoded);
        encoded.push(result.type_encoded);
    }
    meta.is_object = all_objects;
    Ok(ExpressionWithType::new(
        combine(expressions),
        TsType::Intersection(decoded),
        TsType::Intersection(encoded),
    )
    .with_meta(meta))
}

/// Literal enumerations of one kind, optionally with `null`.
fn build_enum(session: &GenerationSession<'_>, values: &[Value]) -> Result<ExpressionWithType> {
    let backend = session.backend;
    let mut literals = Vec::with_capacity(values.len());
    let mut kind: Option<&'static str> = None;
    let mut has_null = false;

    for value in values {
        let (literal, value_kind) = match value {
            Value::Null => {
                has_null = true;
                continue;
            }
            Value::String(s) => (Literal::String(s.clone()), "string"),
            Value::Bool(b) => (Literal::Bool(*b), "boolean"),
            Value::Number(n) => {
                let n = n
                    .as_f64()
                    .ok_or_else(|| Error::unsupported(format!("enum value {n}")))?;
                (Literal::Number(n), "number")
            }
            other => return Err(Error::unsupported(format!("enum value {other}"))),
        };
        match kind {
            Some(existing) if existing != value_kind => {
                return Err(Error::unsupported(format!(
                    "enum mixing {existing} and {value_kind} values"
                )));
            }
            _ => kind = Some(value_kind),
        }
        literals.push(literal);
    }

    if literals.is_empty() {
        if has_null {
            return Ok(ExpressionWithType::symmetric(
                backend.primitives.null.clone(),
                TsType::Null,
            ));
        }
        return Err(Error::unsupported("enum without values"));
    }

    let ty = TsType::union(literals.iter().cloned().map(TsType::Literal).collect());
    let expression = (backend.combinators.enumeration)(literals.into_iter().map(Expr::Literal).collect());
    let result = ExpressionWithType::symmetric(expression, ty);
    Ok(if has_null {
        make_nullable(session, result)
    } else {
        result
    })
}

fn build_object(
    session: &mut GenerationSession<'_>,
    schema: &Schema,
    mut meta: TypeMeta,
) -> Result<ExpressionWithType> {
    let backend = session.backend;
    let mut properties = Vec::with_capacity(schema.properties.len());
    let mut decoded = Vec::with_capacity(schema.properties.len());
    let mut encoded = Vec::with_capacity(schema.properties.len());

    for (key, property) in &schema.properties {
        let built = build_schema(session, property)?;
        let optional = built.type_meta.optional || !schema.required.contains(key);
        let readonly = built.type_meta.readonly;
        let expression = if optional {
            (backend.modifiers.optional)(built.expression)
        } else {
            built.expression
        };
        let comment = property.as_schema().and_then(|p| p.description.clone());
        properties.push(Property::new(key.clone(), expression).with_comment(comment));
        decoded.push(TypeMember {
            name: key.clone(),
            ty: built.type_decoded,
            optional,
            readonly,
        });
        encoded.push(TypeMember {
            name: key.clone(),
            ty: built.type_encoded,
            optional,
            readonly,
        });
    }

    let object = backend.object(Expr::object(properties));
    let decoded = TsType::Object(decoded);
    let encoded = TsType::Object(encoded);
    meta.is_object = true;

    let extra = match &schema.additional_properties {
        None | Some(SchemaOrRef::Bool(false)) => {
            return Ok(ExpressionWithType::new(object, decoded, encoded).with_meta(meta));
        }
        Some(extra) => build_schema(session, extra)?,
    };
    let record_decoded = TsType::generic("Record", vec![TsType::String, extra.type_decoded]);
    let record_encoded = TsType::generic("Record", vec![TsType::String, extra.type_encoded]);

    if schema.properties.is_empty() {
        meta.is_object = false;
        let expression =
            (backend.combinators.record)(backend.primitives.string.clone(), extra.expression);
        return Ok(ExpressionWithType::new(expression, record_decoded, record_encoded).with_meta(meta));
    }

    Ok(ExpressionWithType::new(
        (backend.combinators.catchall)(object, extra.expression),
        TsType::Intersection(vec![decoded, record_decoded]),
        TsType::Intersection(vec![encoded, record_encoded]),
    )
    .with_meta(meta))
}

fn build_array(
    session: &mut GenerationSession<'_>,
    schema: &Schema,
    meta: TypeMeta,
) -> Result<ExpressionWithType> {
    let backend = session.backend;
    let item = match &schema.items {
        Some(items) => build_schema(session, items)?,
        None => unknown(session),
    };
    let mut result = ExpressionWithType::new(
        backend.array(item.expression),
        TsType::array(item.type_decoded),
        TsType::array(item.type_encoded),
    )
    .with_meta(meta);

    if backend.supports_immutability {
        if item.type_meta.readonly {
            result.expression = (backend.modifiers.immutable)(result.expression);
            result.type_decoded = TsType::Readonly(Box::new(result.type_decoded));
            result.type_encoded = TsType::Readonly(Box::new(result.type_encoded));
        } else {
            result.expression = (backend.modifiers.mutable)(result.expression);
        }
    }
    Ok(result)
}

/// `readOnly` and `nullable` for inline schemas; references keep the
/// modifiers of their declaration.
fn apply_modifiers(
    session: &GenerationSession<'_>,
    mut result: ExpressionWithType,
    variant: &SchemaOrRef,
) -> ExpressionWithType {
    let Some(schema) = variant.as_schema() else {
        return result;
    };
    let backend = session.backend;
    if backend.supports_immutability {
        if schema.read_only {
            result.expression = (backend.modifiers.immutable)(result.expression);
            result.type_meta.readonly = true;
        } else if result.type_meta.is_object {
            result.expression = (backend.modifiers.mutable)(result.expression);
        }
    }
    if schema.nullable && !is_composite(schema) {
        result = make_nullable(session, result);
    }
    result
}

fn make_nullable(session: &GenerationSession<'_>, result: ExpressionWithType) -> ExpressionWithType {
    ExpressionWithType {
        expression: (session.backend.modifiers.nullable)(result.expression),
        type_decoded: TsType::union(vec![result.type_decoded, TsType::Null]),
        type_encoded: TsType::union(vec![result.type_encoded, TsType::Null]),
        type_meta: result.type_meta,
    }
}

fn union_of(session: &GenerationSession<'_>, results: Vec<ExpressionWithType>) -> ExpressionWithType {
    let mut expressions = Vec::with_capacity(results.len());
    let mut decoded = Vec::with_capacity(results.len());
    let mut encoded = Vec::with_capacity(results.len());
    for result in results {
        expressions.push(result.expression);
        decoded.push(result.type_decoded);
        encoded.push(result.type_encoded);
    }
    ExpressionWithType::new(
        (session.backend.combinators.union)(expressions),
        TsType::union(decoded),
        TsType::union(encoded),
    )
}

fn unknown(session: &GenerationSession<'_>) -> ExpressionWithType {
    ExpressionWithType::symmetric(session.backend.primitives.unknown.clone(), TsType::Unknown)
}
