//! `multipart/form-data` request bodies.

use crate::backend::{Transformer, not_implemented};
use crate::document::{Schema, SchemaOrRef};
use crate::error::Result;
use crate::schema::resolve_schema;
use crate::session::GenerationSession;
use apigen_syntax::{ArrowBody, BinaryOp, Expr, Stmt};

/// Codec from the decoded body object to a `FormData` with one entry per
/// property, and one entry per element for array properties.
pub fn encode_form_data(
    session: &GenerationSession<'_>,
    schema: &SchemaOrRef,
    decoded: Expr,
) -> Result<Expr> {
    let document = session.document;
    let backend = session.backend;
    let resolved = resolve_schema(document, schema)?;

    let mut body = vec![Stmt::const_decl(
        "formData",
        Expr::new_(Expr::ident("FormData"), vec![]),
    )];
    for (key, property) in &resolved.properties {
        let value = Expr::index(Expr::ident("from"), Expr::string(key));
        let required = resolved.required.contains(key);
        let property = resolve_schema(document, property)?;
        if property.single_type() == Some("array") {
            let item = match &property.items {
                Some(items) => Some(resolve_schema(document, items)?),
                None => None,
            };
            let values = if required {
                value
            } else {
                Expr::binary(value, BinaryOp::Nullish, Expr::array(vec![]))
            };
            body.push(Stmt::for_of(
                "propertyValue",
                values,
                Stmt::block(vec![append(
                    key,
                    maybe_stringify(Expr::ident("propertyValue"), item),
                )]),
            ));
        } else if required {
            body.push(append(key, maybe_stringify(value, Some(property))));
        } else {
            // Absent optional fields get no entry.
            body.push(Stmt::if_then(
                Expr::binary(value.clone(), BinaryOp::Ne, Expr::ident("undefined")),
                Stmt::block(vec![append(key, maybe_stringify(value, Some(property)))]),
            ));
        }
    }
    body.push(Stmt::return_stmt(Some(Expr::ident("formData"))));

    Ok((backend.transformer)(Transformer::new(
        backend.instance_of("FormData"),
        decoded,
        not_implemented(),
        ArrowBody::Block(body),
    )))
}

fn append(key: &str, value: Expr) -> Stmt {
    Stmt::expr(Expr::method(
        Expr::ident("formData"),
        "append",
        vec![Expr::string(key), value],
    ))
}

/// Objects and arrays as JSON text, strings and blobs as they are,
/// everything else through `String`.
fn maybe_stringify(value: Expr, schema: Option<&Schema>) -> Expr {
    match schema.and_then(Schema::single_type) {
        Some("object") | Some("array") => {
            Expr::method(Expr::ident("JSON"), "stringify", vec![value])
        }
        Some("string") => value,
        _ => Expr::call(Expr::ident("String"), vec![value]),
    }
}
