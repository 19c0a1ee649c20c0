//! Response codecs: decode a `Response` into the success body.

use crate::backend::{Transformer, not_implemented};
use crate::document::{Operation, RESPONSE_REF_PREFIX, RefOr, Response};
use crate::error::Result;
use crate::keys::OperationKey;
use crate::request::is_json;
use crate::schema::build_schema;
use crate::session::{GenerationSession, NamedCodec};
use apigen_syntax::{ArrowBody, Expr, Stmt, TsType};
use indexmap::IndexMap;
use tracing::debug;

/// `200` if declared, otherwise the first `2XX` entry in document order.
fn success_response(responses: &IndexMap<String, RefOr<Response>>) -> Option<&RefOr<Response>> {
    responses.get("200").or_else(|| {
        responses
            .iter()
            .find(|(status, _)| status.starts_with('2'))
            .map(|(_, response)| response)
    })
}

/// `try { return (await from.read()) as any; } catch (error: unknown) { ... }`
fn read_body(session: &GenerationSession<'_>, read: &str) -> ArrowBody {
    let value = Expr::as_(
        Expr::await_(Expr::method(Expr::ident("from"), read, vec![])),
        TsType::Any,
    );
    ArrowBody::Block(vec![Stmt::try_catch(
        vec![Stmt::return_stmt(Some(value))],
        "error",
        Some(TsType::Unknown),
        (session.backend.transformer_catch)(Expr::ident("error")),
    )])
}

/// Codec from a `Response` to its parsed JSON body.
pub fn decode_json(session: &GenerationSession<'_>, decoded: Expr) -> Expr {
    let backend = session.backend;
    (backend.transformer)(
        Transformer::new(
            backend.instance_of("Response"),
            decoded,
            read_body(session, "json"),
            not_implemented(),
        )
        .async_decode(),
    )
}

/// Codec from a `Response` to its body as a `Blob`.
pub fn decode_blob(session: &GenerationSession<'_>) -> Expr {
    let backend = session.backend;
    (backend.transformer)(
        Transformer::new(
            backend.instance_of("Response"),
            backend.instance_of("Blob"),
            read_body(session, "blob"),
            not_implemented(),
        )
        .async_decode(),
    )
}

/// Build and register `{Key}_Response` for `operation`.
pub fn build_response(
    session: &mut GenerationSession<'_>,
    key: &OperationKey,
    operation: &Operation,
) -> Result<NamedCodec> {
    let document = session.document;
    let backend = session.backend;
    let name = format!("{}_Response", key.upper);
    session.claim(&name, &format!("response of {}", key.upper))?;

    let response = match success_response(&operation.responses) {
        Some(response) => Some(response.resolve(
            RESPONSE_REF_PREFIX,
            &document.components.responses,
            &format!("response of {}", key.upper),
        )?),
        None => None,
    };

    let json_schema = response.and_then(|response| {
        response
            .content
            .iter()
            .find(|(content_type, media)| is_json(content_type) && media.schema.is_some())
            .and_then(|(_, media)| media.schema.as_ref())
    });
    let codec = match json_schema {
        Some(schema) => {
            let decoded = build_schema(session, schema)?.expression;
            decode_json(session, decoded)
        }
        None => decode_blob(session),
    };

    session.register(&name, vec![Stmt::export_const(&name, None, codec)]);
    debug!(codec = %name, json = json_schema.is_some(), "registered response codec");
    Ok(NamedCodec::new(&name, backend.types.decoded_of(&name)))
}
