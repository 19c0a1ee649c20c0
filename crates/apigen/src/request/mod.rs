//! Request bodies: pick an encoder for the operation's content types.
//!
//! Content types are tried in document order and the first one with a
//! supported encoder wins:
//!
//! - JSON (`application/json`, `*/*+json`) with a schema: `JSON.stringify`
//! - `multipart/form-data` with a schema: one `FormData` entry per property
//! - anything else with no schema or a string schema: sent as-is

mod form_data;
mod json;

pub use form_data::encode_form_data;
pub use json::encode_json;

use crate::document::{Operation, REQUEST_BODY_REF_PREFIX};
use crate::error::{Error, Result};
use crate::keys::OperationKey;
use crate::schema::{build_schema, resolve_schema};
use crate::session::GenerationSession;
use apigen_syntax::Expr;
use tracing::trace;

/// The `data` member of a parameters codec.
#[derive(Debug, Clone)]
pub struct RequestBody {
    /// Codec or schema for the body value.
    pub data: Expr,
    /// `[name, value]` header pairs the body implies.
    pub headers: Vec<Expr>,
    pub required: bool,
}

/// Media type without parameters, lowercased.
pub(crate) fn media_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub(crate) fn is_json(content_type: &str) -> bool {
    let essence = media_essence(content_type);
    essence == "application/json" || essence.ends_with("+json")
}

fn content_type_header(content_type: &str) -> Expr {
    Expr::array(vec![
        Expr::string("Content-Type"),
        Expr::string(content_type),
    ])
}

/// Build the body member for `operation`, or `None` when it has no body.
pub fn build_request_body(
    session: &mut GenerationSession<'_>,
    key: &OperationKey,
    operation: &Operation,
) -> Result<Option<RequestBody>> {
    let Some(body) = &operation.request_body else {
        return Ok(None);
    };
    let document = session.document;
    let body = body.resolve(
        REQUEST_BODY_REF_PREFIX,
        &document.components.request_bodies,
        &format!("request body of {}", key.upper),
    )?;
    if body.content.is_empty() {
        return Ok(None);
    }

    for (content_type, media) in &body.content {
        let essence = media_essence(content_type);
        if is_json(content_type) {
            let Some(schema) = &media.schema else {
                continue;
            };
            let decoded = build_schema(session, schema)?.expression;
            trace!(operation = %key.upper, %content_type, "json request body");
            return Ok(Some(RequestBody {
                data: encode_json(session, decoded),
                headers: vec![content_type_header(content_type)],
                required: body.required,
            }));
        }

        if essence == "multipart/form-data" {
            let Some(schema) = &media.schema else {
                continue;
            };
            let decoded = build_schema(session, schema)?.expression;
            trace!(operation = %key.upper, %content_type, "form-data request body");
            // The runtime sets the multipart boundary header itself.
            return Ok(Some(RequestBody {
                data: encode_form_data(session, schema, decoded)?,
                headers: Vec::new(),
                required: body.required,
            }));
        }

        let data = match &media.schema {
            None => session.backend.instance_of("Blob"),
            Some(schema) => {
                let resolved = resolve_schema(document, schema)?;
                if resolved.format.as_deref() == Some("binary") {
                    session.backend.instance_of("Blob")
                } else if resolved.single_type() == Some("string") {
                    build_schema(session, schema)?.expression
                } else {
                    continue;
                }
            }
        };
        trace!(operation = %key.upper, %content_type, "raw request body");
        return Ok(Some(RequestBody {
            data,
            headers: vec![content_type_header(content_type)],
            required: body.required,
        }));
    }

    let offered: Vec<&str> = body.content.keys().map(String::as_str).collect();
    Err(Error::unsupported(format!(
        "No supported requestBody type ({}) in {}",
        offered.join(", "),
        key.upper
    )))
}
