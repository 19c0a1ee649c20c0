//! JSON request bodies.

use crate::backend::{Transformer, not_implemented};
use crate::session::GenerationSession;
use apigen_syntax::{ArrowBody, Expr};

/// Codec from the decoded body to its `JSON.stringify` text.
pub fn encode_json(session: &GenerationSession<'_>, decoded: Expr) -> Expr {
    let backend = session.backend;
    let stringify = Expr::method(Expr::ident("JSON"), "stringify", vec![Expr::ident("from")]);
    (backend.transformer)(Transformer::new(
        backend.primitives.string.clone(),
        decoded,
        not_implemented(),
        ArrowBody::Expr(stringify),
    ))
}
