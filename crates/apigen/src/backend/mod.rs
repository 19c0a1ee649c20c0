//! Validation-library backends.
//!
//! A [`Backend`] is a plain capability set: expression constructors for
//! primitives, combinators and modifiers, plus the type-level names the
//! generated code refers to. The builders never branch on which library is
//! targeted; they only call through these entries.
//!
//! # Adding a backend
//!
//! Write a constructor returning a [`Backend`] (see [`zod::zod`]) and add a
//! [`BackendKind`](crate::BackendKind) variant that returns it.

pub mod effect;
pub mod zod;

use crate::session::ImportTable;
use apigen_syntax::{ArrowBody, Expr, Stmt, TsType};

/// Callee expressions for the library's primitive schemas.
///
/// Entries are full expressions (`z.string()`); the parameterized ones
/// (`array`, `object`, `instance_of`) are callees applied to one argument.
#[derive(Debug, Clone)]
pub struct Primitives {
    pub boolean: Expr,
    pub string: Expr,
    pub number: Expr,
    pub integer: Expr,
    pub null: Expr,
    pub unknown: Expr,
    pub array: Expr,
    pub object: Expr,
    pub instance_of: Expr,
}

#[derive(Debug, Clone, Copy)]
pub struct Combinators {
    pub union: fn(Vec<Expr>) -> Expr,
    /// `record(key, value)`
    pub record: fn(Expr, Expr) -> Expr,
    /// Literal-value enumeration; values are literal expressions.
    pub enumeration: fn(Vec<Expr>) -> Expr,
    pub intersection: Option<fn(Vec<Expr>) -> Expr>,
    /// Merge of object schemas; preferred over intersection when present.
    pub object_extend: Option<fn(Vec<Expr>) -> Expr>,
    /// `catchall(object, value)`: object with typed extra keys.
    pub catchall: fn(Expr, Expr) -> Expr,
}

#[derive(Debug, Clone, Copy)]
pub struct Modifiers {
    pub optional: fn(Expr) -> Expr,
    pub nullable: fn(Expr) -> Expr,
    pub mutable: fn(Expr) -> Expr,
    pub immutable: fn(Expr) -> Expr,
    /// Wrap a thunk so it is evaluated on first use.
    pub lazy: fn(Expr) -> Expr,
    pub regex: fn(Expr, &str) -> Expr,
}

/// Type-level names: schema type and its decoded/encoded projections.
#[derive(Debug, Clone, Copy)]
pub struct TypeNames {
    pub schema: &'static str,
    pub decoded: &'static str,
    pub encoded: &'static str,
}

impl TypeNames {
    /// `Schema<decoded, encoded>`
    pub fn schema_of(&self, decoded: TsType, encoded: TsType) -> TsType {
        TsType::generic(self.schema, vec![decoded, encoded])
    }

    /// `decoded<typeof name>`
    pub fn decoded_of(&self, name: &str) -> TsType {
        TsType::generic(self.decoded, vec![TsType::query(name)])
    }

    /// `encoded<typeof name>`
    pub fn encoded_of(&self, name: &str) -> TsType {
        TsType::generic(self.encoded, vec![TsType::query(name)])
    }
}

/// A bidirectional conversion between an encoded and a decoded schema.
///
/// Bodies see the value being converted as `from` and the library context
/// as `ctx`.
#[derive(Debug, Clone)]
pub struct Transformer {
    pub encoded: Expr,
    pub decoded: Expr,
    pub decode: ArrowBody,
    pub decode_async: bool,
    pub encode: ArrowBody,
    pub encode_async: bool,
}

impl Transformer {
    pub fn new(encoded: Expr, decoded: Expr, decode: ArrowBody, encode: ArrowBody) -> Self {
        Self {
            encoded,
            decoded,
            decode,
            decode_async: false,
            encode,
            encode_async: false,
        }
    }

    pub fn async_decode(mut self) -> Self {
        self.decode_async = true;
        self
    }
}

/// Runtime entry points the client calls: `method(schema, value)`.
#[derive(Debug, Clone, Copy)]
pub struct Methods {
    pub encode: fn(Expr, Expr) -> Expr,
    pub decode: fn(Expr, Expr) -> Expr,
    pub parse: fn(Expr, Expr) -> Expr,
}

#[derive(Debug, Clone)]
pub struct Backend {
    pub name: &'static str,
    pub primitives: Primitives,
    pub combinators: Combinators,
    pub modifiers: Modifiers,
    pub types: TypeNames,
    pub transformer: fn(Transformer) -> Expr,
    /// Statements for a `catch (error)` block inside a transform body.
    pub transformer_catch: fn(Expr) -> Vec<Stmt>,
    pub methods: Methods,
    /// Whether `mutable`/`immutable` change the schema's type.
    pub supports_immutability: bool,
    /// Register the library imports every generated module needs.
    pub imports: fn(&mut ImportTable),
}

impl Backend {
    pub fn array(&self, item: Expr) -> Expr {
        Expr::call(self.primitives.array.clone(), vec![item])
    }

    pub fn object(&self, shape: Expr) -> Expr {
        Expr::call(self.primitives.object.clone(), vec![shape])
    }

    /// `instanceOf(Class)`
    pub fn instance_of(&self, class: &str) -> Expr {
        Expr::call(self.primitives.instance_of.clone(), vec![Expr::ident(class)])
    }
}

/// `throw new Error("Not implemented")`, for directions a codec never runs.
pub fn not_implemented() -> ArrowBody {
    ArrowBody::Block(vec![Stmt::throw(Expr::new_(
        Expr::ident("Error"),
        vec![Expr::string("Not implemented")],
    ))])
}

/// Reduce `items` pairwise with `combine`, left to right.
pub(crate) fn fold_pairs(items: Vec<Expr>, combine: impl Fn(Expr, Expr) -> Expr) -> Expr {
    let mut items = items.into_iter();
    match items.next() {
        Some(first) => items.fold(first, combine),
        None => Expr::array(Vec::new()),
    }
}
