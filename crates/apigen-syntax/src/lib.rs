//! TypeScript program IR and writer for generated API clients.
//!
//! `apigen-syntax` is the code representation the generator builds and the
//! emitter that turns it into text. The generator never concatenates source
//! strings itself; it assembles a [`Program`] and hands it to a [`Writer`].
//!
//! # Architecture
//!
//! ```text
//! Generator              IR                  Writer
//! ─────────────     ─────────────────     ────────────────
//! schemas     ─┐
//! codecs      ─┼─>  Program ───────────>  TypeScriptWriter ─> .ts text
//! client      ─┘    (ir/mod.rs)
//! ```
//!
//! # Example
//!
//! ```
//! use apigen_syntax::{Expr, Program, Stmt, TypeScriptWriter};
//!
//! let program = Program::new(vec![Stmt::export_const(
//!     "Pet",
//!     None,
//!     Expr::method(Expr::ident("z"), "string", vec![]),
//! )]);
//! assert_eq!(TypeScriptWriter::emit(&program), "export const Pet = z.string();\n");
//! ```

pub mod ir;
pub mod output;
pub mod traits;

// Re-exports: IR types
pub use ir::{
    Arrow, ArrowBody, BinaryOp, ClassDecl, ClassMember, Expr, Import, ImportSpecifier, Literal,
    Param, Program, Property, Stmt, StructureEq, TsType, TypeMember,
};

// Re-exports: Traits
pub use traits::Writer;

// Re-exports: Built-in writers
pub use output::{TYPESCRIPT_WRITER, TypeScriptWriter, TypeScriptWriterImpl};
