//! Output writers - emit IR as source code.

pub mod typescript;

pub use typescript::{TYPESCRIPT_WRITER, TypeScriptWriter, TypeScriptWriterImpl};
