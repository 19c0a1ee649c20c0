//! Traits for program writers.

use crate::ir::Program;

/// A writer emits the IR as source code in a target language.
pub trait Writer: Send + Sync {
    /// Language identifier (e.g., "typescript").
    fn language(&self) -> &'static str;

    /// File extension for output (e.g., "ts").
    fn extension(&self) -> &'static str;

    /// Emit the IR as source code.
    fn write(&self, program: &Program) -> String;
}
