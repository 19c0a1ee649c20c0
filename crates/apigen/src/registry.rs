//! Lookup of the built-in backends by name.
//!
//! The set is fixed at compile time; lookups build a fresh [`Backend`] so
//! nothing is shared between generation runs.

use crate::backend::Backend;
use crate::options::BackendKind;

/// Get a backend by name (`zod`, `zod-mini`, `effect`).
pub fn get_backend(name: &str) -> Option<Backend> {
    BackendKind::from_name(name).map(BackendKind::backend)
}

/// List all backend names.
pub fn backend_names() -> Vec<&'static str> {
    BackendKind::ALL.into_iter().map(BackendKind::name).collect()
}
