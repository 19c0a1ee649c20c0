//! Schema-driven TypeScript API client generation.
//!
//! `apigen` turns an OpenAPI 3.x document into one TypeScript module:
//! validators for every component schema, a parameters and a response codec
//! per operation, and an `Api` class whose methods call an injected transport.
//!
//! # Architecture
//!
//! ```text
//! Document               Builders                  Backend          Output
//! ──────────────     ──────────────────────     ─────────────     ──────────────
//!                    schema  (schema.rs)   ─┐   zod
//! components    ─┬─> parameters            ─┼─> zod-mini    ─┐
//! paths         ─┘   response              ─┤   effect       ├─> Program ─> .ts text
//!                    client  (client.rs)   ─┘   (backend/)   ─┘   (apigen-syntax)
//! ```
//!
//! Every builder is written once against the [`Backend`] capability set;
//! the backend only decides call syntax. All mutable state lives in a
//! per-run [`GenerationSession`](session::GenerationSession).
//!
//! # Example
//!
//! ```
//! use apigen::{Document, GeneratorOptions, generate};
//!
//! let document = Document::from_value(serde_json::json!({
//!     "openapi": "3.0.3",
//!     "paths": {},
//!     "components": {
//!         "schemas": {
//!             "Pet": {
//!                 "type": "object",
//!                 "properties": { "name": { "type": "string" } },
//!                 "required": ["name"]
//!             }
//!         }
//!     }
//! }))
//! .unwrap();
//!
//! let ts = generate(&document, &GeneratorOptions::default()).unwrap();
//! assert!(ts.contains("export const Pet = z.object({"));
//! assert!(ts.contains("export class Api {"));
//! ```

pub mod backend;
pub mod client;
pub mod document;
pub mod error;
pub mod keys;
pub mod options;
pub mod parameters;
pub mod path;
pub mod program;
pub mod registry;
pub mod request;
pub mod response;
pub mod schema;
pub mod session;

// Re-exports: entry points
pub use program::{generate, generate_program};

// Re-exports: inputs
pub use document::Document;
pub use options::{BackendKind, CustomSchemaHook, DeprecationHandling, GeneratorOptions, ImportReference};

// Re-exports: errors and keys
pub use error::{Error, Result};
pub use keys::{OperationKey, get_key};

// Re-exports: backends
pub use backend::Backend;
pub use registry::{backend_names, get_backend};
