//! Generation options.

use crate::backend::{self, Backend};
use crate::document::Schema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which validation library the generated module targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    #[default]
    Zod,
    ZodMini,
    Effect,
}

impl BackendKind {
    pub const ALL: [BackendKind; 3] = [BackendKind::Zod, BackendKind::ZodMini, BackendKind::Effect];

    pub fn name(self) -> &'static str {
        match self {
            BackendKind::Zod => "zod",
            BackendKind::ZodMini => "zod-mini",
            BackendKind::Effect => "effect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Build the capability set for this backend.
    pub fn backend(self) -> Backend {
        match self {
            BackendKind::Zod => backend::zod::zod(),
            BackendKind::ZodMini => backend::zod::zod_mini(),
            BackendKind::Effect => backend::effect::effect(),
        }
    }
}

/// What to emit for schemas marked `deprecated: true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeprecationHandling {
    /// Replace the schema with an optional unknown.
    #[default]
    Unknown,
    /// Keep the schema but make the member optional.
    Optional,
}

/// A named export of another module, used in place of a generated schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportReference {
    pub name: String,
    pub from: String,
}

/// Returns an import to substitute for `schema`, or `None` to generate it.
pub type CustomSchemaHook = Arc<dyn Fn(&Schema) -> Option<ImportReference> + Send + Sync>;

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    pub backend: BackendKind,
    pub include_schemas: bool,
    pub include_operations: bool,
    /// Annotate emitted schema constants with their schema type.
    pub include_types: bool,
    pub deprecation_handling: DeprecationHandling,
    #[serde(skip)]
    pub custom: Option<CustomSchemaHook>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            include_schemas: true,
            include_operations: true,
            include_types: false,
            deprecation_handling: DeprecationHandling::default(),
            custom: None,
        }
    }
}

impl GeneratorOptions {
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_custom(
        mut self,
        hook: impl Fn(&Schema) -> Option<ImportReference> + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(Arc::new(hook));
        self
    }
}

impl std::fmt::Debug for GeneratorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorOptions")
            .field("backend", &self.backend)
            .field("include_schemas", &self.include_schemas)
            .field("include_operations", &self.include_operations)
            .field("include_types", &self.include_types)
            .field("deprecation_handling", &self.deprecation_handling)
            .field("custom", &self.custom.as_ref().map(|_| "<hook>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.backend, BackendKind::Zod);
        assert!(options.include_schemas);
        assert!(options.include_operations);
        assert!(!options.include_types);
        assert_eq!(options.deprecation_handling, DeprecationHandling::Unknown);
    }

    #[test]
    fn test_deserialize_partial() {
        let options: GeneratorOptions = serde_json::from_value(serde_json::json!({
            "backend": "zod-mini",
            "include_types": true,
            "deprecation_handling": "optional"
        }))
        .unwrap();
        assert_eq!(options.backend, BackendKind::ZodMini);
        assert!(options.include_types);
        assert!(options.include_operations);
        assert_eq!(options.deprecation_handling, DeprecationHandling::Optional);
    }

    #[test]
    fn test_backend_names_round_trip() {
        for kind in BackendKind::ALL {
            assert_eq!(BackendKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(BackendKind::from_name("yup"), None);
    }
}
