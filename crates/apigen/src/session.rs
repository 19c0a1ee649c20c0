//! Per-run generation state.
//!
//! A [`GenerationSession`] is created for each call to
//! [`generate`](crate::generate) and dropped when it returns. Nothing here is
//! shared between runs, so independent runs may proceed concurrently.

use crate::backend::Backend;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::options::GeneratorOptions;
use apigen_syntax::{Expr, Import, ImportSpecifier, Program, Stmt, TsType};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

/// Facts about a built schema that its containers need.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeMeta {
    pub readonly: bool,
    pub optional: bool,
    pub is_object: bool,
}

/// A built schema: runtime expression plus its decoded and encoded types.
#[derive(Debug, Clone)]
pub struct ExpressionWithType {
    /// Runtime schema expression. For a type-only reference inside a cycle
    /// this is a `null` placeholder that only lands in discarded results.
    pub expression: Expr,
    pub type_decoded: TsType,
    pub type_encoded: TsType,
    pub type_meta: TypeMeta,
}

impl ExpressionWithType {
    pub fn new(expression: Expr, type_decoded: TsType, type_encoded: TsType) -> Self {
        Self {
            expression,
            type_decoded,
            type_encoded,
            type_meta: TypeMeta::default(),
        }
    }

    /// Same type on both sides.
    pub fn symmetric(expression: Expr, ty: TsType) -> Self {
        Self::new(expression, ty.clone(), ty)
    }

    pub fn with_meta(mut self, type_meta: TypeMeta) -> Self {
        self.type_meta = type_meta;
        self
    }
}

/// A registered codec constant and the decoded type its callers pass.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCodec {
    pub name: String,
    pub decoded: TsType,
}

impl NamedCodec {
    pub fn new(name: impl Into<String>, decoded: TsType) -> Self {
        Self {
            name: name.into(),
            decoded,
        }
    }

    pub fn ident(&self) -> Expr {
        Expr::ident(&self.name)
    }
}

/// Record `source` as the owner of `ident` in `owners`, failing if another
/// source already owns it.
pub fn claim(owners: &mut HashMap<String, String>, ident: &str, source: &str) -> Result<()> {
    match owners.get(ident) {
        Some(owner) if owner != source => Err(Error::unsupported(format!(
            "identifier `{ident}` is generated for both {owner} and {source}"
        ))),
        Some(_) => Ok(()),
        None => {
            owners.insert(ident.to_string(), source.to_string());
            Ok(())
        }
    }
}

/// Module imports, deduplicated and kept in first-use order.
#[derive(Debug, Clone, Default)]
pub struct ImportTable {
    imports: Vec<Import>,
}

impl ImportTable {
    /// Import `name` from `from` unless it is already imported, and return
    /// an identifier for it.
    pub fn ensure_import(&mut self, name: &str, from: &str, type_only: bool) -> Expr {
        self.ensure(
            from,
            ImportSpecifier::Named {
                name: name.to_string(),
                type_only,
            },
        );
        Expr::ident(name)
    }

    /// `import * as name from "from"`
    pub fn ensure_namespace_import(&mut self, name: &str, from: &str) -> Expr {
        self.ensure(
            from,
            ImportSpecifier::Namespace {
                name: name.to_string(),
            },
        );
        Expr::ident(name)
    }

    fn ensure(&mut self, from: &str, specifier: ImportSpecifier) {
        let index = match self.imports.iter().position(|i| i.source == from) {
            Some(index) => index,
            None => {
                self.imports.push(Import {
                    source: from.to_string(),
                    specifiers: Vec::new(),
                });
                self.imports.len() - 1
            }
        };
        let import = &mut self.imports[index];
        if !import
            .specifiers
            .iter()
            .any(|s| s.name() == specifier.name())
        {
            import.specifiers.push(specifier);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
    }

    pub fn into_imports(self) -> Vec<Import> {
        self.imports
    }
}

pub struct GenerationSession<'a> {
    pub document: &'a Document,
    pub backend: &'a Backend,
    pub options: &'a GeneratorOptions,
    /// Named declarations in registration order. A name is registered only
    /// after everything it depends on eagerly.
    pub schemas: IndexMap<String, Vec<Stmt>>,
    /// Component schemas currently being built.
    pub processing_schemas: HashSet<String>,
    /// Component schemas currently being built for their types only.
    pub processing_schema_types: HashSet<String>,
    pub schema_type_meta: HashMap<String, TypeMeta>,
    pub imports: ImportTable,
    /// Module-level identifier to the source that owns it.
    identifiers: HashMap<String, String>,
}

impl<'a> GenerationSession<'a> {
    pub fn new(document: &'a Document, backend: &'a Backend, options: &'a GeneratorOptions) -> Self {
        Self {
            document,
            backend,
            options,
            schemas: IndexMap::new(),
            processing_schemas: HashSet::new(),
            processing_schema_types: HashSet::new(),
            schema_type_meta: HashMap::new(),
            imports: ImportTable::default(),
            identifiers: HashMap::new(),
        }
    }

    /// Reserve the module-level identifier `ident` for `source`. Claiming
    /// it again for the same source is a no-op.
    pub fn claim(&mut self, ident: &str, source: &str) -> Result<()> {
        claim(&mut self.identifiers, ident, source)
    }

    /// Fail if an imported name shadows a generated declaration.
    pub fn check_imports(&self) -> Result<()> {
        for import in &self.imports.imports {
            for specifier in &import.specifiers {
                if let Some(owner) = self.identifiers.get(specifier.name()) {
                    return Err(Error::unsupported(format!(
                        "identifier `{}` is generated for {owner} and imported from \"{}\"",
                        specifier.name(),
                        import.source
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn register(&mut self, name: impl Into<String>, stmts: Vec<Stmt>) {
        self.schemas.insert(name.into(), stmts);
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Imports, then every registered declaration in order.
    pub fn into_program(self) -> Program {
        Program::with_imports(
            self.imports.into_imports(),
            self.schemas.into_values().flatten().collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_imports_deduplicate() {
        let mut imports = ImportTable::default();
        imports.ensure_import("z", "zod", false);
        imports.ensure_import("queryOptions", "@tanstack/react-query", false);
        imports.ensure_import("z", "zod", false);
        imports.ensure_import("QueryKey", "@tanstack/react-query", true);
        let imports = imports.into_imports();
        assert_eq!(imports.len(), 2);
        assert_eq!(imports[0].source, "zod");
        assert_eq!(imports[0].specifiers.len(), 1);
        assert_eq!(
            imports[1].specifiers[1],
            ImportSpecifier::Named {
                name: "QueryKey".into(),
                type_only: true
            }
        );
    }

    #[test]
    fn test_claim_rejects_second_owner() {
        let mut owners = HashMap::new();
        claim(&mut owners, "Pet_Info", "schema `Pet-Info`").unwrap();
        claim(&mut owners, "Pet_Info", "schema `Pet-Info`").unwrap();
        let err = claim(&mut owners, "Pet_Info", "schema `Pet_Info`").unwrap_err();
        assert_eq!(
            err.to_string(),
            "unsupported construct: identifier `Pet_Info` is generated for both schema `Pet-Info` and schema `Pet_Info`"
        );
    }

    #[test]
    fn test_namespace_import() {
        let mut imports = ImportTable::default();
        let ident = imports.ensure_namespace_import("Schema", "effect/Schema");
        assert_eq!(ident, Expr::ident("Schema"));
        imports.ensure_import("Effect", "effect", false);
        let imports = imports.into_imports();
        assert_eq!(
            imports[0].specifiers,
            vec![ImportSpecifier::Namespace {
                name: "Schema".into()
            }]
        );
        assert_eq!(imports[1].source, "effect");
    }
}
