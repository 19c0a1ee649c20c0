//! Identifier derivation for schemas and operations.

use crate::document::OperationRef;
use crate::error::{Error, Result};

/// The two identifier spellings derived from one source name.
///
/// `upper` names generated schema constants and types; `lower` names client
/// methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationKey {
    pub lower: String,
    pub upper: String,
}

/// Derive identifiers from an arbitrary name.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, so distinct names may
/// collide; generation fails when they do. A leading digit gets a `_` prefix.
pub fn get_key(name: &str) -> Result<OperationKey> {
    if name.is_empty() {
        return Err(Error::unsupported("key for an empty name"));
    }
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    Ok(OperationKey {
        lower: with_first(&sanitized, char::to_ascii_lowercase),
        upper: with_first(&sanitized, char::to_ascii_uppercase),
    })
}

fn with_first(s: &str, f: impl Fn(&char) -> char) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => std::iter::once(f(&first)).chain(chars).collect(),
        None => String::new(),
    }
}

impl OperationKey {
    /// From `operationId`, or from method and path when there is none.
    pub fn for_operation(operation: &OperationRef<'_>) -> Result<Self> {
        match &operation.operation.operation_id {
            Some(id) => get_key(id),
            None => get_key(&format!("{}{}", operation.method, operation.path)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HttpMethod, Operation};

    #[test]
    fn test_simple_name() {
        let key = get_key("listPets").unwrap();
        assert_eq!(key.lower, "listPets");
        assert_eq!(key.upper, "ListPets");
    }

    #[test]
    fn test_sanitizes_punctuation() {
        let key = get_key("pet-store.v2 item").unwrap();
        assert_eq!(key.upper, "Pet_store_v2_item");
        assert_eq!(key.lower, "pet_store_v2_item");
    }

    #[test]
    fn test_leading_digit() {
        let key = get_key("2fa").unwrap();
        assert_eq!(key.upper, "_2fa");
        assert_eq!(key.lower, "_2fa");
    }

    #[test]
    fn test_empty_name_fails() {
        assert!(matches!(get_key(""), Err(Error::UnsupportedConstruct(_))));
    }

    #[test]
    fn test_operation_without_id() {
        let operation = Operation::default();
        let op = OperationRef {
            path: "/pets/{id}",
            method: HttpMethod::Get,
            operation: &operation,
            path_parameters: &[],
        };
        let key = OperationKey::for_operation(&op).unwrap();
        assert_eq!(key.lower, "get_pets__id_");
        assert_eq!(key.upper, "Get_pets__id_");
    }

    #[test]
    fn test_operation_id_wins() {
        let operation = Operation {
            operation_id: Some("showPetById".into()),
            ..Default::default()
        };
        let op = OperationRef {
            path: "/pets/{id}",
            method: HttpMethod::Get,
            operation: &operation,
            path_parameters: &[],
        };
        assert_eq!(OperationKey::for_operation(&op).unwrap().upper, "ShowPetById");
    }
}
