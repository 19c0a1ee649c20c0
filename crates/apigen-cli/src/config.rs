//! Configuration file for apigen.
//!
//! Loaded from `apigen.toml` in the working directory, or the file named by
//! `--config`. Relative paths are resolved against the config file's
//! directory.
//!
//! Example apigen.toml:
//! ```toml
//! input = "openapi.yaml"
//! output = "src/api.ts"
//!
//! [generator]
//! backend = "effect"
//! include_types = true
//!
//! [[custom]]
//! format = "date-time"
//! name = "dateTime"
//! from = "./schemas"
//! ```

use crate::error::CliError;
use apigen::document::Schema;
use apigen::{GeneratorOptions, ImportReference};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG: &str = "apigen.toml";

/// Replace schemas with a given `format` by an imported schema factory.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CustomRule {
    pub format: String,
    /// Only match schemas of this `type`.
    #[serde(rename = "type")]
    pub ty: Option<String>,
    pub name: String,
    pub from: String,
}

impl CustomRule {
    pub fn matches(&self, schema: &Schema) -> bool {
        schema.format.as_deref() == Some(self.format.as_str())
            && self
                .ty
                .as_deref()
                .is_none_or(|ty| schema.single_type() == Some(ty))
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApigenConfig {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub generator: GeneratorOptions,
    pub custom: Vec<CustomRule>,
}

impl ApigenConfig {
    /// Load `path`. A missing file yields the defaults unless `required`.
    pub fn load(path: &Path, required: bool) -> Result<Self, CliError> {
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&content).map_err(|source| CliError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        let base = path.parent().unwrap_or(Path::new(""));
        config.input = config.input.map(|p| base.join(p));
        config.output = config.output.map(|p| base.join(p));
        Ok(config)
    }

    /// Generator options with the `[[custom]]` rules installed as a hook.
    pub fn generator_options(&self) -> GeneratorOptions {
        let options = self.generator.clone();
        if self.custom.is_empty() {
            return options;
        }
        let rules = self.custom.clone();
        options.with_custom(move |schema| {
            rules
                .iter()
                .find(|rule| rule.matches(schema))
                .map(|rule| ImportReference {
                    name: rule.name.clone(),
                    from: rule.from.clone(),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apigen::BackendKind;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join(DEFAULT_CONFIG);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{content}").unwrap();
        path
    }

    fn schema(value: serde_json::Value) -> Schema {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_missing_optional_config() {
        let dir = TempDir::new().unwrap();
        let config = ApigenConfig::load(&dir.path().join(DEFAULT_CONFIG), false).unwrap();
        assert!(config.input.is_none());
        assert_eq!(config.generator.backend, BackendKind::Zod);
    }

    #[test]
    fn test_missing_required_config() {
        let dir = TempDir::new().unwrap();
        let err = ApigenConfig::load(&dir.path().join("other.toml"), true).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_load_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
input = "openapi.yaml"
output = "src/api.ts"

[generator]
backend = "zod-mini"
deprecation_handling = "optional"

[[custom]]
format = "date-time"
type = "string"
name = "dateTime"
from = "./schemas"
"#,
        );
        let config = ApigenConfig::load(&path, true).unwrap();
        assert_eq!(config.input, Some(dir.path().join("openapi.yaml")));
        assert_eq!(config.output, Some(dir.path().join("src/api.ts")));
        assert_eq!(config.generator.backend, BackendKind::ZodMini);
        assert!(config.generator.include_operations);
        assert_eq!(config.custom.len(), 1);
        assert_eq!(config.custom[0].ty.as_deref(), Some("string"));
    }

    #[test]
    fn test_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "[generator]\nbackend = \"io-ts\"");
        let err = ApigenConfig::load(&path, false).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_custom_rules_first_match_wins() {
        let config = ApigenConfig {
            custom: vec![
                CustomRule {
                    format: "date-time".into(),
                    ty: Some("integer".into()),
                    name: "timestamp".into(),
                    from: "./time".into(),
                },
                CustomRule {
                    format: "date-time".into(),
                    ty: None,
                    name: "dateTime".into(),
                    from: "./schemas".into(),
                },
            ],
            ..Default::default()
        };
        let options = config.generator_options();
        let hook = options.custom.as_ref().unwrap();

        let string = schema(json!({"type": "string", "format": "date-time"}));
        assert_eq!(
            hook(&string),
            Some(ImportReference {
                name: "dateTime".into(),
                from: "./schemas".into()
            })
        );
        let integer = schema(json!({"type": "integer", "format": "date-time"}));
        assert_eq!(hook(&integer).unwrap().name, "timestamp");
        assert_eq!(hook(&schema(json!({"type": "string"}))), None);
    }

    #[test]
    fn test_no_rules_no_hook() {
        assert!(ApigenConfig::default().generator_options().custom.is_none());
    }
}
