//! Reading the input document from a file or stdin.

use crate::error::CliError;
use apigen::{Document, Error};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    pub fn from_arg(path: PathBuf) -> Self {
        if path.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(path)
        }
    }
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Parse document text. `.yaml`/`.yml` files are YAML, everything else JSON.
pub fn parse_document(content: &str, yaml: bool) -> Result<Document, Error> {
    let value: Value = if yaml {
        serde_yaml::from_str(content).map_err(|e| Error::upgrade("invalid YAML document", e))?
    } else {
        serde_json::from_str(content).map_err(|e| Error::upgrade("invalid JSON document", e))?
    };
    Document::from_value(value)
}

pub fn load_document(source: &InputSource) -> Result<Document, CliError> {
    let (content, yaml) = match source {
        InputSource::Stdin => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|source| CliError::Read {
                    path: PathBuf::from("<stdin>"),
                    source,
                })?;
            // JSON is a subset of YAML, but JSON errors read better.
            let yaml = !buf.trim_start().starts_with('{');
            (buf, yaml)
        }
        InputSource::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
                path: path.clone(),
                source,
            })?;
            (content, is_yaml(path))
        }
    };
    Ok(parse_document(&content, yaml)?)
}
