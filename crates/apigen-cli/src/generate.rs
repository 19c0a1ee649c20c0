//! One generation run: load, generate, write.

use crate::error::CliError;
use crate::loader::{InputSource, load_document};
use apigen::GeneratorOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Everything a run needs, resolved from config and flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub input: InputSource,
    /// `None` writes to stdout.
    pub output: Option<PathBuf>,
    pub options: GeneratorOptions,
}

/// What a run did with its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Written,
    Unchanged,
    Printed,
}

/// Write `content` to `path` unless the file already holds exactly that.
pub fn write_if_changed(path: &Path, content: &str) -> Result<bool, CliError> {
    if std::fs::read_to_string(path).is_ok_and(|existing| existing == content) {
        return Ok(false);
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| CliError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, content).map_err(|source| CliError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

pub fn run_once(settings: &Settings) -> Result<Outcome, CliError> {
    let document = load_document(&settings.input)?;
    let code = apigen::generate(&document, &settings.options)?;

    match &settings.output {
        Some(path) => {
            if write_if_changed(path, &code)? {
                info!(output = %path.display(), "generated");
                Ok(Outcome::Written)
            } else {
                debug!(output = %path.display(), "output unchanged");
                Ok(Outcome::Unchanged)
            }
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(code.as_bytes())
                .and_then(|()| stdout.flush())
                .map_err(|source| CliError::Write {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            Ok(Outcome::Printed)
        }
    }
}
