//! CLI error type.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("no input document: pass --input or set `input` in {}", config.display())]
    MissingInput { config: PathBuf },

    #[error("--watch needs an input file, not stdin")]
    WatchStdin,

    #[error("file watcher failed")]
    Watch(#[from] notify::Error),

    #[error(transparent)]
    Generate(#[from] apigen::Error),
}
