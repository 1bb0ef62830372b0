use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for all possible failures in the tool.
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("failed to execute command '{command}': {source}")]
    CommandExecution {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("output of '{command}' is not valid UTF-8: {source}")]
    OutputParsing {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    #[error("I/O error accessing path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to extract zip archive '{path}': {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("archive '{path}' has no recognized suffix (.tgz or .zip)")]
    UnsupportedArchive { path: PathBuf },

    #[error("driver executable '{name}' not found under '{path}' after extraction")]
    BinaryNotFound { name: String, path: PathBuf },

    #[error("failed to start driver at '{path}': {source}")]
    Launch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed process registry at '{path}': {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, PrepError>;
