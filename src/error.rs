//! Error types for index building and definition resolution.
//!
//! None of these ever reach the LSP client: the server collapses every
//! resolution failure into an empty answer. They exist so that callers,
//! logs and tests can tell the failure kinds apart.
use std::path::PathBuf;

use thiserror::Error;

/// A configured definition root that contributed nothing to the index.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("cannot read definition directory '{}': {source}", root.display())]
    RootUnreadable {
        root: PathBuf,
        source: std::io::Error,
    },
}

/// Failure to produce a syntax tree at all.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to load the JavaScript grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("parser returned no tree")]
    Cancelled,
}

/// Why a cursor position did not resolve to a definition.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no identifier under the cursor")]
    NoTokenAtCursor,

    #[error("'{text}' is not an identifier")]
    NotAnIdentifier { text: String },

    #[error("'{name}' is not a known module")]
    UnknownModule { name: String },

    #[error("failed to read '{}': {source}", path.display())]
    CandidateUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("'{}' contains syntax errors", path.display())]
    CandidateUnparsable { path: PathBuf },

    #[error("no `module.exports` assignment in '{}'", path.display())]
    NoExportFound { path: PathBuf },

    #[error(transparent)]
    Parser(#[from] ParseError),
}

/// Failure while loading settings from a file or from the client.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid TOML in '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid initialization options: {0}")]
    Json(#[from] serde_json::Error),
}
