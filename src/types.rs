//! Data types used throughout the sailsnav server.
//!
//! These are the per-request values that flow through definition
//! resolution: the cursor query, the word span under the cursor, the
//! reference extracted from the syntax tree and the final location.
use std::path::PathBuf;

use tower_lsp::lsp_types::{Location, Position, Range, Url};

use crate::syntax::Span;

/// A navigation request: the full text of the document and the cursor.
#[derive(Debug, Clone, Copy)]
pub struct CursorQuery<'a> {
    pub text: &'a str,
    pub position: Position,
}

/// The word under the cursor in tree-sitter coordinates (0-based rows,
/// byte columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    pub start_line: usize,
    pub end_line: usize,
    pub start_column: usize,
    pub end_column: usize,
    /// The word itself, kept for diagnostics.
    pub text: String,
}

impl TokenSpan {
    /// Whether `span` covers exactly this token.
    pub fn matches(&self, span: &Span) -> bool {
        span.start.row == self.start_line
            && span.end.row == self.end_line
            && span.start.column == self.start_column
            && span.end.column == self.end_column
    }
}

/// What the cursor refers to: `UserService` alone, or `UserService.findById`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    /// The module-level name looked up in the index.
    pub object_name: String,
    /// The member of the module, when the cursor was on the right-hand
    /// side of a property access.
    pub property_name: Option<String>,
}

/// Which part of the export assignment a location points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    /// The key of the requested member inside `module.exports = { ... }`.
    Property(String),
    /// The `module.exports` expression itself.  `requested` carries the
    /// member name when one was asked for but could not be found.
    ExportStatement { requested: Option<String> },
}

/// A resolved definition in a module file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionLocation {
    pub file_path: PathBuf,
    pub range: Range,
    pub target: ExportTarget,
}

impl DefinitionLocation {
    /// Convert into an LSP location.  Fails only for paths that cannot be
    /// expressed as a `file://` URL (e.g. relative paths).
    pub fn to_location(&self) -> Option<Location> {
        let uri = Url::from_file_path(&self.file_path).ok()?;
        Some(Location {
            uri,
            range: self.range,
        })
    }
}
