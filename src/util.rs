/// Utility functions for the sailsnav server.
///
/// This module contains helpers for converting between editor positions
/// (UTF-16 columns) and tree-sitter points (byte columns), plus the
/// client logging hook.
use tower_lsp::lsp_types::*;
use tree_sitter::Point;

use crate::Backend;
use crate::syntax::Span;

/// Return line `index` of `content` without its line terminator.
///
/// Lines are split on `\n` only, matching how tree-sitter counts rows; a
/// trailing `\r` is stripped so CRLF files behave like LF files.
pub fn line_at(content: &str, index: usize) -> Option<&str> {
    content
        .split('\n')
        .nth(index)
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Convert a UTF-16 column (as sent by LSP clients) to a byte column in
/// `line`.  Columns past the end clamp to the line length.
pub fn utf16_to_byte_column(line: &str, utf16_column: u32) -> usize {
    let mut units = 0u32;
    for (byte_idx, ch) in line.char_indices() {
        if units >= utf16_column {
            return byte_idx;
        }
        units += ch.len_utf16() as u32;
    }
    line.len()
}

/// Convert a byte column in `line` to a UTF-16 column.
pub fn byte_to_utf16_column(line: &str, byte_column: usize) -> u32 {
    let end = byte_column.min(line.len());
    line.get(..end)
        .map(|prefix| prefix.encode_utf16().count() as u32)
        .unwrap_or(end as u32)
}

/// Convert a tree-sitter point in `content` to an LSP position.
pub fn point_to_position(content: &str, point: Point) -> Position {
    let character = line_at(content, point.row)
        .map(|line| byte_to_utf16_column(line, point.column))
        .unwrap_or(point.column as u32);

    Position {
        line: point.row as u32,
        character,
    }
}

/// Convert a tree-sitter span in `content` to an LSP range.
pub fn span_to_range(content: &str, span: Span) -> Range {
    Range {
        start: point_to_position(content, span.start),
        end: point_to_position(content, span.end),
    }
}

impl Backend {
    pub(crate) async fn log(&self, typ: MessageType, message: String) {
        if let Some(client) = &self.client {
            client.log_message(typ, message).await;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
