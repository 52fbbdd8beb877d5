/// Reference extraction from the calling document.
///
/// The word under the cursor is located textually, then the calling
/// document is parsed and searched for the node covering exactly that
/// word.  Matching on the exact span (rather than "the smallest node
/// containing the cursor") is what tells the identifier apart from the
/// call or member expression around it.
use tower_lsp::lsp_types::Position;

use crate::error::ResolveError;
use crate::syntax::{Shape, SyntaxNode, parse_javascript};
use crate::types::{ResolvedReference, TokenSpan};
use crate::util::{line_at, utf16_to_byte_column};

/// Characters that may appear in a JavaScript identifier.
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Find the word touching `position`.
///
/// A cursor right after the last character of a word still selects that
/// word.  Returns `None` on whitespace, punctuation or past the end of
/// the document.
pub fn word_span_at(content: &str, position: Position) -> Option<TokenSpan> {
    let line = line_at(content, position.line as usize)?;
    let cursor = utf16_to_byte_column(line, position.character);

    let start = line[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_word_char(*c))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(cursor);
    let end = line[cursor..]
        .char_indices()
        .find(|(_, c)| !is_word_char(*c))
        .map(|(idx, _)| cursor + idx)
        .unwrap_or(line.len());

    if start == end {
        return None;
    }

    Some(TokenSpan {
        start_line: position.line as usize,
        end_line: position.line as usize,
        start_column: start,
        end_column: end,
        text: line[start..end].to_string(),
    })
}

/// Depth-first search for the node whose span equals `token`.
///
/// Subtrees that end before or start after the token's rows are skipped.
/// The first hit is the outermost node with that exact span; when it
/// merely wraps a child with the same span (`foo` as a whole expression
/// statement), the innermost such child is returned instead.
fn find_token_node<'a>(root: SyntaxNode<'a>, token: &TokenSpan) -> Option<SyntaxNode<'a>> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        let span = node.span();
        if !span.overlaps_rows(token.start_line, token.end_line) {
            continue;
        }

        if token.matches(&span) {
            let mut innermost = node;
            while let Some(child) = innermost
                .children()
                .into_iter()
                .find(|child| child.span() == span)
            {
                innermost = child;
            }
            return Some(innermost);
        }

        stack.extend(node.children().into_iter().rev());
    }

    None
}

/// Work out which module (and member) `node` refers to, looking one level
/// up for a property access.
fn classify_reference(node: SyntaxNode<'_>) -> Result<ResolvedReference, ResolveError> {
    let not_an_identifier = || ResolveError::NotAnIdentifier {
        text: node.source_text().to_string(),
    };

    if let Some(Shape::Member { object, property }) = node.parent().map(|p| p.shape())
        && property == node
    {
        let property_name = node.name().ok_or_else(not_an_identifier)?;
        let object_name = object.name().ok_or_else(|| ResolveError::UnknownModule {
            name: object.source_text().to_string(),
        })?;

        return Ok(ResolvedReference {
            object_name: object_name.to_string(),
            property_name: Some(property_name.to_string()),
        });
    }

    let object_name = node.name().ok_or_else(not_an_identifier)?;
    Ok(ResolvedReference {
        object_name: object_name.to_string(),
        property_name: None,
    })
}

/// Steps from cursor to reference: word span, parse, exact match,
/// classification.
pub fn find_reference(
    content: &str,
    position: Position,
) -> Result<(TokenSpan, ResolvedReference), ResolveError> {
    let token = word_span_at(content, position).ok_or(ResolveError::NoTokenAtCursor)?;

    // Documents being edited are often incomplete; search whatever tree
    // the parser recovered.
    let parsed = parse_javascript(content)?;
    let node = find_token_node(parsed.root(), &token).ok_or_else(|| {
        ResolveError::NotAnIdentifier {
            text: token.text.clone(),
        }
    })?;

    let reference = classify_reference(node)?;
    Ok((token, reference))
}
