/// Export lookup inside a module file.
///
/// A Sails module publishes itself with a single `module.exports = ...`
/// assignment, nearly always an object literal of functions.  Only the
/// first such assignment in document order is examined.
use crate::syntax::{ParsedSource, Shape, Span, SyntaxNode};
use crate::types::ExportTarget;

/// Whether `node` is the two-part member expression `module.exports`.
fn is_module_exports(node: &SyntaxNode<'_>) -> bool {
    match node.shape() {
        Shape::Member { object, property } => {
            object.name() == Some("module") && property.name() == Some("exports")
        }
        _ => false,
    }
}

/// The first `module.exports = <right>` in document order, as
/// `(left, right)`.
fn find_export_assignment<'a>(root: SyntaxNode<'a>) -> Option<(SyntaxNode<'a>, SyntaxNode<'a>)> {
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        if let Shape::Assignment { left, right } = node.shape()
            && is_module_exports(&left)
        {
            return Some((left, right));
        }
        stack.extend(node.children().into_iter().rev());
    }

    None
}

/// The key node for `property` in an object literal, looking through
/// parentheses.
fn find_property_key<'a>(value: SyntaxNode<'a>, property: &str) -> Option<SyntaxNode<'a>> {
    match value.shape() {
        Shape::Parenthesized(inner) => find_property_key(inner, property),
        Shape::Object(entries) => entries
            .into_iter()
            .filter_map(|entry| entry.key)
            .find(|key| key.name() == Some(property)),
        _ => None,
    }
}

/// Locate the export for `property` (or the export itself) in a parsed
/// module.  `None` when the module has no `module.exports` assignment.
pub(super) fn find_export(
    parsed: &ParsedSource<'_>,
    property: Option<&str>,
) -> Option<(Span, ExportTarget)> {
    let (left, right) = find_export_assignment(parsed.root())?;

    if let Some(name) = property
        && let Some(key) = find_property_key(right, name)
    {
        return Some((key.span(), ExportTarget::Property(name.to_string())));
    }

    Some((
        left.span(),
        ExportTarget::ExportStatement {
            requested: property.map(str::to_string),
        },
    ))
}
