/// JavaScript parsing and the small node model the resolver consults.
///
/// Tree-sitter nodes are untyped: every node is a `kind()` string plus
/// named fields.  Instead of poking at fields ad hoc, the resolver asks a
/// [`SyntaxNode`] for its [`Shape`], which covers exactly the node forms
/// that matter for definition lookup (identifiers, member access,
/// assignment, object literals) and lumps everything else into
/// [`Shape::Other`].
///
/// Positions are tree-sitter `Point`s: 0-based rows and 0-based byte
/// columns.  Conversion to editor positions lives in [`crate::util`].
use tree_sitter::{Node, Parser, Point, Tree};

use crate::error::ParseError;

/// File extension of the dialect this crate parses.
pub const SOURCE_EXTENSION: &str = "js";

/// Node kinds that carry a plain name.
const IDENTIFIER_KINDS: &[&str] = &[
    "identifier",
    "property_identifier",
    "shorthand_property_identifier",
    "private_property_identifier",
];

/// A half-open source range in tree-sitter coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: Point,
    pub end: Point,
}

impl Span {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Whether this span touches any row in `first_row..=last_row`.
    pub fn overlaps_rows(&self, first_row: usize, last_row: usize) -> bool {
        self.start.row <= last_row && self.end.row >= first_row
    }
}

/// A parsed JavaScript document.  The tree and the text it was parsed
/// from travel together so node names can be sliced out of the source.
pub struct ParsedSource<'src> {
    tree: Tree,
    text: &'src str,
}

/// Parse `text` as JavaScript.
///
/// Tree-sitter recovers from syntax errors, so this only fails when the
/// grammar cannot be loaded or the parser gives up entirely.  Use
/// [`ParsedSource::is_malformed`] to find out whether recovery happened.
pub fn parse_javascript(text: &str) -> Result<ParsedSource<'_>, ParseError> {
    let mut parser = Parser::new();
    let language: tree_sitter::Language = tree_sitter_javascript::LANGUAGE.into();
    parser.set_language(&language)?;

    let tree = parser.parse(text, None).ok_or(ParseError::Cancelled)?;
    Ok(ParsedSource { tree, text })
}

impl ParsedSource<'_> {
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            node: self.tree.root_node(),
            text: self.text,
        }
    }

    /// True when the parser had to insert error or missing nodes.
    pub fn is_malformed(&self) -> bool {
        self.tree.root_node().has_error()
    }
}

/// A tree node together with the text it was parsed from.
#[derive(Clone, Copy)]
pub struct SyntaxNode<'a> {
    node: Node<'a>,
    text: &'a str,
}

/// The node forms definition lookup cares about.
pub enum Shape<'a> {
    /// A bare name: `UserService`, the `findById` in `a.findById`, or an
    /// object key.
    Identifier(&'a str),
    /// `object.property`
    Member {
        object: SyntaxNode<'a>,
        property: SyntaxNode<'a>,
    },
    /// `left = right`
    Assignment {
        left: SyntaxNode<'a>,
        right: SyntaxNode<'a>,
    },
    /// `{ ... }` with one entry per property, method or spread.
    Object(Vec<ObjectEntry<'a>>),
    /// `( inner )`
    Parenthesized(SyntaxNode<'a>),
    Other,
}

/// One member of an object literal.
pub struct ObjectEntry<'a> {
    /// The node naming the entry (`key` of a pair, `name` of a method,
    /// or the shorthand identifier itself).  `None` for spreads.
    pub key: Option<SyntaxNode<'a>>,
}

impl<'a> SyntaxNode<'a> {
    fn wrap(&self, node: Node<'a>) -> SyntaxNode<'a> {
        SyntaxNode {
            node,
            text: self.text,
        }
    }

    fn field(&self, name: &str) -> Option<SyntaxNode<'a>> {
        self.node.child_by_field_name(name).map(|n| self.wrap(n))
    }

    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    pub fn span(&self) -> Span {
        Span::new(self.node.start_position(), self.node.end_position())
    }

    pub fn parent(&self) -> Option<SyntaxNode<'a>> {
        self.node.parent().map(|n| self.wrap(n))
    }

    /// Named children in source order (punctuation is skipped).
    pub fn children(&self) -> Vec<SyntaxNode<'a>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|n| self.wrap(n))
            .collect()
    }

    /// The exact source text this node covers.
    pub fn source_text(&self) -> &'a str {
        self.text
            .get(self.node.start_byte()..self.node.end_byte())
            .unwrap_or_default()
    }

    /// The name of an identifier-like node, `None` for anything else
    /// (literals, calls, `this`, ...).
    pub fn name(&self) -> Option<&'a str> {
        if IDENTIFIER_KINDS.contains(&self.kind()) {
            Some(self.source_text())
        } else {
            None
        }
    }

    pub fn shape(&self) -> Shape<'a> {
        if let Some(name) = self.name() {
            return Shape::Identifier(name);
        }

        match self.kind() {
            "member_expression" => match (self.field("object"), self.field("property")) {
                (Some(object), Some(property)) => Shape::Member { object, property },
                _ => Shape::Other,
            },
            "assignment_expression" => match (self.field("left"), self.field("right")) {
                (Some(left), Some(right)) => Shape::Assignment { left, right },
                _ => Shape::Other,
            },
            "object" => Shape::Object(self.children().iter().map(Self::object_entry).collect()),
            "parenthesized_expression" => match self.children().into_iter().next() {
                Some(inner) => Shape::Parenthesized(inner),
                None => Shape::Other,
            },
            _ => Shape::Other,
        }
    }

    fn object_entry(entry: &SyntaxNode<'a>) -> ObjectEntry<'a> {
        let key = match entry.kind() {
            "pair" => entry.field("key"),
            "method_definition" => entry.field("name"),
            "shorthand_property_identifier" => Some(*entry),
            _ => None,
        };
        ObjectEntry { key }
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl std::fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxNode")
            .field("kind", &self.kind())
            .field("span", &self.span())
            .finish()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn first_statement_expression<'a>(parsed: &'a ParsedSource<'a>) -> SyntaxNode<'a> {
        let statement = parsed.root().children().remove(0);
        assert_eq!(statement.kind(), "expression_statement");
        statement.children().remove(0)
    }

    #[test]
    fn test_member_expression_shape() {
        let parsed = parse_javascript("UserService.findById;\n").unwrap();
        let expr = first_statement_expression(&parsed);

        match expr.shape() {
            Shape::Member { object, property } => {
                assert_eq!(object.name(), Some("UserService"));
                assert_eq!(property.name(), Some("findById"));
                assert_eq!(property.span().start, Point::new(0, 12));
                assert_eq!(property.span().end, Point::new(0, 20));
            }
            _ => panic!("expected a member expression"),
        }
    }

    #[test]
    fn test_assignment_with_object_entries() {
        let parsed =
            parse_javascript("module.exports = { a: 1, b() {}, c, ...rest, 'd': 2 };\n").unwrap();
        let expr = first_statement_expression(&parsed);

        let Shape::Assignment { left, right } = expr.shape() else {
            panic!("expected an assignment");
        };
        assert_eq!(left.source_text(), "module.exports");

        let Shape::Object(entries) = right.shape() else {
            panic!("expected an object literal");
        };
        let names: Vec<Option<&str>> = entries
            .iter()
            .map(|e| e.key.and_then(|k| k.name()))
            .collect();
        assert_eq!(names, vec![Some("a"), Some("b"), Some("c"), None, None]);
    }

    #[test]
    fn test_parenthesized_expression_unwraps() {
        let parsed = parse_javascript("x = ({ a: 1 });\n").unwrap();
        let expr = first_statement_expression(&parsed);

        let Shape::Assignment { right, .. } = expr.shape() else {
            panic!("expected an assignment");
        };
        let Shape::Parenthesized(inner) = right.shape() else {
            panic!("expected parentheses");
        };
        assert!(matches!(inner.shape(), Shape::Object(_)));
    }

    #[test]
    fn test_literals_have_no_name() {
        let parsed = parse_javascript("'hello';\n").unwrap();
        let expr = first_statement_expression(&parsed);
        assert_eq!(expr.name(), None);
        assert!(matches!(expr.shape(), Shape::Other));
    }

    #[test]
    fn test_malformed_source_is_flagged() {
        let parsed = parse_javascript("module.exports = {\n  a: function( {\n").unwrap();
        assert!(parsed.is_malformed());

        let parsed = parse_javascript("module.exports = {};\n").unwrap();
        assert!(!parsed.is_malformed());
    }

    #[test]
    fn test_span_row_overlap() {
        let span = Span::new(Point::new(2, 4), Point::new(5, 1));
        assert!(span.overlaps_rows(0, 2));
        assert!(span.overlaps_rows(5, 9));
        assert!(span.overlaps_rows(3, 3));
        assert!(!span.overlaps_rows(0, 1));
        assert!(!span.overlaps_rows(6, 8));
    }
}
