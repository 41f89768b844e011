//! Cursor-to-node queries over a syntax tree.

use crate::parser::{AstNode, SyntaxKind, SyntaxNode, TextRange, TypeDecl};
use rowan::{NodeOrToken, TokenAtOffset};

/// Smallest node covering `range`, widened to the outermost ancestor with the
/// same range.
///
/// For an empty range (a caret) the token starting at the offset wins over the
/// one ending there, unless it is trivia: a caret in `new Foo|()` lands on
/// `(`, a caret in `new Foo| ()` lands on `Foo`.
///
/// Returns `None` when the range lies outside the tree.
pub fn find_node(root: &SyntaxNode, range: TextRange) -> Option<SyntaxNode> {
    if !root.text_range().contains_range(range) {
        return None;
    }

    let mut node = if range.is_empty() {
        let token = match root.token_at_offset(range.start()) {
            TokenAtOffset::None => return Some(root.clone()),
            TokenAtOffset::Single(token) => token,
            TokenAtOffset::Between(left, right) => {
                if right.kind().is_trivia() && !left.kind().is_trivia() {
                    left
                } else {
                    right
                }
            }
        };
        token.parent()?
    } else {
        match root.covering_element(range) {
            NodeOrToken::Node(node) => node,
            NodeOrToken::Token(token) => token.parent()?,
        }
    };

    while let Some(parent) = node.parent() {
        if parent.text_range() != node.text_range() {
            break;
        }
        node = parent;
    }
    Some(node)
}

/// Nearest node of type `N` starting at `node` and walking up.
pub fn ancestor_or_self<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.ancestors().find_map(N::cast)
}

/// Nodes of type `N` touched by `selection`.
///
/// Descendants of the node found at `selection` that intersect it are
/// returned first. If there are none, the ancestors of that node are searched
/// for a single match instead, stopping at the first block when
/// `stop_at_block` is set.
pub fn extract_selected_nodes<N: AstNode>(
    root: &SyntaxNode,
    selection: TextRange,
    stop_at_block: bool,
) -> Vec<N> {
    let Some(current) = find_node(root, selection) else {
        return Vec::new();
    };

    let found: Vec<N> = current
        .descendants()
        .skip(1)
        .filter(|n| n.text_range().intersect(selection).is_some())
        .filter_map(N::cast)
        .collect();
    if !found.is_empty() {
        return found;
    }

    for ancestor in current.ancestors() {
        if stop_at_block && ancestor.kind() == SyntaxKind::BLOCK {
            break;
        }
        if let Some(result) = N::cast(ancestor) {
            return vec![result];
        }
    }
    Vec::new()
}

/// Containing namespace of the first class declaration intersecting `span`.
///
/// This is the namespace a refactoring at `span` is considered to live in.
/// Returns `None` when no class intersects the span or the class sits in the
/// global namespace.
pub fn namespace_at(root: &SyntaxNode, span: TextRange) -> Option<String> {
    root.descendants()
        .filter(|n| n.kind() == SyntaxKind::CLASS_DECL)
        .filter(|n| n.text_range().intersect(span).is_some())
        .find_map(TypeDecl::cast)
        .and_then(|class| class.containing_namespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{IdentifierName, ObjectCreationExpr, parse};
    use rowan::TextSize;

    /// Source with a `$0` caret marker; returns text and caret range.
    fn fixture(text: &str) -> (String, TextRange) {
        let offset = text.find("$0").unwrap();
        let text = text.replace("$0", "");
        let at = TextSize::new(offset as u32);
        (text, TextRange::empty(at))
    }

    #[test]
    fn test_find_node_caret_inside_identifier() {
        let (text, caret) = fixture("class A { void M() { var c = new CreateInv$0oiceCommand(); } }");
        let root = parse(&text).syntax();
        let node = find_node(&root, caret).unwrap();
        assert_eq!(node.kind(), SyntaxKind::IDENTIFIER_NAME);
        assert_eq!(node.parent().unwrap().kind(), SyntaxKind::OBJECT_CREATION_EXPR);
    }

    #[test]
    fn test_find_node_caret_before_trivia_prefers_left() {
        let (text, caret) = fixture("class A { void M() { Send(x$0 ); } }");
        let root = parse(&text).syntax();
        let node = find_node(&root, caret).unwrap();
        // `x` and its ARGUMENT share a range; the outermost one is returned
        assert_eq!(node.kind(), SyntaxKind::ARGUMENT);
    }

    #[test]
    fn test_find_node_widens_to_outermost_equal_range() {
        let text = "class A { void M() { x; } }";
        let root = parse(text).syntax();
        let start = text.find("x;").unwrap() as u32;
        let range = TextRange::at(TextSize::new(start), TextSize::new(1));
        let node = find_node(&root, range).unwrap();
        // IDENTIFIER_NAME `x` has no wider ancestor of the same range
        assert_eq!(node.kind(), SyntaxKind::IDENTIFIER_NAME);

        let whole = TextRange::at(TextSize::new(start), TextSize::new(2));
        assert_eq!(find_node(&root, whole).unwrap().kind(), SyntaxKind::EXPRESSION_STMT);
    }

    #[test]
    fn test_find_node_out_of_range() {
        let root = parse("class A { }").syntax();
        let range = TextRange::empty(TextSize::new(500));
        assert!(find_node(&root, range).is_none());
    }

    #[test]
    fn test_ancestor_or_self() {
        let (text, caret) = fixture("class A { void M() { var c = new Foo$0Command(); } }");
        let root = parse(&text).syntax();
        let node = find_node(&root, caret).unwrap();
        assert!(ancestor_or_self::<IdentifierName>(&node).is_some());
        assert!(ancestor_or_self::<ObjectCreationExpr>(&node).is_some());
        assert!(ancestor_or_self::<TypeDecl>(&node).is_some());
    }

    #[test]
    fn test_extract_selected_nodes_descendants_first() {
        let text = "class A { void M() { var a = new X(); var b = new Y(); } }";
        let root = parse(text).syntax();
        let start = text.find("var a").unwrap() as u32;
        let end = text.find("); }").unwrap() as u32;
        let selection = TextRange::new(TextSize::new(start), TextSize::new(end));
        let found: Vec<ObjectCreationExpr> = extract_selected_nodes(&root, selection, false);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_extract_selected_nodes_falls_back_to_ancestor() {
        let (text, caret) = fixture("class A { void M() { var a = new X$0(); } }");
        let root = parse(&text).syntax();
        let found: Vec<ObjectCreationExpr> = extract_selected_nodes(&root, caret, false);
        assert_eq!(found.len(), 1);

        let stopped: Vec<TypeDecl> = extract_selected_nodes(&root, caret, true);
        assert!(stopped.is_empty());
    }

    #[test]
    fn test_namespace_at() {
        let (text, caret) = fixture(
            "namespace Aurora.Billing.Api { public class C { void M() { new A$0Command(); } } }",
        );
        let root = parse(&text).syntax();
        assert_eq!(namespace_at(&root, caret).as_deref(), Some("Aurora.Billing.Api"));
    }

    #[test]
    fn test_namespace_at_outside_any_class() {
        let (text, caret) = fixture("namespace Aurora.Billing { $0 public class C { } }");
        let root = parse(&text).syntax();
        assert_eq!(namespace_at(&root, caret), None);
    }
}
