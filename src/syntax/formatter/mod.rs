//! Deterministic whitespace normalizer for C# trees
//!
//! Every piece of original whitespace is discarded and replaced by a canonical
//! layout: braces of namespaces, types and blocks on their own lines, one
//! statement or member per line, single spaces between tokens except where
//! C# convention writes them tight (`Foo(x)`, `a.b`, `List<int>`). Accessor
//! lists and initializers stay on one line (`{ get; set; }`).
//!
//! Comments and preprocessor lines are kept. The output depends only on the
//! token sequence and the tree shape, so identical trees render to identical
//! bytes.

mod options;

#[cfg(test)]
mod tests;

use crate::parser::{SyntaxKind, SyntaxNode, SyntaxToken};
pub use options::FormatOptions;

/// Separator emitted between two adjacent significant tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    None,
    Space,
    Newline,
    BlankLine,
}

/// Re-render a tree with canonical whitespace.
pub fn normalize_whitespace(node: &SyntaxNode, options: &FormatOptions) -> String {
    let mut output = String::new();
    let mut indent_level: usize = 0;
    let mut prev: Option<SyntaxToken> = None;

    let tokens = node
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() != SyntaxKind::WHITESPACE);

    for token in tokens {
        if token.kind() == SyntaxKind::R_BRACE && is_block_brace(&token) {
            indent_level = indent_level.saturating_sub(1);
        }

        if let Some(prev) = &prev {
            match separator(prev, &token) {
                Separator::None => {}
                Separator::Space => output.push(' '),
                Separator::Newline => {
                    output.push_str(&options.end_of_line);
                    output.push_str(&options.indent(indent_level));
                }
                Separator::BlankLine => {
                    output.push_str(&options.end_of_line);
                    output.push_str(&options.end_of_line);
                    output.push_str(&options.indent(indent_level));
                }
            }
        }

        output.push_str(token.text().trim_end());

        if token.kind() == SyntaxKind::L_BRACE && is_block_brace(&token) {
            indent_level += 1;
        }
        prev = Some(token);
    }

    if prev.is_some() {
        output.push_str(&options.end_of_line);
    }
    output
}

/// Braces that open or close a multi-line body.
fn is_block_brace(token: &SyntaxToken) -> bool {
    token.parent().is_some_and(|p| {
        let kind = p.kind();
        kind == SyntaxKind::BLOCK || kind == SyntaxKind::NAMESPACE_DECL || kind.is_type_declaration()
    })
}

fn parent_kind(token: &SyntaxToken) -> Option<SyntaxKind> {
    token.parent().map(|p| p.kind())
}

/// Whether the original text had a line break between `prev` and `next`.
fn had_line_break(next: &SyntaxToken) -> bool {
    next.prev_token()
        .is_some_and(|t| t.kind() == SyntaxKind::WHITESPACE && t.text().contains('\n'))
}

fn separator(prev: &SyntaxToken, next: &SyntaxToken) -> Separator {
    use SyntaxKind::*;

    let pk = prev.kind();
    let nk = next.kind();
    let pp = parent_kind(prev);
    let np = parent_kind(next);

    // ---- line structure ----
    if matches!(pk, LINE_COMMENT | DIRECTIVE) || nk == DIRECTIVE {
        return Separator::Newline;
    }
    if matches!(nk, LINE_COMMENT | BLOCK_COMMENT) || pk == BLOCK_COMMENT {
        return if had_line_break(next) {
            Separator::Newline
        } else {
            Separator::Space
        };
    }
    if pk == L_BRACE && is_block_brace(prev) {
        return Separator::Newline;
    }
    if matches!(nk, L_BRACE | R_BRACE) && is_block_brace(next) {
        return Separator::Newline;
    }
    if pk == R_BRACE && is_block_brace(prev) {
        return match nk {
            SEMICOLON | COMMA | R_PAREN => Separator::None,
            _ => Separator::Newline,
        };
    }
    if pk == R_BRACE && pp == Some(ACCESSOR_LIST) && nk != EQ {
        return Separator::Newline;
    }
    if pk == SEMICOLON && pp != Some(ACCESSOR) {
        return match pp {
            Some(USING_DIRECTIVE) if np != Some(USING_DIRECTIVE) => Separator::BlankLine,
            Some(FILE_SCOPED_NAMESPACE_DECL) => Separator::BlankLine,
            _ => Separator::Newline,
        };
    }
    if pk == R_BRACKET && pp == Some(ATTRIBUTE_LIST) && attribute_owner_is_declaration(prev) {
        return Separator::Newline;
    }

    // ---- no space before ----
    match nk {
        SEMICOLON | COMMA | DOT | QUESTION_DOT | R_PAREN | R_BRACKET => return Separator::None,
        L_PAREN
            if matches!(np, Some(ARGUMENT_LIST | PARAMETER_LIST | LITERAL_EXPR))
                && matches!(pk, IDENT | GT | NEW_KW | THIS_KW | BASE_KW | DEFAULT_KW | R_BRACKET | R_PAREN) =>
        {
            return Separator::None;
        }
        L_BRACKET if matches!(np, Some(ARGUMENT_LIST | ARRAY_TYPE | OBJECT_CREATION_EXPR)) => {
            return Separator::None;
        }
        LT | GT if matches!(np, Some(TYPE_ARGUMENT_LIST | TYPE_PARAMETER_LIST)) => {
            return Separator::None;
        }
        QUESTION if np == Some(NULLABLE_TYPE) => return Separator::None,
        PLUS_PLUS | MINUS_MINUS | BANG if np == Some(POSTFIX_EXPR) => return Separator::None,
        COLON if matches!(np, Some(ARGUMENT | ATTRIBUTE_LIST)) => return Separator::None,
        _ => {}
    }

    // ---- no space after ----
    match pk {
        L_PAREN | L_BRACKET | DOT | QUESTION_DOT => Separator::None,
        LT if matches!(pp, Some(TYPE_ARGUMENT_LIST | TYPE_PARAMETER_LIST)) => Separator::None,
        BANG | MINUS | PLUS | PLUS_PLUS | MINUS_MINUS if pp == Some(PREFIX_EXPR) => Separator::None,
        R_PAREN if pp == Some(CAST_EXPR) => Separator::None,
        _ => Separator::Space,
    }
}

/// Attributes on types and members sit on their own line; on parameters they don't.
fn attribute_owner_is_declaration(token: &SyntaxToken) -> bool {
    token
        .parent()
        .and_then(|list| list.parent())
        .is_some_and(|owner| {
            let kind = owner.kind();
            kind.is_type_declaration()
                || matches!(
                    kind,
                    SyntaxKind::FIELD_DECL
                        | SyntaxKind::EVENT_FIELD_DECL
                        | SyntaxKind::PROPERTY_DECL
                        | SyntaxKind::METHOD_DECL
                        | SyntaxKind::CONSTRUCTOR_DECL
                )
        })
}
