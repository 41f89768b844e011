//! Constructors for syntax nodes.
//!
//! Every builder renders C# text and parses it back, returning the typed node
//! detached from the scratch tree (the rust-analyzer `ast_from_text` approach).
//! Nodes compose by text, so the layout of intermediate results does not
//! matter; run [`normalize_whitespace`](super::formatter::normalize_whitespace)
//! on the final tree.

use crate::parser::{
    AstNode, Block, CompilationUnit, Expr, Member, MethodDecl, NamespaceDecl, ObjectCreationExpr,
    Parameter, Stmt, SyntaxError, SyntaxKind, ThrowStmt, TypeDecl, TypeRef, UsingDirective, parse,
};
use thiserror::Error;

/// A builder produced text that does not parse as the requested node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generated {node} is malformed: `{text}`")]
pub struct MakeError {
    pub node: &'static str,
    pub text: String,
    pub errors: Vec<SyntaxError>,
}

fn ast_from_text<N: AstNode>(text: &str) -> Result<N, MakeError> {
    let parse = parse(text);
    let malformed = |errors: Vec<SyntaxError>| MakeError {
        node: std::any::type_name::<N>().rsplit("::").next().unwrap_or("node"),
        text: text.to_string(),
        errors,
    };
    if !parse.ok() {
        return Err(malformed(parse.errors));
    }
    parse
        .syntax()
        .descendants()
        .find_map(N::cast)
        .and_then(|node| N::cast(node.syntax().clone_subtree()))
        .ok_or_else(|| malformed(Vec::new()))
}

/// Keyword text of a modifier kind; `None` for non-modifiers.
fn modifier_text(kind: SyntaxKind) -> Option<&'static str> {
    let text = match kind {
        SyntaxKind::PUBLIC_KW => "public",
        SyntaxKind::PRIVATE_KW => "private",
        SyntaxKind::PROTECTED_KW => "protected",
        SyntaxKind::INTERNAL_KW => "internal",
        SyntaxKind::STATIC_KW => "static",
        SyntaxKind::ABSTRACT_KW => "abstract",
        SyntaxKind::SEALED_KW => "sealed",
        SyntaxKind::VIRTUAL_KW => "virtual",
        SyntaxKind::OVERRIDE_KW => "override",
        SyntaxKind::ASYNC_KW => "async",
        SyntaxKind::READONLY_KW => "readonly",
        SyntaxKind::PARTIAL_KW => "partial",
        SyntaxKind::CONST_KW => "const",
        SyntaxKind::NEW_KW => "new",
        SyntaxKind::EVENT_KW => "event",
        _ => return None,
    };
    Some(text)
}

fn modifiers_text(modifiers: &[SyntaxKind]) -> String {
    modifiers
        .iter()
        .filter_map(|&k| modifier_text(k))
        .map(|m| format!("{m} "))
        .collect()
}

fn join<N: AstNode>(nodes: &[N], sep: &str) -> String {
    nodes
        .iter()
        .map(|n| n.syntax().to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

// ============================================================================
// Types and names
// ============================================================================

/// Parses a type, e.g. `Task`, `CommandHandler<A, B>`, `System.String`.
pub fn ty(text: &str) -> Result<TypeRef, MakeError> {
    ast_from_text(&format!("class __ {{ {text} __f; }}"))
}

pub fn generic_type(name: &str, args: &[TypeRef]) -> Result<TypeRef, MakeError> {
    ty(&format!("{name}<{}>", join(args, ", ")))
}

pub fn using_directive(namespace: &str) -> Result<UsingDirective, MakeError> {
    ast_from_text(&format!("using {namespace};"))
}

// ============================================================================
// Expressions and statements
// ============================================================================

/// `new T()`
pub fn object_creation(ty: &TypeRef) -> Result<ObjectCreationExpr, MakeError> {
    ast_from_text(&format!("class __ {{ object __f = new {}(); }}", ty.syntax()))
}

pub fn throw_stmt(expr: &Expr) -> Result<ThrowStmt, MakeError> {
    ast_from_text(&format!("class __ {{ void __m() {{ throw {}; }} }}", expr.syntax()))
}

pub fn block(stmts: &[Stmt]) -> Result<Block, MakeError> {
    ast_from_text(&format!(
        "class __ {{ void __m() {{ {} }} }}",
        join(stmts, " ")
    ))
}

// ============================================================================
// Declarations
// ============================================================================

/// `T name` or `T name = default_value`
pub fn param(ty: &TypeRef, name: &str, default_value: Option<&str>) -> Result<Parameter, MakeError> {
    let default_value = default_value
        .map(|d| format!(" = {d}"))
        .unwrap_or_default();
    ast_from_text(&format!(
        "class __ {{ void __m({} {name}{default_value}) {{ }} }}",
        ty.syntax()
    ))
}

pub fn method(
    modifiers: &[SyntaxKind],
    return_type: &TypeRef,
    name: &str,
    params: &[Parameter],
    body: &Block,
) -> Result<MethodDecl, MakeError> {
    ast_from_text(&format!(
        "class __ {{ {}{} {name}({}) {} }}",
        modifiers_text(modifiers),
        return_type.syntax(),
        join(params, ", "),
        body.syntax()
    ))
}

/// Class with an optional base list and members.
pub fn class(
    modifiers: &[SyntaxKind],
    name: &str,
    bases: &[TypeRef],
    members: &[Member],
) -> Result<TypeDecl, MakeError> {
    let base_list = if bases.is_empty() {
        String::new()
    } else {
        format!(" : {}", join(bases, ", "))
    };
    ast_from_text(&format!(
        "{}class {name}{base_list} {{ {} }}",
        modifiers_text(modifiers),
        join(members, " ")
    ))
}

/// Block-bodied namespace.
pub fn namespace(name: &str, types: &[TypeDecl]) -> Result<NamespaceDecl, MakeError> {
    ast_from_text(&format!("namespace {name} {{ {} }}", join(types, " ")))
}

pub fn compilation_unit(
    usings: &[UsingDirective],
    namespaces: &[NamespaceDecl],
) -> Result<CompilationUnit, MakeError> {
    ast_from_text(&format!("{} {}", join(usings, " "), join(namespaces, " ")))
}
