//! Compilation-unit builders for requests, handlers and DTOs.
//!
//! Builders are pure: identical inputs render byte-identical units. Each
//! unit is assembled with [`make`], laid out by the whitespace normalizer and
//! parsed back; output that does not re-parse cleanly is an error, never a
//! document.

use smol_str::SmolStr;
use thiserror::Error;

use crate::base::naming::TemplateError;
use crate::parser::{
    AstNode, CompilationUnit, Expr, Member, Stmt, SyntaxError, SyntaxKind, TypeDecl, TypeRef, parse,
};
use crate::syntax::{FormatOptions, MakeError, make, normalize_whitespace};

use super::conventions::{ArtifactKind, RequestKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Make(#[from] MakeError),
    #[error("generated unit for `{name}` does not re-parse: {errors:?}")]
    Malformed {
        name: SmolStr,
        errors: Vec<SyntaxError>,
    },
    #[error("`{0}` does not carry the request suffix")]
    NotARequest(SmolStr),
}

/// A formatted, re-parsed compilation unit ready to be materialized.
#[derive(Debug, Clone)]
pub struct GeneratedUnit {
    pub kind: ArtifactKind,
    /// Name of the declared type; also the file stem.
    pub name: SmolStr,
    pub namespace: String,
    pub unit: CompilationUnit,
    pub text: String,
}

/// Namespace and usings a unit is generated into.
#[derive(Debug, Clone, Copy)]
pub struct UnitContext<'a> {
    pub namespace: &'a str,
    pub usings: &'a [String],
    pub format: &'a FormatOptions,
}

/// Sorted, deduplicated usings without the target namespace or its parents.
pub fn prepare_usings(usings: &[String], namespace: &str) -> Vec<String> {
    let mut prepared: Vec<String> = usings
        .iter()
        .map(|u| u.trim())
        .filter(|u| !u.is_empty() && !is_same_or_parent(u, namespace))
        .map(str::to_string)
        .collect();
    prepared.sort();
    prepared.dedup();
    prepared
}

/// `Aurora.Billing` is a parent of `Aurora.Billing.Domain`; `Aurora.Bill` is not.
fn is_same_or_parent(candidate: &str, namespace: &str) -> bool {
    namespace == candidate
        || namespace
            .strip_prefix(candidate)
            .is_some_and(|rest| rest.starts_with('.'))
}

/// `public class <name> : ICommand` (or `IQuery`).
pub fn marker_type(
    kind: RequestKind,
    name: &str,
    cx: UnitContext<'_>,
) -> Result<GeneratedUnit, SynthesisError> {
    let interface = make::ty(kind.conventions().interface)?;
    let class = make::class(&[SyntaxKind::PUBLIC_KW], name, &[interface], &[])?;
    finish(ArtifactKind::Request(kind), name, class, cx)
}

/// `public class <request>Handler : CommandHandler<<request>>` with a stub
/// `HandleAsync` returning `Task`.
pub fn handler(
    kind: RequestKind,
    request: &str,
    cx: UnitContext<'_>,
) -> Result<GeneratedUnit, SynthesisError> {
    let name = handler_name(kind, request)?;
    let base = make::generic_type(kind.conventions().handler_base, &[make::ty(request)?])?;
    let handle = handle_async(kind, request, &make::ty("Task")?)?;
    let class = make::class(&[SyntaxKind::PUBLIC_KW], &name, &[base], &[handle])?;
    finish(ArtifactKind::Handler(kind), &name, class, cx)
}

/// Handler whose base and `HandleAsync` result are parameterized by `dto`.
pub fn handler_with_result(
    kind: RequestKind,
    request: &str,
    dto: &str,
    cx: UnitContext<'_>,
) -> Result<GeneratedUnit, SynthesisError> {
    let name = handler_name(kind, request)?;
    let dto_ty = make::ty(dto)?;
    let base = make::generic_type(
        kind.conventions().handler_base,
        &[make::ty(request)?, dto_ty.clone()],
    )?;
    let returns = make::generic_type("Task", &[dto_ty])?;
    let handle = handle_async(kind, request, &returns)?;
    let class = make::class(&[SyntaxKind::PUBLIC_KW], &name, &[base], &[handle])?;
    finish(ArtifactKind::HandlerWithResult(kind), &name, class, cx)
}

/// `public class <name>` without members.
pub fn dto(name: &str, cx: UnitContext<'_>) -> Result<GeneratedUnit, SynthesisError> {
    let class = make::class(&[SyntaxKind::PUBLIC_KW], name, &[], &[])?;
    finish(ArtifactKind::Dto, name, class, cx)
}

fn handler_name(kind: RequestKind, request: &str) -> Result<String, SynthesisError> {
    kind.handler_name(request)
        .ok_or_else(|| SynthesisError::NotARequest(request.into()))
}

/// `protected override async <returns> HandleAsync(<request> command,
/// CancellationToken token = default) { throw new NotImplementedException(); }`
fn handle_async(
    kind: RequestKind,
    request: &str,
    returns: &TypeRef,
) -> Result<Member, SynthesisError> {
    let params = [
        make::param(&make::ty(request)?, kind.conventions().parameter, None)?,
        make::param(&make::ty("CancellationToken")?, "token", Some("default"))?,
    ];
    let not_implemented = make::object_creation(&make::ty("NotImplementedException")?)?;
    let body = make::block(&[Stmt::Throw(make::throw_stmt(&Expr::ObjectCreation(
        not_implemented,
    ))?)])?;
    let method = make::method(
        &[
            SyntaxKind::PROTECTED_KW,
            SyntaxKind::OVERRIDE_KW,
            SyntaxKind::ASYNC_KW,
        ],
        returns,
        "HandleAsync",
        &params,
        &body,
    )?;
    Ok(Member::Method(method))
}

/// Wrap `class` in its namespace and usings, normalize and re-parse.
fn finish(
    kind: ArtifactKind,
    name: &str,
    class: TypeDecl,
    cx: UnitContext<'_>,
) -> Result<GeneratedUnit, SynthesisError> {
    let usings = prepare_usings(cx.usings, cx.namespace)
        .iter()
        .map(|u| make::using_directive(u))
        .collect::<Result<Vec<_>, _>>()?;
    let namespace = make::namespace(cx.namespace, &[class])?;
    let draft = make::compilation_unit(&usings, &[namespace])?;

    let text = normalize_whitespace(draft.syntax(), cx.format);
    let reparsed = parse(&text);
    if !reparsed.ok() {
        return Err(SynthesisError::Malformed {
            name: name.into(),
            errors: reparsed.errors,
        });
    }

    Ok(GeneratedUnit {
        kind,
        name: name.into(),
        namespace: cx.namespace.to_string(),
        unit: reparsed.tree(),
        text,
    })
}
