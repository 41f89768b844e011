//! Intent classification: what is the developer typing at the cursor?
//!
//! Recognized shapes:
//!
//! ```text
//! new CreateInvoiceCommand()                          ObjectCreation
//! bus.SendCommand<CreateInvoiceCommand>(...)          Dispatch
//! bus.SendQuery<GetInvoiceQuery, InvoiceDto>(...)     DispatchWithResult
//! bus.SendCommand(command)                            InferredDispatch
//! ```
//!
//! Await expressions, local declarations, type-argument identifiers and
//! member-access chains unwrap to the dispatch shapes.

use smol_str::SmolStr;
use tracing::debug;

use crate::hir::SemanticModel;
use crate::parser::{
    AstNode, AwaitExpr, Expr, GenericName, IdentifierName, InvocationExpr, LocalDeclarationStmt,
    MemberAccessExpr, SimpleName, SyntaxKind, SyntaxNode, TypeRef, VariableDeclarator,
};

use super::conventions::RequestKind;

/// A recognized request context and the names it proposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// `new CreateInvoiceCommand()`
    ObjectCreation { kind: RequestKind, request: SmolStr },
    /// `SendCommand<CreateInvoiceCommand>(...)`
    Dispatch { kind: RequestKind, request: SmolStr },
    /// `SendCommand<CreateInvoiceCommand, InvoiceDto>(...)`
    DispatchWithResult {
        kind: RequestKind,
        request: SmolStr,
        dto: SmolStr,
    },
    /// `SendCommand(command)`, named after the argument's inferred type.
    InferredDispatch { kind: RequestKind, request: SmolStr },
}

impl Intent {
    pub fn kind(&self) -> RequestKind {
        match self {
            Intent::ObjectCreation { kind, .. }
            | Intent::Dispatch { kind, .. }
            | Intent::DispatchWithResult { kind, .. }
            | Intent::InferredDispatch { kind, .. } => *kind,
        }
    }

    pub fn request(&self) -> &str {
        match self {
            Intent::ObjectCreation { request, .. }
            | Intent::Dispatch { request, .. }
            | Intent::DispatchWithResult { request, .. }
            | Intent::InferredDispatch { request, .. } => request,
        }
    }

    pub fn dto(&self) -> Option<&str> {
        match self {
            Intent::DispatchWithResult { dto, .. } => Some(dto),
            _ => None,
        }
    }
}

/// Classify the node the cursor resolved to.
pub fn classify(node: &SyntaxNode, semantic: &SemanticModel) -> Option<Intent> {
    // Declared names (`var result = ...`) stand for their declaration.
    let node = if node.kind() == SyntaxKind::NAME {
        node.parent()?
    } else {
        node.clone()
    };

    let intent = match node.kind() {
        SyntaxKind::IDENTIFIER_NAME => {
            let name = IdentifierName::cast(node.clone())?;
            classify_identifier(&name, semantic)
        }
        SyntaxKind::GENERIC_NAME => classify_generic(&GenericName::cast(node)?),
        SyntaxKind::VARIABLE_DECLARATOR => {
            classify_declarator(&VariableDeclarator::cast(node)?, semantic)
        }
        SyntaxKind::AWAIT_EXPR => match AwaitExpr::cast(node)?.expr()? {
            Expr::Invocation(call) => classify_invocation(&call, semantic),
            _ => None,
        },
        SyntaxKind::INVOCATION_EXPR => classify_invocation(&InvocationExpr::cast(node)?, semantic),
        _ => None,
    };

    if intent.is_none() {
        debug!("no request intent at cursor");
    }
    intent
}

fn classify_identifier(name: &IdentifierName, semantic: &SemanticModel) -> Option<Intent> {
    let parent = name.syntax().parent()?;
    match parent.kind() {
        SyntaxKind::OBJECT_CREATION_EXPR => {
            let request = name.text()?;
            let kind = RequestKind::from_request_name(&request)?;
            Some(Intent::ObjectCreation {
                kind,
                request: request.into(),
            })
        }
        SyntaxKind::TYPE_ARGUMENT_LIST => {
            let generic = parent.parent().and_then(GenericName::cast)?;
            classify_generic(&generic)
        }
        SyntaxKind::MEMBER_ACCESS_EXPR => {
            // Climb `a.b.SendCommand` to the outermost access.
            let mut access = MemberAccessExpr::cast(parent)?;
            while let Some(outer) = access.syntax().parent().and_then(MemberAccessExpr::cast) {
                access = outer;
            }
            match access.name()? {
                SimpleName::Generic(generic) => classify_generic(&generic),
                SimpleName::Identifier(method) => {
                    let call = access.syntax().parent().and_then(InvocationExpr::cast)?;
                    classify_inferred(&method, &call, semantic)
                }
            }
        }
        SyntaxKind::INVOCATION_EXPR => {
            let call = InvocationExpr::cast(parent)?;
            classify_inferred(name, &call, semantic)
        }
        _ => None,
    }
}

/// `var x = await bus.SendCommand<...>(...)`: the first invocation of the
/// enclosing local declaration.
fn classify_declarator(declarator: &VariableDeclarator, semantic: &SemanticModel) -> Option<Intent> {
    let statement = declarator
        .syntax()
        .ancestors()
        .find_map(LocalDeclarationStmt::cast)?;
    let call = statement.descendants::<InvocationExpr>().next()?;
    classify_invocation(&call, semantic)
}

fn classify_invocation(call: &InvocationExpr, semantic: &SemanticModel) -> Option<Intent> {
    match call.method_name()? {
        SimpleName::Generic(generic) => classify_generic(&generic),
        SimpleName::Identifier(method) => classify_inferred(&method, call, semantic),
    }
}

/// `SendCommand<A>` / `SendCommand<A, B>` / `SendQuery<A, B>`.
fn classify_generic(generic: &GenericName) -> Option<Intent> {
    let kind = RequestKind::from_verb(&generic.text()?)?;
    let args = generic.type_arguments();

    let simple = |ty: &TypeRef| match ty {
        TypeRef::Identifier(it) => it.text().map(SmolStr::from),
        _ => None,
    };

    match args.as_slice() {
        [request] if kind == RequestKind::Command => {
            let request = simple(request).filter(|r| kind.matches(r))?;
            Some(Intent::Dispatch { kind, request })
        }
        [request, dto] => {
            let request = simple(request).filter(|r| kind.matches(r))?;
            let dto = simple(dto)?;
            Some(Intent::DispatchWithResult { kind, request, dto })
        }
        _ => None,
    }
}

/// `SendCommand(command)` where `command`'s type names a command.
fn classify_inferred(
    method: &IdentifierName,
    call: &InvocationExpr,
    semantic: &SemanticModel,
) -> Option<Intent> {
    let kind = RequestKind::Command;
    if method.text()? != kind.conventions().verb {
        return None;
    }
    let arguments = call.arguments();
    let [argument] = arguments.as_slice() else {
        return None;
    };
    let ty = semantic.type_of(&argument.expr()?)?;
    if !ty.args.is_empty() || ty.array || !kind.matches(&ty.name) {
        return None;
    }
    Some(Intent::InferredDispatch {
        kind,
        request: ty.name,
    })
}
