//! Declared-symbol extraction from the typed AST.

use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::DocumentId;
use crate::parser::{
    AstNode, CompilationUnit, Expr, InvocationExpr, Member, MethodDecl, ParameterList, PropertyDecl,
    SyntaxKind, SyntaxNode, TypeDecl, TypeDeclKind, VariableDeclaration,
};

use super::types::{MemberKind, MemberSymbol, ParameterSymbol, TypeKind, TypeName, TypeSymbol};

/// Attribute the compiler attaches to synthesized members.
pub const COMPILER_GENERATED: &str = "CompilerGenerated";

/// Extract every type declared in a compilation unit, nested types included.
pub fn extract_types(document: DocumentId, unit: &CompilationUnit) -> Vec<Arc<TypeSymbol>> {
    unit.all_types()
        .filter_map(|decl| extract_type(document, &decl))
        .map(Arc::new)
        .collect()
}

/// Extract a single type declaration. Declarations without a name are skipped.
pub fn extract_type(document: DocumentId, decl: &TypeDecl) -> Option<TypeSymbol> {
    let name = decl.name_text()?;
    let kind = TypeKind::from(decl.kind());

    let mut members = Vec::new();
    for member in decl.members() {
        extract_member(&mut members, &member);
    }

    if decl.kind() == TypeDeclKind::Record {
        if let Some(params) = decl.parameter_list() {
            extract_positional_properties(&mut members, &params);
        }
    }

    let has_constructor = members
        .iter()
        .any(|m| m.kind == MemberKind::Constructor && !m.modifiers.contains(&SyntaxKind::STATIC_KW));
    if !has_constructor && kind != TypeKind::Interface && !decl.is_static() {
        members.push(implicit_member(".ctor", MemberKind::Constructor, None));
    }

    Some(TypeSymbol {
        name: name.into(),
        namespace: decl.containing_namespace().map(SmolStr::from),
        containing_type: decl
            .containing_type()
            .and_then(|outer| outer.name_text())
            .map(SmolStr::from),
        kind,
        modifiers: decl.modifiers(),
        attributes: decl.attributes(),
        type_parameters: decl
            .type_parameter_list()
            .map(|list| {
                list.parameters()
                    .filter_map(|p| p.name().and_then(|n| n.text()))
                    .map(SmolStr::from)
                    .collect()
            })
            .unwrap_or_default(),
        base_types: decl
            .base_types()
            .iter()
            .filter_map(TypeName::from_ast)
            .collect(),
        members,
        document,
        range: decl.syntax().text_range(),
    })
}

fn extract_member(out: &mut Vec<MemberSymbol>, member: &Member) {
    match member {
        Member::Field(field) => {
            if let Some(declaration) = field.declaration() {
                extract_variables(
                    out,
                    MemberKind::Field,
                    &declaration,
                    field.modifiers(),
                    field.attributes(),
                );
            }
        }
        Member::Event(event) => {
            if let Some(declaration) = event.declaration() {
                extract_variables(
                    out,
                    MemberKind::Event,
                    &declaration,
                    event.modifiers(),
                    event.attributes(),
                );
            }
        }
        Member::Property(property) => extract_property(out, property),
        Member::Method(method) => {
            if let Some(symbol) = extract_method(method) {
                out.push(symbol);
            }
        }
        Member::Constructor(ctor) => out.push(MemberSymbol {
            name: ".ctor".into(),
            kind: MemberKind::Constructor,
            ty: None,
            parameters: ctor
                .parameter_list()
                .map(|list| extract_parameters(&list))
                .unwrap_or_default(),
            modifiers: ctor.modifiers(),
            attributes: ctor.attributes(),
            is_implicitly_declared: false,
            invoked_identifiers: invoked_identifiers(ctor.syntax()),
            range: Some(ctor.syntax().text_range()),
        }),
        // Nested types are extracted on their own.
        Member::Class(_) | Member::Interface(_) | Member::Struct(_) | Member::Record(_) => {}
    }
}

fn extract_variables(
    out: &mut Vec<MemberSymbol>,
    kind: MemberKind,
    declaration: &VariableDeclaration,
    modifiers: Vec<SyntaxKind>,
    attributes: Vec<String>,
) {
    let ty = declaration.ty().as_ref().and_then(TypeName::from_ast);
    for declarator in declaration.declarators() {
        let Some(name) = declarator.name_text() else {
            continue;
        };
        out.push(MemberSymbol {
            name: name.into(),
            kind,
            ty: ty.clone(),
            parameters: Vec::new(),
            modifiers: modifiers.clone(),
            attributes: attributes.clone(),
            is_implicitly_declared: false,
            invoked_identifiers: Vec::new(),
            range: Some(declarator.syntax().text_range()),
        });
    }
}

fn extract_property(out: &mut Vec<MemberSymbol>, property: &PropertyDecl) {
    let Some(name) = property.name().and_then(|n| n.text()) else {
        return;
    };
    let ty = property.ty().as_ref().and_then(TypeName::from_ast);

    out.push(MemberSymbol {
        name: name.as_str().into(),
        kind: MemberKind::Property,
        ty: ty.clone(),
        parameters: Vec::new(),
        modifiers: property.modifiers(),
        attributes: property.attributes(),
        is_implicitly_declared: false,
        invoked_identifiers: invoked_identifiers(property.syntax()),
        range: Some(property.syntax().text_range()),
    });

    if property.is_auto_property() && !property.is_abstract() {
        let mut field = implicit_member(
            &format!("<{name}>k__BackingField"),
            MemberKind::Field,
            ty,
        );
        field.attributes.push(COMPILER_GENERATED.to_string());
        if property.is_static() {
            field.modifiers.push(SyntaxKind::STATIC_KW);
        }
        out.push(field);
    }
}

fn extract_method(method: &MethodDecl) -> Option<MemberSymbol> {
    let name = method.name_text()?;
    Some(MemberSymbol {
        name: name.into(),
        kind: MemberKind::Method,
        ty: method.return_type().as_ref().and_then(TypeName::from_ast),
        parameters: method
            .parameter_list()
            .map(|list| extract_parameters(&list))
            .unwrap_or_default(),
        modifiers: method.modifiers(),
        attributes: method.attributes(),
        is_implicitly_declared: false,
        invoked_identifiers: invoked_identifiers(method.syntax()),
        range: Some(method.syntax().text_range()),
    })
}

/// `record Invoice(string Number)` declares a public `Number` property.
fn extract_positional_properties(out: &mut Vec<MemberSymbol>, params: &ParameterList) {
    for param in extract_parameters(params) {
        if out.iter().any(|m| m.name == param.name) {
            continue;
        }
        let mut property = implicit_member(&param.name, MemberKind::Property, param.ty);
        property.modifiers.push(SyntaxKind::PUBLIC_KW);
        out.push(property);
    }
}

pub(crate) fn extract_parameters(list: &ParameterList) -> Vec<ParameterSymbol> {
    list.parameters()
        .filter_map(|p| {
            Some(ParameterSymbol {
                name: p.name_text()?.into(),
                ty: p.ty().as_ref().and_then(TypeName::from_ast),
                has_default: p.default_value().is_some(),
                range: p.syntax().text_range(),
            })
        })
        .collect()
}

fn implicit_member(name: &str, kind: MemberKind, ty: Option<TypeName>) -> MemberSymbol {
    MemberSymbol {
        name: name.into(),
        kind,
        ty,
        parameters: Vec::new(),
        modifiers: Vec::new(),
        attributes: Vec::new(),
        is_implicitly_declared: true,
        invoked_identifiers: Vec::new(),
        range: None,
    }
}

/// Callee names of invocations whose target is a bare identifier.
///
/// `PropertyChanged(this, e)` yields `PropertyChanged`; `Handler?.Invoke(x)`
/// and `other.Notify()` yield nothing.
fn invoked_identifiers(node: &SyntaxNode) -> Vec<SmolStr> {
    let mut names: Vec<SmolStr> = node
        .descendants()
        .filter_map(InvocationExpr::cast)
        .filter_map(|call| match call.expr() {
            Some(Expr::Name(name)) => name.text(),
            _ => None,
        })
        .map(SmolStr::from)
        .collect();
    names.dedup();
    names
}
