use super::*;
use crate::parser::Parse;

// ============================================================================
// Root
// ============================================================================

ast_node!(CompilationUnit, COMPILATION_UNIT);

impl CompilationUnit {
    children_method!(usings, UsingDirective);
    children_method!(namespaces, NamespaceDecl);
    children_method!(types, TypeDecl);

    /// Every type declaration in the file, nested ones included, in source order.
    pub fn all_types(&self) -> impl Iterator<Item = TypeDecl> + '_ {
        self.0.descendants().filter_map(TypeDecl::cast)
    }
}

impl Parse {
    /// Typed root of the tree.
    pub fn tree(&self) -> CompilationUnit {
        CompilationUnit(self.syntax())
    }
}

// ============================================================================
// Usings
// ============================================================================

ast_node!(UsingDirective, USING_DIRECTIVE);

impl UsingDirective {
    has_token_method!(is_static, STATIC_KW, "using static System.Math;");

    /// Alias name for `using Alias = Target;`.
    pub fn alias(&self) -> Option<Name> {
        self.0.children().find_map(Name::cast)
    }

    pub fn target(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    /// Dotted target without trivia, e.g. `Aurora.Billing.Domain.Dtos`.
    pub fn target_text(&self) -> Option<String> {
        self.target().map(|t| t.text_without_trivia())
    }
}

// ============================================================================
// Namespaces
// ============================================================================

/// Block-bodied or file-scoped namespace declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NamespaceDecl(pub(crate) SyntaxNode);

impl AstNode for NamespaceDecl {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::NAMESPACE_DECL | SyntaxKind::FILE_SCOPED_NAMESPACE_DECL
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        if Self::can_cast(node.kind()) {
            Some(Self(node))
        } else {
            None
        }
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl NamespaceDecl {
    children_method!(usings, UsingDirective);
    children_method!(namespaces, NamespaceDecl);
    children_method!(types, TypeDecl);

    pub fn is_file_scoped(&self) -> bool {
        self.0.kind() == SyntaxKind::FILE_SCOPED_NAMESPACE_DECL
    }

    pub fn name(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    /// Name as written on this declaration only.
    pub fn name_text(&self) -> Option<String> {
        self.name().map(|n| n.text_without_trivia())
    }

    /// Fully qualified name including enclosing namespace declarations.
    pub fn full_name(&self) -> Option<String> {
        let mut parts: Vec<String> = self
            .0
            .ancestors()
            .filter_map(NamespaceDecl::cast)
            .filter_map(|ns| ns.name_text())
            .collect();
        if parts.is_empty() {
            return None;
        }
        parts.reverse();
        Some(parts.join("."))
    }
}
