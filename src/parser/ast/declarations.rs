use super::*;

// ============================================================================
// Type declarations
// ============================================================================

/// Which keyword introduced a type declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeDeclKind {
    Class,
    Interface,
    Struct,
    Record,
}

/// `class`, `interface`, `struct` or `record` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDecl(pub(crate) SyntaxNode);

impl AstNode for TypeDecl {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_type_declaration()
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

impl TypeDecl {
    first_child_method!(name, Name);
    first_child_method!(type_parameter_list, TypeParameterList);
    first_child_method!(parameter_list, ParameterList);
    first_child_method!(base_list, BaseList);
    children_method!(members, Member);
    modifiers_method!();
    has_token_method!(is_partial, PARTIAL_KW);
    has_token_method!(is_static, STATIC_KW);
    has_token_method!(is_abstract, ABSTRACT_KW);

    pub fn kind(&self) -> TypeDeclKind {
        match self.0.kind() {
            SyntaxKind::INTERFACE_DECL => TypeDeclKind::Interface,
            SyntaxKind::STRUCT_DECL => TypeDeclKind::Struct,
            SyntaxKind::RECORD_DECL => TypeDeclKind::Record,
            _ => TypeDeclKind::Class,
        }
    }

    pub fn name_text(&self) -> Option<String> {
        self.name().and_then(|n| n.text())
    }

    /// Types listed after `:`, in order.
    pub fn base_types(&self) -> Vec<TypeRef> {
        self.base_list()
            .map(|list| list.types().filter_map(|b| b.ty()).collect())
            .unwrap_or_default()
    }

    /// Namespace of the innermost enclosing namespace declaration.
    pub fn containing_namespace(&self) -> Option<String> {
        self.0
            .ancestors()
            .find_map(NamespaceDecl::cast)
            .and_then(|ns| ns.full_name())
    }

    /// Enclosing type when this is a nested declaration.
    pub fn containing_type(&self) -> Option<TypeDecl> {
        self.0.ancestors().skip(1).find_map(TypeDecl::cast)
    }
}

ast_node!(AttributeList, ATTRIBUTE_LIST);

impl AttributeList {
    children_method!(attributes, Attribute);
}

ast_node!(Attribute, ATTRIBUTE);

impl Attribute {
    /// Attribute name as written, without trivia.
    pub fn name(&self) -> Option<String> {
        self.0
            .children()
            .find_map(TypeRef::cast)
            .map(|t| t.text_without_trivia())
    }
}

ast_node!(TypeParameterList, TYPE_PARAMETER_LIST);

impl TypeParameterList {
    children_method!(parameters, TypeParameter);
}

ast_node!(TypeParameter, TYPE_PARAMETER);

impl TypeParameter {
    first_child_method!(name, Name);
}

ast_node!(BaseList, BASE_LIST);

impl BaseList {
    children_method!(types, SimpleBaseType);
}

ast_node!(SimpleBaseType, SIMPLE_BASE_TYPE);

impl SimpleBaseType {
    first_child_method!(ty, TypeRef);
}

// ============================================================================
// Members
// ============================================================================

ast_enum! {
    /// Any member of a type body.
    Member {
        Field(FieldDecl) = FIELD_DECL,
        Event(EventFieldDecl) = EVENT_FIELD_DECL,
        Property(PropertyDecl) = PROPERTY_DECL,
        Method(MethodDecl) = METHOD_DECL,
        Constructor(ConstructorDecl) = CONSTRUCTOR_DECL,
        Class(TypeDecl) = CLASS_DECL,
        Interface(TypeDecl) = INTERFACE_DECL,
        Struct(TypeDecl) = STRUCT_DECL,
        Record(TypeDecl) = RECORD_DECL,
    }
}

impl Member {
    /// Nested type declaration, if this member is one.
    pub fn as_type(&self) -> Option<&TypeDecl> {
        match self {
            Self::Class(t) | Self::Interface(t) | Self::Struct(t) | Self::Record(t) => Some(t),
            _ => None,
        }
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    first_child_method!(declaration, VariableDeclaration);
    modifiers_method!();
    has_token_method!(is_static, STATIC_KW);
    has_token_method!(is_const, CONST_KW);
}

ast_node!(EventFieldDecl, EVENT_FIELD_DECL);

impl EventFieldDecl {
    first_child_method!(declaration, VariableDeclaration);
    modifiers_method!();
}

ast_node!(PropertyDecl, PROPERTY_DECL);

impl PropertyDecl {
    first_child_method!(ty, TypeRef);
    first_child_method!(name, Name);
    first_child_method!(accessor_list, AccessorList);
    first_child_method!(expression_body, ArrowExpressionClause);
    first_child_method!(initializer, EqualsValueClause);
    modifiers_method!();
    has_token_method!(is_static, STATIC_KW);
    has_token_method!(is_abstract, ABSTRACT_KW);

    /// `{ get; set; }` style: accessors present and none has a body.
    pub fn is_auto_property(&self) -> bool {
        match self.accessor_list() {
            Some(list) => {
                let accessors: Vec<_> = list.accessors().collect();
                !accessors.is_empty() && accessors.iter().all(|a| !a.has_body())
            }
            None => false,
        }
    }
}

ast_node!(AccessorList, ACCESSOR_LIST);

impl AccessorList {
    children_method!(accessors, Accessor);
}

ast_node!(Accessor, ACCESSOR);

impl Accessor {
    first_child_method!(body, Block);
    first_child_method!(expression_body, ArrowExpressionClause);

    /// `get`, `set`, `init`, `add` or `remove`.
    pub fn keyword(&self) -> Option<String> {
        find_token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    pub fn has_body(&self) -> bool {
        self.body().is_some() || self.expression_body().is_some()
    }
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    first_child_method!(return_type, TypeRef);
    first_child_method!(name, Name);
    first_child_method!(type_parameter_list, TypeParameterList);
    first_child_method!(parameter_list, ParameterList);
    first_child_method!(body, Block);
    first_child_method!(expression_body, ArrowExpressionClause);
    modifiers_method!();
    has_token_method!(is_static, STATIC_KW);
    has_token_method!(is_override, OVERRIDE_KW);
    has_token_method!(is_async, ASYNC_KW);

    pub fn name_text(&self) -> Option<String> {
        self.name().and_then(|n| n.text())
    }
}

ast_node!(ConstructorDecl, CONSTRUCTOR_DECL);

impl ConstructorDecl {
    first_child_method!(name, Name);
    first_child_method!(parameter_list, ParameterList);
    first_child_method!(body, Block);
    first_child_method!(expression_body, ArrowExpressionClause);
    modifiers_method!();
    has_token_method!(is_static, STATIC_KW);
}

ast_node!(ParameterList, PARAMETER_LIST);

impl ParameterList {
    children_method!(parameters, Parameter);
}

ast_node!(Parameter, PARAMETER);

impl Parameter {
    first_child_method!(ty, TypeRef);
    first_child_method!(name, Name);
    first_child_method!(default_value, EqualsValueClause);
    has_token_method!(is_ref, REF_KW);
    has_token_method!(is_out, OUT_KW);
    has_token_method!(is_params, PARAMS_KW);
    has_token_method!(is_this, THIS_KW, "this string s");

    pub fn name_text(&self) -> Option<String> {
        self.name().and_then(|n| n.text())
    }
}

// ============================================================================
// Variables
// ============================================================================

ast_node!(VariableDeclaration, VARIABLE_DECLARATION);

impl VariableDeclaration {
    first_child_method!(ty, TypeRef);
    children_method!(declarators, VariableDeclarator);

    /// `var x = ...` declarations infer their type from the initializer.
    pub fn is_implicitly_typed(&self) -> bool {
        matches!(self.ty(), Some(TypeRef::Identifier(ref id)) if id.text().as_deref() == Some("var"))
    }
}

ast_node!(VariableDeclarator, VARIABLE_DECLARATOR);

impl VariableDeclarator {
    first_child_method!(name, Name);
    first_child_method!(initializer, EqualsValueClause);

    pub fn name_text(&self) -> Option<String> {
        self.name().and_then(|n| n.text())
    }

    /// The declaration this declarator belongs to.
    pub fn declaration(&self) -> Option<VariableDeclaration> {
        self.0.parent().and_then(VariableDeclaration::cast)
    }
}

ast_node!(EqualsValueClause, EQUALS_VALUE_CLAUSE);

impl EqualsValueClause {
    first_child_method!(value, Expr);
}

ast_node!(ArrowExpressionClause, ARROW_EXPRESSION_CLAUSE);

impl ArrowExpressionClause {
    first_child_method!(expr, Expr);
}
