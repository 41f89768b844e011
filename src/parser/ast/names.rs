use super::*;

// ============================================================================
// Declared names
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }

    /// Identifier text with a leading verbatim `@` removed.
    pub fn text(&self) -> Option<String> {
        self.ident()
            .map(|t| t.text().trim_start_matches('@').to_string())
    }
}

// ============================================================================
// Name references
// ============================================================================

ast_node!(IdentifierName, IDENTIFIER_NAME);

impl IdentifierName {
    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }

    pub fn text(&self) -> Option<String> {
        self.ident()
            .map(|t| t.text().trim_start_matches('@').to_string())
    }
}

ast_node!(GenericName, GENERIC_NAME);

impl GenericName {
    first_child_method!(type_argument_list, TypeArgumentList);

    pub fn ident(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }

    /// The identifier without its type arguments.
    pub fn text(&self) -> Option<String> {
        self.ident()
            .map(|t| t.text().trim_start_matches('@').to_string())
    }

    pub fn type_arguments(&self) -> Vec<TypeRef> {
        self.type_argument_list()
            .map(|list| list.types().collect())
            .unwrap_or_default()
    }
}

ast_node!(TypeArgumentList, TYPE_ARGUMENT_LIST);

impl TypeArgumentList {
    children_method!(types, TypeRef);
}

ast_node!(QualifiedName, QUALIFIED_NAME);

impl QualifiedName {
    /// Left side (`A.B` in `A.B.C`).
    pub fn left(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }

    /// Rightmost simple name.
    pub fn right(&self) -> Option<SimpleName> {
        self.0.children().filter_map(SimpleName::cast).last()
    }

    /// Dotted segments, left to right.
    pub fn segments(&self) -> Vec<String> {
        let mut segments = match self.left() {
            Some(TypeRef::Qualified(q)) => q.segments(),
            Some(other) => other.simple_name().into_iter().collect(),
            None => Vec::new(),
        };
        if let Some(right) = self.right().and_then(|r| r.text()) {
            segments.push(right);
        }
        segments
    }
}

ast_node!(NullableType, NULLABLE_TYPE);

impl NullableType {
    first_child_method!(element_type, TypeRef);
}

ast_node!(ArrayType, ARRAY_TYPE);

impl ArrayType {
    first_child_method!(element_type, TypeRef);
}

ast_enum! {
    /// Identifier or generic name: the unqualified forms of a name.
    SimpleName {
        Identifier(IdentifierName) = IDENTIFIER_NAME,
        Generic(GenericName) = GENERIC_NAME,
    }
}

impl SimpleName {
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Identifier(it) => it.text(),
            Self::Generic(it) => it.text(),
        }
    }

    pub fn type_arguments(&self) -> Vec<TypeRef> {
        match self {
            Self::Identifier(_) => Vec::new(),
            Self::Generic(it) => it.type_arguments(),
        }
    }
}

ast_enum! {
    /// Any type syntax.
    TypeRef {
        Identifier(IdentifierName) = IDENTIFIER_NAME,
        Generic(GenericName) = GENERIC_NAME,
        Qualified(QualifiedName) = QUALIFIED_NAME,
        Nullable(NullableType) = NULLABLE_TYPE,
        Array(ArrayType) = ARRAY_TYPE,
    }
}

impl TypeRef {
    /// Rightmost identifier: `Invoice` for `Aurora.Billing.Invoice`,
    /// `Task` for `Task<InvoiceDto>`, `Invoice` for `Invoice?`.
    pub fn simple_name(&self) -> Option<String> {
        match self {
            Self::Identifier(it) => it.text(),
            Self::Generic(it) => it.text(),
            Self::Qualified(it) => it.right().and_then(|r| r.text()),
            Self::Nullable(it) => it.element_type().and_then(|t| t.simple_name()),
            Self::Array(it) => it.element_type().and_then(|t| t.simple_name()),
        }
    }

    /// Type arguments of the rightmost generic segment.
    pub fn type_arguments(&self) -> Vec<TypeRef> {
        match self {
            Self::Generic(it) => it.type_arguments(),
            Self::Qualified(it) => it.right().map(|r| r.type_arguments()).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Whether this is a bare identifier (no qualification, arguments or suffix).
    pub fn is_simple_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_))
    }
}
