use super::*;

ast_enum! {
    /// Any expression.
    Expr {
        Literal(LiteralExpr) = LITERAL_EXPR,
        This(ThisExpr) = THIS_EXPR,
        Base(BaseExpr) = BASE_EXPR,
        Paren(ParenExpr) = PAREN_EXPR,
        Name(IdentifierName) = IDENTIFIER_NAME,
        GenericName(GenericName) = GENERIC_NAME,
        ObjectCreation(ObjectCreationExpr) = OBJECT_CREATION_EXPR,
        ImplicitObjectCreation(ImplicitObjectCreationExpr) = IMPLICIT_OBJECT_CREATION_EXPR,
        Initializer(InitializerExpr) = INITIALIZER_EXPR,
        Invocation(InvocationExpr) = INVOCATION_EXPR,
        MemberAccess(MemberAccessExpr) = MEMBER_ACCESS_EXPR,
        ElementAccess(ElementAccessExpr) = ELEMENT_ACCESS_EXPR,
        Await(AwaitExpr) = AWAIT_EXPR,
        Prefix(PrefixExpr) = PREFIX_EXPR,
        Postfix(PostfixExpr) = POSTFIX_EXPR,
        Binary(BinaryExpr) = BINARY_EXPR,
        Assignment(AssignmentExpr) = ASSIGNMENT_EXPR,
        Conditional(ConditionalExpr) = CONDITIONAL_EXPR,
        Cast(CastExpr) = CAST_EXPR,
        Lambda(LambdaExpr) = LAMBDA_EXPR,
    }
}

/// Kind of a literal expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Number,
    String,
    Char,
    Bool,
    Null,
    Default,
}

ast_node!(LiteralExpr, LITERAL_EXPR);

impl LiteralExpr {
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| !t.kind().is_trivia())
    }

    pub fn kind(&self) -> Option<LiteralKind> {
        let kind = match self.token()?.kind() {
            SyntaxKind::INT_NUMBER => LiteralKind::Number,
            SyntaxKind::STRING => LiteralKind::String,
            SyntaxKind::CHAR => LiteralKind::Char,
            SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW => LiteralKind::Bool,
            SyntaxKind::NULL_KW => LiteralKind::Null,
            SyntaxKind::DEFAULT_KW => LiteralKind::Default,
            _ => return None,
        };
        Some(kind)
    }

    /// `T` in `default(T)`.
    pub fn default_type(&self) -> Option<TypeRef> {
        self.0.children().find_map(TypeRef::cast)
    }
}

ast_node!(ThisExpr, THIS_EXPR);
ast_node!(BaseExpr, BASE_EXPR);

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    first_child_method!(expr, Expr);
}

ast_node!(ObjectCreationExpr, OBJECT_CREATION_EXPR);

impl ObjectCreationExpr {
    first_child_method!(ty, TypeRef);
    first_child_method!(argument_list, ArgumentList);
    first_child_method!(initializer, InitializerExpr);
}

ast_node!(ImplicitObjectCreationExpr, IMPLICIT_OBJECT_CREATION_EXPR);

impl ImplicitObjectCreationExpr {
    first_child_method!(argument_list, ArgumentList);
    first_child_method!(initializer, InitializerExpr);
}

ast_node!(InitializerExpr, INITIALIZER_EXPR);

impl InitializerExpr {
    children_method!(elements, Expr);
}

ast_node!(InvocationExpr, INVOCATION_EXPR);

impl InvocationExpr {
    first_child_method!(expr, Expr);
    first_child_method!(argument_list, ArgumentList);

    pub fn arguments(&self) -> Vec<Argument> {
        self.argument_list()
            .map(|list| list.arguments().collect())
            .unwrap_or_default()
    }

    /// Name of the invoked method: `M` for `M(x)`, `a.b.M(x)` and `M<T>(x)`.
    pub fn method_name(&self) -> Option<SimpleName> {
        match self.expr()? {
            Expr::Name(it) => Some(SimpleName::Identifier(it)),
            Expr::GenericName(it) => Some(SimpleName::Generic(it)),
            Expr::MemberAccess(it) => it.name(),
            _ => None,
        }
    }
}

ast_node!(MemberAccessExpr, MEMBER_ACCESS_EXPR);

impl MemberAccessExpr {
    has_token_method!(is_conditional, QUESTION_DOT, "a?.b");

    /// Receiver on the left of the dot.
    pub fn expr(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    /// Accessed member on the right of the dot.
    pub fn name(&self) -> Option<SimpleName> {
        let mut children = self.0.children();
        children.next()?;
        children.find_map(SimpleName::cast)
    }
}

ast_node!(ElementAccessExpr, ELEMENT_ACCESS_EXPR);

impl ElementAccessExpr {
    first_child_method!(expr, Expr);
    first_child_method!(argument_list, ArgumentList);
}

ast_node!(AwaitExpr, AWAIT_EXPR);

impl AwaitExpr {
    first_child_method!(expr, Expr);
}

ast_node!(PrefixExpr, PREFIX_EXPR);

impl PrefixExpr {
    first_child_method!(expr, Expr);
}

ast_node!(PostfixExpr, POSTFIX_EXPR);

impl PostfixExpr {
    first_child_method!(expr, Expr);
}

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn op_kind(&self) -> Option<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .find(|k| k.is_punct())
    }
}

ast_node!(AssignmentExpr, ASSIGNMENT_EXPR);

impl AssignmentExpr {
    pub fn lhs(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn rhs(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(ConditionalExpr, CONDITIONAL_EXPR);

impl ConditionalExpr {
    pub fn condition(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }

    pub fn when_true(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(1)
    }

    pub fn when_false(&self) -> Option<Expr> {
        self.0.children().filter_map(Expr::cast).nth(2)
    }
}

ast_node!(CastExpr, CAST_EXPR);

impl CastExpr {
    first_child_method!(ty, TypeRef);

    pub fn expr(&self) -> Option<Expr> {
        let mut children = self.0.children();
        children.next()?;
        children.find_map(Expr::cast)
    }
}

ast_node!(LambdaExpr, LAMBDA_EXPR);

impl LambdaExpr {
    has_token_method!(is_async, ASYNC_KW);
    first_child_method!(block_body, Block);

    pub fn expr_body(&self) -> Option<Expr> {
        self.0.children().find_map(Expr::cast)
    }
}

ast_node!(ArgumentList, ARGUMENT_LIST);

impl ArgumentList {
    children_method!(arguments, Argument);
}

ast_node!(Argument, ARGUMENT);

impl Argument {
    first_child_method!(expr, Expr);
    first_child_method!(name, Name);
    first_child_method!(declaration, VariableDeclaration);
    has_token_method!(is_out, OUT_KW);
    has_token_method!(is_ref, REF_KW);
}
