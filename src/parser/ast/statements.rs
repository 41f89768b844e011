use super::*;

ast_node!(Block, BLOCK);

impl Block {
    children_method!(statements, Stmt);
}

ast_enum! {
    /// Any statement.
    Stmt {
        Block(Block) = BLOCK,
        LocalDeclaration(LocalDeclarationStmt) = LOCAL_DECLARATION_STMT,
        Expression(ExpressionStmt) = EXPRESSION_STMT,
        Return(ReturnStmt) = RETURN_STMT,
        Throw(ThrowStmt) = THROW_STMT,
        If(IfStmt) = IF_STMT,
        Empty(EmptyStmt) = EMPTY_STMT,
    }
}

ast_node!(LocalDeclarationStmt, LOCAL_DECLARATION_STMT);

impl LocalDeclarationStmt {
    first_child_method!(declaration, VariableDeclaration);
    has_token_method!(is_const, CONST_KW);
    has_token_method!(is_using, USING_KW, "using var scope = ...;");
}

ast_node!(ExpressionStmt, EXPRESSION_STMT);

impl ExpressionStmt {
    first_child_method!(expr, Expr);
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    first_child_method!(expr, Expr);
}

ast_node!(ThrowStmt, THROW_STMT);

impl ThrowStmt {
    first_child_method!(expr, Expr);
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    first_child_method!(condition, Expr);
    first_child_method!(else_clause, ElseClause);

    pub fn then_branch(&self) -> Option<Stmt> {
        self.0.children().find_map(Stmt::cast)
    }
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    first_child_method!(body, Stmt);
}

ast_node!(EmptyStmt, EMPTY_STMT);
