//! Per-document semantic model.
//!
//! Answers the questions refactorings ask about a syntax node: which symbol a
//! type declaration declares, what type an expression has and which names are
//! in scope at a position. Typing is best effort over the declared-symbol
//! model: anything that cannot be inferred from declarations in the project
//! yields `None` rather than an error.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::base::{DocumentId, TextSize};
use crate::parser::{
    AstNode, BinaryExpr, Block, ConstructorDecl, Expr, InvocationExpr, LambdaExpr, LiteralExpr,
    LiteralKind, LocalDeclarationStmt, MemberAccessExpr, MethodDecl, Parameter, ParameterList, Parse,
    Stmt, SyntaxKind, SyntaxNode, TypeDecl, VariableDeclarator,
};

use super::compilation::{Compilation, TypeLookup};
use super::helpers::is_inaccessible_local;
use super::symbols::{
    LocalSymbol, MemberKind, MemberSymbol, ParameterSymbol, Symbol, TypeKind, TypeName,
    TypeSymbol, extract_parameters,
};

/// Bound on nested inference (`var a = b; var b = c; ...`).
const MAX_INFERENCE_DEPTH: u8 = 16;

/// Semantic view of one document inside its project's compilation.
#[derive(Debug, Clone)]
pub struct SemanticModel {
    document: DocumentId,
    parse: Arc<Parse>,
    compilation: Arc<Compilation>,
}

impl SemanticModel {
    pub fn new(document: DocumentId, parse: Arc<Parse>, compilation: Arc<Compilation>) -> Self {
        Self {
            document,
            parse,
            compilation,
        }
    }

    pub fn document(&self) -> DocumentId {
        self.document
    }

    pub fn compilation(&self) -> &Arc<Compilation> {
        &self.compilation
    }

    /// Root of the document's syntax tree.
    pub fn root(&self) -> SyntaxNode {
        self.parse.syntax()
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// The type symbol a declaration in this document declares.
    pub fn declared_type(&self, decl: &TypeDecl) -> Option<Arc<TypeSymbol>> {
        let range = decl.syntax().text_range();
        self.compilation
            .types_in_document(self.document)
            .find(|t| t.range == range)
            .cloned()
    }

    /// Display string of the namespace containing a type declaration.
    ///
    /// Empty for the global namespace.
    pub fn containing_namespace(&self, decl: &TypeDecl) -> String {
        self.declared_type(decl)
            .and_then(|t| t.namespace.as_ref().map(|ns| ns.to_string()))
            .or_else(|| decl.containing_namespace())
            .unwrap_or_default()
    }

    fn enclosing_type(&self, node: &SyntaxNode) -> Option<Arc<TypeSymbol>> {
        node.ancestors()
            .find_map(TypeDecl::cast)
            .and_then(|decl| self.declared_type(&decl))
    }

    // ========================================================================
    // Expression typing
    // ========================================================================

    /// Best-effort static type of an expression.
    pub fn type_of(&self, expr: &Expr) -> Option<TypeName> {
        self.infer(expr, 0)
    }

    fn infer(&self, expr: &Expr, depth: u8) -> Option<TypeName> {
        if depth > MAX_INFERENCE_DEPTH {
            return None;
        }
        let depth = depth + 1;

        match expr {
            Expr::Literal(lit) => literal_type(lit),
            Expr::This(it) => self
                .enclosing_type(it.syntax())
                .map(|t| TypeName::simple(t.name.clone())),
            Expr::Base(it) => self
                .enclosing_type(it.syntax())
                .and_then(|t| self.base_class(&t))
                .map(|t| TypeName::simple(t.name.clone())),
            Expr::Paren(it) => self.infer(&it.expr()?, depth),
            Expr::Name(name) => {
                let text = name.text()?;
                self.resolve_name(name.syntax(), &text, depth)?.ty()
            }
            Expr::ObjectCreation(it) => TypeName::from_ast(&it.ty()?),
            Expr::ImplicitObjectCreation(it) => self.target_type(it.syntax()),
            Expr::Invocation(call) => self.invocation_type(call, depth),
            Expr::MemberAccess(access) => self.member_access_type(access, depth),
            Expr::Await(it) => self.infer(&it.expr()?, depth)?.awaited().cloned(),
            Expr::Prefix(it) => {
                let op = it
                    .syntax()
                    .first_token()
                    .map(|t| t.kind())
                    .filter(|k| *k == SyntaxKind::BANG);
                match op {
                    Some(_) => Some(TypeName::simple("bool")),
                    None => self.infer(&it.expr()?, depth),
                }
            }
            Expr::Postfix(it) => self.infer(&it.expr()?, depth),
            Expr::Binary(it) => self.binary_type(it, depth),
            Expr::Assignment(it) => self.infer(&it.lhs()?, depth),
            Expr::Conditional(it) => it
                .when_true()
                .and_then(|e| self.infer(&e, depth))
                .or_else(|| it.when_false().and_then(|e| self.infer(&e, depth))),
            Expr::Cast(it) => TypeName::from_ast(&it.ty()?),
            Expr::GenericName(_)
            | Expr::ElementAccess(_)
            | Expr::Initializer(_)
            | Expr::Lambda(_) => None,
        }
    }

    fn binary_type(&self, expr: &BinaryExpr, depth: u8) -> Option<TypeName> {
        use SyntaxKind::*;
        match expr.op_kind()? {
            EQ_EQ | BANG_EQ | LT | GT | LT_EQ | GT_EQ | AMP_AMP | PIPE_PIPE => {
                Some(TypeName::simple("bool"))
            }
            QUESTION_QUESTION => {
                let mut ty = self.infer(&expr.lhs()?, depth)?;
                ty.nullable = false;
                Some(ty)
            }
            _ => self.infer(&expr.lhs()?, depth),
        }
    }

    /// Type a target-typed `new()` takes from its context.
    fn target_type(&self, node: &SyntaxNode) -> Option<TypeName> {
        let parent = node.parent()?;
        match parent.kind() {
            SyntaxKind::EQUALS_VALUE_CLAUSE => {
                let declarator = parent.parent().and_then(VariableDeclarator::cast)?;
                let declaration = declarator.declaration()?;
                if declaration.is_implicitly_typed() {
                    return None;
                }
                TypeName::from_ast(&declaration.ty()?)
            }
            SyntaxKind::RETURN_STMT | SyntaxKind::ARROW_EXPRESSION_CLAUSE => {
                let method = parent.ancestors().find_map(MethodDecl::cast)?;
                let ret = TypeName::from_ast(&method.return_type()?)?;
                if method.is_async() {
                    ret.awaited().cloned()
                } else {
                    Some(ret)
                }
            }
            SyntaxKind::PAREN_EXPR => self.target_type(&parent),
            _ => None,
        }
    }

    fn invocation_type(&self, call: &InvocationExpr, depth: u8) -> Option<TypeName> {
        let method = match call.expr()? {
            Expr::Name(name) => {
                let ty = self.enclosing_type(call.syntax())?;
                self.find_member(&ty, &name.text()?, |m| m.kind == MemberKind::Method)?
            }
            Expr::MemberAccess(access) => {
                let receiver = self.infer(&access.expr()?, depth)?;
                let ty = self.compilation.resolve_type(&receiver)?;
                let name = access.name()?.text()?;
                self.find_member(&ty, &name, |m| m.kind == MemberKind::Method)?
            }
            _ => return None,
        };
        method.ty
    }

    fn member_access_type(&self, access: &MemberAccessExpr, depth: u8) -> Option<TypeName> {
        let receiver = self.infer(&access.expr()?, depth)?;
        let ty = self.compilation.resolve_type(&receiver)?;
        let name = access.name()?.text()?;
        self.find_member(&ty, &name, |m| m.kind != MemberKind::Method)?
            .ty
    }

    // ========================================================================
    // Name lookup
    // ========================================================================

    /// Resolve a simple name as seen from `node`: locals declared before it,
    /// then parameters, then members of the enclosing types, then types.
    fn resolve_name(&self, node: &SyntaxNode, name: &str, depth: u8) -> Option<Symbol> {
        let position = node.text_range().start();

        for ancestor in node.ancestors() {
            if let Some(block) = Block::cast(ancestor.clone()) {
                let found = self
                    .block_locals(&block, depth)
                    .into_iter()
                    .filter(|l| l.name == name && l.declaration_start < position)
                    .last();
                if let Some(local) = found {
                    return Some(Symbol::Local(local));
                }
            } else if let Some(param) = self
                .scope_parameters(&ancestor)
                .into_iter()
                .find(|p| p.name == name)
            {
                return Some(Symbol::Parameter(param));
            } else if let Some(decl) = TypeDecl::cast(ancestor.clone()) {
                let Some(ty) = self.declared_type(&decl) else {
                    continue;
                };
                if let Some(member) = self.find_member(&ty, name, |m| m.kind != MemberKind::Constructor)
                {
                    return Some(Symbol::Member(member));
                }
            }
        }

        self.compilation
            .symbols_with_name(name)
            .next()
            .cloned()
            .map(Symbol::Type)
    }

    /// Every name visible at `position`, innermost scope first.
    ///
    /// Like the host compiler's lookup, locals of enclosing blocks are
    /// returned even when declared after `position`; see
    /// [`lookup_accessible_symbols`](Self::lookup_accessible_symbols).
    pub fn lookup_symbols(&self, position: TextSize) -> Vec<Symbol> {
        let root = self.root();
        let Some(token) = root
            .token_at_offset(position)
            .right_biased()
            .or_else(|| root.token_at_offset(position).left_biased())
        else {
            return Vec::new();
        };
        let Some(start) = token.parent() else {
            return Vec::new();
        };

        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut push = |symbol: Symbol, out: &mut Vec<Symbol>| {
            if seen.insert((symbol.name().to_string(), symbol.kind())) {
                out.push(symbol);
            }
        };

        for ancestor in start.ancestors() {
            if let Some(block) = Block::cast(ancestor.clone()) {
                for local in self.block_locals(&block, 0) {
                    push(Symbol::Local(local), &mut out);
                }
                continue;
            }
            for param in self.scope_parameters(&ancestor) {
                push(Symbol::Parameter(param), &mut out);
            }
            if let Some(decl) = TypeDecl::cast(ancestor) {
                if let Some(ty) = self.declared_type(&decl) {
                    for ty in self.inheritance_chain(&ty) {
                        for member in &ty.members {
                            if member.kind != MemberKind::Constructor {
                                push(Symbol::Member(member.clone()), &mut out);
                            }
                        }
                    }
                }
            }
        }

        for ty in self.compilation.types() {
            push(Symbol::Type(Arc::clone(ty)), &mut out);
        }
        out
    }

    /// [`lookup_symbols`](Self::lookup_symbols) without locals that are not
    /// yet declared at `position`.
    pub fn lookup_accessible_symbols(&self, position: TextSize) -> Vec<Symbol> {
        self.lookup_symbols(position)
            .into_iter()
            .filter(|symbol| !is_inaccessible_local(symbol, position))
            .collect()
    }

    /// Locals declared by statements directly inside `block`.
    fn block_locals(&self, block: &Block, depth: u8) -> Vec<LocalSymbol> {
        let mut locals = Vec::new();
        for stmt in block.statements() {
            let Stmt::LocalDeclaration(stmt) = stmt else {
                continue;
            };
            locals.extend(self.statement_locals(&stmt, depth));
        }
        locals
    }

    fn statement_locals(&self, stmt: &LocalDeclarationStmt, depth: u8) -> Vec<LocalSymbol> {
        let Some(declaration) = stmt.declaration() else {
            return Vec::new();
        };
        let declared = if declaration.is_implicitly_typed() {
            None
        } else {
            declaration.ty().as_ref().and_then(TypeName::from_ast)
        };

        declaration
            .declarators()
            .filter_map(|declarator| {
                let name = declarator.name_text()?;
                let ty = declared.clone().or_else(|| {
                    let value = declarator.initializer()?.value()?;
                    self.infer(&value, depth.saturating_add(1))
                });
                Some(LocalSymbol {
                    name: name.into(),
                    ty,
                    declaration_start: declarator.syntax().text_range().start(),
                    is_implicitly_declared: false,
                })
            })
            .collect()
    }

    /// Parameters introduced by a method, constructor or lambda node.
    fn scope_parameters(&self, node: &SyntaxNode) -> Vec<ParameterSymbol> {
        let list = if let Some(method) = MethodDecl::cast(node.clone()) {
            method.parameter_list()
        } else if let Some(ctor) = ConstructorDecl::cast(node.clone()) {
            ctor.parameter_list()
        } else if let Some(lambda) = LambdaExpr::cast(node.clone()) {
            return lambda_parameters(&lambda);
        } else {
            None
        };
        list.map(|l| extract_parameters(&l)).unwrap_or_default()
    }

    // ========================================================================
    // Inheritance
    // ========================================================================

    /// First base type that resolves to a class.
    fn base_class(&self, ty: &TypeSymbol) -> Option<Arc<TypeSymbol>> {
        ty.base_types
            .iter()
            .filter_map(|base| self.compilation.resolve_type(base))
            .find(|t| t.kind == TypeKind::Class)
    }

    /// `ty` followed by its resolvable base classes.
    fn inheritance_chain(&self, ty: &Arc<TypeSymbol>) -> Vec<Arc<TypeSymbol>> {
        let mut chain = vec![Arc::clone(ty)];
        let mut visited: FxHashSet<String> = FxHashSet::default();
        visited.insert(ty.qualified_name());
        while let Some(base) = chain.last().and_then(|t| self.base_class(t)) {
            if !visited.insert(base.qualified_name()) {
                break;
            }
            chain.push(base);
        }
        chain
    }

    fn find_member(
        &self,
        ty: &Arc<TypeSymbol>,
        name: &str,
        filter: impl Fn(&MemberSymbol) -> bool,
    ) -> Option<MemberSymbol> {
        self.inheritance_chain(ty)
            .iter()
            .find_map(|t| t.members_named(name).find(|m| filter(m)).cloned())
    }
}

fn literal_type(lit: &LiteralExpr) -> Option<TypeName> {
    let name = match lit.kind()? {
        LiteralKind::Number => {
            let text = lit.token()?.text().to_ascii_lowercase();
            if text.starts_with("0x") {
                "int"
            } else if text.ends_with('m') {
                "decimal"
            } else if text.ends_with('f') {
                "float"
            } else if text.ends_with('l') {
                "long"
            } else if text.contains('.') || text.ends_with('d') {
                "double"
            } else {
                "int"
            }
        }
        LiteralKind::String => "string",
        LiteralKind::Char => "char",
        LiteralKind::Bool => "bool",
        LiteralKind::Null => return None,
        LiteralKind::Default => return TypeName::from_ast(&lit.default_type()?),
    };
    Some(TypeName::simple(name))
}

/// Lambda parameters are names only; their types come from the target
/// delegate, which is not modelled.
fn lambda_parameters(lambda: &LambdaExpr) -> Vec<ParameterSymbol> {
    if let Some(list) = lambda.syntax().children().find_map(ParameterList::cast) {
        return extract_parameters(&list);
    }
    lambda
        .syntax()
        .children()
        .filter_map(Parameter::cast)
        .filter_map(|p| {
            Some(ParameterSymbol {
                name: p.name_text()?.into(),
                ty: None,
                has_default: false,
                range: p.syntax().text_range(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::ProjectId;
    use crate::parser::{AwaitExpr, ObjectCreationExpr, parse};

    fn model(source: &str) -> SemanticModel {
        let document = DocumentId::new(ProjectId::new());
        let parse = Arc::new(parse(source));
        let unit = parse.tree();
        let compilation = Arc::new(Compilation::new("Test", [(document, &unit)]));
        SemanticModel::new(document, parse, compilation)
    }

    /// Type of the argument of the first `SendCommand(...)` call.
    fn argument_type(model: &SemanticModel) -> Option<TypeName> {
        let call = model
            .root()
            .descendants()
            .filter_map(InvocationExpr::cast)
            .find(|c| c.method_name().and_then(|n| n.text()).as_deref() == Some("SendCommand"))?;
        let arg = call.arguments().into_iter().next()?.expr()?;
        model.type_of(&arg)
    }

    #[test]
    fn test_declared_type_and_namespace() {
        let model = model("namespace Aurora.Billing.Web { class InvoicesController { } }");
        let decl = model.root().descendants().find_map(TypeDecl::cast).unwrap();
        let ty = model.declared_type(&decl).unwrap();
        assert_eq!(ty.name, "InvoicesController");
        assert_eq!(model.containing_namespace(&decl), "Aurora.Billing.Web");
    }

    #[test]
    fn test_global_namespace_is_empty() {
        let model = model("class C { }");
        let decl = model.root().descendants().find_map(TypeDecl::cast).unwrap();
        assert_eq!(model.containing_namespace(&decl), "");
    }

    #[test]
    fn test_type_of_var_local() {
        let model = model(
            r#"class C {
                async Task Run() {
                    var cmd = new CreateInvoiceCommand();
                    await bus.SendCommand(cmd);
                }
            }"#,
        );
        assert_eq!(argument_type(&model), Some(TypeName::simple("CreateInvoiceCommand")));
    }

    #[test]
    fn test_type_of_parameter() {
        let model = model(
            "class C { void Run(ApproveInvoiceCommand command) { bus.SendCommand(command); } }",
        );
        assert_eq!(argument_type(&model), Some(TypeName::simple("ApproveInvoiceCommand")));
    }

    #[test]
    fn test_type_of_field_and_property_through_base() {
        let model = model(
            r#"class Base { protected PayInvoiceCommand Pending { get; set; } }
               class C : Base { void Run() { bus.SendCommand(Pending); } }"#,
        );
        assert_eq!(argument_type(&model), Some(TypeName::simple("PayInvoiceCommand")));
    }

    #[test]
    fn test_type_of_member_access_chain() {
        let model = model(
            r#"class Holder { public VoidInvoiceCommand Command; }
               class C { Holder holder; void Run() { bus.SendCommand(this.holder.Command); } }"#,
        );
        assert_eq!(argument_type(&model), Some(TypeName::simple("VoidInvoiceCommand")));
    }

    #[test]
    fn test_type_of_method_result() {
        let model = model(
            r#"class C {
                CreateInvoiceCommand Build() { return new(); }
                void Run() { bus.SendCommand(Build()); }
            }"#,
        );
        assert_eq!(argument_type(&model), Some(TypeName::simple("CreateInvoiceCommand")));
    }

    #[test]
    fn test_local_declared_after_use_is_not_visible_for_typing() {
        let model = model(
            "class C { void Run() { bus.SendCommand(cmd); var cmd = new CreateInvoiceCommand(); } }",
        );
        assert_eq!(argument_type(&model), None);
    }

    #[test]
    fn test_type_of_await_unwraps_task() {
        let model = model(
            r#"class C {
                Task<InvoiceDto> LoadAsync() { throw new NotImplementedException(); }
                async Task Run() { var dto = await LoadAsync(); }
            }"#,
        );
        let awaited = model.root().descendants().find_map(AwaitExpr::cast).unwrap();
        assert_eq!(
            model.type_of(&Expr::Await(awaited)),
            Some(TypeName::simple("InvoiceDto"))
        );
    }

    #[test]
    fn test_type_of_literals_and_creation() {
        let model = model(r#"class C { void Run() { var a = 1.5m; var b = "x"; var c = new Invoice(); } }"#);
        let creation = model
            .root()
            .descendants()
            .find_map(ObjectCreationExpr::cast)
            .unwrap();
        assert_eq!(
            model.type_of(&Expr::ObjectCreation(creation)),
            Some(TypeName::simple("Invoice"))
        );
        let locals: Vec<_> = model
            .lookup_symbols(TextSize::from(25))
            .into_iter()
            .filter_map(|s| match s {
                Symbol::Local(l) => Some((l.name.to_string(), l.ty.map(|t| t.to_string()))),
                _ => None,
            })
            .collect();
        assert_eq!(
            locals,
            vec![
                ("a".to_string(), Some("decimal".to_string())),
                ("b".to_string(), Some("string".to_string())),
                ("c".to_string(), Some("Invoice".to_string())),
            ]
        );
    }

    #[test]
    fn test_lookup_accessible_symbols_hides_later_locals() {
        let source = "class C { int total; void Run(int x) { var before = 1; /*here*/ var after = 2; } }";
        let model = model(source);
        let position = TextSize::from(source.find("/*here*/").unwrap() as u32);

        let names = |symbols: Vec<Symbol>| -> Vec<String> {
            symbols.iter().map(|s| s.name().to_string()).collect()
        };
        let all = names(model.lookup_symbols(position));
        assert!(all.contains(&"after".to_string()));

        let accessible = names(model.lookup_accessible_symbols(position));
        assert!(accessible.contains(&"before".to_string()));
        assert!(accessible.contains(&"x".to_string()));
        assert!(accessible.contains(&"total".to_string()));
        assert!(accessible.contains(&"C".to_string()));
        assert!(!accessible.contains(&"after".to_string()));
    }
}
