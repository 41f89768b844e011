//! Recursive descent parser for C#
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Trivia is attached to the innermost node that is open when the next
//! significant token is consumed, so node ranges never start with whitespace.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind::{self, *};
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {:?}", self.message, self.range)
    }
}

/// Parse C# source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens, TextSize::of(input));
    parser.parse_compilation_unit();
    parser.finish()
}

// =============================================================================
// Recovery sets
// =============================================================================

const NAMESPACE_RECOVERY: &[SyntaxKind] = &[
    R_BRACE,
    USING_KW,
    NAMESPACE_KW,
    L_BRACKET,
    CLASS_KW,
    INTERFACE_KW,
    STRUCT_KW,
    RECORD_KW,
    PUBLIC_KW,
    INTERNAL_KW,
];

const MEMBER_RECOVERY: &[SyntaxKind] = &[
    R_BRACE,
    L_BRACKET,
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    CLASS_KW,
    INTERFACE_KW,
    STRUCT_KW,
    RECORD_KW,
];

const STATEMENT_RECOVERY: &[SyntaxKind] = &[R_BRACE, SEMICOLON, L_BRACE, RETURN_KW, THROW_KW, IF_KW];

/// Tokens that may follow `Name<...>` for it to be read as a generic name
/// inside an expression rather than a less-than comparison.
const GENERIC_FOLLOWERS: &[SyntaxKind] = &[
    L_PAREN,
    R_PAREN,
    R_BRACKET,
    R_BRACE,
    COLON,
    SEMICOLON,
    COMMA,
    DOT,
    QUESTION_DOT,
    QUESTION,
    EQ_EQ,
    BANG_EQ,
    PIPE,
    CARET,
    AMP_AMP,
    PIPE_PIPE,
    AMP,
    L_BRACKET,
];

/// Tokens that close an enclosing construct; never swallowed as a bad expression.
const EXPRESSION_CLOSERS: &[SyntaxKind] = &[
    SEMICOLON, R_PAREN, R_BRACE, R_BRACKET, COMMA, COLON,
];

/// Pair every `(` with its `)` in one pass; unbalanced parens map to `None`.
fn match_parens(kinds: impl Iterator<Item = SyntaxKind>) -> Vec<Option<usize>> {
    let mut closing = Vec::new();
    let mut open = Vec::new();
    for (i, kind) in kinds.enumerate() {
        closing.push(None);
        match kind {
            L_PAREN => open.push(i),
            R_PAREN => {
                if let Some(start) = open.pop() {
                    closing[start] = Some(i);
                }
            }
            _ => {}
        }
    }
    closing
}

/// Left and right binding power of binary operators. `??` is right-associative.
fn binary_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    let bp = match kind {
        QUESTION_QUESTION => return Some((2, 1)),
        PIPE_PIPE => 3,
        AMP_AMP => 5,
        PIPE => 7,
        CARET => 9,
        AMP => 11,
        EQ_EQ | BANG_EQ => 13,
        LT | GT | LT_EQ | GT_EQ => 15,
        PLUS | MINUS => 17,
        STAR | SLASH | PERCENT => 19,
        _ => return None,
    };
    Some((bp, bp + 1))
}

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    /// Indices into `tokens` of every non-trivia token.
    significant: Vec<usize>,
    /// Matching `)` of every `(`, both as indices into `significant`.
    closing_paren: Vec<Option<usize>>,
    pos: usize,
    end: TextSize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>], end: TextSize) -> Self {
        let significant: Vec<usize> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .collect();
        let closing_paren = match_parens(significant.iter().map(|&i| tokens[i].kind));
        Self {
            tokens,
            significant,
            closing_paren,
            pos: 0,
            end,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    /// The `n`th significant token at or after the cursor.
    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        let first = self.significant.partition_point(|&i| i < self.pos);
        self.significant
            .get(first + n)
            .map(|&i| &self.tokens[i])
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(ERROR)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn current_text(&self) -> &str {
        self.nth_token(0).map(|t| t.text).unwrap_or("")
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.nth_token(0).is_some_and(|t| t.kind == kind)
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        self.nth_token(0).is_some_and(|t| kinds.contains(&t.kind))
    }

    fn at_eof(&self) -> bool {
        self.nth_token(0).is_none()
    }

    fn at_contextual(&self, text: &str) -> bool {
        self.at(IDENT) && self.current_text() == text
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consumes leading trivia and then one significant token.
    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Position marker used by loops to detect lack of progress.
    fn progress(&mut self) -> usize {
        self.skip_trivia();
        self.pos
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = self
            .nth_token(0)
            .map(|t| TextRange::at(t.offset, TextSize::of(t.text)))
            .unwrap_or_else(|| TextRange::empty(self.end));
        self.errors.push(SyntaxError::new(message, range));
    }

    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(ERROR);
        // Always consume at least one token to make progress
        if !self.at_eof() {
            self.bump();
        }
        while !self.at_eof() && !self.at_any(recovery) {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    // =========================================================================
    // Look-ahead over types
    // =========================================================================

    /// Number of significant tokens forming a type starting at `start`.
    fn type_len(&self, start: usize) -> Option<usize> {
        let mut i = self.name_end(start)?;
        loop {
            match self.nth(i) {
                QUESTION => i += 1,
                L_BRACKET => {
                    i += 1;
                    while self.nth(i) == COMMA {
                        i += 1;
                    }
                    if self.nth(i) != R_BRACKET {
                        return None;
                    }
                    i += 1;
                }
                _ => break,
            }
        }
        Some(i - start)
    }

    fn name_end(&self, start: usize) -> Option<usize> {
        let mut i = self.simple_name_end(start)?;
        while self.nth(i) == DOT && self.nth(i + 1) == IDENT {
            i = self.simple_name_end(i + 1)?;
        }
        Some(i)
    }

    fn simple_name_end(&self, i: usize) -> Option<usize> {
        if self.nth(i) != IDENT {
            return None;
        }
        if self.nth(i + 1) == LT {
            self.type_args_end(i + 1)
        } else {
            Some(i + 1)
        }
    }

    /// Index just past the `>` closing the type argument list opened at `lt`.
    fn type_args_end(&self, lt: usize) -> Option<usize> {
        let mut i = lt + 1;
        loop {
            i += self.type_len(i)?;
            match self.nth(i) {
                COMMA => i += 1,
                GT => return Some(i + 1),
                _ => return None,
            }
        }
    }

    /// `Name<...>` followed by a token that cannot continue a comparison.
    fn at_generic_name(&self) -> bool {
        if self.nth(0) != IDENT || self.nth(1) != LT {
            return false;
        }
        match self.type_args_end(1) {
            Some(end) => {
                self.nth_token(end).is_none() || GENERIC_FOLLOWERS.contains(&self.nth(end))
            }
            None => false,
        }
    }

    /// `Type name` followed by `=`, `;` or `,`.
    fn at_local_declaration(&self, start: usize) -> bool {
        self.type_len(start).is_some_and(|n| {
            self.nth(start + n) == IDENT
                && matches!(self.nth(start + n + 1), EQ | SEMICOLON | COMMA)
        })
    }

    fn at_lambda(&self) -> bool {
        let start = usize::from(self.at(ASYNC_KW));
        match self.nth(start) {
            IDENT => self.nth(start + 1) == FAT_ARROW,
            L_PAREN => self
                .matching_paren(start)
                .is_some_and(|close| self.nth(close + 1) == FAT_ARROW),
            _ => false,
        }
    }

    /// `(Type)operand` where the operand cannot be read as a binary continuation.
    fn at_cast(&self) -> bool {
        if self.nth(0) != L_PAREN {
            return false;
        }
        let Some(n) = self.type_len(1) else {
            return false;
        };
        self.nth(1 + n) == R_PAREN
            && matches!(
                self.nth(2 + n),
                IDENT
                    | INT_NUMBER
                    | STRING
                    | CHAR
                    | L_PAREN
                    | THIS_KW
                    | BASE_KW
                    | NEW_KW
                    | NULL_KW
                    | TRUE_KW
                    | FALSE_KW
                    | DEFAULT_KW
                    | AWAIT_KW
                    | BANG
            )
    }

    /// Offset of the `)` closing the `(` at offset `open`.
    fn matching_paren(&self, open: usize) -> Option<usize> {
        let first = self.significant.partition_point(|&i| i < self.pos);
        let close = self.closing_paren.get(first + open).copied().flatten()?;
        Some(close - first)
    }

    fn at_member_start(&self) -> bool {
        let kind = self.current_kind();
        kind == L_BRACKET || kind == IDENT || kind.is_modifier() || kind.is_type_keyword()
    }

    fn at_type_declaration_start(&self) -> bool {
        let kind = self.current_kind();
        kind == L_BRACKET || kind.is_modifier() || kind.is_type_keyword()
    }

    fn at_expression_start(&self) -> bool {
        matches!(
            self.current_kind(),
            IDENT
                | INT_NUMBER
                | STRING
                | CHAR
                | TRUE_KW
                | FALSE_KW
                | NULL_KW
                | DEFAULT_KW
                | THIS_KW
                | BASE_KW
                | NEW_KW
                | AWAIT_KW
                | ASYNC_KW
                | L_PAREN
                | BANG
                | MINUS
                | PLUS
                | PLUS_PLUS
                | MINUS_MINUS
        )
    }

    // =========================================================================
    // Compilation unit and namespaces
    // =========================================================================

    fn parse_compilation_unit(&mut self) {
        // The root owns leading trivia, so it is opened before skipping any.
        self.builder.start_node(COMPILATION_UNIT.into());
        while !self.at_eof() {
            let before = self.progress();
            self.parse_namespace_member();
            if self.pos == before {
                self.error_recover("expected namespace or type declaration", NAMESPACE_RECOVERY);
            }
        }
        self.skip_trivia();
        self.finish_node();
    }

    fn parse_namespace_member(&mut self) {
        match self.current_kind() {
            USING_KW => self.parse_using_directive(),
            NAMESPACE_KW => self.parse_namespace(),
            _ if self.at_type_declaration_start() => self.parse_declaration(),
            _ => {}
        }
    }

    /// using [static] [Alias =] Name ;
    fn parse_using_directive(&mut self) {
        self.start_node(USING_DIRECTIVE);
        self.bump();
        self.eat(STATIC_KW);
        if self.at(IDENT) && self.nth(1) == EQ {
            self.parse_name();
            self.bump();
        }
        self.parse_name_type();
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_namespace(&mut self) {
        let cp = self.checkpoint();
        self.bump();
        self.parse_name_type();

        if self.at(SEMICOLON) {
            self.start_node_at(cp, FILE_SCOPED_NAMESPACE_DECL);
            self.bump();
            while !self.at_eof() {
                let before = self.progress();
                self.parse_namespace_member();
                if self.pos == before {
                    self.error_recover("expected type declaration", NAMESPACE_RECOVERY);
                }
            }
            self.finish_node();
            return;
        }

        self.start_node_at(cp, NAMESPACE_DECL);
        if self.expect(L_BRACE) {
            while !self.at(R_BRACE) && !self.at_eof() {
                let before = self.progress();
                self.parse_namespace_member();
                if self.pos == before {
                    self.error_recover("expected type declaration", NAMESPACE_RECOVERY);
                }
            }
            self.expect(R_BRACE);
        }
        self.finish_node();
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Attributes and modifiers, then a type or member declaration.
    fn parse_declaration(&mut self) {
        let cp = self.checkpoint();
        let start = self.pos;

        while self.at(L_BRACKET) {
            self.parse_attribute_list();
        }
        let mut is_event = false;
        while self.current_kind().is_modifier() {
            is_event |= self.at(EVENT_KW);
            self.bump();
        }

        if self.current_kind().is_type_keyword() {
            self.parse_type_declaration(cp);
            return;
        }

        if is_event {
            let decl_cp = self.checkpoint();
            self.parse_type();
            self.parse_field_rest(cp, decl_cp, EVENT_FIELD_DECL);
            return;
        }

        if self.at(IDENT) && self.nth(1) == L_PAREN {
            self.parse_constructor(cp);
            return;
        }

        if !self.at(IDENT) {
            if self.pos != start {
                self.start_node_at(cp, ERROR);
                self.error("expected member declaration");
                self.finish_node();
            }
            return;
        }

        let decl_cp = self.checkpoint();
        self.parse_type();

        if self.at(IDENT) && matches!(self.nth(1), L_PAREN | LT) {
            self.parse_method(cp);
        } else if self.at(IDENT) && matches!(self.nth(1), L_BRACE | FAT_ARROW) {
            self.parse_property(cp);
        } else {
            self.parse_field_rest(cp, decl_cp, FIELD_DECL);
        }
    }

    fn parse_type_declaration(&mut self, cp: Checkpoint) {
        let kind = match self.current_kind() {
            CLASS_KW => CLASS_DECL,
            INTERFACE_KW => INTERFACE_DECL,
            STRUCT_KW => STRUCT_DECL,
            _ => RECORD_DECL,
        };
        self.start_node_at(cp, kind);
        let is_record = self.at(RECORD_KW);
        self.bump();
        if is_record && (self.at(CLASS_KW) || self.at(STRUCT_KW)) {
            self.bump();
        }

        self.parse_name();
        if self.at(LT) {
            self.parse_type_parameter_list();
        }
        if is_record && self.at(L_PAREN) {
            self.parse_parameter_list();
        }
        if self.at(COLON) {
            self.parse_base_list();
        }
        self.skip_constraint_clauses();

        if self.at(L_BRACE) {
            self.parse_type_body();
            self.eat(SEMICOLON);
        } else {
            self.expect(SEMICOLON);
        }
        self.finish_node();
    }

    fn parse_type_body(&mut self) {
        self.bump();
        while !self.at(R_BRACE) && !self.at_eof() {
            let before = self.progress();
            if self.at_member_start() {
                self.parse_declaration();
            }
            if self.pos == before {
                self.error_recover("expected member declaration", MEMBER_RECOVERY);
            }
        }
        self.expect(R_BRACE);
    }

    /// Type declarator list shared by fields and event fields.
    fn parse_field_rest(&mut self, cp: Checkpoint, decl_cp: Checkpoint, kind: SyntaxKind) {
        self.start_node_at(cp, kind);
        self.start_node_at(decl_cp, VARIABLE_DECLARATION);
        self.parse_variable_declarators();
        self.finish_node();
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_variable_declarators(&mut self) {
        loop {
            self.start_node(VARIABLE_DECLARATOR);
            self.parse_name();
            if self.at(EQ) {
                self.parse_equals_value();
            }
            self.finish_node();
            if !self.eat(COMMA) {
                break;
            }
        }
    }

    fn parse_equals_value(&mut self) {
        self.start_node(EQUALS_VALUE_CLAUSE);
        self.bump();
        if self.at(L_BRACE) {
            self.parse_initializer();
        } else {
            self.parse_expr();
        }
        self.finish_node();
    }

    fn parse_method(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, METHOD_DECL);
        self.parse_name();
        if self.at(LT) {
            self.parse_type_parameter_list();
        }
        if self.at(L_PAREN) {
            self.parse_parameter_list();
        } else {
            self.error("expected parameter list");
        }
        self.skip_constraint_clauses();
        self.parse_body();
        self.finish_node();
    }

    fn parse_constructor(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, CONSTRUCTOR_DECL);
        self.parse_name();
        self.parse_parameter_list();
        if self.eat(COLON) {
            if !self.eat(BASE_KW) && !self.eat(THIS_KW) {
                self.error("expected `base` or `this`");
            }
            if self.at(L_PAREN) {
                self.parse_argument_list(R_PAREN);
            }
        }
        self.parse_body();
        self.finish_node();
    }

    fn parse_property(&mut self, cp: Checkpoint) {
        self.start_node_at(cp, PROPERTY_DECL);
        self.parse_name();
        if self.at(L_BRACE) {
            self.parse_accessor_list();
            if self.at(EQ) {
                self.parse_equals_value();
                self.expect(SEMICOLON);
            }
        } else {
            self.parse_arrow_clause();
            self.expect(SEMICOLON);
        }
        self.finish_node();
    }

    fn parse_accessor_list(&mut self) {
        self.start_node(ACCESSOR_LIST);
        self.bump();
        while !self.at(R_BRACE) && !self.at_eof() {
            let kind = self.current_kind();
            if kind != IDENT && kind != L_BRACKET && !kind.is_modifier() {
                self.error_recover("expected accessor", &[R_BRACE, IDENT]);
                continue;
            }
            self.start_node(ACCESSOR);
            while self.at(L_BRACKET) {
                self.parse_attribute_list();
            }
            while self.current_kind().is_modifier() {
                self.bump();
            }
            self.expect(IDENT);
            match self.current_kind() {
                L_BRACE => self.parse_block(),
                FAT_ARROW => {
                    self.parse_arrow_clause();
                    self.expect(SEMICOLON);
                }
                _ => {
                    self.expect(SEMICOLON);
                }
            }
            self.finish_node();
        }
        self.expect(R_BRACE);
        self.finish_node();
    }

    /// Block body, expression body, or `;`.
    fn parse_body(&mut self) {
        match self.current_kind() {
            L_BRACE => self.parse_block(),
            FAT_ARROW => {
                self.parse_arrow_clause();
                self.expect(SEMICOLON);
            }
            _ => {
                self.expect(SEMICOLON);
            }
        }
    }

    fn parse_arrow_clause(&mut self) {
        self.start_node(ARROW_EXPRESSION_CLAUSE);
        self.expect(FAT_ARROW);
        self.parse_expr();
        self.finish_node();
    }

    /// `where T : constraint` clauses are kept as plain tokens.
    fn skip_constraint_clauses(&mut self) {
        while self.at_contextual("where") {
            while !self.at_eof() && !self.at_any(&[L_BRACE, SEMICOLON, FAT_ARROW]) {
                self.bump();
            }
        }
    }

    fn parse_attribute_list(&mut self) {
        self.start_node(ATTRIBUTE_LIST);
        self.bump();
        if self.at(IDENT) && self.nth(1) == COLON {
            self.bump();
            self.bump();
        }
        loop {
            self.start_node(ATTRIBUTE);
            self.parse_name_type();
            if self.at(L_PAREN) {
                self.parse_argument_list(R_PAREN);
            }
            self.finish_node();
            if !self.eat(COMMA) || self.at(R_BRACKET) {
                break;
            }
        }
        self.expect(R_BRACKET);
        self.finish_node();
    }

    fn parse_type_parameter_list(&mut self) {
        self.start_node(TYPE_PARAMETER_LIST);
        self.bump();
        loop {
            self.start_node(TYPE_PARAMETER);
            while self.at(L_BRACKET) {
                self.parse_attribute_list();
            }
            if !self.eat(IN_KW) {
                self.eat(OUT_KW);
            }
            self.parse_name();
            self.finish_node();
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(GT);
        self.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.start_node(BASE_LIST);
        self.bump();
        loop {
            self.start_node(SIMPLE_BASE_TYPE);
            self.parse_type();
            if self.at(L_PAREN) {
                self.parse_argument_list(R_PAREN);
            }
            self.finish_node();
            if !self.eat(COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_parameter_list(&mut self) {
        self.start_node(PARAMETER_LIST);
        self.expect(L_PAREN);
        while !self.at(R_PAREN) && !self.at_eof() {
            let before = self.progress();
            self.parse_parameter();
            if self.pos == before {
                self.error_recover("expected parameter", &[COMMA, R_PAREN, L_BRACE]);
            }
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(R_PAREN);
        self.finish_node();
    }

    fn parse_parameter(&mut self) {
        let kind = self.current_kind();
        if !matches!(kind, IDENT | L_BRACKET | REF_KW | OUT_KW | IN_KW | PARAMS_KW | THIS_KW) {
            return;
        }
        self.start_node(PARAMETER);
        while self.at(L_BRACKET) {
            self.parse_attribute_list();
        }
        while self.at_any(&[REF_KW, OUT_KW, IN_KW, PARAMS_KW, THIS_KW]) {
            self.bump();
        }
        // Implicitly typed lambda parameters carry only a name.
        if !(self.at(IDENT) && matches!(self.nth(1), COMMA | R_PAREN)) {
            self.parse_type();
        }
        self.parse_name();
        if self.at(EQ) {
            self.parse_equals_value();
        }
        self.finish_node();
    }

    /// Declared name: NAME wrapping one identifier.
    fn parse_name(&mut self) {
        if self.at(IDENT) {
            self.start_node(NAME);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected identifier");
        }
    }

    // =========================================================================
    // Types
    // =========================================================================

    /// Name type with optional `?` and array rank suffixes.
    fn parse_type(&mut self) {
        if !self.at(IDENT) {
            self.error("expected type");
            return;
        }
        let cp = self.checkpoint();
        self.parse_name_type();
        loop {
            match self.current_kind() {
                QUESTION => {
                    self.start_node_at(cp, NULLABLE_TYPE);
                    self.bump();
                    self.finish_node();
                }
                L_BRACKET if matches!(self.nth(1), R_BRACKET | COMMA) => {
                    self.start_node_at(cp, ARRAY_TYPE);
                    self.bump();
                    while self.eat(COMMA) {}
                    self.expect(R_BRACKET);
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// Simple or qualified (dotted) name, each segment possibly generic.
    fn parse_name_type(&mut self) {
        if !self.at(IDENT) {
            self.error("expected name");
            return;
        }
        let cp = self.checkpoint();
        self.parse_simple_type_name();
        while self.at(DOT) && self.nth(1) == IDENT {
            self.start_node_at(cp, QUALIFIED_NAME);
            self.bump();
            self.parse_simple_type_name();
            self.finish_node();
        }
    }

    fn parse_simple_type_name(&mut self) {
        if self.nth(1) == LT {
            self.start_node(GENERIC_NAME);
            self.bump();
            self.parse_type_argument_list();
        } else {
            self.start_node(IDENTIFIER_NAME);
            self.bump();
        }
        self.finish_node();
    }

    fn parse_type_argument_list(&mut self) {
        self.start_node(TYPE_ARGUMENT_LIST);
        self.bump();
        loop {
            self.parse_type();
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(GT);
        self.finish_node();
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_block(&mut self) {
        self.start_node(BLOCK);
        self.expect(L_BRACE);
        while !self.at(R_BRACE) && !self.at_eof() {
            if !self.parse_statement() {
                self.error_recover("expected statement", STATEMENT_RECOVERY);
            }
        }
        self.expect(R_BRACE);
        self.finish_node();
    }

    /// Returns false when no statement starts at the cursor.
    fn parse_statement(&mut self) -> bool {
        match self.current_kind() {
            L_BRACE => self.parse_block(),
            SEMICOLON => {
                self.start_node(EMPTY_STMT);
                self.bump();
                self.finish_node();
            }
            RETURN_KW => self.parse_jump(RETURN_STMT),
            THROW_KW => self.parse_jump(THROW_STMT),
            IF_KW => self.parse_if(),
            CONST_KW => self.parse_local_declaration(),
            USING_KW if self.nth(1) == IDENT => self.parse_local_declaration(),
            IDENT if self.at_local_declaration(0) => self.parse_local_declaration(),
            _ if self.at_expression_start() => {
                self.start_node(EXPRESSION_STMT);
                self.parse_expr();
                self.expect(SEMICOLON);
                self.finish_node();
            }
            _ => return false,
        }
        true
    }

    /// `return [expr];` or `throw [expr];`
    fn parse_jump(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if !self.at(SEMICOLON) {
            self.parse_expr();
        }
        self.expect(SEMICOLON);
        self.finish_node();
    }

    fn parse_if(&mut self) {
        self.start_node(IF_STMT);
        self.bump();
        self.expect(L_PAREN);
        self.parse_expr();
        self.expect(R_PAREN);
        self.parse_embedded_statement();
        if self.at(ELSE_KW) {
            self.start_node(ELSE_CLAUSE);
            self.bump();
            self.parse_embedded_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_embedded_statement(&mut self) {
        if !self.parse_statement() {
            self.error("expected statement");
        }
    }

    fn parse_local_declaration(&mut self) {
        self.start_node(LOCAL_DECLARATION_STMT);
        self.eat(USING_KW);
        self.eat(CONST_KW);
        self.start_node(VARIABLE_DECLARATION);
        self.parse_type();
        self.parse_variable_declarators();
        self.finish_node();
        self.expect(SEMICOLON);
        self.finish_node();
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expr(&mut self) {
        if self.at_lambda() {
            self.parse_lambda();
            return;
        }
        let cp = self.checkpoint();
        self.parse_binary(0);
        match self.current_kind() {
            QUESTION => {
                self.start_node_at(cp, CONDITIONAL_EXPR);
                self.bump();
                self.parse_expr();
                self.expect(COLON);
                self.parse_expr();
                self.finish_node();
            }
            EQ | PLUS_EQ | MINUS_EQ | QUESTION_QUESTION_EQ => {
                self.start_node_at(cp, ASSIGNMENT_EXPR);
                self.bump();
                if self.at(L_BRACE) {
                    self.parse_initializer();
                } else {
                    self.parse_expr();
                }
                self.finish_node();
            }
            _ => {}
        }
    }

    fn parse_binary(&mut self, min_bp: u8) {
        let cp = self.checkpoint();
        self.parse_unary();
        while let Some((left, right)) = binary_power(self.current_kind()) {
            if left < min_bp {
                break;
            }
            self.start_node_at(cp, BINARY_EXPR);
            self.bump();
            self.parse_binary(right);
            self.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        match self.current_kind() {
            AWAIT_KW => {
                self.start_node(AWAIT_EXPR);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            BANG | MINUS | PLUS | PLUS_PLUS | MINUS_MINUS => {
                self.start_node(PREFIX_EXPR);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            L_PAREN if self.at_cast() => {
                self.start_node(CAST_EXPR);
                self.bump();
                self.parse_type();
                self.expect(R_PAREN);
                self.parse_unary();
                self.finish_node();
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) {
        let cp = self.checkpoint();
        if !self.parse_primary() {
            return;
        }
        loop {
            match self.current_kind() {
                DOT | QUESTION_DOT => {
                    self.start_node_at(cp, MEMBER_ACCESS_EXPR);
                    self.bump();
                    self.parse_expr_name();
                    self.finish_node();
                }
                L_PAREN => {
                    self.start_node_at(cp, INVOCATION_EXPR);
                    self.parse_argument_list(R_PAREN);
                    self.finish_node();
                }
                L_BRACKET => {
                    self.start_node_at(cp, ELEMENT_ACCESS_EXPR);
                    self.parse_argument_list(R_BRACKET);
                    self.finish_node();
                }
                PLUS_PLUS | MINUS_MINUS | BANG => {
                    self.start_node_at(cp, POSTFIX_EXPR);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// Returns false when no expression could be started.
    fn parse_primary(&mut self) -> bool {
        match self.current_kind() {
            INT_NUMBER | STRING | CHAR | TRUE_KW | FALSE_KW | NULL_KW => {
                self.start_node(LITERAL_EXPR);
                self.bump();
                self.finish_node();
            }
            DEFAULT_KW => {
                self.start_node(LITERAL_EXPR);
                self.bump();
                if self.eat(L_PAREN) {
                    self.parse_type();
                    self.expect(R_PAREN);
                }
                self.finish_node();
            }
            THIS_KW => {
                self.start_node(THIS_EXPR);
                self.bump();
                self.finish_node();
            }
            BASE_KW => {
                self.start_node(BASE_EXPR);
                self.bump();
                self.finish_node();
            }
            IDENT => self.parse_expr_name(),
            L_PAREN => {
                self.start_node(PAREN_EXPR);
                self.bump();
                self.parse_expr();
                self.expect(R_PAREN);
                self.finish_node();
            }
            NEW_KW => self.parse_object_creation(),
            _ => {
                self.error("expected expression");
                if !self.at_eof() && !self.at_any(EXPRESSION_CLOSERS) {
                    self.start_node(ERROR);
                    self.bump();
                    self.finish_node();
                }
                return false;
            }
        }
        true
    }

    /// Identifier or generic name in expression position.
    fn parse_expr_name(&mut self) {
        if !self.at(IDENT) {
            self.error("expected identifier");
            return;
        }
        if self.at_generic_name() {
            self.start_node(GENERIC_NAME);
            self.bump();
            self.parse_type_argument_list();
        } else {
            self.start_node(IDENTIFIER_NAME);
            self.bump();
        }
        self.finish_node();
    }

    fn parse_object_creation(&mut self) {
        if self.nth(1) == L_PAREN {
            self.start_node(IMPLICIT_OBJECT_CREATION_EXPR);
            self.bump();
            self.parse_argument_list(R_PAREN);
            if self.at(L_BRACE) {
                self.parse_initializer();
            }
            self.finish_node();
            return;
        }

        self.start_node(OBJECT_CREATION_EXPR);
        self.bump();
        if self.at(IDENT) {
            self.parse_name_type();
        } else if !self.at(L_BRACKET) {
            self.error("expected type");
        }
        // Array ranks: `new int[3]`, `new[] { ... }`
        while self.at(L_BRACKET) {
            self.bump();
            while !self.at(R_BRACKET) && !self.at_eof() {
                if self.at(COMMA) {
                    self.bump();
                    continue;
                }
                let before = self.progress();
                self.parse_expr();
                if self.pos == before {
                    break;
                }
            }
            self.expect(R_BRACKET);
        }
        if self.at(L_PAREN) {
            self.parse_argument_list(R_PAREN);
        }
        if self.at(L_BRACE) {
            self.parse_initializer();
        }
        self.finish_node();
    }

    /// `{ a, b = c, { nested } }`
    fn parse_initializer(&mut self) {
        self.start_node(INITIALIZER_EXPR);
        self.bump();
        while !self.at(R_BRACE) && !self.at_eof() {
            let before = self.progress();
            if self.at(L_BRACE) {
                self.parse_initializer();
            } else {
                self.parse_expr();
            }
            if !self.eat(COMMA) {
                if self.pos == before {
                    self.error_recover("expected initializer element", &[COMMA, R_BRACE]);
                } else {
                    break;
                }
            }
        }
        self.expect(R_BRACE);
        self.finish_node();
    }

    fn parse_argument_list(&mut self, close: SyntaxKind) {
        self.start_node(ARGUMENT_LIST);
        self.bump();
        while !self.at(close) && !self.at_eof() {
            self.parse_argument();
            if !self.eat(COMMA) {
                break;
            }
        }
        self.expect(close);
        self.finish_node();
    }

    fn parse_argument(&mut self) {
        self.start_node(ARGUMENT);
        if self.at(IDENT) && self.nth(1) == COLON {
            self.parse_name();
            self.bump();
        }
        let is_out = self.at(OUT_KW);
        if self.at_any(&[REF_KW, OUT_KW, IN_KW]) {
            self.bump();
        }
        if is_out && self.at(IDENT) && self.type_len(0).is_some_and(|n| self.nth(n) == IDENT) {
            // out var result
            self.start_node(VARIABLE_DECLARATION);
            self.parse_type();
            self.start_node(VARIABLE_DECLARATOR);
            self.parse_name();
            self.finish_node();
            self.finish_node();
        } else {
            self.parse_expr();
        }
        self.finish_node();
    }

    fn parse_lambda(&mut self) {
        self.start_node(LAMBDA_EXPR);
        self.eat(ASYNC_KW);
        if self.at(IDENT) {
            self.start_node(PARAMETER);
            self.parse_name();
            self.finish_node();
        } else {
            self.parse_parameter_list();
        }
        self.expect(FAT_ARROW);
        if self.at(L_BRACE) {
            self.parse_block();
        } else {
            self.parse_expr();
        }
        self.finish_node();
    }
}
