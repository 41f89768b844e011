//! Logos-based lexer for C#
//!
//! Fast tokenization using the logos crate. Every byte of the input ends up in
//! exactly one token so the CST stays lossless.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"#[^\r\n]*")]
    Directive,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"@?[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?[mMdDfFlLuU]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+[lLuU]*")]
    Number,

    #[regex(r#""([^"\\\r\n]|\\[^\r\n])*""#)]
    #[regex(r#"@\$?"([^"]|"")*""#)]
    #[regex(r#"\$@?"([^"\\\r\n]|\\[^\r\n])*""#)]
    String,

    #[regex(r"'([^'\\\r\n]|\\[^\r\n])+'")]
    Char,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (must come before single-char)
    // =========================================================================
    #[token("?.")]
    QuestionDot,

    #[token("??=")]
    QuestionQuestionEq,

    #[token("??")]
    QuestionQuestion,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("<=")]
    LtEq,

    #[token(">=")]
    GtEq,

    #[token("=>")]
    FatArrow,

    #[token("&&")]
    AmpAmp,

    #[token("||")]
    PipePipe,

    #[token("+=")]
    PlusEq,

    #[token("-=")]
    MinusEq,

    #[token("++")]
    PlusPlus,

    #[token("--")]
    MinusMinus,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token(";")]
    Semicolon,

    #[token(":")]
    Colon,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token("?")]
    Question,

    #[token("=")]
    Eq,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("&")]
    Amp,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("using")]
    Using,
    #[token("namespace")]
    Namespace,
    #[token("class")]
    Class,
    #[token("interface")]
    Interface,
    #[token("struct")]
    Struct,
    #[token("record")]
    Record,
    #[token("public")]
    Public,
    #[token("private")]
    Private,
    #[token("protected")]
    Protected,
    #[token("internal")]
    Internal,
    #[token("static")]
    Static,
    #[token("abstract")]
    Abstract,
    #[token("sealed")]
    Sealed,
    #[token("virtual")]
    Virtual,
    #[token("override")]
    Override,
    #[token("async")]
    Async,
    #[token("readonly")]
    Readonly,
    #[token("partial")]
    Partial,
    #[token("const")]
    Const,
    #[token("event")]
    Event,
    #[token("new")]
    New,
    #[token("return")]
    Return,
    #[token("throw")]
    Throw,
    #[token("await")]
    Await,
    #[token("this")]
    This,
    #[token("base")]
    Base,
    #[token("null")]
    Null,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("default")]
    Default,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("ref")]
    Ref,
    #[token("out")]
    Out,
    #[token("in")]
    In,
    #[token("params")]
    Params,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            Directive => SyntaxKind::DIRECTIVE,

            // Literals
            Ident => SyntaxKind::IDENT,
            Number => SyntaxKind::INT_NUMBER,
            String => SyntaxKind::STRING,
            Char => SyntaxKind::CHAR,

            // Multi-char punctuation
            QuestionDot => SyntaxKind::QUESTION_DOT,
            QuestionQuestionEq => SyntaxKind::QUESTION_QUESTION_EQ,
            QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            FatArrow => SyntaxKind::FAT_ARROW,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,

            // Single-char punctuation
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Question => SyntaxKind::QUESTION,
            Eq => SyntaxKind::EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Bang => SyntaxKind::BANG,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,

            // Keywords
            Using => SyntaxKind::USING_KW,
            Namespace => SyntaxKind::NAMESPACE_KW,
            Class => SyntaxKind::CLASS_KW,
            Interface => SyntaxKind::INTERFACE_KW,
            Struct => SyntaxKind::STRUCT_KW,
            Record => SyntaxKind::RECORD_KW,
            Public => SyntaxKind::PUBLIC_KW,
            Private => SyntaxKind::PRIVATE_KW,
            Protected => SyntaxKind::PROTECTED_KW,
            Internal => SyntaxKind::INTERNAL_KW,
            Static => SyntaxKind::STATIC_KW,
            Abstract => SyntaxKind::ABSTRACT_KW,
            Sealed => SyntaxKind::SEALED_KW,
            Virtual => SyntaxKind::VIRTUAL_KW,
            Override => SyntaxKind::OVERRIDE_KW,
            Async => SyntaxKind::ASYNC_KW,
            Readonly => SyntaxKind::READONLY_KW,
            Partial => SyntaxKind::PARTIAL_KW,
            Const => SyntaxKind::CONST_KW,
            Event => SyntaxKind::EVENT_KW,
            New => SyntaxKind::NEW_KW,
            Return => SyntaxKind::RETURN_KW,
            Throw => SyntaxKind::THROW_KW,
            Await => SyntaxKind::AWAIT_KW,
            This => SyntaxKind::THIS_KW,
            Base => SyntaxKind::BASE_KW,
            Null => SyntaxKind::NULL_KW,
            True => SyntaxKind::TRUE_KW,
            False => SyntaxKind::FALSE_KW,
            Default => SyntaxKind::DEFAULT_KW,
            If => SyntaxKind::IF_KW,
            Else => SyntaxKind::ELSE_KW,
            Ref => SyntaxKind::REF_KW,
            Out => SyntaxKind::OUT_KW,
            In => SyntaxKind::IN_KW,
            Params => SyntaxKind::PARAMS_KW,
        }
    }
}
