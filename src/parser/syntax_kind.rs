//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Node shapes follow the C# language's own vocabulary (compilation unit,
//! object creation, generic name, ...) so that tree patterns read the way a
//! C# developer would describe them.

/// All syntax kinds (tokens and nodes) for the supported C# subset
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace, comments, preprocessor lines)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    DIRECTIVE,          // #region, #nullable enable, ...

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,              // identifier or @identifier
    INT_NUMBER,         // 42, 3.14m
    STRING,             // "text", @"text", $"text"
    CHAR,               // 'c'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,            // {
    R_BRACE,            // }
    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACKET,          // [
    R_BRACKET,          // ]
    SEMICOLON,          // ;
    COLON,              // :
    COMMA,              // ,
    DOT,                // .
    QUESTION_DOT,       // ?.
    QUESTION,           // ?
    QUESTION_QUESTION,  // ??
    QUESTION_QUESTION_EQ, // ??=
    EQ,                 // =
    EQ_EQ,              // ==
    BANG_EQ,            // !=
    LT,                 // <
    GT,                 // >
    LT_EQ,              // <=
    GT_EQ,              // >=
    FAT_ARROW,          // =>
    PLUS,               // +
    MINUS,              // -
    STAR,               // *
    SLASH,              // /
    PERCENT,            // %
    BANG,               // !
    AMP,                // &
    PIPE,               // |
    CARET,              // ^
    AMP_AMP,            // &&
    PIPE_PIPE,          // ||
    PLUS_EQ,            // +=
    MINUS_EQ,           // -=
    PLUS_PLUS,          // ++
    MINUS_MINUS,        // --

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    USING_KW,
    NAMESPACE_KW,
    CLASS_KW,
    INTERFACE_KW,
    STRUCT_KW,
    RECORD_KW,
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    ABSTRACT_KW,
    SEALED_KW,
    VIRTUAL_KW,
    OVERRIDE_KW,
    ASYNC_KW,
    READONLY_KW,
    PARTIAL_KW,
    CONST_KW,
    EVENT_KW,
    NEW_KW,
    RETURN_KW,
    THROW_KW,
    AWAIT_KW,
    THIS_KW,
    BASE_KW,
    NULL_KW,
    TRUE_KW,
    FALSE_KW,
    DEFAULT_KW,
    IF_KW,
    ELSE_KW,
    REF_KW,
    OUT_KW,
    IN_KW,
    PARAMS_KW,

    // =========================================================================
    // NODES - Root and namespaces
    // =========================================================================
    COMPILATION_UNIT,
    USING_DIRECTIVE,
    NAMESPACE_DECL,
    FILE_SCOPED_NAMESPACE_DECL,

    // =========================================================================
    // NODES - Names and types
    // =========================================================================
    NAME,                   // declared name (wraps IDENT)
    IDENTIFIER_NAME,        // simple name reference
    GENERIC_NAME,           // Name<TypeArgs>
    QUALIFIED_NAME,         // Left.Right
    TYPE_ARGUMENT_LIST,     // <A, B>
    NULLABLE_TYPE,          // T?
    ARRAY_TYPE,             // T[]

    // =========================================================================
    // NODES - Declarations
    // =========================================================================
    CLASS_DECL,
    INTERFACE_DECL,
    STRUCT_DECL,
    RECORD_DECL,
    ATTRIBUTE_LIST,
    ATTRIBUTE,
    TYPE_PARAMETER_LIST,
    TYPE_PARAMETER,
    BASE_LIST,
    SIMPLE_BASE_TYPE,
    FIELD_DECL,
    EVENT_FIELD_DECL,
    PROPERTY_DECL,
    ACCESSOR_LIST,
    ACCESSOR,
    METHOD_DECL,
    CONSTRUCTOR_DECL,
    PARAMETER_LIST,
    PARAMETER,
    VARIABLE_DECLARATION,
    VARIABLE_DECLARATOR,
    EQUALS_VALUE_CLAUSE,
    ARROW_EXPRESSION_CLAUSE,

    // =========================================================================
    // NODES - Statements
    // =========================================================================
    BLOCK,
    LOCAL_DECLARATION_STMT,
    EXPRESSION_STMT,
    RETURN_STMT,
    THROW_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    EMPTY_STMT,

    // =========================================================================
    // NODES - Expressions
    // =========================================================================
    LITERAL_EXPR,
    THIS_EXPR,
    BASE_EXPR,
    PAREN_EXPR,
    OBJECT_CREATION_EXPR,
    IMPLICIT_OBJECT_CREATION_EXPR,
    INITIALIZER_EXPR,
    INVOCATION_EXPR,
    MEMBER_ACCESS_EXPR,
    ELEMENT_ACCESS_EXPR,
    AWAIT_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    BINARY_EXPR,
    ASSIGNMENT_EXPR,
    CONDITIONAL_EXPR,
    CAST_EXPR,
    LAMBDA_EXPR,
    ARGUMENT_LIST,
    ARGUMENT,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is trivia (whitespace, comments, directives)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::DIRECTIVE
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::USING_KW as u16) && (self as u16) <= (Self::PARAMS_KW as u16)
    }

    /// Check if this is punctuation
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::MINUS_MINUS as u16)
    }

    /// Check if this is a literal token
    pub fn is_literal(self) -> bool {
        matches!(self, Self::INT_NUMBER | Self::STRING | Self::CHAR)
    }

    /// Declaration modifiers that may precede a type or member.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Self::PUBLIC_KW
                | Self::PRIVATE_KW
                | Self::PROTECTED_KW
                | Self::INTERNAL_KW
                | Self::STATIC_KW
                | Self::ABSTRACT_KW
                | Self::SEALED_KW
                | Self::VIRTUAL_KW
                | Self::OVERRIDE_KW
                | Self::ASYNC_KW
                | Self::READONLY_KW
                | Self::PARTIAL_KW
                | Self::CONST_KW
                | Self::NEW_KW
                | Self::EVENT_KW
        )
    }

    /// Type declaration keywords.
    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            Self::CLASS_KW | Self::INTERFACE_KW | Self::STRUCT_KW | Self::RECORD_KW
        )
    }

    /// Node kinds that act as a type declaration.
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::CLASS_DECL | Self::INTERFACE_DECL | Self::STRUCT_DECL | Self::RECORD_DECL
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl rowan::Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;
pub type SyntaxNodeChildren = rowan::SyntaxNodeChildren<CSharpLanguage>;
