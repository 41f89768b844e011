//! Symbol type definitions.
//!
//! Contains the declared-symbol model (`TypeSymbol`, `MemberSymbol`, ...) and
//! the [`TypeName`] used wherever a symbol refers to a type by name.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;

use crate::base::{DocumentId, TextRange, TextSize};
use crate::parser::{SyntaxKind, TypeDeclKind, TypeRef};

// ============================================================================
// TYPE NAMES
// ============================================================================

/// A type as written in source, reduced to what name matching needs.
///
/// `Aurora.Billing.InvoiceDto?` keeps `Aurora.Billing` as qualifier,
/// `InvoiceDto` as name and the nullable flag; `Task<InvoiceDto>` keeps its
/// argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    pub qualifier: Option<SmolStr>,
    pub name: SmolStr,
    pub args: Vec<TypeName>,
    pub nullable: bool,
    pub array: bool,
}

impl TypeName {
    /// Unqualified, non-generic type name.
    pub fn simple(name: impl Into<SmolStr>) -> Self {
        Self {
            qualifier: None,
            name: name.into(),
            args: Vec::new(),
            nullable: false,
            array: false,
        }
    }

    pub fn with_args(name: impl Into<SmolStr>, args: Vec<TypeName>) -> Self {
        Self {
            args,
            ..Self::simple(name)
        }
    }

    /// Lower a type syntax node. Returns `None` for incomplete syntax.
    pub fn from_ast(ty: &TypeRef) -> Option<Self> {
        match ty {
            TypeRef::Identifier(it) => Some(Self::simple(it.text()?)),
            TypeRef::Generic(it) => Some(Self::with_args(
                it.text()?,
                it.type_arguments()
                    .iter()
                    .filter_map(Self::from_ast)
                    .collect(),
            )),
            TypeRef::Qualified(it) => {
                let mut segments = it.segments();
                let name = segments.pop()?;
                let args = ty
                    .type_arguments()
                    .iter()
                    .filter_map(Self::from_ast)
                    .collect();
                Some(Self {
                    qualifier: (!segments.is_empty()).then(|| segments.join(".").into()),
                    name: name.into(),
                    args,
                    nullable: false,
                    array: false,
                })
            }
            TypeRef::Nullable(it) => {
                let mut inner = Self::from_ast(&it.element_type()?)?;
                inner.nullable = true;
                Some(inner)
            }
            TypeRef::Array(it) => {
                let mut inner = Self::from_ast(&it.element_type()?)?;
                inner.array = true;
                Some(inner)
            }
        }
    }

    /// `T` for `Task<T>` / `ValueTask<T>`.
    pub fn awaited(&self) -> Option<&TypeName> {
        match (self.name.as_str(), self.args.as_slice()) {
            ("Task" | "ValueTask", [result]) => Some(result),
            _ => None,
        }
    }

    /// Whether this refers to `void`, `Task` or `ValueTask` without a result.
    pub fn is_void_like(&self) -> bool {
        self.args.is_empty() && matches!(self.name.as_str(), "void" | "Task" | "ValueTask")
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(qualifier) = &self.qualifier {
            write!(f, "{qualifier}.")?;
        }
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        if self.array {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

// ============================================================================
// SYMBOL KINDS
// ============================================================================

/// Kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Record,
}

impl From<TypeDeclKind> for TypeKind {
    fn from(kind: TypeDeclKind) -> Self {
        match kind {
            TypeDeclKind::Class => Self::Class,
            TypeDeclKind::Interface => Self::Interface,
            TypeDeclKind::Struct => Self::Struct,
            TypeDeclKind::Record => Self::Record,
        }
    }
}

/// Kind of a type member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Field,
    Property,
    Event,
    Method,
    Constructor,
}

/// Coarse classification over every symbol shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Type,
    Field,
    Property,
    Event,
    Method,
    Constructor,
    Parameter,
    Local,
}

impl SymbolKind {
    /// Get a display string for this kind
    pub fn display(&self) -> &'static str {
        match self {
            SymbolKind::Type => "type",
            SymbolKind::Field => "field",
            SymbolKind::Property => "property",
            SymbolKind::Event => "event",
            SymbolKind::Method => "method",
            SymbolKind::Constructor => "constructor",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Local => "local",
        }
    }
}

impl From<MemberKind> for SymbolKind {
    fn from(kind: MemberKind) -> Self {
        match kind {
            MemberKind::Field => Self::Field,
            MemberKind::Property => Self::Property,
            MemberKind::Event => Self::Event,
            MemberKind::Method => Self::Method,
            MemberKind::Constructor => Self::Constructor,
        }
    }
}

// ============================================================================
// SYMBOLS
// ============================================================================

/// A named type declared in some document of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSymbol {
    pub name: SmolStr,
    /// Containing namespace; `None` for the global namespace.
    pub namespace: Option<SmolStr>,
    /// Name of the enclosing type for nested declarations.
    pub containing_type: Option<SmolStr>,
    pub kind: TypeKind,
    pub modifiers: Vec<SyntaxKind>,
    pub attributes: Vec<String>,
    pub type_parameters: Vec<SmolStr>,
    /// Base class and interfaces in declaration order.
    pub base_types: Vec<TypeName>,
    pub members: Vec<MemberSymbol>,
    pub document: DocumentId,
    /// Range of the declaration node.
    pub range: TextRange,
}

impl TypeSymbol {
    /// `Namespace.Outer.Name`.
    pub fn qualified_name(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(ns) = &self.namespace {
            parts.push(ns);
        }
        if let Some(outer) = &self.containing_type {
            parts.push(outer);
        }
        parts.push(&self.name);
        parts.join(".")
    }

    pub fn members_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MemberSymbol> {
        self.members.iter().filter(move |m| m.name == name)
    }

    /// Explicit and implicit fields.
    pub fn fields(&self) -> impl Iterator<Item = &MemberSymbol> {
        self.members.iter().filter(|m| m.kind == MemberKind::Field)
    }

    /// Whether the type lives in a platform namespace (`System` or below).
    pub fn is_platform_type(&self) -> bool {
        self.namespace
            .as_deref()
            .is_some_and(|ns| ns == "System" || ns.starts_with("System."))
    }
}

/// A field, property, event, method or constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberSymbol {
    pub name: SmolStr,
    pub kind: MemberKind,
    /// Declared type for fields, properties and events; return type for methods.
    pub ty: Option<TypeName>,
    pub parameters: Vec<ParameterSymbol>,
    pub modifiers: Vec<SyntaxKind>,
    pub attributes: Vec<String>,
    /// Synthesized by the compiler (backing fields, default constructors,
    /// positional record properties).
    pub is_implicitly_declared: bool,
    /// Callee names of `Name(...)` invocations in the body.
    pub invoked_identifiers: Vec<SmolStr>,
    /// Declaration range; `None` for implicitly declared members.
    pub range: Option<TextRange>,
}

impl MemberSymbol {
    pub fn is_static(&self) -> bool {
        self.modifiers.contains(&SyntaxKind::STATIC_KW)
    }
}

/// A method, constructor or lambda parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSymbol {
    pub name: SmolStr,
    pub ty: Option<TypeName>,
    pub has_default: bool,
    pub range: TextRange,
}

/// A local variable declared in a statement block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalSymbol {
    pub name: SmolStr,
    /// Declared type, or the inferred type of the initializer for `var`.
    pub ty: Option<TypeName>,
    /// Start of the declarator, where the local comes into scope.
    pub declaration_start: TextSize,
    pub is_implicitly_declared: bool,
}

/// Anything name lookup can return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
    Type(Arc<TypeSymbol>),
    Member(MemberSymbol),
    Parameter(ParameterSymbol),
    Local(LocalSymbol),
}

impl Symbol {
    pub fn name(&self) -> &str {
        match self {
            Symbol::Type(it) => &it.name,
            Symbol::Member(it) => &it.name,
            Symbol::Parameter(it) => &it.name,
            Symbol::Local(it) => &it.name,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Type(_) => SymbolKind::Type,
            Symbol::Member(it) => it.kind.into(),
            Symbol::Parameter(_) => SymbolKind::Parameter,
            Symbol::Local(_) => SymbolKind::Local,
        }
    }

    pub fn is_implicitly_declared(&self) -> bool {
        match self {
            Symbol::Type(_) | Symbol::Parameter(_) => false,
            Symbol::Member(it) => it.is_implicitly_declared,
            Symbol::Local(it) => it.is_implicitly_declared,
        }
    }

    pub fn attributes(&self) -> &[String] {
        match self {
            Symbol::Type(it) => &it.attributes,
            Symbol::Member(it) => &it.attributes,
            Symbol::Parameter(_) | Symbol::Local(_) => &[],
        }
    }

    /// Type of the value this symbol denotes.
    pub fn ty(&self) -> Option<TypeName> {
        match self {
            Symbol::Type(it) => Some(TypeName::simple(it.name.clone())),
            Symbol::Member(it) => it.ty.clone(),
            Symbol::Parameter(it) => it.ty.clone(),
            Symbol::Local(it) => it.ty.clone(),
        }
    }
}
