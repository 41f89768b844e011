//! Declared symbols: pure functions from typed AST to symbol values.
//!
//! Extraction works directly with the typed AST wrappers from
//! `crate::parser` (`TypeDecl`, `PropertyDecl`, `MethodDecl`, ...) and also
//! produces the members the compiler would synthesize: auto-property backing
//! fields, parameterless constructors and positional record properties.
//!
//! # Module structure
//!
//! - [`types`]: Symbol definitions (`TypeSymbol`, `MemberSymbol`, `TypeName`, ...)
//! - [`extract`]: Extraction entry points

mod extract;
mod types;


pub use types::{
    LocalSymbol, MemberKind, MemberSymbol, ParameterSymbol, Symbol, SymbolKind, TypeKind, TypeName,
    TypeSymbol,
};

pub use extract::{COMPILER_GENERATED, extract_type, extract_types};
pub(crate) use extract::extract_parameters;
