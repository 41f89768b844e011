//! High-level IR (HIR): declared symbols and the semantic model.
//!
//! This layer turns parsed documents into the symbol view refactorings work
//! against. It knows nothing about solutions or projects beyond the documents
//! handed to a [`Compilation`].
//!
//! ## Key Types
//!
//! - [`TypeSymbol`] / [`MemberSymbol`]: Declared types and their members,
//!   including compiler-synthesized ones
//! - [`Compilation`]: All types declared in one project
//! - [`SemanticModel`]: Per-document queries: declared symbols, expression
//!   types, name lookup
//! - [`TypeLookup`]: Name-to-type resolution shared by compilations and solutions
//!
//! ## Layers
//!
//! ```text
//! CompilationUnit (AST)
//!     │
//!     ▼
//! extract_types(document)   ← declared symbols per document
//!     │
//!     ▼
//! Compilation               ← project-wide type index
//!     │
//!     ▼
//! SemanticModel             ← document + compilation
//! ```

mod compilation;
mod helpers;
mod semantic;
mod symbols;

pub use compilation::{Compilation, TypeLookup};
pub use helpers::{
    DEFAULT_NOTIFY_METHOD, backing_field_prefix, is_compiler_generated, is_inaccessible_local,
    notify_property_changed_method,
};
pub use semantic::SemanticModel;
pub use symbols::{
    COMPILER_GENERATED, LocalSymbol, MemberKind, MemberSymbol, ParameterSymbol, Symbol,
    SymbolKind, TypeKind, TypeName, TypeSymbol, extract_type, extract_types,
};
