//! # aurora-devassist
//!
//! Refactoring engine that scaffolds CQRS requests for Aurora services: put
//! the cursor on `new CreateInvoiceCommand()` or
//! `SendQuery<GetInvoiceQuery, InvoiceDto>(...)` and it proposes the missing
//! request, handler and DTO types in the service's Domain and
//! ApplicationService projects.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide       → Intent classification, synthesis, code actions
//!   ↓
//! project   → Solution snapshots, UI affinity, lookup, loading
//!   ↓
//! hir       → Declared symbols, compilations, semantic model
//!   ↓
//! syntax    → Cursor queries, node construction, formatting
//!   ↓
//! parser    → Logos lexer, rowan CST, typed AST
//!   ↓
//! base      → Ids, cancellation, naming helpers, TextRange
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → hir → project → ide)
// ============================================================================

/// Foundation types: ids, cancellation, naming
pub mod base;

/// Parser: Logos lexer, rowan CST, typed AST
pub mod parser;

/// Syntax: cursor queries, `make` builders, whitespace normalization
pub mod syntax;

/// High-level IR: symbols, compilations, semantic model
pub mod hir;

/// Solutions, projects and documents
pub mod project;

/// IDE features: the request refactoring
pub mod ide;

// Re-export foundation types
pub use base::{Cancelled, DocumentId, ProjectId, TextRange, TextSize};
