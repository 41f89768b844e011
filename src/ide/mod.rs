//! IDE features: the request refactoring and its building blocks.
//!
//! The flow for one interaction:
//!
//! ```text
//! RefactoringContext ─► find_node ─► classify ─► Intent
//!                                               │
//!                      resolve_service(namespace_at)
//!                                               │
//!                  exists() per candidate ─► CodeAction
//!                                               │
//!             invoke ─► synthesis ─► add_document ─► Solution
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use devassist::ide::{RefactoringContext, RequestRefactoringProvider};
//! use devassist::project::SerialAffinity;
//!
//! let provider = RequestRefactoringProvider::new(Arc::new(SerialAffinity::new()));
//! let actions = provider.compute_refactorings(&cx).await?;
//! let updated = actions[0].invoke(&cx.cancel).await?;
//! ```

mod code_action;
mod config;
pub mod conventions;
mod intent;
mod refactoring;
pub mod synthesis;

pub use code_action::{ActionCancelled, ActionPlan, CandidateArtifact, CodeAction, EQUIVALENCE_KEY};
pub use config::AssistConfig;
pub use conventions::{ArtifactKind, RequestKind, resolve_service};
pub use intent::{Intent, classify};
pub use refactoring::{RefactoringContext, RequestRefactoringProvider};
pub use synthesis::{GeneratedUnit, SynthesisError};
