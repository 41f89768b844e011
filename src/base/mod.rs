//! Foundation types for the devassist toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`ProjectId`], [`DocumentId`] - Stable identities for workspace snapshots
//! - [`Cancelled`] - The one error that is allowed to escape an interaction
//! - [`naming`] - Casing, prefix and suffix helpers for C# identifiers
//!
//! This module has NO dependencies on other devassist modules.

mod error;
mod ids;
pub mod naming;

pub use error::{CancellationExt, Cancelled};
pub use ids::{DocumentId, ProjectId};

// Re-export text-size types for convenience
pub use text_size::{self, TextRange, TextSize};
