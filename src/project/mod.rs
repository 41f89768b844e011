//! Workspace snapshots and their lifecycle.
//!
//! - [`Solution`] / [`Project`] / [`Document`]: immutable, `Arc`-shared snapshots
//! - [`UiAffinity`] / [`AffinityToken`]: the rendezvous every mutation needs
//! - [`find_existing`]: workspace-wide type search with cancellation
//! - [`add_document`]: idempotent placement of generated documents
//! - [`Workspace`]: the host's current solution
//! - [`load_solution`] / [`write_changes`]: disk round trip

mod affinity;
mod loader;
mod lookup;
mod materialize;
mod solution;
mod workspace;

pub use affinity::{AffinityToken, SerialAffinity, UiAffinity};
pub use loader::{LoadError, load_solution, write_changes};
pub use lookup::{exists, find_existing};
pub use materialize::{Materialized, Placement, add_document};
pub use solution::{
    AddedDocument, Document, Project, Solution, SolutionChanges, SolutionVersion,
};
pub use workspace::{Workspace, WorkspaceError};
