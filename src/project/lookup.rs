//! Workspace-wide search for declared types.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::base::{CancellationExt, Cancelled};
use crate::hir::TypeSymbol;

use super::solution::Solution;

/// First type named exactly `name` in any project of `solution`.
///
/// Projects are searched in order. Each project's documents are parsed one
/// at a time, yielding between files, and the project's compilation is then
/// asked once for the name. Cancellation is polled before each project and
/// each document and surfaces as `Err(Cancelled)`, never as `Ok(None)`.
pub async fn find_existing(
    solution: &Solution,
    name: &str,
    cancel: &CancellationToken,
) -> Result<Option<Arc<TypeSymbol>>, Cancelled> {
    if name.trim().is_empty() {
        return Ok(None);
    }

    for project in solution.projects() {
        cancel.check_cancelled()?;
        trace!(project = project.name(), name, "searching project");

        for document in project.documents() {
            cancel.check_cancelled()?;
            tokio::task::yield_now().await;
            document.parse();
        }

        if let Some(found) = project.compilation().symbols_with_name(name).next() {
            trace!(project = project.name(), name, "found existing type");
            return Ok(Some(Arc::clone(found)));
        }
    }
    Ok(None)
}

/// Whether a type named `name` exists anywhere in `solution`.
pub async fn exists(
    solution: &Solution,
    name: &str,
    cancel: &CancellationToken,
) -> Result<bool, Cancelled> {
    Ok(find_existing(solution, name, cancel).await?.is_some())
}
