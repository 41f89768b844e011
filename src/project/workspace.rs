//! The host-side owner of the current solution.

use parking_lot::RwLock;
use thiserror::Error;
use tracing::info;

use super::solution::{Solution, SolutionChanges, SolutionVersion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkspaceError {
    #[error("solution {proposed:?} was not forked from the current solution {current:?}")]
    StaleSolution {
        current: SolutionVersion,
        proposed: SolutionVersion,
    },
}

/// Holds the current solution and accepts new snapshots forked from it.
///
/// Readers take cheap clones of the current snapshot; applying changes swaps
/// the snapshot under a write lock.
#[derive(Debug, Default)]
pub struct Workspace {
    current: RwLock<Solution>,
}

impl Workspace {
    pub fn new(solution: Solution) -> Self {
        Self {
            current: RwLock::new(solution),
        }
    }

    pub fn current_solution(&self) -> Solution {
        self.current.read().clone()
    }

    /// Replace the current solution with `proposed`.
    ///
    /// Only snapshots forked from the current solution are accepted; anything
    /// else was computed against outdated state and is rejected.
    pub fn try_apply_changes(&self, proposed: Solution) -> Result<SolutionChanges, WorkspaceError> {
        let mut current = self.current.write();
        if !proposed.descends_from(&current) {
            return Err(WorkspaceError::StaleSolution {
                current: current.version(),
                proposed: proposed.version(),
            });
        }
        let changes = proposed.changes_since(&current);
        info!(added = changes.added.len(), "applied solution changes");
        *current = proposed;
        Ok(changes)
    }
}
