//! Identity types for projects and documents.
//!
//! Ids survive snapshot forking: a document keeps its id when the project
//! containing it is rebuilt with an extra document.

use std::fmt;

use uuid::Uuid;

/// Identifies a project across every snapshot of a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectId(Uuid);

impl ProjectId {
    /// Allocate a fresh, globally unique project id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "project:{}", self.0)
    }
}

/// Identifies a document across every snapshot of a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentId {
    project: ProjectId,
    id: Uuid,
}

impl DocumentId {
    /// Allocate a fresh document id owned by `project`.
    pub fn new(project: ProjectId) -> Self {
        Self {
            project,
            id: Uuid::new_v4(),
        }
    }

    /// The project this document belongs to.
    pub fn project(&self) -> ProjectId {
        self.project
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "document:{}", self.id)
    }
}
