//! Adding generated documents to a solution.

use smol_str::SmolStr;
use tracing::debug;

use crate::base::DocumentId;
use crate::parser::{AstNode, CompilationUnit};

use super::affinity::AffinityToken;
use super::solution::Solution;

/// Where a generated document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// Exact name of the target project.
    pub project: SmolStr,
    /// Folder path inside the project.
    pub folders: Vec<SmolStr>,
    /// File name without extension; also the generated type's name.
    pub file_stem: SmolStr,
}

impl Placement {
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}{}", self.file_stem, extension)
    }
}

/// What [`add_document`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Materialized {
    Added(DocumentId),
    /// No project with the requested name; the solution is unchanged.
    ProjectMissing,
    /// The project already has a file with that name; the solution is unchanged.
    DuplicateFile,
}

/// Add `unit` as `<file_stem><extension>` under the placement's folders.
///
/// Missing projects and existing files are silent no-ops that hand back the
/// input snapshot.
pub fn add_document(
    solution: &Solution,
    placement: &Placement,
    extension: &str,
    unit: &CompilationUnit,
    affinity: &AffinityToken,
) -> (Solution, Materialized) {
    let Some(project) = solution.project_named(&placement.project) else {
        debug!(project = %placement.project, "target project missing, skipping document");
        return (solution.clone(), Materialized::ProjectMissing);
    };

    let file_name = placement.file_name(extension);
    if project.document_named(&file_name).is_some() {
        debug!(project = %placement.project, file = %file_name, "document already exists, skipping");
        return (solution.clone(), Materialized::DuplicateFile);
    }

    match solution.with_document(
        project.id(),
        file_name.as_str(),
        placement.folders.clone(),
        unit.syntax().to_string(),
        affinity,
    ) {
        Some((forked, id)) => {
            debug!(project = %placement.project, file = %file_name, "added document");
            (forked, Materialized::Added(id))
        }
        None => (solution.clone(), Materialized::ProjectMissing),
    }
}
