//! Offered code actions and their deferred execution.

use std::fmt;
use std::sync::Arc;

use smol_str::SmolStr;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::base::{Cancelled, DocumentId};
use crate::project::{Materialized, Placement, Solution, UiAffinity, add_document};

use super::config::AssistConfig;
use super::conventions::{ArtifactKind, RequestKind, ResolvedTemplate};
use super::synthesis::{
    GeneratedUnit, SynthesisError, UnitContext, dto, handler, handler_with_result, marker_type,
};

/// Equivalence key shared by every request action.
pub const EQUIVALENCE_KEY: &str = "RequestCodeRefactoringProvider";

/// One artifact an action may generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateArtifact {
    pub kind: ArtifactKind,
    pub name: SmolStr,
    pub service: SmolStr,
    /// A type with this name already exists somewhere in the solution.
    pub exists: bool,
    pub template: ResolvedTemplate,
}

impl CandidateArtifact {
    pub fn placement(&self) -> Placement {
        Placement {
            project: self.template.project.clone(),
            folders: self.template.folders.clone(),
            file_stem: self.name.clone(),
        }
    }
}

/// Everything an action generates, in generation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionPlan {
    pub kind: RequestKind,
    pub request: CandidateArtifact,
    pub dto: Option<CandidateArtifact>,
    pub handler: CandidateArtifact,
}

impl ActionPlan {
    /// Request, then DTO, then handler.
    pub fn artifacts(&self) -> impl Iterator<Item = &CandidateArtifact> {
        std::iter::once(&self.request)
            .chain(self.dto.as_ref())
            .chain(std::iter::once(&self.handler))
    }

    /// Artifacts that still have to be generated.
    pub fn missing(&self) -> impl Iterator<Item = &CandidateArtifact> {
        self.artifacts().filter(|a| !a.exists)
    }

    pub fn is_complete(&self) -> bool {
        self.missing().next().is_none()
    }

    fn synthesize(
        &self,
        artifact: &CandidateArtifact,
        config: &AssistConfig,
    ) -> Result<GeneratedUnit, SynthesisError> {
        let cx = UnitContext {
            namespace: &artifact.template.namespace,
            usings: &artifact.template.usings,
            format: &config.format,
        };
        let request = self.request.name.as_str();
        match artifact.kind {
            ArtifactKind::Request(kind) => marker_type(kind, &artifact.name, cx),
            ArtifactKind::Handler(kind) => handler(kind, request, cx),
            ArtifactKind::HandlerWithResult(kind) => {
                let dto_name = self.dto.as_ref().map(|d| d.name.as_str()).unwrap_or_default();
                handler_with_result(kind, request, dto_name, cx)
            }
            ArtifactKind::Dto => dto(&artifact.name, cx),
        }
    }
}

/// Cancellation observed between generation steps.
///
/// Documents added before the cancellation stay in `partial`.
#[derive(Debug, Clone, Error)]
#[error("code action cancelled after adding {} document(s)", .applied.len())]
pub struct ActionCancelled {
    pub partial: Solution,
    pub applied: Vec<DocumentId>,
}

impl From<ActionCancelled> for Cancelled {
    fn from(_: ActionCancelled) -> Self {
        Cancelled
    }
}

/// An offered refactoring. Nothing happens until [`invoke`](Self::invoke).
#[derive(Clone)]
pub struct CodeAction {
    title: &'static str,
    plan: ActionPlan,
    solution: Solution,
    config: AssistConfig,
    affinity: Arc<dyn UiAffinity>,
}

impl fmt::Debug for CodeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeAction")
            .field("title", &self.title)
            .field("plan", &self.plan)
            .field("solution", &self.solution.version())
            .finish_non_exhaustive()
    }
}

impl CodeAction {
    pub(crate) fn new(
        plan: ActionPlan,
        solution: Solution,
        config: AssistConfig,
        affinity: Arc<dyn UiAffinity>,
    ) -> Self {
        Self {
            title: plan.kind.conventions().title,
            plan,
            solution,
            config,
            affinity,
        }
    }

    pub fn title(&self) -> &str {
        self.title
    }

    pub fn equivalence_key(&self) -> &str {
        EQUIVALENCE_KEY
    }

    pub fn plan(&self) -> &ActionPlan {
        &self.plan
    }

    /// What the action would generate, existing artifacts included.
    pub fn artifacts(&self) -> impl Iterator<Item = &CandidateArtifact> {
        self.plan.artifacts()
    }

    /// Generate the missing artifacts into the snapshot the action was
    /// offered on.
    pub async fn invoke(&self, cancel: &CancellationToken) -> Result<Solution, ActionCancelled> {
        self.invoke_on(&self.solution, cancel).await
    }

    /// Generate the missing artifacts into `solution`.
    ///
    /// Each artifact is one step: rendezvous with the UI affinity, synthesize,
    /// add. Cancellation is checked before every step. Files that already
    /// exist in the target project are left alone, so invoking twice adds
    /// nothing the second time.
    pub async fn invoke_on(
        &self,
        solution: &Solution,
        cancel: &CancellationToken,
    ) -> Result<Solution, ActionCancelled> {
        let mut current = solution.clone();
        let mut applied = Vec::new();

        for artifact in self.plan.missing() {
            if cancel.is_cancelled() {
                return Err(ActionCancelled {
                    partial: current,
                    applied,
                });
            }
            let token = self.affinity.switch_to_main_thread().await;
            if cancel.is_cancelled() {
                return Err(ActionCancelled {
                    partial: current,
                    applied,
                });
            }

            let unit = match self.plan.synthesize(artifact, &self.config) {
                Ok(unit) => unit,
                Err(err) => {
                    warn!(name = %artifact.name, error = %err, "skipping artifact that failed to synthesize");
                    continue;
                }
            };
            let (next, outcome) = add_document(
                &current,
                &artifact.placement(),
                &self.config.file_extension,
                &unit.unit,
                &token,
            );
            drop(token);

            match outcome {
                Materialized::Added(id) => applied.push(id),
                Materialized::ProjectMissing | Materialized::DuplicateFile => {
                    debug!(name = %artifact.name, ?outcome, "artifact not added");
                }
            }
            current = next;
        }

        info!(title = self.title, added = applied.len(), "code action applied");
        Ok(current)
    }
}
