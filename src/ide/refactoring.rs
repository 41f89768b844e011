//! Refactoring entry point: from a cursor to zero or one [`CodeAction`].
//!
//! The pipeline runs in two phases. The synchronous phase resolves the cursor
//! to a syntax node, classifies the intent and reads the enclosing namespace;
//! no syntax node outlives it. The asynchronous phase checks which artifacts
//! already exist, polling cancellation as it goes.

use std::sync::Arc;

use smol_str::SmolStr;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::base::{CancellationExt, Cancelled, DocumentId, TextRange};
use crate::project::{Solution, UiAffinity, exists};
use crate::syntax::{find_node, namespace_at};

use super::code_action::{ActionPlan, CandidateArtifact, CodeAction};
use super::config::AssistConfig;
use super::conventions::{ArtifactKind, resolve_service};
use super::intent::{Intent, classify};

/// A refactoring request from the host.
#[derive(Debug, Clone)]
pub struct RefactoringContext {
    pub solution: Solution,
    pub document: DocumentId,
    /// Caret (empty) or selection.
    pub span: TextRange,
    pub cancel: CancellationToken,
}

/// Offers "create request and handler" actions.
#[derive(Clone)]
pub struct RequestRefactoringProvider {
    config: AssistConfig,
    affinity: Arc<dyn UiAffinity>,
}

impl RequestRefactoringProvider {
    pub fn new(affinity: Arc<dyn UiAffinity>) -> Self {
        Self::with_config(affinity, AssistConfig::default())
    }

    pub fn with_config(affinity: Arc<dyn UiAffinity>, config: AssistConfig) -> Self {
        Self { config, affinity }
    }

    pub fn config(&self) -> &AssistConfig {
        &self.config
    }

    /// Actions applicable at `cx.span`.
    ///
    /// Returns an empty list when the cursor is not on a request, the
    /// document is not in an `Aurora.<service>` namespace, or every artifact
    /// already exists. Cancellation is the only error.
    pub async fn compute_refactorings(
        &self,
        cx: &RefactoringContext,
    ) -> Result<Vec<CodeAction>, Cancelled> {
        cx.cancel.check_cancelled()?;

        let Some((intent, namespace)) = classify_at(cx) else {
            return Ok(Vec::new());
        };
        let Some(service) = namespace.as_deref().and_then(resolve_service) else {
            debug!(?namespace, "no service in namespace");
            return Ok(Vec::new());
        };
        let Some(mut plan) = plan(&intent, &service) else {
            return Ok(Vec::new());
        };

        for artifact in plan_artifacts_mut(&mut plan) {
            artifact.exists = exists(&cx.solution, &artifact.name, &cx.cancel).await?;
        }
        if plan.is_complete() {
            debug!(request = intent.request(), "all artifacts already exist");
            return Ok(Vec::new());
        }

        Ok(vec![CodeAction::new(
            plan,
            cx.solution.clone(),
            self.config.clone(),
            Arc::clone(&self.affinity),
        )])
    }
}

/// Intent and enclosing namespace at the span, computed without awaiting.
fn classify_at(cx: &RefactoringContext) -> Option<(Intent, Option<String>)> {
    let Some(semantic) = cx.solution.semantic_model(cx.document) else {
        debug!(document = ?cx.document, "document not in solution");
        return None;
    };
    let root = semantic.root();
    let node = find_node(&root, cx.span)?;
    let intent = classify(&node, &semantic)?;
    Some((intent, namespace_at(&root, cx.span)))
}

/// Candidate artifacts for `intent`; existence is filled in later.
fn plan(intent: &Intent, service: &SmolStr) -> Option<ActionPlan> {
    let kind = intent.kind();
    let handler_name = kind.handler_name(intent.request())?;
    let handler_kind = if intent.dto().is_some() {
        ArtifactKind::HandlerWithResult(kind)
    } else {
        ArtifactKind::Handler(kind)
    };

    let candidate = |kind: ArtifactKind, name: &str| -> Option<CandidateArtifact> {
        match kind.template().resolve(service) {
            Ok(template) => Some(CandidateArtifact {
                kind,
                name: SmolStr::new(name),
                service: service.clone(),
                exists: false,
                template,
            }),
            Err(err) => {
                warn!(?kind, error = %err, "artifact template does not resolve");
                None
            }
        }
    };

    let dto = match intent.dto() {
        Some(dto) => Some(candidate(ArtifactKind::Dto, dto)?),
        None => None,
    };
    Some(ActionPlan {
        kind,
        request: candidate(ArtifactKind::Request(kind), intent.request())?,
        dto,
        handler: candidate(handler_kind, &handler_name)?,
    })
}

fn plan_artifacts_mut(plan: &mut ActionPlan) -> impl Iterator<Item = &mut CandidateArtifact> {
    std::iter::once(&mut plan.request)
        .chain(plan.dto.as_mut())
        .chain(std::iter::once(&mut plan.handler))
}
