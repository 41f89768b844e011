//! Immutable solution snapshots.
//!
//! A [`Solution`] owns [`Project`]s which own [`Document`]s, all shared
//! through `Arc`. Forking a snapshot (adding a document) rebuilds only the
//! path from the solution to the touched project; every other project,
//! document, parse and compilation is reused as is. The old snapshot stays
//! valid and never observes the change.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use smol_str::SmolStr;

use crate::base::{DocumentId, ProjectId};
use crate::hir::{Compilation, SemanticModel, TypeLookup, TypeSymbol};
use crate::parser::{Parse, parse};

use super::affinity::AffinityToken;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// Monotonic identity of one solution snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SolutionVersion(u64);

impl SolutionVersion {
    fn next() -> Self {
        Self(NEXT_VERSION.fetch_add(1, Ordering::Relaxed))
    }
}

/// Chain of versions a snapshot was forked through.
#[derive(Debug)]
struct Lineage {
    version: SolutionVersion,
    parent: Option<Arc<Lineage>>,
}

impl Lineage {
    fn root() -> Arc<Self> {
        Arc::new(Self {
            version: SolutionVersion::next(),
            parent: None,
        })
    }

    fn fork(self: &Arc<Self>) -> Arc<Self> {
        Arc::new(Self {
            version: SolutionVersion::next(),
            parent: Some(Arc::clone(self)),
        })
    }

    fn contains(&self, version: SolutionVersion) -> bool {
        let mut current = Some(self);
        while let Some(lineage) = current {
            if lineage.version == version {
                return true;
            }
            current = lineage.parent.as_deref();
        }
        false
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// A source file inside a project.
#[derive(Debug)]
pub struct Document {
    id: DocumentId,
    /// File name including the extension (`CreateInvoiceCommand.cs`).
    name: SmolStr,
    /// Folder path relative to the project directory.
    folders: Vec<SmolStr>,
    text: Arc<str>,
    parse: OnceCell<Arc<Parse>>,
}

impl Document {
    pub fn new(
        project: ProjectId,
        name: impl Into<SmolStr>,
        folders: Vec<SmolStr>,
        text: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            id: DocumentId::new(project),
            name: name.into(),
            folders,
            text: text.into(),
            parse: OnceCell::new(),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn folders(&self) -> &[SmolStr] {
        &self.folders
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Path relative to the project directory: `Commands/Foo.cs`.
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.folders.iter().map(|f| f.as_str()).collect();
        path.push(self.name.as_str());
        path
    }

    /// Parse of the document text, computed once.
    pub fn parse(&self) -> Arc<Parse> {
        Arc::clone(self.parse.get_or_init(|| Arc::new(parse(&self.text))))
    }
}

// ============================================================================
// PROJECT
// ============================================================================

/// A named set of documents compiled together.
#[derive(Debug)]
pub struct Project {
    id: ProjectId,
    name: SmolStr,
    directory: Option<PathBuf>,
    documents: IndexMap<DocumentId, Arc<Document>>,
    compilation: OnceCell<Arc<Compilation>>,
}

impl Project {
    pub fn id(&self) -> ProjectId {
        self.id
    }

    /// Assembly name, `Aurora.Billing.Domain`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory the project was loaded from, if any.
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.documents.values()
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.documents.get(&id)
    }

    /// Document whose file name is exactly `name`.
    pub fn document_named(&self, name: &str) -> Option<&Arc<Document>> {
        self.documents.values().find(|d| d.name() == name)
    }

    /// The project's compilation, built on first use from every document.
    pub fn compilation(&self) -> Arc<Compilation> {
        let compilation = self.compilation.get_or_init(|| {
            let units: Vec<_> = self
                .documents
                .values()
                .map(|d| (d.id(), d.parse().tree()))
                .collect();
            Arc::new(Compilation::new(
                self.name.clone(),
                units.iter().map(|(id, unit)| (*id, unit)),
            ))
        });
        Arc::clone(compilation)
    }

    /// Semantic model of one of this project's documents.
    pub fn semantic_model(&self, document: DocumentId) -> Option<SemanticModel> {
        let parse = self.documents.get(&document)?.parse();
        Some(SemanticModel::new(document, parse, self.compilation()))
    }

    fn with_document(&self, document: Document) -> Self {
        let mut documents = self.documents.clone();
        documents.insert(document.id(), Arc::new(document));
        Self {
            id: self.id,
            name: self.name.clone(),
            directory: self.directory.clone(),
            documents,
            compilation: OnceCell::new(),
        }
    }
}

// ============================================================================
// SOLUTION
// ============================================================================

/// An immutable snapshot of a multi-project workspace.
///
/// Cloning is cheap: projects are shared.
#[derive(Debug, Clone)]
pub struct Solution {
    lineage: Arc<Lineage>,
    projects: Arc<IndexMap<ProjectId, Arc<Project>>>,
}

impl Default for Solution {
    fn default() -> Self {
        Self::new()
    }
}

impl Solution {
    /// An empty solution with a fresh lineage.
    pub fn new() -> Self {
        Self {
            lineage: Lineage::root(),
            projects: Arc::default(),
        }
    }

    pub fn version(&self) -> SolutionVersion {
        self.lineage.version
    }

    /// Whether this snapshot is `ancestor` or was forked from it.
    pub fn descends_from(&self, ancestor: &Solution) -> bool {
        self.lineage.contains(ancestor.version())
    }

    pub fn projects(&self) -> impl Iterator<Item = &Arc<Project>> {
        self.projects.values()
    }

    pub fn project_ids(&self) -> impl Iterator<Item = ProjectId> + '_ {
        self.projects.keys().copied()
    }

    pub fn project(&self, id: ProjectId) -> Option<&Arc<Project>> {
        self.projects.get(&id)
    }

    /// Project whose name equals `name` exactly.
    pub fn project_named(&self, name: &str) -> Option<&Arc<Project>> {
        self.projects.values().find(|p| p.name() == name)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Arc<Document>> {
        self.projects.get(&id.project())?.document(id)
    }

    /// Every document of every project.
    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> {
        self.projects.values().flat_map(|p| p.documents())
    }

    pub fn semantic_model(&self, document: DocumentId) -> Option<SemanticModel> {
        self.projects.get(&document.project())?.semantic_model(document)
    }

    /// Fork with an additional empty project.
    pub fn with_project(
        &self,
        name: impl Into<SmolStr>,
        directory: Option<PathBuf>,
    ) -> (Self, ProjectId) {
        self.with_loaded_project(name, directory, Vec::new())
    }

    /// Fork with a project loaded from disk, documents included.
    ///
    /// Used while assembling a solution that is not shared yet.
    pub fn with_loaded_project(
        &self,
        name: impl Into<SmolStr>,
        directory: Option<PathBuf>,
        documents: impl IntoIterator<Item = (SmolStr, Vec<SmolStr>, String)>,
    ) -> (Self, ProjectId) {
        let id = ProjectId::new();
        let documents = documents
            .into_iter()
            .map(|(name, folders, text)| {
                let document = Document::new(id, name, folders, text);
                (document.id(), Arc::new(document))
            })
            .collect();
        let project = Project {
            id,
            name: name.into(),
            directory,
            documents,
            compilation: OnceCell::new(),
        };
        let mut projects = (*self.projects).clone();
        projects.insert(id, Arc::new(project));
        (
            Self {
                lineage: self.lineage.fork(),
                projects: Arc::new(projects),
            },
            id,
        )
    }

    /// Fork with a document added to `project`.
    ///
    /// Mutating a shared snapshot requires the UI affinity. Returns `None`
    /// when the project is not part of this solution.
    pub fn with_document(
        &self,
        project: ProjectId,
        name: impl Into<SmolStr>,
        folders: Vec<SmolStr>,
        text: impl Into<Arc<str>>,
        _affinity: &AffinityToken,
    ) -> Option<(Self, DocumentId)> {
        let old = self.projects.get(&project)?;
        let document = Document::new(project, name, folders, text);
        let id = document.id();

        let mut projects = (*self.projects).clone();
        projects.insert(project, Arc::new(old.with_document(document)));
        Some((
            Self {
                lineage: self.lineage.fork(),
                projects: Arc::new(projects),
            },
            id,
        ))
    }

    /// Documents present in `self` but not in `base`.
    pub fn changes_since(&self, base: &Solution) -> SolutionChanges {
        let added = self
            .projects
            .values()
            .flat_map(|project| {
                project
                    .documents()
                    .filter(move |d| base.document(d.id()).is_none())
                    .map(move |d| AddedDocument {
                        project: project.id(),
                        project_name: project.name.clone(),
                        document: Arc::clone(d),
                    })
            })
            .collect();
        SolutionChanges { added }
    }
}

impl TypeLookup for Solution {
    fn types_named(&self, name: &str) -> Vec<Arc<TypeSymbol>> {
        self.projects
            .values()
            .flat_map(|p| p.compilation().symbols_with_name(name).cloned().collect::<Vec<_>>())
            .collect()
    }
}

/// The difference between two snapshots of one lineage.
#[derive(Debug, Clone, Default)]
pub struct SolutionChanges {
    pub added: Vec<AddedDocument>,
}

impl SolutionChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct AddedDocument {
    pub project: ProjectId,
    pub project_name: SmolStr,
    pub document: Arc<Document>,
}
