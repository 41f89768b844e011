//! Solutions shaped like an Aurora service.

use devassist::base::{DocumentId, ProjectId, TextRange, TextSize};
use devassist::ide::RefactoringContext;
use devassist::parser::{AstNode, TypeDecl};
use devassist::project::{AffinityToken, AddedDocument, Solution};
use tokio_util::sync::CancellationToken;

pub const DOMAIN: &str = "Aurora.Billing.Domain";
pub const APPLICATION: &str = "Aurora.Billing.ApplicationService";
pub const API: &str = "Aurora.Billing.Api";

/// Strip the `$0` caret marker; returns the text and an empty range there.
pub fn caret(text: &str) -> (String, TextRange) {
    let offset = text.find("$0").expect("fixture has a $0 marker");
    let at = TextSize::new(offset as u32);
    (text.replace("$0", ""), TextRange::empty(at))
}

/// `body` placed in an action method of a controller in `namespace`.
pub fn controller_in(namespace: &str, body: &str) -> String {
    format!(
        r#"using Travel2Pay.Cqrs;

namespace {namespace}
{{
    public class InvoiceController
    {{
        public async Task Create(IMediator bus)
        {{
            {body}
        }}
    }}
}}
"#
    )
}

pub fn controller(body: &str) -> String {
    controller_in("Aurora.Billing.Api.Controllers", body)
}

/// A Billing service with empty Domain and ApplicationService projects and
/// the controller source in the Api project.
pub struct Billing {
    pub solution: Solution,
    pub domain: ProjectId,
    pub application: ProjectId,
    pub document: DocumentId,
    pub span: TextRange,
}

impl Billing {
    /// `source` must contain a `$0` marker.
    pub fn new(source: &str) -> Self {
        let (text, span) = caret(source);
        let (solution, domain) = Solution::new().with_project(DOMAIN, None);
        let (solution, application) = solution.with_project(APPLICATION, None);
        let (solution, api) = solution.with_project(API, None);
        let (solution, document) = solution
            .with_document(
                api,
                "InvoiceController.cs",
                vec!["Controllers".into()],
                text,
                &AffinityToken::assume_affinity(),
            )
            .unwrap();
        Self {
            solution,
            domain,
            application,
            document,
            span,
        }
    }

    pub fn at(body: &str) -> Self {
        Self::new(&controller(body))
    }

    /// Add an existing source file to `project`.
    pub fn with_source(mut self, project: ProjectId, folder: &str, name: &str, text: &str) -> Self {
        let (solution, _) = self
            .solution
            .with_document(project, name, vec![folder.into()], text, &AffinityToken::assume_affinity())
            .unwrap();
        self.solution = solution;
        self
    }

    pub fn context(&self) -> RefactoringContext {
        self.context_with(CancellationToken::new())
    }

    pub fn context_with(&self, cancel: CancellationToken) -> RefactoringContext {
        RefactoringContext {
            solution: self.solution.clone(),
            document: self.document,
            span: self.span,
            cancel,
        }
    }
}

/// The single type declared by a generated document.
pub fn declared_type(added: &AddedDocument) -> TypeDecl {
    added
        .document
        .parse()
        .tree()
        .all_types()
        .next()
        .expect("generated document declares a type")
}

/// Base list of a declared type, trivia dropped.
pub fn base_types(decl: &TypeDecl) -> Vec<String> {
    decl.base_types()
        .iter()
        .map(|b| b.text_without_trivia())
        .collect()
}

/// Added documents as `(project, folders, file)` triples.
pub fn placements(added: &[AddedDocument]) -> Vec<(String, Vec<String>, String)> {
    added
        .iter()
        .map(|a| {
            (
                a.project_name.to_string(),
                a.document.folders().iter().map(|f| f.to_string()).collect(),
                a.document.name().to_string(),
            )
        })
        .collect()
}
