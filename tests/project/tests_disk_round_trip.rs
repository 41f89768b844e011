//! Load a service from disk, run the refactoring, write the result back.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use devassist::ide::{RefactoringContext, RequestRefactoringProvider};
use devassist::project::{SerialAffinity, Workspace, load_solution, write_changes};
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use crate::helpers::fixtures::{caret, controller};

fn write(root: &Path, relative: &str, text: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// Billing service on disk; returns the directory and the caret range in
/// the controller.
fn billing_on_disk(body: &str) -> (TempDir, devassist::TextRange) {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    let (controller, span) = caret(&controller(body));
    write(root, "src/Aurora.Billing.Domain/Aurora.Billing.Domain.csproj", "<Project />");
    write(
        root,
        "src/Aurora.Billing.Domain/Invoice.cs",
        "namespace Aurora.Billing.Domain { public class Invoice { } }",
    );
    write(
        root,
        "src/Aurora.Billing.ApplicationService/Aurora.Billing.ApplicationService.csproj",
        "<Project />",
    );
    write(root, "src/Aurora.Billing.Api/Aurora.Billing.Api.csproj", "<Project />");
    write(root, "src/Aurora.Billing.Api/Controllers/InvoiceController.cs", &controller);
    (dir, span)
}

async fn compute(
    workspace: &Workspace,
    span: devassist::TextRange,
) -> Vec<devassist::ide::CodeAction> {
    let solution = workspace.current_solution();
    let document = solution
        .project_named("Aurora.Billing.Api")
        .and_then(|p| p.document_named("InvoiceController.cs"))
        .map(|d| d.id())
        .unwrap();
    let cx = RefactoringContext {
        solution,
        document,
        span,
        cancel: CancellationToken::new(),
    };
    RequestRefactoringProvider::new(Arc::new(SerialAffinity::new()))
        .compute_refactorings(&cx)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_generated_documents_are_written_into_project_folders() {
    crate::helpers::init_tracing();
    let (dir, span) = billing_on_disk("var command = new CreateInv$0oiceCommand();");
    let workspace = Workspace::new(load_solution(dir.path()).unwrap());

    let actions = compute(&workspace, span).await;
    assert_eq!(actions.len(), 1);
    let updated = actions[0].invoke(&CancellationToken::new()).await.unwrap();
    let changes = workspace.try_apply_changes(updated).unwrap();
    let written = write_changes(&workspace.current_solution(), &changes).unwrap();

    let src = dir.path().join("src");
    assert_eq!(
        written,
        [
            src.join("Aurora.Billing.Domain/Commands/CreateInvoiceCommand.cs"),
            src.join("Aurora.Billing.ApplicationService/Commands/CreateInvoiceCommandHandler.cs"),
        ]
    );
    let request = fs::read_to_string(&written[0]).unwrap();
    assert!(request.contains("public class CreateInvoiceCommand : ICommand"));
}

#[tokio::test]
async fn test_reloaded_solution_offers_no_action() {
    let (dir, span) = billing_on_disk("var command = new CreateInv$0oiceCommand();");
    let workspace = Workspace::new(load_solution(dir.path()).unwrap());
    let actions = compute(&workspace, span).await;
    let updated = actions[0].invoke(&CancellationToken::new()).await.unwrap();
    let changes = workspace.try_apply_changes(updated).unwrap();
    write_changes(&workspace.current_solution(), &changes).unwrap();

    let reloaded = Workspace::new(load_solution(dir.path()).unwrap());

    assert!(compute(&reloaded, span).await.is_empty());
}
