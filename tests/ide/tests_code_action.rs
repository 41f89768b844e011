//! Invoking actions: generated documents, idempotence and cancellation.

use std::sync::Arc;

use devassist::ide::{CodeAction, RequestRefactoringProvider};
use devassist::project::{SerialAffinity, Solution, UiAffinity, Workspace, WorkspaceError};
use tokio_util::sync::CancellationToken;

use crate::helpers::affinity::RecordingAffinity;
use crate::helpers::fixtures::*;
use crate::helpers::init_tracing;

async fn single_action(billing: &Billing, affinity: Arc<dyn UiAffinity>) -> CodeAction {
    let mut actions = RequestRefactoringProvider::new(affinity)
        .compute_refactorings(&billing.context())
        .await
        .unwrap();
    assert_eq!(actions.len(), 1, "expected exactly one action");
    actions.remove(0)
}

async fn invoke(billing: &Billing) -> Solution {
    single_action(billing, Arc::new(SerialAffinity::new()))
        .await
        .invoke(&CancellationToken::new())
        .await
        .unwrap()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// =============================================================================
// GENERATED DOCUMENTS
// =============================================================================

#[tokio::test]
async fn test_create_command_adds_request_and_handler() {
    init_tracing();
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");

    let updated = invoke(&billing).await;
    let changes = updated.changes_since(&billing.solution);

    assert_eq!(
        placements(&changes.added),
        [
            (DOMAIN.to_string(), strings(&["Commands"]), "CreateInvoiceCommand.cs".to_string()),
            (
                APPLICATION.to_string(),
                strings(&["Commands"]),
                "CreateInvoiceCommandHandler.cs".to_string()
            ),
        ]
    );

    let request = declared_type(&changes.added[0]);
    assert_eq!(request.name_text().as_deref(), Some("CreateInvoiceCommand"));
    assert_eq!(base_types(&request), ["ICommand"]);
    assert_eq!(
        request.containing_namespace().as_deref(),
        Some("Aurora.Billing.Domain.Commands")
    );

    let handler = declared_type(&changes.added[1]);
    assert_eq!(base_types(&handler), ["CommandHandler<CreateInvoiceCommand>"]);
    assert_eq!(
        handler.containing_namespace().as_deref(),
        Some("Aurora.Billing.ApplicationService.Commands")
    );
    let handler_text = changes.added[1].document.text();
    assert!(handler_text.starts_with("using Aurora.Billing.Domain.Commands;\nusing Travel2Pay.Cqrs.Commands;\n\n"));
    assert!(handler_text.contains(
        "protected override async Task HandleAsync(CreateInvoiceCommand command, CancellationToken token = default)"
    ));
}

#[tokio::test]
async fn test_query_with_dto_adds_three_documents() {
    let billing =
        Billing::at("var invoice = await bus.SendQuery<GetInvoiceQuery, Invoice$0Dto>(query);");

    let updated = invoke(&billing).await;
    let changes = updated.changes_since(&billing.solution);

    assert_eq!(
        placements(&changes.added),
        [
            (DOMAIN.to_string(), strings(&["Queries"]), "GetInvoiceQuery.cs".to_string()),
            (DOMAIN.to_string(), strings(&["Dtos"]), "InvoiceDto.cs".to_string()),
            (
                APPLICATION.to_string(),
                strings(&["Queries"]),
                "GetInvoiceQueryHandler.cs".to_string()
            ),
        ]
    );
    let dto = declared_type(&changes.added[1]);
    assert!(base_types(&dto).is_empty());
    assert_eq!(dto.members().count(), 0);

    let handler = declared_type(&changes.added[2]);
    assert_eq!(base_types(&handler), ["QueryHandler<GetInvoiceQuery,InvoiceDto>"]);
    assert!(
        changes.added[2]
            .document
            .text()
            .contains("Task<InvoiceDto> HandleAsync(GetInvoiceQuery query")
    );
}

#[tokio::test]
async fn test_partial_existence_adds_only_missing_artifacts() {
    let billing = Billing::at("await bus.SendCommand<CreateInvoiceCommand, Invoice$0Dto>(command);");
    let domain = billing.domain;
    let billing = billing.with_source(
        domain,
        "Commands",
        "CreateInvoiceCommand.cs",
        "namespace Aurora.Billing.Domain.Commands { public class CreateInvoiceCommand : ICommand { } }",
    );

    let updated = invoke(&billing).await;
    let changes = updated.changes_since(&billing.solution);

    let files: Vec<_> = changes.added.iter().map(|a| a.document.name().to_string()).collect();
    assert_eq!(files, ["InvoiceDto.cs", "CreateInvoiceCommandHandler.cs"]);
    assert_eq!(
        base_types(&declared_type(&changes.added[1])),
        ["CommandHandler<CreateInvoiceCommand,InvoiceDto>"]
    );
}

#[tokio::test]
async fn test_missing_target_project_is_skipped() {
    let (text, span) = caret(&controller("var command = new CreateInv$0oiceCommand();"));
    let token = devassist::project::AffinityToken::assume_affinity();
    let (solution, _) = Solution::new().with_project(DOMAIN, None);
    let (solution, api) = solution.with_project(API, None);
    let (solution, document) = solution
        .with_document(api, "InvoiceController.cs", Vec::new(), text, &token)
        .unwrap();
    drop(token);
    let billing = Billing {
        solution,
        domain: api,
        application: api,
        document,
        span,
    };

    let updated = invoke(&billing).await;
    let changes = updated.changes_since(&billing.solution);

    assert_eq!(changes.added.len(), 1);
    assert_eq!(changes.added[0].project_name, DOMAIN);
}

// =============================================================================
// DETERMINISM AND IDEMPOTENCE
// =============================================================================

#[tokio::test]
async fn test_generated_text_round_trips_through_parser() {
    let billing =
        Billing::at("var invoice = await bus.SendQuery<GetInvoiceQuery, Invoice$0Dto>(query);");

    let updated = invoke(&billing).await;

    for added in updated.changes_since(&billing.solution).added {
        let parse = added.document.parse();
        assert!(parse.errors.is_empty(), "{}: {:?}", added.document.name(), parse.errors);
        assert_eq!(parse.syntax().to_string(), added.document.text());
        assert!(added.document.text().ends_with("}\n"));
    }
}

#[tokio::test]
async fn test_generation_is_deterministic() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");

    let first = invoke(&billing).await;
    let second = invoke(&billing).await;

    let texts = |solution: &Solution| -> Vec<String> {
        solution
            .changes_since(&billing.solution)
            .added
            .iter()
            .map(|a| a.document.text().to_string())
            .collect()
    };
    assert_eq!(texts(&first), texts(&second));
}

#[tokio::test]
async fn test_invoking_twice_adds_nothing_the_second_time() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let action = single_action(&billing, Arc::new(SerialAffinity::new())).await;
    let cancel = CancellationToken::new();

    let first = action.invoke(&cancel).await.unwrap();
    let second = action.invoke_on(&first, &cancel).await.unwrap();

    assert_eq!(first.changes_since(&billing.solution).added.len(), 2);
    assert!(second.changes_since(&first).is_empty());
}

#[tokio::test]
async fn test_no_action_after_generation() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let updated = invoke(&billing).await;

    let after = Billing {
        solution: updated,
        ..billing
    };
    let actions = RequestRefactoringProvider::new(Arc::new(SerialAffinity::new()))
        .compute_refactorings(&after.context())
        .await
        .unwrap();
    assert!(actions.is_empty());
}

// =============================================================================
// AFFINITY AND CANCELLATION
// =============================================================================

#[tokio::test]
async fn test_every_generated_document_switches_affinity() {
    let billing =
        Billing::at("var invoice = await bus.SendQuery<GetInvoiceQuery, Invoice$0Dto>(query);");
    let affinity = Arc::new(RecordingAffinity::new());
    let action = single_action(&billing, affinity.clone()).await;

    action.invoke(&CancellationToken::new()).await.unwrap();

    assert_eq!(affinity.switches(), 3);
}

#[tokio::test]
async fn test_cancelled_before_invocation_adds_nothing() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let action = single_action(&billing, Arc::new(SerialAffinity::new())).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = action.invoke(&cancel).await.unwrap_err();

    assert!(err.applied.is_empty());
    assert!(err.partial.changes_since(&billing.solution).is_empty());
}

#[tokio::test]
async fn test_cancellation_between_steps_keeps_earlier_documents() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let cancel = CancellationToken::new();
    let affinity = Arc::new(RecordingAffinity::cancelling(2, cancel.clone()));
    let action = single_action(&billing, affinity.clone()).await;

    let err = action.invoke(&cancel).await.unwrap_err();

    assert_eq!(err.applied.len(), 1);
    let changes = err.partial.changes_since(&billing.solution);
    assert_eq!(changes.added[0].document.name(), "CreateInvoiceCommand.cs");
    assert_eq!(affinity.switches(), 2);
}

// =============================================================================
// WORKSPACE
// =============================================================================

#[tokio::test]
async fn test_workspace_accepts_descendant_and_rejects_stale_snapshot() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let workspace = Workspace::new(billing.solution.clone());
    let action = single_action(&billing, Arc::new(SerialAffinity::new())).await;
    let cancel = CancellationToken::new();

    let updated = action.invoke(&cancel).await.unwrap();
    let applied = workspace.try_apply_changes(updated.clone()).unwrap();
    assert_eq!(applied.added.len(), 2);
    assert_eq!(workspace.current_solution().version(), updated.version());

    let stale = action.invoke(&cancel).await.unwrap();
    assert!(matches!(
        workspace.try_apply_changes(stale),
        Err(WorkspaceError::StaleSolution { .. })
    ));
}
