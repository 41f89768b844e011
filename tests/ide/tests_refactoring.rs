//! Which actions are offered where.

use std::sync::Arc;

use devassist::Cancelled;
use devassist::ide::{
    ArtifactKind, CodeAction, EQUIVALENCE_KEY, RequestKind, RequestRefactoringProvider,
};
use devassist::project::SerialAffinity;
use rstest::rstest;
use tokio_util::sync::CancellationToken;

use crate::helpers::fixtures::*;
use crate::helpers::init_tracing;

fn provider() -> RequestRefactoringProvider {
    RequestRefactoringProvider::new(Arc::new(SerialAffinity::new()))
}

async fn actions(billing: &Billing) -> Vec<CodeAction> {
    provider()
        .compute_refactorings(&billing.context())
        .await
        .unwrap()
}

fn artifact_summary(action: &CodeAction) -> Vec<(ArtifactKind, String, bool)> {
    action
        .artifacts()
        .map(|a| (a.kind, a.name.to_string(), a.exists))
        .collect()
}

// =============================================================================
// OFFERED ACTIONS
// =============================================================================

#[tokio::test]
async fn test_object_creation_offers_command_action() {
    init_tracing();
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");

    let actions = actions(&billing).await;

    assert_eq!(actions.len(), 1);
    let action = &actions[0];
    assert_eq!(action.title(), "Aurora: Create Command and Handler");
    assert_eq!(action.equivalence_key(), EQUIVALENCE_KEY);
    assert_eq!(
        artifact_summary(action),
        [
            (
                ArtifactKind::Request(RequestKind::Command),
                "CreateInvoiceCommand".to_string(),
                false
            ),
            (
                ArtifactKind::Handler(RequestKind::Command),
                "CreateInvoiceCommandHandler".to_string(),
                false
            ),
        ]
    );
    assert!(action.artifacts().all(|a| a.service == "Billing"));
}

#[tokio::test]
async fn test_query_dispatch_offers_query_action_with_dto() {
    let billing =
        Billing::at("var invoice = await bus.SendQuery<GetInvoice$0Query, InvoiceDto>(query);");

    let actions = actions(&billing).await;

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].title(), "Aurora: Create Query and Handler");
    let kinds: Vec<_> = actions[0].artifacts().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        [
            ArtifactKind::Request(RequestKind::Query),
            ArtifactKind::Dto,
            ArtifactKind::HandlerWithResult(RequestKind::Query),
        ]
    );
}

#[tokio::test]
async fn test_inferred_dispatch_offers_action_for_argument_type() {
    let billing =
        Billing::at("var command = new PayInvoiceCommand(); await bus.SendCom$0mand(command);");

    let actions = actions(&billing).await;

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].plan().request.name, "PayInvoiceCommand");
    assert!(actions[0].plan().dto.is_none());
}

#[rstest]
#[case::no_request_suffix("var invoice = new Invo$0ice();")]
#[case::dto_creation("var dto = new Invoice$0Dto();")]
#[case::bad_first_type_argument("await bus.SendCommand<CreateInvoice, Invoice$0Dto>(command);")]
#[case::single_query_argument("await bus.SendQuery<GetInvoice$0Query>(query);")]
#[case::plain_statement("Sa$0ve();")]
#[tokio::test]
async fn test_no_action_outside_request_context(#[case] body: &str) {
    let billing = Billing::at(body);
    assert!(actions(&billing).await.is_empty());
}

#[tokio::test]
async fn test_no_action_outside_aurora_namespace() {
    let billing = Billing::new(&controller_in(
        "Contoso.Billing.Api",
        "var command = new CreateInv$0oiceCommand();",
    ));
    assert!(actions(&billing).await.is_empty());
}

#[tokio::test]
async fn test_service_match_ignores_case() {
    let billing = Billing::new(&controller_in(
        "aurora.Billing.Api",
        "var command = new CreateInv$0oiceCommand();",
    ));
    let actions = actions(&billing).await;
    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].plan().request.template.project, DOMAIN);
}

// =============================================================================
// EXISTING ARTIFACTS
// =============================================================================

#[tokio::test]
async fn test_existing_request_is_marked_and_not_regenerated() {
    let billing = Billing::at(
        "await bus.SendCommand<CreateInvoiceCommand, Invoice$0Dto>(command);",
    );
    let billing = {
        let domain = billing.domain;
        billing.with_source(
            domain,
            "Commands",
            "CreateInvoiceCommand.cs",
            "namespace Aurora.Billing.Domain.Commands { public class CreateInvoiceCommand : ICommand { } }",
        )
    };

    let actions = actions(&billing).await;

    assert_eq!(actions.len(), 1);
    let exists: Vec<_> = actions[0].artifacts().map(|a| (a.name.to_string(), a.exists)).collect();
    assert_eq!(
        exists,
        [
            ("CreateInvoiceCommand".to_string(), true),
            ("InvoiceDto".to_string(), false),
            ("CreateInvoiceCommandHandler".to_string(), false),
        ]
    );
}

#[tokio::test]
async fn test_no_action_when_every_artifact_exists() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let (domain, application) = (billing.domain, billing.application);
    let billing = billing
        .with_source(
            domain,
            "Commands",
            "CreateInvoiceCommand.cs",
            "namespace Aurora.Billing.Domain.Commands { public class CreateInvoiceCommand { } }",
        )
        .with_source(
            application,
            "Legacy",
            "Handlers.cs",
            "namespace Aurora.Billing.ApplicationService { public class CreateInvoiceCommandHandler { } }",
        );

    assert!(actions(&billing).await.is_empty());
}

// =============================================================================
// CANCELLATION
// =============================================================================

#[tokio::test]
async fn test_cancelled_computation_surfaces_cancelled() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = provider()
        .compute_refactorings(&billing.context_with(cancel))
        .await;

    assert_eq!(result.unwrap_err(), Cancelled);
    assert_eq!(billing.solution.documents().count(), 1);
}

#[tokio::test]
async fn test_cancellation_between_documents_stops_the_existence_check() {
    let billing = Billing::at("var command = new CreateInv$0oiceCommand();");
    let domain = billing.domain;
    let billing = billing
        .with_source(
            domain,
            "Entities",
            "Invoice.cs",
            "namespace Aurora.Billing.Domain.Entities { public class Invoice { } }",
        )
        .with_source(
            domain,
            "Entities",
            "Customer.cs",
            "namespace Aurora.Billing.Domain.Entities { public class Customer { } }",
        );
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    // Runs once the scan yields after its first document.
    let task = tokio::spawn(async move { canceller.cancel() });

    let result = provider()
        .compute_refactorings(&billing.context_with(cancel))
        .await;

    assert_eq!(result.unwrap_err(), Cancelled);
    assert_eq!(billing.solution.documents().count(), 3);
    task.await.unwrap();
}
