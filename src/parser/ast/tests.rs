use super::*;
use crate::parser::parse;

const HANDLER: &str = r#"
using System.Threading;
using Travel2Pay.Cqrs.Commands;

namespace Aurora.Billing.ApplicationService.Commands
{
    public class CreateInvoiceCommandHandler : CommandHandler<CreateInvoiceCommand, InvoiceDto>
    {
        private readonly IInvoiceRepository _repository;

        public string Name { get; set; } = "x";

        protected override async Task<InvoiceDto> HandleAsync(CreateInvoiceCommand command, CancellationToken token = default)
        {
            throw new NotImplementedException();
        }
    }
}
"#;

#[test]
fn test_ast_compilation_unit() {
    let parsed = parse(HANDLER);
    assert!(parsed.ok(), "errors: {:?}", parsed.errors);
    let root = parsed.tree();

    let usings: Vec<_> = root.usings().filter_map(|u| u.target_text()).collect();
    assert_eq!(usings, vec!["System.Threading", "Travel2Pay.Cqrs.Commands"]);

    let ns = root.namespaces().next().unwrap();
    assert!(!ns.is_file_scoped());
    assert_eq!(
        ns.full_name().as_deref(),
        Some("Aurora.Billing.ApplicationService.Commands")
    );
}

#[test]
fn test_ast_type_declaration() {
    let parsed = parse(HANDLER);
    let ty = parsed.tree().all_types().next().unwrap();

    assert_eq!(ty.kind(), TypeDeclKind::Class);
    assert_eq!(ty.name_text().as_deref(), Some("CreateInvoiceCommandHandler"));
    assert_eq!(ty.modifiers(), vec![SyntaxKind::PUBLIC_KW]);

    let bases = ty.base_types();
    assert_eq!(bases.len(), 1);
    assert_eq!(bases[0].simple_name().as_deref(), Some("CommandHandler"));
    let args: Vec<_> = bases[0]
        .type_arguments()
        .iter()
        .filter_map(|t| t.simple_name())
        .collect();
    assert_eq!(args, vec!["CreateInvoiceCommand", "InvoiceDto"]);
}

#[test]
fn test_ast_members() {
    let parsed = parse(HANDLER);
    let ty = parsed.tree().all_types().next().unwrap();
    let members: Vec<_> = ty.members().collect();
    assert_eq!(members.len(), 3);

    let Member::Field(field) = &members[0] else {
        panic!("expected field, got {:?}", members[0]);
    };
    let decl = field.declaration().unwrap();
    assert_eq!(decl.ty().unwrap().simple_name().as_deref(), Some("IInvoiceRepository"));
    let names: Vec<_> = decl.declarators().filter_map(|d| d.name_text()).collect();
    assert_eq!(names, vec!["_repository"]);

    let Member::Property(prop) = &members[1] else {
        panic!("expected property");
    };
    assert!(prop.is_auto_property());
    assert!(prop.initializer().is_some());

    let Member::Method(method) = &members[2] else {
        panic!("expected method");
    };
    assert_eq!(method.name_text().as_deref(), Some("HandleAsync"));
    assert!(method.is_override());
    assert!(method.is_async());
    assert_eq!(
        method.return_type().unwrap().text_without_trivia(),
        "Task<InvoiceDto>"
    );
    let params: Vec<_> = method
        .parameter_list()
        .unwrap()
        .parameters()
        .filter_map(|p| p.name_text())
        .collect();
    assert_eq!(params, vec!["command", "token"]);
    let body = method.body().unwrap();
    assert!(matches!(body.statements().next(), Some(Stmt::Throw(_))));
}

#[test]
fn test_ast_file_scoped_namespace() {
    let parsed = parse("namespace Aurora.Billing.Domain.Commands;\n\npublic class A : ICommand { }\n");
    assert!(parsed.ok(), "errors: {:?}", parsed.errors);
    let root = parsed.tree();
    let ns = root.namespaces().next().unwrap();
    assert!(ns.is_file_scoped());
    let ty = ns.types().next().unwrap();
    assert_eq!(
        ty.containing_namespace().as_deref(),
        Some("Aurora.Billing.Domain.Commands")
    );
}

#[test]
fn test_ast_nested_namespaces_join() {
    let parsed = parse("namespace Aurora { namespace Billing { class A { } } }");
    let ty = parsed.tree().all_types().next().unwrap();
    assert_eq!(ty.containing_namespace().as_deref(), Some("Aurora.Billing"));
}

#[test]
fn test_ast_invocation_method_name() {
    let parsed = parse(
        "class A { async Task M() { var r = await _mediator.SendCommand<CreateInvoiceCommand, InvoiceDto>(cmd); } }",
    );
    assert!(parsed.ok(), "errors: {:?}", parsed.errors);
    let invocation = parsed
        .tree()
        .descendants::<InvocationExpr>()
        .next()
        .unwrap();
    let name = invocation.method_name().unwrap();
    assert_eq!(name.text().as_deref(), Some("SendCommand"));
    assert_eq!(name.type_arguments().len(), 2);
    assert_eq!(invocation.arguments().len(), 1);
}

#[test]
fn test_ast_object_creation_type() {
    let parsed = parse("class A { void M() { Send(new CreateInvoiceCommand { Total = 1 }); } }");
    assert!(parsed.ok(), "errors: {:?}", parsed.errors);
    let creation = parsed
        .tree()
        .descendants::<ObjectCreationExpr>()
        .next()
        .unwrap();
    assert_eq!(
        creation.ty().unwrap().simple_name().as_deref(),
        Some("CreateInvoiceCommand")
    );
    assert!(creation.initializer().is_some());
    assert!(creation.argument_list().is_none());
}

#[test]
fn test_ast_var_declaration_is_implicit() {
    let parsed = parse("class A { void M() { var x = 1; int y = 2; } }");
    let decls: Vec<_> = parsed
        .tree()
        .descendants::<VariableDeclaration>()
        .map(|d| d.is_implicitly_typed())
        .collect();
    assert_eq!(decls, vec![true, false]);
}
