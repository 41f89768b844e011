//! Tests for the C# whitespace normalizer

use super::super::{FormatOptions, normalize_whitespace};
use crate::parser::parse;

/// Parse `source` and normalize the whole tree
fn format(source: &str, options: &FormatOptions) -> String {
    normalize_whitespace(&parse(source).syntax(), options)
}

/// Assert that formatting produces the expected output (single line)
fn assert_format(input: &str, expected: &str) {
    let result = format(input, &FormatOptions::default());
    assert_eq!(
        result.trim(),
        expected,
        "\nInput:    |{}|\nExpected: |{}|\nGot:      |{}|",
        input,
        expected,
        result.trim()
    );
}

/// Assert multiline formatting produces expected output
fn assert_format_multiline(input: &str, expected: &str) {
    let result = format(input, &FormatOptions::default());
    assert_eq!(
        result.trim(),
        expected.trim(),
        "\n=== Input ===\n{}\n=== Expected ===\n{}\n=== Got ===\n{}",
        input,
        expected.trim(),
        result.trim()
    );
}

// ============================================================================
// Token spacing
// ============================================================================

#[test]
fn test_format_using_directive() {
    assert_format("using   System . Threading ;", "using System.Threading;");
}

#[test]
fn test_format_generic_invocation_is_tight() {
    assert_format_multiline(
        "class A{void M(){var r=await bus . SendCommand < A , B > ( cmd ) ;}}",
        r#"
class A
{
    void M()
    {
        var r = await bus.SendCommand<A, B>(cmd);
    }
}
"#,
    );
}

#[test]
fn test_format_auto_property_stays_inline() {
    assert_format_multiline(
        "class A { public string Name {get;set;} public int Total { get ; } = 1 ; }",
        r#"
class A
{
    public string Name { get; set; }
    public int Total { get; } = 1;
}
"#,
    );
}

#[test]
fn test_format_prefix_and_cast() {
    assert_format_multiline(
        "class A { void M() { var x = ( int ) y; var z = ! x; } }",
        r#"
class A
{
    void M()
    {
        var x = (int)y;
        var z = !x;
    }
}
"#,
    );
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_format_handler_layout() {
    assert_format_multiline(
        "using Travel2Pay.Cqrs.Commands; namespace Aurora.Billing.ApplicationService.Commands { public class CreateInvoiceCommandHandler : CommandHandler<CreateInvoiceCommand> { protected override async Task HandleAsync(CreateInvoiceCommand command, CancellationToken token = default) { throw new NotImplementedException(); } } }",
        r#"
using Travel2Pay.Cqrs.Commands;

namespace Aurora.Billing.ApplicationService.Commands
{
    public class CreateInvoiceCommandHandler : CommandHandler<CreateInvoiceCommand>
    {
        protected override async Task HandleAsync(CreateInvoiceCommand command, CancellationToken token = default)
        {
            throw new NotImplementedException();
        }
    }
}
"#,
    );
}

#[test]
fn test_format_empty_class_braces_on_own_lines() {
    assert_format_multiline(
        "namespace Aurora.Billing.Domain.Dtos{public class InvoiceDto{}}",
        r#"
namespace Aurora.Billing.Domain.Dtos
{
    public class InvoiceDto
    {
    }
}
"#,
    );
}

#[test]
fn test_format_file_scoped_namespace() {
    assert_format_multiline(
        "namespace Aurora.Billing;   public class A : ICommand { }",
        r#"
namespace Aurora.Billing;

public class A : ICommand
{
}
"#,
    );
}

#[test]
fn test_format_keeps_comments() {
    assert_format_multiline(
        "class A {\n    // total\n    int x; /* trailing */\n}",
        r#"
class A
{
    // total
    int x; /* trailing */
}
"#,
    );
}

#[test]
fn test_format_member_attributes_on_own_line() {
    assert_format_multiline(
        "class A { [Required] public string Name { get; set; } void M([FromBody] int x) { } }",
        r#"
class A
{
    [Required]
    public string Name { get; set; }
    void M([FromBody] int x)
    {
    }
}
"#,
    );
}

// ============================================================================
// Options and determinism
// ============================================================================

#[test]
fn test_format_with_tabs_and_crlf() {
    let options = FormatOptions {
        tab_size: 4,
        insert_spaces: false,
        end_of_line: "\r\n".to_string(),
    };
    let result = format("class A { int x; }", &options);
    assert_eq!(result, "class A\r\n{\r\n\tint x;\r\n}\r\n");
}

#[test]
fn test_normalize_whitespace_is_deterministic() {
    let a = parse("class  A :  B {int x ;}");
    let b = parse("class A:B\n{\n\n   int   x;\n}");
    let options = FormatOptions::default();
    assert_eq!(
        normalize_whitespace(&a.syntax(), &options),
        normalize_whitespace(&b.syntax(), &options)
    );
}

#[test]
fn test_normalized_output_reparses_cleanly() {
    let source = "namespace N { public class A : ICommand { } }";
    let formatted = format(source, &FormatOptions::default());
    assert!(parse(&formatted).ok());
}
