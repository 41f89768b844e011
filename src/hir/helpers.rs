//! Symbol resolution helpers used by property-oriented refactorings.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smol_str::SmolStr;

use crate::base::TextSize;
use crate::base::naming::has_prefix;

use super::compilation::TypeLookup;
use super::symbols::{COMPILER_GENERATED, MemberKind, Symbol, TypeKind, TypeSymbol};

/// Fallback when no notifier is found in the hierarchy.
pub const DEFAULT_NOTIFY_METHOD: &str = "OnPropertyChanged";

/// Name of the method a type uses to raise `PropertyChanged`.
///
/// Walks `ty` and its base classes, stopping at the first base that cannot be
/// resolved or lives in a `System` namespace. In each type, the first
/// explicitly declared method whose body calls `PropertyChanged(...)` wins.
pub fn notify_property_changed_method(ty: &Arc<TypeSymbol>, types: &dyn TypeLookup) -> SmolStr {
    let mut visited = FxHashSet::default();
    let mut current = Some(Arc::clone(ty));

    while let Some(ty) = current.take() {
        if ty.is_platform_type() || !visited.insert(ty.qualified_name()) {
            break;
        }

        let notifier = ty.members.iter().find(|m| {
            m.kind == MemberKind::Method
                && !m.is_implicitly_declared
                && m.invoked_identifiers.iter().any(|n| n == "PropertyChanged")
        });
        if let Some(method) = notifier {
            return method.name.clone();
        }

        current = ty
            .base_types
            .iter()
            .filter_map(|base| types.resolve_type(base))
            .find(|base| base.kind == TypeKind::Class);
    }

    SmolStr::new_static(DEFAULT_NOTIFY_METHOD)
}

/// The single-character prefix shared by every explicit field of `ty`.
///
/// `_total`/`_number` yield `Some('_')`; mixed or unprefixed naming yields
/// `None`, as does a type without explicit fields.
pub fn backing_field_prefix(ty: &TypeSymbol) -> Option<char> {
    let mut fields = ty.fields().filter(|f| !f.is_implicitly_declared);
    let first = fields.next()?;
    if !has_prefix(&first.name) {
        return None;
    }
    let candidate = first.name.chars().next()?;
    fields
        .all(|f| f.name.starts_with(candidate))
        .then_some(candidate)
}

/// Synthesized by the compiler, either implicitly or via `[CompilerGenerated]`.
pub fn is_compiler_generated(symbol: &Symbol) -> bool {
    symbol.attributes().iter().any(|a| {
        let name = a.rsplit('.').next().unwrap_or(a);
        name == COMPILER_GENERATED || name == "CompilerGeneratedAttribute"
    }) || symbol.is_implicitly_declared()
}

/// A local that is in scope at `position` but declared after it.
pub fn is_inaccessible_local(symbol: &Symbol, position: TextSize) -> bool {
    match symbol {
        Symbol::Local(local) => !local.is_implicitly_declared && position < local.declaration_start,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{DocumentId, ProjectId};
    use crate::hir::{Compilation, LocalSymbol};
    use crate::parser::parse;

    fn compile(source: &str) -> Compilation {
        let document = DocumentId::new(ProjectId::new());
        let unit = parse(source).tree();
        Compilation::new("Test", [(document, &unit)])
    }

    fn type_named(compilation: &Compilation, name: &str) -> Arc<TypeSymbol> {
        compilation.symbols_with_name(name).next().cloned().unwrap()
    }

    #[test]
    fn test_notifier_found_in_base_class() {
        let compilation = compile(
            r#"namespace App {
                class ViewModelBase {
                    protected void Helper() { }
                    protected void RaisePropertyChanged(string name) { PropertyChanged(this, name); }
                }
                class InvoiceViewModel : INotify, ViewModelBase { }
            }"#,
        );
        let vm = type_named(&compilation, "InvoiceViewModel");
        assert_eq!(notify_property_changed_method(&vm, &compilation), "RaisePropertyChanged");
    }

    #[test]
    fn test_notifier_defaults_when_chain_leaves_workspace() {
        let compilation = compile("class Vm : ExternalBase { void Save() { Persist(); } }");
        let vm = type_named(&compilation, "Vm");
        assert_eq!(notify_property_changed_method(&vm, &compilation), DEFAULT_NOTIFY_METHOD);
    }

    #[test]
    fn test_notifier_stops_at_system_types() {
        let compilation = compile(
            r#"namespace System.ComponentModel { class Observable { void Notify() { PropertyChanged(); } } }
               namespace App { class Vm : System.ComponentModel.Observable { } }"#,
        );
        let vm = type_named(&compilation, "Vm");
        assert_eq!(notify_property_changed_method(&vm, &compilation), DEFAULT_NOTIFY_METHOD);
    }

    #[test]
    fn test_notifier_survives_inheritance_cycle() {
        let compilation = compile("class A : B { } class B : A { }");
        let a = type_named(&compilation, "A");
        assert_eq!(notify_property_changed_method(&a, &compilation), DEFAULT_NOTIFY_METHOD);
    }

    #[test]
    fn test_backing_field_prefix() {
        let compilation = compile(
            r#"class Uniform { int _a; string _b; public int C { get; set; } }
               class Mixed { int _a; int b; }
               class Bare { int total; }
               class Empty { public int C { get; set; } }"#,
        );
        assert_eq!(backing_field_prefix(&type_named(&compilation, "Uniform")), Some('_'));
        assert_eq!(backing_field_prefix(&type_named(&compilation, "Mixed")), None);
        assert_eq!(backing_field_prefix(&type_named(&compilation, "Bare")), None);
        assert_eq!(backing_field_prefix(&type_named(&compilation, "Empty")), None);
    }

    #[test]
    fn test_is_compiler_generated() {
        let compilation = compile(
            "class C { [CompilerGenerated] int _x; int _y; public int P { get; set; } }",
        );
        let c = type_named(&compilation, "C");
        let member = |name: &str| Symbol::Member(c.members_named(name).next().cloned().unwrap());

        assert!(is_compiler_generated(&member("_x")));
        assert!(!is_compiler_generated(&member("_y")));
        assert!(is_compiler_generated(&member("<P>k__BackingField")));
        assert!(!is_compiler_generated(&member("P")));
    }

    #[test]
    fn test_is_inaccessible_local() {
        let local = Symbol::Local(LocalSymbol {
            name: "x".into(),
            ty: None,
            declaration_start: TextSize::from(10),
            is_implicitly_declared: false,
        });
        assert!(is_inaccessible_local(&local, TextSize::from(5)));
        assert!(!is_inaccessible_local(&local, TextSize::from(10)));

        let compilation = compile("class C { }");
        let ty = Symbol::Type(type_named(&compilation, "C"));
        assert!(!is_inaccessible_local(&ty, TextSize::from(0)));
    }
}
