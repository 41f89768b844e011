//! Per-project compilation: every type declared across a project's documents.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use smol_str::SmolStr;

use crate::base::DocumentId;
use crate::parser::CompilationUnit;

use super::symbols::{TypeName, TypeSymbol, extract_types};

/// Resolves type names to declared type symbols.
///
/// Implemented by a single [`Compilation`] and by whole solutions, so
/// helpers that walk inheritance chains can look across project boundaries.
pub trait TypeLookup {
    /// All declared types with the given simple name.
    fn types_named(&self, name: &str) -> Vec<Arc<TypeSymbol>>;

    /// Resolve a type reference, honouring its qualifier and arity.
    fn resolve_type(&self, ty: &TypeName) -> Option<Arc<TypeSymbol>> {
        self.types_named(&ty.name)
            .into_iter()
            .find(|candidate| matches_reference(candidate, ty))
    }
}

/// Whether `symbol` can be what `ty` refers to.
///
/// A qualifier must match the tail of the symbol's namespace or containing
/// type; generic arity must agree.
fn matches_reference(symbol: &TypeSymbol, ty: &TypeName) -> bool {
    if symbol.type_parameters.len() != ty.args.len() {
        return false;
    }
    match &ty.qualifier {
        None => true,
        Some(qualifier) => {
            let container = symbol.qualified_name();
            let container = container
                .strip_suffix(symbol.name.as_str())
                .unwrap_or(&container)
                .trim_end_matches('.');
            container == qualifier.as_str() || container.ends_with(&format!(".{qualifier}"))
        }
    }
}

/// The declared types of one project.
#[derive(Debug, Default)]
pub struct Compilation {
    assembly_name: SmolStr,
    types: Vec<Arc<TypeSymbol>>,
    by_name: FxHashMap<SmolStr, Vec<usize>>,
}

impl Compilation {
    /// Build a compilation from parsed documents.
    pub fn new<'a>(
        assembly_name: impl Into<SmolStr>,
        documents: impl IntoIterator<Item = (DocumentId, &'a CompilationUnit)>,
    ) -> Self {
        let mut compilation = Self {
            assembly_name: assembly_name.into(),
            ..Self::default()
        };
        for (document, unit) in documents {
            for ty in extract_types(document, unit) {
                compilation.add(ty);
            }
        }
        compilation
    }

    fn add(&mut self, ty: Arc<TypeSymbol>) {
        let index = self.types.len();
        self.by_name.entry(ty.name.clone()).or_default().push(index);
        self.types.push(ty);
    }

    pub fn assembly_name(&self) -> &str {
        &self.assembly_name
    }

    /// Every declared type in document order.
    pub fn types(&self) -> &[Arc<TypeSymbol>] {
        &self.types
    }

    /// Declared types named exactly `name`.
    pub fn symbols_with_name<'a>(
        &'a self,
        name: &str,
    ) -> impl Iterator<Item = &'a Arc<TypeSymbol>> + use<'a> {
        self.by_name
            .get(name)
            .into_iter()
            .flatten()
            .map(|&i| &self.types[i])
    }

    /// Declared types whose name satisfies `predicate`.
    pub fn symbols_matching<'a>(
        &'a self,
        predicate: impl Fn(&str) -> bool + 'a,
    ) -> impl Iterator<Item = &'a Arc<TypeSymbol>> {
        self.types.iter().filter(move |t| predicate(&t.name))
    }

    /// Types declared in one document.
    pub fn types_in_document(&self, document: DocumentId) -> impl Iterator<Item = &Arc<TypeSymbol>> {
        self.types.iter().filter(move |t| t.document == document)
    }

    /// Look up a type by its fully qualified name (`Aurora.Billing.Invoice`).
    pub fn type_by_qualified_name(&self, qualified: &str) -> Option<&Arc<TypeSymbol>> {
        let simple = qualified.rsplit('.').next().unwrap_or(qualified);
        self.symbols_with_name(simple)
            .find(|t| t.qualified_name() == qualified)
    }
}

impl TypeLookup for Compilation {
    fn types_named(&self, name: &str) -> Vec<Arc<TypeSymbol>> {
        self.symbols_with_name(name).cloned().collect()
    }
}

impl TypeLookup for [Arc<Compilation>] {
    fn types_named(&self, name: &str) -> Vec<Arc<TypeSymbol>> {
        self.iter()
            .flat_map(|c| c.symbols_with_name(name).cloned().collect::<Vec<_>>())
            .collect()
    }
}
