use datalog_ast::QualifiedName;
use std::collections::HashMap;

/// A partial mapping from formal type-parameter names to actual qualified
/// names. Each descent into a component extends a copy; bindings already in
/// scope are never destructively updated.
#[derive(Debug, Clone, Default)]
pub struct TypeBinding {
    map: HashMap<QualifiedName, QualifiedName>,
}

impl TypeBinding {
    pub fn new() -> Self {
        TypeBinding::default()
    }

    /// A copy of this binding with `formal -> actual` pairs added. Actuals
    /// are resolved through the current binding first, so a parameter that
    /// was itself bound by an outer instantiation forwards correctly.
    pub fn extend(&self, formals: &[QualifiedName], actuals: &[QualifiedName]) -> TypeBinding {
        let mut extended = self.clone();
        for (formal, actual) in formals.iter().zip(actuals.iter()) {
            let resolved = self.find(actual).unwrap_or_else(|| actual.clone());
            extended.map.insert(formal.clone(), resolved);
        }
        extended
    }

    pub fn find(&self, name: &QualifiedName) -> Option<QualifiedName> {
        self.map.get(name).cloned()
    }

    /// Resolve a name through the binding, keeping it unchanged when it is
    /// not a bound parameter.
    pub fn resolve(&self, name: &QualifiedName) -> QualifiedName {
        self.find(name).unwrap_or_else(|| name.clone())
    }
}
