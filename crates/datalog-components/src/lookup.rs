use crate::TypeBinding;
use datalog_ast::{Component, QualifiedName, Symbol};
use std::collections::HashMap;

/// Identifies a component in a [`ComponentLookup`].
pub type CompId = usize;

/// Lexically scoped lookup over the component tree of a program.
///
/// Nested components shadow outer ones; a reference is searched in the
/// referencing component's scope, then each enclosing scope, then the
/// global scope. Names are resolved through the active [`TypeBinding`]
/// first, since a type parameter may be bound to a component.
pub struct ComponentLookup<'a> {
    components: Vec<&'a Component>,
    parents: Vec<Option<CompId>>,
    scopes: HashMap<(Option<CompId>, Symbol), CompId>,
}

impl<'a> ComponentLookup<'a> {
    pub fn new(globals: &'a [Component]) -> Self {
        let mut lookup = ComponentLookup {
            components: Vec::new(),
            parents: Vec::new(),
            scopes: HashMap::new(),
        };
        for component in globals {
            lookup.index(component, None);
        }
        lookup
    }

    fn index(&mut self, component: &'a Component, parent: Option<CompId>) {
        let id = self.components.len();
        self.components.push(component);
        self.parents.push(parent);
        self.scopes.insert((parent, component.ty.name), id);
        for nested in &component.components {
            self.index(nested, Some(id));
        }
    }

    pub fn component(&self, id: CompId) -> &'a Component {
        self.components[id]
    }

    /// Find the component `name` refers to from within `scope`.
    pub fn get(
        &self,
        scope: Option<CompId>,
        name: Symbol,
        binding: &TypeBinding,
    ) -> Option<CompId> {
        // a type parameter bound to a component name forwards the search
        let bound = binding.resolve(&QualifiedName::from(name));
        let name = if bound.segments().len() == 1 {
            bound.first()
        } else {
            return None;
        };

        let mut current = scope;
        loop {
            if let Some(&id) = self.scopes.get(&(current, name)) {
                return Some(id);
            }
            match current {
                Some(id) => current = self.parents[id],
                None => return None,
            }
        }
    }
}
