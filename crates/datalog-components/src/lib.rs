//! Component instantiation for the Datalog front end
//!
//! Expands every top-level `.init` into flat types, relations, clauses and
//! I/O directives, renamed into the instance's scope, and leaves the
//! program component-free. Clauses whose head relation is declared in an
//! enclosing instantiation travel as *orphans* until a matching relation
//! appears.

mod binding;
mod instantiate;
mod lookup;

pub use binding::TypeBinding;
pub use instantiate::{instantiate_components, MAX_INSTANTIATION_DEPTH};
pub use lookup::ComponentLookup;
