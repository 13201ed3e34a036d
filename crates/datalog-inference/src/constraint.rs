use datalog_ast::{ArgId, Symbol};
use datalog_types::{
    greatest_common_subtypes_pairwise, is_record_type, least_common_supertypes, Type,
    TypeEnvironment, TypeId, TypeSet,
};
use std::collections::HashMap;

/// A constraint variable of the type lattice.
///
/// All occurrences of one named variable within a clause share a variable;
/// every other argument occurrence stands alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeVar {
    Named(Symbol),
    Occurrence(ArgId),
}

impl TypeVar {
    pub fn render(&self) -> String {
        match self {
            TypeVar::Named(name) => name.to_string(),
            TypeVar::Occurrence(id) => format!("#{}", id.0),
        }
    }
}

/// The assignment `TypeVar -> TypeSet` being solved. Unconstrained
/// variables sit at the bottom of the inference ordering: all types.
#[derive(Debug, Clone, Default)]
pub struct Assignment {
    map: HashMap<TypeVar, TypeSet>,
}

impl Assignment {
    pub fn new() -> Self {
        Assignment::default()
    }

    pub fn get(&self, var: TypeVar) -> TypeSet {
        self.map.get(&var).cloned().unwrap_or(TypeSet::All)
    }

    pub fn set(&mut self, var: TypeVar, types: TypeSet) {
        self.map.insert(var, types);
    }
}

/// The constraint forms generated from a clause. Each application tightens
/// its target variables; supertype constraints fire only once to keep the
/// otherwise-monotone iteration from oscillating.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// all types of `a` are subtypes of some type of `b`
    SubtypeOfVar { a: TypeVar, b: TypeVar },
    /// all types of `var` are subtypes of `ty`
    SubtypeOfType { var: TypeVar, ty: TypeId },
    /// all types of `var` are supertypes of `ty`
    SupertypeOfType {
        var: TypeVar,
        ty: TypeId,
        applied: bool,
    },
    /// `element` is a subtype of field `index` of the record types of
    /// `record`, which in turn is narrowed to records wide enough
    RecordComponent {
        element: TypeVar,
        record: TypeVar,
        index: usize,
    },
}

impl Constraint {
    pub fn subtype(a: TypeVar, b: TypeVar) -> Self {
        Constraint::SubtypeOfVar { a, b }
    }

    pub fn subtype_of(var: TypeVar, ty: TypeId) -> Self {
        Constraint::SubtypeOfType { var, ty }
    }

    pub fn supertype_of(var: TypeVar, ty: TypeId) -> Self {
        Constraint::SupertypeOfType {
            var,
            ty,
            applied: false,
        }
    }

    pub fn record_component(element: TypeVar, record: TypeVar, index: usize) -> Self {
        Constraint::RecordComponent {
            element,
            record,
            index,
        }
    }

    /// Apply the constraint; returns whether the assignment changed.
    pub fn update(&mut self, env: &TypeEnvironment, assignment: &mut Assignment) -> bool {
        match self {
            Constraint::SubtypeOfVar { a, b } => {
                let current = assignment.get(*a);
                let bound = assignment.get(*b);
                let result = greatest_common_subtypes_pairwise(env, &current, &bound);
                if result == current {
                    return false;
                }
                assignment.set(*a, result);
                true
            }
            Constraint::SubtypeOfType { var, ty } => {
                let current = assignment.get(*var);
                if current.is_all() {
                    assignment.set(*var, TypeSet::singleton(*ty));
                    return true;
                }
                let result =
                    greatest_common_subtypes_pairwise(env, &current, &TypeSet::singleton(*ty));
                if result == current {
                    return false;
                }
                assignment.set(*var, result);
                true
            }
            Constraint::SupertypeOfType { var, ty, applied } => {
                // super-type constraints are not monotone in this lattice;
                // they fire once and stay quiet
                if *applied {
                    return false;
                }
                *applied = true;

                let current = assignment.get(*var);
                if current.is_all() {
                    assignment.set(*var, TypeSet::singleton(*ty));
                    return true;
                }
                let mut result = TypeSet::new();
                for t in current.iter() {
                    result.insert_set(&least_common_supertypes(env, t, *ty));
                }
                if result == current {
                    return false;
                }
                assignment.set(*var, result);
                true
            }
            Constraint::RecordComponent {
                element,
                record,
                index,
            } => {
                let records = assignment.get(*record);

                // nothing known about the record yet
                if records.is_all() {
                    return false;
                }

                let mut record_types = TypeSet::new();
                let mut element_types = TypeSet::new();
                for ty in records.iter() {
                    if !is_record_type(env, ty) {
                        continue;
                    }
                    if let Type::Record { fields } = env.ty(ty) {
                        if fields.len() <= *index {
                            continue;
                        }
                        record_types.insert(ty);
                        element_types.insert(fields[*index].ty);
                    }
                }

                let current_element = assignment.get(*element);
                let element_types =
                    greatest_common_subtypes_pairwise(env, &current_element, &element_types);

                let mut changed = false;
                if records != record_types {
                    assignment.set(*record, record_types);
                    changed = true;
                }
                if current_element != element_types {
                    assignment.set(*element, element_types);
                    changed = true;
                }
                changed
            }
        }
    }

    pub fn render(&self, env: &TypeEnvironment) -> String {
        match self {
            Constraint::SubtypeOfVar { a, b } => format!("{} <: {}", a.render(), b.render()),
            Constraint::SubtypeOfType { var, ty } => {
                format!("{} <: {}", var.render(), env.name(*ty))
            }
            Constraint::SupertypeOfType { var, ty, .. } => {
                format!("{} >: {}", var.render(), env.name(*ty))
            }
            Constraint::RecordComponent {
                element,
                record,
                index,
            } => format!("{} <: {}::{}", element.render(), record.render(), index),
        }
    }
}

/// Sweep every constraint until a full sweep reports no change.
/// Convergence does not depend on constraint order.
pub fn solve(constraints: &mut [Constraint], env: &TypeEnvironment, assignment: &mut Assignment) {
    loop {
        let mut changed = false;
        for constraint in constraints.iter_mut() {
            changed |= constraint.update(env, assignment);
        }
        if !changed {
            break;
        }
    }
}
