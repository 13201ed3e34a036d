use crate::{TypeEnvironment, TypeId};
use std::collections::BTreeSet;

/// A set of types, or the distinguished set of *all* types.
///
/// The universal set is the bottom of the inference ordering (the most
/// permissive assignment) and cannot be enumerated; every operation that
/// iterates asserts non-universality first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSet {
    All,
    Set(BTreeSet<TypeId>),
}

impl TypeSet {
    pub fn new() -> Self {
        TypeSet::Set(BTreeSet::new())
    }

    pub fn all() -> Self {
        TypeSet::All
    }

    pub fn singleton(id: TypeId) -> Self {
        let mut types = BTreeSet::new();
        types.insert(id);
        TypeSet::Set(types)
    }

    pub fn is_all(&self) -> bool {
        matches!(self, TypeSet::All)
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TypeSet::All => false,
            TypeSet::Set(types) => types.is_empty(),
        }
    }

    /// Size of the set; the universal set has no size.
    pub fn len(&self) -> usize {
        match self {
            TypeSet::All => panic!("unable to give size of universe"),
            TypeSet::Set(types) => types.len(),
        }
    }

    pub fn contains(&self, id: TypeId) -> bool {
        match self {
            TypeSet::All => true,
            TypeSet::Set(types) => types.contains(&id),
        }
    }

    pub fn insert(&mut self, id: TypeId) {
        if let TypeSet::Set(types) = self {
            types.insert(id);
        }
    }

    /// Insert all types of `other` into this set; absorbing the universal
    /// set makes this set universal.
    pub fn insert_set(&mut self, other: &TypeSet) {
        match self {
            TypeSet::All => {}
            TypeSet::Set(types) => match other {
                TypeSet::All => *self = TypeSet::All,
                TypeSet::Set(other) => types.extend(other.iter().copied()),
            },
        }
    }

    pub fn intersection(left: &TypeSet, right: &TypeSet) -> TypeSet {
        match (left, right) {
            (TypeSet::All, _) => right.clone(),
            (_, TypeSet::All) => left.clone(),
            (TypeSet::Set(a), TypeSet::Set(b)) => {
                TypeSet::Set(a.intersection(b).copied().collect())
            }
        }
    }

    pub fn is_subset_of(&self, other: &TypeSet) -> bool {
        match (self, other) {
            (TypeSet::All, _) => other.is_all(),
            (TypeSet::Set(a), TypeSet::Set(b)) => a.is_subset(b),
            (TypeSet::Set(_), TypeSet::All) => true,
        }
    }

    /// Iterate the contained types. Panics on the universal set.
    pub fn iter(&self) -> impl Iterator<Item = TypeId> + '_ {
        match self {
            TypeSet::All => panic!("unable to enumerate universe"),
            TypeSet::Set(types) => types.iter().copied(),
        }
    }

    /// The only member of a singleton set, if it is one.
    pub fn single(&self) -> Option<TypeId> {
        match self {
            TypeSet::Set(types) if types.len() == 1 => types.iter().next().copied(),
            _ => None,
        }
    }

    /// Render against an environment, sorted by type name for stability.
    pub fn render(&self, env: &TypeEnvironment) -> String {
        match self {
            TypeSet::All => "{ - all types - }".to_string(),
            TypeSet::Set(types) => {
                let mut names: Vec<String> =
                    types.iter().map(|id| env.name(*id).to_string()).collect();
                names.sort();
                format!("{{{}}}", names.join(","))
            }
        }
    }
}

impl Default for TypeSet {
    fn default() -> Self {
        TypeSet::new()
    }
}

impl FromIterator<TypeId> for TypeSet {
    fn from_iter<I: IntoIterator<Item = TypeId>>(iter: I) -> Self {
        TypeSet::Set(iter.into_iter().collect())
    }
}
