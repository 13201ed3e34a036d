//! Lattice operations over the types of one environment: subtyping, least
//! common supertypes, greatest common subtypes, and the root predicates.
//!
//! Recursive types are legal, so every structural walk memoises visited
//! types and answers `false` on a revisit, which is the bottom that makes
//! the predicates terminate.

use crate::{Type, TypeEnvironment, TypeId, TypeSet};
use std::collections::HashMap;

/// Walk a type down to a predefined root: predefined types match only
/// themselves, primitives follow their base chain, and a non-empty union is
/// of a root iff all its elements are.
fn is_of_root_type(env: &TypeEnvironment, ty: TypeId, root: TypeId) -> bool {
    fn visit(
        env: &TypeEnvironment,
        ty: TypeId,
        root: TypeId,
        seen: &mut HashMap<TypeId, bool>,
    ) -> bool {
        if let Some(&cached) = seen.get(&ty) {
            return cached;
        }
        seen.insert(ty, false);
        let result = match env.ty(ty) {
            Type::Predefined(_) => ty == root,
            Type::Primitive { base } => {
                ty == root || *base == root || visit(env, *base, root, seen)
            }
            Type::Union { elements } => {
                !elements.is_empty()
                    && elements
                        .iter()
                        .all(|element| visit(env, *element, root, seen))
            }
            _ => false,
        };
        seen.insert(ty, result);
        result
    }
    visit(env, ty, root, &mut HashMap::new())
}

pub fn is_number_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    is_of_root_type(env, ty, env.number_type())
}

pub fn is_unsigned_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    is_of_root_type(env, ty, env.unsigned_type())
}

pub fn is_float_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    is_of_root_type(env, ty, env.float_type())
}

pub fn is_symbol_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    is_of_root_type(env, ty, env.symbol_type())
}

pub fn is_record_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    matches!(env.ty(ty), Type::Record { .. })
}

pub fn is_sum_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    matches!(env.ty(ty), Type::Sum { .. })
}

fn all_in_set(env: &TypeEnvironment, set: &TypeSet, pred: fn(&TypeEnvironment, TypeId) -> bool) -> bool {
    !set.is_empty() && !set.is_all() && set.iter().all(|ty| pred(env, ty))
}

pub fn is_number_type_set(env: &TypeEnvironment, set: &TypeSet) -> bool {
    all_in_set(env, set, is_number_type)
}

pub fn is_unsigned_type_set(env: &TypeEnvironment, set: &TypeSet) -> bool {
    all_in_set(env, set, is_unsigned_type)
}

pub fn is_float_type_set(env: &TypeEnvironment, set: &TypeSet) -> bool {
    all_in_set(env, set, is_float_type)
}

pub fn is_symbol_type_set(env: &TypeEnvironment, set: &TypeSet) -> bool {
    all_in_set(env, set, is_symbol_type)
}

pub fn is_record_type_set(env: &TypeEnvironment, set: &TypeSet) -> bool {
    all_in_set(env, set, is_record_type)
}

pub fn is_sum_type_set(env: &TypeEnvironment, set: &TypeSet) -> bool {
    all_in_set(env, set, is_sum_type)
}

pub fn is_numeric_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    is_number_type(env, ty) || is_unsigned_type(env, ty) || is_float_type(env, ty)
}

pub fn is_orderable_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    is_numeric_type(env, ty) || is_symbol_type(env, ty)
}

/// Is `target` reachable in the transitive closure of `union`'s elements?
fn is_in_union_closure(env: &TypeEnvironment, target: TypeId, union: TypeId) -> bool {
    fn visit(
        env: &TypeEnvironment,
        target: TypeId,
        ty: TypeId,
        seen: &mut HashMap<TypeId, bool>,
    ) -> bool {
        if ty == target {
            return true;
        }
        if let Some(&cached) = seen.get(&ty) {
            return cached;
        }
        seen.insert(ty, false);
        let result = match env.ty(ty) {
            Type::Union { elements } => elements
                .iter()
                .any(|element| visit(env, target, *element, seen)),
            _ => false,
        };
        seen.insert(ty, result);
        result
    }
    visit(env, target, union, &mut HashMap::new())
}

/// Determines whether type `a` is a subtype of type `b`.
pub fn is_subtype(env: &TypeEnvironment, a: TypeId, b: TypeId) -> bool {
    // a type is a subtype of itself
    if a == b {
        return true;
    }

    // the predefined roots delegate to their root predicates
    if b == env.number_type() {
        return is_number_type(env, a);
    }
    if b == env.unsigned_type() {
        return is_unsigned_type(env, a);
    }
    if b == env.float_type() {
        return is_float_type(env, a);
    }
    if b == env.symbol_type() {
        return is_symbol_type(env, a);
    }

    // primitive chains
    if let Type::Primitive { base } = env.ty(a) {
        if is_subtype(env, *base, b) {
            return true;
        }
    }

    // a union contains the transitive closure of its elements
    if matches!(env.ty(b), Type::Union { .. }) {
        return is_in_union_closure(env, a, b);
    }

    false
}

/// True iff a record or sum type appears inside its own field/branch chain.
pub fn is_recursive_type(env: &TypeEnvironment, ty: TypeId) -> bool {
    fn reaches(
        env: &TypeEnvironment,
        ty: TypeId,
        target: TypeId,
        seen: &mut HashMap<TypeId, bool>,
    ) -> bool {
        if ty == target {
            return true;
        }
        if let Some(&cached) = seen.get(&ty) {
            return cached;
        }
        seen.insert(ty, false);
        let result = match env.ty(ty) {
            Type::Union { elements } => elements
                .iter()
                .any(|element| reaches(env, *element, target, seen)),
            Type::Record { fields } => fields
                .iter()
                .any(|field| reaches(env, field.ty, target, seen)),
            Type::Sum { branches } => branches
                .iter()
                .any(|branch| reaches(env, branch.ty, target, seen)),
            _ => false,
        };
        seen.insert(ty, result);
        result
    }

    let mut seen = HashMap::new();
    match env.ty(ty) {
        Type::Record { fields } => fields
            .iter()
            .any(|field| reaches(env, field.ty, ty, &mut seen)),
        Type::Sum { branches } => branches
            .iter()
            .any(|branch| reaches(env, branch.ty, ty, &mut seen)),
        _ => false,
    }
}

/// The ⊂-minimal set of common supertypes of `a` and `b`.
pub fn least_common_supertypes(env: &TypeEnvironment, a: TypeId, b: TypeId) -> TypeSet {
    if a == b {
        return TypeSet::singleton(a);
    }
    if is_subtype(env, a, b) {
        return TypeSet::singleton(b);
    }
    if is_subtype(env, b, a) {
        return TypeSet::singleton(a);
    }

    // no obvious relation: enumerate the environment and filter
    let mut super_types = TypeSet::new();
    for cur in env.ids() {
        if is_subtype(env, a, cur) && is_subtype(env, b, cur) {
            super_types.insert(cur);
        }
    }

    // keep only the least of them
    let mut result = TypeSet::new();
    for cur in super_types.iter() {
        let least = !super_types
            .iter()
            .any(|other| other != cur && is_subtype(env, other, cur));
        if least {
            result.insert(cur);
        }
    }
    result
}

/// Fold [`least_common_supertypes`] over a whole set. The universal set has
/// no common supertype.
pub fn least_common_supertypes_set(env: &TypeEnvironment, set: &TypeSet) -> TypeSet {
    if set.is_empty() {
        return set.clone();
    }
    if set.is_all() {
        return TypeSet::new();
    }

    let mut iter = set.iter();
    let mut result = TypeSet::singleton(iter.next().unwrap());
    for next in iter {
        let mut refined = TypeSet::new();
        for cur in result.iter() {
            refined.insert_set(&least_common_supertypes(env, cur, next));
        }
        result = refined;
    }
    result
}

/// Pairwise least common supertypes of two sets.
pub fn least_common_supertypes_pairwise(
    env: &TypeEnvironment,
    a: &TypeSet,
    b: &TypeSet,
) -> TypeSet {
    if a.is_empty() {
        return a.clone();
    }
    if b.is_empty() {
        return b.clone();
    }
    if a.is_all() {
        return b.clone();
    }
    if b.is_all() {
        return a.clone();
    }

    let mut result = TypeSet::new();
    for x in a.iter() {
        for y in b.iter() {
            result.insert_set(&least_common_supertypes(env, x, y));
        }
    }
    result
}

/// Collect elements of the union closure of `ty` that are subtypes of `b`.
fn collect_common_subtypes(
    env: &TypeEnvironment,
    ty: TypeId,
    b: TypeId,
    result: &mut TypeSet,
    seen: &mut HashMap<TypeId, ()>,
) {
    if seen.contains_key(&ty) {
        return;
    }
    seen.insert(ty, ());
    if is_subtype(env, ty, b) {
        result.insert(ty);
        return;
    }
    if let Type::Union { elements } = env.ty(ty) {
        for element in elements {
            collect_common_subtypes(env, *element, b, result, seen);
        }
    }
}

/// The greatest common subtypes of `a` and `b`.
pub fn greatest_common_subtypes(env: &TypeEnvironment, a: TypeId, b: TypeId) -> TypeSet {
    if a == b {
        return TypeSet::singleton(a);
    }
    if is_subtype(env, a, b) {
        return TypeSet::singleton(a);
    }
    if is_subtype(env, b, a) {
        return TypeSet::singleton(b);
    }

    // two unions may still share sub-types
    let mut result = TypeSet::new();
    if matches!(env.ty(a), Type::Union { .. }) && matches!(env.ty(b), Type::Union { .. }) {
        collect_common_subtypes(env, a, b, &mut result, &mut HashMap::new());
    }
    result
}

/// Fold [`greatest_common_subtypes`] over a whole set. The universal set
/// has no common subtype.
pub fn greatest_common_subtypes_set(env: &TypeEnvironment, set: &TypeSet) -> TypeSet {
    if set.is_empty() {
        return set.clone();
    }
    if set.is_all() {
        return TypeSet::new();
    }

    let mut iter = set.iter();
    let mut result = TypeSet::singleton(iter.next().unwrap());
    for next in iter {
        let mut refined = TypeSet::new();
        for cur in result.iter() {
            refined.insert_set(&greatest_common_subtypes(env, cur, next));
        }
        result = refined;
    }
    result
}

/// Pairwise greatest common subtypes of two sets: the meet of the inference
/// lattice.
pub fn greatest_common_subtypes_pairwise(
    env: &TypeEnvironment,
    a: &TypeSet,
    b: &TypeSet,
) -> TypeSet {
    if a.is_empty() {
        return a.clone();
    }
    if b.is_empty() {
        return b.clone();
    }
    if a.is_all() {
        return b.clone();
    }
    if b.is_all() {
        return a.clone();
    }

    let mut result = TypeSet::new();
    for x in a.iter() {
        for y in b.iter() {
            result.insert_set(&greatest_common_subtypes(env, x, y));
        }
    }
    result
}

/// The stable per-type encoding consumed by the I/O subsystem: a kind prefix
/// plus the type name, with a structural suffix for unions, records and
/// sums. Memoised so recursive types terminate.
pub fn type_qualifier(env: &TypeEnvironment, ty: TypeId) -> String {
    fn base(env: &TypeEnvironment, ty: TypeId, seen: &mut HashMap<TypeId, String>) -> String {
        let prefix = if is_record_type(env, ty) {
            "r"
        } else if is_sum_type(env, ty) {
            "+"
        } else if is_number_type(env, ty) {
            "i"
        } else if is_unsigned_type(env, ty) {
            "u"
        } else if is_float_type(env, ty) {
            "f"
        } else if is_symbol_type(env, ty) {
            "s"
        } else {
            "?"
        };
        let qualifier = format!("{}:{}", prefix, env.name(ty));
        seen.insert(ty, qualifier.clone());
        qualifier
    }

    fn visit(env: &TypeEnvironment, ty: TypeId, seen: &mut HashMap<TypeId, String>) -> String {
        if let Some(cached) = seen.get(&ty) {
            return cached.clone();
        }
        match env.ty(ty) {
            Type::Union { elements } => {
                let head = base(env, ty, seen);
                let elements = elements.clone();
                let inner: Vec<String> = elements
                    .iter()
                    .map(|element| visit(env, *element, seen))
                    .collect();
                format!("{}[{}]", head, inner.join(","))
            }
            Type::Record { fields } => {
                let head = base(env, ty, seen);
                let fields = fields.clone();
                let inner: Vec<String> = fields
                    .iter()
                    .map(|field| format!("{}#{}", field.name, visit(env, field.ty, seen)))
                    .collect();
                format!("{}{{{}}}", head, inner.join(","))
            }
            Type::Sum { branches } => {
                let head = base(env, ty, seen);
                let branches = branches.clone();
                let inner: Vec<String> = branches
                    .iter()
                    .map(|branch| format!("{} = {}", branch.name, visit(env, branch.ty, seen)))
                    .collect();
                format!("{}[{}]", head, inner.join(";"))
            }
            _ => base(env, ty, seen),
        }
    }

    visit(env, ty, &mut HashMap::new())
}
