//! Property-based tests over the type lattice
//!
//! Random environments are described by a list of declaration specs and
//! built in two passes like the real environment builder, so unions may
//! reference any type including themselves.

use datalog_ast::TypeAttr;
use datalog_types::{
    greatest_common_subtypes, is_subtype, least_common_supertypes, TypeEnvironment, TypeId,
    TypeSet,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum DeclSpec {
    Subset(TypeAttr),
    /// element indices, resolved modulo the number of user types declared
    /// *before* the union. The subtype order must be a partial order for
    /// the lattice properties to hold, so unions only look backwards and
    /// never name a predefined root directly (cyclic environments and
    /// root-element unions are covered by the unit tests).
    Union(Vec<usize>),
}

fn attr_strategy() -> impl Strategy<Value = TypeAttr> {
    prop_oneof![
        Just(TypeAttr::Signed),
        Just(TypeAttr::Unsigned),
        Just(TypeAttr::Float),
        Just(TypeAttr::Symbol),
    ]
}

fn env_strategy() -> impl Strategy<Value = Vec<DeclSpec>> {
    prop::collection::vec(
        prop_oneof![
            attr_strategy().prop_map(DeclSpec::Subset),
            prop::collection::vec(0usize..12, 0..4).prop_map(DeclSpec::Union),
        ],
        1..8,
    )
}

fn build_env(specs: &[DeclSpec]) -> (TypeEnvironment, Vec<TypeId>) {
    let mut env = TypeEnvironment::new();

    // create all symbols, then link
    let mut created = Vec::new();
    for (index, spec) in specs.iter().enumerate() {
        let name = format!("T{}", index);
        let id = match spec {
            DeclSpec::Subset(attr) => env.create_subset(&name, *attr),
            DeclSpec::Union(_) => env.create_union(&name),
        };
        created.push(id);
    }

    for (index, spec) in specs.iter().enumerate() {
        if let DeclSpec::Union(elements) = spec {
            if index == 0 {
                continue; // nothing declared yet; stays an empty union
            }
            for element in elements {
                env.add_union_element(created[index], created[element % index]);
            }
        }
    }

    let all: Vec<TypeId> = env.ids().collect();
    (env, all)
}

proptest! {
    #[test]
    fn subtyping_is_reflexive(specs in env_strategy()) {
        let (env, types) = build_env(&specs);
        for &t in &types {
            prop_assert!(is_subtype(&env, t, t));
        }
    }

    #[test]
    fn subtyping_is_transitive(specs in env_strategy()) {
        let (env, types) = build_env(&specs);
        for &a in &types {
            for &b in &types {
                if !is_subtype(&env, a, b) {
                    continue;
                }
                for &c in &types {
                    if is_subtype(&env, b, c) {
                        prop_assert!(
                            is_subtype(&env, a, c),
                            "{} <: {} <: {} but not transitively",
                            env.name(a),
                            env.name(b),
                            env.name(c)
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn lcs_and_gcs_are_commutative(specs in env_strategy()) {
        let (env, types) = build_env(&specs);
        for &a in &types {
            for &b in &types {
                prop_assert_eq!(
                    least_common_supertypes(&env, a, b),
                    least_common_supertypes(&env, b, a)
                );
                prop_assert_eq!(
                    greatest_common_subtypes(&env, a, b),
                    greatest_common_subtypes(&env, b, a)
                );
            }
        }
    }

    #[test]
    fn related_types_have_trivial_bounds(specs in env_strategy()) {
        let (env, types) = build_env(&specs);
        for &a in &types {
            for &b in &types {
                if is_subtype(&env, a, b) {
                    prop_assert_eq!(least_common_supertypes(&env, a, b), TypeSet::singleton(b));
                    prop_assert_eq!(greatest_common_subtypes(&env, a, b), TypeSet::singleton(a));
                }
            }
        }
    }
}
