//! The type system of the Datalog front end
//!
//! Types live in a [`TypeEnvironment`], an arena indexed by [`TypeId`] with
//! a qualified-name lookup. The lattice operations (subtyping, least common
//! supertypes, greatest common subtypes) work on ids so that recursive types
//! can be walked with memoised visitors, and [`TypeSet`] represents the
//! possibly-universal sets of types the inference assigns to arguments.

mod builder;
mod env;
mod lattice;
mod type_set;

pub use builder::build_type_environment;
pub use env::{Branch, Field, Type, TypeEnvironment, TypeId};
pub use lattice::{
    greatest_common_subtypes, greatest_common_subtypes_pairwise, greatest_common_subtypes_set,
    is_float_type, is_float_type_set, is_number_type, is_number_type_set, is_numeric_type,
    is_orderable_type, is_record_type, is_record_type_set, is_recursive_type, is_subtype,
    is_sum_type, is_sum_type_set, is_symbol_type, is_symbol_type_set, is_unsigned_type,
    is_unsigned_type_set, least_common_supertypes, least_common_supertypes_pairwise,
    least_common_supertypes_set, type_qualifier,
};
pub use type_set::TypeSet;
