//! Constraint-based type inference for the Datalog front end
//!
//! Every argument occurrence of every clause is assigned a set of possible
//! types. Constraints generated from the clause structure tighten these
//! sets, starting from the set of all types, by taking greatest common
//! subtypes over the lattice until a sweep changes nothing. A singleton
//! result means well-typed, the empty set is a type conflict, and larger
//! sets are ambiguous.

mod analysis;
mod constraint;

pub use analysis::{analyse_types, TypeAnalysis};
pub use constraint::{solve, Assignment, Constraint, TypeVar};
