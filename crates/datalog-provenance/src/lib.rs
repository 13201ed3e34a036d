//! Provenance instrumentation for the Datalog front end
//!
//! Rewrites every relation and clause to carry the auxiliary columns the
//! explanation engine reads back: the deriving rule number, the proof-tree
//! level, and (in subtree-heights mode) per-literal sub-levels. Each rule
//! additionally gets an `@info` meta-relation holding a single fact that
//! describes the original, uninstrumented rule.

mod aux;
mod transform;

pub use aux::AuxiliaryArity;
pub use transform::{transform_provenance, ProvenanceMode};
