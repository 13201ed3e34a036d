//! Workspace-level tests for the Datalog front end
//!
//! Property-based tests over the type lattice invariants and end-to-end
//! scenarios driving the whole pipeline.

#[cfg(test)]
mod lattice_properties;

#[cfg(test)]
mod scenarios;
