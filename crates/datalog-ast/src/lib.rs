//! Abstract Syntax Tree (AST) definitions for the Datalog front end
//!
//! This crate defines the data structures every front-end pass consumes and
//! produces, plus the traversal and printing helpers shared between them.
//!
//! # Key Components
//!
//! - **Program**: top-level container of types, relations, clauses,
//!   components, instantiations, and I/O directives
//! - **Component / ComponentInit**: parameterised modules and their
//!   instantiations, flattened away by the component instantiator
//! - **Relation**: a declared table with typed attributes; owns its clauses
//!   once instantiation has attached them
//! - **Clause / Literal / Atom**: rules and facts
//! - **Argument**: every term form that can appear in an atom, carrying a
//!   stable [`ArgId`] so analyses can key results by occurrence
//!
//! The upstream parser produces these nodes; nothing in this crate reads
//! source text.

mod arg;
mod clause;
mod decl;
mod name;
mod ops;
mod print;
mod program;
mod relation;
mod span;
mod src;
pub mod visit;

pub use arg::{ArgId, Argument, ArgumentKind, Constant};
pub use clause::{Atom, BinaryConstraint, Clause, ExecutionPlan, Literal};
pub use decl::{
    Component, ComponentInit, ComponentType, FunctorDecl, RecordField, SumBranch, TypeAttr,
    TypeDecl, TypeDeclKind,
};
pub use name::{sym, QualifiedName, Symbol};
pub use ops::{AggregateOp, ComparisonOp, FunctorOp};
pub use program::{Directive, DirectiveKind, Program};
pub use relation::{Attribute, Relation, RelationQualifier, RelationRepresentation};
pub use span::Span;
pub use src::SrcId;
