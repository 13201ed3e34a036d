//! Pass driver for the Datalog front end
//!
//! Runs the semantic pipeline over a parsed program in a fixed order:
//! type environment construction, component instantiation, type inference,
//! and provenance instrumentation. Diagnostics accumulate across passes;
//! the pipeline aborts after the first pass that reports an error, so one
//! invocation surfaces every problem that pass could find.

mod config;
mod pipeline;

pub use config::{Config, DomainWidth};
pub use pipeline::{compile, TranslationUnit};
