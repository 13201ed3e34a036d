//! Diagnostics for the Datalog front end
//!
//! Passes never abort on a faulty program; they record [`Diagnostic`]s into
//! a shared [`ErrorReport`] and keep going as far as they can. The pass
//! driver consults the report between passes and stops the pipeline once an
//! error-kind entry exists, so one invocation surfaces as many problems as
//! possible.

mod diagnostic;
mod report;

pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticMessage};
pub use report::{ErrorReport, SourceCache};
