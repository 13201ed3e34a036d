//! Builds the type environment from a program's type declarations.
//!
//! Two passes: first every declaration registers a stub of its variant,
//! then a linking pass resolves element, field, and branch names. Faulty
//! programs survive both passes: duplicate declarations are skipped (the
//! semantic checks report them) and unresolvable names are simply left
//! unlinked for the type analysis to flag.

use crate::TypeEnvironment;
use datalog_diagnostics::ErrorReport;
use datalog_ast::{Program, TypeDeclKind};
use std::collections::BTreeSet;

pub fn build_type_environment(program: &Program, report: &mut ErrorReport) -> TypeEnvironment {
    let mut env = TypeEnvironment::new();

    // create all type symbols in a first step
    for decl in &program.types {
        if env.is_type(&decl.name) {
            continue;
        }
        match &decl.kind {
            TypeDeclKind::Subset(attr) => {
                env.create_subset(decl.name.to_string(), *attr);
            }
            TypeDeclKind::Union(_) => {
                env.create_union(decl.name.to_string());
            }
            TypeDeclKind::Record(_) => {
                env.create_record(decl.name.to_string());
            }
            TypeDeclKind::Sum(_) => {
                env.create_sum(decl.name.to_string());
            }
        }
    }

    // link symbols in a second step
    for decl in &program.types {
        let id = match env.get(&decl.name) {
            Some(id) => id,
            None => continue,
        };
        match &decl.kind {
            TypeDeclKind::Subset(_) => {}
            TypeDeclKind::Union(elements) => {
                // a redefined name may have been registered as another
                // variant; leave it to the semantic checks
                if !matches!(env.ty(id), crate::Type::Union { .. }) {
                    continue;
                }
                for element in elements {
                    if let Some(element) = env.get(element) {
                        env.add_union_element(id, element);
                    }
                }
            }
            TypeDeclKind::Record(fields) => {
                if !matches!(env.ty(id), crate::Type::Record { .. }) {
                    continue;
                }
                for field in fields {
                    if let Some(ty) = env.get(&field.type_name) {
                        env.add_record_field(id, field.name, ty);
                    }
                }
            }
            TypeDeclKind::Sum(branches) => {
                if !matches!(env.ty(id), crate::Type::Sum { .. }) {
                    continue;
                }
                let mut names = BTreeSet::new();
                for branch in branches {
                    if !names.insert(branch.name) {
                        report.add_diagnostic(
                            datalog_diagnostics::Diagnostic::error(
                                format!(
                                    "Duplicate branch {} in sum type {}",
                                    branch.name, decl.name
                                ),
                                branch.span,
                            )
                            .with_note("Sum type declared here", decl.span),
                        );
                        continue;
                    }
                    if let Some(ty) = env.get(&branch.type_name) {
                        env.add_sum_branch(id, branch.name, ty);
                    }
                }
            }
        }
    }

    env
}
