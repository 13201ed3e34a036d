use crate::{solve, Assignment, Constraint, TypeVar};
use datalog_ast::{
    visit, ArgId, Argument, ArgumentKind, Atom, Clause, Constant, Literal, Program, Span, Symbol,
};
use datalog_diagnostics::ErrorReport;
use datalog_types::{TypeEnvironment, TypeSet};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Write;

/// The result of the type analysis: a set of possible types for every
/// argument occurrence of every attached clause, plus the debug channel.
#[derive(Default)]
pub struct TypeAnalysis {
    pub argument_types: HashMap<ArgId, TypeSet>,
    /// Clones of the analysed clauses with variables renamed to carry their
    /// solved types; filled only when the debug channel is on.
    pub annotated_clauses: Vec<Clause>,
    pub logs: String,
}

impl TypeAnalysis {
    pub fn types_of(&self, id: ArgId) -> Option<&TypeSet> {
        self.argument_types.get(&id)
    }
}

impl fmt::Display for TypeAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-- Analysis logs --")?;
        writeln!(f, "{}", self.logs)?;
        writeln!(f, "-- Result --")?;
        for clause in &self.annotated_clauses {
            writeln!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Run the type analysis over every clause attached to a relation.
///
/// Also reports the problems only discoverable here: unresolved relations
/// and types, arity mismatches, malformed sum initialisers, and variables
/// whose type set becomes empty. With `debug` set, constraint logs and
/// annotated clauses are collected.
pub fn analyse_types(
    program: &Program,
    env: &TypeEnvironment,
    report: &mut ErrorReport,
    debug: bool,
) -> TypeAnalysis {
    let mut analysis = TypeAnalysis::default();

    // declaration-site problems, reported once rather than per clause
    for relation in &program.relations {
        for attr in &relation.attributes {
            if !env.is_type(&attr.type_name) {
                report.add_error(
                    format!(
                        "Undefined type {} in attribute {}",
                        attr.type_name, attr.name
                    ),
                    attr.span,
                );
            }
        }
    }
    for clause in &program.clauses {
        report.add_error(
            format!("Undefined relation {}", clause.head.name),
            clause.head.span,
        );
    }

    for relation in &program.relations {
        for clause in &relation.clauses {
            analyse_clause(clause, program, env, report, debug, &mut analysis);
        }
    }

    analysis
}

struct ClauseAnalysis<'a> {
    env: &'a TypeEnvironment,
    program: &'a Program,
    constraints: Vec<Constraint>,
    occurrences: Vec<(ArgId, TypeVar)>,
    named: Vec<(Symbol, Span)>,
}

impl<'a> ClauseAnalysis<'a> {
    fn key(arg: &Argument) -> TypeVar {
        match &arg.kind {
            ArgumentKind::Variable(name) => TypeVar::Named(*name),
            _ => TypeVar::Occurrence(arg.id),
        }
    }

    fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    fn visit_literal(&mut self, literal: &Literal, report: &mut ErrorReport) {
        match literal {
            Literal::Atom(atom) => self.visit_atom(atom, true, report),
            Literal::Negation(atom) => self.visit_atom(atom, false, report),
            Literal::Constraint(constraint) => {
                self.visit_argument(&constraint.lhs, report);
                self.visit_argument(&constraint.rhs, report);
                let lhs = Self::key(&constraint.lhs);
                let rhs = Self::key(&constraint.rhs);
                self.add(Constraint::subtype(lhs, rhs));
                self.add(Constraint::subtype(rhs, lhs));
            }
        }
    }

    fn visit_atom(&mut self, atom: &Atom, positive: bool, report: &mut ErrorReport) {
        for arg in &atom.args {
            self.visit_argument(arg, report);
        }

        let relation = match self.program.relation(&atom.name) {
            Some(relation) => relation,
            None => {
                report.add_error(format!("Undefined relation {}", atom.name), atom.span);
                return;
            }
        };
        if relation.arity() != atom.arity() {
            report.add_error(
                format!(
                    "Mismatching arity of atom {} (expected {}, got {})",
                    atom.name,
                    relation.arity(),
                    atom.arity()
                ),
                atom.span,
            );
            return;
        }

        // declared attribute types bound the argument types: downward for
        // positive occurrences, upward under a negation
        for (attr, arg) in relation.attributes.iter().zip(atom.args.iter()) {
            if let Some(ty) = self.env.get(&attr.type_name) {
                let var = Self::key(arg);
                if positive {
                    self.add(Constraint::subtype_of(var, ty));
                } else {
                    self.add(Constraint::supertype_of(var, ty));
                }
            }
        }
    }

    fn visit_argument(&mut self, arg: &Argument, report: &mut ErrorReport) {
        let var = Self::key(arg);
        self.occurrences.push((arg.id, var));
        if let ArgumentKind::Variable(name) = &arg.kind {
            if !self.named.iter().any(|(seen, _)| seen == name) {
                self.named.push((*name, arg.span));
            }
        }

        match &arg.kind {
            ArgumentKind::Variable(_) | ArgumentKind::UnnamedVariable => {}
            ArgumentKind::Counter => {
                self.add(Constraint::subtype_of(var, self.env.number_type()));
            }
            ArgumentKind::Constant(constant) => match constant {
                Constant::String(_) => {
                    self.add(Constraint::subtype_of(var, self.env.symbol_type()));
                }
                Constant::Number(_) => {
                    self.add(Constraint::subtype_of(var, self.env.number_type()));
                }
                Constant::Unsigned(_) => {
                    self.add(Constraint::subtype_of(var, self.env.unsigned_type()));
                }
                Constant::Float(_) => {
                    self.add(Constraint::subtype_of(var, self.env.float_type()));
                }
                Constant::Nil => {}
            },
            ArgumentKind::IntrinsicFunctor { op, args } => {
                for sub in args {
                    self.visit_argument(sub, report);
                }
                if op.is_overloaded() {
                    // polymorphic arithmetic: arguments and result agree
                    for sub in args {
                        let sub_var = Self::key(sub);
                        self.add(Constraint::subtype(sub_var, var));
                        self.add(Constraint::subtype(var, sub_var));
                    }
                    return;
                }
                let ret = self.env.root(op.return_type());
                self.add(Constraint::subtype_of(var, ret));
                if *op == datalog_ast::FunctorOp::Ord {
                    return;
                }
                for (index, sub) in args.iter().enumerate() {
                    let ty = self.env.root(op.arg_type(index));
                    self.add(Constraint::subtype_of(Self::key(sub), ty));
                }
            }
            ArgumentKind::UserFunctor { name, args } => {
                for sub in args {
                    self.visit_argument(sub, report);
                }
                let decl = match self.program.functor(*name) {
                    Some(decl) => decl,
                    None => {
                        report.add_error(format!("Undefined functor {}", name), arg.span);
                        return;
                    }
                };
                if decl.arity() != args.len() {
                    report.add_error(
                        format!(
                            "Mismatching arity of functor {} (expected {}, got {})",
                            name,
                            decl.arity(),
                            args.len()
                        ),
                        arg.span,
                    );
                    return;
                }
                self.add(Constraint::subtype_of(var, self.env.root(decl.return_type)));
                for (attr, sub) in decl.arg_types.iter().zip(args.iter()) {
                    self.add(Constraint::subtype_of(Self::key(sub), self.env.root(*attr)));
                }
            }
            ArgumentKind::RecordInit { type_name, args } => {
                for (index, sub) in args.iter().enumerate() {
                    self.visit_argument(sub, report);
                    self.add(Constraint::record_component(Self::key(sub), var, index));
                }
                if let Some(type_name) = type_name {
                    match self.env.get(type_name) {
                        Some(ty) => {
                            self.add(Constraint::subtype_of(var, ty));
                            self.add(Constraint::supertype_of(var, ty));
                        }
                        None => {
                            report.add_error(
                                format!("Undefined type {} in record initialisation", type_name),
                                arg.span,
                            );
                        }
                    }
                }
            }
            ArgumentKind::SumInit {
                type_name,
                branch,
                arg: payload,
            } => {
                self.visit_argument(payload, report);
                let ty = match self.env.get(type_name) {
                    Some(ty) => ty,
                    None => {
                        report.add_error(
                            format!("Undefined type {} in sum initialisation", type_name),
                            arg.span,
                        );
                        return;
                    }
                };
                let branches = match self.env.ty(ty) {
                    datalog_types::Type::Sum { branches } => branches,
                    _ => {
                        report.add_error(
                            format!("{} is not a sum type", type_name),
                            arg.span,
                        );
                        return;
                    }
                };
                self.add(Constraint::subtype_of(var, ty));
                self.add(Constraint::supertype_of(var, ty));
                match branches.iter().find(|cur| cur.name == *branch) {
                    Some(matched) => {
                        self.add(Constraint::subtype_of(Self::key(payload), matched.ty));
                    }
                    None => {
                        report.add_error(
                            format!("Undefined branch {} of sum type {}", branch, type_name),
                            arg.span,
                        );
                    }
                }
            }
            ArgumentKind::TypeCast {
                arg: inner,
                type_name,
            } => {
                self.visit_argument(inner, report);
                match self.env.get(type_name) {
                    Some(ty) => self.add(Constraint::subtype_of(var, ty)),
                    None => {
                        report.add_error(
                            format!("Undefined type {} in type cast", type_name),
                            arg.span,
                        );
                    }
                }
            }
            ArgumentKind::Aggregate { target, body, .. } => {
                self.add(Constraint::subtype_of(var, self.env.number_type()));
                if let Some(target) = target {
                    self.visit_argument(target, report);
                    self.add(Constraint::subtype_of(
                        Self::key(target),
                        self.env.number_type(),
                    ));
                }
                for literal in body {
                    self.visit_literal(literal, report);
                }
            }
        }
    }
}

fn analyse_clause(
    clause: &Clause,
    program: &Program,
    env: &TypeEnvironment,
    report: &mut ErrorReport,
    debug: bool,
    analysis: &mut TypeAnalysis,
) {
    let mut clause_analysis = ClauseAnalysis {
        env,
        program,
        constraints: Vec::new(),
        occurrences: Vec::new(),
        named: Vec::new(),
    };

    clause_analysis.visit_atom(&clause.head, true, report);
    for literal in &clause.body {
        clause_analysis.visit_literal(literal, report);
    }

    let mut assignment = Assignment::new();
    solve(&mut clause_analysis.constraints, env, &mut assignment);

    if debug {
        let _ = writeln!(analysis.logs, "type analysis for clause: {}", clause);
        for constraint in &clause_analysis.constraints {
            let _ = writeln!(analysis.logs, "  {}", constraint.render(env));
        }
        let _ = writeln!(analysis.logs, "solution:");
        for (name, _) in &clause_analysis.named {
            let _ = writeln!(
                analysis.logs,
                "  {} : {}",
                name,
                assignment.get(TypeVar::Named(*name)).render(env)
            );
        }
    }

    // a variable with no remaining type is a conflict
    for (name, span) in &clause_analysis.named {
        if assignment.get(TypeVar::Named(*name)).is_empty() {
            report.add_error(format!("Unable to deduce type for variable {}", name), *span);
        }
    }

    for (id, var) in &clause_analysis.occurrences {
        analysis.argument_types.insert(*id, assignment.get(*var));
    }

    if debug {
        analysis
            .annotated_clauses
            .push(annotate_clause(clause, env, &analysis.argument_types));
    }
}


/// A clone of the clause whose variables carry their inferred type sets,
/// for the analysis dump.
fn annotate_clause(
    clause: &Clause,
    env: &TypeEnvironment,
    argument_types: &HashMap<ArgId, TypeSet>,
) -> Clause {
    let mut annotated = clause.clone();
    visit::for_each_argument_mut(&mut annotated, &mut |arg| {
        let types = match argument_types.get(&arg.id) {
            Some(types) => types.render(env),
            None => return,
        };
        match &arg.kind {
            ArgumentKind::Variable(name) => {
                arg.kind = ArgumentKind::Variable(datalog_ast::sym(format!("{}∈{}", name, types)));
            }
            ArgumentKind::UnnamedVariable => {
                arg.kind = ArgumentKind::Variable(datalog_ast::sym(format!("_∈{}", types)));
            }
            _ => {}
        }
    });
    annotated
}
