//! Recursive walkers over the argument and atom structure of clauses.
//!
//! Arguments nest arbitrarily (functor arguments, record fields, aggregate
//! bodies), so the passes that need "every occurrence" traverse through
//! these helpers rather than hand-rolling the recursion each time.

use crate::{Argument, ArgumentKind, Atom, Clause, Literal};

/// Visit every argument occurrence in a clause, parents before children.
pub fn for_each_argument<'a>(clause: &'a Clause, f: &mut impl FnMut(&'a Argument)) {
    for arg in &clause.head.args {
        walk_argument(arg, f);
    }
    for literal in &clause.body {
        for_each_literal_argument(literal, f);
    }
}

pub fn for_each_literal_argument<'a>(literal: &'a Literal, f: &mut impl FnMut(&'a Argument)) {
    match literal {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            for arg in &atom.args {
                walk_argument(arg, f);
            }
        }
        Literal::Constraint(constraint) => {
            walk_argument(&constraint.lhs, f);
            walk_argument(&constraint.rhs, f);
        }
    }
}

pub fn walk_argument<'a>(arg: &'a Argument, f: &mut impl FnMut(&'a Argument)) {
    f(arg);
    match &arg.kind {
        ArgumentKind::IntrinsicFunctor { args, .. }
        | ArgumentKind::UserFunctor { args, .. }
        | ArgumentKind::RecordInit { args, .. } => {
            for sub in args {
                walk_argument(sub, f);
            }
        }
        ArgumentKind::SumInit { arg: sub, .. } | ArgumentKind::TypeCast { arg: sub, .. } => {
            walk_argument(sub, f);
        }
        ArgumentKind::Aggregate { target, body, .. } => {
            if let Some(target) = target {
                walk_argument(target, f);
            }
            for literal in body {
                for_each_literal_argument(literal, f);
            }
        }
        _ => {}
    }
}

/// Mutable variant of [`for_each_argument`].
pub fn for_each_argument_mut(clause: &mut Clause, f: &mut impl FnMut(&mut Argument)) {
    for arg in &mut clause.head.args {
        walk_argument_mut(arg, f);
    }
    for literal in &mut clause.body {
        for_each_literal_argument_mut(literal, f);
    }
}

pub fn for_each_literal_argument_mut(literal: &mut Literal, f: &mut impl FnMut(&mut Argument)) {
    match literal {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            for arg in &mut atom.args {
                walk_argument_mut(arg, f);
            }
        }
        Literal::Constraint(constraint) => {
            walk_argument_mut(&mut constraint.lhs, f);
            walk_argument_mut(&mut constraint.rhs, f);
        }
    }
}

pub fn walk_argument_mut(arg: &mut Argument, f: &mut impl FnMut(&mut Argument)) {
    f(arg);
    match &mut arg.kind {
        ArgumentKind::IntrinsicFunctor { args, .. }
        | ArgumentKind::UserFunctor { args, .. }
        | ArgumentKind::RecordInit { args, .. } => {
            for sub in args {
                walk_argument_mut(sub, f);
            }
        }
        ArgumentKind::SumInit { arg: sub, .. } | ArgumentKind::TypeCast { arg: sub, .. } => {
            walk_argument_mut(sub, f);
        }
        ArgumentKind::Aggregate { target, body, .. } => {
            if let Some(target) = target {
                walk_argument_mut(target, f);
            }
            for literal in body {
                for_each_literal_argument_mut(literal, f);
            }
        }
        _ => {}
    }
}

/// Visit every atom in a clause: the head, positive and negated body atoms,
/// and atoms nested inside aggregate bodies.
pub fn for_each_atom<'a>(clause: &'a Clause, f: &mut impl FnMut(&'a Atom)) {
    f(&clause.head);
    for arg in &clause.head.args {
        walk_argument_atoms(arg, f);
    }
    for literal in &clause.body {
        for_each_literal_atom(literal, f);
    }
}

pub fn for_each_literal_atom<'a>(literal: &'a Literal, f: &mut impl FnMut(&'a Atom)) {
    match literal {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            f(atom);
            for arg in &atom.args {
                walk_argument_atoms(arg, f);
            }
        }
        Literal::Constraint(constraint) => {
            walk_argument_atoms(&constraint.lhs, f);
            walk_argument_atoms(&constraint.rhs, f);
        }
    }
}

fn walk_argument_atoms<'a>(arg: &'a Argument, f: &mut impl FnMut(&'a Atom)) {
    walk_argument(arg, &mut |sub| {
        if let ArgumentKind::Aggregate { body, .. } = &sub.kind {
            for literal in body {
                match literal {
                    Literal::Atom(atom) | Literal::Negation(atom) => f(atom),
                    Literal::Constraint(_) => {}
                }
            }
        }
    });
}

/// Mutable visit over every atom name reference in a clause, used by the
/// component instantiator to rewrite relation names.
pub fn for_each_atom_mut(clause: &mut Clause, f: &mut impl FnMut(&mut Atom)) {
    f(&mut clause.head);
    for arg in &mut clause.head.args {
        walk_argument_atoms_mut(arg, f);
    }
    for literal in &mut clause.body {
        for_each_literal_atom_mut(literal, f);
    }
}

pub fn for_each_literal_atom_mut(literal: &mut Literal, f: &mut impl FnMut(&mut Atom)) {
    match literal {
        Literal::Atom(atom) | Literal::Negation(atom) => {
            f(atom);
            for arg in &mut atom.args {
                walk_argument_atoms_mut(arg, f);
            }
        }
        Literal::Constraint(constraint) => {
            walk_argument_atoms_mut(&mut constraint.lhs, f);
            walk_argument_atoms_mut(&mut constraint.rhs, f);
        }
    }
}

fn walk_argument_atoms_mut(arg: &mut Argument, f: &mut impl FnMut(&mut Atom)) {
    walk_argument_mut(arg, &mut |sub| {
        if let ArgumentKind::Aggregate { body, .. } = &mut sub.kind {
            for literal in body {
                match literal {
                    Literal::Atom(atom) | Literal::Negation(atom) => f(atom),
                    Literal::Constraint(_) => {}
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AggregateOp, ComparisonOp, QualifiedName, Span};

    fn span() -> Span {
        Span::none()
    }

    fn atom(name: &str, args: Vec<Argument>) -> Atom {
        Atom::new(QualifiedName::new(name), args, span())
    }

    #[test]
    fn test_arguments_nested_in_aggregate_are_visited() {
        let agg = Argument::new(
            ArgumentKind::Aggregate {
                op: AggregateOp::Sum,
                target: Some(Box::new(Argument::variable("y", span()))),
                body: vec![Literal::Atom(atom(
                    "q",
                    vec![Argument::variable("y", span())],
                ))],
            },
            span(),
        );
        let clause = Clause::new(
            atom("p", vec![Argument::variable("x", span())]),
            vec![Literal::Constraint(crate::BinaryConstraint {
                op: ComparisonOp::Equal,
                lhs: Argument::variable("x", span()),
                rhs: agg,
                span: span(),
            })],
            span(),
        );

        let mut count = 0;
        for_each_argument(&clause, &mut |_| count += 1);
        // head x, constraint x, aggregate, target y, body y
        assert_eq!(count, 5);

        let mut atoms = Vec::new();
        for_each_atom(&clause, &mut |a| atoms.push(a.name.to_string()));
        assert_eq!(atoms, vec!["p", "q"]);
    }

    #[test]
    fn test_functor_arguments_are_visited() {
        let clause = Clause::fact(
            atom(
                "p",
                vec![Argument::new(
                    ArgumentKind::IntrinsicFunctor {
                        op: crate::FunctorOp::Add,
                        args: vec![
                            Argument::variable("x", span()),
                            Argument::number(1, span()),
                        ],
                    },
                    span(),
                )],
            ),
            span(),
        );
        let mut count = 0;
        for_each_argument(&clause, &mut |_| count += 1);
        assert_eq!(count, 3);
    }
}
