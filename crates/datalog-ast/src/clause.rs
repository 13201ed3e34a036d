use crate::{Argument, ComparisonOp, QualifiedName, Span};
use std::collections::BTreeMap;

/// An atom: `R(arg1, ..., argN)`
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub name: QualifiedName,
    pub args: Vec<Argument>,
    pub span: Span,
}

impl Atom {
    pub fn new(name: QualifiedName, args: Vec<Argument>, span: Span) -> Self {
        Atom { name, args, span }
    }

    pub fn arity(&self) -> usize {
        self.args.len()
    }
}

/// A binary constraint: `lhs op rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryConstraint {
    pub op: ComparisonOp,
    pub lhs: Argument,
    pub rhs: Argument,
    pub span: Span,
}

/// A body literal
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Atom(Atom),
    Negation(Atom),
    Constraint(BinaryConstraint),
}

impl Literal {
    /// The underlying atom, for positive and negated literals.
    pub fn atom(&self) -> Option<&Atom> {
        match self {
            Literal::Atom(atom) | Literal::Negation(atom) => Some(atom),
            Literal::Constraint(_) => None,
        }
    }

    pub fn is_positive(&self) -> bool {
        matches!(self, Literal::Atom(_))
    }
}

/// A user-supplied schedule for a clause's body atoms, carried through the
/// pipeline untouched. Keyed by recursion version.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionPlan {
    pub orders: BTreeMap<u32, Vec<u32>>,
}

/// A clause: a head atom derived from a (possibly empty) body.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub head: Atom,
    pub body: Vec<Literal>,
    pub plan: Option<ExecutionPlan>,
    pub span: Span,
}

impl Clause {
    pub fn new(head: Atom, body: Vec<Literal>, span: Span) -> Self {
        Clause {
            head,
            body,
            plan: None,
            span,
        }
    }

    pub fn fact(head: Atom, span: Span) -> Self {
        Clause::new(head, Vec::new(), span)
    }

    /// A fact is a headed atom with no body.
    pub fn is_fact(&self) -> bool {
        self.body.is_empty()
    }

    /// Positive body atoms, in body order.
    pub fn body_atoms(&self) -> impl Iterator<Item = &Atom> {
        self.body.iter().filter_map(|lit| match lit {
            Literal::Atom(atom) => Some(atom),
            _ => None,
        })
    }
}
