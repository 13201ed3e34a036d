//! `Display` impls producing the surface syntax of AST nodes, used for
//! diagnostics, debug dumps, and the provenance clause representation.

use crate::{
    Argument, ArgumentKind, Atom, BinaryConstraint, Clause, Constant, Literal,
};
use std::fmt;

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::String(s) => write!(f, "\"{}\"", s),
            Constant::Number(n) => write!(f, "{}", n),
            Constant::Unsigned(n) => write!(f, "{}", n),
            Constant::Float(x) => write!(f, "{}", x),
            Constant::Nil => write!(f, "nil"),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ArgumentKind::Variable(name) => write!(f, "{}", name),
            ArgumentKind::UnnamedVariable => write!(f, "_"),
            ArgumentKind::Counter => write!(f, "$"),
            ArgumentKind::Constant(constant) => write!(f, "{}", constant),
            ArgumentKind::IntrinsicFunctor { op, args } => {
                if args.len() == 2 && !op.name().starts_with(|c: char| c.is_alphabetic()) {
                    write!(f, "({} {} {})", args[0], op.name(), args[1])
                } else {
                    write!(f, "{}(", op.name())?;
                    write_args(f, args)?;
                    write!(f, ")")
                }
            }
            ArgumentKind::UserFunctor { name, args } => {
                write!(f, "@{}(", name)?;
                write_args(f, args)?;
                write!(f, ")")
            }
            ArgumentKind::RecordInit { args, .. } => {
                write!(f, "[")?;
                write_args(f, args)?;
                write!(f, "]")
            }
            ArgumentKind::SumInit { branch, arg, .. } => write!(f, "${}({})", branch, arg),
            ArgumentKind::TypeCast { arg, type_name } => write!(f, "as({}, {})", arg, type_name),
            ArgumentKind::Aggregate { op, target, body } => {
                write!(f, "{}", op.name())?;
                if let Some(target) = target {
                    write!(f, " {}", target)?;
                }
                write!(f, " : {{ ")?;
                let mut first = true;
                for literal in body {
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{}", literal)?;
                }
                write!(f, " }}")
            }
        }
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[Argument]) -> fmt::Result {
    let mut first = true;
    for arg in args {
        if !first {
            write!(f, ",")?;
        }
        first = false;
        write!(f, "{}", arg)?;
    }
    Ok(())
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_args(f, &self.args)?;
        write!(f, ")")
    }
}

impl fmt::Display for BinaryConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.lhs, self.op.symbol(), self.rhs)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Atom(atom) => write!(f, "{}", atom),
            Literal::Negation(atom) => write!(f, "!{}", atom),
            Literal::Constraint(constraint) => write!(f, "{}", constraint),
        }
    }
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.head)?;
        if !self.is_fact() {
            write!(f, " :- ")?;
            let mut first = true;
            for literal in &self.body {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{}", literal)?;
            }
        }
        write!(f, ".")
    }
}
