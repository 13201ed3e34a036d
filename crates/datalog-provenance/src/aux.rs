use crate::ProvenanceMode;
use datalog_ast::Program;

/// The number of auxiliary columns the provenance transformation appends to
/// every relation.
///
/// Rule number and level number are always present. Subtree-heights mode
/// adds one sub-level slot per body atom, sized program-wide so that every
/// instrumented relation shares one layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxiliaryArity {
    arity: usize,
}

impl AuxiliaryArity {
    pub fn compute(program: &Program, mode: ProvenanceMode) -> Self {
        let arity = match mode {
            ProvenanceMode::SubtreeHeights => {
                let max_body_atoms = program
                    .all_clauses()
                    .map(|clause| clause.body_atoms().count())
                    .max()
                    .unwrap_or(0);
                2 + max_body_atoms
            }
            _ => 2,
        };
        AuxiliaryArity { arity }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The number of sub-level columns beyond rule and level number.
    pub fn sublevels(&self) -> usize {
        self.arity - 2
    }
}
