use crate::AuxiliaryArity;
use datalog_ast::{
    Argument, ArgumentKind, Atom, Attribute, Clause, FunctorOp, Literal, Program, QualifiedName,
    Relation, RelationRepresentation, Span,
};

/// Provenance instrumentation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProvenanceMode {
    /// No instrumentation; the transformation is skipped entirely.
    #[default]
    None,
    Explain,
    Explore,
    /// Track per-literal subtree heights in addition to the proof level.
    SubtreeHeights,
}

/// Instrument the program according to `mode`.
pub fn transform_provenance(program: &mut Program, mode: ProvenanceMode) {
    match mode {
        ProvenanceMode::None => {}
        ProvenanceMode::SubtreeHeights => {
            let aux = AuxiliaryArity::compute(program, mode);
            instrument(program, aux, "@level_number_");
        }
        ProvenanceMode::Explain | ProvenanceMode::Explore => {
            let aux = AuxiliaryArity::compute(program, ProvenanceMode::Explain);
            instrument(program, aux, "@level_num_");
        }
    }
}

fn instrument(program: &mut Program, aux: AuxiliaryArity, level_prefix: &str) {
    // explicitly expand equivalence relations first so their clauses are
    // instrumented like any other
    for relation in &mut program.relations {
        if relation.representation == RelationRepresentation::Eqrel {
            transform_eqrel_relation(relation);
        }
    }

    // snapshot: the info relations synthesised below must not themselves be
    // instrumented
    let names: Vec<QualifiedName> = program
        .relations
        .iter()
        .map(|relation| relation.name.clone())
        .collect();

    // record the original rules before any columns are added
    let mut info_relations = Vec::new();
    for name in &names {
        let relation = program.relation(name).unwrap();
        for (index, clause) in relation.clauses.iter().enumerate() {
            if !clause.is_fact() {
                info_relations.push(make_info_relation(clause, relation.clause_num(index)));
            }
        }
    }

    for name in &names {
        let relation = program.relation_mut(name).unwrap();

        relation.attributes.push(Attribute::new(
            "@rule_number",
            QualifiedName::new("number"),
            Span::none(),
        ));
        relation.attributes.push(Attribute::new(
            "@level_number",
            QualifiedName::new("number"),
            Span::none(),
        ));
        for index in 0..aux.sublevels() {
            relation.attributes.push(Attribute::new(
                format!("@sublevel_number_{}", index),
                QualifiedName::new("number"),
                Span::none(),
            ));
        }

        let clause_nums: Vec<usize> = (0..relation.clauses.len())
            .map(|index| relation.clause_num(index))
            .collect();
        for (index, clause) in relation.clauses.iter_mut().enumerate() {
            rewrite_clause(clause, clause_nums[index], aux, level_prefix);
        }
    }

    program.relations.extend(info_relations);
}

/// Append the auxiliary columns to one clause: unnamed slots on every atom,
/// level variables on body atoms, and the rule/level/sub-level tuple on the
/// head.
fn rewrite_clause(clause: &mut Clause, clause_num: usize, aux: AuxiliaryArity, level_prefix: &str) {
    let span = Span::none();

    // atoms nested inside head arguments carry unnamed slots only
    for arg in &mut clause.head.args {
        instrument_argument(arg, aux.arity());
    }

    if clause.is_fact() {
        for _ in 0..aux.arity() {
            clause.head.args.push(Argument::number(0, span));
        }
        return;
    }

    let mut body_levels: Vec<String> = Vec::new();
    for (index, literal) in clause.body.iter_mut().enumerate() {
        match literal {
            Literal::Atom(atom) => {
                for arg in &mut atom.args {
                    instrument_argument(arg, aux.arity());
                }
                let level_var = format!("{}{}", level_prefix, index);
                atom.args.push(Argument::unnamed(span));
                atom.args.push(Argument::variable(level_var.clone(), span));
                for _ in 0..aux.sublevels() {
                    atom.args.push(Argument::unnamed(span));
                }
                body_levels.push(level_var);
            }
            Literal::Negation(atom) => instrument_atom(atom, aux.arity()),
            Literal::Constraint(constraint) => {
                instrument_argument(&mut constraint.lhs, aux.arity());
                instrument_argument(&mut constraint.rhs, aux.arity());
            }
        }
    }

    clause
        .head
        .args
        .push(Argument::number(clause_num as i64, span));
    clause.head.args.push(next_level_number(&body_levels));

    // the first sub-level slots reuse the body levels, the rest are padded
    let num_atoms = body_levels.len().min(aux.sublevels());
    for level_var in body_levels.iter().take(num_atoms) {
        clause
            .head
            .args
            .push(Argument::variable(level_var.clone(), span));
    }
    for _ in num_atoms..aux.sublevels() {
        clause.head.args.push(Argument::number(-1, span));
    }
}

/// `0` for an empty body, otherwise `max(levels) + 1` built as a right-fold
/// of binary `max` capped by a final `+ 1`.
fn next_level_number(levels: &[String]) -> Argument {
    let span = Span::none();
    if levels.is_empty() {
        return Argument::number(0, span);
    }

    let mut current = Argument::variable(levels[0].clone(), span);
    for level in &levels[1..] {
        current = Argument::new(
            ArgumentKind::IntrinsicFunctor {
                op: FunctorOp::Max,
                args: vec![current, Argument::variable(level.clone(), span)],
            },
            span,
        );
    }
    Argument::new(
        ArgumentKind::IntrinsicFunctor {
            op: FunctorOp::Add,
            args: vec![current, Argument::number(1, span)],
        },
        span,
    )
}

/// Append `columns` unnamed slots to every atom nested inside an argument.
fn instrument_argument(arg: &mut Argument, columns: usize) {
    match &mut arg.kind {
        ArgumentKind::IntrinsicFunctor { args, .. }
        | ArgumentKind::UserFunctor { args, .. }
        | ArgumentKind::RecordInit { args, .. } => {
            for sub in args {
                instrument_argument(sub, columns);
            }
        }
        ArgumentKind::SumInit { arg: sub, .. } | ArgumentKind::TypeCast { arg: sub, .. } => {
            instrument_argument(sub, columns);
        }
        ArgumentKind::Aggregate { target, body, .. } => {
            if let Some(target) = target {
                instrument_argument(target, columns);
            }
            for literal in body {
                instrument_literal(literal, columns);
            }
        }
        _ => {}
    }
}

fn instrument_literal(literal: &mut Literal, columns: usize) {
    match literal {
        Literal::Atom(atom) | Literal::Negation(atom) => instrument_atom(atom, columns),
        Literal::Constraint(constraint) => {
            instrument_argument(&mut constraint.lhs, columns);
            instrument_argument(&mut constraint.rhs, columns);
        }
    }
}

fn instrument_atom(atom: &mut Atom, columns: usize) {
    for arg in &mut atom.args {
        instrument_argument(arg, columns);
    }
    for _ in 0..columns {
        atom.args.push(Argument::unnamed(Span::none()));
    }
}

/// Rewrite an equivalence relation into an ordinary btree relation closed
/// under the three equivalence axioms.
fn transform_eqrel_relation(relation: &mut Relation) {
    assert_eq!(
        relation.representation,
        RelationRepresentation::Eqrel,
        "attempting to transform non-eqrel relation"
    );
    assert_eq!(relation.arity(), 2, "eqrel relation not binary");

    relation.representation = RelationRepresentation::Btree;
    let span = Span::none();
    let name = relation.name.clone();
    let atom = |vars: &[&str]| {
        Atom::new(
            name.clone(),
            vars.iter()
                .map(|var| Argument::variable(*var, span))
                .collect(),
            span,
        )
    };

    // A(x, z) :- A(x, y), A(y, z).
    relation.add_clause(Clause::new(
        atom(&["x", "z"]),
        vec![
            Literal::Atom(atom(&["x", "y"])),
            Literal::Atom(atom(&["y", "z"])),
        ],
        span,
    ));

    // A(x, y) :- A(y, x).
    relation.add_clause(Clause::new(
        atom(&["x", "y"]),
        vec![Literal::Atom(atom(&["y", "x"]))],
        span,
    ));

    // A(x, x) :- A(x, _).
    let mut reflexive_body = atom(&["x"]);
    reflexive_body.args.push(Argument::unnamed(span));
    relation.add_clause(Clause::new(
        atom(&["x", "x"]),
        vec![Literal::Atom(reflexive_body)],
        span,
    ));
}

/// Synthesise the `@info` relation describing one rule: its clause number,
/// head variables, a rendering of each body literal, and the rule text.
fn make_info_relation(clause: &Clause, clause_num: usize) -> Relation {
    let span = Span::none();
    let name = clause
        .head
        .name
        .with_segment("@info")
        .with_segment(clause_num.to_string());

    let mut info = Relation::new(name.clone(), Vec::new(), span);
    info.representation = RelationRepresentation::Info;

    let mut head = Atom::new(name, Vec::new(), span);

    info.attributes
        .push(Attribute::new("clause_num", QualifiedName::new("number"), span));
    head.args.push(Argument::number(clause_num as i64, span));

    // functor and aggregate arguments are numbered per clause
    let mut functor_number = 0usize;
    let mut aggregate_number = 0usize;
    let mut arg_info = |arg: &Argument| -> String {
        match &arg.kind {
            ArgumentKind::Variable(var) => var.to_string(),
            ArgumentKind::Constant(constant) => constant.to_string(),
            ArgumentKind::UnnamedVariable => "_".to_string(),
            ArgumentKind::Counter => "$".to_string(),
            ArgumentKind::IntrinsicFunctor { .. } | ArgumentKind::UserFunctor { .. } => {
                let text = format!("functor_{}", functor_number);
                functor_number += 1;
                text
            }
            ArgumentKind::Aggregate { .. } => {
                let text = format!("agg_{}", aggregate_number);
                aggregate_number += 1;
                text
            }
            _ => "_".to_string(),
        }
    };

    let head_vars: Vec<String> = clause.head.args.iter().map(&mut arg_info).collect();
    info.attributes
        .push(Attribute::new("head_vars", QualifiedName::new("symbol"), span));
    head.args.push(Argument::string(head_vars.join(","), span));

    for (index, literal) in clause.body.iter().enumerate() {
        let description = match literal {
            Literal::Atom(atom) => {
                let mut description = atom.name.to_string();
                for arg in &atom.args {
                    description.push(',');
                    description.push_str(&arg_info(arg));
                }
                description
            }
            Literal::Negation(atom) => format!("!{}", atom.name),
            Literal::Constraint(constraint) => format!(
                "{},{},{}",
                constraint.op.symbol(),
                arg_info(&constraint.lhs),
                arg_info(&constraint.rhs)
            ),
        };
        info.attributes.push(Attribute::new(
            format!("rel_{}", index),
            QualifiedName::new("symbol"),
            span,
        ));
        head.args.push(Argument::string(description, span));
    }

    info.attributes
        .push(Attribute::new("clause_repr", QualifiedName::new("symbol"), span));
    head.args.push(Argument::string(clause.to_string(), span));

    info.add_clause(Clause::fact(head, span));
    info
}
