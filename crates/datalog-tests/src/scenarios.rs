//! End-to-end scenarios through the full front-end pipeline.

use datalog_ast::{
    sym, visit, ArgId, Argument, ArgumentKind, Atom, Attribute, Clause, Component, ComponentInit,
    ComponentType, Constant, FunctorOp, Literal, Program, QualifiedName, Relation, Span, TypeAttr,
    TypeDecl, TypeDeclKind,
};
use datalog_driver::{compile, Config, TranslationUnit};
use datalog_provenance::ProvenanceMode;
use datalog_types::{build_type_environment, is_subtype};

fn span() -> Span {
    Span::none()
}

fn name(text: &str) -> QualifiedName {
    QualifiedName::new(text)
}

fn relation(text: &str, attrs: &[(&str, &str)]) -> Relation {
    Relation::new(
        name(text),
        attrs
            .iter()
            .map(|(attr, ty)| Attribute::new(*attr, name(ty), span()))
            .collect(),
        span(),
    )
}

fn atom(text: &str, vars: &[&str]) -> Atom {
    Atom::new(
        name(text),
        vars.iter()
            .map(|var| Argument::variable(*var, span()))
            .collect(),
        span(),
    )
}

fn subset(text: &str, attr: TypeAttr) -> TypeDecl {
    TypeDecl {
        name: name(text),
        kind: TypeDeclKind::Subset(attr),
        span: span(),
    }
}

/// The first occurrence of a named variable in a relation's clause.
fn find_var(unit: &TranslationUnit, rel: &str, clause_index: usize, var_name: &str) -> ArgId {
    let clause = &unit.program.relation(&name(rel)).unwrap().clauses[clause_index];
    let mut found = None;
    visit::for_each_argument(clause, &mut |arg| {
        if let ArgumentKind::Variable(v) = &arg.kind {
            if v.as_ref() == var_name && found.is_none() {
                found = Some(arg.id);
            }
        }
    });
    found.expect("variable not found")
}

fn var_types(unit: &TranslationUnit, rel: &str, clause_index: usize, var_name: &str) -> String {
    let id = find_var(unit, rel, clause_index, var_name);
    let env = unit.type_env.as_ref().unwrap();
    unit.type_analysis
        .as_ref()
        .unwrap()
        .types_of(id)
        .unwrap()
        .render(env)
}

/// S1: every variable of the transitive closure types to `{number}`.
#[test]
fn transitive_closure_typing() {
    let mut program = Program::new();
    program
        .relations
        .push(relation("e", &[("x", "number"), ("y", "number")]));
    program
        .relations
        .push(relation("p", &[("x", "number"), ("y", "number")]));
    program.clauses.push(Clause::new(
        atom("p", &["x", "y"]),
        vec![Literal::Atom(atom("e", &["x", "y"]))],
        span(),
    ));
    program.clauses.push(Clause::new(
        atom("p", &["x", "z"]),
        vec![
            Literal::Atom(atom("e", &["x", "y"])),
            Literal::Atom(atom("p", &["y", "z"])),
        ],
        span(),
    ));

    let unit = compile(program, &Config::default());
    assert!(unit.ok(), "diagnostics: {}", unit.report);
    assert!(unit.report.is_empty());

    // both clauses preserved, attached to p
    assert_eq!(unit.program.relation(&name("p")).unwrap().clauses.len(), 2);

    for var in ["x", "y"] {
        assert_eq!(var_types(&unit, "p", 0, var), "{number}");
    }
    for var in ["x", "y", "z"] {
        assert_eq!(var_types(&unit, "p", 1, var), "{number}");
    }
}

/// S2: a symbol constant flows into a union of symbol subsets.
#[test]
fn union_subtyping() {
    let mut program = Program::new();
    program.types.push(TypeDecl {
        name: name("A"),
        kind: TypeDeclKind::Union(vec![name("B"), name("C")]),
        span: span(),
    });
    program.types.push(subset("B", TypeAttr::Symbol));
    program.types.push(subset("C", TypeAttr::Symbol));
    program.relations.push(relation("r", &[("a", "A")]));
    program.clauses.push(Clause::fact(
        Atom::new(name("r"), vec![Argument::string("hi", span())], span()),
        span(),
    ));

    let unit = compile(program, &Config::default());
    assert!(unit.ok(), "diagnostics: {}", unit.report);

    let env = unit.type_env.as_ref().unwrap();
    let a = env.get(&name("A")).unwrap();
    let b = env.get(&name("B")).unwrap();
    let symbol = env.symbol_type();

    // the union admits its elements, not the whole symbol universe
    assert!(!is_subtype(env, symbol, a));
    assert!(is_subtype(env, b, a));
    assert!(is_subtype(env, a, symbol));

    // the constant solved to a single symbol-rooted type
    let clause = &unit.program.relation(&name("r")).unwrap().clauses[0];
    let types = unit
        .type_analysis
        .as_ref()
        .unwrap()
        .types_of(clause.head.args[0].id)
        .unwrap();
    assert_eq!(types.render(env), "{A}");
    assert!(datalog_types::is_symbol_type_set(env, types));
}

/// S3: component instantiation flattens `Graph<number>` into `g.*`.
#[test]
fn component_instantiation() {
    let mut graph = Component::new(
        ComponentType {
            name: sym("Graph"),
            type_params: vec![name("T")],
            span: span(),
        },
        span(),
    );
    graph
        .relations
        .push(relation("edge", &[("x", "T"), ("y", "T")]));
    graph
        .relations
        .push(relation("path", &[("x", "T"), ("y", "T")]));
    graph.clauses.push(Clause::new(
        atom("path", &["x", "y"]),
        vec![Literal::Atom(atom("edge", &["x", "y"]))],
        span(),
    ));

    let mut program = Program::new();
    program.components.push(graph);
    program.instantiations.push(ComponentInit {
        instance_name: sym("g"),
        component: ComponentType {
            name: sym("Graph"),
            type_params: vec![name("number")],
            span: span(),
        },
        span: span(),
    });

    let unit = compile(program, &Config::default());
    assert!(unit.ok(), "diagnostics: {}", unit.report);

    assert!(unit.program.components.is_empty());
    assert!(unit.program.instantiations.is_empty());

    for rel in ["g.edge", "g.path"] {
        let relation = unit.program.relation(&name(rel)).expect(rel);
        assert_eq!(relation.attributes[0].type_name, name("number"));
        assert_eq!(relation.attributes[1].type_name, name("number"));
    }

    let path = unit.program.relation(&name("g.path")).unwrap();
    assert_eq!(path.clauses.len(), 1);
    assert_eq!(path.clauses[0].head.name, name("g.path"));
    assert_eq!(path.clauses[0].body[0].atom().unwrap().name, name("g.edge"));
}

/// S4: a self-instantiating component exhausts the depth limit with a
/// single diagnostic and aborts the pipeline.
#[test]
fn instantiation_overflow() {
    let mut looping = Component::new(
        ComponentType {
            name: sym("A"),
            type_params: vec![],
            span: span(),
        },
        span(),
    );
    looping.instantiations.push(ComponentInit {
        instance_name: sym("x"),
        component: ComponentType {
            name: sym("A"),
            type_params: vec![],
            span: span(),
        },
        span: span(),
    });

    let mut program = Program::new();
    program.components.push(looping);
    program.instantiations.push(ComponentInit {
        instance_name: sym("a"),
        component: ComponentType {
            name: sym("A"),
            type_params: vec![],
            span: span(),
        },
        span: span(),
    });

    let unit = compile(program, &Config::default());
    assert!(!unit.ok());
    assert_eq!(unit.report.num_errors(), 1);
    assert_eq!(
        unit.report.iter().next().unwrap().primary.message,
        "Component instantiation limit reached"
    );
    // the pipeline aborted before inference
    assert!(unit.type_analysis.is_none());
}

/// S5: provenance rewrite in max-height mode.
#[test]
fn provenance_rewrite() {
    let mut program = Program::new();
    program.relations.push(relation("p", &[("x", "number")]));
    program.clauses.push(Clause::fact(
        Atom::new(name("p"), vec![Argument::number(1, span())], span()),
        span(),
    ));
    program.clauses.push(Clause::new(
        atom("p", &["x"]),
        vec![Literal::Atom(atom("p", &["x"]))],
        span(),
    ));

    let mut config = Config::default();
    config.provenance = ProvenanceMode::Explain;
    let unit = compile(program, &config);
    assert!(unit.ok(), "diagnostics: {}", unit.report);

    let p = unit.program.relation(&name("p")).unwrap();
    let attr_names: Vec<&str> = p
        .attributes
        .iter()
        .map(|attr| attr.name.as_ref().as_str())
        .collect();
    assert_eq!(attr_names, vec!["x", "@rule_number", "@level_number"]);

    // the fact head ends with (0, 0)
    let fact = &p.clauses[0];
    assert!(matches!(
        fact.head.args[1].kind,
        ArgumentKind::Constant(Constant::Number(0))
    ));
    assert!(matches!(
        fact.head.args[2].kind,
        ArgumentKind::Constant(Constant::Number(0))
    ));

    // the rule head ends with (1, @level_num_0 + 1)
    let rule = &p.clauses[1];
    assert!(matches!(
        rule.head.args[1].kind,
        ArgumentKind::Constant(Constant::Number(1))
    ));
    match &rule.head.args[2].kind {
        ArgumentKind::IntrinsicFunctor { op, args } => {
            assert_eq!(*op, FunctorOp::Add);
            assert!(
                matches!(&args[0].kind, ArgumentKind::Variable(v) if v.as_ref() == "@level_num_0")
            );
            assert!(matches!(
                args[1].kind,
                ArgumentKind::Constant(Constant::Number(1))
            ));
        }
        other => panic!("expected level expression, got {:?}", other),
    }

    // and its body atom with (_, @level_num_0)
    let body = rule.body[0].atom().unwrap();
    assert!(matches!(body.args[1].kind, ArgumentKind::UnnamedVariable));
    assert!(matches!(&body.args[2].kind, ArgumentKind::Variable(v) if v.as_ref() == "@level_num_0"));
}

/// S6: a negated atom constrains upward, not downward.
#[test]
fn negation_supertype_direction() {
    let mut program = Program::new();
    program.types.push(subset("A", TypeAttr::Signed));
    program.relations.push(relation("r", &[("x", "A")]));
    program.relations.push(relation("q", &[("x", "number")]));
    program.clauses.push(Clause::new(
        atom("q", &["x"]),
        vec![Literal::Negation(atom("r", &["x"]))],
        span(),
    ));

    let unit = compile(program, &Config::default());
    assert!(unit.ok(), "diagnostics: {}", unit.report);

    let env = unit.type_env.as_ref().unwrap();
    let id = find_var(&unit, "q", 0, "x");
    let types = unit.type_analysis.as_ref().unwrap().types_of(id).unwrap();
    assert!(types.contains(env.number_type()));
    let a = env.get(&name("A")).unwrap();
    assert_ne!(types, &datalog_types::TypeSet::singleton(a));
}

/// Provenance round trip: every relation gains exactly the auxiliary
/// arity, and every rule head carries the full aux tuple.
#[test]
fn provenance_round_trip_arities() {
    let mut program = Program::new();
    program
        .relations
        .push(relation("e", &[("x", "number"), ("y", "number")]));
    program
        .relations
        .push(relation("p", &[("x", "number"), ("y", "number")]));
    program.clauses.push(Clause::new(
        atom("p", &["x", "z"]),
        vec![
            Literal::Atom(atom("e", &["x", "y"])),
            Literal::Atom(atom("p", &["y", "z"])),
        ],
        span(),
    ));

    let mut config = Config::default();
    config.provenance = ProvenanceMode::SubtreeHeights;
    let unit = compile(program, &config);
    assert!(unit.ok(), "diagnostics: {}", unit.report);

    // aux arity = 2 + widest body (2 atoms) = 4
    for rel in ["e", "p"] {
        assert_eq!(unit.program.relation(&name(rel)).unwrap().arity(), 2 + 4);
    }

    let p = unit.program.relation(&name("p")).unwrap();
    let head = &p.clauses[0].head;
    // x, z, rule number, level, two sub-levels
    assert_eq!(head.args.len(), 6);
}

/// The environment builder never re-registers the predefined roots.
#[test]
fn predefined_types_are_never_redefined() {
    let mut program = Program::new();
    program.types.push(subset("A", TypeAttr::Signed));

    let mut report = datalog_diagnostics::ErrorReport::new();
    let env = build_type_environment(&program, &mut report);
    for root in ["number", "unsigned", "float", "symbol"] {
        assert!(env.is_type(&name(root)));
    }
}
