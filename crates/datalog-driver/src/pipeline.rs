use crate::Config;
use datalog_ast::Program;
use datalog_components::instantiate_components;
use datalog_diagnostics::ErrorReport;
use datalog_inference::{analyse_types, TypeAnalysis};
use datalog_provenance::{transform_provenance, ProvenanceMode};
use datalog_types::{build_type_environment, TypeEnvironment};

/// The unit of compilation: the program being transformed together with
/// everything the passes produce for it. Owns all of it for the pipeline's
/// duration; passes communicate only through these fields.
pub struct TranslationUnit {
    pub program: Program,
    pub type_env: Option<TypeEnvironment>,
    pub type_analysis: Option<TypeAnalysis>,
    pub report: ErrorReport,
}

impl TranslationUnit {
    pub fn new(program: Program) -> Self {
        TranslationUnit {
            program,
            type_env: None,
            type_analysis: None,
            report: ErrorReport::new(),
        }
    }

    pub fn ok(&self) -> bool {
        !self.report.has_errors()
    }
}

/// Run the front-end pipeline: type environment, component instantiation,
/// type inference, provenance. The pipeline stops after the first pass that
/// leaves an error in the report; the partially transformed unit is
/// returned with its diagnostics.
pub fn compile(program: Program, config: &Config) -> TranslationUnit {
    let mut unit = TranslationUnit::new(program);

    // type environment
    let env = build_type_environment(&unit.program, &mut unit.report);
    unit.type_env = Some(env);
    if unit.report.has_errors() {
        return unit;
    }

    // component instantiation
    instantiate_components(&mut unit.program, &mut unit.report);
    if unit.report.has_errors() {
        return unit;
    }

    // instantiation introduces scoped copies of component types, so the
    // environment the inference sees is rebuilt over the flattened program;
    // its diagnostics were already reported above
    let mut rebuild_report = ErrorReport::new();
    let env = build_type_environment(&unit.program, &mut rebuild_report);

    // type inference
    let analysis = analyse_types(
        &unit.program,
        &env,
        &mut unit.report,
        config.wants_type_analysis_debug(),
    );
    unit.type_env = Some(env);
    unit.type_analysis = Some(analysis);
    if unit.report.has_errors() {
        return unit;
    }

    // provenance
    if config.provenance != ProvenanceMode::None {
        transform_provenance(&mut unit.program, config.provenance);
    }

    unit
}

#[cfg(test)]
mod tests {
    use super::*;
    use datalog_ast::{
        sym, Argument, Atom, Attribute, Clause, Component, ComponentInit, ComponentType, Literal,
        QualifiedName, Relation, Span, SumBranch, TypeDecl, TypeDeclKind,
    };

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

    /// `.comp Graph<T> { .decl edge(x:T,y:T) .decl path(x:T,y:T)
    ///  path(x,y) :- edge(x,y). }  .init g = Graph<number>`
    fn component_program() -> Program {
        let mut graph = Component::new(
            ComponentType {
                name: sym("Graph"),
                type_params: vec![name("T")],
                span: span(),
            },
            span(),
        );
        graph.relations.push(relation("edge", &[("x", "T"), ("y", "T")]));
        graph.relations.push(relation("path", &[("x", "T"), ("y", "T")]));
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
        program
    }

    #[test]
    fn test_full_pipeline() {
        let mut config = Config::default();
        config.provenance = ProvenanceMode::Explain;

        let unit = compile(component_program(), &config);
        assert!(unit.ok(), "diagnostics: {}", unit.report);

        // flattened and instrumented
        assert!(unit.program.components.is_empty());
        let path = unit.program.relation(&name("g.path")).unwrap();
        assert_eq!(path.arity(), 4); // x, y, @rule_number, @level_number
        assert!(unit.program.relation(&name("g.path.@info.1")).is_some());

        // every argument occurrence of the instantiated clause was typed
        let analysis = unit.type_analysis.as_ref().unwrap();
        assert!(!analysis.argument_types.is_empty());
    }

    #[test]
    fn test_pipeline_without_provenance_leaves_relations_alone() {
        let unit = compile(component_program(), &Config::default());
        assert!(unit.ok());
        assert_eq!(unit.program.relation(&name("g.path")).unwrap().arity(), 2);
    }

    #[test]
    fn test_abort_after_environment_errors() {
        let mut program = Program::new();
        program.types.push(TypeDecl {
            name: name("S"),
            kind: TypeDeclKind::Sum(vec![
                SumBranch {
                    name: sym("a"),
                    type_name: name("number"),
                    span: span(),
                },
                SumBranch {
                    name: sym("a"),
                    type_name: name("number"),
                    span: span(),
                },
            ]),
            span: span(),
        });
        program.components.push(Component::new(
            ComponentType {
                name: sym("C"),
                type_params: vec![],
                span: span(),
            },
            span(),
        ));

        let unit = compile(program, &Config::default());
        assert!(!unit.ok());
        // instantiation never ran
        assert!(!unit.program.components.is_empty());
        assert!(unit.type_analysis.is_none());
    }

    #[test]
    fn test_abort_after_inference_errors() {
        let mut config = Config::default();
        config.provenance = ProvenanceMode::Explain;

        let mut program = Program::new();
        program.relations.push(relation("p", &[("x", "number")]));
        program.relations.push(relation("s", &[("x", "symbol")]));
        program.clauses.push(Clause::new(
            atom("p", &["x"]),
            vec![Literal::Atom(atom("s", &["x"]))],
            span(),
        ));

        let unit = compile(program, &config);
        assert!(!unit.ok());
        // provenance never ran: no auxiliary columns were added
        assert_eq!(unit.program.relation(&name("p")).unwrap().arity(), 1);
    }

    #[test]
    fn test_instantiation_overflow_aborts() {
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
        assert!(unit.type_analysis.is_none());
    }
}
