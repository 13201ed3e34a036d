use crate::{
    lookup::{CompId, ComponentLookup},
    TypeBinding,
};
use datalog_ast::{
    visit, ArgumentKind, Clause, Component, ComponentInit, Directive, DirectiveKind, Program,
    QualifiedName, Relation, TypeDecl, TypeDeclKind,
};
use datalog_diagnostics::{Diagnostic, ErrorReport};
use std::collections::{BTreeSet, HashMap};

/// Bound on nested instantiation; exceeding it is a fatal diagnostic at the
/// offending init.
pub const MAX_INSTANTIATION_DEPTH: usize = 1000;

/// The flattened content produced by one instantiation.
#[derive(Default)]
struct ComponentContent {
    types: Vec<TypeDecl>,
    relations: Vec<Relation>,
    directives: Vec<Directive>,
}

impl ComponentContent {
    fn add_type(&mut self, decl: TypeDecl, report: &mut ErrorReport) {
        if let Some(previous) = self.types.iter().find(|cur| cur.name == decl.name) {
            report.add_diagnostic(
                Diagnostic::error(format!("Redefinition of type {}", decl.name), decl.span)
                    .with_note("Previous definition", previous.span),
            );
        }
        self.types.push(decl);
    }

    fn add_relation(&mut self, relation: Relation, report: &mut ErrorReport) {
        if let Some(previous) = self.relations.iter().find(|cur| cur.name == relation.name) {
            report.add_diagnostic(
                Diagnostic::error(
                    format!("Redefinition of relation {}", relation.name),
                    relation.span,
                )
                .with_note("Previous definition", previous.span),
            );
        }
        self.relations.push(relation);
    }

    fn add_directive(&mut self, directive: Directive, report: &mut ErrorReport) {
        // loads and printsizes are deduplicated; stores may repeat
        if directive.kind != DirectiveKind::Store {
            let previous = self
                .directives
                .iter()
                .find(|cur| cur.kind == directive.kind && cur.name == directive.name);
            if let Some(previous) = previous {
                report.add_diagnostic(
                    Diagnostic::error(
                        format!("Redefinition of IO directive {}", directive.name),
                        directive.span,
                    )
                    .with_note("Previous definition", previous.span),
                );
            }
        }
        self.directives.push(directive);
    }

    fn merge(&mut self, other: ComponentContent, report: &mut ErrorReport) {
        for decl in other.types {
            self.add_type(decl, report);
        }
        for relation in other.relations {
            self.add_relation(relation, report);
        }
        for directive in other.directives {
            self.add_directive(directive, report);
        }
    }
}

/// Rewrite the type names a declaration refers to through `resolve`.
fn rewrite_type_decl_refs(decl: &mut TypeDecl, resolve: &impl Fn(&QualifiedName) -> Option<QualifiedName>) {
    match &mut decl.kind {
        TypeDeclKind::Subset(_) => {}
        TypeDeclKind::Union(elements) => {
            for element in elements {
                if let Some(new) = resolve(element) {
                    *element = new;
                }
            }
        }
        TypeDeclKind::Record(fields) => {
            for field in fields {
                if let Some(new) = resolve(&field.type_name) {
                    field.type_name = new;
                }
            }
        }
        TypeDeclKind::Sum(branches) => {
            for branch in branches {
                if let Some(new) = resolve(&branch.type_name) {
                    branch.type_name = new;
                }
            }
        }
    }
}

/// Rewrite type and relation references in a clause through the instance
/// name mappings: atom names, record-init tags, sum-init and cast targets.
fn rewrite_clause_refs(
    clause: &mut Clause,
    type_mapping: &HashMap<QualifiedName, QualifiedName>,
    relation_mapping: &HashMap<QualifiedName, QualifiedName>,
) {
    visit::for_each_atom_mut(clause, &mut |atom| {
        if let Some(new) = relation_mapping.get(&atom.name) {
            atom.name = new.clone();
        }
    });
    visit::for_each_argument_mut(clause, &mut |arg| {
        let type_name = match &mut arg.kind {
            ArgumentKind::RecordInit {
                type_name: Some(type_name),
                ..
            } => type_name,
            ArgumentKind::SumInit { type_name, .. } => type_name,
            ArgumentKind::TypeCast { type_name, .. } => type_name,
            _ => return,
        };
        if let Some(new) = type_mapping.get(type_name) {
            *type_name = new.clone();
        }
    });
}

/// Collects clones of all the content of `component` and its bases.
#[allow(clippy::too_many_arguments)]
fn collect_content(
    component: &Component,
    binding: &TypeBinding,
    enclosing: Option<CompId>,
    lookup: &ComponentLookup,
    res: &mut ComponentContent,
    orphans: &mut Vec<Clause>,
    overridden: &BTreeSet<datalog_ast::Symbol>,
    report: &mut ErrorReport,
    max_depth: usize,
) {
    // start with the content of the base components
    for base in &component.base_components {
        let base_id = match lookup.get(enclosing, base.name, binding) {
            Some(id) => id,
            None => continue,
        };
        let base_component = lookup.component(base_id);

        // link formal with actual type parameters
        let active = binding.extend(&base_component.ty.type_params, &base.type_params);

        for init in &base_component.instantiations {
            let content = get_instantiated_content(
                init,
                enclosing,
                lookup,
                orphans,
                report,
                &active,
                max_depth - 1,
            );
            res.merge(content, report);
        }

        // a name overridden here suppresses the base's clauses for it
        let mut super_overridden = overridden.clone();
        super_overridden.extend(component.overridden.iter().copied());
        collect_content(
            base_component,
            &active,
            Some(base_id),
            lookup,
            res,
            orphans,
            &super_overridden,
            report,
            max_depth,
        );
    }

    // local types, with parameter references instantiated
    for decl in &component.types {
        let mut decl = decl.clone();
        rewrite_type_decl_refs(&mut decl, &|name| binding.find(name));
        res.add_type(decl, report);
    }

    // local relations, with attribute types instantiated
    for relation in &component.relations {
        let mut relation = relation.clone();
        for attr in &mut relation.attributes {
            if let Some(new) = binding.find(&attr.type_name) {
                attr.type_name = new;
            }
        }
        res.add_relation(relation, report);
    }

    for directive in &component.directives {
        res.add_directive(directive.clone(), report);
    }

    // index the accumulated relations and attach the local clauses
    let mut index: HashMap<QualifiedName, usize> = HashMap::new();
    for (position, relation) in res.relations.iter().enumerate() {
        index.insert(relation.name.clone(), position);
    }

    for clause in &component.clauses {
        if overridden.contains(&clause.head.name.first()) {
            continue;
        }
        match index.get(&clause.head.name) {
            Some(&position) => res.relations[position].add_clause(clause.clone()),
            None => orphans.push(clause.clone()),
        }
    }

    // reseat any orphans that resolve at this level
    let mut remaining = Vec::new();
    for clause in orphans.drain(..) {
        match index.get(&clause.head.name) {
            Some(&position) => res.relations[position].add_clause(clause),
            None => remaining.push(clause),
        }
    }
    *orphans = remaining;
}

/// Recursively computes the content introduced by one init statement within
/// the given scope.
fn get_instantiated_content(
    init: &ComponentInit,
    enclosing: Option<CompId>,
    lookup: &ComponentLookup,
    orphans: &mut Vec<Clause>,
    report: &mut ErrorReport,
    binding: &TypeBinding,
    max_depth: usize,
) -> ComponentContent {
    let mut res = ComponentContent::default();

    if max_depth == 0 {
        report.add_error("Component instantiation limit reached", init.span);
        return res;
    }

    // an unresolved component reference triggers a later semantic error
    let component_id = match lookup.get(enclosing, init.component.name, binding) {
        Some(id) => id,
        None => return res,
    };
    let component = lookup.component(component_id);

    let active = binding.extend(&component.ty.type_params, &init.component.type_params);

    // nested instantiations first
    for nested in &component.instantiations {
        let content = get_instantiated_content(
            nested,
            Some(component_id),
            lookup,
            orphans,
            report,
            &active,
            max_depth - 1,
        );
        res.merge(content, report);
    }

    collect_content(
        component,
        &active,
        enclosing,
        lookup,
        &mut res,
        orphans,
        &BTreeSet::new(),
        report,
        max_depth,
    );

    // scope every accumulated type and relation under the instance name
    let mut type_mapping = HashMap::new();
    for decl in &mut res.types {
        let new_name = decl.name.prefixed(init.instance_name);
        type_mapping.insert(decl.name.clone(), new_name.clone());
        decl.name = new_name;
    }

    let mut relation_mapping = HashMap::new();
    for relation in &mut res.relations {
        let new_name = relation.name.prefixed(init.instance_name);
        relation_mapping.insert(relation.name.clone(), new_name.clone());
        relation.name = new_name;
    }

    for relation in &mut res.relations {
        for attr in &mut relation.attributes {
            if let Some(new) = type_mapping.get(&attr.type_name) {
                attr.type_name = new.clone();
            }
        }
        for clause in &mut relation.clauses {
            rewrite_clause_refs(clause, &type_mapping, &relation_mapping);
        }
    }

    for clause in orphans.iter_mut() {
        rewrite_clause_refs(clause, &type_mapping, &relation_mapping);
    }

    for directive in &mut res.directives {
        if let Some(new) = relation_mapping.get(&directive.name) {
            directive.name = new.clone();
        }
    }

    for decl in &mut res.types {
        rewrite_type_decl_refs(decl, &|name| type_mapping.get(name).cloned());
    }

    res
}

/// Expand every top-level instantiation, attach clauses to their head
/// relations, and leave the program component-free with freshly numbered
/// argument ids.
pub fn instantiate_components(program: &mut Program, report: &mut ErrorReport) {
    let components = std::mem::take(&mut program.components);
    let instantiations = std::mem::take(&mut program.instantiations);
    let lookup = ComponentLookup::new(&components);

    // clauses whose head relation never appears
    let mut unbound: Vec<Clause> = Vec::new();

    for init in &instantiations {
        let mut orphans = Vec::new();
        let content = get_instantiated_content(
            init,
            None,
            &lookup,
            &mut orphans,
            report,
            &TypeBinding::new(),
            MAX_INSTANTIATION_DEPTH,
        );
        for decl in content.types {
            program.add_type(decl);
        }
        for relation in content.relations {
            program.add_relation(relation);
        }
        for directive in content.directives {
            program.directives.push(directive);
        }
        for clause in orphans {
            match program.relation_mut(&clause.head.name) {
                Some(relation) => relation.add_clause(clause),
                None => unbound.push(clause),
            }
        }
    }

    // attach the program's own clauses
    for clause in std::mem::take(&mut program.clauses) {
        match program.relation_mut(&clause.head.name) {
            Some(relation) => relation.add_clause(clause),
            None => unbound.push(clause),
        }
    }
    program.clauses = unbound;

    program.number_arguments();
}
