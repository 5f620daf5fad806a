//! Relationship classification and PlantUML emission
//!
//! Every (source, target) pair gets at most one edge. Categories are tried in
//! precedence order (inherits, realizes, composes, aggregates, depends) and a
//! pair taken by a higher category is never emitted again. Composition and
//! aggregation also treat the reversed pair as a duplicate.
//!
//! Self-pairs are skipped, with one exception: a static self-typed field is
//! the singleton signal and shows up as `X o-- X`.

use serde::Serialize;
use std::collections::HashSet;

use crate::corpus::Corpus;
use crate::schema::{Entity, EntityKind, RelationshipKind};

/// A classified relationship between two corpus entities
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: RelationshipKind,
}

impl Edge {
    fn new(source: &str, target: &str, kind: RelationshipKind) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        }
    }

    /// PlantUML relationship line, without trailing newline
    pub fn to_plantuml(&self) -> String {
        format!("{} {} {}", self.source, self.kind.marker(), self.target)
    }
}

#[derive(Default)]
struct EdgeSet {
    edges: Vec<Edge>,
    /// (kind, source, target) already emitted
    seen: HashSet<(RelationshipKind, String, String)>,
    /// Directed pairs taken by any category
    pairs: HashSet<(String, String)>,
}

impl EdgeSet {
    fn try_add(&mut self, source: &str, target: &str, kind: RelationshipKind) -> bool {
        let pair = (source.to_string(), target.to_string());
        if self.pairs.contains(&pair) {
            return false;
        }
        if kind.is_undirected()
            && self
                .seen
                .contains(&(kind, target.to_string(), source.to_string()))
        {
            return false;
        }
        self.seen.insert((kind, pair.0.clone(), pair.1.clone()));
        self.pairs.insert(pair);
        self.edges.push(Edge::new(source, target, kind));
        true
    }
}

/// Classify every relationship in a finished corpus.
///
/// Edges come out grouped by source entity in corpus order, then by
/// category precedence, then by target name.
pub fn classify_relationships(corpus: &Corpus) -> Vec<Edge> {
    let mut set = EdgeSet::default();

    for entity in corpus.iter() {
        classify_entity(entity, corpus, &mut set);
    }

    set.edges
}

fn classify_entity(entity: &Entity, corpus: &Corpus, set: &mut EdgeSet) {
    let source = entity.name.as_str();
    let known_other = |target: &str| target != source && corpus.contains(target);

    if let Some(superclass) = entity.superclass.as_deref() {
        if known_other(superclass) {
            set.try_add(source, superclass, RelationshipKind::Inherits);
        }
    }

    for interface in &entity.interfaces {
        if known_other(interface) {
            set.try_add(source, interface, RelationshipKind::Realizes);
        }
    }

    let is_supertype = |target: &str| {
        entity.superclass.as_deref() == Some(target) || entity.interfaces.contains(target)
    };

    for target in &entity.composition_targets {
        if known_other(target) && !is_supertype(target) {
            set.try_add(source, target, RelationshipKind::Composes);
        }
    }

    for target in &entity.aggregation_targets {
        let singleton = target == source;
        if (singleton || known_other(target)) && !is_supertype(target) {
            set.try_add(source, target, RelationshipKind::Aggregates);
        }
    }

    let already_shown = entity.structural_targets();
    for target in &entity.efferent_targets {
        if known_other(target) && !already_shown.contains(target.as_str()) {
            set.try_add(source, target, RelationshipKind::Depends);
        }
    }
}

fn node_header(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Interface => "interface",
        EntityKind::Abstract => "abstract class",
        EntityKind::Concrete => "class",
    }
}

/// Render the corpus as a PlantUML class diagram
pub fn generate_plantuml(corpus: &Corpus) -> String {
    render_plantuml(corpus, &classify_relationships(corpus))
}

/// Render node blocks for `corpus` and the given edges
pub fn render_plantuml(corpus: &Corpus, edges: &[Edge]) -> String {
    let mut output = String::new();
    output.push_str("@startuml\n");
    output.push_str("skinparam backgroundColor #FEFEFE\n");
    output.push_str("skinparam classAttributeIconSize 0\n");
    output.push_str("left to right direction\n\n");

    // One block per name; duplicate stems would redeclare the class
    let mut declared: HashSet<&str> = HashSet::new();
    for entity in corpus.iter() {
        if !declared.insert(entity.name.as_str()) {
            continue;
        }
        output.push_str(&format!("{} {} {{\n", node_header(entity.kind), entity.name));
        output.push_str("  .. Metrics ..\n");
        output.push_str(&format!("  Lines: {}\n", entity.lines_of_code));
        output.push_str(&format!("  Complexity: {}\n", entity.complexity));
        output.push_str("}\n\n");
    }

    for edge in edges {
        output.push_str(&edge.to_plantuml());
        output.push('\n');
    }

    output.push_str("\n@enduml\n");
    output
}
