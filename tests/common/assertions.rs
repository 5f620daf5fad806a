//! Custom assertions

use archlens::{Corpus, Edge, RelationshipKind};
use std::collections::HashSet;

/// Every efferent reference is mirrored as an afferent one
pub fn assert_afferent_inverse(corpus: &Corpus) {
    for entity in corpus.iter() {
        for target in &entity.efferent_targets {
            for referenced in corpus.iter().filter(|e| &e.name == target) {
                assert!(
                    referenced.afferent_targets().contains(&entity.name),
                    "{} references {} but is missing from its afferent set",
                    entity.name,
                    target
                );
            }
        }
    }
}

/// At most one edge per directed pair, and only singleton self-edges
pub fn assert_edges_well_formed(edges: &[Edge]) {
    let mut pairs = HashSet::new();
    for edge in edges {
        assert!(
            pairs.insert((edge.source.as_str(), edge.target.as_str())),
            "duplicate edge {} -> {}",
            edge.source,
            edge.target
        );
        if edge.source == edge.target {
            assert_eq!(
                edge.kind,
                RelationshipKind::Aggregates,
                "self-edge on {} is not a singleton aggregation",
                edge.source
            );
        }
    }
}

pub fn assert_has_edge(edges: &[Edge], source: &str, kind: RelationshipKind, target: &str) {
    assert!(
        edges
            .iter()
            .any(|e| e.source == source && e.target == target && e.kind == kind),
        "expected {} {} {}; got {:?}",
        source,
        kind.as_str(),
        target,
        edges
    );
}
