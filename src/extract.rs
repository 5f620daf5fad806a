//! Per-file extraction orchestration
//!
//! Runs the normalizer, the complexity counter and both detectors over one
//! file and assembles the resulting [`Entity`]. Afferent coupling is left
//! empty here; only the corpus can compute it.

use std::collections::HashSet;
use tracing::debug;

use crate::complexity::count_complexity;
use crate::config::Config;
use crate::detectors::{scan_references, JavaDetector};
use crate::normalize::{
    count_non_blank_lines, declaration_view_at, strip_comments_and_strings,
    DEFAULT_DECLARATION_DEPTH,
};
use crate::schema::Entity;

/// Analyzes single files against a frozen set of corpus entity names
pub struct FileAnalyzer {
    detector: JavaDetector,
    declaration_depth: usize,
}

impl FileAnalyzer {
    pub fn new(config: &Config) -> Self {
        Self {
            detector: JavaDetector::new(config.container_types.as_slice()),
            declaration_depth: config.declaration_depth,
        }
    }

    /// Build the entity for `path` from its raw `source`
    pub fn analyze(&self, path: &str, source: &str, known: &HashSet<String>) -> Entity {
        let mut entity = Entity::new(path);

        entity.lines_of_code = count_non_blank_lines(source);

        let normalized = strip_comments_and_strings(source);
        entity.complexity = count_complexity(&normalized);

        let declarations = declaration_view_at(&normalized, self.declaration_depth);
        let facts = self
            .detector
            .extract(&normalized, &declarations, &entity.name, known);

        entity.kind = facts.kind;
        entity.superclass = facts.superclass;
        entity.interfaces = facts.interfaces;
        entity.composition_targets = facts.composition_targets;
        entity.aggregation_targets = facts.aggregation_targets;
        entity.efferent_targets = scan_references(&normalized, &entity.name, known);

        debug!(
            target: "archlens::extract",
            path = %entity.path,
            kind = entity.kind.as_str(),
            loc = entity.lines_of_code,
            complexity = entity.complexity,
            ce = entity.efferent_targets.len(),
            "Analyzed file"
        );

        entity
    }
}

impl Default for FileAnalyzer {
    fn default() -> Self {
        Self {
            detector: JavaDetector::default(),
            declaration_depth: DEFAULT_DECLARATION_DEPTH,
        }
    }
}
