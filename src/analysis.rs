//! Design-quality metrics
//!
//! Robert Martin's package metrics applied per entity: abstractness,
//! instability and distance from the main sequence, plus a text report over
//! a whole corpus.

use serde::Serialize;

use crate::complexity::ComplexityBand;
use crate::corpus::Corpus;
use crate::schema::{Entity, EntityKind};
use crate::utils::fit_column;

/// Distance below which an entity is on the main sequence
pub const GOOD_DISTANCE: f64 = 0.1;
/// Distance below which an entity only warrants a warning
pub const WARNING_DISTANCE: f64 = 0.3;

/// Quality rating derived from distance from the main sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityBand {
    Good,
    Warning,
    Problematic,
}

impl QualityBand {
    /// Thresholds:
    /// - distance < 0.1: good
    /// - distance < 0.3: warning
    /// - otherwise: problematic
    pub fn from_distance(distance: f64) -> Self {
        if distance < GOOD_DISTANCE {
            Self::Good
        } else if distance < WARNING_DISTANCE {
            Self::Warning
        } else {
            Self::Problematic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Warning => "warning",
            Self::Problematic => "problematic",
        }
    }
}

/// Metrics for a single entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMetrics {
    pub name: String,
    pub path: String,
    pub kind: EntityKind,
    pub lines_of_code: usize,
    pub complexity: usize,
    pub complexity_band: ComplexityBand,
    /// Efferent coupling (outgoing references)
    pub ce: usize,
    /// Afferent coupling (incoming references)
    pub ca: usize,
    /// 1.0 for abstract classes and interfaces, else 0.0
    pub abstractness: f64,
    /// Ce / (Ca + Ce)
    /// 0 = maximally stable (hard to change)
    /// 1 = maximally unstable (easy to change)
    pub instability: f64,
    /// |A + I - 1|
    pub distance: f64,
    pub quality: QualityBand,
}

/// Abstractness of a single entity
pub fn abstractness(entity: &Entity) -> f64 {
    if entity.kind.is_abstract() {
        1.0
    } else {
        0.0
    }
}

/// Instability of a single entity; 0.0 when it has no coupling at all
pub fn instability(entity: &Entity) -> f64 {
    let ce = entity.efferent_coupling();
    let total = ce + entity.afferent_coupling();
    if total == 0 {
        0.0
    } else {
        ce as f64 / total as f64
    }
}

/// Compute every metric for one entity of a finished corpus
pub fn compute_metrics(entity: &Entity) -> EntityMetrics {
    let abstractness = abstractness(entity);
    let instability = instability(entity);
    let distance = (abstractness + instability - 1.0).abs();

    EntityMetrics {
        name: entity.name.clone(),
        path: entity.path.clone(),
        kind: entity.kind,
        lines_of_code: entity.lines_of_code,
        complexity: entity.complexity,
        complexity_band: entity.complexity_band(),
        ce: entity.efferent_coupling(),
        ca: entity.afferent_coupling(),
        abstractness,
        instability,
        distance,
        quality: QualityBand::from_distance(distance),
    }
}

/// Corpus-wide summary
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorpusAnalysis {
    pub entities: Vec<EntityMetrics>,
    pub total_entities: usize,
    pub total_lines: usize,
    pub avg_complexity: f64,
    pub avg_distance: f64,
    pub abstract_count: usize,
    pub interface_count: usize,
}

impl CorpusAnalysis {
    /// Summarize a selection of entities, keeping their order
    pub fn from_entities<'a, I>(entities: I) -> Self
    where
        I: IntoIterator<Item = &'a Entity>,
    {
        let metrics: Vec<EntityMetrics> = entities.into_iter().map(compute_metrics).collect();
        let total = metrics.len();

        let total_lines = metrics.iter().map(|m| m.lines_of_code).sum();
        let (avg_complexity, avg_distance) = if total == 0 {
            (0.0, 0.0)
        } else {
            let complexity: usize = metrics.iter().map(|m| m.complexity).sum();
            let distance: f64 = metrics.iter().map(|m| m.distance).sum();
            (complexity as f64 / total as f64, distance / total as f64)
        };

        Self {
            total_entities: total,
            total_lines,
            avg_complexity,
            avg_distance,
            abstract_count: metrics.iter().filter(|m| m.kind == EntityKind::Abstract).count(),
            interface_count: metrics.iter().filter(|m| m.kind == EntityKind::Interface).count(),
            entities: metrics,
        }
    }

    pub fn count_in(&self, band: QualityBand) -> usize {
        self.entities.iter().filter(|m| m.quality == band).count()
    }
}

/// Metrics for every entity in the corpus, in input order
pub fn corpus_metrics(corpus: &Corpus) -> CorpusAnalysis {
    CorpusAnalysis::from_entities(corpus.iter())
}

/// Format analysis as text report
pub fn format_analysis_report(analysis: &CorpusAnalysis) -> String {
    let mut output = String::new();

    output.push_str("╔══════════════════════════════════════════════════════════════════╗\n");
    output.push_str("║                    ARCHITECTURE METRICS REPORT                   ║\n");
    output.push_str("╚══════════════════════════════════════════════════════════════════╝\n\n");

    output.push_str("── OVERVIEW ─────────────────────────────────────────────────────────\n");
    output.push_str(&format!("  Entities:          {:>6}\n", analysis.total_entities));
    output.push_str(&format!("  Abstract classes:  {:>6}\n", analysis.abstract_count));
    output.push_str(&format!("  Interfaces:        {:>6}\n", analysis.interface_count));
    output.push_str(&format!("  Total Lines:       {:>6}\n", analysis.total_lines));
    output.push_str(&format!("  Avg Complexity:    {:>6.1}\n", analysis.avg_complexity));
    output.push_str(&format!("  Avg Distance:      {:>6.2}\n", analysis.avg_distance));
    output.push('\n');

    output.push_str("── ENTITY METRICS ───────────────────────────────────────────────────\n");
    output.push_str("  Entity                    LoC    CC  Ce  Ca     I     A     D  Quality\n");
    output.push_str("  ─────────────────────────────────────────────────────────────────\n");

    for m in &analysis.entities {
        output.push_str(&format!(
            "  {:<22} {:>6} {:>5} {:>3} {:>3} {:>5.2} {:>5.2} {:>5.2}  {}\n",
            fit_column(&m.name, 22),
            m.lines_of_code,
            m.complexity,
            m.ce,
            m.ca,
            m.instability,
            m.abstractness,
            m.distance,
            m.quality.as_str()
        ));
    }
    output.push('\n');

    output.push_str("  CC: complexity (0-5 low, 6-10 moderate, 11+ high) | I: instability\n");
    output.push_str("  A: abstractness | D: distance from the main sequence\n");
    output.push('\n');

    output.push_str("── QUALITY ──────────────────────────────────────────────────────────\n");
    for band in [QualityBand::Good, QualityBand::Warning, QualityBand::Problematic] {
        output.push_str(&format!(
            "  {:<12} {:>6}\n",
            band.as_str(),
            analysis.count_in(band)
        ));
    }

    let mut worst: Vec<&EntityMetrics> = analysis
        .entities
        .iter()
        .filter(|m| m.quality == QualityBand::Problematic)
        .collect();
    worst.sort_by(|a, b| b.distance.total_cmp(&a.distance).then_with(|| a.name.cmp(&b.name)));
    if !worst.is_empty() {
        output.push_str("\n  ⚠ Furthest from the main sequence:\n");
        for m in worst.iter().take(10) {
            output.push_str(&format!("    {:<40} D={:.2}\n", fit_column(&m.path, 40), m.distance));
        }
    }

    output
}
