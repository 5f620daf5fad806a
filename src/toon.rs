//! TOON (Token-Oriented Object Notation) encoding using the rtoon library
//!
//! The corpus is emitted as an overview block followed by two uniform
//! arrays (entities and relationships), which TOON renders as tables with a
//! single field header each.

use rtoon::encode_default;
use serde_json::{json, Map, Value};

use crate::analysis::{CorpusAnalysis, EntityMetrics, QualityBand};
use crate::diagram::Edge;

/// Encode the analysis of a corpus (or a folder of it) as TOON
pub fn encode_toon_corpus(analysis: &CorpusAnalysis, edges: &[Edge], scope: Option<&str>) -> String {
    let mut output = String::new();

    output.push_str(&encode_overview(analysis, edges, scope));
    output.push_str("---\n");
    output.push_str(&encode_listing(analysis, edges));

    output
}

fn encode_overview(analysis: &CorpusAnalysis, edges: &[Edge], scope: Option<&str>) -> String {
    let mut obj = Map::new();

    obj.insert("_type".to_string(), json!("corpus_overview"));

    if let Some(folder) = scope {
        let folder = if folder.is_empty() { "/" } else { folder };
        obj.insert("folder".to_string(), json!(folder));
    }

    obj.insert("entities".to_string(), json!(analysis.total_entities));
    obj.insert("lines".to_string(), json!(analysis.total_lines));
    obj.insert("avg_complexity".to_string(), json!(round2(analysis.avg_complexity)));
    obj.insert("avg_distance".to_string(), json!(round2(analysis.avg_distance)));

    if analysis.abstract_count > 0 {
        obj.insert("abstract".to_string(), json!(analysis.abstract_count));
    }
    if analysis.interface_count > 0 {
        obj.insert("interfaces".to_string(), json!(analysis.interface_count));
    }

    obj.insert(
        "quality_breakdown".to_string(),
        json!(format!(
            "good:{},warning:{},problematic:{}",
            analysis.count_in(QualityBand::Good),
            analysis.count_in(QualityBand::Warning),
            analysis.count_in(QualityBand::Problematic)
        )),
    );
    obj.insert("relationships".to_string(), json!(edges.len()));

    let value = Value::Object(obj);
    encode_default(&value).unwrap_or_else(|e| format!("TOON encoding error: {}", e))
}

fn encode_listing(analysis: &CorpusAnalysis, edges: &[Edge]) -> String {
    let mut obj = Map::new();

    if !analysis.entities.is_empty() {
        let rows: Vec<Value> = analysis.entities.iter().map(entity_row).collect();
        obj.insert("entities".to_string(), Value::Array(rows));
    }

    if !edges.is_empty() {
        let rows: Vec<Value> = edges
            .iter()
            .map(|e| {
                json!({
                    "source": e.source,
                    "kind": e.kind.as_str(),
                    "target": e.target
                })
            })
            .collect();
        obj.insert("relationships".to_string(), Value::Array(rows));
    }

    let value = Value::Object(obj);
    encode_default(&value).unwrap_or_else(|e| format!("TOON encoding error: {}", e))
}

fn entity_row(m: &EntityMetrics) -> Value {
    json!({
        "name": m.name,
        "path": m.path,
        "kind": m.kind.as_str(),
        "loc": m.lines_of_code,
        "cc": m.complexity,
        "band": m.complexity_band.as_str(),
        "ce": m.ce,
        "ca": m.ca,
        "i": round2(m.instability),
        "a": m.abstractness,
        "d": round2(m.distance),
        "quality": m.quality.as_str()
    })
}

/// Two decimals are plenty for a ratio and keep the table narrow
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::corpus_metrics;
    use crate::corpus::Corpus;
    use crate::diagram::classify_relationships;
    use crate::schema::Entity;

    fn base_derived() -> Corpus {
        let mut derived = Entity::new("shop/Derived.java");
        derived.superclass = Some("Base".to_string());
        derived.efferent_targets.insert("Base".to_string());
        Corpus::from_entities(vec![Entity::new("shop/Base.java"), derived])
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(0.333333), 0.33);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_encode_corpus() {
        let corpus = base_derived();
        let edges = classify_relationships(&corpus);
        let toon = encode_toon_corpus(&corpus_metrics(&corpus), &edges, None);

        assert!(!toon.contains("TOON encoding error"));
        assert!(toon.contains("corpus_overview"));
        assert!(toon.contains("shop/Base.java"));
        assert!(toon.contains("Derived"));
        assert!(toon.contains("inherits"));
        assert!(toon.contains("---\n"));
        assert!(!toon.contains("folder"));
    }

    #[test]
    fn test_encode_scoped_and_empty() {
        let toon = encode_toon_corpus(&CorpusAnalysis::default(), &[], Some("shop"));
        assert!(!toon.contains("TOON encoding error"));
        assert!(toon.contains("folder"));
        assert!(toon.contains("shop"));
    }
}
