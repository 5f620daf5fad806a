//! archlens: structural metrics and class diagrams for Java source trees
//!
//! This library derives per-file size and complexity figures, a structural
//! dependency graph (inheritance, realization, composition, aggregation and
//! generic coupling) and Martin's design-quality metrics from a corpus of
//! Java files. Recognition is lexical: regular expressions over text with
//! comments and string literals removed. It is intentionally approximate and
//! never fails on unexpected input.
//!
//! # Pipeline
//!
//! - `normalize`: strip comments/literals, isolate the declaration view
//! - `detectors`: type kind, supertypes, field relationships, references
//! - `corpus`: name collection, per-file analysis, afferent inversion
//! - `analysis`: abstractness, instability, distance from the main sequence
//! - `diagram`: precedence-ordered relationship classification, PlantUML
//!
//! # Example
//!
//! ```ignore
//! use archlens::{generate_plantuml, AnalysisSession, MemoryProvider};
//! use std::sync::Arc;
//!
//! let provider = MemoryProvider::new("demo")
//!     .with_file("Base.java", "public class Base { }")
//!     .with_file("Derived.java", "public class Derived extends Base { }");
//!
//! let mut session = AnalysisSession::default();
//! session.start(Arc::new(provider)).await;
//! session.wait().await?;
//!
//! let corpus = session.corpus()?;
//! println!("{}", generate_plantuml(&corpus));
//! ```

pub mod analysis;
pub mod cli;
pub mod complexity;
pub mod config;
pub mod corpus;
pub mod detectors;
pub mod diagram;
pub mod error;
pub mod extract;
pub mod indexing;
pub mod normalize;
pub mod schema;
pub mod session;
pub mod toon;
pub mod utils;

// Re-export commonly used types
pub use analysis::{
    compute_metrics, corpus_metrics, format_analysis_report, CorpusAnalysis, EntityMetrics,
    QualityBand,
};
pub use cli::{Cli, OutputFormat};
pub use complexity::{count_complexity, ComplexityBand};
pub use config::Config;
pub use corpus::{Corpus, FolderNode};
pub use diagram::{classify_relationships, generate_plantuml, Edge};
pub use error::{ArchlensError, Result};
pub use extract::FileAnalyzer;
pub use indexing::{LocalProvider, MemoryProvider, SourceProvider};
pub use schema::{Entity, EntityKind, RelationshipKind};
pub use session::{AnalysisSession, RunSummary, Selection, SessionEvent, SessionSnapshot};
pub use toon::encode_toon_corpus;
