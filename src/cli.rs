//! CLI argument definitions using clap

use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::analysis::{format_analysis_report, CorpusAnalysis};
use crate::config::Config;
use crate::corpus::Corpus;
use crate::diagram::{classify_relationships, render_plantuml, Edge};
use crate::error::Result;
use crate::schema::Entity;
use crate::toon::encode_toon_corpus;

/// Structural metrics and class diagrams for Java source trees
#[derive(Parser, Debug)]
#[command(name = "archlens")]
#[command(about = "Coupling, abstractness and main-sequence distance for a Java corpus, plus a PlantUML class diagram")]
#[command(version)]
pub struct Cli {
    /// Root directory of the corpus
    #[arg(value_name = "PATH", default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "plantuml", value_enum)]
    pub format: OutputFormat,

    /// Only list entities directly inside this folder ("" for top level)
    #[arg(long, value_name = "FOLDER")]
    pub folder: Option<String>,

    /// Configuration file (defaults to <config dir>/archlens/config.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Analyze files on all cores
    #[arg(long)]
    pub parallel: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// PlantUML class diagram of the whole corpus
    #[default]
    Plantuml,
    /// JSON - entities, metrics and relationships
    Json,
    /// TOON (Token-Oriented Object Notation) - token-efficient listing
    Toon,
    /// Human-readable metrics report
    Report,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    folder: Option<&'a str>,
    summary: &'a CorpusAnalysis,
    entities: Vec<&'a Entity>,
    relationships: &'a [Edge],
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Load configuration and apply flags on top
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if self.parallel {
            config.parallel = true;
        }
        Ok(config)
    }

    /// Render the requested artifact for a finished corpus
    pub fn render(&self, corpus: &Corpus) -> Result<String> {
        let folder = self.folder.as_deref();
        let edges = classify_relationships(corpus);

        let selected: Vec<&Entity> = match folder {
            Some(f) => corpus.in_folder(f).collect(),
            None => corpus.iter().collect(),
        };
        let analysis = CorpusAnalysis::from_entities(selected.iter().copied());

        // Listings keep relationships touching a listed entity
        let names: HashSet<&str> = selected.iter().map(|e| e.name.as_str()).collect();
        let listed_edges: Vec<Edge> = edges
            .iter()
            .filter(|e| names.contains(e.source.as_str()) || names.contains(e.target.as_str()))
            .cloned()
            .collect();

        Ok(match self.format {
            OutputFormat::Plantuml => render_plantuml(corpus, &edges),
            OutputFormat::Report => format_analysis_report(&analysis),
            OutputFormat::Toon => encode_toon_corpus(&analysis, &listed_edges, folder),
            OutputFormat::Json => serde_json::to_string_pretty(&JsonOutput {
                folder,
                summary: &analysis,
                entities: selected,
                relationships: &listed_edges,
            })?,
        })
    }
}
