//! Entity data model
//!
//! One [`Entity`] per analyzed file. Relationship sets are ordered
//! (`BTreeSet`) so every emitted artifact is independent of hashing order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::complexity::ComplexityBand;
use crate::utils::{entity_name_from_path, folder_of};

/// Declared kind of the primary type in a file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    #[default]
    Concrete,
    Abstract,
    Interface,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concrete => "concrete",
            Self::Abstract => "abstract",
            Self::Interface => "interface",
        }
    }

    /// Abstract classes and interfaces both count as abstract
    pub fn is_abstract(&self) -> bool {
        matches!(self, Self::Abstract | Self::Interface)
    }
}

/// Relationship category between two entities, highest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipKind {
    Inherits,
    Realizes,
    Composes,
    Aggregates,
    Depends,
}

impl RelationshipKind {
    /// All categories in precedence order
    pub const ALL: [RelationshipKind; 5] = [
        Self::Inherits,
        Self::Realizes,
        Self::Composes,
        Self::Aggregates,
        Self::Depends,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inherits => "inherits",
            Self::Realizes => "realizes",
            Self::Composes => "composes",
            Self::Aggregates => "aggregates",
            Self::Depends => "depends",
        }
    }

    /// PlantUML arrow for this category
    pub fn marker(&self) -> &'static str {
        match self {
            Self::Inherits => "--|>",
            Self::Realizes => "..|>",
            Self::Composes => "*--",
            Self::Aggregates => "o--",
            Self::Depends => "-->",
        }
    }

    /// Composition and aggregation treat (a, b) and (b, a) as one edge
    pub fn is_undirected(&self) -> bool {
        matches!(self, Self::Composes | Self::Aggregates)
    }
}

/// Structural record for one analyzed file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Corpus-relative path, `/`-separated
    pub path: String,
    /// Trailing path component without extension
    pub name: String,
    /// Path up to the last separator, empty for top-level files
    pub folder: String,
    /// Non-blank lines of the raw text
    pub lines_of_code: usize,
    /// Keyword-before-paren branch/loop count
    pub complexity: usize,
    pub kind: EntityKind,
    pub superclass: Option<String>,
    pub interfaces: BTreeSet<String>,
    pub composition_targets: BTreeSet<String>,
    pub aggregation_targets: BTreeSet<String>,
    pub efferent_targets: BTreeSet<String>,
    /// Filled in by the corpus once every file is analyzed
    #[serde(default)]
    pub(crate) afferent_targets: BTreeSet<String>,
}

impl Entity {
    /// Create an entity with name and folder derived from `path`
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: entity_name_from_path(&path).to_string(),
            folder: folder_of(&path).to_string(),
            path,
            ..Default::default()
        }
    }

    /// Entities that reference this one
    pub fn afferent_targets(&self) -> &BTreeSet<String> {
        &self.afferent_targets
    }

    /// Efferent coupling (Ce)
    pub fn efferent_coupling(&self) -> usize {
        self.efferent_targets.len()
    }

    /// Afferent coupling (Ca)
    pub fn afferent_coupling(&self) -> usize {
        self.afferent_targets.len()
    }

    pub fn complexity_band(&self) -> ComplexityBand {
        ComplexityBand::from_complexity(self.complexity)
    }

    /// Names already related by a structural category (superclass,
    /// interfaces, composition, aggregation)
    pub fn structural_targets(&self) -> BTreeSet<&str> {
        self.superclass
            .iter()
            .chain(self.interfaces.iter())
            .chain(self.composition_targets.iter())
            .chain(self.aggregation_targets.iter())
            .map(String::as_str)
            .collect()
    }
}
