//! Corpus aggregation
//!
//! Per-file analysis needs to know which identifiers are corpus members, so a
//! corpus is built in three phases:
//!
//! 1. collect the entity name of every input path
//! 2. analyze each file against that frozen name set
//! 3. invert every efferent set into afferent sets
//!
//! Phase 2 work items are independent and may run on the rayon pool. Phase 3
//! is a single sequential fold over the finished phase-2 output and is the
//! only place afferent coupling is ever written.

use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::debug;

use crate::config::Config;
use crate::extract::FileAnalyzer;
use crate::schema::Entity;
use crate::utils::{entity_name_from_path, is_direct_child};

/// Phase 1: the entity-name set of a list of paths
pub fn collect_entity_names<'a, I>(paths: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    paths
        .into_iter()
        .map(|p| entity_name_from_path(p).to_string())
        .collect()
}

/// Phase 2: analyze every `(path, content)` pair, preserving input order
pub fn analyze_files(
    files: &[(String, String)],
    analyzer: &FileAnalyzer,
    known: &HashSet<String>,
    parallel: bool,
) -> Vec<Entity> {
    if parallel {
        files
            .par_iter()
            .map(|(path, content)| analyzer.analyze(path, content, known))
            .collect()
    } else {
        files
            .iter()
            .map(|(path, content)| analyzer.analyze(path, content, known))
            .collect()
    }
}

/// Phase 3: rebuild every afferent set from the efferent sets.
///
/// A referrer is added to every entity carrying the referenced name.
pub fn link_afferent(entities: &mut [Entity]) {
    let mut by_name: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, entity) in entities.iter().enumerate() {
        by_name.entry(entity.name.as_str()).or_default().push(idx);
    }

    let mut incoming: Vec<BTreeSet<String>> = vec![BTreeSet::new(); entities.len()];
    for entity in entities.iter() {
        for target in &entity.efferent_targets {
            if let Some(indices) = by_name.get(target.as_str()) {
                for &idx in indices {
                    incoming[idx].insert(entity.name.clone());
                }
            }
        }
    }

    for (entity, afferent) in entities.iter_mut().zip(incoming) {
        entity.afferent_targets = afferent;
    }
}

/// A fully analyzed, read-only entity collection
#[derive(Debug, Clone, Default, Serialize)]
pub struct Corpus {
    entities: Vec<Entity>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Corpus {
    /// Run all three phases over `(path, content)` pairs
    pub fn from_sources(files: &[(String, String)], config: &Config) -> Self {
        let known = collect_entity_names(files.iter().map(|(p, _)| p.as_str()));
        debug!(
            target: "archlens::corpus",
            files = files.len(),
            names = known.len(),
            parallel = config.parallel,
            "Collected entity names"
        );

        let analyzer = FileAnalyzer::new(config);
        let entities = analyze_files(files, &analyzer, &known, config.parallel);
        Self::from_entities(entities)
    }

    /// Wrap phase-2 output, running the afferent inversion.
    ///
    /// Any afferent sets already present are discarded and recomputed.
    pub fn from_entities(mut entities: Vec<Entity>) -> Self {
        link_afferent(&mut entities);

        let mut index = HashMap::with_capacity(entities.len());
        for (idx, entity) in entities.iter().enumerate() {
            index.entry(entity.name.clone()).or_insert(idx);
        }

        debug!(target: "archlens::corpus", entities = entities.len(), "Corpus ready");
        Self { entities, index }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity by name; the first in input order wins on duplicates
    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.index.get(name).map(|&idx| &self.entities[idx])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Every distinct entity name, sorted
    pub fn names(&self) -> BTreeSet<&str> {
        self.index.keys().map(String::as_str).collect()
    }

    /// Direct children of `folder`; `""` selects top-level files
    pub fn in_folder<'a>(&'a self, folder: &'a str) -> impl Iterator<Item = &'a Entity> + 'a {
        self.entities
            .iter()
            .filter(move |e| is_direct_child(&e.path, folder))
    }

    /// Every distinct non-empty folder path, ancestors included, sorted
    pub fn folders(&self) -> Vec<String> {
        let mut folders = BTreeSet::new();
        for entity in &self.entities {
            let mut folder = entity.folder.as_str();
            while !folder.is_empty() && folders.insert(folder.to_string()) {
                folder = match folder.rfind('/') {
                    Some(pos) => &folder[..pos],
                    None => "",
                };
            }
        }
        folders.into_iter().collect()
    }

    /// Largest line count in the corpus
    pub fn max_lines_of_code(&self) -> usize {
        self.entities
            .iter()
            .map(|e| e.lines_of_code)
            .max()
            .unwrap_or(0)
    }

    /// Relative size in `[0, 1]`: lines of code over the corpus maximum
    pub fn size_weight(&self, entity: &Entity) -> f64 {
        let max = self.max_lines_of_code();
        if max == 0 {
            0.0
        } else {
            (entity.lines_of_code as f64 / max as f64).min(1.0)
        }
    }

    /// Path tree over every entity; children sorted by name
    pub fn folder_tree(&self) -> FolderNode {
        let mut root = TreeBuilder::default();
        for entity in &self.entities {
            let components: Vec<&str> = entity.path.split('/').filter(|c| !c.is_empty()).collect();
            root.insert(&components);
        }
        root.into_node(String::new(), String::new())
    }
}

/// One node in the corpus path tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FolderNode {
    pub name: String,
    /// Full `/`-separated path from the corpus root
    pub path: String,
    pub is_file: bool,
    pub children: Vec<FolderNode>,
}

impl FolderNode {
    /// Number of files at or below this node
    pub fn file_count(&self) -> usize {
        let own = usize::from(self.is_file);
        own + self.children.iter().map(FolderNode::file_count).sum::<usize>()
    }

    /// Find a node by its full path
    pub fn find(&self, path: &str) -> Option<&FolderNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

#[derive(Default)]
struct TreeBuilder {
    is_file: bool,
    children: BTreeMap<String, TreeBuilder>,
}

impl TreeBuilder {
    fn insert(&mut self, components: &[&str]) {
        match components.split_first() {
            None => self.is_file = true,
            Some((head, rest)) => self
                .children
                .entry(head.to_string())
                .or_default()
                .insert(rest),
        }
    }

    fn into_node(self, name: String, path: String) -> FolderNode {
        let children = self
            .children
            .into_iter()
            .map(|(child, builder)| {
                let child_path = if path.is_empty() {
                    child.clone()
                } else {
                    format!("{}/{}", path, child)
                };
                builder.into_node(child, child_path)
            })
            .collect();
        FolderNode {
            name,
            path,
            is_file: self.is_file,
            children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources(files: &[(&str, &str)]) -> Vec<(String, String)> {
        files
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    fn shop() -> Vec<(String, String)> {
        sources(&[
            ("shop/Base.java", "public class Base { }"),
            (
                "shop/Derived.java",
                "public class Derived extends Base { Base b = new Base(); }",
            ),
            (
                "shop/model/Order.java",
                "public class Order { private List<LineItem> items; private Customer customer; }",
            ),
            ("shop/model/LineItem.java", "public class LineItem { }"),
            ("shop/model/Customer.java", "public class Customer { }"),
            ("Main.java", "public class Main { void run() { Order o = new Order(); } }"),
        ])
    }

    #[test]
    fn test_collect_entity_names() {
        let names = collect_entity_names(["a/B.java", "C.java", "d/e/B.java"]);
        assert_eq!(names.len(), 2);
        assert!(names.contains("B"));
        assert!(names.contains("C"));
    }

    #[test]
    fn test_afferent_inversion_invariant() {
        let corpus = Corpus::from_sources(&shop(), &Config::default());
        for entity in corpus.iter() {
            for target in &entity.efferent_targets {
                let referenced = corpus.get(target).unwrap();
                assert!(
                    referenced.afferent_targets().contains(&entity.name),
                    "{} -> {} not inverted",
                    entity.name,
                    target
                );
            }
        }
        let base = corpus.get("Base").unwrap();
        assert_eq!(base.afferent_coupling(), 1);
        assert_eq!(corpus.get("Derived").unwrap().afferent_coupling(), 0);
    }

    #[test]
    fn test_input_order_preserved() {
        let corpus = Corpus::from_sources(&shop(), &Config::default());
        let names: Vec<&str> = corpus.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Base", "Derived", "Order", "LineItem", "Customer", "Main"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let sequential = Corpus::from_sources(&shop(), &Config::default());
        let config = Config {
            parallel: true,
            ..Config::default()
        };
        let parallel = Corpus::from_sources(&shop(), &config);
        assert_eq!(sequential.entities(), parallel.entities());
    }

    #[test]
    fn test_from_entities_recomputes_afferent() {
        let corpus = Corpus::from_sources(&shop(), &Config::default());
        let again = Corpus::from_entities(corpus.entities().to_vec());
        assert_eq!(corpus.entities(), again.entities());
    }

    #[test]
    fn test_duplicate_names_all_receive_afferent() {
        let corpus = Corpus::from_sources(
            &sources(&[
                ("a/Util.java", "class Util { }"),
                ("b/Util.java", "class Util { }"),
                ("User.java", "class User { void f() { Util.help(); } }"),
            ]),
            &Config::default(),
        );
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.get("Util").unwrap().path, "a/Util.java");
        for util in corpus.iter().filter(|e| e.name == "Util") {
            assert!(util.afferent_targets().contains("User"));
        }
    }

    #[test]
    fn test_in_folder_direct_children_only() {
        let corpus = Corpus::from_sources(&shop(), &Config::default());
        let shop: Vec<&str> = corpus.in_folder("shop").map(|e| e.name.as_str()).collect();
        assert_eq!(shop, vec!["Base", "Derived"]);
        let top: Vec<&str> = corpus.in_folder("").map(|e| e.name.as_str()).collect();
        assert_eq!(top, vec!["Main"]);
        assert_eq!(corpus.in_folder("sho").count(), 0);
    }

    #[test]
    fn test_folders_include_ancestors() {
        let corpus = Corpus::from_sources(&shop(), &Config::default());
        assert_eq!(corpus.folders(), vec!["shop".to_string(), "shop/model".to_string()]);
    }

    #[test]
    fn test_folder_tree() {
        let corpus = Corpus::from_sources(&shop(), &Config::default());
        let tree = corpus.folder_tree();
        assert_eq!(tree.file_count(), 6);

        let top: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(top, vec!["Main.java", "shop"]);

        let model = tree.find("shop/model").unwrap();
        assert!(!model.is_file);
        let files: Vec<&str> = model.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(files, vec!["Customer.java", "LineItem.java", "Order.java"]);
        assert!(model.children.iter().all(|c| c.is_file));
    }

    #[test]
    fn test_size_weight() {
        let corpus = Corpus::from_sources(
            &sources(&[("Big.java", "a\nb\nc\nd\n"), ("Small.java", "a\n")]),
            &Config::default(),
        );
        let big = corpus.get("Big").unwrap();
        let small = corpus.get("Small").unwrap();
        assert_eq!(corpus.size_weight(big), 1.0);
        assert_eq!(corpus.size_weight(small), 0.25);

        let empty = Corpus::from_sources(&sources(&[("E.java", "")]), &Config::default());
        assert_eq!(empty.size_weight(empty.get("E").unwrap()), 0.0);
    }

    #[test]
    fn test_empty_corpus() {
        let corpus = Corpus::from_sources(&[], &Config::default());
        assert!(corpus.is_empty());
        assert!(corpus.folders().is_empty());
        assert_eq!(corpus.folder_tree().file_count(), 0);
    }
}
