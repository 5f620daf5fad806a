//! Java structural detector
//!
//! Pattern-based recognition of the primary type's kind, its superclass, its
//! realized interfaces and its field relationships. This is a lexical
//! heuristic, not a parser: generic bounds, nested types and unusual
//! formatting can produce approximate answers, and that is accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeSet, HashSet};

use super::TYPE_ARGS_PATTERN;
use crate::schema::EntityKind;

/// Collection types whose type arguments signal aggregation
pub const DEFAULT_CONTAINER_TYPES: &[&str] = &[
    "List", "ArrayList", "LinkedList", "Collection", "Iterable", "Set", "HashSet",
    "LinkedHashSet", "TreeSet", "SortedSet", "Queue", "Deque", "ArrayDeque",
    "PriorityQueue", "Stack", "Vector", "Map", "HashMap", "LinkedHashMap", "TreeMap",
    "SortedMap", "ConcurrentHashMap", "Optional",
];

/// How far back to look for `implements` before an interface declaration
const REALIZATION_GUARD_BYTES: usize = 20;

static ABSTRACT_DECL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:public|protected|private)\s+)?abstract\s+class\s+[A-Za-z_$][\w$]*")
        .unwrap()
});

static INTERFACE_DECL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:(?:public|protected|private)\s+)?interface\s+[A-Za-z_$][\w$]*").unwrap()
});

static EXTENDS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bextends\s+([A-Z][\w$]*)").unwrap());

static IMPLEMENTS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bimplements\s+([^{]+)").unwrap());

static CAPITALIZED_IDENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][\w$]*$").unwrap());

static TYPE_ARG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z][\w$]*").unwrap());

/// `[modifiers] Type[<args>] name ;|=|,` at member level
static FIELD_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"((?:\b(?:public|protected|private|static|final|transient|volatile)\s+)*)\b([A-Z][\w$]*)(?:\s*{})?\s+[A-Za-z_$][\w$]*\s*[;=,]",
        TYPE_ARGS_PATTERN
    ))
    .unwrap()
});

/// Structural facts recovered from one file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StructuralFacts {
    pub kind: EntityKind,
    pub superclass: Option<String>,
    pub interfaces: BTreeSet<String>,
    pub composition_targets: BTreeSet<String>,
    pub aggregation_targets: BTreeSet<String>,
}

/// Structural detector configured with the container type names
pub struct JavaDetector {
    container_types: HashSet<String>,
    container_field_regex: Option<Regex>,
}

impl JavaDetector {
    pub fn new<S: AsRef<str>>(container_types: &[S]) -> Self {
        let container_types: HashSet<String> = container_types
            .iter()
            .map(|t| t.as_ref().to_string())
            .collect();

        // Sorted for a stable pattern; alternation order does not matter
        // because every name is followed by `<`.
        let mut names: Vec<&str> = container_types.iter().map(String::as_str).collect();
        names.sort_unstable();
        let container_field_regex = if names.is_empty() {
            None
        } else {
            let alternation = names
                .iter()
                .map(|n| regex::escape(n))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&format!(
                r"\b(?:{})\s*<([^;=(){{}}]*)>\s*[A-Za-z_$][\w$]*\s*[;=,]",
                alternation
            ))
            .ok()
        };

        Self {
            container_types,
            container_field_regex,
        }
    }

    /// Run every structural heuristic.
    ///
    /// `normalized` is the comment/literal-free text, `declarations` its
    /// declaration view. Names outside `known` are discarded.
    pub fn extract(
        &self,
        normalized: &str,
        declarations: &str,
        own_name: &str,
        known: &HashSet<String>,
    ) -> StructuralFacts {
        let superclass = detect_superclass(normalized)
            .filter(|name| name != own_name && known.contains(name));

        let interfaces = detect_interfaces(normalized)
            .into_iter()
            .filter(|name| name != own_name && known.contains(name))
            .collect();

        let (composition_targets, aggregation_targets) =
            self.detect_fields(declarations, own_name, known);

        StructuralFacts {
            kind: detect_kind(normalized),
            superclass,
            interfaces,
            composition_targets,
            aggregation_targets,
        }
    }

    /// Classify member fields into (composition, aggregation) target sets
    pub fn detect_fields(
        &self,
        declarations: &str,
        own_name: &str,
        known: &HashSet<String>,
    ) -> (BTreeSet<String>, BTreeSet<String>) {
        let mut aggregation = BTreeSet::new();
        let mut composition = BTreeSet::new();

        // Parameter lists sit at member level too; `Type name,` inside them
        // is not a field.
        let members = blank_parenthesized(declarations);

        if let Some(container_field_regex) = &self.container_field_regex {
            for caps in container_field_regex.captures_iter(&members) {
                let Some(args) = caps.get(1) else { continue };
                for ident in TYPE_ARG_REGEX.find_iter(args.as_str()) {
                    let name = ident.as_str();
                    if name != own_name && known.contains(name) {
                        aggregation.insert(name.to_string());
                    }
                }
            }
        }

        for caps in FIELD_REGEX.captures_iter(&members) {
            let modifiers = caps.get(1).map(|m| m.as_str()).unwrap_or("");
            let Some(field_type) = caps.get(2).map(|m| m.as_str()) else {
                continue;
            };

            if field_type == own_name {
                // Singleton signal; instance self-references are ignored
                if modifiers.split_whitespace().any(|m| m == "static") {
                    aggregation.insert(own_name.to_string());
                }
                continue;
            }

            if self.container_types.contains(field_type) || !known.contains(field_type) {
                continue;
            }

            composition.insert(field_type.to_string());
        }

        composition.retain(|name| !aggregation.contains(name));
        (composition, aggregation)
    }
}

impl Default for JavaDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_TYPES)
    }
}

/// Abstract class, then interface, else concrete
pub fn detect_kind(normalized: &str) -> EntityKind {
    if ABSTRACT_DECL_REGEX.is_match(normalized) {
        return EntityKind::Abstract;
    }

    let is_interface = INTERFACE_DECL_REGEX
        .find_iter(normalized)
        .any(|m| !preceded_by_realization(normalized, m.start()));

    if is_interface {
        EntityKind::Interface
    } else {
        EntityKind::Concrete
    }
}

fn preceded_by_realization(text: &str, start: usize) -> bool {
    let mut from = start.saturating_sub(REALIZATION_GUARD_BYTES);
    while from > 0 && !text.is_char_boundary(from) {
        from -= 1;
    }
    text[from..start].contains("implements")
}

/// Blank out everything between parentheses
fn blank_parenthesized(text: &str) -> String {
    let mut depth = 0usize;
    text.chars()
        .map(|c| match c {
            '(' => {
                depth += 1;
                c
            }
            ')' => {
                depth = depth.saturating_sub(1);
                c
            }
            _ if depth > 0 => ' ',
            _ => c,
        })
        .collect()
}

/// First `extends Name` in the type header; single inheritance only.
///
/// Only text before the first `{` is searched, so wildcard bounds inside
/// member signatures (`List<? extends Item>`) are not mistaken for a
/// superclass. Without any `{` the whole text is the header.
pub fn detect_superclass(normalized: &str) -> Option<String> {
    let header = match normalized.find('{') {
        Some(idx) => &normalized[..idx],
        None => normalized,
    };
    EXTENDS_REGEX
        .captures(header)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Names listed in the first `implements` clause, generic suffixes removed
pub fn detect_interfaces(normalized: &str) -> BTreeSet<String> {
    let Some(clause) = IMPLEMENTS_REGEX
        .captures(normalized)
        .and_then(|caps| caps.get(1))
    else {
        return BTreeSet::new();
    };

    clause
        .as_str()
        .split(',')
        .map(|item| {
            let item = match item.find('<') {
                Some(idx) => &item[..idx],
                None => item,
            };
            item.trim()
        })
        .filter(|item| CAPITALIZED_IDENT_REGEX.is_match(item))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{declaration_view, strip_comments_and_strings};

    fn known(names: &[&str]) -> HashSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    fn facts(source: &str, own: &str, names: &[&str]) -> StructuralFacts {
        let normalized = strip_comments_and_strings(source);
        let view = declaration_view(&normalized);
        JavaDetector::default().extract(&normalized, &view, own, &known(names))
    }

    #[test]
    fn test_kind_detection() {
        assert_eq!(detect_kind("public abstract class Shape {}"), EntityKind::Abstract);
        assert_eq!(detect_kind("abstract class Shape {}"), EntityKind::Abstract);
        assert_eq!(detect_kind("public interface Priced {}"), EntityKind::Interface);
        assert_eq!(detect_kind("public class Order {}"), EntityKind::Concrete);
        assert_eq!(detect_kind(""), EntityKind::Concrete);
    }

    #[test]
    fn test_interface_guard_after_implements() {
        assert_eq!(
            detect_kind("class Odd implements interface Thing {}"),
            EntityKind::Concrete
        );
    }

    #[test]
    fn test_superclass_first_match() {
        assert_eq!(
            detect_superclass("class Derived extends Base implements X {}"),
            Some("Base".to_string())
        );
        assert_eq!(detect_superclass("class Plain {}"), None);
        assert_eq!(detect_superclass("class C extends java.util.Base {}"), None);
    }

    #[test]
    fn test_interfaces_strip_generics() {
        let found = detect_interfaces(
            "class A implements Comparable<A>, Runnable, java.io.Serializable {",
        );
        let expected: BTreeSet<String> =
            ["Comparable", "Runnable"].iter().map(|s| s.to_string()).collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_interfaces_with_nested_generic_commas() {
        let found = detect_interfaces("class P implements Mapper<Pair<K, V>>, Closeable {");
        assert!(found.contains("Mapper"));
        assert!(found.contains("Closeable"));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_order_fields() {
        let src = r#"
            public class Order {
                private List<LineItem> items = new ArrayList<>();
                private Customer customer;
                public Customer getCustomer() { Address local = null; return customer; }
            }
        "#;
        let f = facts(src, "Order", &["Order", "LineItem", "Customer", "Address"]);
        assert_eq!(f.aggregation_targets.iter().collect::<Vec<_>>(), vec!["LineItem"]);
        assert_eq!(f.composition_targets.iter().collect::<Vec<_>>(), vec!["Customer"]);
    }

    #[test]
    fn test_singleton_self_reference() {
        let src = r#"
            public class Logger {
                private static Logger instance = null;
                public static Logger getInstance() {
                    if (instance == null) { instance = new Logger(); }
                    return instance;
                }
            }
        "#;
        let f = facts(src, "Logger", &["Logger"]);
        assert!(f.aggregation_targets.contains("Logger"));
        assert!(f.composition_targets.is_empty());
    }

    #[test]
    fn test_instance_self_reference_is_ignored() {
        let f = facts("class Node { Node next; }", "Node", &["Node"]);
        assert!(f.aggregation_targets.is_empty());
        assert!(f.composition_targets.is_empty());
    }

    #[test]
    fn test_null_initialized_field_is_composition() {
        let f = facts("class A { private B b = null; }", "A", &["A", "B"]);
        assert!(f.composition_targets.contains("B"));
    }

    #[test]
    fn test_aggregation_wins_over_composition() {
        let src = "class Team { Set<Player> bench; Player captain; }";
        let f = facts(src, "Team", &["Team", "Player"]);
        assert!(f.aggregation_targets.contains("Player"));
        assert!(!f.composition_targets.contains("Player"));
    }

    #[test]
    fn test_map_values_and_nested_containers() {
        let src = "class Index { Map<String, List<Doc>> byTerm; }";
        let f = facts(src, "Index", &["Index", "Doc"]);
        assert!(f.aggregation_targets.contains("Doc"));
        assert!(f.composition_targets.is_empty());
    }

    #[test]
    fn test_unknown_types_discarded() {
        let src = "class A extends Thread implements Runnable { String s; Helper h; }";
        let f = facts(src, "A", &["A"]);
        assert_eq!(f.superclass, None);
        assert!(f.interfaces.is_empty());
        assert!(f.composition_targets.is_empty());
    }

    #[test]
    fn test_raw_container_type_is_not_composition() {
        let f = facts("class A { List items; }", "A", &["A", "List"]);
        assert!(f.composition_targets.is_empty());
    }

    #[test]
    fn test_custom_container_types() {
        let detector = JavaDetector::new(&["Bag"]);
        let (comp, agg) = detector.detect_fields("class A { Bag<B> bag; }", "A", &known(&["A", "B"]));
        assert!(agg.contains("B"));
        assert!(comp.is_empty());
    }

    #[test]
    fn test_generic_project_type_is_composition() {
        let src = "class Service { private Repository<Customer> repo; }";
        let f = facts(src, "Service", &["Service", "Repository", "Customer"]);
        assert_eq!(f.composition_targets.iter().collect::<Vec<_>>(), vec!["Repository"]);
        assert!(f.aggregation_targets.is_empty());
    }

    #[test]
    fn test_nested_generic_project_type_is_composition() {
        let src = "class Cache { Table<String, Map<String, Entry>> rows; }";
        let f = facts(src, "Cache", &["Cache", "Table", "Entry"]);
        assert_eq!(f.composition_targets.iter().collect::<Vec<_>>(), vec!["Table"]);
    }

    #[test]
    fn test_multi_declarator_field() {
        let f = facts("class Pair { private Customer first, second; }", "Pair", &["Pair", "Customer"]);
        assert!(f.composition_targets.contains("Customer"));

        let f = facts("class Team { List<Player> a, b; }", "Team", &["Team", "Player"]);
        assert!(f.aggregation_targets.contains("Player"));
    }

    #[test]
    fn test_parameters_are_not_fields() {
        let src = "class Billing { void charge(Customer c, Order o) { } Invoice last; }";
        let f = facts(src, "Billing", &["Billing", "Customer", "Order", "Invoice"]);
        assert_eq!(f.composition_targets.iter().collect::<Vec<_>>(), vec!["Invoice"]);
    }

    #[test]
    fn test_superclass_ignores_wildcard_bounds_in_body() {
        let src = "class Cart { void addAll(List<? extends Item> xs) {} }";
        assert_eq!(detect_superclass(src), None);

        let src = "class Box<T extends Item> extends Base { }";
        assert_eq!(detect_superclass(src), Some("Item".to_string()));
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        let f = facts("}}} extends implements {{{ <<<", "X", &["X"]);
        assert_eq!(f, StructuralFacts::default());
    }
}
