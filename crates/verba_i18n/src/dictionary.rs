use std::collections::BTreeMap;

use thiserror::Error;

const MAX_LEAVES: usize = 10_000;
const MAX_KEY_BYTES: usize = 128;
const MAX_VALUE_BYTES: usize = 16 * 1024;
const MAX_DEPTH: usize = 32;

/// One node of a locale dictionary.
#[derive(Clone, Debug, PartialEq)]
pub enum Entry {
    Leaf(String),
    Node(BTreeMap<String, Entry>),
}

impl Entry {
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Entry::Leaf(s) => Some(s),
            Entry::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&BTreeMap<String, Entry>> {
        match self {
            Entry::Leaf(_) => None,
            Entry::Node(children) => Some(children),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DictionaryError {
    #[error("yaml dictionary error: {0}")]
    Yaml(String),

    #[error("json dictionary error: {0}")]
    Json(String),

    #[error("dictionary root must be a mapping")]
    NotAMapping,

    #[error("invalid key `{key}` under `{parent}` (allowed: [A-Za-z0-9_][A-Za-z0-9_-]*)")]
    InvalidKey { parent: String, key: String },

    #[error("key `{key}` is too long (max {max} bytes)")]
    KeyTooLong { key: String, max: usize },

    #[error("value at `{path}` must be a string, a sequence or a mapping")]
    UnsupportedValue { path: String },

    #[error("value at `{path}` is too long (max {max} bytes)")]
    ValueTooLong { path: String, max: usize },

    #[error("nesting at `{path}` is deeper than {max} levels")]
    TooDeep { path: String, max: usize },

    #[error("too many entries (max {max})")]
    TooManyEntries { max: usize },
}

fn is_valid_segment(key: &str) -> bool {
    let mut it = key.chars();
    match it.next() {
        Some(c) if c.is_ascii_alphanumeric() || c == '_' => {}
        _ => return false,
    }
    it.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Shared limit bookkeeping for both source formats.
struct Loader {
    leaves: usize,
}

impl Loader {
    fn key(&self, parent: &str, key: &str) -> Result<String, DictionaryError> {
        if key.len() > MAX_KEY_BYTES {
            return Err(DictionaryError::KeyTooLong {
                key: key.to_string(),
                max: MAX_KEY_BYTES,
            });
        }
        if !is_valid_segment(key) {
            return Err(DictionaryError::InvalidKey {
                parent: parent.to_string(),
                key: key.to_string(),
            });
        }
        Ok(join_path(parent, key))
    }

    fn leaf(&mut self, path: &str, value: String) -> Result<Entry, DictionaryError> {
        if value.len() > MAX_VALUE_BYTES {
            return Err(DictionaryError::ValueTooLong {
                path: path.to_string(),
                max: MAX_VALUE_BYTES,
            });
        }
        self.leaves += 1;
        if self.leaves > MAX_LEAVES {
            return Err(DictionaryError::TooManyEntries { max: MAX_LEAVES });
        }
        Ok(Entry::Leaf(value))
    }

    fn depth(&self, path: &str, depth: usize) -> Result<(), DictionaryError> {
        if depth > MAX_DEPTH {
            return Err(DictionaryError::TooDeep {
                path: path.to_string(),
                max: MAX_DEPTH,
            });
        }
        Ok(())
    }

    fn yaml(
        &mut self,
        path: &str,
        value: serde_yaml::Value,
        depth: usize,
    ) -> Result<Entry, DictionaryError> {
        use serde_yaml::Value;

        self.depth(path, depth)?;
        match value {
            Value::String(s) => self.leaf(path, s),
            Value::Mapping(map) => {
                let mut children = BTreeMap::new();
                for (k, v) in map {
                    let Some(key) = k.as_str() else {
                        return Err(DictionaryError::Yaml(format!(
                            "keys under `{path}` must be strings"
                        )));
                    };
                    let child = self.key(path, key)?;
                    let entry = self.yaml(&child, v, depth + 1)?;
                    children.insert(key.to_string(), entry);
                }
                Ok(Entry::Node(children))
            }
            // Sequences are addressed by index (`titles.0`).
            Value::Sequence(items) => {
                let mut children = BTreeMap::new();
                for (idx, v) in items.into_iter().enumerate() {
                    let key = idx.to_string();
                    let child = join_path(path, &key);
                    let entry = self.yaml(&child, v, depth + 1)?;
                    children.insert(key, entry);
                }
                Ok(Entry::Node(children))
            }
            Value::Tagged(tagged) => self.yaml(path, tagged.value, depth),
            _ => Err(DictionaryError::UnsupportedValue {
                path: path.to_string(),
            }),
        }
    }

    fn json(
        &mut self,
        path: &str,
        value: serde_json::Value,
        depth: usize,
    ) -> Result<Entry, DictionaryError> {
        use serde_json::Value;

        self.depth(path, depth)?;
        match value {
            Value::String(s) => self.leaf(path, s),
            Value::Object(map) => {
                let mut children = BTreeMap::new();
                for (key, v) in map {
                    let child = self.key(path, &key)?;
                    let entry = self.json(&child, v, depth + 1)?;
                    children.insert(key, entry);
                }
                Ok(Entry::Node(children))
            }
            Value::Array(items) => {
                let mut children = BTreeMap::new();
                for (idx, v) in items.into_iter().enumerate() {
                    let key = idx.to_string();
                    let child = join_path(path, &key);
                    let entry = self.json(&child, v, depth + 1)?;
                    children.insert(key, entry);
                }
                Ok(Entry::Node(children))
            }
            _ => Err(DictionaryError::UnsupportedValue {
                path: path.to_string(),
            }),
        }
    }
}

/// A nested locale dictionary: dotted paths map to template strings.
///
/// `name` is the short language identifier (`"en"`, `"zh-cn"`). Locale files
/// carry it as a top-level `name` leaf.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocaleDictionary {
    name: String,
    root: BTreeMap<String, Entry>,
}

impl LocaleDictionary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            root: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Parse a nested YAML mapping.
    pub fn from_yaml_str(src: &str) -> Result<Self, DictionaryError> {
        let value: serde_yaml::Value =
            serde_yaml::from_str(src).map_err(|e| DictionaryError::Yaml(e.to_string()))?;
        if !value.is_mapping() {
            return Err(DictionaryError::NotAMapping);
        }
        let root = Loader { leaves: 0 }.yaml("", value, 0)?;
        Ok(Self::from_root(root))
    }

    /// Parse a nested JSON object.
    pub fn from_json_str(src: &str) -> Result<Self, DictionaryError> {
        let value: serde_json::Value =
            serde_json::from_str(src).map_err(|e| DictionaryError::Json(e.to_string()))?;
        if !value.is_object() {
            return Err(DictionaryError::NotAMapping);
        }
        let root = Loader { leaves: 0 }.json("", value, 0)?;
        Ok(Self::from_root(root))
    }

    fn from_root(root: Entry) -> Self {
        let Entry::Node(root) = root else {
            return Self::default();
        };
        let name = root
            .get("name")
            .and_then(Entry::as_leaf)
            .unwrap_or_default()
            .to_string();
        Self { name, root }
    }

    /// Insert a leaf at `path`, creating intermediate nodes.
    ///
    /// A leaf standing where a node is needed is replaced by a node.
    pub fn insert(&mut self, path: &str, value: impl Into<String>) {
        if path.is_empty() {
            return;
        }
        let mut segments = path.split('.').peekable();
        let mut current = &mut self.root;
        while let Some(seg) = segments.next() {
            if segments.peek().is_none() {
                current.insert(seg.to_string(), Entry::Leaf(value.into()));
                return;
            }
            let slot = current
                .entry(seg.to_string())
                .or_insert_with(|| Entry::Node(BTreeMap::new()));
            if slot.as_leaf().is_some() {
                *slot = Entry::Node(BTreeMap::new());
            }
            let Entry::Node(children) = slot else {
                return;
            };
            current = children;
        }
    }

    /// Walk `path` one segment per level.
    ///
    /// Returns `None` for an empty path, a missing segment, or a leaf where a
    /// nested node was expected.
    pub fn get(&self, path: &str) -> Option<&Entry> {
        if path.is_empty() {
            return None;
        }
        let mut segments = path.split('.').peekable();
        let mut current = &self.root;
        while let Some(seg) = segments.next() {
            let entry = current.get(seg)?;
            if segments.peek().is_none() {
                return Some(entry);
            }
            current = entry.as_node()?;
        }
        None
    }

    /// The template stored at `path`, if `path` ends on a leaf.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        self.get(path)?.as_leaf()
    }

    /// Dotted paths of every leaf, sorted.
    pub fn leaf_paths(&self) -> Vec<String> {
        fn walk(prefix: &str, node: &BTreeMap<String, Entry>, out: &mut Vec<String>) {
            for (key, entry) in node {
                let path = join_path(prefix, key);
                match entry {
                    Entry::Leaf(_) => out.push(path),
                    Entry::Node(children) => walk(&path, children, out),
                }
            }
        }

        let mut out = Vec::new();
        walk("", &self.root, &mut out);
        out.sort();
        out
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        fn count(node: &BTreeMap<String, Entry>) -> usize {
            node.values()
                .map(|e| match e {
                    Entry::Leaf(_) => 1,
                    Entry::Node(children) => count(children),
                })
                .sum()
        }
        count(&self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> LocaleDictionary {
        let mut d = LocaleDictionary::new("en");
        d.insert("a.b", "hello");
        d.insert("greet", "Hi {name}");
        d
    }

    #[test]
    fn resolve_walks_nested_nodes() {
        let d = sample();
        assert_eq!(d.resolve("a.b"), Some("hello"));
        assert_eq!(d.resolve("greet"), Some("Hi {name}"));
    }

    #[test]
    fn resolve_dead_ends() {
        let d = sample();
        assert_eq!(d.resolve(""), None);
        assert_eq!(d.resolve("a.x"), None);
        assert_eq!(d.resolve("a.b.c"), None);
        assert_eq!(d.resolve("x.y"), None);
        // A node is not a template.
        assert_eq!(d.resolve("a"), None);
        assert!(d.get("a").is_some());
    }

    #[test]
    fn insert_replaces_leaf_with_node() {
        let mut d = sample();
        d.insert("a.b.c", "deeper");
        assert_eq!(d.resolve("a.b"), None);
        assert_eq!(d.resolve("a.b.c"), Some("deeper"));
    }

    #[test]
    fn parse_yaml_and_lookup() {
        let src = r#"
name: en
el:
  select:
    loading: "Loading"
    noData: "No data"
  transfer:
    titles: ["List 1", "List 2"]
"#;
        let d = LocaleDictionary::from_yaml_str(src).unwrap();
        assert_eq!(d.name(), "en");
        assert_eq!(d.resolve("el.select.loading"), Some("Loading"));
        assert_eq!(d.resolve("el.transfer.titles.1"), Some("List 2"));
        assert_eq!(d.len(), 5);
        assert_eq!(
            d.leaf_paths(),
            vec![
                "el.select.loading",
                "el.select.noData",
                "el.transfer.titles.0",
                "el.transfer.titles.1",
                "name",
            ]
        );
    }

    #[test]
    fn parse_json_and_lookup() {
        let src = r#"{"name": "zh-cn", "el": {"select": {"loading": "加载中"}}}"#;
        let d = LocaleDictionary::from_json_str(src).unwrap();
        assert_eq!(d.name(), "zh-cn");
        assert_eq!(d.resolve("el.select.loading"), Some("加载中"));
    }

    #[test]
    fn unnamed_dictionary_has_empty_name() {
        let d = LocaleDictionary::from_yaml_str("a: b").unwrap();
        assert_eq!(d.name(), "");
        assert_eq!(d.with_name("fr").name(), "fr");
    }

    #[test]
    fn rejects_non_string_leaves() {
        let err = LocaleDictionary::from_yaml_str("a: 123").unwrap_err();
        assert_eq!(
            err,
            DictionaryError::UnsupportedValue {
                path: "a".to_string()
            }
        );

        let err = LocaleDictionary::from_json_str(r#"{"a": {"b": null}}"#).unwrap_err();
        assert_eq!(
            err,
            DictionaryError::UnsupportedValue {
                path: "a.b".to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_keys() {
        let err = LocaleDictionary::from_yaml_str("a:\n  bad key: x").unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidKey { .. }));

        let err = LocaleDictionary::from_json_str(r#"{"a.b": "x"}"#).unwrap_err();
        assert!(matches!(err, DictionaryError::InvalidKey { .. }));
    }

    #[test]
    fn rejects_non_mapping_root() {
        assert_eq!(
            LocaleDictionary::from_yaml_str("- a\n- b").unwrap_err(),
            DictionaryError::NotAMapping
        );
        assert_eq!(
            LocaleDictionary::from_json_str(r#""text""#).unwrap_err(),
            DictionaryError::NotAMapping
        );
    }

    #[test]
    fn rejects_deep_nesting() {
        let mut src = String::new();
        for _ in 0..=MAX_DEPTH {
            src.push_str("{\"a\":");
        }
        src.push_str("\"x\"");
        for _ in 0..=MAX_DEPTH {
            src.push('}');
        }
        let err = LocaleDictionary::from_json_str(&src).unwrap_err();
        assert!(matches!(err, DictionaryError::TooDeep { .. }));
    }

    #[test]
    fn malformed_sources_report_parser_errors() {
        assert!(matches!(
            LocaleDictionary::from_yaml_str("a: [unclosed").unwrap_err(),
            DictionaryError::Yaml(_)
        ));
        assert!(matches!(
            LocaleDictionary::from_json_str("{").unwrap_err(),
            DictionaryError::Json(_)
        ));
    }
}
