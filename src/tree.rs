//! Core tree model for localization dictionaries.
//! Language files decode into these; the writer serializes these.

use std::fmt::Display;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::SerializeMap,
};
use serde_json::{Map, Value};

use crate::{error::Error, traits::Parser};

/// Separator between path segments of a [`FlatKey`].
pub const KEY_SEPARATOR: char = '.';

/// Key used in errors that concern the document root itself.
pub const ROOT_KEY: &str = "$";

/// Dot-joined path uniquely addressing one leaf, e.g. `menu.file.open`.
pub type FlatKey = String;

/// Leaf values keyed by their [`FlatKey`], in depth-first document order.
pub type FlatMap = IndexMap<FlatKey, Value>;

/// The two shapes a [`Node`] can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Leaf,
    Tree,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Leaf => write!(f, "value"),
            NodeKind::Tree => write!(f, "object"),
        }
    }
}

/// A value in a localization tree: translated text, a nested level, or any
/// other JSON value (number, boolean, null, array) carried through as is.
///
/// Only [`Node::Leaf`] text takes part in tagging and the length heuristic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf(String),
    Tree(Tree),
    Value(Value),
}

impl Node {
    /// Structural kind: anything that is not a nested level is a leaf.
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Tree(_) => NodeKind::Tree,
            Node::Leaf(_) | Node::Value(_) => NodeKind::Leaf,
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            Node::Leaf(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Node::Tree(tree) => Some(tree),
            _ => None,
        }
    }

    /// Number of leaves in this node; a leaf counts as one.
    pub fn leaf_count(&self) -> usize {
        match self {
            Node::Tree(tree) => tree.leaf_count(),
            Node::Leaf(_) | Node::Value(_) => 1,
        }
    }

    /// The JSON value of a leaf. `None` for nested levels.
    pub fn leaf_value(&self) -> Option<Value> {
        match self {
            Node::Leaf(text) => Some(Value::String(text.clone())),
            Node::Value(value) => Some(value.clone()),
            Node::Tree(_) => None,
        }
    }

    /// Fully qualified keys of every leaf under this node, which lives at `path`.
    pub fn leaf_keys(&self, path: &str) -> Vec<FlatKey> {
        let mut keys = Vec::new();
        self.collect_leaf_keys(path, &mut keys);
        keys
    }

    fn collect_leaf_keys(&self, path: &str, keys: &mut Vec<FlatKey>) {
        match self {
            Node::Tree(tree) => {
                for (key, child) in tree.iter() {
                    child.collect_leaf_keys(&join_key(path, key), keys);
                }
            }
            Node::Leaf(_) | Node::Value(_) => keys.push(path.to_string()),
        }
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Leaf(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Leaf(text)
    }
}

impl From<Tree> for Node {
    fn from(tree: Tree) -> Self {
        Node::Tree(tree)
    }
}

impl From<Value> for Node {
    /// Strings become text leaves, objects nested levels, anything else a
    /// [`Node::Value`].
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => Node::Leaf(text),
            Value::Object(map) => Node::Tree(tree_from_map(map)),
            other => Node::Value(other),
        }
    }
}

/// One nesting level of a localization dictionary.
///
/// Keys are unique and kept in insertion order, so a file read and written
/// back keeps its layout. Equality ignores ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: IndexMap<String, Node>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `node` under `key`. New keys go to the end; existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    /// Removes `key` while keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Node> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> indexmap::map::IterMut<'_, String, Node> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Node> {
        self.entries.keys()
    }

    /// Total number of leaves at any depth.
    pub fn leaf_count(&self) -> usize {
        self.entries.values().map(Node::leaf_count).sum()
    }

    /// Flattens this tree, see [`flatten`].
    pub fn flatten(&self) -> FlatMap {
        flatten(self)
    }

    /// Flattens this tree, failing with [`Error::DuplicateKey`] when two
    /// leaves map to the same flat key (e.g. `"a.b"` next to `{"a": {"b"}}`).
    pub fn try_flatten(&self) -> Result<FlatMap, Error> {
        let mut flat = FlatMap::new();
        let mut duplicates = Vec::new();
        flatten_into(self, "", &mut flat, &mut duplicates);
        match duplicates.into_iter().next() {
            Some(key) => Err(Error::DuplicateKey(key)),
            None => Ok(flat),
        }
    }

    /// Rebuilds a tree from flat keys by splitting them on [`KEY_SEPARATOR`].
    ///
    /// Fails with [`Error::StructuralMismatch`] when one key needs a leaf where
    /// another key needs a nested level (e.g. `a` and `a.b`), and with
    /// [`Error::UnsupportedValue`] when a value is itself an object.
    pub fn from_flat<I, K, V>(pairs: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut root = Tree::new();
        for (flat_key, value) in pairs {
            let flat_key = flat_key.as_ref();
            let (parents, last) = match flat_key.rsplit_once(KEY_SEPARATOR) {
                Some((parents, last)) => (Some(parents), last),
                None => (None, flat_key),
            };

            let mut level = &mut root;
            let mut walked = String::new();
            for segment in parents.into_iter().flat_map(|p| p.split(KEY_SEPARATOR)) {
                walked = join_key(&walked, segment);
                let next = level
                    .entries
                    .entry(segment.to_string())
                    .or_insert_with(|| Node::Tree(Tree::new()));
                level = match next {
                    Node::Tree(tree) => tree,
                    _ => {
                        return Err(Error::structural_mismatch(
                            walked,
                            NodeKind::Tree,
                            NodeKind::Leaf,
                        ));
                    }
                };
            }

            if let Some(existing) = level.get(last) {
                return Err(Error::structural_mismatch(
                    join_key(&walked, last),
                    NodeKind::Leaf,
                    existing.kind(),
                ));
            }
            let value: Value = value.into();
            let node = match value {
                Value::String(text) => Node::Leaf(text),
                Value::Object(_) => {
                    return Err(Error::UnsupportedValue {
                        key: join_key(&walked, last),
                        kind: "object",
                    });
                }
                other => Node::Value(other),
            };
            level.insert(last, node);
        }
        Ok(root)
    }

    /// Pretty-printed JSON with two-space indentation and literal non-ASCII text.
    pub fn to_json_string(&self) -> Result<String, Error> {
        serde_json::to_string_pretty(self).map_err(Error::Serialize)
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for Tree {
    fn from_iter<T: IntoIterator<Item = (K, N)>>(iter: T) -> Self {
        Tree {
            entries: iter
                .into_iter()
                .map(|(key, node)| (key.into(), node.into()))
                .collect(),
        }
    }
}

/// Joins a parent path and a child key with [`KEY_SEPARATOR`].
pub fn join_key(prefix: &str, key: &str) -> FlatKey {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{KEY_SEPARATOR}{key}")
    }
}

/// Maps every leaf of `tree` to its dot-joined path.
///
/// An empty tree yields an empty map. Empty nested levels produce no keys.
/// A key containing [`KEY_SEPARATOR`] can produce the same path as a nested
/// leaf; the first leaf in document order keeps it. Use [`Tree::try_flatten`]
/// to reject such trees.
pub fn flatten(tree: &Tree) -> FlatMap {
    let mut flat = FlatMap::new();
    flatten_into(tree, "", &mut flat, &mut Vec::new());
    flat
}

fn flatten_into(tree: &Tree, prefix: &str, flat: &mut FlatMap, duplicates: &mut Vec<FlatKey>) {
    for (key, node) in tree {
        let path = join_key(prefix, key);
        match node {
            Node::Tree(child) => flatten_into(child, &path, flat, duplicates),
            leaf => {
                if flat.contains_key(&path) {
                    duplicates.push(path);
                } else if let Some(value) = leaf.leaf_value() {
                    flat.insert(path, value);
                }
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn tree_from_map(map: Map<String, Value>) -> Tree {
    map.into_iter()
        .map(|(key, value)| (key, Node::from(value)))
        .collect()
}

impl TryFrom<Value> for Tree {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(tree_from_map(map)),
            Value::String(_) => Err(Error::structural_mismatch(
                ROOT_KEY,
                NodeKind::Tree,
                NodeKind::Leaf,
            )),
            other => Err(Error::UnsupportedValue {
                key: ROOT_KEY.to_string(),
                kind: value_kind(&other),
            }),
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(text) => serializer.serialize_str(text),
            Node::Tree(tree) => tree.serialize(serializer),
            Node::Value(value) => value.serialize(serializer),
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, node) in &self.entries {
            map.serialize_entry(key, node)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Tree::try_from(value).map_err(serde::de::Error::custom)
    }
}

impl Parser for Tree {
    /// Parses a JSON dictionary from a reader.
    fn from_reader<R: std::io::BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader).map_err(Error::Parse)?;
        Tree::try_from(value)
    }

    /// Writes the dictionary as pretty-printed JSON.
    fn to_writer<W: std::io::Write>(&self, writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(writer, self).map_err(Error::Serialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        Tree::from_str(
            r#"{
                "menu": { "file": { "open": "Open", "close": "Close" }, "edit": "Edit" },
                "title": "App"
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_flatten_nested_tree() {
        let flat = flatten(&sample());
        let keys: Vec<_> = flat.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["menu.file.open", "menu.file.close", "menu.edit", "title"]
        );
        assert_eq!(flat["menu.file.open"], "Open");
        assert_eq!(flat["title"], "App");
    }

    #[test]
    fn test_flatten_empty_tree() {
        assert!(flatten(&Tree::new()).is_empty());
    }

    #[test]
    fn test_flatten_skips_empty_levels() {
        let tree = Tree::from_str(r#"{"a": {}, "b": "B"}"#).unwrap();
        let flat = tree.flatten();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["b"], "B");
    }

    #[test]
    fn test_from_flat_recovers_tree() {
        let tree = sample();
        let rebuilt = Tree::from_flat(tree.flatten()).unwrap();
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn test_from_flat_rejects_leaf_then_subtree() {
        let err = Tree::from_flat([("a", "A"), ("a.b", "B")]).unwrap_err();
        assert!(matches!(
            err,
            Error::StructuralMismatch { ref key, expected: NodeKind::Tree, found: NodeKind::Leaf } if key == "a"
        ));
    }

    #[test]
    fn test_from_flat_rejects_subtree_then_leaf() {
        let err = Tree::from_flat([("a.b", "B"), ("a", "A")]).unwrap_err();
        assert!(matches!(
            err,
            Error::StructuralMismatch { ref key, expected: NodeKind::Leaf, found: NodeKind::Tree } if key == "a"
        ));
    }

    #[test]
    fn test_leaf_count_and_keys() {
        let tree = sample();
        assert_eq!(tree.leaf_count(), 4);
        let menu = tree.get("menu").unwrap();
        assert_eq!(menu.leaf_count(), 3);
        assert_eq!(
            menu.leaf_keys("menu"),
            vec!["menu.file.open", "menu.file.close", "menu.edit"]
        );
        assert_eq!(tree.get("title").unwrap().leaf_keys("title"), vec!["title"]);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut tree: Tree = [("a", "1"), ("b", "2"), ("c", "3")].into_iter().collect();
        tree.remove("b");
        let keys: Vec<_> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let tree = Tree::from_str(r#"{"zeta": "z", "alpha": "a", "mid": "m"}"#).unwrap();
        let keys: Vec<_> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_parse_keeps_non_string_values_as_leaves() {
        let tree =
            Tree::from_str(r#"{"a": {"count": 3, "enabled": false}, "list": ["x"], "none": null}"#)
                .unwrap();

        assert_eq!(tree.leaf_count(), 4);
        let flat = tree.flatten();
        assert_eq!(flat["a.count"], 3);
        assert_eq!(flat["a.enabled"], false);
        assert_eq!(flat["list"], serde_json::json!(["x"]));
        assert!(flat["none"].is_null());
        assert_eq!(tree.get("a").unwrap().kind(), NodeKind::Tree);
        assert_eq!(tree.get("list").unwrap().kind(), NodeKind::Leaf);
        assert!(tree.get("list").unwrap().as_leaf().is_none());
    }

    #[test]
    fn test_non_string_values_written_back_unchanged() {
        let tree = Tree::from_str(r#"{"max": 3, "ratio": 1.5, "on": true}"#).unwrap();
        assert_eq!(
            tree.to_json_string().unwrap(),
            "{\n  \"max\": 3,\n  \"ratio\": 1.5,\n  \"on\": true\n}"
        );
    }

    #[test]
    fn test_from_flat_accepts_non_string_values() {
        let tree = Tree::from_flat([
            ("a.max", serde_json::json!(3)),
            ("a.label", serde_json::json!("Max")),
        ])
        .unwrap();
        assert_eq!(tree, Tree::from_str(r#"{"a": {"max": 3, "label": "Max"}}"#).unwrap());

        let err = Tree::from_flat([("a", serde_json::json!({"b": "B"}))]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { ref key, kind: "object" } if key == "a"));
    }

    #[test]
    fn test_flatten_dotted_key_colliding_with_nested_path() {
        let tree = Tree::from_str(r#"{"a.b": "dotted", "a": {"b": "nested"}}"#).unwrap();

        // the first leaf in document order keeps the path
        let flat = tree.flatten();
        assert_eq!(flat.len(), 1);
        assert_eq!(flat["a.b"], "dotted");

        let err = tree.try_flatten().unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref key) if key == "a.b"));
    }

    #[test]
    fn test_try_flatten_without_collisions() {
        let tree = Tree::from_str(r#"{"a.b": "dotted", "a": {"c": "nested"}}"#).unwrap();
        assert_eq!(tree.try_flatten().unwrap(), tree.flatten());
    }

    #[test]
    fn test_parse_rejects_non_object_root() {
        let err = Tree::from_str(r#""just text""#).unwrap_err();
        assert!(matches!(err, Error::StructuralMismatch { ref key, .. } if key == ROOT_KEY));

        let err = Tree::from_str("[]").unwrap_err();
        assert!(matches!(err, Error::UnsupportedValue { kind: "array", .. }));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = Tree::from_str("{ invalid").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_pretty_output_keeps_unicode_literal() {
        let tree: Tree = [("greeting", "Привет"), ("farewell", "Ciao è")]
            .into_iter()
            .collect();
        let json = tree.to_json_string().unwrap();
        assert_eq!(
            json,
            "{\n  \"greeting\": \"Привет\",\n  \"farewell\": \"Ciao è\"\n}"
        );
    }

    #[test]
    fn test_empty_tree_serializes_as_empty_object() {
        assert_eq!(Tree::new().to_json_string().unwrap(), "{}");
    }

    #[test]
    fn test_deserialize_through_serde() {
        let tree: Tree = serde_json::from_str(r#"{"a": {"b": "B"}}"#).unwrap();
        assert_eq!(tree.flatten()["a.b"], "B");

        let err = serde_json::from_str::<Tree>("[true]").unwrap_err();
        assert!(err.to_string().contains("unsupported value at `$`"));
    }
}
