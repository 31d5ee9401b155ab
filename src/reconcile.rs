//! Key reconciliation of a target dictionary against the base dictionary.
//!
//! After a successful [`reconcile`], the target has exactly the flat key set
//! of the source:
//! - keys missing from the target are copied from the source, every copied
//!   text leaf prefixed with the placeholder marker (numbers, booleans, null
//!   and arrays are copied as they are),
//! - keys the source does not have are deleted,
//! - leaves present on both sides are left untouched.

use serde::{Deserialize, Serialize};

use crate::{
    error::Error,
    tree::{FlatKey, Node, NodeKind, Tree, join_key},
};

/// Tag prefixed onto copied base text so translators can search for it.
pub const PLACEHOLDER_MARKER: &str = "[NEEDS TRANSLATION]";

/// Options controlling reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOptions {
    pub marker: String,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            marker: PLACEHOLDER_MARKER.to_string(),
        }
    }
}

impl ReconcileOptions {
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// The placeholder leaf written for untranslated base `text`.
    pub fn placeholder(&self, text: &str) -> String {
        format!("{} {}", self.marker, text)
    }

    /// Whether `text` still carries the placeholder marker.
    pub fn is_placeholder(&self, text: &str) -> bool {
        text.starts_with(&self.marker)
    }
}

/// Keys changed by one reconciliation, as fully qualified flat keys.
///
/// `added` follows source order, `removed` follows target order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub added: Vec<FlatKey>,
    pub removed: Vec<FlatKey>,
    /// Whether the target was modified at all. Also set when only empty
    /// nested levels were added or removed, which report no keys.
    pub changed: bool,
}

impl ReconcileReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// A key holding a nested level on one side and a leaf on the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralConflict {
    pub key: FlatKey,
    /// Kind of the node in the source.
    pub expected: NodeKind,
    /// Kind of the node in the target.
    pub found: NodeKind,
}

impl From<StructuralConflict> for Error {
    fn from(conflict: StructuralConflict) -> Self {
        Error::structural_mismatch(conflict.key, conflict.expected, conflict.found)
    }
}

/// Reconciles `target` against `source` in place with the default marker.
pub fn reconcile(target: &mut Tree, source: &Tree) -> Result<ReconcileReport, Error> {
    reconcile_with(target, source, &ReconcileOptions::default())
}

/// Reconciles `target` against `source` in place.
///
/// Fails with [`Error::StructuralMismatch`] when a key holds a nested level on
/// one side and a leaf on the other. The check runs before any mutation, so
/// on error `target` is unchanged.
pub fn reconcile_with(
    target: &mut Tree,
    source: &Tree,
    options: &ReconcileOptions,
) -> Result<ReconcileReport, Error> {
    if let Some(conflict) = structural_conflicts(target, source).into_iter().next() {
        return Err(conflict.into());
    }

    let mut report = ReconcileReport::default();
    add_missing(target, source, "", options, &mut report);
    remove_extra(target, source, "", &mut report);
    Ok(report)
}

/// Returns a reconciled copy of `target`, leaving the input untouched.
pub fn reconciled(
    target: &Tree,
    source: &Tree,
    options: &ReconcileOptions,
) -> Result<(Tree, ReconcileReport), Error> {
    let mut updated = target.clone();
    let report = reconcile_with(&mut updated, source, options)?;
    Ok((updated, report))
}

/// Every key of `source` that `target` holds with the other kind, in source order.
///
/// Conflicts below a conflicting key are not looked at.
pub fn structural_conflicts(target: &Tree, source: &Tree) -> Vec<StructuralConflict> {
    let mut conflicts = Vec::new();
    collect_conflicts(target, source, "", &mut conflicts);
    conflicts
}

fn collect_conflicts(
    target: &Tree,
    source: &Tree,
    prefix: &str,
    conflicts: &mut Vec<StructuralConflict>,
) {
    for (key, source_node) in source {
        let Some(target_node) = target.get(key) else {
            continue;
        };
        let path = join_key(prefix, key);
        match (source_node, target_node) {
            (Node::Tree(s), Node::Tree(t)) => collect_conflicts(t, s, &path, conflicts),
            (expected, found) if expected.kind() != found.kind() => {
                conflicts.push(StructuralConflict {
                    key: path,
                    expected: expected.kind(),
                    found: found.kind(),
                });
            }
            _ => {}
        }
    }
}

fn add_missing(
    target: &mut Tree,
    source: &Tree,
    prefix: &str,
    options: &ReconcileOptions,
    report: &mut ReconcileReport,
) {
    for (key, source_node) in source {
        let path = join_key(prefix, key);
        match (target.get_mut(key), source_node) {
            (None, _) => {
                let copy = tagged_copy(source_node, &path, options, &mut report.added);
                target.insert(key.clone(), copy);
                report.changed = true;
            }
            (Some(Node::Tree(t)), Node::Tree(s)) => add_missing(t, s, &path, options, report),
            (Some(_), _) => {}
        }
    }
}

fn tagged_copy(
    node: &Node,
    path: &str,
    options: &ReconcileOptions,
    added: &mut Vec<FlatKey>,
) -> Node {
    match node {
        Node::Leaf(text) => {
            added.push(path.to_string());
            Node::Leaf(options.placeholder(text))
        }
        Node::Value(value) => {
            added.push(path.to_string());
            Node::Value(value.clone())
        }
        Node::Tree(tree) => {
            let mut copy = Tree::new();
            for (key, child) in tree {
                let child_copy = tagged_copy(child, &join_key(path, key), options, added);
                copy.insert(key.clone(), child_copy);
            }
            Node::Tree(copy)
        }
    }
}

fn remove_extra(target: &mut Tree, source: &Tree, prefix: &str, report: &mut ReconcileReport) {
    let mut stale = Vec::new();
    for (key, target_node) in target.iter_mut() {
        let path = join_key(prefix, key);
        match (source.get(key), target_node) {
            (None, node) => {
                report.removed.extend(node.leaf_keys(&path));
                stale.push(key.clone());
            }
            (Some(Node::Tree(s)), Node::Tree(t)) => remove_extra(t, s, &path, report),
            (Some(_), _) => {}
        }
    }
    if !stale.is_empty() {
        report.changed = true;
    }
    for key in stale {
        target.remove(&key);
    }
}
