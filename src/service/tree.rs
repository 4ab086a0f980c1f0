// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent node tree backing the store.
//!
//! Every aggregate node sits behind an `Arc` and is never mutated once built.
//! Updates copy the mappings along the addressed path and reuse every other
//! subtree by pointer, so old versions stay valid and cost nothing to keep.

use crate::domain::{Number, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

/// An immutable mapping node shared between store versions.
pub(crate) type Branch = Arc<BTreeMap<String, Node>>;

/// Internal, shareable form of a [`Value`].
#[derive(Clone, Debug)]
pub(crate) enum Node {
    Null,
    Bool(bool),
    Number(Number),
    String(Arc<str>),
    Sequence(Arc<[Node]>),
    Mapping(Branch),
}

pub(crate) fn empty_branch() -> Branch {
    Arc::new(BTreeMap::new())
}

impl Node {
    pub(crate) fn as_branch(&self) -> Option<&Branch> {
        match self {
            Node::Mapping(branch) => Some(branch),
            _ => None,
        }
    }

    /// Materializes a fully independent `Value`.
    pub(crate) fn to_value(&self) -> Value {
        match self {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.to_string()),
            Node::Sequence(items) => Value::Sequence(items.iter().map(Node::to_value).collect()),
            Node::Mapping(branch) => Value::Mapping(branch_to_mapping(branch)),
        }
    }

    /// Returns `true` if both nodes are the same shared allocation.
    ///
    /// Scalars without an allocation never compare as shared.
    #[cfg(test)]
    pub(crate) fn shares_with(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::String(a), Node::String(b)) => Arc::ptr_eq(a, b),
            (Node::Sequence(a), Node::Sequence(b)) => Arc::ptr_eq(a, b),
            (Node::Mapping(a), Node::Mapping(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => Node::Number(n),
            Value::String(s) => Node::String(Arc::from(s)),
            Value::Sequence(items) => Node::Sequence(items.into_iter().map(Node::from).collect()),
            Value::Mapping(map) => Node::Mapping(Arc::new(
                map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
            )),
        }
    }
}

pub(crate) fn branch_to_mapping(branch: &Branch) -> BTreeMap<String, Value> {
    branch
        .iter()
        .map(|(k, v)| (k.clone(), v.to_value()))
        .collect()
}

/// Follows `segments` from `root`.
///
/// Returns `None` when a segment is missing or a non-mapping is reached
/// before the last segment.
pub(crate) fn lookup<'a>(root: &'a Branch, segments: &[String]) -> Option<&'a Node> {
    let (first, rest) = segments.split_first()?;
    rest.iter()
        .try_fold(root.get(first)?, |node, segment| node.as_branch()?.get(segment))
}

/// Returns a new root with `leaf` stored at `segments`.
///
/// Missing or non-mapping intermediate entries become fresh mappings. Only
/// the mappings on the path are copied; their other entries are shared.
pub(crate) fn assoc_in(root: &Branch, segments: &[String], leaf: Node) -> Branch {
    let Some((head, rest)) = segments.split_first() else {
        return Arc::clone(root);
    };

    let node = if rest.is_empty() {
        leaf
    } else {
        let child = match root.get(head) {
            Some(Node::Mapping(branch)) => Arc::clone(branch),
            _ => empty_branch(),
        };
        Node::Mapping(assoc_in(&child, rest, leaf))
    };

    let mut entries = BTreeMap::clone(root);
    entries.insert(head.clone(), node);
    Arc::new(entries)
}

/// Deep-merges `incoming` over `existing`.
///
/// Two mappings merge key by key, recursing where both sides hold a mapping.
/// Any other pairing resolves to `incoming`; sequences are never merged
/// element-wise. Keys only in `existing` are kept as-is.
pub(crate) fn merge_deep(existing: &Node, incoming: &Node) -> Node {
    match (existing, incoming) {
        (Node::Mapping(base), Node::Mapping(patch)) => {
            let mut entries = BTreeMap::clone(base);
            for (key, value) in patch.iter() {
                let merged = match base.get(key) {
                    Some(current) => merge_deep(current, value),
                    None => value.clone(),
                };
                entries.insert(key.clone(), merged);
            }
            Node::Mapping(Arc::new(entries))
        }
        (_, incoming) => incoming.clone(),
    }
}

/// Returns a new root whose top-level entries from `entries` replace those
/// in `root`.
pub(crate) fn replace_top_level(root: &Branch, entries: BTreeMap<String, Value>) -> Branch {
    let mut next = BTreeMap::clone(root);
    next.extend(entries.into_iter().map(|(k, v)| (k, Node::from(v))));
    Arc::new(next)
}
