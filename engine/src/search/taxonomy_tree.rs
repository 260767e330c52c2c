//! Taxonomy tree built fresh from separator-joined bucket keys.

use std::collections::{BTreeMap, BTreeSet};

use common::search_result::FacetBucket;
use serde::Serialize;


#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaxonomyNode {
    pub label: String,
    pub children: BTreeMap<String, TaxonomyNode>,
    /// Count of the bucket addressing exactly this path.
    pub self_count: u64,
    /// self_count plus the rollup of every child.
    pub rollup_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionChange {
    pub path: String,
    pub selected: bool,
}

/// Rebuilt from the current bucket list on every query. Nodes are addressed
/// by path string, never by pointer identity, so there is nothing to dangle
/// and nothing to mutate incrementally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxonomyTree {
    root: TaxonomyNode,
    separator: String,
}

impl TaxonomyTree {
    /// Walk/create one node per path segment. The last segment's own count
    /// is overwritten, not accumulated: two buckets with the same path is a
    /// caller error, not something to silently sum.
    pub fn build(buckets: &[FacetBucket], separator: &str) -> Self {
        let mut root = TaxonomyNode::default();
        for bucket in buckets {
            let mut node = &mut root;
            for segment in bucket.key.split(separator) {
                let segment = segment.trim();
                node = node
                    .children
                    .entry(segment.to_string())
                    .or_insert_with(|| TaxonomyNode {
                        label: segment.to_string(),
                        ..TaxonomyNode::default()
                    });
            }
            node.self_count = bucket.doc_count;
        }
        rollup(&mut root);
        TaxonomyTree { root, separator: separator.to_string() }
    }

    pub fn root(&self) -> &TaxonomyNode {
        &self.root
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn node_at(&self, path: &str) -> Option<&TaxonomyNode> {
        let mut node = &self.root;
        for segment in path.split(self.separator.as_str()) {
            node = node.children.get(segment.trim())?;
        }
        Some(node)
    }

    /// Propagate a check or uncheck through the branch. Mutates `selection`
    /// and returns only the entries whose state actually changed.
    ///
    /// Check: the path itself, every strict ancestor, and every strict
    /// descendant present in the tree. Uncheck: the path and every strict
    /// descendant go; each strict ancestor goes too unless another selected
    /// path still lives under it.
    pub fn cascade_select(
        &self,
        path: &str,
        checked: bool,
        selection: &mut BTreeSet<String>,
    ) -> Vec<SelectionChange> {
        let mut changes = Vec::new();
        if checked {
            let mut to_add = vec![path.to_string()];
            to_add.extend(self.ancestors(path));
            to_add.extend(self.descendants(path));
            for p in to_add {
                if selection.insert(p.clone()) {
                    changes.push(SelectionChange { path: p, selected: true });
                }
            }
        } else {
            let below = format!("{}{}", path, self.separator);
            let to_drop: Vec<String> = selection
                .iter()
                .filter(|p| p.as_str() == path || p.starts_with(&below))
                .cloned()
                .collect();
            for p in to_drop {
                selection.remove(&p);
                changes.push(SelectionChange { path: p, selected: false });
            }
            // ancestors bottom-up: one stays only while another selected
            // path still lives under it
            for ancestor in self.ancestors(path).into_iter().rev() {
                let under = format!("{}{}", ancestor, self.separator);
                let still_used = selection
                    .iter()
                    .any(|p| p.as_str() != ancestor && p.starts_with(&under));
                if !still_used && selection.remove(&ancestor) {
                    changes.push(SelectionChange { path: ancestor, selected: false });
                }
            }
        }
        changes
    }

    /// Every strict ancestor path, outermost first.
    fn ancestors(&self, path: &str) -> Vec<String> {
        let segments = self.segments(path);
        (1..segments.len()).map(|k| segments[..k].join(&self.separator)).collect()
    }

    /// Full paths of every node strictly below `path`, when it exists.
    fn descendants(&self, path: &str) -> Vec<String> {
        let mut out = Vec::new();
        if let Some(node) = self.node_at(path) {
            collect_descendants(node, path, &self.separator, &mut out);
        }
        out
    }

    fn segments<'a>(&self, path: &'a str) -> Vec<&'a str> {
        path.split(self.separator.as_str()).map(str::trim).collect()
    }
}

fn collect_descendants(node: &TaxonomyNode, prefix: &str, separator: &str, out: &mut Vec<String>) {
    for (label, child) in &node.children {
        let path = format!("{prefix}{separator}{label}");
        out.push(path.clone());
        collect_descendants(child, &path, separator, out);
    }
}

fn rollup(node: &mut TaxonomyNode) {
    let mut total = node.self_count;
    for child in node.children.values_mut() {
        rollup(child);
        total += child.rollup_count;
    }
    node.rollup_count = total;
}

/// True when a value equals a selected path or lives strictly below one.
pub fn selection_matches(value_key: &str, selection: &BTreeSet<String>, separator: &str) -> bool {
    selection.iter().any(|path| {
        value_key == path.as_str()
            || (value_key.starts_with(path.as_str())
                && value_key[path.len()..].starts_with(separator))
    })
}
