//! View controller
//!
//! Read-only queries over a materialized tree: children, ancestor paths,
//! search and bounded subtrees. Nothing here allocates beyond the result
//! vectors and nothing mutates the tree.

use std::cmp::Ordering;

use tracing::trace;

use super::materializer::MaterializedTree;
use crate::core::{DisplayNode, TreeConfig, ViewError};

/// How a node matched a search term, best first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MatchKind {
    Exact,
    Prefix,
    Substring,
    Description,
}

impl MatchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MatchKind::Exact => "exact",
            MatchKind::Prefix => "prefix",
            MatchKind::Substring => "substring",
            MatchKind::Description => "description",
        }
    }
}

/// Query interface over one materialized tree
#[derive(Debug, Clone, Copy)]
pub struct TreeView<'a> {
    tree: &'a MaterializedTree,
    config: &'a TreeConfig,
}

impl<'a> TreeView<'a> {
    pub fn new(tree: &'a MaterializedTree, config: &'a TreeConfig) -> Self {
        Self { tree, config }
    }

    fn index(&self, id: &str) -> Result<usize, ViewError> {
        self.tree.index_of(id).ok_or_else(|| ViewError::not_found(id))
    }

    pub fn root(&self) -> &'a DisplayNode {
        self.tree.root()
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Detail lookup for a single node
    pub fn get_node(&self, id: &str) -> Result<&'a DisplayNode, ViewError> {
        self.index(id).map(|idx| self.tree.node(idx))
    }

    /// Direct children in stored order
    pub fn children_of(&self, id: &str) -> Result<Vec<&'a DisplayNode>, ViewError> {
        let idx = self.index(id)?;
        trace!(id, "children_of");
        Ok(self
            .tree
            .child_indices(idx)
            .iter()
            .map(|&child| self.tree.node(child))
            .collect())
    }

    /// Ancestors from the root down to `id`, inclusive
    pub fn path_to_root(&self, id: &str) -> Result<Vec<&'a DisplayNode>, ViewError> {
        let mut current = Some(self.index(id)?);
        trace!(id, "path_to_root");

        let mut path = Vec::new();
        while let Some(idx) = current {
            path.push(self.tree.node(idx));
            current = self.tree.parent_index(idx);
        }
        path.reverse();
        Ok(path)
    }

    /// Nodes within `max_depth` hops below `id` (the node itself is hop 0),
    /// in pre-order
    pub fn subtree_of(&self, id: &str, max_depth: usize) -> Result<Vec<&'a DisplayNode>, ViewError> {
        let start = self.index(id)?;
        trace!(id, max_depth, "subtree_of");

        let mut nodes = Vec::new();
        let mut stack = vec![(start, 0usize)];
        while let Some((idx, hops)) = stack.pop() {
            nodes.push(self.tree.node(idx));
            if hops < max_depth {
                stack.extend(
                    self.tree
                        .child_indices(idx)
                        .iter()
                        .rev()
                        .map(|&child| (child, hops + 1)),
                );
            }
        }
        Ok(nodes)
    }

    /// Case-insensitive search on labels (and descriptions if enabled).
    ///
    /// Exact label matches come first, then prefix, then substring, then
    /// description-only matches. Within each kind a label equal to the term
    /// as typed comes first; remaining ties are ordered by depth, then label.
    /// A blank term returns nothing.
    pub fn search(&self, term: &str) -> Vec<&'a DisplayNode> {
        self.search_ranked(term)
            .into_iter()
            .map(|(node, _)| node)
            .collect()
    }

    /// Like [`search`](Self::search), also reporting how each node matched
    pub fn search_ranked(&self, term: &str) -> Vec<(&'a DisplayNode, MatchKind)> {
        let term = term.trim();
        let needle = term.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits: Vec<(usize, MatchKind)> = (0..self.tree.len())
            .filter_map(|idx| self.match_kind(idx, &needle).map(|kind| (idx, kind)))
            .collect();

        // Within a match kind, a label equal to the term as typed beats one
        // that only matches case-insensitively
        let differs_in_case = |idx: usize| self.tree.node(idx).label != term;
        hits.sort_by(|&(a, kind_a), &(b, kind_b)| {
            kind_a
                .cmp(&kind_b)
                .then_with(|| differs_in_case(a).cmp(&differs_in_case(b)))
                .then_with(|| self.compare_nodes(a, b))
        });
        if let Some(limit) = self.config.search_limit {
            hits.truncate(limit);
        }

        trace!(term = %needle, hits = hits.len(), "search");
        hits.into_iter()
            .map(|(idx, kind)| (self.tree.node(idx), kind))
            .collect()
    }

    fn match_kind(&self, idx: usize, needle: &str) -> Option<MatchKind> {
        let key = self.tree.search_key(idx);
        if key == needle {
            Some(MatchKind::Exact)
        } else if key.starts_with(needle) {
            Some(MatchKind::Prefix)
        } else if key.contains(needle) {
            Some(MatchKind::Substring)
        } else if self.config.search_descriptions
            && self
                .tree
                .node(idx)
                .description_snippet
                .as_deref()
                .is_some_and(|text| text.to_lowercase().contains(needle))
        {
            Some(MatchKind::Description)
        } else {
            None
        }
    }

    fn compare_nodes(&self, a: usize, b: usize) -> Ordering {
        let (node_a, node_b) = (self.tree.node(a), self.tree.node(b));
        node_a
            .depth
            .cmp(&node_b.depth)
            .then_with(|| self.tree.search_key(a).cmp(self.tree.search_key(b)))
            .then_with(|| node_a.label.cmp(&node_b.label))
            .then_with(|| node_a.id.cmp(&node_b.id))
    }
}
