//! Tree materializer
//!
//! Flattens the resolved hierarchy into display nodes stored in pre-order,
//! with parent links, child index lists and an id index. Everything is
//! computed in one traversal and never mutated afterwards.

use std::collections::HashMap;

use tracing::{debug, span, Level};

use super::resolver::HierarchyNode;
use crate::core::{truncate_snippet, DisplayNode, TreeConfig};

/// Immutable, indexed display tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedTree {
    nodes: Vec<DisplayNode>,
    by_id: HashMap<String, usize>,
    parents: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
    /// Lowercased labels, precomputed for search
    search_keys: Vec<String>,
}

impl MaterializedTree {
    /// The root node (pre-order position 0)
    pub fn root(&self) -> &DisplayNode {
        &self.nodes[0]
    }

    pub fn get(&self, id: &str) -> Option<&DisplayNode> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn node(&self, idx: usize) -> &DisplayNode {
        &self.nodes[idx]
    }

    pub fn parent_index(&self, idx: usize) -> Option<usize> {
        self.parents[idx]
    }

    pub fn child_indices(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    pub(crate) fn search_key(&self, idx: usize) -> &str {
        &self.search_keys[idx]
    }

    /// All nodes in pre-order
    pub fn nodes(&self) -> &[DisplayNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Maximum depth of any node
    pub fn max_depth(&self) -> usize {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Converts a resolved hierarchy into a [`MaterializedTree`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeMaterializer {
    config: TreeConfig,
}

impl TreeMaterializer {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Materialize `root` and everything below it
    pub fn materialize(&self, root: &HierarchyNode) -> MaterializedTree {
        let span = span!(Level::DEBUG, "materialize_tree");
        let _enter = span.enter();

        let capacity = root.len();
        let mut tree = MaterializedTree {
            nodes: Vec::with_capacity(capacity),
            by_id: HashMap::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
            children: Vec::with_capacity(capacity),
            search_keys: Vec::with_capacity(capacity),
        };

        // (node, depth, parent position)
        let mut stack: Vec<(&HierarchyNode, usize, Option<usize>)> = vec![(root, 0, None)];
        while let Some((node, depth, parent)) = stack.pop() {
            let idx = tree.nodes.len();
            if let Some(p) = parent {
                tree.children[p].push(idx);
            }

            let parent_id = parent.map(|p| tree.nodes[p].id.clone());
            tree.nodes.push(DisplayNode {
                id: node.class_id.clone(),
                label: node.label.clone(),
                has_children: !node.children.is_empty(),
                child_count: node.children.len(),
                description_snippet: node
                    .description
                    .as_deref()
                    .and_then(|text| truncate_snippet(text, self.config.snippet_budget)),
                depth,
                parent: parent_id,
                mixins: node.mixins.clone(),
                mixin_users: node.additional_parents.iter().cloned().collect(),
            });
            tree.by_id.insert(node.class_id.clone(), idx);
            tree.parents.push(parent);
            tree.children.push(Vec::with_capacity(node.children.len()));
            tree.search_keys.push(node.label.to_lowercase());

            for child in node.children.iter().rev() {
                stack.push((child, depth + 1, Some(idx)));
            }
        }

        debug!(
            nodes = tree.len(),
            max_depth = tree.max_depth(),
            "Tree materialized"
        );
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ClassDefinition;
    use crate::hierarchy::{ClassRegistry, HierarchyResolver};

    fn materialize(records: Vec<ClassDefinition>, config: TreeConfig) -> MaterializedTree {
        let registry = ClassRegistry::load(records).unwrap();
        let root = HierarchyResolver::new().resolve(&registry).unwrap();
        TreeMaterializer::with_config(config).materialize(&root)
    }

    fn scenario() -> Vec<ClassDefinition> {
        vec![
            ClassDefinition::root("Entity").with_description("The root of everything"),
            ClassDefinition::child("Gene", "Entity"),
            ClassDefinition::child("Disease", "Entity"),
            ClassDefinition::child("GeneticDisease", "Disease").with_mixin("Gene"),
        ]
    }

    #[test]
    fn test_preorder_layout() {
        let tree = materialize(scenario(), TreeConfig::default());
        let ids: Vec<&str> = tree.nodes().iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["Entity", "Disease", "GeneticDisease", "Gene"]);
        assert_eq!(tree.root().id, "Entity");
    }

    #[test]
    fn test_depth_and_counts() {
        let tree = materialize(scenario(), TreeConfig::default());
        let root = tree.get("Entity").unwrap();
        assert_eq!(root.depth, 0);
        assert_eq!(root.child_count, 2);
        assert!(root.has_children);
        assert_eq!(root.parent, None);

        let leaf = tree.get("GeneticDisease").unwrap();
        assert_eq!(leaf.depth, 2);
        assert_eq!(leaf.child_count, 0);
        assert!(!leaf.has_children);
        assert_eq!(leaf.parent.as_deref(), Some("Disease"));
        assert_eq!(leaf.mixins, vec!["Gene"]);
        assert_eq!(tree.max_depth(), 2);
    }

    #[test]
    fn test_mixin_users_projected() {
        let tree = materialize(scenario(), TreeConfig::default());
        assert_eq!(tree.get("Gene").unwrap().mixin_users, vec!["GeneticDisease"]);
        assert!(tree.get("Disease").unwrap().mixin_users.is_empty());
    }

    #[test]
    fn test_parent_and_child_indices_agree() {
        let tree = materialize(scenario(), TreeConfig::default());
        for idx in 0..tree.len() {
            for &child in tree.child_indices(idx) {
                assert_eq!(tree.parent_index(child), Some(idx));
                assert_eq!(tree.node(child).depth, tree.node(idx).depth + 1);
            }
        }
    }

    #[test]
    fn test_description_snippet_budget() {
        let tree = materialize(scenario(), TreeConfig::default().with_snippet_budget(8));
        assert_eq!(
            tree.get("Entity").unwrap().description_snippet.as_deref(),
            Some("The roo…")
        );
        assert_eq!(tree.get("Gene").unwrap().description_snippet, None);
    }

    #[test]
    fn test_search_keys_are_lowercase() {
        let tree = materialize(scenario(), TreeConfig::default());
        let idx = tree.index_of("GeneticDisease").unwrap();
        assert_eq!(tree.search_key(idx), "geneticdisease");
    }
}
