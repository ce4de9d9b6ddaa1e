//! Hierarchy resolver
//!
//! Turns a validated registry into a single owned tree. The primary parent
//! is the only structural edge; every other inbound relation (mixins) is
//! demoted to an annotation on the mixin target, so the result stays a tree
//! even though the class graph is a DAG.

use std::collections::{HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, span, trace, Level};

use super::registry::ClassRegistry;
use crate::core::{ClassDefinition, SchemaError};

/// A node of the resolved hierarchy
///
/// Each node owns its children. `additional_parents` lists the classes that
/// declare this class as a mixin, in insertion order; it never adds an edge.
///
/// `Clone`, `PartialEq` and `Drop` walk the subtree with an explicit stack,
/// so arbitrarily deep chains never exhaust the thread stack.
#[derive(Debug, Eq)]
pub struct HierarchyNode {
    pub class_id: String,
    pub label: String,
    pub description: Option<String>,
    pub mixins: Vec<String>,
    pub children: Vec<HierarchyNode>,
    pub additional_parents: IndexSet<String>,
}

impl HierarchyNode {
    /// Number of nodes in this subtree, including this one
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false: a subtree contains at least its own root
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order iterator over this subtree
    pub fn iter(&self) -> impl Iterator<Item = &HierarchyNode> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }

    /// Find a node in this subtree
    pub fn find(&self, class_id: &str) -> Option<&HierarchyNode> {
        self.iter().find(|node| node.class_id == class_id)
    }

    /// Ids of direct children in stored order
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|c| c.class_id.as_str()).collect()
    }

    /// Copy of this node's own fields with the given children
    fn with_children(&self, children: Vec<HierarchyNode>) -> Self {
        Self {
            class_id: self.class_id.clone(),
            label: self.label.clone(),
            description: self.description.clone(),
            mixins: self.mixins.clone(),
            children,
            additional_parents: self.additional_parents.clone(),
        }
    }

    fn same_fields(&self, other: &Self) -> bool {
        self.class_id == other.class_id
            && self.label == other.label
            && self.description == other.description
            && self.mixins == other.mixins
            && self.additional_parents == other.additional_parents
            && self.children.len() == other.children.len()
    }
}

impl Clone for HierarchyNode {
    fn clone(&self) -> Self {
        // Reverse pre-order finishes every subtree before its parent; a
        // parent's children are then the last entries on `done`, last child
        // first.
        let below: Vec<&HierarchyNode> = self.iter().skip(1).collect();
        let mut done: Vec<HierarchyNode> = Vec::with_capacity(below.len());
        for node in below.into_iter().rev() {
            let split = done.len() - node.children.len();
            let children = done.drain(split..).rev().collect();
            done.push(node.with_children(children));
        }
        done.reverse();
        self.with_children(done)
    }
}

impl PartialEq for HierarchyNode {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some((a, b)) = pending.pop() {
            if !a.same_fields(b) {
                return false;
            }
            pending.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Drop for HierarchyNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

/// Builds the display hierarchy from a registry
#[derive(Debug, Default, Clone, Copy)]
pub struct HierarchyResolver;

impl HierarchyResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the registry into a tree rooted at the registry root.
    ///
    /// # Errors
    ///
    /// A registry that passed [`ClassRegistry::load`] always resolves. An
    /// unreachable class would mean the registry invariants were broken and
    /// is reported as [`SchemaError::Cycle`].
    pub fn resolve(&self, registry: &ClassRegistry) -> Result<HierarchyNode, SchemaError> {
        let resolve_span = span!(Level::DEBUG, "resolve_hierarchy", classes = registry.len());
        let _enter = resolve_span.enter();

        let children_of = Self::children_map(registry);
        let mut annotations = Self::mixin_annotations(registry);

        let root = registry.root();
        let order = Self::preorder(root, &children_of);
        if order.len() != registry.len() {
            let reached: HashSet<&str> = order.iter().copied().collect();
            let unreachable = registry
                .classes()
                .find(|class| !reached.contains(class.id.as_str()))
                .map_or_else(|| root.id.clone(), |class| class.id.clone());
            return Err(SchemaError::cycle(unreachable));
        }

        // Children are built before their parents by walking pre-order
        // backwards.
        let mut built: HashMap<&str, HierarchyNode> = HashMap::with_capacity(order.len());
        for id in order.iter().rev() {
            let class = registry.lookup(id).map_err(|_| SchemaError::cycle(*id))?;
            let children = children_of
                .get(id)
                .into_iter()
                .flatten()
                .filter_map(|child| built.remove(child.id.as_str()))
                .collect();
            let node = HierarchyNode {
                class_id: class.id.clone(),
                label: class.display_label().to_string(),
                description: class.description.clone(),
                mixins: class.mixins.clone(),
                children,
                additional_parents: annotations.shift_remove(*id).unwrap_or_default(),
            };
            built.insert(*id, node);
        }

        let tree = built
            .remove(root.id.as_str())
            .ok_or_else(|| SchemaError::cycle(&root.id))?;
        debug!(root = %tree.class_id, nodes = order.len(), "Hierarchy resolved");
        Ok(tree)
    }

    /// Parent id to sorted children, following primary-parent edges only
    fn children_map(registry: &ClassRegistry) -> HashMap<&str, Vec<&ClassDefinition>> {
        let mut children_of: HashMap<&str, Vec<&ClassDefinition>> = HashMap::new();
        for class in registry.classes() {
            if let Some(parent) = class.primary_parent.as_deref() {
                children_of.entry(parent).or_default().push(class);
            }
        }
        for children in children_of.values_mut() {
            children.sort_by_cached_key(|class| {
                let label = class.display_label();
                (label.to_lowercase(), label.to_string(), class.id.clone())
            });
        }
        children_of
    }

    /// Mixin target id to the classes using it, in registry then mixin order
    fn mixin_annotations(registry: &ClassRegistry) -> IndexMap<String, IndexSet<String>> {
        let mut annotations: IndexMap<String, IndexSet<String>> = IndexMap::new();
        for class in registry.classes() {
            for mixin in &class.mixins {
                if class.primary_parent.as_deref() == Some(mixin.as_str()) || *mixin == class.id {
                    continue;
                }
                if !registry.contains(mixin) {
                    debug!(class = %class.id, mixin = %mixin, "Skipping unknown mixin target");
                    continue;
                }
                trace!(class = %class.id, mixin = %mixin, "Recording mixin annotation");
                annotations
                    .entry(mixin.clone())
                    .or_default()
                    .insert(class.id.clone());
            }
        }
        annotations
    }

    fn preorder<'a>(
        root: &'a ClassDefinition,
        children_of: &HashMap<&str, Vec<&'a ClassDefinition>>,
    ) -> Vec<&'a str> {
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(class) = stack.pop() {
            order.push(class.id.as_str());
            if let Some(children) = children_of.get(class.id.as_str()) {
                stack.extend(children.iter().rev());
            }
        }
        order
    }
}
