//! Versioned handle on the current tree
//!
//! The handle is either `Unloaded` or `Ready`. A reload builds a complete
//! [`PreparedTree`] off to the side and swaps it in with a single atomic
//! store, so readers observe either the old snapshot or the new one. Readers
//! that already hold an `Arc<Snapshot>` keep it until they drop it.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::Context;
use arc_swap::ArcSwapOption;
use tracing::{info, span, warn, Level};

use super::materializer::MaterializedTree;
use super::pipeline::{Pipeline, PreparedTree};
use super::registry::ClassRegistry;
use super::resolver::HierarchyNode;
use super::view::TreeView;
use crate::core::{ClassDefinition, ClassSource, DisplayNode, SchemaError, TreeConfig, ViewError};

/// Coarse state of a [`TreeHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    Unloaded,
    Ready { generation: u64 },
}

/// An installed, immutable tree stamped with its generation
#[derive(Debug)]
pub struct Snapshot {
    generation: u64,
    prepared: PreparedTree,
}

impl Snapshot {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> TreeView<'_> {
        self.prepared.view()
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.prepared.registry
    }

    pub fn hierarchy(&self) -> &HierarchyNode {
        &self.prepared.hierarchy
    }

    pub fn tree(&self) -> &MaterializedTree {
        &self.prepared.tree
    }
}

/// Shared handle on the current snapshot
///
/// Cheap to share behind an `Arc`; all methods take `&self`.
pub struct TreeHandle {
    pipeline: Pipeline,
    current: ArcSwapOption<Snapshot>,
    generations: AtomicU64,
}

impl fmt::Debug for TreeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeHandle")
            .field("state", &self.state())
            .field("config", self.pipeline.config())
            .finish()
    }
}

impl Default for TreeHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeHandle {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            pipeline: Pipeline::with_config(config),
            current: ArcSwapOption::empty(),
            generations: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> TreeState {
        let current = self.current.load();
        match &*current {
            Some(snapshot) => TreeState::Ready {
                generation: snapshot.generation,
            },
            None => TreeState::Unloaded,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state(), TreeState::Ready { .. })
    }

    /// Current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotReady`] before the first successful load.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, ViewError> {
        self.current.load_full().ok_or(ViewError::NotReady)
    }

    /// Build a tree without changing state. Dropping the result cancels the
    /// load.
    pub fn prepare(
        &self,
        records: impl IntoIterator<Item = ClassDefinition>,
    ) -> Result<PreparedTree, SchemaError> {
        self.pipeline.run(records)
    }

    /// Atomically make `prepared` the current tree; returns its generation
    pub fn install(&self, prepared: PreparedTree) -> u64 {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(Snapshot {
            generation,
            prepared,
        });
        // Racing installs never move the handle back to an older generation
        self.current.rcu(|current| match current {
            Some(existing) if existing.generation > generation => Some(Arc::clone(existing)),
            _ => Some(Arc::clone(&snapshot)),
        });
        info!(generation, "Installed tree snapshot");
        generation
    }

    /// Prepare and install in one step.
    ///
    /// # Errors
    ///
    /// On a [`SchemaError`] the previous state stays active.
    pub fn load(
        &self,
        records: impl IntoIterator<Item = ClassDefinition>,
    ) -> Result<u64, SchemaError> {
        let load_span = span!(Level::INFO, "load_tree");
        let _enter = load_span.enter();

        match self.prepare(records) {
            Ok(prepared) => Ok(self.install(prepared)),
            Err(err) => {
                warn!(error = %err, kind = err.kind(), state = ?self.state(), "Load rejected, keeping current state");
                Err(err)
            }
        }
    }

    /// Pull records from `source` and load them
    pub fn load_from(&self, source: &dyn ClassSource) -> anyhow::Result<u64> {
        let records = source
            .records()
            .with_context(|| format!("Failed to read records from {}", source.name()))?;
        let generation = self
            .load(records)
            .with_context(|| format!("Failed to build tree from {}", source.name()))?;
        Ok(generation)
    }

    pub fn get_node(&self, id: &str) -> Result<DisplayNode, ViewError> {
        let snapshot = self.snapshot()?;
        let node = snapshot.view().get_node(id)?.clone();
        Ok(node)
    }

    pub fn children_of(&self, id: &str) -> Result<Vec<DisplayNode>, ViewError> {
        let snapshot = self.snapshot()?;
        let nodes = snapshot.view().children_of(id)?;
        Ok(nodes.into_iter().cloned().collect())
    }

    pub fn path_to_root(&self, id: &str) -> Result<Vec<DisplayNode>, ViewError> {
        let snapshot = self.snapshot()?;
        let nodes = snapshot.view().path_to_root(id)?;
        Ok(nodes.into_iter().cloned().collect())
    }

    pub fn search(&self, term: &str) -> Result<Vec<DisplayNode>, ViewError> {
        let snapshot = self.snapshot()?;
        let nodes = snapshot.view().search(term);
        Ok(nodes.into_iter().cloned().collect())
    }

    pub fn subtree_of(&self, id: &str, max_depth: usize) -> Result<Vec<DisplayNode>, ViewError> {
        let snapshot = self.snapshot()?;
        let nodes = snapshot.view().subtree_of(id, max_depth)?;
        Ok(nodes.into_iter().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<ClassDefinition> {
        vec![
            ClassDefinition::root("Entity"),
            ClassDefinition::child("Gene", "Entity"),
        ]
    }

    #[test]
    fn test_unloaded_operations_fail_not_ready() {
        let handle = TreeHandle::new();
        assert_eq!(handle.state(), TreeState::Unloaded);
        assert_eq!(handle.children_of("Entity").unwrap_err(), ViewError::NotReady);
        assert_eq!(handle.path_to_root("Entity").unwrap_err(), ViewError::NotReady);
        assert_eq!(handle.search("gene").unwrap_err(), ViewError::NotReady);
        assert_eq!(handle.subtree_of("Entity", 1).unwrap_err(), ViewError::NotReady);
        assert_eq!(handle.get_node("Entity").unwrap_err(), ViewError::NotReady);
    }

    #[test]
    fn test_load_transitions_to_ready() {
        let handle = TreeHandle::new();
        let generation = handle.load(records()).unwrap();
        assert_eq!(generation, 1);
        assert_eq!(handle.state(), TreeState::Ready { generation: 1 });
        assert_eq!(handle.children_of("Entity").unwrap()[0].id, "Gene");
    }

    #[test]
    fn test_failed_first_load_stays_unloaded() {
        let handle = TreeHandle::new();
        let err = handle
            .load(vec![ClassDefinition::root("A"), ClassDefinition::root("B")])
            .unwrap_err();
        assert_eq!(err.kind(), "multiple_roots");
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_failed_reload_keeps_previous_generation() {
        let handle = TreeHandle::new();
        handle.load(records()).unwrap();
        assert!(handle
            .load(vec![ClassDefinition::child("Orphan", "Missing")])
            .is_err());
        assert_eq!(handle.state(), TreeState::Ready { generation: 1 });
        assert!(handle.get_node("Gene").is_ok());
    }

    #[test]
    fn test_reader_keeps_old_snapshot_across_reload() {
        let handle = TreeHandle::new();
        handle.load(records()).unwrap();
        let old = handle.snapshot().unwrap();

        handle
            .load(vec![
                ClassDefinition::root("Entity"),
                ClassDefinition::child("Disease", "Entity"),
            ])
            .unwrap();

        assert_eq!(old.generation(), 1);
        assert!(old.view().get_node("Gene").is_ok());
        assert_eq!(handle.snapshot().unwrap().generation(), 2);
        assert!(handle.get_node("Gene").is_err());
    }

    #[test]
    fn test_prepared_tree_can_be_discarded() {
        let handle = TreeHandle::new();
        let prepared = handle.prepare(records()).unwrap();
        drop(prepared);
        assert_eq!(handle.state(), TreeState::Unloaded);
    }

    #[test]
    fn test_load_from_source() {
        let handle = TreeHandle::new();
        let generation = handle.load_from(&records()).unwrap();
        assert_eq!(generation, 1);
        assert_eq!(handle.snapshot().unwrap().registry().len(), 2);
    }
}
