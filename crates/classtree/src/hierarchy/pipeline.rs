//! Load pipeline
//!
//! Registry → Resolver → Materializer, run as a single unit. The pipeline
//! owns no state between runs; its output is a [`PreparedTree`] that a
//! [`TreeHandle`](super::TreeHandle) can install or the caller can drop.

use tracing::{debug, info, span, Level};

use super::materializer::{MaterializedTree, TreeMaterializer};
use super::registry::ClassRegistry;
use super::resolver::{HierarchyNode, HierarchyResolver};
use super::view::TreeView;
use crate::core::{ClassDefinition, SchemaError, TreeConfig};

/// Output of one successful pipeline run
#[derive(Debug, Clone)]
pub struct PreparedTree {
    pub registry: ClassRegistry,
    pub hierarchy: HierarchyNode,
    pub tree: MaterializedTree,
    pub config: TreeConfig,
}

impl PreparedTree {
    /// Query the prepared tree without installing it
    pub fn view(&self) -> TreeView<'_> {
        TreeView::new(&self.tree, &self.config)
    }
}

/// Runs the three build stages in order
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    resolver: HierarchyResolver,
    materializer: TreeMaterializer,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            resolver: HierarchyResolver::new(),
            materializer: TreeMaterializer::with_config(config),
        }
    }

    pub fn config(&self) -> &TreeConfig {
        self.materializer.config()
    }

    /// Build a tree from class records.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found; nothing partial is returned.
    pub fn run(
        &self,
        records: impl IntoIterator<Item = ClassDefinition>,
    ) -> Result<PreparedTree, SchemaError> {
        let pipeline_span = span!(Level::INFO, "build_tree");
        let _enter = pipeline_span.enter();

        info!("Starting hierarchy pipeline");

        let registry = ClassRegistry::load(records)?;
        debug!(classes = registry.len(), "Registry stage completed");

        let hierarchy = self.resolver.resolve(&registry)?;
        debug!(root = %hierarchy.class_id, "Resolve stage completed");

        let tree = self.materializer.materialize(&hierarchy);
        info!(
            nodes = tree.len(),
            max_depth = tree.max_depth(),
            "Hierarchy pipeline completed"
        );

        Ok(PreparedTree {
            registry,
            hierarchy,
            tree,
            config: *self.config(),
        })
    }
}
