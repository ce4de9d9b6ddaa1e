//! Hierarchy construction and tree-view materialization
//!
//! Implements the load pipeline and the read path:
//! Registry → Resolver → Materializer → View, with a [`TreeHandle`] holding
//! the current result.

mod handle;
mod materializer;
mod pipeline;
mod registry;
mod resolver;
mod view;

pub use handle::{Snapshot, TreeHandle, TreeState};
pub use materializer::{MaterializedTree, TreeMaterializer};
pub use pipeline::{Pipeline, PreparedTree};
pub use registry::ClassRegistry;
pub use resolver::{HierarchyNode, HierarchyResolver};
pub use view::{MatchKind, TreeView};
