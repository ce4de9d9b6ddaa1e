//! Classtree - Browse schema class hierarchies as trees
//!
//! A library for turning a flat set of class definitions (each with one
//! primary parent and optional mixins) into a navigable, render-ready tree,
//! and answering view queries against it.
//!
//! # Quick Start
//!
//! ```rust
//! use classtree::prelude::*;
//!
//! let handle = TreeHandle::new();
//! handle
//!     .load(vec![
//!         ClassDefinition::root("Entity"),
//!         ClassDefinition::child("Gene", "Entity"),
//!         ClassDefinition::child("Disease", "Entity"),
//!         ClassDefinition::child("GeneticDisease", "Disease").with_mixin("Gene"),
//!     ])
//!     .unwrap();
//!
//! let path: Vec<String> = handle
//!     .path_to_root("GeneticDisease")
//!     .unwrap()
//!     .into_iter()
//!     .map(|node| node.id)
//!     .collect();
//! assert_eq!(path, ["Entity", "Disease", "GeneticDisease"]);
//! ```
//!
//! # Advanced Usage
//!
//! Run the stages yourself to inspect intermediate results:
//!
//! ```rust
//! use classtree::prelude::*;
//!
//! let records = vec![
//!     ClassDefinition::root("Entity"),
//!     ClassDefinition::child("Gene", "Entity"),
//! ];
//!
//! let registry = ClassRegistry::load(records).unwrap();
//! let hierarchy = HierarchyResolver::new().resolve(&registry).unwrap();
//! let tree = TreeMaterializer::new().materialize(&hierarchy);
//!
//! let config = TreeConfig::default();
//! let view = TreeView::new(&tree, &config);
//! assert_eq!(view.children_of("Entity").unwrap()[0].id, "Gene");
//! ```

pub mod core;
pub mod hierarchy;
pub mod schema;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ClassDefinition, ClassSource, DisplayNode, LoadError, SchemaError, TreeConfig, ViewError,
    };
    pub use crate::hierarchy::{
        ClassRegistry, HierarchyNode, HierarchyResolver, MatchKind, MaterializedTree, Pipeline,
        PreparedTree, Snapshot, TreeHandle, TreeMaterializer, TreeState, TreeView,
    };
    pub use crate::schema::{LabelStyle, LinkmlSchema, SchemaSource, TreeKind};
}

/// Build a tree from class records without installing it anywhere
///
/// # Example
/// ```rust
/// use classtree::{build, ClassDefinition};
///
/// let prepared = build(vec![ClassDefinition::root("Entity")]).unwrap();
/// assert_eq!(prepared.tree.len(), 1);
/// ```
pub fn build(
    records: impl IntoIterator<Item = ClassDefinition>,
) -> Result<hierarchy::PreparedTree, SchemaError> {
    hierarchy::Pipeline::new().run(records)
}

/// Parse LinkML YAML and load one of its trees into a fresh handle
///
/// # Example
/// ```rust
/// use classtree::load_yaml;
/// use classtree::schema::TreeKind;
///
/// let yaml = "classes:\n  named thing: {}\n  gene:\n    is_a: named thing\n";
/// let handle = load_yaml(yaml, TreeKind::Categories).unwrap();
/// assert_eq!(handle.children_of("NamedThing").unwrap()[0].id, "Gene");
/// ```
pub fn load_yaml(input: &str, kind: schema::TreeKind) -> anyhow::Result<hierarchy::TreeHandle> {
    let schema = schema::LinkmlSchema::from_yaml_str(input)?;
    let handle = hierarchy::TreeHandle::new();
    handle.load_from(&schema::SchemaSource::new(schema, kind))?;
    Ok(handle)
}
