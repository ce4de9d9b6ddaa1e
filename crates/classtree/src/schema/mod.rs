//! Schema adapters
//!
//! Turn schema files into [`ClassDefinition`](crate::core::ClassDefinition)
//! records. The hierarchy pipeline never depends on this module.

mod linkml;
mod naming;

pub use linkml::{ElementDefinition, LabelStyle, LinkmlSchema, SchemaSource, TreeKind};
pub use naming::{to_category_name, to_predicate_name};
