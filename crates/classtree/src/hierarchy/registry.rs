//! Class registry
//!
//! Validated, read-only map from class id to its definition. Loading is
//! all-or-nothing: either every structural check passes or no registry is
//! returned.

use std::collections::HashMap;

use indexmap::IndexMap;
use tracing::{debug, span, trace, Level};

use crate::core::{ClassDefinition, SchemaError, ViewError};

/// Read-only registry of class definitions, in input order
#[derive(Debug, Clone)]
pub struct ClassRegistry {
    classes: IndexMap<String, ClassDefinition>,
    root: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    InProgress,
    Done,
}

impl ClassRegistry {
    /// Load and validate class records.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for duplicate ids, parents that do not
    /// exist, zero or several roots, or a cycle in the primary-parent chain.
    pub fn load(
        records: impl IntoIterator<Item = ClassDefinition>,
    ) -> Result<Self, SchemaError> {
        let load_span = span!(Level::DEBUG, "load_registry");
        let _enter = load_span.enter();

        let mut classes: IndexMap<String, ClassDefinition> = IndexMap::new();
        for record in records {
            if classes.contains_key(&record.id) {
                return Err(SchemaError::duplicate_id(record.id));
            }
            classes.insert(record.id.clone(), record);
        }

        for class in classes.values() {
            if let Some(parent) = &class.primary_parent {
                if !classes.contains_key(parent) {
                    return Err(SchemaError::unknown_parent(&class.id, parent));
                }
            }
        }

        let roots: Vec<String> = classes
            .values()
            .filter(|class| class.is_root())
            .map(|class| class.id.clone())
            .collect();
        let root = match roots.len() {
            0 => return Err(SchemaError::NoRoot),
            1 => roots[0].clone(),
            _ => return Err(SchemaError::MultipleRoots { roots }),
        };

        Self::check_acyclic(&classes)?;

        debug!(class_count = classes.len(), root = %root, "Registry loaded");
        Ok(Self { classes, root })
    }

    /// Walk each primary-parent chain once; a chain that runs into itself
    /// is a cycle.
    fn check_acyclic(classes: &IndexMap<String, ClassDefinition>) -> Result<(), SchemaError> {
        let mut state: HashMap<&str, Visit> = HashMap::with_capacity(classes.len());

        for start in classes.keys() {
            let mut chain: Vec<&str> = Vec::new();
            let mut current = Some(start.as_str());

            while let Some(id) = current {
                match state.get(id) {
                    Some(Visit::Done) => break,
                    Some(Visit::InProgress) => {
                        trace!(id, "Cycle detected");
                        return Err(SchemaError::cycle(id));
                    }
                    None => {}
                }
                state.insert(id, Visit::InProgress);
                chain.push(id);
                current = classes
                    .get(id)
                    .and_then(|class| class.primary_parent.as_deref());
            }

            for id in chain {
                state.insert(id, Visit::Done);
            }
        }

        Ok(())
    }

    /// Look up a class by id.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::NotFound`] if the id is unknown.
    pub fn lookup(&self, id: &str) -> Result<&ClassDefinition, ViewError> {
        self.classes.get(id).ok_or_else(|| ViewError::not_found(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.classes.contains_key(id)
    }

    /// The unique root class
    pub fn root(&self) -> &ClassDefinition {
        &self.classes[self.root.as_str()]
    }

    /// All classes in input order
    pub fn classes(&self) -> impl Iterator<Item = &ClassDefinition> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
