//! Core type definitions
//!
//! Input records, the render-ready node projection and the tree
//! configuration shared by the pipeline stages.

use serde::{Deserialize, Serialize};

/// Default character budget for description snippets
pub const DEFAULT_SNIPPET_BUDGET: usize = 240;

/// A class as handed over by a schema loader
///
/// Immutable once loaded into a [`ClassRegistry`](crate::hierarchy::ClassRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub id: String,
    #[serde(default)]
    pub primary_parent: Option<String>,
    #[serde(default)]
    pub mixins: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Display label; the id is used when absent
    #[serde(default)]
    pub label: Option<String>,
}

impl ClassDefinition {
    /// Create a root class (no primary parent)
    pub fn root(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            primary_parent: None,
            mixins: Vec::new(),
            description: None,
            label: None,
        }
    }

    /// Create a class under `parent`
    pub fn child(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            primary_parent: Some(parent.into()),
            ..Self::root(id)
        }
    }

    pub fn with_mixin(mut self, mixin: impl Into<String>) -> Self {
        self.mixins.push(mixin.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label shown to users
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Returns true if this class has no primary parent
    pub fn is_root(&self) -> bool {
        self.primary_parent.is_none()
    }
}

/// Render-ready projection of a class
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    pub id: String,
    pub label: String,
    pub has_children: bool,
    pub child_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_snippet: Option<String>,
    pub depth: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Mixins declared by this class
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mixins: Vec<String>,
    /// Classes that use this class as a mixin
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mixin_users: Vec<String>,
}

/// Configuration for materialization and search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum characters in a description snippet, ellipsis included
    pub snippet_budget: usize,
    /// Also match search terms against description snippets
    pub search_descriptions: bool,
    /// Maximum number of search results (None = unlimited)
    pub search_limit: Option<usize>,
}

impl TreeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snippet_budget(mut self, budget: usize) -> Self {
        self.snippet_budget = budget;
        self
    }

    pub fn with_search_descriptions(mut self, enabled: bool) -> Self {
        self.search_descriptions = enabled;
        self
    }

    pub fn with_search_limit(mut self, limit: Option<usize>) -> Self {
        self.search_limit = limit;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            snippet_budget: DEFAULT_SNIPPET_BUDGET,
            search_descriptions: false,
            search_limit: None,
        }
    }
}
