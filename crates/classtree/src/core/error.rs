//! Core error types for hierarchy processing
//!
//! This module defines the error types surfaced by the load pipeline and the
//! view layer. Schema errors abort a load; view errors are per-request.

use thiserror::Error;

/// Structural invariant violations found while loading class records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Schema error: duplicate class id '{id}'")]
    DuplicateId { id: String },

    #[error("Schema error: class '{id}' references unknown parent '{parent}'")]
    UnknownParent { id: String, parent: String },

    #[error("Schema error: no root class (every class declares a parent)")]
    NoRoot,

    #[error("Schema error: multiple roots: {}", roots.join(", "))]
    MultipleRoots { roots: Vec<String> },

    #[error("Schema error: cycle in parent chain at class '{id}'")]
    Cycle { id: String },
}

impl SchemaError {
    /// Create a duplicate id error
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create an unknown parent error
    pub fn unknown_parent(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::UnknownParent {
            id: id.into(),
            parent: parent.into(),
        }
    }

    /// Create a cycle error naming one class on the cycle
    pub fn cycle(id: impl Into<String>) -> Self {
        Self::Cycle { id: id.into() }
    }

    /// Short machine-readable name of the violation
    pub fn kind(&self) -> &'static str {
        match self {
            SchemaError::DuplicateId { .. } => "duplicate_id",
            SchemaError::UnknownParent { .. } => "unknown_parent",
            SchemaError::NoRoot => "no_root",
            SchemaError::MultipleRoots { .. } => "multiple_roots",
            SchemaError::Cycle { .. } => "cycle",
        }
    }
}

/// Errors returned by view queries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("Not found: no class with id '{id}'")]
    NotFound { id: String },

    #[error("Not ready: no schema has been loaded")]
    NotReady,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl ViewError {
    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// HTTP-style status code a serving layer can map this error to
    pub fn status_code(&self) -> u16 {
        match self {
            ViewError::NotFound { .. } => 404,
            ViewError::NotReady => 503,
            ViewError::Schema(_) => 422,
        }
    }
}

/// Errors raised while reading a schema file into class records
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("YAML error: {message} at {location}")]
    Yaml { message: String, location: String },

    #[error("Root '{root}' not found in schema")]
    MissingRoot { root: String },
}

impl LoadError {
    /// Create a YAML error from a `serde_yaml` failure, keeping its location
    pub fn yaml(err: &serde_yaml::Error) -> Self {
        Self::Yaml {
            message: err.to_string(),
            location: err.location().map_or_else(
                || "unknown location".to_string(),
                |l| format!("line {}, column {}", l.line(), l.column()),
            ),
        }
    }
}
