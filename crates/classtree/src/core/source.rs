//! Core trait for class record sources
//!
//! A source hands the pipeline a flat list of class records. The pipeline
//! does not care where they come from: a LinkML YAML file, a test fixture or
//! an in-memory list.

use anyhow::Result;

use super::ClassDefinition;

/// Core trait for class record providers
///
/// Implementations may block (file or network reads). They are only called
/// from the load path, never from view queries.
pub trait ClassSource: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Produce the records for one load
    fn records(&self) -> Result<Vec<ClassDefinition>>;
}

impl ClassSource for Vec<ClassDefinition> {
    fn name(&self) -> &str {
        "records"
    }

    fn records(&self) -> Result<Vec<ClassDefinition>> {
        Ok(self.clone())
    }
}
