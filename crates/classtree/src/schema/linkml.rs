//! LinkML schema adapter
//!
//! Reads the parts of a LinkML YAML schema (such as the Biolink Model) that
//! the tree needs: the `classes` and `slots` maps with their `is_a`,
//! `mixins` and `description` keys. Everything else in the file is ignored.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{debug, span, Level};

use super::naming::{to_category_name, to_predicate_name};
use crate::core::{ClassDefinition, ClassSource, LoadError};

/// Which element map of the schema to build a tree from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum TreeKind {
    /// `classes`, rooted at `NamedThing`
    #[default]
    Categories,
    /// `slots`, rooted at `related_to`
    Predicates,
}

impl TreeKind {
    pub fn default_root(self) -> &'static str {
        match self {
            TreeKind::Categories => "NamedThing",
            TreeKind::Predicates => "related_to",
        }
    }

    /// Convert an English element name to its TRAPI form
    pub fn convert(self, name: &str) -> String {
        match self {
            TreeKind::Categories => to_category_name(name),
            TreeKind::Predicates => to_predicate_name(name),
        }
    }

    /// Schema section holding this kind of element
    pub fn section(self) -> &'static str {
        match self {
            TreeKind::Categories => "classes",
            TreeKind::Predicates => "slots",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeKind::Categories => write!(f, "categories"),
            TreeKind::Predicates => write!(f, "predicates"),
        }
    }
}

impl FromStr for TreeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "categories" | "classes" => Ok(TreeKind::Categories),
            "predicates" | "slots" => Ok(TreeKind::Predicates),
            _ => Err(format!("Unknown tree kind: {}", s)),
        }
    }
}

/// How record labels are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelStyle {
    /// Label is the TRAPI id (`NamedThing`)
    #[default]
    Trapi,
    /// Label is the name as written in the schema (`named thing`)
    Original,
}

/// One class or slot entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ElementDefinition {
    #[serde(default)]
    pub is_a: Option<String>,
    #[serde(default)]
    pub mixins: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Declared as a mixin-only element
    #[serde(default)]
    pub mixin: bool,
}

static EMPTY_ELEMENT: ElementDefinition = ElementDefinition {
    is_a: None,
    mixins: Vec::new(),
    description: None,
    mixin: false,
};

/// The subset of a LinkML schema used to build trees
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LinkmlSchema {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    version: Option<serde_yaml::Value>,
    #[serde(default)]
    classes: Option<IndexMap<String, Option<ElementDefinition>>>,
    #[serde(default)]
    slots: Option<IndexMap<String, Option<ElementDefinition>>>,
}

impl LinkmlSchema {
    /// Parse schema YAML.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Yaml`] with the error location when available.
    pub fn from_yaml_str(content: &str) -> Result<Self, LoadError> {
        serde_yaml::from_str(content).map_err(|e| LoadError::yaml(&e))
    }

    /// Read and parse a schema file
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Schema version as written (`version: 4.2.0` or `version: 3`)
    pub fn version(&self) -> Option<String> {
        match self.version.as_ref()? {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Entries of one section in file order; empty entries read as defaults
    pub fn elements(&self, kind: TreeKind) -> impl Iterator<Item = (&str, &ElementDefinition)> {
        let section = match kind {
            TreeKind::Categories => self.classes.as_ref(),
            TreeKind::Predicates => self.slots.as_ref(),
        };
        section.into_iter().flatten().map(|(name, element)| {
            (
                name.as_str(),
                element.as_ref().unwrap_or(&EMPTY_ELEMENT),
            )
        })
    }

    pub fn element_count(&self, kind: TreeKind) -> usize {
        self.elements(kind).count()
    }

    /// Convert one section into class records rooted at `root`.
    ///
    /// Names are converted to TRAPI form. Only elements whose `is_a` chain
    /// reaches the root are kept; the root's own `is_a` is dropped so it
    /// becomes the single tree root.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::MissingRoot`] if the root is not in the section.
    pub fn records(
        &self,
        kind: TreeKind,
        root: Option<&str>,
        labels: LabelStyle,
    ) -> Result<Vec<ClassDefinition>, LoadError> {
        let records_span = span!(Level::DEBUG, "schema_records", kind = %kind);
        let _enter = records_span.enter();

        let root_id = kind.convert(root.unwrap_or(kind.default_root()));

        let converted: Vec<ClassDefinition> = self
            .elements(kind)
            .map(|(name, element)| ClassDefinition {
                id: kind.convert(name),
                primary_parent: element.is_a.as_deref().map(|p| kind.convert(p)),
                mixins: element.mixins.iter().map(|m| kind.convert(m)).collect(),
                description: element.description.clone(),
                label: match labels {
                    LabelStyle::Trapi => None,
                    LabelStyle::Original => Some(name.to_string()),
                },
            })
            .collect();

        if !converted.iter().any(|class| class.id == root_id) {
            return Err(LoadError::MissingRoot { root: root_id });
        }

        let parents: HashMap<&str, Option<&str>> = converted
            .iter()
            .map(|class| (class.id.as_str(), class.primary_parent.as_deref()))
            .collect();
        let mut reaches_root: HashMap<&str, bool> = HashMap::with_capacity(parents.len());

        for class in &converted {
            let mut chain: Vec<&str> = Vec::new();
            let mut current = class.id.as_str();
            let reached = loop {
                if current == root_id {
                    break true;
                }
                if let Some(&known) = reaches_root.get(current) {
                    break known;
                }
                if chain.contains(&current) {
                    break false;
                }
                chain.push(current);
                match parents.get(current) {
                    Some(Some(parent)) => current = *parent,
                    _ => break false,
                }
            };
            for id in chain {
                reaches_root.insert(id, reached);
            }
        }

        let total = converted.len();
        let records: Vec<ClassDefinition> = converted
            .iter()
            .filter(|class| class.id == root_id || reaches_root.get(class.id.as_str()) == Some(&true))
            .cloned()
            .map(|mut class| {
                if class.id == root_id {
                    class.primary_parent = None;
                }
                class
            })
            .collect();

        debug!(
            kept = records.len(),
            dropped = total - records.len(),
            root = %root_id,
            section = kind.section(),
            "Converted schema section"
        );
        Ok(records)
    }
}

/// A [`ClassSource`] over one section of a parsed schema
#[derive(Debug, Clone)]
pub struct SchemaSource {
    schema: LinkmlSchema,
    kind: TreeKind,
    root: Option<String>,
    labels: LabelStyle,
}

impl SchemaSource {
    pub fn new(schema: LinkmlSchema, kind: TreeKind) -> Self {
        Self {
            schema,
            kind,
            root: None,
            labels: LabelStyle::default(),
        }
    }

    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn with_labels(mut self, labels: LabelStyle) -> Self {
        self.labels = labels;
        self
    }

    pub fn schema(&self) -> &LinkmlSchema {
        &self.schema
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }
}

impl ClassSource for SchemaSource {
    fn name(&self) -> &str {
        self.schema.name.as_deref().unwrap_or("linkml schema")
    }

    fn records(&self) -> anyhow::Result<Vec<ClassDefinition>> {
        Ok(self
            .schema
            .records(self.kind, self.root.as_deref(), self.labels)?)
    }
}
