//! Command-line interface for the classtree utility
//!
//! Loads a LinkML schema such as the Biolink Model, builds its category or
//! predicate tree, and answers tree, path, search and detail queries.

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::debug;

use crate::colorizer::Painter;
use crate::render::{render_panel, render_tree, Glyphs, NodeDetail};
use classtree::core::logging::init_logging;
use classtree::prelude::*;

/// Classtree - Browse LinkML class hierarchies as trees
#[derive(Parser)]
#[command(name = "classtree")]
#[command(about = "Browse and search the class and predicate hierarchies of a LinkML schema")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output file (use - for stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Set log level (trace|debug|info|warn|error)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

/// Where the tree comes from
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// LinkML schema YAML file (use - for stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Which tree to build
    #[arg(long, value_enum, default_value_t = KindChoice::Categories)]
    pub kind: KindChoice,

    /// Root element (defaults to NamedThing or related_to)
    #[arg(long)]
    pub root: Option<String>,

    /// Label nodes with the names written in the schema
    #[arg(long)]
    pub original_labels: bool,
}

/// How results are printed
#[derive(Args, Debug, Clone)]
pub struct DisplayArgs {
    /// Character set for branches and borders
    #[arg(long, value_enum, default_value_t = StyleChoice::Unicode)]
    pub style: StyleChoice,

    /// When to use colors in output
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the tree, or the part of it below one class
    Tree {
        #[command(flatten)]
        source: SourceArgs,

        /// Start from this class instead of the root
        #[arg(long)]
        from: Option<String>,

        /// Levels to expand below the starting class
        #[arg(long)]
        max_depth: Option<usize>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// List the direct children of a class
    Children {
        /// Class id (TRAPI form or schema name)
        id: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the path from the root down to a class
    Path {
        /// Class id (TRAPI form or schema name)
        id: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Search class labels
    Search {
        /// Case-insensitive search term
        term: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Also match against descriptions
        #[arg(long)]
        descriptions: bool,

        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show everything known about one class
    Show {
        /// Class id (TRAPI form or schema name)
        id: String,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Summarize a schema: version and size of both trees
    Info {
        /// LinkML schema YAML file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Tree selection
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum KindChoice {
    /// Class hierarchy rooted at NamedThing
    #[default]
    Categories,
    /// Slot hierarchy rooted at related_to
    Predicates,
}

impl From<KindChoice> for TreeKind {
    fn from(value: KindChoice) -> Self {
        match value {
            KindChoice::Categories => TreeKind::Categories,
            KindChoice::Predicates => TreeKind::Predicates,
        }
    }
}

/// Supported output character sets
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum StyleChoice {
    Ascii,
    #[default]
    Unicode,
}

impl From<StyleChoice> for Glyphs {
    fn from(value: StyleChoice) -> Self {
        match value {
            StyleChoice::Ascii => Glyphs::ASCII,
            StyleChoice::Unicode => Glyphs::UNICODE,
        }
    }
}

/// When to colorize output
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Use colors if output is a terminal and NO_COLOR is not set
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

/// Size of one tree in a schema
#[derive(Debug, Clone, Serialize)]
pub struct TreeSummary {
    pub kind: String,
    pub root: String,
    /// Entries in the schema section
    pub elements: usize,
    /// Entries declared `mixin: true`
    pub mixins: usize,
    /// Entries that made it into the tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nodes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output of the `info` command
#[derive(Debug, Clone, Serialize)]
pub struct SchemaInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub trees: Vec<TreeSummary>,
}

/// Main CLI application
pub struct ClasstreeApp {
    config: TreeConfig,
}

impl ClasstreeApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a new application instance with a tree config
    pub fn with_config(config: TreeConfig) -> Self {
        Self { config }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over CLI flags
        let log_level_str = std::env::var("CLASSTREE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .or_else(|| Some(cli.log_level.as_str().to_string()));

        let log_format_str = std::env::var("CLASSTREE_LOG_FORMAT")
            .ok()
            .or_else(|| Some(cli.log_format.as_str().to_string()));

        if let Err(e) = init_logging(log_level_str.as_deref(), log_format_str.as_deref()) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Classtree v{}", env!("CARGO_PKG_VERSION"));
        }

        let rendered = self.execute(cli.command, cli.output.as_ref(), cli.verbose)?;
        self.write_output(cli.output, &rendered)
    }

    /// Run one command and return its rendered output
    pub fn execute(
        &self,
        command: Commands,
        output: Option<&PathBuf>,
        verbose: bool,
    ) -> Result<String> {
        match command {
            Commands::Tree {
                source,
                from,
                max_depth,
                display,
            } => {
                let painter = Painter::new(self.should_colorize(output, display.color));
                self.tree_command(&source, from, max_depth, &display, &painter, verbose)
            }
            Commands::Children { id, source, json } => {
                self.children_command(&source, &id, json, verbose)
            }
            Commands::Path { id, source, json } => self.path_command(&source, &id, json, verbose),
            Commands::Search {
                term,
                source,
                descriptions,
                limit,
                json,
            } => self.search_command(&source, &term, descriptions, limit, json, verbose),
            Commands::Show {
                id,
                source,
                display,
            } => {
                let painter = Painter::new(self.should_colorize(output, display.color));
                self.show_command(&source, &id, &display, &painter, verbose)
            }
            Commands::Info { input, json } => self.info_command(input, json, verbose),
        }
    }

    /// Determine if we should colorize the output based on color choice and output destination
    fn should_colorize(&self, output: Option<&PathBuf>, color: ColorChoice) -> bool {
        match color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                if std::env::var("NO_COLOR").is_ok() {
                    return false;
                }
                match output {
                    None => crossterm::tty::IsTty::is_tty(&std::io::stdout()),
                    Some(p) if p.to_str() == Some("-") => {
                        crossterm::tty::IsTty::is_tty(&std::io::stdout())
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Read the schema and load the requested tree
    fn load_tree(&self, source: &SourceArgs, config: TreeConfig, verbose: bool) -> Result<TreeHandle> {
        let content = self.read_input(source.input.clone())?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let schema = LinkmlSchema::from_yaml_str(&content).context("Failed to parse schema")?;
        let labels = if source.original_labels {
            LabelStyle::Original
        } else {
            LabelStyle::Trapi
        };
        let mut schema_source = SchemaSource::new(schema, source.kind.into()).with_labels(labels);
        if let Some(root) = &source.root {
            schema_source = schema_source.with_root(root.clone());
        }

        let handle = TreeHandle::with_config(config);
        handle.load_from(&schema_source)?;

        if verbose {
            if let Ok(snapshot) = handle.snapshot() {
                eprintln!(
                    "Loaded {} tree with {} nodes",
                    source.kind.as_str(),
                    snapshot.tree().len()
                );
            }
        }
        Ok(handle)
    }

    /// Accept ids in TRAPI form or as written in the schema
    fn resolve_id(snapshot: &Snapshot, kind: KindChoice, id: &str) -> String {
        if snapshot.tree().get(id).is_some() {
            return id.to_string();
        }
        let converted = TreeKind::from(kind).convert(id);
        debug!(id, converted = %converted, "Resolved class id");
        converted
    }

    /// Handle the tree command
    fn tree_command(
        &self,
        source: &SourceArgs,
        from: Option<String>,
        max_depth: Option<usize>,
        display: &DisplayArgs,
        painter: &Painter,
        verbose: bool,
    ) -> Result<String> {
        let handle = self.load_tree(source, self.config, verbose)?;
        let snapshot = handle.snapshot()?;
        let start = match from {
            Some(id) => Self::resolve_id(&snapshot, source.kind, &id),
            None => snapshot.tree().root().id.clone(),
        };

        if display.json {
            let nodes = snapshot
                .view()
                .subtree_of(&start, max_depth.unwrap_or(usize::MAX))?;
            return Ok(serde_json::to_string_pretty(&nodes)?);
        }

        let glyphs = Glyphs::from(display.style);
        Ok(render_tree(snapshot.tree(), &start, max_depth, &glyphs, painter)?)
    }

    /// Handle the children command
    fn children_command(
        &self,
        source: &SourceArgs,
        id: &str,
        json: bool,
        verbose: bool,
    ) -> Result<String> {
        let handle = self.load_tree(source, self.config, verbose)?;
        let snapshot = handle.snapshot()?;
        let id = Self::resolve_id(&snapshot, source.kind, id);
        let children = snapshot.view().children_of(&id)?;

        if json {
            return Ok(serde_json::to_string_pretty(&children)?);
        }
        Ok(children
            .iter()
            .map(|node| match node.child_count {
                0 => node.id.clone(),
                n => format!("{} (+{})", node.id, n),
            })
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Handle the path command
    fn path_command(&self, source: &SourceArgs, id: &str, json: bool, verbose: bool) -> Result<String> {
        let handle = self.load_tree(source, self.config, verbose)?;
        let snapshot = handle.snapshot()?;
        let id = Self::resolve_id(&snapshot, source.kind, id);
        let path = snapshot.view().path_to_root(&id)?;

        if json {
            return Ok(serde_json::to_string_pretty(&path)?);
        }
        Ok(path
            .iter()
            .map(|node| node.id.as_str())
            .collect::<Vec<_>>()
            .join(" > "))
    }

    /// Handle the search command
    fn search_command(
        &self,
        source: &SourceArgs,
        term: &str,
        descriptions: bool,
        limit: Option<usize>,
        json: bool,
        verbose: bool,
    ) -> Result<String> {
        let config = self
            .config
            .with_search_descriptions(descriptions || self.config.search_descriptions)
            .with_search_limit(limit.or(self.config.search_limit));
        let handle = self.load_tree(source, config, verbose)?;
        let snapshot = handle.snapshot()?;
        let results = snapshot.view().search_ranked(term);

        if verbose {
            eprintln!("{} matches for '{}'", results.len(), term);
        }

        if json {
            let nodes: Vec<&DisplayNode> = results.iter().map(|(node, _)| *node).collect();
            return Ok(serde_json::to_string_pretty(&nodes)?);
        }

        let width = results
            .iter()
            .map(|(node, _)| node.id.chars().count())
            .max()
            .unwrap_or(0);
        Ok(results
            .iter()
            .map(|(node, kind)| format!("{:<width$}  {}", node.id, kind.as_str(), width = width))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// Handle the show command
    fn show_command(
        &self,
        source: &SourceArgs,
        id: &str,
        display: &DisplayArgs,
        painter: &Painter,
        verbose: bool,
    ) -> Result<String> {
        let handle = self.load_tree(source, self.config, verbose)?;
        let snapshot = handle.snapshot()?;
        let id = Self::resolve_id(&snapshot, source.kind, id);
        let detail = NodeDetail::from_snapshot(&snapshot, &id)?;

        if display.json {
            return Ok(serde_json::to_string_pretty(&detail)?);
        }
        Ok(render_panel(&detail, &Glyphs::from(display.style), painter))
    }

    /// Handle the info command
    fn info_command(&self, input: Option<PathBuf>, json: bool, verbose: bool) -> Result<String> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }
        let schema = LinkmlSchema::from_yaml_str(&content).context("Failed to parse schema")?;

        let trees = [TreeKind::Categories, TreeKind::Predicates]
            .into_iter()
            .map(|kind| self.summarize(&schema, kind))
            .collect();
        let info = SchemaInfo {
            name: schema.name.clone(),
            version: schema.version(),
            trees,
        };

        if json {
            return Ok(serde_json::to_string_pretty(&info)?);
        }

        let mut lines = vec![
            format!("Schema:   {}", info.name.as_deref().unwrap_or("(unnamed)")),
            format!("Version:  {}", info.version.as_deref().unwrap_or("(unknown)")),
        ];
        for tree in &info.trees {
            let detail = match (&tree.error, tree.nodes, tree.max_depth) {
                (Some(error), _, _) => format!("error: {}", error),
                (None, Some(nodes), Some(depth)) => {
                    format!("{} of {} elements, max depth {}", nodes, tree.elements, depth)
                }
                _ => format!("{} elements", tree.elements),
            };
            let mixins = match tree.mixins {
                0 => String::new(),
                n => format!(" ({} mixin-only)", n),
            };
            lines.push(format!("{:<10} {:<12} {}{}", tree.kind, tree.root, detail, mixins));
        }
        Ok(lines.join("\n"))
    }

    fn summarize(&self, schema: &LinkmlSchema, kind: TreeKind) -> TreeSummary {
        let mut summary = TreeSummary {
            kind: kind.to_string(),
            root: kind.convert(kind.default_root()),
            elements: schema.element_count(kind),
            mixins: schema
                .elements(kind)
                .filter(|(_, element)| element.mixin)
                .count(),
            nodes: None,
            max_depth: None,
            error: None,
        };

        let built = schema
            .records(kind, None, LabelStyle::Trapi)
            .map_err(anyhow::Error::from)
            .and_then(|records| classtree::build(records).map_err(anyhow::Error::from));
        match built {
            Ok(prepared) => {
                summary.nodes = Some(prepared.tree.len());
                summary.max_depth = Some(prepared.tree.max_depth());
            }
            Err(e) => summary.error = Some(e.to_string()),
        }
        summary
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) => {
                if path.to_string_lossy() == "-" {
                    let mut content = String::new();
                    io::stdin().read_to_string(&mut content)?;
                    Ok(content)
                } else {
                    fs::read_to_string(&path).map_err(|e| {
                        anyhow!("Failed to read input file '{}': {}", path.display(), e)
                    })
                }
            }
            None => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        let stdout_content = if content.is_empty() || content.ends_with('\n') {
            content.to_string()
        } else {
            format!("{}\n", content)
        };

        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, &stdout_content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", stdout_content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ClasstreeApp {
    fn default() -> Self {
        Self::new()
    }
}

impl KindChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            KindChoice::Categories => "categories",
            KindChoice::Predicates => "predicates",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    const SCHEMA: &str = r#"
name: Biolink-Model
version: 4.2.0
classes:
  named thing:
    description: a databased entity or concept/class
  gene:
    is_a: named thing
    description: A region (or regions) that includes all of the sequence elements
  disease:
    is_a: named thing
  genetic disease:
    is_a: disease
    mixins:
      - gene
  gene grouping mixin:
    mixin: true
slots:
  related to:
    description: A relationship that is asserted between two named things
  treated by:
    is_a: related to
  causes:
    is_a: related to
"#;

    fn schema_file() -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("biolink-model.yaml");
        fs::write(&path, SCHEMA).unwrap();
        (dir, path)
    }

    fn run(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args).unwrap();
        ClasstreeApp::new().execute(cli.command, cli.output.as_ref(), false)
    }

    #[test]
    fn test_cli_parsing_tree_command() {
        let args = vec![
            "classtree",
            "tree",
            "--input",
            "biolink-model.yaml",
            "--kind",
            "predicates",
            "--max-depth",
            "2",
            "--style",
            "ascii",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Tree {
                source,
                from,
                max_depth,
                display,
            } => {
                assert_eq!(source.input.unwrap().to_string_lossy(), "biolink-model.yaml");
                assert_eq!(source.kind, KindChoice::Predicates);
                assert!(from.is_none());
                assert_eq!(max_depth, Some(2));
                assert_eq!(display.style, StyleChoice::Ascii);
                assert_eq!(display.color, ColorChoice::Auto); // default
                assert!(!display.json);
            }
            _ => panic!("Expected Tree command"),
        }
    }

    #[test]
    fn test_cli_parsing_search_command() {
        let args = vec!["classtree", "search", "gene", "--descriptions", "--limit", "5"];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Search {
                term,
                source,
                descriptions,
                limit,
                json,
            } => {
                assert_eq!(term, "gene");
                assert!(source.input.is_none());
                assert!(descriptions);
                assert_eq!(limit, Some(5));
                assert!(!json);
            }
            _ => panic!("Expected Search command"),
        }
    }

    #[test]
    fn test_verbose_flag() {
        let cli = Cli::try_parse_from(["classtree", "--verbose", "info"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_read_input_from_file() {
        let (_dir, path) = schema_file();
        let content = ClasstreeApp::new().read_input(Some(path)).unwrap();
        assert_eq!(content, SCHEMA);
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = ClasstreeApp::new()
            .read_input(Some(PathBuf::from("/nonexistent/biolink.yaml")))
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read input file"));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("tree.txt");

        ClasstreeApp::new()
            .write_output(Some(file_path.clone()), "NamedThing")
            .unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "NamedThing\n");
    }

    #[test]
    fn test_tree_command_unicode() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "tree", "-i", &path, "--color", "never"]).unwrap();
        let expected = "NamedThing\n\
                        ├── Disease\n\
                        │   └── GeneticDisease [mixins: Gene]\n\
                        └── Gene";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_tree_command_predicates_ascii() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&[
            "classtree", "tree", "-i", &path, "--kind", "predicates", "--style", "ascii",
            "--color", "never",
        ])
        .unwrap();
        assert_eq!(output, "related_to\n|-- causes\n`-- treated_by");
    }

    #[test]
    fn test_tree_command_from_schema_name() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&[
            "classtree", "tree", "-i", &path, "--from", "disease", "--color", "never",
        ])
        .unwrap();
        assert_eq!(output, "Disease\n└── GeneticDisease [mixins: Gene]");
    }

    #[test]
    fn test_tree_command_json_with_depth() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "tree", "-i", &path, "--max-depth", "1", "--json"]).unwrap();
        let nodes: serde_json::Value = serde_json::from_str(&output).unwrap();
        let ids: Vec<&str> = nodes
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["NamedThing", "Disease", "Gene"]);
    }

    #[test]
    fn test_original_labels() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&[
            "classtree", "tree", "-i", &path, "--original-labels", "--max-depth", "0",
            "--color", "never",
        ])
        .unwrap();
        assert_eq!(output, "named thing (NamedThing) (+2)");
    }

    #[test]
    fn test_children_command() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "children", "NamedThing", "-i", &path]).unwrap();
        assert_eq!(output, "Disease (+1)\nGene");
    }

    #[test]
    fn test_children_of_unknown_class() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let err = run(&["classtree", "children", "Protein", "-i", &path]).unwrap_err();
        assert!(err.to_string().contains("Protein"));
    }

    #[test]
    fn test_path_command() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "path", "genetic disease", "-i", &path]).unwrap();
        assert_eq!(output, "NamedThing > Disease > GeneticDisease");
    }

    #[test]
    fn test_search_command_ranks_exact_first() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "search", "gene", "-i", &path]).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Gene "));
        assert!(lines[0].ends_with("exact"));
        assert!(lines[1].starts_with("GeneticDisease"));
    }

    #[test]
    fn test_search_command_descriptions_and_limit() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&[
            "classtree", "search", "sequence", "-i", &path, "--descriptions", "--json",
        ])
        .unwrap();
        let nodes: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(nodes[0]["id"], "Gene");

        let output = run(&["classtree", "search", "e", "-i", &path, "--limit", "1"]).unwrap();
        assert_eq!(output.lines().count(), 1);
    }

    #[test]
    fn test_show_command_panel() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "show", "Gene", "-i", &path, "--color", "never"]).unwrap();
        assert!(output.starts_with("┌─ Gene "));
        assert!(output.contains("mixin users  GeneticDisease"));
        assert!(output.contains("parent       NamedThing"));
    }

    #[test]
    fn test_show_command_json() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "show", "GeneticDisease", "-i", &path, "--json"]).unwrap();
        let detail: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(detail["parent"], "Disease");
        assert_eq!(detail["mixins"][0], "Gene");
        assert_eq!(detail["path"][1], "Disease");
    }

    #[test]
    fn test_info_command() {
        let (_dir, path) = schema_file();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "info", "-i", &path, "--json"]).unwrap();
        let info: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(info["version"], "4.2.0");
        assert_eq!(info["trees"][0]["kind"], "categories");
        assert_eq!(info["trees"][0]["elements"], 5);
        assert_eq!(info["trees"][0]["mixins"], 1);
        assert_eq!(info["trees"][1]["mixins"], 0);
        assert_eq!(info["trees"][0]["nodes"], 4);
        assert_eq!(info["trees"][0]["max_depth"], 2);
        assert_eq!(info["trees"][1]["nodes"], 3);

        let text = run(&["classtree", "info", "-i", &path]).unwrap();
        assert!(text.contains("Version:  4.2.0"));
        assert!(text.contains("4 of 5 elements, max depth 2 (1 mixin-only)"));
    }

    #[test]
    fn test_info_reports_missing_root() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("classes-only.yaml");
        fs::write(&path, "classes:\n  named thing: {}\n").unwrap();
        let path = path.to_string_lossy().to_string();
        let output = run(&["classtree", "info", "-i", &path, "--json"]).unwrap();
        let info: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(info["trees"][0]["nodes"], 1);
        assert!(info["trees"][1]["error"]
            .as_str()
            .unwrap()
            .contains("related_to"));
    }

    #[test]
    fn test_invalid_yaml_is_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "classes: [unterminated").unwrap();
        let path = path.to_string_lossy().to_string();
        let err = run(&["classtree", "tree", "-i", &path]).unwrap_err();
        assert!(err.to_string().contains("Failed to parse schema"));
    }

    #[test]
    fn test_app_default() {
        let _app = ClasstreeApp::default();
    }
}
