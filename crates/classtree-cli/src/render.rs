//! Text layout for trees and node detail panels

use classtree::prelude::*;
use classtree::{display_width, normalize_whitespace, wrap_text};
use serde::Serialize;

use crate::colorizer::Painter;

/// Width of the key column in detail panels
const KEY_WIDTH: usize = 13;
/// Wrap width for panel values
const VALUE_WIDTH: usize = 60;

/// Characters used to draw branches and panel borders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub tee: &'static str,
    pub elbow: &'static str,
    pub pipe: &'static str,
    pub space: &'static str,
    pub top_left: char,
    pub top_right: char,
    pub bottom_left: char,
    pub bottom_right: char,
    pub horizontal: char,
    pub vertical: char,
}

impl Glyphs {
    pub const UNICODE: Glyphs = Glyphs {
        tee: "├── ",
        elbow: "└── ",
        pipe: "│   ",
        space: "    ",
        top_left: '┌',
        top_right: '┐',
        bottom_left: '└',
        bottom_right: '┘',
        horizontal: '─',
        vertical: '│',
    };

    pub const ASCII: Glyphs = Glyphs {
        tee: "|-- ",
        elbow: "`-- ",
        pipe: "|   ",
        space: "    ",
        top_left: '+',
        top_right: '+',
        bottom_left: '+',
        bottom_right: '+',
        horizontal: '-',
        vertical: '|',
    };
}

/// One rendered row of a text tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLine {
    pub prefix: String,
    pub label: String,
    /// Shown when it differs from the label
    pub id: Option<String>,
    pub has_children: bool,
    pub mixins: Vec<String>,
    /// Children cut off by the depth limit
    pub hidden: usize,
}

impl TreeLine {
    fn new(node: &DisplayNode, prefix: String, hidden: usize) -> Self {
        Self {
            prefix,
            label: node.label.clone(),
            id: (node.id != node.label).then(|| node.id.clone()),
            has_children: node.has_children,
            mixins: node.mixins.clone(),
            hidden,
        }
    }

    pub fn format(&self, painter: &Painter) -> String {
        let mut line = painter.branch(&self.prefix);
        line.push_str(&painter.label(&self.label, self.has_children));
        if let Some(id) = &self.id {
            line.push(' ');
            line.push_str(&painter.id(&format!("({})", id)));
        }
        if !self.mixins.is_empty() {
            line.push(' ');
            line.push_str(&painter.mixin(&format!("[mixins: {}]", self.mixins.join(", "))));
        }
        if self.hidden > 0 {
            line.push(' ');
            line.push_str(&painter.hidden(&format!("(+{})", self.hidden)));
        }
        line
    }
}

/// Lay out the tree below `start` in pre-order.
///
/// With a `max_depth`, nodes that many hops below `start` are shown with a
/// count of their hidden children instead of being expanded.
pub fn tree_lines(
    tree: &MaterializedTree,
    start: &str,
    max_depth: Option<usize>,
    glyphs: &Glyphs,
) -> Result<Vec<TreeLine>, ViewError> {
    let start_idx = tree.index_of(start).ok_or_else(|| ViewError::not_found(start))?;
    let limit = max_depth.unwrap_or(usize::MAX);

    let mut lines = Vec::new();
    // (node, own prefix, prefix handed to its children, hops below start)
    let mut stack = vec![(start_idx, String::new(), String::new(), 0usize)];
    while let Some((idx, prefix, child_prefix, hops)) = stack.pop() {
        let children = tree.child_indices(idx);
        let hidden = if hops >= limit { children.len() } else { 0 };
        lines.push(TreeLine::new(tree.node(idx), prefix, hidden));
        if hidden > 0 {
            continue;
        }

        for (pos, &child) in children.iter().enumerate().rev() {
            let last = pos + 1 == children.len();
            let (branch, rest) = if last {
                (glyphs.elbow, glyphs.space)
            } else {
                (glyphs.tee, glyphs.pipe)
            };
            stack.push((
                child,
                format!("{}{}", child_prefix, branch),
                format!("{}{}", child_prefix, rest),
                hops + 1,
            ));
        }
    }
    Ok(lines)
}

/// Render a tree to text, one node per line
pub fn render_tree(
    tree: &MaterializedTree,
    start: &str,
    max_depth: Option<usize>,
    glyphs: &Glyphs,
    painter: &Painter,
) -> Result<String, ViewError> {
    let lines = tree_lines(tree, start, max_depth, glyphs)?;
    Ok(lines
        .iter()
        .map(|line| line.format(painter))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Everything known about one node, for `show`
#[derive(Debug, Clone, Serialize)]
pub struct NodeDetail {
    #[serde(flatten)]
    pub node: DisplayNode,
    pub path: Vec<String>,
    pub children: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NodeDetail {
    pub fn from_snapshot(snapshot: &Snapshot, id: &str) -> Result<Self, ViewError> {
        let view = snapshot.view();
        let node = view.get_node(id)?.clone();
        let path = view
            .path_to_root(id)?
            .into_iter()
            .map(|n| n.id.clone())
            .collect();
        let children = view
            .children_of(id)?
            .into_iter()
            .map(|n| n.id.clone())
            .collect();
        let description = snapshot
            .registry()
            .lookup(id)?
            .description
            .as_deref()
            .map(normalize_whitespace)
            .filter(|d| !d.is_empty());

        Ok(Self {
            node,
            path,
            children,
            description,
        })
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![("id", self.node.id.clone())];
        if self.node.label != self.node.id {
            rows.push(("label", self.node.label.clone()));
        }
        rows.push(("depth", self.node.depth.to_string()));
        rows.push((
            "parent",
            self.node.parent.clone().unwrap_or_else(|| "(root)".to_string()),
        ));
        rows.push(("path", self.path.join(" > ")));
        if !self.children.is_empty() {
            rows.push(("children", self.children.join(", ")));
        }
        if !self.node.mixins.is_empty() {
            rows.push(("mixins", self.node.mixins.join(", ")));
        }
        if !self.node.mixin_users.is_empty() {
            rows.push(("mixin users", self.node.mixin_users.join(", ")));
        }
        if let Some(description) = &self.description {
            rows.push(("description", description.clone()));
        }
        rows
    }
}

/// Draw a bordered key/value panel for one node
pub fn render_panel(detail: &NodeDetail, glyphs: &Glyphs, painter: &Painter) -> String {
    let title = &detail.node.label;
    let title_width = display_width(title);

    let mut body: Vec<(String, String)> = Vec::new();
    for (key, value) in detail.rows() {
        for (n, line) in wrap_text(&value, VALUE_WIDTH).into_iter().enumerate() {
            let key = if n == 0 { key } else { "" };
            body.push((key.to_string(), line));
        }
    }

    let content_width = body
        .iter()
        .map(|(_, value)| KEY_WIDTH + display_width(value))
        .max()
        .unwrap_or(0);
    let inner = content_width.max(title_width + 1);
    let horizontal = |n: usize| glyphs.horizontal.to_string().repeat(n);
    let vertical = painter.branch(&glyphs.vertical.to_string());

    let mut out = Vec::with_capacity(body.len() + 2);
    out.push(format!(
        "{} {} {}",
        painter.branch(&format!("{}{}", glyphs.top_left, horizontal(1))),
        painter.label(title, true),
        painter.branch(&format!("{}{}", horizontal(inner - title_width - 1), glyphs.top_right)),
    ));
    for (key, value) in &body {
        let pad = inner - KEY_WIDTH - display_width(value);
        out.push(format!(
            "{} {}{}{} {}",
            vertical,
            painter.key(&format!("{:<width$}", key, width = KEY_WIDTH)),
            value,
            " ".repeat(pad),
            vertical,
        ));
    }
    out.push(painter.branch(&format!(
        "{}{}{}",
        glyphs.bottom_left,
        horizontal(inner + 2),
        glyphs.bottom_right
    )));
    out.join("\n")
}
