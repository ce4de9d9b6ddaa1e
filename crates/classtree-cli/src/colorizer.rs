//! Terminal colorization for tree output
//!
//! Applies ANSI escape codes to tree and panel parts using crossterm.

use crossterm::style::{Color, Stylize};

/// Paints rendered parts when color is enabled, passes text through otherwise
///
/// Colors:
/// - Branch glyphs and panel borders: Cyan
/// - Labels of nodes with children: Bold
/// - Ids shown next to labels: Dark grey
/// - Mixin annotations: Magenta
/// - Hidden child counts: Yellow
/// - Panel keys: Green
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Painter {
    enabled: bool,
}

impl Painter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn branch(&self, text: &str) -> String {
        self.paint(text, Color::Cyan)
    }

    pub fn label(&self, text: &str, has_children: bool) -> String {
        if self.enabled && has_children {
            format!("{}", text.bold())
        } else {
            text.to_string()
        }
    }

    pub fn id(&self, text: &str) -> String {
        self.paint(text, Color::DarkGrey)
    }

    pub fn mixin(&self, text: &str) -> String {
        self.paint(text, Color::Magenta)
    }

    pub fn hidden(&self, text: &str) -> String {
        self.paint(text, Color::Yellow)
    }

    pub fn key(&self, text: &str) -> String {
        self.paint(text, Color::Green)
    }

    fn paint(&self, text: &str, color: Color) -> String {
        // Empty strings stay empty so padding math is unaffected
        if self.enabled && !text.is_empty() {
            format!("{}", text.with(color))
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_painter_passes_through() {
        let painter = Painter::plain();
        assert_eq!(painter.branch("├── "), "├── ");
        assert_eq!(painter.label("Gene", true), "Gene");
        assert!(!painter.is_enabled());
    }

    #[test]
    fn test_enabled_painter_adds_escape_codes() {
        let painter = Painter::new(true);
        let painted = painter.mixin("[mixins: Gene]");
        assert!(painted.contains("\x1b["));
        assert!(painted.contains("[mixins: Gene]"));
    }

    #[test]
    fn test_leaf_labels_stay_plain() {
        let painter = Painter::new(true);
        assert_eq!(painter.label("Gene", false), "Gene");
        assert!(painter.label("Disease", true).contains("\x1b["));
    }

    #[test]
    fn test_empty_text_not_painted() {
        assert_eq!(Painter::new(true).branch(""), "");
    }
}
