//! Diagram theme: colors and fonts applied to emitted SVG.

use std::sync::OnceLock;

/// Visual theme for rendered diagrams.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramTheme {
    /// Diagram background.
    pub background: String,
    /// Node fill.
    pub node_fill: String,
    /// Node border.
    pub node_border: String,
    /// Edge stroke and arrowheads.
    pub line_color: String,
    /// All text, including edge labels.
    pub text_color: String,
    /// Fill behind edge labels.
    pub edge_label_background: String,
    /// Font stack for every text element.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size: u32,
}

impl Default for DiagramTheme {
    /// Dark theme tuned for the site's slate palette.
    fn default() -> Self {
        Self {
            background: "#1e293b".to_owned(),
            node_fill: "#374151".to_owned(),
            node_border: "#1e40af".to_owned(),
            line_color: "#9ca3af".to_owned(),
            text_color: "#ffffff".to_owned(),
            edge_label_background: "#374151".to_owned(),
            font_family: "Inter, system-ui, sans-serif".to_owned(),
            font_size: 12,
        }
    }
}

static THEME: OnceLock<DiagramTheme> = OnceLock::new();

/// Install the process-wide theme. Only the first call wins; later calls
/// return `false` and leave the installed theme untouched.
pub fn init_theme(theme: DiagramTheme) -> bool {
    THEME.set(theme).is_ok()
}

/// The installed theme, initializing to the default on first access.
pub fn theme() -> &'static DiagramTheme {
    THEME.get_or_init(DiagramTheme::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_dark() {
        let theme = DiagramTheme::default();
        assert_eq!(theme.background, "#1e293b");
        assert_eq!(theme.text_color, "#ffffff");
        assert_eq!(theme.font_size, 12);
    }

    #[test]
    fn test_init_is_one_shot() {
        // Whichever call lands first, the second init must report failure.
        let _ = init_theme(DiagramTheme::default());
        assert!(!init_theme(DiagramTheme {
            background: "#000000".to_owned(),
            ..DiagramTheme::default()
        }));
    }
}
