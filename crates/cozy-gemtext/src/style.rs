//! Styled output produced by the renderer.
//!
//! Lines carry semantic [`Tone`]s rather than concrete colours; the
//! presentation layer maps tones onto its palette.

/// Semantic styling for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tone {
    Text,
    Heading1,
    Heading2,
    Heading3,
    /// Link shortcut column.
    Shortcut,
    LinkLabel,
    /// Target shown after a labelled link.
    LinkTarget,
    Quote,
    Bullet,
    /// Preformatted text.
    Verbatim,
}

/// What kind of source line produced a [`StyledLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Text,
    Link,
    Quote,
    Heading(u8),
    Bullet,
    Verbatim,
}

/// A run of text sharing one tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// One rendered output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub kind: LineKind,
    /// Leading columns of blank space.
    pub indent: usize,
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn new(kind: LineKind, indent: usize, spans: Vec<Span>) -> Self {
        Self {
            kind,
            indent,
            spans,
        }
    }

    /// Single-span line.
    pub fn single(kind: LineKind, indent: usize, text: impl Into<String>, tone: Tone) -> Self {
        Self::new(kind, indent, vec![Span::new(text, tone)])
    }

    /// The line's text without indentation or styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Width in columns including indentation.
    pub fn width(&self) -> usize {
        self.indent + self.spans.iter().map(|s| s.text.chars().count()).sum::<usize>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_joins_spans() {
        let line = StyledLine::new(
            LineKind::Link,
            0,
            vec![
                Span::new("  1", Tone::Shortcut),
                Span::new(" ", Tone::Text),
                Span::new("home", Tone::LinkLabel),
            ],
        );
        assert_eq!(line.text(), "  1 home");
        assert_eq!(line.width(), 8);
    }

    #[test]
    fn width_counts_indent_and_chars() {
        let line = StyledLine::single(LineKind::Text, 4, "héllo", Tone::Text);
        assert_eq!(line.width(), 9);
    }
}
