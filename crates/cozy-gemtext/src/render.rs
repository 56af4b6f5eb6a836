//! Render text/gemini lines into styled output.
//!
//! Lines are classified in priority order, first match wins:
//!
//! 1. ```` ``` ```` toggles preformatted mode (the toggle line is dropped;
//!    inside the block nothing else is classified)
//! 2. `=>` link, or `=:` upload link on schemes that support uploads
//! 3. `>` quote
//! 4. `###`, `##`, `#` headings
//! 5. `*` bullet
//! 6. plain text

use cozy_types::scheme;

use crate::links::{Link, LinkTable};
use crate::style::{LineKind, Span, StyledLine, Tone};

const TEXT_INDENT: usize = 4;
const VERBATIM_INDENT: usize = 4;
const QUOTE_INDENT: usize = 4;
const BULLET_INDENT: usize = 2;

/// Heading markers from most to least specific, with level and indent.
const HEADINGS: [(&str, u8, usize); 3] = [("###", 3, 0), ("##", 2, 1), ("#", 1, 2)];

/// The styled lines and link table of one rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedDocument {
    pub lines: Vec<StyledLine>,
    pub links: LinkTable,
    /// Text of the first heading, if any.
    pub title: Option<String>,
}

impl RenderedDocument {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Render a text/gemini document.
///
/// `scheme` is the scheme of the page being rendered; it decides whether
/// `=:` lines become upload links.
pub fn render_gemtext<I, S>(lines: I, scheme: &str) -> RenderedDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let uploads = scheme::supports_upload(scheme);
    let mut doc = RenderedDocument::default();
    let mut verbatim = false;

    for line in lines {
        let line = line.as_ref();

        if line.starts_with("```") {
            verbatim = !verbatim;
            continue;
        }
        if verbatim {
            doc.lines.push(StyledLine::single(
                LineKind::Verbatim,
                VERBATIM_INDENT,
                line,
                Tone::Verbatim,
            ));
            continue;
        }

        if let Some(rest) = line.strip_prefix("=>") {
            doc.lines.push(render_link(rest, false, &mut doc.links));
        } else if let Some(rest) = line.strip_prefix("=:").filter(|_| uploads) {
            doc.lines.push(render_link(rest, true, &mut doc.links));
        } else if let Some(rest) = line.strip_prefix('>') {
            doc.lines.push(StyledLine::single(
                LineKind::Quote,
                QUOTE_INDENT,
                rest.trim(),
                Tone::Quote,
            ));
        } else if let Some((level, indent)) = heading(line) {
            if doc.title.is_none() {
                let title = line.trim_start_matches('#').trim();
                if !title.is_empty() {
                    doc.title = Some(title.to_string());
                }
            }
            let tone = match level {
                1 => Tone::Heading1,
                2 => Tone::Heading2,
                _ => Tone::Heading3,
            };
            doc.lines.push(StyledLine::single(
                LineKind::Heading(level),
                indent,
                line,
                tone,
            ));
        } else if line.starts_with('*') {
            doc.lines.push(StyledLine::single(
                LineKind::Bullet,
                BULLET_INDENT,
                line,
                Tone::Bullet,
            ));
        } else {
            doc.lines.push(StyledLine::single(
                LineKind::Text,
                TEXT_INDENT,
                line,
                Tone::Text,
            ));
        }
    }

    doc
}

/// Render a plain-text document: every line verbatim, no links.
pub fn render_plain<I, S>(lines: I) -> RenderedDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let lines = lines
        .into_iter()
        .map(|line| StyledLine::single(LineKind::Text, 0, line.as_ref(), Tone::Text))
        .collect();
    RenderedDocument {
        lines,
        ..RenderedDocument::default()
    }
}

fn heading(line: &str) -> Option<(u8, usize)> {
    HEADINGS
        .iter()
        .find(|(marker, _, _)| line.starts_with(marker))
        .map(|&(_, level, indent)| (level, indent))
}

/// Render a link line body (the text after `=>` or `=:`).
///
/// One field is both target and label; with two, the first is the target
/// and the rest of the line is the label.
fn render_link(rest: &str, upload: bool, links: &mut LinkTable) -> StyledLine {
    let rest = rest.trim();
    let (target, label) = match rest.split_once(char::is_whitespace) {
        Some((target, label)) => (target, Some(label.trim_start())),
        None => (rest, None),
    };

    let shortcut = links.push(Link {
        target: target.to_string(),
        upload,
    });

    let mut spans = vec![
        Span::new(format!("{shortcut:>3}"), Tone::Shortcut),
        Span::new(" ", Tone::Text),
    ];
    match label {
        Some(label) => {
            spans.push(Span::new(label, Tone::LinkLabel));
            spans.push(Span::new(" ", Tone::Text));
            spans.push(Span::new(format!("({target})"), Tone::LinkTarget));
        },
        None => spans.push(Span::new(target, Tone::LinkLabel)),
    }
    StyledLine::new(LineKind::Link, 0, spans)
}
