//! Drawing one frame with queued crossterm commands.
//!
//! Layout: address bar on the first row, status bar on the last, page rows
//! in between. An open prompt overlays the middle of the page.

use std::io::{self, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use cozy_core::{Prompt, StatusKind};

use super::app::App;
use super::keys::Focus;
use super::theme::Palette;
use super::wrap::Row;

/// Columns taken by the address bar label (an emoji between two spaces).
const LABEL_COLUMNS: usize = 4;

pub fn status_icon(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Loading => "⏳",
        StatusKind::Done | StatusKind::Info => "🍵",
        StatusKind::Failed => "🍉",
    }
}

/// Keep at most `width` characters.
fn clip(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn base(out: &mut impl Write, fg: Color, bg: Color) -> io::Result<()> {
    queue!(
        out,
        SetAttribute(Attribute::Reset),
        SetForegroundColor(fg),
        SetBackgroundColor(bg)
    )
}

pub fn frame(out: &mut impl Write, app: &mut App, width: u16, height: u16) -> io::Result<()> {
    let (w, h) = (usize::from(width), usize::from(height));
    if h < 3 || w == 0 {
        return Ok(());
    }
    let viewport = h - 2;
    app.layout(w, viewport);
    let palette = *app.palette();

    queue!(out, Hide)?;

    // Address bar.
    base(out, palette.text, palette.status)?;
    queue!(out, MoveTo(0, 0), Clear(ClearType::CurrentLine))?;
    let input = app.input();
    let room = w.saturating_sub(LABEL_COLUMNS);
    let skip = input.chars().count().saturating_sub(room.saturating_sub(1));
    let shown: String = input.chars().skip(skip).collect();
    queue!(out, Print(app.bar_label()), Print(clip(&shown, room)))?;

    // Page.
    for i in 0..viewport {
        let y = (i + 1) as u16;
        base(out, palette.text, palette.background)?;
        queue!(out, MoveTo(0, y), Clear(ClearType::CurrentLine))?;
        if let Some(row) = app.rows().get(app.scroll() + i) {
            draw_row(out, row, &palette, w)?;
        }
    }

    if let Some(prompt) = app.prompt() {
        let label = match &prompt.prompt {
            Prompt::Input { prompt, .. } => prompt.as_str(),
            Prompt::Upload { .. } => "text to upload",
        };
        let sensitive = matches!(prompt.prompt, Prompt::Input { sensitive: true, .. });
        let answer = if sensitive {
            "*".repeat(prompt.text.chars().count())
        } else {
            prompt.text.clone()
        };
        let y = (1 + viewport / 2) as u16;
        base(out, palette.text, palette.status)?;
        queue!(
            out,
            MoveTo(0, y),
            Clear(ClearType::CurrentLine),
            Print(clip(&format!(" {label} > {answer}"), w))
        )?;
    }

    // Status bar.
    let status = app.status();
    let left = format!(" {} cozy {}", status_icon(status.kind), env!("CARGO_PKG_VERSION"));
    let right = format!("{} ", status.text);
    let last = (h - 1) as u16;
    base(out, palette.text, palette.status)?;
    queue!(out, MoveTo(0, last), Clear(ClearType::CurrentLine), Print(clip(&left, w)))?;
    let left_cols = left.chars().count() + 1;
    if left_cols < w {
        let right = clip(&right, w - left_cols);
        let x = w - right.chars().count();
        queue!(out, MoveTo(x as u16, last), Print(right))?;
    }
    base(out, palette.text, palette.background)?;

    if app.focus() == Focus::Input {
        let (x, y) = match app.prompt() {
            Some(p) => {
                let label = match &p.prompt {
                    Prompt::Input { prompt, .. } => prompt.chars().count(),
                    Prompt::Upload { .. } => "text to upload".len(),
                };
                (label + p.text.chars().count() + 4, 1 + viewport / 2)
            },
            None => (LABEL_COLUMNS + shown.chars().count(), 0),
        };
        queue!(out, MoveTo(x.min(w - 1) as u16, y as u16), Show)?;
    }
    out.flush()
}

fn draw_row(out: &mut impl Write, row: &Row, palette: &Palette, width: usize) -> io::Result<()> {
    let mut col = row.indent.min(width);
    queue!(out, Print(" ".repeat(col)))?;
    for span in &row.spans {
        if col >= width {
            break;
        }
        let text = clip(&span.text, width - col);
        col += text.chars().count();

        let style = palette.tone(span.tone);
        base(out, style.fg, palette.background)?;
        if style.bold {
            queue!(out, SetAttribute(Attribute::Bold))?;
        }
        if style.italic {
            queue!(out, SetAttribute(Attribute::Italic))?;
        }
        if style.dim {
            queue!(out, SetAttribute(Attribute::Dim))?;
        }
        queue!(out, Print(text))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use cozy_gemtext::{Span, Tone};
    use cozy_types::config::ThemeName;

    use super::*;

    #[test]
    fn icons_follow_status() {
        assert_eq!(status_icon(StatusKind::Loading), "⏳");
        assert_eq!(status_icon(StatusKind::Done), "🍵");
        assert_eq!(status_icon(StatusKind::Failed), "🍉");
    }

    #[test]
    fn clip_counts_characters() {
        assert_eq!(clip("héllo", 2), "hé");
        assert_eq!(clip("hi", 10), "hi");
    }

    #[test]
    fn row_is_clipped_to_width() {
        let row = Row {
            indent: 2,
            spans: vec![Span::new("abcdef", Tone::Verbatim)],
        };
        let mut out = Vec::new();
        draw_row(&mut out, &row, &Palette::for_theme(ThemeName::Day), 5).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("abc"));
        assert!(!text.contains("abcd"));
    }
}
