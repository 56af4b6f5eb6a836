//! Day and night palettes.
//!
//! The page tones are shared by both themes; only the base colours
//! (text, background, status bar) change.

use cozy_gemtext::Tone;
use cozy_types::config::ThemeName;
use crossterm::style::Color;

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

const RED: Color = rgb(0xff, 0x00, 0x00);
const ORANGE: Color = rgb(0xff, 0xa5, 0x00);
const YELLOW: Color = rgb(0xff, 0xd7, 0x00);
const DEEP_PINK: Color = rgb(0xff, 0x14, 0x93);
const BLUE: Color = rgb(0x00, 0x00, 0xff);
const STEEL_BLUE: Color = rgb(0x46, 0x82, 0xb4);
const GREEN: Color = rgb(0x00, 0x80, 0x00);

/// How one tone is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStyle {
    pub fg: Color,
    pub bold: bool,
    pub italic: bool,
    pub dim: bool,
}

impl ToneStyle {
    const fn plain(fg: Color) -> Self {
        Self {
            fg,
            bold: false,
            italic: false,
            dim: false,
        }
    }

    const fn bold(fg: Color) -> Self {
        Self {
            bold: true,
            ..Self::plain(fg)
        }
    }

    const fn dim(fg: Color) -> Self {
        Self {
            dim: true,
            ..Self::plain(fg)
        }
    }
}

/// Base colours of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub background: Color,
    /// Status bar background.
    pub status: Color,
}

impl Palette {
    pub fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Day => Self {
                text: rgb(0x17, 0x17, 0x17),
                background: rgb(0xff, 0xff, 0xff),
                status: rgb(0x05, 0xac, 0xff),
            },
            ThemeName::Night => Self {
                text: rgb(0xfc, 0xfc, 0xfc),
                background: rgb(0x17, 0x17, 0x17),
                status: rgb(0xa2, 0x20, 0x41),
            },
        }
    }

    pub fn tone(&self, tone: Tone) -> ToneStyle {
        match tone {
            Tone::Text => ToneStyle::plain(self.text),
            Tone::Heading1 => ToneStyle::bold(RED),
            Tone::Heading2 => ToneStyle::bold(ORANGE),
            Tone::Heading3 => ToneStyle::bold(YELLOW),
            Tone::Shortcut => ToneStyle::dim(BLUE),
            Tone::LinkLabel => ToneStyle::bold(DEEP_PINK),
            Tone::LinkTarget => ToneStyle::dim(self.text),
            Tone::Quote => ToneStyle {
                italic: true,
                ..ToneStyle::plain(STEEL_BLUE)
            },
            Tone::Bullet => ToneStyle::plain(GREEN),
            Tone::Verbatim => ToneStyle::dim(self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_differ_in_base_colours() {
        let day = Palette::for_theme(ThemeName::Day);
        let night = Palette::for_theme(ThemeName::Night);
        assert_ne!(day.background, night.background);
        assert_ne!(day.status, night.status);
        assert_eq!(day.background, rgb(0xff, 0xff, 0xff));
    }

    #[test]
    fn headings_are_bold() {
        let p = Palette::for_theme(ThemeName::Night);
        for tone in [Tone::Heading1, Tone::Heading2, Tone::Heading3] {
            assert!(p.tone(tone).bold);
        }
        assert!(!p.tone(Tone::Text).bold);
    }

    #[test]
    fn text_tones_follow_theme() {
        let day = Palette::for_theme(ThemeName::Day);
        assert_eq!(day.tone(Tone::Text).fg, day.text);
        assert!(day.tone(Tone::Verbatim).dim);
        assert!(day.tone(Tone::Quote).italic);
    }
}
