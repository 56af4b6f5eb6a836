//! Command-line interface.

use clap::{Parser, ValueEnum};
use cozy_types::config::ThemeName;

/// A small terminal browser for the small web.
#[derive(Parser, Debug, Clone)]
#[command(name = "cozy", version, about, long_about = None)]
pub struct Cli {
    /// Address to open (defaults to the configured home page)
    pub address: Option<String>,

    /// Edit the bookmark file in $EDITOR and exit
    #[arg(short, long)]
    pub bookmarks: bool,

    /// Force a theme instead of the configured one
    #[arg(short, long, value_enum)]
    pub theme: Option<CliTheme>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliTheme {
    Day,
    Night,
}

impl From<CliTheme> for ThemeName {
    fn from(theme: CliTheme) -> Self {
        match theme {
            CliTheme::Day => ThemeName::Day,
            CliTheme::Night => ThemeName::Night,
        }
    }
}
