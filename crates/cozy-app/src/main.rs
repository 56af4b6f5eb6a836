//! cozy entry point.
//!
//! Reads configuration from the per-user config directory, then either
//! hands the bookmark file to `$EDITOR` (`-b`) or starts the terminal
//! browser on the given address or the configured home page.

mod cli;
mod editor;
mod logging;
mod ui;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use cozy_core::{Bookmarks, Dispatcher, Fetcher, Session, TrustStore};
use cozy_net::{HandlerRegistry, SystemOpener};
use cozy_types::config::{ConfigPaths, CozyConfig, ThemeName};
use ui::App;
use ui::theme::Palette;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ConfigPaths::discover()?;
    paths.ensure_root()?;
    logging::init(&paths.log_file())?;

    let config = CozyConfig::load(&paths.config_file())
        .with_context(|| format!("loading {}", paths.config_file().display()))?;
    log::info!("starting cozy {}", env!("CARGO_PKG_VERSION"));

    let bookmarks = Bookmarks::open(paths.bookmarks())?;
    if cli.bookmarks {
        return editor::edit(bookmarks.path());
    }

    let trust = TrustStore::open(paths.hosts())?;
    let fetcher = Fetcher::new(
        HandlerRegistry::with_local_handlers(),
        trust,
        Arc::new(SystemOpener),
        &config,
    );
    let dispatcher = Dispatcher::start(fetcher, Session::new(config.scheme.clone()))?;

    let theme = cli.theme.map(ThemeName::from).unwrap_or(config.theme);
    let mut app = App::new(dispatcher, bookmarks, Palette::for_theme(theme));
    app.open(cli.address.as_deref().unwrap_or(&config.home));

    ui::run(app)?;
    println!("the world spins...");
    Ok(())
}
