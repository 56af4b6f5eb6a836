//! Terminal surface.

pub mod app;
pub mod draw;
pub mod keys;
pub mod theme;
pub mod wrap;

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
};
use crossterm::{cursor, execute, queue};

pub use app::{App, Flow};

/// How long to wait for a key before checking for fetch results again.
const TICK: Duration = Duration::from_millis(50);

/// Raw mode plus the alternate screen, undone on drop.
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, cursor::Hide)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), cursor::Show, LeaveAlternateScreen);
    }
}

/// Run the event loop until the user quits.
pub fn run(mut app: App) -> Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut out = io::stdout().lock();

    loop {
        app.pump(Duration::ZERO);
        if let Some(title) = app.take_title() {
            queue!(out, SetTitle(title))?;
        }
        let (width, height) = terminal::size()?;
        draw::frame(&mut out, &mut app, width, height)?;

        if !event::poll(TICK)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                let Some(command) = keys::command(key, app.focus()) else {
                    continue;
                };
                if app.handle(command) == Flow::Quit {
                    break;
                }
            },
            _ => {},
        }
    }

    out.flush()?;
    log::info!("leaving");
    Ok(())
}
