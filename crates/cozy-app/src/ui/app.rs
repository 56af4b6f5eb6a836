//! Presentation state: address bar, page viewport, prompt, status line.
//!
//! Everything here runs on the main thread. Fetch results reach it only
//! through [`Dispatcher::poll`]/[`Dispatcher::wait`] in [`App::pump`].

use std::time::Duration;

use cozy_core::{Bookmarks, Dispatcher, Prompt, StatusKind, StatusLine, Update};
use cozy_types::scheme;

use super::keys::{Command, Focus, Scroll};
use super::theme::Palette;
use super::wrap::{Row, wrap_all};

const HELP: &str = "about:help";

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// What Enter in the address bar does with its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    Address,
    Shortcut,
}

/// An open prompt and the answer typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput {
    pub prompt: Prompt,
    pub text: String,
}

pub struct App {
    dispatcher: Dispatcher,
    bookmarks: Bookmarks,
    palette: Palette,
    focus: Focus,
    entry: Entry,
    input: String,
    prompt: Option<PromptInput>,
    status: StatusLine,
    title: Option<String>,
    title_changed: bool,
    rows: Vec<Row>,
    /// Width `rows` were wrapped for; `None` after a new page arrives.
    rows_width: Option<usize>,
    scroll: usize,
    viewport: usize,
}

impl App {
    pub fn new(dispatcher: Dispatcher, bookmarks: Bookmarks, palette: Palette) -> Self {
        Self {
            dispatcher,
            bookmarks,
            palette,
            focus: Focus::Page,
            entry: Entry::Address,
            input: String::new(),
            prompt: None,
            status: StatusLine::new(StatusKind::Info, ""),
            title: None,
            title_changed: false,
            rows: Vec::new(),
            rows_width: None,
            scroll: 0,
            viewport: 1,
        }
    }

    /// Start a remembered navigation to `raw`.
    pub fn open(&mut self, raw: &str) {
        self.dispatcher.navigate(raw, true);
    }

    /// Apply dispatcher results, waiting up to `timeout` for one.
    pub fn pump(&mut self, timeout: Duration) {
        let updates = if timeout.is_zero() {
            self.dispatcher.poll()
        } else {
            self.dispatcher.wait(timeout)
        };
        for update in updates {
            self.apply(update);
        }
    }

    pub fn is_loading(&self) -> bool {
        self.dispatcher.is_loading()
    }

    fn apply(&mut self, update: Update) {
        match update {
            Update::Status(line) => self.status = line,
            Update::Page {
                address,
                scroll,
                title,
            } => {
                self.input = address.to_string();
                self.entry = Entry::Address;
                self.focus = Focus::Page;
                self.prompt = None;
                self.scroll = scroll;
                self.rows_width = None;
                if self.title != title {
                    self.title = title;
                    self.title_changed = true;
                }
            },
            Update::Prompt(prompt) => {
                self.prompt = Some(PromptInput {
                    prompt,
                    text: String::new(),
                });
            },
        }
    }

    /// Where typed characters go right now.
    pub fn focus(&self) -> Focus {
        if self.prompt.is_some() {
            Focus::Input
        } else {
            self.focus
        }
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::PickScheme(scheme) => {
                self.dispatcher.set_active_scheme(scheme);
                self.start_entry(Entry::Address);
            },
            Command::ShortcutEntry => self.start_entry(Entry::Shortcut),
            Command::ToggleFocus => {
                if self.prompt.is_none() {
                    self.focus = match self.focus {
                        Focus::Page => Focus::Input,
                        Focus::Input => Focus::Page,
                    };
                    self.entry = Entry::Address;
                }
            },
            Command::Escape => {
                if self.prompt.take().is_none() {
                    self.leave_input();
                }
            },
            Command::Back => self.dispatcher.back(),
            Command::Reload => self.dispatcher.reload(),
            Command::Cancel => self.dispatcher.cancel(),
            Command::Bookmark => self.bookmark(),
            Command::OpenBookmarks => match self.bookmarks.address() {
                Ok(address) => self.dispatcher.navigate(address.as_str(), true),
                Err(e) => self.dispatcher.notify(StatusKind::Failed, e.to_string()),
            },
            Command::Help => self.dispatcher.navigate(HELP, true),
            Command::Scroll(by) => self.scroll_by(by),
            Command::Submit => self.submit(),
            Command::Backspace => {
                match self.prompt.as_mut() {
                    Some(p) => p.text.pop(),
                    None => self.input.pop(),
                };
            },
            Command::Insert(c) => match self.prompt.as_mut() {
                Some(p) => p.text.push(c),
                None => self.input.push(c),
            },
        }
        self.pump(Duration::ZERO);
        Flow::Continue
    }

    fn start_entry(&mut self, entry: Entry) {
        self.prompt = None;
        self.input.clear();
        self.entry = entry;
        self.focus = Focus::Input;
    }

    fn leave_input(&mut self) {
        self.focus = Focus::Page;
        self.entry = Entry::Address;
        self.input = self
            .dispatcher
            .session()
            .current()
            .map(|a| a.to_string())
            .unwrap_or_default();
    }

    fn submit(&mut self) {
        if let Some(PromptInput { prompt, text }) = self.prompt.take() {
            match prompt {
                Prompt::Input { address, .. } => self.dispatcher.submit_input(&address, &text),
                Prompt::Upload { address } => self.dispatcher.upload(&address, text),
            }
            return;
        }

        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        match self.entry {
            Entry::Address => self.dispatcher.navigate(&text, true),
            Entry::Shortcut => self.dispatcher.follow(&text),
        }
        self.focus = Focus::Page;
    }

    fn bookmark(&mut self) {
        let Some(address) = self.dispatcher.session().current().cloned() else {
            self.dispatcher
                .notify(StatusKind::Failed, "no page to bookmark");
            return;
        };
        match self.bookmarks.append(&address) {
            Ok(()) => self
                .dispatcher
                .notify(StatusKind::Info, format!("bookmarked {address}")),
            Err(e) => self.dispatcher.notify(StatusKind::Failed, e.to_string()),
        }
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.viewport)
    }

    fn scroll_by(&mut self, by: Scroll) {
        let page = self.viewport.saturating_sub(1).max(1);
        self.scroll = match by {
            Scroll::Up => self.scroll.saturating_sub(1),
            Scroll::Down => self.scroll + 1,
            Scroll::PageUp => self.scroll.saturating_sub(page),
            Scroll::PageDown => self.scroll + page,
            Scroll::Top => 0,
            Scroll::Bottom => self.max_scroll(),
        }
        .min(self.max_scroll());
        self.dispatcher.set_scroll(self.scroll);
    }

    /// Re-wrap the page for `width` columns and `viewport` rows if needed.
    pub fn layout(&mut self, width: usize, viewport: usize) {
        self.viewport = viewport.max(1);
        if self.rows_width != Some(width) {
            self.rows = self
                .dispatcher
                .session()
                .page()
                .map(|page| wrap_all(&page.document.lines, width))
                .unwrap_or_default();
            self.rows_width = Some(width);
        }
        let clamped = self.scroll.min(self.max_scroll());
        if clamped != self.scroll {
            self.scroll = clamped;
            self.dispatcher.set_scroll(clamped);
        }
    }

    /// Window title, if it changed since the last call.
    pub fn take_title(&mut self) -> Option<String> {
        if !self.title_changed {
            return None;
        }
        self.title_changed = false;
        Some(match &self.title {
            Some(title) => format!("cozy - {title}"),
            None => "cozy".to_string(),
        })
    }

    // -- read access for drawing --

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn prompt(&self) -> Option<&PromptInput> {
        self.prompt.as_ref()
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Label in front of the address bar.
    pub fn bar_label(&self) -> &'static str {
        match self.entry {
            Entry::Shortcut => " 🔗 ",
            Entry::Address => scheme::label(self.dispatcher.session().active_scheme()),
        }
    }
}
