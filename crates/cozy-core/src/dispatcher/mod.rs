//! Single-flight, cancellable fetch dispatcher.
//!
//! The [`Dispatcher`] lives on the presentation loop and owns the
//! [`Session`]. Navigations go through a capacity-one slot to a single
//! worker thread; the newest request always replaces a pending one and
//! cancels the one in flight. Every request carries a generation number,
//! and results are applied only when their generation is still current,
//! so a late answer from a superseded fetch can never clobber newer state.
//!
//! ```text
//! navigate() -> cancel old token -> capture scroll -> slot
//!                                                      |
//!                                                   worker: resolve -> handler -> trust -> render
//!                                                      |
//! poll()    <- apply if generation current <------ channel
//! ```

mod worker;


use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::Duration;

use cozy_net::{CancelToken, Upload};
use cozy_types::address::Address;
use cozy_types::error::{CozyError, Result};

use crate::session::Session;

pub use worker::Fetcher;
use worker::{Outcome, Request};

// ---------------------------------------------------------------------------
// Updates for the presentation loop
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A fetch is running.
    Loading,
    /// A page was shown; the text is the round-trip time.
    Done,
    /// Informational (cancelled, handed off, bookmarked, ...).
    Info,
    Failed,
}

/// Text for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Something the user must answer before navigation continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    /// The server asked for a line of input.
    Input {
        address: Address,
        prompt: String,
        sensitive: bool,
    },
    /// An upload link was selected; the answer is the payload.
    Upload { address: Address },
}

/// A change the presentation loop should reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update {
    Status(StatusLine),
    /// A new page is in [`Session::page`]; scroll to `scroll`.
    Page {
        address: Address,
        scroll: usize,
        title: Option<String>,
    },
    Prompt(Prompt),
}

// ---------------------------------------------------------------------------
// Capacity-one request slot
// ---------------------------------------------------------------------------

#[derive(Default)]
struct SlotState {
    request: Option<Request>,
    closed: bool,
}

/// Holds at most one pending request. Putting replaces what is there.
#[derive(Default)]
struct Slot {
    state: Mutex<SlotState>,
    ready: Condvar,
}

impl Slot {
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `request`, returning the pending one it replaced.
    fn put(&self, request: Request) -> Option<Request> {
        let replaced = self.lock().request.replace(request);
        self.ready.notify_one();
        replaced
    }

    /// Block until a request is available. `None` once closed.
    fn take(&self) -> Option<Request> {
        let mut state = self.lock();
        loop {
            if let Some(request) = state.request.take() {
                return Some(request);
            }
            if state.closed {
                return None;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.request = None;
        self.ready.notify_all();
    }
}

struct Event {
    generation: u64,
    outcome: Outcome,
}

fn run_worker(fetcher: Fetcher, slot: Arc<Slot>, events: Sender<Event>) {
    while let Some(request) = slot.take() {
        let generation = request.generation;
        let outcome = fetcher.run(request);
        if events.send(Event { generation, outcome }).is_err() {
            break;
        }
    }
    log::debug!("fetch worker stopped");
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Front end of the fetch pipeline, owned by the presentation loop.
///
/// Every method returns immediately. Results arrive through
/// [`Dispatcher::poll`] or [`Dispatcher::wait`], which apply them to the
/// session and report what changed.
pub struct Dispatcher {
    session: Session,
    slot: Arc<Slot>,
    events: Receiver<Event>,
    generation: u64,
    token: CancelToken,
    loading: bool,
    /// Generation of an in-flight Back; history pops when it is shown.
    back_generation: Option<u64>,
    outbox: VecDeque<Update>,
}

impl Dispatcher {
    /// Spawn the worker thread and return the dispatcher driving it.
    pub fn start(fetcher: Fetcher, session: Session) -> Result<Self> {
        let slot = Arc::new(Slot::default());
        let (tx, rx) = mpsc::channel();
        let worker_slot = Arc::clone(&slot);
        thread::Builder::new()
            .name("cozy-fetch".into())
            .spawn(move || run_worker(fetcher, worker_slot, tx))?;
        Ok(Self {
            session,
            slot,
            events: rx,
            generation: 0,
            token: CancelToken::new(),
            loading: false,
            back_generation: None,
            outbox: VecDeque::new(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Record how far the displayed page is scrolled.
    pub fn set_scroll(&mut self, scroll: usize) {
        self.session.set_scroll(scroll);
    }

    pub fn set_active_scheme(&mut self, scheme: &str) {
        self.session.set_active_scheme(scheme);
    }

    /// Navigate to `raw`, resolved against the current page. `remember`
    /// pushes the page onto the history once it is shown.
    pub fn navigate(&mut self, raw: &str, remember: bool) {
        self.dispatch(raw.to_string(), remember, None, None);
    }

    /// Follow a link shortcut on the displayed page.
    pub fn follow(&mut self, shortcut: &str) {
        let resolved = self
            .session
            .link(shortcut)
            .map(|(link, target)| (link.upload, target));
        let (upload, target) = match resolved {
            Ok(found) => found,
            Err(e) => return self.fail(e),
        };
        if upload {
            self.outbox
                .push_back(Update::Prompt(Prompt::Upload { address: target }));
        } else {
            self.dispatch(target.to_string(), true, None, None);
        }
    }

    /// Return to the previous visit and restore its scroll offset.
    /// Does nothing with fewer than two visits. History is only popped
    /// once the previous page is shown.
    pub fn back(&mut self) {
        if let Some((address, scroll)) = self.session.previous_visit() {
            self.dispatch(address.to_string(), false, None, Some(scroll));
            self.back_generation = Some(self.generation);
        }
    }

    /// Fetch the current page again, keeping the scroll offset.
    pub fn reload(&mut self) {
        if let Some(current) = self.session.current() {
            let raw = current.to_string();
            let scroll = self.session.scroll();
            self.dispatch(raw, false, None, Some(scroll));
        }
    }

    /// Cancel the in-flight fetch, if any.
    pub fn cancel(&mut self) {
        if self.loading && self.token.cancel() {
            log::debug!("cancel requested for generation {}", self.generation);
        }
    }

    /// Answer an input prompt: the answer becomes the query of `address`.
    pub fn submit_input(&mut self, address: &Address, answer: &str) {
        self.dispatch(address.with_query(answer).to_string(), false, None, None);
    }

    /// Send `text` to an upload target.
    pub fn upload(&mut self, address: &Address, text: String) {
        let payload = Upload::from_text(text);
        self.dispatch(address.to_string(), false, Some(payload), None);
    }

    /// Report something that is not a fetch result (bookmark added, ...).
    pub fn notify(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.outbox
            .push_back(Update::Status(StatusLine::new(kind, text)));
    }

    /// Apply every result that has arrived and return the updates.
    pub fn poll(&mut self) -> Vec<Update> {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.apply(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.worker_gone();
                    break;
                },
            }
        }
        self.outbox.drain(..).collect()
    }

    /// Like [`Dispatcher::poll`], but waits up to `timeout` for a result
    /// when none is ready.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Update> {
        if self.outbox.is_empty() {
            match self.events.recv_timeout(timeout) {
                Ok(event) => self.apply(event),
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => self.worker_gone(),
            }
        }
        self.poll()
    }

    fn dispatch(
        &mut self,
        raw: String,
        remember: bool,
        upload: Option<Upload>,
        restore_scroll: Option<usize>,
    ) {
        self.token.cancel();
        self.session.capture_scroll();
        self.back_generation = None;

        self.generation += 1;
        self.token = CancelToken::new();
        let request = Request {
            raw,
            base: self.session.current().cloned(),
            scheme: self.session.active_scheme().to_string(),
            remember,
            upload,
            generation: self.generation,
            token: self.token.clone(),
            restore_scroll,
        };
        log::debug!("request {}: {}", request.generation, request.raw);
        if let Some(replaced) = self.slot.put(request) {
            log::debug!("request {} superseded before start", replaced.generation);
        }
        self.loading = true;
        self.outbox.push_back(Update::Status(StatusLine::new(
            StatusKind::Loading,
            "...",
        )));
    }

    fn apply(&mut self, event: Event) {
        if event.generation != self.generation {
            log::warn!(
                "discarding result of superseded request {} (current {})",
                event.generation,
                self.generation
            );
            return;
        }
        self.loading = false;
        let going_back = self.back_generation.take() == Some(event.generation);

        match event.outcome {
            Outcome::Document {
                address,
                document,
                remember,
                restore_scroll,
                elapsed,
            } => {
                log::info!("showing {address} after {} ms", elapsed.as_millis());
                let scroll = restore_scroll.unwrap_or(0);
                let title = document.title.clone();
                if going_back {
                    self.session.drop_visit();
                }
                self.session
                    .show(address.clone(), document, remember, scroll);
                self.outbox.push_back(Update::Page {
                    address,
                    scroll,
                    title,
                });
                self.outbox.push_back(Update::Status(StatusLine::new(
                    StatusKind::Done,
                    format!("{}ms", elapsed.as_millis()),
                )));
            },
            Outcome::Input {
                address,
                prompt,
                sensitive,
            } => {
                self.session.page_stays();
                self.outbox.push_back(Update::Status(StatusLine::new(
                    StatusKind::Info,
                    "input requested",
                )));
                self.outbox.push_back(Update::Prompt(Prompt::Input {
                    address,
                    prompt,
                    sensitive,
                }));
            },
            Outcome::Handoff { address } => {
                self.session.page_stays();
                self.notify(StatusKind::Info, format!("opened {address}"));
            },
            Outcome::Failed(CozyError::Cancelled) => {
                log::info!("request {} cancelled", event.generation);
                self.session.page_stays();
                self.notify(StatusKind::Info, "cancelled");
            },
            Outcome::Failed(e) => {
                self.session.page_stays();
                self.fail(e);
            },
        }
    }

    fn fail(&mut self, error: CozyError) {
        if error.is_trust_failure() {
            log::warn!("navigation blocked: {error}");
        } else {
            log::warn!("navigation failed: {error}");
        }
        self.notify(StatusKind::Failed, error.to_string());
    }

    fn worker_gone(&mut self) {
        if self.loading {
            self.loading = false;
            log::warn!("fetch worker exited");
            self.notify(StatusKind::Failed, "fetch worker exited");
        }
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.token.cancel();
        self.slot.close();
    }
}
