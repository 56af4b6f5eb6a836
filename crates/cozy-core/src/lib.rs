//! Navigation core for cozy.
//!
//! * [`TrustStore`] pins host identities trust-on-first-use.
//! * [`History`] remembers visits and their scroll offsets.
//! * [`Bookmarks`] appends link lines to the bookmark document.
//! * [`Dispatcher`] runs fetches one at a time on a worker thread and
//!   applies their results to the [`Session`].

pub mod bookmarks;
pub mod dispatcher;
pub mod history;
pub mod session;
pub mod trust;

pub use bookmarks::Bookmarks;
pub use dispatcher::{Dispatcher, Fetcher, Prompt, StatusKind, StatusLine, Update};
pub use history::{History, Visit};
pub use session::{Page, Session};
pub use trust::TrustStore;
