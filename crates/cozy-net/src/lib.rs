//! Protocol plumbing for cozy.
//!
//! Each scheme is served by a [`ProtocolHandler`] registered in a
//! [`HandlerRegistry`]. Handlers receive a [`CancelToken`] and must check
//! it at every blocking point. Wire implementations of the small-web
//! protocols plug in from outside; this crate ships the local `about:`
//! and `file:` handlers and the [`Opener`] used for schemes and content
//! cozy hands off to the system.

mod cancel;
mod handler;
mod local;
mod opener;
mod response;

pub use cancel::CancelToken;
pub use handler::{HandlerRegistry, ProtocolHandler};
pub use local::{AboutHandler, FileHandler};
pub use opener::{Opener, SystemOpener};
pub use response::{ContentKind, MAX_BODY_SIZE, Response, Status, Upload, read_body};
