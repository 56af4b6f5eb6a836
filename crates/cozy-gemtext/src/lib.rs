//! Gemtext rendering for cozy.
//!
//! Turns the lines of a text/gemini document into styled output plus the
//! [`LinkTable`] of shortcuts for that document. Rendering is pure: no
//! network or disk access, and the same input always yields the same
//! [`RenderedDocument`].

pub mod links;
pub mod render;
pub mod style;

pub use links::{Link, LinkTable};
pub use render::{RenderedDocument, render_gemtext, render_plain};
pub use style::{LineKind, Span, StyledLine, Tone};
