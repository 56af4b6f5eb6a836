//! Resolved page addresses.
//!
//! An [`Address`] is always absolute. Text typed by the user or found in
//! a document is turned into one by [`Address::resolve`], which applies
//! the active scheme to scheme-less input and joins relative references
//! against the current page.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::error::{CozyError, Result};

/// Characters left unescaped when an input answer becomes a query string.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Schemes written without `//` after the colon.
const OPAQUE_SCHEMES: &[&str] = &["about", "mailto", "file"];

/// An absolute address with scheme, host, path and query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(Url);

impl Address {
    /// Parse an absolute address.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CozyError::address(raw, "empty address"));
        }
        Url::parse(raw)
            .map(Address)
            .map_err(|e| CozyError::address(raw, e.to_string()))
    }

    /// `file:` address for an absolute local path.
    pub fn from_file_path(path: &Path) -> Result<Self> {
        Url::from_file_path(path)
            .map(Address)
            .map_err(|()| CozyError::address(&path.to_string_lossy(), "not an absolute path"))
    }

    /// Resolve user or document text into an absolute address.
    ///
    /// * `scheme://...` and the opaque `about:`/`mailto:`/`file:` forms
    ///   are taken as-is.
    /// * `//host/path` inherits `active_scheme`.
    /// * `/path`, `./x`, `../x`, `?query` and `#frag` are joined against
    ///   `base`; without a base they are an error.
    /// * anything else is read as `host[:port][/path]` under
    ///   `active_scheme`.
    pub fn resolve(raw: &str, base: Option<&Address>, active_scheme: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CozyError::address(raw, "empty address"));
        }
        if explicit_scheme(raw).is_some() {
            return Self::parse(raw);
        }
        if let Some(rest) = raw.strip_prefix("//") {
            return Self::parse(&format!("{active_scheme}://{rest}"));
        }
        if raw.starts_with(['/', '.', '?', '#']) {
            let base =
                base.ok_or_else(|| CozyError::address(raw, "relative address with no page open"))?;
            return base.join(raw);
        }
        Self::parse(&format!("{active_scheme}://{raw}"))
    }

    /// Join a document reference (relative or absolute) onto this address.
    pub fn join(&self, reference: &str) -> Result<Self> {
        let reference = reference.trim();
        if explicit_scheme(reference).is_some() {
            return Self::parse(reference);
        }
        self.0
            .join(reference)
            .map(Address)
            .map_err(|e| CozyError::address(reference, e.to_string()))
    }

    /// A copy of this address whose query is the percent-encoded `answer`.
    pub fn with_query(&self, answer: &str) -> Self {
        let mut url = self.0.clone();
        let encoded = utf8_percent_encode(answer, QUERY_ESCAPE).to_string();
        url.set_query(Some(&encoded));
        Address(url)
    }

    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// Host name without port, lowercased for stable comparisons.
    pub fn host(&self) -> Option<String> {
        self.0
            .host_str()
            .filter(|h| !h.is_empty())
            .map(|h| h.to_ascii_lowercase())
    }

    pub fn port(&self) -> Option<u16> {
        self.0.port()
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.0.query()
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl FromStr for Address {
    type Err = CozyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Return the scheme of `raw` if it is written explicitly.
///
/// `host:port` is not a scheme: the colon must be followed by `//` unless
/// the prefix is one of the opaque schemes.
fn explicit_scheme(raw: &str) -> Option<&str> {
    let (scheme, rest) = raw.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    if !valid {
        return None;
    }
    let opaque = OPAQUE_SCHEMES
        .iter()
        .any(|s| s.eq_ignore_ascii_case(scheme));
    (rest.starts_with("//") || opaque).then_some(scheme)
}
