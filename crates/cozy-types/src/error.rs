//! Error types for cozy.

use std::io;

/// Errors produced while resolving, fetching, verifying, or rendering a page.
///
/// Every variant is recovered at the dispatcher boundary and turned into a
/// status message; none of them terminates the process.
#[derive(Debug, thiserror::Error)]
pub enum CozyError {
    #[error("invalid address {input:?}: {reason}")]
    AddressParse { input: String, reason: String },

    #[error("unsupported scheme {0}")]
    UnsupportedScheme(String),

    /// Client or server error reported by the remote end.
    #[error("{code}: {detail}")]
    Handler { code: u8, detail: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("signature for {host} doesn't match")]
    TrustMismatch { host: String },

    #[error("malformed hosts file (line {line})")]
    TrustStoreCorrupt { line: usize },

    #[error("unsupported mime type {0}")]
    UnsupportedContent(String),

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("client certificates are not supported")]
    AuthRequired,

    #[error("cancelled")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl CozyError {
    /// Build an [`CozyError::AddressParse`] for `input`.
    pub fn address(input: &str, reason: impl Into<String>) -> Self {
        CozyError::AddressParse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether this error blocks navigation for security reasons rather
    /// than because something failed.
    pub fn is_trust_failure(&self) -> bool {
        matches!(
            self,
            CozyError::TrustMismatch { .. } | CozyError::TrustStoreCorrupt { .. }
        )
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CozyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_error_display() {
        let e = CozyError::Handler {
            code: 51,
            detail: "Not found".into(),
        };
        assert_eq!(format!("{e}"), "51: Not found");
    }

    #[test]
    fn address_error_display() {
        let e = CozyError::address("::", "missing host");
        assert_eq!(format!("{e}"), "invalid address \"::\": missing host");
    }

    #[test]
    fn trust_mismatch_is_distinct_from_corruption() {
        let mismatch = CozyError::TrustMismatch {
            host: "example.org".into(),
        };
        let corrupt = CozyError::TrustStoreCorrupt { line: 3 };
        assert!(mismatch.is_trust_failure());
        assert!(corrupt.is_trust_failure());
        assert!(format!("{mismatch}").contains("example.org"));
        assert!(format!("{corrupt}").contains("line 3"));
        assert!(!matches!(corrupt, CozyError::TrustMismatch { .. }));
    }

    #[test]
    fn unsupported_content_display() {
        let e = CozyError::UnsupportedContent("application/zip".into());
        assert_eq!(format!("{e}"), "unsupported mime type application/zip");
    }

    #[test]
    fn io_error_from_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let e: CozyError = io_err.into();
        let msg = format!("{e}");
        assert!(msg.contains("I/O error"));
        assert!(msg.contains("gone"));
        assert!(!e.is_trust_failure());
    }

    #[test]
    fn toml_error_from_conversion() {
        let toml_err = toml::from_str::<toml::Value>("this is [[[not valid toml").unwrap_err();
        let e: CozyError = toml_err.into();
        assert!(format!("{e}").contains("TOML parse error"));
    }
}
