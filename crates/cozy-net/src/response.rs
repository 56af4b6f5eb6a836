//! The uniform response every protocol handler returns.

use std::fmt;
use std::io::{self, Read};

use cozy_types::error::{CozyError, Result};

use crate::cancel::CancelToken;

/// Maximum response body size (2 MB).
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Response status classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The server asks for a line of input; `meta` is the prompt.
    Input { sensitive: bool },
    /// Body follows; `meta` is the content descriptor.
    Success,
    /// `meta` is the new target.
    Redirect { permanent: bool },
    ClientError,
    ServerError,
    /// A client certificate is required.
    AuthRequired,
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, Status::Redirect { .. })
    }
}

/// Payload sent with a request to an upload target.
pub struct Upload {
    pub length: u64,
    pub data: Box<dyn Read + Send>,
}

impl Upload {
    pub fn from_text(text: String) -> Self {
        Self {
            length: text.len() as u64,
            data: Box::new(io::Cursor::new(text.into_bytes())),
        }
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload").field("length", &self.length).finish()
    }
}

/// A handler's answer to one request.
pub struct Response {
    pub status: Status,
    /// Raw status code as sent by the server (for error messages).
    pub code: u8,
    /// Prompt, content descriptor, redirect target, or error detail.
    pub meta: String,
    /// Present only on success.
    pub body: Option<Box<dyn Read + Send>>,
    /// Identity signature of the host, for schemes that pin identity.
    pub signature: Option<String>,
}

impl Response {
    pub fn success(meta: impl Into<String>, body: Box<dyn Read + Send>) -> Self {
        Self {
            status: Status::Success,
            code: 20,
            meta: meta.into(),
            body: Some(body),
            signature: None,
        }
    }

    /// Successful response with an in-memory body.
    pub fn document(meta: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self::success(meta, Box::new(io::Cursor::new(body.into())))
    }

    pub fn input(prompt: impl Into<String>, sensitive: bool) -> Self {
        Self {
            status: Status::Input { sensitive },
            code: if sensitive { 11 } else { 10 },
            meta: prompt.into(),
            body: None,
            signature: None,
        }
    }

    pub fn redirect(target: impl Into<String>, permanent: bool) -> Self {
        Self {
            status: Status::Redirect { permanent },
            code: if permanent { 31 } else { 30 },
            meta: target.into(),
            body: None,
            signature: None,
        }
    }

    /// Error or auth-required response.
    pub fn failure(status: Status, code: u8, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            meta: detail.into(),
            body: None,
            signature: None,
        }
    }

    /// Attach the host identity signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("code", &self.code)
            .field("meta", &self.meta)
            .field("body", &self.body.is_some())
            .field("signature", &self.signature)
            .finish()
    }
}

/// How a successful body is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Gemtext,
    PlainText,
    /// Delegated to the external viewer.
    Image,
}

impl ContentKind {
    /// Classify a content descriptor (`text/gemini; lang=en`, ...).
    ///
    /// `None` means no renderer or viewer handles it.
    pub fn from_descriptor(meta: &str) -> Option<Self> {
        let mime = meta
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if mime.starts_with("text/gemini") {
            Some(ContentKind::Gemtext)
        } else if mime.starts_with("text/") || mime == "application/octet-stream" {
            Some(ContentKind::PlainText)
        } else if mime.starts_with("image/") {
            Some(ContentKind::Image)
        } else {
            None
        }
    }

    /// Best-guess descriptor for a file name.
    pub fn descriptor_for_path(path: &str) -> &'static str {
        let ext = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "gmi" | "gemini" => "text/gemini",
            "txt" | "md" => "text/plain",
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "gif" => "image/gif",
            "webp" => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// Read a body to the end, checking `cancel` between chunks.
///
/// Fails with [`CozyError::Cancelled`] as soon as cancellation is seen and
/// with a network error once the body exceeds [`MAX_BODY_SIZE`].
pub fn read_body(mut body: impl Read, cancel: &CancelToken) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(8192);
    let mut chunk = [0u8; 8192];
    loop {
        cancel.check()?;
        match body.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                if buf.len() + n > MAX_BODY_SIZE {
                    return Err(CozyError::Network("response too large".to_string()));
                }
                buf.extend_from_slice(&chunk[..n]);
            },
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CozyError::Network(format!("read: {e}"))),
        }
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_descriptors() {
        assert_eq!(
            ContentKind::from_descriptor("text/gemini"),
            Some(ContentKind::Gemtext)
        );
        assert_eq!(
            ContentKind::from_descriptor("text/gemini; lang=en"),
            Some(ContentKind::Gemtext)
        );
        assert_eq!(
            ContentKind::from_descriptor("text/plain; charset=utf-8"),
            Some(ContentKind::PlainText)
        );
        assert_eq!(
            ContentKind::from_descriptor("application/octet-stream"),
            Some(ContentKind::PlainText)
        );
        assert_eq!(
            ContentKind::from_descriptor("IMAGE/PNG"),
            Some(ContentKind::Image)
        );
        assert_eq!(ContentKind::from_descriptor("application/zip"), None);
        assert_eq!(ContentKind::from_descriptor(""), None);
    }

    #[test]
    fn descriptor_from_extension() {
        assert_eq!(ContentKind::descriptor_for_path("/a/index.gmi"), "text/gemini");
        assert_eq!(ContentKind::descriptor_for_path("notes.TXT"), "text/plain");
        assert_eq!(ContentKind::descriptor_for_path("cat.jpeg"), "image/jpeg");
        assert_eq!(
            ContentKind::descriptor_for_path("archive"),
            "application/octet-stream"
        );
    }

    #[test]
    fn constructors_set_codes() {
        assert_eq!(Response::input("name?", true).code, 11);
        assert_eq!(
            Response::input("name?", false).status,
            Status::Input { sensitive: false }
        );
        assert!(Response::redirect("/x", true).status.is_redirect());
        let ok = Response::document("text/gemini", "# hi").with_signature("abc");
        assert!(ok.status.is_success());
        assert_eq!(ok.signature.as_deref(), Some("abc"));
        assert!(format!("{ok:?}").contains("text/gemini"));
    }

    #[test]
    fn upload_from_text_counts_bytes() {
        let mut upload = Upload::from_text("héllo".into());
        assert_eq!(upload.length, 6);
        let mut data = String::new();
        upload.data.read_to_string(&mut data).unwrap();
        assert_eq!(data, "héllo");
    }

    #[test]
    fn read_body_collects_everything() {
        let token = CancelToken::new();
        let body = read_body(io::Cursor::new(vec![7u8; 20_000]), &token).unwrap();
        assert_eq!(body.len(), 20_000);
    }

    #[test]
    fn read_body_observes_cancellation() {
        let token = CancelToken::new();
        token.cancel();
        let err = read_body(io::Cursor::new(b"data".to_vec()), &token).unwrap_err();
        assert!(matches!(err, CozyError::Cancelled));
    }

    #[test]
    fn read_body_rejects_oversized() {
        let token = CancelToken::new();
        let err = read_body(io::repeat(1).take(MAX_BODY_SIZE as u64 + 1), &token).unwrap_err();
        assert!(format!("{err}").contains("too large"));
    }
}
