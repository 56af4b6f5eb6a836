//! The fetch side of the dispatcher: resolve, route, fetch, verify, render.
//!
//! Runs on the worker thread and never touches the session. Everything it
//! learns goes back to the presentation loop as an [`Outcome`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use cozy_gemtext::{RenderedDocument, render_gemtext, render_plain};
use cozy_net::{
    CancelToken, ContentKind, HandlerRegistry, Opener, Response, Status, Upload, read_body,
};
use cozy_types::address::Address;
use cozy_types::config::CozyConfig;
use cozy_types::error::{CozyError, Result};

use crate::trust::TrustStore;

/// One navigation handed to the worker.
#[derive(Debug)]
pub(crate) struct Request {
    pub raw: String,
    /// Page the raw text is resolved against.
    pub base: Option<Address>,
    /// Scheme applied when the raw text carries none.
    pub scheme: String,
    pub remember: bool,
    pub upload: Option<Upload>,
    pub generation: u64,
    pub token: CancelToken,
    /// Scroll offset to restore once the page is shown.
    pub restore_scroll: Option<usize>,
}

/// What a request ended in.
#[derive(Debug)]
pub(crate) enum Outcome {
    Document {
        address: Address,
        document: RenderedDocument,
        remember: bool,
        restore_scroll: Option<usize>,
        elapsed: Duration,
    },
    Input {
        address: Address,
        prompt: String,
        sensitive: bool,
    },
    /// Passed to the system opener; nothing to show.
    Handoff { address: Address },
    Failed(CozyError),
}

enum Fetched {
    Document(Address, RenderedDocument),
    Input(Address, String, bool),
    Handoff(Address),
}

/// Routes requests to protocol handlers and turns responses into pages.
pub struct Fetcher {
    handlers: HandlerRegistry,
    trust: TrustStore,
    opener: Arc<dyn Opener>,
    config: CozyConfig,
}

impl Fetcher {
    pub fn new(
        handlers: HandlerRegistry,
        trust: TrustStore,
        opener: Arc<dyn Opener>,
        config: &CozyConfig,
    ) -> Self {
        log::info!("handlers for: {}", handlers.schemes().join(", "));
        Self {
            handlers,
            trust,
            opener,
            config: config.clone(),
        }
    }

    pub(crate) fn run(&self, request: Request) -> Outcome {
        let Request {
            raw,
            base,
            scheme,
            remember,
            upload,
            token,
            restore_scroll,
            ..
        } = request;

        let started = Instant::now();
        let fetched = self
            .fetch(&raw, base.as_ref(), &scheme, upload, &token)
            .and_then(|fetched| token.check().map(|()| fetched));
        match fetched {
            Ok(Fetched::Document(address, document)) => Outcome::Document {
                address,
                document,
                remember,
                restore_scroll,
                elapsed: started.elapsed(),
            },
            Ok(Fetched::Input(address, prompt, sensitive)) => Outcome::Input {
                address,
                prompt,
                sensitive,
            },
            Ok(Fetched::Handoff(address)) => Outcome::Handoff { address },
            Err(e) => Outcome::Failed(e),
        }
    }

    fn fetch(
        &self,
        raw: &str,
        base: Option<&Address>,
        scheme: &str,
        mut upload: Option<Upload>,
        token: &CancelToken,
    ) -> Result<Fetched> {
        let mut address = Address::resolve(raw, base, scheme)?;
        let mut hops = 0u8;

        loop {
            token.check()?;

            if self.config.is_handoff(address.scheme()) {
                self.opener
                    .open_address(&address)
                    .map_err(|e| CozyError::Network(format!("open {address}: {e}")))?;
                return Ok(Fetched::Handoff(address));
            }

            let handler = self
                .handlers
                .get(address.scheme())
                .ok_or_else(|| CozyError::UnsupportedScheme(address.scheme().to_string()))?;

            log::debug!("fetching {address}");
            let response = handler.fetch(&address, upload.take(), token)?;
            token.check()?;

            if handler.pins_identity() {
                self.verify(&address, response.signature.as_deref())?;
            }

            match response.status {
                Status::Redirect { permanent } => {
                    hops += 1;
                    if hops > self.config.max_redirects {
                        return Err(CozyError::TooManyRedirects);
                    }
                    let target = address.join(&response.meta)?;
                    log::debug!(
                        "{} redirect {address} -> {target}",
                        if permanent { "permanent" } else { "temporary" }
                    );
                    address = target;
                },
                Status::Input { sensitive } => {
                    return Ok(Fetched::Input(address, response.meta, sensitive));
                },
                Status::Success => return self.present(address, response, token),
                Status::ClientError | Status::ServerError => {
                    return Err(CozyError::Handler {
                        code: response.code,
                        detail: response.meta,
                    });
                },
                Status::AuthRequired => return Err(CozyError::AuthRequired),
            }
        }
    }

    fn verify(&self, address: &Address, signature: Option<&str>) -> Result<()> {
        let host = address
            .host()
            .ok_or_else(|| CozyError::address(address.as_str(), "no host to verify"))?;
        let signature = signature
            .ok_or_else(|| CozyError::Network(format!("{host} presented no identity")))?;
        self.trust.verify(&host, signature)
    }

    /// Classify a successful body and render it.
    fn present(&self, address: Address, response: Response, token: &CancelToken) -> Result<Fetched> {
        let meta = response.meta;
        let kind = ContentKind::from_descriptor(&meta)
            .ok_or_else(|| CozyError::UnsupportedContent(meta.clone()))?;
        let body = response
            .body
            .ok_or_else(|| CozyError::Network(format!("{address}: success without body")))?;
        let bytes = read_body(body, token)?;
        token.check()?;

        let document = match kind {
            ContentKind::Gemtext => {
                render_gemtext(String::from_utf8_lossy(&bytes).lines(), address.scheme())
            },
            ContentKind::PlainText => render_plain(String::from_utf8_lossy(&bytes).lines()),
            ContentKind::Image => {
                let path = self
                    .opener
                    .open_image(&meta, &bytes)
                    .map_err(|e| CozyError::Network(format!("open image: {e}")))?;
                render_plain([format!("{meta} opened in viewer: {}", path.display())])
            },
        };
        log::info!("rendered {address} ({} lines)", document.lines.len());
        Ok(Fetched::Document(address, document))
    }
}
