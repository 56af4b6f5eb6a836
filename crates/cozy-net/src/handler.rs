//! Protocol handler trait and per-scheme registry.

use std::collections::HashMap;
use std::sync::Arc;

use cozy_types::address::Address;
use cozy_types::error::Result;

use cozy_types::scheme;

use crate::cancel::CancelToken;
use crate::local::{AboutHandler, FileHandler};
use crate::response::{Response, Upload};

/// Fetches resources for one scheme.
///
/// Implementations must check `cancel` at every blocking point (connect,
/// each read) and return [`cozy_types::error::CozyError::Cancelled`] once it
/// is set. Network and protocol failures are returned as errors; status
/// classes the server reports are returned as a [`Response`].
pub trait ProtocolHandler: Send + Sync {
    /// Whether responses carry a host identity signature that must be
    /// pinned trust-on-first-use.
    fn pins_identity(&self) -> bool {
        false
    }

    fn fetch(
        &self,
        address: &Address,
        upload: Option<Upload>,
        cancel: &CancelToken,
    ) -> Result<Response>;
}

/// Scheme -> handler map.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn ProtocolHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry serving `about:` and `file:`.
    pub fn with_local_handlers() -> Self {
        let mut registry = Self::new();
        registry.register(scheme::ABOUT, Arc::new(AboutHandler));
        registry.register(scheme::FILE, Arc::new(FileHandler));
        registry
    }

    /// Register `handler` for `scheme`. Replaces any existing handler.
    pub fn register(&mut self, scheme: &str, handler: Arc<dyn ProtocolHandler>) {
        self.handlers.insert(scheme.to_ascii_lowercase(), handler);
    }

    pub fn get(&self, scheme: &str) -> Option<Arc<dyn ProtocolHandler>> {
        self.handlers.get(&scheme.to_ascii_lowercase()).cloned()
    }

    /// Registered schemes, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_types::error::CozyError;

    struct Echo;

    impl ProtocolHandler for Echo {
        fn fetch(
            &self,
            address: &Address,
            _upload: Option<Upload>,
            cancel: &CancelToken,
        ) -> Result<Response> {
            cancel.check()?;
            Ok(Response::document("text/plain", address.as_str()))
        }
    }

    struct Pinned;

    impl ProtocolHandler for Pinned {
        fn pins_identity(&self) -> bool {
            true
        }

        fn fetch(&self, _: &Address, _: Option<Upload>, _: &CancelToken) -> Result<Response> {
            Err(CozyError::Network("unreachable".into()))
        }
    }

    #[test]
    fn trait_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Echo>();
        let _: Arc<dyn ProtocolHandler> = Arc::new(Echo);
    }

    #[test]
    fn register_and_lookup_case_insensitive() {
        let mut reg = HandlerRegistry::new();
        reg.register("Gemini", Arc::new(Pinned));
        reg.register("about", Arc::new(Echo));
        assert!(reg.get("GEMINI").unwrap().pins_identity());
        assert!(!reg.get("about").unwrap().pins_identity());
        assert!(reg.get("nex").is_none());
        assert_eq!(reg.schemes(), vec!["about", "gemini"]);
    }

    #[test]
    fn local_handlers_are_registered() {
        let reg = HandlerRegistry::with_local_handlers();
        assert_eq!(reg.schemes(), vec!["about", "file"]);
        assert!(!reg.get("about").unwrap().pins_identity());
    }

    #[test]
    fn register_replaces() {
        let mut reg = HandlerRegistry::new();
        reg.register("x", Arc::new(Pinned));
        reg.register("x", Arc::new(Echo));
        assert!(!reg.get("x").unwrap().pins_identity());
        assert_eq!(reg.schemes().len(), 1);
    }

    #[test]
    fn handler_sees_cancellation() {
        let token = CancelToken::new();
        token.cancel();
        let addr = Address::parse("about:x").unwrap();
        assert!(matches!(
            Echo.fetch(&addr, None, &token),
            Err(CozyError::Cancelled)
        ));
    }
}
