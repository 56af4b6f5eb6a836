//! Navigation state of one browsing session.
//!
//! A [`Session`] is owned by the presentation loop through the
//! [`Dispatcher`](crate::Dispatcher). Worker threads never see it; they
//! produce outcomes that the dispatcher applies here.

use cozy_gemtext::{Link, RenderedDocument};
use cozy_types::address::Address;
use cozy_types::error::{CozyError, Result};
use cozy_types::scheme;

use crate::history::{History, Visit};

/// The document currently on screen.
#[derive(Debug, Clone)]
pub struct Page {
    pub address: Address,
    pub document: RenderedDocument,
}

/// Current address, history, active scheme and displayed page.
#[derive(Debug)]
pub struct Session {
    current: Option<Address>,
    history: History,
    scheme: String,
    /// Set once a remembered navigation completes, cleared when the
    /// scroll offset is captured on the way out.
    remembering: bool,
    page: Option<Page>,
    scroll: usize,
}

impl Session {
    pub fn new(active_scheme: impl Into<String>) -> Self {
        Self {
            current: None,
            history: History::new(),
            scheme: active_scheme.into(),
            remembering: false,
            page: None,
            scroll: 0,
        }
    }

    pub fn current(&self) -> Option<&Address> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn active_scheme(&self) -> &str {
        &self.scheme
    }

    pub fn set_active_scheme(&mut self, scheme: impl Into<String>) {
        self.scheme = scheme.into();
    }

    pub fn page(&self) -> Option<&Page> {
        self.page.as_ref()
    }

    /// First visible line of the displayed page.
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn set_scroll(&mut self, scroll: usize) {
        self.scroll = scroll;
    }

    /// Look up `shortcut` in the displayed page and resolve its target.
    pub fn link(&self, shortcut: &str) -> Result<(&Link, Address)> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| CozyError::address(shortcut, "no page open"))?;
        let link = page
            .document
            .links
            .get(shortcut)
            .ok_or_else(|| CozyError::address(shortcut, "no such link"))?;
        let target = link.resolve(&page.address)?;
        Ok((link, target))
    }

    /// Write the scroll offset into the top visit if a remembered page is
    /// being left. Called just before a new navigation starts.
    pub(crate) fn capture_scroll(&mut self) {
        if self.remembering && !self.history.is_empty() {
            self.history.record_scroll(self.scroll);
            self.remembering = false;
        }
    }

    /// The visit below the top: where Back leads.
    pub(crate) fn previous_visit(&self) -> Option<(Address, usize)> {
        self.history
            .previous()
            .map(|visit| (visit.address.clone(), visit.scroll))
    }

    /// Drop the top visit once a Back navigation has been shown.
    pub(crate) fn drop_visit(&mut self) {
        self.history.back();
    }

    /// A navigation ended without a new page; keep capturing the scroll of
    /// the one still shown.
    pub(crate) fn page_stays(&mut self) {
        self.remembering = match (&self.current, self.history.top()) {
            (Some(current), Some(top)) => top.address == *current,
            _ => false,
        };
    }

    /// Make a successfully rendered document the displayed page.
    pub(crate) fn show(
        &mut self,
        address: Address,
        document: RenderedDocument,
        remember: bool,
        scroll: usize,
    ) {
        if remember {
            self.history.push(Visit::new(address.clone()));
        }
        // Remembered pages, pages returned to via back and reloads all sit
        // on top of the history; their scroll is captured on exit.
        self.remembering = self.history.top().is_some_and(|v| v.address == address);
        if scheme::SMALL_WEB.contains(&address.scheme()) {
            self.scheme = address.scheme().to_string();
        }
        self.current = Some(address.clone());
        self.scroll = scroll;
        self.page = Some(Page { address, document });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_gemtext::render_gemtext;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[test]
    fn new_session_is_empty() {
        let s = Session::new("gemini");
        assert!(s.current().is_none());
        assert!(s.page().is_none());
        assert!(s.history().is_empty());
        assert_eq!(s.active_scheme(), "gemini");
    }

    #[test]
    fn show_remembered_pushes_and_sets_scheme() {
        let mut s = Session::new("gemini");
        s.show(
            addr("spartan://a.org/"),
            render_gemtext(["hi"], "spartan"),
            true,
            0,
        );
        assert_eq!(s.history().len(), 1);
        assert_eq!(s.active_scheme(), "spartan");
        assert_eq!(s.current().unwrap().as_str(), "spartan://a.org/");
    }

    #[test]
    fn local_pages_keep_active_scheme() {
        let mut s = Session::new("nex");
        s.show(addr("about:home"), RenderedDocument::default(), true, 0);
        assert_eq!(s.active_scheme(), "nex");
        assert_eq!(s.current().unwrap().as_str(), "about:home");
    }

    #[test]
    fn capture_only_when_remembering() {
        let mut s = Session::new("gemini");
        s.show(addr("gemini://a.org/"), RenderedDocument::default(), true, 0);
        s.set_scroll(9);
        s.capture_scroll();
        assert_eq!(s.history().top().unwrap().scroll, 9);

        // Flag was consumed.
        s.set_scroll(40);
        s.capture_scroll();
        assert_eq!(s.history().top().unwrap().scroll, 9);
    }

    #[test]
    fn page_stays_resumes_capture() {
        let mut s = Session::new("gemini");
        s.show(addr("gemini://a.org/"), RenderedDocument::default(), true, 0);
        s.set_scroll(3);
        s.capture_scroll();
        s.page_stays();
        s.set_scroll(30);
        s.capture_scroll();
        assert_eq!(s.history().top().unwrap().scroll, 30);
    }

    #[test]
    fn unremembered_page_does_not_capture() {
        let mut s = Session::new("gemini");
        s.show(addr("gemini://a.org/"), RenderedDocument::default(), true, 0);
        s.set_scroll(5);
        s.capture_scroll();
        s.show(
            addr("gemini://a.org/?q"),
            RenderedDocument::default(),
            false,
            0,
        );
        s.set_scroll(77);
        s.capture_scroll();
        assert_eq!(s.history().top().unwrap().scroll, 5);
    }

    #[test]
    fn link_lookup_resolves_against_page() {
        let mut s = Session::new("gemini");
        s.show(
            addr("gemini://a.org/dir/"),
            render_gemtext(["=> next.gmi Next"], "gemini"),
            true,
            0,
        );
        let (link, target) = s.link("1").unwrap();
        assert!(!link.upload);
        assert_eq!(target.as_str(), "gemini://a.org/dir/next.gmi");
        assert!(s.link("2").is_err());
    }

    #[test]
    fn link_without_page_is_error() {
        assert!(Session::new("gemini").link("1").is_err());
    }
}
