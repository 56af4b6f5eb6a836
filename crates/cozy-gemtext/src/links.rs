//! Per-document link shortcuts.

use cozy_types::address::Address;
use cozy_types::error::Result;

/// A link found while rendering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target as written in the document, relative or absolute.
    pub target: String,
    /// Upload links prompt for a payload instead of navigating.
    pub upload: bool,
}

impl Link {
    /// Resolve the target against the address of the page it came from.
    pub fn resolve(&self, page: &Address) -> Result<Address> {
        page.join(&self.target)
    }
}

/// Shortcut -> link mapping for one rendered document.
///
/// Shortcuts are the 1-based link index in lowercase hexadecimal. A table
/// belongs to exactly one render; the next render builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkTable {
    links: Vec<Link>,
}

impl LinkTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a link and return its shortcut.
    pub(crate) fn push(&mut self, link: Link) -> String {
        self.links.push(link);
        shortcut_for(self.links.len())
    }

    /// Look up a shortcut typed by the user.
    pub fn get(&self, shortcut: &str) -> Option<&Link> {
        let shortcut = shortcut.trim().to_ascii_lowercase();
        let index = usize::from_str_radix(&shortcut, 16).ok()?;
        if index == 0 || shortcut_for(index) != shortcut {
            return None;
        }
        self.links.get(index - 1)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// `(shortcut, link)` pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (String, &Link)> {
        self.links
            .iter()
            .enumerate()
            .map(|(i, link)| (shortcut_for(i + 1), link))
    }
}

/// Shortcut text for the 1-based link `index`.
pub fn shortcut_for(index: usize) -> String {
    format!("{index:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(n: usize) -> LinkTable {
        let mut t = LinkTable::new();
        for i in 0..n {
            t.push(Link {
                target: format!("/{i}"),
                upload: false,
            });
        }
        t
    }

    #[test]
    fn shortcuts_are_hex_from_one() {
        assert_eq!(shortcut_for(1), "1");
        assert_eq!(shortcut_for(10), "a");
        assert_eq!(shortcut_for(16), "10");
        assert_eq!(shortcut_for(255), "ff");
    }

    #[test]
    fn push_returns_shortcut() {
        let mut t = LinkTable::new();
        let s = t.push(Link {
            target: "/a".into(),
            upload: true,
        });
        assert_eq!(s, "1");
        assert_eq!(t.get("1").unwrap().target, "/a");
        assert!(t.get("1").unwrap().upload);
    }

    #[test]
    fn lookup_by_hex_shortcut() {
        let t = table(17);
        assert_eq!(t.get("a").unwrap().target, "/9");
        assert_eq!(t.get("A").unwrap().target, "/9");
        assert_eq!(t.get("10").unwrap().target, "/15");
        assert_eq!(t.get(" 11 ").unwrap().target, "/16");
    }

    #[test]
    fn unknown_shortcuts_miss() {
        let t = table(3);
        assert!(t.get("0").is_none());
        assert!(t.get("4").is_none());
        assert!(t.get("01").is_none());
        assert!(t.get("zz").is_none());
        assert!(t.get("").is_none());
    }

    #[test]
    fn iter_pairs_shortcuts_in_order() {
        let t = table(2);
        let pairs: Vec<_> = t.iter().map(|(s, l)| (s, l.target.clone())).collect();
        assert_eq!(pairs, vec![("1".into(), "/0".into()), ("2".into(), "/1".into())]);
        assert_eq!(t.len(), 2);
        assert!(!t.is_empty());
    }

    #[test]
    fn resolve_against_page() {
        let page = Address::parse("gemini://example.org/dir/page.gmi").unwrap();
        let link = Link {
            target: "other.gmi".into(),
            upload: false,
        };
        assert_eq!(
            link.resolve(&page).unwrap().as_str(),
            "gemini://example.org/dir/other.gmi"
        );
    }
}
