//! Bookmark document: a gemtext file that only ever grows.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use cozy_types::address::Address;
use cozy_types::error::Result;

/// First lines of a freshly created bookmark file.
pub const HEADER: &str = "# cozy bookmarks\n\n";

/// Handle to the bookmark file.
#[derive(Debug, Clone)]
pub struct Bookmarks {
    path: PathBuf,
}

impl Bookmarks {
    /// Open the file at `path`, writing [`HEADER`] if it does not exist.
    /// An existing file is never truncated.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(HEADER.as_bytes())?;
                log::debug!("created {}", path.display());
            },
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {},
            Err(e) => return Err(e.into()),
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a link line for `address`.
    pub fn append(&self, address: &Address) -> Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;
        writeln!(file, "=> {address}")?;
        log::info!("bookmarked {address}");
        Ok(())
    }

    /// `file:` address of the bookmark document, for opening it as a page.
    pub fn address(&self) -> Result<Address> {
        Address::from_file_path(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn open_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.gmi");
        let marks = Bookmarks::open(&path).unwrap();
        assert_eq!(fs::read_to_string(marks.path()).unwrap(), HEADER);

        marks
            .append(&Address::parse("gemini://example.org/").unwrap())
            .unwrap();
        Bookmarks::open(&path).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# cozy bookmarks\n\n=> gemini://example.org/\n"
        );
    }

    #[test]
    fn existing_file_is_not_touched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookmarks.gmi");
        fs::write(&path, "my own notes\n").unwrap();
        Bookmarks::open(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "my own notes\n");
    }

    #[test]
    fn appends_accumulate_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let marks = Bookmarks::open(dir.path().join("bookmarks.gmi")).unwrap();
        for host in ["a.org", "b.org"] {
            marks
                .append(&Address::parse(&format!("spartan://{host}/")).unwrap())
                .unwrap();
        }
        let text = fs::read_to_string(marks.path()).unwrap();
        let links: Vec<&str> = text.lines().filter(|l| l.starts_with("=>")).collect();
        assert_eq!(links, vec!["=> spartan://a.org/", "=> spartan://b.org/"]);
    }

    #[test]
    fn address_is_file_url() {
        let dir = tempfile::tempdir().unwrap();
        let marks = Bookmarks::open(dir.path().join("bookmarks.gmi")).unwrap();
        let addr = marks.address().unwrap();
        assert_eq!(addr.scheme(), "file");
        assert!(addr.path().ends_with("bookmarks.gmi"));
    }
}
