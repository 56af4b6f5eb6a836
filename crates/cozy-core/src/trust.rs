//! Trust-on-first-use host pinning.
//!
//! The store is a plain text file of `host signature` lines. The first
//! signature seen for a host is appended and trusted from then on; any
//! later mismatch blocks the navigation. Records are never rewritten.

use std::collections::HashMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use cozy_types::error::{CozyError, Result};

/// Append-only `host -> signature` store backed by a file.
#[derive(Debug)]
pub struct TrustStore {
    path: PathBuf,
    /// Serialises read-check-append so two checks never race on one host.
    lock: Mutex<()>,
}

impl TrustStore {
    /// Open the store at `path`, creating an empty file if none exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check `signature` against the record for `host`.
    ///
    /// An unknown host is recorded and trusted. A known host must present
    /// the recorded signature or the call fails with
    /// [`CozyError::TrustMismatch`] and the file is left untouched.
    pub fn verify(&self, host: &str, signature: &str) -> Result<()> {
        let host = host.trim().to_ascii_lowercase();
        let signature = signature.trim();
        if host.is_empty() || host.contains(char::is_whitespace) {
            return Err(CozyError::address(&host, "host cannot be pinned"));
        }
        if signature.is_empty() || signature.contains(char::is_whitespace) {
            return Err(CozyError::Network(format!(
                "{host} presented an unusable identity signature"
            )));
        }

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let records = self.load()?;
        match records.get(&host) {
            Some(known) if known == signature => {
                log::debug!("trusted {host}");
                Ok(())
            },
            Some(_) => {
                log::warn!("identity mismatch for {host}");
                Err(CozyError::TrustMismatch { host })
            },
            None => {
                let mut file = OpenOptions::new().append(true).open(&self.path)?;
                writeln!(file, "{host} {signature}")?;
                log::info!("pinned identity for {host}");
                Ok(())
            },
        }
    }

    /// The recorded signature for `host`, if any.
    pub fn lookup(&self, host: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        Ok(self.load()?.remove(&host.trim().to_ascii_lowercase()))
    }

    fn load(&self) -> Result<HashMap<String, String>> {
        parse_records(&fs::read_to_string(&self.path)?)
    }
}

/// Parse the store contents. The first record for a host wins.
fn parse_records(text: &str) -> Result<HashMap<String, String>> {
    let mut records = HashMap::new();
    for (i, line) in text.lines().enumerate() {
        let (host, signature) = line
            .trim_end()
            .split_once(char::is_whitespace)
            .map(|(h, s)| (h, s.trim_start()))
            .filter(|(h, s)| !h.is_empty() && !s.is_empty())
            .ok_or(CozyError::TrustStoreCorrupt { line: i + 1 })?;
        records
            .entry(host.to_ascii_lowercase())
            .or_insert_with(|| signature.to_string());
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, TrustStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = TrustStore::open(dir.path().join("hosts")).unwrap();
        (dir, store)
    }

    #[test]
    fn open_creates_empty_file() {
        let (_dir, store) = store();
        assert!(store.path().is_file());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    #[test]
    fn open_keeps_existing_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "example.org abc123\n").unwrap();
        let store = TrustStore::open(&path).unwrap();
        assert_eq!(
            store.lookup("example.org").unwrap().as_deref(),
            Some("abc123")
        );
    }

    #[test]
    fn first_use_is_recorded() {
        let (_dir, store) = store();
        store.verify("Example.ORG", "abc123").unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            "example.org abc123\n"
        );
        store.verify("example.org", "abc123").unwrap();
        assert_eq!(fs::read_to_string(store.path()).unwrap().lines().count(), 1);
    }

    #[test]
    fn mismatch_blocks_and_leaves_file_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "example.org abc123\n").unwrap();
        let store = TrustStore::open(&path).unwrap();

        let err = store.verify("example.org", "xyz999").unwrap_err();
        assert!(matches!(err, CozyError::TrustMismatch { ref host } if host == "example.org"));
        assert!(err.is_trust_failure());
        assert_eq!(fs::read_to_string(&path).unwrap(), "example.org abc123\n");
        store.verify("example.org", "abc123").unwrap();
    }

    #[test]
    fn separator_is_first_whitespace_run() {
        let records = parse_records("a.org \t sig-a\nb.org\tsig-b  \n").unwrap();
        assert_eq!(records["a.org"], "sig-a");
        assert_eq!(records["b.org"], "sig-b");
    }

    #[test]
    fn first_record_for_host_wins() {
        let records = parse_records("a.org one\nA.org two\n").unwrap();
        assert_eq!(records["a.org"], "one");
    }

    #[test]
    fn line_without_separator_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hosts");
        fs::write(&path, "good.org sig\nbroken\n").unwrap();
        let store = TrustStore::open(&path).unwrap();

        let err = store.verify("other.org", "sig").unwrap_err();
        assert!(matches!(err, CozyError::TrustStoreCorrupt { line: 2 }));
        assert!(err.is_trust_failure());
        // Nothing was appended.
        assert_eq!(fs::read_to_string(&path).unwrap(), "good.org sig\nbroken\n");
    }

    #[test]
    fn blank_line_is_corrupt() {
        assert!(matches!(
            parse_records("a.org sig\n\nb.org sig\n"),
            Err(CozyError::TrustStoreCorrupt { line: 2 })
        ));
    }

    #[test]
    fn unusable_inputs_are_rejected_without_writing() {
        let (_dir, store) = store();
        assert!(store.verify("", "sig").is_err());
        assert!(store.verify("a.org", "").is_err());
        assert!(store.verify("a.org", "two words").is_err());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "");
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn pinning_holds(
                host in "[a-z]{1,12}\\.[a-z]{2,3}",
                s1 in "[a-f0-9]{8,16}",
                s2 in "[a-f0-9]{8,16}",
            ) {
                prop_assume!(s1 != s2);
                let dir = tempfile::tempdir().unwrap();
                let store = TrustStore::open(dir.path().join("hosts")).unwrap();

                prop_assert!(store.verify(&host, &s1).is_ok());
                prop_assert!(store.verify(&host, &s1).is_ok());
                let is_mismatch = matches!(
                    store.verify(&host, &s2),
                    Err(CozyError::TrustMismatch { .. })
                );
                prop_assert!(is_mismatch);
                prop_assert!(store.verify(&host, &s1).is_ok());
                prop_assert_eq!(store.lookup(&host).unwrap(), Some(s1));
            }

            #[test]
            fn hosts_are_independent(
                hosts in proptest::collection::hash_set("[a-z]{1,8}\\.org", 1..8),
            ) {
                let dir = tempfile::tempdir().unwrap();
                let store = TrustStore::open(dir.path().join("hosts")).unwrap();
                for host in &hosts {
                    let sig = format!("sig-{host}");
                    prop_assert!(store.verify(host, &sig).is_ok());
                }
                for host in &hosts {
                    let expected = format!("sig-{host}");
                    prop_assert_eq!(store.lookup(host).unwrap(), Some(expected));
                }
            }
        }
    }
}
