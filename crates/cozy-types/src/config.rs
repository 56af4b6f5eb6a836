//! User configuration and the config-directory layout.
//!
//! Everything cozy persists lives under `<config dir>/cozy/`:
//!
//! ```text
//! bookmarks.gmi   bookmark document (append-only link lines)
//! hosts           trust-on-first-use records
//! config.toml     optional settings (this module)
//! cozy.log        log output while the terminal surface is up
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CozyError, Result};
use crate::scheme;

/// Visual theme name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Day,
    #[default]
    Night,
}

/// Settings read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CozyConfig {
    /// Page opened when no address is given on the command line.
    #[serde(default = "default_home")]
    pub home: String,
    /// Scheme applied to addresses typed without one.
    #[serde(default = "default_scheme")]
    pub scheme: String,
    #[serde(default)]
    pub theme: ThemeName,
    /// Redirect hops followed before giving up.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: u8,
    /// Schemes handed to the system opener instead of fetched.
    #[serde(default = "default_handoff")]
    pub handoff: Vec<String>,
}

fn default_home() -> String {
    "about:home".to_string()
}

fn default_scheme() -> String {
    scheme::GEMINI.to_string()
}

fn default_max_redirects() -> u8 {
    5
}

fn default_handoff() -> Vec<String> {
    vec!["http".into(), "https".into(), "mailto".into()]
}

impl Default for CozyConfig {
    fn default() -> Self {
        Self {
            home: default_home(),
            scheme: default_scheme(),
            theme: ThemeName::default(),
            max_redirects: default_max_redirects(),
            handoff: default_handoff(),
        }
    }
}

impl CozyConfig {
    /// Parse a `config.toml` document.
    pub fn parse(toml_str: &str) -> Result<Self> {
        let config: CozyConfig = toml::from_str(toml_str)?;
        if config.scheme.is_empty() {
            return Err(CozyError::Config("config.toml: empty scheme".into()));
        }
        Ok(config)
    }

    /// Load `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            },
            Err(e) => Err(e.into()),
        }
    }

    /// Whether addresses with `scheme` go to the system opener.
    pub fn is_handoff(&self, scheme: &str) -> bool {
        self.handoff.iter().any(|s| s.eq_ignore_ascii_case(scheme))
    }
}

/// Locations of cozy's files inside the config directory.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    root: PathBuf,
}

impl ConfigPaths {
    /// Use `<platform config dir>/cozy`.
    pub fn discover() -> Result<Self> {
        let base = dirs::config_dir()
            .ok_or_else(|| CozyError::Config("no config directory available".into()))?;
        Ok(Self::new(base.join("cozy")))
    }

    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bookmarks(&self) -> PathBuf {
        self.root.join("bookmarks.gmi")
    }

    pub fn hosts(&self) -> PathBuf {
        self.root.join("hosts")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    pub fn log_file(&self) -> PathBuf {
        self.root.join("cozy.log")
    }
}
