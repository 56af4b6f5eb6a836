//! Handlers that never touch the network: bundled `about:` pages and the
//! local filesystem.

use std::fs;
use std::io;
use std::path::Path;

use cozy_types::address::Address;
use cozy_types::error::{CozyError, Result};

use crate::cancel::CancelToken;
use crate::handler::ProtocolHandler;
use crate::response::{ContentKind, Response, Status, Upload};

const HOME: &str = include_str!("../gmi/home.gmi");
const HELP: &str = include_str!("../gmi/help.gmi");

/// Serves the documents bundled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct AboutHandler;

impl AboutHandler {
    fn page(name: &str) -> Option<&'static str> {
        match name {
            "home" => Some(HOME),
            "help" => Some(HELP),
            _ => None,
        }
    }
}

impl ProtocolHandler for AboutHandler {
    fn fetch(
        &self,
        address: &Address,
        _upload: Option<Upload>,
        cancel: &CancelToken,
    ) -> Result<Response> {
        cancel.check()?;
        let name = address.path().trim_matches('/');
        match Self::page(name) {
            Some(text) => Ok(Response::document("text/gemini", text)),
            None => Ok(Response::failure(
                Status::ClientError,
                51,
                format!("no such page: about:{name}"),
            )),
        }
    }
}

/// Serves files and directory listings from the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileHandler;

impl ProtocolHandler for FileHandler {
    fn fetch(
        &self,
        address: &Address,
        _upload: Option<Upload>,
        cancel: &CancelToken,
    ) -> Result<Response> {
        cancel.check()?;
        let path = address
            .as_url()
            .to_file_path()
            .map_err(|()| CozyError::address(address.as_str(), "not a local path"))?;

        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Response::failure(
                    Status::ClientError,
                    51,
                    format!("not found: {}", path.display()),
                ));
            },
            Err(e) => return Err(e.into()),
        };

        if meta.is_dir() {
            log::debug!("listing {}", path.display());
            return Ok(Response::document("text/gemini", listing(&path)?));
        }

        let descriptor = ContentKind::descriptor_for_path(&path.to_string_lossy());
        let file = fs::File::open(&path)?;
        Ok(Response::success(descriptor, Box::new(file)))
    }
}

/// Gemtext index of a directory: subdirectories first, then files, each
/// group sorted by name.
fn listing(dir: &Path) -> Result<String> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            dirs.push(name);
        } else {
            files.push(name);
        }
    }
    dirs.sort();
    files.sort();

    // Targets are file URLs so spaces, `#` and `?` in names survive.
    let mut out = format!("# {}\n\n", dir.display());
    if let Some(parent) = dir.parent() {
        out.push_str(&format!("=> {} ..\n", Address::from_file_path(parent)?));
    }
    for name in dirs {
        let target = Address::from_file_path(&dir.join(&name))?;
        out.push_str(&format!("=> {target} {name}/\n"));
    }
    for name in files {
        let target = Address::from_file_path(&dir.join(&name))?;
        out.push_str(&format!("=> {target} {name}\n"));
    }
    Ok(out)
}
