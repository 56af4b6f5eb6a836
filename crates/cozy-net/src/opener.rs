//! Handing addresses and content to the operating system.

use std::io::{self, Write};
use std::path::PathBuf;

use cozy_types::address::Address;

/// Opens things cozy does not display itself.
pub trait Opener: Send + Sync {
    /// Open `address` with the system handler for its scheme.
    fn open_address(&self, address: &Address) -> io::Result<()>;

    /// Persist `bytes` to a temporary file and open it with the system
    /// viewer. Returns the file path.
    fn open_image(&self, descriptor: &str, bytes: &[u8]) -> io::Result<PathBuf>;
}

/// [`Opener`] backed by the desktop's default applications.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemOpener;

impl Opener for SystemOpener {
    fn open_address(&self, address: &Address) -> io::Result<()> {
        log::info!("handing off {address}");
        open::that_detached(address.as_str())
    }

    fn open_image(&self, descriptor: &str, bytes: &[u8]) -> io::Result<PathBuf> {
        let mut file = tempfile::Builder::new()
            .prefix("cozy-")
            .suffix(image_suffix(descriptor))
            .tempfile()?;
        file.write_all(bytes)?;
        let (_, path) = file.keep().map_err(|e| e.error)?;
        log::info!("opening {descriptor} image at {}", path.display());
        open::that_detached(&path)?;
        Ok(path)
    }
}

/// File suffix for an image descriptor, so the viewer recognises it.
fn image_suffix(descriptor: &str) -> &'static str {
    let mime = descriptor.split(';').next().unwrap_or("").trim();
    match mime.to_ascii_lowercase().as_str() {
        "image/png" => ".png",
        "image/jpeg" | "image/jpg" => ".jpg",
        "image/gif" => ".gif",
        "image/webp" => ".webp",
        "image/svg+xml" => ".svg",
        _ => ".img",
    }
}
