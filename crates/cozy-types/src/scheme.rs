//! Scheme names and per-scheme capabilities.

pub const GEMINI: &str = "gemini";
pub const SPARTAN: &str = "spartan";
pub const NEX: &str = "nex";
pub const FILE: &str = "file";
pub const ABOUT: &str = "about";

/// Small-web schemes the address bar can switch between.
pub const SMALL_WEB: &[&str] = &[GEMINI, SPARTAN, NEX];

/// Schemes whose documents may carry upload links (`=:`).
pub fn supports_upload(scheme: &str) -> bool {
    scheme.eq_ignore_ascii_case(SPARTAN)
}

/// Short label shown in front of the address bar for the active scheme.
pub fn label(scheme: &str) -> &'static str {
    match scheme {
        GEMINI => " 🚀 ",
        SPARTAN => " 💪 ",
        _ => " 🌃 ",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_spartan_supports_upload() {
        assert!(supports_upload("spartan"));
        assert!(supports_upload("SPARTAN"));
        assert!(!supports_upload("gemini"));
        assert!(!supports_upload("nex"));
        assert!(!supports_upload("file"));
    }

    #[test]
    fn labels_fall_back_for_other_schemes() {
        assert_eq!(label(GEMINI), " 🚀 ");
        assert_eq!(label(SPARTAN), " 💪 ");
        assert_eq!(label(NEX), " 🌃 ");
        assert_eq!(label("about"), " 🌃 ");
    }
}
