//! Opening the bookmark file in an external editor.

use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, bail};

const DEFAULT_EDITOR: &str = "vim";

/// Editor program from `$EDITOR`, falling back to vim.
pub fn editor_program(env: Option<String>) -> String {
    env.map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

/// Run the editor on `path` and wait for it to exit.
pub fn edit(path: &Path) -> Result<()> {
    let program = editor_program(std::env::var("EDITOR").ok());
    log::info!("editing {} with {program}", path.display());
    let status = Command::new(&program)
        .arg(path)
        .status()
        .with_context(|| format!("starting editor {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_vim() {
        assert_eq!(editor_program(None), "vim");
        assert_eq!(editor_program(Some("  ".into())), "vim");
    }

    #[test]
    fn uses_environment_value() {
        assert_eq!(editor_program(Some("nano".into())), "nano");
    }
}
