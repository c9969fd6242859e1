//! Command handlers.

pub mod horus;
pub mod pdf;
pub mod sheets;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Shared per-invocation context.
pub struct Ctx {
    pub data_dir: PathBuf,
    pub yes: bool,
}

/// Ask before a destructive step. `--yes` answers for the operator.
pub fn confirm(ctx: &Ctx, prompt: &str) -> bool {
    if ctx.yes {
        return true;
    }
    print!("{prompt} [y/N]: ");
    let _ = std::io::stdout().flush();

    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes" | "si" | "s")
}

/// One name per line, blanks skipped.
pub fn read_names(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading names file {}", path.display()))?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

pub fn print_errors(errors: &[String]) {
    for error in errors {
        eprintln!("  ! {error}");
    }
}
