//! CLI command implementations

pub mod config;
pub mod convert;
pub mod preview;
pub mod year;

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use cartola_core::ports::ExportFormat;
use cartola_core::CartolaContext;
use dialoguer::Password;
use tracing::debug;

/// Environment variable holding the PDF password
pub const PASSWORD_ENV: &str = "CARTOLA_PDF_PASSWORD";

/// Get the cartola directory from environment or default
pub fn get_cartola_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("CARTOLA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".cartola"))
}

/// Load settings and build the context
pub fn get_context() -> Result<CartolaContext> {
    let cartola_dir = get_cartola_dir()?;
    CartolaContext::new(&cartola_dir)
        .with_context(|| format!("Failed to load settings from {}", cartola_dir.display()))
}

/// Get password from --password flag, CARTOLA_PDF_PASSWORD env var, or prompt
pub fn resolve_password(password_flag: Option<String>) -> Result<String> {
    if let Some(p) = password_flag {
        return Ok(p);
    }

    if let Ok(p) = env::var(PASSWORD_ENV) {
        debug!("using password from {}", PASSWORD_ENV);
        return Ok(p);
    }

    if atty::isnt(atty::Stream::Stdin) {
        bail!("No password given. Use --password or set {}", PASSWORD_ENV);
    }

    let p = Password::new()
        .with_prompt("PDF password")
        .interact()?;
    Ok(p)
}

/// `<stem>.<ext>` next to the input PDF
pub fn default_output(pdf: &Path, format: ExportFormat) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "movimientos_cartola".to_string());
    pdf.with_file_name(format!("{}.{}", stem, format.extension()))
}
