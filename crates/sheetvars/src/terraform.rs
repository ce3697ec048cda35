//! external formatter hook
//!
//! `terraform fmt` normalizes the whitespace of a written tfvars file. The
//! file on disk is authoritative either way: callers downgrade a failure
//! here to a warning and never roll the file back.
use std::path::Path;
use std::process::Command;

#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("terraform fmt could not be started")]
    Launch(#[from] std::io::Error),
    #[error("terraform fmt exited with {0}")]
    Unsuccessful(std::process::ExitStatus),
}

/// Run `terraform fmt` on one file.
pub fn fmt(file_path: &Path) -> Result<(), FormatError> {
    tracing::info!(path=%file_path.display(), "running terraform fmt");

    let status = Command::new("terraform")
        .arg("fmt")
        .arg(file_path)
        .status()?;

    if !status.success() {
        return Err(FormatError::Unsuccessful(status));
    }

    Ok(())
}
