//! External file-equivalence collaborator.
//!
//! Byte-level comparison stays in the system `diff` utility; this module
//! only drives it and interprets its exit status.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    #[error("failed to launch diff: {0}")]
    Launch(#[from] io::Error),

    #[error("diff could not compare the files (exit status {0:?})")]
    Failed(Option<i32>),
}

/// Compare two output files with `diff -q`.
///
/// Exit status 0 means equivalent, 1 means the files differ; anything else
/// (e.g. a missing file) is an error, distinct from a mismatch.
pub fn files_match(a: &Path, b: &Path) -> Result<bool, DiffError> {
    debug!(a = %a.display(), b = %b.display(), "running diff");
    let status = Command::new("diff")
        .arg("-q")
        .arg(a)
        .arg(b)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()?;

    match status.code() {
        Some(0) => Ok(true),
        Some(1) => Ok(false),
        code => Err(DiffError::Failed(code)),
    }
}
