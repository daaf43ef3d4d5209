//! Child-process execution under the external profiling wrapper.

use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::suite::Invocation;
use crate::usage::{ParseError, UsageReport};

/// Default location of the GNU time binary.
pub const DEFAULT_TIME_COMMAND: &str = "/usr/bin/time";

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to launch {} under {}: {source}", .program.display(), .wrapper.display())]
    Launch {
        wrapper: PathBuf,
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unusable wrapper report: {0}")]
    Report(#[from] ParseError),
}

/// Runs invocations under `<wrapper> -v` and parses the usage report from
/// the wrapper's stderr.
#[derive(Debug, Clone)]
pub struct Profiler {
    time_command: PathBuf,
}

impl Profiler {
    pub fn new(time_command: impl Into<PathBuf>) -> Self {
        Self {
            time_command: time_command.into(),
        }
    }

    /// Profile one invocation to completion.
    ///
    /// Blocks until the child exits and its stderr is fully drained; no
    /// timeout is imposed. The child's stdout is discarded; the downloaded
    /// file lands on disk as a side effect of the invocation itself. A run
    /// that produces no usable report lines (wrapper missing, child crashed
    /// early) surfaces as a [`ParseError`] and is not retried, since the
    /// download already happened.
    pub fn profile(&self, invocation: &Invocation) -> Result<UsageReport, ProfileError> {
        debug!(
            program = %invocation.program().display(),
            args = ?invocation.args(),
            "spawning under profiling wrapper"
        );

        let output = Command::new(&self.time_command)
            .arg("-v")
            .arg(invocation.program())
            .args(invocation.args())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ProfileError::Launch {
                wrapper: self.time_command.clone(),
                program: invocation.program().to_path_buf(),
                source,
            })?;

        if !output.status.success() {
            warn!(status = ?output.status.code(), "profiled process exited with non-zero status");
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let report =
            UsageReport::from_lines(stderr.lines().filter(|l| UsageReport::is_report_line(l)))?;
        Ok(report)
    }
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_COMMAND)
    }
}
