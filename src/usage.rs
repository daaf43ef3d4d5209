//! Resource-usage report parsing for the profiling wrapper.
//!
//! GNU time with `-v` writes a block of diagnostic lines to its stderr; only
//! two of them matter here, and they appear in this order:
//!
//! ```text
//! Elapsed (wall clock) time (h:mm:ss or m:ss): 0:06.25
//! Maximum resident set size (kbytes): 1900
//! ```

use std::fmt;

/// Wall-clock duration as read from the wrapper's time token.
///
/// Both fields hold the token text verbatim; `millis` is not normalized to
/// [0, 1000). Only the first two colon fields of the token are read, so an
/// hour component displaces the pair and its value is dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExecTime {
    seconds: u64,
    millis: f64,
}

impl ExecTime {
    pub fn new(seconds: u64, millis: f64) -> Self {
        Self { seconds, millis }
    }

    /// Total seconds, used for budget comparisons.
    pub fn total(&self) -> f64 {
        self.seconds as f64 + self.millis / 1000.0
    }
}

impl fmt::Display for ExecTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} s.", self.seconds, self.millis)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("elapsed-time line missing from wrapper output")]
    MissingElapsed,

    #[error("maximum-resident-memory line missing from wrapper output")]
    MissingMemory,

    #[error("malformed time token in {0:?}")]
    BadTimeToken(String),

    #[error("malformed memory field in {0:?}")]
    BadMemoryField(String),
}

/// Peak resident memory and elapsed time of one profiled run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsageReport {
    pub max_rss_kb: u64,
    pub elapsed: ExecTime,
}

impl UsageReport {
    /// Whether a wrapper stderr line carries one of the two report fields.
    pub fn is_report_line(line: &str) -> bool {
        line.contains("Maximum") || line.contains("Elapsed")
    }

    /// Parse the two report lines, elapsed line first.
    ///
    /// Fails when either line is absent, malformed, or out of order. A
    /// missing memory line is an error, never a zero default.
    pub fn from_lines<'a, I>(mut lines: I) -> Result<Self, ParseError>
    where
        I: Iterator<Item = &'a str>,
    {
        let elapsed_line = lines
            .next()
            .filter(|l| l.contains("Elapsed"))
            .ok_or(ParseError::MissingElapsed)?;
        let memory_line = lines
            .next()
            .filter(|l| l.contains("Maximum"))
            .ok_or(ParseError::MissingMemory)?;

        let elapsed = parse_elapsed(elapsed_line)?;
        let max_rss_kb = parse_memory(memory_line)?;

        Ok(Self { max_rss_kb, elapsed })
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Max memory use : {} KB\nElapsed time   : {}",
            self.max_rss_kb, self.elapsed
        )
    }
}

fn parse_elapsed(line: &str) -> Result<ExecTime, ParseError> {
    let token = line
        .split_whitespace()
        .last()
        .ok_or_else(|| ParseError::BadTimeToken(line.to_string()))?;

    let mut fields = token.split(':');
    let seconds = fields
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| ParseError::BadTimeToken(token.to_string()))?;
    let millis = fields
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| ParseError::BadTimeToken(token.to_string()))?;

    Ok(ExecTime::new(seconds, millis))
}

fn parse_memory(line: &str) -> Result<u64, ParseError> {
    line.split_whitespace()
        .last()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| ParseError::BadMemoryField(line.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ELAPSED: &str = "\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:06.25";
    const MEMORY: &str = "\tMaximum resident set size (kbytes): 1900";

    #[test]
    fn parses_the_two_report_lines() {
        let report = UsageReport::from_lines([ELAPSED, MEMORY].into_iter()).unwrap();
        assert_eq!(report.max_rss_kb, 1900);
        assert_eq!(report.elapsed, ExecTime::new(0, 6.25));
    }

    #[test]
    fn parsing_is_idempotent() {
        let a = UsageReport::from_lines([ELAPSED, MEMORY].into_iter()).unwrap();
        let b = UsageReport::from_lines([ELAPSED, MEMORY].into_iter()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn missing_memory_line_is_an_error() {
        let err = UsageReport::from_lines([ELAPSED].into_iter()).unwrap_err();
        assert!(matches!(err, ParseError::MissingMemory));
    }

    #[test]
    fn missing_elapsed_line_is_an_error() {
        let err = UsageReport::from_lines([].into_iter()).unwrap_err();
        assert!(matches!(err, ParseError::MissingElapsed));
    }

    #[test]
    fn swapped_lines_are_rejected() {
        let err = UsageReport::from_lines([MEMORY, ELAPSED].into_iter()).unwrap_err();
        assert!(matches!(err, ParseError::MissingElapsed));
    }

    #[test]
    fn malformed_time_token_is_an_error() {
        let line = "\tElapsed (wall clock) time (h:mm:ss or m:ss): garbage";
        let err = UsageReport::from_lines([line, MEMORY].into_iter()).unwrap_err();
        assert!(matches!(err, ParseError::BadTimeToken(_)));
    }

    #[test]
    fn malformed_memory_field_is_an_error() {
        let line = "\tMaximum resident set size (kbytes): lots";
        let err = UsageReport::from_lines([ELAPSED, line].into_iter()).unwrap_err();
        assert!(matches!(err, ParseError::BadMemoryField(_)));
    }

    #[test]
    fn hour_component_displaces_the_fields() {
        // Known limitation of the token contract: only the first two colon
        // fields are read, so "1:02:03.55" parses as (1, 2.0).
        let line = "\tElapsed (wall clock) time (h:mm:ss or m:ss): 1:02:03.55";
        let report = UsageReport::from_lines([line, MEMORY].into_iter()).unwrap();
        assert_eq!(report.elapsed, ExecTime::new(1, 2.0));
    }

    #[test]
    fn classifies_report_lines() {
        assert!(UsageReport::is_report_line(ELAPSED));
        assert!(UsageReport::is_report_line(MEMORY));
        assert!(!UsageReport::is_report_line("\tUser time (seconds): 0.11"));
        // Case-sensitive match against the wrapper vocabulary.
        assert!(!UsageReport::is_report_line("maximum elapsed whatever"));
    }

    #[test]
    fn exec_time_total() {
        assert_eq!(ExecTime::new(0, 6.25).total(), 6.25 / 1000.0);
        assert_eq!(ExecTime::new(2, 500.0).total(), 2.5);
    }

    #[test]
    fn display_concatenates_the_raw_fields() {
        assert_eq!(ExecTime::new(0, 6.25).to_string(), "0.6.25 s.");
        let report = UsageReport {
            max_rss_kb: 1900,
            elapsed: ExecTime::new(0, 6.25),
        };
        assert_eq!(
            report.to_string(),
            "Max memory use : 1900 KB\nElapsed time   : 0.6.25 s."
        );
    }
}
