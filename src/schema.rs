//! Serde schema for the machine-readable run report.

use serde::{Deserialize, Serialize};

use crate::policy;
use crate::runner::CaseOutcome;
use crate::usage::UsageReport;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema_version: u32,
    pub bench_version: String,
    pub server_host: String,
    pub server_port: u16,
    pub timestamp_utc: String,
}

/// One profiled run's figures, flattened for the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageFigures {
    pub max_rss_kb: u64,
    pub elapsed_secs: f64,
    pub elapsed_display: String,
}

impl From<&UsageReport> for UsageFigures {
    fn from(report: &UsageReport) -> Self {
        Self {
            max_rss_kb: report.max_rss_kb,
            elapsed_secs: report.elapsed.total(),
            elapsed_display: report.elapsed.to_string(),
        }
    }
}

/// One grading scenario's outcome. Measurement failure leaves the figure
/// fields empty and sets `error`; the two kinds never mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseReport {
    pub case_id: u32,
    pub bytes: u64,
    pub template_bin: String,
    pub template: Option<UsageFigures>,
    pub solution: Option<UsageFigures>,
    pub time_ok: Option<bool>,
    pub mem_ok: Option<bool>,
    pub mem_overage_kb: Option<u64>,
    pub files_match: Option<bool>,
    pub error: Option<String>,
}

impl From<&CaseOutcome> for CaseReport {
    fn from(outcome: &CaseOutcome) -> Self {
        let case = outcome.case;
        let mut report = CaseReport {
            case_id: case.id,
            bytes: case.bytes,
            template_bin: case.template_bin.to_string(),
            template: None,
            solution: None,
            time_ok: None,
            mem_ok: None,
            mem_overage_kb: None,
            files_match: None,
            error: None,
        };

        match &outcome.result {
            Ok(m) => {
                report.template = Some(UsageFigures::from(&m.template));
                report.solution = Some(UsageFigures::from(&m.solution));
                report.time_ok = Some(m.verdict.time_ok);
                report.mem_ok = Some(m.verdict.mem_ok);
                report.mem_overage_kb = (!m.verdict.mem_ok)
                    .then(|| m.solution.max_rss_kb - policy::MAX_MEM_FOOTPRINT_KB);
                report.files_match = Some(m.files_match);
            }
            Err(e) => report.error = Some(e.to_string()),
        }

        report
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeReport {
    pub run: RunMeta,
    pub cases: Vec<CaseReport>,
}
