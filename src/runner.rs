//! Sequential orchestration of the grading scenarios.

use std::path::PathBuf;

use tracing::info;

use crate::diff::{self, DiffError};
use crate::policy::{self, Verdict};
use crate::profiler::{ProfileError, Profiler};
use crate::suite::{Invocation, ServerEndpoint, TestCase};
use crate::usage::UsageReport;
use crate::Role;

/// What voided one case's measurement. Kept separate from budget failures:
/// a case that could not be measured is reported as such, never as "too
/// slow" or "too big".
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("template run: {0}")]
    Template(#[source] ProfileError),

    #[error("solution run: {0}")]
    Solution(#[source] ProfileError),

    #[error("file comparison: {0}")]
    Diff(#[from] DiffError),
}

/// Everything measured for one successfully profiled case.
#[derive(Debug, Clone)]
pub struct CaseMeasurements {
    pub template: UsageReport,
    pub solution: UsageReport,
    pub verdict: Verdict,
    pub files_match: bool,
}

impl CaseMeasurements {
    pub fn passed(&self) -> bool {
        self.verdict.passed() && self.files_match
    }
}

/// One grading scenario's result: measurements, or the error that voided
/// them.
#[derive(Debug)]
pub struct CaseOutcome {
    pub case: &'static TestCase,
    pub result: Result<CaseMeasurements, CaseError>,
}

/// Run configuration assembled by the CLI: where the clients live, where the
/// server listens, and how to profile.
#[derive(Debug, Clone)]
pub struct Runner {
    endpoint: ServerEndpoint,
    template_dir: PathBuf,
    solution_bin: PathBuf,
    profiler: Profiler,
}

impl Runner {
    pub fn new(
        endpoint: ServerEndpoint,
        template_dir: PathBuf,
        solution_bin: PathBuf,
        profiler: Profiler,
    ) -> Self {
        Self {
            endpoint,
            template_dir,
            solution_bin,
            profiler,
        }
    }

    /// Run the selected cases in table order. A case whose measurement fails
    /// is recorded with its error and the run continues with the next case.
    pub fn run(&self, cases: &[&'static TestCase]) -> Vec<CaseOutcome> {
        cases.iter().map(|case| self.run_case(case)).collect()
    }

    /// Profile template then solution for one case and fold in the diff
    /// result.
    pub fn run_case(&self, case: &'static TestCase) -> CaseOutcome {
        CaseOutcome {
            case,
            result: self.measure_case(case),
        }
    }

    // Template and solution runs are strictly sequential; overlapping them
    // would let either process distort the other's time and memory readings.
    fn measure_case(&self, case: &TestCase) -> Result<CaseMeasurements, CaseError> {
        let template_out = case.output_file(Role::Template);
        let solution_out = case.output_file(Role::Solution);

        let template_inv = Invocation::new(
            case.template_client(&self.template_dir),
            &self.endpoint,
            &template_out,
            case.bytes,
        );
        let solution_inv = Invocation::new(
            self.solution_bin.clone(),
            &self.endpoint,
            &solution_out,
            case.bytes,
        );

        info!(case = case.id, role = %Role::Template, "profiling");
        let template = self
            .profiler
            .profile(&template_inv)
            .map_err(CaseError::Template)?;

        info!(case = case.id, role = %Role::Solution, "profiling");
        let solution = self
            .profiler
            .profile(&solution_inv)
            .map_err(CaseError::Solution)?;

        let files_match = diff::files_match(&template_out, &solution_out)?;
        let verdict = policy::compare(&template, &solution);

        Ok(CaseMeasurements {
            template,
            solution,
            verdict,
            files_match,
        })
    }
}
