//! Grading harness for transport download clients.
//!
//! Profiles a candidate download client and the matching reference client
//! under an external profiling wrapper (`/usr/bin/time -v`), parses the
//! wrapper's resource-usage report, and grades the candidate on elapsed wall
//! time, peak resident memory, and output-file equivalence.

pub mod diff;
pub mod policy;
pub mod profiler;
pub mod runner;
pub mod schema;
pub mod suite;
pub mod usage;

/// Which side of the comparison a profiled run belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Reference client shipped with the grading kit.
    Template,
    /// Candidate client under evaluation.
    Solution,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Template => "template",
            Role::Solution => "solution",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
