//! Fixed grading scenarios and invocation assembly.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::Role;

/// One grading scenario: a download size bound to a reference binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestCase {
    pub id: u32,
    pub bytes: u64,
    pub template_bin: &'static str,
}

/// The grading scenarios, in run order. The id/size/binary mapping is fixed;
/// no dynamic extension.
pub const TEST_CASES: &[TestCase] = &[
    TestCase {
        id: 1,
        bytes: 15_034,
        template_bin: "transport-client-slow",
    },
    TestCase {
        id: 3,
        bytes: 1_000_000,
        template_bin: "transport-client-fast",
    },
    TestCase {
        id: 4,
        bytes: 9_000_000,
        template_bin: "transport-client-fast",
    },
];

impl TestCase {
    pub fn by_id(id: u32) -> Option<&'static TestCase> {
        TEST_CASES.iter().find(|case| case.id == id)
    }

    /// Output artifact for one role, e.g. `template-1`, relative to the
    /// working directory.
    pub fn output_file(&self, role: Role) -> PathBuf {
        PathBuf::from(format!("{}-{}", role, self.id))
    }

    /// Path of this case's reference binary inside the template directory.
    pub fn template_client(&self, template_dir: &Path) -> PathBuf {
        template_dir.join(self.template_bin)
    }
}

impl fmt::Display for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Test {} :: Downloading {} bytes", self.id, self.bytes)
    }
}

/// Address of the download server, shared by every invocation of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServerEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Fully resolved argv for one download-client run. Built from structured
/// components and handed to the process spawner as-is; never flattened into a
/// shell string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
}

impl Invocation {
    /// `<program> <host> <port> <output_file> <bytes>`, in this order.
    pub fn new(
        program: PathBuf,
        endpoint: &ServerEndpoint,
        output_file: &Path,
        bytes: u64,
    ) -> Self {
        let args = vec![
            endpoint.host.clone(),
            endpoint.port.to_string(),
            output_file.to_string_lossy().into_owned(),
            bytes.to_string(),
        ];
        Self { program, args }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_holds_the_three_scenarios() {
        assert_eq!(TEST_CASES.len(), 3);
        assert_eq!(TEST_CASES[0].bytes, 15_034);
        assert_eq!(TEST_CASES[0].template_bin, "transport-client-slow");
        assert_eq!(TEST_CASES[1].bytes, 1_000_000);
        assert_eq!(TEST_CASES[2].bytes, 9_000_000);
        assert_eq!(TEST_CASES[2].template_bin, "transport-client-fast");
    }

    #[test]
    fn lookup_by_id() {
        assert_eq!(TestCase::by_id(3).unwrap().bytes, 1_000_000);
        assert!(TestCase::by_id(2).is_none());
    }

    #[test]
    fn output_files_are_named_by_role_and_id() {
        let case = TestCase::by_id(4).unwrap();
        assert_eq!(case.output_file(Role::Template), PathBuf::from("template-4"));
        assert_eq!(case.output_file(Role::Solution), PathBuf::from("solution-4"));
    }

    #[test]
    fn template_client_joins_the_template_dir() {
        let case = TestCase::by_id(1).unwrap();
        assert_eq!(
            case.template_client(Path::new("/opt/templates")),
            PathBuf::from("/opt/templates/transport-client-slow")
        );
    }

    #[test]
    fn case_header_format() {
        assert_eq!(
            TestCase::by_id(1).unwrap().to_string(),
            "Test 1 :: Downloading 15034 bytes"
        );
    }

    #[test]
    fn invocation_argv_order() {
        let endpoint = ServerEndpoint::new("192.0.2.7", 9000);
        let invocation = Invocation::new(
            PathBuf::from("/opt/solution"),
            &endpoint,
            Path::new("solution-3"),
            1_000_000,
        );
        assert_eq!(invocation.program(), Path::new("/opt/solution"));
        assert_eq!(
            invocation.args(),
            ["192.0.2.7", "9000", "solution-3", "1000000"]
        );
    }
}
