use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use transport_client_bench::policy::MAX_MEM_FOOTPRINT_KB;
use transport_client_bench::profiler::{Profiler, DEFAULT_TIME_COMMAND};
use transport_client_bench::runner::{CaseOutcome, Runner};
use transport_client_bench::schema::{CaseReport, GradeReport, RunMeta};
use transport_client_bench::suite::{ServerEndpoint, TestCase, TEST_CASES};

#[derive(Parser, Debug)]
#[command(name = "transport-client-bench")]
#[command(about = "Grades a transport download client against the reference binaries")]
struct Args {
    /// IPv4 address of the download server.
    server_address: String,

    /// Server's port.
    server_port: u16,

    /// Path to the directory containing the reference client binaries.
    template_path: PathBuf,

    /// Path to the candidate client executable.
    solution_path: PathBuf,

    /// Restrict the run to the given test case ids (repeatable).
    #[arg(long, value_name = "ID")]
    case: Vec<u32>,

    /// Where to write the JSON run report. If omitted, none is written.
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Profiling wrapper executable.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_TIME_COMMAND)]
    time_command: PathBuf,
}

/// Initialize tracing with optional JSON formatting.
fn init_tracing() {
    let json_format = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("transport_client_bench=info"));

    if json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn now_utc() -> String {
    // Unix-seconds provenance stamp; not worth a chrono dependency.
    use std::time::{SystemTime, UNIX_EPOCH};
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    format!("unix:{secs}")
}

/// Resolve `--case` filters against the fixed table, preserving table order.
fn selected_cases(ids: &[u32]) -> anyhow::Result<Vec<&'static TestCase>> {
    if ids.is_empty() {
        return Ok(TEST_CASES.iter().collect());
    }
    for id in ids {
        if TestCase::by_id(*id).is_none() {
            bail!("unknown test case id: {id}");
        }
    }
    Ok(TEST_CASES
        .iter()
        .filter(|case| ids.contains(&case.id))
        .collect())
}

fn print_results(outcome: &CaseOutcome) {
    match &outcome.result {
        Ok(m) => {
            println!("Template results:");
            for line in m.template.to_string().lines() {
                println!("\t{line}");
            }
            println!("User results:");
            for line in m.solution.to_string().lines() {
                println!("\t{line}");
            }
            println!();
            println!(
                "Files: {}",
                if m.files_match { "OK" } else { "DIFFER" }
            );
            if m.verdict.mem_ok {
                println!("Mem : OK");
            } else {
                println!(
                    "Mem : TOO BIG. Limit exceeded by {} KB",
                    m.solution.max_rss_kb - MAX_MEM_FOOTPRINT_KB
                );
            }
            println!("Time: {}", if m.verdict.time_ok { "OK" } else { "TOO SLOW" });
        }
        Err(e) => println!("Measurement failed: {e}"),
    }
}


fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let cases = selected_cases(&args.case)?;

    // A missing binary would void the whole grading run; refuse up front.
    for case in &cases {
        let bin = case.template_client(&args.template_path);
        if !bin.is_file() {
            bail!("reference binary not found: {}", bin.display());
        }
    }
    if !args.solution_path.is_file() {
        bail!("solution executable not found: {}", args.solution_path.display());
    }

    let endpoint = ServerEndpoint::new(args.server_address.clone(), args.server_port);
    let runner = Runner::new(
        endpoint,
        args.template_path.clone(),
        args.solution_path.clone(),
        Profiler::new(args.time_command),
    );

    let mut outcomes = Vec::with_capacity(cases.len());
    for case in cases {
        println!("{case}\n");
        let outcome = runner.run_case(case);
        print_results(&outcome);
        println!();
        outcomes.push(outcome);
    }

    if let Some(out) = &args.out {
        let report = GradeReport {
            run: RunMeta {
                schema_version: 1,
                bench_version: env!("CARGO_PKG_VERSION").to_string(),
                server_host: args.server_address.clone(),
                server_port: args.server_port,
                timestamp_utc: now_utc(),
            },
            cases: outcomes.iter().map(CaseReport::from).collect(),
        };
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(out, json).with_context(|| format!("writing report to {}", out.display()))?;
    }

    let all_passed = outcomes
        .iter()
        .all(|o| matches!(&o.result, Ok(m) if m.passed()));
    if !all_passed {
        std::process::exit(1);
    }
    Ok(())
}
