//! Wrapper-report filtering and parsing benchmark.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use transport_client_bench::usage::UsageReport;

// A realistic `/usr/bin/time -v` stderr block.
const WRAPPER_STDERR: &str = "\
\tCommand being timed: \"./transport-client 127.0.0.1 9000 solution-3 1000000\"
\tUser time (seconds): 0.11
\tSystem time (seconds): 0.05
\tPercent of CPU this job got: 2%
\tElapsed (wall clock) time (h:mm:ss or m:ss): 0:06.25
\tAverage shared text size (kbytes): 0
\tAverage unshared data size (kbytes): 0
\tAverage stack size (kbytes): 0
\tAverage total size (kbytes): 0
\tMaximum resident set size (kbytes): 1900
\tAverage resident set size (kbytes): 0
\tMajor (requiring I/O) page faults: 0
\tMinor (reclaiming a frame) page faults: 215
\tVoluntary context switches: 1500
\tInvoluntary context switches: 3
\tSwaps: 0
\tFile system inputs: 0
\tFile system outputs: 1960
\tSocket messages sent: 0
\tSocket messages received: 0
\tSignals delivered: 0
\tPage size (bytes): 4096
\tExit status: 0
";

fn bench_filter_lines(c: &mut Criterion) {
    c.bench_function("filter_report_lines", |b| {
        b.iter(|| {
            black_box(WRAPPER_STDERR)
                .lines()
                .filter(|l| UsageReport::is_report_line(l))
                .count()
        })
    });
}

fn bench_parse_report(c: &mut Criterion) {
    c.bench_function("filter_and_parse_report", |b| {
        b.iter(|| {
            let lines = black_box(WRAPPER_STDERR)
                .lines()
                .filter(|l| UsageReport::is_report_line(l));
            UsageReport::from_lines(lines).unwrap()
        })
    });
}

criterion_group!(benches, bench_filter_lines, bench_parse_report);
criterion_main!(benches);
