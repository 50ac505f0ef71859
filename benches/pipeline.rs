//! Full analysis pipeline benchmark
//!
//! Measures one recomputation (validate, filter, trim, bin, detect,
//! aggregate) over the synthetic sample dataset, with and without the
//! comparison cohort.
//!
//! # Run Instructions
//!
//! ```bash
//! cargo bench --bench pipeline
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use talktime::config::KNOWN_GROUPS;
use talktime::dataset::Record;
use talktime::filter::trim_upper_tail;
use talktime::histogram::compute_bins;
use talktime::loader::synthesize;
use talktime::pipeline::{run_analysis, AnalysisParams};
use talktime::selection::CohortSelection;

fn params(comparison: bool) -> AnalysisParams {
    AnalysisParams {
        primary: CohortSelection::new(&KNOWN_GROUPS[..3], "TT", "0.02"),
        comparison: comparison.then(|| CohortSelection::new(&KNOWN_GROUPS[3..6], "TM", "0.02")),
        classification: "No Contesta".to_string(),
        bin_width: "1.0".to_string(),
        show_density_curve: true,
    }
}

fn bench_run_analysis(c: &mut Criterion) {
    let dataset = synthesize(Some(42));
    let mut group = c.benchmark_group("run_analysis");

    for comparison in [false, true] {
        let p = params(comparison);
        let label = if comparison { "two_cohorts" } else { "primary_only" };
        group.bench_with_input(BenchmarkId::from_parameter(label), &p, |b, p| {
            b.iter(|| run_analysis(black_box(&dataset), black_box(p)));
        });
    }
    group.finish();
}

fn bench_trim_and_bins(c: &mut Criterion) {
    let records: Vec<Record> = synthesize(Some(7)).records().to_vec();

    c.bench_function("trim_upper_tail", |b| {
        b.iter(|| trim_upper_tail(black_box(records.clone()), black_box(0.02)));
    });
    c.bench_function("compute_bins", |b| {
        b.iter(|| compute_bins(black_box(&records), &[], black_box(0.5)).ok());
    });
}

criterion_group!(benches, bench_run_analysis, bench_trim_and_bins);
criterion_main!(benches);
