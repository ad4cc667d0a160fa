//! Benchmarks for segmentation and tag queries
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use split_eda::*;

/// A 4 Hz recording split into `runs` acquisition runs by ten-minute pauses
fn create_recording(runs: usize, samples_per_run: usize) -> Vec<Sample> {
    let mut samples = Vec::with_capacity(runs * samples_per_run);
    let mut timestamp = 1_695_394_800_000_000i64;

    for run in 0..runs {
        for i in 0..samples_per_run {
            samples.push(Sample::new(timestamp, (i % 97) as f64 * 0.01 + run as f64));
            timestamp += 250_000;
        }
        timestamp += 600_000_000;
    }

    samples
}

fn create_index() -> TagIndex {
    let mut index = TagIndex::new(3);
    let mut start = 0i64;

    for view in ["HMD", "single-view"] {
        for env in ["flat", "slope", "stairs", "ramp"] {
            for trial in 1..=25 {
                let tag = Tag::new([view.to_string(), env.to_string(), trial.to_string()]);
                let bounds = TimeBounds::new(start, start + 120_000_000).unwrap();
                index.insert(tag, RunData::Bounds(bounds)).unwrap();
                start += 180_000_000;
            }
        }
    }

    index
}

fn bench_segmentation(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmentation");
    let segmenter = GapSegmenter::default();

    for size in [1_000, 10_000, 100_000] {
        let samples = create_recording(8, size / 8);

        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("gap_stats_{}", size), |b| {
            b.iter(|| segmenter.gap_stats(black_box(&samples)).unwrap())
        });

        group.bench_function(format!("segment_{}", size), |b| {
            b.iter(|| segmenter.segment(black_box(&samples)).unwrap())
        });
    }

    group.finish();
}

fn bench_tag_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("tag_index");
    let index = create_index();

    let exact: Pattern = "HMD,flat,7".parse().unwrap();
    let prefix: Pattern = "*,s*,*".parse().unwrap();
    let suffix: Pattern = "*-view,*,*".parse().unwrap();

    group.bench_function("filter_exact", |b| {
        b.iter(|| index.filter(black_box(&exact)).unwrap())
    });

    group.bench_function("filter_prefix", |b| {
        b.iter(|| index.filter(black_box(&prefix)).unwrap())
    });

    group.bench_function("filter_suffix_then_bounds", |b| {
        b.iter(|| index.filter(black_box(&suffix)).unwrap().bounds().unwrap())
    });

    group.bench_function("parse_pattern", |b| {
        b.iter(|| black_box("HMD,f*,*").parse::<Pattern>().unwrap())
    });

    group.finish();
}

fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("view");
    let view = SegmentView::process(
        create_recording(8, 5_000),
        create_index(),
        &GapSegmenter::default(),
        &SummaryAnalyzer,
    )
    .unwrap();
    let slope: Pattern = "*,slope,*".parse().unwrap();

    group.bench_function("narrow", |b| {
        b.iter(|| view.narrow(black_box(&slope)).unwrap())
    });

    let window = view.chunks()[3].bounds();
    group.bench_function("samples_within", |b| {
        b.iter(|| view.samples_within(black_box(&window)).len())
    });

    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_tag_index, bench_view);
criterion_main!(benches);
