use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use split_eda::{EdaError, GapSegmenter, Pattern, RunData, Sample, Tag, TagIndex, TimeBounds};

const MIN_PROPTEST_CASES: u32 = 256;

fn proptest_cases() -> u32 {
    std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .map(|parsed| parsed.max(MIN_PROPTEST_CASES))
        .unwrap_or(MIN_PROPTEST_CASES)
}

/// Strictly increasing stream built from positive gaps
fn stream_from_gaps(start: i64, gaps: &[i64]) -> Vec<Sample> {
    let mut timestamp = start;
    let mut samples = vec![Sample::new(timestamp, 0.0)];
    for (i, gap) in gaps.iter().enumerate() {
        timestamp += gap;
        samples.push(Sample::new(timestamp, i as f64));
    }
    samples
}

/// Runs of at least two samples at one shared spacing, separated by pauses
fn recording_with_runs() -> impl Strategy<Value = (i64, Vec<usize>, Vec<i64>)> {
    (500i64..2_000, prop::collection::vec(2usize..40, 1..8)).prop_flat_map(|(spacing, runs)| {
        let pauses = prop::collection::vec(spacing * 50..spacing * 500, runs.len() - 1);
        (Just(spacing), Just(runs), pauses)
    })
}

fn component() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["HMD", "single-view", "flat", "slope", "1", "2", "3"])
        .prop_map(str::to_string)
}

fn pattern_component() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["*", "HMD", "s*", "*e", "f*t", "flat", "1", "*-view"])
        .prop_map(str::to_string)
}

fn build_index(tags: &[Vec<String>]) -> TagIndex {
    let mut index = TagIndex::new(3);
    for (i, components) in tags.iter().enumerate() {
        let tag = Tag::new(components.iter().cloned());
        if index.contains(&tag) {
            continue;
        }
        let start = i as i64 * 1_000;
        let bounds = TimeBounds::new(start, start + 500).expect("ordered bounds");
        index.insert(tag, RunData::Bounds(bounds)).expect("unique tag of arity 3");
    }
    index
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: proptest_cases(),
        max_shrink_iters: 1024,
        .. ProptestConfig::default()
    })]

    #[test]
    fn segmentation_partitions_the_stream(
        start in 0i64..1_000_000_000,
        gaps in prop::collection::vec(
            prop_oneof![9 => 900i64..1_100, 1 => 50_000i64..500_000],
            1..200,
        ),
        sigma in 0.5f64..4.0,
    ) {
        let samples = stream_from_gaps(start, &gaps);
        let segmenter = GapSegmenter::new(sigma).expect("finite non-negative sigma");
        let stats = segmenter.gap_stats(&samples).expect("at least two samples");

        match segmenter.segment(&samples) {
            Ok(chunks) => {
                let rejoined: Vec<Sample> = chunks
                    .iter()
                    .flat_map(|chunk| chunk.samples().iter().copied())
                    .collect();
                prop_assert_eq!(&rejoined, &samples);

                for chunk in &chunks {
                    prop_assert!(chunk.len() >= 2);
                    prop_assert!(chunk.sampling_rate_hz() > 0.0);
                    for pair in chunk.samples().windows(2) {
                        prop_assert!(!stats.is_large((pair[1].timestamp - pair[0].timestamp) as f64));
                    }
                }
                for pair in chunks.windows(2) {
                    let gap = pair[1].bounds().start() - pair[0].bounds().end();
                    prop_assert!(stats.is_large(gap as f64));
                }
            }
            Err(EdaError::DegenerateChunk { .. }) => {}
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    #[test]
    fn runs_of_two_or_more_samples_always_segment(
        (spacing, runs, pauses) in recording_with_runs(),
        sigma in 0.0f64..4.0,
    ) {
        let mut gaps = Vec::new();
        for (i, len) in runs.iter().enumerate() {
            if i > 0 {
                gaps.push(pauses[i - 1]);
            }
            gaps.extend(std::iter::repeat(spacing).take(len - 1));
        }
        let samples = stream_from_gaps(1_695_394_800_000_000, &gaps);
        let segmenter = GapSegmenter::new(sigma).expect("finite non-negative sigma");
        let stats = segmenter.gap_stats(&samples).expect("at least two samples");

        // Splits only happen at pauses, so every chunk keeps two or more samples
        let chunks = segmenter.segment(&samples).expect("no degenerate chunk");
        prop_assert!(chunks.len() <= runs.len());

        let rejoined: Vec<Sample> = chunks
            .iter()
            .flat_map(|chunk| chunk.samples().iter().copied())
            .collect();
        prop_assert_eq!(&rejoined, &samples);

        for chunk in &chunks {
            prop_assert!(chunk.len() >= 2);
            // merged runs only lower the rate below the in-run rate
            prop_assert!(chunk.sampling_rate_hz() <= 1e6 / spacing as f64 + 1e-9);
            for pair in chunk.samples().windows(2) {
                prop_assert!(!stats.is_large((pair[1].timestamp - pair[0].timestamp) as f64));
            }
        }
        for pair in chunks.windows(2) {
            let gap = pair[1].bounds().start() - pair[0].bounds().end();
            prop_assert!(stats.is_large(gap as f64));
        }
    }

    #[test]
    fn segmentation_is_deterministic(
        gaps in prop::collection::vec(1i64..10_000, 1..100),
    ) {
        let samples = stream_from_gaps(0, &gaps);
        let segmenter = GapSegmenter::default();
        prop_assert_eq!(segmenter.segment(&samples), segmenter.segment(&samples));
    }

    #[test]
    fn filter_is_idempotent_and_order_preserving(
        tags in prop::collection::vec(prop::collection::vec(component(), 3), 0..24),
        pattern in prop::collection::vec(pattern_component(), 3),
    ) {
        let index = build_index(&tags);
        let pattern = Pattern::new(pattern).expect("single wildcard per component");

        let once = index.filter(&pattern).expect("matching arity");
        let twice = once.filter(&pattern).expect("matching arity");
        prop_assert_eq!(&once, &twice);

        let expected: Vec<&Tag> = index
            .tags()
            .into_iter()
            .filter(|tag| pattern.matches(tag).unwrap_or(false))
            .collect();
        prop_assert_eq!(once.tags(), expected);
    }

    #[test]
    fn filtered_bounds_lie_within_parent_bounds(
        tags in prop::collection::vec(prop::collection::vec(component(), 3), 1..24),
        pattern in prop::collection::vec(pattern_component(), 3),
    ) {
        let index = build_index(&tags);
        let pattern = Pattern::new(pattern).expect("single wildcard per component");
        let parent = index.bounds().expect("non-empty index");

        if let Ok(narrowed) = index.filter(&pattern).expect("matching arity").bounds() {
            prop_assert!(parent.contains(narrowed.start()));
            prop_assert!(parent.contains(narrowed.end()));
        }
    }
}
