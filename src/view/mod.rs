//! Segment views
//!
//! A `SegmentView` bundles one raw EDA recording, its gap-free chunks, the
//! per-chunk analysis results and the tag index of the experiment runs
//! recorded during it.
//!
//! # Architecture
//!
//! ```text
//! SegmentView::process(raw, tags)
//!        ↓
//! narrow("*,s*,*")  → view over slope runs    (same raw, same chunks)
//!        ↓
//! narrow("HMD,*,*") → view over HMD slope runs (same raw, same chunks)
//!        ↓
//! tag_bounds()      → interval to annotate
//! ```
//!
//! Narrowing only filters the tag index. The raw sequence, chunks and
//! analysis results are shared through `Arc` by every view derived from the
//! same recording and are never re-segmented; use `samples_within` to cut
//! the raw signal to a narrowed window.

mod analysis;

pub use analysis::{ChunkAnalyzer, ChunkSummary, SummaryAnalyzer};

use crate::error::{EdaError, EdaResult};
use crate::index::{Pattern, TagIndex};
use crate::signal::{bounds_of, Chunk, GapSegmenter, Sample, TimeBounds};
use std::sync::Arc;

/// Immutable, narrowable view over a segmented recording
#[derive(Debug)]
pub struct SegmentView<R> {
    raw: Arc<[Sample]>,
    chunks: Arc<[Chunk]>,
    analyses: Arc<[R]>,
    tags: TagIndex,
}

impl<R> Clone for SegmentView<R> {
    fn clone(&self) -> Self {
        Self {
            raw: Arc::clone(&self.raw),
            chunks: Arc::clone(&self.chunks),
            analyses: Arc::clone(&self.analyses),
            tags: self.tags.clone(),
        }
    }
}

impl<R> SegmentView<R> {
    /// Segment `raw`, analyze every chunk and attach the tag index
    pub fn process<A>(
        raw: Vec<Sample>,
        tags: TagIndex,
        segmenter: &GapSegmenter,
        analyzer: &A,
    ) -> EdaResult<Self>
    where
        A: ChunkAnalyzer<Output = R>,
    {
        let chunks = segmenter.segment(&raw)?;
        let analyses = chunks
            .iter()
            .map(|chunk| analyzer.analyze(&chunk.values(), chunk.sampling_rate_hz()))
            .collect::<EdaResult<Vec<_>>>()?;

        tracing::info!(
            samples = raw.len(),
            chunks = chunks.len(),
            runs = tags.len(),
            "Processed recording"
        );

        Self::from_parts(raw, chunks, analyses, tags)
    }

    /// Assemble a view from already computed parts
    ///
    /// # Errors
    /// - `Analysis` if there is not exactly one analysis result per chunk
    pub fn from_parts(
        raw: Vec<Sample>,
        chunks: Vec<Chunk>,
        analyses: Vec<R>,
        tags: TagIndex,
    ) -> EdaResult<Self> {
        if analyses.len() != chunks.len() {
            return Err(EdaError::Analysis(format!(
                "expected {} analysis results, got {}",
                chunks.len(),
                analyses.len()
            )));
        }

        Ok(Self {
            raw: raw.into(),
            chunks: chunks.into(),
            analyses: analyses.into(),
            tags,
        })
    }

    /// New view exposing only the runs whose tag matches `pattern`
    ///
    /// The receiver is left unchanged; signal data is shared, not copied.
    pub fn narrow(&self, pattern: &Pattern) -> EdaResult<Self> {
        Ok(Self {
            raw: Arc::clone(&self.raw),
            chunks: Arc::clone(&self.chunks),
            analyses: Arc::clone(&self.analyses),
            tags: self.tags.filter(pattern)?,
        })
    }

    /// Bounds of the full raw recording, unaffected by narrowing
    pub fn raw_bounds(&self) -> EdaResult<TimeBounds> {
        bounds_of(&self.raw)
    }

    /// Union of the bounds of the runs visible in this view
    pub fn tag_bounds(&self) -> EdaResult<TimeBounds> {
        self.tags.bounds()
    }

    /// Raw samples whose timestamps fall inside `bounds` (inclusive)
    pub fn samples_within(&self, bounds: &TimeBounds) -> &[Sample] {
        // raw is chronological, so the window is one contiguous slice
        let start = self.raw.partition_point(|s| s.timestamp < bounds.start());
        let end = self.raw.partition_point(|s| s.timestamp <= bounds.end());
        &self.raw[start..end.max(start)]
    }

    /// Chunks overlapping `bounds`, with their analysis results
    pub fn chunks_within(&self, bounds: &TimeBounds) -> Vec<(&Chunk, &R)> {
        self.chunk_results()
            .filter(|(chunk, _)| {
                let b = chunk.bounds();
                b.start() <= bounds.end() && b.end() >= bounds.start()
            })
            .collect()
    }

    /// Chunks paired with their analysis results, in chunk order
    pub fn chunk_results(&self) -> impl Iterator<Item = (&Chunk, &R)> {
        self.chunks.iter().zip(self.analyses.iter())
    }

    pub fn raw(&self) -> &[Sample] {
        &self.raw
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn analyses(&self) -> &[R] {
        &self.analyses
    }

    pub fn tags(&self) -> &TagIndex {
        &self.tags
    }

    /// Check if two views are backed by the same recording buffer
    pub fn shares_signal_with(&self, other: &SegmentView<R>) -> bool {
        Arc::ptr_eq(&self.raw, &other.raw) && Arc::ptr_eq(&self.chunks, &other.chunks)
    }
}
