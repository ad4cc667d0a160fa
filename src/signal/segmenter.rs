//! Gap-based segmentation of a raw EDA stream
//!
//! A long recording usually contains several acquisition runs separated by
//! pauses. A gap between consecutive samples is "large" when it exceeds
//! `mean + k * std_dev` of all gaps in the stream (population standard
//! deviation, strict comparison). The stream is split at every large gap.
//!
//! ```text
//! samples:  0   1k  2k ........ 50k  51k
//! gaps:       1k  1k    48k        1k
//!                       ^ large
//! chunks:   [0, 1k, 2k]  [50k, 51k]
//! ```

use crate::config::SegmentationConfig;
use crate::error::{EdaError, EdaResult};
use crate::signal::types::{span_micros, Chunk, Sample};
use serde::Serialize;

/// Default number of standard deviations above the mean gap
pub const DEFAULT_GAP_SIGMA: f64 = 3.0;

/// Statistics of the inter-sample gaps of one stream
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GapStats {
    /// Number of gaps (samples - 1)
    pub count: usize,
    /// Mean gap in microseconds
    pub mean: f64,
    /// Population standard deviation in microseconds
    pub std_dev: f64,
    /// Gaps strictly above this value are large
    pub threshold: f64,
}

impl GapStats {
    /// Gap in microseconds strictly above the threshold
    pub fn is_large(&self, gap: f64) -> bool {
        gap > self.threshold
    }
}

/// Splits an ordered sample stream into gap-free chunks
#[derive(Debug, Clone, Copy)]
pub struct GapSegmenter {
    sigma: f64,
}

impl Default for GapSegmenter {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_GAP_SIGMA,
        }
    }
}

impl GapSegmenter {
    /// Create a segmenter flagging gaps above `mean + sigma * std_dev`
    ///
    /// # Errors
    /// - `InvalidThreshold` if `sigma` is negative, NaN or infinite
    pub fn new(sigma: f64) -> EdaResult<Self> {
        if !(sigma.is_finite() && sigma >= 0.0) {
            return Err(EdaError::InvalidThreshold(sigma));
        }
        Ok(Self { sigma })
    }

    pub fn from_config(config: &SegmentationConfig) -> EdaResult<Self> {
        Self::new(config.gap_sigma)
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Compute gap statistics for a stream of at least two samples
    pub fn gap_stats(&self, samples: &[Sample]) -> EdaResult<GapStats> {
        if samples.len() < 2 {
            return Err(EdaError::InsufficientData(samples.len()));
        }

        let count = samples.len() - 1;
        let n = count as f64;
        let mean = gaps(samples).sum::<f64>() / n;
        let variance = gaps(samples)
            .map(|g| {
                let diff = g - mean;
                diff * diff
            })
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        Ok(GapStats {
            count,
            mean,
            std_dev,
            threshold: mean + self.sigma * std_dev,
        })
    }

    /// Indices `i` such that the gap between `samples[i]` and `samples[i + 1]` is large
    pub fn split_points(&self, samples: &[Sample]) -> EdaResult<Vec<usize>> {
        let stats = self.gap_stats(samples)?;
        Ok(gaps(samples)
            .enumerate()
            .filter(|(_, gap)| stats.is_large(*gap))
            .map(|(i, _)| i)
            .collect())
    }

    /// Split the stream into chunks at every large gap
    ///
    /// The concatenation of the returned chunks equals `samples`.
    ///
    /// # Errors
    /// - `InsufficientData` if fewer than two samples are given
    /// - `DegenerateChunk` if a resulting chunk has a single sample or zero span
    pub fn segment(&self, samples: &[Sample]) -> EdaResult<Vec<Chunk>> {
        let stats = self.gap_stats(samples)?;

        tracing::debug!(
            gaps = stats.count,
            mean = stats.mean,
            std_dev = stats.std_dev,
            threshold = stats.threshold,
            "Computed gap statistics"
        );

        let mut chunks = Vec::new();
        let mut start = 0;

        for (i, gap) in gaps(samples).enumerate() {
            if stats.is_large(gap) {
                tracing::debug!(at = samples[i].timestamp, gap, "Large gap detected");
                chunks.push(Chunk::from_samples(samples[start..=i].to_vec())?);
                start = i + 1;
            }
        }
        chunks.push(Chunk::from_samples(samples[start..].to_vec())?);

        tracing::debug!(chunks = chunks.len(), samples = samples.len(), "Segmented stream");
        Ok(chunks)
    }
}

/// Consecutive gaps in microseconds
fn gaps(samples: &[Sample]) -> impl Iterator<Item = f64> + '_ {
    samples
        .windows(2)
        .map(|w| span_micros(w[0].timestamp, w[1].timestamp))
}
