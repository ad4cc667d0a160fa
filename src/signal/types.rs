//! Core data types for EDA signal segmentation
//!
//! - `Sample`: a single timestamped EDA reading
//! - `TimeBounds`: an inclusive timestamp interval
//! - `Chunk`: a gap-free run of samples with its estimated sampling rate

use crate::error::{EdaError, EdaResult};
use serde::{Deserialize, Serialize};

/// Microseconds per second, used for rate and offset conversions
pub const MICROS_PER_SEC: f64 = 1_000_000.0;

/// A single EDA reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Sample {
    /// Unix timestamp in microseconds
    pub timestamp: i64,
    /// Skin conductance value
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

impl From<(i64, f64)> for Sample {
    fn from((timestamp, value): (i64, f64)) -> Self {
        Self { timestamp, value }
    }
}

/// Inclusive timestamp interval `[start, end]`, in microseconds
///
/// Always satisfies `start <= end`, including when deserialized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "RawTimeBounds")]
pub struct TimeBounds {
    start: i64,
    end: i64,
}

/// Unvalidated wire form of `TimeBounds`
#[derive(Deserialize)]
struct RawTimeBounds {
    start: i64,
    end: i64,
}

impl TryFrom<RawTimeBounds> for TimeBounds {
    type Error = EdaError;

    fn try_from(raw: RawTimeBounds) -> EdaResult<Self> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeBounds {
    /// Create bounds, rejecting `start > end`
    pub fn new(start: i64, end: i64) -> EdaResult<Self> {
        Self::try_new(start, end).ok_or(EdaError::InvalidBounds { start, end })
    }

    /// Create bounds, returning None if invalid
    pub fn try_new(start: i64, end: i64) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Bounds from timestamps already known to be ordered
    pub(crate) fn from_ordered(start: i64, end: i64) -> Self {
        debug_assert!(start <= end, "unordered bounds [{}, {}]", start, end);
        Self { start, end }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Check if a timestamp falls within these bounds (inclusive on both ends)
    pub fn contains(&self, timestamp: i64) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Get the span in microseconds, saturating at `i64::MAX`
    pub fn duration_micros(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }

    /// Get the span in seconds
    pub fn duration_secs(&self) -> f64 {
        span_micros(self.start, self.end) / MICROS_PER_SEC
    }

    /// Smallest bounds covering both
    pub fn union(&self, other: &TimeBounds) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl std::fmt::Display for TimeBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A contiguous, gap-free run of samples
///
/// Created once by segmentation and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    samples: Vec<Sample>,
    sampling_rate_hz: f64,
}

impl Chunk {
    /// Build a chunk from a run of samples, deriving its sampling rate
    /// from the mean spacing between consecutive samples.
    pub fn from_samples(samples: Vec<Sample>) -> EdaResult<Self> {
        let (first, last) = match (samples.first(), samples.last()) {
            (Some(first), Some(last)) if samples.len() >= 2 => (*first, *last),
            (Some(first), _) => {
                return Err(EdaError::DegenerateChunk {
                    start: first.timestamp,
                    reason: "single-sample chunk has no sampling rate".to_string(),
                })
            }
            _ => return Err(EdaError::EmptySequence),
        };

        // Sum of consecutive gaps telescopes to last - first
        let mean_gap = span_micros(first.timestamp, last.timestamp) / (samples.len() - 1) as f64;
        if mean_gap <= 0.0 {
            return Err(EdaError::DegenerateChunk {
                start: first.timestamp,
                reason: "all samples share one timestamp".to_string(),
            });
        }

        Ok(Self {
            samples,
            sampling_rate_hz: MICROS_PER_SEC / mean_gap,
        })
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Signal values only, in sample order
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }

    pub fn sampling_rate_hz(&self) -> f64 {
        self.sampling_rate_hz
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: chunks hold at least two samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// First and last timestamp of this chunk
    pub fn bounds(&self) -> TimeBounds {
        // from_samples guarantees at least two ordered samples
        TimeBounds::from_ordered(
            self.samples[0].timestamp,
            self.samples[self.samples.len() - 1].timestamp,
        )
    }

    /// Consume the chunk, returning its samples
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}

/// `to - from` in microseconds, exact for any pair of `i64` timestamps
pub(crate) fn span_micros(from: i64, to: i64) -> f64 {
    (i128::from(to) - i128::from(from)) as f64
}
