//! Per-chunk analysis capability
//!
//! Signal decomposition (SCR/SCL) is supplied by the caller through
//! `ChunkAnalyzer`. The view stores one output per chunk, in chunk order,
//! and never looks inside it.

use crate::error::{EdaError, EdaResult};
use serde::Serialize;

/// Analysis run on each chunk's values at its own sampling rate
pub trait ChunkAnalyzer {
    type Output;

    fn analyze(&self, values: &[f64], sampling_rate_hz: f64) -> EdaResult<Self::Output>;
}

impl<F, R> ChunkAnalyzer for F
where
    F: Fn(&[f64], f64) -> EdaResult<R>,
{
    type Output = R;

    fn analyze(&self, values: &[f64], sampling_rate_hz: f64) -> EdaResult<R> {
        self(values, sampling_rate_hz)
    }
}

/// Descriptive statistics of one chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChunkSummary {
    pub samples: usize,
    pub sampling_rate_hz: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Span covered by the chunk at its sampling rate
    pub duration_secs: f64,
}

/// Built-in analyzer producing a `ChunkSummary`
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryAnalyzer;

impl ChunkAnalyzer for SummaryAnalyzer {
    type Output = ChunkSummary;

    fn analyze(&self, values: &[f64], sampling_rate_hz: f64) -> EdaResult<ChunkSummary> {
        if values.is_empty() {
            return Err(EdaError::Analysis("no values to summarize".to_string()));
        }
        if !(sampling_rate_hz.is_finite() && sampling_rate_hz > 0.0) {
            return Err(EdaError::Analysis(format!(
                "invalid sampling rate: {}",
                sampling_rate_hz
            )));
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.iter().sum::<f64>() / values.len() as f64;

        Ok(ChunkSummary {
            samples: values.len(),
            sampling_rate_hz,
            min,
            max,
            mean,
            duration_secs: (values.len() - 1) as f64 / sampling_rate_hz,
        })
    }
}
