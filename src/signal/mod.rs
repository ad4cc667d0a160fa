//! EDA signal model and segmentation
//!
//! - **types**: Core data structures (Sample, TimeBounds, Chunk)
//! - **segmenter**: Gap-outlier segmentation into acquisition runs
//! - **bounds**: Min/max timestamp bounds over runs
//!
//! # Architecture
//!
//! ```text
//! raw samples → GapSegmenter → [Chunk, Chunk, ...] → per-chunk analysis
//!                                  ↓
//!                         bounds_of / bounds_of_many
//! ```

pub mod bounds;
pub mod segmenter;
pub mod types;

pub use bounds::{bounds_of, bounds_of_many, bounds_of_sequences};
pub use segmenter::{GapSegmenter, GapStats, DEFAULT_GAP_SIGMA};
pub use types::{Chunk, Sample, TimeBounds, MICROS_PER_SEC};
