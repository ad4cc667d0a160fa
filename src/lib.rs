//! # Split EDA
//!
//! Segmentation and retrieval engine for long electrodermal activity (EDA)
//! recordings aligned to tagged experiment runs.
//!
//! ## Features
//!
//! - **Gap segmentation**: splits a recording into acquisition runs at
//!   statistically abnormal pauses and estimates each run's sampling rate
//! - **Tag index**: per-run metadata keyed by `(view, environment, trial)`
//!   style tags, filterable with wildcard patterns such as `("HMD", "f*", "*")`
//! - **Bounds**: time windows covering any filtered subset of runs
//! - **Views**: immutable, cheaply narrowed handles over one recording
//!
//! ## Modules
//!
//! - [`signal`]: Samples, chunks, gap segmentation and bounds
//! - [`index`]: Tags, patterns and the tag index
//! - [`view`]: Segment views and the per-chunk analysis capability
//! - [`intervals`]: Labeled intervals and shaded regions for rendering
//! - [`ingest`]: CSV recordings and run discovery
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use split_eda::*;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let raw = RawCsvReader::new().read(Path::new("EDA/2023-09-22/eda.csv"))?.samples;
//!     let runs = discover_runs(Path::new("Data-Post-Processing/2023-09-22/Hao"), &config.discovery)?;
//!
//!     let view = SegmentView::process(
//!         raw,
//!         runs,
//!         &GapSegmenter::from_config(&config.segmentation)?,
//!         &SummaryAnalyzer,
//!     )?;
//!
//!     // Every slope run, any view, any trial
//!     let slope = view.narrow(&"*,s*,*".parse()?)?;
//!     println!("slope runs span {}", slope.tag_bounds()?);
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod ingest;
pub mod intervals;
pub mod signal;
pub mod view;

// Re-export top-level types for convenience
pub use error::{EdaError, EdaResult};

pub use signal::{
    bounds_of, bounds_of_many, Chunk, GapSegmenter, GapStats, Sample, TimeBounds,
    DEFAULT_GAP_SIGMA,
};

pub use index::{matches, Pattern, PatternComponent, RunData, Tag, TagIndex};

pub use view::{ChunkAnalyzer, ChunkSummary, SegmentView, SummaryAnalyzer};

pub use intervals::{label_groups, offset_secs, shaded_regions, LabeledInterval};

pub use ingest::{discover_runs, IngestError, RawCsvReader, RunDiscovery};

pub use config::{Config, ConfigError, DiscoveryConfig, LoggingConfig, SegmentationConfig};
