//! Run discovery
//!
//! Walks a post-processing directory for per-run sample files and builds a
//! tag index from their location:
//!
//! ```text
//! <root>/2023-09-22/Hao/HMD/flat/1/eda.csv  →  (HMD, flat, 1)
//! ```
//!
//! The walk is sorted by file name so the resulting index order is stable.

use super::csv_import::RawCsvReader;
use super::IngestError;
use crate::config::DiscoveryConfig;
use crate::index::{RunData, Tag, TagIndex};
use crate::signal::bounds_of;
use std::path::Path;
use walkdir::WalkDir;

/// Discovers run files below a directory and indexes them by tag
#[derive(Debug, Clone)]
pub struct RunDiscovery {
    run_file_name: String,
    tag_depth: usize,
    reader: RawCsvReader,
    keep_samples: bool,
}

impl RunDiscovery {
    pub fn new(config: &DiscoveryConfig) -> Self {
        Self {
            run_file_name: config.run_file_name.clone(),
            tag_depth: config.tag_depth,
            reader: RawCsvReader::new().with_header(config.has_header),
            keep_samples: false,
        }
    }

    /// Store each run's full sample sequence instead of only its bounds
    pub fn keep_samples(mut self, keep: bool) -> Self {
        self.keep_samples = keep;
        self
    }

    /// Walk `root` and index every run file found
    ///
    /// # Errors
    /// - `ParseError` if a run file sits fewer than `tag_depth` directories deep
    /// - `Eda(EmptySequence)` if a run file holds no samples
    /// - `Eda(DuplicateTag)` if two run files map to the same tag
    pub fn discover(&self, root: &Path) -> Result<TagIndex, IngestError> {
        let mut index = TagIndex::new(self.tag_depth);

        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() || entry.file_name() != self.run_file_name.as_str() {
                continue;
            }

            let path = entry.path();
            let tag = self.tag_for(path)?;
            let samples = self.reader.read(path)?.samples;
            let bounds = bounds_of(&samples)?;

            tracing::debug!(path = %path.display(), tag = %tag, bounds = %bounds, "Discovered run");

            let data = if self.keep_samples {
                RunData::Samples(samples)
            } else {
                RunData::Bounds(bounds)
            };
            index.insert(tag, data)?;
        }

        tracing::info!(root = %root.display(), runs = index.len(), "Run discovery complete");
        Ok(index)
    }

    /// Tag formed by the `tag_depth` directories directly above `path`
    fn tag_for(&self, path: &Path) -> Result<Tag, IngestError> {
        let parents: Vec<String> = path
            .parent()
            .map(|dir| {
                dir.components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect()
            })
            .unwrap_or_default();

        if parents.len() < self.tag_depth {
            return Err(IngestError::ParseError(format!(
                "{} is fewer than {} directories deep",
                path.display(),
                self.tag_depth
            )));
        }

        Ok(Tag::new(parents[parents.len() - self.tag_depth..].iter().cloned()))
    }
}

/// Discover runs below `root` using the given configuration
pub fn discover_runs(root: &Path, config: &DiscoveryConfig) -> Result<TagIndex, IngestError> {
    RunDiscovery::new(config).discover(root)
}
