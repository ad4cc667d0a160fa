//! Tag Index - per-run metadata keyed by hierarchical tags
//!
//! Maps `Tag` → `RunData` (stored bounds or the run's raw samples) and
//! answers wildcard pattern queries.
//!
//! # Example
//! ```ignore
//! // Query: every slope run, any view, any trial
//! let slope = index.filter(&"*,s*,*".parse()?)?;
//! let window = slope.bounds()?;
//! ```
//!
//! # Design Notes
//! - Arity is fixed when the index is created
//! - Entries are reference counted; `filter` shares them with the parent
//! - Iteration follows insertion order, so results are deterministic
//! - No entry is mutated after insertion

use crate::error::{EdaError, EdaResult};
use crate::index::pattern::{Pattern, Tag};
use crate::signal::{bounds_of, bounds_of_many, Sample, TimeBounds};
use std::collections::HashMap;
use std::sync::Arc;

/// What the index knows about one run
#[derive(Debug, Clone, PartialEq)]
pub enum RunData {
    /// Start and end of the run
    Bounds(TimeBounds),
    /// The run's own sample sequence
    Samples(Vec<Sample>),
}

impl RunData {
    /// Time bounds of this run
    pub fn bounds(&self) -> EdaResult<TimeBounds> {
        match self {
            RunData::Bounds(bounds) => Ok(*bounds),
            RunData::Samples(samples) => bounds_of(samples),
        }
    }
}

impl From<TimeBounds> for RunData {
    fn from(bounds: TimeBounds) -> Self {
        RunData::Bounds(bounds)
    }
}

impl From<Vec<Sample>> for RunData {
    fn from(samples: Vec<Sample>) -> Self {
        RunData::Samples(samples)
    }
}

/// One indexed run
#[derive(Debug, PartialEq)]
pub struct TagEntry {
    pub tag: Tag,
    pub data: RunData,
}

/// Pattern-queryable index from tags to run data
#[derive(Debug, Clone)]
pub struct TagIndex {
    /// Number of components every tag must have
    arity: usize,
    /// Entries in insertion order
    entries: Vec<Arc<TagEntry>>,
    /// Tag → position in `entries`
    lookup: HashMap<Tag, usize>,
}

impl TagIndex {
    /// Create an empty index for tags of the given arity
    pub fn new(arity: usize) -> Self {
        Self {
            arity,
            entries: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Build an index from (tag, data) pairs, in order
    pub fn from_entries<I, D>(arity: usize, entries: I) -> EdaResult<Self>
    where
        I: IntoIterator<Item = (Tag, D)>,
        D: Into<RunData>,
    {
        let mut index = Self::new(arity);
        for (tag, data) in entries {
            index.insert(tag, data)?;
        }
        Ok(index)
    }

    /// Add a run
    ///
    /// # Errors
    /// - `ArityMismatch` if the tag has the wrong number of components
    /// - `DuplicateTag` if the tag is already present
    pub fn insert(&mut self, tag: Tag, data: impl Into<RunData>) -> EdaResult<()> {
        if tag.arity() != self.arity {
            return Err(EdaError::ArityMismatch {
                expected: self.arity,
                actual: tag.arity(),
            });
        }
        if self.lookup.contains_key(&tag) {
            return Err(EdaError::DuplicateTag(tag.to_string()));
        }

        self.lookup.insert(tag.clone(), self.entries.len());
        self.entries.push(Arc::new(TagEntry {
            tag,
            data: data.into(),
        }));
        Ok(())
    }

    /// New index holding only the entries whose tag matches `pattern`
    ///
    /// Matched entries are shared with this index, not copied.
    pub fn filter(&self, pattern: &Pattern) -> EdaResult<TagIndex> {
        if pattern.arity() != self.arity {
            return Err(EdaError::ArityMismatch {
                expected: self.arity,
                actual: pattern.arity(),
            });
        }

        let mut filtered = TagIndex::new(self.arity);
        for entry in &self.entries {
            if pattern.matches(&entry.tag)? {
                filtered
                    .lookup
                    .insert(entry.tag.clone(), filtered.entries.len());
                filtered.entries.push(Arc::clone(entry));
            }
        }

        tracing::debug!(
            pattern = %pattern,
            matched = filtered.len(),
            total = self.len(),
            "Filtered tag index"
        );
        Ok(filtered)
    }

    /// Look up a run by exact tag
    pub fn get(&self, tag: &Tag) -> Option<&RunData> {
        self.lookup.get(tag).map(|&i| &self.entries[i].data)
    }

    /// Check if a tag is present
    pub fn contains(&self, tag: &Tag) -> bool {
        self.lookup.contains_key(tag)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &RunData)> {
        self.entries.iter().map(|e| (&e.tag, &e.data))
    }

    /// All tags, in insertion order
    pub fn tags(&self) -> Vec<&Tag> {
        self.entries.iter().map(|e| &e.tag).collect()
    }

    /// Distinct labels seen at one tag position, in first-seen order
    pub fn values(&self, position: usize) -> Vec<String> {
        let mut seen = Vec::new();
        for entry in &self.entries {
            if let Some(label) = entry.tag.get(position) {
                if !seen.iter().any(|s: &String| s == label) {
                    seen.push(label.to_string());
                }
            }
        }
        seen
    }

    /// Bounds of every run, in insertion order
    pub fn entry_bounds(&self) -> EdaResult<Vec<(&Tag, TimeBounds)>> {
        self.entries
            .iter()
            .map(|e| e.data.bounds().map(|b| (&e.tag, b)))
            .collect()
    }

    /// Union of the bounds of every run
    ///
    /// # Errors
    /// - `EmptyCollection` if the index is empty
    /// - `EmptySequence` if a run holds an empty sample sequence
    pub fn bounds(&self) -> EdaResult<TimeBounds> {
        let bounds = self
            .entries
            .iter()
            .map(|e| e.data.bounds())
            .collect::<EdaResult<Vec<_>>>()?;
        bounds_of_many(bounds)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for TagIndex {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| Arc::ptr_eq(a, b) || a == b)
    }
}
