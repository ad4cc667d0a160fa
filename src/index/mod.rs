//! Tag index structures
//!
//! - **Tag / Pattern**: typed run keys and wildcard selectors
//! - **TagIndex**: run metadata keyed by tag, filterable by pattern
//!
//! # Architecture
//!
//! ```text
//! Query: "every slope run"  →  Pattern("*", "s*", "*")
//!        ↓
//! TagIndex::filter → new TagIndex sharing the matched entries
//!        ↓
//! TagIndex::bounds → union of the matched runs' bounds
//! ```

mod pattern;
mod tag_index;

pub use pattern::{matches, Pattern, PatternComponent, Tag, COMPONENT_SEPARATOR, WILDCARD};
pub use tag_index::{RunData, TagEntry, TagIndex};
