//! Tags and wildcard patterns
//!
//! A `Tag` names one experiment run by its position in the recording
//! hierarchy, e.g. `("HMD", "flat", "2")`. A `Pattern` selects tags
//! position by position; each component is either a literal or holds one
//! `*` standing for zero or more characters.
//!
//! # Example
//! ```ignore
//! let pattern: Pattern = "HMD,f*,*".parse()?;
//! assert!(pattern.matches(&Tag::from(["HMD", "flat", "2"]))?);
//! assert!(!pattern.matches(&Tag::from(["HMD", "slope", "2"]))?);
//! ```

use crate::error::{EdaError, EdaResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Wildcard marker inside a pattern component
pub const WILDCARD: char = '*';

/// Separator between components in the textual pattern form
pub const COMPONENT_SEPARATOR: char = ',';

/// Fixed-arity tuple of category labels identifying one run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Vec<String>);

impl Tag {
    pub fn new<I, S>(components: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(components.into_iter().map(Into::into).collect())
    }

    /// Number of components
    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }

    /// Component at `position`, if any
    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }
}

impl<const N: usize> From<[&str; N]> for Tag {
    fn from(components: [&str; N]) -> Self {
        Self::new(components)
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

/// One position of a pattern, parsed once
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternComponent {
    /// Must equal the tag component exactly
    Exact(String),
    /// Tag component must start with `prefix` and end with `suffix`
    Wildcard { prefix: String, suffix: String },
}

impl PatternComponent {
    /// Parse a single component, rejecting more than one wildcard
    pub fn parse(raw: &str) -> EdaResult<Self> {
        match raw.split_once(WILDCARD) {
            None => Ok(Self::Exact(raw.to_string())),
            Some((_, rest)) if rest.contains(WILDCARD) => Err(EdaError::InvalidPattern {
                component: raw.to_string(),
            }),
            Some((prefix, suffix)) => Ok(Self::Wildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
        }
    }

    pub fn matches(&self, component: &str) -> bool {
        match self {
            Self::Exact(literal) => component == literal,
            Self::Wildcard { prefix, suffix } => {
                // prefix and suffix must not overlap on short components
                component.len() >= prefix.len() + suffix.len()
                    && component.starts_with(prefix.as_str())
                    && component.ends_with(suffix.as_str())
            }
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard { .. })
    }
}

impl std::fmt::Display for PatternComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(literal) => write!(f, "{}", literal),
            Self::Wildcard { prefix, suffix } => write!(f, "{}{}{}", prefix, WILDCARD, suffix),
        }
    }
}

/// Tuple of pattern components, one per tag position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern(Vec<PatternComponent>);

impl Pattern {
    /// Parse each component; fails on the first component with two wildcards
    pub fn new<I, S>(components: I) -> EdaResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        components
            .into_iter()
            .map(|c| PatternComponent::parse(c.as_ref()))
            .collect::<EdaResult<Vec<_>>>()
            .map(Self)
    }

    /// Pattern accepting every tag of the given arity
    pub fn any(arity: usize) -> Self {
        Self(
            (0..arity)
                .map(|_| PatternComponent::Wildcard {
                    prefix: String::new(),
                    suffix: String::new(),
                })
                .collect(),
        )
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn components(&self) -> &[PatternComponent] {
        &self.0
    }

    /// Full-tuple match; every position must match
    pub fn matches(&self, tag: &Tag) -> EdaResult<bool> {
        if tag.arity() != self.arity() {
            return Err(EdaError::ArityMismatch {
                expected: tag.arity(),
                actual: self.arity(),
            });
        }

        Ok(self
            .0
            .iter()
            .zip(tag.components())
            .all(|(pattern, component)| pattern.matches(component)))
    }
}

impl FromStr for Pattern {
    type Err = EdaError;

    /// Parse the comma-separated form, e.g. `"*,s*,*"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.split(COMPONENT_SEPARATOR).map(str::trim))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "({})", parts.join(", "))
    }
}

/// Check a tag against a pattern
pub fn matches(tag: &Tag, pattern: &Pattern) -> EdaResult<bool> {
    pattern.matches(tag)
}
