//! Bounds calculation over runs of samples
//!
//! `bounds_of` frames a single chronological run; `bounds_of_many` frames a
//! union of runs. This is a union, not an intersection: a single early or
//! late run widens the result.

use crate::error::{EdaError, EdaResult};
use crate::signal::types::{Sample, TimeBounds};

/// First and last timestamp of a chronological sequence
pub fn bounds_of(samples: &[Sample]) -> EdaResult<TimeBounds> {
    match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => TimeBounds::new(first.timestamp, last.timestamp),
        _ => Err(EdaError::EmptySequence),
    }
}

/// Union of many bounds: earliest start, latest end
pub fn bounds_of_many<I>(bounds: I) -> EdaResult<TimeBounds>
where
    I: IntoIterator<Item = TimeBounds>,
{
    bounds
        .into_iter()
        .reduce(|acc, b| acc.union(&b))
        .ok_or(EdaError::EmptyCollection)
}

/// Union of the bounds of several sample sequences
pub fn bounds_of_sequences<'a, I>(sequences: I) -> EdaResult<TimeBounds>
where
    I: IntoIterator<Item = &'a [Sample]>,
{
    let bounds = sequences
        .into_iter()
        .map(bounds_of)
        .collect::<EdaResult<Vec<_>>>()?;
    bounds_of_many(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_of_sequence() {
        let samples = vec![
            Sample::new(100, 1.0),
            Sample::new(150, 1.1),
            Sample::new(220, 0.9),
        ];
        assert_eq!(bounds_of(&samples).unwrap(), TimeBounds::new(100, 220).unwrap());
    }

    #[test]
    fn test_bounds_of_empty_sequence() {
        assert_eq!(bounds_of(&[]), Err(EdaError::EmptySequence));
    }

    #[test]
    fn test_bounds_of_many_is_union() {
        let a = TimeBounds::new(10, 20).unwrap();
        let b = TimeBounds::new(5, 15).unwrap();
        assert_eq!(bounds_of_many([a, b]).unwrap(), TimeBounds::new(5, 20).unwrap());
    }

    #[test]
    fn test_bounds_of_many_outlier_dominates() {
        let runs = [
            TimeBounds::new(100, 200).unwrap(),
            TimeBounds::new(150, 250).unwrap(),
            TimeBounds::new(9_000, 9_500).unwrap(),
        ];
        assert_eq!(
            bounds_of_many(runs).unwrap(),
            TimeBounds::new(100, 9_500).unwrap()
        );
    }

    #[test]
    fn test_bounds_of_many_empty() {
        assert_eq!(
            bounds_of_many(Vec::<TimeBounds>::new()),
            Err(EdaError::EmptyCollection)
        );
    }

    #[test]
    fn test_bounds_of_sequences() {
        let first = vec![Sample::new(30, 0.0), Sample::new(40, 0.0)];
        let second = vec![Sample::new(10, 0.0), Sample::new(35, 0.0)];
        let bounds = bounds_of_sequences([first.as_slice(), second.as_slice()]).unwrap();
        assert_eq!(bounds, TimeBounds::new(10, 40).unwrap());
    }

    #[test]
    fn test_bounds_of_sequences_rejects_empty_member() {
        let first = vec![Sample::new(30, 0.0)];
        let empty: Vec<Sample> = Vec::new();
        assert_eq!(
            bounds_of_sequences([first.as_slice(), empty.as_slice()]),
            Err(EdaError::EmptySequence)
        );
    }
}
