//! Logarithmic search for the maximum of a mountain-shaped range.
//!
//! A mountain (bitonic) sequence strictly increases up to a single peak and
//! strictly decreases after it. Probing the midpoint and its predecessor tells
//! which side of the peak the midpoint sits on, so the window halves on every
//! step instead of scanning every element.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PeakError {
    #[error("cannot search an empty sequence")]
    EmptySequence,

    #[error("range [{left}, {right}] is inverted")]
    InvertedRange { left: usize, right: usize },

    #[error("index {index} is out of bounds for a sequence of length {len}")]
    OutOfBounds { index: usize, len: usize },
}

/// The highest element found in a range and where it sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak<T> {
    pub index: usize,
    pub value: T,
}

impl<T: Ord + Copy> Peak<T> {
    fn at(sequence: &[T], index: usize) -> Self {
        Self {
            index,
            value: sequence[index],
        }
    }

    fn offer(&mut self, sequence: &[T], index: usize) {
        if sequence[index] > self.value {
            *self = Self::at(sequence, index);
        }
    }
}

/// Returns the maximum value in `sequence[left..=right]`.
///
/// The range must be mountain-shaped (a monotone run counts as a mountain
/// whose peak sits on a boundary). On other input the result is some element
/// of the range, but not necessarily the largest.
///
/// # Errors
///
/// Fails fast with a [`PeakError`] when the sequence is empty, the range is
/// inverted or `right` is past the end.
///
/// # Examples
///
/// ```
/// let heights = [8, 10, 20, 80, 100, 200, 400, 500, 3000, 2, 1];
/// assert_eq!(peakfinder::find_max(&heights, 0, heights.len() - 1), Ok(3000));
/// ```
pub fn find_max<T: Ord + Copy>(sequence: &[T], left: usize, right: usize) -> Result<T, PeakError> {
    find_peak(sequence, left, right).map(|peak| peak.value)
}

/// Same as [`find_max`] over the whole sequence.
pub fn find_max_in<T: Ord + Copy>(sequence: &[T]) -> Result<T, PeakError> {
    if sequence.is_empty() {
        return Err(PeakError::EmptySequence);
    }
    find_max(sequence, 0, sequence.len() - 1)
}

/// Like [`find_max`] but also reports the index of the maximum.
pub fn find_peak<T: Ord + Copy>(
    sequence: &[T],
    left: usize,
    right: usize,
) -> Result<Peak<T>, PeakError> {
    check_range(sequence.len(), left, right)?;

    if left == right {
        return Ok(Peak::at(sequence, left));
    }

    let (mut lo, mut hi) = (left, right);
    let mut best = Peak::at(sequence, lo);
    loop {
        // The predecessor probe below needs at least three elements.
        if hi - lo == 1 {
            best.offer(sequence, lo);
            best.offer(sequence, hi);
            return Ok(best);
        }

        let mid = lo + (hi - lo) / 2;
        best.offer(sequence, mid);

        if sequence[mid - 1] > sequence[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
}

fn check_range(len: usize, left: usize, right: usize) -> Result<(), PeakError> {
    if len == 0 {
        return Err(PeakError::EmptySequence);
    }
    if left > right {
        return Err(PeakError::InvertedRange { left, right });
    }
    if right >= len {
        return Err(PeakError::OutOfBounds { index: right, len });
    }
    Ok(())
}
