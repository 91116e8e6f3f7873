//! Absolute sample-index ranges within a record.

use crate::error::{ProfileError, Result};
use serde::Serialize;

/// Inclusive range of sample indices `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SampleRange {
    pub start: usize,
    pub end: usize,
}

impl SampleRange {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start > end {
            return Err(ProfileError::InvalidInput(format!(
                "range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a single sample.
    pub fn point(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.start..=self.end).contains(&index)
    }

    /// Widen by `margin` samples on each side, clamped to `[0, series_len - 1]`.
    pub fn widen(&self, margin: usize, series_len: usize) -> Self {
        let last = series_len.saturating_sub(1);
        Self {
            start: self.start.saturating_sub(margin).min(last),
            end: self.end.saturating_add(margin).min(last),
        }
    }
}
