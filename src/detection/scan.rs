//! Threshold crossings and largest first-difference changes.

use crate::core::SampleRange;
use crate::error::{ProfileError, Result};
use serde::{Deserialize, Serialize};

/// Samples added on each side of a crossing.
pub const CROSSING_MARGIN: usize = 12;

/// An excursion above a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crossing {
    /// Last sample at or below the threshold before the excursion
    /// (0 if the series starts above it).
    pub enter: usize,
    /// Last sample above the threshold
    /// (the final index if the series ends above it).
    pub exit: usize,
    /// `[enter, exit]` widened by [`CROSSING_MARGIN`], clamped to the series.
    pub window: SampleRange,
}

/// Direction of a change between adjacent samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDirection {
    #[default]
    Increase,
    Decrease,
}

/// Find every excursion of `values` above `threshold`.
///
/// An enter event is a sample `<= threshold` followed by one `> threshold`,
/// an exit event the reverse. A series that starts above the threshold gets
/// an enter at index 0 and one that ends above it gets an exit at the last
/// index, so enters and exits always pair up.
///
/// # Arguments
/// * `values` - Raw series to scan
/// * `threshold` - Level an excursion must exceed
///
/// # Returns
/// Crossings in series order, each with its window widened by
/// [`CROSSING_MARGIN`]. Fails on an empty series, a `NaN` threshold, or
/// unpaired events caused by `NaN` values.
pub fn threshold_crossings(values: &[f64], threshold: f64) -> Result<Vec<Crossing>> {
    if values.is_empty() {
        return Err(ProfileError::EmptyData);
    }
    if threshold.is_nan() {
        return Err(ProfileError::InvalidInput(
            "threshold must not be NaN".to_string(),
        ));
    }

    let last = values.len() - 1;
    let mut enters = Vec::new();
    let mut exits = Vec::new();

    if values[0] > threshold {
        enters.push(0);
    }
    for (i, w) in values.windows(2).enumerate() {
        if w[0] <= threshold && w[1] > threshold {
            enters.push(i);
        } else if w[0] > threshold && w[1] <= threshold {
            exits.push(i);
        }
    }
    if values[last] > threshold {
        exits.push(last);
    }

    if enters.len() != exits.len() {
        return Err(ProfileError::DegenerateComputation(format!(
            "{} enter events but {} exit events",
            enters.len(),
            exits.len()
        )));
    }

    enters
        .into_iter()
        .zip(exits)
        .map(|(enter, exit)| {
            Ok(Crossing {
                enter,
                exit,
                window: SampleRange::new(enter, exit)?.widen(CROSSING_MARGIN, values.len()),
            })
        })
        .collect()
}

/// Indices of the `count` largest changes in the given direction.
///
/// Index `i` stands for the change `values[i + 1] - values[i]`, i.e. the
/// sample just before it. Increases come largest first, decreases most
/// negative first. Non-finite differences are ignored.
pub fn largest_changes(
    values: &[f64],
    count: usize,
    direction: ChangeDirection,
) -> Result<Vec<usize>> {
    if values.len() < 2 {
        return Err(ProfileError::InsufficientData {
            needed: 2,
            got: values.len(),
        });
    }

    let mut diffs: Vec<(usize, f64)> = values
        .windows(2)
        .enumerate()
        .map(|(i, w)| (i, w[1] - w[0]))
        .filter(|(_, d)| d.is_finite())
        .collect();

    match direction {
        ChangeDirection::Increase => {
            diffs.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        }
        ChangeDirection::Decrease => {
            diffs.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)))
        }
    }

    Ok(diffs.into_iter().take(count).map(|(i, _)| i).collect())
}

/// Indices of the `count` highest values, highest first.
pub fn highest_values(values: &[f64], count: usize) -> Result<Vec<usize>> {
    if values.is_empty() {
        return Err(ProfileError::EmptyData);
    }

    let mut indexed: Vec<(usize, f64)> = values
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    Ok(indexed.into_iter().take(count).map(|(i, _)| i).collect())
}
