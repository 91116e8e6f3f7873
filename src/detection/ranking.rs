//! Ranking of periods by how far they deviate from the average period.
//!
//! The weirdness score of a period is the mean absolute deviation between
//! the period and the elementwise average of all periods. With
//! standardization both are first min-max scaled to [0, 1], so that the
//! shape of a period dominates over its magnitude.
//!
//! Degenerate periods (all samples excluded, or zero range when
//! standardizing) score `NaN` and always rank after every finite score.
//! [`degenerate_periods`] names them so callers can report them apart from
//! the ranking.

use crate::core::{BuildingRecord, SampleRange};
use crate::error::{ProfileError, Result};
use crate::periods::Periods;
use crate::transform::min_max_scale;
use serde::Serialize;
use std::cmp::Ordering;

/// A period with its weirdness score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedPeriod {
    pub index: usize,
    pub score: f64,
}

/// Why a period has no weirdness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Degeneracy {
    /// Every sample of the period is excluded.
    Excluded,
    /// Zero range, so the period has no shape to standardize.
    Flat,
}

/// A period left out of the scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FlaggedPeriod {
    pub index: usize,
    pub reason: Degeneracy,
}

/// Lowest and highest total periods.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExtremePeriods {
    pub lowest: usize,
    pub lowest_total: f64,
    pub highest: usize,
    pub highest_total: f64,
}

/// Weirdness score of every period, in period order.
pub fn weirdness_scores(periods: &Periods, standardize: bool) -> Result<Vec<f64>> {
    if periods.is_empty() {
        return Err(ProfileError::EmptyData);
    }

    let mut reference = periods.average_profile();
    if reference.iter().all(Option::is_none) {
        return Err(ProfileError::DegenerateComputation(
            "every sample of the reference period is excluded".to_string(),
        ));
    }
    if standardize {
        reference = min_max_scale(&reference).ok_or_else(|| {
            ProfileError::DegenerateComputation(
                "reference period has zero range and cannot be standardized".to_string(),
            )
        })?;
    }

    let scores = periods
        .values()
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let scaled;
            let row = if standardize {
                match min_max_scale(row) {
                    Some(s) => {
                        scaled = s;
                        &scaled
                    }
                    None => {
                        tracing::debug!(index, "period has no shape to standardize");
                        return f64::NAN;
                    }
                }
            } else {
                row
            };
            mean_abs_deviation(row, &reference)
        })
        .collect();

    Ok(scores)
}

fn degeneracy(row: &[Option<f64>], standardize: bool) -> Option<Degeneracy> {
    if row.iter().all(Option::is_none) {
        Some(Degeneracy::Excluded)
    } else if standardize && min_max_scale(row).is_none() {
        Some(Degeneracy::Flat)
    } else {
        None
    }
}

/// Periods that score `NaN` under `standardize`, in period order.
///
/// A period with at least one included sample always overlaps the reference
/// profile, so these are exactly the periods [`weirdness_scores`] cannot
/// score.
pub fn degenerate_periods(periods: &Periods, standardize: bool) -> Vec<FlaggedPeriod> {
    periods
        .values()
        .iter()
        .enumerate()
        .filter_map(|(index, row)| {
            degeneracy(row, standardize).map(|reason| FlaggedPeriod { index, reason })
        })
        .collect()
}

/// Mean |a - b| over offsets where both are present; `NaN` if none are.
fn mean_abs_deviation(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let (sum, n) = a
        .iter()
        .zip(b)
        .filter_map(|(x, y)| Some((x.as_ref()? - y.as_ref()?).abs()))
        .fold((0.0, 0usize), |(sum, n), d| (sum + d, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Order scores, `NaN` last in both directions.
///
/// Descending ties resolve to the later period first, ascending ties to the
/// earlier one.
fn compare_scores(a: &RankedPeriod, b: &RankedPeriod, ascending: bool) -> Ordering {
    match (a.score.is_nan(), b.score.is_nan()) {
        (true, true) => a.index.cmp(&b.index),
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) if ascending => a
            .score
            .total_cmp(&b.score)
            .then_with(|| a.index.cmp(&b.index)),
        (false, false) => b
            .score
            .total_cmp(&a.score)
            .then_with(|| b.index.cmp(&a.index)),
    }
}

/// Rank periods with their scores.
///
/// # Arguments
/// * `periods` - Periods to rank
/// * `count` - Maximum number of periods to return
/// * `ascending` - Most typical first instead of most atypical first
/// * `standardize` - Min-max scale each period and the reference first
///
/// # Returns
/// At most `count` periods with their scores. `NaN` scores come after every
/// finite one in both directions. Fails with `DegenerateComputation` when
/// the reference profile is fully excluded or, under `standardize`, flat.
pub fn rank_periods_scored(
    periods: &Periods,
    count: usize,
    ascending: bool,
    standardize: bool,
) -> Result<Vec<RankedPeriod>> {
    let scores = weirdness_scores(periods, standardize)?;

    let mut ranked: Vec<RankedPeriod> = scores
        .into_iter()
        .enumerate()
        .map(|(index, score)| RankedPeriod { index, score })
        .collect();
    ranked.sort_by(|a, b| compare_scores(a, b, ascending));
    ranked.truncate(count);

    Ok(ranked)
}

/// Indices of the `count` most atypical periods.
///
/// # Arguments
/// * `periods` - Periods to rank
/// * `count` - Maximum number of indices to return
/// * `ascending` - Most typical first instead of most atypical first
/// * `standardize` - Compare shapes after min-max scaling
///
/// # Returns
/// Period indices in rank order, as in [`rank_periods_scored`].
pub fn rank_periods(
    periods: &Periods,
    count: usize,
    ascending: bool,
    standardize: bool,
) -> Result<Vec<usize>> {
    Ok(rank_periods_scored(periods, count, ascending, standardize)?
        .into_iter()
        .map(|r| r.index)
        .collect())
}

/// Periods with the lowest and highest sum of included samples.
///
/// Ties resolve to the earliest period. All-excluded periods are ignored.
pub fn extreme_totals(periods: &Periods) -> Result<ExtremePeriods> {
    if periods.is_empty() {
        return Err(ProfileError::EmptyData);
    }

    let totals: Vec<(usize, f64)> = periods
        .totals()
        .into_iter()
        .enumerate()
        .filter_map(|(i, t)| t.map(|t| (i, t)))
        .collect();

    let mut iter = totals.iter().copied();
    let first = iter.next().ok_or_else(|| {
        ProfileError::DegenerateComputation("every period is fully excluded".to_string())
    })?;

    let (lowest, highest) = iter.fold((first, first), |(lo, hi), cur| {
        (
            if cur.1 < lo.1 { cur } else { lo },
            if cur.1 > hi.1 { cur } else { hi },
        )
    });

    Ok(ExtremePeriods {
        lowest: lowest.0,
        lowest_total: lowest.1,
        highest: highest.0,
        highest_total: highest.1,
    })
}

/// Sample ranges of ranked periods, widened by `margin` samples.
pub fn ranked_ranges(
    record: &BuildingRecord,
    periods: &Periods,
    indices: &[usize],
    margin: usize,
) -> Result<Vec<SampleRange>> {
    indices
        .iter()
        .map(|&i| Ok(periods.sample_range(record, i)?.widen(margin, record.len())))
        .collect()
}
