//! Detection utilities over building records.
//!
//! This module provides tools for:
//! - Ranking periods by deviation from the average period
//! - Threshold crossings and largest changes in a raw channel
//! - Frequency-domain inspection

mod fft;
mod ranking;
mod scan;

pub use fft::{fft_real, spectrum, Spectrum, HIGHLIGHTED_PERIODS};
pub use ranking::{
    degenerate_periods, extreme_totals, rank_periods, rank_periods_scored, ranked_ranges,
    weirdness_scores, Degeneracy, ExtremePeriods, FlaggedPeriod, RankedPeriod,
};
pub use scan::{
    highest_values, largest_changes, threshold_crossings, ChangeDirection, Crossing,
    CROSSING_MARGIN,
};
