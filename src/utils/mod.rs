//! Utility functions for summary statistics.

pub mod stats;

pub use stats::{
    histogram, histogram2d, masked_mean, masked_sum, mean, min_max, percentile, population_std,
    Histogram, Histogram2d,
};
