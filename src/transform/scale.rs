//! Min-max scaling for masked profiles.

/// Ranges below this are treated as zero.
pub const MIN_RANGE: f64 = 1e-10;

/// Parameters of a min-max rescaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMaxScale {
    pub min: f64,
    pub range: f64,
}

impl MinMaxScale {
    /// Fit on the present values.
    ///
    /// Returns `None` when no value is present or the range is zero, since
    /// the shape of such a profile is undefined.
    pub fn fit(values: &[Option<f64>]) -> Option<Self> {
        let (min, max) = values.iter().flatten().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        })?;
        let range = max - min;
        if !range.is_finite() || range < MIN_RANGE {
            return None;
        }
        Some(Self { min, range })
    }

    pub fn apply(&self, value: f64) -> f64 {
        (value - self.min) / self.range
    }

    pub fn transform(&self, values: &[Option<f64>]) -> Vec<Option<f64>> {
        values.iter().map(|v| v.map(|x| self.apply(x))).collect()
    }
}

/// Rescale present values to [0, 1]; `None` for empty or zero-range input.
pub fn min_max_scale(values: &[Option<f64>]) -> Option<Vec<Option<f64>>> {
    MinMaxScale::fit(values).map(|scale| scale.transform(values))
}
