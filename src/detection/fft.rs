//! Frequency-domain view of a channel.

use crate::error::{ProfileError, Result};
use rustfft::{num_complex::Complex64, FftPlanner};
use serde::Serialize;

/// Periods (in samples) marked on spectrum charts.
pub const HIGHLIGHTED_PERIODS: [usize; 5] = [3, 6, 12, 24, 168];

/// Compute the FFT of a real-valued signal.
///
/// Returns the components for frequencies 0 to N/2 since the spectrum of a
/// real input is symmetric.
pub fn fft_real(signal: &[f64]) -> Vec<Complex64> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let mut buffer: Vec<Complex64> = signal.iter().map(|&x| Complex64::new(x, 0.0)).collect();

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    buffer.truncate(n / 2 + 1);
    buffer
}

/// Real and imaginary parts of the DFT with the constant component removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    /// Number of samples transformed.
    pub len: usize,
    pub real: Vec<f64>,
    pub imaginary: Vec<f64>,
    /// `(period, frequency index)` for each entry of [`HIGHLIGHTED_PERIODS`].
    pub highlighted: Vec<(usize, f64)>,
}

impl Spectrum {
    /// Frequency index with the largest magnitude, excluding the constant term.
    pub fn dominant_index(&self) -> Option<usize> {
        self.real
            .iter()
            .zip(&self.imaginary)
            .enumerate()
            .skip(1)
            .map(|(k, (re, im))| (k, re.hypot(*im)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(k, _)| k)
    }

    /// Period in samples of frequency index `k`.
    pub fn period_of(&self, k: usize) -> Option<f64> {
        (k > 0).then(|| self.len as f64 / k as f64)
    }
}

/// Spectrum of `signal`; the constant (k = 0) component is zeroed.
pub fn spectrum(signal: &[f64]) -> Result<Spectrum> {
    if signal.len() < 2 {
        return Err(ProfileError::InsufficientData {
            needed: 2,
            got: signal.len(),
        });
    }
    if signal.iter().any(|v| !v.is_finite()) {
        return Err(ProfileError::InvalidInput(
            "spectrum input must be finite".to_string(),
        ));
    }

    let mut components = fft_real(signal);
    components[0] = Complex64::new(0.0, 0.0);

    let n = signal.len();
    Ok(Spectrum {
        len: n,
        real: components.iter().map(|c| c.re).collect(),
        imaginary: components.iter().map(|c| c.im).collect(),
        highlighted: HIGHLIGHTED_PERIODS
            .iter()
            .map(|&p| (p, n as f64 / p as f64))
            .collect(),
    })
}
