//! FFT based channel features: signal-to-noise ratio and dominant frequency

use crate::heart_analysis::{is_constant, mean, variance};
use log::debug;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};

/// Sampling rate assumed when the time axis cannot provide one
pub const DEFAULT_SAMPLING_RATE: f64 = 1000.0;

/// Bins above this normalised frequency count as noise
const NOISE_CUTOFF: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencySummary {
    pub sampling_rate: f64,
    pub dominant_frequency: f64,
    pub max_frequency: f64,
}

/// Magnitude spectrum of a real signal
fn magnitude_spectrum(data: &[f64]) -> Vec<f64> {
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(data.len());

    let mut buffer: Vec<Complex<f64>> = data.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    buffer.iter().map(|c| c.norm()).collect()
}

/// Frequency of FFT bin `k` for an `n` point transform with sample spacing `d`.
///
/// Bins past the midpoint map to negative frequencies, with the Nyquist bin
/// of an even length transform counted as negative.
fn bin_frequency(k: usize, n: usize, d: f64) -> f64 {
    let positive_bins = (n - 1) / 2 + 1;
    let k = if k < positive_bins {
        k as f64
    } else {
        k as f64 - n as f64
    };
    k / (n as f64 * d)
}

/// SNR in dB: channel variance over the variance of high-frequency FFT magnitudes.
///
/// Returns +inf for a constant channel or when the high-frequency magnitudes
/// have zero variance, and NaN when there are no high-frequency bins at all.
pub fn calculate_snr(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    // FFT round-off leaves a non-zero noise floor for most lengths
    if data.len() > 1 && is_constant(data) {
        return f64::INFINITY;
    }

    let signal_power = variance(data);
    let n = data.len();
    let noise: Vec<f64> = magnitude_spectrum(data)
        .into_iter()
        .enumerate()
        .filter(|&(k, _)| bin_frequency(k, n, 1.0).abs() > NOISE_CUTOFF)
        .map(|(_, magnitude)| magnitude)
        .collect();

    let noise_power = variance(&noise);
    if noise_power == 0.0 {
        return f64::INFINITY;
    }

    10.0 * (signal_power / noise_power).log10()
}

/// Sampling rate from the mean spacing of the time axis
pub fn estimate_sampling_rate(time: &[f64]) -> f64 {
    if time.len() < 2 {
        return DEFAULT_SAMPLING_RATE;
    }

    let spacings: Vec<f64> = time.windows(2).map(|w| w[1] - w[0]).collect();
    let dt = mean(&spacings);
    if dt > 0.0 {
        1.0 / dt
    } else {
        DEFAULT_SAMPLING_RATE
    }
}

pub fn calculate_frequency_domain(data: &[f64], time: &[f64]) -> FrequencySummary {
    let sampling_rate = estimate_sampling_rate(time);
    if data.is_empty() {
        return FrequencySummary {
            sampling_rate,
            dominant_frequency: 0.0,
            max_frequency: 0.0,
        };
    }

    let n = data.len();
    let d = 1.0 / sampling_rate;
    let spectrum = magnitude_spectrum(data);

    let mut dominant = None::<(f64, f64)>;
    let mut max_frequency = None::<f64>;
    for (k, &magnitude) in spectrum.iter().enumerate() {
        let freq = bin_frequency(k, n, d);
        if freq <= 0.0 {
            continue;
        }
        // first maximum wins
        if dominant.map_or(true, |(_, best)| magnitude > best) {
            dominant = Some((freq, magnitude));
        }
        max_frequency = Some(max_frequency.map_or(freq, |m: f64| m.max(freq)));
    }

    let summary = FrequencySummary {
        sampling_rate,
        dominant_frequency: dominant.map_or(0.0, |(freq, _)| freq),
        max_frequency: max_frequency.unwrap_or(0.0),
    };
    debug!(
        "Spectrum of {} samples at {:.2} Hz: dominant {:.3} Hz",
        n, sampling_rate, summary.dominant_frequency
    );
    summary
}
