pub mod config;
pub mod data_loading;
pub mod error;
pub mod heart_analysis;
pub mod manual;
pub mod metrics;
pub mod output;
pub mod preprocessing;
pub mod spectral_analysis;

use config::{AdcCalibration, MetricsConfig};
use data_loading::RawMatrix;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use error::{SignalError, SignalResult, ValidationError};
pub use manual::{ManualCalculationInput, ManualCalculationResult};
pub use metrics::{ChannelMetrics, OverallMetrics, SignalMetrics};

/// Time axis (seconds) and calibrated PCG/PPG/ECG channels (volts)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconstructedSignal {
    pub time: Vec<f64>,
    pub channel1: Vec<f64>,
    pub channel2: Vec<f64>,
    pub channel3: Vec<f64>,
}

impl ReconstructedSignal {
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build the time axis and volt channels from an already parsed matrix
pub fn reconstruct_from_matrix(
    matrix: &RawMatrix,
    calibration: &AdcCalibration,
) -> ReconstructedSignal {
    let channels = data_loading::extract_channels(matrix);
    let time_steps = preprocessing::calculate_time_steps(&channels);
    let time = preprocessing::calculate_time_axis(&time_steps);

    let signal = ReconstructedSignal {
        time,
        channel1: preprocessing::calibrate_channel(&channels.amp1, calibration),
        channel2: preprocessing::calibrate_channel(&channels.amp2, calibration),
        channel3: preprocessing::calibrate_channel(&channels.amp3, calibration),
    };
    debug!(
        "Reconstructed {} samples spanning {:.3} s",
        signal.len(),
        signal.time.last().copied().unwrap_or(0.0)
    );
    signal
}

/// Parse raw recorder text and reconstruct it with the default 24-bit, 5 V calibration
pub fn reconstruct_signal(raw_text: &str) -> SignalResult<ReconstructedSignal> {
    reconstruct_signal_with(raw_text, &AdcCalibration::default())
}

pub fn reconstruct_signal_with(
    raw_text: &str,
    calibration: &AdcCalibration,
) -> SignalResult<ReconstructedSignal> {
    let matrix = data_loading::parse_rows(raw_text)?;
    Ok(reconstruct_from_matrix(&matrix, calibration))
}

/// Read a recording from disk and reconstruct it
pub fn process_signal_file(
    path: &Path,
    calibration: &AdcCalibration,
) -> SignalResult<ReconstructedSignal> {
    let matrix = data_loading::read_txt_file(path)?;
    Ok(reconstruct_from_matrix(&matrix, calibration))
}

/// Per-channel and overall metrics with default feature settings
pub fn compute_metrics(signal: &ReconstructedSignal) -> SignalMetrics {
    compute_metrics_with(signal, &MetricsConfig::default())
}

pub fn compute_metrics_with(signal: &ReconstructedSignal, config: &MetricsConfig) -> SignalMetrics {
    metrics::calculate_all_metrics(signal, config)
}

pub fn compute_manual_metrics(input: &ManualCalculationInput) -> SignalResult<ManualCalculationResult> {
    Ok(manual::calculate_all_manual(input)?)
}
