use crate::config::MetricsConfig;
use crate::heart_analysis::{self, PeakSet, Statistics};
use crate::spectral_analysis::{self, FrequencySummary};
use crate::ReconstructedSignal;
use log::debug;
use serde::{Deserialize, Serialize};

/// Features of a single calibrated channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMetrics {
    pub statistics: Statistics,
    pub baseline: f64,
    pub peaks: PeakSet,
    pub heart_rate: Option<f64>,
    pub snr: f64,
    pub frequency: FrequencySummary,
}

/// Whole-record summary over all three channels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub total_samples: usize,
    pub duration: f64,
    pub mean_amplitude: f64,
    pub std_amplitude: f64,
}

/// Metrics for PCG (`channel1`), PPG (`channel2`) and ECG (`channel3`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalMetrics {
    pub channel1: ChannelMetrics,
    pub channel2: ChannelMetrics,
    pub channel3: ChannelMetrics,
    pub overall: OverallMetrics,
}

pub fn analyze_channel(data: &[f64], time: &[f64], config: &MetricsConfig) -> ChannelMetrics {
    let peaks = heart_analysis::detect_peaks(data, time, config.peak_height, config.peak_distance);
    let heart_rate = heart_analysis::calculate_heart_rate(&peaks);

    ChannelMetrics {
        statistics: heart_analysis::calculate_statistics(data),
        baseline: heart_analysis::calculate_baseline(data, config.baseline_method),
        peaks,
        heart_rate,
        snr: spectral_analysis::calculate_snr(data),
        frequency: spectral_analysis::calculate_frequency_domain(data, time),
    }
}

pub fn calculate_overall(signal: &ReconstructedSignal) -> OverallMetrics {
    let all_channels: Vec<f64> = signal
        .channel1
        .iter()
        .chain(&signal.channel2)
        .chain(&signal.channel3)
        .copied()
        .collect();

    let duration = match (signal.time.first(), signal.time.last()) {
        (Some(first), Some(last)) if signal.time.len() > 1 => last - first,
        _ => 0.0,
    };

    OverallMetrics {
        total_samples: signal.time.len(),
        duration,
        mean_amplitude: heart_analysis::mean(&all_channels),
        std_amplitude: heart_analysis::std_dev(&all_channels),
    }
}

pub fn calculate_all_metrics(signal: &ReconstructedSignal, config: &MetricsConfig) -> SignalMetrics {
    let [channel1, channel2, channel3] = [&signal.channel1, &signal.channel2, &signal.channel3]
        .map(|channel| analyze_channel(channel, &signal.time, config));

    debug!(
        "Peaks per channel: PCG {}, PPG {}, ECG {}",
        channel1.peaks.count, channel2.peaks.count, channel3.peaks.count
    );

    SignalMetrics {
        channel1,
        channel2,
        channel3,
        overall: calculate_overall(signal),
    }
}
