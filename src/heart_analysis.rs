use crate::config::BaselineMethod;
use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Number of histogram bins used by the `mode` baseline
const MODE_HISTOGRAM_BINS: usize = 100;

/// Basic amplitude statistics of a channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub range: f64,
}

/// Detected peaks, ordered by ascending sample index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeakSet {
    pub indices: Vec<usize>,
    pub heights: Vec<f64>,
    pub times: Vec<f64>,
    pub count: usize,
}

/// True for a non-empty slice whose samples are all equal
pub(crate) fn is_constant(data: &[f64]) -> bool {
    data.first().is_some_and(|&first| data.iter().all(|&x| x == first))
}

pub(crate) fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    // a running sum drifts away from the value itself
    if is_constant(data) {
        return data[0];
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population variance (divides by n), exactly 0 for a constant slice
pub(crate) fn variance(data: &[f64]) -> f64 {
    if is_constant(data) {
        return 0.0;
    }
    let m = mean(data);
    data.iter()
        .map(|&x| {
            let diff = x - m;
            diff * diff
        })
        .sum::<f64>()
        / data.len() as f64
}

pub(crate) fn std_dev(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

fn median(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn min_max(data: &[f64]) -> (f64, f64) {
    if data.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    data.iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        })
}

pub fn calculate_statistics(data: &[f64]) -> Statistics {
    let (min, max) = min_max(data);
    Statistics {
        mean: mean(data),
        std: std_dev(data),
        min,
        max,
        median: median(data),
        range: max - min,
    }
}

/// Approximate mode: left edge of the fullest bin of a 100-bin histogram
fn histogram_mode(data: &[f64]) -> f64 {
    let (mut lo, mut hi) = min_max(data);
    if !lo.is_finite() || !hi.is_finite() {
        return f64::NAN;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let step = (hi - lo) / MODE_HISTOGRAM_BINS as f64;
    let edges: Vec<f64> = (0..=MODE_HISTOGRAM_BINS)
        .map(|i| {
            if i == MODE_HISTOGRAM_BINS {
                hi
            } else {
                lo + i as f64 * step
            }
        })
        .collect();

    let scale = MODE_HISTOGRAM_BINS as f64 / (hi - lo);
    let mut counts = [0usize; MODE_HISTOGRAM_BINS];
    for &x in data {
        // the last bin is closed on the right
        let mut bin = (((x - lo) * scale) as usize).min(MODE_HISTOGRAM_BINS - 1);
        // the scaled index can round across an edge, settle it against the edges
        if x < edges[bin] && bin > 0 {
            bin -= 1;
        } else if bin + 1 < MODE_HISTOGRAM_BINS && x >= edges[bin + 1] {
            bin += 1;
        }
        counts[bin] += 1;
    }

    // first fullest bin wins ties
    let mut best = 0;
    for (bin, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = bin;
        }
    }
    edges[best]
}

pub fn calculate_baseline(data: &[f64], method: BaselineMethod) -> f64 {
    match method {
        BaselineMethod::Mean => mean(data),
        BaselineMethod::Median => median(data),
        BaselineMethod::Mode => histogram_mode(data),
    }
}

/// Default minimum peak distance in samples: max(1, len / 200)
pub fn default_peak_distance(len: usize) -> usize {
    (len / 200).max(1)
}

/// Find peaks the way a height/distance constrained peak finder does.
///
/// A candidate is a strict local maximum whose value is at least
/// `min_height` (default mean + 2 std). Candidates closer than
/// `min_distance` samples (default `len / 200`, at least 1) are thinned so
/// that only the tallest survives; equal heights keep the leftmost.
///
/// Peak times come from `time` when it matches the channel length, and are
/// the raw sample indices otherwise.
pub fn detect_peaks(
    data: &[f64],
    time: &[f64],
    min_height: Option<f64>,
    min_distance: Option<usize>,
) -> PeakSet {
    let min_height = min_height.unwrap_or_else(|| mean(data) + 2.0 * std_dev(data));
    let min_distance = min_distance
        .unwrap_or_else(|| default_peak_distance(data.len()))
        .max(1);

    let candidates: Vec<usize> = (1..data.len().saturating_sub(1))
        .filter(|&i| data[i - 1] < data[i] && data[i] > data[i + 1] && data[i] >= min_height)
        .collect();

    trace!(
        "{} peak candidates above {:.6} (min distance {})",
        candidates.len(),
        min_height,
        min_distance
    );

    let mut keep = vec![true; candidates.len()];
    if min_distance > 1 && candidates.len() > 1 {
        // tallest first, leftmost first among equals
        let mut order: Vec<usize> = (0..candidates.len()).collect();
        order.sort_by(|&a, &b| {
            data[candidates[b]]
                .partial_cmp(&data[candidates[a]])
                .unwrap_or(Ordering::Equal)
                .then(candidates[a].cmp(&candidates[b]))
        });

        for &current in &order {
            if !keep[current] {
                continue;
            }
            let peak = candidates[current];

            let mut left = current;
            while left > 0 && peak - candidates[left - 1] < min_distance {
                left -= 1;
                keep[left] = false;
            }
            let mut right = current + 1;
            while right < candidates.len() && candidates[right] - peak < min_distance {
                keep[right] = false;
                right += 1;
            }
        }
    }

    let indices: Vec<usize> = candidates
        .into_iter()
        .zip(keep)
        .filter_map(|(idx, kept)| kept.then_some(idx))
        .collect();

    let heights = indices.iter().map(|&i| data[i]).collect();
    let times = if time.len() == data.len() {
        indices.iter().map(|&i| time[i]).collect()
    } else {
        debug!(
            "Time axis length {} differs from channel length {}, using sample indices as peak times",
            time.len(),
            data.len()
        );
        indices.iter().map(|&i| i as f64).collect()
    };

    PeakSet {
        count: indices.len(),
        indices,
        heights,
        times,
    }
}

/// Heart rate in bpm from the mean interval between consecutive peaks
pub fn calculate_heart_rate(peaks: &PeakSet) -> Option<f64> {
    if peaks.count < 2 || peaks.times.len() < 2 {
        warn!("Not enough peaks for heart rate ({} found)", peaks.count);
        return None;
    }

    let intervals: Vec<f64> = peaks.times.windows(2).map(|w| w[1] - w[0]).collect();
    if intervals.is_empty() {
        return None;
    }

    let mean_interval = mean(&intervals);
    if mean_interval <= 0.0 {
        return None;
    }

    Some(60.0 / mean_interval)
}
