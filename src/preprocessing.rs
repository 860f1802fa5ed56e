use crate::config::AdcCalibration;
use crate::data_loading::RawChannels;
use log::{debug, warn};

/// Step assumed when no encoded step is usable (1 kHz)
pub const DEFAULT_TIME_STEP: f64 = 0.001;

/// Candidates with a magnitude at or below this are treated as missing
const STEP_EPSILON: f64 = 1e-10;

const TWO_POW_23: f64 = 8_388_608.0;
const TWO_POW_24: f64 = 16_777_216.0;

/// PCG/PPG step transform: (2.5 / 2^23) * code
fn amp_step(code: f64) -> f64 {
    (2.5 / TWO_POW_23) * code
}

/// ECG step transform: (10 * (code - 2^24) / 2) / (2^24 - 1)
fn ecg_step(code: f64) -> f64 {
    (10.0 * (code - TWO_POW_24) / 2.0) / (TWO_POW_24 - 1.0)
}

fn is_plausible_step(step: f64) -> bool {
    step > 0.0 && step < 1.0
}

fn is_usable_candidate(step: f64) -> bool {
    step.abs() > STEP_EPSILON && is_plausible_step(step)
}

/// Derive a per-sample time step from the timing encoded in the raw codes.
///
/// Each sample takes the first usable candidate of PCG, PPG, then ECG
/// (ECG is taken unconditionally). Any step still outside (0, 1) is then
/// replaced by the mean of the plausible ones, or by `DEFAULT_TIME_STEP`
/// if there are none.
pub fn calculate_time_steps(channels: &RawChannels) -> Vec<f64> {
    let selected: Vec<f64> = channels
        .amp1
        .iter()
        .zip(channels.amp2.iter())
        .zip(channels.amp3.iter())
        .map(|((&a1, &a2), &a3)| {
            let f1 = amp_step(a1);
            if is_usable_candidate(f1) {
                return f1;
            }
            let f2 = amp_step(a2);
            if is_usable_candidate(f2) {
                return f2;
            }
            ecg_step(a3)
        })
        .collect();

    let plausible: Vec<f64> = selected
        .iter()
        .copied()
        .filter(|&s| is_plausible_step(s))
        .collect();

    let mean_step = if plausible.is_empty() {
        warn!(
            "No plausible time step in {} samples, assuming {} s",
            selected.len(),
            DEFAULT_TIME_STEP
        );
        DEFAULT_TIME_STEP
    } else {
        plausible.iter().sum::<f64>() / plausible.len() as f64
    };

    let replaced = selected.len() - plausible.len();
    if replaced > 0 {
        debug!(
            "Replacing {} implausible time steps with mean step {:.6} s",
            replaced, mean_step
        );
    }

    selected
        .into_iter()
        .map(|s| if is_plausible_step(s) { s } else { mean_step })
        .collect()
}

/// Integrate steps into a time axis: t[0] = 0, t[n] = t[n-1] + step[n]
pub fn calculate_time_axis(time_steps: &[f64]) -> Vec<f64> {
    let mut time = vec![0.0; time_steps.len()];
    for i in 1..time_steps.len() {
        time[i] = time[i - 1] + time_steps[i];
    }
    time
}

/// Convert one ADC code to volts. Out-of-range codes pass through unclamped.
pub fn convert_adc_to_volt(code: f64, calibration: &AdcCalibration) -> f64 {
    calibration.to_volts(code)
}

/// Inverse of `convert_adc_to_volt`
pub fn volt_to_adc(volts: f64, calibration: &AdcCalibration) -> f64 {
    calibration.to_code(volts)
}

/// Convert a whole channel of codes to volts
pub fn calibrate_channel<'a, I>(codes: I, calibration: &AdcCalibration) -> Vec<f64>
where
    I: IntoIterator<Item = &'a f64>,
{
    codes
        .into_iter()
        .map(|&code| convert_adc_to_volt(code, calibration))
        .collect()
}
