use approx::assert_abs_diff_eq;
use cardio_signal::config::AdcCalibration;
use cardio_signal::data_loading::{extract_channels, parse_rows};
use cardio_signal::preprocessing::calculate_time_steps;
use cardio_signal::{
    compute_manual_metrics, compute_metrics, process_signal_file, reconstruct_signal,
    ManualCalculationInput, ReconstructedSignal, SignalError, ValidationError,
};
use std::io::Write;

/// PCG code whose encoded step is exactly one millisecond
const CODE_1MS: f64 = 3355.4432;

/// 2000 samples at 1 kHz with an ECG spike every 400 samples
fn synthetic_recording() -> String {
    let mut text = String::from("# recorder export v2\n1 2 3\n");
    for i in 0..2000 {
        let ecg = if i % 400 == 200 { 4_000_000.0 } else { 0.0 };
        text.push_str(&format!("{} 0 0 0 0 0 {} 0 {}\n", i, CODE_1MS, ecg));
    }
    text
}

#[test]
fn parses_fixed_columns() {
    let text = "0 0 0 0 0 0 100 200 300\n0 0 0 0 0 0 100 200 300\n0 0 0 0 0 0 100 200 300\n";
    let matrix = parse_rows(text).unwrap();
    assert_eq!(matrix.dim(), (3, 9));

    let channels = extract_channels(&matrix);
    assert_eq!(channels.amp1.to_vec(), vec![100.0, 100.0, 100.0]);
    assert_eq!(channels.amp2.to_vec(), vec![200.0, 200.0, 200.0]);
    assert_eq!(channels.amp3.to_vec(), vec![300.0, 300.0, 300.0]);
}

#[test]
fn rejects_input_without_valid_rows() {
    let result = reconstruct_signal("time pcg ppg ecg\n1 2 3\n");
    assert!(matches!(result, Err(SignalError::InputFormat { .. })));
}

#[test]
fn reconstructs_time_axis_and_volts() {
    let signal = reconstruct_signal(&synthetic_recording()).unwrap();
    assert_eq!(signal.len(), 2000);
    assert_eq!(signal.channel3.len(), 2000);
    assert_eq!(signal.time[0], 0.0);
    assert!(signal.time.windows(2).all(|w| w[1] >= w[0]));
    assert_abs_diff_eq!(signal.time[1999], 1.999, epsilon = 1e-9);

    let cal = AdcCalibration::default();
    assert_abs_diff_eq!(signal.channel3[200], cal.to_volts(4_000_000.0));
    assert_abs_diff_eq!(cal.to_code(signal.channel3[200]), 4_000_000.0, epsilon = 1e-6);
}

#[test]
fn time_steps_stay_in_open_unit_interval() {
    let text: String = (0..300)
        .map(|i| {
            let amp1 = (i as f64 - 150.0) * 20_000.0;
            let amp2 = if i % 3 == 0 { 1e9 } else { -4.0 };
            let amp3 = (i * 997 % 20_000_000) as f64;
            format!("0 0 0 0 0 0 {} {} {}\n", amp1, amp2, amp3)
        })
        .collect();
    let matrix = parse_rows(&text).unwrap();
    let steps = calculate_time_steps(&extract_channels(&matrix));
    assert_eq!(steps.len(), 300);
    assert!(steps.iter().all(|&s| s > 0.0 && s < 1.0));
}

#[test]
fn metrics_for_synthetic_recording() {
    let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
    file.write_all(synthetic_recording().as_bytes()).unwrap();

    let signal = process_signal_file(file.path(), &AdcCalibration::default()).unwrap();
    let metrics = compute_metrics(&signal);

    let ecg = &metrics.channel3;
    assert_eq!(ecg.peaks.count, 5);
    assert_eq!(ecg.peaks.indices, vec![200, 600, 1000, 1400, 1800]);
    assert_abs_diff_eq!(ecg.heart_rate.unwrap(), 150.0, epsilon = 1e-6);
    assert_abs_diff_eq!(ecg.frequency.sampling_rate, 1000.0, epsilon = 1e-3);
    assert_eq!(ecg.baseline, 0.0);

    // flat channels degrade without aborting the report
    assert_eq!(metrics.channel1.heart_rate, None);
    assert_eq!(metrics.channel1.peaks.count, 0);
    assert!(metrics.channel1.statistics.mean > 0.0);
    assert_eq!(metrics.channel2.snr, f64::INFINITY);

    assert_eq!(metrics.overall.total_samples, 2000);
    assert_abs_diff_eq!(metrics.overall.duration, 1.999, epsilon = 1e-9);
}

#[test]
fn constant_channel_has_infinite_snr() {
    for len in [6, 64, 997, 1500] {
        let signal = ReconstructedSignal {
            time: (0..len).map(|i| i as f64 * 0.001).collect(),
            channel1: vec![0.75; len],
            channel2: (0..len).map(|i| (i as f64 * 0.4).sin()).collect(),
            channel3: vec![0.3; len],
        };
        let metrics = compute_metrics(&signal);
        assert_eq!(metrics.channel1.snr, f64::INFINITY, "len {}", len);
        assert_eq!(metrics.channel1.heart_rate, None);
        assert_eq!(metrics.channel1.statistics.std, 0.0);
        assert_eq!(metrics.channel3.snr, f64::INFINITY, "len {}", len);
        assert_eq!(metrics.channel3.statistics.std, 0.0);
        assert!(metrics.channel2.snr.is_finite());
    }
}

#[test]
fn manual_metrics_contract() {
    let input = ManualCalculationInput {
        ri: 1.0,
        ri_next: 1.5,
        foot_j: 0.3,
        r_j: 0.1,
        h: 0.5,
    };
    let result = compute_manual_metrics(&input).unwrap();
    assert_abs_diff_eq!(result.hr, 120.0);
    assert_abs_diff_eq!(result.ptt, 0.2, epsilon = 1e-12);
    assert_abs_diff_eq!(result.mbp, 28.089, epsilon = 1e-3);
    assert_eq!(compute_manual_metrics(&input).unwrap(), result);

    let reversed = ManualCalculationInput {
        ri: 1.5,
        ri_next: 1.0,
        ..input
    };
    assert!(matches!(
        compute_manual_metrics(&reversed),
        Err(SignalError::Validation(ValidationError::NonPositiveRrInterval { .. }))
    ));
}
