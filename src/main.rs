use anyhow::{bail, Context, Result};
use cardio_signal::config::{Args, Command, InputArgs, MetricsConfig};
use cardio_signal::output::{self, ManualCalculationRecord, ProcessingReport};
use cardio_signal::{ManualCalculationInput, ReconstructedSignal};
use clap::Parser;
use log::info;
use serde::Serialize;
use std::path::Path;

fn load_signal(input: &InputArgs) -> Result<ReconstructedSignal> {
    let path = &input.input_path;
    if path.extension().and_then(|s| s.to_str()) != Some("txt") {
        bail!("Only .txt files are supported: {}", path.display());
    }

    info!("Loading file: {}", path.display());
    cardio_signal::process_signal_file(path, &input.calibration())
        .with_context(|| format!("Failed to reconstruct {}", path.display()))
}

fn emit<T: Serialize>(json_output: Option<&Path>, value: &T) -> Result<()> {
    match json_output {
        Some(path) => output::write_json(path, value),
        None => {
            println!("{}", output::to_json_string(value)?);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    match args.command {
        Command::Reconstruct { input } => {
            let signal = load_signal(&input)?;
            if let Some(csv_path) = &input.csv_output {
                output::write_signal_csv(csv_path, &signal)?;
            }
            emit(input.json_output.as_deref(), &signal)?;
        }
        Command::Process {
            input,
            baseline,
            peak_height,
            peak_distance,
        } => {
            let signal = load_signal(&input)?;
            let config = MetricsConfig {
                baseline_method: baseline,
                peak_height,
                peak_distance,
            };
            let metrics = cardio_signal::compute_metrics_with(&signal, &config);

            for (name, channel) in [
                ("PCG", &metrics.channel1),
                ("PPG", &metrics.channel2),
                ("ECG", &metrics.channel3),
            ] {
                match channel.heart_rate {
                    Some(hr) => info!("{}: {} peaks, {:.1} bpm", name, channel.peaks.count, hr),
                    None => info!("{}: {} peaks, heart rate unavailable", name, channel.peaks.count),
                }
            }

            if let Some(csv_path) = &input.csv_output {
                output::write_signal_csv(csv_path, &signal)?;
                output::write_peaks_csv(&output::peaks_path(csv_path), &metrics)?;
            }

            let report = ProcessingReport::new(&input.input_path, signal, metrics)?;
            emit(input.json_output.as_deref(), &report)?;
        }
        Command::Manual {
            ri,
            ri_next,
            foot_j,
            r_j,
            h,
            file_name,
        } => {
            let input = ManualCalculationInput {
                ri,
                ri_next,
                foot_j,
                r_j,
                h,
            };
            let result = cardio_signal::compute_manual_metrics(&input)?;
            emit(None, &ManualCalculationRecord { result, file_name })?;
        }
    }

    Ok(())
}
