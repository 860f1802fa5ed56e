use crate::manual::ManualCalculationResult;
use crate::metrics::SignalMetrics;
use crate::ReconstructedSignal;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Result record of one processed recording
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingReport {
    pub file_name: String,
    pub file_size: u64,
    pub processed_at: DateTime<Utc>,
    pub processed_data: ReconstructedSignal,
    pub metrics: SignalMetrics,
}

impl ProcessingReport {
    pub fn new(path: &Path, signal: ReconstructedSignal, metrics: SignalMetrics) -> Result<Self> {
        let file_size = std::fs::metadata(path)
            .with_context(|| format!("Failed to stat input: {}", path.display()))?
            .len();
        let file_name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file_name,
            file_size,
            processed_at: Utc::now(),
            processed_data: signal,
            metrics,
        })
    }
}

/// Manual calculation result with its optional file reference
#[derive(Debug, Clone, Serialize)]
pub struct ManualCalculationRecord {
    #[serde(flatten)]
    pub result: ManualCalculationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    Ok(())
}

/// `/out/signal.csv` -> `/out/signal_peaks.csv`
pub fn peaks_path(base_path: &Path) -> PathBuf {
    let dir = base_path.parent().unwrap_or(Path::new("."));
    let stem = base_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("signal");
    let ext = base_path.extension().and_then(|s| s.to_str()).unwrap_or("csv");

    dir.join(format!("{}_peaks.{}", stem, ext))
}

/// Serialize to pretty JSON. Non-finite floats are written as `null`.
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize result")
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    create_parent_dir(path)?;
    info!("Writing JSON to {}", path.display());

    let mut file = File::create(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    file.write_all(to_json_string(value)?.as_bytes())?;
    file.write_all(b"\n")?;
    Ok(())
}

/// Write `time,channel1,channel2,channel3` rows
pub fn write_signal_csv(path: &Path, signal: &ReconstructedSignal) -> Result<()> {
    create_parent_dir(path)?;
    info!("Writing signal to {}", path.display());

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    writer.write_record(["time", "channel1", "channel2", "channel3"])?;

    for i in 0..signal.len() {
        let value = |channel: &[f64]| channel.get(i).map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            signal.time[i].to_string(),
            value(signal.channel1.as_slice()),
            value(signal.channel2.as_slice()),
            value(signal.channel3.as_slice()),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write one `channel,index,time,height` row per detected peak
pub fn write_peaks_csv(path: &Path, metrics: &SignalMetrics) -> Result<()> {
    create_parent_dir(path)?;
    info!("Writing peaks to {}", path.display());

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;
    writer.write_record(["channel", "index", "time", "height"])?;

    let channels = [
        ("channel1", &metrics.channel1),
        ("channel2", &metrics.channel2),
        ("channel3", &metrics.channel3),
    ];
    for (name, channel) in channels {
        let peaks = &channel.peaks;
        for ((index, time), height) in peaks.indices.iter().zip(&peaks.times).zip(&peaks.heights) {
            writer.write_record([
                name.to_string(),
                index.to_string(),
                time.to_string(),
                height.to_string(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
