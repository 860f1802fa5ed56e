use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Default ADC resolution in bits (signed converter)
pub const DEFAULT_ADC_RESOLUTION: u32 = 24;
/// Default full-scale voltage range of the converter
pub const DEFAULT_VOLTAGE_RANGE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaselineMethod {
    Mean,
    #[default]
    Median,
    Mode, // 100-bin histogram, left edge of the fullest bin
}

impl BaselineMethod {
    /// Parse a method name, treating anything unrecognised as `Mean`.
    pub fn from_name_lenient(name: &str) -> Self {
        name.parse().unwrap_or(BaselineMethod::Mean)
    }
}

impl FromStr for BaselineMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mean" => Ok(BaselineMethod::Mean),
            "median" => Ok(BaselineMethod::Median),
            "mode" => Ok(BaselineMethod::Mode),
            _ => Err(format!(
                "Invalid baseline method: {}. Use mean, median (default) or mode",
                s
            )),
        }
    }
}

/// Linear ADC code to volt mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdcCalibration {
    pub resolution_bits: u32,
    pub voltage_range: f64,
}

impl Default for AdcCalibration {
    fn default() -> Self {
        Self {
            resolution_bits: DEFAULT_ADC_RESOLUTION,
            voltage_range: DEFAULT_VOLTAGE_RANGE,
        }
    }
}

impl AdcCalibration {
    /// Largest magnitude code of a signed converter, 2^(bits-1)
    pub fn full_scale_code(&self) -> f64 {
        2f64.powi(self.resolution_bits as i32 - 1)
    }

    pub fn to_volts(&self, code: f64) -> f64 {
        (code / self.full_scale_code()) * (self.voltage_range / 2.0)
    }

    pub fn to_code(&self, volts: f64) -> f64 {
        volts / (self.voltage_range / 2.0) * self.full_scale_code()
    }
}

/// Tuning knobs for per-channel feature extraction.
///
/// `Default` reproduces the stock behaviour: median baseline, peak height
/// of mean + 2 std, and a minimum peak distance of `max(1, len / 200)`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub baseline_method: BaselineMethod,
    pub peak_height: Option<f64>,
    pub peak_distance: Option<usize>,
}

/// Reconstruct biosignal recordings and compute cardiac metrics
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Rebuild the time axis and calibrated channels from a raw .txt recording
    Reconstruct {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Reconstruct a recording and compute per-channel metrics
    Process {
        #[command(flatten)]
        input: InputArgs,

        /// Baseline method (mean, median or mode)
        #[arg(long, default_value = "median")]
        baseline: BaselineMethod,

        /// Minimum peak height in volts, defaults to mean + 2 std per channel
        #[arg(long)]
        peak_height: Option<f64>,

        /// Minimum distance between peaks in samples, defaults to len / 200
        #[arg(long)]
        peak_distance: Option<usize>,
    },

    /// Compute HR, PTT and MBP from manually measured timings
    Manual {
        /// R peak time R_i (seconds)
        #[arg(long, allow_hyphen_values = true)]
        ri: f64,

        /// Next R peak time R_i+1 (seconds)
        #[arg(long, allow_hyphen_values = true)]
        ri_next: f64,

        /// Pulse foot time foot_j (seconds)
        #[arg(long, allow_hyphen_values = true)]
        foot_j: f64,

        /// R peak time R_j matching the pulse foot (seconds)
        #[arg(long, allow_hyphen_values = true)]
        r_j: f64,

        /// Height parameter h (meters)
        #[arg(long, allow_hyphen_values = true)]
        h: f64,

        /// Optional file name reference stored with the result
        #[arg(long)]
        file_name: Option<String>,
    },
}

#[derive(clap::Args, Debug)]
pub struct InputArgs {
    /// Path to the raw .txt recording
    pub input_path: PathBuf,

    /// Write the JSON result here instead of stdout
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// CSV output path for the reconstructed signal (e.g. /path/to/output/signal.csv)
    #[arg(long)]
    pub csv_output: Option<PathBuf>,

    /// ADC resolution in bits
    #[arg(long, default_value_t = DEFAULT_ADC_RESOLUTION)]
    pub adc_resolution: u32,

    /// ADC full-scale voltage range in volts
    #[arg(long, default_value_t = DEFAULT_VOLTAGE_RANGE)]
    pub voltage_range: f64,
}

impl InputArgs {
    pub fn calibration(&self) -> AdcCalibration {
        AdcCalibration {
            resolution_bits: self.adc_resolution,
            voltage_range: self.voltage_range,
        }
    }
}
