//! Closed-form HR, PTT and MBP from clinician-measured timings

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Manually measured timings (seconds) and height parameter `h` (meters)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualCalculationInput {
    pub ri: f64,
    pub ri_next: f64,
    pub foot_j: f64,
    pub r_j: f64,
    pub h: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualCalculationResult {
    pub hr: f64,
    pub ptt: f64,
    pub mbp: f64,
}

/// HR = 60 / (R_i+1 - R_i), in bpm
pub fn calculate_hr(ri: f64, ri_next: f64) -> Result<f64, ValidationError> {
    let rr = ri_next - ri;
    if rr <= 0.0 {
        return Err(ValidationError::NonPositiveRrInterval { rr });
    }
    Ok(60.0 / rr)
}

/// PTT = foot_j - R_j, in seconds. Negative transit times are returned as is.
pub fn calculate_ptt(foot_j: f64, r_j: f64) -> f64 {
    foot_j - r_j
}

/// MBP = 1.947 h^2 / PTT^2 + 31.84 h, in mmHg
pub fn calculate_mbp(h: f64, ptt: f64) -> Result<f64, ValidationError> {
    if ptt <= 0.0 {
        return Err(ValidationError::NonPositivePtt { ptt });
    }
    Ok(1.947 * h.powi(2) / ptt.powi(2) + 31.84 * h)
}

pub fn calculate_all_manual(
    input: &ManualCalculationInput,
) -> Result<ManualCalculationResult, ValidationError> {
    let hr = calculate_hr(input.ri, input.ri_next)?;
    let ptt = calculate_ptt(input.foot_j, input.r_j);
    let mbp = calculate_mbp(input.h, ptt)?;

    Ok(ManualCalculationResult { hr, ptt, mbp })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hr() {
        assert_abs_diff_eq!(calculate_hr(1.0, 1.5).unwrap(), 120.0);
        assert_eq!(
            calculate_hr(1.5, 1.0),
            Err(ValidationError::NonPositiveRrInterval { rr: -0.5 })
        );
        assert!(calculate_hr(2.0, 2.0).is_err());
    }

    #[test]
    fn test_ptt_allows_negative() {
        assert_abs_diff_eq!(calculate_ptt(0.35, 0.1), 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(calculate_ptt(0.1, 0.35), -0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_mbp() {
        assert_abs_diff_eq!(calculate_mbp(0.5, 0.2).unwrap(), 28.089, epsilon = 1e-3);
        assert!(matches!(
            calculate_mbp(0.5, 0.0),
            Err(ValidationError::NonPositivePtt { .. })
        ));
    }

    #[test]
    fn test_all_manual() {
        let input = ManualCalculationInput {
            ri: 1.0,
            ri_next: 1.8,
            foot_j: 1.25,
            r_j: 1.0,
            h: 0.5,
        };
        let result = calculate_all_manual(&input).unwrap();
        assert_abs_diff_eq!(result.hr, 75.0, epsilon = 1e-9);
        assert_abs_diff_eq!(result.ptt, 0.25);
        assert_abs_diff_eq!(result.mbp, 1.947 * 0.25 / 0.0625 + 15.92, epsilon = 1e-9);

        // identical inputs give bit-identical outputs
        let again = calculate_all_manual(&input).unwrap();
        assert_eq!(result.hr.to_bits(), again.hr.to_bits());
        assert_eq!(result.mbp.to_bits(), again.mbp.to_bits());
    }

    #[test]
    fn test_all_manual_reports_first_failure() {
        let input = ManualCalculationInput {
            ri: 2.0,
            ri_next: 1.0,
            foot_j: 0.0,
            r_j: 1.0,
            h: 0.5,
        };
        assert!(matches!(
            calculate_all_manual(&input),
            Err(ValidationError::NonPositiveRrInterval { .. })
        ));

        let input = ManualCalculationInput { ri: 0.0, ri_next: 1.0, ..input };
        assert_eq!(
            calculate_all_manual(&input),
            Err(ValidationError::NonPositivePtt { ptt: -1.0 })
        );
    }
}
