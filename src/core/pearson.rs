//! Pearson Square: blend two feeds to hit a nutrient value that lies between them.

use crate::domain::report::PearsonResult;
use crate::utils::error::{RationError, Result};

pub struct PearsonSquare;

impl PearsonSquare {
    /// Each feed's share is proportional to the *other* feed's distance from the target.
    pub fn solve(target: f64, feed1_value: f64, feed2_value: f64) -> Result<PearsonResult> {
        if !(target.is_finite() && feed1_value.is_finite() && feed2_value.is_finite()) {
            return Err(RationError::precondition("All values must be finite numbers."));
        }

        let (low, high) = if feed1_value <= feed2_value {
            (feed1_value, feed2_value)
        } else {
            (feed2_value, feed1_value)
        };
        if target < low || target > high {
            return Err(RationError::precondition(
                "Target value must be between the two feed values.",
            ));
        }

        let parts1 = (feed2_value - target).abs();
        let parts2 = (feed1_value - target).abs();
        let total_parts = parts1 + parts2;
        if total_parts == 0.0 {
            return Err(RationError::precondition(
                "Both feeds already equal the target; there is no ratio to solve.",
            ));
        }

        tracing::debug!(
            "Pearson square for {}: {} parts vs {} parts",
            target,
            parts1,
            parts2
        );

        Ok(PearsonResult {
            target,
            feed1_value,
            feed2_value,
            parts1,
            parts2,
            pct1: parts1 / total_parts * 100.0,
            pct2: parts2 / total_parts * 100.0,
        })
    }
}
