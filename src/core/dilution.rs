use crate::domain::report::DilutionResult;
use crate::utils::error::{RationError, Result};

pub struct Dilution;

impl Dilution {
    /// Parts of diluent per one part of concentrate needed to go from `start_conc` to `target_conc`.
    pub fn solve(start_conc: f64, target_conc: f64) -> Result<DilutionResult> {
        if !(start_conc.is_finite() && target_conc.is_finite()) {
            return Err(RationError::precondition(
                "Concentrations must be finite numbers.",
            ));
        }
        if target_conc >= start_conc {
            return Err(RationError::precondition(
                "Target concentration must be lower than start concentration for dilution.",
            ));
        }
        if target_conc <= 0.0 {
            return Err(RationError::precondition("Target cannot be zero."));
        }

        let dilution_factor = start_conc / target_conc;
        Ok(DilutionResult {
            start_conc,
            target_conc,
            dilution_factor,
            water_parts: dilution_factor - 1.0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_twenty_to_five() {
        let result = Dilution::solve(20.0, 5.0).unwrap();
        assert_relative_eq!(result.dilution_factor, 4.0);
        assert_relative_eq!(result.water_parts, 3.0);
    }

    #[test]
    fn test_water_parts_formula() {
        let result = Dilution::solve(37.5, 2.5).unwrap();
        assert_relative_eq!(result.water_parts, 37.5 / 2.5 - 1.0);
    }

    #[test]
    fn test_target_must_be_lower() {
        assert!(matches!(
            Dilution::solve(5.0, 5.0),
            Err(RationError::Precondition { .. })
        ));
        assert!(Dilution::solve(5.0, 10.0).is_err());
    }

    #[test]
    fn test_zero_or_negative_target() {
        let err = Dilution::solve(20.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "Target cannot be zero.");
        assert!(Dilution::solve(20.0, -1.0).is_err());
    }
}
