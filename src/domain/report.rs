use crate::domain::model::{Nutrient, NutrientTotals};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "PASS"),
            Verdict::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of comparing a calculated total against its tolerance window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NutrientStatus {
    Ok,
    /// Signed percent deviation from the target (negative).
    Low { deviation_pct: f64 },
    /// Signed percent deviation from the target (positive).
    High { deviation_pct: f64 },
    /// No target defined; never affects the verdict.
    NotApplicable,
}

impl NutrientStatus {
    pub fn is_failure(&self) -> bool {
        matches!(self, NutrientStatus::Low { .. } | NutrientStatus::High { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedContribution {
    pub feed_id: String,
    pub name: String,
    pub quantity: f64,
    pub contributions: NutrientTotals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NutrientComparison {
    pub nutrient: Nutrient,
    pub calculated: f64,
    pub target: Option<f64>,
    #[serde(flatten)]
    pub status: NutrientStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ratios {
    pub ca_p: f64,
    pub me_cp: f64,
    pub ca_p_range: (f64, f64),
    pub ca_p_acceptable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RationWarning {
    NotNormalized {
        total: f64,
    },
    InclusionExceeded {
        feed: String,
        quantity: f64,
        max: f64,
    },
}

impl fmt::Display for RationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RationWarning::NotNormalized { total } => write!(
                f,
                "Total diet quantity is {} (expected 100). Calculating as absolute amounts.",
                total
            ),
            RationWarning::InclusionExceeded {
                feed,
                quantity,
                max,
            } => write!(
                f,
                "Constraint Warning: {} is at {}% (Max allowed: {}%)",
                feed, quantity, max
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RationReport {
    pub animal_id: String,
    pub animal_description: String,
    pub tolerance_pct: f64,
    pub total_quantity: f64,
    pub contributions: Vec<FeedContribution>,
    pub totals: NutrientTotals,
    pub comparisons: Vec<NutrientComparison>,
    pub ratios: Ratios,
    pub warnings: Vec<RationWarning>,
    pub verdict: Verdict,
}

impl RationReport {
    pub fn comparison(&self, nutrient: Nutrient) -> Option<&NutrientComparison> {
        self.comparisons.iter().find(|c| c.nutrient == nutrient)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PearsonResult {
    pub target: f64,
    pub feed1_value: f64,
    pub feed2_value: f64,
    pub parts1: f64,
    pub parts2: f64,
    pub pct1: f64,
    pub pct2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DilutionResult {
    pub start_conc: f64,
    pub target_conc: f64,
    pub dilution_factor: f64,
    pub water_parts: f64,
}
