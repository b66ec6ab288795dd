//! Ration evaluation: weighted nutrient totals checked against an animal standard.

use crate::core::diet::parse_diet;
use crate::core::reference::ReferenceData;
use crate::core::resolver::{resolve, MatchSettings};
use crate::domain::model::{AnimalStandard, DietEntry, Feed, Nutrient, NutrientTotals};
use crate::domain::report::{
    FeedContribution, NutrientComparison, NutrientStatus, RationReport, RationWarning, Ratios,
    Verdict,
};
use crate::utils::error::{RecordKind, Result};
use serde::{Deserialize, Serialize};

pub const NORMALIZED_TOTAL: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckSettings {
    /// Allowed distance of the summed quantities from 100 before warning.
    pub normalization_tolerance: f64,
    pub ca_p_min: f64,
    pub ca_p_max: f64,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            normalization_tolerance: 0.1,
            ca_p_min: 1.2,
            ca_p_max: 3.5,
        }
    }
}

pub struct RationEvaluator<'a> {
    data: &'a ReferenceData,
    check: CheckSettings,
    matching: MatchSettings,
}

impl<'a> RationEvaluator<'a> {
    pub fn new(data: &'a ReferenceData) -> Self {
        Self::with_settings(data, CheckSettings::default(), MatchSettings::default())
    }

    pub fn with_settings(
        data: &'a ReferenceData,
        check: CheckSettings,
        matching: MatchSettings,
    ) -> Self {
        Self {
            data,
            check,
            matching,
        }
    }

    /// Resolves the animal and every feed of `diet`, then evaluates the ration.
    pub fn evaluate(&self, animal_id: &str, diet: &str) -> Result<RationReport> {
        let standard = resolve(
            animal_id,
            &self.data.standards,
            RecordKind::Animal,
            &self.matching,
        )?;
        let entries = parse_diet(diet)?;
        self.evaluate_entries(standard, &entries)
    }

    /// Evaluates already-parsed entries; feeds are still looked up by ID.
    pub fn evaluate_entries(
        &self,
        standard: &AnimalStandard,
        entries: &[DietEntry],
    ) -> Result<RationReport> {
        let resolved = entries
            .iter()
            .map(|entry| {
                resolve(
                    &entry.feed_id,
                    &self.data.feeds,
                    RecordKind::Feed,
                    &self.matching,
                )
                .map(|feed| (feed, entry.quantity))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.evaluate_resolved(standard, &resolved))
    }

    fn evaluate_resolved(&self, standard: &AnimalStandard, diet: &[(&Feed, f64)]) -> RationReport {
        let mut warnings = Vec::new();

        let total_quantity: f64 = diet.iter().map(|(_, quantity)| quantity).sum();
        if (total_quantity - NORMALIZED_TOTAL).abs() > self.check.normalization_tolerance {
            tracing::debug!(
                "Diet total is {} rather than {}, treating quantities as absolute amounts",
                total_quantity,
                NORMALIZED_TOTAL
            );
            warnings.push(RationWarning::NotNormalized {
                total: total_quantity,
            });
        }

        let mut totals = NutrientTotals::default();
        let mut contributions = Vec::with_capacity(diet.len());
        for (feed, quantity) in diet {
            if *quantity > feed.max_inclusion_pct {
                tracing::debug!(
                    "{} at {} exceeds its inclusion ceiling of {}",
                    feed.name,
                    quantity,
                    feed.max_inclusion_pct
                );
                warnings.push(RationWarning::InclusionExceeded {
                    feed: feed.name.clone(),
                    quantity: *quantity,
                    max: feed.max_inclusion_pct,
                });
            }

            let row = feed_contribution(feed, *quantity);
            totals.merge(&row.contributions);
            contributions.push(row);
        }

        let comparisons: Vec<NutrientComparison> = Nutrient::ALL
            .iter()
            .map(|&nutrient| {
                let target = standard.target(nutrient);
                let calculated = totals.get(nutrient);
                NutrientComparison {
                    nutrient,
                    calculated,
                    target,
                    status: compare(calculated, target, standard.tolerance_pct),
                }
            })
            .collect();

        let verdict = if comparisons.iter().any(|c| c.status.is_failure()) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };

        let ca_p = totals.ca_p_ratio();
        let ratios = Ratios {
            ca_p,
            me_cp: totals.me_cp_ratio(),
            ca_p_range: (self.check.ca_p_min, self.check.ca_p_max),
            ca_p_acceptable: (self.check.ca_p_min..=self.check.ca_p_max).contains(&ca_p),
        };

        tracing::debug!(
            "Evaluated {} feeds for {}: {}",
            contributions.len(),
            standard.animal_id,
            verdict
        );

        RationReport {
            animal_id: standard.animal_id.clone(),
            animal_description: standard.description.clone(),
            tolerance_pct: standard.tolerance_pct,
            total_quantity,
            contributions,
            totals,
            comparisons,
            ratios,
            warnings,
            verdict,
        }
    }
}

pub fn feed_contribution(feed: &Feed, quantity: f64) -> FeedContribution {
    let mut contributions = NutrientTotals::default();
    for nutrient in Nutrient::ALL {
        contributions.add(nutrient, feed.contribution(nutrient, quantity));
    }
    FeedContribution {
        feed_id: feed.feed_id.clone(),
        name: feed.name.clone(),
        quantity,
        contributions,
    }
}

/// OK iff `target * (1 - tol/100) <= calculated <= target * (1 + tol/100)`.
pub fn compare(calculated: f64, target: Option<f64>, tolerance_pct: f64) -> NutrientStatus {
    let Some(target) = target else {
        return NutrientStatus::NotApplicable;
    };

    let tolerance = tolerance_pct / 100.0;
    let low = target * (1.0 - tolerance);
    let high = target * (1.0 + tolerance);

    if low <= calculated && calculated <= high {
        NutrientStatus::Ok
    } else if calculated < low {
        NutrientStatus::Low {
            deviation_pct: deviation_pct(calculated, target),
        }
    } else {
        NutrientStatus::High {
            deviation_pct: deviation_pct(calculated, target),
        }
    }
}

fn deviation_pct(calculated: f64, target: f64) -> f64 {
    if target == 0.0 {
        // any non-zero amount is infinitely far from a zero target
        return f64::INFINITY.copysign(calculated);
    }
    (calculated - target) / target * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::RationError;
    use approx::assert_relative_eq;

    fn feed(id: &str, max: f64, values: [f64; 5]) -> Feed {
        Feed {
            feed_id: id.to_string(),
            name: format!("{} feed", id),
            max_inclusion_pct: max,
            me_per_kg: values[0],
            cp_pct: values[1],
            ca_pct: values[2],
            p_pct: values[3],
            lysine_pct: values[4],
        }
    }

    fn standard(id: &str, lysine: Option<f64>) -> AnimalStandard {
        AnimalStandard {
            animal_id: id.to_string(),
            description: format!("{} standard", id),
            tolerance_pct: 10.0,
            me_target: 3000.0,
            cp_target: 18.0,
            ca_target: 1.0,
            p_target: 0.5,
            lysine_target: lysine,
        }
    }

    fn data() -> ReferenceData {
        ReferenceData::new(
            vec![standard("XYZ1", None), standard("BRO", Some(1.0))],
            vec![
                feed("F1", 60.0, [3000.0, 18.0, 1.0, 0.5, 1.0]),
                feed("F2", 50.0, [3000.0, 18.0, 1.0, 0.5, 1.0]),
                feed("LOW", 100.0, [2500.0, 18.0, 1.0, 0.5, 1.0]),
            ],
        )
    }

    #[test]
    fn test_compare_tolerance_window_is_inclusive() {
        assert_eq!(compare(3300.0, Some(3000.0), 10.0), NutrientStatus::Ok);
        assert_eq!(compare(2700.0, Some(3000.0), 10.0), NutrientStatus::Ok);
        assert_eq!(compare(3100.0, Some(3000.0), 10.0), NutrientStatus::Ok);
        assert_eq!(compare(17.0, Some(18.0), 10.0), NutrientStatus::Ok);
        assert_eq!(compare(1.0, None, 10.0), NutrientStatus::NotApplicable);
    }

    #[test]
    fn test_compare_reports_signed_deviation() {
        match compare(2500.0, Some(3000.0), 10.0) {
            NutrientStatus::Low { deviation_pct } => {
                assert_relative_eq!(deviation_pct, -16.666666, epsilon = 1e-5)
            }
            other => panic!("expected LOW, got {:?}", other),
        }
        match compare(24.0, Some(20.0), 10.0) {
            NutrientStatus::High { deviation_pct } => assert_relative_eq!(deviation_pct, 20.0),
            other => panic!("expected HIGH, got {:?}", other),
        }
    }

    #[test]
    fn test_compare_zero_target() {
        assert_eq!(compare(0.0, Some(0.0), 5.0), NutrientStatus::Ok);
        assert!(matches!(
            compare(0.1, Some(0.0), 5.0),
            NutrientStatus::High { deviation_pct } if deviation_pct.is_infinite()
        ));
    }

    #[test]
    fn test_balanced_diet_passes() {
        let data = data();
        let report = RationEvaluator::new(&data)
            .evaluate("BRO", "F1:50,F2:50")
            .unwrap();

        assert_eq!(report.verdict, Verdict::Pass);
        assert!(report.warnings.is_empty());
        assert_relative_eq!(report.totals.get(Nutrient::Me), 3000.0);
        assert_relative_eq!(report.ratios.ca_p, 2.0);
        assert!(report.ratios.ca_p_acceptable);
        assert_relative_eq!(report.ratios.me_cp, 3000.0 / 18.0);
    }

    #[test]
    fn test_low_energy_fails() {
        let data = data();
        let report = RationEvaluator::new(&data).evaluate("BRO", "LOW:100").unwrap();

        assert_eq!(report.verdict, Verdict::Fail);
        let me = report.comparison(Nutrient::Me).unwrap();
        assert!(matches!(me.status, NutrientStatus::Low { .. }));
        assert_eq!(
            report.comparison(Nutrient::Cp).unwrap().status,
            NutrientStatus::Ok
        );
    }

    #[test]
    fn test_missing_lysine_target_never_fails() {
        let data = ReferenceData::new(
            vec![standard("NOLYS", None)],
            vec![feed("F1", 100.0, [3000.0, 18.0, 1.0, 0.5, 50.0])],
        );
        let report = RationEvaluator::new(&data).evaluate("NOLYS", "F1:100").unwrap();

        assert_eq!(
            report.comparison(Nutrient::Lysine).unwrap().status,
            NutrientStatus::NotApplicable
        );
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn test_unnormalized_total_warns_and_keeps_quantities() {
        let data = data();
        let report = RationEvaluator::new(&data)
            .evaluate("BRO", "F1:50,F2:60")
            .unwrap();

        assert_relative_eq!(report.total_quantity, 110.0);
        assert!(report
            .warnings
            .contains(&RationWarning::NotNormalized { total: 110.0 }));
        assert_relative_eq!(report.totals.get(Nutrient::Me), 3300.0);
        assert_relative_eq!(report.contributions[1].quantity, 60.0);
    }

    #[test]
    fn test_inclusion_ceiling_warns_without_failing() {
        let data = data();
        let report = RationEvaluator::new(&data)
            .evaluate("BRO", "F2:70,F1:30")
            .unwrap();

        assert_eq!(
            report.warnings,
            vec![RationWarning::InclusionExceeded {
                feed: "F2 feed".to_string(),
                quantity: 70.0,
                max: 50.0
            }]
        );
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn test_totals_equal_sum_of_contributions() {
        let data = data();
        let evaluator = RationEvaluator::new(&data);
        let whole = evaluator.evaluate("BRO", "F1:20,LOW:30,F2:50").unwrap();

        for nutrient in Nutrient::ALL {
            let summed: f64 = whole
                .contributions
                .iter()
                .map(|row| row.contributions.get(nutrient))
                .sum();
            assert_relative_eq!(whole.totals.get(nutrient), summed, epsilon = 1e-9);
        }

        // splitting one entry in two leaves the totals unchanged
        let split = evaluator
            .evaluate("BRO", "F1:20,LOW:10,LOW:20,F2:50")
            .unwrap();
        for nutrient in Nutrient::ALL {
            assert_relative_eq!(
                whole.totals.get(nutrient),
                split.totals.get(nutrient),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_unknown_animal_suggests_close_match() {
        let data = data();
        let err = RationEvaluator::new(&data)
            .evaluate("XYZ", "F1:100")
            .unwrap_err();
        match err {
            RationError::NotFound {
                kind,
                id,
                suggestions,
            } => {
                assert_eq!(kind, RecordKind::Animal);
                assert_eq!(id, "XYZ");
                assert_eq!(suggestions, vec!["XYZ1".to_string()]);
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_feed_is_fatal() {
        let data = data();
        let err = RationEvaluator::new(&data)
            .evaluate("BRO", "F1:50,F22:50")
            .unwrap_err();
        assert_eq!(err.to_string(), "Feed ID 'F22' not found. Did you mean: F2?");
    }

    #[test]
    fn test_zero_phosphorus_gives_zero_ratio() {
        let data = ReferenceData::new(
            vec![standard("BRO", None)],
            vec![feed("WATER", 100.0, [0.0, 0.0, 0.0, 0.0, 0.0])],
        );
        let report = RationEvaluator::new(&data).evaluate("BRO", "WATER:100").unwrap();
        assert_eq!(report.ratios.ca_p, 0.0);
        assert_eq!(report.ratios.me_cp, 0.0);
        assert!(!report.ratios.ca_p_acceptable);
        assert_eq!(report.verdict, Verdict::Fail);
    }

    #[test]
    fn test_ca_p_outside_band_does_not_change_verdict() {
        let mut high_calcium = standard("LAYER", None);
        high_calcium.ca_target = 4.0;
        let data = ReferenceData::new(
            vec![high_calcium],
            vec![feed("SHELL", 100.0, [3000.0, 18.0, 4.0, 0.5, 0.0])],
        );
        let report = RationEvaluator::new(&data).evaluate("LAYER", "SHELL:100").unwrap();

        assert!(report
            .comparisons
            .iter()
            .all(|c| matches!(c.status, NutrientStatus::Ok | NutrientStatus::NotApplicable)));
        assert_relative_eq!(report.ratios.ca_p, 8.0);
        assert!(!report.ratios.ca_p_acceptable);
        assert!(report.warnings.is_empty());
        assert_eq!(report.verdict, Verdict::Pass);
    }

    #[test]
    fn test_single_high_nutrient_fails() {
        let data = ReferenceData::new(
            vec![standard("BRO", None)],
            vec![feed("PROT", 100.0, [3000.0, 30.0, 1.0, 0.5, 1.0])],
        );
        let report = RationEvaluator::new(&data).evaluate("BRO", "PROT:100").unwrap();

        match report.comparison(Nutrient::Cp).unwrap().status {
            NutrientStatus::High { deviation_pct } => {
                assert!(deviation_pct > 0.0);
                assert_relative_eq!(deviation_pct, 200.0 / 3.0, epsilon = 1e-9);
            }
            other => panic!("expected HIGH, got {:?}", other),
        }
        let failures = report
            .comparisons
            .iter()
            .filter(|c| c.status.is_failure())
            .count();
        assert_eq!(failures, 1);
        assert_eq!(report.verdict, Verdict::Fail);
    }

    #[test]
    fn test_evaluate_entries_skips_parsing() {
        let data = data();
        let entries = vec![DietEntry {
            feed_id: "F1".to_string(),
            quantity: 100.0,
        }];
        let report = RationEvaluator::new(&data)
            .evaluate_entries(&data.standards[1], &entries)
            .unwrap();
        assert_eq!(report.animal_id, "BRO");
        assert_eq!(report.verdict, Verdict::Pass);
    }
}
