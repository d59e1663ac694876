use super::domain::DEFAULT_FACTOR_WEIGHT;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReassessmentError {
    #[error("settlement amount is zero; impact ratio is undefined")]
    ZeroSettlement,
}

/// Weight table consulted when reassessing success factors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorWeights(BTreeMap<String, f64>);

impl FactorWeights {
    /// Weight for `factor`, or [`DEFAULT_FACTOR_WEIGHT`] when absent.
    pub fn weight(&self, factor: &str) -> f64 {
        self.0
            .get(factor)
            .copied()
            .unwrap_or(DEFAULT_FACTOR_WEIGHT)
    }
}

impl FromIterator<(String, f64)> for FactorWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorAssessment {
    pub factor: String,
    pub initial_score: f64,
    pub weight: f64,
    pub updated_score: f64,
    /// Scores are never clamped; this marks values that left `0..=1`.
    pub exceeds_unit_range: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessFactorState {
    pub factors: Vec<FactorAssessment>,
    /// `None` when the settlement was zero and scores were left unchanged.
    pub impact_ratio: Option<f64>,
}

impl SuccessFactorState {
    pub fn score(&self, factor: &str) -> Option<f64> {
        self.factors
            .iter()
            .find(|assessment| assessment.factor == factor)
            .map(|assessment| assessment.updated_score)
    }

    pub fn updated_scores(&self) -> BTreeMap<String, f64> {
        self.factors
            .iter()
            .map(|assessment| (assessment.factor.clone(), assessment.updated_score))
            .collect()
    }
}

/// One-time impact relative to the settlement it came from.
pub fn impact_ratio(
    one_time_impact: f64,
    settlement_amount: f64,
) -> Result<f64, ReassessmentError> {
    if settlement_amount == 0.0 {
        return Err(ReassessmentError::ZeroSettlement);
    }
    Ok(one_time_impact / settlement_amount)
}

/// Applies `initial + ratio * weight(factor)` to every initial factor.
///
/// A zero settlement leaves every score at its initial value.
pub fn reassess(
    initial_factors: &BTreeMap<String, f64>,
    one_time_impact: f64,
    settlement_amount: f64,
    weights: &FactorWeights,
) -> SuccessFactorState {
    let ratio = match impact_ratio(one_time_impact, settlement_amount) {
        Ok(ratio) => Some(ratio),
        Err(err) => {
            warn!(%err, "success factors left unchanged");
            None
        }
    };

    let factors = initial_factors
        .iter()
        .map(|(factor, &initial_score)| {
            let weight = weights.weight(factor);
            let updated_score = match ratio {
                Some(ratio) => initial_score + ratio * weight,
                None => initial_score,
            };
            FactorAssessment {
                factor: factor.clone(),
                initial_score,
                weight,
                updated_score,
                exceeds_unit_range: !(0.0..=1.0).contains(&updated_score),
            }
        })
        .collect::<Vec<_>>();

    debug!(factors = factors.len(), ?ratio, "reassessed success factors");

    SuccessFactorState {
        factors,
        impact_ratio: ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> BTreeMap<String, f64> {
        BTreeMap::from([
            ("Investment Facilitation".to_string(), 0.6),
            ("Economic Opportunity Realization".to_string(), 0.5),
        ])
    }

    fn weights() -> FactorWeights {
        FactorWeights::from_iter([
            ("Education".to_string(), 1.5),
            ("Investment Facilitation".to_string(), 2.0),
        ])
    }

    #[test]
    fn applies_weighted_ratio_per_factor() {
        let state = reassess(&initial(), 250_000.0, 1_000_000.0, &weights());

        assert_eq!(state.impact_ratio, Some(0.25));
        let investment = state.score("Investment Facilitation").expect("present");
        assert!((investment - 1.1).abs() < 1e-12);
        let opportunity = state
            .score("Economic Opportunity Realization")
            .expect("present");
        assert!((opportunity - 0.75).abs() < 1e-12);
    }

    #[test]
    fn does_not_clamp_scores_above_one() {
        let state = reassess(&initial(), 750_000.0, 1_000_000.0, &FactorWeights::default());

        let investment = state
            .factors
            .iter()
            .find(|assessment| assessment.factor == "Investment Facilitation")
            .expect("present");
        assert!((investment.updated_score - 1.35).abs() < 1e-12);
        assert!(investment.exceeds_unit_range);
        assert_eq!(investment.weight, DEFAULT_FACTOR_WEIGHT);
    }

    #[test]
    fn zero_settlement_keeps_initial_scores() {
        let state = reassess(&initial(), 500_000.0, 0.0, &weights());

        assert_eq!(state.impact_ratio, None);
        assert_eq!(state.updated_scores(), initial());
        assert!(state.factors.iter().all(|factor| !factor.exceeds_unit_range));
    }

    #[test]
    fn impact_ratio_guards_division_by_zero() {
        assert_eq!(
            impact_ratio(10.0, 0.0),
            Err(ReassessmentError::ZeroSettlement)
        );
        assert_eq!(impact_ratio(10.0, 40.0), Ok(0.25));
    }
}
