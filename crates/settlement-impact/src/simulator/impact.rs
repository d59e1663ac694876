use super::allocation::AllocationPlan;
use super::domain::{Category, ExpenditureProfile, RECURRING_IMPACT_RATIO};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Modeled impact of one priority area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryImpact {
    pub category: Category,
    pub allocation_pct: u8,
    pub profile: Option<String>,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactResult {
    pub one_time_impact: f64,
    pub recurring_impact: f64,
    pub per_category: Vec<CategoryImpact>,
}

impl ImpactResult {
    pub fn category_impact(&self, category: Category) -> f64 {
        self.per_category
            .iter()
            .find(|entry| entry.category == category)
            .map_or(0.0, |entry| entry.impact)
    }
}

/// `(pct / 100) * settlement * multiplier`, or zero without a profile.
pub fn category_impact(
    allocation_pct: u8,
    settlement_amount: f64,
    profile: Option<&ExpenditureProfile>,
) -> f64 {
    match profile {
        Some(profile) => {
            (f64::from(allocation_pct) / 100.0) * settlement_amount * profile.impact_multiplier
        }
        None => 0.0,
    }
}

/// Computes per-category, one-time, and recurring impact for a plan.
///
/// Category percentages are applied as fractions of the whole settlement and
/// are not clamped, so over-allocated plans still produce figures.
pub fn calculate_impact(plan: &AllocationPlan, settlement_amount: f64) -> ImpactResult {
    let per_category = Category::ordered()
        .into_iter()
        .map(|category| {
            let allocation_pct = plan.category_pct(category);
            let profile = plan.chosen_profile(category);
            CategoryImpact {
                category,
                allocation_pct,
                profile: profile.map(|profile| profile.name.clone()),
                impact: category_impact(allocation_pct, settlement_amount, profile),
            }
        })
        .collect::<Vec<_>>();

    let one_time_impact: f64 = per_category.iter().map(|entry| entry.impact).sum();
    let recurring_impact = one_time_impact * RECURRING_IMPACT_RATIO;

    debug!(one_time_impact, recurring_impact, "calculated settlement impact");

    ImpactResult {
        one_time_impact,
        recurring_impact,
        per_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn education_plan() -> AllocationPlan {
        let mut plan = AllocationPlan::default();
        plan.allocate(Category::Education, 50).expect("valid pct");
        plan.choose_profile(
            Category::Education,
            Some(ExpenditureProfile::new("Build Schools", 1.5)),
        );
        plan
    }

    #[test]
    fn education_scenario_matches_expected_figures() {
        let result = calculate_impact(&education_plan(), 1_000_000.0);

        assert_eq!(result.category_impact(Category::Education), 750_000.0);
        assert_eq!(result.one_time_impact, 750_000.0);
        assert_eq!(result.recurring_impact, 37_500.0);
        assert_eq!(result.per_category.len(), 5);
    }

    #[test]
    fn allocation_without_profile_contributes_nothing() {
        let mut plan = education_plan();
        plan.allocate(Category::Housing, 40).expect("valid pct");

        let result = calculate_impact(&plan, 1_000_000.0);
        assert_eq!(result.category_impact(Category::Housing), 0.0);
        assert_eq!(result.one_time_impact, 750_000.0);
    }

    #[test]
    fn profile_without_allocation_contributes_nothing() {
        assert_eq!(
            category_impact(0, 1_000_000.0, Some(&ExpenditureProfile::new("Scholarships", 1.2))),
            0.0
        );
    }

    #[test]
    fn zero_settlement_yields_zero_impact() {
        let result = calculate_impact(&education_plan(), 0.0);
        assert_eq!(result.one_time_impact, 0.0);
        assert_eq!(result.recurring_impact, 0.0);
        assert!(result.per_category.iter().all(|entry| entry.impact == 0.0));
    }

    #[test]
    fn impact_is_linear_in_settlement() {
        let plan = education_plan();
        let single = calculate_impact(&plan, 1_250_000.0);
        let double = calculate_impact(&plan, 2_500_000.0);
        assert_eq!(double.one_time_impact, single.one_time_impact * 2.0);
    }

    #[test]
    fn repeated_calculation_is_identical() {
        let plan = education_plan();
        let first = calculate_impact(&plan, 3_333_333.0);
        let second = calculate_impact(&plan, 3_333_333.0);
        assert_eq!(first.one_time_impact.to_bits(), second.one_time_impact.to_bits());
        assert_eq!(first, second);
    }
}
