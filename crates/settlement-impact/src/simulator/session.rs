use super::allocation::{
    installment_schedule, AllocationBreakdown, AllocationError, AllocationPlan,
    AllocationWarning, CategoryAllocationCheck, PerCapitaBreakdown, TopLevelAllocation,
};
use super::catalog::{CatalogError, ReferenceCatalog};
use super::domain::{
    Category, NationProfile, PaymentSchedule, PaymentType, DEFAULT_INSTALLMENT_YEARS,
    DEFAULT_PER_CAPITA_PCT, DEFAULT_PRIORITY_AREAS_PCT,
};
use super::impact::{calculate_impact, ImpactResult};
use super::reassessment::{reassess, SuccessFactorState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

/// Raw selections collected by a presentation layer.
///
/// Category and profile maps are keyed by category label or key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub nation: String,
    #[serde(default = "default_per_capita_pct")]
    pub per_capita_pct: i64,
    #[serde(default = "default_priority_areas_pct")]
    pub priority_areas_pct: i64,
    #[serde(default)]
    pub payment_type: PaymentType,
    #[serde(default)]
    pub installment_years: Option<i64>,
    #[serde(default)]
    pub category_pct: BTreeMap<String, i64>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Option<String>>,
}

fn default_per_capita_pct() -> i64 {
    i64::from(DEFAULT_PER_CAPITA_PCT)
}

fn default_priority_areas_pct() -> i64 {
    i64::from(DEFAULT_PRIORITY_AREAS_PCT)
}

impl SimulationRequest {
    pub fn new(nation: impl Into<String>) -> Self {
        Self {
            nation: nation.into(),
            per_capita_pct: default_per_capita_pct(),
            priority_areas_pct: default_priority_areas_pct(),
            payment_type: PaymentType::LumpSum,
            installment_years: None,
            category_pct: BTreeMap::new(),
            profiles: BTreeMap::new(),
        }
    }

    /// Resolves names against the catalog and range-checks every percentage.
    pub fn to_plan(&self, catalog: &ReferenceCatalog) -> Result<AllocationPlan, SimulationError> {
        let payment = match self.payment_type {
            PaymentType::LumpSum => PaymentSchedule::LumpSum,
            PaymentType::Installments => installment_schedule(
                self.installment_years
                    .unwrap_or(i64::from(DEFAULT_INSTALLMENT_YEARS)),
            )?,
        };

        let mut plan = AllocationPlan::new(self.per_capita_pct, self.priority_areas_pct)?
            .with_payment(payment)?;

        for (category, pct) in resolve_categories(catalog, &self.category_pct)? {
            plan.allocate(category, *pct)?;
        }

        for (category, profile_name) in resolve_categories(catalog, &self.profiles)? {
            let profile = match profile_name {
                Some(profile_name) => catalog.find_profile(category, profile_name)?.cloned(),
                None => None,
            };
            plan.choose_profile(category, profile);
        }

        Ok(plan)
    }
}

/// Resolves request keys, rejecting a category named twice (label and key).
pub(crate) fn resolve_categories<'a, V>(
    catalog: &ReferenceCatalog,
    entries: &'a BTreeMap<String, V>,
) -> Result<Vec<(Category, &'a V)>, SimulationError> {
    let mut seen = BTreeSet::new();
    entries
        .iter()
        .map(|(name, value)| {
            let category = catalog.category_by_name(name)?;
            if !seen.insert(category) {
                return Err(AllocationError::DuplicateCategory(category).into());
            }
            Ok((category, value))
        })
        .collect()
}

/// Every figure shown after one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationOutcome {
    pub nation: NationProfile,
    pub allocation: TopLevelAllocation,
    pub breakdown: AllocationBreakdown,
    pub per_capita: PerCapitaBreakdown,
    pub category_check: CategoryAllocationCheck,
    pub warnings: Vec<AllocationWarning>,
    pub impact: ImpactResult,
    pub success_factors: SuccessFactorState,
}

/// Runs validator, calculator, and reassessor against a shared catalog.
#[derive(Debug, Clone)]
pub struct SettlementSimulator {
    catalog: Arc<ReferenceCatalog>,
}

impl SettlementSimulator {
    pub fn new(catalog: Arc<ReferenceCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &ReferenceCatalog {
        &self.catalog
    }

    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationOutcome, SimulationError> {
        let nation = self.catalog.get_nation(&request.nation)?;
        let plan = request.to_plan(&self.catalog)?;
        let outcome = self.simulate(nation, &plan);

        info!(
            nation = %nation.name,
            one_time_impact = outcome.impact.one_time_impact,
            warnings = outcome.warnings.len(),
            "simulation completed"
        );

        Ok(outcome)
    }

    /// Evaluates an already validated plan for `nation`.
    pub fn simulate(&self, nation: &NationProfile, plan: &AllocationPlan) -> SimulationOutcome {
        let settlement_amount = nation.settlement_amount;
        let category_check = plan.category_check();
        let impact = calculate_impact(plan, settlement_amount);
        let success_factors = reassess(
            &nation.initial_success_factors,
            impact.one_time_impact,
            settlement_amount,
            &self.catalog.factor_weights(),
        );

        SimulationOutcome {
            nation: nation.clone(),
            allocation: plan.top_level(),
            breakdown: AllocationBreakdown::from_plan(plan, settlement_amount),
            per_capita: PerCapitaBreakdown::compute(plan, nation),
            category_check,
            warnings: category_check.warning().into_iter().collect(),
            impact,
            success_factors,
        }
    }
}

impl Default for SettlementSimulator {
    fn default() -> Self {
        Self::new(Arc::new(ReferenceCatalog::standard()))
    }
}
