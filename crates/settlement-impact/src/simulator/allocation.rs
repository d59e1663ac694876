use super::domain::{
    Category, ExpenditureProfile, NationProfile, PaymentSchedule, DEFAULT_PER_CAPITA_PCT,
    DEFAULT_PRIORITY_AREAS_PCT, MAX_INSTALLMENT_YEARS, MIN_INSTALLMENT_YEARS,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const PERCENT_TOTAL: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    #[error("{field} must be between 0 and 100 percent, got {value}")]
    OutOfRange { field: String, value: i64 },
    #[error("per capita and priority areas total {total}%, exceeding 100%")]
    TopLevelOverflow { total: i64 },
    #[error("installment years must be between 1 and 20, got {0}")]
    InvalidInstallmentYears(i64),
    #[error("{0} was allocated more than once")]
    DuplicateCategory(Category),
}

/// Validated split of the settlement; savings is always the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TopLevelInput")]
pub struct TopLevelAllocation {
    pub per_capita_pct: u8,
    pub priority_areas_pct: u8,
    pub savings_pct: u8,
    pub is_valid: bool,
}

/// Deserialized shares; savings is recomputed rather than trusted.
#[derive(Debug, Deserialize)]
struct TopLevelInput {
    per_capita_pct: i64,
    priority_areas_pct: i64,
}

impl TryFrom<TopLevelInput> for TopLevelAllocation {
    type Error = AllocationError;

    fn try_from(input: TopLevelInput) -> Result<Self, Self::Error> {
        validate_top_level(input.per_capita_pct, input.priority_areas_pct)
    }
}

pub fn validate_top_level(
    per_capita_pct: i64,
    priority_areas_pct: i64,
) -> Result<TopLevelAllocation, AllocationError> {
    let per_capita = percent("per capita distribution", per_capita_pct)?;
    let priority_areas = percent("priority areas", priority_areas_pct)?;

    let total = per_capita_pct + priority_areas_pct;
    if total > i64::from(PERCENT_TOTAL) {
        return Err(AllocationError::TopLevelOverflow { total });
    }

    Ok(TopLevelAllocation {
        per_capita_pct: per_capita,
        priority_areas_pct: priority_areas,
        savings_pct: PERCENT_TOTAL - per_capita - priority_areas,
        is_valid: true,
    })
}

/// Range-checks a single percentage input.
pub fn percent(field: &str, value: i64) -> Result<u8, AllocationError> {
    u8::try_from(value)
        .ok()
        .filter(|pct| *pct <= PERCENT_TOTAL)
        .ok_or_else(|| AllocationError::OutOfRange {
            field: field.to_string(),
            value,
        })
}

pub fn installment_schedule(years: i64) -> Result<PaymentSchedule, AllocationError> {
    u8::try_from(years)
        .ok()
        .filter(|years| (MIN_INSTALLMENT_YEARS..=MAX_INSTALLMENT_YEARS).contains(years))
        .map(|years| PaymentSchedule::Installments { years })
        .ok_or(AllocationError::InvalidInstallmentYears(years))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocationCheck {
    pub total_pct: u32,
    pub exceeds: bool,
}

impl CategoryAllocationCheck {
    pub fn warning(&self) -> Option<AllocationWarning> {
        self.exceeds.then_some(AllocationWarning::OverAllocation {
            total_pct: self.total_pct,
        })
    }
}

/// Non-fatal conditions surfaced next to computed results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationWarning {
    OverAllocation { total_pct: u32 },
}

impl AllocationWarning {
    pub fn message(&self) -> String {
        match self {
            Self::OverAllocation { total_pct } => format!(
                "Total allocation for priority areas is {total_pct}%, exceeding 100%. Adjust your allocations."
            ),
        }
    }
}

/// Sums category percentages without clamping them.
pub fn validate_category_allocation(
    per_category_pct: &BTreeMap<Category, u8>,
) -> CategoryAllocationCheck {
    let total_pct: u32 = per_category_pct.values().map(|pct| u32::from(*pct)).sum();
    let exceeds = total_pct > u32::from(PERCENT_TOTAL);
    if exceeds {
        warn!(total_pct, "priority area allocations exceed 100%");
    }
    CategoryAllocationCheck { total_pct, exceeds }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub pct: u8,
    pub profile: Option<ExpenditureProfile>,
}

/// One session's choices, passed explicitly into every calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AllocationPlanInput")]
pub struct AllocationPlan {
    top_level: TopLevelAllocation,
    payment: PaymentSchedule,
    categories: BTreeMap<Category, CategoryAllocation>,
}

#[derive(Debug, Deserialize)]
struct AllocationPlanInput {
    top_level: TopLevelAllocation,
    #[serde(default)]
    payment: PaymentSchedule,
    #[serde(default)]
    categories: BTreeMap<Category, CategoryAllocation>,
}

impl TryFrom<AllocationPlanInput> for AllocationPlan {
    type Error = AllocationError;

    fn try_from(input: AllocationPlanInput) -> Result<Self, Self::Error> {
        let mut plan = Self::from_top_level(input.top_level).with_payment(input.payment)?;
        for (category, allocation) in input.categories {
            plan.allocate(category, i64::from(allocation.pct))?;
            plan.choose_profile(category, allocation.profile);
        }
        Ok(plan)
    }
}

impl AllocationPlan {
    pub fn new(per_capita_pct: i64, priority_areas_pct: i64) -> Result<Self, AllocationError> {
        validate_top_level(per_capita_pct, priority_areas_pct).map(Self::from_top_level)
    }

    fn from_top_level(top_level: TopLevelAllocation) -> Self {
        Self {
            top_level,
            payment: PaymentSchedule::LumpSum,
            categories: Category::ordered()
                .into_iter()
                .map(|category| (category, CategoryAllocation::default()))
                .collect(),
        }
    }

    pub fn with_payment(mut self, payment: PaymentSchedule) -> Result<Self, AllocationError> {
        if let PaymentSchedule::Installments { years } = payment {
            installment_schedule(i64::from(years))?;
        }
        self.payment = payment;
        Ok(self)
    }

    pub fn allocate(&mut self, category: Category, pct: i64) -> Result<(), AllocationError> {
        let pct = percent(category.label(), pct)?;
        self.categories.entry(category).or_default().pct = pct;
        Ok(())
    }

    pub fn choose_profile(&mut self, category: Category, profile: Option<ExpenditureProfile>) {
        self.categories.entry(category).or_default().profile = profile;
    }

    pub fn top_level(&self) -> TopLevelAllocation {
        self.top_level
    }

    pub fn per_capita_pct(&self) -> u8 {
        self.top_level.per_capita_pct
    }

    pub fn priority_areas_pct(&self) -> u8 {
        self.top_level.priority_areas_pct
    }

    pub fn savings_pct(&self) -> u8 {
        self.top_level.savings_pct
    }

    pub fn payment(&self) -> PaymentSchedule {
        self.payment
    }

    pub fn category_pct(&self, category: Category) -> u8 {
        self.categories
            .get(&category)
            .map_or(0, |allocation| allocation.pct)
    }

    pub fn chosen_profile(&self, category: Category) -> Option<&ExpenditureProfile> {
        self.categories
            .get(&category)
            .and_then(|allocation| allocation.profile.as_ref())
    }

    pub fn per_category_pct(&self) -> BTreeMap<Category, u8> {
        self.categories
            .iter()
            .map(|(category, allocation)| (*category, allocation.pct))
            .collect()
    }

    pub fn category_check(&self) -> CategoryAllocationCheck {
        validate_category_allocation(&self.per_category_pct())
    }
}

impl Default for AllocationPlan {
    fn default() -> Self {
        Self::from_top_level(TopLevelAllocation {
            per_capita_pct: DEFAULT_PER_CAPITA_PCT,
            priority_areas_pct: DEFAULT_PRIORITY_AREAS_PCT,
            savings_pct: PERCENT_TOTAL - DEFAULT_PER_CAPITA_PCT - DEFAULT_PRIORITY_AREAS_PCT,
            is_valid: true,
        })
    }
}

/// Currency value of each top-level share.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AllocationBreakdown {
    pub per_capita: f64,
    pub priority_areas: f64,
    pub savings: f64,
}

impl AllocationBreakdown {
    pub fn from_plan(plan: &AllocationPlan, settlement_amount: f64) -> Self {
        Self {
            per_capita: share(plan.per_capita_pct(), settlement_amount),
            priority_areas: share(plan.priority_areas_pct(), settlement_amount),
            savings: share(plan.savings_pct(), settlement_amount),
        }
    }
}

/// What each member receives from the per capita pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerCapitaBreakdown {
    pub payment: PaymentSchedule,
    pub pool: f64,
    pub per_member: f64,
    pub per_member_per_year: f64,
}

impl PerCapitaBreakdown {
    pub fn compute(plan: &AllocationPlan, nation: &NationProfile) -> Self {
        let pool = share(plan.per_capita_pct(), nation.settlement_amount);
        let per_member = if nation.population == 0 {
            0.0
        } else {
            pool / f64::from(nation.population)
        };
        let payment = plan.payment();
        Self {
            payment,
            pool,
            per_member,
            per_member_per_year: per_member / f64::from(payment.years().max(1)),
        }
    }
}

fn share(pct: u8, settlement_amount: f64) -> f64 {
    (f64::from(pct) / 100.0) * settlement_amount
}
