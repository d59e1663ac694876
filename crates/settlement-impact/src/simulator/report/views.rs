use super::super::catalog::{ReferenceCatalog, NO_PROFILE_LABEL};
use super::super::domain::{Category, ExpenditureProfile, Location, NationProfile};
use super::super::impact::ImpactResult;
use super::super::session::SimulationOutcome;
use super::format_currency;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct NationView {
    pub name: String,
    pub location: Location,
    pub location_label: &'static str,
    pub population: u32,
    pub settlement_amount: f64,
    pub settlement_display: String,
    pub initial_success_factors: BTreeMap<String, f64>,
}

impl From<&NationProfile> for NationView {
    fn from(nation: &NationProfile) -> Self {
        Self {
            name: nation.name.clone(),
            location: nation.location,
            location_label: nation.location.label(),
            population: nation.population,
            settlement_amount: nation.settlement_amount,
            settlement_display: format_currency(nation.settlement_amount),
            initial_success_factors: nation.initial_success_factors.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileOptionView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_multiplier: Option<f64>,
}

impl From<Option<&ExpenditureProfile>> for ProfileOptionView {
    fn from(option: Option<&ExpenditureProfile>) -> Self {
        match option {
            Some(profile) => Self {
                name: profile.name.clone(),
                impact_multiplier: Some(profile.impact_multiplier),
            },
            None => Self {
                name: NO_PROFILE_LABEL.to_string(),
                impact_multiplier: None,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub category_label: &'static str,
    pub weight: f64,
    pub profiles: Vec<ProfileOptionView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub nations: Vec<NationView>,
    pub categories: Vec<CategoryView>,
}

impl CatalogView {
    pub fn from_catalog(catalog: &ReferenceCatalog) -> Self {
        let nations = catalog.list_nations().iter().map(NationView::from).collect();
        let categories = catalog
            .category_entries()
            .iter()
            .map(|entry| CategoryView {
                category: entry.category,
                category_label: entry.category.label(),
                weight: entry.weight,
                profiles: entry
                    .options()
                    .into_iter()
                    .map(ProfileOptionView::from)
                    .collect(),
            })
            .collect();

        Self {
            nations,
            categories,
        }
    }
}

/// One bar of the impact visualization.
#[derive(Debug, Clone, Serialize)]
pub struct ImpactRowView {
    pub category: Category,
    pub category_label: &'static str,
    pub allocation_pct: u8,
    pub profile_label: String,
    pub impact: f64,
    pub impact_display: String,
}

pub fn impact_rows(impact: &ImpactResult) -> Vec<ImpactRowView> {
    impact
        .per_category
        .iter()
        .map(|entry| ImpactRowView {
            category: entry.category,
            category_label: entry.category.label(),
            allocation_pct: entry.allocation_pct,
            profile_label: entry
                .profile
                .clone()
                .unwrap_or_else(|| NO_PROFILE_LABEL.to_string()),
            impact: entry.impact,
            impact_display: format_currency(entry.impact),
        })
        .collect()
}

/// Simulation outcome with display strings for presentation layers.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationView {
    #[serde(flatten)]
    pub outcome: SimulationOutcome,
    pub one_time_impact_display: String,
    pub recurring_impact_display: String,
    pub impact_rows: Vec<ImpactRowView>,
    pub warning_messages: Vec<String>,
}

impl From<SimulationOutcome> for SimulationView {
    fn from(outcome: SimulationOutcome) -> Self {
        Self {
            one_time_impact_display: format_currency(outcome.impact.one_time_impact),
            recurring_impact_display: format_currency(outcome.impact.recurring_impact),
            impact_rows: impact_rows(&outcome.impact),
            warning_messages: outcome
                .warnings
                .iter()
                .map(|warning| warning.message())
                .collect(),
            outcome,
        }
    }
}
