use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::allocation::{percent, validate_category_allocation, validate_top_level};
use super::report::{CatalogView, NationView, SimulationView};
use super::session::{resolve_categories, SettlementSimulator, SimulationRequest};
use crate::error::AppError;

/// Routes exposing the catalog, the validator, and full simulations.
pub fn simulation_router(simulator: Arc<SettlementSimulator>) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(catalog_handler))
        .route("/api/v1/nations/:name", get(nation_handler))
        .route("/api/v1/allocations/validate", post(validate_handler))
        .route("/api/v1/simulations", post(simulate_handler))
        .with_state(simulator)
}

pub(crate) async fn catalog_handler(
    State(simulator): State<Arc<SettlementSimulator>>,
) -> Json<CatalogView> {
    Json(CatalogView::from_catalog(simulator.catalog()))
}

pub(crate) async fn nation_handler(
    State(simulator): State<Arc<SettlementSimulator>>,
    Path(name): Path<String>,
) -> Result<Json<NationView>, AppError> {
    let nation = simulator.catalog().get_nation(&name)?;
    Ok(Json(NationView::from(nation)))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ValidationRequest {
    pub(crate) per_capita_pct: i64,
    pub(crate) priority_areas_pct: i64,
    #[serde(default)]
    pub(crate) category_pct: BTreeMap<String, i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidationResponse {
    pub(crate) per_capita_pct: u8,
    pub(crate) priority_areas_pct: u8,
    pub(crate) savings_pct: u8,
    pub(crate) is_valid: bool,
    pub(crate) category_total_pct: u32,
    pub(crate) exceeds: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) warning: Option<String>,
}

pub(crate) async fn validate_handler(
    State(simulator): State<Arc<SettlementSimulator>>,
    Json(request): Json<ValidationRequest>,
) -> Result<Json<ValidationResponse>, AppError> {
    let top_level = validate_top_level(request.per_capita_pct, request.priority_areas_pct)?;

    let mut per_category = BTreeMap::new();
    for (category, pct) in resolve_categories(simulator.catalog(), &request.category_pct)? {
        per_category.insert(category, percent(category.label(), *pct)?);
    }
    let check = validate_category_allocation(&per_category);

    Ok(Json(ValidationResponse {
        per_capita_pct: top_level.per_capita_pct,
        priority_areas_pct: top_level.priority_areas_pct,
        savings_pct: top_level.savings_pct,
        is_valid: top_level.is_valid,
        category_total_pct: check.total_pct,
        exceeds: check.exceeds,
        warning: check.warning().map(|warning| warning.message()),
    }))
}

pub(crate) async fn simulate_handler(
    State(simulator): State<Arc<SettlementSimulator>>,
    Json(request): Json<SimulationRequest>,
) -> Result<Json<SimulationView>, AppError> {
    let outcome = simulator.run(&request)?;
    Ok(Json(SimulationView::from(outcome)))
}
