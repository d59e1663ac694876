use metrics_exporter_prometheus::PrometheusHandle;
use settlement_impact::config::CatalogConfig;
use settlement_impact::error::AppError;
use settlement_impact::simulator::{ReferenceCatalog, SettlementSimulator};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the catalog once, honouring a CLI override over the environment.
pub(crate) fn load_catalog(
    config: &CatalogConfig,
    override_path: Option<PathBuf>,
) -> Result<ReferenceCatalog, AppError> {
    let config = match override_path {
        Some(path) => CatalogConfig { path: Some(path) },
        None => config.clone(),
    };
    let catalog = config.load()?;
    let source = config
        .path
        .as_ref()
        .map_or_else(|| "built-in".to_string(), |path| path.display().to_string());
    info!(
        %source,
        nations = catalog.list_nations().len(),
        "reference catalog ready"
    );
    Ok(catalog)
}

pub(crate) fn simulator_from(catalog: ReferenceCatalog) -> Arc<SettlementSimulator> {
    Arc::new(SettlementSimulator::new(Arc::new(catalog)))
}

/// Parses `Category=percentage` pairs.
pub(crate) fn parse_allocation(raw: &str) -> Result<(String, i64), String> {
    let (category, pct) = split_pair(raw)?;
    let pct = pct
        .parse::<i64>()
        .map_err(|err| format!("failed to parse '{pct}' as a whole percentage ({err})"))?;
    Ok((category, pct))
}

/// Parses `Category=Profile name` pairs.
pub(crate) fn parse_profile(raw: &str) -> Result<(String, String), String> {
    let (category, profile) = split_pair(raw)?;
    Ok((category, profile.to_string()))
}

fn split_pair(raw: &str) -> Result<(String, &str), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CATEGORY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing category in '{raw}'"));
    }
    Ok((key.to_string(), value.trim()))
}
