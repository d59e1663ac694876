use crate::infra::{load_catalog, parse_allocation, parse_profile, simulator_from};
use clap::Args;
use settlement_impact::config::CatalogConfig;
use settlement_impact::error::AppError;
use settlement_impact::simulator::report::{
    format_currency, render_text, write_impact_csv, CatalogView, SimulationView,
};
use settlement_impact::simulator::{PaymentType, SimulationOutcome, SimulationRequest};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// Nation profile to play (see the `catalog` command)
    #[arg(long)]
    pub(crate) nation: String,
    /// Percentage of the settlement paid out per capita
    #[arg(long, default_value_t = 30)]
    pub(crate) per_capita: i64,
    /// Percentage of the settlement invested in priority areas
    #[arg(long, default_value_t = 50)]
    pub(crate) priority_areas: i64,
    /// Pay the per capita share over this many years instead of a lump sum
    #[arg(long)]
    pub(crate) installments: Option<i64>,
    /// Category allocation as CATEGORY=PERCENT (repeatable)
    #[arg(long, value_parser = parse_allocation)]
    pub(crate) allocate: Vec<(String, i64)>,
    /// Expenditure profile as CATEGORY=PROFILE (repeatable, "None" clears)
    #[arg(long, value_parser = parse_profile)]
    pub(crate) profile: Vec<(String, String)>,
    /// JSON reference catalog to use instead of the built-in one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the outcome as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Also write the per-category impact table to this CSV file
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct CatalogArgs {
    /// JSON reference catalog to inspect instead of the built-in one
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Print the catalog as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl SimulateArgs {
    pub(crate) fn to_request(&self) -> SimulationRequest {
        let mut request = SimulationRequest::new(self.nation.clone());
        request.per_capita_pct = self.per_capita;
        request.priority_areas_pct = self.priority_areas;
        if let Some(years) = self.installments {
            request.payment_type = PaymentType::Installments;
            request.installment_years = Some(years);
        }
        request.category_pct = self.allocate.iter().cloned().collect();
        request.profiles = self
            .profile
            .iter()
            .map(|(category, profile)| (category.clone(), Some(profile.clone())))
            .collect();
        request
    }
}

pub(crate) fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&CatalogConfig::from_env(), args.catalog.clone())?;
    let simulator = simulator_from(catalog);
    let outcome = simulator.run(&args.to_request())?;

    if let Some(path) = &args.csv {
        let writer = BufWriter::new(File::create(path)?);
        write_impact_csv(&outcome.impact, writer)?;
    }

    if args.json {
        print_json(&SimulationView::from(outcome))?;
    } else {
        print_outcome(&outcome);
        if let Some(path) = &args.csv {
            println!("\nImpact table written to {}", path.display());
        }
    }

    Ok(())
}

pub(crate) fn run_catalog(args: CatalogArgs) -> Result<(), AppError> {
    let catalog = load_catalog(&CatalogConfig::from_env(), args.catalog)?;
    let view = CatalogView::from_catalog(&catalog);

    if args.json {
        return print_json(&view);
    }

    println!("Nation profiles");
    for nation in &view.nations {
        println!(
            "- {} ({}, population {}) settlement {}",
            nation.name, nation.location_label, nation.population, nation.settlement_display
        );
        for (factor, score) in &nation.initial_success_factors {
            println!("    {factor}: {score:.2}");
        }
    }

    println!("\nPriority areas");
    for category in &view.categories {
        println!("- {} (weight {:.1})", category.category_label, category.weight);
        for profile in &category.profiles {
            match profile.impact_multiplier {
                Some(multiplier) => println!("    {} x{multiplier:.1}", profile.name),
                None => println!("    {}", profile.name),
            }
        }
    }

    Ok(())
}

fn print_outcome(outcome: &SimulationOutcome) {
    println!("Settlement impact simulation");
    print!("{}", render_text(outcome));
    println!(
        "\nReplay with different allocations to compare strategies; each round starts from {}.",
        format_currency(outcome.nation.settlement_amount)
    );
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let stdout = io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), value).map_err(io::Error::from)?;
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SimulateArgs {
        SimulateArgs {
            nation: "Nation A".to_string(),
            per_capita: 20,
            priority_areas: 60,
            installments: Some(4),
            allocate: vec![("Education".to_string(), 50)],
            profile: vec![("Education".to_string(), "Build Schools".to_string())],
            catalog: None,
            json: false,
            csv: None,
        }
    }

    #[test]
    fn args_translate_into_a_request() {
        let request = args().to_request();
        assert_eq!(request.per_capita_pct, 20);
        assert_eq!(request.priority_areas_pct, 60);
        assert_eq!(request.payment_type, PaymentType::Installments);
        assert_eq!(request.installment_years, Some(4));
        assert_eq!(request.category_pct.get("Education"), Some(&50));
        assert_eq!(
            request.profiles.get("Education"),
            Some(&Some("Build Schools".to_string()))
        );
    }

    #[test]
    fn lump_sum_is_the_default_payment() {
        let mut args = args();
        args.installments = None;
        let request = args.to_request();
        assert_eq!(request.payment_type, PaymentType::LumpSum);
        assert!(request.installment_years.is_none());
    }
}
