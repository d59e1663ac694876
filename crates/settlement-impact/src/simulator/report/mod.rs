mod export;
pub mod views;

pub use export::{write_impact_csv, IMPACT_CSV_HEADERS};
pub use views::{impact_rows, CatalogView, ImpactRowView, NationView, SimulationView};

use super::domain::PaymentType;
use super::session::SimulationOutcome;
use std::fmt::Write;

const CHART_WIDTH: usize = 40;

/// Formats `value` as `$1,234.56`, rounding to cents.
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{fraction}")
}

/// Plain-text summary of a simulation, one section per game step.
pub fn render_text(outcome: &SimulationOutcome) -> String {
    let mut out = String::new();
    let nation = &outcome.nation;
    let allocation = &outcome.allocation;
    let breakdown = &outcome.breakdown;
    let per_capita = &outcome.per_capita;

    let _ = writeln!(out, "Nation: {}", nation.name);
    let _ = writeln!(out, "Location: {}", nation.location.label());
    let _ = writeln!(out, "Population: {}", nation.population);
    let _ = writeln!(
        out,
        "Settlement Amount: {}",
        format_currency(nation.settlement_amount)
    );

    let _ = writeln!(out, "\nAllocation Summary:");
    let _ = writeln!(
        out,
        "- Per Capita Distribution: {}% ({})",
        allocation.per_capita_pct,
        format_currency(breakdown.per_capita)
    );
    let _ = writeln!(
        out,
        "- Priority Areas: {}% ({})",
        allocation.priority_areas_pct,
        format_currency(breakdown.priority_areas)
    );
    let _ = writeln!(
        out,
        "- Savings: {}% ({})",
        allocation.savings_pct,
        format_currency(breakdown.savings)
    );

    let _ = writeln!(out, "\nPCD Payment Type: {}", per_capita.payment.label());
    if per_capita.payment.payment_type() == PaymentType::Installments {
        let _ = writeln!(out, "Duration: {} years", per_capita.payment.years());
    }
    let _ = writeln!(
        out,
        "Per member: {} ({} per year)",
        format_currency(per_capita.per_member),
        format_currency(per_capita.per_member_per_year)
    );

    for warning in &outcome.warnings {
        let _ = writeln!(out, "\nWARNING: {}", warning.message());
    }

    let _ = writeln!(out, "\nEconomic Impact Summary:");
    let _ = writeln!(
        out,
        "Estimated One-Time Economic Impact: {}",
        format_currency(outcome.impact.one_time_impact)
    );
    let _ = writeln!(
        out,
        "Estimated Annual Recurring Impact: {}",
        format_currency(outcome.impact.recurring_impact)
    );

    let _ = writeln!(out, "\nUpdated Success Factors:");
    for factor in &outcome.success_factors.factors {
        let flag = if factor.exceeds_unit_range {
            " (outside 0-1)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "- {}: {:.3} -> {:.3}{flag}",
            factor.factor, factor.initial_score, factor.updated_score
        );
    }
    if outcome.success_factors.impact_ratio.is_none() {
        let _ = writeln!(out, "(settlement is zero; scores unchanged)");
    }

    let _ = writeln!(out, "\nImpact Visualization:");
    out.push_str(&render_chart(&impact_rows(&outcome.impact)));
    out
}

/// Horizontal bars scaled to the largest category impact.
pub fn render_chart(rows: &[ImpactRowView]) -> String {
    let label_width = rows
        .iter()
        .map(|row| row.category_label.len())
        .max()
        .unwrap_or(0);
    let peak = rows.iter().map(|row| row.impact).fold(0.0_f64, f64::max);

    let mut out = String::new();
    for row in rows {
        let width = if peak > 0.0 {
            ((row.impact / peak) * CHART_WIDTH as f64).round() as usize
        } else {
            0
        };
        let _ = writeln!(
            out,
            "{:<label_width$} | {:>3}% | {:<CHART_WIDTH$} | {}",
            row.category_label,
            row.allocation_pct,
            "#".repeat(width),
            row.impact_display,
        );
    }
    out
}
