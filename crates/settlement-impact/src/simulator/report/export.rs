use super::super::impact::ImpactResult;
use std::io::Write;

pub const IMPACT_CSV_HEADERS: [&str; 4] = [
    "Category",
    "Allocation (%)",
    "Expenditure Profile",
    "Economic Impact ($)",
];

/// Writes the visualization table, one row per category in catalog order.
pub fn write_impact_csv<W: Write>(impact: &ImpactResult, writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);
    csv_writer.write_record(IMPACT_CSV_HEADERS)?;

    for entry in &impact.per_category {
        csv_writer.write_record([
            entry.category.label().to_string(),
            entry.allocation_pct.to_string(),
            entry.profile.clone().unwrap_or_default(),
            format!("{:.2}", entry.impact),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
