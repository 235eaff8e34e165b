//! KPI listing command implementation.

use anyhow::Result;
use greenblatt::load_kpi_table;
use greenblatt::panel::{KpiCategory, kpis_by_category};
use std::path::Path;

/// List the built-in KPI registry, or the entries of a KPI table file.
pub(crate) fn list_kpis(kpi_table: Option<&Path>) -> Result<()> {
    if let Some(path) = kpi_table {
        let table = load_kpi_table(path)?;
        println!("KPI table {}:", path.display());
        println!("{}", "-".repeat(60));
        for (name, id) in &table {
            println!("  {id:>4}  {name}");
        }
        return Ok(());
    }

    let categories = [
        KpiCategory::Profitability,
        KpiCategory::Valuation,
        KpiCategory::Size,
    ];

    for category in categories {
        println!("{category:?}: {}", category.description());
        println!("{}", "-".repeat(60));
        for kpi in kpis_by_category(&category) {
            let id = kpi
                .source_id
                .map_or_else(|| "-".to_string(), |id| id.to_string());
            println!(
                "  {id:>4}  {:16} {:?} - {}",
                kpi.name, kpi.direction, kpi.description
            );
        }
        println!();
    }

    Ok(())
}
