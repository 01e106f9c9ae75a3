use super::ui;
use crate::core::import::{self, ImportLayout};
use crate::providers::csv_file::CsvFileProvider;
use crate::store::HoldingsStore;
use anyhow::{Context, Result};
use std::path::Path;

pub fn run(
    store: &mut HoldingsStore,
    file: &Path,
    period: &str,
    layout: &ImportLayout,
) -> Result<()> {
    let source = CsvFileProvider::new(file);

    let pb = ui::new_spinner("Validating holdings...");
    let result = import::import_from_source(store, &source, period, layout, &|| pb.inc(1));
    pb.finish_and_clear();
    let summary =
        result.with_context(|| format!("Failed to import {} as {period}", file.display()))?;

    for warning in &summary.warnings {
        println!(
            "{} {warning}",
            ui::style_text("Warning:", ui::StyleType::Warning)
        );
    }

    let action = if summary.replaced {
        "Replaced"
    } else {
        "Imported"
    };
    println!(
        "{action} {} holding(s) for {} {}",
        summary.records,
        ui::style_text(&summary.period.to_string(), ui::StyleType::Success),
        ui::style_text(
            &format!("(saved to {})", store.path().display()),
            ui::StyleType::Subtle
        )
    );
    Ok(())
}
