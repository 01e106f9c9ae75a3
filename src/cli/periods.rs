use super::ui;
use crate::core::PeriodKey;
use crate::store::HoldingsStore;
use anyhow::Result;
use comfy_table::Cell;

/// Prints the imported periods, oldest first.
pub fn list(store: &HoldingsStore) -> Result<()> {
    if store.is_empty() {
        println!("No data available. Please import data first.");
        return Ok(());
    }

    println!("{}", ui::style_text("Available months:", ui::StyleType::Title));
    for period in store.periods() {
        println!(
            "- {period} {}",
            ui::style_text(
                &format!("({} holdings)", store.get_period(period).len()),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}

/// Prints every holding stored for `period`.
pub fn show(store: &HoldingsStore, period: &str) -> Result<()> {
    let period: PeriodKey = period.parse()?;
    if !store.contains_period(&period) {
        println!("No holdings imported for {period}.");
        return Ok(());
    }
    let holdings = store.get_period(&period);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Name"),
        ui::header_cell("ISIN"),
        ui::header_cell("Industry"),
        ui::header_cell("Quantity"),
        ui::header_cell("Market Value"),
        ui::header_cell("% to NAV"),
    ]);

    let mut records: Vec<_> = holdings.values().collect();
    records.sort_by(|a, b| b.percent_nav.total_cmp(&a.percent_nav));
    for record in records {
        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(&record.isin),
            Cell::new(&record.industry),
            ui::number_cell(record.quantity),
            ui::number_cell(record.market_value),
            ui::number_cell(record.percent_nav),
        ]);
    }

    println!(
        "Holdings for {}\n\n{table}",
        ui::style_text(&period.to_string(), ui::StyleType::Title)
    );
    Ok(())
}
