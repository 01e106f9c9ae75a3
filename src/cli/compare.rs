use super::ui;
use crate::core::compare::{self, DeltaReport, FundStatus};
use crate::store::HoldingsStore;
use anyhow::{Context, Result};
use comfy_table::Cell;

pub fn run(
    store: &HoldingsStore,
    identifier: &str,
    start_period: &str,
    end_period: &str,
    json: bool,
) -> Result<()> {
    let report = compare::compare(store, identifier, start_period, end_period)?;

    if json {
        let output =
            serde_json::to_string_pretty(&report).context("Failed to serialize delta report")?;
        println!("{output}");
    } else {
        println!("{}", display_report(&report));
    }
    Ok(())
}

pub fn display_report(report: &DeltaReport) -> String {
    let mut output = format!(
        "Analysis Results ({} to {})\n\n",
        ui::style_text(&report.start_period.to_string(), ui::StyleType::Label),
        ui::style_text(&report.end_period.to_string(), ui::StyleType::Label)
    );

    output.push_str(&format!(
        "Fund: {}\nISIN: {}\nIndustry: {}\nStatus: {}\n\n",
        ui::style_text(&report.name, ui::StyleType::Title),
        report.isin,
        if report.industry.is_empty() {
            "N/A"
        } else {
            report.industry.as_str()
        },
        status_text(report.status)
    ));

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metric"),
        ui::header_cell(&report.start_period.to_string()),
        ui::header_cell(&report.end_period.to_string()),
        ui::header_cell("Change"),
        ui::header_cell("Change (%)"),
    ]);

    for (label, metric) in report.metrics() {
        table.add_row(vec![
            Cell::new(label),
            ui::number_cell(metric.start),
            ui::number_cell(metric.end),
            ui::delta_cell(metric.change),
            ui::format_optional_cell(metric.percent_change, ui::change_cell),
        ]);
    }
    output.push_str(&table.to_string());

    if report.status == FundStatus::NewAddition {
        output.push_str(&format!(
            "\n{}",
            ui::style_text(
                "New holding: no relative change against an empty starting position",
                ui::StyleType::Subtle
            )
        ));
    }
    output
}

fn status_text(status: FundStatus) -> String {
    let style_type = match status {
        FundStatus::Existing => ui::StyleType::Label,
        FundStatus::NewAddition => ui::StyleType::Success,
        FundStatus::Dropped => ui::StyleType::Warning,
    };
    ui::style_text(&status.to_string(), style_type)
}
