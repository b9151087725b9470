use colored::Colorize;
use comfy_table::{Cell, Table};
use serde::Serialize;

use crate::cli::{load_dataset, warn_if_unknown};
use crate::dataset::CostDataset;
use crate::error::Result;
use crate::fmt::money;
use crate::models::Record;
use crate::query::{self, CategoryFilter, GroupTotal, Report};

const BAR_WIDTH: usize = 30;

#[derive(Serialize)]
struct JsonReport<'a> {
    filter: &'a CategoryFilter,
    count: usize,
    total: f64,
    total_formatted: String,
    breakdown: &'a [GroupTotal],
    records: &'a [&'a Record],
}

pub fn run(file: Option<&str>, group: Option<String>, rows: usize, json: bool) -> Result<()> {
    let (dataset, _) = load_dataset(file)?;
    let filter = CategoryFilter::from_selection(group.as_deref());
    warn_if_unknown(&dataset, &filter);

    let report = query::report(&dataset, &filter);
    if json {
        println!("{}", format_json(&report)?);
    } else {
        println!("{}", format_report(&dataset, &report, rows));
    }
    Ok(())
}

pub fn format_json(report: &Report) -> Result<String> {
    let out = JsonReport {
        filter: &report.filter,
        count: report.count(),
        total: report.aggregate.total,
        total_formatted: money(report.aggregate.total),
        breakdown: &report.aggregate.breakdown,
        records: &report.records,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

fn bar(value: f64, max: f64) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let len = ((value / max) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(len.clamp(1, BAR_WIDTH))
}

pub fn format_report(dataset: &CostDataset, report: &Report, rows: usize) -> String {
    let total = report.aggregate.total;
    let mut out = format!(
        "{} {}\n",
        format!("Cost subtotal for {}:", report.filter).bold(),
        money(total).green().bold()
    );

    let max = report
        .aggregate
        .breakdown
        .iter()
        .map(|g| g.total)
        .fold(0.0, f64::max);
    let mut dist = Table::new();
    dist.set_header(vec!["Superintendência", "Total", "%", "Records", ""]);
    for g in &report.aggregate.breakdown {
        let pct = if total != 0.0 { g.total / total * 100.0 } else { 0.0 };
        dist.add_row(vec![
            Cell::new(&g.name),
            Cell::new(money(g.total)),
            Cell::new(format!("{pct:.1}%")),
            Cell::new(g.count),
            Cell::new(bar(g.total, max).blue()),
        ]);
    }
    out.push_str(&format!("\nDistribution by superintendence\n{dist}\n"));

    out.push_str(&format!("\nTotal records: {}\n", report.count()));
    if rows > 0 && !report.records.is_empty() {
        let mut table = Table::new();
        table.set_header(dataset.headers().to_vec());
        for r in report.records.iter().take(rows) {
            table.add_row(r.cells.iter().map(Cell::new).collect::<Vec<_>>());
        }
        out.push_str(&format!("{table}\n"));
    }
    let shown = rows.min(report.count());
    if shown < report.count() {
        out.push_str(
            &format!(
                "Showing {shown} of {} records (use --rows to see more)\n",
                report.count()
            )
            .dimmed()
            .to_string(),
        );
    }
    out
}
