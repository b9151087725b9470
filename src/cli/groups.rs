use comfy_table::{Cell, Table};

use crate::cli::load_dataset;
use crate::dataset::CostDataset;
use crate::error::Result;
use crate::fmt::money;
use crate::query;

pub fn run(file: Option<&str>) -> Result<()> {
    let (dataset, _) = load_dataset(file)?;
    println!("{}", format_groups(&dataset));
    Ok(())
}

/// One row per selector option, in the order the dashboard shows them.
pub fn format_groups(dataset: &CostDataset) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Planning group", "Records", "Total"]);
    for filter in dataset.filter_options() {
        let count = query::working_set(dataset, &filter).len();
        let result = query::run(dataset, &filter);
        table.add_row(vec![
            Cell::new(filter.to_string()),
            Cell::new(count),
            Cell::new(money(result.total)),
        ]);
    }
    format!("Planning groups\n{table}")
}
