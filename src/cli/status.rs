use crate::dataset::CostDataset;
use crate::error::Result;
use crate::fmt::number;
use crate::settings::{load_settings, settings_file_exists, settings_path};

pub fn run(file: Option<&str>) -> Result<()> {
    let settings = load_settings();
    let source = settings.source_path(file);

    let saved = if settings_file_exists() {
        settings_path().display().to_string()
    } else {
        "(defaults, not saved)".to_string()
    };
    println!("Settings:        {saved}");
    println!("Source:          {}", source.display());
    println!(
        "Sheet:           {}",
        settings.sheet.as_deref().unwrap_or("(first sheet)")
    );
    println!("Group column:    {}", settings.columns.planning_group);
    println!("Super column:    {}", settings.columns.superintendence);
    println!("Value column:    {}", settings.columns.value);

    if !source.exists() {
        println!();
        println!("Source file not found. Run `custos init --file <PATH>` to set it.");
        return Ok(());
    }

    let dataset = CostDataset::load(&source, &settings.load_options()?)?;
    println!();
    println!("Rows read:       {}", number(dataset.raw_rows()));
    println!("Records:         {}", number(dataset.len()));
    println!("Dropped:         {}", number(dataset.dropped()));
    println!("Planning groups: {}", number(dataset.groups().len()));
    Ok(())
}
