use crate::error::Result;
use crate::settings::{load_settings, save_settings, settings_path};

pub struct InitOptions {
    pub file: Option<String>,
    pub sheet: Option<String>,
    pub delimiter: Option<char>,
    pub group_column: Option<String>,
    pub superintendence_column: Option<String>,
    pub value_column: Option<String>,
}

pub fn run(opts: InitOptions) -> Result<()> {
    let mut settings = load_settings();

    if let Some(file) = opts.file {
        settings.source = file;
    }
    if let Some(sheet) = opts.sheet {
        settings.sheet = if sheet.is_empty() { None } else { Some(sheet) };
    }
    if let Some(d) = opts.delimiter {
        settings.delimiter = d;
    }
    if let Some(c) = opts.group_column {
        settings.columns.planning_group = c;
    }
    if let Some(c) = opts.superintendence_column {
        settings.columns.superintendence = c;
    }
    if let Some(c) = opts.value_column {
        settings.columns.value = c;
    }

    settings.load_options()?;
    save_settings(&settings)?;

    println!("Saved settings to {}", settings_path().display());
    println!("Source:  {}", settings.source);
    Ok(())
}
