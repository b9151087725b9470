use std::path::{Path, PathBuf};

use crate::cli::{load_dataset, warn_if_unknown};
use crate::error::Result;
use crate::models::Record;
use crate::query::{working_set, CategoryFilter};

pub fn default_output() -> PathBuf {
    PathBuf::from(chrono::Local::now().format("custos-%Y%m%d-%H%M%S.csv").to_string())
}

pub fn run(file: Option<&str>, group: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let (dataset, _) = load_dataset(file)?;
    let filter = CategoryFilter::from_selection(group.as_deref());
    warn_if_unknown(&dataset, &filter);

    let records = working_set(&dataset, &filter);
    let path = output.unwrap_or_else(default_output);
    write_csv(&path, dataset.headers(), &records)?;
    println!(
        "Exported {} records ({filter}) to {}",
        records.len(),
        path.display()
    );
    Ok(())
}

/// Write the selected records with the source header row.
pub fn write_csv(path: &Path, headers: &[String], records: &[&Record]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(headers)?;
    for r in records {
        wtr.write_record(&r.cells)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{CostDataset, LoadOptions};

    #[test]
    fn test_export_filtered_rows() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("custos.csv");
        std::fs::write(
            &src,
            "Ordem,Grp.planej.manutenç.,Superintendência,Valor\n\
             1,A,X,100\n\
             2,B,X,\"1,5\"\n\
             4,B,Y,7.25\n",
        )
        .unwrap();
        let ds = CostDataset::load(&src, &LoadOptions::default()).unwrap();
        let records = working_set(&ds, &CategoryFilter::Group("B".to_string()));

        let out = dir.path().join("out").join("b.csv");
        write_csv(&out, ds.headers(), &records).unwrap();
        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            content,
            "Ordem,Grp.planej.manutenç.,Superintendência,Valor\n4,B,Y,7.25\n"
        );
    }

    #[test]
    fn test_default_output_name() {
        let name = default_output().to_string_lossy().to_string();
        assert!(name.starts_with("custos-"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "custos-20250101-120000.csv".len());
    }
}
