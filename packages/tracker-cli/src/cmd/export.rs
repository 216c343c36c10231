//! CSV export command

use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};

use job_tracker::{export_csv, export_filename, TrackerError};

use crate::context::AppContext;

/// Write all records, in stored order, to a dated CSV file.
///
/// `output` may be a directory (the dated name is used inside it) or a full
/// file path. Defaults to the current directory.
pub async fn export(ctx: &AppContext, output: Option<PathBuf>) -> Result<()> {
    let records = ctx.store().list().await?;

    let csv = match export_csv(&records) {
        Ok(csv) => csv,
        Err(TrackerError::NothingToExport) => {
            ctx.print_warning("No applications to export");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let path = output_path(output, &export_filename(Local::now().date_naive()));
    std::fs::write(&path, csv).with_context(|| format!("Failed to write {}", path.display()))?;

    ctx.print_success(&format!(
        "Exported {} applications to {}",
        records.len(),
        path.display()
    ));
    Ok(())
}

fn output_path(output: Option<PathBuf>, filename: &str) -> PathBuf {
    match output {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path,
        None => Path::new(".").join(filename),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let name = "job_applications_2024-01-05.csv";

        assert_eq!(output_path(None, name), Path::new(".").join(name));
        assert_eq!(
            output_path(Some(dir.path().to_path_buf()), name),
            dir.path().join(name)
        );

        let file = dir.path().join("mine.csv");
        assert_eq!(output_path(Some(file.clone()), name), file);
    }
}
