use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::{GanttError, Result};
use crate::model::TaskGroup;

fn format_cell(date: Option<NaiveDateTime>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()
}

/// Export groups to a semicolon-delimited CSV file matching the import format.
///
/// Columns: Group ; Task Label ; Start Date ; End Date ; Percent ; Id
/// Dates are formatted as DD/MM/YYYY; invalid dates are written empty.
/// Returns the number of tasks written.
pub fn export_csv(groups: &[TaskGroup], path: &Path) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)?;

    wtr.write_record(["Group", "Task Label", "Start Date", "End Date", "Percent", "Id"])?;

    let mut written = 0;
    for group in groups {
        for task in &group.tasks {
            wtr.write_record([
                group.name.as_str(),
                task.name.as_str(),
                format_cell(task.start_date).as_str(),
                format_cell(task.end_date).as_str(),
                task.percent.map(|p| p.to_string()).unwrap_or_default().as_str(),
                task.id.as_str(),
            ])?;
            written += 1;
        }
    }

    wtr.flush().map_err(|e| GanttError::io(path, e))?;
    Ok(written)
}
