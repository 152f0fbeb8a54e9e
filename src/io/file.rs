use std::path::Path;

use crate::error::{GanttError, Result};
use crate::model::TaskGroup;

/// Save task groups to a pretty-printed JSON file.
pub fn save_groups(groups: &[TaskGroup], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(groups)?;
    std::fs::write(path, json).map_err(|e| GanttError::io(path, e))
}

/// Load task groups from a JSON file.
///
/// Tasks with unreadable dates are kept (with `None` dates) so the rest of
/// the document still loads.
pub fn load_groups(path: &Path) -> Result<Vec<TaskGroup>> {
    let json = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    let groups: Vec<TaskGroup> = serde_json::from_str(&json)?;
    let invalid = groups
        .iter()
        .flat_map(|g| &g.tasks)
        .filter(|t| !t.has_valid_dates())
        .count();
    if invalid > 0 {
        tracing::warn!(invalid, path = %path.display(), "loaded tasks with invalid dates");
    }
    Ok(groups)
}
