use std::path::PathBuf;

/// Errors surfaced by the file-facing parts of the crate and by drag frames.
///
/// Layout functions themselves never return these; they degrade to
/// defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum GanttError {
    #[error("failed to access {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV is missing required columns (found {found:?}); need task name, start date and end date")]
    MissingColumns { found: Vec<String> },
    #[error("no valid tasks found in CSV ({skipped} rows skipped)")]
    NoValidRows { skipped: usize },
    #[error("drag produced non-finite geometry (left {left}, width {width})")]
    NonFiniteGeometry { left: f64, width: f64 },
}

impl GanttError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GanttError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, GanttError>;
