use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{GanttError, Result};
use crate::model::{Task, TaskGroup};
use crate::units::end_of_day;

const DEFAULT_GROUP: &str = "Tasks";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Group,
    Name,
    Start,
    End,
    Percent,
    Id,
    Color,
}

/// Try parsing a date string with several common formats.
///
/// Date-only values become midnight; the caller decides whether an end date
/// should cover the whole day.
fn parse_date(s: &str) -> Option<(NaiveDateTime, bool)> {
    let s = s.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some((d, true));
        }
    }
    for fmt in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| (dt, false));
        }
    }
    None
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons >= commas && semicolons >= tabs {
        b';'
    } else if tabs >= commas {
        b'\t'
    } else {
        b','
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

fn header_to_column(normalized: &str) -> Option<Column> {
    match normalized {
        "group" | "groupname" | "swimlane" | "lane" | "category" | "team" => Some(Column::Group),
        "name" | "task" | "tasklabel" | "taskname" | "label" | "title" | "activity" => Some(Column::Name),
        "start" | "startdate" | "from" | "begin" | "begindate" => Some(Column::Start),
        "end" | "enddate" | "to" | "finish" | "finishdate" | "due" | "duedate" => Some(Column::End),
        "percent" | "progress" | "complete" | "completion" => Some(Column::Percent),
        "id" | "taskid" | "key" => Some(Column::Id),
        "color" | "colour" => Some(Column::Color),
        _ => None,
    }
}

fn parse_percent(s: &str) -> Option<f32> {
    s.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f32>()
        .ok()
        .map(|p| p.clamp(0.0, 100.0))
}

/// Import task groups from a CSV file.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column headers
/// flexibly. Rows are grouped by the `Group` column in order of first
/// appearance; rows without one land in a default group. Rows without a name
/// or with unreadable dates are skipped.
/// Returns `(groups, skipped_count)` on success.
pub fn import_csv(path: &Path) -> Result<(Vec<TaskGroup>, usize)> {
    let content = std::fs::read_to_string(path).map_err(|e| GanttError::io(path, e))?;
    import_csv_str(&content)
}

pub fn import_csv_str(content: &str) -> Result<(Vec<TaskGroup>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let columns: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_column(&normalize_header(h)))
        .collect();

    let has = |c: Column| columns.contains(&Some(c));
    if !has(Column::Name) || !has(Column::Start) || !has(Column::End) {
        return Err(GanttError::MissingColumns {
            found: headers.iter().map(str::to_owned).collect(),
        });
    }

    let mut groups: Vec<TaskGroup> = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let line = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(line, "skipping CSV row: {e}");
                skipped += 1;
                continue;
            }
        };

        let field = |wanted: Column| {
            columns
                .iter()
                .position(|c| *c == Some(wanted))
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .filter(|s| !s.is_empty())
        };

        let Some(name) = field(Column::Name) else {
            skipped += 1;
            continue;
        };

        let start = match field(Column::Start).and_then(parse_date) {
            Some((d, _)) => d,
            None => {
                tracing::warn!(line, value = field(Column::Start).unwrap_or(""), "skipping row: invalid start date");
                skipped += 1;
                continue;
            }
        };

        let end = match field(Column::End).and_then(parse_date) {
            Some((d, true)) => d,
            Some((d, false)) => end_of_day(d),
            None => {
                tracing::warn!(line, value = field(Column::End).unwrap_or(""), "skipping row: invalid end date");
                skipped += 1;
                continue;
            }
        };

        let id = field(Column::Id)
            .map(str::to_owned)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut task = Task::new(id, name, start, end);
        task.percent = field(Column::Percent).and_then(parse_percent);
        task.color = field(Column::Color).map(str::to_owned);

        let group_name = field(Column::Group).unwrap_or(DEFAULT_GROUP);
        match groups.iter_mut().find(|g| g.name == group_name) {
            Some(group) => group.tasks.push(task),
            None => groups.push(TaskGroup::new(
                uuid::Uuid::new_v4().to_string(),
                group_name,
                vec![task],
            )),
        }
    }

    if groups.is_empty() {
        return Err(GanttError::NoValidRows { skipped });
    }

    Ok((groups, skipped))
}
