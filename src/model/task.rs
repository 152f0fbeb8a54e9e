use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single schedulable bar on the timeline.
///
/// Only `id`, `start_date` and `end_date` feed the layout engine. Every other
/// field, including unknown keys captured in `extra`, is carried through
/// untouched when the engine produces an updated copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// `None` when the source value was missing or not a valid instant.
    #[serde(default, with = "lenient_date")]
    pub start_date: Option<NaiveDateTime>,
    #[serde(default, with = "lenient_date")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Completion from 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f32>,
    /// Ids of other tasks. Display-only, never interpreted by the engine.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_date: Some(start),
            end_date: Some(end),
            color: None,
            percent: None,
            dependencies: Vec::new(),
            extra: Map::new(),
        }
    }

    /// The task's interval as `(earlier, later)`.
    ///
    /// Inverted ranges are reordered rather than rejected. Returns `None`
    /// when either date is invalid.
    pub fn interval(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let (start, end) = (self.start_date?, self.end_date?);
        Some(if start <= end { (start, end) } else { (end, start) })
    }

    pub fn has_valid_dates(&self) -> bool {
        self.interval().is_some()
    }

    /// Clone of this task with only the dates replaced.
    pub fn with_dates(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start_date: Some(start),
            end_date: Some(end),
            ..self.clone()
        }
    }

    /// Label to show for the task; falls back when the name is blank.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "Untitled task"
        } else {
            &self.name
        }
    }
}

/// A named swimlane of tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskGroup {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl TaskGroup {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tasks: Vec<Task>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tasks,
        }
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Replace the task with the same id. Returns false when no task matched.
    pub fn replace_task(&mut self, updated: Task) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == updated.id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }
}

/// Serde helper for task dates.
///
/// Accepts ISO-8601 / RFC 3339 strings, plain `YYYY-MM-DD` dates and epoch
/// milliseconds. Anything else deserializes to `None` instead of failing the
/// whole document.
pub(crate) mod lenient_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

    pub fn serialize<S>(date: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(WIRE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => parse(&s),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(DateTime::from_timestamp_millis)
                .map(|d| d.naive_utc()),
            _ => None,
        })
    }

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        let s = s.trim();
        if let Ok(d) = DateTime::parse_from_rfc3339(s) {
            return Some(d.naive_local());
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
            if let Ok(d) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(d);
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
