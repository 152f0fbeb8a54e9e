use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Zoom granularity of the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
}

/// Everything that varies between view modes, looked up once per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPolicy {
    /// Tolerance trimmed from both ends of each interval before overlap tests.
    pub buffer_minutes: i64,
    /// Narrowest bar the mapper will emit, so degenerate tasks stay grabbable.
    pub min_width_px: f64,
    /// Bars occupy whole day columns and drags snap to days.
    pub snap_to_days: bool,
    /// Animated easing is incoherent with column snapping.
    pub allows_easing: bool,
    pub unit_singular: &'static str,
    pub unit_plural: &'static str,
}

const DAY: ViewPolicy = ViewPolicy {
    buffer_minutes: 60,
    min_width_px: 20.0,
    snap_to_days: true,
    allows_easing: false,
    unit_singular: "day",
    unit_plural: "days",
};

const WEEK: ViewPolicy = ViewPolicy {
    buffer_minutes: 4 * 60,
    min_width_px: 20.0,
    snap_to_days: false,
    allows_easing: true,
    unit_singular: "week",
    unit_plural: "weeks",
};

const MONTH: ViewPolicy = ViewPolicy {
    buffer_minutes: 12 * 60,
    min_width_px: 20.0,
    snap_to_days: false,
    allows_easing: true,
    unit_singular: "month",
    unit_plural: "months",
};

const QUARTER: ViewPolicy = ViewPolicy {
    buffer_minutes: 24 * 60,
    min_width_px: 30.0,
    snap_to_days: false,
    allows_easing: true,
    unit_singular: "quarter",
    unit_plural: "quarters",
};

const YEAR: ViewPolicy = ViewPolicy {
    buffer_minutes: 2 * 24 * 60,
    min_width_px: 40.0,
    snap_to_days: false,
    allows_easing: true,
    unit_singular: "year",
    unit_plural: "years",
};

impl ViewMode {
    pub const ALL: [ViewMode; 5] = [
        ViewMode::Day,
        ViewMode::Week,
        ViewMode::Month,
        ViewMode::Quarter,
        ViewMode::Year,
    ];

    pub fn policy(self) -> &'static ViewPolicy {
        match self {
            ViewMode::Day => &DAY,
            ViewMode::Week => &WEEK,
            ViewMode::Month => &MONTH,
            ViewMode::Quarter => &QUARTER,
            ViewMode::Year => &YEAR,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ViewMode::Day => "Day",
            ViewMode::Week => "Week",
            ViewMode::Month => "Month",
            ViewMode::Quarter => "Quarter",
            ViewMode::Year => "Year",
        }
    }

    /// Default pixel width of one unit column.
    pub fn default_unit_width(self) -> f64 {
        match self {
            ViewMode::Day => 40.0,
            ViewMode::Week => 80.0,
            ViewMode::Month => 120.0,
            ViewMode::Quarter => 180.0,
            ViewMode::Year => 240.0,
        }
    }
}

impl ViewPolicy {
    pub fn buffer(&self) -> Duration {
        Duration::minutes(self.buffer_minutes)
    }

    pub fn unit_label(&self, value: i64) -> &'static str {
        if value == 1 {
            self.unit_singular
        } else {
            self.unit_plural
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_grows_with_coarser_modes() {
        let buffers: Vec<i64> = ViewMode::ALL
            .iter()
            .map(|m| m.policy().buffer_minutes)
            .collect();
        assert!(buffers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_only_day_mode_snaps() {
        for mode in ViewMode::ALL {
            assert_eq!(mode.policy().snap_to_days, mode == ViewMode::Day);
            assert_eq!(mode.policy().allows_easing, mode != ViewMode::Day);
        }
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&ViewMode::Quarter).unwrap(), "\"quarter\"");
        let mode: ViewMode = serde_json::from_str("\"week\"").unwrap();
        assert_eq!(mode, ViewMode::Week);
    }
}
