use chrono::NaiveDateTime;

use super::ViewMode;
use crate::units;

/// The visible slice of time and how many pixels it spans.
///
/// `total_units * unit_width` is the addressable pixel width.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub view_mode: ViewMode,
    /// Number of calendar units (per `view_mode`) covering the window.
    pub total_units: usize,
    /// Pixels per unit column.
    pub unit_width: f64,
}

impl TimelineWindow {
    /// Build a window, reordering inverted bounds.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, view_mode: ViewMode, unit_width: f64) -> Self {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let unit_width = if unit_width.is_finite() && unit_width > 0.0 {
            unit_width
        } else {
            tracing::warn!(unit_width, "invalid unit width, using the view mode default");
            view_mode.default_unit_width()
        };
        Self {
            start,
            end,
            view_mode,
            total_units: units::units_between(start, end, view_mode).len().max(1),
            unit_width,
        }
    }

    /// Same bounds, re-measured for another view mode.
    pub fn with_view_mode(&self, view_mode: ViewMode, unit_width: f64) -> Self {
        Self::new(self.start, self.end, view_mode, unit_width)
    }

    pub fn total_width(&self) -> f64 {
        self.total_units as f64 * self.unit_width
    }

    /// Window length in milliseconds, never zero.
    pub fn span_ms(&self) -> f64 {
        ((self.end - self.start).num_milliseconds() as f64).max(1.0)
    }

    pub fn ms_per_pixel(&self) -> f64 {
        self.span_ms() / self.total_width()
    }

    pub fn contains(&self, dt: NaiveDateTime) -> bool {
        self.start <= dt && dt <= self.end
    }

    pub fn clamp(&self, dt: NaiveDateTime) -> NaiveDateTime {
        dt.clamp(self.start, self.end)
    }

    /// Unit-start dates for the header columns.
    pub fn units(&self) -> Vec<NaiveDateTime> {
        units::units_between(self.start, self.end, self.view_mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_total_units_follow_view_mode() {
        let start = at(2024, 1, 1);
        let end = units::end_of_day(at(2024, 3, 31));
        assert_eq!(TimelineWindow::new(start, end, ViewMode::Day, 30.0).total_units, 91);
        assert_eq!(TimelineWindow::new(start, end, ViewMode::Month, 30.0).total_units, 3);
        assert_eq!(TimelineWindow::new(start, end, ViewMode::Quarter, 30.0).total_units, 1);
    }

    #[test]
    fn test_inverted_bounds_are_reordered() {
        let w = TimelineWindow::new(at(2024, 2, 1), at(2024, 1, 1), ViewMode::Month, 100.0);
        assert!(w.start < w.end);
        assert_eq!(w.total_width(), 200.0);
    }

    #[test]
    fn test_invalid_unit_width_falls_back() {
        let w = TimelineWindow::new(at(2024, 1, 1), at(2024, 1, 31), ViewMode::Week, f64::NAN);
        assert_eq!(w.unit_width, ViewMode::Week.default_unit_width());
        let w = TimelineWindow::new(at(2024, 1, 1), at(2024, 1, 31), ViewMode::Week, -3.0);
        assert_eq!(w.unit_width, ViewMode::Week.default_unit_width());
    }

    #[test]
    fn test_clamp_and_contains() {
        let w = TimelineWindow::new(at(2024, 1, 1), at(2024, 1, 31), ViewMode::Day, 10.0);
        assert_eq!(w.clamp(at(2023, 12, 1)), w.start);
        assert_eq!(w.clamp(at(2024, 3, 1)), w.end);
        assert!(w.contains(at(2024, 1, 15)));
        assert!(!w.contains(at(2024, 2, 1)));
    }
}
