//! Conversion between task dates and horizontal pixel geometry.
//!
//! Neither direction ever fails: malformed input degrades to a visible
//! default rectangle or to the window bounds, and the condition is logged.

use chrono::{Duration, NaiveDateTime};

use crate::model::{Task, TimelineWindow};
use crate::units::{end_of_day, start_of_day};

/// Horizontal extent of a bar, in pixels from the window's left edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelSpan {
    pub left: f64,
    pub width: f64,
}

impl PixelSpan {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.width.is_finite()
    }
}

/// A resolved `[start, end]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Bar placement in percent of the window, for percentage-based layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentPosition {
    pub left: f64,
    pub width: f64,
    pub is_out_of_range: bool,
}

impl PercentPosition {
    /// Placement used for tasks whose dates cannot be read.
    pub const FALLBACK: PercentPosition = PercentPosition {
        left: 0.0,
        width: 10.0,
        is_out_of_range: false,
    };

    pub fn left_css(&self) -> String {
        format!("{}%", self.left)
    }

    pub fn width_css(&self) -> String {
        format!("{}%", self.width)
    }
}

fn days_since_window(window: &TimelineWindow, dt: NaiveDateTime) -> i64 {
    (dt.date() - window.start.date()).num_days()
}

/// Pixel x of an instant, unclamped.
pub fn date_to_x(dt: NaiveDateTime, window: &TimelineWindow) -> f64 {
    if window.view_mode.policy().snap_to_days {
        return days_since_window(window, dt) as f64 * window.unit_width;
    }
    (dt - window.start).num_milliseconds() as f64 / window.span_ms() * window.total_width()
}

/// Pixel span of a task without the minimum-width floor.
///
/// The interval is clamped to the window first. Day view snaps to whole
/// day columns, the end day included. This is the geometry date math
/// works on; drawing goes through [`task_to_pixels`].
pub fn task_span(task: &Task, window: &TimelineWindow) -> PixelSpan {
    let policy = window.view_mode.policy();
    let total = window.total_width();
    let fallback = PixelSpan::new(0.0, policy.min_width_px.min(total));

    let Some((start, end)) = task.interval() else {
        tracing::warn!(task = %task.id, "task has invalid dates, placing it at the window origin");
        return fallback;
    };
    let clamped_start = start.max(window.start);
    let clamped_end = end.min(window.end);

    let (left, width) = if policy.snap_to_days {
        let left_days = days_since_window(window, clamped_start);
        let span_days = (clamped_end.date() - clamped_start.date()).num_days() + 1;
        (
            left_days as f64 * window.unit_width,
            span_days.max(0) as f64 * window.unit_width,
        )
    } else {
        let span = window.span_ms();
        let left = (clamped_start - window.start).num_milliseconds() as f64 / span;
        let width = (clamped_end - clamped_start).num_milliseconds() as f64 / span;
        (left * total, width.max(0.0) * total)
    };

    let placed = PixelSpan::new(left, width);
    if !placed.is_finite() {
        tracing::warn!(task = %task.id, ?placed, "non-finite geometry, placing it at the window origin");
        return fallback;
    }

    let left = left.clamp(0.0, total);
    PixelSpan::new(left, width.min(total - left))
}

/// Widen a span to the view mode's minimum width, stopping at the right edge.
pub fn visible_span(span: PixelSpan, window: &TimelineWindow) -> PixelSpan {
    let min_width = window.view_mode.policy().min_width_px;
    let width = span.width.max(min_width).min(window.total_width() - span.left);
    PixelSpan::new(span.left, width)
}

/// Place a task on the window for drawing.
///
/// Same as [`task_span`] with the minimum width applied, so degenerate
/// tasks stay visible and grabbable.
pub fn task_to_pixels(task: &Task, window: &TimelineWindow) -> PixelSpan {
    visible_span(task_span(task, window), window)
}

fn offset(base: NaiveDateTime, delta: Option<Duration>) -> Option<NaiveDateTime> {
    base.checked_add_signed(delta?)
}

/// Translate a pixel span back to dates.
///
/// Day view counts whole columns from the window's first midnight, so the
/// result never drifts off a day boundary. Other modes scale by
/// milliseconds per pixel, snap the start back to midnight and shift the
/// end by the same amount, so the span keeps its length in days. Both
/// dates are clamped into the window.
pub fn pixels_to_dates(span: PixelSpan, window: &TimelineWindow) -> DateSpan {
    let bounds = DateSpan {
        start: window.start,
        end: window.end,
    };
    if !span.is_finite() {
        tracing::warn!(?span, "non-finite pixel span, using the window bounds");
        return bounds;
    }

    let resolved = if window.view_mode.policy().snap_to_days {
        let days_from_start = (span.left / window.unit_width).round() as i64;
        let day_span = ((span.width / window.unit_width).round() as i64).max(1);
        let first = start_of_day(window.start);
        offset(first, Duration::try_days(days_from_start)).and_then(|start| {
            let last = offset(first, Duration::try_days(days_from_start.saturating_add(day_span - 1)))?;
            Some((start, end_of_day(last)))
        })
    } else {
        let ms_per_pixel = window.ms_per_pixel();
        let length_ms = (span.width * ms_per_pixel).round().max(0.0) as i64;
        offset(window.start, Duration::try_milliseconds((span.left * ms_per_pixel).round() as i64)).and_then(
            |raw_start| {
                let start = start_of_day(raw_start);
                let end = offset(start, Duration::try_milliseconds(length_ms))?;
                Some((start, end_of_day(end)))
            },
        )
    };

    match resolved {
        Some((start, end)) => DateSpan {
            start: window.clamp(start),
            end: window.clamp(end),
        },
        None => {
            tracing::warn!(?span, "pixel span maps outside the calendar, using the window bounds");
            bounds
        }
    }
}

/// Task with its dates pulled inside the window. Invalid tasks come back unchanged.
pub fn clamp_task_to_window(task: &Task, window: &TimelineWindow) -> Task {
    match task.interval() {
        Some((start, end)) => task.with_dates(window.clamp(start), window.clamp(end)),
        None => task.clone(),
    }
}

/// Placement in percent of `[window_start, window_end]`.
pub fn task_percent_position(task: &Task, window_start: NaiveDateTime, window_end: NaiveDateTime) -> PercentPosition {
    let Some((start, end)) = task.interval() else {
        tracing::warn!(task = %task.id, "task has invalid dates, using the fallback position");
        return PercentPosition::FALLBACK;
    };
    let (window_start, window_end) = if window_start <= window_end {
        (window_start, window_end)
    } else {
        (window_end, window_start)
    };
    let span = ((window_end - window_start).num_milliseconds() as f64).max(1.0);
    let clamped_start = start.max(window_start);
    let clamped_end = end.min(window_end);
    let left = (clamped_start - window_start).num_milliseconds() as f64 / span * 100.0;
    let width = (clamped_end - clamped_start).num_milliseconds() as f64 / span * 100.0;
    PercentPosition {
        left,
        width: width.max(0.0),
        is_out_of_range: end < window_start || start > window_end,
    }
}
