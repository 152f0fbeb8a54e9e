//! Pointer-driven move/resize gestures for one swimlane.
//!
//! A [`RowController`] is either idle or dragging exactly one task. While
//! dragging it owns the authoritative geometry of the bar, recomputes the
//! preview dates and row arrangement on every pointer move, and hands back a
//! single [`TaskCommit`] on release. Dropping the controller aborts the
//! gesture without committing.

use crate::collision::{preview_arrangement, RowArrangement};
use crate::error::{GanttError, Result};
use crate::model::{Task, TimelineWindow};
use crate::position::{clamp_task_to_window, pixels_to_dates, task_span, task_to_pixels, visible_span, PixelSpan};

/// Narrowest a bar may be resized to.
pub const MIN_DRAG_WIDTH_PX: f64 = 20.0;

/// Default fraction of the remaining distance covered per animation tick.
pub const DEFAULT_EASING_RATE: f64 = 0.35;

/// Which part of the bar the pointer grabbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Live result of the latest pointer move.
#[derive(Debug, Clone)]
pub struct DragFrame {
    /// Target geometry of the dragged bar.
    pub geometry: PixelSpan,
    /// The dragged task with its in-progress dates.
    pub preview: Task,
    /// Arrangement of the whole row as if `preview` were committed.
    pub rows: RowArrangement,
}

#[derive(Debug, Clone)]
pub struct Gesture {
    pub task: Task,
    pub kind: DragKind,
    pub start_x: f64,
    /// Bar span at gesture start, before the minimum-width floor.
    pub initial: PixelSpan,
    pub frame: Option<DragFrame>,
}

#[derive(Debug, Clone, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Gesture),
}

/// A finished gesture, ready for the host's update callback.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskCommit {
    pub group_id: String,
    pub task: Task,
}

/// Displayed geometry easing toward a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasedSpan {
    pub displayed: PixelSpan,
    pub target: PixelSpan,
}

impl EasedSpan {
    const SETTLE_PX: f64 = 0.5;

    pub fn new(at: PixelSpan) -> Self {
        Self {
            displayed: at,
            target: at,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.displayed == self.target
    }

    /// Move one step toward the target. Returns true once settled.
    pub fn step(&mut self, rate: f64) -> bool {
        let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 1.0 };
        let d_left = self.target.left - self.displayed.left;
        let d_width = self.target.width - self.displayed.width;
        if d_left.abs() < Self::SETTLE_PX && d_width.abs() < Self::SETTLE_PX {
            self.displayed = self.target;
            return true;
        }
        self.displayed.left += d_left * rate;
        self.displayed.width += d_width * rate;
        false
    }
}

fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() {
        x
    } else {
        0.0
    }
}

/// Candidate rectangle for a pointer offset of `delta` px from the gesture start.
///
/// Resizes keep at least [`MIN_DRAG_WIDTH_PX`]; every kind stays inside
/// `[0, total]`.
pub fn candidate_span(kind: DragKind, initial: PixelSpan, delta: f64, total: f64) -> PixelSpan {
    match kind {
        DragKind::Move => {
            let width = initial.width.min(total);
            let left = (initial.left + delta).min(total - width).max(0.0);
            PixelSpan::new(left, width)
        }
        DragKind::ResizeStart => {
            let right = initial.right().min(total).max(MIN_DRAG_WIDTH_PX.min(total));
            let left = (initial.left + delta).min(right - MIN_DRAG_WIDTH_PX).max(0.0);
            PixelSpan::new(left, (right - left).max(0.0))
        }
        DragKind::ResizeEnd => {
            let left = initial.left.min(total).max(0.0);
            let width = (initial.width + delta).max(MIN_DRAG_WIDTH_PX).min(total - left);
            PixelSpan::new(left, width)
        }
    }
}

/// Gesture state for one swimlane.
#[derive(Debug)]
pub struct RowController {
    group_id: String,
    state: DragState,
    hovered: Option<String>,
    animation: Option<EasedSpan>,
    easing_rate: f64,
    easing_enabled: bool,
}

impl RowController {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            state: DragState::Idle,
            hovered: None,
            animation: None,
            easing_rate: DEFAULT_EASING_RATE,
            easing_enabled: true,
        }
    }

    pub fn with_easing(mut self, rate: f64, enabled: bool) -> Self {
        self.easing_rate = rate;
        self.easing_enabled = enabled;
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        match &self.state {
            DragState::Dragging(g) => Some(g),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn frame(&self) -> Option<&DragFrame> {
        self.gesture().and_then(|g| g.frame.as_ref())
    }

    pub fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub fn hover(&mut self, task_id: Option<&str>) {
        self.hovered = task_id.map(str::to_owned);
    }

    /// Start a gesture on `task`. Ignored while another gesture is live.
    pub fn pointer_down(&mut self, task: &Task, kind: DragKind, pointer_x: f64, window: &TimelineWindow) -> bool {
        if let Some(active) = self.gesture() {
            tracing::debug!(
                group = %self.group_id,
                active = %active.task.id,
                ignored = %task.id,
                "pointer down ignored, gesture already in progress"
            );
            return false;
        }
        let initial = task_span(task, window);
        tracing::debug!(group = %self.group_id, task = %task.id, ?kind, ?initial, "drag started");
        self.animation = Some(EasedSpan::new(visible_span(initial, window)));
        self.state = DragState::Dragging(Gesture {
            task: task.clone(),
            kind,
            start_x: finite_or_zero(pointer_x),
            initial,
            frame: None,
        });
        true
    }

    /// Recompute the preview for the new pointer position.
    ///
    /// `row_tasks` are the committed tasks of this swimlane. A frame that
    /// fails to compute is logged and dropped; the previous preview stays.
    pub fn pointer_move(&mut self, pointer_x: f64, window: &TimelineWindow, row_tasks: &[Task]) -> Option<&DragFrame> {
        let DragState::Dragging(gesture) = &mut self.state else {
            return None;
        };
        match compute_frame(gesture, pointer_x, window, row_tasks) {
            Ok(frame) => {
                let immediate = !(self.easing_enabled && window.view_mode.policy().allows_easing);
                let animation = self.animation.get_or_insert(EasedSpan::new(frame.geometry));
                animation.target = frame.geometry;
                if immediate {
                    animation.displayed = frame.geometry;
                }
                gesture.frame = Some(frame);
            }
            Err(e) => {
                tracing::warn!(group = %self.group_id, task = %gesture.task.id, "drag frame dropped: {e}");
            }
        }
        gesture.frame.as_ref()
    }

    /// Finish the gesture and produce its commit, if any preview was reached.
    pub fn pointer_up(&mut self, window: &TimelineWindow) -> Option<TaskCommit> {
        let state = std::mem::take(&mut self.state);
        self.animation = None;
        let DragState::Dragging(gesture) = state else {
            return None;
        };
        let Some(frame) = gesture.frame else {
            tracing::debug!(group = %self.group_id, task = %gesture.task.id, "drag ended without movement");
            return None;
        };
        let task = clamp_task_to_window(&frame.preview, window);
        tracing::debug!(
            group = %self.group_id,
            task = %task.id,
            start = ?task.start_date,
            end = ?task.end_date,
            "drag committed"
        );
        Some(TaskCommit {
            group_id: self.group_id.clone(),
            task,
        })
    }

    /// The pointer left the window; treated as a release.
    pub fn pointer_leave(&mut self, window: &TimelineWindow) -> Option<TaskCommit> {
        self.pointer_up(window)
    }

    /// Abort any gesture and pending animation without committing.
    pub fn cancel(&mut self) {
        if let DragState::Dragging(gesture) = std::mem::take(&mut self.state) {
            tracing::debug!(group = %self.group_id, task = %gesture.task.id, "drag aborted");
        }
        self.animation = None;
        self.hovered = None;
    }

    /// Advance the easing animation by one frame. Returns true while still moving.
    pub fn tick(&mut self) -> bool {
        match &mut self.animation {
            Some(animation) if self.easing_enabled => !animation.step(self.easing_rate),
            Some(animation) => {
                animation.displayed = animation.target;
                false
            }
            None => false,
        }
    }

    /// Geometry to draw for the dragged bar right now.
    pub fn displayed_span(&self) -> Option<PixelSpan> {
        if !self.is_dragging() {
            return None;
        }
        self.animation.map(|a| a.displayed)
    }
}

impl Drop for RowController {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn compute_frame(gesture: &Gesture, pointer_x: f64, window: &TimelineWindow, row_tasks: &[Task]) -> Result<DragFrame> {
    let delta = finite_or_zero(pointer_x) - gesture.start_x;
    // An unmoved pointer leaves the task exactly where it was.
    let candidate = if delta == 0.0 {
        gesture.initial
    } else {
        candidate_span(gesture.kind, gesture.initial, delta, window.total_width())
    };
    if !candidate.is_finite() {
        return Err(GanttError::NonFiniteGeometry {
            left: candidate.left,
            width: candidate.width,
        });
    }
    let dates = pixels_to_dates(candidate, window);
    let preview = gesture.task.with_dates(dates.start, dates.end);
    // Day columns snap, so show where the dates actually landed.
    let geometry = if window.view_mode.policy().snap_to_days {
        task_to_pixels(&preview, window)
    } else {
        visible_span(candidate, window)
    };
    let rows = preview_arrangement(&preview, row_tasks, window.view_mode);
    Ok(DragFrame {
        geometry,
        preview,
        rows,
    })
}
