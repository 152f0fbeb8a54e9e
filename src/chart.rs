//! Multi-swimlane chart state: one gesture controller per group, the
//! shared window, selection, and dispatch of host callbacks.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::collision::detect_overlaps;
use crate::config::GanttSettings;
use crate::interaction::{DragKind, RowController, TaskCommit};
use crate::model::{Task, TaskGroup, TimelineWindow, ViewMode};
use crate::position::{task_to_pixels, PixelSpan};
use crate::range::derive_window;

/// Host callbacks. Every method defaults to doing nothing.
pub trait GanttEvents {
    /// A drag finished; fired exactly once per completed gesture.
    fn on_task_update(&mut self, _group_id: &str, _task: &Task) {}
    fn on_task_click(&mut self, _task: &Task, _group: &TaskGroup) {}
    fn on_task_select(&mut self, _task: &Task, _selected: bool) {}
    fn on_group_click(&mut self, _group: &TaskGroup) {}
    fn on_view_mode_change(&mut self, _mode: ViewMode) {}
}

impl GanttEvents for () {}

/// One bar ready to draw.
#[derive(Debug, Clone)]
pub struct TaskBar {
    pub task: Task,
    pub row: usize,
    pub span: PixelSpan,
    /// The bar is the live preview of a drag in progress.
    pub is_preview: bool,
}

#[derive(Debug, Clone)]
pub struct GroupLayout {
    pub group_id: String,
    pub row_count: usize,
    pub bars: Vec<TaskBar>,
}

pub struct GanttChart {
    settings: GanttSettings,
    explicit_window: Option<(NaiveDateTime, NaiveDateTime)>,
    window: TimelineWindow,
    rows: HashMap<String, RowController>,
    selected: Option<String>,
}

impl GanttChart {
    pub fn new(groups: &[TaskGroup], settings: GanttSettings, explicit_window: Option<(NaiveDateTime, NaiveDateTime)>) -> Self {
        let window = derive_window(groups, explicit_window, settings.view_mode, settings.unit_width());
        let mut chart = Self {
            settings,
            explicit_window,
            window,
            rows: HashMap::new(),
            selected: None,
        };
        chart.sync_groups(groups);
        chart
    }

    pub fn window(&self) -> &TimelineWindow {
        &self.window
    }

    pub fn view_mode(&self) -> ViewMode {
        self.settings.view_mode
    }

    pub fn settings(&self) -> &GanttSettings {
        &self.settings
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_dragging(&self) -> bool {
        self.rows.values().any(RowController::is_dragging)
    }

    pub fn row_controller(&self, group_id: &str) -> Option<&RowController> {
        self.rows.get(group_id)
    }

    /// Re-derive the window and controllers after the host changed its groups.
    pub fn sync_groups(&mut self, groups: &[TaskGroup]) {
        self.window = derive_window(
            groups,
            self.explicit_window,
            self.settings.view_mode,
            self.settings.unit_width(),
        );
        self.rows.retain(|id, _| groups.iter().any(|g| &g.id == id));
        for group in groups {
            if !self.rows.contains_key(&group.id) {
                let controller = RowController::new(group.id.clone())
                    .with_easing(self.settings.easing_rate, self.settings.easing_enabled);
                self.rows.insert(group.id.clone(), controller);
            }
        }
    }

    pub fn set_explicit_window(&mut self, bounds: Option<(NaiveDateTime, NaiveDateTime)>, groups: &[TaskGroup]) {
        self.explicit_window = bounds;
        self.teardown();
        self.sync_groups(groups);
    }

    /// Switch zoom level. Live gestures are aborted since their geometry no
    /// longer matches the window.
    pub fn set_view_mode(&mut self, mode: ViewMode, groups: &[TaskGroup], events: &mut impl GanttEvents) {
        if mode == self.settings.view_mode {
            return;
        }
        self.teardown();
        self.settings.view_mode = mode;
        self.sync_groups(groups);
        events.on_view_mode_change(mode);
    }

    pub fn set_unit_width(&mut self, width: f64, groups: &[TaskGroup]) {
        self.teardown();
        self.settings.unit_widths.set(self.settings.view_mode, width);
        self.sync_groups(groups);
    }

    /// Rows and pixel spans for every group. A group mid-gesture uses its
    /// live preview arrangement.
    pub fn layout(&self, groups: &[TaskGroup]) -> Vec<GroupLayout> {
        groups.iter().map(|g| self.group_layout(g)).collect()
    }

    fn group_layout(&self, group: &TaskGroup) -> GroupLayout {
        let controller = self.rows.get(&group.id);
        let frame = controller.and_then(RowController::frame);
        let dragged_id = controller.and_then(|c| c.gesture()).map(|g| g.task.id.as_str());

        let arrangement = match frame {
            Some(frame) => frame.rows.clone(),
            None => detect_overlaps(&group.tasks, self.settings.view_mode),
        };

        let mut bars = Vec::new();
        for (row, tasks) in arrangement.iter().enumerate() {
            for task in tasks {
                let is_preview = frame.is_some() && Some(task.id.as_str()) == dragged_id;
                let span = if is_preview {
                    controller
                        .and_then(RowController::displayed_span)
                        .unwrap_or_else(|| task_to_pixels(task, &self.window))
                } else {
                    task_to_pixels(task, &self.window)
                };
                bars.push(TaskBar {
                    task: task.clone(),
                    row,
                    span,
                    is_preview,
                });
            }
        }

        // Unreadable dates get their own rows at the window origin so the
        // task stays visible.
        let mut row_count = arrangement.len();
        for task in group.tasks.iter().filter(|t| !t.has_valid_dates()) {
            bars.push(TaskBar {
                task: task.clone(),
                row: row_count,
                span: task_to_pixels(task, &self.window),
                is_preview: false,
            });
            row_count += 1;
        }

        GroupLayout {
            group_id: group.id.clone(),
            row_count: row_count.max(1),
            bars,
        }
    }

    /// Begin a gesture on a task. Returns false when the task is unknown or
    /// the group already has a gesture in progress.
    pub fn pointer_down(&mut self, groups: &[TaskGroup], group_id: &str, task_id: &str, kind: DragKind, pointer_x: f64) -> bool {
        let Some(task) = groups
            .iter()
            .find(|g| g.id == group_id)
            .and_then(|g| g.task(task_id))
        else {
            tracing::debug!(group = group_id, task = task_id, "pointer down on unknown task");
            return false;
        };
        match self.rows.get_mut(group_id) {
            Some(controller) => controller.pointer_down(task, kind, pointer_x, &self.window),
            None => false,
        }
    }

    pub fn pointer_move(&mut self, groups: &[TaskGroup], pointer_x: f64) {
        for group in groups {
            if let Some(controller) = self.rows.get_mut(&group.id) {
                if controller.is_dragging() {
                    controller.pointer_move(pointer_x, &self.window, &group.tasks);
                }
            }
        }
    }

    /// Finish every live gesture and report commits through `events`.
    pub fn pointer_up(&mut self, events: &mut impl GanttEvents) -> Vec<TaskCommit> {
        let window = &self.window;
        let commits: Vec<TaskCommit> = self
            .rows
            .values_mut()
            .filter_map(|controller| controller.pointer_up(window))
            .collect();
        for commit in &commits {
            events.on_task_update(&commit.group_id, &commit.task);
        }
        commits
    }

    pub fn pointer_leave(&mut self, events: &mut impl GanttEvents) -> Vec<TaskCommit> {
        self.pointer_up(events)
    }

    pub fn hover(&mut self, group_id: &str, task_id: Option<&str>) {
        if let Some(controller) = self.rows.get_mut(group_id) {
            controller.hover(task_id);
        }
    }

    /// Click on a bar: reports the click and toggles selection.
    pub fn click_task(&mut self, groups: &[TaskGroup], group_id: &str, task_id: &str, events: &mut impl GanttEvents) {
        let Some(group) = groups.iter().find(|g| g.id == group_id) else {
            return;
        };
        let Some(task) = group.task(task_id) else {
            return;
        };
        events.on_task_click(task, group);

        if self.selected.as_deref() == Some(task_id) {
            self.selected = None;
            events.on_task_select(task, false);
            return;
        }
        if let Some(previous) = self.selected.take() {
            if let Some(prev_task) = groups.iter().find_map(|g| g.task(&previous)) {
                events.on_task_select(prev_task, false);
            }
        }
        self.selected = Some(task_id.to_owned());
        events.on_task_select(task, true);
    }

    pub fn click_group(&mut self, groups: &[TaskGroup], group_id: &str, events: &mut impl GanttEvents) {
        if let Some(group) = groups.iter().find(|g| g.id == group_id) {
            events.on_group_click(group);
        }
    }

    /// Advance drag animations. Returns true while any bar is still moving.
    pub fn tick(&mut self) -> bool {
        self.rows.values_mut().fold(false, |moving, c| c.tick() || moving)
    }

    /// Abort all gestures and animations without committing.
    pub fn teardown(&mut self) {
        for controller in self.rows.values_mut() {
            controller.cancel();
        }
    }
}

impl Drop for GanttChart {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::units::end_of_day;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        updates: Vec<(String, Task)>,
        clicks: Vec<String>,
        selections: Vec<(String, bool)>,
        groups: Vec<String>,
        modes: Vec<ViewMode>,
    }

    impl GanttEvents for Recorder {
        fn on_task_update(&mut self, group_id: &str, task: &Task) {
            self.updates.push((group_id.to_owned(), task.clone()));
        }
        fn on_task_click(&mut self, task: &Task, _group: &TaskGroup) {
            self.clicks.push(task.id.clone());
        }
        fn on_task_select(&mut self, task: &Task, selected: bool) {
            self.selections.push((task.id.clone(), selected));
        }
        fn on_group_click(&mut self, group: &TaskGroup) {
            self.groups.push(group.id.clone());
        }
        fn on_view_mode_change(&mut self, mode: ViewMode) {
            self.modes.push(mode);
        }
    }

    fn groups() -> Vec<TaskGroup> {
        vec![
            TaskGroup::new(
                "eng",
                "Engineering",
                vec![
                    Task::new("a", "Design", at(2024, 1, 1), end_of_day(at(2024, 1, 10))),
                    Task::new("b", "Build", at(2024, 1, 5), end_of_day(at(2024, 1, 20))),
                ],
            ),
            TaskGroup::new(
                "ops",
                "Operations",
                vec![Task::new("c", "Deploy", at(2024, 1, 22), end_of_day(at(2024, 1, 25)))],
            ),
        ]
    }

    fn day_settings() -> GanttSettings {
        let mut settings = GanttSettings::default();
        settings.view_mode = ViewMode::Day;
        settings.unit_widths.set(ViewMode::Day, 20.0);
        settings
    }

    #[test]
    fn test_layout_packs_each_group() {
        let groups = groups();
        let chart = GanttChart::new(&groups, day_settings(), None);
        let layout = chart.layout(&groups);
        assert_eq!(layout.len(), 2);
        assert_eq!(layout[0].row_count, 2);
        assert_eq!(layout[1].row_count, 1);
        let b = layout[0].bars.iter().find(|bar| bar.task.id == "b").unwrap();
        assert_eq!(b.row, 1);
        assert_eq!(b.span, PixelSpan::new(80.0, 320.0));
    }

    #[test]
    fn test_invalid_task_gets_a_bar_at_the_origin() {
        let mut groups = groups();
        let mut broken = Task::new("x", "Broken", at(2024, 1, 3), at(2024, 1, 4));
        broken.start_date = None;
        groups[1].tasks.push(broken);

        let chart = GanttChart::new(&groups, day_settings(), None);
        let layout = chart.layout(&groups);
        assert_eq!(layout[1].row_count, 2);
        let bar = layout[1].bars.iter().find(|bar| bar.task.id == "x").unwrap();
        assert_eq!(bar.row, 1);
        assert_eq!(bar.span, PixelSpan::new(0.0, 20.0));
        assert!(!bar.is_preview);
    }

    #[test]
    fn test_empty_groups_produce_empty_layout() {
        let chart = GanttChart::new(&[], GanttSettings::default(), None);
        assert!(chart.layout(&[]).is_empty());
        let empty = vec![TaskGroup::new("g", "Empty", Vec::new())];
        let layout = chart.layout(&empty);
        assert!(layout[0].bars.is_empty());
    }

    #[test]
    fn test_drag_commits_once_through_callback() {
        let groups = groups();
        let mut chart = GanttChart::new(&groups, day_settings(), None);
        let mut events = Recorder::default();

        assert!(chart.pointer_down(&groups, "eng", "b", DragKind::Move, 100.0));
        chart.pointer_move(&groups, 200.0);
        chart.pointer_move(&groups, 300.0);

        let live = chart.layout(&groups);
        assert_eq!(live[0].row_count, 1);
        assert!(live[0].bars.iter().any(|bar| bar.is_preview && bar.task.id == "b"));
        assert!(events.updates.is_empty());

        let commits = chart.pointer_up(&mut events);
        assert_eq!(commits.len(), 1);
        assert_eq!(events.updates.len(), 1);
        let (group_id, task) = &events.updates[0];
        assert_eq!(group_id, "eng");
        assert_eq!(task.start_date, Some(at(2024, 1, 15)));
        assert!(!chart.is_dragging());

        assert!(chart.pointer_up(&mut events).is_empty());
        assert_eq!(events.updates.len(), 1);
    }

    #[test]
    fn test_pointer_down_on_unknown_task_is_rejected() {
        let groups = groups();
        let mut chart = GanttChart::new(&groups, day_settings(), None);
        assert!(!chart.pointer_down(&groups, "eng", "zzz", DragKind::Move, 0.0));
        assert!(!chart.pointer_down(&groups, "nope", "a", DragKind::Move, 0.0));
    }

    #[test]
    fn test_view_mode_change_aborts_gesture_and_notifies() {
        let groups = groups();
        let mut chart = GanttChart::new(&groups, day_settings(), None);
        let mut events = Recorder::default();
        chart.pointer_down(&groups, "eng", "a", DragKind::ResizeEnd, 0.0);
        chart.pointer_move(&groups, 60.0);

        chart.set_view_mode(ViewMode::Week, &groups, &mut events);
        assert_eq!(events.modes, vec![ViewMode::Week]);
        assert_eq!(chart.window().view_mode, ViewMode::Week);
        assert!(chart.pointer_up(&mut events).is_empty());
        assert!(events.updates.is_empty());

        chart.set_view_mode(ViewMode::Week, &groups, &mut events);
        assert_eq!(events.modes.len(), 1);
    }

    #[test]
    fn test_click_toggles_selection() {
        let groups = groups();
        let mut chart = GanttChart::new(&groups, day_settings(), None);
        let mut events = Recorder::default();

        chart.click_task(&groups, "eng", "a", &mut events);
        chart.click_task(&groups, "ops", "c", &mut events);
        chart.click_task(&groups, "ops", "c", &mut events);
        chart.click_group(&groups, "ops", &mut events);

        assert_eq!(events.clicks, vec!["a", "c", "c"]);
        assert_eq!(
            events.selections,
            vec![
                ("a".to_string(), true),
                ("a".to_string(), false),
                ("c".to_string(), true),
                ("c".to_string(), false),
            ]
        );
        assert_eq!(chart.selected(), None);
        assert_eq!(events.groups, vec!["ops"]);
    }

    #[test]
    fn test_explicit_window_overrides_derivation() {
        let groups = groups();
        let chart = GanttChart::new(&groups, day_settings(), Some((at(2024, 1, 10), end_of_day(at(2024, 1, 19)))));
        assert_eq!(chart.window().total_units, 10);
        let layout = chart.layout(&groups);
        for bar in layout.iter().flat_map(|g| &g.bars) {
            assert!(bar.span.left >= 0.0);
            assert!(bar.span.right() <= chart.window().total_width());
        }
    }

    #[test]
    fn test_sync_drops_controllers_for_removed_groups() {
        let mut groups = groups();
        let mut chart = GanttChart::new(&groups, day_settings(), None);
        groups.pop();
        chart.sync_groups(&groups);
        assert!(chart.row_controller("ops").is_none());
        assert!(chart.row_controller("eng").is_some());
    }
}
