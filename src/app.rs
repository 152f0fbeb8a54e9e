use std::path::PathBuf;

use chrono::{Duration, Locale, NaiveDateTime};

use gantt_timeline::chart::{GanttChart, GanttEvents};
use gantt_timeline::config::GanttSettings;
use gantt_timeline::model::{Task, TaskGroup, ViewMode};
use gantt_timeline::units::{end_of_day, format_date_range, start_of_day};

use crate::ui;

const MIN_UNIT_WIDTH: f64 = 8.0;
const MAX_UNIT_WIDTH: f64 = 480.0;

/// Callback sink for one frame; applied to the app once the chart has drawn.
#[derive(Default)]
struct FrameEvents {
    updates: Vec<(String, Task)>,
    status: Option<String>,
    locale: Option<Locale>,
}

impl GanttEvents for FrameEvents {
    fn on_task_update(&mut self, group_id: &str, task: &Task) {
        let locale = self.locale.unwrap_or(Locale::en_US);
        self.status = Some(format!(
            "Updated '{}' ({})",
            task.display_name(),
            format_date_range(task.start_date, task.end_date, locale)
        ));
        self.updates.push((group_id.to_owned(), task.clone()));
    }

    fn on_task_select(&mut self, task: &Task, selected: bool) {
        if selected {
            self.status = Some(format!("Selected '{}'", task.display_name()));
        }
    }

    fn on_group_click(&mut self, group: &TaskGroup) {
        self.status = Some(format!("{}: {} tasks", group.name, group.tasks.len()));
    }

    fn on_view_mode_change(&mut self, mode: ViewMode) {
        self.status = Some(format!("{} view", mode.label()));
    }
}

/// Main application state.
pub struct GanttApp {
    pub groups: Vec<TaskGroup>,
    pub chart: GanttChart,
    pub file_path: Option<PathBuf>,
    pub status_message: String,
    pub locale: Locale,
}

impl GanttApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let groups = Self::sample_groups();
        let settings = GanttSettings::load();
        let chart = GanttChart::new(&groups, settings, None);
        Self {
            groups,
            chart,
            file_path: None,
            status_message: "Ready".to_string(),
            locale: Locale::en_US,
        }
    }

    /// Generate sample swimlanes for demonstration.
    fn sample_groups() -> Vec<TaskGroup> {
        let today = start_of_day(chrono::Local::now().naive_local());
        let span = |id: &str, name: &str, from: i64, to: i64| -> Task {
            let start: NaiveDateTime = today + Duration::days(from);
            Task::new(id, name, start, end_of_day(today + Duration::days(to)))
        };

        let mut kickoff = span("kickoff", "Project Kickoff", -5, -2);
        kickoff.percent = Some(100.0);
        let mut requirements = span("requirements", "Requirements", -3, 5);
        requirements.percent = Some(60.0);
        let mut ui_design = span("ui-design", "UI Design", 6, 18);
        ui_design.dependencies = vec!["requirements".to_string()];
        let mut backend = span("backend", "Backend Development", 6, 28);
        backend.color = Some("#6a5acd".to_string());
        let qa = span("qa", "Testing & QA", 22, 30);
        let launch = span("launch", "Launch", 32, 32);

        vec![
            TaskGroup::new("planning", "Planning", vec![kickoff, requirements]),
            TaskGroup::new("execution", "Execution", vec![ui_design, backend, qa]),
            TaskGroup::new("release", "Release", vec![launch]),
        ]
    }

    fn replace_groups(&mut self, groups: Vec<TaskGroup>) {
        self.chart.teardown();
        self.groups = groups;
        self.chart.sync_groups(&self.groups);
    }

    fn persist_settings(&self) {
        if let Err(e) = self.chart.settings().save() {
            tracing::warn!("failed to save settings: {e}");
        }
    }

    // --- File operations ---

    pub fn open_groups(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["json"])
            .pick_file()
        {
            match gantt_timeline::io::load_groups(&path) {
                Ok(groups) => {
                    self.replace_groups(groups);
                    self.file_path = Some(path);
                    self.status_message = "Timeline loaded".to_string();
                }
                Err(e) => self.status_message = format!("Error loading: {e}"),
            }
        }
    }

    pub fn save_groups(&mut self) {
        match self.file_path.clone() {
            Some(path) => self.write_groups(path),
            None => self.save_groups_as(),
        }
    }

    pub fn save_groups_as(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Timeline", &["json"])
            .set_file_name("timeline.json")
            .save_file()
        {
            self.write_groups(path);
        }
    }

    fn write_groups(&mut self, path: PathBuf) {
        match gantt_timeline::io::save_groups(&self.groups, &path) {
            Ok(()) => {
                self.file_path = Some(path);
                self.status_message = "Timeline saved".to_string();
            }
            Err(e) => self.status_message = format!("Error saving: {e}"),
        }
    }

    pub fn import_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv", "txt"])
            .pick_file()
        {
            match gantt_timeline::io::import_csv(&path) {
                Ok((groups, skipped)) => {
                    let count: usize = groups.iter().map(|g| g.tasks.len()).sum();
                    self.replace_groups(groups);
                    self.file_path = None;
                    self.status_message = if skipped > 0 {
                        format!("Imported {count} tasks ({skipped} rows skipped)")
                    } else {
                        format!("Imported {count} tasks")
                    };
                }
                Err(e) => self.status_message = format!("CSV import failed: {e}"),
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.groups.iter().all(|g| g.tasks.is_empty()) {
            self.status_message = "Nothing to export".to_string();
            return;
        }
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name("timeline.csv")
            .save_file()
        {
            match gantt_timeline::io::export_csv(&self.groups, &path) {
                Ok(count) => self.status_message = format!("Exported {count} tasks to CSV"),
                Err(e) => self.status_message = format!("CSV export failed: {e}"),
            }
        }
    }

    // --- View operations ---

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        let mut events = FrameEvents::default();
        self.chart.set_view_mode(mode, &self.groups, &mut events);
        self.apply_events(events);
        self.persist_settings();
    }

    pub fn zoom(&mut self, factor: f64) {
        let width = (self.chart.settings().unit_width() * factor).clamp(MIN_UNIT_WIDTH, MAX_UNIT_WIDTH);
        self.chart.set_unit_width(width, &self.groups);
        self.persist_settings();
    }

    fn apply_events(&mut self, events: FrameEvents) {
        let changed = !events.updates.is_empty();
        for (group_id, task) in events.updates {
            match self.groups.iter_mut().find(|g| g.id == group_id) {
                Some(group) => {
                    if !group.replace_task(task) {
                        tracing::warn!(group = %group_id, "committed task no longer exists");
                    }
                }
                None => tracing::warn!(group = %group_id, "commit for unknown group"),
            }
        }
        if changed {
            self.chart.sync_groups(&self.groups);
        }
        if let Some(status) = events.status {
            self.status_message = status;
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        let should_save = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::S));
        if should_save {
            self.save_groups();
        }
        let zoom = ctx.input(|i| i.zoom_delta());
        if zoom != 1.0 && !self.chart.is_dragging() {
            self.zoom(zoom as f64);
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let tasks: usize = self.groups.iter().map(|g| g.tasks.len()).sum();
                        ui.label(
                            egui::RichText::new(format!(
                                "{} view · {} groups · {} tasks",
                                self.chart.view_mode().label(),
                                self.groups.len(),
                                tasks
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        let mut events = FrameEvents {
            locale: Some(self.locale),
            ..Default::default()
        };
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            ui::chart::show_gantt_chart(&mut self.chart, &self.groups, self.locale, &mut events, ui);
        });
        self.apply_events(events);
    }
}
