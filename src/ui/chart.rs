use chrono::Locale;
use egui::{Color32, Id, Pos2, Rect, Rounding, Sense, Stroke, Ui, Vec2};

use gantt_timeline::chart::{GanttChart, GanttEvents, GroupLayout, TaskBar};
use gantt_timeline::interaction::DragKind;
use gantt_timeline::model::{TaskGroup, TimelineWindow};
use gantt_timeline::position::date_to_x;
use gantt_timeline::units::{duration, format_date_range, unit_header_label};

use crate::ui::theme;

const ROW_HEIGHT: f32 = theme::ROW_HEIGHT;
const ROW_GAP: f32 = theme::ROW_GAP;
const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const HANDLE_WIDTH: f32 = theme::HANDLE_WIDTH;

fn lane_height(layout: &GroupLayout) -> f32 {
    theme::LANE_PADDING + layout.row_count as f32 * (ROW_HEIGHT + ROW_GAP) + ROW_GAP
}

/// Render the chart and route pointer input into the engine.
///
/// All geometry comes from `chart.layout`; this function only paints it.
pub fn show_gantt_chart(
    chart: &mut GanttChart,
    groups: &[TaskGroup],
    locale: Locale,
    events: &mut impl GanttEvents,
    ui: &mut Ui,
) {
    let layouts = chart.layout(groups);
    let window = chart.window().clone();
    let available = ui.available_size();
    let chart_width = (window.total_width() as f32).max(available.x);
    let chart_height = HEADER_HEIGHT + layouts.iter().map(lane_height).sum::<f32>() + 40.0;

    egui::ScrollArea::both()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(
                Vec2::new(chart_width, chart_height.max(available.y)),
                Sense::hover(),
            );
            let origin = response.rect.min;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_timeline_header(&painter, origin, &window, locale, chart_width, response.rect.height());

            let mut lane_top = origin.y + HEADER_HEIGHT;
            for (lane_index, (group, layout)) in groups.iter().zip(&layouts).enumerate() {
                let height = lane_height(layout);
                let lane_rect = Rect::from_min_size(Pos2::new(origin.x, lane_top), Vec2::new(chart_width, height));
                let lane_bg = if lane_index % 2 == 0 { theme::BG_PANEL } else { theme::BG_LANE_ALT };
                painter.rect_filled(lane_rect, 0.0, lane_bg);
                painter.line_segment(
                    [lane_rect.left_bottom(), lane_rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );

                let label_rect = Rect::from_min_size(lane_rect.min, Vec2::new(chart_width, theme::LANE_PADDING));
                let label_response = ui.interact(label_rect, Id::new(("lane-label", &group.id)), Sense::click());
                painter.text(
                    Pos2::new(lane_rect.left() + 6.0, lane_rect.top() + theme::LANE_PADDING / 2.0),
                    egui::Align2::LEFT_CENTER,
                    &group.name,
                    theme::font_lane(),
                    theme::TEXT_SECONDARY,
                );
                if label_response.clicked() {
                    chart.click_group(groups, &group.id, events);
                }

                chart.hover(&group.id, None);
                let rows_top = lane_top + theme::LANE_PADDING;
                for (bar_index, bar) in layout.bars.iter().enumerate() {
                    let y = rows_top + bar.row as f32 * (ROW_HEIGHT + ROW_GAP);
                    let is_selected = chart.selected() == Some(bar.task.id.as_str());
                    let bar_rect = draw_task_bar(&painter, origin, bar, y, bar_index, is_selected);
                    handle_bar_input(chart, groups, &group.id, bar, bar_rect, origin, locale, events, ui);
                }

                lane_top += height;
            }

            // Pointer tracking is global while a gesture is live, so the bar
            // keeps following even when the pointer outruns it.
            if chart.is_dragging() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
                if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
                    chart.pointer_move(groups, (pos.x - origin.x) as f64);
                }
                if ui.input(|i| i.pointer.any_released()) {
                    chart.pointer_up(events);
                }
            }

            if chart.tick() || chart.is_dragging() {
                ui.ctx().request_repaint();
            }
        });
}

#[allow(clippy::too_many_arguments)]
fn handle_bar_input(
    chart: &mut GanttChart,
    groups: &[TaskGroup],
    group_id: &str,
    bar: &TaskBar,
    bar_rect: Rect,
    origin: Pos2,
    locale: Locale,
    events: &mut impl GanttEvents,
    ui: &mut Ui,
) {
    let task_id = bar.task.id.as_str();
    let body = ui.interact(bar_rect, Id::new(("task-bar", group_id, task_id)), Sense::click_and_drag());
    let left_handle = Rect::from_min_max(
        Pos2::new(bar_rect.left() - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(bar_rect.left() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    let right_handle = Rect::from_min_max(
        Pos2::new(bar_rect.right() - HANDLE_WIDTH * 0.5, bar_rect.top()),
        Pos2::new(bar_rect.right() + HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    let left = ui.interact(left_handle, Id::new(("task-resize-left", group_id, task_id)), Sense::drag());
    let right = ui.interact(right_handle, Id::new(("task-resize-right", group_id, task_id)), Sense::drag());

    let grab = [
        (&left, DragKind::ResizeStart),
        (&right, DragKind::ResizeEnd),
        (&body, DragKind::Move),
    ]
    .into_iter()
    .find(|(response, _)| response.drag_started());
    if let Some((response, kind)) = grab {
        let ptr_x = response.interact_pointer_pos().map(|p| p.x).unwrap_or(origin.x);
        chart.pointer_down(groups, group_id, task_id, kind, (ptr_x - origin.x) as f64);
    }

    if body.clicked() {
        chart.click_task(groups, group_id, task_id, events);
    }

    let hovered = body.hovered() || left.hovered() || right.hovered();
    if left.hovered() || right.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeHorizontal);
    }
    if hovered {
        chart.hover(group_id, Some(task_id));
        let task = &bar.task;
        egui::show_tooltip_at_pointer(
            ui.ctx(),
            ui.layer_id(),
            Id::new(("task-tip", group_id, task_id)),
            |ui| {
                ui.strong(task.display_name());
                ui.label(format_date_range(task.start_date, task.end_date, locale));
                ui.label(duration(task.start_date, task.end_date, chart.view_mode()).to_string());
                if let Some(percent) = task.percent {
                    ui.label(format!("Progress: {percent:.0}%"));
                }
            },
        );
    }
}

fn draw_timeline_header(
    painter: &egui::Painter,
    origin: Pos2,
    window: &TimelineWindow,
    locale: Locale,
    width: f32,
    height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for unit in window.units() {
        let x = origin.x + date_to_x(unit.max(window.start), window) as f32;
        painter.line_segment(
            [Pos2::new(x, origin.y + HEADER_HEIGHT), Pos2::new(x, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(x + 4.0, origin.y + HEADER_HEIGHT / 2.0),
            egui::Align2::LEFT_CENTER,
            unit_header_label(unit, window.view_mode, locale),
            theme::font_header(),
            theme::TEXT_PRIMARY,
        );
    }
}

fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    bar: &TaskBar,
    y: f32,
    color_index: usize,
    is_selected: bool,
) -> Rect {
    let inset = theme::BAR_INSET;
    let bar_width = bar.span.width as f32;
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + bar.span.left as f32, y + inset),
        Vec2::new(bar_width, ROW_HEIGHT - inset * 2.0),
    );
    let rounding = Rounding::same(theme::BAR_ROUNDING);
    let mut color = theme::task_color(bar.task.color.as_deref(), color_index);
    if bar.is_preview {
        color = color.gamma_multiply(0.85);
    }

    painter.rect_filled(bar_rect.translate(Vec2::new(1.0, 2.0)), rounding, Color32::from_black_alpha(35));
    painter.rect_filled(bar_rect, rounding, color);

    if let Some(percent) = bar.task.percent.filter(|p| *p > 0.0) {
        let progress_width = bar_width * (percent / 100.0).clamp(0.0, 1.0);
        let progress_rect = Rect::from_min_size(bar_rect.min, Vec2::new(progress_width, bar_rect.height()));
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if is_selected || bar.is_preview {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
        let handle_h = bar_rect.height() * 0.55;
        let handle_y = bar_rect.center().y - handle_h / 2.0;
        for x in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x, handle_y), Vec2::new(4.0, handle_h)),
                Rounding::same(2.0),
                theme::HANDLE_COLOR,
            );
        }
    }

    if bar_width > 30.0 {
        let galley = painter.layout_no_wrap(
            bar.task.display_name().to_owned(),
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        painter
            .with_clip_rect(bar_rect)
            .galley(Pos2::new(bar_rect.left() + 6.0, text_y), galley, Color32::TRANSPARENT);
    }

    bar_rect
}
