use egui::{menu, RichText, Ui};

use gantt_timeline::model::ViewMode;

use crate::app::GanttApp;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  "), |ui| {
            if ui.button("  Open...").clicked() {
                app.open_groups();
                ui.close_menu();
            }
            if ui.button("  Save          Ctrl+S").clicked() {
                app.save_groups();
                ui.close_menu();
            }
            if ui.button("  Save As...").clicked() {
                app.save_groups_as();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Import CSV...").clicked() {
                app.import_csv();
                ui.close_menu();
            }
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  "), |ui| {
            if ui.button("  Zoom In        Ctrl+Scroll ↑").clicked() {
                app.zoom(1.2);
                ui.close_menu();
            }
            if ui.button("  Zoom Out      Ctrl+Scroll ↓").clicked() {
                app.zoom(1.0 / 1.2);
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Timeline Scale").small().weak());
            let current = app.chart.view_mode();
            for mode in ViewMode::ALL {
                if ui.radio(current == mode, mode.label()).clicked() {
                    app.set_view_mode(mode);
                    ui.close_menu();
                }
            }
        });

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let name = app
                .file_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "(unsaved)".to_string());
            ui.label(RichText::new(name).size(11.0).weak());
        });
    });
}
