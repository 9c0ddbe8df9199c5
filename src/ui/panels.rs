use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::{self, Align, Color32, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::charts::ChartBundle;
use crate::state::AppState;
use crate::ui::class_label;

pub const DASHBOARD_TITLE: &str = "Steam Games Dashboard";
pub const FOOTER_TEXT: &str = "© 2024 Steam Dashboard.";

// ---------------------------------------------------------------------------
// Left side panel – publisher class filter and top developers
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter by publisher class");
    ui.separator();

    let n_selected = state.selection.len();
    let n_total = state.dataset.publisher_classes.len();
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!("{n_selected}/{n_total} selected"));
        ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
            if ui.small_button("None").clicked() {
                state.select_none();
            }
            if ui.small_button("All").clicked() {
                state.select_all();
            }
        });
    });

    // The legend doubles as the option list; it is owned so the state can
    // be mutated inside the loop.
    for (class, color) in state.color_map.legend_entries() {
        let mut checked = state.selection.contains(&class);
        let label = class_label(&class);
        if ui.checkbox(&mut checked, RichText::new(label).color(color)).changed() {
            state.set_class_selected(&class, checked);
        }
    }

    ui.add_space(12.0);
    ui.heading("Top developers");
    ui.label(RichText::new("By number of games, whole dataset").small().weak());
    ui.separator();
    top_developers_table(ui, state);
}

fn top_developers_table(ui: &mut Ui, state: &AppState) {
    if state.dataset.top_developers.is_empty() {
        ui.label("No developers in the dataset.");
        return;
    }

    ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto())
            .column(Column::remainder().at_least(120.0))
            .column(Column::auto())
            .header(20.0, |mut header| {
                header.col(|ui| {
                    ui.strong("#");
                });
                header.col(|ui| {
                    ui.strong("Developer");
                });
                header.col(|ui| {
                    ui.strong("Games");
                });
            })
            .body(|mut body| {
                for (rank, entry) in state.dataset.top_developers.iter().enumerate() {
                    body.row(18.0, |mut row| {
                        row.col(|ui| {
                            ui.label((rank + 1).to_string());
                        });
                        row.col(|ui| {
                            ui.label(&entry.developer);
                        });
                        row.col(|ui| {
                            ui.label(entry.games.to_string());
                        });
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar, header and footer
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export charts…").clicked() {
                export_dialog(state);
                ui.close_menu();
            }
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();

        ui.label(format!(
            "{} games loaded, {} visible",
            state.dataset.len(),
            state.visible_count()
        ));

        if state.debug {
            ui.separator();
            ui.label(
                RichText::new(format!("recompute {:.2?}", state.last_recompute)).monospace(),
            );
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

pub fn header(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(6.0);
        ui.heading(RichText::new(DASHBOARD_TITLE).size(26.0).strong());
        ui.add_space(6.0);
    });
}

pub fn footer(ui: &mut Ui) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(FOOTER_TEXT).weak());
    });
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export charts")
        .set_file_name("charts.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        match write_bundle(&path, &state.charts) {
            Ok(()) => {
                log::info!("Exported charts to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export charts: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}

/// Write the chart descriptors as pretty-printed JSON.
pub fn write_bundle(path: &Path, bundle: &ChartBundle) -> Result<()> {
    let json = bundle.to_json().context("serialising charts")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
