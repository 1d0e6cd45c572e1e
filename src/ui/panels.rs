use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::Visualization;
use crate::data::filter::{PartFilter, YearSelection};
use crate::state::SessionState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut SessionState) {
    ui.heading("🌟 Customize the display");
    ui.separator();

    if state.table.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    let years = state.years();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Year ----
            ui.strong("📅 Choose Year");
            egui::ComboBox::from_id_salt("year")
                .selected_text(state.filters.year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    changed |= ui
                        .selectable_value(&mut state.filters.year, YearSelection::All, "All")
                        .changed();
                    for year in &years {
                        changed |= ui
                            .selectable_value(
                                &mut state.filters.year,
                                YearSelection::Year(*year),
                                year.to_string(),
                            )
                            .changed();
                    }
                });
            ui.add_space(6.0);

            // ---- Minimum rating ----
            ui.strong("⭐ Minimum Rating");
            changed |= ui
                .add(egui::Slider::new(&mut state.filters.min_rating, 0.0..=10.0)
                    .step_by(0.1)
                    .max_decimals(1))
                .changed();
            ui.add_space(6.0);

            // ---- Part heuristic ----
            ui.strong("🎬 Does the title contain a part?");
            ui.horizontal(|ui: &mut Ui| {
                for option in PartFilter::ALL {
                    changed |= ui
                        .radio_value(&mut state.filters.part_filter, option, option.to_string())
                        .changed();
                }
            });
            ui.add_space(6.0);

            // ---- Search ----
            ui.strong("🔍 Search by Movie Title");
            changed |= ui
                .text_edit_singleline(&mut state.filters.search_text)
                .changed();

            if let Some(out) = &state.output {
                for warning in &out.warnings {
                    ui.label(RichText::new(format!("⚠ {warning}")).color(Color32::from_rgb(200, 120, 0)));
                }
            }
            ui.separator();

            // ---- Visualization ----
            ui.strong("🎨 Choose Visualization");
            egui::ComboBox::from_id_salt("visualization")
                .selected_text(state.visualization.label())
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for viz in Visualization::ALL {
                        changed |= ui
                            .selectable_value(&mut state.visualization, viz, viz.label())
                            .changed();
                    }
                });
        });

    if changed {
        state.mark_dirty();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut SessionState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.output.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export view as PNG…"))
                .clicked()
            {
                request_export(ui.ctx(), state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(out) = &state.output {
            ui.label(format!("{} movies loaded, {} shown", out.total, out.shown()));
        }
        if let Some(source) = &state.source {
            ui.label(RichText::new(source.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut SessionState) {
    let file = rfd::FileDialog::new()
        .set_title("Open movie table")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

/// Ask for a target file, then request a screenshot of the window.
/// The screenshot arrives as an event on a later frame.
fn request_export(ctx: &egui::Context, state: &mut SessionState) {
    let target = rfd::FileDialog::new()
        .set_title("Export view")
        .add_filter("PNG", &["png"])
        .set_file_name("dashboard.png")
        .save_file();

    if let Some(path) = target {
        state.pending_export = Some(path);
        ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(Default::default()));
    }
}
