use eframe::egui::{self, Color32, RichText};

use crate::config::DashboardConfig;
use crate::export;
use crate::state::SessionState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: SessionState,
}

impl DashboardApp {
    /// Create the session and load the configured dataset.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = SessionState::new(config);
        state.open_configured();
        Self { state }
    }

    /// Save a screenshot delivered by egui, if an export is pending.
    fn handle_screenshot(&mut self, ctx: &egui::Context) {
        if self.state.pending_export.is_none() {
            return;
        }
        let shot = ctx.input(|i| {
            i.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });
        let Some(shot) = shot else {
            return;
        };
        let Some(path) = self.state.pending_export.take() else {
            return;
        };
        match export::save_png(&shot, &path) {
            Ok(()) => {
                log::info!("Exported view to {}", path.display());
                self.state.status_message = None;
            }
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.state.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_screenshot(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        self.state.refresh();

        // ---- Central panel: headline, chart, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🎬 SQL Me Later – Where Data Meets Drama 🍿");

            if let Some(err) = &self.state.load_error {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new(err).color(Color32::RED).size(16.0));
                });
                return;
            }

            let Some(output) = &self.state.output else {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a movie table to begin  (File → Open…)");
                });
                return;
            };

            let headline = format!("Showing {} movies after filtering", output.shown());
            ui.label(RichText::new(headline).strong());
            ui.separator();

            let chart_height = (ui.available_height() * 0.55).max(200.0);
            plot::chart(ui, output, chart_height);
            ui.separator();
            table::movie_table(ui, &output.rows);
        });
    }
}
