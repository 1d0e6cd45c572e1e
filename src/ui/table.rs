use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::pipeline::TableRow;

const ROW_HEIGHT: f32 = 20.0;

/// Render the filtered movies as a scrollable table.
pub fn movie_table(ui: &mut Ui, rows: &[TableRow]) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(40.0))
        .column(Column::remainder().at_least(200.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(60.0))
        .min_scrolled_height(0.0)
        .header(ROW_HEIGHT, |mut header| {
            for name in ["", "title", "year", "rating"] {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let movie = &rows[row.index()];
                row.col(|ui| {
                    ui.weak(movie.index.to_string());
                });
                row.col(|ui| {
                    ui.label(&movie.title);
                });
                row.col(|ui| {
                    ui.label(movie.year.to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", movie.rating));
                });
            });
        });
}
