use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{self, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::chart::{Artifact, Histogram, PartsPie, Scatter, TopRated, WordCloud, YearBars};
use crate::pipeline::PipelineOutput;

// ---------------------------------------------------------------------------
// Chart (central panel)
// ---------------------------------------------------------------------------

/// Render the chart of the last pipeline run.
pub fn chart(ui: &mut Ui, output: &PipelineOutput, height: f32) {
    ui.heading(&output.heading);
    if output.artifact.is_empty() && output.rows.is_empty() {
        ui.weak("No movies match the current filters.");
    }

    match &output.artifact {
        Artifact::Histogram(h) => histogram(ui, h, height),
        Artifact::YearBars(b) => year_bars(ui, b, height),
        Artifact::TopRated(t) => top_rated(ui, t, height),
        Artifact::WordCloud(w) => word_cloud(ui, w, height),
        Artifact::Scatter(s) => scatter(ui, s, height),
        Artifact::PartsPie(p) => parts_pie(ui, p, height),
        Artifact::NoData { reason } => {
            ui.allocate_ui(egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.label(RichText::new(format!("No data to display: {reason}")).italics());
                });
            });
        }
    }
}

fn histogram(ui: &mut Ui, hist: &Histogram, height: f32) {
    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .name(format!("{:.2} – {:.2}", b.start, b.end))
        })
        .collect();

    Plot::new("rating_distribution")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Rating")
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(hist.bar_color).name("Movies"));
            if !hist.density.is_empty() {
                plot_ui.line(
                    Line::new(PlotPoints::new(hist.density.clone()))
                        .color(hist.line_color)
                        .width(2.0)
                        .name("Density"),
                );
            }
        });
}

fn year_bars(ui: &mut Ui, bars: &YearBars, height: f32) {
    let chart: Vec<Bar> = bars
        .counts
        .iter()
        .map(|c| Bar::new(c.year as f64, c.count as f64).width(0.8).name(c.year))
        .collect();

    Plot::new("movies_per_year")
        .height(height)
        .x_axis_label("Year")
        .y_axis_label("Movies")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart).color(bars.color));
        });
}

fn top_rated(ui: &mut Ui, top: &TopRated, height: f32) {
    let n = top.entries.len();
    // Best movie on the top row.
    let bars: Vec<Bar> = top
        .entries
        .iter()
        .enumerate()
        .map(|(i, m)| {
            Bar::new((n - 1 - i) as f64, m.rating)
                .width(0.7)
                .fill(m.color)
                .name(format!("{} ({})", m.title, m.year))
        })
        .collect();

    let titles: Vec<String> = top.entries.iter().rev().map(|m| m.title.clone()).collect();

    Plot::new("top_rated")
        .height(height)
        .x_axis_label("Rating")
        .include_x(0.0)
        .include_x(10.0)
        .y_axis_min_width(160.0)
        .y_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            titles.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

fn word_cloud(ui: &mut Ui, cloud: &WordCloud, height: f32) {
    egui::Frame::new()
        .fill(cloud.background)
        .inner_margin(12.0)
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            egui::ScrollArea::vertical()
                .max_height(height)
                .auto_shrink([false, true])
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal_wrapped(|ui: &mut Ui| {
                        for w in &cloud.words {
                            let size = 12.0 + 36.0 * w.weight as f32;
                            ui.label(RichText::new(&w.word).size(size).color(w.color).strong())
                                .on_hover_text(format!("{} × {}", w.word, w.count));
                        }
                    });
                });
        });
}

fn scatter(ui: &mut Ui, plot: &Scatter, height: f32) {
    Plot::new("rating_vs_year")
        .height(height)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Rating")
        .show(ui, |plot_ui| {
            for group in &plot.groups {
                let [r, g, b, _] = group.color.to_array();
                plot_ui.points(
                    Points::new(PlotPoints::new(group.points.clone()))
                        .radius(4.0)
                        .color(Color32::from_rgba_unmultiplied(r, g, b, 180))
                        .name(format!("{:.1}", group.rating)),
                );
            }
        });
}

/// Outline of a pie wedge from `start` to `end` (radians, counter-clockwise).
fn wedge(start: f64, end: f64) -> Vec<[f64; 2]> {
    let steps = ((end - start) / 0.05).ceil().max(2.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push([0.0, 0.0]);
    for i in 0..=steps {
        let a = start + (end - start) * i as f64 / steps as f64;
        points.push([a.cos(), a.sin()]);
    }
    points
}

fn parts_pie(ui: &mut Ui, pie: &PartsPie, height: f32) {
    Plot::new("parts_pie")
        .height(height)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .legend(Legend::default())
        .include_x(-1.3)
        .include_x(1.3)
        .include_y(-1.3)
        .include_y(1.3)
        .show(ui, |plot_ui| {
            let mut start = FRAC_PI_2;
            for slice in &pie.slices {
                let end = start + slice.fraction * TAU;
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(wedge(start, end)))
                        .fill_color(slice.color)
                        .stroke(Stroke::new(1.0, Color32::WHITE))
                        .name(slice.label),
                );

                let mid = (start + end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.6 * mid.cos(), 0.6 * mid.sin()),
                    RichText::new(format!("{:.1}%", slice.fraction * 100.0)).strong(),
                ));
                plot_ui.text(Text::new(
                    PlotPoint::new(1.15 * mid.cos(), 1.15 * mid.sin()),
                    slice.label,
                ));
                start = end;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedge_starts_at_centre_and_follows_the_rim() {
        let points = wedge(0.0, FRAC_PI_2);
        assert_eq!(points[0], [0.0, 0.0]);
        let first = points[1];
        let last = points[points.len() - 1];
        assert!((first[0] - 1.0).abs() < 1e-12 && first[1].abs() < 1e-12);
        assert!(last[0].abs() < 1e-12 && (last[1] - 1.0).abs() < 1e-12);
        for p in &points[1..] {
            assert!(((p[0] * p[0] + p[1] * p[1]).sqrt() - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn full_circle_wedge_is_closed() {
        let points = wedge(FRAC_PI_2, FRAC_PI_2 + TAU);
        let first = points[1];
        let last = points[points.len() - 1];
        assert!((first[0] - last[0]).abs() < 1e-9);
        assert!((first[1] - last[1]).abs() < 1e-9);
    }
}
