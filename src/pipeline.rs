use crate::chart::{self, Artifact, RenderSettings, Visualization};
use crate::data::filter::FilterConfig;
use crate::data::model::MovieTable;
use crate::error::FilterError;

/// One line of the preview table, numbered from zero.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub index: usize,
    pub title: String,
    pub year: i32,
    pub rating: f64,
}

/// Everything the central panel shows for one interaction.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub visualization: Visualization,
    /// Chart heading, sized to the configured counts.
    pub heading: String,
    pub artifact: Artifact,
    pub rows: Vec<TableRow>,
    /// Size of the base table.
    pub total: usize,
    /// Selections dropped because they could not be applied.
    pub warnings: Vec<FilterError>,
}

impl PipelineOutput {
    /// Number of movies left after filtering.
    pub fn shown(&self) -> usize {
        self.rows.len()
    }
}

/// Filter the table, build the selected chart and the preview rows.
pub fn run(
    table: &MovieTable,
    filters: &FilterConfig,
    visualization: Visualization,
    settings: &RenderSettings,
) -> PipelineOutput {
    let compiled = filters.compile();
    for warning in &compiled.warnings {
        log::warn!("Filter ignored: {warning}");
    }

    let view = compiled.apply(table);
    log::debug!(
        "{} of {} movies pass the filters, rendering {:?}",
        view.len(),
        table.len(),
        visualization
    );

    let artifact = chart::render(visualization, &view, settings);
    let rows = view
        .iter()
        .enumerate()
        .map(|(index, m)| TableRow {
            index,
            title: m.title.clone(),
            year: m.year,
            rating: m.rating,
        })
        .collect();

    PipelineOutput {
        visualization,
        heading: visualization.heading(settings),
        artifact,
        rows,
        total: table.len(),
        warnings: compiled.warnings,
    }
}
