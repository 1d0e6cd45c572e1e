use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::chart::{RenderSettings, Visualization};
use crate::config::DashboardConfig;
use crate::data::cache::TableCache;
use crate::data::filter::FilterConfig;
use crate::data::model::MovieTable;
use crate::pipeline::{self, PipelineOutput};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Everything one dashboard session owns, independent of rendering.
pub struct SessionState {
    pub config: DashboardConfig,

    /// Tables already read in this session.
    cache: TableCache,

    /// Loaded base table (None until a source loads successfully).
    pub table: Option<Arc<MovieTable>>,

    /// Where `table` came from.
    pub source: Option<PathBuf>,

    /// Blocking load failure; replaces the dashboard while set.
    pub load_error: Option<String>,

    /// Current sidebar selections.
    pub filters: FilterConfig,

    /// Current chart.
    pub visualization: Visualization,

    /// Result of the last pipeline run.
    pub output: Option<PipelineOutput>,

    /// Non-blocking status / error message shown in the top bar.
    pub status_message: Option<String>,

    /// Target of a requested PNG export, waiting for the screenshot.
    pub pending_export: Option<PathBuf>,

    /// Selections changed since the last pipeline run.
    dirty: bool,
}

impl SessionState {
    pub fn new(config: DashboardConfig) -> Self {
        let filters = initial_filters(&config);
        Self {
            config,
            cache: TableCache::default(),
            table: None,
            source: None,
            load_error: None,
            filters,
            visualization: Visualization::default(),
            output: None,
            status_message: None,
            pending_export: None,
            dirty: true,
        }
    }

    /// Load the configured dataset.
    pub fn open_configured(&mut self) {
        let path = self.config.dataset_path.clone();
        self.open(&path);
    }

    /// Switch the session to the table at `path` and reset the filters.
    pub fn open(&mut self, path: &Path) {
        match self.cache.load(path) {
            Ok(table) => {
                if table.is_empty() {
                    log::warn!("{} contains no movies", path.display());
                }
                log::debug!("{} source(s) cached in this session", self.cache.len());
                self.table = Some(table);
                self.source = Some(path.to_path_buf());
                self.filters = initial_filters(&self.config);
                self.load_error = None;
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.table = None;
                self.source = None;
                self.output = None;
                self.load_error = Some(format!("Could not load {}: {e}", path.display()));
            }
        }
        self.dirty = true;
    }

    /// Note that a sidebar selection changed.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Re-run filter → render → table if anything changed.
    pub fn refresh(&mut self) {
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let Some(table) = &self.table else {
            self.output = None;
            return;
        };
        let settings = RenderSettings::from(&self.config);
        self.output = Some(pipeline::run(
            table,
            &self.filters,
            self.visualization,
            &settings,
        ));
    }

    /// Distinct years of the loaded table, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.table
            .as_ref()
            .map(|t| t.years().iter().copied().collect())
            .unwrap_or_default()
    }
}

/// Sidebar selections at start-up, from the configured defaults.
fn initial_filters(config: &DashboardConfig) -> FilterConfig {
    let (filters, errors) = FilterConfig::from_selectors(
        &config.default_year,
        config.default_min_rating,
        &config.default_part_filter,
        "",
    );
    for e in errors {
        log::warn!("Ignoring configured default: {e}");
    }
    filters
}
