use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Name of the optional configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Start-up settings. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Movie table opened at start-up.
    pub dataset_path: PathBuf,
    /// Initial year selection, `"All"` or a year.
    pub default_year: String,
    /// Initial position of the minimum-rating slider.
    pub default_min_rating: f64,
    /// Initial part filter: `"All"`, `"Yes"` or `"No"`.
    pub default_part_filter: String,
    /// Number of equal-width bins in the rating histogram.
    pub histogram_bins: usize,
    /// How many movies the "Top" chart shows.
    pub top_n: usize,
    /// Upper bound on distinct words in the word cloud.
    pub word_cloud_max_words: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("imdb_top_250_movies.csv"),
            default_year: "All".to_string(),
            default_min_rating: 8.0,
            default_part_filter: "All".to_string(),
            histogram_bins: 20,
            top_n: 10,
            word_cloud_max_words: 200,
        }
    }
}

impl DashboardConfig {
    /// Read `dashboard.json` from the working directory, falling back to defaults.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(path) {
            Ok(cfg) => {
                log::info!("Loaded configuration from {}", path.display());
                cfg
            }
            Err(e) => {
                log::warn!("Ignoring {}: {e:#}", path.display());
                Self::default()
            }
        }
    }

    /// Parse a configuration file and clamp out-of-range values.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let cfg: DashboardConfig =
            serde_json::from_str(text).context("parsing dashboard configuration")?;
        Ok(cfg.sanitized())
    }

    fn sanitized(mut self) -> Self {
        self.default_min_rating = if self.default_min_rating.is_finite() {
            self.default_min_rating.clamp(0.0, 10.0)
        } else {
            Self::default().default_min_rating
        };
        self.histogram_bins = self.histogram_bins.max(1);
        self.top_n = self.top_n.max(1);
        self.word_cloud_max_words = self.word_cloud_max_words.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = DashboardConfig::from_json("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let cfg = DashboardConfig::from_json(r#"{ "top_n": 5, "dataset_path": "films.parquet" }"#)
            .unwrap();
        assert_eq!(cfg.top_n, 5);
        assert_eq!(cfg.dataset_path, PathBuf::from("films.parquet"));
        assert_eq!(cfg.histogram_bins, 20);
        assert_eq!(cfg.default_min_rating, 8.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = DashboardConfig::from_json(
            r#"{ "default_min_rating": 42.0, "histogram_bins": 0, "top_n": 0 }"#,
        )
        .unwrap();
        assert_eq!(cfg.default_min_rating, 10.0);
        assert_eq!(cfg.histogram_bins, 1);
        assert_eq!(cfg.top_n, 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(DashboardConfig::from_json("{ top_n: ").is_err());
    }
}
