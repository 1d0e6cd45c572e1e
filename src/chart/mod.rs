/// Chart layer: turns a filtered view into drawing instructions.
///
/// Every builder here is pure: the same view and selector always give the
/// same [`Artifact`]. Drawing the artifact is the job of `ui::plot`.
pub mod stats;
pub mod words;

use std::collections::BTreeMap;
use std::fmt;

use eframe::egui::Color32;

use crate::color::{self, ColorScale};
use crate::config::DashboardConfig;
use crate::data::filter::FilteredView;
use crate::error::RenderError;

/// Number of sample points on the density curve.
const KDE_POINTS: usize = 200;

// ---------------------------------------------------------------------------
// Visualization selector
// ---------------------------------------------------------------------------

/// The six charts offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visualization {
    #[default]
    RatingDistribution,
    MoviesPerYear,
    TopRated,
    WordCloud,
    Scatterplot,
    PartsPie,
}

impl Visualization {
    pub const ALL: [Visualization; 6] = [
        Visualization::RatingDistribution,
        Visualization::MoviesPerYear,
        Visualization::TopRated,
        Visualization::WordCloud,
        Visualization::Scatterplot,
        Visualization::PartsPie,
    ];

    /// Label in the selector.
    pub fn label(self) -> &'static str {
        match self {
            Visualization::RatingDistribution => "📊 Rating Distribution",
            Visualization::MoviesPerYear => "📅 Number of Movies per Year",
            Visualization::TopRated => "🌟 Top Rated Movies",
            Visualization::WordCloud => "☁ WordCloud",
            Visualization::Scatterplot => "🎯 Scatterplot",
            Visualization::PartsPie => "🥧 Movies with Parts",
        }
    }

    /// Heading shown above the chart.
    pub fn heading(self, settings: &RenderSettings) -> String {
        match self {
            Visualization::RatingDistribution => "IMDb Rating Distribution".into(),
            Visualization::MoviesPerYear => "Number of Movies per Year".into(),
            Visualization::TopRated => format!("Top {} Movies by Rating", settings.top_n),
            Visualization::WordCloud => "WordCloud for Movie Titles".into(),
            Visualization::Scatterplot => "Scatterplot: Rating vs Year".into(),
            Visualization::PartsPie => "Percentage of Movies with Parts in Title".into(),
        }
    }
}

impl fmt::Display for Visualization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Artifacts – what the display surface draws
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<stats::Bin>,
    /// Density curve scaled to bin counts, `[rating, count]`.
    pub density: Vec<[f64; 2]>,
    pub bar_color: Color32,
    pub line_color: Color32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearBars {
    /// Ascending by year.
    pub counts: Vec<YearCount>,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedMovie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopRated {
    /// Highest rating first.
    pub entries: Vec<RankedMovie>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeightedWord {
    pub word: String,
    pub count: usize,
    /// `count / largest count`, in `(0, 1]`.
    pub weight: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordCloud {
    pub words: Vec<WeightedWord>,
    pub background: Color32,
}

/// Points sharing one rating (to one decimal), drawn in one colour.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub rating: f64,
    pub color: Color32,
    /// `[year, rating]`
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    /// Ascending by rating.
    pub groups: Vec<ScatterGroup>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: &'static str,
    pub count: usize,
    pub fraction: f64,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartsPie {
    /// Only slices with a non-zero count.
    pub slices: Vec<PieSlice>,
    pub total: usize,
}

/// Drawing instructions for one chart.
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Histogram(Histogram),
    YearBars(YearBars),
    TopRated(TopRated),
    WordCloud(WordCloud),
    Scatter(Scatter),
    PartsPie(PartsPie),
    /// Substituted when a chart has nothing meaningful to show.
    NoData { reason: String },
}

impl Artifact {
    /// Whether the artifact carries nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            Artifact::Histogram(h) => h.bins.is_empty(),
            Artifact::YearBars(b) => b.counts.is_empty(),
            Artifact::TopRated(t) => t.entries.is_empty(),
            Artifact::WordCloud(w) => w.words.is_empty(),
            Artifact::Scatter(s) => s.groups.is_empty(),
            Artifact::PartsPie(p) => p.slices.is_empty(),
            Artifact::NoData { .. } => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Knobs for the chart builders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub histogram_bins: usize,
    pub top_n: usize,
    pub word_cloud_max_words: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for RenderSettings {
    fn from(cfg: &DashboardConfig) -> Self {
        RenderSettings {
            histogram_bins: cfg.histogram_bins,
            top_n: cfg.top_n,
            word_cloud_max_words: cfg.word_cloud_max_words,
        }
    }
}

/// Build the artifact for `viz` over `view`.
pub fn render(viz: Visualization, view: &FilteredView<'_>, settings: &RenderSettings) -> Artifact {
    match viz {
        Visualization::RatingDistribution => {
            Artifact::Histogram(rating_distribution(view, settings.histogram_bins))
        }
        Visualization::MoviesPerYear => Artifact::YearBars(movies_per_year(view)),
        Visualization::TopRated => Artifact::TopRated(top_rated(view, settings.top_n)),
        Visualization::WordCloud => match word_cloud(view, settings.word_cloud_max_words) {
            Ok(cloud) => Artifact::WordCloud(cloud),
            Err(e) => {
                log::warn!("Word cloud unavailable: {e}");
                Artifact::NoData {
                    reason: e.to_string(),
                }
            }
        },
        Visualization::Scatterplot => Artifact::Scatter(scatter(view)),
        Visualization::PartsPie => Artifact::PartsPie(parts_pie(view)),
    }
}

pub fn rating_distribution(view: &FilteredView<'_>, bins: usize) -> Histogram {
    let ratings: Vec<f64> = view.iter().map(|m| m.rating).collect();
    let bins = stats::histogram(&ratings, bins);

    // Scale the density to the histogram so both share the count axis.
    let bin_width = bins.first().map(|b| b.width()).unwrap_or(0.0);
    let scale = ratings.len() as f64 * bin_width;
    let density = stats::gaussian_kde(&ratings, KDE_POINTS)
        .into_iter()
        .map(|[x, d]| [x, d * scale])
        .collect();

    Histogram {
        bins,
        density,
        bar_color: color::HOT_PINK,
        line_color: color::DEEP_PINK,
    }
}

pub fn movies_per_year(view: &FilteredView<'_>) -> YearBars {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for movie in view.iter() {
        *counts.entry(movie.year).or_default() += 1;
    }
    YearBars {
        counts: counts
            .into_iter()
            .map(|(year, count)| YearCount { year, count })
            .collect(),
        color: color::LIGHT_BLUE,
    }
}

/// The `n` best-rated movies; equal ratings keep table order.
pub fn top_rated(view: &FilteredView<'_>, n: usize) -> TopRated {
    let mut ranked: Vec<_> = view.iter().collect();
    ranked.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    ranked.truncate(n);

    let last = ranked.len().saturating_sub(1).max(1) as f64;
    let entries = ranked
        .into_iter()
        .enumerate()
        .map(|(i, m)| RankedMovie {
            title: m.title.clone(),
            year: m.year,
            rating: m.rating,
            color: ColorScale::Magma.color_at(i as f64 / last),
        })
        .collect();
    TopRated { entries }
}

pub fn word_cloud(view: &FilteredView<'_>, max_words: usize) -> Result<WordCloud, RenderError> {
    if view.is_empty() {
        return Err(RenderError::NoTitles);
    }
    let text = view
        .iter()
        .map(|m| m.title.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut counts = words::count_words(&text);
    counts.truncate(max_words);
    let max_count = match counts.first() {
        Some(top) => top.count as f64,
        None => return Err(RenderError::NoWords),
    };

    let words = counts
        .into_iter()
        .map(|wc| {
            let weight = wc.count as f64 / max_count;
            WeightedWord {
                color: ColorScale::CoolWarm.color_at(1.0 - weight),
                word: wc.word,
                count: wc.count,
                weight,
            }
        })
        .collect();
    Ok(WordCloud {
        words,
        background: color::LAVENDER,
    })
}

pub fn scatter(view: &FilteredView<'_>) -> Scatter {
    // Group by rating in tenths so each hue is one series.
    let mut groups: BTreeMap<i64, Vec<[f64; 2]>> = BTreeMap::new();
    for movie in view.iter() {
        let key = (movie.rating * 10.0).round() as i64;
        groups
            .entry(key)
            .or_default()
            .push([movie.year as f64, movie.rating]);
    }

    let (lo, hi) = match (groups.keys().next(), groups.keys().next_back()) {
        (Some(&lo), Some(&hi)) => (lo as f64 / 10.0, hi as f64 / 10.0),
        _ => (0.0, 0.0),
    };

    Scatter {
        groups: groups
            .into_iter()
            .map(|(key, points)| {
                let rating = key as f64 / 10.0;
                ScatterGroup {
                    rating,
                    color: ColorScale::CoolWarm.color_for(rating, lo, hi),
                    points,
                }
            })
            .collect(),
    }
}

pub fn parts_pie(view: &FilteredView<'_>) -> PartsPie {
    let total = view.len();
    let with_part = view.iter().filter(|m| m.has_part).count();

    let slices = [
        ("No Part", total - with_part, color::LIGHT_CORAL),
        ("Has Part", with_part, color::LIGHT_GREEN),
    ]
    .into_iter()
    .filter(|(_, count, _)| *count > 0)
    .map(|(label, count, color)| PieSlice {
        label,
        count,
        fraction: count as f64 / total as f64,
        color,
    })
    .collect();

    PartsPie { slices, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterConfig;
    use crate::data::model::{MovieRecord, MovieTable};

    fn table() -> MovieTable {
        MovieTable::from_records(vec![
            MovieRecord::new("The Godfather", 1972, 9.2),
            MovieRecord::new("The Godfather Part II", 1974, 9.0),
            MovieRecord::new("The Dark Knight", 2008, 9.0),
            MovieRecord::new("12 Angry Men", 1957, 9.0),
            MovieRecord::new("Schindler's List", 1993, 9.0),
            MovieRecord::new("Pulp Fiction", 1994, 8.9),
            MovieRecord::new("Inception", 2010, 8.8),
            MovieRecord::new("Fight Club", 1999, 8.8),
            MovieRecord::new("Forrest Gump", 1994, 8.8),
            MovieRecord::new("Star Wars: Episode V - The Empire Strikes Back", 1980, 8.7),
            MovieRecord::new("The Matrix", 1999, 8.7),
            MovieRecord::new("Goodfellas", 1990, 8.7),
        ])
    }

    fn full_view(table: &MovieTable) -> FilteredView<'_> {
        FilterConfig::inactive().compile().apply(table)
    }

    #[test]
    fn histogram_covers_every_movie() {
        let table = table();
        let hist = rating_distribution(&full_view(&table), 20);
        assert_eq!(hist.bins.len(), 20);
        assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), table.len());
        assert_eq!(hist.density.len(), KDE_POINTS);
    }

    #[test]
    fn years_are_counted_in_ascending_order() {
        let table = table();
        let bars = movies_per_year(&full_view(&table));
        let years: Vec<i32> = bars.counts.iter().map(|c| c.year).collect();
        let mut sorted = years.clone();
        sorted.sort();
        assert_eq!(years, sorted);
        let y1994 = bars.counts.iter().find(|c| c.year == 1994).unwrap();
        assert_eq!(y1994.count, 2);
        assert_eq!(bars.counts.iter().map(|c| c.count).sum::<usize>(), table.len());
    }

    #[test]
    fn top_rated_breaks_ties_by_table_order() {
        let table = table();
        let top = top_rated(&full_view(&table), 10);
        let titles: Vec<&str> = top.entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "The Godfather",
                "The Godfather Part II",
                "The Dark Knight",
                "12 Angry Men",
                "Schindler's List",
                "Pulp Fiction",
                "Inception",
                "Fight Club",
                "Forrest Gump",
                "Star Wars: Episode V - The Empire Strikes Back",
            ]
        );
    }

    #[test]
    fn top_rated_on_small_view_returns_all_by_rating() {
        let table = MovieTable::from_records(vec![
            MovieRecord::new("Matrix", 1999, 8.7),
            MovieRecord::new("Matrix Reloaded", 2003, 7.2),
            MovieRecord::new("Inception", 2010, 8.8),
        ]);
        let top = top_rated(&full_view(&table), 10);
        let ratings: Vec<f64> = top.entries.iter().map(|e| e.rating).collect();
        assert_eq!(ratings, vec![8.8, 8.7, 7.2]);
    }

    #[test]
    fn word_cloud_weights_relative_to_top_word() {
        let table = table();
        let cloud = word_cloud(&full_view(&table), 200).unwrap();
        assert_eq!(cloud.words[0].word, "Godfather");
        assert_eq!(cloud.words[0].weight, 1.0);
        assert!(cloud.words.iter().all(|w| w.weight > 0.0 && w.weight <= 1.0));
        assert!(!cloud.words.iter().any(|w| w.word.eq_ignore_ascii_case("the")));

        let capped = word_cloud(&full_view(&table), 3).unwrap();
        assert_eq!(capped.words.len(), 3);
    }

    #[test]
    fn word_cloud_without_words_is_an_error() {
        let table = MovieTable::from_records(vec![MovieRecord::new("1917", 2019, 8.2)]);
        assert_eq!(word_cloud(&full_view(&table), 200), Err(RenderError::NoWords));
    }

    #[test]
    fn scatter_groups_by_rating() {
        let table = table();
        let plot = scatter(&full_view(&table));
        let ratings: Vec<f64> = plot.groups.iter().map(|g| g.rating).collect();
        assert_eq!(ratings, vec![8.7, 8.8, 8.9, 9.0, 9.2]);
        assert_eq!(plot.groups.iter().map(|g| g.points.len()).sum::<usize>(), table.len());
        assert_ne!(plot.groups[0].color, plot.groups[4].color);
    }

    #[test]
    fn pie_fractions_sum_to_one() {
        let table = table();
        let pie = parts_pie(&full_view(&table));
        assert_eq!(pie.total, table.len());
        let with_part = table.records().iter().filter(|m| m.has_part).count();
        let has = pie.slices.iter().find(|s| s.label == "Has Part").unwrap();
        assert_eq!(has.count, with_part);
        let sum: f64 = pie.slices.iter().map(|s| s.fraction).sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_view_gives_empty_artifacts() {
        let view = FilteredView::default();
        let settings = RenderSettings::default();
        for viz in Visualization::ALL {
            let artifact = render(viz, &view, &settings);
            assert!(artifact.is_empty(), "{viz:?} should be empty");
            match (viz, &artifact) {
                (Visualization::WordCloud, Artifact::NoData { .. }) => {}
                (Visualization::WordCloud, other) => panic!("expected NoData, got {other:?}"),
                (_, Artifact::NoData { .. }) => panic!("{viz:?} should keep its chart type"),
                _ => {}
            }
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let table = table();
        let view = full_view(&table);
        let settings = RenderSettings::default();
        for viz in Visualization::ALL {
            assert_eq!(render(viz, &view, &settings), render(viz, &view, &settings));
        }
    }
}
