use std::fmt;
use std::str::FromStr;

use regex::{Regex, RegexBuilder};

use super::model::{MovieRecord, MovieTable};
use crate::error::FilterError;

// ---------------------------------------------------------------------------
// Sidebar selections
// ---------------------------------------------------------------------------

/// Year selector: a single release year or no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSelection {
    #[default]
    All,
    Year(i32),
}

impl fmt::Display for YearSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearSelection::All => write!(f, "All"),
            YearSelection::Year(y) => write!(f, "{y}"),
        }
    }
}

impl FromStr for YearSelection {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            return Ok(YearSelection::All);
        }
        s.parse::<i32>()
            .map(YearSelection::Year)
            .map_err(|_| FilterError::InvalidYear(s.to_string()))
    }
}

/// Part-heuristic radio: keep everything, only sequels, or no sequels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartFilter {
    #[default]
    All,
    Yes,
    No,
}

impl PartFilter {
    pub const ALL: [PartFilter; 3] = [PartFilter::All, PartFilter::Yes, PartFilter::No];
}

impl fmt::Display for PartFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PartFilter::All => "All",
            PartFilter::Yes => "Yes",
            PartFilter::No => "No",
        };
        f.write_str(label)
    }
}

impl FromStr for PartFilter {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(PartFilter::All),
            "yes" => Ok(PartFilter::Yes),
            "no" => Ok(PartFilter::No),
            _ => Err(FilterError::InvalidPartFilter(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterConfig – what the sidebar currently asks for
// ---------------------------------------------------------------------------

/// The current filter selections.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    pub year: YearSelection,
    /// Inclusive lower bound on the rating.
    pub min_rating: f64,
    pub part_filter: PartFilter,
    /// Case-insensitive pattern matched anywhere in the title. Empty = off.
    pub search_text: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::inactive()
    }
}

impl FilterConfig {
    /// A configuration where no predicate constrains anything.
    pub fn inactive() -> Self {
        FilterConfig {
            year: YearSelection::All,
            min_rating: 0.0,
            part_filter: PartFilter::All,
            search_text: String::new(),
        }
    }

    /// Build a configuration from raw selector strings.
    ///
    /// Unparseable selectors fall back to "All" and are reported.
    pub fn from_selectors(
        year: &str,
        min_rating: f64,
        part_filter: &str,
        search_text: &str,
    ) -> (Self, Vec<FilterError>) {
        let mut errors = Vec::new();
        let year = year.parse().unwrap_or_else(|e| {
            errors.push(e);
            YearSelection::All
        });
        let part_filter = part_filter.parse().unwrap_or_else(|e| {
            errors.push(e);
            PartFilter::All
        });
        let cfg = FilterConfig {
            year,
            min_rating,
            part_filter,
            search_text: search_text.to_string(),
        };
        (cfg, errors)
    }

    /// Turn the selections into predicates.
    ///
    /// A selection that cannot be used becomes an inactive predicate and
    /// the reason lands in [`CompiledFilter::warnings`].
    pub fn compile(&self) -> CompiledFilter {
        let mut warnings = Vec::new();

        let year = match self.year {
            YearSelection::All => None,
            YearSelection::Year(y) => Some(y),
        };

        let min_rating = if self.min_rating.is_finite() {
            Some(self.min_rating)
        } else {
            warnings.push(FilterError::InvalidMinRating(self.min_rating));
            None
        };

        let has_part = match self.part_filter {
            PartFilter::All => None,
            PartFilter::Yes => Some(true),
            PartFilter::No => Some(false),
        };

        let search = if self.search_text.is_empty() {
            None
        } else {
            match RegexBuilder::new(&self.search_text)
                .case_insensitive(true)
                .build()
            {
                Ok(re) => Some(re),
                Err(e) => {
                    warnings.push(FilterError::InvalidPattern {
                        pattern: self.search_text.clone(),
                        reason: e.to_string(),
                    });
                    None
                }
            }
        };

        CompiledFilter {
            year,
            min_rating,
            has_part,
            search,
            warnings,
        }
    }
}

// ---------------------------------------------------------------------------
// CompiledFilter – the active predicates
// ---------------------------------------------------------------------------

/// Slack on the rating bound. Slider steps of 0.1 land a few ulps above
/// the decimal they display (8.7 becomes 8.700000000000001).
const RATING_TOLERANCE: f64 = 1e-9;

/// Predicates ready to run. `None` means the predicate is inactive.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    year: Option<i32>,
    min_rating: Option<f64>,
    has_part: Option<bool>,
    search: Option<Regex>,
    /// Selections that were dropped while compiling.
    pub warnings: Vec<FilterError>,
}

impl CompiledFilter {
    /// Whether a movie passes every active predicate.
    pub fn matches(&self, movie: &MovieRecord) -> bool {
        self.year.map_or(true, |y| movie.year == y)
            && self.min_rating.map_or(true, |min| movie.rating >= min - RATING_TOLERANCE)
            && self.has_part.map_or(true, |p| movie.has_part == p)
            && self
                .search
                .as_ref()
                .map_or(true, |re| re.is_match(&movie.title))
    }

    /// Return the movies passing all active filters, in table order.
    pub fn apply<'a>(&self, table: &'a MovieTable) -> FilteredView<'a> {
        FilteredView {
            records: table.records().iter().filter(|m| self.matches(m)).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// FilteredView – borrowed subset of the table
// ---------------------------------------------------------------------------

/// The movies left after filtering. Borrows from the base table.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a MovieRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a MovieRecord> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
