use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

// ---------------------------------------------------------------------------
// Has-part heuristic
// ---------------------------------------------------------------------------

/// Sequel / installment markers, matched anywhere in the title, ignoring case.
const PART_MARKERS: &str = r"(?i)(Part|Chapter|Episode|Vol\.|Volume|II|III|IV|V)";

fn part_regex() -> &'static Regex {
    static PART_RE: OnceLock<Regex> = OnceLock::new();
    PART_RE.get_or_init(|| Regex::new(PART_MARKERS).expect("part marker pattern is valid"))
}

/// Whether a title looks like a sequel or an installment.
pub fn has_part(title: &str) -> bool {
    part_regex().is_match(title)
}

// ---------------------------------------------------------------------------
// MovieRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single film.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub title: String,
    pub year: i32,
    /// 0.0 ..= 10.0
    pub rating: f64,
    /// Derived from `title`, see [`has_part`].
    pub has_part: bool,
}

impl MovieRecord {
    pub fn new(title: impl Into<String>, year: i32, rating: f64) -> Self {
        let title = title.into();
        let has_part = has_part(&title);
        MovieRecord {
            title,
            year,
            rating,
            has_part,
        }
    }
}

impl fmt::Display for MovieRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) {:.1}", self.title, self.year, self.rating)
    }
}

// ---------------------------------------------------------------------------
// MovieTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table. Immutable once built; filters produce views.
#[derive(Debug, Clone, Default)]
pub struct MovieTable {
    records: Vec<MovieRecord>,
    /// Sorted distinct release years (feeds the year selector).
    years: BTreeSet<i32>,
}

impl MovieTable {
    /// Build the year index from the loaded records.
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let years = records.iter().map(|m| m.year).collect();
        MovieTable { records, years }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn years(&self) -> &BTreeSet<i32> {
        &self.years
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
