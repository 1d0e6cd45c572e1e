use std::io::Read;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{MovieRecord, MovieTable};
use crate::error::LoadError;

const TITLE: &str = "title";
const YEAR: &str = "year";
const RATING: &str = "rating";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a movie table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `title`, `year`, `rating` (extra columns ignored)
/// * `.json`    – `[{ "title": ..., "year": ..., "rating": ... }, ...]`
/// * `.parquet` – `title` string column, numeric `year` and `rating` columns
pub fn load_file(path: &Path) -> Result<MovieTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(std::fs::File::open(path)?),
        "json" => load_json(&std::fs::read_to_string(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Coercion shared by all formats
// ---------------------------------------------------------------------------

fn parse_year(raw: &str, row: usize) -> Result<i32, LoadError> {
    let raw = raw.trim();
    let coerced = raw.parse::<i32>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.fract() == 0.0 && f.abs() < i32::MAX as f64)
            .map(|f| f as i32)
    });
    coerced.ok_or_else(|| LoadError::Coercion {
        row,
        column: YEAR,
        value: raw.to_string(),
        expected: "an integer",
    })
}

fn parse_rating(raw: &str, row: usize) -> Result<f64, LoadError> {
    let raw = raw.trim();
    raw.parse::<f64>().map_err(|_| LoadError::Coercion {
        row,
        column: RATING,
        value: raw.to_string(),
        expected: "a number",
    })
}

fn year_from_f64(value: f64, row: usize) -> Result<i32, LoadError> {
    if value.fract() == 0.0 && value.abs() < i32::MAX as f64 {
        Ok(value as i32)
    } else {
        Err(LoadError::Coercion {
            row,
            column: YEAR,
            value: value.to_string(),
            expected: "an integer",
        })
    }
}

/// Enforce the table invariants and derive `has_part`.
fn build_record(title: String, year: i32, rating: f64, row: usize) -> Result<MovieRecord, LoadError> {
    if !(1000..=9999).contains(&year) {
        return Err(LoadError::InvalidValue {
            row,
            reason: format!("year {year} is not a 4-digit year"),
        });
    }
    if !rating.is_finite() || !(0.0..=10.0).contains(&rating) {
        return Err(LoadError::InvalidValue {
            row,
            reason: format!("rating {rating} is outside 0..=10"),
        });
    }
    Ok(MovieRecord::new(title, year, rating))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    title: String,
    year: String,
    rating: String,
}

/// CSV layout: header row with column names, one movie per line.
/// Rows are numbered from 1 in error messages.
pub fn load_csv<R: Read>(source: R) -> Result<MovieTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    for required in [TITLE, YEAR, RATING] {
        if !headers.iter().any(|h| h == required) {
            return Err(LoadError::MissingColumn(required));
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = i + 1;
        let raw = result?;
        let year = parse_year(&raw.year, row)?;
        let rating = parse_rating(&raw.rating, row)?;
        records.push(build_record(raw.title, year, rating, row)?);
    }

    Ok(MovieTable::from_records(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "title": "The Shawshank Redemption", "year": 1994, "rating": 9.3 },
///   ...
/// ]
/// ```
///
/// Numbers may also arrive as strings (`"1994"`, `"9.3"`).
pub fn load_json(text: &str) -> Result<MovieTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::Malformed("expected a top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| LoadError::Malformed(format!("row {row} is not a JSON object")))?;

        let title = match obj.get(TITLE) {
            Some(JsonValue::String(s)) => s.trim().to_string(),
            Some(other) => {
                return Err(LoadError::Coercion {
                    row,
                    column: TITLE,
                    value: other.to_string(),
                    expected: "a string",
                })
            }
            None => return Err(LoadError::MissingColumn(TITLE)),
        };
        let year = match obj.get(YEAR) {
            Some(JsonValue::Number(n)) => match n.as_i64() {
                Some(i) => i32::try_from(i).map_err(|_| LoadError::Coercion {
                    row,
                    column: YEAR,
                    value: n.to_string(),
                    expected: "an integer",
                })?,
                None => year_from_f64(n.as_f64().unwrap_or(f64::NAN), row)?,
            },
            Some(JsonValue::String(s)) => parse_year(s, row)?,
            Some(other) => {
                return Err(LoadError::Coercion {
                    row,
                    column: YEAR,
                    value: other.to_string(),
                    expected: "an integer",
                })
            }
            None => return Err(LoadError::MissingColumn(YEAR)),
        };
        let rating = match obj.get(RATING) {
            Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(f64::NAN),
            Some(JsonValue::String(s)) => parse_rating(s, row)?,
            Some(other) => {
                return Err(LoadError::Coercion {
                    row,
                    column: RATING,
                    value: other.to_string(),
                    expected: "a number",
                })
            }
            None => return Err(LoadError::MissingColumn(RATING)),
        };

        records.push(build_record(title, year, rating, row)?);
    }

    Ok(MovieTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding a movie table.
///
/// Expected schema:
/// - `title`: Utf8 or LargeUtf8
/// - `year`: Int32, Int64 or Float64 (whole numbers)
/// - `rating`: Float32, Float64, Int32 or Int64
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<MovieTable, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // Checked on the file schema, so sources without row groups fail too.
    for required in [TITLE, YEAR, RATING] {
        if builder.schema().index_of(required).is_err() {
            return Err(LoadError::MissingColumn(required));
        }
    }
    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let column = |name: &'static str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i).clone())
                .map_err(|_| LoadError::MissingColumn(name))
        };
        let titles = column(TITLE)?;
        let years = column(YEAR)?;
        let ratings = column(RATING)?;

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let title = arrow_string(&titles, i)
                .ok_or_else(|| coercion_failure(&titles, i, row, TITLE, "a string"))?;
            let year = match arrow_number(&years, i) {
                Some(v) => year_from_f64(v, row)?,
                None => return Err(coercion_failure(&years, i, row, YEAR, "an integer")),
            };
            let rating = arrow_number(&ratings, i)
                .ok_or_else(|| coercion_failure(&ratings, i, row, RATING, "a number"))?;

            records.push(build_record(title, year, rating, row)?);
        }
    }

    Ok(MovieTable::from_records(records))
}

// -- Parquet / Arrow helpers --

fn coercion_failure(
    col: &ArrayRef,
    i: usize,
    row: usize,
    column: &'static str,
    expected: &'static str,
) -> LoadError {
    let value = if col.is_null(i) {
        "null".to_string()
    } else {
        format!("<{:?}>", col.data_type())
    };
    LoadError::Coercion {
        row,
        column,
        value,
        expected,
    }
}

/// Extract a string cell; `None` for nulls or non-string columns.
fn arrow_string(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).trim().to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|a| a.value(row).trim().to_string()),
        _ => None,
    }
}

/// Extract a numeric cell as `f64`; `None` for nulls or non-numeric columns.
fn arrow_number(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    let any = col.as_any();
    match col.data_type() {
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Float32 => any.downcast_ref::<Float32Array>().map(|a| a.value(row) as f64),
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("imdb-dashboard-loader-{}-{name}", std::process::id()))
    }

    #[test]
    fn csv_loads_rows_in_order() {
        let csv = "title,year,rating\nMatrix,1999,8.7\nMatrix Reloaded,2003,7.2\nInception,2010,8.8\n";
        let table = load_csv(csv.as_bytes()).unwrap();
        let titles: Vec<&str> = table.records().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Matrix", "Matrix Reloaded", "Inception"]);
        assert_eq!(table.records()[2].year, 2010);
        assert_eq!(table.records()[2].rating, 8.8);
    }

    #[test]
    fn csv_ignores_extra_columns_and_whitespace() {
        let csv = "rank, title ,year,rating,genre\n1, The Godfather Part II ,1974, 9.0 ,Crime\n";
        let table = load_csv(csv.as_bytes()).unwrap();
        let movie = &table.records()[0];
        assert_eq!(movie.title, "The Godfather Part II");
        assert_eq!(movie.year, 1974);
        assert!(movie.has_part);
    }

    #[test]
    fn csv_accepts_whole_float_years() {
        let table = load_csv("title,year,rating\nHeat,1995.0,8\n".as_bytes()).unwrap();
        assert_eq!(table.records()[0].year, 1995);
        assert_eq!(table.records()[0].rating, 8.0);
    }

    #[test]
    fn csv_missing_column_is_reported() {
        let err = load_csv("title,rating\nHeat,8.3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("year")));
    }

    #[test]
    fn csv_uncoercible_year_names_the_row() {
        let err = load_csv("title,year,rating\nHeat,1995,8.3\nAlien,soon,8.5\n".as_bytes()).unwrap_err();
        match err {
            LoadError::Coercion { row, column, value, .. } => {
                assert_eq!(row, 2);
                assert_eq!(column, "year");
                assert_eq!(value, "soon");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn csv_rejects_out_of_range_values() {
        let err = load_csv("title,year,rating\nHeat,1995,11.2\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
        let err = load_csv("title,year,rating\nHeat,95,8.3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidValue { row: 1, .. }));
    }

    #[test]
    fn csv_short_row_is_malformed() {
        let err = load_csv("title,year,rating\nHeat,1995\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Csv(_)));
    }

    #[test]
    fn bundled_sample_loads() {
        let table = load_csv(include_str!("../../data/sample_movies.csv").as_bytes()).unwrap();
        assert!(table.len() >= 20);
        assert!(table.records().iter().all(|m| (0.0..=10.0).contains(&m.rating)));
        assert!(table.records().iter().any(|m| m.has_part));
    }

    #[test]
    fn json_accepts_numbers_and_numeric_strings() {
        let json = r#"[
            { "title": "Alien", "year": 1979, "rating": 8.5 },
            { "title": "Aliens", "year": "1986", "rating": "8.4" }
        ]"#;
        let table = load_json(json).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].year, 1986);
        assert_eq!(table.records()[1].rating, 8.4);
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(load_json(r#"{"title": "Alien"}"#), Err(LoadError::Malformed(_))));
        assert!(matches!(load_json("[1, 2]"), Err(LoadError::Malformed(_))));
        assert!(matches!(load_json("[{"), Err(LoadError::Json(_))));
    }

    #[test]
    fn json_missing_rating_is_reported() {
        let err = load_json(r#"[{ "title": "Alien", "year": 1979 }]"#).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("rating")));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_file(&temp_path("does-not-exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let path = temp_path("movies.xlsx");
        std::fs::write(&path, "title,year,rating\n").unwrap();
        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xlsx"));
    }

    #[test]
    fn csv_file_dispatch() {
        let path = temp_path("movies.CSV");
        std::fs::write(&path, "title,year,rating\nHeat,1995,8.3\n").unwrap();
        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn parquet_round_trip_through_loader() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("year", DataType::Int64, false),
            Field::new("rating", DataType::Float64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["Heat", "Kill Bill: Vol. 1"])),
                Arc::new(Int64Array::from(vec![1995, 2003])),
                Arc::new(Float64Array::from(vec![8.3, 8.2])),
            ],
        )
        .unwrap();

        let path = temp_path("movies.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].title, "Kill Bill: Vol. 1");
        assert_eq!(table.records()[1].year, 2003);
        assert!(table.records()[1].has_part);
    }

    #[test]
    fn parquet_without_title_column_fails() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("rating", DataType::Float32, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int32Array::from(vec![1995])),
                Arc::new(Float32Array::from(vec![8.3])),
            ],
        )
        .unwrap();

        let path = temp_path("untitled.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, LoadError::MissingColumn("title")));
    }

    #[test]
    fn parquet_without_rows_still_needs_every_column() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("year", DataType::Int32, false),
            Field::new("rating", DataType::Float64, false),
        ]));
        let path = temp_path("empty-untitled.parquet");
        let file = std::fs::File::create(&path).unwrap();
        ArrowWriter::try_new(file, schema, None).unwrap().close().unwrap();

        let result = load_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(LoadError::MissingColumn("title"))));
    }

    #[test]
    fn parquet_without_rows_is_an_empty_table() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, false),
            Field::new("year", DataType::Int32, false),
            Field::new("rating", DataType::Float64, false),
        ]));
        let path = temp_path("empty.parquet");
        let file = std::fs::File::create(&path).unwrap();
        ArrowWriter::try_new(file, schema, None).unwrap().close().unwrap();

        let table = load_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(table.is_empty());
    }
}
