use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const MOVIES: usize = 250;

const ADJECTIVES: &[&str] = &[
    "Silent", "Dark", "Last", "Great", "Lost", "Hidden", "Burning", "Seventh", "Golden", "Wild",
    "Broken", "Eternal", "Crimson", "Lonely", "Final", "Distant",
];
const NOUNS: &[&str] = &[
    "Knight", "City", "River", "Kingdom", "Garden", "Empire", "Road", "Dream", "Mirror", "Storm",
    "Voyage", "Harbor", "Shadow", "Symphony", "Frontier", "Machine", "Island", "Witness",
];
const SEQUEL_MARKERS: &[&str] = &["Part II", "Part III", "Chapter 2", "Vol. 1", "Episode IV"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

struct Movie {
    title: String,
    year: i64,
    rating: f64,
}

fn generate_movies(rng: &mut SimpleRng) -> Vec<Movie> {
    let mut movies: Vec<Movie> = (0..MOVIES)
        .map(|_| {
            let mut title = format!("The {} {}", rng.pick(ADJECTIVES), rng.pick(NOUNS));
            if rng.next_f64() < 0.15 {
                title = format!("{title}: {}", rng.pick(SEQUEL_MARKERS));
            }
            let year = 1921 + (rng.next_u64() % 104) as i64;
            // Most top-250 ratings sit just above 8.0; few reach 9.
            let rating = (80.0 + 13.0 * rng.next_f64().powf(2.5)).round() / 10.0;
            Movie { title, year, rating }
        })
        .collect();

    movies.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    movies
}

fn write_csv(movies: &[Movie], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["rank", "title", "year", "rating"])?;
    for (rank, m) in movies.iter().enumerate() {
        writer.write_record([
            (rank + 1).to_string(),
            m.title.clone(),
            m.year.to_string(),
            format!("{:.1}", m.rating),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(movies: &[Movie], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("year", DataType::Int64, false),
        Field::new("rating", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                movies.iter().map(|m| m.title.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Int64Array::from(movies.iter().map(|m| m.year).collect::<Vec<_>>())),
            Arc::new(Float64Array::from(movies.iter().map(|m| m.rating).collect::<Vec<_>>())),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let movies = generate_movies(&mut rng);

    write_csv(&movies, "imdb_top_250_movies.csv")?;
    write_parquet(&movies, "imdb_top_250_movies.parquet")?;

    let sequels = movies
        .iter()
        .filter(|m| SEQUEL_MARKERS.iter().any(|s| m.title.ends_with(s)))
        .count();
    println!(
        "Wrote {} movies ({sequels} sequels) to imdb_top_250_movies.csv and imdb_top_250_movies.parquet",
        movies.len()
    );
    Ok(())
}
