//! Writes a synthetic storefront dataset (`sample_games.csv` and
//! `sample_games.parquet`) with the columns the dashboard reads.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

#[derive(Parser)]
#[command(about = "Generate a sample games dataset", long_about = None)]
struct Args {
    /// Number of games to generate
    #[arg(long, default_value_t = 1500)]
    rows: usize,

    /// Directory receiving sample_games.csv and sample_games.parquet
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One output row, serialised with the source column names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GameRow {
    name: String,
    release_date: String,
    developers: String,
    publisher_class: &'static str,
    review_score: Option<f64>,
    copies_sold: i64,
    price: f64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SampleRng {
    state: [u64; 4],
}

impl SampleRng {
    fn new(seed: u64) -> Self {
        let mut state = [0u64; 4];
        let mut x = seed;
        for slot in &mut state {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SampleRng { state }
    }

    fn next_u64(&mut self) -> u64 {
        let s = &mut self.state;
        let result = s[1].wrapping_mul(5).rotate_left(7).wrapping_mul(9);
        let t = s[1] << 17;
        s[2] ^= s[0];
        s[3] ^= s[1];
        s[1] ^= s[2];
        s[0] ^= s[3];
        s[2] ^= t;
        s[3] = s[3].rotate_left(45);
        result
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.unit() * n as f64) as usize % n.max(1)
    }

    /// Box-Muller transform for a normal sample.
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.unit().max(1e-15);
        let u2 = self.unit();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn chance(&mut self, p: f64) -> bool {
        self.unit() < p
    }
}

const ADJECTIVES: [&str; 12] = [
    "Crimson", "Silent", "Hollow", "Iron", "Neon", "Lost", "Frozen", "Wild", "Last", "Broken",
    "Golden", "Hidden",
];
const NOUNS: [&str; 12] = [
    "Harbor", "Frontier", "Kingdom", "Signal", "Orchard", "Citadel", "Drift", "Legacy", "Tides",
    "Empire", "Garden", "Protocol",
];
const STUDIOS: [&str; 24] = [
    "Pixel Forge", "Northwind Games", "Lantern Works", "Blue Moth", "Sunken Bell", "Quiet Fox",
    "Red Kite Studio", "Moonlit Labs", "Brass Owl", "Tiny Titan", "Cobalt Arts", "Driftwood",
    "Oak & Ash", "Starling", "Paper Crane", "Ember Peak", "Glass Lynx", "Velvet Void",
    "Stonegate", "Harbor Lights", "Wandering Ox", "Deep Root", "Clockwork Crow", "Solstice",
];

/// `(class, share, median copies, price choices)`
const CLASSES: [(&str, f64, f64, &[f64]); 4] = [
    ("Indie", 0.55, 90_000.0, &[0.0, 4.99, 9.99, 14.99, 19.99, 24.99]),
    ("Hobbyist", 0.15, 60_000.0, &[0.0, 0.99, 2.99, 4.99]),
    ("AA", 0.20, 350_000.0, &[19.99, 24.99, 29.99, 39.99]),
    ("AAA", 0.10, 1_800_000.0, &[49.99, 59.99, 69.99]),
];

fn generate(rows: usize, rng: &mut SampleRng) -> Vec<GameRow> {
    (0..rows)
        .map(|i| {
            let mut pick = rng.unit();
            let (class, _, median, prices) = CLASSES
                .iter()
                .copied()
                .find(|(_, share, _, _)| {
                    pick -= share;
                    pick < 0.0
                })
                .unwrap_or(CLASSES[0]);

            // Squaring skews studio choice so a few studios ship many games.
            let studio = STUDIOS[((rng.unit().powi(2)) * STUDIOS.len() as f64) as usize];

            let release_date = if rng.chance(0.03) {
                "TBA".to_string()
            } else {
                format!("{:02}-{:02}-2024", 1 + rng.below(28), 1 + rng.below(12))
            };

            let review_score = (!rng.chance(0.02))
                .then(|| rng.gauss(75.0, 12.0).clamp(10.0, 100.0).round());

            let copies_sold = rng.gauss(median.ln(), 1.3).exp().round() as i64;

            GameRow {
                name: format!(
                    "{} {} {:04}",
                    ADJECTIVES[rng.below(ADJECTIVES.len())],
                    NOUNS[rng.below(NOUNS.len())],
                    i
                ),
                release_date,
                developers: studio.to_string(),
                publisher_class: class,
                review_score,
                copies_sold,
                price: prices[rng.below(prices.len())],
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[GameRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[GameRow]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, false),
        Field::new("releaseDate", DataType::Utf8, false),
        Field::new("developers", DataType::Utf8, false),
        Field::new("publisherClass", DataType::Utf8, false),
        Field::new("reviewScore", DataType::Float64, true),
        Field::new("copiesSold", DataType::Int64, false),
        Field::new("price", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.name))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.release_date))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.developers))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.publisher_class))),
            Arc::new(Float64Array::from_iter(rows.iter().map(|r| r.review_score))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.copies_sold))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.price))),
        ],
    )
    .context("building record batch")?;

    let preview = pretty_format_batches(&[batch.slice(0, rows.len().min(5))])
        .context("formatting preview")?;
    println!("{preview}");

    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SampleRng::new(args.seed);
    let rows = generate(args.rows, &mut rng);

    let csv_path = args.out_dir.join("sample_games.csv");
    let parquet_path = args.out_dir.join("sample_games.parquet");
    write_csv(&csv_path, &rows)?;
    write_parquet(&parquet_path, &rows)?;

    println!(
        "Wrote {} games to {} and {}",
        rows.len(),
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
