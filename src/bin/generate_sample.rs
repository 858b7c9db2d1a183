use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

const STANDARD_POSITION: u32 = 518;
const CHESS960_POSITIONS: u32 = 960;

/// Write a deterministic sample of DFRC analysis results.
#[derive(Parser)]
#[command(name = "generate-sample", version)]
struct Cli {
    /// Output Parquet file
    #[arg(long, default_value = "public/analysis_results.parquet")]
    output: PathBuf,

    /// Number of positions to generate
    #[arg(long, default_value_t = 200)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Back rank of Chess960 position `id` (Scharnagl numbering), lowercase.
fn chess960_back_rank(id: u32) -> String {
    const KNIGHTS: [(usize, usize); 10] = [
        (0, 1),
        (0, 2),
        (0, 3),
        (0, 4),
        (1, 2),
        (1, 3),
        (1, 4),
        (2, 3),
        (2, 4),
        (3, 4),
    ];

    let mut rank = [' '; 8];
    let mut n = id as usize % CHESS960_POSITIONS as usize;

    rank[2 * (n % 4) + 1] = 'b';
    n /= 4;
    rank[2 * (n % 4)] = 'b';
    n /= 4;

    let place = |rank: &mut [char; 8], nth: usize, piece: char| {
        let square = rank
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == ' ')
            .map(|(i, _)| i)
            .nth(nth)
            .expect("back rank has a free square");
        rank[square] = piece;
    };

    place(&mut rank, n % 6, 'q');
    n /= 6;

    let (first, second) = KNIGHTS[n];
    // Placing the first knight shifts the empty squares after it by one.
    place(&mut rank, first, 'n');
    place(&mut rank, second - 1, 'n');

    place(&mut rank, 0, 'r');
    place(&mut rank, 0, 'k');
    place(&mut rank, 0, 'r');

    rank.iter().collect()
}

/// Mirrored positions keep their Chess960 id; the rest are numbered after.
fn dfrc_id(white: u32, black: u32) -> i64 {
    if white == black {
        return white as i64;
    }
    let black_rank = if black < white { black } else { black - 1 };
    CHESS960_POSITIONS as i64 + white as i64 * (CHESS960_POSITIONS as i64 - 1) + black_rank as i64
}

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

    fn position(&mut self) -> u32 {
        (self.next_u64() % CHESS960_POSITIONS as u64) as u32
    }
}

struct Rows {
    white_id: Vec<i64>,
    black_id: Vec<i64>,
    white: Vec<String>,
    black: Vec<String>,
    dfrc_id: Vec<i64>,
    centipawn_loss: Vec<f64>,
    sharpness: Vec<f64>,
    playability: Vec<f64>,
}

fn generate(rows: usize, rng: &mut SimpleRng) -> Rows {
    let rows = rows.min((CHESS960_POSITIONS * CHESS960_POSITIONS) as usize);
    let mut pairs = vec![(STANDARD_POSITION, STANDARD_POSITION)];
    let mut seen: HashSet<(u32, u32)> = pairs.iter().copied().collect();
    while pairs.len() < rows {
        let pair = (rng.position(), rng.position());
        if seen.insert(pair) {
            pairs.push(pair);
        }
    }
    pairs.truncate(rows);

    let mut out = Rows {
        white_id: Vec::with_capacity(rows),
        black_id: Vec::with_capacity(rows),
        white: Vec::with_capacity(rows),
        black: Vec::with_capacity(rows),
        dfrc_id: Vec::with_capacity(rows),
        centipawn_loss: Vec::with_capacity(rows),
        sharpness: Vec::with_capacity(rows),
        playability: Vec::with_capacity(rows),
    };

    for (w, b) in pairs {
        let cpl = 5.0 + rng.next_f64() * 95.0;
        let sharpness = rng.next_f64();
        let playability = 0.5 * (1.0 - cpl / 100.0) + 0.5 * sharpness;

        out.white_id.push(w as i64);
        out.black_id.push(b as i64);
        out.white.push(chess960_back_rank(w));
        out.black.push(chess960_back_rank(b));
        out.dfrc_id.push(dfrc_id(w, b));
        out.centipawn_loss.push(cpl);
        out.sharpness.push(sharpness);
        out.playability.push(playability);
    }
    out
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut rng = SimpleRng::new(cli.seed);
    let rows = generate(cli.rows, &mut rng);

    let schema = Arc::new(Schema::new(vec![
        Field::new("dfrc_id", DataType::Int64, false),
        Field::new("white_id", DataType::Int64, false),
        Field::new("black_id", DataType::Int64, false),
        Field::new("white", DataType::Utf8, false),
        Field::new("black", DataType::Utf8, false),
        Field::new("centipawn_loss", DataType::Float64, false),
        Field::new("sharpness", DataType::Float64, false),
        Field::new("playability", DataType::Float64, false),
    ]));

    let n_rows = rows.dfrc_id.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.dfrc_id)),
            Arc::new(Int64Array::from(rows.white_id)),
            Arc::new(Int64Array::from(rows.black_id)),
            Arc::new(StringArray::from(rows.white)),
            Arc::new(StringArray::from(rows.black)),
            Arc::new(Float64Array::from(rows.centipawn_loss)),
            Arc::new(Float64Array::from(rows.sharpness)),
            Arc::new(Float64Array::from(rows.playability)),
        ],
    )
    .context("building record batch")?;

    if let Some(parent) = cli.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = std::fs::File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {n_rows} positions to {}", cli.output.display());
    Ok(())
}
