use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{DictionaryArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Int32Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

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

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// `None` with probability `p`, otherwise `Some(value)`.
    fn maybe_null<T>(&mut self, p: f64, value: T) -> Option<T> {
        (self.next_f64() >= p).then_some(value)
    }
}

fn age_group(age: i64) -> &'static str {
    match age {
        ..=25 => "18-25",
        26..=35 => "26-35",
        36..=45 => "36-45",
        46..=55 => "46-55",
        _ => "56+",
    }
}

fn income_bracket(income: f64) -> &'static str {
    if income < 40_000.0 {
        "Low"
    } else if income < 90_000.0 {
        "Medium"
    } else {
        "High"
    }
}

const CUSTOMERS: i64 = 2_000;
/// Share of categorical cells left empty, so the default filter has
/// something to exclude.
const NULL_RATE: f64 = 0.02;

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "customer_data.parquet".to_string());
    let mut rng = SimpleRng::new(42);

    let mut ids = Vec::new();
    let mut ages = Vec::new();
    let mut age_groups: Vec<Option<&str>> = Vec::new();
    let mut genders: Vec<Option<&str>> = Vec::new();
    let mut incomes = Vec::new();
    let mut brackets: Vec<Option<&str>> = Vec::new();
    let mut spent = Vec::new();

    for id in 0..CUSTOMERS {
        let age = rng.range(18.0, 75.0) as i64;
        let income = rng.gauss(65_000.0, 30_000.0).max(12_000.0);
        let gender = if rng.next_f64() < 0.5 { "F" } else { "M" };

        // Spend grows with income, with a long tail.
        let base = income * 0.01 * rng.range(0.2, 1.8);
        let total = (base + rng.gauss(0.0, 150.0)).max(0.0);

        ids.push(id + 1);
        ages.push(age);
        age_groups.push(rng.maybe_null(NULL_RATE, age_group(age)));
        genders.push(rng.maybe_null(NULL_RATE, gender));
        incomes.push((income * 100.0).round() / 100.0);
        brackets.push(rng.maybe_null(NULL_RATE, income_bracket(income)));
        spent.push((total * 100.0).round() / 100.0);
    }

    let dict_type = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
    let schema = Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Int64, false),
        Field::new("age", DataType::Int64, false),
        Field::new("age_group", dict_type, true),
        Field::new("gender", DataType::Utf8, true),
        Field::new("income", DataType::Float64, false),
        Field::new("income_bracket", DataType::Utf8, true),
        Field::new("total_spent", DataType::Float64, false),
    ]));

    let age_group_array: DictionaryArray<Int32Type> = age_groups.into_iter().collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(Int64Array::from(ages)),
            Arc::new(age_group_array),
            Arc::new(StringArray::from(genders)),
            Arc::new(Float64Array::from(incomes)),
            Arc::new(StringArray::from(brackets)),
            Arc::new(Float64Array::from(spent)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {CUSTOMERS} customers to {output_path}");
    Ok(())
}
