use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Attribute, CellValue, CustomerRecord, CustomerTable, SPEND_COLUMN};

/// Schema-level problems with an otherwise readable file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: 'total_spent' {reason} ({affected} rows affected)")]
    InvalidSpend {
        row: usize,
        reason: String,
        affected: usize,
    },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a customer table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – what `df.to_parquet()` writes; categoricals may be
///   dictionary encoded (recommended)
/// * `.json`    – `[{ "age_group": ..., "gender": ..., ... }, ...]`
/// * `.csv`     – header row, empty cells are nulls
///
/// Required columns: `age_group`, `gender`, `income_bracket`, `total_spent`.
/// Everything else is kept as pass-through cells.
pub fn load_file(path: &Path) -> Result<CustomerTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    }
}

fn is_required(column: &str) -> bool {
    column == SPEND_COLUMN || Attribute::ALL.iter().any(|a| a.column_name() == column)
}

fn set_category(rec: &mut CustomerRecord, attr: Attribute, value: Option<String>) {
    match attr {
        Attribute::AgeGroup => rec.age_group = value,
        Attribute::Gender => rec.gender = value,
        Attribute::IncomeBracket => rec.income_bracket = value,
    }
}

fn spend_value(value: Option<f64>) -> Result<f64, String> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(format!("is not finite ({v})")),
        None => Err("is null".to_string()),
    }
}

/// Collects bad `total_spent` cells so the whole file is scanned before
/// failing. Reports the first offending row and the total count.
#[derive(Default)]
struct SpendErrors {
    first: Option<(usize, String)>,
    affected: usize,
}

impl SpendErrors {
    fn check(&mut self, row: usize, value: Result<f64, String>) -> f64 {
        match value {
            Ok(v) => v,
            Err(reason) => {
                self.affected += 1;
                self.first.get_or_insert((row, reason));
                f64::NAN
            }
        }
    }

    fn finish(self) -> Result<(), LoadError> {
        match self.first {
            Some((row, reason)) => Err(LoadError::InvalidSpend {
                row,
                reason,
                affected: self.affected,
            }),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "customer_id": 1, "age_group": "18-25", "gender": "F",
///     "income_bracket": "Low", "total_spent": 120.5 },
///   ...
/// ]
/// ```
///
/// A categorical key that is `null` or absent from a row is a null value,
/// but every required key has to appear in at least one row.
fn load_json(path: &Path) -> Result<CustomerTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let objects = rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            row.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut column_names: Vec<String> = Vec::new();
    for key in objects.iter().flat_map(|obj| obj.keys()) {
        if !column_names.contains(key) {
            column_names.push(key.clone());
        }
    }
    if !objects.is_empty() {
        let required = Attribute::ALL
            .iter()
            .map(|a| a.column_name())
            .chain(std::iter::once(SPEND_COLUMN));
        for name in required {
            if !column_names.iter().any(|c| c == name) {
                return Err(LoadError::MissingColumn(name).into());
            }
        }
    }

    let mut records = Vec::with_capacity(objects.len());
    let mut spend_errors = SpendErrors::default();

    for (i, obj) in objects.into_iter().enumerate() {
        let spend = match obj.get(SPEND_COLUMN) {
            None | Some(JsonValue::Null) => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| format!("is not a number: {v}")),
        };
        let spend = spend_errors.check(i, spend.and_then(spend_value));
        let mut rec = CustomerRecord::new(None, None, None, spend);

        for attr in Attribute::ALL {
            let value = obj.get(attr.column_name()).and_then(json_to_category);
            set_category(&mut rec, attr, value);
        }
        for (key, val) in obj {
            if !is_required(key) {
                rec.extra.insert(key.clone(), json_to_cell(val));
            }
        }

        records.push(rec);
    }
    spend_errors.finish()?;

    Ok(CustomerTable::from_records(records, column_names))
}

fn json_to_category(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one customer per row.
/// Empty categorical cells are nulls; `total_spent` must parse as a number.
fn load_csv(path: &Path) -> Result<CustomerTable> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let position = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let spend_idx = position(SPEND_COLUMN)?;
    let category_idx = Attribute::ALL
        .into_iter()
        .map(|attr| Ok((attr, position(attr.column_name())?)))
        .collect::<Result<Vec<_>, LoadError>>()?;

    let mut records = Vec::new();
    let mut spend_errors = SpendErrors::default();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let raw_spend = record.get(spend_idx).unwrap_or("").trim();
        let spend = if raw_spend.is_empty() {
            Ok(None)
        } else {
            raw_spend
                .parse::<f64>()
                .map(Some)
                .map_err(|_| format!("'{raw_spend}' is not a number"))
        };
        let spend = spend_errors.check(row_no, spend.and_then(spend_value));
        let mut rec = CustomerRecord::new(None, None, None, spend);

        for &(attr, idx) in &category_idx {
            let value = record
                .get(idx)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            set_category(&mut rec, attr, value);
        }
        for (col_idx, value) in record.iter().enumerate() {
            let Some(col_name) = headers.get(col_idx) else {
                continue;
            };
            if !is_required(col_name) {
                rec.extra.insert(col_name.clone(), guess_cell_type(value));
            }
        }

        records.push(rec);
    }
    spend_errors.finish()?;

    Ok(CustomerTable::from_records(records, headers))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing the customer table.
///
/// Categorical columns may be plain strings, dictionary-encoded strings
/// (pandas `category` dtype) or any type Arrow can cast to Utf8.
/// `total_spent` may be any numeric type.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<CustomerTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let column_names: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
    let index_of = |name: &'static str| {
        schema
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name))
    };
    let spend_idx = index_of(SPEND_COLUMN)?;
    let category_idx = Attribute::ALL
        .into_iter()
        .map(|attr| Ok((attr, index_of(attr.column_name())?)))
        .collect::<Result<Vec<_>, LoadError>>()?;
    let extra_cols: Vec<(usize, String)> = column_names
        .iter()
        .enumerate()
        .filter(|(_, name)| !is_required(name))
        .map(|(i, name)| (i, name.clone()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    let mut records = Vec::new();
    let mut spend_errors = SpendErrors::default();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let spend = cast(batch.column(spend_idx).as_ref(), &DataType::Float64)
            .with_context(|| format!("'{SPEND_COLUMN}' is not numeric"))?;
        let spend = spend.as_primitive::<Float64Type>();

        let categories = category_idx
            .iter()
            .map(|&(attr, idx)| {
                cast(batch.column(idx).as_ref(), &DataType::Utf8)
                    .with_context(|| format!("'{}' cannot be read as text", attr.column_name()))
                    .map(|arr| (attr, arr))
            })
            .collect::<Result<Vec<_>>>()?;

        for row in 0..batch.num_rows() {
            let row_no = records.len();
            let value = (!spend.is_null(row)).then(|| spend.value(row));
            let spend = spend_errors.check(row_no, spend_value(value));
            let mut rec = CustomerRecord::new(None, None, None, spend);

            for (attr, arr) in &categories {
                let text = arr.as_string::<i32>();
                let value = (!text.is_null(row)).then(|| text.value(row).to_string());
                set_category(&mut rec, *attr, value);
            }
            for (col_idx, col_name) in &extra_cols {
                let value = extract_cell_value(batch.column(*col_idx), row);
                rec.extra.insert(col_name.clone(), value);
            }

            records.push(rec);
        }
    }
    spend_errors.finish()?;

    Ok(CustomerTable::from_records(records, column_names))
}

/// Extract a single pass-through value from an Arrow column at a given row.
fn extract_cell_value(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => array_value_to_string(col.as_ref(), row)
            .map(CellValue::String)
            .unwrap_or(CellValue::Null),
    }
}
