use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::CustomerTable;

/// Write the given rows (all columns, in the given order) as CSV.
pub fn write_csv<W: Write>(writer: W, table: &CustomerTable, indices: &[usize]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&table.column_names)
        .context("writing CSV header")?;

    for &row in indices {
        let cells = table
            .column_names
            .iter()
            .map(|col| table.cell_text(row, col));
        out.write_record(cells)
            .with_context(|| format!("writing CSV row {row}"))?;
    }

    out.flush().context("flushing CSV")?;
    Ok(())
}

/// Export the filtered customers to a CSV file.
pub fn export_csv(path: &Path, table: &CustomerTable, indices: &[usize]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(file, table, indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{CellValue, CustomerRecord};

    #[test]
    fn writes_selected_rows_in_column_order() {
        let mut first = CustomerRecord::new(Some("18-25"), Some("F"), Some("Low"), 10.0);
        first
            .extra
            .insert("customer_id".to_string(), CellValue::Integer(1));
        let mut second = CustomerRecord::new(Some("26-35"), None, Some("High, Top"), 22.5);
        second
            .extra
            .insert("customer_id".to_string(), CellValue::Integer(2));
        let table = CustomerTable::from_records(
            vec![first, second],
            vec!["customer_id".to_string()],
        );

        let mut buf = Vec::new();
        write_csv(&mut buf, &table, &[1]).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "customer_id,age_group,gender,income_bracket,total_spent\n\
             2,26-35,,\"High, Top\",22.5\n"
        );
    }

    #[test]
    fn export_to_file_round_trips_through_loader() {
        let table = CustomerTable::from_records(
            vec![
                CustomerRecord::new(Some("18-25"), Some("F"), Some("Low"), 10.0),
                CustomerRecord::new(Some("26-35"), Some("M"), Some("High"), 20.0),
            ],
            Vec::new(),
        );
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filtered.csv");

        export_csv(&path, &table, &[0, 1]).unwrap();
        let reloaded = crate::data::loader::load_file(&path).unwrap();

        assert_eq!(reloaded.records, table.records);
    }
}
