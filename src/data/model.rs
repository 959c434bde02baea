use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Attribute – the three categorical filter dimensions
// ---------------------------------------------------------------------------

/// A categorical customer attribute that can be filtered and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    AgeGroup,
    Gender,
    IncomeBracket,
}

impl Attribute {
    /// All filterable attributes, in sidebar order.
    pub const ALL: [Attribute; 3] = [
        Attribute::AgeGroup,
        Attribute::Gender,
        Attribute::IncomeBracket,
    ];

    /// Column name in the source table.
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::AgeGroup => "age_group",
            Attribute::Gender => "gender",
            Attribute::IncomeBracket => "income_bracket",
        }
    }

    /// Human readable label for widgets and chart axes.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::AgeGroup => "Age Group",
            Attribute::Gender => "Gender",
            Attribute::IncomeBracket => "Income Bracket",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Column holding the per-customer spend.
pub const SPEND_COLUMN: &str = "total_spent";

// ---------------------------------------------------------------------------
// CellValue – a single cell in a pass-through column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell for columns the engine does not interpret.
/// They are carried along only so the data table and CSV export can show the
/// full source row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerRecord – one row of the source DataFrame
// ---------------------------------------------------------------------------

/// A single customer (one row of the precomputed table).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub income_bracket: Option<String>,
    pub total_spent: f64,
    /// Remaining source columns: column_name → value.
    pub extra: BTreeMap<String, CellValue>,
}

impl CustomerRecord {
    pub fn new(
        age_group: Option<&str>,
        gender: Option<&str>,
        income_bracket: Option<&str>,
        total_spent: f64,
    ) -> Self {
        Self {
            age_group: age_group.map(str::to_string),
            gender: gender.map(str::to_string),
            income_bracket: income_bracket.map(str::to_string),
            total_spent,
            extra: BTreeMap::new(),
        }
    }

    /// The record's value for a categorical attribute (`None` = null).
    pub fn category(&self, attr: Attribute) -> Option<&str> {
        match attr {
            Attribute::AgeGroup => self.age_group.as_deref(),
            Attribute::Gender => self.gender.as_deref(),
            Attribute::IncomeBracket => self.income_bracket.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// CustomerTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed table with per-attribute distinct values.
#[derive(Debug, Clone)]
pub struct CustomerTable {
    /// All customers, in source order.
    pub records: Vec<CustomerRecord>,
    /// Source column order, used by the data table and export.
    pub column_names: Vec<String>,
    /// Distinct non-null values per attribute, in order of first appearance.
    distinct: BTreeMap<Attribute, Vec<String>>,
}

impl CustomerTable {
    /// Build the table and its distinct-value index.
    ///
    /// `column_names` is the source column order; required columns missing
    /// from it are appended so the table view always shows them.
    pub fn from_records(records: Vec<CustomerRecord>, mut column_names: Vec<String>) -> Self {
        let required = Attribute::ALL
            .iter()
            .map(|a| a.column_name())
            .chain(std::iter::once(SPEND_COLUMN));
        for name in required {
            if !column_names.iter().any(|c| c == name) {
                column_names.push(name.to_string());
            }
        }

        let mut distinct: BTreeMap<Attribute, Vec<String>> = BTreeMap::new();
        for attr in Attribute::ALL {
            let values = distinct.entry(attr).or_default();
            for rec in &records {
                if let Some(v) = rec.category(attr) {
                    if !values.iter().any(|seen| seen == v) {
                        values.push(v.to_string());
                    }
                }
            }
        }

        CustomerTable {
            records,
            column_names,
            distinct,
        }
    }

    /// Distinct non-null values observed for `attr`, first-appearance order.
    pub fn distinct_values(&self, attr: Attribute) -> &[String] {
        self.distinct.get(&attr).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Text of one cell, as shown in the data table and written on export.
    pub fn cell_text(&self, row: usize, column: &str) -> String {
        let Some(rec) = self.records.get(row) else {
            return String::new();
        };
        if column == SPEND_COLUMN {
            return rec.total_spent.to_string();
        }
        if let Some(attr) = Attribute::ALL.into_iter().find(|a| a.column_name() == column) {
            return rec.category(attr).unwrap_or_default().to_string();
        }
        rec.extra
            .get(column)
            .map(|v| v.to_string())
            .unwrap_or_default()
    }

    /// Number of customers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
