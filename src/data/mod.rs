/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .parquet / .json / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → CustomerTable
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ CustomerTable  │  Vec<CustomerRecord>, distinct values per attribute
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → filtered indices
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate  │  summary metrics + group counts → DashboardView
///   └───────────┘
/// ```

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
