//! k-anonymity enforcement for tabular data.
//!
//! A table goes through three stages: the generalizer reduces precision of
//! configured columns and removes identifiers, the equivalence-class builder
//! groups rows by their quasi-identifier tuple, and the suppressor removes
//! every row whose class is smaller than `k`. Metrics describing the run are
//! returned alongside the anonymized table.
//!
//! ```no_run
//! use anonguard_core::{AnonymizationEngine, AnonymizationPolicy, CsvTable, Table};
//!
//! let policy = AnonymizationPolicy::builder(5)
//!     .with_quasi_identifier("ZIP_CODE")
//!     .with_quasi_identifier("WARD")
//!     .drop_column("STREET_ADDRESS")
//!     .truncate("ZIP_CODE", 3)
//!     .build()?;
//! let table = CsvTable::new("requests.csv", "requests".to_string()).load()?;
//! let result = AnonymizationEngine::new(policy)?.anonymize(&table)?;
//! println!("{} rows suppressed", result.metrics.suppressed_rows());
//! # Ok::<(), anonguard_core::AnonymizationError>(())
//! ```

pub mod columns;
pub mod compiler;
pub mod engine;
pub mod errors;
pub mod metrics;
pub mod policy;
pub mod readers;
pub mod rules;
pub mod tables;
pub mod utils;

pub use columns::{ColumnSchema, ColumnType};
pub use engine::{anonymize, AnonymizationEngine, Anonymized};
pub use errors::AnonymizationError;
pub use metrics::AnonymizationMetrics;
pub use policy::{AnonymizationPolicy, ColumnGeneralization, PolicyBuilder};
pub use rules::GeneralizationRule;
pub use tables::{
    csv_table::{write_csv, CsvTable},
    Table,
};
