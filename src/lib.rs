//! # Statement Analyzer
//!
//! Imports bank and credit-card statement exports, fills in missing
//! categories and summarizes where the money went.
//!
//! ## Design Principles
//!
//! - **Header-driven parsing**: column roles come from header aliases
//!   (`date`/`data`, `amount`/`valor`, ...), not fixed positions
//! - **Best-effort rows**: malformed rows are dropped and counted, never fatal
//! - **Exact money**: amounts are `rust_decimal` values; positive means spent,
//!   negative means received
//! - **Deterministic categories**: an ordered keyword table, first match wins
//!
//! ## Example
//!
//! ```
//! use statement_analyzer::{summarize, parse_statement};
//! use std::io::Cursor;
//!
//! let csv = "date,title,category,amount\n2024-01-05,Uber Trip,,45.00\n";
//! let transactions = parse_statement(Cursor::new(csv)).unwrap();
//! let result = summarize(&transactions).unwrap();
//! assert_eq!(result.by_category[0].category, "Transporte");
//! ```

pub mod aggregator;
pub mod categorizer;
pub mod decimal;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod store;
pub mod transaction;

pub use aggregator::{
    clean_description, summarize, AnalysisResult, CategorySummary, DescriptionSummary,
};
pub use categorizer::{categorize, classify, suggest_category, Category};
pub use decimal::Amount;
pub use error::{EngineError, Result};
pub use parser::{
    parse_date, parse_statement, parse_statement_with_config, ColumnMap, ParseStats,
    ParserConfig, StatementReader,
};
pub use pipeline::{ImportConfig, ImportPipeline, ImportReport};
pub use store::{MemoryStore, TransactionStore};
pub use transaction::{ColumnRole, Transaction};
