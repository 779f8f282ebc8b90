//! Error types for the statement analyzer.

use thiserror::Error;

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while importing or analyzing a statement.
///
/// Row-level problems (bad date, bad amount, short row) never show up here:
/// those rows are dropped by the parser.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Failed to open or read the input
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The header row could not be read
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Header row lacks a date or amount column
    #[error("Statement header is missing required column(s): {missing}")]
    MissingColumns { missing: String },

    /// Import was requested without an owning user
    #[error("User ID must not be empty")]
    EmptyUserId,

    /// Parsing succeeded but every row was dropped
    #[error("No transactions found in the statement")]
    NoTransactions,

    /// The store rejected a transaction; earlier saves are kept
    #[error("Failed to save transactions ({saved} saved before failure): {source}")]
    Persistence {
        saved: usize,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A running total grew past what an amount can represent
    #[error("Amount overflow while totaling {context}")]
    AmountOverflow { context: String },

    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Delimiter override is not a single ASCII character
    #[error("Invalid delimiter {0:?}: expected a single ASCII character")]
    InvalidDelimiter(String),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: statement-analyzer <statement.csv> [user-id]")]
    MissingArgument,
}
