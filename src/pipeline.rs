//! Statement import: parse, categorize, analyze, persist.
//!
//! Validation failures (no user, nothing parsed) abort before anything is
//! saved. A store failure stops the save loop; records saved up to that
//! point stay saved and their count travels in the error.

use crate::aggregator::{summarize, AnalysisResult};
use crate::categorizer::categorize;
use crate::error::{EngineError, Result};
use crate::parser::{parse_statement_with_config, ParserConfig};
use crate::store::TransactionStore;
use crate::transaction::Transaction;
use log::{error, info};
use serde::Serialize;
use std::io::Read;

/// Options for [`ImportPipeline`].
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub parser: ParserConfig,
    /// Attach an [`AnalysisResult`] to the report.
    pub analyze: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        ImportConfig {
            parser: ParserConfig::default(),
            analyze: true,
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    /// Transactions that survived parsing.
    pub processed: usize,
    /// Transactions accepted by the store.
    pub saved: usize,
    /// Categorized transactions, in statement order.
    pub transactions: Vec<Transaction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

/// Runs statement imports against a [`TransactionStore`].
pub struct ImportPipeline<S> {
    store: S,
    config: ImportConfig,
}

impl<S: TransactionStore> ImportPipeline<S> {
    /// Creates a pipeline with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, ImportConfig::default())
    }

    pub fn with_config(store: S, config: ImportConfig) -> Self {
        ImportPipeline { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Imports one statement for `user_id`.
    pub fn import<R: Read>(&mut self, user_id: &str, input: R) -> Result<ImportReport> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(EngineError::EmptyUserId);
        }

        let parsed = parse_statement_with_config(input, &self.config.parser)?;
        if parsed.is_empty() {
            return Err(EngineError::NoTransactions);
        }
        info!(
            "Parsed {} transactions from statement for user {}",
            parsed.len(),
            user_id
        );

        let transactions: Vec<Transaction> = parsed.into_iter().map(categorize).collect();
        let analysis = self
            .config
            .analyze
            .then(|| summarize(&transactions))
            .transpose()?;

        let saved = self.persist(user_id, &transactions)?;
        info!(
            "Saved {}/{} transactions for user {}",
            saved,
            transactions.len(),
            user_id
        );

        Ok(ImportReport {
            processed: transactions.len(),
            saved,
            transactions,
            analysis,
        })
    }

    fn persist(&mut self, user_id: &str, transactions: &[Transaction]) -> Result<usize> {
        for (saved, transaction) in transactions.iter().enumerate() {
            if let Err(e) = self.store.save(user_id, transaction) {
                error!(
                    "Failed to save transaction {} of {} for user {}: {}",
                    saved + 1,
                    transactions.len(),
                    user_id,
                    e
                );
                return Err(EngineError::Persistence {
                    saved,
                    source: Box::new(e),
                });
            }
        }
        Ok(transactions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::fmt;
    use std::io::Cursor;

    const STATEMENT: &str = "date,title,category,amount\n\
                             2024-01-05,Uber Trip,,45.00\n\
                             2024-01-06,Spotify,,21.90\n\
                             2024-01-07,Salario,Receitas,-5000.00\n";

    #[derive(Debug)]
    struct DiskFull;

    impl fmt::Display for DiskFull {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("disk full")
        }
    }

    impl std::error::Error for DiskFull {}

    /// Accepts `capacity` transactions, then fails every save.
    struct LimitedStore {
        capacity: usize,
        saved: Vec<Transaction>,
    }

    impl TransactionStore for LimitedStore {
        type Error = DiskFull;

        fn save(&mut self, _user_id: &str, transaction: &Transaction) -> std::result::Result<(), DiskFull> {
            if self.saved.len() >= self.capacity {
                return Err(DiskFull);
            }
            self.saved.push(transaction.clone());
            Ok(())
        }
    }

    #[test]
    fn test_import_categorizes_and_saves() {
        let mut pipeline = ImportPipeline::new(MemoryStore::new());
        let report = pipeline.import("alice", Cursor::new(STATEMENT)).unwrap();

        assert_eq!(report.processed, 3);
        assert_eq!(report.saved, 3);
        let categories: Vec<&str> = report.transactions.iter().map(|t| t.category()).collect();
        assert_eq!(categories, vec!["Transporte", "Assinaturas", "Receitas"]);

        let stored = pipeline.store().transactions("alice");
        assert_eq!(stored, report.transactions.as_slice());

        let analysis = report.analysis.unwrap();
        assert_eq!(analysis.transaction_count, 3);
        assert_eq!(analysis.total_income.to_string(), "5000.00");
        assert_eq!(analysis.total_spent.to_string(), "66.90");
    }

    #[test]
    fn test_import_without_analysis() {
        let config = ImportConfig {
            analyze: false,
            ..ImportConfig::default()
        };
        let mut pipeline = ImportPipeline::with_config(MemoryStore::new(), config);
        let report = pipeline.import("alice", Cursor::new(STATEMENT)).unwrap();
        assert!(report.analysis.is_none());
    }

    #[test]
    fn test_overflowing_totals_fail_before_saving() {
        let csv = "date,title,amount\n\
                   2024-01-01,A,79228162514264337593543950335\n\
                   2024-01-02,B,79228162514264337593543950335\n";

        let mut pipeline = ImportPipeline::new(MemoryStore::new());
        let err = pipeline.import("alice", Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::AmountOverflow { .. }));
        assert!(pipeline.store().is_empty());

        let config = ImportConfig {
            analyze: false,
            ..ImportConfig::default()
        };
        let mut pipeline = ImportPipeline::with_config(MemoryStore::new(), config);
        let report = pipeline.import("alice", Cursor::new(csv)).unwrap();
        assert_eq!(report.saved, 2);
    }

    #[test]
    fn test_empty_user_id_is_rejected_before_parsing() {
        let mut pipeline = ImportPipeline::new(MemoryStore::new());
        let err = pipeline.import("  ", Cursor::new(STATEMENT)).unwrap_err();
        assert!(matches!(err, EngineError::EmptyUserId));
        assert!(pipeline.store().is_empty());
    }

    #[test]
    fn test_no_surviving_rows_is_an_error() {
        let mut pipeline = ImportPipeline::new(MemoryStore::new());
        let csv = "date,amount\nnot-a-date,1.00\n";
        let err = pipeline.import("alice", Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, EngineError::NoTransactions));
    }

    #[test]
    fn test_missing_columns_propagate() {
        let mut pipeline = ImportPipeline::new(MemoryStore::new());
        let err = pipeline
            .import("alice", Cursor::new("date,title\n2024-01-05,Uber\n"))
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingColumns { .. }));
    }

    #[test]
    fn test_store_failure_reports_partial_count() {
        let store = LimitedStore {
            capacity: 2,
            saved: Vec::new(),
        };
        let mut pipeline = ImportPipeline::new(store);
        let err = pipeline.import("alice", Cursor::new(STATEMENT)).unwrap_err();

        match err {
            EngineError::Persistence { saved, source } => {
                assert_eq!(saved, 2);
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("Expected Persistence, got {:?}", other),
        }
        assert_eq!(pipeline.into_store().saved.len(), 2);
    }

    #[test]
    fn test_borrowed_store() {
        let mut store = MemoryStore::new();
        ImportPipeline::new(&mut store)
            .import("bob", Cursor::new(STATEMENT))
            .unwrap();
        assert_eq!(store.transactions("bob").len(), 3);
    }
}
