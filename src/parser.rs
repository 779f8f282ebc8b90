//! Statement CSV parsing.
//!
//! The header row decides which column plays which [`ColumnRole`]; data rows
//! are then normalized one at a time. Rows that cannot be normalized are
//! dropped and only counted. Missing date/amount columns and stream read
//! errors are the only hard failures.

use crate::decimal::Amount;
use crate::error::{EngineError, Result};
use crate::transaction::{ColumnRole, Transaction};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};
use log::{debug, warn};
use std::io::Read;

/// Date layouts tried in order. `%d/%m/%Y` precedes `%m/%d/%Y`, so
/// `03/04/2024` is the 3rd of April.
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parses a statement date cell, trying each supported layout in turn.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Tunables for reading a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Field separator, `,` unless the export uses `;`.
    pub delimiter: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig { delimiter: b',' }
    }
}

/// Column indices resolved from the header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub amount: usize,
    pub category: Option<usize>,
    pub description: Option<usize>,
}

impl ColumnMap {
    /// Resolves column roles from a header record.
    ///
    /// The first column matching a role wins it. Fails if either the date
    /// or the amount role is absent.
    pub fn detect(headers: &StringRecord) -> Result<Self> {
        let mut date = None;
        let mut amount = None;
        let mut category = None;
        let mut description = None;

        for (idx, cell) in headers.iter().enumerate() {
            let cell = cell.trim_start_matches(BYTE_ORDER_MARK).trim();

            for (role, slot) in [
                (ColumnRole::Date, &mut date),
                (ColumnRole::Amount, &mut amount),
                (ColumnRole::Category, &mut category),
                (ColumnRole::Description, &mut description),
            ] {
                if slot.is_none() && role.matches(cell) {
                    *slot = Some(idx);
                }
            }
        }

        match (date, amount) {
            (Some(date), Some(amount)) => Ok(ColumnMap {
                date,
                amount,
                category,
                description,
            }),
            (date, amount) => {
                let missing: Vec<String> = [(ColumnRole::Date, date), (ColumnRole::Amount, amount)]
                    .iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(role, _)| role.to_string())
                    .collect();
                Err(EngineError::MissingColumns {
                    missing: missing.join(", "),
                })
            }
        }
    }

    /// Minimum number of fields a row needs to reach every required column.
    pub fn min_fields(&self) -> usize {
        self.date.max(self.amount) + 1
    }

    /// Normalizes one data row. Returns `None` if the row must be dropped.
    pub fn extract(&self, record: &StringRecord) -> Option<Transaction> {
        if record.len() < self.min_fields() {
            return None;
        }

        let date = parse_date(record.get(self.date)?)?;
        let amount = Amount::parse_localized(record.get(self.amount)?)?;
        let optional = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        Some(Transaction::new(
            date,
            optional(self.description),
            optional(self.category),
            amount,
        ))
    }
}

/// Row counters for one pass over a statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Data rows seen, excluding the header.
    pub rows_read: usize,
    /// Rows dropped as malformed.
    pub rows_skipped: usize,
}

/// Lazy reader yielding the transactions of a statement.
///
/// Malformed rows are skipped without being yielded. An `Err` item means
/// the underlying stream failed; iteration ends after it.
pub struct StatementReader<R> {
    columns: ColumnMap,
    records: StringRecordsIntoIter<R>,
    stats: ParseStats,
    done: bool,
}

impl<R: Read> StatementReader<R> {
    /// Reads the header row with the default configuration.
    pub fn new(reader: R) -> Result<Self> {
        Self::with_config(reader, &ParserConfig::default())
    }

    /// Reads the header row and resolves the column roles.
    pub fn with_config(reader: R, config: &ParserConfig) -> Result<Self> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(config.delimiter)
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnMap::detect(&headers)?;
        debug!("Detected statement columns: {:?}", columns);

        Ok(StatementReader {
            columns,
            records: csv_reader.into_records(),
            stats: ParseStats::default(),
            done: false,
        })
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn skip(&mut self, reason: &str) {
        self.stats.rows_skipped += 1;
        // header is line 1
        debug!("Row {}: dropped ({})", self.stats.rows_read + 1, reason);
    }

    fn finish(&mut self) {
        self.done = true;
        let parsed = self.stats.rows_read - self.stats.rows_skipped;
        if self.stats.rows_skipped > 0 {
            warn!(
                "Skipped {} of {} statement rows",
                self.stats.rows_skipped, self.stats.rows_read
            );
        }
        debug!("Parsed {} transactions from statement", parsed);
    }
}

impl<R: Read> Iterator for StatementReader<R> {
    type Item = Result<Transaction>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            let record = match self.records.next() {
                Some(Ok(record)) => record,
                Some(Err(e)) if e.is_io_error() => {
                    self.done = true;
                    return Some(Err(EngineError::Io(e.into())));
                }
                Some(Err(e)) => {
                    self.stats.rows_read += 1;
                    self.skip(&e.to_string());
                    continue;
                }
                None => {
                    self.finish();
                    return None;
                }
            };

            self.stats.rows_read += 1;
            match self.columns.extract(&record) {
                Some(transaction) => return Some(Ok(transaction)),
                None => self.skip("unparseable date, amount or short row"),
            }
        }
    }
}

/// Parses a whole statement with the default configuration.
pub fn parse_statement<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    parse_statement_with_config(reader, &ParserConfig::default())
}

/// Parses a whole statement, collecting the surviving transactions in order.
pub fn parse_statement_with_config<R: Read>(
    reader: R,
    config: &ParserConfig,
) -> Result<Vec<Transaction>> {
    StatementReader::with_config(reader, config)?.collect()
}
