//! Canonical transaction record and statement column roles.

use crate::decimal::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single statement line, normalized.
///
/// Immutable once built: categorization produces a new record through
/// [`Transaction::with_category`] instead of mutating this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    date: NaiveDate,
    description: String,
    category: String,
    amount: Amount,
}

impl Transaction {
    /// Creates a transaction. `description` and `category` are kept verbatim.
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        category: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Transaction {
            date,
            description: description.into(),
            category: category.into(),
            amount,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Raw description as found in the statement.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Category label, possibly empty.
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Positive = money spent, negative = money received.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns `true` when the category cell was empty.
    pub fn is_uncategorized(&self) -> bool {
        self.category.is_empty()
    }

    /// Consumes the record and returns a copy carrying `category`.
    pub fn with_category(self, category: impl Into<String>) -> Self {
        Transaction {
            category: category.into(),
            ..self
        }
    }
}

/// Semantic role of a statement column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Date,
    Amount,
    Category,
    Description,
}

impl ColumnRole {
    /// Accepted header spellings, lowercase. Matched exactly after trimming.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ColumnRole::Date => &["date", "data"],
            ColumnRole::Amount => &["amount", "value", "valor"],
            ColumnRole::Category => &["category", "categoria"],
            ColumnRole::Description => &[
                "title",
                "description",
                "titulo",
                "título",
                "descricao",
                "descrição",
            ],
        }
    }

    /// Returns `true` if `header` (already trimmed) names this role.
    pub fn matches(&self, header: &str) -> bool {
        let header = header.to_lowercase();
        self.aliases().iter().any(|alias| *alias == header)
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnRole::Date => "date",
            ColumnRole::Amount => "amount",
            ColumnRole::Category => "category",
            ColumnRole::Description => "description",
        };
        f.write_str(name)
    }
}
