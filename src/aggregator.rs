//! Spending summaries over a batch of transactions.
//!
//! [`summarize`] is a pure function: one pass builds the running totals,
//! a second step turns them into sorted summary lists.

use crate::categorizer::classify;
use crate::decimal::Amount;
use crate::error::{EngineError, Result};
use crate::transaction::Transaction;
use serde::Serialize;
use std::collections::HashMap;

/// Card processor markers removed from descriptions before grouping.
const PROCESSOR_PREFIXES: [&str; 4] = ["Pg *", "Dl*", "Dl *", "Dm *"];

/// Everything from this marker onward is dropped ("Loja - Parcela 2/6").
const INSTALLMENT_MARKER: &str = " - Parcela";

/// Totals for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Amount,
    pub count: usize,
    pub average: Amount,
}

/// Totals for one cleaned description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DescriptionSummary {
    pub description: String,
    pub total: Amount,
    pub count: usize,
    pub average: Amount,
}

/// Result of analyzing a batch of transactions.
///
/// `total_spent` and `total_income` are never negative. Both summary lists
/// are sorted by total, largest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub total_spent: Amount,
    pub total_income: Amount,
    /// `total_income - total_spent`
    pub net_balance: Amount,
    pub transaction_count: usize,
    pub by_category: Vec<CategorySummary>,
    pub by_description: Vec<DescriptionSummary>,
}

/// Normalizes a description into its grouping key.
///
/// ```
/// use statement_analyzer::clean_description;
///
/// assert_eq!(clean_description("Pg *Ifood - Parcela 2/6"), "Ifood");
/// ```
pub fn clean_description(description: &str) -> String {
    let mut cleaned = description.trim().to_string();
    for prefix in PROCESSOR_PREFIXES {
        cleaned = cleaned.replace(prefix, "");
    }
    if let Some(idx) = cleaned.find(INSTALLMENT_MARKER) {
        cleaned.truncate(idx);
    }
    cleaned.trim().to_string()
}

/// Running total keyed by a label, remembering first-seen order.
#[derive(Default)]
struct Grouping {
    index: HashMap<String, usize>,
    entries: Vec<(String, Amount, usize)>,
}

impl Grouping {
    fn add(&mut self, key: &str, amount: Amount) -> Result<()> {
        match self.index.get(key) {
            Some(&idx) => {
                let entry = &mut self.entries[idx];
                entry.1 = checked_total(entry.1, amount, key)?;
                entry.2 += 1;
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount, 1));
            }
        }
        Ok(())
    }

    /// Entries sorted by total descending; ties keep first-seen order.
    fn into_sorted(self) -> Vec<(String, Amount, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

fn checked_total(total: Amount, amount: Amount, context: &str) -> Result<Amount> {
    total
        .checked_add(amount)
        .ok_or_else(|| EngineError::AmountOverflow {
            context: context.to_string(),
        })
}

/// Aggregates transactions into totals and per-category / per-description
/// summaries. Uncategorized transactions are grouped under the category the
/// rule engine suggests for them.
///
/// Fails with [`EngineError::AmountOverflow`] when a running total exceeds
/// the range of [`Amount`]; empty input is not an error.
pub fn summarize(transactions: &[Transaction]) -> Result<AnalysisResult> {
    let mut total_spent = Amount::ZERO;
    let mut total_income = Amount::ZERO;
    let mut categories = Grouping::default();
    let mut descriptions = Grouping::default();

    for t in transactions {
        let amount = t.amount();
        if amount.is_positive() {
            total_spent = checked_total(total_spent, amount, "total spent")?;
        } else if amount.is_negative() {
            total_income = checked_total(total_income, amount.abs(), "total income")?;
        }

        categories.add(classify(t), amount)?;
        descriptions.add(&clean_description(t.description()), amount)?;
    }

    let by_category = categories
        .into_sorted()
        .into_iter()
        .map(|(category, total, count)| CategorySummary {
            category,
            total,
            count,
            average: total.average(count),
        })
        .collect();

    let by_description = descriptions
        .into_sorted()
        .into_iter()
        .map(|(description, total, count)| DescriptionSummary {
            description,
            total,
            count,
            average: total.average(count),
        })
        .collect();

    Ok(AnalysisResult {
        total_spent,
        total_income,
        net_balance: total_income - total_spent,
        transaction_count: transactions.len(),
        by_category,
        by_description,
    })
}
