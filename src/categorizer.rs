//! Keyword rules assigning a category to uncategorized transactions.
//!
//! Rules are checked in a fixed order and the first one with a keyword
//! contained in the lowercased description wins. Credit indicators are
//! checked last, after every spending rule, so "Estorno Uber" lands in
//! transport.

use crate::transaction::Transaction;
use log::debug;
use std::fmt;

/// Category labels produced by the rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Transport,
    Food,
    Shopping,
    Subscriptions,
    Taxes,
    Credit,
    Other,
}

impl Category {
    /// Label stored on the transaction.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Transport => "Transporte",
            Category::Food => "Alimentação",
            Category::Shopping => "Compras",
            Category::Subscriptions => "Assinaturas",
            Category::Taxes => "Taxas",
            Category::Credit => "Crédito",
            Category::Other => "Outros",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A keyword set and the category it assigns.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    /// Lowercase substrings.
    pub keywords: &'static [&'static str],
}

impl Rule {
    /// `description` must already be lowercase.
    fn matches(&self, description: &str) -> bool {
        self.keywords.iter().any(|kw| description.contains(kw))
    }
}

/// Evaluation order matters: first match wins.
pub const RULES: &[Rule] = &[
    Rule {
        category: Category::Transport,
        // "dl*" and "pg *" are card processor prefixes used by ride apps
        keywords: &["uber", "99", "taxi", "ride", "dl*", "pg *", "transporte"],
    },
    Rule {
        category: Category::Food,
        keywords: &[
            "ifood",
            "restaurante",
            "padaria",
            "panif",
            "pizza",
            "lanche",
            "acai",
            "açaí",
            "tempero",
            "food",
            "bar",
            "cafe",
            "café",
        ],
    },
    Rule {
        category: Category::Shopping,
        keywords: &["amazon", "mercado", "compra", "loja"],
    },
    Rule {
        category: Category::Subscriptions,
        keywords: &["spotify", "netflix", "prime", "assinatura"],
    },
    Rule {
        category: Category::Taxes,
        keywords: &["iof"],
    },
    Rule {
        category: Category::Credit,
        keywords: &["estorno", "crédito", "credito", "pagamento recebido"],
    },
];

/// Picks a category for a description. Never fails; unmatched text is
/// [`Category::Other`].
pub fn suggest_category(description: &str) -> Category {
    let description = description.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&description))
        .map(|rule| rule.category)
        .unwrap_or(Category::Other)
}

/// Category a transaction belongs to: its own when present, otherwise the
/// suggested one.
pub fn classify(transaction: &Transaction) -> &str {
    if transaction.is_uncategorized() {
        suggest_category(transaction.description()).label()
    } else {
        transaction.category()
    }
}

/// Returns the transaction with its category filled in. Transactions that
/// already carry a category are returned untouched.
pub fn categorize(transaction: Transaction) -> Transaction {
    if !transaction.is_uncategorized() {
        return transaction;
    }

    let category = suggest_category(transaction.description());
    debug!(
        "Auto-categorized '{}' as '{}'",
        transaction.description(),
        category
    );
    transaction.with_category(category.label())
}
