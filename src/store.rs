//! Persistence seam for imported transactions.
//!
//! The import pipeline only needs to hand over one transaction at a time;
//! where it ends up is up to the implementation.

use crate::transaction::Transaction;
use std::collections::HashMap;
use std::convert::Infallible;

/// Destination for imported transactions.
///
/// `save` is called once per transaction, in statement order. The pipeline
/// does not deduplicate, so calling it twice with the same record stores
/// it twice unless the implementation decides otherwise.
pub trait TransactionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save(&mut self, user_id: &str, transaction: &Transaction) -> Result<(), Self::Error>;
}

impl<S: TransactionStore + ?Sized> TransactionStore for &mut S {
    type Error = S::Error;

    fn save(&mut self, user_id: &str, transaction: &Transaction) -> Result<(), Self::Error> {
        (**self).save(user_id, transaction)
    }
}

/// In-memory store keeping each user's transactions in insertion order.
#[derive(Debug, Default)]
pub struct MemoryStore {
    by_user: HashMap<String, Vec<Transaction>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transactions saved for `user_id`, oldest first.
    pub fn transactions(&self, user_id: &str) -> &[Transaction] {
        self.by_user
            .get(user_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of transactions stored across all users.
    pub fn len(&self) -> usize {
        self.by_user.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TransactionStore for MemoryStore {
    type Error = Infallible;

    fn save(&mut self, user_id: &str, transaction: &Transaction) -> Result<(), Self::Error> {
        self.by_user
            .entry(user_id.to_string())
            .or_default()
            .push(transaction.clone());
        Ok(())
    }
}
