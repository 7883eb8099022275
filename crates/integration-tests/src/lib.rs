//! Integration tests for Silkroots.
//!
//! These run in-process against the checkout orchestrator and the order
//! aggregation types; no live server or database is required. The
//! [`MemoryOrderStore`] stands in for the Postgres repository behind the
//! same `OrderStore` seam the storefront binary wires up.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::{Mutex, PoisonError};

use silkroots_core::{Order, OrderRecord};
use silkroots_storefront::db::{InsertOutcome, OrderStore, RepositoryError};

/// In-memory order store with the Postgres repository's contract:
/// idempotent on `transaction_ref`, records readable back by email.
#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    records: Mutex<Vec<OrderRecord>>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a raw record, the way the crypto charge path writes one.
    pub fn seed(&self, record: OrderRecord) {
        self.lock().push(record);
    }

    /// Number of stored records across all customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True when nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<OrderRecord>> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl OrderStore for MemoryOrderStore {
    async fn insert(&self, order: &Order) -> Result<InsertOutcome, RepositoryError> {
        let mut records = self.lock();

        let duplicate = records.iter().any(|record| {
            matches!(
                record,
                OrderRecord::Card(existing)
                    if existing.transaction_ref.as_str() == order.transaction_ref.as_str()
            )
        });
        if duplicate {
            return Ok(InsertOutcome::AlreadyRecorded);
        }

        // Round-trip through JSON so the stored value went through the same
        // shape detection a JSONB read does.
        let value = serde_json::to_value(OrderRecord::Card(order.clone()))?;
        records.push(serde_json::from_value(value)?);
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_transaction_ref(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let records = self.lock();
        Ok(records.iter().find_map(|record| match record {
            OrderRecord::Card(order) if order.transaction_ref.as_str() == reference => {
                Some(order.clone())
            }
            _ => None,
        }))
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<OrderRecord>, RepositoryError> {
        let records = self.lock();
        Ok(records
            .iter()
            .filter(|record| record_email(record) == Some(email))
            .rev()
            .cloned()
            .collect())
    }
}

/// The customer email of either record shape, when present.
fn record_email(record: &OrderRecord) -> Option<&str> {
    match record {
        OrderRecord::Card(order) => order.customer.email.as_deref(),
        OrderRecord::Crypto(charge) => charge.metadata.customer.email.as_deref(),
    }
}
