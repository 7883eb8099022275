//! Order repository.
//!
//! Orders are stored as JSONB documents because two record shapes share the
//! collection (flat card orders and charge-keyed crypto orders - see
//! `silkroots_core::order`). The card write path goes through the
//! [`OrderStore`] trait so checkout can be exercised against an in-memory
//! store in tests.

use sqlx::PgPool;
use sqlx::Row as _;

use silkroots_core::{Order, OrderRecord};

use super::RepositoryError;

/// Result of an order insert attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// A row with this `transaction_ref` already exists; nothing was
    /// written. Happens when the gateway replays a success callback.
    AlreadyRecorded,
}

/// Persistence seam used by the checkout orchestrator.
pub trait OrderStore {
    /// Persist a card-path order.
    ///
    /// Must be idempotent on `transaction_ref`: a second insert with the
    /// same reference reports [`InsertOutcome::AlreadyRecorded`] instead of
    /// creating a duplicate.
    fn insert(
        &self,
        order: &Order,
    ) -> impl Future<Output = Result<InsertOutcome, RepositoryError>> + Send;

    /// Fetch the card-path order recorded under a gateway reference.
    ///
    /// Used when an insert reports [`InsertOutcome::AlreadyRecorded`] so the
    /// caller can answer with the id that was actually persisted.
    fn find_by_transaction_ref(
        &self,
        reference: &str,
    ) -> impl Future<Output = Result<Option<Order>, RepositoryError>> + Send;

    /// Fetch all order records for a customer email, newest first.
    fn list_by_email(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<Vec<OrderRecord>, RepositoryError>> + Send;
}

/// `PostgreSQL`-backed order repository.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl OrderStore for OrderRepository {
    async fn insert(&self, order: &Order) -> Result<InsertOutcome, RepositoryError> {
        let record = serde_json::to_value(OrderRecord::Card(order.clone()))?;

        let result = sqlx::query(
            r"
            INSERT INTO orders (id, transaction_ref, customer_email, record, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (transaction_ref) DO NOTHING
            ",
        )
        .bind(order.id)
        .bind(order.transaction_ref.as_str())
        .bind(order.customer.email.as_deref())
        .bind(&record)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                transaction_ref = %order.transaction_ref,
                "duplicate success callback, order already recorded"
            );
            return Ok(InsertOutcome::AlreadyRecorded);
        }
        Ok(InsertOutcome::Inserted)
    }

    async fn find_by_transaction_ref(
        &self,
        reference: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT record
            FROM orders
            WHERE transaction_ref = $1
            ",
        )
        .bind(reference)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record: serde_json::Value = row.try_get("record")?;
        match serde_json::from_value::<OrderRecord>(record)? {
            OrderRecord::Card(order) => Ok(Some(order)),
            OrderRecord::Crypto(_) => Ok(None),
        }
    }

    async fn list_by_email(&self, email: &str) -> Result<Vec<OrderRecord>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT record
            FROM orders
            WHERE customer_email = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let record: serde_json::Value = row.try_get("record")?;
                Ok(serde_json::from_value(record)?)
            })
            .collect()
    }
}
