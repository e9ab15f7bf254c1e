//! Gift repository for database operations.

use domain::models::GiftCatalogEntry;
use domain::services::OrderBy;
use sqlx::PgPool;

use super::order_clause;
use crate::entities::GiftEntity;
use crate::metrics::{self, QueryTimer};

/// Outcome of [`GiftRepository::reserve`].
#[derive(Debug, Clone)]
pub enum ReserveResult {
    Applied(GiftEntity),
    /// Already reserved; carries the current row.
    Rejected(GiftEntity),
    NotFound,
}

/// Repository for the gift catalogue of one event.
#[derive(Clone)]
pub struct GiftRepository {
    pool: PgPool,
    event_id: String,
}

impl GiftRepository {
    pub fn new(pool: PgPool, event_id: impl Into<String>) -> Self {
        Self {
            pool,
            event_id: event_id.into(),
        }
    }

    /// Insert or update catalogue entries. Reservation columns are left
    /// untouched for gifts that already exist.
    pub async fn upsert_catalog(&self, entries: &[GiftCatalogEntry]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("upsert_gift_catalog");
        let mut tx = self.pool.begin().await?;
        let mut affected = 0;
        for entry in entries {
            let result = sqlx::query(
                r#"
                INSERT INTO gifts (id, event_id, name, price, emoji)
                VALUES ($1, $2, $3, $4, $5)
                ON CONFLICT (event_id, id) DO UPDATE
                SET name = EXCLUDED.name, price = EXCLUDED.price, emoji = EXCLUDED.emoji
                "#,
            )
            .bind(&entry.id)
            .bind(&self.event_id)
            .bind(&entry.name)
            .bind(&entry.price)
            .bind(&entry.emoji)
            .execute(&mut *tx)
            .await?;
            affected += result.rows_affected();
        }
        let result = tx.commit().await.map(|_| affected);
        timer.finish(&result);
        result
    }

    pub async fn find_by_id(&self, gift_id: &str) -> Result<Option<GiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_gift_by_id");
        let result = sqlx::query_as::<_, GiftEntity>(
            r#"
            SELECT id, event_id, name, price, emoji, reserved, reserved_by, reserved_at, created_at
            FROM gifts
            WHERE event_id = $1 AND id = $2
            "#,
        )
        .bind(&self.event_id)
        .bind(gift_id)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn list(&self, order: Option<OrderBy>) -> Result<Vec<GiftEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_gifts");
        let sql = format!(
            r#"
            SELECT id, event_id, name, price, emoji, reserved, reserved_by, reserved_at, created_at
            FROM gifts
            WHERE event_id = $1
            {}
            "#,
            order_clause(order, "lower(name)")
        );
        let result = sqlx::query_as::<_, GiftEntity>(&sql)
            .bind(&self.event_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    /// Reserve a gift if and only if it is not reserved yet.
    ///
    /// The precondition lives in the UPDATE's WHERE clause, so of two racing
    /// calls exactly one gets a row back.
    pub async fn reserve(
        &self,
        gift_id: &str,
        reserver: &str,
    ) -> Result<ReserveResult, sqlx::Error> {
        let timer = QueryTimer::new("reserve_gift");
        let result = sqlx::query_as::<_, GiftEntity>(
            r#"
            UPDATE gifts
            SET reserved = true, reserved_by = $3, reserved_at = now()
            WHERE event_id = $1 AND id = $2 AND reserved = false
            RETURNING id, event_id, name, price, emoji, reserved, reserved_by, reserved_at, created_at
            "#,
        )
        .bind(&self.event_id)
        .bind(gift_id)
        .bind(reserver)
        .fetch_optional(&self.pool)
        .await;
        timer.finish(&result);

        if let Some(applied) = result? {
            metrics::record_reservation(true);
            return Ok(ReserveResult::Applied(applied));
        }

        match self.find_by_id(gift_id).await? {
            Some(current) => {
                metrics::record_reservation(false);
                Ok(ReserveResult::Rejected(current))
            }
            None => Ok(ReserveResult::NotFound),
        }
    }
}
