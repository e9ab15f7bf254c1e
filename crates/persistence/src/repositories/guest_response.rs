//! Guest response repository for database operations.

use domain::models::NewGuestResponse;
use domain::services::OrderBy;
use sqlx::PgPool;
use uuid::Uuid;

use super::order_clause;
use crate::entities::GuestResponseEntity;
use crate::metrics::QueryTimer;

/// Repository for guest responses of one event. Append-only.
#[derive(Clone)]
pub struct GuestResponseRepository {
    pool: PgPool,
    event_id: String,
}

impl GuestResponseRepository {
    pub fn new(pool: PgPool, event_id: impl Into<String>) -> Self {
        Self {
            pool,
            event_id: event_id.into(),
        }
    }

    /// Insert a new response and return its id.
    pub async fn insert(&self, response: &NewGuestResponse) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("insert_guest_response");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO guest_responses
                (event_id, name, email, status, party_size, menu, dietary, song, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id
            "#,
        )
        .bind(&self.event_id)
        .bind(&response.name)
        .bind(&response.email)
        .bind(response.status.as_str())
        .bind(response.party_size as i32)
        .bind(&response.menu)
        .bind(&response.dietary)
        .bind(&response.song)
        .bind(&response.message)
        .bind(response.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    /// List all responses of the event.
    pub async fn list(
        &self,
        order: Option<OrderBy>,
    ) -> Result<Vec<GuestResponseEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guest_responses");
        let sql = format!(
            r#"
            SELECT id, event_id, name, email, status, party_size, menu, dietary, song, message, created_at
            FROM guest_responses
            WHERE event_id = $1
            {}
            "#,
            order_clause(order, "lower(name)")
        );
        let result = sqlx::query_as::<_, GuestResponseEntity>(&sql)
            .bind(&self.event_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }
}
