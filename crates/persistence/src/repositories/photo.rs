//! Photo contribution repository for database operations.

use domain::models::NewPhotoContribution;
use domain::services::OrderBy;
use sqlx::PgPool;
use uuid::Uuid;

use super::order_clause;
use crate::entities::PhotoContributionEntity;
use crate::metrics::QueryTimer;

/// Repository for committed photo contributions of one event.
#[derive(Clone)]
pub struct PhotoRepository {
    pool: PgPool,
    event_id: String,
}

impl PhotoRepository {
    pub fn new(pool: PgPool, event_id: impl Into<String>) -> Self {
        Self {
            pool,
            event_id: event_id.into(),
        }
    }

    pub async fn insert(&self, photo: &NewPhotoContribution) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("insert_photo_contribution");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO photo_contributions (event_id, media_ref, contributor, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&self.event_id)
        .bind(photo.media_ref.as_str())
        .bind(&photo.contributor)
        .bind(photo.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn list(
        &self,
        order: Option<OrderBy>,
    ) -> Result<Vec<PhotoContributionEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_photo_contributions");
        let sql = format!(
            r#"
            SELECT id, event_id, media_ref, contributor, created_at
            FROM photo_contributions
            WHERE event_id = $1
            {}
            "#,
            order_clause(order, "lower(contributor)")
        );
        let result = sqlx::query_as::<_, PhotoContributionEntity>(&sql)
            .bind(&self.event_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }
}
