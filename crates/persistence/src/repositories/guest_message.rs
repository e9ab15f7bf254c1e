//! Guestbook and music wish repository.

use domain::models::{NewGuestbookEntry, NewMusicWish};
use domain::services::OrderBy;
use sqlx::PgPool;
use uuid::Uuid;

use super::order_clause;
use crate::entities::{GuestbookEntryEntity, MusicWishEntity};
use crate::metrics::QueryTimer;

/// Repository for guest messages of one event.
#[derive(Clone)]
pub struct GuestMessageRepository {
    pool: PgPool,
    event_id: String,
}

impl GuestMessageRepository {
    pub fn new(pool: PgPool, event_id: impl Into<String>) -> Self {
        Self {
            pool,
            event_id: event_id.into(),
        }
    }

    pub async fn insert_guestbook_entry(
        &self,
        entry: &NewGuestbookEntry,
    ) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("insert_guestbook_entry");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO guestbook_entries (event_id, name, email, message, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&self.event_id)
        .bind(&entry.name)
        .bind(&entry.email)
        .bind(&entry.message)
        .bind(entry.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn list_guestbook(
        &self,
        order: Option<OrderBy>,
    ) -> Result<Vec<GuestbookEntryEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guestbook_entries");
        let sql = format!(
            r#"
            SELECT id, event_id, name, email, message, created_at
            FROM guestbook_entries
            WHERE event_id = $1
            {}
            "#,
            order_clause(order, "lower(name)")
        );
        let result = sqlx::query_as::<_, GuestbookEntryEntity>(&sql)
            .bind(&self.event_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }

    pub async fn insert_music_wish(&self, wish: &NewMusicWish) -> Result<Uuid, sqlx::Error> {
        let timer = QueryTimer::new("insert_music_wish");
        let result = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO music_wishes (event_id, name, song, artist, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&self.event_id)
        .bind(&wish.name)
        .bind(&wish.song)
        .bind(&wish.artist)
        .bind(&wish.message)
        .bind(wish.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.finish(&result);
        result
    }

    pub async fn list_music_wishes(
        &self,
        order: Option<OrderBy>,
    ) -> Result<Vec<MusicWishEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_music_wishes");
        let sql = format!(
            r#"
            SELECT id, event_id, name, song, artist, message, created_at
            FROM music_wishes
            WHERE event_id = $1
            {}
            "#,
            order_clause(order, "lower(name)")
        );
        let result = sqlx::query_as::<_, MusicWishEntity>(&sql)
            .bind(&self.event_id)
            .fetch_all(&self.pool)
            .await;
        timer.finish(&result);
        result
    }
}
