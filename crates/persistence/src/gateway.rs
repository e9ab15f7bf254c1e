//! PostgreSQL-backed implementation of the domain gateway.

use domain::models::{GiftItem, GuestResponse, MediaRef};
use domain::services::{
    BackendKind, Collection, Gateway, GatewayError, NewRecord, OrderBy, Record, RecordId,
    ReserveOutcome,
};
use sqlx::PgPool;

use crate::media::MediaStoreClient;
use crate::repositories::{
    GiftRepository, GuestMessageRepository, GuestResponseRepository, PhotoRepository,
    ReserveResult,
};

/// Maps database errors onto gateway errors.
pub fn map_db_error(err: sqlx::Error) -> GatewayError {
    match err {
        sqlx::Error::RowNotFound => GatewayError::NotFound("Row not found".to_string()),
        sqlx::Error::PoolTimedOut => {
            GatewayError::Backend("Timed out waiting for a database connection".to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            GatewayError::Backend(format!("Database error: {}", other))
        }
    }
}

/// Gateway over the per-event tables and the object store.
#[derive(Clone)]
pub struct PostgresGateway {
    event_id: String,
    responses: GuestResponseRepository,
    gifts: GiftRepository,
    photos: PhotoRepository,
    messages: GuestMessageRepository,
    media: Option<MediaStoreClient>,
}

impl PostgresGateway {
    /// `media` is `None` when no object store is configured; uploads then
    /// fail with [`GatewayError::Unconfigured`].
    pub fn new(pool: PgPool, event_id: impl Into<String>, media: Option<MediaStoreClient>) -> Self {
        let event_id = event_id.into();
        Self {
            responses: GuestResponseRepository::new(pool.clone(), event_id.clone()),
            gifts: GiftRepository::new(pool.clone(), event_id.clone()),
            photos: PhotoRepository::new(pool.clone(), event_id.clone()),
            messages: GuestMessageRepository::new(pool, event_id.clone()),
            event_id,
            media,
        }
    }

    pub fn event_id(&self) -> &str {
        &self.event_id
    }

    pub fn gifts(&self) -> &GiftRepository {
        &self.gifts
    }
}

#[async_trait::async_trait]
impl Gateway for PostgresGateway {
    async fn insert(&self, record: NewRecord) -> Result<RecordId, GatewayError> {
        let result = match &record {
            NewRecord::GuestResponse(new) => self.responses.insert(new).await,
            NewRecord::PhotoContribution(new) => self.photos.insert(new).await,
            NewRecord::GuestbookEntry(new) => self.messages.insert_guestbook_entry(new).await,
            NewRecord::MusicWish(new) => self.messages.insert_music_wish(new).await,
        };
        result.map_err(map_db_error)
    }

    async fn list(
        &self,
        collection: Collection,
        order: Option<OrderBy>,
    ) -> Result<Vec<Record>, GatewayError> {
        let records = match collection {
            Collection::GuestResponses => self
                .responses
                .list(order)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|e| Record::GuestResponse(GuestResponse::from(e)))
                .collect(),
            Collection::GiftItems => self
                .gifts
                .list(order)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|e| Record::GiftItem(GiftItem::from(e)))
                .collect(),
            Collection::PhotoContributions => self
                .photos
                .list(order)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|e| Record::PhotoContribution(e.into()))
                .collect(),
            Collection::GuestbookEntries => self
                .messages
                .list_guestbook(order)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|e| Record::GuestbookEntry(e.into()))
                .collect(),
            Collection::MusicWishes => self
                .messages
                .list_music_wishes(order)
                .await
                .map_err(map_db_error)?
                .into_iter()
                .map(|e| Record::MusicWish(e.into()))
                .collect(),
        };
        Ok(records)
    }

    async fn reserve_gift(
        &self,
        gift_id: &str,
        reserver: &str,
    ) -> Result<ReserveOutcome, GatewayError> {
        match self.gifts.reserve(gift_id, reserver).await.map_err(map_db_error)? {
            ReserveResult::Applied(entity) => Ok(ReserveOutcome::Applied(entity.into())),
            ReserveResult::Rejected(entity) => Ok(ReserveOutcome::Rejected(entity.into())),
            ReserveResult::NotFound => Err(GatewayError::NotFound(format!("Gift {}", gift_id))),
        }
    }

    async fn upload_media(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<MediaRef, GatewayError> {
        match &self.media {
            Some(client) => client.upload(bytes, content_type).await,
            None => Err(GatewayError::Unconfigured(BackendKind::ObjectStore)),
        }
    }
}
