//! Persistence gateway port.
//!
//! The gateway is the only way the guest-facing services reach the remote
//! data store and object store. It is an async trait so the HTTP shell can
//! plug in the PostgreSQL implementation while tests run against
//! [`InMemoryGateway`].

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    GiftItem, GuestResponse, GuestbookEntry, MediaRef, MusicWish, NewGuestResponse,
    NewGuestbookEntry, NewMusicWish, NewPhotoContribution, PhotoContribution, ReservationState,
};

/// Identifier assigned by the store on insert.
pub type RecordId = Uuid;

/// The per-event collections the gateway manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    GuestResponses,
    GiftItems,
    PhotoContributions,
    GuestbookEntries,
    MusicWishes,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::GuestResponses => "guest_responses",
            Collection::GiftItems => "gift_items",
            Collection::PhotoContributions => "photo_contributions",
            Collection::GuestbookEntries => "guestbook_entries",
            Collection::MusicWishes => "music_wishes",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which remote backend is missing its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    DataStore,
    ObjectStore,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::DataStore => write!(f, "data store"),
            BackendKind::ObjectStore => write!(f, "object store"),
        }
    }
}

/// Errors returned by gateway operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The backend has no endpoint or credential. The call was not attempted.
    #[error("The {0} is not configured")]
    Unconfigured(BackendKind),

    #[error("Gateway call timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl GatewayError {
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, GatewayError::Unconfigured(_))
    }
}

/// Sort key for [`Gateway::list`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    CreatedAt,
    Name,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBy {
    pub key: OrderKey,
    pub descending: bool,
}

impl OrderBy {
    pub const NEWEST_FIRST: OrderBy = OrderBy {
        key: OrderKey::CreatedAt,
        descending: true,
    };
    pub const OLDEST_FIRST: OrderBy = OrderBy {
        key: OrderKey::CreatedAt,
        descending: false,
    };
    pub const BY_NAME: OrderBy = OrderBy {
        key: OrderKey::Name,
        descending: false,
    };
}

/// A record to append to one of the append-only collections.
///
/// Gift items are not insertable; they come from event configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    GuestResponse(NewGuestResponse),
    PhotoContribution(NewPhotoContribution),
    GuestbookEntry(NewGuestbookEntry),
    MusicWish(NewMusicWish),
}

impl NewRecord {
    pub fn collection(&self) -> Collection {
        match self {
            NewRecord::GuestResponse(_) => Collection::GuestResponses,
            NewRecord::PhotoContribution(_) => Collection::PhotoContributions,
            NewRecord::GuestbookEntry(_) => Collection::GuestbookEntries,
            NewRecord::MusicWish(_) => Collection::MusicWishes,
        }
    }
}

/// A stored record as returned by [`Gateway::list`].
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    GuestResponse(GuestResponse),
    GiftItem(GiftItem),
    PhotoContribution(PhotoContribution),
    GuestbookEntry(GuestbookEntry),
    MusicWish(MusicWish),
}

impl Record {
    pub fn collection(&self) -> Collection {
        match self {
            Record::GuestResponse(_) => Collection::GuestResponses,
            Record::GiftItem(_) => Collection::GiftItems,
            Record::PhotoContribution(_) => Collection::PhotoContributions,
            Record::GuestbookEntry(_) => Collection::GuestbookEntries,
            Record::MusicWish(_) => Collection::MusicWishes,
        }
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Record::GuestResponse(r) => Some(r.created_at),
            Record::GiftItem(_) => None,
            Record::PhotoContribution(r) => Some(r.created_at),
            Record::GuestbookEntry(r) => Some(r.created_at),
            Record::MusicWish(r) => Some(r.created_at),
        }
    }

    fn sort_name(&self) -> &str {
        match self {
            Record::GuestResponse(r) => &r.name,
            Record::GiftItem(r) => &r.name,
            Record::PhotoContribution(r) => &r.contributor,
            Record::GuestbookEntry(r) => &r.name,
            Record::MusicWish(r) => &r.name,
        }
    }
}

/// Typed view over a [`Record`] variant.
pub trait FromRecord: Sized {
    const COLLECTION: Collection;

    fn from_record(record: Record) -> Option<Self>;
}

macro_rules! impl_from_record {
    ($ty:ty, $variant:ident, $collection:ident) => {
        impl FromRecord for $ty {
            const COLLECTION: Collection = Collection::$collection;

            fn from_record(record: Record) -> Option<Self> {
                match record {
                    Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

impl_from_record!(GuestResponse, GuestResponse, GuestResponses);
impl_from_record!(GiftItem, GiftItem, GiftItems);
impl_from_record!(PhotoContribution, PhotoContribution, PhotoContributions);
impl_from_record!(GuestbookEntry, GuestbookEntry, GuestbookEntries);
impl_from_record!(MusicWish, MusicWish, MusicWishes);

/// Lists a collection and unwraps each record into its typed form.
pub async fn list_as<T: FromRecord>(
    gateway: &dyn Gateway,
    order: Option<OrderBy>,
) -> Result<Vec<T>, GatewayError> {
    gateway
        .list(T::COLLECTION, order)
        .await?
        .into_iter()
        .map(|record| {
            let found = record.collection();
            T::from_record(record).ok_or_else(|| {
                GatewayError::Backend(format!(
                    "Listing {} returned a {} record",
                    T::COLLECTION,
                    found
                ))
            })
        })
        .collect()
}

/// Result of the conditional gift write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The gift was available and is now reserved by the caller.
    Applied(GiftItem),
    /// The gift was already reserved; carries the current state.
    Rejected(GiftItem),
}

/// Asynchronous access to the per-event data store and object store.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// Append a record to the collection it belongs to.
    async fn insert(&self, record: NewRecord) -> Result<RecordId, GatewayError>;

    /// List a collection. `None` leaves the store's natural order.
    async fn list(
        &self,
        collection: Collection,
        order: Option<OrderBy>,
    ) -> Result<Vec<Record>, GatewayError>;

    /// Reserve a gift only if it is currently available.
    ///
    /// The check and the write must be a single atomic step at the store.
    async fn reserve_gift(
        &self,
        gift_id: &str,
        reserver: &str,
    ) -> Result<ReserveOutcome, GatewayError>;

    /// Upload media bytes and return a stable public reference.
    async fn upload_media(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<MediaRef, GatewayError>;
}

/// Sorts records in place. Records without a timestamp sort first.
pub fn sort_records(records: &mut [Record], order: OrderBy) {
    match order.key {
        OrderKey::CreatedAt => records.sort_by_key(|r| r.created_at()),
        OrderKey::Name => records.sort_by(|a, b| {
            a.sort_name()
                .to_lowercase()
                .cmp(&b.sort_name().to_lowercase())
        }),
    }
    if order.descending {
        records.reverse();
    }
}

/// Gateway used when no backend is configured. Every call fails fast.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

#[async_trait::async_trait]
impl Gateway for UnconfiguredGateway {
    async fn insert(&self, record: NewRecord) -> Result<RecordId, GatewayError> {
        tracing::warn!(
            collection = %record.collection(),
            "Insert skipped, data store not configured"
        );
        Err(GatewayError::Unconfigured(BackendKind::DataStore))
    }

    async fn list(
        &self,
        _collection: Collection,
        _order: Option<OrderBy>,
    ) -> Result<Vec<Record>, GatewayError> {
        Err(GatewayError::Unconfigured(BackendKind::DataStore))
    }

    async fn reserve_gift(
        &self,
        _gift_id: &str,
        _reserver: &str,
    ) -> Result<ReserveOutcome, GatewayError> {
        Err(GatewayError::Unconfigured(BackendKind::DataStore))
    }

    async fn upload_media(
        &self,
        _bytes: &[u8],
        _content_type: &str,
    ) -> Result<MediaRef, GatewayError> {
        Err(GatewayError::Unconfigured(BackendKind::ObjectStore))
    }
}

/// Wraps another gateway and bounds every call with a timeout.
///
/// A call that times out may still complete at the store; the caller only
/// learns that the outcome is unknown.
#[derive(Clone)]
pub struct TimedGateway {
    inner: Arc<dyn Gateway>,
    timeout: Duration,
}

impl TimedGateway {
    pub fn new(inner: Arc<dyn Gateway>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, GatewayError>
    where
        F: std::future::Future<Output = Result<T, GatewayError>> + Send,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation = operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Gateway call timed out"
                );
                Err(GatewayError::Timeout(self.timeout))
            }
        }
    }
}

#[async_trait::async_trait]
impl Gateway for TimedGateway {
    async fn insert(&self, record: NewRecord) -> Result<RecordId, GatewayError> {
        self.bounded("insert", self.inner.insert(record)).await
    }

    async fn list(
        &self,
        collection: Collection,
        order: Option<OrderBy>,
    ) -> Result<Vec<Record>, GatewayError> {
        self.bounded("list", self.inner.list(collection, order)).await
    }

    async fn reserve_gift(
        &self,
        gift_id: &str,
        reserver: &str,
    ) -> Result<ReserveOutcome, GatewayError> {
        self.bounded("reserve_gift", self.inner.reserve_gift(gift_id, reserver))
            .await
    }

    async fn upload_media(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<MediaRef, GatewayError> {
        self.bounded("upload_media", self.inner.upload_media(bytes, content_type))
            .await
    }
}

type UploadFailure = Box<dyn Fn(&[u8]) -> bool + Send + Sync>;

#[derive(Default)]
struct MemoryState {
    guest_responses: Vec<GuestResponse>,
    gifts: Vec<GiftItem>,
    photos: Vec<PhotoContribution>,
    guestbook: Vec<GuestbookEntry>,
    music_wishes: Vec<MusicWish>,
    media: HashMap<String, String>,
}

/// In-process gateway for development and tests.
///
/// Keeps every collection in memory. Latency and failures can be injected.
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<MemoryState>,
    latency: Option<Duration>,
    fail_inserts: AtomicBool,
    upload_failure: Mutex<Option<UploadFailure>>,
    insert_calls: AtomicUsize,
    upload_calls: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the gift catalogue.
    pub fn with_gifts(self, gifts: impl IntoIterator<Item = GiftItem>) -> Self {
        self.lock_state().gifts.extend(gifts);
        self
    }

    /// Delay every call by `latency` before touching the state.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Make every insert fail with a backend error until switched off.
    pub fn set_fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    /// Fail uploads whose bytes match `predicate`.
    pub fn set_upload_failure<F>(&self, predicate: F)
    where
        F: Fn(&[u8]) -> bool + Send + Sync + 'static,
    {
        *self.lock_upload_failure() = Some(Box::new(predicate));
    }

    pub fn clear_upload_failure(&self) {
        *self.lock_upload_failure() = None;
    }

    pub fn insert_calls(&self) -> usize {
        self.insert_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn guest_responses(&self) -> Vec<GuestResponse> {
        self.lock_state().guest_responses.clone()
    }

    pub fn photo_contributions(&self) -> Vec<PhotoContribution> {
        self.lock_state().photos.clone()
    }

    pub fn gift(&self, gift_id: &str) -> Option<GiftItem> {
        self.lock_state()
            .gifts
            .iter()
            .find(|g| g.id == gift_id)
            .cloned()
    }

    pub fn stored_media(&self) -> usize {
        self.lock_state().media.len()
    }

    // A panic while holding the lock cannot leave a half-applied write,
    // so a poisoned lock is still safe to use.
    fn lock_state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_upload_failure(&self) -> MutexGuard<'_, Option<UploadFailure>> {
        self.upload_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait::async_trait]
impl Gateway for InMemoryGateway {
    async fn insert(&self, record: NewRecord) -> Result<RecordId, GatewayError> {
        self.simulate_latency().await;
        self.insert_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_inserts.load(Ordering::SeqCst) {
            tracing::warn!(
                collection = %record.collection(),
                "In-memory gateway simulating insert failure"
            );
            return Err(GatewayError::Backend("Simulated insert failure".to_string()));
        }

        let id = Uuid::new_v4();
        let mut state = self.lock_state();
        match record {
            NewRecord::GuestResponse(new) => {
                state.guest_responses.push(GuestResponse::from_new(id, new))
            }
            NewRecord::PhotoContribution(new) => {
                state.photos.push(PhotoContribution::from_new(id, new))
            }
            NewRecord::GuestbookEntry(new) => {
                state.guestbook.push(GuestbookEntry::from_new(id, new))
            }
            NewRecord::MusicWish(new) => state.music_wishes.push(MusicWish::from_new(id, new)),
        }
        Ok(id)
    }

    async fn list(
        &self,
        collection: Collection,
        order: Option<OrderBy>,
    ) -> Result<Vec<Record>, GatewayError> {
        self.simulate_latency().await;

        let mut records: Vec<Record> = {
            let state = self.lock_state();
            match collection {
                Collection::GuestResponses => state
                    .guest_responses
                    .iter()
                    .cloned()
                    .map(Record::GuestResponse)
                    .collect(),
                Collection::GiftItems => {
                    state.gifts.iter().cloned().map(Record::GiftItem).collect()
                }
                Collection::PhotoContributions => state
                    .photos
                    .iter()
                    .cloned()
                    .map(Record::PhotoContribution)
                    .collect(),
                Collection::GuestbookEntries => state
                    .guestbook
                    .iter()
                    .cloned()
                    .map(Record::GuestbookEntry)
                    .collect(),
                Collection::MusicWishes => state
                    .music_wishes
                    .iter()
                    .cloned()
                    .map(Record::MusicWish)
                    .collect(),
            }
        };

        if let Some(order) = order {
            sort_records(&mut records, order);
        }
        Ok(records)
    }

    async fn reserve_gift(
        &self,
        gift_id: &str,
        reserver: &str,
    ) -> Result<ReserveOutcome, GatewayError> {
        self.simulate_latency().await;

        // Check and set under one lock acquisition.
        let mut state = self.lock_state();
        let gift = state
            .gifts
            .iter_mut()
            .find(|g| g.id == gift_id)
            .ok_or_else(|| GatewayError::NotFound(format!("Gift {}", gift_id)))?;

        if gift.is_reserved() {
            return Ok(ReserveOutcome::Rejected(gift.clone()));
        }

        gift.reservation = ReservationState::Reserved {
            reserved_by: reserver.to_string(),
            reserved_at: Some(Utc::now()),
        };
        Ok(ReserveOutcome::Applied(gift.clone()))
    }

    async fn upload_media(
        &self,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<MediaRef, GatewayError> {
        self.simulate_latency().await;
        self.upload_calls.fetch_add(1, Ordering::SeqCst);

        let fail = self
            .lock_upload_failure()
            .as_ref()
            .map(|predicate| predicate(bytes))
            .unwrap_or(false);
        if fail {
            return Err(GatewayError::Backend("Simulated upload failure".to_string()));
        }

        let key = format!("memory://media/{}", Uuid::new_v4());
        self.lock_state()
            .media
            .insert(key.clone(), content_type.to_string());
        Ok(MediaRef(key))
    }
}
