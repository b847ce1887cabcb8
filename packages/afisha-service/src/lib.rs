pub mod admin;
pub mod catalog;
pub mod export;
pub mod import;
pub mod pg;
pub mod search;
pub mod time_serde;

mod error;

pub use admin::{CreateSlotRequest, Slot, SlotListResponse};
pub use catalog::{BlockRequest, BlockResponse};
pub use error::{Error, Result};
pub use import::{ImportFailure, ImportReport};
pub use search::{SearchRequest, SearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

use afisha_config::Config;
use afisha_domain::{
	catalog::{BlockType, CatalogItem, ContentType},
	export::{EventExportRow, VenueExportRow},
	import::RecordKind,
	search::{EventHit, PlaceHit, PostHit, SearchFilters},
};
use afisha_storage::{
	db::Db,
	models::{NewEvent, NewTicketTier, NewVenue},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// City as the catalog addresses it.
#[derive(Clone, Debug, PartialEq)]
pub struct CityRef {
	pub city_id: Uuid,
	pub slug: String,
	pub name: String,
}

/// Reads for the aggregator and writes for sponsored slot administration.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	/// Finds a city by slug or, failing that, by name.
	fn find_city<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CityRef>>>;

	/// Live slots for a block, in display order, at most `limit`.
	///
	/// The aggregator re-checks each slot's window against the same `now`, so an
	/// implementation that returns inactive or expired slots only wastes a lookup.
	fn active_slots<'a>(
		&'a self,
		block_type: BlockType,
		city_slug: &'a str,
		now: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<Slot>>>;

	/// The referenced record, or `None` when it no longer exists.
	fn resolve<'a>(
		&'a self,
		content_type: ContentType,
		content_id: Uuid,
	) -> BoxFuture<'a, Result<Option<CatalogItem>>>;

	/// Organically ranked candidates for a block.
	fn organic<'a>(
		&'a self,
		block_type: BlockType,
		city: &'a CityRef,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<CatalogItem>>>;

	fn insert_slot<'a>(&'a self, slot: &'a Slot) -> BoxFuture<'a, Result<()>>;

	fn list_slots<'a>(&'a self, city_slug: &'a str) -> BoxFuture<'a, Result<Vec<Slot>>>;

	fn deactivate_slot<'a>(&'a self, slot_id: Uuid) -> BoxFuture<'a, Result<Option<Slot>>>;
}

/// Per-kind search reads. Each call returns at most `limit` hits.
pub trait SearchStore
where
	Self: Send + Sync,
{
	fn events<'a>(
		&'a self,
		filters: &'a SearchFilters,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<EventHit>>>;

	fn places<'a>(
		&'a self,
		filters: &'a SearchFilters,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PlaceHit>>>;

	fn posts<'a>(
		&'a self,
		filters: &'a SearchFilters,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PostHit>>>;
}

/// Loader reads and writes for events and venues.
pub trait RecordStore
where
	Self: Send + Sync,
{
	fn find_city<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CityRef>>>;

	fn find_venue<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Uuid>>>;

	fn find_category<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Uuid>>>;

	fn slug_exists<'a>(&'a self, kind: RecordKind, slug: &'a str) -> BoxFuture<'a, Result<bool>>;

	fn insert_event<'a>(
		&'a self,
		event: &'a NewEvent,
		tiers: &'a [NewTicketTier],
	) -> BoxFuture<'a, Result<()>>;

	fn insert_venue<'a>(&'a self, venue: &'a NewVenue) -> BoxFuture<'a, Result<()>>;

	fn export_events(&self) -> BoxFuture<'_, Result<Vec<EventExportRow>>>;

	fn export_venues(&self) -> BoxFuture<'_, Result<Vec<VenueExportRow>>>;
}

#[derive(Clone)]
pub struct Stores {
	pub catalog: Arc<dyn CatalogStore>,
	pub search: Arc<dyn SearchStore>,
	pub records: Arc<dyn RecordStore>,
}
impl Stores {
	pub fn new(
		catalog: Arc<dyn CatalogStore>,
		search: Arc<dyn SearchStore>,
		records: Arc<dyn RecordStore>,
	) -> Self {
		Self { catalog, search, records }
	}

	pub fn postgres(db: Arc<Db>) -> Self {
		let store = Arc::new(pg::PgStore::new(db));

		Self { catalog: store.clone(), search: store.clone(), records: store }
	}
}

pub struct AfishaService {
	pub cfg: Config,
	pub stores: Stores,
}
impl AfishaService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, stores: Stores::postgres(Arc::new(db)) }
	}

	pub fn with_stores(cfg: Config, stores: Stores) -> Self {
		Self { cfg, stores }
	}
}
