//! Postgres implementations of the store traits.

use std::sync::Arc;

use serde_json::Value;
use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use afisha_domain::{
	catalog::{BlockType, CatalogItem, ContentType, SourceKind},
	export::{EventExportRow, VenueExportRow},
	import::RecordKind,
	search::{EventHit, PlaceHit, PostHit, SearchFilters},
};
use afisha_storage::{
	db::Db,
	models::{CatalogRow, City, NewEvent, NewTicketTier, NewVenue, SponsoredSlot},
	queries,
};

use crate::{BoxFuture, CatalogStore, CityRef, RecordStore, Result, SearchStore, Slot};

pub struct PgStore {
	db: Arc<Db>,
}
impl PgStore {
	pub fn new(db: Arc<Db>) -> Self {
		Self { db }
	}
}

impl CatalogStore for PgStore {
	fn find_city<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CityRef>>> {
		Box::pin(async move { Ok(queries::find_city(&self.db, key).await?.map(city_ref)) })
	}

	fn active_slots<'a>(
		&'a self,
		block_type: BlockType,
		city_slug: &'a str,
		now: OffsetDateTime,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<Slot>>> {
		Box::pin(async move {
			let rows = queries::active_slots(
				&self.db,
				block_type.as_str(),
				city_slug,
				now,
				i64::from(limit),
			)
			.await?;

			Ok(rows.into_iter().filter_map(slot_from_row).collect())
		})
	}

	fn resolve<'a>(
		&'a self,
		content_type: ContentType,
		content_id: Uuid,
	) -> BoxFuture<'a, Result<Option<CatalogItem>>> {
		Box::pin(async move {
			let row = match content_type {
				ContentType::Event => queries::event_item(&self.db, content_id).await?,
				ContentType::Venue => queries::venue_item(&self.db, content_id).await?,
				ContentType::Service => queries::service_item(&self.db, content_id).await?,
				ContentType::Category => queries::category_item(&self.db, content_id).await?,
			};

			Ok(row.map(|row| catalog_item(row, content_type.source_kind())))
		})
	}

	fn organic<'a>(
		&'a self,
		block_type: BlockType,
		city: &'a CityRef,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<CatalogItem>>> {
		Box::pin(async move {
			let limit = i64::from(limit);
			let db = &self.db;
			let rows = match block_type {
				BlockType::PopularEvents => queries::popular_events(db, city.city_id, limit).await?,
				BlockType::PopularVenues => queries::recent_venues(db, city.city_id, limit).await?,
				BlockType::Services => queries::recent_services(db, city.city_id, limit).await?,
				BlockType::Categories => queries::ranked_categories(db, limit).await?,
				BlockType::Collections =>
					queries::ranked_collections(db, city.city_id, limit).await?,
				BlockType::BlogPosts => queries::recent_posts(db, limit).await?,
			};
			let kind = block_type.organic_kind();

			Ok(rows.into_iter().map(|row| catalog_item(row, kind)).collect())
		})
	}

	fn insert_slot<'a>(&'a self, slot: &'a Slot) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let row = SponsoredSlot {
				slot_id: slot.slot_id,
				block_type: slot.block_type.as_str().to_string(),
				city_slug: slot.city_slug.clone(),
				content_type: slot.content_type.as_str().to_string(),
				content_id: slot.content_id,
				sort_order: slot.sort_order,
				is_active: slot.is_active,
				starts_at: slot.starts_at,
				ends_at: slot.ends_at,
				created_at: slot.created_at,
			};

			queries::insert_slot(&self.db, &row).await?;

			Ok(())
		})
	}

	fn list_slots<'a>(&'a self, city_slug: &'a str) -> BoxFuture<'a, Result<Vec<Slot>>> {
		Box::pin(async move {
			let rows = queries::list_slots(&self.db, city_slug).await?;

			Ok(rows.into_iter().filter_map(slot_from_row).collect())
		})
	}

	fn deactivate_slot<'a>(&'a self, slot_id: Uuid) -> BoxFuture<'a, Result<Option<Slot>>> {
		Box::pin(async move {
			Ok(queries::deactivate_slot(&self.db, slot_id).await?.and_then(slot_from_row))
		})
	}
}

impl SearchStore for PgStore {
	fn events<'a>(
		&'a self,
		filters: &'a SearchFilters,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<EventHit>>> {
		Box::pin(async move {
			let pattern = filters.like_pattern();
			let categories = filters.subcategory_list();
			let rows = queries::search_events(
				&self.db,
				pattern.as_deref(),
				filters.city.as_deref(),
				&categories,
				i64::from(limit),
			)
			.await?;

			Ok(rows
				.into_iter()
				.map(|row| EventHit {
					id: row.event_id,
					slug: row.slug,
					title: row.title,
					image_url: row.image_url,
					venue_name: row.venue_name,
					city_slug: row.city_slug,
					starts_at: row.starts_at,
					is_actual: row.is_actual,
				})
				.collect())
		})
	}

	fn places<'a>(
		&'a self,
		filters: &'a SearchFilters,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PlaceHit>>> {
		Box::pin(async move {
			let pattern = filters.like_pattern();
			let categories = filters.subcategory_list();
			let rows = queries::search_venues(
				&self.db,
				pattern.as_deref(),
				filters.city.as_deref(),
				&categories,
				i64::from(limit),
			)
			.await?;

			Ok(rows
				.into_iter()
				.map(|row| PlaceHit {
					id: row.venue_id,
					slug: row.slug,
					name: row.name,
					image_url: row.image_url,
					address: row.address,
					city_slug: row.city_slug,
				})
				.collect())
		})
	}

	fn posts<'a>(
		&'a self,
		filters: &'a SearchFilters,
		limit: u32,
	) -> BoxFuture<'a, Result<Vec<PostHit>>> {
		Box::pin(async move {
			let pattern = filters.like_pattern();
			let rows = queries::search_posts(&self.db, pattern.as_deref(), i64::from(limit)).await?;

			Ok(rows
				.into_iter()
				.map(|row| PostHit {
					id: row.post_id,
					slug: row.slug,
					title: row.title,
					image_url: row.image_url,
					published_at: row.published_at,
				})
				.collect())
		})
	}
}

impl RecordStore for PgStore {
	fn find_city<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CityRef>>> {
		Box::pin(async move { Ok(queries::find_city(&self.db, key).await?.map(city_ref)) })
	}

	fn find_venue<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Uuid>>> {
		Box::pin(async move { Ok(queries::find_venue_id(&self.db, key).await?) })
	}

	fn find_category<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<Uuid>>> {
		Box::pin(async move { Ok(queries::find_category_id(&self.db, key).await?) })
	}

	fn slug_exists<'a>(&'a self, kind: RecordKind, slug: &'a str) -> BoxFuture<'a, Result<bool>> {
		Box::pin(async move {
			let exists = match kind {
				RecordKind::Event => queries::event_slug_exists(&self.db, slug).await?,
				RecordKind::Venue => queries::venue_slug_exists(&self.db, slug).await?,
			};

			Ok(exists)
		})
	}

	fn insert_event<'a>(
		&'a self,
		event: &'a NewEvent,
		tiers: &'a [NewTicketTier],
	) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::insert_event(&self.db, event, tiers).await?) })
	}

	fn insert_venue<'a>(&'a self, venue: &'a NewVenue) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(queries::insert_venue(&self.db, venue).await?) })
	}

	fn export_events(&self) -> BoxFuture<'_, Result<Vec<EventExportRow>>> {
		Box::pin(async move {
			let rows = queries::export_events(&self.db).await?;

			Ok(rows
				.into_iter()
				.map(|row| EventExportRow {
					slug: row.slug,
					title: row.title,
					description: row.description,
					image_url: row.image_url,
					city: row.city_name,
					venue: row.venue_name,
					category: row.category_name,
					starts_at: row.starts_at,
					ends_at: row.ends_at,
					price_from: row.price_from,
					is_popular: row.is_popular,
					is_actual: row.is_actual,
					view_count: row.view_count,
					tags: tag_list(&row.tags),
				})
				.collect())
		})
	}

	fn export_venues(&self) -> BoxFuture<'_, Result<Vec<VenueExportRow>>> {
		Box::pin(async move {
			let rows = queries::export_venues(&self.db).await?;

			Ok(rows
				.into_iter()
				.map(|row| VenueExportRow {
					slug: row.slug,
					name: row.name,
					description: row.description,
					image_url: row.image_url,
					city: row.city_name,
					category: row.category_name,
					address: row.address,
					latitude: row.latitude,
					longitude: row.longitude,
					phone: row.phone,
					website: row.website,
					tags: tag_list(&row.tags),
				})
				.collect())
		})
	}
}

fn city_ref(city: City) -> CityRef {
	CityRef { city_id: city.city_id, slug: city.slug, name: city.name }
}

fn catalog_item(row: CatalogRow, source_kind: SourceKind) -> CatalogItem {
	CatalogItem {
		id: row.id,
		slug: row.slug,
		title: row.title,
		description: row.description,
		image_url: row.image_url,
		price: row.price,
		location_label: row.location_label,
		source_kind,
		is_sponsored: false,
	}
}

fn slot_from_row(row: SponsoredSlot) -> Option<Slot> {
	let (Some(block_type), Some(content_type)) =
		(BlockType::parse(&row.block_type), ContentType::parse(&row.content_type))
	else {
		warn!(
			slot_id = %row.slot_id,
			block_type = row.block_type.as_str(),
			content_type = row.content_type.as_str(),
			"Ignoring sponsored slot with an unknown type."
		);

		return None;
	};

	Some(Slot {
		slot_id: row.slot_id,
		block_type,
		city_slug: row.city_slug,
		content_type,
		content_id: row.content_id,
		sort_order: row.sort_order,
		is_active: row.is_active,
		starts_at: row.starts_at,
		ends_at: row.ends_at,
		created_at: row.created_at,
	})
}

fn tag_list(tags: &Value) -> Vec<String> {
	match tags {
		Value::Array(values) =>
			values.iter().filter_map(|value| value.as_str().map(str::to_string)).collect(),
		_ => Vec::new(),
	}
}
