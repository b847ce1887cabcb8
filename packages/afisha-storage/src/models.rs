use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, sqlx::FromRow)]
pub struct City {
	pub city_id: Uuid,
	pub slug: String,
	pub name: String,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct SponsoredSlot {
	pub slot_id: Uuid,
	pub block_type: String,
	pub city_slug: String,
	pub content_type: String,
	pub content_id: Uuid,
	pub sort_order: i32,
	pub is_active: bool,
	pub starts_at: OffsetDateTime,
	pub ends_at: OffsetDateTime,
	pub created_at: OffsetDateTime,
}

/// Common projection every catalog query aliases its columns into.
#[derive(Debug, sqlx::FromRow)]
pub struct CatalogRow {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub price: Option<f64>,
	pub location_label: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct EventSearchRow {
	pub event_id: Uuid,
	pub slug: String,
	pub title: String,
	pub image_url: Option<String>,
	pub venue_name: Option<String>,
	pub city_slug: Option<String>,
	pub starts_at: Option<OffsetDateTime>,
	pub is_actual: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub struct VenueSearchRow {
	pub venue_id: Uuid,
	pub slug: String,
	pub name: String,
	pub image_url: Option<String>,
	pub address: Option<String>,
	pub city_slug: Option<String>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct BlogSearchRow {
	pub post_id: Uuid,
	pub slug: String,
	pub title: String,
	pub image_url: Option<String>,
	pub published_at: Option<OffsetDateTime>,
}

#[derive(Debug)]
pub struct NewEvent {
	pub event_id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city_id: Uuid,
	pub venue_id: Option<Uuid>,
	pub category_id: Option<Uuid>,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
	pub price_from: Option<f64>,
	pub is_popular: bool,
	pub is_actual: bool,
	pub tags: Value,
}

#[derive(Debug)]
pub struct NewTicketTier {
	pub tier_id: Uuid,
	pub position: i32,
	pub name: String,
	pub price: Option<f64>,
	pub currency: String,
}

#[derive(Debug)]
pub struct NewVenue {
	pub venue_id: Uuid,
	pub slug: String,
	pub name: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city_id: Uuid,
	pub category_id: Option<Uuid>,
	pub address: Option<String>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub phone: Option<String>,
	pub website: Option<String>,
	pub tags: Value,
}

#[derive(Debug, sqlx::FromRow)]
pub struct EventExport {
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city_name: Option<String>,
	pub venue_name: Option<String>,
	pub category_name: Option<String>,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
	pub price_from: Option<f64>,
	pub is_popular: bool,
	pub is_actual: bool,
	pub view_count: i64,
	pub tags: Value,
}

#[derive(Debug, sqlx::FromRow)]
pub struct VenueExport {
	pub slug: String,
	pub name: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city_name: Option<String>,
	pub category_name: Option<String>,
	pub address: Option<String>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub phone: Option<String>,
	pub website: Option<String>,
	pub tags: Value,
}
