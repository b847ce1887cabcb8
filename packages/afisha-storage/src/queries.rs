use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{
		BlogSearchRow, CatalogRow, City, EventExport, EventSearchRow, NewEvent, NewTicketTier,
		NewVenue, SponsoredSlot, VenueExport, VenueSearchRow,
	},
};

const SLOT_COLUMNS: &str = "\
slot_id,
	block_type,
	city_slug,
	content_type,
	content_id,
	sort_order,
	is_active,
	starts_at,
	ends_at,
	created_at";

/// Looks a city up by slug, falling back to a case-insensitive name match.
pub async fn find_city(db: &Db, key: &str) -> Result<Option<City>> {
	let city = sqlx::query_as::<_, City>(
		"\
SELECT city_id, slug, name
FROM cities
WHERE slug = lower($1) OR lower(name) = lower($1)
ORDER BY (slug = lower($1)) DESC
LIMIT 1",
	)
	.bind(key)
	.fetch_optional(&db.pool)
	.await?;

	Ok(city)
}

pub async fn find_venue_id(db: &Db, key: &str) -> Result<Option<Uuid>> {
	let id = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT venue_id
FROM venues
WHERE slug = lower($1) OR lower(name) = lower($1)
ORDER BY (slug = lower($1)) DESC, created_at ASC, venue_id ASC
LIMIT 1",
	)
	.bind(key)
	.fetch_optional(&db.pool)
	.await?;

	Ok(id)
}

pub async fn find_category_id(db: &Db, key: &str) -> Result<Option<Uuid>> {
	let id = sqlx::query_scalar::<_, Uuid>(
		"\
SELECT category_id
FROM categories
WHERE slug = lower($1) OR lower(name) = lower($1)
ORDER BY (slug = lower($1)) DESC, category_id ASC
LIMIT 1",
	)
	.bind(key)
	.fetch_optional(&db.pool)
	.await?;

	Ok(id)
}

/// Live slots for one block, highest `sort_order` first.
pub async fn active_slots(
	db: &Db,
	block_type: &str,
	city_slug: &str,
	now: OffsetDateTime,
	limit: i64,
) -> Result<Vec<SponsoredSlot>> {
	let sql = format!(
		"\
SELECT
	{SLOT_COLUMNS}
FROM sponsored_slots
WHERE block_type = $1
	AND city_slug = $2
	AND is_active
	AND starts_at <= $3
	AND ends_at >= $3
ORDER BY sort_order DESC, created_at ASC, slot_id ASC
LIMIT $4"
	);
	let slots = sqlx::query_as::<_, SponsoredSlot>(&sql)
		.bind(block_type)
		.bind(city_slug)
		.bind(now)
		.bind(limit)
		.fetch_all(&db.pool)
		.await?;

	Ok(slots)
}

pub async fn list_slots(db: &Db, city_slug: &str) -> Result<Vec<SponsoredSlot>> {
	let sql = format!(
		"\
SELECT
	{SLOT_COLUMNS}
FROM sponsored_slots
WHERE city_slug = $1
ORDER BY block_type ASC, sort_order DESC, created_at ASC, slot_id ASC"
	);
	let slots =
		sqlx::query_as::<_, SponsoredSlot>(&sql).bind(city_slug).fetch_all(&db.pool).await?;

	Ok(slots)
}

pub async fn insert_slot(db: &Db, slot: &SponsoredSlot) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO sponsored_slots (
	slot_id,
	block_type,
	city_slug,
	content_type,
	content_id,
	sort_order,
	is_active,
	starts_at,
	ends_at,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
	)
	.bind(slot.slot_id)
	.bind(slot.block_type.as_str())
	.bind(slot.city_slug.as_str())
	.bind(slot.content_type.as_str())
	.bind(slot.content_id)
	.bind(slot.sort_order)
	.bind(slot.is_active)
	.bind(slot.starts_at)
	.bind(slot.ends_at)
	.bind(slot.created_at)
	.execute(&db.pool)
	.await
	.map_err(|err| Error::conflict_on_unique(err, "Sponsored slot"))?;

	Ok(())
}

/// Switches a slot off. Returns the updated slot, or `None` when it does not exist.
pub async fn deactivate_slot(db: &Db, slot_id: Uuid) -> Result<Option<SponsoredSlot>> {
	let sql = format!(
		"\
UPDATE sponsored_slots
SET is_active = false
WHERE slot_id = $1
RETURNING
	{SLOT_COLUMNS}"
	);
	let slot =
		sqlx::query_as::<_, SponsoredSlot>(&sql).bind(slot_id).fetch_optional(&db.pool).await?;

	Ok(slot)
}

pub async fn event_item(db: &Db, event_id: Uuid) -> Result<Option<CatalogRow>> {
	let row = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	e.event_id AS id,
	e.slug,
	e.title,
	e.description,
	e.image_url,
	e.price_from AS price,
	v.name AS location_label
FROM events e
LEFT JOIN venues v ON v.venue_id = e.venue_id
WHERE e.event_id = $1",
	)
	.bind(event_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn venue_item(db: &Db, venue_id: Uuid) -> Result<Option<CatalogRow>> {
	let row = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	venue_id AS id,
	slug,
	name AS title,
	description,
	image_url,
	NULL::double precision AS price,
	address AS location_label
FROM venues
WHERE venue_id = $1",
	)
	.bind(venue_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn service_item(db: &Db, service_id: Uuid) -> Result<Option<CatalogRow>> {
	let row = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	service_id AS id,
	slug,
	title,
	description,
	image_url,
	price_from AS price,
	NULL::text AS location_label
FROM services
WHERE service_id = $1",
	)
	.bind(service_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn category_item(db: &Db, category_id: Uuid) -> Result<Option<CatalogRow>> {
	let row = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	category_id AS id,
	slug,
	name AS title,
	description,
	image_url,
	NULL::double precision AS price,
	NULL::text AS location_label
FROM categories
WHERE category_id = $1",
	)
	.bind(category_id)
	.fetch_optional(&db.pool)
	.await?;

	Ok(row)
}

pub async fn popular_events(db: &Db, city_id: Uuid, limit: i64) -> Result<Vec<CatalogRow>> {
	let rows = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	e.event_id AS id,
	e.slug,
	e.title,
	e.description,
	e.image_url,
	e.price_from AS price,
	v.name AS location_label
FROM events e
LEFT JOIN venues v ON v.venue_id = e.venue_id
WHERE e.city_id = $1
ORDER BY e.is_popular DESC, e.view_count DESC, e.created_at DESC, e.event_id ASC
LIMIT $2",
	)
	.bind(city_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn recent_venues(db: &Db, city_id: Uuid, limit: i64) -> Result<Vec<CatalogRow>> {
	let rows = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	venue_id AS id,
	slug,
	name AS title,
	description,
	image_url,
	NULL::double precision AS price,
	address AS location_label
FROM venues
WHERE city_id = $1
ORDER BY created_at DESC, venue_id ASC
LIMIT $2",
	)
	.bind(city_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Services of the city plus services without a city.
pub async fn recent_services(db: &Db, city_id: Uuid, limit: i64) -> Result<Vec<CatalogRow>> {
	let rows = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	service_id AS id,
	slug,
	title,
	description,
	image_url,
	price_from AS price,
	NULL::text AS location_label
FROM services
WHERE city_id = $1 OR city_id IS NULL
ORDER BY created_at DESC, service_id ASC
LIMIT $2",
	)
	.bind(city_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn ranked_categories(db: &Db, limit: i64) -> Result<Vec<CatalogRow>> {
	let rows = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	category_id AS id,
	slug,
	name AS title,
	description,
	image_url,
	NULL::double precision AS price,
	NULL::text AS location_label
FROM categories
ORDER BY sort_order ASC, created_at DESC, category_id ASC
LIMIT $1",
	)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Collections of the city plus collections without a city.
pub async fn ranked_collections(db: &Db, city_id: Uuid, limit: i64) -> Result<Vec<CatalogRow>> {
	let rows = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	collection_id AS id,
	slug,
	title,
	description,
	image_url,
	NULL::double precision AS price,
	NULL::text AS location_label
FROM collections
WHERE city_id = $1 OR city_id IS NULL
ORDER BY sort_order ASC, created_at DESC, collection_id ASC
LIMIT $2",
	)
	.bind(city_id)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn recent_posts(db: &Db, limit: i64) -> Result<Vec<CatalogRow>> {
	let rows = sqlx::query_as::<_, CatalogRow>(
		"\
SELECT
	post_id AS id,
	slug,
	title,
	excerpt AS description,
	image_url,
	NULL::double precision AS price,
	NULL::text AS location_label
FROM blog_posts
WHERE published_at IS NOT NULL
ORDER BY published_at DESC, created_at DESC, post_id ASC
LIMIT $1",
	)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// `pattern` is an escaped `ILIKE` pattern; `None` matches everything.
pub async fn search_events(
	db: &Db,
	pattern: Option<&str>,
	city_slug: Option<&str>,
	categories: &[String],
	limit: i64,
) -> Result<Vec<EventSearchRow>> {
	let rows = sqlx::query_as::<_, EventSearchRow>(
		"\
SELECT
	e.event_id,
	e.slug,
	e.title,
	e.image_url,
	v.name AS venue_name,
	c.slug AS city_slug,
	e.starts_at,
	e.is_actual
FROM events e
LEFT JOIN venues v ON v.venue_id = e.venue_id
LEFT JOIN cities c ON c.city_id = e.city_id
LEFT JOIN categories cat ON cat.category_id = e.category_id
WHERE ($1::text IS NULL OR e.title ILIKE $1 OR e.description ILIKE $1)
	AND ($2::text IS NULL OR c.slug = $2)
	AND (cardinality($3::text[]) = 0 OR cat.slug = ANY($3))
ORDER BY e.is_actual DESC, e.starts_at ASC NULLS LAST, e.event_id ASC
LIMIT $4",
	)
	.bind(pattern)
	.bind(city_slug)
	.bind(categories)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn search_venues(
	db: &Db,
	pattern: Option<&str>,
	city_slug: Option<&str>,
	categories: &[String],
	limit: i64,
) -> Result<Vec<VenueSearchRow>> {
	let rows = sqlx::query_as::<_, VenueSearchRow>(
		"\
SELECT
	v.venue_id,
	v.slug,
	v.name,
	v.image_url,
	v.address,
	c.slug AS city_slug
FROM venues v
LEFT JOIN cities c ON c.city_id = v.city_id
LEFT JOIN categories cat ON cat.category_id = v.category_id
WHERE ($1::text IS NULL OR v.name ILIKE $1 OR v.description ILIKE $1)
	AND ($2::text IS NULL OR c.slug = $2)
	AND (cardinality($3::text[]) = 0 OR cat.slug = ANY($3))
ORDER BY lower(v.name) ASC, v.venue_id ASC
LIMIT $4",
	)
	.bind(pattern)
	.bind(city_slug)
	.bind(categories)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

/// Blog posts are not tied to a city, so only the text filter applies.
pub async fn search_posts(db: &Db, pattern: Option<&str>, limit: i64) -> Result<Vec<BlogSearchRow>> {
	let rows = sqlx::query_as::<_, BlogSearchRow>(
		"\
SELECT
	post_id,
	slug,
	title,
	image_url,
	published_at
FROM blog_posts
WHERE ($1::text IS NULL OR title ILIKE $1 OR excerpt ILIKE $1)
ORDER BY published_at DESC NULLS LAST, post_id ASC
LIMIT $2",
	)
	.bind(pattern)
	.bind(limit)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn event_slug_exists(db: &Db, slug: &str) -> Result<bool> {
	let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM events WHERE slug = $1)")
		.bind(slug)
		.fetch_one(&db.pool)
		.await?;

	Ok(exists)
}

pub async fn venue_slug_exists(db: &Db, slug: &str) -> Result<bool> {
	let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM venues WHERE slug = $1)")
		.bind(slug)
		.fetch_one(&db.pool)
		.await?;

	Ok(exists)
}

/// Inserts an event and its ticket tiers in one transaction.
pub async fn insert_event(db: &Db, event: &NewEvent, tiers: &[NewTicketTier]) -> Result<()> {
	let mut tx = db.pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO events (
	event_id,
	slug,
	title,
	description,
	image_url,
	city_id,
	venue_id,
	category_id,
	starts_at,
	ends_at,
	price_from,
	is_popular,
	is_actual,
	tags
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
	)
	.bind(event.event_id)
	.bind(event.slug.as_str())
	.bind(event.title.as_str())
	.bind(event.description.as_deref())
	.bind(event.image_url.as_deref())
	.bind(event.city_id)
	.bind(event.venue_id)
	.bind(event.category_id)
	.bind(event.starts_at)
	.bind(event.ends_at)
	.bind(event.price_from)
	.bind(event.is_popular)
	.bind(event.is_actual)
	.bind(&event.tags)
	.execute(&mut *tx)
	.await
	.map_err(|err| Error::conflict_on_unique(err, &format!("Event slug {}", event.slug)))?;

	for tier in tiers {
		insert_ticket_tier(&mut tx, event.event_id, tier).await?;
	}

	tx.commit().await?;

	Ok(())
}

async fn insert_ticket_tier(
	tx: &mut Transaction<'_, Postgres>,
	event_id: Uuid,
	tier: &NewTicketTier,
) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO ticket_tiers (tier_id, event_id, position, name, price, currency)
VALUES ($1, $2, $3, $4, $5, $6)",
	)
	.bind(tier.tier_id)
	.bind(event_id)
	.bind(tier.position)
	.bind(tier.name.as_str())
	.bind(tier.price)
	.bind(tier.currency.as_str())
	.execute(&mut **tx)
	.await?;

	Ok(())
}

pub async fn insert_venue(db: &Db, venue: &NewVenue) -> Result<()> {
	sqlx::query(
		"\
INSERT INTO venues (
	venue_id,
	slug,
	name,
	description,
	image_url,
	city_id,
	category_id,
	address,
	latitude,
	longitude,
	phone,
	website,
	tags
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
	)
	.bind(venue.venue_id)
	.bind(venue.slug.as_str())
	.bind(venue.name.as_str())
	.bind(venue.description.as_deref())
	.bind(venue.image_url.as_deref())
	.bind(venue.city_id)
	.bind(venue.category_id)
	.bind(venue.address.as_deref())
	.bind(venue.latitude)
	.bind(venue.longitude)
	.bind(venue.phone.as_deref())
	.bind(venue.website.as_deref())
	.bind(&venue.tags)
	.execute(&db.pool)
	.await
	.map_err(|err| Error::conflict_on_unique(err, &format!("Venue slug {}", venue.slug)))?;

	Ok(())
}

/// Every event, oldest first, with relations flattened to names.
pub async fn export_events(db: &Db) -> Result<Vec<EventExport>> {
	let rows = sqlx::query_as::<_, EventExport>(
		"\
SELECT
	e.slug,
	e.title,
	e.description,
	e.image_url,
	c.name AS city_name,
	v.name AS venue_name,
	cat.name AS category_name,
	e.starts_at,
	e.ends_at,
	e.price_from,
	e.is_popular,
	e.is_actual,
	e.view_count,
	e.tags
FROM events e
LEFT JOIN cities c ON c.city_id = e.city_id
LEFT JOIN venues v ON v.venue_id = e.venue_id
LEFT JOIN categories cat ON cat.category_id = e.category_id
ORDER BY e.created_at ASC, e.event_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn export_venues(db: &Db) -> Result<Vec<VenueExport>> {
	let rows = sqlx::query_as::<_, VenueExport>(
		"\
SELECT
	v.slug,
	v.name,
	v.description,
	v.image_url,
	c.name AS city_name,
	cat.name AS category_name,
	v.address,
	v.latitude,
	v.longitude,
	v.phone,
	v.website,
	v.tags
FROM venues v
LEFT JOIN cities c ON c.city_id = v.city_id
LEFT JOIN categories cat ON cat.category_id = v.category_id
ORDER BY v.created_at ASC, v.venue_id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}
