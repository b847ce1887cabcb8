use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use afisha_domain::{
	import::{self, EventImportRow, RecordKind, VenueImportRow},
	slug,
	table::{Record, Table},
};
use afisha_storage::models::{NewEvent, NewTicketTier, NewVenue};

use crate::{AfishaService, Error, Result};

const MAX_SLUG_ATTEMPTS: u32 = 1_000;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ImportFailure {
	pub row: usize,
	pub title: Option<String>,
	pub message: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ImportReport {
	pub kind: RecordKind,
	pub created: usize,
	pub failed: usize,
	pub failures: Vec<ImportFailure>,
	/// Slugs of the created records, in row order.
	pub created_slugs: Vec<String>,
}
impl ImportReport {
	fn new(kind: RecordKind) -> Self {
		Self { kind, created: 0, failed: 0, failures: Vec::new(), created_slugs: Vec::new() }
	}
}

impl AfishaService {
	/// Imports every data row of `table` as a new record of `kind`.
	///
	/// Rows are independent: a failing row is logged, counted and skipped, and rows before it stay
	/// committed. Only a header row missing a required column fails the whole import.
	pub async fn import_table(&self, kind: RecordKind, table: &Table) -> Result<ImportReport> {
		check_required_columns(kind, table)?;

		let mut report = ImportReport::new(kind);

		for record in table.records() {
			let title = record.text(&["title", "name"]);
			let outcome = match kind {
				RecordKind::Event => self.import_event(&record).await,
				RecordKind::Venue => self.import_venue(&record).await,
			};

			match outcome {
				Ok(slug) => {
					debug!(row = record.row_number, slug = slug.as_str(), "Row imported.");

					report.created += 1;
					report.created_slugs.push(slug);
				},
				Err(err) => {
					warn!(
						row = record.row_number,
						title = title.as_deref().unwrap_or_default(),
						error = %err,
						"Skipping row that failed to import."
					);

					report.failed += 1;
					report.failures.push(ImportFailure {
						row: record.row_number,
						title,
						message: err.to_string(),
					});
				},
			}
		}

		info!(
			kind = kind.as_str(),
			created = report.created,
			failed = report.failed,
			"Import finished."
		);

		Ok(report)
	}

	async fn import_event(&self, record: &Record<'_>) -> Result<String> {
		let row: EventImportRow =
			import::parse_event_row(record).map_err(|err| Error::invalid(err.to_string()))?;
		let store = &self.stores.records;
		let city = store
			.find_city(&row.city)
			.await?
			.ok_or_else(|| Error::not_found(format!("City {}.", row.city)))?;
		let venue_id = match row.venue.as_deref() {
			Some(key) => {
				let venue_id = store.find_venue(key).await?;

				if venue_id.is_none() {
					warn!(row = row.row_number, venue = key, "Venue not found; importing without it.");
				}

				venue_id
			},
			None => None,
		};
		let category_id = self.optional_category(row.row_number, row.category.as_deref()).await?;
		let slug = self.unique_slug(RecordKind::Event, row.slug_hint.as_deref(), &row.title).await?;
		let event = NewEvent {
			event_id: Uuid::new_v4(),
			slug: slug.clone(),
			title: row.title,
			description: row.description,
			image_url: row.image_url,
			city_id: city.city_id,
			venue_id,
			category_id,
			starts_at: row.starts_at,
			ends_at: row.ends_at,
			price_from: row.price_from,
			is_popular: row.is_popular,
			is_actual: row.is_actual,
			tags: Value::from(row.tags),
		};
		let tiers: Vec<NewTicketTier> = row
			.ticket_tiers
			.into_iter()
			.map(|tier| NewTicketTier {
				tier_id: Uuid::new_v4(),
				position: tier.position,
				name: tier.name,
				price: tier.price,
				currency: tier.currency,
			})
			.collect();

		store.insert_event(&event, &tiers).await?;

		Ok(slug)
	}

	async fn import_venue(&self, record: &Record<'_>) -> Result<String> {
		let row: VenueImportRow =
			import::parse_venue_row(record).map_err(|err| Error::invalid(err.to_string()))?;
		let store = &self.stores.records;
		let city = store
			.find_city(&row.city)
			.await?
			.ok_or_else(|| Error::not_found(format!("City {}.", row.city)))?;
		let category_id = self.optional_category(row.row_number, row.category.as_deref()).await?;
		let slug = self.unique_slug(RecordKind::Venue, row.slug_hint.as_deref(), &row.name).await?;
		let venue = NewVenue {
			venue_id: Uuid::new_v4(),
			slug: slug.clone(),
			name: row.name,
			description: row.description,
			image_url: row.image_url,
			city_id: city.city_id,
			category_id,
			address: row.address,
			latitude: row.latitude,
			longitude: row.longitude,
			phone: row.phone,
			website: row.website,
			tags: Value::from(row.tags),
		};

		store.insert_venue(&venue).await?;

		Ok(slug)
	}

	async fn optional_category(&self, row: usize, key: Option<&str>) -> Result<Option<Uuid>> {
		let Some(key) = key else {
			return Ok(None);
		};
		let category_id = self.stores.records.find_category(key).await?;

		if category_id.is_none() {
			warn!(row, category = key, "Category not found; importing without it.");
		}

		Ok(category_id)
	}

	/// First free slug among `base`, `base-1`, `base-2`, ...
	async fn unique_slug(&self, kind: RecordKind, hint: Option<&str>, title: &str) -> Result<String> {
		let base = hint
			.map(slug::slugify)
			.filter(|slug| !slug.is_empty())
			.unwrap_or_else(|| slug::slug_base(title, kind.as_str()));

		for attempt in 0..MAX_SLUG_ATTEMPTS {
			let candidate = slug::with_suffix(&base, attempt);

			if !self.stores.records.slug_exists(kind, &candidate).await? {
				return Ok(candidate);
			}
		}

		Err(Error::Conflict { message: format!("No free slug for {base}.") })
	}
}

fn check_required_columns(kind: RecordKind, table: &Table) -> Result<()> {
	let headers: Vec<String> =
		table.headers.iter().map(|header| afisha_domain::table::normalize_header(header)).collect();
	let has = |names: &[&str]| names.iter().any(|name| headers.iter().any(|header| header == name));
	let title_columns: &[&str] = match kind {
		RecordKind::Event => &["title", "name"],
		RecordKind::Venue => &["name", "title"],
	};

	if !has(title_columns) {
		return Err(Error::invalid(format!("Sheet has no {} column.", title_columns[0])));
	}
	if !has(&["city", "city_slug"]) {
		return Err(Error::invalid("Sheet has no city column."));
	}

	Ok(())
}
