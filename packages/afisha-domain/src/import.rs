use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::table::Record;

pub const MAX_TICKET_TIERS: usize = 3;
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Persisted collections the loader moves in and out of spreadsheets.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
	Event,
	Venue,
}
impl RecordKind {
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Event => "event",
			Self::Venue => "venue",
		}
	}

	pub fn plural(self) -> &'static str {
		match self {
			Self::Event => "events",
			Self::Venue => "venues",
		}
	}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowError {
	#[error("Row {row}: column {column} is required.")]
	MissingField { row: usize, column: &'static str },
	#[error("Row {row}: {column} must not be earlier than {earlier}.")]
	InvalidRange { row: usize, column: &'static str, earlier: &'static str },
	#[error("Row {row}: ticket tier {tier} has a negative price.")]
	NegativePrice { row: usize, tier: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TicketTierInput {
	pub position: i32,
	pub name: String,
	pub price: Option<f64>,
	pub currency: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventImportRow {
	pub row_number: usize,
	/// Preferred slug base from a `slug` column, e.g. when re-importing an export.
	pub slug_hint: Option<String>,
	pub title: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city: String,
	pub venue: Option<String>,
	pub category: Option<String>,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
	pub price_from: Option<f64>,
	pub is_popular: bool,
	pub is_actual: bool,
	pub tags: Vec<String>,
	pub ticket_tiers: Vec<TicketTierInput>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VenueImportRow {
	pub row_number: usize,
	pub slug_hint: Option<String>,
	pub name: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city: String,
	pub category: Option<String>,
	pub address: Option<String>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub phone: Option<String>,
	pub website: Option<String>,
	pub tags: Vec<String>,
}

pub fn parse_event_row(record: &Record<'_>) -> Result<EventImportRow, RowError> {
	let row = record.row_number;
	let title = record
		.text(&["title", "name"])
		.ok_or(RowError::MissingField { row, column: "title" })?;
	let city =
		record.text(&["city", "city_slug"]).ok_or(RowError::MissingField { row, column: "city" })?;
	let starts_at = record.datetime("starts_at").or_else(|| record.datetime("date"));
	let ends_at = record.datetime("ends_at");

	if let (Some(starts_at), Some(ends_at)) = (starts_at, ends_at)
		&& ends_at < starts_at
	{
		return Err(RowError::InvalidRange { row, column: "ends_at", earlier: "starts_at" });
	}

	let ticket_tiers = parse_ticket_tiers(record)?;
	// Falls back to the cheapest ticket tier.
	let price_from = record
		.number("price_from")
		.or_else(|| record.number("price"))
		.or_else(|| ticket_tiers.iter().filter_map(|tier| tier.price).reduce(f64::min));

	Ok(EventImportRow {
		row_number: row,
		slug_hint: record.text(&["slug"]),
		title,
		description: record.text(&["description"]),
		image_url: record.text(&["image_url", "image"]),
		city,
		venue: record.text(&["venue", "venue_slug"]),
		category: record.text(&["category", "category_slug"]),
		starts_at,
		ends_at,
		price_from,
		is_popular: record.flag("is_popular").unwrap_or(false),
		is_actual: record.flag("is_actual").unwrap_or(true),
		tags: record.list("tags"),
		ticket_tiers,
	})
}

pub fn parse_venue_row(record: &Record<'_>) -> Result<VenueImportRow, RowError> {
	let row = record.row_number;
	let name =
		record.text(&["name", "title"]).ok_or(RowError::MissingField { row, column: "name" })?;
	let city =
		record.text(&["city", "city_slug"]).ok_or(RowError::MissingField { row, column: "city" })?;

	Ok(VenueImportRow {
		row_number: row,
		slug_hint: record.text(&["slug"]),
		name,
		description: record.text(&["description"]),
		image_url: record.text(&["image_url", "image"]),
		city,
		category: record.text(&["category", "category_slug"]),
		address: record.text(&["address"]),
		latitude: record.number("latitude").filter(|value| (-90.0..=90.0).contains(value)),
		longitude: record.number("longitude").filter(|value| (-180.0..=180.0).contains(value)),
		phone: record.text(&["phone"]),
		website: record.text(&["website", "url"]),
		tags: record.list("tags"),
	})
}

/// Reads the `ticket_N_name / ticket_N_price / ticket_N_currency` triples. A tier exists when its
/// name is present.
fn parse_ticket_tiers(record: &Record<'_>) -> Result<Vec<TicketTierInput>, RowError> {
	let mut tiers = Vec::new();

	for tier in 1..=MAX_TICKET_TIERS {
		let name_column = format!("ticket_{tier}_name");
		let currency_column = format!("ticket_{tier}_currency");
		let Some(name) = record.text(&[name_column.as_str()]) else {
			continue;
		};
		let price = record.number(&format!("ticket_{tier}_price"));

		if price.map(|price| price < 0.0).unwrap_or(false) {
			return Err(RowError::NegativePrice { row: record.row_number, tier });
		}

		let currency = record
			.text(&[currency_column.as_str()])
			.map(|currency| currency.to_uppercase())
			.unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

		tiers.push(TicketTierInput { position: tier as i32, name, price, currency });
	}

	Ok(tiers)
}
