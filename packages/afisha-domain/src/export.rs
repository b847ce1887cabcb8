use time::{
	OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
	macros::format_description,
};

use crate::{
	import::RecordKind,
	table::{Cell, Table},
};

/// Column order of event exports. Matches the import headers, so an export re-imports as-is.
pub const EVENT_COLUMNS: [&str; 14] = [
	"slug",
	"title",
	"description",
	"image_url",
	"city",
	"venue",
	"category",
	"starts_at",
	"ends_at",
	"price_from",
	"is_popular",
	"is_actual",
	"view_count",
	"tags",
];

pub const VENUE_COLUMNS: [&str; 12] = [
	"slug",
	"name",
	"description",
	"image_url",
	"city",
	"category",
	"address",
	"latitude",
	"longitude",
	"phone",
	"website",
	"tags",
];

/// Event with its relations flattened to display names.
#[derive(Clone, Debug, PartialEq)]
pub struct EventExportRow {
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city: Option<String>,
	pub venue: Option<String>,
	pub category: Option<String>,
	pub starts_at: Option<OffsetDateTime>,
	pub ends_at: Option<OffsetDateTime>,
	pub price_from: Option<f64>,
	pub is_popular: bool,
	pub is_actual: bool,
	pub view_count: i64,
	pub tags: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VenueExportRow {
	pub slug: String,
	pub name: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub city: Option<String>,
	pub category: Option<String>,
	pub address: Option<String>,
	pub latitude: Option<f64>,
	pub longitude: Option<f64>,
	pub phone: Option<String>,
	pub website: Option<String>,
	pub tags: Vec<String>,
}

pub fn events_table(rows: &[EventExportRow]) -> Table {
	let mut table = Table::new(&EVENT_COLUMNS);

	for row in rows {
		table.push_row(vec![
			Cell::text(&row.slug),
			Cell::text(&row.title),
			Cell::opt_text(row.description.as_deref()),
			Cell::opt_text(row.image_url.as_deref()),
			Cell::opt_text(row.city.as_deref()),
			Cell::opt_text(row.venue.as_deref()),
			Cell::opt_text(row.category.as_deref()),
			datetime_cell(row.starts_at),
			datetime_cell(row.ends_at),
			Cell::opt_number(row.price_from),
			Cell::Bool(row.is_popular),
			Cell::Bool(row.is_actual),
			Cell::Number(row.view_count as f64),
			list_cell(&row.tags),
		]);
	}

	table
}

pub fn venues_table(rows: &[VenueExportRow]) -> Table {
	let mut table = Table::new(&VENUE_COLUMNS);

	for row in rows {
		table.push_row(vec![
			Cell::text(&row.slug),
			Cell::text(&row.name),
			Cell::opt_text(row.description.as_deref()),
			Cell::opt_text(row.image_url.as_deref()),
			Cell::opt_text(row.city.as_deref()),
			Cell::opt_text(row.category.as_deref()),
			Cell::opt_text(row.address.as_deref()),
			Cell::opt_number(row.latitude),
			Cell::opt_number(row.longitude),
			Cell::opt_text(row.phone.as_deref()),
			Cell::opt_text(row.website.as_deref()),
			list_cell(&row.tags),
		]);
	}

	table
}

/// `events_export_20260301_190000.xlsx`, stamped in UTC.
pub fn export_file_name(kind: RecordKind, now: OffsetDateTime) -> String {
	let now = now.to_offset(UtcOffset::UTC);
	let stamp = now
		.format(format_description!("[year][month][day]_[hour][minute][second]"))
		.unwrap_or_else(|_| now.unix_timestamp().to_string());

	format!("{}_export_{stamp}.xlsx", kind.plural())
}

fn datetime_cell(value: Option<OffsetDateTime>) -> Cell {
	value.and_then(|value| value.format(&Rfc3339).ok()).map(Cell::Text).unwrap_or(Cell::Empty)
}

fn list_cell(values: &[String]) -> Cell {
	if values.is_empty() { Cell::Empty } else { Cell::Text(values.join(", ")) }
}
