//! Spreadsheet-shaped data, independent of the file format.

use std::sync::Arc;

use serde_json::Value;
use time::{
	Date, Duration, OffsetDateTime, PrimitiveDateTime, UtcOffset,
	format_description::{BorrowedFormatItem, well_known::Rfc3339},
	macros::{datetime, format_description},
};

const EXCEL_EPOCH: OffsetDateTime = datetime!(1899-12-30 0:00 UTC);
// 9999-12-31 in the 1900 date system.
const EXCEL_MAX_SERIAL: f64 = 2_958_465.0;

const DATE_TIME_FORMATS: [&[BorrowedFormatItem<'static>]; 4] = [
	format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
	format_description!("[year]-[month]-[day] [hour]:[minute]"),
	format_description!("[day].[month].[year] [hour]:[minute]:[second]"),
	format_description!("[day].[month].[year] [hour]:[minute]"),
];
const DATE_FORMATS: [&[BorrowedFormatItem<'static>]; 2] =
	[format_description!("[year]-[month]-[day]"), format_description!("[day].[month].[year]")];

#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
	Empty,
	Text(String),
	Number(f64),
	Bool(bool),
}
impl Cell {
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	pub fn opt_text(value: Option<impl Into<String>>) -> Self {
		value.map(|value| Self::Text(value.into())).unwrap_or(Self::Empty)
	}

	pub fn opt_number(value: Option<f64>) -> Self {
		value.map(Self::Number).unwrap_or(Self::Empty)
	}

	pub fn is_empty(&self) -> bool {
		match self {
			Self::Empty => true,
			Self::Text(text) => text.trim().is_empty(),
			_ => false,
		}
	}

	/// Trimmed text form. Whole numbers render without a fractional part.
	pub fn as_text(&self) -> Option<String> {
		match self {
			Self::Empty => None,
			Self::Text(text) => {
				let trimmed = text.trim();

				if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
			},
			Self::Number(value) =>
				if value.fract() == 0.0 && value.abs() < 1e15 {
					Some(format!("{}", *value as i64))
				} else {
					Some(value.to_string())
				},
			Self::Bool(value) => Some(value.to_string()),
		}
	}

	/// Lenient numeric coercion. Accepts decimal commas and grouping spaces in text.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Self::Number(value) if value.is_finite() => Some(*value),
			Self::Text(text) => {
				let cleaned: String = text
					.chars()
					.filter(|ch| !ch.is_whitespace())
					.map(|ch| if ch == ',' { '.' } else { ch })
					.collect();

				cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
			},
			_ => None,
		}
	}

	pub fn as_flag(&self) -> Option<bool> {
		match self {
			Self::Bool(value) => Some(*value),
			Self::Number(value) => Some(*value != 0.0),
			Self::Text(text) => match text.trim().to_lowercase().as_str() {
				"true" | "yes" | "y" | "1" | "да" => Some(true),
				"false" | "no" | "n" | "0" | "нет" => Some(false),
				_ => None,
			},
			Self::Empty => None,
		}
	}

	/// Excel serial dates, RFC 3339, and `YYYY-MM-DD` / `DD.MM.YYYY` with optional time.
	/// Timestamps without an offset are read as UTC.
	pub fn as_datetime(&self) -> Option<OffsetDateTime> {
		match self {
			Self::Number(serial) => from_excel_serial(*serial),
			Self::Text(text) => parse_datetime_text(text.trim()),
			_ => None,
		}
	}

	/// JSON array of strings, or a comma separated list.
	pub fn as_list(&self) -> Vec<String> {
		let Some(raw) = self.as_text() else {
			return Vec::new();
		};

		if raw.starts_with('[')
			&& let Ok(Value::Array(values)) = serde_json::from_str::<Value>(&raw)
		{
			return values
				.into_iter()
				.filter_map(|value| match value {
					Value::String(text) => Some(text.trim().to_string()),
					Value::Number(number) => Some(number.to_string()),
					_ => None,
				})
				.filter(|text| !text.is_empty())
				.collect();
		}

		raw.split(',').map(str::trim).filter(|text| !text.is_empty()).map(String::from).collect()
	}
}

pub fn from_excel_serial(serial: f64) -> Option<OffsetDateTime> {
	if !serial.is_finite() || serial <= 0.0 || serial > EXCEL_MAX_SERIAL {
		return None;
	}

	let seconds = (serial * 86_400.0).round() as i64;

	EXCEL_EPOCH.checked_add(Duration::seconds(seconds))
}

/// Inverse of [`from_excel_serial`].
pub fn to_excel_serial(value: OffsetDateTime) -> f64 {
	let utc = value.to_offset(UtcOffset::UTC);

	(utc - EXCEL_EPOCH).as_seconds_f64() / 86_400.0
}

fn parse_datetime_text(text: &str) -> Option<OffsetDateTime> {
	if text.is_empty() {
		return None;
	}
	if let Ok(value) = OffsetDateTime::parse(text, &Rfc3339) {
		return Some(value);
	}

	let normalized = text.replacen('T', " ", 1);

	for format in DATE_TIME_FORMATS {
		if let Ok(value) = PrimitiveDateTime::parse(&normalized, format) {
			return Some(value.assume_utc());
		}
	}
	for format in DATE_FORMATS {
		if let Ok(value) = Date::parse(text, format) {
			return Some(value.midnight().assume_utc());
		}
	}

	None
}

/// Lowercase, trimmed, with runs of spaces and dashes folded to `_`.
pub fn normalize_header(raw: &str) -> String {
	let mut out = String::with_capacity(raw.len());
	let mut pending = false;

	for ch in raw.trim().chars().flat_map(char::to_lowercase) {
		if ch.is_whitespace() || ch == '-' || ch == '_' || ch == '/' {
			pending = true;

			continue;
		}
		if pending && !out.is_empty() {
			out.push('_');
		}

		pending = false;

		out.push(ch);
	}

	out
}

/// A header row plus data rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
	pub headers: Vec<String>,
	pub rows: Vec<Vec<Cell>>,
	/// Blank sheet rows above the header.
	pub header_offset: usize,
}
impl Table {
	pub fn new(headers: &[&str]) -> Self {
		Self {
			headers: headers.iter().map(|header| header.to_string()).collect(),
			rows: Vec::new(),
			header_offset: 0,
		}
	}

	/// Treats the first row as the header.
	pub fn from_grid(grid: Vec<Vec<Cell>>) -> Self {
		let mut rows = grid.into_iter();
		let headers = rows
			.next()
			.map(|header| header.iter().map(|cell| cell.as_text().unwrap_or_default()).collect())
			.unwrap_or_default();
		let rows = rows.collect();

		Self { headers, rows, header_offset: 0 }
	}

	pub fn push_row(&mut self, row: Vec<Cell>) {
		self.rows.push(row);
	}

	/// Non-blank data rows with 1-based spreadsheet row numbers.
	pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
		let first_data_row = self.header_offset + 2;
		let columns: Vec<String> =
			self.headers.iter().map(|header| normalize_header(header)).collect();
		let columns = Arc::new(columns);

		self.rows
			.iter()
			.enumerate()
			.filter(|(_, cells)| cells.iter().any(|cell| !cell.is_empty()))
			.map(move |(idx, cells)| Record { row_number: first_data_row + idx, columns: columns.clone(), cells })
	}
}

/// One data row addressed by normalized header name.
#[derive(Debug)]
pub struct Record<'a> {
	pub row_number: usize,
	columns: Arc<Vec<String>>,
	cells: &'a [Cell],
}
impl Record<'_> {
	pub fn cell(&self, column: &str) -> &Cell {
		static EMPTY: Cell = Cell::Empty;

		let column = normalize_header(column);

		self.columns
			.iter()
			.position(|name| *name == column)
			.and_then(|idx| self.cells.get(idx))
			.unwrap_or(&EMPTY)
	}

	/// First non-empty text among `columns`.
	pub fn text(&self, columns: &[&str]) -> Option<String> {
		columns.iter().find_map(|column| self.cell(column).as_text())
	}

	pub fn number(&self, column: &str) -> Option<f64> {
		self.cell(column).as_number()
	}

	pub fn flag(&self, column: &str) -> Option<bool> {
		self.cell(column).as_flag()
	}

	pub fn datetime(&self, column: &str) -> Option<OffsetDateTime> {
		self.cell(column).as_datetime()
	}

	pub fn list(&self, column: &str) -> Vec<String> {
		self.cell(column).as_list()
	}
}
