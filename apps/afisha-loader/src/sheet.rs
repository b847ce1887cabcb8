//! `.xlsx` files to and from [`Table`].

use std::path::Path;

use calamine::{Data, Reader};
use rust_xlsxwriter::{Format, Workbook};

use afisha_domain::table::{Cell, Table};

use crate::{Error, Result};

const MAX_ROWS: u32 = 1_048_576;
const HEADER_WIDTH: f64 = 18.0;

/// Reads the first worksheet. The first non-blank row becomes the header.
pub fn read_table(path: &Path) -> Result<Table> {
	let mut workbook = calamine::open_workbook_auto(path)?;
	let range = workbook
		.worksheet_range_at(0)
		.ok_or_else(|| Error::NoWorksheet { path: path.display().to_string() })??;
	let grid = range.rows().map(|row| row.iter().map(cell_from_data).collect()).collect();
	let mut table = Table::from_grid(grid);

	// The range starts at the first used cell, not at A1.
	if let Some((row, _)) = range.start() {
		table.header_offset = row as usize;
	}

	Ok(table)
}

pub fn write_table(table: &Table, path: &Path) -> Result<()> {
	let data_rows = u32::try_from(table.rows.len())
		.ok()
		.filter(|rows| *rows < MAX_ROWS)
		.ok_or(Error::TooManyRows { rows: table.rows.len(), max: MAX_ROWS - 1 })?;
	let mut workbook = Workbook::new();
	let sheet = workbook.add_worksheet();
	let bold = Format::new().set_bold();

	for (col, header) in (0_u16..).zip(&table.headers) {
		sheet.write_string_with_format(0, col, header, &bold)?;
		sheet.set_column_width(col, HEADER_WIDTH)?;
	}
	for (row, cells) in (1..=data_rows).zip(&table.rows) {
		for (col, cell) in (0_u16..).zip(cells) {
			match cell {
				Cell::Empty => {},
				Cell::Text(text) => {
					sheet.write_string(row, col, text)?;
				},
				Cell::Number(value) => {
					sheet.write_number(row, col, *value)?;
				},
				Cell::Bool(value) => {
					sheet.write_boolean(row, col, *value)?;
				},
			}
		}
	}

	workbook.save(path)?;

	Ok(())
}

fn cell_from_data(data: &Data) -> Cell {
	match data {
		Data::Empty | Data::Error(_) => Cell::Empty,
		Data::String(text) => Cell::Text(text.clone()),
		Data::Float(value) => Cell::Number(*value),
		Data::Int(value) => Cell::Number(*value as f64),
		Data::Bool(value) => Cell::Bool(*value),
		// Serial numbers; the import side converts them back to timestamps.
		Data::DateTime(value) => Cell::Number(value.as_f64()),
		Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
	}
}
