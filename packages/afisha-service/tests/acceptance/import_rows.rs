use uuid::Uuid;

use afisha_domain::{
	export::{EVENT_COLUMNS, EventExportRow},
	import::RecordKind,
	table::{Cell, Table},
};
use afisha_service::Error;

use super::{MemoryStore, build_service};

fn event_sheet(rows: &[(&str, &str)]) -> Table {
	let mut table = Table::new(&["Title", "City", "Ticket 1 Name", "Ticket 1 Price"]);

	for (title, city) in rows {
		table.push_row(vec![
			Cell::text(*title),
			Cell::text(*city),
			Cell::text("Standard"),
			Cell::Number(1_500.0),
		]);
	}

	table
}

#[tokio::test]
async fn duplicate_titles_get_numbered_slugs() {
	let store = MemoryStore::with_city();
	let service = build_service(store.clone());
	let sheet = event_sheet(&[("Swan Lake", "moscow"), ("Swan Lake", "Moscow")]);
	let report = service.import_table(RecordKind::Event, &sheet).await.expect("Import failed.");

	assert_eq!(report.created, 2);
	assert_eq!(report.failed, 0);
	assert_eq!(report.created_slugs, ["swan-lake", "swan-lake-1"]);
	assert!(store.state().inserted.iter().all(|(_, _, _, tiers)| *tiers == 1));
}

#[tokio::test]
async fn taken_slugs_are_skipped() {
	let store = MemoryStore::with_city();

	store.state().slugs.entry(RecordKind::Event).or_default().insert("swan-lake-1".to_string());

	let service = build_service(store);
	let sheet =
		event_sheet(&[("Swan Lake", "moscow"), ("Swan Lake", "moscow"), ("Swan Lake", "moscow")]);
	let report = service.import_table(RecordKind::Event, &sheet).await.expect("Import failed.");

	assert_eq!(report.created_slugs, ["swan-lake", "swan-lake-2", "swan-lake-3"]);
}

#[tokio::test]
async fn failing_rows_are_reported_and_skipped() {
	let store = MemoryStore::with_city();

	store.state().failing_titles.insert("Broken Gala".to_string());

	let service = build_service(store.clone());
	let sheet = event_sheet(&[
		("Opening Night", "moscow"),
		("", "moscow"),
		("Touring Show", "atlantis"),
		("Broken Gala", "moscow"),
		("Closing Night", "moscow"),
	]);
	let report = service.import_table(RecordKind::Event, &sheet).await.expect("Import failed.");
	let failed_rows: Vec<usize> = report.failures.iter().map(|failure| failure.row).collect();

	assert_eq!(report.created, 2);
	assert_eq!(report.failed, 3);
	assert_eq!(failed_rows, [3, 4, 5]);
	assert_eq!(report.failures[0].title, None);
	assert_eq!(report.failures[1].title.as_deref(), Some("Touring Show"));
	assert_eq!(report.created_slugs, ["opening-night", "closing-night"]);
	assert_eq!(store.state().inserted.len(), 2);
}

#[tokio::test]
async fn sheet_without_required_columns_is_rejected() {
	let service = build_service(MemoryStore::with_city());
	let mut no_city = Table::new(&["title", "venue"]);

	no_city.push_row(vec![Cell::text("Swan Lake"), Cell::text("Bolshoi")]);

	let err = service
		.import_table(RecordKind::Event, &no_city)
		.await
		.expect_err("Sheet without a city column must fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");

	let no_name = Table::new(&["city", "address"]);
	let err = service
		.import_table(RecordKind::Venue, &no_name)
		.await
		.expect_err("Sheet without a name column must fail.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn unknown_category_still_creates_the_venue() {
	let store = MemoryStore::with_city();

	store.state().categories.insert("theatre".to_string(), Uuid::from_u128(7));

	let service = build_service(store.clone());
	let mut sheet = Table::new(&["name", "city", "category", "latitude"]);

	sheet.push_row(vec![
		Cell::text("Bolshoi Theatre"),
		Cell::text("moscow"),
		Cell::text("Theatre"),
		Cell::Number(55.76),
	]);
	sheet.push_row(vec![
		Cell::text("Jazz Loft"),
		Cell::text("moscow"),
		Cell::text("jazz-bars"),
		Cell::Empty,
	]);

	let report = service.import_table(RecordKind::Venue, &sheet).await.expect("Import failed.");
	let state = store.state();

	assert_eq!(report.created, 2);
	assert_eq!(report.created_slugs, ["bolshoi-theatre", "jazz-loft"]);
	assert_eq!(
		state.inserted_venue_refs,
		[(Some(Uuid::from_u128(1)), Some(Uuid::from_u128(7))), (Some(Uuid::from_u128(1)), None)]
	);
}

#[tokio::test]
async fn slugs_are_transliterated_or_fall_back_to_the_kind() {
	let store = MemoryStore::with_city();
	let service = build_service(store);
	let mut sheet = Table::new(&["title", "city", "slug"]);

	sheet.push_row(vec![Cell::text("Концерт в Москве"), Cell::text("moscow"), Cell::Empty]);
	sheet.push_row(vec![Cell::text("!!!"), Cell::text("moscow"), Cell::Empty]);
	sheet.push_row(vec![Cell::text("Anything"), Cell::text("moscow"), Cell::text("Summer Fest")]);

	let report = service.import_table(RecordKind::Event, &sheet).await.expect("Import failed.");

	assert_eq!(report.created_slugs, ["kontsert-v-moskve", "event", "summer-fest"]);
}

#[tokio::test]
async fn export_lists_every_event_in_column_order() {
	let store = MemoryStore::with_city();

	store.state().event_exports.push(EventExportRow {
		slug: "swan-lake".to_string(),
		title: "Swan Lake".to_string(),
		description: None,
		image_url: None,
		city: Some("Moscow".to_string()),
		venue: Some("Bolshoi".to_string()),
		category: None,
		starts_at: None,
		ends_at: None,
		price_from: Some(1_500.0),
		is_popular: true,
		is_actual: true,
		view_count: 42,
		tags: vec!["ballet".to_string(), "classic".to_string()],
	});

	let service = build_service(store);
	let table = service.export_table(RecordKind::Event).await.expect("Export failed.");

	assert_eq!(table.headers, EVENT_COLUMNS);
	assert_eq!(table.rows.len(), 1);
	assert_eq!(table.rows[0][0], Cell::text("swan-lake"));
	assert_eq!(table.rows[0][9], Cell::Number(1_500.0));
	assert_eq!(table.rows[0][12], Cell::Number(42.0));

	let empty = service.export_table(RecordKind::Venue).await.expect("Export failed.");

	assert!(empty.rows.is_empty());
}
