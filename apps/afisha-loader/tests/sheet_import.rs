use std::{
	env, fs,
	sync::{Arc, Mutex, MutexGuard},
};

use time::{OffsetDateTime, macros::datetime};
use uuid::Uuid;

use afisha_config::{Catalog, Config, Loader, Postgres, Search, Security, Service, Storage};
use afisha_domain::{
	catalog::{BlockType, CatalogItem, ContentType},
	export::{EVENT_COLUMNS, EventExportRow, VenueExportRow},
	import::RecordKind,
	search::{EventHit, PlaceHit, PostHit, SearchFilters},
	table::{Cell, Table},
};
use afisha_loader::sheet;
use afisha_service::{
	AfishaService, BoxFuture, CatalogStore, CityRef, RecordStore, Result, SearchStore, Slot, Stores,
};
use afisha_storage::models::{NewEvent, NewTicketTier, NewVenue};

fn test_config() -> Config {
	Config {
		service: Service {
			http_bind: "127.0.0.1:0".to_string(),
			admin_bind: "127.0.0.1:0".to_string(),
			log_level: "info".to_string(),
		},
		storage: Storage {
			postgres: Postgres {
				dsn: "postgres://afisha@127.0.0.1:1/unused".to_string(),
				pool_max_conns: 1,
			},
		},
		catalog: Catalog::default(),
		search: Search::default(),
		loader: Loader::default(),
		security: Security { bind_localhost_only: true, admin_key: None },
	}
}

fn moscow() -> CityRef {
	CityRef { city_id: Uuid::from_u128(1), slug: "moscow".to_string(), name: "Moscow".to_string() }
}

/// Keeps inserted events and exports them back.
#[derive(Default)]
struct RecordingStore {
	events: Mutex<Vec<(NewEvent, usize)>>,
}
impl RecordingStore {
	fn events(&self) -> MutexGuard<'_, Vec<(NewEvent, usize)>> {
		self.events.lock().unwrap_or_else(|err| err.into_inner())
	}
}

impl CatalogStore for RecordingStore {
	fn find_city<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CityRef>>> {
		Box::pin(async move { Ok(key.eq_ignore_ascii_case("moscow").then(moscow)) })
	}

	fn active_slots<'a>(
		&'a self,
		_block_type: BlockType,
		_city_slug: &'a str,
		_now: OffsetDateTime,
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<Slot>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}

	fn resolve<'a>(
		&'a self,
		_content_type: ContentType,
		_content_id: Uuid,
	) -> BoxFuture<'a, Result<Option<CatalogItem>>> {
		Box::pin(async move { Ok(None) })
	}

	fn organic<'a>(
		&'a self,
		_block_type: BlockType,
		_city: &'a CityRef,
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<CatalogItem>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}

	fn insert_slot<'a>(&'a self, _slot: &'a Slot) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn list_slots<'a>(&'a self, _city_slug: &'a str) -> BoxFuture<'a, Result<Vec<Slot>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}

	fn deactivate_slot<'a>(&'a self, _slot_id: Uuid) -> BoxFuture<'a, Result<Option<Slot>>> {
		Box::pin(async move { Ok(None) })
	}
}

impl SearchStore for RecordingStore {
	fn events<'a>(
		&'a self,
		_filters: &'a SearchFilters,
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<EventHit>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}

	fn places<'a>(
		&'a self,
		_filters: &'a SearchFilters,
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<PlaceHit>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}

	fn posts<'a>(
		&'a self,
		_filters: &'a SearchFilters,
		_limit: u32,
	) -> BoxFuture<'a, Result<Vec<PostHit>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}
}

impl RecordStore for RecordingStore {
	fn find_city<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<CityRef>>> {
		CatalogStore::find_city(self, key)
	}

	fn find_venue<'a>(&'a self, _key: &'a str) -> BoxFuture<'a, Result<Option<Uuid>>> {
		Box::pin(async move { Ok(None) })
	}

	fn find_category<'a>(&'a self, _key: &'a str) -> BoxFuture<'a, Result<Option<Uuid>>> {
		Box::pin(async move { Ok(None) })
	}

	fn slug_exists<'a>(&'a self, kind: RecordKind, slug: &'a str) -> BoxFuture<'a, Result<bool>> {
		let taken =
			kind == RecordKind::Event && self.events().iter().any(|(event, _)| event.slug == slug);

		Box::pin(async move { Ok(taken) })
	}

	fn insert_event<'a>(
		&'a self,
		event: &'a NewEvent,
		tiers: &'a [NewTicketTier],
	) -> BoxFuture<'a, Result<()>> {
		let copy = NewEvent {
			event_id: event.event_id,
			slug: event.slug.clone(),
			title: event.title.clone(),
			description: event.description.clone(),
			image_url: event.image_url.clone(),
			city_id: event.city_id,
			venue_id: event.venue_id,
			category_id: event.category_id,
			starts_at: event.starts_at,
			ends_at: event.ends_at,
			price_from: event.price_from,
			is_popular: event.is_popular,
			is_actual: event.is_actual,
			tags: event.tags.clone(),
		};

		self.events().push((copy, tiers.len()));

		Box::pin(async move { Ok(()) })
	}

	fn insert_venue<'a>(&'a self, _venue: &'a NewVenue) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move { Ok(()) })
	}

	fn export_events(&self) -> BoxFuture<'_, Result<Vec<EventExportRow>>> {
		let rows = self
			.events()
			.iter()
			.map(|(event, _)| EventExportRow {
				slug: event.slug.clone(),
				title: event.title.clone(),
				description: event.description.clone(),
				image_url: event.image_url.clone(),
				city: Some("Moscow".to_string()),
				venue: None,
				category: None,
				starts_at: event.starts_at,
				ends_at: event.ends_at,
				price_from: event.price_from,
				is_popular: event.is_popular,
				is_actual: event.is_actual,
				view_count: 0,
				tags: Vec::new(),
			})
			.collect();

		Box::pin(async move { Ok(rows) })
	}

	fn export_venues(&self) -> BoxFuture<'_, Result<Vec<VenueExportRow>>> {
		Box::pin(async move { Ok(Vec::new()) })
	}
}

fn build_service(store: Arc<RecordingStore>) -> AfishaService {
	AfishaService::with_stores(test_config(), Stores::new(store.clone(), store.clone(), store))
}

#[tokio::test]
async fn workbook_rows_are_imported_and_exported() {
	let dir = env::temp_dir().join(format!("afisha-loader-{}", Uuid::new_v4()));

	fs::create_dir_all(&dir).expect("Failed to create temp dir.");

	let input = dir.join("events.xlsx");
	let mut table = Table::new(&["Title", "City", "Price", "Ticket 1 Name", "Ticket 1 Price"]);

	table.push_row(vec![
		Cell::text("Swan Lake"),
		Cell::text("Moscow"),
		Cell::Number(2_000.0),
		Cell::text("Parterre"),
		Cell::Number(2_000.0),
	]);
	table.push_row(vec![
		Cell::Empty,
		Cell::text("moscow"),
		Cell::Number(500.0),
		Cell::Empty,
		Cell::Empty,
	]);
	table.push_row(vec![
		Cell::text("Swan Lake"),
		Cell::text("moscow"),
		Cell::Empty,
		Cell::Empty,
		Cell::Empty,
	]);

	sheet::write_table(&table, &input).expect("Failed to write sheet.");

	let store = Arc::new(RecordingStore::default());
	let service = build_service(store.clone());
	let report = afisha_loader::import_file(&service, RecordKind::Event, &input)
		.await
		.expect("Import failed.");

	assert_eq!(report.created, 2);
	assert_eq!(report.failed, 1);
	assert_eq!(report.failures[0].row, 3);
	assert_eq!(report.created_slugs, ["swan-lake", "swan-lake-1"]);
	assert_eq!(store.events()[0].0.price_from, Some(2_000.0));
	assert_eq!(store.events()[0].1, 1);

	let (output, rows) = afisha_loader::export_file(
		&service,
		RecordKind::Event,
		&dir.join("out"),
		datetime!(2026-03-14 09:05:07 UTC),
	)
	.await
	.expect("Export failed.");
	let exported = sheet::read_table(&output).expect("Failed to read export.");

	fs::remove_dir_all(&dir).expect("Failed to remove temp dir.");

	assert_eq!(rows, 2);
	assert!(output.ends_with("out/events_export_20260314_090507.xlsx"));
	assert_eq!(exported.headers, EVENT_COLUMNS);
	assert_eq!(exported.rows[1][0], Cell::text("swan-lake-1"));
}
