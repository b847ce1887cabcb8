use time::Duration;

use afisha_domain::catalog::{BlockType, ContentType, SourceKind};
use afisha_service::{BlockRequest, Error};

use super::{MemoryStore, build_service, item, live_slot};

fn request(block_type: BlockType) -> BlockRequest {
	BlockRequest { city_slug: "moscow".to_string(), block_type }
}

#[tokio::test]
async fn block_holds_at_most_page_size_items() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		for seed in 100..112 {
			state.content.insert((SourceKind::Event, uuid::Uuid::from_u128(seed)), item(SourceKind::Event, seed));
			state.slots.push(live_slot(BlockType::PopularEvents, ContentType::Event, seed, 0));
		}

		state.organic.insert(BlockType::PopularEvents, (0..20).map(|seed| item(SourceKind::Event, seed)).collect());
	}

	let service = build_service(store.clone());
	let block = service.block(request(BlockType::PopularEvents)).await.expect("Block request failed.");

	assert_eq!(block.items.len(), 8);
	assert!(block.items.iter().all(|item| item.is_sponsored));
	assert!(store.state().organic_requests.is_empty());
}

#[tokio::test]
async fn sponsored_items_lead_in_slot_order() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		for (seed, sort_order) in [(100, 1), (101, 5), (102, 3)] {
			state.content.insert((SourceKind::Venue, uuid::Uuid::from_u128(seed)), item(SourceKind::Venue, seed));
			state.slots.push(live_slot(BlockType::PopularVenues, ContentType::Venue, seed, sort_order));
		}

		state.organic.insert(
			BlockType::PopularVenues,
			[101, 0, 1, 2, 3, 4, 5, 6, 7].into_iter().map(|seed| item(SourceKind::Venue, seed)).collect(),
		);
	}

	let service = build_service(store.clone());
	let block = service.block(request(BlockType::PopularVenues)).await.expect("Block request failed.");
	let ids: Vec<u128> = block.items.iter().map(|item| item.id.as_u128()).collect();
	let first_organic = block.items.iter().position(|item| !item.is_sponsored).expect("Organic items.");

	assert_eq!(ids, [101, 102, 100, 0, 1, 2, 3, 4]);
	assert_eq!(first_organic, 3);
	assert!(block.items[first_organic..].iter().all(|item| !item.is_sponsored));
	assert_eq!(store.state().organic_requests, [8]);
}

#[tokio::test]
async fn dangling_slots_are_skipped_and_backfilled() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		state.content.insert((SourceKind::Event, uuid::Uuid::from_u128(100)), item(SourceKind::Event, 100));

		// Only the first slot points at existing content.
		for (seed, sort_order) in [(100, 9), (200, 8), (201, 7)] {
			state.slots.push(live_slot(BlockType::PopularEvents, ContentType::Event, seed, sort_order));
		}

		state.organic.insert(BlockType::PopularEvents, (0..20).map(|seed| item(SourceKind::Event, seed)).collect());
	}

	let service = build_service(store);
	let block = service.block(request(BlockType::PopularEvents)).await.expect("Block request failed.");

	assert_eq!(block.items.len(), 8);
	assert_eq!(block.items[0].id.as_u128(), 100);
	assert!(block.items[0].is_sponsored);
	assert_eq!(block.items.iter().filter(|item| item.is_sponsored).count(), 1);
}

#[tokio::test]
async fn inactive_and_expired_slots_are_ignored() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();
		let mut inactive = live_slot(BlockType::Services, ContentType::Service, 100, 5);
		let mut expired = live_slot(BlockType::Services, ContentType::Service, 101, 5);
		let mut other_city = live_slot(BlockType::Services, ContentType::Service, 102, 5);

		inactive.is_active = false;
		expired.ends_at = expired.starts_at + Duration::hours(1);
		other_city.city_slug = "spb".to_string();

		for slot in [inactive, expired, other_city] {
			state.content.insert((SourceKind::Service, slot.content_id), item(SourceKind::Service, slot.content_id.as_u128()));
			state.slots.push(slot);
		}

		state.organic.insert(BlockType::Services, (0..3).map(|seed| item(SourceKind::Service, seed)).collect());
	}

	let service = build_service(store);
	let block = service.block(request(BlockType::Services)).await.expect("Block request failed.");

	assert_eq!(block.items.len(), 3);
	assert!(block.items.iter().all(|item| !item.is_sponsored));
}

#[tokio::test]
async fn category_block_mixes_sponsored_category_with_ranking() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		state.content.insert((SourceKind::Category, uuid::Uuid::from_u128(5)), item(SourceKind::Category, 5));
		state.slots.push(live_slot(BlockType::Categories, ContentType::Category, 5, 1));
		state.organic.insert(BlockType::Categories, (0..10).map(|seed| item(SourceKind::Category, seed)).collect());
	}

	let service = build_service(store);
	let block = service.block(request(BlockType::Categories)).await.expect("Block request failed.");
	let ids: Vec<u128> = block.items.iter().map(|item| item.id.as_u128()).collect();

	assert_eq!(ids, [5, 0, 1, 2, 3, 4, 6, 7]);
}

#[tokio::test]
async fn city_is_matched_by_name_too() {
	let store = MemoryStore::with_city();

	store.state().organic.insert(BlockType::Collections, vec![item(SourceKind::Collection, 1)]);

	let service = build_service(store);
	let block = service
		.block(BlockRequest { city_slug: " Moscow ".to_string(), block_type: BlockType::Collections })
		.await
		.expect("Block request failed.");

	assert_eq!(block.city, "moscow");
	assert_eq!(block.items.len(), 1);
}

#[tokio::test]
async fn unknown_city_is_not_found() {
	let service = build_service(MemoryStore::with_city());
	let err = service
		.block(BlockRequest { city_slug: "atlantis".to_string(), block_type: BlockType::Services })
		.await
		.expect_err("Unknown city must fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
}

#[tokio::test]
async fn repeated_sponsored_content_still_fills_the_block() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		state.content.insert((SourceKind::Event, uuid::Uuid::from_u128(100)), item(SourceKind::Event, 100));

		for copy in 0..8 {
			let mut slot = live_slot(BlockType::PopularEvents, ContentType::Event, 100, 0);

			slot.slot_id = uuid::Uuid::from_u128(50_000 + copy);

			state.slots.push(slot);
		}

		state.organic.insert(BlockType::PopularEvents, (0..20).map(|seed| item(SourceKind::Event, seed)).collect());
	}

	let service = build_service(store.clone());
	let block = service.block(request(BlockType::PopularEvents)).await.expect("Block request failed.");
	let ids: Vec<u128> = block.items.iter().map(|item| item.id.as_u128()).collect();

	assert_eq!(ids, [100, 0, 1, 2, 3, 4, 5, 6]);
	assert_eq!(block.items.iter().filter(|item| item.is_sponsored).count(), 1);
	assert_eq!(store.state().organic_requests, [8]);
}

#[tokio::test]
async fn blank_city_uses_the_default_city() {
	let store = MemoryStore::with_city();

	store.state().organic.insert(BlockType::Services, vec![item(SourceKind::Service, 1)]);

	let service = build_service(store);
	let block = service
		.block(BlockRequest { city_slug: "  ".to_string(), block_type: BlockType::Services })
		.await
		.expect("Block request failed.");

	assert_eq!(block.city, "moscow");
	assert_eq!(block.items.len(), 1);
}

#[tokio::test]
async fn slots_outside_their_window_are_dropped_even_if_the_store_returns_them() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();
		let live = live_slot(BlockType::PopularVenues, ContentType::Venue, 100, 1);
		let mut inactive = live_slot(BlockType::PopularVenues, ContentType::Venue, 101, 3);
		let mut upcoming = live_slot(BlockType::PopularVenues, ContentType::Venue, 102, 2);

		inactive.is_active = false;
		upcoming.starts_at = upcoming.ends_at - Duration::hours(1);

		for slot in [live, inactive, upcoming] {
			state.content.insert((SourceKind::Venue, slot.content_id), item(SourceKind::Venue, slot.content_id.as_u128()));
			state.slots.push(slot);
		}

		state.unfiltered_slots = true;
		state.organic.insert(BlockType::PopularVenues, (0..2).map(|seed| item(SourceKind::Venue, seed)).collect());
	}

	let service = build_service(store);
	let block = service.block(request(BlockType::PopularVenues)).await.expect("Block request failed.");
	let ids: Vec<u128> = block.items.iter().map(|item| item.id.as_u128()).collect();

	assert_eq!(ids, [100, 0, 1]);
	assert!(block.items[0].is_sponsored);
}
