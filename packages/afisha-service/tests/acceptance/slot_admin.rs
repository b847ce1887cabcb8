use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use afisha_domain::catalog::{BlockType, SourceKind};
use afisha_service::{BlockRequest, CreateSlotRequest, Error};

use super::{MemoryStore, build_service, item};

fn create_request(content_id: u128) -> CreateSlotRequest {
	let now = OffsetDateTime::now_utc();

	CreateSlotRequest {
		block_type: "popular_events".to_string(),
		city: "Moscow".to_string(),
		content_type: "event".to_string(),
		content_id: Uuid::from_u128(content_id),
		sort_order: 10,
		starts_at: now - Duration::hours(1),
		ends_at: now + Duration::days(7),
	}
}

fn store_with_event(seed: u128) -> std::sync::Arc<MemoryStore> {
	let store = MemoryStore::with_city();

	store.state().content.insert((SourceKind::Event, Uuid::from_u128(seed)), item(SourceKind::Event, seed));

	store
}

#[tokio::test]
async fn created_slot_leads_the_block_until_deactivated() {
	let store = store_with_event(500);

	store
		.state()
		.organic
		.insert(BlockType::PopularEvents, (0..10).map(|seed| item(SourceKind::Event, seed)).collect());

	let service = build_service(store);
	let slot = service.create_slot(create_request(500)).await.expect("Slot creation failed.");

	assert_eq!(slot.city_slug, "moscow");
	assert_eq!(slot.block_type, BlockType::PopularEvents);
	assert!(slot.is_active);

	let listed = service.list_slots("moscow").await.expect("Listing failed.");

	assert_eq!(listed.slots, [slot.clone()]);

	let request = BlockRequest { city_slug: "moscow".to_string(), block_type: BlockType::PopularEvents };
	let block = service.block(request.clone()).await.expect("Block request failed.");

	assert_eq!(block.items[0].id, Uuid::from_u128(500));
	assert!(block.items[0].is_sponsored);

	let deactivated = service.deactivate_slot(slot.slot_id).await.expect("Deactivation failed.");

	assert!(!deactivated.is_active);

	let block = service.block(request).await.expect("Block request failed.");

	assert!(block.items.iter().all(|item| !item.is_sponsored));
	assert_eq!(block.items.len(), 8);
}

#[tokio::test]
async fn malformed_slots_are_invalid() {
	let service = build_service(store_with_event(500));
	let mut bad_block = create_request(500);
	let mut bad_content = create_request(500);
	let mut inverted = create_request(500);

	bad_block.block_type = "banners".to_string();
	bad_content.content_type = "collection".to_string();
	inverted.ends_at = inverted.starts_at - Duration::minutes(1);

	for req in [bad_block, bad_content, inverted] {
		let err = service.create_slot(req).await.expect_err("Malformed slot must fail.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	}
}

#[tokio::test]
async fn slots_must_point_at_existing_city_and_content() {
	let store = store_with_event(500);
	let service = build_service(store.clone());
	let mut unknown_city = create_request(500);

	unknown_city.city = "atlantis".to_string();

	for req in [unknown_city, create_request(501)] {
		let err = service.create_slot(req).await.expect_err("Dangling slot must fail.");

		assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
	}

	assert!(store.state().slots.is_empty());
}

#[tokio::test]
async fn unknown_slot_cannot_be_deactivated() {
	let service = build_service(MemoryStore::with_city());
	let err = service
		.deactivate_slot(Uuid::from_u128(42))
		.await
		.expect_err("Unknown slot must fail.");

	assert!(matches!(err, Error::NotFound { .. }), "Unexpected error: {err:?}");
}
