use std::sync::Arc;

use time::{Duration, macros::datetime};
use uuid::Uuid;

use afisha_domain::search::{EventHit, PlaceHit, PostHit, ResultType};
use afisha_service::{Error, SearchRequest};

use super::{Indexed, MemoryStore, build_service};

fn seeded_store() -> Arc<MemoryStore> {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		for seed in 0..6_u128 {
			let city = if seed % 2 == 0 { "moscow" } else { "spb" };

			state.events.push(Indexed {
				hit: EventHit {
					id: Uuid::from_u128(seed),
					slug: format!("jazz-{seed}"),
					title: format!("Jazz evening {seed}"),
					image_url: None,
					venue_name: Some("Main Hall".to_string()),
					city_slug: Some(city.to_string()),
					starts_at: Some(datetime!(2026-05-01 19:00 UTC) + Duration::days(6 - seed as i64)),
					is_actual: seed != 3,
				},
				text: format!("Jazz evening {seed} live music"),
				city: Some(city.to_string()),
				category: Some(if seed < 3 { "concerts" } else { "theatre" }.to_string()),
			});
		}
		for (seed, name) in [(100_u128, "Jazz Club"), (101, "Art Jazz Cafe")] {
			state.places.push(Indexed {
				hit: PlaceHit {
					id: Uuid::from_u128(seed),
					slug: format!("place-{seed}"),
					name: name.to_string(),
					image_url: None,
					address: Some("Arbat 1".to_string()),
					city_slug: Some("moscow".to_string()),
				},
				text: name.to_string(),
				city: Some("moscow".to_string()),
				category: Some("concerts".to_string()),
			});
		}

		state.posts.push(Indexed {
			hit: PostHit {
				id: Uuid::from_u128(200),
				slug: "jazz-guide".to_string(),
				title: "A guide to jazz".to_string(),
				image_url: None,
				published_at: Some(datetime!(2026-04-01 9:00 UTC)),
			},
			text: "A guide to jazz".to_string(),
			city: None,
			category: None,
		});
	}

	store
}

fn query(q: &str) -> SearchRequest {
	SearchRequest { q: Some(q.to_string()), ..SearchRequest::default() }
}

#[tokio::test]
async fn results_only_carry_known_types() {
	let service = build_service(seeded_store());
	let page = service.search(query("jazz")).await.expect("Search failed.");

	assert_eq!(page.total, 9);
	assert!(page.items.iter().all(|result| ResultType::ALL.contains(&result.kind)));
}

#[tokio::test]
async fn identical_searches_return_identical_order() {
	let service = build_service(seeded_store());
	let first = service.search(query("jazz")).await.expect("Search failed.");
	let second = service.search(query("jazz")).await.expect("Search failed.");

	assert_eq!(first, second);

	let titles: Vec<&str> = first.items.iter().map(|result| result.title.as_str()).collect();

	assert_eq!(
		titles,
		[
			"Jazz evening 5",
			"Jazz evening 4",
			"Jazz evening 2",
			"Jazz evening 1",
			"Jazz evening 0",
			"Jazz evening 3",
			"Art Jazz Cafe",
			"Jazz Club",
			"A guide to jazz",
		]
	);
}

#[tokio::test]
async fn subcategory_filter_skips_blog_posts() {
	let store = seeded_store();
	let service = build_service(store.clone());
	let page = service
		.search(SearchRequest {
			subcategories: Some("concerts".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert!(page.items.iter().all(|result| result.kind != ResultType::Blog));
	assert_eq!(page.total, 5);
	assert!(!store.state().search_calls.contains_key("posts"));
}

#[tokio::test]
async fn type_and_city_narrow_the_search() {
	let store = seeded_store();
	let service = build_service(store.clone());
	let page = service
		.search(SearchRequest {
			city: Some("Moscow".to_string()),
			kind: Some("event".to_string()),
			..SearchRequest::default()
		})
		.await
		.expect("Search failed.");

	assert_eq!(page.total, 3);
	assert!(page.items.iter().all(|result| result.kind == ResultType::Event));
	assert!(page.items.iter().all(|result| result.href.as_deref().unwrap_or("").starts_with("/moscow/")));
	assert!(!store.state().search_calls.contains_key("places"));
}

#[tokio::test]
async fn pages_slice_the_capped_union() {
	let store = MemoryStore::with_city();

	{
		let mut state = store.state();

		for seed in 0..130_u128 {
			state.places.push(Indexed {
				hit: PlaceHit {
					id: Uuid::from_u128(seed),
					slug: format!("hall-{seed}"),
					name: format!("Hall {seed:03}"),
					image_url: None,
					address: None,
					city_slug: Some("moscow".to_string()),
				},
				text: format!("Hall {seed:03}"),
				city: Some("moscow".to_string()),
				category: None,
			});
		}
	}

	let service = build_service(store);
	let first = service.search(SearchRequest::default()).await.expect("Search failed.");
	let last = service
		.search(SearchRequest { page: Some(9), ..SearchRequest::default() })
		.await
		.expect("Search failed.");
	let beyond = service
		.search(SearchRequest { page: Some(10), ..SearchRequest::default() })
		.await
		.expect("Search failed.");

	assert_eq!(first.total, 100);
	assert_eq!(first.page_size, 12);
	assert_eq!(first.items.len(), 12);
	assert!(first.has_more);
	assert_eq!(last.items.len(), 4);
	assert!(!last.has_more);
	assert!(beyond.items.is_empty());
}

#[tokio::test]
async fn invalid_parameters_are_rejected() {
	let service = build_service(seeded_store());

	for req in [
		SearchRequest { kind: Some("venue".to_string()), ..SearchRequest::default() },
		SearchRequest { page: Some(0), ..SearchRequest::default() },
		SearchRequest { page_size: Some(0), ..SearchRequest::default() },
		SearchRequest { page_size: Some(101), ..SearchRequest::default() },
	] {
		let err = service.search(req).await.expect_err("Invalid request must fail.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err:?}");
	}
}
