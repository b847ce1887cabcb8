use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// Named homepage section filled by the aggregator.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
	PopularEvents,
	PopularVenues,
	Services,
	Categories,
	Collections,
	BlogPosts,
}
impl BlockType {
	pub const ALL: [Self; 6] = [
		Self::PopularEvents,
		Self::PopularVenues,
		Self::Services,
		Self::Categories,
		Self::Collections,
		Self::BlogPosts,
	];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::PopularEvents => "popular_events",
			Self::PopularVenues => "popular_venues",
			Self::Services => "services",
			Self::Categories => "categories",
			Self::Collections => "collections",
			Self::BlogPosts => "blog_posts",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|block| block.as_str().eq_ignore_ascii_case(raw))
	}

	/// Record kind the organic backfill draws from.
	pub fn organic_kind(self) -> SourceKind {
		match self {
			Self::PopularEvents => SourceKind::Event,
			Self::PopularVenues => SourceKind::Venue,
			Self::Services => SourceKind::Service,
			Self::Categories => SourceKind::Category,
			Self::Collections => SourceKind::Collection,
			Self::BlogPosts => SourceKind::BlogPost,
		}
	}
}

/// Kinds of content a sponsored slot may pin.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
	Event,
	Venue,
	Service,
	Category,
}
impl ContentType {
	pub const ALL: [Self; 4] = [Self::Event, Self::Venue, Self::Service, Self::Category];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Event => "event",
			Self::Venue => "venue",
			Self::Service => "service",
			Self::Category => "category",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
	}

	pub fn source_kind(self) -> SourceKind {
		match self {
			Self::Event => SourceKind::Event,
			Self::Venue => SourceKind::Venue,
			Self::Service => SourceKind::Service,
			Self::Category => SourceKind::Category,
		}
	}
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
	Event,
	Venue,
	Service,
	Category,
	Collection,
	BlogPost,
}

/// Presentation projection shared by every block type. Built per request.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct CatalogItem {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub description: Option<String>,
	pub image_url: Option<String>,
	pub price: Option<f64>,
	pub location_label: Option<String>,
	pub source_kind: SourceKind,
	pub is_sponsored: bool,
}
impl CatalogItem {
	pub fn identity(&self) -> (SourceKind, Uuid) {
		(self.source_kind, self.id)
	}
}

/// A slot is live when switched on and `starts_at <= now <= ends_at`.
pub fn slot_is_live(
	is_active: bool,
	starts_at: OffsetDateTime,
	ends_at: OffsetDateTime,
	now: OffsetDateTime,
) -> bool {
	is_active && starts_at <= now && now <= ends_at
}

/// Number of organic candidates to request once `resolved` sponsored items are known.
///
/// Asks for the shortfall plus `resolved` extra rows, since every sponsored item may also
/// appear in the organic ranking and be removed by deduplication.
pub fn organic_request_size(page_size: u32, resolved: usize) -> u32 {
	let resolved = u32::try_from(resolved).unwrap_or(u32::MAX).min(page_size);
	let shortfall = page_size - resolved;

	if shortfall == 0 { 0 } else { shortfall + resolved }
}

/// Merges sponsored and organic items into one block.
///
/// Sponsored items keep their slot order and come first. Duplicates are removed by
/// `(source_kind, id)`, keeping the earliest occurrence. The result never exceeds `page_size`.
pub fn assemble_block(
	sponsored: Vec<CatalogItem>,
	organic: Vec<CatalogItem>,
	page_size: u32,
) -> Vec<CatalogItem> {
	let limit = page_size as usize;
	let mut seen = HashSet::new();
	let mut block = Vec::with_capacity(limit);

	for mut item in sponsored {
		if block.len() >= limit {
			break;
		}
		if !seen.insert(item.identity()) {
			continue;
		}

		item.is_sponsored = true;

		block.push(item);
	}
	for mut item in organic {
		if block.len() >= limit {
			break;
		}
		if !seen.insert(item.identity()) {
			continue;
		}

		item.is_sponsored = false;

		block.push(item);
	}

	block
}
