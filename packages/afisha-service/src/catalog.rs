use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{debug, warn};

use afisha_domain::catalog::{self, BlockType, CatalogItem};

use crate::{AfishaService, Error, Result};

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BlockRequest {
	pub city_slug: String,
	pub block_type: BlockType,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BlockResponse {
	pub city: String,
	pub block_type: BlockType,
	pub items: Vec<CatalogItem>,
}

impl AfishaService {
	/// Fills one homepage block: live sponsored slots first, then organic backfill.
	///
	/// A blank city slug falls back to `catalog.default_city`.
	pub async fn block(&self, req: BlockRequest) -> Result<BlockResponse> {
		let key = match req.city_slug.trim() {
			"" => self.cfg.catalog.default_city.as_str(),
			key => key,
		};

		if key.is_empty() {
			return Err(Error::invalid("city must not be empty."));
		}

		let store = &self.stores.catalog;
		let city =
			store.find_city(key).await?.ok_or_else(|| Error::not_found(format!("City {key}.")))?;
		let page_size = self.cfg.catalog.page_size;
		let now = OffsetDateTime::now_utc();
		let slots = store.active_slots(req.block_type, &city.slug, now, page_size).await?;
		let mut sponsored = Vec::with_capacity(slots.len());
		let mut seen = HashSet::new();

		for slot in slots.iter().take(page_size as usize) {
			if !catalog::slot_is_live(slot.is_active, slot.starts_at, slot.ends_at, now) {
				continue;
			}

			match store.resolve(slot.content_type, slot.content_id).await? {
				Some(item) if seen.insert(item.identity()) => sponsored.push(item),
				Some(_) => debug!(
					slot_id = %slot.slot_id,
					content_id = %slot.content_id,
					"Sponsored slot repeats content already in the block."
				),
				None => warn!(
					slot_id = %slot.slot_id,
					block_type = req.block_type.as_str(),
					city = city.slug.as_str(),
					content_type = slot.content_type.as_str(),
					content_id = %slot.content_id,
					"Sponsored slot references missing content; skipping it."
				),
			}
		}

		let request = catalog::organic_request_size(page_size, sponsored.len());
		let organic = if request == 0 {
			Vec::new()
		} else {
			store.organic(req.block_type, &city, request).await?
		};
		let items = catalog::assemble_block(sponsored, organic, page_size);

		Ok(BlockResponse { city: city.slug, block_type: req.block_type, items })
	}
}
