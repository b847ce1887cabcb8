use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use afisha_domain::catalog::{BlockType, ContentType};

use crate::{AfishaService, Error, Result};

/// A persisted sponsored placement.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Slot {
	pub slot_id: Uuid,
	pub block_type: BlockType,
	pub city_slug: String,
	pub content_type: ContentType,
	pub content_id: Uuid,
	pub sort_order: i32,
	pub is_active: bool,
	#[serde(with = "crate::time_serde")]
	pub starts_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub ends_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CreateSlotRequest {
	pub block_type: String,
	pub city: String,
	pub content_type: String,
	pub content_id: Uuid,
	#[serde(default)]
	pub sort_order: i32,
	#[serde(with = "crate::time_serde")]
	pub starts_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub ends_at: OffsetDateTime,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SlotListResponse {
	pub city: String,
	pub slots: Vec<Slot>,
}

impl AfishaService {
	pub async fn create_slot(&self, req: CreateSlotRequest) -> Result<Slot> {
		let block_type = BlockType::parse(&req.block_type)
			.ok_or_else(|| Error::invalid(format!("Unknown block_type {}.", req.block_type.trim())))?;
		let content_type = ContentType::parse(&req.content_type).ok_or_else(|| {
			Error::invalid(format!("Unknown content_type {}.", req.content_type.trim()))
		})?;

		if req.starts_at > req.ends_at {
			return Err(Error::invalid("starts_at must not be later than ends_at."));
		}

		let store = &self.stores.catalog;
		let city_key = req.city.trim();
		let city = store
			.find_city(city_key)
			.await?
			.ok_or_else(|| Error::not_found(format!("City {city_key}.")))?;

		if store.resolve(content_type, req.content_id).await?.is_none() {
			return Err(Error::not_found(format!(
				"{} {}.",
				content_type.as_str(),
				req.content_id
			)));
		}

		let slot = Slot {
			slot_id: Uuid::new_v4(),
			block_type,
			city_slug: city.slug,
			content_type,
			content_id: req.content_id,
			sort_order: req.sort_order,
			is_active: true,
			starts_at: req.starts_at,
			ends_at: req.ends_at,
			created_at: OffsetDateTime::now_utc(),
		};

		store.insert_slot(&slot).await?;

		info!(
			slot_id = %slot.slot_id,
			block_type = block_type.as_str(),
			city = slot.city_slug.as_str(),
			"Sponsored slot created."
		);

		Ok(slot)
	}

	pub async fn list_slots(&self, city: &str) -> Result<SlotListResponse> {
		let key = city.trim();
		let store = &self.stores.catalog;
		let city =
			store.find_city(key).await?.ok_or_else(|| Error::not_found(format!("City {key}.")))?;
		let slots = store.list_slots(&city.slug).await?;

		Ok(SlotListResponse { city: city.slug, slots })
	}

	pub async fn deactivate_slot(&self, slot_id: Uuid) -> Result<Slot> {
		let slot = self
			.stores
			.catalog
			.deactivate_slot(slot_id)
			.await?
			.ok_or_else(|| Error::not_found(format!("Sponsored slot {slot_id}.")))?;

		info!(slot_id = %slot.slot_id, "Sponsored slot deactivated.");

		Ok(slot)
	}
}
