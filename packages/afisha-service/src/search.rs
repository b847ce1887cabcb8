use serde::{Deserialize, Serialize};
use tracing::debug;

use afisha_domain::search::{self, Page, ResultType, SearchFilters, SearchResult};

use crate::{AfishaService, Error, Result};

pub type SearchResponse = Page<SearchResult>;

/// Raw search parameters as they arrive in a query string.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SearchRequest {
	#[serde(default)]
	pub q: Option<String>,
	#[serde(default)]
	pub city: Option<String>,
	#[serde(default, rename = "type")]
	pub kind: Option<String>,
	/// Comma separated category slugs.
	#[serde(default)]
	pub subcategories: Option<String>,
	#[serde(default)]
	pub page: Option<u32>,
	#[serde(default)]
	pub page_size: Option<u32>,
}

impl AfishaService {
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let filters = SearchFilters::parse(
			req.q.as_deref(),
			req.city.as_deref(),
			req.kind.as_deref(),
			req.subcategories.as_deref(),
		)
		.map_err(|err| Error::invalid(err.to_string()))?;
		let cap = self.cfg.search.fetch_cap;
		let page = req.page.unwrap_or(1);
		let page_size = req.page_size.unwrap_or(self.cfg.search.page_size);

		if page == 0 {
			return Err(Error::invalid("page must be at least 1."));
		}
		if page_size == 0 || page_size > cap {
			return Err(Error::invalid(format!("page_size must be between 1 and {cap}.")));
		}

		let store = &self.stores.search;
		let events = if filters.includes(ResultType::Event) {
			store.events(&filters, cap).await?
		} else {
			Vec::new()
		};
		let places = if filters.includes(ResultType::Place) {
			store.places(&filters, cap).await?
		} else {
			Vec::new()
		};
		let posts =
			if filters.includes(ResultType::Blog) { store.posts(&filters, cap).await? } else { Vec::new() };

		debug!(
			events = events.len(),
			places = places.len(),
			posts = posts.len(),
			cap,
			"Search candidates fetched."
		);

		let results = search::merge_results(events, places, posts, cap as usize);

		Ok(search::paginate(&results, page, page_size))
	}
}
