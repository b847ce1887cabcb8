use std::{cmp::Ordering, collections::BTreeSet};

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, macros::format_description};
use uuid::Uuid;

pub const MAX_QUERY_CHARS: usize = 200;
pub const MAX_SUBCATEGORIES: usize = 32;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultType {
	Event,
	Place,
	Blog,
}
impl ResultType {
	pub const ALL: [Self; 3] = [Self::Event, Self::Place, Self::Blog];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Event => "event",
			Self::Place => "place",
			Self::Blog => "blog",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		let raw = raw.trim();

		Self::ALL.into_iter().find(|kind| kind.as_str().eq_ignore_ascii_case(raw))
	}
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FilterError {
	#[error("type must be one of event, place, or blog.")]
	UnknownType,
	#[error("q must be at most {} characters.", MAX_QUERY_CHARS)]
	QueryTooLong,
	#[error("subcategories must contain at most {} entries.", MAX_SUBCATEGORIES)]
	TooManySubcategories,
}

/// Validated search filters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SearchFilters {
	pub query: Option<String>,
	pub city: Option<String>,
	pub kind: Option<ResultType>,
	/// Category slugs, OR'd.
	pub subcategories: BTreeSet<String>,
}
impl SearchFilters {
	/// Blank values mean "no filter"; `subcategories` is a comma separated list.
	pub fn parse(
		query: Option<&str>,
		city: Option<&str>,
		kind: Option<&str>,
		subcategories: Option<&str>,
	) -> Result<Self, FilterError> {
		let query = non_blank(query).map(collapse_whitespace);

		if query.as_ref().map(|query| query.chars().count() > MAX_QUERY_CHARS).unwrap_or(false) {
			return Err(FilterError::QueryTooLong);
		}

		let kind = match non_blank(kind) {
			Some(raw) => Some(ResultType::parse(raw).ok_or(FilterError::UnknownType)?),
			None => None,
		};
		let subcategories: BTreeSet<String> = subcategories
			.unwrap_or_default()
			.split(',')
			.map(|slug| slug.trim().to_lowercase())
			.filter(|slug| !slug.is_empty())
			.collect();

		if subcategories.len() > MAX_SUBCATEGORIES {
			return Err(FilterError::TooManySubcategories);
		}

		Ok(Self { query, city: non_blank(city).map(str::to_lowercase), kind, subcategories })
	}

	/// Whether records of `kind` take part in this search. Blog posts carry no category, so a
	/// subcategory filter excludes them.
	pub fn includes(&self, kind: ResultType) -> bool {
		if self.kind.map(|selected| selected != kind).unwrap_or(false) {
			return false;
		}

		!(kind == ResultType::Blog && !self.subcategories.is_empty())
	}

	/// `ILIKE` pattern for the query, with `%`, `_` and `\` escaped.
	pub fn like_pattern(&self) -> Option<String> {
		let query = self.query.as_ref()?;
		let mut pattern = String::with_capacity(query.len() + 2);

		pattern.push('%');

		for ch in query.chars() {
			if matches!(ch, '%' | '_' | '\\') {
				pattern.push('\\');
			}

			pattern.push(ch);
		}

		pattern.push('%');

		Some(pattern)
	}

	pub fn subcategory_list(&self) -> Vec<String> {
		self.subcategories.iter().cloned().collect()
	}
}

/// Normalized search hit shared by every record kind.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct SearchResult {
	pub id: Uuid,
	#[serde(rename = "type")]
	pub kind: ResultType,
	pub title: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub image: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub location: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub href: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub actual: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub date: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EventHit {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub image_url: Option<String>,
	pub venue_name: Option<String>,
	pub city_slug: Option<String>,
	pub starts_at: Option<OffsetDateTime>,
	pub is_actual: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaceHit {
	pub id: Uuid,
	pub slug: String,
	pub name: String,
	pub image_url: Option<String>,
	pub address: Option<String>,
	pub city_slug: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PostHit {
	pub id: Uuid,
	pub slug: String,
	pub title: String,
	pub image_url: Option<String>,
	pub published_at: Option<OffsetDateTime>,
}

/// One page of an already capped result set.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Page<T> {
	pub items: Vec<T>,
	pub page: u32,
	pub page_size: u32,
	pub total: u32,
	pub has_more: bool,
}

/// Normalizes and orders hits of all kinds, then caps the union at `cap`.
///
/// Events come first (actual before past, then by start time, undated last), then places by
/// name, then blog posts newest first. Ties break on id, so a frozen dataset always yields the
/// same order.
pub fn merge_results(
	mut events: Vec<EventHit>,
	mut places: Vec<PlaceHit>,
	mut posts: Vec<PostHit>,
	cap: usize,
) -> Vec<SearchResult> {
	events.sort_by(|a, b| {
		b.is_actual
			.cmp(&a.is_actual)
			.then_with(|| cmp_optional_time(a.starts_at, b.starts_at))
			.then_with(|| a.id.cmp(&b.id))
	});
	places.sort_by(|a, b| {
		a.name.to_lowercase().cmp(&b.name.to_lowercase()).then_with(|| a.id.cmp(&b.id))
	});
	posts.sort_by(|a, b| {
		cmp_optional_time_desc(a.published_at, b.published_at).then_with(|| a.id.cmp(&b.id))
	});

	events
		.into_iter()
		.map(event_result)
		.chain(places.into_iter().map(place_result))
		.chain(posts.into_iter().map(post_result))
		.take(cap)
		.collect()
}

/// Slices page `page` (1-based) out of `results`. Page zero is treated as page one.
pub fn paginate<T: Clone>(results: &[T], page: u32, page_size: u32) -> Page<T> {
	let page = page.max(1);
	let page_size = page_size.max(1);
	let start = (page as usize - 1).saturating_mul(page_size as usize);
	let items: Vec<T> = results.iter().skip(start).take(page_size as usize).cloned().collect();
	let has_more = start.saturating_add(items.len()) < results.len();

	Page {
		items,
		page,
		page_size,
		total: u32::try_from(results.len()).unwrap_or(u32::MAX),
		has_more,
	}
}

/// Human readable start time, e.g. `14 March 2026, 19:30`.
pub fn event_date_text(starts_at: OffsetDateTime) -> String {
	let format =
		format_description!("[day padding:none] [month repr:long] [year], [hour]:[minute]");

	starts_at.format(format).unwrap_or_else(|_| starts_at.date().to_string())
}

pub fn event_href(city_slug: &str, slug: &str) -> String {
	format!("/{city_slug}/events/{slug}")
}

pub fn place_href(city_slug: &str, slug: &str) -> String {
	format!("/{city_slug}/places/{slug}")
}

pub fn post_href(slug: &str) -> String {
	format!("/blog/{slug}")
}

fn event_result(hit: EventHit) -> SearchResult {
	SearchResult {
		id: hit.id,
		kind: ResultType::Event,
		href: hit.city_slug.as_deref().map(|city| event_href(city, &hit.slug)),
		title: hit.title,
		image: hit.image_url,
		location: hit.venue_name,
		actual: Some(hit.is_actual),
		date: hit.starts_at.map(event_date_text),
	}
}

fn place_result(hit: PlaceHit) -> SearchResult {
	SearchResult {
		id: hit.id,
		kind: ResultType::Place,
		href: hit.city_slug.as_deref().map(|city| place_href(city, &hit.slug)),
		title: hit.name,
		image: hit.image_url,
		location: hit.address,
		actual: None,
		date: None,
	}
}

fn post_result(hit: PostHit) -> SearchResult {
	SearchResult {
		id: hit.id,
		kind: ResultType::Blog,
		href: Some(post_href(&hit.slug)),
		title: hit.title,
		image: hit.image_url,
		location: None,
		actual: None,
		date: None,
	}
}

/// Ascending, with `None` after every timestamp.
fn cmp_optional_time(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => a.cmp(&b),
		(Some(_), None) => Ordering::Less,
		(None, Some(_)) => Ordering::Greater,
		(None, None) => Ordering::Equal,
	}
}

/// Descending, with `None` still after every timestamp.
fn cmp_optional_time_desc(a: Option<OffsetDateTime>, b: Option<OffsetDateTime>) -> Ordering {
	match (a, b) {
		(Some(a), Some(b)) => b.cmp(&a),
		_ => cmp_optional_time(a, b),
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.map(str::trim).filter(|value| !value.is_empty())
}

fn collapse_whitespace(value: &str) -> String {
	value.split_whitespace().collect::<Vec<_>>().join(" ")
}
