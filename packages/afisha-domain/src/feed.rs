//! Infinite-scroll view over one search result set.
//!
//! Every filter change starts a new generation. Only the response that belongs to the latest
//! generation is accepted, so a slow response for stale filters can never overwrite newer
//! results. A failed fetch leaves the feed empty.

/// Handle for one in-flight fetch.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FeedTicket {
	generation: u64,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeedUpdate {
	Accepted { total: usize },
	/// Empty because the fetch failed.
	Degraded,
	/// Superseded by a newer generation; the response was dropped.
	Stale,
}

#[derive(Debug)]
pub struct ResultFeed<T> {
	generation: u64,
	items: Vec<T>,
	visible: usize,
	page_size: usize,
	loading: bool,
}
impl<T> ResultFeed<T> {
	pub fn new(page_size: usize) -> Self {
		Self {
			generation: 0,
			items: Vec::new(),
			visible: 0,
			page_size: page_size.max(1),
			loading: false,
		}
	}

	/// Cancels whatever is in flight and clears the feed.
	pub fn begin(&mut self) -> FeedTicket {
		self.generation += 1;
		self.items.clear();
		self.visible = 0;
		self.loading = true;

		FeedTicket { generation: self.generation }
	}

	pub fn is_current(&self, ticket: FeedTicket) -> bool {
		ticket.generation == self.generation
	}

	pub fn complete<E>(&mut self, ticket: FeedTicket, outcome: Result<Vec<T>, E>) -> FeedUpdate {
		if !self.is_current(ticket) {
			return FeedUpdate::Stale;
		}

		self.loading = false;

		match outcome {
			Ok(items) => {
				self.visible = items.len().min(self.page_size);
				self.items = items;

				FeedUpdate::Accepted { total: self.items.len() }
			},
			Err(_) => {
				self.items.clear();
				self.visible = 0;

				FeedUpdate::Degraded
			},
		}
	}

	/// Reveals the next page. Returns how many items became visible.
	pub fn load_more(&mut self) -> usize {
		if self.loading {
			return 0;
		}

		let next = (self.visible + self.page_size).min(self.items.len());
		let revealed = next - self.visible;

		self.visible = next;

		revealed
	}

	pub fn visible(&self) -> &[T] {
		&self.items[..self.visible]
	}

	pub fn has_more(&self) -> bool {
		self.visible < self.items.len()
	}

	pub fn is_loading(&self) -> bool {
		self.loading
	}

	pub fn total(&self) -> usize {
		self.items.len()
	}
}
