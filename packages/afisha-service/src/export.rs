use tracing::info;

use afisha_domain::{export, import::RecordKind, table::Table};

use crate::{AfishaService, Result};

impl AfishaService {
	/// Every record of `kind` as a sheet with the fixed export columns.
	pub async fn export_table(&self, kind: RecordKind) -> Result<Table> {
		let store = &self.stores.records;
		let table = match kind {
			RecordKind::Event => export::events_table(&store.export_events().await?),
			RecordKind::Venue => export::venues_table(&store.export_venues().await?),
		};

		info!(kind = kind.as_str(), rows = table.rows.len(), "Export table built.");

		Ok(table)
	}
}
