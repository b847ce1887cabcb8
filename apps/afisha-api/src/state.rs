use std::sync::Arc;

use afisha_config::Config;
use afisha_service::AfishaService;
use afisha_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AfishaService>,
}
impl AppState {
	pub async fn new(config: Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		Ok(Self::from_service(AfishaService::new(config, db)))
	}

	pub fn from_service(service: AfishaService) -> Self {
		Self { service: Arc::new(service) }
	}

	pub fn admin_key(&self) -> Option<&str> {
		self.service.cfg.security.admin_key.as_deref()
	}
}
