mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Catalog, Config, Loader, Postgres, Search, Security, Service, Storage};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	for (label, value) in [
		("service.http_bind", &cfg.service.http_bind),
		("service.admin_bind", &cfg.service.admin_bind),
		("storage.postgres.dsn", &cfg.storage.postgres.dsn),
		("catalog.default_city", &cfg.catalog.default_city),
		("loader.export_dir", &cfg.loader.export_dir),
	] {
		if value.trim().is_empty() {
			return Err(Error::Validation { message: format!("{label} must be non-empty.") });
		}
	}

	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.catalog.page_size == 0 {
		return Err(Error::Validation {
			message: "catalog.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.page_size == 0 {
		return Err(Error::Validation {
			message: "search.page_size must be greater than zero.".to_string(),
		});
	}
	if cfg.search.fetch_cap < cfg.search.page_size {
		return Err(Error::Validation {
			message: "search.fetch_cap must be greater than or equal to search.page_size."
				.to_string(),
		});
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.catalog.default_city = cfg.catalog.default_city.trim().to_lowercase();

	if cfg.security.admin_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.security.admin_key = None;
	}
}
