use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub catalog: Catalog,
	#[serde(default)]
	pub search: Search,
	#[serde(default)]
	pub loader: Loader,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub admin_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

/// Homepage block assembly.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Catalog {
	/// Maximum number of items in one block, sponsored and organic combined.
	pub page_size: u32,
	pub default_city: String,
}
impl Default for Catalog {
	fn default() -> Self {
		Self { page_size: 8, default_city: "moscow".to_string() }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Search {
	/// Upper bound on merged results per query. Pages past this bound are unreachable.
	pub fetch_cap: u32,
	pub page_size: u32,
}
impl Default for Search {
	fn default() -> Self {
		Self { fetch_cap: 100, page_size: 12 }
	}
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Loader {
	pub export_dir: String,
}
impl Default for Loader {
	fn default() -> Self {
		Self { export_dir: "exports".to_string() }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// Developer key expected in the `key` query parameter of admin requests.
	pub admin_key: Option<String>,
}
