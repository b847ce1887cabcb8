pub mod sheet;

mod error;

pub use error::{Error, Result};

use std::{
	fs,
	path::{Path, PathBuf},
};

use clap::{Parser, Subcommand, ValueEnum};
use time::OffsetDateTime;

use afisha_cli::ConfigArgs;
use afisha_domain::{export, import::RecordKind};
use afisha_service::{AfishaService, ImportReport};
use afisha_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = afisha_cli::VERSION,
	rename_all = "kebab",
	styles = afisha_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: ConfigArgs,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
	/// Create one record per row of the first worksheet.
	Import {
		kind: Kind,
		#[arg(long, value_name = "FILE")]
		file: PathBuf,
	},
	/// Write every record to a new timestamped workbook.
	Export {
		kind: Kind,
		/// Defaults to `loader.export_dir`.
		#[arg(long, value_name = "DIR")]
		out_dir: Option<PathBuf>,
	},
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Kind {
	Events,
	Venues,
}
impl From<Kind> for RecordKind {
	fn from(kind: Kind) -> Self {
		match kind {
			Kind::Events => Self::Event,
			Kind::Venues => Self::Venue,
		}
	}
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = afisha_config::load(&args.config.config)?;

	afisha_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	let export_dir = PathBuf::from(&config.loader.export_dir);
	let service = AfishaService::new(config, db);

	match args.command {
		Command::Import { kind, file } => {
			let report = import_file(&service, kind.into(), &file).await?;

			println!("{}", serde_json::to_string_pretty(&report)?);
		},
		Command::Export { kind, out_dir } => {
			let dir = out_dir.unwrap_or(export_dir);
			let (path, rows) =
				export_file(&service, kind.into(), &dir, OffsetDateTime::now_utc()).await?;

			println!("Exported {rows} rows to {}.", path.display());
		},
	}

	Ok(())
}

pub async fn import_file(
	service: &AfishaService,
	kind: RecordKind,
	path: &Path,
) -> color_eyre::Result<ImportReport> {
	let table = sheet::read_table(path)?;

	tracing::info!(
		kind = kind.as_str(),
		file = %path.display(),
		rows = table.rows.len(),
		"Sheet loaded."
	);

	Ok(service.import_table(kind, &table).await?)
}

/// Returns the written path and the number of data rows.
pub async fn export_file(
	service: &AfishaService,
	kind: RecordKind,
	dir: &Path,
	now: OffsetDateTime,
) -> color_eyre::Result<(PathBuf, usize)> {
	let table = service.export_table(kind).await?;

	fs::create_dir_all(dir)?;

	let path = dir.join(export::export_file_name(kind, now));

	sheet::write_table(&table, &path)?;

	tracing::info!(kind = kind.as_str(), file = %path.display(), rows = table.rows.len(), "Export written.");

	Ok((path, table.rows.len()))
}
