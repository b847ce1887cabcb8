#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Sqlx(#[from] sqlx::Error),
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
}
impl Error {
	/// Maps a unique-constraint violation to [`Error::Conflict`], leaving other errors as-is.
	pub fn conflict_on_unique(err: sqlx::Error, what: &str) -> Self {
		match &err {
			sqlx::Error::Database(db_err) if db_err.is_unique_violation() =>
				Self::Conflict(format!("{what} already exists.")),
			_ => Self::Sqlx(err),
		}
	}
}
