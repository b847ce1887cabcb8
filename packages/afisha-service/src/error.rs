pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub(crate) fn not_found(message: impl Into<String>) -> Self {
		Self::NotFound { message: message.into() }
	}
}
impl From<afisha_storage::Error> for Error {
	fn from(err: afisha_storage::Error) -> Self {
		match err {
			afisha_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			afisha_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			afisha_storage::Error::NotFound(message) => Self::NotFound { message },
			afisha_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}
