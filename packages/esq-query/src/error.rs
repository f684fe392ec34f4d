pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid argument: {message}")]
	InvalidArgument { message: String },
	#[error("Invalid configuration: {0}")]
	Configuration(#[from] esq_config::Error),
	#[error(transparent)]
	Json(#[from] serde_json::Error),
	#[error("Invalid request document at {path}: {message}")]
	Document { path: String, message: String },
}
impl Error {
	pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
		Self::InvalidArgument { message: message.into() }
	}
}
