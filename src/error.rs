use thiserror::Error;

/// Errors from the note store and settings layers. Graph operations themselves
/// never fail.
#[derive(Debug, Error)]
pub enum Error {
	#[error("note store unavailable: {0}")]
	Store(String),
	#[error("failed to decode stored data: {0}")]
	Decode(#[from] serde_json::Error),
	#[error("invalid settings path `{0}`")]
	InvalidPath(String),
	#[error("invalid layout settings: {0}")]
	InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, Error>;
