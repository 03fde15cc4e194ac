use crate::config::validate::ValidationReport;
use std::path::PathBuf;

/// Library-level structured errors for phototagger.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum TaggerError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid value for '{key}' in {path}: {reason}")]
	InvalidConfigValue {
		path: PathBuf,
		key: String,
		reason: String,
	},

	#[error("Invalid configuration: {report}")]
	InvalidConfig { report: ValidationReport },

	#[error("Failed to resolve home directory")]
	HomeDirectoryNotFound,

	#[error("No images given to identify")]
	NoImages,

	#[error("Image path has no file name: {path}")]
	InvalidImagePath { path: PathBuf },

	#[error("Failed to open image: {path}")]
	ImageOpen {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to read input directory: {path}")]
	InputDirRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to build HTTP client")]
	HttpClient {
		#[source]
		source: reqwest::Error,
	},

	#[error("Request to {url} failed")]
	Request {
		url: String,
		#[source]
		source: reqwest::Error,
	},

	#[error("Identification service returned HTTP {status}: {body}")]
	ApiStatus { status: u16, body: String },

	#[error("Identification service returned a body that is not JSON")]
	ResponseParse {
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to read cached result: {path}")]
	CacheRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse cached result: {path}")]
	CacheParse {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("Failed to write cached result: {path}")]
	CacheWrite {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Malformed identification result")]
	MalformedResult {
		#[source]
		source: serde_json::Error,
	},
}

/// Result type alias using TaggerError.
pub type Result<T> = std::result::Result<T, TaggerError>;
