use crate::config::PlantnetSettings;
use crate::error::{Result, TaggerError};
use crate::plantnet::IdentificationResult;
use crate::plantnet::cache::ResultCache;
use crate::plantnet::transport::{HttpTransport, IdentifyRequest, Transport};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://my-api.plantnet.org/v2/identify";
pub const DEFAULT_PROJECT: &str = "all";
pub const DEFAULT_LANG: &str = "en";

/// Value of the `type` query parameter; asks for species keyed by taxon key.
const KEY_TYPE: &str = "tk";

/// Parameters of an identify call.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyOptions {
	pub api_key: String,

	/// Reference flora to match against.
	pub project: String,

	/// Language of the returned common names.
	pub lang: String,

	pub api_url: String,

	/// Cache results here. Without it every call hits the service.
	pub cache_dir: Option<PathBuf>,

	/// Ignore an existing cache entry. The fresh result is still written back.
	pub force: bool,
}

impl IdentifyOptions {
	pub fn new(api_key: impl Into<String>) -> Self {
		IdentifyOptions {
			api_key: api_key.into(),
			project: DEFAULT_PROJECT.to_string(),
			lang: DEFAULT_LANG.to_string(),
			api_url: DEFAULT_API_URL.to_string(),
			cache_dir: None,
			force: false,
		}
	}

	pub fn from_settings(settings: &PlantnetSettings) -> Self {
		IdentifyOptions {
			api_key: settings.api_key.clone(),
			project: settings.project.clone(),
			lang: settings.lang.clone(),
			api_url: settings.api_url.clone(),
			cache_dir: settings.cache_dir.clone(),
			force: false,
		}
	}

	/// Endpoint for the configured project.
	pub fn endpoint(&self) -> String {
		format!("{}/{}", self.api_url.trim_end_matches('/'), self.project)
	}
}

/// Identify client: cache lookup, request, cache write.
#[derive(Debug)]
pub struct PlantNetClient<T: Transport = HttpTransport> {
	options: IdentifyOptions,
	cache: Option<ResultCache>,
	transport: T,
}

impl PlantNetClient<HttpTransport> {
	/// Client over HTTP.
	pub fn new(options: IdentifyOptions) -> Result<Self> {
		Ok(Self::with_transport(options, HttpTransport::new()?))
	}
}

impl<T: Transport> PlantNetClient<T> {
	pub fn with_transport(options: IdentifyOptions, transport: T) -> Self {
		let cache = options.cache_dir.clone().map(ResultCache::new);
		PlantNetClient {
			options,
			cache,
			transport,
		}
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	/// Identify the plant shown in `images`. All images should show the same plant.
	///
	/// The cache entry is keyed by the first image. A non-2xx response is an
	/// error and is never cached.
	pub fn identify(&self, images: &[PathBuf]) -> Result<IdentificationResult> {
		let first = images.first().ok_or(TaggerError::NoImages)?;

		if let Some(ref cache) = self.cache
			&& !self.options.force
			&& let Some(cached) = cache.load(first)?
		{
			tracing::info!("Using cached result for {}", display_name(first));
			return Ok(cached);
		}

		let request = self.build_request(images);
		tracing::debug!(
			"Identifying {} image(s) via {}",
			request.images.len(),
			request.url
		);
		let response = self.transport.send(&request)?;
		tracing::debug!("Identify responded with HTTP {}", response.status);

		if !response.is_success() {
			return Err(TaggerError::ApiStatus {
				status: response.status,
				body: response.body,
			});
		}

		let value: serde_json::Value = serde_json::from_str(&response.body)
			.map_err(|source| TaggerError::ResponseParse { source })?;
		let result = IdentificationResult::from_value(value);

		if let Some(ref cache) = self.cache {
			let path = cache.store(first, &result)?;
			tracing::debug!("Cached result at {}", path.display());
		}

		Ok(result)
	}

	/// Request for the given images with this client's options.
	pub fn build_request(&self, images: &[PathBuf]) -> IdentifyRequest {
		IdentifyRequest {
			url: self.options.endpoint(),
			query: vec![
				("api-key".to_string(), self.options.api_key.clone()),
				("lang".to_string(), self.options.lang.clone()),
				("type".to_string(), KEY_TYPE.to_string()),
			],
			images: images.to_vec(),
		}
	}
}

/// Identify `images` over HTTP in one call.
pub fn identify(images: &[PathBuf], options: IdentifyOptions) -> Result<IdentificationResult> {
	PlantNetClient::new(options)?.identify(images)
}

fn display_name(path: &std::path::Path) -> String {
	path.file_name()
		.map(|name| name.to_string_lossy().to_string())
		.unwrap_or_else(|| path.display().to_string())
}
