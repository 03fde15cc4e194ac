use crate::config::validate::validate;
use crate::error::{Result, TaggerError};
use crate::plantnet::{DEFAULT_API_URL, DEFAULT_LANG, DEFAULT_PROJECT};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Values of one config section, keyed by option name.
pub type Section = BTreeMap<String, String>;

/// Section name to section values. Every value is kept as a trimmed string,
/// the same way an ini file would hold it.
pub type RawConfig = BTreeMap<String, Section>;

/// A parsed config file with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct ConfigLayer {
	/// The parsed sections.
	pub sections: RawConfig,

	/// Where this layer came from.
	pub path: PathBuf,
}

/// Resolved `[general]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneralSettings {
	/// Directory scanned for images.
	pub input_dir: PathBuf,
}

/// Resolved `[plantnet]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantnetSettings {
	pub api_key: String,
	pub lang: String,
	pub project: String,

	/// Base URL of the identify endpoint; the project is appended as a path segment.
	pub api_url: String,

	/// Where raw results are cached. No caching when unset.
	pub cache_dir: Option<PathBuf>,
}

/// Effective configuration after merging and validating every layer.
#[derive(Debug, Clone)]
pub struct Settings {
	pub general: GeneralSettings,
	pub plantnet: PlantnetSettings,

	/// Merged section/key/value mapping, including keys we don't interpret.
	pub raw: RawConfig,

	/// Sources that contributed to `raw`, in load order.
	pub sources: Vec<PathBuf>,
}

impl Settings {
	/// Validate a merged mapping and convert the known keys to their types.
	pub fn from_raw(raw: RawConfig, sources: Vec<PathBuf>) -> Result<Self> {
		let report = validate(&raw);
		if !report.is_ok() {
			return Err(TaggerError::InvalidConfig { report });
		}

		let lookup = |section: &str, key: &str| -> Option<String> {
			raw.get(section)
				.and_then(|values| values.get(key))
				.filter(|value| !value.is_empty())
				.cloned()
		};

		let general = GeneralSettings {
			input_dir: PathBuf::from(lookup("general", "input_dir").unwrap_or_default()),
		};

		let plantnet = PlantnetSettings {
			api_key: lookup("plantnet", "api_key").unwrap_or_default(),
			lang: lookup("plantnet", "lang").unwrap_or_else(|| DEFAULT_LANG.to_string()),
			project: lookup("plantnet", "project").unwrap_or_else(|| DEFAULT_PROJECT.to_string()),
			api_url: lookup("plantnet", "api_url").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
			cache_dir: lookup("plantnet", "cache_dir").map(PathBuf::from),
		};

		Ok(Settings {
			general,
			plantnet,
			raw,
			sources,
		})
	}

	/// Look up a raw value by section and key.
	pub fn get(&self, section: &str, key: &str) -> Option<&str> {
		self.raw
			.get(section)
			.and_then(|values| values.get(key))
			.map(String::as_str)
	}
}
