use crate::config::parser::{parse_config_file, parse_config_str};
use crate::config::types::{ConfigLayer, RawConfig, Settings};
use crate::error::{Result, TaggerError};
use std::path::{Path, PathBuf};

/// File name of the per-user config, looked up in the home directory.
pub const USER_CONFIG_FILE: &str = ".phototagger.toml";

/// If truthy, `~/.phototagger.toml` is not loaded.
pub const NO_USER_CONFIG_ENV: &str = "PHOTOTAGGER_NO_USER_CONFIG";

/// Label used as the source path of the built-in defaults.
pub const DEFAULTS_SOURCE: &str = "<built-in defaults>";

const DEFAULTS: &str = include_str!("defaults.toml");

/// Which files to layer on top of the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
	/// Per-user config. Loaded only if the file exists.
	pub user_config: Option<PathBuf>,

	/// Explicit files, loaded last in the given order. Each must exist.
	pub extra_files: Vec<PathBuf>,
}

impl ConfigSources {
	/// Locate the user config in the home directory unless disabled by env var.
	pub fn discover(extra_files: Vec<PathBuf>) -> Result<Self> {
		let user_config = if is_env_truthy(NO_USER_CONFIG_ENV) {
			tracing::debug!("{} is set, skipping user config", NO_USER_CONFIG_ENV);
			None
		} else {
			Some(user_config_path()?)
		};

		Ok(ConfigSources {
			user_config,
			extra_files,
		})
	}
}

/// Load every layer in precedence order: defaults, user file, extra files.
pub fn load_layers(sources: &ConfigSources) -> Result<Vec<ConfigLayer>> {
	let defaults_path = PathBuf::from(DEFAULTS_SOURCE);
	let mut layers = vec![ConfigLayer {
		sections: parse_config_str(DEFAULTS, &defaults_path)?,
		path: defaults_path,
	}];

	if let Some(ref user_config) = sources.user_config {
		if user_config.exists() {
			layers.push(load_layer(user_config)?);
		} else {
			tracing::debug!("No user config at {}", user_config.display());
		}
	}

	for path in &sources.extra_files {
		if !path.exists() {
			return Err(TaggerError::ConfigNotFound { path: path.clone() });
		}
		layers.push(load_layer(path)?);
	}

	Ok(layers)
}

fn load_layer(path: &Path) -> Result<ConfigLayer> {
	tracing::debug!("Loading config {}", path.display());
	Ok(ConfigLayer {
		sections: parse_config_file(path)?,
		path: path.to_path_buf(),
	})
}

/// Merge layers into a single mapping.
///
/// Later layers win per `section.key`; keys a later layer doesn't mention keep
/// their earlier value.
pub fn merge_layers(layers: &[ConfigLayer]) -> RawConfig {
	let mut merged = RawConfig::new();

	for layer in layers {
		for (section, values) in &layer.sections {
			let target = merged.entry(section.clone()).or_default();
			for (key, value) in values {
				target.insert(key.clone(), value.clone());
			}
		}
	}

	merged
}

/// Load, merge and validate the configuration.
pub fn read_config(sources: &ConfigSources) -> Result<Settings> {
	let layers = load_layers(sources)?;
	let merged = merge_layers(&layers);
	let loaded_from = layers.into_iter().map(|layer| layer.path).collect();
	Settings::from_raw(merged, loaded_from)
}

/// Get the path to the user's config file.
pub fn user_config_path() -> Result<PathBuf> {
	let home_dir = dirs::home_dir().ok_or(TaggerError::HomeDirectoryNotFound)?;
	Ok(home_dir.join(USER_CONFIG_FILE))
}

/// Check if an environment variable is set to a truthy value.
fn is_env_truthy(var_name: &str) -> bool {
	match std::env::var(var_name) {
		Ok(value) => {
			let lower = value.to_lowercase();
			!value.is_empty() && lower != "0" && lower != "false" && lower != "no"
		}
		Err(_) => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::validate::Problem;
	use std::fs;

	fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
		let path = dir.join(name);
		fs::write(&path, content).unwrap();
		path
	}

	const COMPLETE: &str = r#"
[general]
input_dir = "/photos"

[plantnet]
api_key = "first-key"
cache_dir = "/tmp/plantnet-cache"
"#;

	#[test]
	fn test_read_config_complete() {
		let temp_dir = tempfile::tempdir().unwrap();
		let file = write(temp_dir.path(), "a.toml", COMPLETE);

		let settings = read_config(&ConfigSources {
			user_config: None,
			extra_files: vec![file.clone()],
		})
		.unwrap();

		assert_eq!(settings.general.input_dir, PathBuf::from("/photos"));
		assert_eq!(
			settings.plantnet.cache_dir,
			Some(PathBuf::from("/tmp/plantnet-cache"))
		);
		assert_eq!(settings.plantnet.api_key, "first-key");
		assert_eq!(settings.plantnet.project, "all");
		assert_eq!(settings.sources, vec![PathBuf::from(DEFAULTS_SOURCE), file]);
	}

	#[test]
	fn test_last_file_wins() {
		let temp_dir = tempfile::tempdir().unwrap();
		let user = write(temp_dir.path(), "user.toml", COMPLETE);
		let extra = write(
			temp_dir.path(),
			"extra.toml",
			"[plantnet]\napi_key = \"second-key\"\n",
		);

		let settings = read_config(&ConfigSources {
			user_config: Some(user),
			extra_files: vec![extra],
		})
		.unwrap();

		assert_eq!(settings.plantnet.api_key, "second-key");
		// Untouched keys survive from the earlier layer.
		assert_eq!(settings.general.input_dir, PathBuf::from("/photos"));
		assert_eq!(
			settings.plantnet.cache_dir,
			Some(PathBuf::from("/tmp/plantnet-cache"))
		);
	}

	#[test]
	fn test_padded_value_matches_raw_view() {
		let temp_dir = tempfile::tempdir().unwrap();
		let file = write(temp_dir.path(), "a.toml", COMPLETE);
		let padded = write(
			temp_dir.path(),
			"padded.toml",
			"[plantnet]\napi_key = \" key \"\n",
		);

		let settings = read_config(&ConfigSources {
			user_config: None,
			extra_files: vec![file, padded],
		})
		.unwrap();

		assert_eq!(settings.plantnet.api_key, "key");
		assert_eq!(settings.get("plantnet", "api_key"), Some("key"));
	}

	#[test]
	fn test_missing_user_config_is_skipped() {
		let temp_dir = tempfile::tempdir().unwrap();
		let extra = write(temp_dir.path(), "extra.toml", COMPLETE);

		let layers = load_layers(&ConfigSources {
			user_config: Some(temp_dir.path().join("nope.toml")),
			extra_files: vec![extra],
		})
		.unwrap();

		assert_eq!(layers.len(), 2);
	}

	#[test]
	fn test_missing_extra_file_is_error() {
		let temp_dir = tempfile::tempdir().unwrap();
		let missing = temp_dir.path().join("nope.toml");

		let result = load_layers(&ConfigSources {
			user_config: None,
			extra_files: vec![missing.clone()],
		});

		match result.unwrap_err() {
			TaggerError::ConfigNotFound { path } => assert_eq!(path, missing),
			other => panic!("Expected ConfigNotFound error, got {other:?}"),
		}
	}

	#[test]
	fn test_api_key_left_as_placeholder() {
		let temp_dir = tempfile::tempdir().unwrap();
		let extra = write(
			temp_dir.path(),
			"extra.toml",
			"[general]\ninput_dir = \"/photos\"\n",
		);

		let result = read_config(&ConfigSources {
			user_config: None,
			extra_files: vec![extra],
		});

		match result.unwrap_err() {
			TaggerError::InvalidConfig { report } => {
				assert_eq!(report.issues.len(), 1);
				assert_eq!(report.issues[0].key.to_string(), "plantnet.api_key");
				assert_eq!(report.issues[0].problem, Problem::Placeholder);
			}
			other => panic!("Expected InvalidConfig error, got {other:?}"),
		}
	}

	#[test]
	fn test_defaults_alone_are_invalid() {
		let result = read_config(&ConfigSources::default());

		match result.unwrap_err() {
			TaggerError::InvalidConfig { report } => assert_eq!(report.issues.len(), 2),
			other => panic!("Expected InvalidConfig error, got {other:?}"),
		}
	}

	#[test]
	fn test_merge_layers_adds_new_sections() {
		let mut first = RawConfig::new();
		first
			.entry("general".to_string())
			.or_default()
			.insert("input_dir".to_string(), "/a".to_string());
		let mut second = RawConfig::new();
		second
			.entry("other".to_string())
			.or_default()
			.insert("key".to_string(), "value".to_string());

		let merged = merge_layers(&[
			ConfigLayer {
				sections: first,
				path: PathBuf::from("first.toml"),
			},
			ConfigLayer {
				sections: second,
				path: PathBuf::from("second.toml"),
			},
		]);

		assert_eq!(merged["general"]["input_dir"], "/a");
		assert_eq!(merged["other"]["key"], "value");
	}

	#[test]
	fn test_is_env_truthy() {
		// SAFETY: These env var operations are safe in single-threaded test context
		unsafe {
			std::env::remove_var("TEST_PHOTOTAGGER_ENV_1");
			assert!(!is_env_truthy("TEST_PHOTOTAGGER_ENV_1"));

			std::env::set_var("TEST_PHOTOTAGGER_ENV_2", "");
			assert!(!is_env_truthy("TEST_PHOTOTAGGER_ENV_2"));

			std::env::set_var("TEST_PHOTOTAGGER_ENV_3", "FALSE");
			assert!(!is_env_truthy("TEST_PHOTOTAGGER_ENV_3"));

			std::env::set_var("TEST_PHOTOTAGGER_ENV_4", "no");
			assert!(!is_env_truthy("TEST_PHOTOTAGGER_ENV_4"));

			std::env::set_var("TEST_PHOTOTAGGER_ENV_5", "1");
			assert!(is_env_truthy("TEST_PHOTOTAGGER_ENV_5"));

			for i in 1..=5 {
				std::env::remove_var(format!("TEST_PHOTOTAGGER_ENV_{}", i));
			}
		}
	}

	#[test]
	fn test_user_config_path() {
		let path = user_config_path().unwrap();
		assert!(path.ends_with(".phototagger.toml"));
	}
}
