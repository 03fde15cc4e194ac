use crate::config::types::{RawConfig, Section};
use crate::error::{Result, TaggerError};
use std::path::Path;

/// Parse a config file from the given path.
pub fn parse_config_file(path: &Path) -> Result<RawConfig> {
	let content = std::fs::read_to_string(path).map_err(|source| TaggerError::ConfigReadError {
		path: path.to_path_buf(),
		source,
	})?;

	parse_config_str(&content, path)
}

/// Parse a config from a string (useful for testing).
///
/// Only `[section]` tables holding scalar values are accepted. Strings are
/// stored trimmed; other scalars are stored in their TOML text form.
pub fn parse_config_str(content: &str, path: &Path) -> Result<RawConfig> {
	let table: toml::Table =
		toml::from_str(content).map_err(|source| TaggerError::ConfigParseError {
			path: path.to_path_buf(),
			source,
		})?;

	let mut raw = RawConfig::new();
	for (section_name, section_value) in table {
		let toml::Value::Table(entries) = section_value else {
			return Err(TaggerError::InvalidConfigValue {
				path: path.to_path_buf(),
				key: section_name,
				reason: "options must be placed inside a [section]".to_string(),
			});
		};

		let mut section = Section::new();
		for (key, value) in entries {
			let Some(text) = scalar_to_string(&value) else {
				return Err(TaggerError::InvalidConfigValue {
					path: path.to_path_buf(),
					key: format!("{}.{}", section_name, key),
					reason: "expected a string, number or boolean".to_string(),
				});
			};
			section.insert(key, text);
		}
		raw.insert(section_name, section);
	}

	Ok(raw)
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
	match value {
		toml::Value::String(s) => Some(s.trim().to_string()),
		toml::Value::Integer(i) => Some(i.to_string()),
		toml::Value::Float(f) => Some(f.to_string()),
		toml::Value::Boolean(b) => Some(b.to_string()),
		toml::Value::Datetime(d) => Some(d.to_string()),
		toml::Value::Array(_) | toml::Value::Table(_) => None,
	}
}
