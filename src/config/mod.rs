//! Configuration loading for phototagger.
//!
//! This module handles:
//! - TOML config file parsing into section/key/value layers
//! - Layer discovery (built-in defaults, user file, explicit files)
//! - Merging and validation of required keys

pub mod cascade;
pub mod parser;
pub mod types;
pub mod validate;

pub use cascade::{ConfigSources, load_layers, merge_layers, read_config, user_config_path};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{ConfigLayer, GeneralSettings, PlantnetSettings, RawConfig, Settings};
pub use validate::{KeyIssue, Problem, RequiredKey, ValidationReport};
