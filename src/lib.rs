//! Phototagger - identify plants in photographs with the Pl@ntNet API.
//!
//! This library provides the core functionality for phototagger, including:
//! - Layered configuration loading and validation
//! - Image discovery in an input directory
//! - Identify requests with an on-disk result cache
//! - Common-name extraction from identify results
//!
//! # Example
//!
//! ```no_run
//! use phototagger_cli::config::{ConfigSources, read_config};
//! use phototagger_cli::plantnet::{IdentifyOptions, PlantNetClient, common_names};
//! use phototagger_cli::scan::scan_images;
//!
//! let sources = ConfigSources::discover(Vec::new()).unwrap();
//! let settings = read_config(&sources).unwrap();
//! let client = PlantNetClient::new(IdentifyOptions::from_settings(&settings.plantnet)).unwrap();
//!
//! for image in scan_images(&settings.general.input_dir).unwrap().images {
//!     let result = client.identify(&[image]).unwrap();
//!     for entry in common_names(&result).unwrap() {
//!         println!("{:.3} {}", entry.score, entry.common_names.join(", "));
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod plantnet;
pub mod scan;

pub use error::{Result, TaggerError};
