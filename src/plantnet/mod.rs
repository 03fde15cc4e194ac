//! Pl@ntNet identification client.
//!
//! This module handles:
//! - Building and sending multipart identify requests
//! - The on-disk result cache keyed by the first image's file name
//! - Extracting common names from raw results

pub mod cache;
pub mod client;
pub mod names;
pub mod transport;

pub use cache::ResultCache;
pub use client::{
	DEFAULT_API_URL, DEFAULT_LANG, DEFAULT_PROJECT, IdentifyOptions, PlantNetClient, identify,
};
pub use names::{CommonNameEntry, common_names};
pub use transport::{HttpTransport, IdentifyRequest, Transport, TransportResponse};

use serde::{Deserialize, Serialize};

/// Raw JSON returned by the identify endpoint.
///
/// The shape is owned by the remote service; it is stored in the cache as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentificationResult(serde_json::Value);

impl IdentificationResult {
	pub fn from_value(value: serde_json::Value) -> Self {
		IdentificationResult(value)
	}

	pub fn as_value(&self) -> &serde_json::Value {
		&self.0
	}
}
