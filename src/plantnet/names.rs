use crate::error::{Result, TaggerError};
use crate::plantnet::IdentificationResult;
use serde::{Deserialize, Serialize};

/// Common names of one candidate species with the service's confidence score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonNameEntry {
	pub common_names: Vec<String>,
	pub score: f64,
}

#[derive(Deserialize)]
struct Candidates {
	results: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
	species: Species,
	score: f64,
}

#[derive(Deserialize)]
struct Species {
	#[serde(rename = "commonNames", default)]
	common_names: Option<Vec<String>>,
}

/// Candidates that have at least one common name, in the order the service
/// ranked them. Scores are passed through unchanged.
pub fn common_names(result: &IdentificationResult) -> Result<Vec<CommonNameEntry>> {
	let candidates = Candidates::deserialize(result.as_value())
		.map_err(|source| TaggerError::MalformedResult { source })?;

	Ok(candidates
		.results
		.into_iter()
		.filter_map(|candidate| {
			let names = candidate.species.common_names.unwrap_or_default();
			(!names.is_empty()).then_some(CommonNameEntry {
				common_names: names,
				score: candidate.score,
			})
		})
		.collect())
}
