use crate::config::types::RawConfig;
use std::fmt;

/// Value shipped in the built-in defaults for keys the user has to provide.
pub const PLACEHOLDER: &str = "MUST_OVERRIDE";

/// A `section.key` pair that must be set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredKey {
	pub section: &'static str,
	pub key: &'static str,
}

/// Keys that must be present and not left at the placeholder.
pub const REQUIRED_KEYS: &[RequiredKey] = &[
	RequiredKey {
		section: "general",
		key: "input_dir",
	},
	RequiredKey {
		section: "plantnet",
		key: "api_key",
	},
];

impl fmt::Display for RequiredKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.section, self.key)
	}
}

/// Why a required key was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Problem {
	Missing,
	Placeholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyIssue {
	pub key: RequiredKey,
	pub problem: Problem,
}

/// Outcome of checking a merged config against [`REQUIRED_KEYS`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
	pub issues: Vec<KeyIssue>,
}

impl ValidationReport {
	pub fn is_ok(&self) -> bool {
		self.issues.is_empty()
	}
}

impl fmt::Display for ValidationReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, issue) in self.issues.iter().enumerate() {
			if i > 0 {
				write!(f, "; ")?;
			}
			match issue.problem {
				Problem::Missing => write!(f, "{} is a required parameter", issue.key)?,
				Problem::Placeholder => write!(f, "{} must be overridden", issue.key)?,
			}
		}
		Ok(())
	}
}

/// Classify a raw value: `None` when it is usable.
pub fn missing_or_placeholder(value: Option<&str>) -> Option<Problem> {
	match value.map(str::trim) {
		None | Some("") => Some(Problem::Missing),
		Some(PLACEHOLDER) => Some(Problem::Placeholder),
		Some(_) => None,
	}
}

/// Check every required key and collect all problems.
pub fn validate(raw: &RawConfig) -> ValidationReport {
	let issues = REQUIRED_KEYS
		.iter()
		.filter_map(|required| {
			let value = raw
				.get(required.section)
				.and_then(|values| values.get(required.key))
				.map(String::as_str);
			missing_or_placeholder(value).map(|problem| KeyIssue {
				key: *required,
				problem,
			})
		})
		.collect();

	ValidationReport { issues }
}
