use crate::error::{Result, TaggerError};
use crate::plantnet::IdentificationResult;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of cached identify results, one `<image file name>.json` per entry.
///
/// Not locked: two processes sharing a directory may race on the same file.
#[derive(Debug, Clone)]
pub struct ResultCache {
	dir: PathBuf,
}

impl ResultCache {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		ResultCache { dir: dir.into() }
	}

	/// Cache file for an image, based on its file name only.
	pub fn path_for(&self, image: &Path) -> Result<PathBuf> {
		let name = image
			.file_name()
			.ok_or_else(|| TaggerError::InvalidImagePath {
				path: image.to_path_buf(),
			})?;

		let mut file_name = name.to_os_string();
		file_name.push(".json");
		Ok(self.dir.join(file_name))
	}

	/// Read the cached result for an image, if there is one.
	pub fn load(&self, image: &Path) -> Result<Option<IdentificationResult>> {
		let path = self.path_for(image)?;
		if !path.exists() {
			return Ok(None);
		}

		let content = fs::read_to_string(&path).map_err(|source| TaggerError::CacheRead {
			path: path.clone(),
			source,
		})?;
		let result = serde_json::from_str(&content)
			.map_err(|source| TaggerError::CacheParse { path, source })?;
		Ok(Some(result))
	}

	/// Write a result for an image, replacing any earlier entry.
	pub fn store(&self, image: &Path, result: &IdentificationResult) -> Result<PathBuf> {
		let path = self.path_for(image)?;

		fs::create_dir_all(&self.dir).map_err(|source| TaggerError::CacheWrite {
			path: self.dir.clone(),
			source,
		})?;

		let content = serde_json::to_string(result).map_err(|source| TaggerError::CacheWrite {
			path: path.clone(),
			source: std::io::Error::other(source),
		})?;
		fs::write(&path, content).map_err(|source| TaggerError::CacheWrite {
			path: path.clone(),
			source,
		})?;

		Ok(path)
	}
}
