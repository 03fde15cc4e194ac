//! Image discovery in the input directory.

use crate::error::{Result, TaggerError};
use std::path::{Path, PathBuf};

/// Extensions treated as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Files found directly in the input directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageScan {
	/// Image files, sorted by name.
	pub images: Vec<PathBuf>,

	/// Other files, sorted by name.
	pub skipped: Vec<PathBuf>,
}

/// Check whether a path has an image extension.
pub fn is_image(path: &Path) -> bool {
	path.extension()
		.and_then(|e| e.to_str())
		.map(|ext| {
			IMAGE_EXTENSIONS
				.iter()
				.any(|known| ext.eq_ignore_ascii_case(known))
		})
		.unwrap_or(false)
}

/// List the files of `dir` (not recursive) and split them into images and others.
pub fn scan_images(dir: &Path) -> Result<ImageScan> {
	let read_error = |source: std::io::Error| TaggerError::InputDirRead {
		path: dir.to_path_buf(),
		source,
	};

	let mut files = Vec::new();
	for entry in std::fs::read_dir(dir).map_err(read_error)? {
		let entry = entry.map_err(read_error)?;
		let path = entry.path();
		if path.is_file() {
			files.push(path);
		}
	}
	files.sort();

	let (images, skipped): (Vec<PathBuf>, Vec<PathBuf>) =
		files.into_iter().partition(|path| is_image(path));
	Ok(ImageScan { images, skipped })
}
