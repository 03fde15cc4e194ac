use crate::error::{Result, TaggerError};
use reqwest::blocking::{Client, multipart};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Multipart field name the identify endpoint expects for each image.
pub const IMAGES_FIELD: &str = "images";

/// Everything needed to send one identify call.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentifyRequest {
	/// Endpoint URL, project included.
	pub url: String,

	/// Query parameters (api key, language, key type).
	pub query: Vec<(String, String)>,

	/// Image files, one multipart part each.
	pub images: Vec<PathBuf>,
}

/// Status and body of an identify response.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
	pub status: u16,
	pub body: String,
}

impl TransportResponse {
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Sends identify requests. Implemented over HTTP, and by fakes in tests.
pub trait Transport {
	fn send(&self, request: &IdentifyRequest) -> Result<TransportResponse>;
}

/// Blocking `reqwest` transport. Uses the library's default timeouts.
#[derive(Debug, Clone)]
pub struct HttpTransport {
	client: Client,
}

impl HttpTransport {
	pub fn new() -> Result<Self> {
		let client = Client::builder()
			.build()
			.map_err(|source| TaggerError::HttpClient { source })?;
		Ok(HttpTransport { client })
	}
}

impl Transport for HttpTransport {
	fn send(&self, request: &IdentifyRequest) -> Result<TransportResponse> {
		let request_error = |source: reqwest::Error| TaggerError::Request {
			url: request.url.clone(),
			source,
		};

		let mut form = multipart::Form::new();
		for image in &request.images {
			let file = File::open(image).map_err(|source| TaggerError::ImageOpen {
				path: image.clone(),
				source,
			})?;
			let file_name = image
				.file_name()
				.map(|name| name.to_string_lossy().to_string())
				.unwrap_or_else(|| image.to_string_lossy().to_string());

			let part = multipart::Part::reader(file)
				.file_name(file_name)
				.mime_str(mime_for(image))
				.map_err(request_error)?;
			form = form.part(IMAGES_FIELD, part);
		}

		let response = self
			.client
			.post(&request.url)
			.query(&request.query)
			.multipart(form)
			.send()
			.map_err(request_error)?;

		let status = response.status().as_u16();
		let body = response.text().map_err(request_error)?;
		Ok(TransportResponse { status, body })
	}
}

/// Guess the MIME type of an image from its extension.
pub fn mime_for(path: &Path) -> &'static str {
	let ext = path
		.extension()
		.and_then(|e| e.to_str())
		.unwrap_or("")
		.to_ascii_lowercase();

	match ext.as_str() {
		"jpg" | "jpeg" => "image/jpeg",
		"png" => "image/png",
		_ => "application/octet-stream",
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;
	use std::io::{Read, Write};
	use std::net::TcpListener;
	use std::thread;

	/// Accept one connection, answer `200 {}` and hand back the raw request.
	fn serve_once(listener: TcpListener) -> thread::JoinHandle<String> {
		thread::spawn(move || {
			let (mut stream, _) = listener.accept().unwrap();
			let mut raw = Vec::new();
			let mut buf = [0u8; 4096];
			while !request_complete(&raw) {
				let n = stream.read(&mut buf).unwrap();
				if n == 0 {
					break;
				}
				raw.extend_from_slice(&buf[..n]);
			}
			stream
				.write_all(
					b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
				)
				.unwrap();
			String::from_utf8_lossy(&raw).to_string()
		})
	}

	/// Whether `raw` holds the full head and body (sized or chunked).
	fn request_complete(raw: &[u8]) -> bool {
		let Some(head_end) = raw.windows(4).position(|w| w == b"\r\n\r\n") else {
			return false;
		};
		let head = String::from_utf8_lossy(&raw[..head_end]).to_ascii_lowercase();
		let body = &raw[head_end + 4..];

		let content_length = head
			.lines()
			.find_map(|line| line.strip_prefix("content-length:"))
			.and_then(|value| value.trim().parse::<usize>().ok());
		match content_length {
			Some(length) => body.len() >= length,
			None => body.ends_with(b"0\r\n\r\n"),
		}
	}

	#[test]
	fn test_send_posts_multipart_images() {
		let temp_dir = tempfile::tempdir().unwrap();
		let rose = temp_dir.path().join("rose.jpg");
		let fern = temp_dir.path().join("fern.PNG");
		fs::write(&rose, b"rose-bytes").unwrap();
		fs::write(&fern, b"fern-bytes").unwrap();

		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		let server = serve_once(listener);

		// Bypass any proxy configured in the environment.
		let transport = HttpTransport {
			client: Client::builder().no_proxy().build().unwrap(),
		};
		let request = IdentifyRequest {
			url: format!("http://{}/v2/identify/all", addr),
			query: vec![
				("api-key".to_string(), "k y&".to_string()),
				("lang".to_string(), "en".to_string()),
				("type".to_string(), "tk".to_string()),
			],
			images: vec![rose, fern],
		};

		let response = transport.send(&request).unwrap();
		let raw = server.join().unwrap();

		assert_eq!(
			response,
			TransportResponse {
				status: 200,
				body: "{}".to_string(),
			}
		);
		assert!(
			raw.starts_with("POST /v2/identify/all?api-key=k+y%26&lang=en&type=tk HTTP/1.1\r\n"),
			"unexpected request line: {raw}"
		);
		assert!(
			raw.to_ascii_lowercase()
				.contains("content-type: multipart/form-data; boundary=")
		);
		assert_eq!(raw.matches("name=\"images\"").count(), 2);
		assert!(raw.contains(
			"Content-Disposition: form-data; name=\"images\"; filename=\"rose.jpg\"\r\nContent-Type: image/jpeg"
		));
		assert!(raw.contains(
			"Content-Disposition: form-data; name=\"images\"; filename=\"fern.PNG\"\r\nContent-Type: image/png"
		));
		assert!(raw.contains("rose-bytes"));
		assert!(raw.contains("fern-bytes"));
		// Only the file name leaves the machine, not the local directory.
		assert!(!raw.contains(&temp_dir.path().display().to_string()));
	}

	#[test]
	fn test_mime_for() {
		assert_eq!(mime_for(Path::new("a.jpg")), "image/jpeg");
		assert_eq!(mime_for(Path::new("a.JPEG")), "image/jpeg");
		assert_eq!(mime_for(Path::new("dir/a.Png")), "image/png");
		assert_eq!(mime_for(Path::new("a.heic")), "application/octet-stream");
		assert_eq!(mime_for(Path::new("noext")), "application/octet-stream");
	}

	#[test]
	fn test_response_is_success() {
		let ok = TransportResponse {
			status: 200,
			body: String::new(),
		};
		let not_found = TransportResponse {
			status: 404,
			body: String::new(),
		};
		assert!(ok.is_success());
		assert!(!not_found.is_success());
	}

	#[test]
	fn test_missing_image_fails_before_sending() {
		let transport = HttpTransport::new().unwrap();
		let request = IdentifyRequest {
			url: "http://127.0.0.1:9/identify/all".to_string(),
			query: Vec::new(),
			images: vec![PathBuf::from("/nonexistent/photo.jpg")],
		};

		match transport.send(&request).unwrap_err() {
			TaggerError::ImageOpen { path, .. } => {
				assert_eq!(path, PathBuf::from("/nonexistent/photo.jpg"))
			}
			other => panic!("Expected ImageOpen error, got {other:?}"),
		}
	}
}
