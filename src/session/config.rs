use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TOP_K: usize = 50;
pub const MAX_TOP_K: usize = 500;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Where and how to reach the search service.
#[derive(Clone, Debug, PartialEq)]
pub struct GatewayConfig {
	pub base_url: String,
	/// Result breadth requested from both endpoints.
	pub top_k: usize,
	pub request_timeout: Duration,
}

impl Default for GatewayConfig {
	fn default() -> Self {
		Self {
			base_url: DEFAULT_API_URL.to_string(),
			top_k: DEFAULT_TOP_K,
			request_timeout: DEFAULT_REQUEST_TIMEOUT,
		}
	}
}

impl GatewayConfig {
	/// Defaults overridden by `COSMOGRAPH_API_URL` / `COSMOGRAPH_TOP_K` at build time.
	pub fn from_build_env() -> Self {
		Self::default().with_overrides(
			option_env!("COSMOGRAPH_API_URL"),
			option_env!("COSMOGRAPH_TOP_K"),
		)
	}

	fn with_overrides(mut self, api_url: Option<&str>, top_k: Option<&str>) -> Self {
		if let Some(url) = api_url.map(str::trim).filter(|url| !url.is_empty()) {
			self.base_url = url.trim_end_matches('/').to_string();
		}
		match top_k.map(|raw| raw.trim().parse::<usize>()) {
			Some(Ok(k)) => self.top_k = k,
			Some(Err(err)) => log::warn!("ignoring COSMOGRAPH_TOP_K: {err}"),
			None => {}
		}
		self.top_k = self.top_k.clamp(1, MAX_TOP_K);
		self
	}

	pub fn endpoint(&self, path: &str) -> String {
		format!("{}/{}", self.base_url.trim_end_matches('/'), path.trim_start_matches('/'))
	}
}
