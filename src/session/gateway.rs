//! Client side of the semantic search service.

use async_trait::async_trait;
use log::debug;
use serde::Serialize;

use super::config::GatewayConfig;
use super::error::FetchError;
use super::model::{GraphPayload, Summary};

/// Longest error body kept in a [`FetchError::Status`].
const MAX_ERROR_BODY: usize = 200;

/// The two remote operations a session depends on.
#[async_trait(?Send)]
pub trait SearchGateway {
	/// `POST /graph`: topic graph and related publications.
	async fn fetch_graph(&self, query: &str, top_k: usize) -> Result<GraphPayload, FetchError>;

	/// `POST /summarize`: generated summary for `subject`.
	async fn fetch_summary(&self, subject: &str, top_k: usize) -> Result<Summary, FetchError>;
}

#[derive(Serialize)]
struct SearchRequest<'a> {
	query: &'a str,
	top_k: usize,
}

/// JSON-over-HTTP gateway.
#[derive(Clone, Debug)]
pub struct HttpGateway {
	client: reqwest::Client,
	config: GatewayConfig,
}

impl HttpGateway {
	pub fn new(config: GatewayConfig) -> Self {
		Self {
			client: reqwest::Client::new(),
			config,
		}
	}

	pub fn config(&self) -> &GatewayConfig {
		&self.config
	}

	async fn post(&self, path: &str, query: &str, top_k: usize) -> Result<String, FetchError> {
		let url = self.config.endpoint(path);
		debug!("POST {url} top_k={top_k}");

		let response = self
			.client
			.post(&url)
			.timeout(self.config.request_timeout)
			.json(&SearchRequest { query, top_k })
			.send()
			.await
			.map_err(transport_error)?;

		let status = response.status();
		let body = response.text().await.map_err(transport_error)?;
		if !status.is_success() {
			return Err(FetchError::Status {
				code: status.as_u16(),
				body: truncate(body),
			});
		}
		Ok(body)
	}
}

#[async_trait(?Send)]
impl SearchGateway for HttpGateway {
	async fn fetch_graph(&self, query: &str, top_k: usize) -> Result<GraphPayload, FetchError> {
		let body = self.post("graph", query, top_k).await?;
		decode_graph(&body)
	}

	async fn fetch_summary(&self, subject: &str, top_k: usize) -> Result<Summary, FetchError> {
		let body = self.post("summarize", subject, top_k).await?;
		Summary::from_body(&body)
	}
}

/// Parses a `POST /graph` body. Missing `nodes`, `links` or `publications` is malformed.
pub fn decode_graph(body: &str) -> Result<GraphPayload, FetchError> {
	serde_json::from_str(body).map_err(|err| FetchError::malformed(err.to_string()))
}

fn transport_error(err: reqwest::Error) -> FetchError {
	if err.is_timeout() {
		FetchError::Timeout
	} else {
		FetchError::transport(err.to_string())
	}
}

fn truncate(mut body: String) -> String {
	if body.len() > MAX_ERROR_BODY {
		let mut cut = MAX_ERROR_BODY;
		while !body.is_char_boundary(cut) {
			cut -= 1;
		}
		body.truncate(cut);
		body.push_str("...");
	}
	body
}
