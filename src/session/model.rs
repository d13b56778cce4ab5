//! Data shapes shared by the session controller, the gateway and the UI.

use std::collections::HashSet;
use std::fmt;

use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::dedup::dedup_publications;
use super::error::{FetchError, SelectError};

/// Shown in the summary panel until a summary has been fetched.
pub const SUMMARY_PLACEHOLDER: &str =
	"Search for a topic to generate a summary of the related publications.";

/// A trimmed, non-blank search query.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Query(String);

impl Query {
	/// Returns `None` for blank or whitespace-only input.
	pub fn parse(raw: &str) -> Option<Self> {
		let trimmed = raw.trim();
		(!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
	}

	/// The query text sent to the gateway.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for Query {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// A topic/tag node. `group` is the number of publications the tag appears in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub group: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(default = "default_weight")]
	pub weight: f64,
}

fn default_weight() -> f64 {
	1.0
}

/// Publication identifier. The backend sends either numbers or strings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PublicationId(String);

impl PublicationId {
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl<'de> Deserialize<'de> for PublicationId {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum RawId {
			Number(serde_json::Number),
			Text(String),
		}

		Ok(match RawId::deserialize(deserializer)? {
			RawId::Number(n) => Self(n.to_string()),
			RawId::Text(s) => Self(s),
		})
	}
}

/// A publication returned alongside the graph. Unknown fields are kept in `metadata`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Publication {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<PublicationId>,
	pub title: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub link: Option<String>,
	#[serde(flatten)]
	pub metadata: Map<String, Value>,
}

impl Publication {
	pub fn new(id: Option<&str>, title: impl Into<String>) -> Self {
		Self {
			id: id.map(PublicationId::new),
			title: title.into(),
			link: None,
			metadata: Map::new(),
		}
	}
}

/// Body of `POST /graph`. Every field is required; a missing one is a malformed response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphPayload {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub publications: Vec<Publication>,
}

/// A graph payload whose links all resolve and whose publications are deduplicated.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
	pub publications: Vec<Publication>,
}

impl GraphPayload {
	/// Rejects duplicate node ids and dangling links, then deduplicates publications.
	pub fn into_snapshot(self) -> Result<GraphSnapshot, FetchError> {
		let mut ids = HashSet::with_capacity(self.nodes.len());
		for node in &self.nodes {
			if !ids.insert(node.id.as_str()) {
				return Err(FetchError::malformed(format!("duplicate node id `{}`", node.id)));
			}
		}
		for link in &self.links {
			for endpoint in [&link.source, &link.target] {
				if !ids.contains(endpoint.as_str()) {
					return Err(FetchError::malformed(format!(
						"link {} -> {} references unknown node `{}`",
						link.source, link.target, endpoint
					)));
				}
			}
		}

		Ok(GraphSnapshot {
			publications: dedup_publications(self.publications),
			nodes: self.nodes,
			links: self.links,
		})
	}
}

/// Summary generated for a query.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Summary {
	#[default]
	Placeholder,
	Text(String),
	Structured(Value),
}

impl Summary {
	/// Interprets a `POST /summarize` body.
	///
	/// A JSON string or an object with a string `summary` field becomes text, other JSON is
	/// kept structured, and a body that is not JSON at all is taken as plain text.
	pub fn from_body(body: &str) -> Result<Self, FetchError> {
		match serde_json::from_str::<Value>(body) {
			Ok(value) => Self::from_json(value),
			Err(_) => Ok(Self::Text(body.trim().to_string())),
		}
	}

	pub fn from_json(value: Value) -> Result<Self, FetchError> {
		match value {
			Value::Null => Err(FetchError::malformed("summary payload is null")),
			Value::String(text) => Ok(Self::Text(text)),
			Value::Object(fields) => {
				if let Some(text) = fields.get("summary").and_then(Value::as_str) {
					return Ok(Self::Text(text.to_string()));
				}
				Ok(Self::Structured(Value::Object(fields)))
			}
			other => Ok(Self::Structured(other)),
		}
	}

	pub fn is_placeholder(&self) -> bool {
		matches!(self, Self::Placeholder)
	}

	/// Text for the summary panel.
	pub fn display_text(&self) -> String {
		match self {
			Self::Placeholder => SUMMARY_PLACEHOLDER.to_string(),
			Self::Text(text) => text.clone(),
			Self::Structured(value) => {
				serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
			}
		}
	}
}

/// Lifecycle of a session: Idle -> Loading -> Ready | Failed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
	#[default]
	Idle,
	Loading,
	Ready,
	Failed,
}

impl SessionStatus {
	pub fn can_advance_to(self, next: SessionStatus) -> bool {
		matches!(
			(self, next),
			(Self::Idle, Self::Loading)
				| (Self::Loading, Self::Ready)
				| (Self::Loading, Self::Failed)
		)
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Idle => "Idle",
			Self::Loading => "Loading...",
			Self::Ready => "Ready",
			Self::Failed => "Failed",
		}
	}
}

/// Snapshot of one query's results. Only the controller mutates it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewModel {
	query: Option<Query>,
	nodes: Vec<GraphNode>,
	links: Vec<GraphLink>,
	publications: Vec<Publication>,
	selected: Option<Publication>,
	summary: Summary,
	status: SessionStatus,
	error: Option<FetchError>,
}

impl ViewModel {
	/// Fresh snapshot for `query`, already Loading. `summary` is carried over from the
	/// previous snapshot so the panel does not flash while the new one is fetched.
	pub(crate) fn begin(query: Query, summary: Summary) -> Self {
		let mut view = Self {
			query: Some(query),
			summary,
			..Self::default()
		};
		view.advance(SessionStatus::Loading);
		view
	}

	pub fn query(&self) -> Option<&Query> {
		self.query.as_ref()
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn links(&self) -> &[GraphLink] {
		&self.links
	}

	pub fn publications(&self) -> &[Publication] {
		&self.publications
	}

	pub fn selected(&self) -> Option<&Publication> {
		self.selected.as_ref()
	}

	pub fn summary(&self) -> &Summary {
		&self.summary
	}

	pub fn status(&self) -> SessionStatus {
		self.status
	}

	/// First failure of the session, for display.
	pub fn error(&self) -> Option<&FetchError> {
		self.error.as_ref()
	}

	pub(crate) fn apply_graph(&mut self, snapshot: GraphSnapshot) {
		self.nodes = snapshot.nodes;
		self.links = snapshot.links;
		self.publications = snapshot.publications;
		self.selected = self.publications.first().cloned();
	}

	pub(crate) fn apply_summary(&mut self, summary: Summary) {
		self.summary = summary;
	}

	pub(crate) fn fail(&mut self, error: FetchError) {
		if self.status == SessionStatus::Loading {
			self.advance(SessionStatus::Failed);
		}
		self.error.get_or_insert(error);
	}

	/// Both fetches have settled.
	pub(crate) fn settle(&mut self) {
		if self.status == SessionStatus::Loading {
			self.advance(SessionStatus::Ready);
		}
	}

	pub(crate) fn select(&mut self, publication: &Publication) -> Result<(), SelectError> {
		if !self.publications.contains(publication) {
			return Err(SelectError::NotInResults {
				title: publication.title.clone(),
			});
		}
		self.selected = Some(publication.clone());
		Ok(())
	}

	fn advance(&mut self, next: SessionStatus) -> bool {
		if !self.status.can_advance_to(next) {
			warn!("ignoring status transition {:?} -> {:?}", self.status, next);
			return false;
		}
		self.status = next;
		true
	}
}
