use serde::{Deserialize, Serialize};

/// Length of the recency window used for [`GraphNode::age_factor`].
pub const AGE_WINDOW_MS: f64 = 30.0 * 24.0 * 60.0 * 60.0 * 1000.0;

/// The only link kind the builder produces.
pub const WIKILINK: &str = "wikilink";

fn default_language() -> String {
	"markdown".into()
}

fn default_kind() -> String {
	"note".into()
}

/// A note as handed over by the note store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Note {
	pub id: String,
	#[serde(default)]
	pub title: String,
	#[serde(default)]
	pub code: String,
	#[serde(default = "default_language")]
	pub language: String,
	#[serde(rename = "type", default = "default_kind")]
	pub kind: String,
	#[serde(default)]
	pub is_pinned: bool,
	#[serde(default)]
	pub is_favorite: bool,
	/// Last modification, epoch milliseconds.
	#[serde(default)]
	pub timestamp: Option<i64>,
}

impl Note {
	/// Convenience constructor with defaults for everything but the text fields.
	pub fn new(id: impl Into<String>, title: impl Into<String>, code: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			title: title.into(),
			code: code.into(),
			language: default_language(),
			kind: default_kind(),
			..Self::default()
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
	pub id: String,
	pub title: String,
	#[serde(rename = "type")]
	pub kind: String,
	pub language: String,
	pub is_pinned: bool,
	pub is_favorite: bool,
	/// Degree: incoming and outgoing wiki links share one counter.
	pub count: u32,
	pub val: f64,
	#[serde(default)]
	pub timestamp: Option<i64>,
}

impl GraphNode {
	/// How stale the note is, from 0 (just edited) to 1 (a month or older).
	pub fn age_factor(&self, now_ms: f64) -> f64 {
		match self.timestamp {
			Some(ts) => ((now_ms - ts as f64) / AGE_WINDOW_MS).clamp(0.0, 1.0),
			None => 0.0,
		}
	}
}

/// A link endpoint, either a bare node id or a node-shaped value that carries one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LinkEndpoint {
	Id(String),
	Node { id: String },
}

impl LinkEndpoint {
	pub fn id(&self) -> &str {
		match self {
			LinkEndpoint::Id(id) | LinkEndpoint::Node { id } => id,
		}
	}
}

impl From<&str> for LinkEndpoint {
	fn from(id: &str) -> Self {
		LinkEndpoint::Id(id.to_string())
	}
}

impl From<String> for LinkEndpoint {
	fn from(id: String) -> Self {
		LinkEndpoint::Id(id)
	}
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphLink {
	pub source: LinkEndpoint,
	pub target: LinkEndpoint,
	#[serde(rename = "type")]
	pub kind: String,
}

impl GraphLink {
	pub fn wikilink(source: impl Into<LinkEndpoint>, target: impl Into<LinkEndpoint>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			kind: WIKILINK.into(),
		}
	}

	pub fn source_id(&self) -> &str {
		self.source.id()
	}

	pub fn target_id(&self) -> &str {
		self.target.id()
	}

	/// Whether `id` is either endpoint.
	pub fn touches(&self, id: &str) -> bool {
		self.source_id() == id || self.target_id() == id
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}
}
