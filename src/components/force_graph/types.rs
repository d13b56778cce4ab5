use crate::session::{GraphLink, GraphNode, ViewModel};

/// Nodes and links handed to the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	pub fn from_view(view: &ViewModel) -> Self {
		Self {
			nodes: view.nodes().to_vec(),
			links: view.links().to_vec(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Overlay line, e.g. "12 tags, 30 connections".
	pub fn stats(&self) -> String {
		format!("{} tags, {} connections", self.nodes.len(), self.links.len())
	}
}
