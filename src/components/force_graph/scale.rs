//! Maps graph nodes and links to drawing attributes.
//!
//! Pure and infallible. Sizes grow linearly from their floors; weights that are not
//! finite non-negative numbers are treated as zero.

use crate::session::{GraphLink, GraphNode};

/// Smallest radius a node is drawn with.
pub const MIN_RADIUS: f64 = 5.0;
/// Smallest physical weight used by the layout simulation.
pub const MIN_SIZE_WEIGHT: f64 = 8.0;
/// Link width per unit of weight.
pub const LINK_WIDTH_SCALE: f64 = 1.5;
/// Most particles the canvas animates along a single link.
pub const MAX_PARTICLES: u32 = 8;

pub const LINK_COLOR: &str = "#2a3f5f";
pub const BACKGROUND_COLOR: &str = "#0a0e27";

/// Discrete colour class derived from how many publications mention a tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorBucket {
	Low,
	Medium,
	MediumHigh,
	High,
}

impl ColorBucket {
	/// Highest first, the order the legend lists them in.
	pub const ALL: [ColorBucket; 4] = [Self::High, Self::MediumHigh, Self::Medium, Self::Low];

	pub fn from_group(group: u32) -> Self {
		match group {
			4.. => Self::High,
			3 => Self::MediumHigh,
			2 => Self::Medium,
			_ => Self::Low,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Low => "low",
			Self::Medium => "medium",
			Self::MediumHigh => "medium-high",
			Self::High => "high",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			Self::Low => "#ffd93d",
			Self::Medium => "#6bcf7f",
			Self::MediumHigh => "#4a9eff",
			Self::High => "#ff6b9d",
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub bucket: ColorBucket,
	/// Radius the node is drawn with.
	pub radius: f64,
	/// Weight the layout simulation gives the node. Deliberately on a different scale
	/// than `radius`.
	pub size_weight: f64,
	pub label: String,
	pub tooltip: String,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkStyle {
	pub width: f64,
	pub particles: u32,
}

pub fn node_style(node: &GraphNode) -> NodeStyle {
	let group = f64::from(node.group);
	let label = if node.label.trim().is_empty() {
		node.id.clone()
	} else {
		node.label.clone()
	};
	NodeStyle {
		bucket: ColorBucket::from_group(node.group),
		radius: (group * 2.0).max(MIN_RADIUS),
		size_weight: (group * 3.0).max(MIN_SIZE_WEIGHT),
		tooltip: format!("{label} ({} publications)", node.group),
		label,
	}
}

pub fn link_style(link: &GraphLink) -> LinkStyle {
	let weight = if link.weight.is_finite() {
		link.weight.max(0.0)
	} else {
		0.0
	};
	LinkStyle {
		width: weight * LINK_WIDTH_SCALE,
		particles: weight.round().min(f64::from(MAX_PARTICLES)) as u32,
	}
}

/// Message shown when a tag is clicked.
pub fn describe_tag(node: &GraphNode) -> String {
	let style = node_style(node);
	format!("Tag: {}\nAppears in {} publications", style.label, node.group)
}
