use serde::Deserialize;

use super::error::GraphError;

/// Static description of a diagram node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	pub id: String,
	#[serde(default)]
	pub group: u32,
	pub label: String,
	/// Initial position; seeded on a spiral when unset.
	#[serde(default)]
	pub x: Option<f64>,
	#[serde(default)]
	pub y: Option<f64>,
}

impl GraphNode {
	#[cfg(test)]
	pub fn new(id: impl Into<String>, group: u32, label: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			group,
			label: label.into(),
			x: None,
			y: None,
		}
	}

	#[cfg(test)]
	pub fn at(mut self, x: f64, y: f64) -> Self {
		self.x = Some(x);
		self.y = Some(y);
		self
	}
}

/// Static description of a diagram edge. `value` only drives stroke width.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	pub source: String,
	pub target: String,
	#[serde(default = "default_value")]
	pub value: f64,
}

fn default_value() -> f64 {
	1.0
}

impl GraphLink {
	#[cfg(test)]
	pub fn new(source: impl Into<String>, target: impl Into<String>, value: f64) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	pub links: Vec<GraphLink>,
}

impl GraphData {
	/// Parse a `{ nodes, links }` description handed over by the page shell.
	pub fn from_json(text: &str) -> Result<Self, GraphError> {
		Ok(serde_json::from_str(text)?)
	}
}
