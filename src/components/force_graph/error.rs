/// Errors raised while building a diagram, before any tick runs.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// A link names a node identity that is not in the node list.
	#[error("link {from} -> {to} references unknown node {missing:?}")]
	DanglingLink {
		from: String,
		to: String,
		missing: String,
	},

	#[error("duplicate node id {0:?}")]
	DuplicateNode(String),

	#[error("invalid graph description: {0}")]
	Json(#[from] serde_json::Error),
}
