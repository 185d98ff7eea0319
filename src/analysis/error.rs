/// Failures while fetching or decoding an analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
	#[error("no API key configured; set GEMINI_API_KEY when building")]
	MissingApiKey,

	#[error("request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("API error {status}: {message}")]
	Api { status: u16, message: String },

	/// The reply carried no candidate text to decode.
	#[error("model returned no text")]
	EmptyResponse,

	#[error("malformed analysis payload: {0}")]
	Json(#[from] serde_json::Error),
}
