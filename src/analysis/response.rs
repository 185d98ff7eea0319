//! Decoding of `generateContent` replies.

use serde::Deserialize;

use super::error::AnalysisError;
use super::types::{AnalysisResponse, GroundingSource};

const FALLBACK_SOURCE_TITLE: &str = "Reference Source";
const WHITEPAPER_FALLBACK: &str = "Failed to generate whitepaper.";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
	#[serde(default)]
	candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
	#[serde(default)]
	content: Option<Content>,
	#[serde(default)]
	grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
struct Content {
	#[serde(default)]
	parts: Vec<Part>,
}

#[derive(Debug, Default, Deserialize)]
struct Part {
	#[serde(default)]
	text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
	#[serde(default)]
	grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct GroundingChunk {
	#[serde(default)]
	web: Option<WebChunk>,
}

#[derive(Debug, Default, Deserialize)]
struct WebChunk {
	#[serde(default)]
	uri: String,
	#[serde(default)]
	title: Option<String>,
}

impl GenerateContentResponse {
	/// Text parts of the first candidate, concatenated.
	fn text(&self) -> Option<String> {
		let parts = &self.candidates.first()?.content.as_ref()?.parts;
		let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
		(!text.is_empty()).then_some(text)
	}

	fn sources(&self) -> Vec<GroundingSource> {
		let Some(metadata) = self
			.candidates
			.first()
			.and_then(|c| c.grounding_metadata.as_ref())
		else {
			return Vec::new();
		};
		metadata
			.grounding_chunks
			.iter()
			.filter_map(|chunk| chunk.web.as_ref())
			.map(|web| GroundingSource {
				title: web
					.title
					.as_deref()
					.filter(|t| !t.is_empty())
					.unwrap_or(FALLBACK_SOURCE_TITLE)
					.to_owned(),
				uri: web.uri.clone(),
			})
			.collect()
	}
}

/// Decode the model's JSON answer and attach the pages it was grounded on.
pub fn parse_analysis(body: &str) -> Result<AnalysisResponse, AnalysisError> {
	let reply: GenerateContentResponse = serde_json::from_str(body)?;
	let text = reply.text().ok_or(AnalysisError::EmptyResponse)?;
	let mut analysis: AnalysisResponse = serde_json::from_str(&text)?;
	analysis.sources = reply.sources();
	Ok(analysis)
}

/// The generated document, or a fixed notice when the model sent no text.
pub fn parse_whitepaper(body: &str) -> Result<String, AnalysisError> {
	let reply: GenerateContentResponse = serde_json::from_str(body)?;
	Ok(reply
		.text()
		.unwrap_or_else(|| WHITEPAPER_FALLBACK.to_owned()))
}
