use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use super::error::AnalysisError;
use super::request::{MODEL, analysis_request, whitepaper_request};
use super::response::{parse_analysis, parse_whitepaper};
use super::types::AnalysisResponse;

const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// API-key client for the Gemini `generateContent` endpoint.
#[derive(Clone, Debug)]
pub struct GeminiClient {
	api_key: String,
	model: String,
	client: Client,
}

impl GeminiClient {
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_key: api_key.into().trim().to_owned(),
			model: MODEL.to_owned(),
			client: Client::new(),
		}
	}

	/// Client keyed by `GEMINI_API_KEY` as set when the bundle was built.
	pub fn from_build_env() -> Result<Self, AnalysisError> {
		option_env!("GEMINI_API_KEY")
			.map(str::trim)
			.filter(|key| !key.is_empty())
			.map(Self::new)
			.ok_or(AnalysisError::MissingApiKey)
	}

	fn url(&self) -> String {
		format!("{ENDPOINT}/{}:generateContent", self.model)
	}

	async fn generate(&self, body: &Value) -> Result<String, AnalysisError> {
		debug!("POST {}", self.url());
		let resp = self
			.client
			.post(self.url())
			.header("content-type", "application/json")
			.header("x-goog-api-key", &self.api_key)
			.json(body)
			.send()
			.await?;

		let status = resp.status();
		if !status.is_success() {
			let message = resp.text().await.unwrap_or_default();
			return Err(AnalysisError::Api {
				status: status.as_u16(),
				message,
			});
		}
		Ok(resp.text().await?)
	}

	pub async fn perform_analysis(&self, query: &str) -> Result<AnalysisResponse, AnalysisError> {
		let analysis = parse_analysis(&self.generate(&analysis_request(query)).await?)?;
		info!(
			"analysis received: {} cards, {} sources",
			analysis.comparison.len(),
			analysis.sources.len()
		);
		Ok(analysis)
	}

	pub async fn generate_whitepaper(&self, data: &AnalysisResponse) -> Result<String, AnalysisError> {
		parse_whitepaper(&self.generate(&whitepaper_request(data)?).await?)
	}
}
