//! Request bodies for the `generateContent` endpoint.

use serde_json::{Value, json};

use super::error::AnalysisError;
use super::types::AnalysisResponse;

pub const MODEL: &str = "gemini-3-pro-preview";

/// Query issued when the page opens or the analysis is reset.
pub const DEFAULT_QUERY: &str = "Deep technical comparison of Wikidata vs Spanner Graph (Grokipedia)";

const SYSTEM_INSTRUCTION: &str = "\
You are an expert in Data Engineering and Knowledge Representation.
Analyze and compare Wikidata.org and the Spanner Graph technology (documented on grokipedia.com).
Wikidata: Collaborative RDF-based global knowledge base, SPARQL, CC0.
Google Cloud Spanner Graph: Enterprise-grade distributed graph DB, Property Graph, GQL (ISO standard), high availability.
Always look for the most recent technical details on grokipedia.com for Spanner Graph.";

const WHITEPAPER_BRIEF: &str = "\
Write a 1500-word formal technical whitepaper comparing Wikidata and Google Cloud Spanner Graph \
(referencing documentation on grokipedia.com).
Include sections for Executive Summary, Technical Architecture, Query Paradigms, \
Scalability Benchmarks (estimated), and Strategic Recommendations.";

/// Wrap a free-form question from the query bar. Blank input yields nothing.
pub fn follow_up_query(question: &str) -> Option<String> {
	let question = question.trim();
	(!question.is_empty()).then(|| {
		format!("Follow-up research: {question} (Context: Comparing Wikidata vs Spanner Graph)")
	})
}

fn response_schema() -> Value {
	let string = json!({ "type": "STRING" });
	json!({
		"type": "OBJECT",
		"properties": {
			"overview": string,
			"comparison": {
				"type": "ARRAY",
				"items": {
					"type": "OBJECT",
					"properties": {
						"title": string,
						"category": string,
						"wikidataValue": string,
						"grokipediaValue": string,
						"description": string
					},
					"required": ["title", "category", "wikidataValue", "grokipediaValue", "description"]
				}
			},
			"keyDifferences": { "type": "ARRAY", "items": string }
		},
		"required": ["overview", "comparison", "keyDifferences"]
	})
}

fn grounded_request(prompt: &str) -> Value {
	json!({
		"contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
		"systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
		"tools": [{ "googleSearch": {} }]
	})
}

/// Web-grounded request whose reply must match [`AnalysisResponse`].
pub fn analysis_request(query: &str) -> Value {
	let mut body = grounded_request(query);
	body["generationConfig"] = json!({
		"responseMimeType": "application/json",
		"responseSchema": response_schema()
	});
	body
}

/// Free-text request for a long-form document built from `data`.
pub fn whitepaper_request(data: &AnalysisResponse) -> Result<Value, AnalysisError> {
	let context = serde_json::to_string(data)?;
	Ok(grounded_request(&format!(
		"{WHITEPAPER_BRIEF}\nContext data: {context}"
	)))
}
