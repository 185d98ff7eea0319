use serde::{Deserialize, Serialize};

/// Tab selected before the first analysis arrives.
pub const DEFAULT_TAB: &str = "Storage";

/// One comparison card: a single aspect judged for both technologies.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
	pub title: String,
	pub category: String,
	pub wikidata_value: String,
	pub grokipedia_value: String,
	pub description: String,
}

/// A web page the model grounded its answer on.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GroundingSource {
	pub title: String,
	pub uri: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
	pub comparison: Vec<ComparisonData>,
	pub overview: String,
	pub key_differences: Vec<String>,
	/// Filled from grounding metadata, never by the model's JSON.
	#[serde(default)]
	pub sources: Vec<GroundingSource>,
}

impl AnalysisResponse {
	/// Distinct card categories in first-seen order, one tab each.
	pub fn categories(&self) -> Vec<&str> {
		let mut seen: Vec<&str> = Vec::new();
		for card in &self.comparison {
			if !seen.contains(&card.category.as_str()) {
				seen.push(&card.category);
			}
		}
		seen
	}

	/// The tab to open once this analysis is shown.
	pub fn initial_tab(&self) -> Option<&str> {
		self.comparison.first().map(|card| card.category.as_str())
	}

	pub fn cards_in<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a ComparisonData> {
		self.comparison
			.iter()
			.filter(move |card| card.category == category)
	}
}

#[cfg(test)]
pub(crate) mod tests {
	use super::*;

	pub(crate) fn card(title: &str, category: &str) -> ComparisonData {
		ComparisonData {
			title: title.into(),
			category: category.into(),
			wikidata_value: format!("{title} in Wikidata"),
			grokipedia_value: format!("{title} in Spanner Graph"),
			description: format!("How {title} differs"),
		}
	}

	pub(crate) fn analysis() -> AnalysisResponse {
		AnalysisResponse {
			comparison: vec![
				card("Data model", "Storage"),
				card("Query language", "Querying"),
				card("Replication", "Storage"),
				card("Licensing", "Governance"),
				card("Federation", "Querying"),
			],
			overview: "Two very different graphs.".into(),
			key_differences: vec!["Open vs managed".into(), "RDF vs property graph".into()],
			sources: vec![],
		}
	}

	#[test]
	fn categories_are_unique_in_first_seen_order() {
		assert_eq!(analysis().categories(), ["Storage", "Querying", "Governance"]);
		assert!(AnalysisResponse::default().categories().is_empty());
	}

	#[test]
	fn first_card_picks_the_initial_tab() {
		let mut data = analysis();
		data.comparison.rotate_left(1);
		assert_eq!(data.initial_tab(), Some("Querying"));
		assert_eq!(AnalysisResponse::default().initial_tab(), None);
	}

	#[test]
	fn cards_filter_by_category() {
		let data = analysis();
		let titles: Vec<_> = data.cards_in("Storage").map(|c| c.title.as_str()).collect();
		assert_eq!(titles, ["Data model", "Replication"]);
		assert_eq!(data.cards_in("Pricing").count(), 0);
	}

	#[test]
	fn payload_uses_camel_case_fields() {
		let json = r#"{
			"overview": "o",
			"comparison": [{
				"title": "t", "category": "c", "wikidataValue": "w",
				"grokipediaValue": "g", "description": "d"
			}],
			"keyDifferences": ["k"]
		}"#;
		let data: AnalysisResponse = serde_json::from_str(json).unwrap();
		assert_eq!(data.comparison[0].wikidata_value, "w");
		assert_eq!(data.comparison[0].grokipedia_value, "g");
		assert_eq!(data.key_differences, ["k"]);
		assert!(data.sources.is_empty());

		let back = serde_json::to_value(&data).unwrap();
		assert_eq!(back["keyDifferences"][0], "k");
		assert_eq!(back["comparison"][0]["grokipediaValue"], "g");
	}
}
