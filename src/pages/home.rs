use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{error, info};

use crate::analysis::{
	AnalysisError, AnalysisResponse, DEFAULT_QUERY, DEFAULT_TAB, GeminiClient, follow_up_query,
};
use crate::components::comparison::{ComparisonPanel, WhitepaperDialog};
use crate::components::force_graph::{ForceGraphCanvas, GraphData, GraphError};

/// One root with a star of three concepts under each technology.
const CONCEPT_MAP: &str = include_str!("concept_map.json");

fn concept_map() -> Result<GraphData, GraphError> {
	GraphData::from_json(CONCEPT_MAP)
}

#[cfg(test)]
pub(crate) fn sample_data() -> GraphData {
	concept_map().unwrap()
}

async fn analyse(query: &str) -> Result<AnalysisResponse, AnalysisError> {
	GeminiClient::from_build_env()?.perform_analysis(query).await
}

async fn whitepaper_for(data: &AnalysisResponse) -> Result<String, AnalysisError> {
	GeminiClient::from_build_env()?.generate_whitepaper(data).await
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let analysis = RwSignal::new(None::<AnalysisResponse>);
	let loading = RwSignal::new(false);
	let fetch_error = RwSignal::new(None::<String>);
	let active_tab = RwSignal::new(DEFAULT_TAB.to_owned());
	let whitepaper = RwSignal::new(None::<String>);
	let generating = RwSignal::new(false);
	let question = RwSignal::new(String::new());

	let fetch = move |query: String| {
		loading.set(true);
		fetch_error.set(None);
		spawn_local(async move {
			match analyse(&query).await {
				Ok(result) => {
					if let Some(tab) = result.initial_tab() {
						active_tab.set(tab.to_owned());
					}
					analysis.set(Some(result));
				}
				Err(e) => {
					error!("analysis failed: {e}");
					fetch_error.set(Some(e.to_string()));
				}
			}
			loading.set(false);
		});
	};
	fetch(DEFAULT_QUERY.to_owned());

	let on_whitepaper = move |_: MouseEvent| {
		let Some(data) = analysis.get_untracked() else {
			return;
		};
		generating.set(true);
		spawn_local(async move {
			match whitepaper_for(&data).await {
				Ok(doc) => {
					info!("whitepaper generated: {} chars", doc.len());
					whitepaper.set(Some(doc));
				}
				Err(e) => error!("whitepaper failed: {e}"),
			}
			generating.set(false);
		});
	};

	let on_submit = move |ev: SubmitEvent| {
		ev.prevent_default();
		if let Some(query) = follow_up_query(&question.get_untracked()) {
			fetch(query);
			question.set(String::new());
		}
	};

	let diagram = concept_map().inspect_err(|e| error!("concept map rejected: {e}"));

	view! {
		<header class="page-header">
			<h1>"Graph Insights"</h1>
			<p class="status">
				{move || if loading.get() { "Researching Web..." } else { "Analysis Live" }}
			</p>
			<button
				class="reset"
				title="Reset Analysis"
				on:click=move |_| fetch(DEFAULT_QUERY.to_owned())
			>
				"Reset"
			</button>
		</header>

		<main>
			<section class="hero">
				<h2>"Global KB vs. Enterprise Graph"</h2>
				<p class="overview">
					{move || analysis.with(|a| a.as_ref().map(|a| a.overview.clone()))}
				</p>
				{move || fetch_error.get().map(|e| view! { <p class="error">{e}</p> })}
				<button
					class="generate"
					disabled=move || generating.get() || analysis.with(Option::is_none)
					on:click=on_whitepaper
				>
					{move || if generating.get() { "Generating..." } else { "Generate Whitepaper" }}
				</button>

				<ErrorBoundary fallback=|errors| {
					view! {
						<h1>"Uh oh! Something went wrong!"</h1>

						<p>"Errors: "</p>
						<ul>
							{move || {
								errors
									.get()
									.into_iter()
									.map(|(_, e)| view! { <li>{e.to_string()}</li> })
									.collect_view()
							}}
						</ul>
					}
				}>
					{diagram
						.map(|data| {
							view! {
								<div class="concept-map">
									<div class="graph-overlay">
										<h3>"Concept Relationship Map (Scroll to Zoom, Drag to Pan)"</h3>
									</div>
									<ForceGraphCanvas
										data=Signal::stored(data)
										width=Some(800.0)
										height=Some(400.0)
									/>
								</div>
							}
						})}
				</ErrorBoundary>
			</section>

			<ComparisonPanel analysis=analysis active_tab=active_tab />
		</main>

		<form class="query-bar" on:submit=on_submit>
			<input
				type="text"
				placeholder="Ask a technical follow-up question..."
				prop:value=move || question.get()
				on:input=move |ev| question.set(event_target_value(&ev))
			/>
			<button type="submit">"Send"</button>
		</form>

		<WhitepaperDialog document=whitepaper />
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn concept_map_parses_into_two_stars() {
		let data = concept_map().unwrap();
		assert_eq!(data.nodes.len(), 9);
		assert_eq!(data.links.len(), 8);
		assert!(data.links.iter().all(|link| link.value == 1.0));

		let groups = |g: u32| data.nodes.iter().filter(|n| n.group == g).count();
		assert_eq!((groups(0), groups(1), groups(2)), (1, 4, 4));
		let fanout = |hub: &str| data.links.iter().filter(|l| l.source == hub).count();
		assert_eq!(fanout("Graphs"), 2);
		assert_eq!(fanout("Wikidata"), 3);
		assert_eq!(fanout("Spanner"), 3);
	}
}
