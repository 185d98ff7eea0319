use leptos::prelude::*;

use crate::analysis::{AnalysisResponse, ComparisonData, GroundingSource};

/// Category tabs, the cards of the active tab, key differences and the
/// grounding sources of one analysis.
#[component]
pub fn ComparisonPanel(
	#[prop(into)] analysis: Signal<Option<AnalysisResponse>>,
	active_tab: RwSignal<String>,
) -> impl IntoView {
	let categories = move || {
		analysis.with(|data| {
			data.as_ref()
				.map(|data| data.categories().into_iter().map(str::to_owned).collect::<Vec<_>>())
				.unwrap_or_default()
		})
	};
	let cards = move || {
		let tab = active_tab.get();
		analysis.with(|data| {
			data.as_ref()
				.map(|data| data.cards_in(&tab).cloned().collect::<Vec<_>>())
				.unwrap_or_default()
		})
	};
	let differences = move || {
		analysis.with(|data| data.as_ref().map(|d| d.key_differences.clone()).unwrap_or_default())
	};
	let sources = move || {
		analysis.with(|data| data.as_ref().map(|d| d.sources.clone()).unwrap_or_default())
	};

	view! {
		<section class="comparison">
			<nav class="comparison-tabs">
				{move || {
					categories()
						.into_iter()
						.map(|category| {
							let selected = category.clone();
							let tab = category.clone();
							view! {
								<button
									class=move || {
										if active_tab.get() == selected { "tab active" } else { "tab" }
									}
									on:click=move |_| active_tab.set(tab.clone())
								>
									{category}
								</button>
							}
						})
						.collect_view()
				}}
			</nav>
			<div class="comparison-cards">
				{move || {
					cards().into_iter().map(|card| view! { <ComparisonCard card=card /> }).collect_view()
				}}
			</div>
		</section>

		<section class="key-differences">
			<h3>"Strategic Divergence"</h3>
			<ul>
				{move || {
					differences()
						.into_iter()
						.map(|diff| view! { <li>{diff}</li> })
						.collect_view()
				}}
			</ul>
		</section>

		<section class="sources">
			<h3>"Web Verification"</h3>
			{move || {
				sources().into_iter().map(|source| view! { <SourceLink source=source /> }).collect_view()
			}}
		</section>
	}
}

#[component]
fn ComparisonCard(card: ComparisonData) -> impl IntoView {
	view! {
		<article class="comparison-card">
			<h4>{card.title}</h4>
			<p class="description">{card.description}</p>
			<div class="value wikidata">
				<span>"WIKIDATA"</span>
				<p>{card.wikidata_value}</p>
			</div>
			<div class="value spanner">
				<span>"SPANNER GRAPH"</span>
				<p>{card.grokipedia_value}</p>
			</div>
		</article>
	}
}

#[component]
fn SourceLink(source: GroundingSource) -> impl IntoView {
	view! {
		<a class="source" href=source.uri target="_blank" rel="noopener noreferrer">
			{source.title}
		</a>
	}
}
