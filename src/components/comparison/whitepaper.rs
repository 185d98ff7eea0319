use leptos::ev::MouseEvent;
use leptos::prelude::*;

/// Modal showing a generated whitepaper. Clearing `document` closes it.
#[component]
pub fn WhitepaperDialog(document: RwSignal<Option<String>>) -> impl IntoView {
	let close = move |_: MouseEvent| document.set(None);

	move || {
		document.get().map(|text| {
			view! {
				<div class="whitepaper-backdrop" on:click=close></div>
				<div class="whitepaper" role="dialog" aria-modal="true">
					<header>
						<h3>"Technical Architecture Whitepaper"</h3>
						<button class="close" on:click=close>
							"Close"
						</button>
					</header>
					<pre class="whitepaper-body">{text}</pre>
				</div>
			}
		})
	}
}
