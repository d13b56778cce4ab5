use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::search_bar::SearchBar;
use crate::session::Query;

/// Suggestions offered under the landing search box.
const COMMON_TERMS: [&str; 5] = ["Mars", "Microgravity", "Water", "Plants", "Microbes"];

fn results_path(query: &Query) -> String {
	format!(
		"/results?q={}",
		String::from(js_sys::encode_uri_component(query.as_str()))
	)
}

/// Landing page: a single search box that hands over to the results page.
#[component]
pub fn Home() -> impl IntoView {
	let text = RwSignal::new(String::new());
	let navigate = use_navigate();

	let go = move |raw: String| {
		if let Some(query) = Query::parse(&raw) {
			navigate(&results_path(&query), NavigateOptions::default());
		}
	};
	let go_term = go.clone();

	view! {
		<main class="landing">
			<h1 class="brand">"CosmoGraph"</h1>
			<p class="subtitle">"Explore space biology research as a map of connected topics."</p>
			<SearchBar text=text on_search=go />
			<div class="common-terms">
				<span>"Common terms:"</span>
				{COMMON_TERMS
					.into_iter()
					.map(|term| {
						let go = go_term.clone();
						view! {
							<button
								class="term-chip"
								on:click=move |_| {
									text.set(term.to_string());
									go(term.to_string());
								}
							>
								{term}
							</button>
						}
					})
					.collect_view()}
			</div>
		</main>
	}
}
