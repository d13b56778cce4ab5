use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::debug;

use crate::components::SessionHandle;
use crate::components::force_graph::scale::ColorBucket;
use crate::components::force_graph::{ForceGraphCanvas, GraphData};
use crate::components::panels::{PanelTab, PublicationsPanel, SummaryPanel};
use crate::components::search_bar::SearchBar;
use crate::session::{GatewayConfig, Panel, SessionStatus};

/// Graph, panels and a floating search bar for one exploration session. The `q`
/// query parameter starts a session on arrival and again whenever it changes.
#[component]
pub fn Results() -> impl IntoView {
	let session = SessionHandle::new(GatewayConfig::from_build_env());
	let text = RwSignal::new(String::new());
	let tag_message = RwSignal::new(None::<String>);
	let query = use_query_map();

	Effect::new(move |_| {
		let Some(q) = query.with(|params| params.get("q")) else {
			return;
		};
		debug!("results page opened for {q:?}");
		text.set(q.clone());
		session.submit_query(&q);
	});

	let graph = Memo::new(move |_| session.with_view(GraphData::from_view));
	let loading =
		Signal::derive(move || session.with_view(|view| view.status() == SessionStatus::Loading));

	let overlay = move || {
		let data = graph.get();
		let status = session.with_view(|view| view.status());
		let line = match status {
			SessionStatus::Idle => "Search for a topic to build its graph.".to_string(),
			SessionStatus::Loading if data.is_empty() => "Loading graph...".to_string(),
			_ if data.is_empty() => "No tags found for this query.".to_string(),
			_ => data.stats(),
		};
		view! { <p class="graph-stats">{line}</p> }
	};

	let tag_popup = move || {
		tag_message.get().map(|message| {
			view! {
				<div class="tag-popup" on:click=move |_| tag_message.set(None)>
					<pre>{message}</pre>
				</div>
			}
		})
	};

	let legend = ColorBucket::ALL
		.into_iter()
		.map(|bucket| {
			view! {
				<li class=format!("legend-{}", bucket.as_str())>
					<span class="legend-swatch" style=format!("background: {}", bucket.color()) />
					{bucket.as_str()}
				</li>
			}
		})
		.collect_view();

	view! {
		<div class="fullscreen-graph">
			<ForceGraphCanvas
				data=graph
				fullscreen=true
				on_node_click=Callback::new(move |message| tag_message.set(Some(message)))
			/>
			<div class="graph-overlay">
				<h1>"CosmoGraph"</h1>
				{overlay}
			</div>
			<ul class="graph-legend">{legend}</ul>
			{tag_popup}
			<div class="floating-search">
				<SearchBar
					text=text
					on_search=move |raw: String| session.submit_query(&raw)
					busy=loading
				/>
			</div>
			<PublicationsPanel session=session />
			<SummaryPanel session=session />
			<PanelTab session=session panel=Panel::Publications />
			<PanelTab session=session panel=Panel::Summary />
		</div>
	}
}
