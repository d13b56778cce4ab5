//! Side panels of the results page. They only render what the session holds; every
//! change goes back through [`SessionHandle`].

use leptos::prelude::*;
use log::debug;

use super::SessionHandle;
use crate::session::{Panel, SessionStatus};

/// Arrow tab that brings a hidden panel back.
#[component]
pub fn PanelTab(session: SessionHandle, panel: Panel) -> impl IntoView {
	let (class, title) = match panel {
		Panel::Publications => ("panel-tab panel-tab-left", "Show Publications"),
		Panel::Summary => ("panel-tab panel-tab-right", "Show Summary"),
	};

	view! {
		<Show when=move || !session.is_visible(panel)>
			<button
				class=class
				title=title
				aria-label=title
				on:click=move |_| session.toggle_panel(panel)
			>
				<span class="panel-tab-arrow" />
			</button>
		</Show>
	}
}

#[component]
pub fn PublicationsPanel(session: SessionHandle) -> impl IntoView {
	let list = move || {
		session.with_view(|view| {
			if view.publications().is_empty() {
				let hint = match view.status() {
					SessionStatus::Loading => "Loading publications...",
					SessionStatus::Failed => "No publications could be loaded.",
					_ => "No publications yet.",
				};
				return view! { <p class="panel-empty">{hint}</p> }.into_any();
			}

			let selected = view.selected().cloned();
			view.publications()
				.iter()
				.cloned()
				.map(|publication| {
					let class = if selected.as_ref() == Some(&publication) {
						"publication selected"
					} else {
						"publication"
					};
					let title = publication.title.clone();
					view! {
						<li>
							<button
								class=class
								on:click=move |_| {
									if let Err(err) = session.select(&publication) {
										debug!("selection dropped: {err}");
									}
								}
							>
								{title}
							</button>
						</li>
					}
				})
				.collect_view()
				.into_any()
		})
	};

	view! {
		<Show when=move || session.is_visible(Panel::Publications)>
			<aside class="panel panel-left">
				<h2>"Publications"</h2>
				<ul class="publication-list">{list}</ul>
				<button
					class="panel-close"
					on:click=move |_| session.toggle_panel(Panel::Publications)
				>
					"Close"
				</button>
			</aside>
		</Show>
	}
}

#[component]
pub fn SummaryPanel(session: SessionHandle) -> impl IntoView {
	let title = move || {
		session.with_view(|view| {
			view.selected()
				.map(|p| p.title.clone())
				.unwrap_or_else(|| "No publication selected".to_string())
		})
	};
	let article = move || {
		session
			.with_view(|view| view.selected().and_then(|p| p.link.clone()))
			.map(|href| {
				view! {
					<a class="view-article" href=href target="_blank" rel="noopener">
						"View article"
					</a>
				}
			})
	};
	let status = move || session.with_view(|view| view.status().label());
	let error = move || {
		session
			.with_view(|view| view.error().map(ToString::to_string))
			.map(|message| view! { <p class="panel-error">{message}</p> })
	};
	let summary = move || session.with_view(|view| view.summary().display_text());

	view! {
		<Show when=move || session.is_visible(Panel::Summary)>
			<aside class="panel panel-right">
				<h2>"Title"</h2>
				<p>{title}</p>
				<h2>"Status"</h2>
				<p class="panel-status">{status}</p>
				{error}
				<h2>"Summary"</h2>
				<p class="summary-text">{summary}</p>
				<div class="panel-actions">
					{article}
					<button
						class="panel-close"
						on:click=move |_| session.toggle_panel(Panel::Summary)
					>
						"Close"
					</button>
				</div>
			</aside>
		</Show>
	}
}
