use std::rc::Rc;

use leptos::ev::KeyboardEvent;
use leptos::prelude::*;

/// Text box plus button. `on_search` receives the raw text on Enter or click; blank
/// input is left for the receiver to ignore.
#[component]
pub fn SearchBar(
	text: RwSignal<String>,
	on_search: impl Fn(String) + 'static,
	#[prop(optional, into)] busy: MaybeProp<bool>,
	#[prop(default = "Search publications...")] placeholder: &'static str,
) -> impl IntoView {
	let on_search = Rc::new(on_search);
	let on_enter = Rc::clone(&on_search);

	view! {
		<div class="search-bar">
			<input
				type="text"
				placeholder=placeholder
				prop:value=move || text.get()
				on:input=move |ev| text.set(event_target_value(&ev))
				on:keydown=move |ev: KeyboardEvent| {
					if ev.key() == "Enter" {
						on_enter(text.get_untracked());
					}
				}
			/>
			<button on:click=move |_| on_search(text.get_untracked())>
				{move || if busy.get().unwrap_or(false) { "Loading..." } else { "Search" }}
			</button>
		</div>
	}
}
