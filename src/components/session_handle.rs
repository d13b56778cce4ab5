use leptos::prelude::*;

use crate::session::{
	GatewayConfig, HttpGateway, Panel, PanelVisibility, Publication, SelectError,
	SessionController, ViewModel,
};

/// Reactive handle on the page's [`SessionController`].
///
/// Reads go through a revision signal bumped by the controller after every change, so
/// any closure that reads the view model re-runs when it changes.
#[derive(Clone, Copy)]
pub struct SessionHandle {
	controller: StoredValue<SessionController<HttpGateway>, LocalStorage>,
	revision: RwSignal<u64>,
}

impl SessionHandle {
	pub fn new(config: GatewayConfig) -> Self {
		let top_k = config.top_k;
		let controller = SessionController::new(HttpGateway::new(config), top_k, |task| {
			leptos::task::spawn_local(task)
		});
		let revision = RwSignal::new(0u64);
		controller.subscribe(move || revision.update(|r| *r = r.wrapping_add(1)));
		Self {
			controller: StoredValue::new_local(controller),
			revision,
		}
	}

	pub fn with_view<R>(&self, f: impl FnOnce(&ViewModel) -> R) -> R {
		self.revision.track();
		self.controller.with_value(|controller| controller.with_view(f))
	}

	pub fn panels(&self) -> PanelVisibility {
		self.revision.track();
		self.controller.with_value(SessionController::panels)
	}

	pub fn is_visible(&self, panel: Panel) -> bool {
		self.panels().is_visible(panel)
	}

	pub fn submit_query(&self, query: &str) {
		self.controller.with_value(|controller| {
			controller.submit_query(query);
		});
	}

	/// Rejects publications that are not in the current results, e.g. a click that races
	/// a new query replacing the list.
	pub fn select(&self, publication: &Publication) -> Result<(), SelectError> {
		self.controller.with_value(|controller| controller.select(publication))
	}

	pub fn toggle_panel(&self, panel: Panel) {
		self.controller.with_value(|controller| controller.toggle_panel(panel));
	}
}
