//! Turns submitted queries into view model snapshots.
//!
//! Each submission replaces the view model wholesale and starts the graph and summary
//! fetches concurrently. Both are tagged with the session that issued them; a result that
//! lands after a newer submission is dropped without touching the view model.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use log::{debug, info, warn};

use super::error::SelectError;
use super::gateway::SearchGateway;
use super::model::{GraphPayload, Publication, Query, ViewModel};
use super::panels::{Panel, PanelVisibility};

/// Monotonic id of one submission.
pub type SessionId = u64;

type Spawner = Rc<dyn Fn(LocalBoxFuture<'static, ()>)>;
type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct SessionState {
	view: ViewModel,
	panels: PanelVisibility,
	current: SessionId,
	listeners: Vec<Listener>,
}

#[derive(Clone, Debug)]
struct Ticket {
	id: SessionId,
	query: Query,
}

/// Owns the [`ViewModel`] and [`PanelVisibility`] and is the only way to change them.
///
/// Cloning yields another handle to the same session. Fetches run on whatever executor
/// the `spawn` function given to [`SessionController::new`] hands them to.
pub struct SessionController<G> {
	gateway: Rc<G>,
	state: Rc<RefCell<SessionState>>,
	spawn: Spawner,
	top_k: usize,
}

impl<G> Clone for SessionController<G> {
	fn clone(&self) -> Self {
		Self {
			gateway: Rc::clone(&self.gateway),
			state: Rc::clone(&self.state),
			spawn: Rc::clone(&self.spawn),
			top_k: self.top_k,
		}
	}
}

impl<G: SearchGateway + 'static> SessionController<G> {
	pub fn new(
		gateway: G,
		top_k: usize,
		spawn: impl Fn(LocalBoxFuture<'static, ()>) + 'static,
	) -> Self {
		Self {
			gateway: Rc::new(gateway),
			state: Rc::new(RefCell::new(SessionState::default())),
			spawn: Rc::new(spawn),
			top_k,
		}
	}

	/// Starts a session for `raw`. Blank input is ignored and returns `None`; the current
	/// results stay untouched and the gateway is not called.
	pub fn submit_query(&self, raw: &str) -> Option<SessionId> {
		let Some(query) = Query::parse(raw) else {
			debug!("ignoring blank query");
			return None;
		};

		let ticket = {
			let mut state = self.state.borrow_mut();
			state.current += 1;
			let summary = state.view.summary().clone();
			state.view = ViewModel::begin(query.clone(), summary);
			Ticket {
				id: state.current,
				query,
			}
		};
		info!("session {} started for `{}`", ticket.id, ticket.query);
		self.notify();

		let id = ticket.id;
		(self.spawn)(self.clone().session_task(ticket).boxed_local());
		Some(id)
	}

	/// Makes `publication` the selected one and reveals the summary panel. Never fetches.
	pub fn select(&self, publication: &Publication) -> Result<(), SelectError> {
		{
			let mut state = self.state.borrow_mut();
			if let Err(err) = state.view.select(publication) {
				warn!("{err}");
				return Err(err);
			}
			state.panels.show(Panel::Summary);
		}
		self.notify();
		Ok(())
	}

	pub fn toggle_panel(&self, panel: Panel) {
		self.state.borrow_mut().panels.toggle(panel);
		self.notify();
	}

	pub fn with_view<R>(&self, f: impl FnOnce(&ViewModel) -> R) -> R {
		f(&self.state.borrow().view)
	}

	pub fn view(&self) -> ViewModel {
		self.with_view(ViewModel::clone)
	}

	pub fn panels(&self) -> PanelVisibility {
		self.state.borrow().panels
	}

	/// Id of the latest submission, 0 before the first one.
	pub fn current_session(&self) -> SessionId {
		self.state.borrow().current
	}

	/// Registers `listener` to run after every change to the view model or panels.
	pub fn subscribe(&self, listener: impl Fn() + 'static) {
		self.state.borrow_mut().listeners.push(Rc::new(listener));
	}

	fn session_task(self, ticket: Ticket) -> impl Future<Output = ()> {
		let graph = {
			let this = self.clone();
			let ticket = ticket.clone();
			async move {
				let result = this
					.gateway
					.fetch_graph(ticket.query.as_str(), this.top_k)
					.await
					.and_then(GraphPayload::into_snapshot);
				this.commit(&ticket, |view| match result {
					Ok(snapshot) => view.apply_graph(snapshot),
					Err(err) => {
						warn!("graph fetch for `{}` failed: {err}", ticket.query);
						view.fail(err);
					}
				});
			}
		};

		let summary = {
			let this = self.clone();
			let ticket = ticket.clone();
			async move {
				let subject = Self::summary_subject(&ticket);
				let result = this.gateway.fetch_summary(&subject, this.top_k).await;
				this.commit(&ticket, |view| match result {
					Ok(summary) => view.apply_summary(summary),
					Err(err) => {
						warn!("summary fetch for `{}` failed: {err}", ticket.query);
						view.fail(err);
					}
				});
			}
		};

		async move {
			futures::join!(graph, summary);
			if self.commit(&ticket, ViewModel::settle) {
				debug!("session {} settled", ticket.id);
			}
		}
	}

	/// What the summary is generated for. Summaries are scoped to the query, shared by
	/// every publication in the results.
	fn summary_subject(ticket: &Ticket) -> String {
		ticket.query.as_str().to_string()
	}

	/// Applies `update` if `ticket` still belongs to the current session.
	fn commit(&self, ticket: &Ticket, update: impl FnOnce(&mut ViewModel)) -> bool {
		{
			let mut state = self.state.borrow_mut();
			if state.current != ticket.id {
				debug!(
					"discarding stale result for `{}` (session {}, current {})",
					ticket.query, ticket.id, state.current
				);
				return false;
			}
			update(&mut state.view);
		}
		self.notify();
		true
	}

	fn notify(&self) {
		let listeners = self.state.borrow().listeners.clone();
		for listener in listeners {
			listener();
		}
	}
}
