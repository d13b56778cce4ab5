use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use cosmograph::session::{
	ErrorKind, FetchError, GraphLink, GraphNode, GraphPayload, Panel, Publication, SearchGateway,
	SelectError, SessionController, SessionStatus, Summary,
};
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;

type Reply<T> = oneshot::Sender<Result<T, FetchError>>;

#[derive(Clone, Debug, PartialEq)]
enum Call {
	Graph(String, usize),
	Summary(String, usize),
}

#[derive(Default)]
struct Script {
	calls: Vec<Call>,
	graph: HashMap<String, Vec<Reply<GraphPayload>>>,
	summary: HashMap<String, Vec<Reply<Summary>>>,
}

/// Gateway whose responses are released by the test, in whatever order it chooses.
#[derive(Clone, Default)]
struct ScriptedGateway {
	script: Rc<RefCell<Script>>,
}

impl ScriptedGateway {
	fn calls(&self) -> Vec<Call> {
		self.script.borrow().calls.clone()
	}

	fn resolve_graph(&self, query: &str, result: Result<GraphPayload, FetchError>) {
		let reply = take_pending(&mut self.script.borrow_mut().graph, query);
		reply.send(result).expect("graph fetch still awaiting");
	}

	fn resolve_summary(&self, query: &str, result: Result<Summary, FetchError>) {
		let reply = take_pending(&mut self.script.borrow_mut().summary, query);
		reply.send(result).expect("summary fetch still awaiting");
	}
}

fn take_pending<T>(pending: &mut HashMap<String, Vec<Reply<T>>>, query: &str) -> Reply<T> {
	let queue = pending
		.get_mut(query)
		.filter(|queue| !queue.is_empty())
		.unwrap_or_else(|| panic!("no pending fetch for `{query}`"));
	queue.remove(0)
}

#[async_trait(?Send)]
impl SearchGateway for ScriptedGateway {
	async fn fetch_graph(&self, query: &str, top_k: usize) -> Result<GraphPayload, FetchError> {
		let (tx, rx) = oneshot::channel();
		{
			let mut script = self.script.borrow_mut();
			script.calls.push(Call::Graph(query.to_string(), top_k));
			script.graph.entry(query.to_string()).or_default().push(tx);
		}
		rx.await.unwrap_or_else(|_| Err(FetchError::transport("reply dropped")))
	}

	async fn fetch_summary(&self, subject: &str, top_k: usize) -> Result<Summary, FetchError> {
		let (tx, rx) = oneshot::channel();
		{
			let mut script = self.script.borrow_mut();
			script.calls.push(Call::Summary(subject.to_string(), top_k));
			script.summary.entry(subject.to_string()).or_default().push(tx);
		}
		rx.await.unwrap_or_else(|_| Err(FetchError::transport("reply dropped")))
	}
}

struct Harness {
	pool: LocalPool,
	gateway: ScriptedGateway,
	session: SessionController<ScriptedGateway>,
}

impl Harness {
	fn new() -> Self {
		let pool = LocalPool::new();
		let spawner = pool.spawner();
		let gateway = ScriptedGateway::default();
		let session = SessionController::new(gateway.clone(), 50, move |task| {
			spawner.spawn_local(task).expect("spawn session task");
		});
		Self {
			pool,
			gateway,
			session,
		}
	}

	fn run(&mut self) {
		self.pool.run_until_stalled();
	}

	/// Submits `query` and lets it settle with `payload` and `summary`.
	fn complete(&mut self, query: &str, payload: GraphPayload, summary: &str) {
		self.session.submit_query(query).expect("non-blank query");
		self.run();
		self.gateway.resolve_graph(query, Ok(payload));
		self.gateway.resolve_summary(query, Ok(Summary::Text(summary.to_string())));
		self.run();
	}
}

fn publication(id: &str, title: &str) -> Publication {
	Publication::new(Some(id), title)
}

fn payload(tags: &[(&str, u32)], publications: Vec<Publication>) -> GraphPayload {
	let nodes: Vec<GraphNode> = tags
		.iter()
		.map(|(tag, group)| GraphNode {
			id: tag.to_string(),
			label: tag.to_string(),
			group: *group,
		})
		.collect();
	let links = nodes
		.windows(2)
		.map(|pair| GraphLink {
			source: pair[0].id.clone(),
			target: pair[1].id.clone(),
			weight: 2.0,
		})
		.collect();
	GraphPayload {
		nodes,
		links,
		publications,
	}
}

fn mars_payload() -> GraphPayload {
	payload(
		&[("mars", 5), ("regolith", 2)],
		vec![
			publication("1", "Water Recovery Systems on Mars Missions"),
			publication("2", "Regolith Simulants for Plant Growth"),
		],
	)
}

fn water_payload() -> GraphPayload {
	payload(
		&[("water", 4), ("recycling", 3), ("urine", 1)],
		vec![publication("10", "Closed-Loop Water Recycling")],
	)
}

#[test]
fn ready_session_auto_selects_first_publication() {
	let mut h = Harness::new();
	h.complete("mars", mars_payload(), "Mars summary");

	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Ready);
	assert_eq!(view.query().map(|q| q.as_str()), Some("mars"));
	assert_eq!(view.nodes().len(), 2);
	assert_eq!(view.links().len(), 1);
	assert_eq!(view.publications().len(), 2);
	assert_eq!(view.selected(), Some(&publication("1", "Water Recovery Systems on Mars Missions")));
	assert_eq!(view.summary(), &Summary::Text("Mars summary".into()));
	assert_eq!(view.error(), None);
}

#[test]
fn empty_results_leave_nothing_selected() {
	let mut h = Harness::new();
	h.complete("xenon", payload(&[], vec![]), "No relevant data found.");

	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Ready);
	assert!(view.publications().is_empty());
	assert_eq!(view.selected(), None);
}

#[test]
fn publications_are_deduplicated_before_display() {
	let mut h = Harness::new();
	let duplicated = payload(
		&[("mars", 5)],
		vec![
			publication("1", "A"),
			publication("2", "B"),
			publication("1", "A2"),
			Publication::new(None, "B"),
		],
	);
	h.complete("mars", duplicated, "summary");

	let view = h.session.view();
	assert_eq!(view.publications(), &[publication("1", "A"), publication("2", "B")]);
}

#[test]
fn both_fetches_are_issued_before_either_resolves() {
	let mut h = Harness::new();
	h.session.submit_query("  plant growth  ");
	h.run();

	assert_eq!(
		h.gateway.calls(),
		vec![
			Call::Graph("plant growth".into(), 50),
			Call::Summary("plant growth".into(), 50)
		]
	);

	// Summary first, graph later: still Loading until both settle.
	h.gateway.resolve_summary("plant growth", Ok(Summary::Text("Plants adapt.".into())));
	h.run();
	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Loading);
	assert_eq!(view.summary(), &Summary::Text("Plants adapt.".into()));

	h.gateway.resolve_graph("plant growth", Ok(mars_payload()));
	h.run();
	assert_eq!(h.session.view().status(), SessionStatus::Ready);
}

#[test]
fn stale_results_never_overwrite_newer_query() {
	let mut h = Harness::new();
	h.session.submit_query("mars");
	h.session.submit_query("water");
	h.run();

	h.gateway.resolve_graph("water", Ok(water_payload()));
	h.gateway.resolve_summary("water", Ok(Summary::Text("Water summary".into())));
	h.run();
	let settled = h.session.view();
	assert_eq!(settled.status(), SessionStatus::Ready);

	h.gateway.resolve_graph("mars", Ok(mars_payload()));
	h.gateway.resolve_summary("mars", Ok(Summary::Text("Mars summary".into())));
	h.run();

	let view = h.session.view();
	assert_eq!(view, settled);
	assert_eq!(view.query().map(|q| q.as_str()), Some("water"));
	assert_eq!(view.publications(), &[publication("10", "Closed-Loop Water Recycling")]);
	assert_eq!(view.summary(), &Summary::Text("Water summary".into()));
}

#[test]
fn stale_failure_is_not_reported() {
	let mut h = Harness::new();
	h.session.submit_query("mars");
	h.session.submit_query("water");
	h.run();

	h.gateway.resolve_graph("mars", Err(FetchError::transport("connection reset")));
	h.gateway.resolve_summary("mars", Err(FetchError::Timeout));
	h.run();

	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Loading);
	assert_eq!(view.error(), None);
}

#[test]
fn resubmitting_same_query_discards_the_first_attempt() {
	let mut h = Harness::new();
	let first = h.session.submit_query("mars").unwrap();
	h.run();
	let second = h.session.submit_query("mars").unwrap();
	h.run();
	assert!(second > first);
	assert_eq!(h.session.current_session(), second);

	// Replies are released in call order: the first pair belongs to the stale session.
	h.gateway.resolve_graph("mars", Ok(payload(&[("old", 1)], vec![publication("9", "Old")])));
	h.gateway.resolve_summary("mars", Ok(Summary::Text("old".into())));
	h.run();
	assert_eq!(h.session.view().status(), SessionStatus::Loading);
	assert!(h.session.view().nodes().is_empty());

	h.gateway.resolve_graph("mars", Ok(mars_payload()));
	h.gateway.resolve_summary("mars", Ok(Summary::Text("new".into())));
	h.run();
	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Ready);
	assert_eq!(view.nodes()[0].id, "mars");
	assert_eq!(view.summary(), &Summary::Text("new".into()));
}

#[test]
fn blank_query_is_a_no_op() {
	let mut h = Harness::new();
	assert_eq!(h.session.submit_query(""), None);
	assert_eq!(h.session.submit_query("   "), None);
	h.run();
	assert_eq!(h.session.view().status(), SessionStatus::Idle);
	assert!(h.gateway.calls().is_empty());

	h.complete("mars", mars_payload(), "Mars summary");
	let before = h.session.view();
	let calls = h.gateway.calls().len();

	assert_eq!(h.session.submit_query(" \t"), None);
	h.run();
	assert_eq!(h.session.view(), before);
	assert_eq!(h.session.view().status(), SessionStatus::Ready);
	assert_eq!(h.gateway.calls().len(), calls);
}

#[test]
fn summary_failure_keeps_graph_results() {
	let mut h = Harness::new();
	h.session.submit_query("mars");
	h.run();
	h.gateway.resolve_graph("mars", Ok(mars_payload()));
	h.gateway.resolve_summary(
		"mars",
		Err(FetchError::Status {
			code: 500,
			body: "Internal Server Error".into(),
		}),
	);
	h.run();

	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Failed);
	assert_eq!(view.nodes().len(), 2);
	assert_eq!(view.links().len(), 1);
	assert_eq!(view.publications().len(), 2);
	assert!(view.selected().is_some());
	assert_eq!(view.summary(), &Summary::Placeholder);
	assert_eq!(view.error().map(FetchError::kind), Some(ErrorKind::TransportFailure));
}

#[test]
fn summary_failure_keeps_previous_summary() {
	let mut h = Harness::new();
	h.complete("mars", mars_payload(), "Mars summary");

	h.session.submit_query("water");
	h.run();
	h.gateway.resolve_graph("water", Ok(water_payload()));
	h.gateway.resolve_summary("water", Err(FetchError::Timeout));
	h.run();

	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Failed);
	assert_eq!(view.summary(), &Summary::Text("Mars summary".into()));
	assert_eq!(view.publications().len(), 1);
}

#[test]
fn malformed_graph_still_honours_summary() {
	let mut h = Harness::new();
	h.session.submit_query("mars");
	h.run();

	let mut dangling = mars_payload();
	dangling.links.push(GraphLink {
		source: "mars".into(),
		target: "phobos".into(),
		weight: 1.0,
	});
	h.gateway.resolve_graph("mars", Ok(dangling));
	h.run();
	assert_eq!(h.session.view().status(), SessionStatus::Failed);

	h.gateway.resolve_summary("mars", Ok(Summary::Text("Mars summary".into())));
	h.run();

	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Failed);
	assert!(view.nodes().is_empty());
	assert!(view.publications().is_empty());
	assert_eq!(view.summary(), &Summary::Text("Mars summary".into()));
	assert_eq!(view.error().map(FetchError::kind), Some(ErrorKind::MalformedResponse));
}

#[test]
fn failed_session_can_be_retried_from_scratch() {
	let mut h = Harness::new();
	h.session.submit_query("mars");
	h.run();
	h.gateway.resolve_graph("mars", Err(FetchError::transport("connection refused")));
	h.gateway.resolve_summary("mars", Err(FetchError::transport("connection refused")));
	h.run();
	assert_eq!(h.session.view().status(), SessionStatus::Failed);

	h.complete("mars", mars_payload(), "Mars summary");
	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Ready);
	assert_eq!(view.error(), None);
}

#[test]
fn new_query_retains_summary_and_clears_results_while_loading() {
	let mut h = Harness::new();
	h.complete("mars", mars_payload(), "Mars summary");

	h.session.submit_query("water");
	let view = h.session.view();
	assert_eq!(view.status(), SessionStatus::Loading);
	assert!(view.publications().is_empty());
	assert!(view.nodes().is_empty());
	assert_eq!(view.selected(), None);
	assert_eq!(view.summary(), &Summary::Text("Mars summary".into()));
}

#[test]
fn selecting_switches_publication_without_fetching() {
	let mut h = Harness::new();
	h.complete("mars", mars_payload(), "Mars summary");
	let calls = h.gateway.calls().len();

	h.session.toggle_panel(Panel::Summary);
	assert!(!h.session.panels().is_visible(Panel::Summary));

	let second = h.session.view().publications()[1].clone();
	h.session.select(&second).unwrap();
	h.run();

	let view = h.session.view();
	assert_eq!(view.selected(), Some(&second));
	assert_eq!(view.summary(), &Summary::Text("Mars summary".into()));
	assert!(h.session.panels().is_visible(Panel::Summary));
	assert_eq!(h.gateway.calls().len(), calls);
}

#[test]
fn selecting_unknown_publication_is_rejected() {
	let mut h = Harness::new();
	h.complete("mars", mars_payload(), "Mars summary");
	h.session.toggle_panel(Panel::Summary);

	let result = h.session.select(&publication("99", "Not In Results"));
	assert_eq!(
		result,
		Err(SelectError::NotInResults {
			title: "Not In Results".into()
		})
	);
	let view = h.session.view();
	assert_eq!(
		view.selected().map(|p| p.title.as_str()),
		Some("Water Recovery Systems on Mars Missions")
	);
	assert!(!h.session.panels().is_visible(Panel::Summary));
}

#[test]
fn panels_toggle_in_every_status() {
	let mut h = Harness::new();
	h.session.toggle_panel(Panel::Publications);
	assert!(!h.session.panels().is_visible(Panel::Publications));

	h.session.submit_query("mars");
	h.session.toggle_panel(Panel::Publications);
	assert_eq!(h.session.view().status(), SessionStatus::Loading);
	assert!(h.session.panels().is_visible(Panel::Publications));

	h.run();
	h.gateway.resolve_graph("mars", Err(FetchError::malformed("missing field `nodes`")));
	h.run();
	assert_eq!(h.session.view().status(), SessionStatus::Failed);
	h.session.toggle_panel(Panel::Summary);
	h.session.toggle_panel(Panel::Publications);
	assert!(!h.session.panels().is_visible(Panel::Summary));
	assert!(!h.session.panels().is_visible(Panel::Publications));

	// Hiding panels never discards data.
	h.gateway.resolve_summary("mars", Ok(Summary::Text("kept".into())));
	h.run();
	assert_eq!(h.session.view().summary(), &Summary::Text("kept".into()));
}

#[test]
fn listeners_hear_about_every_change() {
	let mut h = Harness::new();
	let changes = Rc::new(Cell::new(0));
	let counter = Rc::clone(&changes);
	h.session.subscribe(move || counter.set(counter.get() + 1));

	h.session.submit_query("");
	assert_eq!(changes.get(), 0);

	h.complete("mars", mars_payload(), "Mars summary");
	// submit, graph, summary, settle
	assert_eq!(changes.get(), 4);

	h.session.toggle_panel(Panel::Publications);
	assert_eq!(changes.get(), 5);

	h.session.submit_query("water");
	h.session.submit_query("plants");
	h.run();
	h.gateway.resolve_graph("water", Ok(water_payload()));
	h.run();
	assert_eq!(changes.get(), 7);
}
