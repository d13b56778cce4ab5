//! Query session core: view model, deduplication, panel state, the search gateway and
//! the controller tying them together. Nothing in here touches the DOM.

mod config;
mod controller;
mod dedup;
mod error;
mod gateway;
mod model;
mod panels;

pub use config::GatewayConfig;
pub use controller::{SessionController, SessionId};
pub use dedup::dedup_publications;
pub use error::{ErrorKind, FetchError, SelectError};
pub use gateway::{HttpGateway, SearchGateway, decode_graph};
pub use model::{
	GraphLink, GraphNode, GraphPayload, GraphSnapshot, Publication, PublicationId, Query,
	SUMMARY_PLACEHOLDER, SessionStatus, Summary, ViewModel,
};
pub use panels::{Panel, PanelVisibility};
