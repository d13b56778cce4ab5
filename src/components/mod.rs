pub mod force_graph;
pub mod panels;
pub mod search_bar;
mod session_handle;

pub use session_handle::SessionHandle;
