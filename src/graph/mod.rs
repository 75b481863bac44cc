//! Wiki-link graph: extraction, construction, views and canvas themes.

mod builder;
mod filter;
mod links;
pub mod theme;
mod types;

pub use builder::{BASE_NODE_SIZE, build_graph, build_graph_from_value, node_size};
pub use filter::{filter_by_neighborhood, filter_by_query, hub, sort_by_degree};
pub use links::extract_links;
pub use theme::{Theme, generate_theme, generate_theme_with};
pub use types::{AGE_WINDOW_MS, GraphData, GraphLink, GraphNode, LinkEndpoint, Note, WIKILINK};
