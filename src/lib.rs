//! Knowledge graph for a snippet library: wiki links between notes, laid out
//! as a force-directed canvas with Leptos.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

#[cfg(target_arch = "wasm32")]
use getrandom as _;

// Modules
pub mod components;
mod error;
pub mod graph;
mod pages;
pub mod settings;
pub mod store;

pub use components::force_graph::{
	CameraCommand, ForceGraphState, GraphCamera, KnowledgeGraphCanvas, LayoutConfig, Release,
	ViewMode,
};
pub use error::{Error, Result};
pub use graph::{
	GraphData, GraphLink, GraphNode, LinkEndpoint, Note, Theme, build_graph, extract_links,
	filter_by_neighborhood, filter_by_query, generate_theme,
};

// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// An app router which renders the graph page and handles 404's
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />

		// sets the document title
		<Title text="Snippet Graph" />

		// injects metadata in the <head> of the page
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
