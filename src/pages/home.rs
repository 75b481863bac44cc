use leptos::prelude::*;
use log::{error, warn};
use web_sys::MouseEvent;

use crate::components::force_graph::{GraphCamera, KnowledgeGraphCanvas, LayoutConfig, ViewMode};
use crate::graph::{AGE_WINDOW_MS, GraphData, GraphNode, Note, build_graph, generate_theme};
use crate::store::{BrowserNoteStore, NoteStore};

/// A small linked library shown when nothing is stored yet.
fn sample_notes(now_ms: f64) -> Vec<Note> {
	let entries = [
		("1", "Rust Snippets", "rust", "Index of [[Iterators]], [[Error Handling]] and [[Lifetimes]].", 0.0),
		("2", "Iterators", "rust", "Adapters, `fold`, see [[Closures]].", 0.2),
		("3", "Error Handling", "rust", "`?`, thiserror, anyhow. Related: [[Iterators]].", 0.4),
		("4", "Lifetimes", "rust", "Borrowing rules. [[Closures]] capture by ref.", 0.7),
		("5", "Closures", "rust", "Fn, FnMut, FnOnce.", 0.9),
		("6", "Shell One-liners", "bash", "find, xargs, [[Regex Cheatsheet]].", 0.5),
		("7", "Regex Cheatsheet", "markdown", "Character classes and [[Missing Page]].", 1.0),
		("8", "Scratch", "markdown", "Nothing linked yet.", 0.1),
	];
	entries
		.into_iter()
		.map(|(id, title, language, code, age)| Note {
			language: language.into(),
			is_pinned: id == "1",
			is_favorite: id == "6",
			timestamp: Some((now_ms - age * AGE_WINDOW_MS) as i64),
			..Note::new(id, title, code)
		})
		.collect()
}

fn load_graph(store: &impl NoteStore) -> GraphData {
	match store.get_all_notes() {
		Ok(notes) if notes.is_empty() => build_graph(&sample_notes(js_sys::Date::now())),
		Ok(notes) => build_graph(&notes),
		Err(e) => {
			error!("failed to load notes: {}", e);
			GraphData::default()
		}
	}
}

fn load_config(store: &BrowserNoteStore) -> LayoutConfig {
	store
		.load_settings()
		.map(|settings| LayoutConfig::from_settings(&settings))
		.unwrap_or_else(|e| {
			warn!("using default layout settings: {}", e);
			LayoutConfig::default()
		})
}

/// Arena-owned camera; the `StoredValue` handle is `Copy + Send`.
fn camera_handle() -> StoredValue<GraphCamera, LocalStorage> {
	StoredValue::new_local(GraphCamera::new())
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let store = BrowserNoteStore::default();
	let graph = RwSignal::new(load_graph(&store));
	let mode = RwSignal::new(ViewMode::Universe);
	let query = RwSignal::new(String::new());
	let theme = RwSignal::new(generate_theme());
	let selected = RwSignal::new(None::<GraphNode>);
	let hovered = RwSignal::new(None::<GraphNode>);
	let camera = camera_handle();
	let config = load_config(&store);

	let on_select = Callback::new(move |node: Option<GraphNode>| selected.set(node));
	let on_hover = Callback::new(move |node: Option<GraphNode>| hovered.set(node));

	let focus_selected = move |_: MouseEvent| {
		if let Some(node) = selected.get_untracked() {
			mode.set(ViewMode::Neighborhood { focus: node.id });
		}
	};
	let refresh = move |_: MouseEvent| graph.set(load_graph(&BrowserNoteStore::default()));

	let status = move || {
		graph.with(|g| format!("{} notes, {} links", g.nodes.len(), g.links.len()))
	};
	let details = move || {
		hovered.get().or_else(|| selected.get()).map(|node| {
			view! {
				<p class="node-details">
					{node.title} " · " {node.language} " · " {node.count} " links"
				</p>
			}
		})
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<KnowledgeGraphCanvas
					data=graph
					mode=mode
					query=query
					theme=theme
					camera=camera.get_value()
					config=config.clone()
					on_node_selected=on_select
					on_node_hovered=on_hover
					fullscreen=true
				/>
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<p class="subtitle">{status}</p>
					<input
						type="search"
						placeholder="Filter by title or language"
						prop:value=move || query.get()
						on:input=move |ev| query.set(event_target_value(&ev))
					/>
					<div class="graph-modes">
						<button on:click=move |_| mode.set(ViewMode::Universe)>"Universe"</button>
						<button on:click=move |_| mode.set(ViewMode::Orb)>"Orb"</button>
						<button
							disabled=move || selected.with(Option::is_none)
							on:click=focus_selected
						>
							"Neighborhood"
						</button>
					</div>
					<div class="graph-camera">
						<button on:click=move |_| camera.with_value(GraphCamera::zoom_in)>"+"</button>
						<button on:click=move |_| camera.with_value(GraphCamera::zoom_out)>"-"</button>
						<button on:click=move |_| camera.with_value(GraphCamera::zoom_to_fit)>"Fit"</button>
						<button on:click=move |_| {
							if let Some(node) = selected.get_untracked() {
								camera.with_value(|c| c.center_on(&node.id));
							}
						}>"Center"</button>
						<button on:click=move |_| camera.with_value(GraphCamera::release_all)>"Unpin"</button>
						<button on:click=move |_| theme.set(generate_theme())>"Theme"</button>
						<button on:click=refresh>"Refresh"</button>
					</div>
					{details}
				</div>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn assert_send_sync<T: Send + Sync + Copy + 'static>(_: &T) {}

	#[test]
	fn camera_handle_moves_into_send_closures() {
		let owner = Owner::new();
		owner.with(|| {
			let camera = camera_handle();
			assert_send_sync(&camera);
			let shared = camera.get_value();
			camera.with_value(GraphCamera::zoom_in);
			assert!(!camera.with_value(GraphCamera::is_ready));
			assert!(!shared.is_ready());
		});
	}
}
