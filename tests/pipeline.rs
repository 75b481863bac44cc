use serde_json::json;
use snippet_graph::graph::build_graph_from_value;
use snippet_graph::store::{MemoryNoteStore, NoteStore};
use snippet_graph::{
	CameraCommand, ForceGraphState, GraphCamera, LayoutConfig, Note, ViewMode, build_graph,
};

fn scenario() -> Vec<Note> {
	vec![
		Note::new("1", "Alpha", "see [[Beta]]"),
		Note::new("2", "Beta", "no links"),
		Note::new("3", "Gamma", "[[NotExist]] and [[alpha]]"),
	]
}

#[test]
fn alpha_beta_gamma_scenario() {
	let store = MemoryNoteStore::new(scenario());
	let graph = build_graph(&store.get_all_notes().unwrap());

	let counts: Vec<(&str, u32)> = graph.nodes.iter().map(|n| (n.id.as_str(), n.count)).collect();
	assert_eq!(counts, vec![("1", 2), ("2", 1), ("3", 1)]);

	let links: Vec<(&str, &str)> = graph
		.links
		.iter()
		.map(|l| (l.source_id(), l.target_id()))
		.collect();
	assert_eq!(links, vec![("1", "2"), ("3", "1")]);
}

#[test]
fn host_json_round_trip_through_builder() {
	let graph = build_graph_from_value(&json!([
		{"id": "1", "title": "Alpha", "code": "see [[Beta]]", "is_pinned": true},
		{"id": "2", "title": "Beta", "code": "no links", "language": "rust"},
		{"id": "3", "title": "Gamma", "code": "[[NotExist]] and [[alpha]]"}
	]));
	assert_eq!(graph, build_graph(&{
		let mut notes = scenario();
		notes[0].is_pinned = true;
		notes[1].language = "rust".into();
		notes
	}));

	let json = serde_json::to_value(&graph).unwrap();
	assert_eq!(json["nodes"][0]["isPinned"], true);
	assert_eq!(json["links"][0], json!({"source": "1", "target": "2", "type": "wikilink"}));
}

#[test]
fn empty_inputs_give_empty_graphs() {
	assert!(build_graph(&[]).nodes.is_empty());
	let graph = build_graph_from_value(&serde_json::Value::Null);
	assert!(graph.nodes.is_empty() && graph.links.is_empty());
}

#[test]
fn camera_handle_drives_a_loaded_layout() {
	let graph = build_graph(&scenario());
	let camera = GraphCamera::new();
	camera.zoom_in();
	assert!(camera.transform().is_none());

	let mode = ViewMode::Orb;
	*camera.shared().borrow_mut() = Some(ForceGraphState::new(
		&mode.select(&graph, ""),
		mode,
		LayoutConfig::default(),
		640.0,
		480.0,
		0.0,
	));
	assert!(camera.is_ready());

	{
		let shared = camera.shared();
		let guard = shared.borrow();
		let pending = guard.as_ref().unwrap().pending_camera().unwrap();
		assert_eq!(pending.command, CameraCommand::CenterOnHub);
	}

	camera.zoom_in();
	let k = camera.transform().unwrap().k;
	assert!((k - 1.2).abs() < 1e-12);
	camera.zoom_out();
	assert!((camera.transform().unwrap().k - 1.0).abs() < 1e-12);

	assert!(camera.center_on("2"));
	assert!(!camera.center_on("missing"));

	// Teardown: dropping the state makes every command a no-op again.
	camera.shared().borrow_mut().take();
	camera.zoom_to_fit();
	assert!(!camera.is_ready());
}

#[test]
fn neighborhood_mode_on_store_update() {
	let mut store = MemoryNoteStore::new(scenario());
	store.upsert(Note::new("4", "Delta", "[[Beta]] [[Gamma]]"));
	let graph = build_graph(&store.get_all_notes().unwrap());

	let mode = ViewMode::Neighborhood { focus: "2".into() };
	let visible = mode.select(&graph, "");
	let ids: Vec<&str> = visible.nodes.iter().map(|n| n.id.as_str()).collect();
	// Equal degrees keep input order.
	assert_eq!(ids, vec!["1", "2", "4"]);
	assert_eq!(visible.links.len(), 2);
}
