use std::collections::HashMap;

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use super::links::extract_links;
use super::types::{GraphData, GraphLink, GraphNode, Note};

/// Base visual size of a node with no links.
pub const BASE_NODE_SIZE: f64 = 8.0;

/// Visual size for a node of the given degree.
pub fn node_size(count: u32) -> f64 {
	BASE_NODE_SIZE + (count as f64 + 1.0).log2() * 4.0
}

fn title_key(title: &str) -> String {
	title.trim().to_lowercase()
}

/// Build the wiki-link graph for a note collection.
///
/// Every titled note becomes a node, in input order. Links resolve by
/// case-insensitive title; dangling targets and self references are dropped.
/// When two notes share a title the later one owns the lookup key, the earlier
/// one keeps its node and outgoing links but can no longer be linked to.
pub fn build_graph(notes: &[Note]) -> GraphData {
	let mut nodes: Vec<GraphNode> = Vec::with_capacity(notes.len());
	// Arena index of each titled note, parallel to `notes`.
	let mut note_slots: Vec<Option<usize>> = Vec::with_capacity(notes.len());
	let mut by_key: HashMap<String, usize> = HashMap::with_capacity(notes.len());

	for note in notes {
		let key = title_key(&note.title);
		if key.is_empty() {
			note_slots.push(None);
			continue;
		}
		let idx = nodes.len();
		nodes.push(GraphNode {
			id: note.id.clone(),
			title: note.title.clone(),
			kind: note.kind.clone(),
			language: note.language.clone(),
			is_pinned: note.is_pinned,
			is_favorite: note.is_favorite,
			count: 0,
			val: BASE_NODE_SIZE,
			timestamp: note.timestamp,
		});
		if let Some(prev) = by_key.insert(key, idx) {
			debug!(
				"note {} shadows note {} with the same title",
				note.id, nodes[prev].id
			);
		}
		note_slots.push(Some(idx));
	}

	let mut links = Vec::new();
	let mut dangling = 0usize;
	for (note, slot) in notes.iter().zip(&note_slots) {
		let Some(source_idx) = *slot else {
			continue;
		};
		let source_key = title_key(&note.title);
		for target in extract_links(&note.code) {
			let target_key = title_key(&target);
			let Some(&target_idx) = by_key.get(&target_key) else {
				dangling += 1;
				continue;
			};
			if target_key == source_key {
				continue;
			}
			links.push(GraphLink::wikilink(
				note.id.clone(),
				nodes[target_idx].id.clone(),
			));
			nodes[source_idx].count += 1;
			nodes[target_idx].count += 1;
		}
	}

	for node in &mut nodes {
		node.val = node_size(node.count);
	}

	debug!(
		"built graph: {} nodes, {} links, {} dangling references",
		nodes.len(),
		links.len(),
		dangling
	);
	GraphData { nodes, links }
}

/// Build from raw host JSON. Anything but an array yields an empty graph;
/// array entries that are not notes are skipped.
pub fn build_graph_from_value(value: &Value) -> GraphData {
	let Some(items) = value.as_array() else {
		return GraphData::default();
	};
	let notes: Vec<Note> = items
		.iter()
		.filter_map(|item| match Note::deserialize(item) {
			Ok(note) => Some(note),
			Err(e) => {
				warn!("skipping malformed note: {}", e);
				None
			}
		})
		.collect();
	build_graph(&notes)
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	fn ids(graph: &GraphData) -> Vec<(&str, &str)> {
		graph
			.links
			.iter()
			.map(|l| (l.source_id(), l.target_id()))
			.collect()
	}

	#[test]
	fn resolves_case_insensitively_and_drops_dangling() {
		let notes = vec![
			Note::new("1", "Alpha", "see [[Beta]]"),
			Note::new("2", "Beta", "no links"),
			Note::new("3", "Gamma", "[[NotExist]] and [[alpha]]"),
		];
		let graph = build_graph(&notes);

		let counts: Vec<(&str, u32)> = graph.nodes.iter().map(|n| (n.id.as_str(), n.count)).collect();
		assert_eq!(counts, vec![("1", 2), ("2", 1), ("3", 1)]);
		assert_eq!(ids(&graph), vec![("1", "2"), ("3", "1")]);
		assert!(graph.links.iter().all(|l| l.kind == "wikilink"));
	}

	#[test]
	fn chain_degrees_and_sizes() {
		let notes = vec![
			Note::new("a", "A", "[[B]]"),
			Note::new("b", "B", "[[C]]"),
			Note::new("c", "C", ""),
		];
		let graph = build_graph(&notes);
		let a = graph.node("a").unwrap();
		let b = graph.node("b").unwrap();
		let c = graph.node("c").unwrap();
		assert_eq!((a.count, b.count, c.count), (1, 2, 1));
		assert!(b.val > a.val);
		assert_eq!(a.val, c.val);
		assert_eq!(a.val, 12.0);
	}

	#[test]
	fn self_links_are_dropped() {
		let notes = vec![Note::new("1", "Loop", "[[loop]] and [[ LOOP ]]")];
		let graph = build_graph(&notes);
		assert!(graph.links.is_empty());
		assert_eq!(graph.nodes[0].count, 0);
		assert_eq!(graph.nodes[0].val, BASE_NODE_SIZE);
	}

	#[test]
	fn untitled_notes_are_skipped() {
		let notes = vec![
			Note::new("1", "   ", "[[Target]]"),
			Note::new("2", "Target", ""),
			Note::new("3", "Other", "[[]] [[   ]]"),
		];
		let graph = build_graph(&notes);
		assert_eq!(graph.nodes.len(), 2);
		assert!(graph.links.is_empty());
	}

	#[test]
	fn duplicate_links_count_each_occurrence() {
		let notes = vec![
			Note::new("1", "A", "[[B]] [[b]]"),
			Note::new("2", "B", ""),
		];
		let graph = build_graph(&notes);
		assert_eq!(graph.links.len(), 2);
		assert_eq!(graph.node("2").unwrap().count, 2);
	}

	#[test]
	fn duplicate_titles_last_write_wins() {
		let notes = vec![
			Note::new("old", "Same", "[[Hub]]"),
			Note::new("new", "same", ""),
			Note::new("hub", "Hub", "[[SAME]]"),
		];
		let graph = build_graph(&notes);
		assert_eq!(graph.nodes.len(), 3);
		assert_eq!(ids(&graph), vec![("old", "hub"), ("hub", "new")]);
		assert_eq!(graph.node("old").unwrap().count, 1);
		assert_eq!(graph.node("new").unwrap().count, 1);
	}

	#[test]
	fn shadowed_note_linking_its_own_title_is_a_self_link() {
		let notes = vec![Note::new("old", "Same", "[[same]]"), Note::new("new", "Same", "")];
		let graph = build_graph(&notes);
		assert!(graph.links.is_empty());
	}

	#[test]
	fn empty_and_non_array_input() {
		assert_eq!(build_graph(&[]), GraphData::default());
		assert_eq!(build_graph_from_value(&Value::Null), GraphData::default());
		assert_eq!(build_graph_from_value(&json!({"id": "1"})), GraphData::default());
		assert_eq!(build_graph_from_value(&json!([])), GraphData::default());
	}

	#[test]
	fn from_value_skips_malformed_entries() {
		let graph = build_graph_from_value(&json!([
			{"id": "1", "title": "Alpha", "code": "[[Beta]]"},
			42,
			{"title": "no id"},
			{"id": "2", "title": "Beta"}
		]));
		assert_eq!(graph.nodes.len(), 2);
		assert_eq!(ids(&graph), vec![("1", "2")]);
	}

	#[test]
	fn node_fields_are_copied() {
		let mut note = Note::new("1", "Alpha", "");
		note.language = "rust".into();
		note.is_pinned = true;
		note.is_favorite = true;
		note.timestamp = Some(1_000);
		let graph = build_graph(&[note]);
		let node = &graph.nodes[0];
		assert_eq!(node.title, "Alpha");
		assert_eq!(node.language, "rust");
		assert!(node.is_pinned && node.is_favorite);
		assert_eq!(node.timestamp, Some(1_000));
	}
}
