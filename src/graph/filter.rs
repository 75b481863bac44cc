use std::borrow::Cow;
use std::collections::HashSet;

use super::types::{GraphData, GraphLink, GraphNode};

fn retain(graph: &GraphData, keep: impl Fn(&GraphNode) -> bool) -> GraphData {
	let nodes: Vec<GraphNode> = graph.nodes.iter().filter(|n| keep(n)).cloned().collect();
	let kept: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
	let links: Vec<GraphLink> = graph
		.links
		.iter()
		.filter(|l| kept.contains(l.source_id()) && kept.contains(l.target_id()))
		.cloned()
		.collect();
	GraphData { nodes, links }
}

/// Nodes whose title or language contains `query`, ignoring case, plus the
/// links between them. An empty query borrows the input untouched.
pub fn filter_by_query<'a>(graph: &'a GraphData, query: &str) -> Cow<'a, GraphData> {
	if query.is_empty() {
		return Cow::Borrowed(graph);
	}
	let needle = query.to_lowercase();
	Cow::Owned(retain(graph, |n| {
		n.title.to_lowercase().contains(&needle) || n.language.to_lowercase().contains(&needle)
	}))
}

/// The focus node, everything one link away from it, and the links among them.
pub fn filter_by_neighborhood(graph: &GraphData, focus_id: &str) -> GraphData {
	if graph.node(focus_id).is_none() {
		return GraphData::default();
	}
	let mut members: HashSet<&str> = HashSet::from([focus_id]);
	for link in &graph.links {
		if link.source_id() == focus_id {
			members.insert(link.target_id());
		} else if link.target_id() == focus_id {
			members.insert(link.source_id());
		}
	}
	retain(graph, |n| members.contains(n.id.as_str()))
}

/// Stable ascending order by degree, so hubs come last in draw and hit-test order.
pub fn sort_by_degree(mut graph: GraphData) -> GraphData {
	graph.nodes.sort_by_key(|n| n.count);
	graph
}

/// The most connected node; the first one wins a tie.
pub fn hub(graph: &GraphData) -> Option<&GraphNode> {
	graph
		.nodes
		.iter()
		.fold(None, |best: Option<&GraphNode>, n| match best {
			Some(b) if b.count >= n.count => Some(b),
			_ => Some(n),
		})
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{LinkEndpoint, Note, build_graph};

	fn sample() -> GraphData {
		build_graph(&[
			Note {
				language: "rust".into(),
				..Note::new("1", "Alpha", "[[Beta]] [[Delta]]")
			},
			Note::new("2", "Beta", "[[Gamma]]"),
			Note::new("3", "Gamma", ""),
			Note::new("4", "Delta", "[[Beta]]"),
			Note::new("5", "Lonely", ""),
		])
	}

	#[test]
	fn empty_query_borrows_input() {
		let graph = sample();
		let filtered = filter_by_query(&graph, "");
		assert!(matches!(filtered, Cow::Borrowed(_)));
		assert_eq!(*filtered, graph);
	}

	#[test]
	fn query_matches_title_or_language() {
		let graph = sample();
		let filtered = filter_by_query(&graph, "TA");
		let ids: Vec<&str> = filtered.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["2", "4"]);
		assert_eq!(filtered.links.len(), 1);
		assert_eq!(filtered.links[0].source_id(), "4");

		let by_lang = filter_by_query(&graph, "Rus");
		assert_eq!(by_lang.nodes.len(), 1);
		assert_eq!(by_lang.nodes[0].id, "1");
		assert!(by_lang.links.is_empty());
	}

	#[test]
	fn query_does_not_mutate_input() {
		let graph = sample();
		let before = graph.clone();
		let _ = filter_by_query(&graph, "zzz");
		assert_eq!(graph, before);
	}

	#[test]
	fn neighborhood_is_one_hop_undirected() {
		let graph = sample();
		let hood = filter_by_neighborhood(&graph, "2");
		let mut ids: Vec<&str> = hood.nodes.iter().map(|n| n.id.as_str()).collect();
		ids.sort();
		assert_eq!(ids, vec!["1", "2", "3", "4"]);
		// 1->4 survives because both endpoints are neighbours of the focus.
		assert_eq!(hood.links.len(), 4);

		let leaf = filter_by_neighborhood(&graph, "3");
		let ids: Vec<&str> = leaf.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["2", "3"]);
		assert_eq!(leaf.links.len(), 1);
	}

	#[test]
	fn neighborhood_of_missing_or_isolated_node() {
		let graph = sample();
		assert_eq!(filter_by_neighborhood(&graph, "nope"), GraphData::default());
		let alone = filter_by_neighborhood(&graph, "5");
		assert_eq!(alone.nodes.len(), 1);
		assert!(alone.links.is_empty());
	}

	fn node_shaped() -> GraphData {
		let node = |id: &str, title: &str| GraphNode {
			id: id.into(),
			title: title.into(),
			language: "markdown".into(),
			..GraphNode::default()
		};
		let endpoint = |id: &str| LinkEndpoint::Node { id: id.into() };
		GraphData {
			nodes: vec![node("a", "Alpha"), node("b", "Beta"), node("c", "Gamma"), node("d", "Delta")],
			links: vec![
				GraphLink::wikilink(endpoint("a"), endpoint("b")),
				GraphLink::wikilink(endpoint("b"), endpoint("c")),
				GraphLink::wikilink(LinkEndpoint::Id("d".into()), endpoint("a")),
			],
		}
	}

	#[test]
	fn filters_read_node_shaped_endpoints() {
		let graph = node_shaped();

		let by_query = filter_by_query(&graph, "ta");
		let ids: Vec<&str> = by_query.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["b", "d"]);
		assert!(by_query.links.is_empty());

		let by_query = filter_by_query(&graph, "a");
		assert_eq!(by_query.nodes.len(), 4);
		assert_eq!(by_query.links, graph.links);

		let hood = filter_by_neighborhood(&graph, "a");
		let mut ids: Vec<&str> = hood.nodes.iter().map(|n| n.id.as_str()).collect();
		ids.sort();
		assert_eq!(ids, vec!["a", "b", "d"]);
		let kept: Vec<(&str, &str)> = hood.links.iter().map(|l| (l.source_id(), l.target_id())).collect();
		assert_eq!(kept, vec![("a", "b"), ("d", "a")]);
		assert!(matches!(hood.links[0].source, LinkEndpoint::Node { .. }));

		let leaf = filter_by_neighborhood(&graph, "c");
		let kept: Vec<(&str, &str)> = leaf.links.iter().map(|l| (l.source_id(), l.target_id())).collect();
		assert_eq!(kept, vec![("b", "c")]);
	}

	#[test]
	fn sort_puts_hubs_last_and_is_stable() {
		let sorted = sort_by_degree(sample());
		let ids: Vec<&str> = sorted.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["5", "3", "1", "4", "2"]);
	}

	#[test]
	fn hub_is_highest_degree() {
		let graph = sample();
		assert_eq!(hub(&graph).map(|n| n.id.as_str()), Some("2"));
		assert!(hub(&GraphData::default()).is_none());
	}
}
