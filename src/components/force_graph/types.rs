use crate::graph::{GraphData, filter_by_neighborhood, filter_by_query, sort_by_degree};

use super::config::LayoutConfig;

/// How the graph is laid out and framed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ViewMode {
	/// Every note, spread by age.
	#[default]
	Universe,
	/// Every note packed tightly, framed on the hub.
	Orb,
	/// One note and its direct links.
	Neighborhood { focus: String },
}

/// Force settings for a mode: radial target is `radius * age_factor`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeForces {
	pub radius: f64,
	pub charge: f64,
}

/// What the camera does once a rebuilt layout has settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CameraCommand {
	FitAll,
	CenterOnHub,
	CenterOnNode(String),
}

impl ViewMode {
	pub fn label(&self) -> &'static str {
		match self {
			ViewMode::Universe => "universe",
			ViewMode::Orb => "orb",
			ViewMode::Neighborhood { .. } => "neighborhood",
		}
	}

	pub fn focus(&self) -> Option<&str> {
		match self {
			ViewMode::Neighborhood { focus } => Some(focus),
			_ => None,
		}
	}

	pub fn forces(&self, config: &LayoutConfig) -> ModeForces {
		match self {
			ViewMode::Universe => ModeForces {
				radius: config.universe_radius,
				charge: config.universe_charge,
			},
			ViewMode::Orb | ViewMode::Neighborhood { .. } => ModeForces {
				radius: config.focus_radius,
				charge: config.focus_charge,
			},
		}
	}

	pub fn settle_command(&self) -> CameraCommand {
		match self {
			ViewMode::Universe => CameraCommand::FitAll,
			ViewMode::Orb => CameraCommand::CenterOnHub,
			ViewMode::Neighborhood { focus } => CameraCommand::CenterOnNode(focus.clone()),
		}
	}

	/// The slice of `graph` this mode shows: search first, then the
	/// neighborhood cut, hubs last.
	pub fn select(&self, graph: &GraphData, query: &str) -> GraphData {
		let searched = filter_by_query(graph, query);
		let visible = match self {
			ViewMode::Neighborhood { focus } => filter_by_neighborhood(&searched, focus),
			_ => searched.into_owned(),
		};
		sort_by_degree(visible)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::{Note, build_graph};

	fn graph() -> GraphData {
		build_graph(&[
			Note::new("1", "Hub", "[[Leaf A]] [[Leaf B]]"),
			Note::new("2", "Leaf A", ""),
			Note::new("3", "Leaf B", "[[Far]]"),
			Note::new("4", "Far", ""),
		])
	}

	#[test]
	fn mode_forces() {
		let config = LayoutConfig::default();
		assert_eq!(ViewMode::Universe.forces(&config), ModeForces { radius: 450.0, charge: -600.0 });
		let focus = ViewMode::Neighborhood { focus: "1".into() };
		assert_eq!(focus.forces(&config), ViewMode::Orb.forces(&config));
		assert_eq!(ViewMode::Orb.forces(&config), ModeForces { radius: 150.0, charge: -800.0 });
	}

	#[test]
	fn select_universe_sorts_by_degree() {
		let view = ViewMode::Universe.select(&graph(), "");
		let ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["2", "4", "1", "3"]);
		assert_eq!(view.links.len(), 3);
	}

	#[test]
	fn select_neighborhood_after_query() {
		let mode = ViewMode::Neighborhood { focus: "3".into() };
		let view = mode.select(&graph(), "");
		let mut ids: Vec<&str> = view.nodes.iter().map(|n| n.id.as_str()).collect();
		ids.sort();
		assert_eq!(ids, vec!["1", "3", "4"]);

		let narrowed = mode.select(&graph(), "leaf");
		let ids: Vec<&str> = narrowed.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, vec!["3"]);
		assert!(narrowed.links.is_empty());
	}

	#[test]
	fn settle_commands() {
		assert_eq!(ViewMode::Universe.settle_command(), CameraCommand::FitAll);
		assert_eq!(ViewMode::Orb.settle_command(), CameraCommand::CenterOnHub);
		assert_eq!(
			ViewMode::Neighborhood { focus: "x".into() }.settle_command(),
			CameraCommand::CenterOnNode("x".into())
		);
	}
}
