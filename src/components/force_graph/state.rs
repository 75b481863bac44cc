use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData};
use log::{debug, warn};

use crate::graph::{GraphData, GraphNode, hub};

use super::camera::{Bounds, ViewTransform};
use super::config::LayoutConfig;
use super::types::{CameraCommand, ModeForces, ViewMode};

/// Extra world-space slack around a node's drawn radius for hit testing.
pub const HIT_SLOP: f64 = 4.0;
/// Screen distance a press may travel and still count as a click.
pub const CLICK_TOLERANCE: f64 = 3.0;
/// Radius new nodes are seeded at when their radial target is the origin.
const SEED_RADIUS: f64 = 30.0;

#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub node: GraphNode,
	pub age: f64,
	pub radius: f64,
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<DefaultNodeIdx>,
	pub neighbors: HashSet<DefaultNodeIdx>,
	pub highlight_t: f64,
	pub prev_node: Option<DefaultNodeIdx>,
	pub prev_neighbors: HashSet<DefaultNodeIdx>,
	delay_t: f64,
}

/// Camera command waiting for the layout to settle.
#[derive(Clone, Debug, PartialEq)]
pub struct SettleTimer {
	pub due: f64,
	pub command: CameraCommand,
}

/// Outcome of releasing the pointer.
#[derive(Clone, Debug, PartialEq)]
pub enum Release {
	/// A press and release in place; `None` for the background.
	Clicked(Option<GraphNode>),
	Dragged,
	Panned,
	Idle,
}

pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub config: LayoutConfig,
	pub mode: ViewMode,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	/// Frame clock in seconds.
	pub flow_time: f64,
	/// Simulation energy, 1 after a reheat, cooling toward 0.
	pub alpha: f64,
	forces: ModeForces,
	settle: Option<SettleTimer>,
	edges: Vec<(DefaultNodeIdx, DefaultNodeIdx)>,
	index: HashMap<String, DefaultNodeIdx>,
	hub: Option<DefaultNodeIdx>,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		mode: ViewMode,
		config: LayoutConfig,
		width: f64,
		height: f64,
		now_ms: f64,
	) -> Self {
		let config = match config.validate() {
			Ok(()) => config,
			Err(e) => {
				warn!("{}, using the default layout", e);
				LayoutConfig::default()
			}
		};
		let forces = mode.forces(&config);
		let mut state = Self {
			graph: ForceGraph::new(config.simulation_parameters(forces.charge)),
			config,
			mode: mode.clone(),
			transform: ViewTransform::centered(width, height),
			drag: DragState::default(),
			pan: PanState::default(),
			hover: HoverState::default(),
			width,
			height,
			animation_running: true,
			flow_time: 0.0,
			alpha: 1.0,
			forces,
			settle: None,
			edges: Vec::new(),
			index: HashMap::new(),
			hub: None,
		};
		state.load(data, mode, now_ms);
		state
	}

	/// Rebuild the simulation for new data or a new mode. Nodes that survive
	/// keep their position and pin; any pending camera command is replaced.
	pub fn load(&mut self, data: &GraphData, mode: ViewMode, now_ms: f64) {
		let mut previous: HashMap<String, (f32, f32, bool)> = HashMap::new();
		self.graph.visit_nodes(|node| {
			previous.insert(
				node.data.user_data.node.id.clone(),
				(node.x(), node.y(), node.data.is_anchor),
			);
		});

		self.forces = mode.forces(&self.config);
		self.mode = mode;
		let mut graph = ForceGraph::new(self.config.simulation_parameters(self.forces.charge));
		let mut index = HashMap::new();
		let mut edges = Vec::new();
		let total = data.nodes.len().max(1) as f64;

		for (i, node) in data.nodes.iter().enumerate() {
			let age = node.age_factor(now_ms);
			let (x, y, is_anchor) = previous.get(&node.id).copied().unwrap_or_else(|| {
				let angle = (i as f64) * 2.0 * PI / total;
				let r = (self.forces.radius * age).max(SEED_RADIUS);
				((r * angle.cos()) as f32, (r * angle.sin()) as f32, false)
			});
			let idx = graph.add_node(NodeData {
				x,
				y,
				mass: self.config.node_mass as f32,
				is_anchor,
				user_data: NodeInfo {
					node: node.clone(),
					age,
					radius: node.val / 2.0,
				},
			});
			index.insert(node.id.clone(), idx);
		}

		for link in &data.links {
			if let (Some(&src), Some(&tgt)) =
				(index.get(link.source_id()), index.get(link.target_id()))
			{
				graph.add_edge(src, tgt, EdgeData::default());
				edges.push((src, tgt));
			}
		}

		self.hub = hub(data).and_then(|n| index.get(&n.id).copied());
		self.graph = graph;
		self.index = index;
		self.edges = edges;
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.hover = HoverState::default();
		debug!(
			"layout loaded: {} nodes, {} links, mode {}",
			data.nodes.len(),
			self.edges.len(),
			self.mode.label()
		);
		self.reheat();
	}

	/// Restart the simulation at full energy and schedule the mode's camera move.
	pub fn reheat(&mut self) {
		self.alpha = 1.0;
		self.animation_running = true;
		self.settle = Some(SettleTimer {
			due: self.flow_time + self.config.settle_delay_ms / 1000.0,
			command: self.mode.settle_command(),
		});
	}

	pub fn pending_camera(&self) -> Option<&SettleTimer> {
		self.settle.as_ref()
	}

	pub fn cancel_pending_camera(&mut self) {
		self.settle = None;
	}

	pub fn node_count(&self) -> usize {
		self.index.len()
	}

	pub fn node_index(&self, id: &str) -> Option<DefaultNodeIdx> {
		self.index.get(id).copied()
	}

	pub fn node_info(&self, idx: DefaultNodeIdx) -> Option<GraphNode> {
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some(node.data.user_data.node.clone());
			}
		});
		found
	}

	pub fn node_position(&self, id: &str) -> Option<(f64, f64)> {
		let idx = self.node_index(id)?;
		let mut found = None;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				found = Some((node.x() as f64, node.y() as f64));
			}
		});
		found
	}

	pub fn is_pinned(&self, id: &str) -> bool {
		let Some(idx) = self.node_index(id) else {
			return false;
		};
		let mut pinned = false;
		self.graph.visit_nodes(|node| {
			if node.index() == idx {
				pinned = node.data.is_anchor;
			}
		});
		pinned
	}

	/// The node drawn in the `central` colour: the focus in neighborhood
	/// mode, the hub otherwise.
	pub fn is_central(&self, idx: DefaultNodeIdx) -> bool {
		match self.mode.focus() {
			Some(focus) => self.node_index(focus) == Some(idx),
			None => self.hub == Some(idx),
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform.screen_to_graph(sx, sy)
	}

	/// Topmost node under a screen point. Later nodes win, so hubs beat leaves.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			if (dx * dx + dy * dy).sqrt() < node.data.user_data.radius + HIT_SLOP {
				found = Some(node.index());
			}
		});
		found
	}

	/// Returns whether the hovered node changed.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) -> bool {
		if self.hover.node == node {
			return false;
		}
		let was_hovering = self.hover.node.is_some();

		// Keep the old highlight around while it fades out.
		if was_hovering && node.is_none() {
			self.hover.prev_node = self.hover.node.take();
			self.hover.prev_neighbors = std::mem::take(&mut self.hover.neighbors);
		} else {
			self.hover.prev_node = None;
			self.hover.prev_neighbors.clear();
		}

		self.hover.node = node;
		self.hover.neighbors.clear();

		if let Some(idx) = node {
			if !was_hovering {
				self.hover.delay_t = 0.0;
			}
			for &(src, tgt) in &self.edges {
				if src == idx {
					self.hover.neighbors.insert(tgt);
				} else if tgt == idx {
					self.hover.neighbors.insert(src);
				}
			}
		}
		true
	}

	pub fn is_highlighted(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx)
			|| self.hover.neighbors.contains(&idx)
			|| self.hover.prev_node == Some(idx)
			|| self.hover.prev_neighbors.contains(&idx)
	}

	pub fn is_hovered(&self, idx: DefaultNodeIdx) -> bool {
		self.hover.node == Some(idx) || self.hover.prev_node == Some(idx)
	}

	pub fn has_active_highlight(&self) -> bool {
		self.hover.node.is_some() || self.hover.prev_node.is_some()
	}

	/// Start a drag on a node or a pan on the background.
	pub fn press(&mut self, sx: f64, sy: f64) {
		if let Some(idx) = self.node_at_position(sx, sy) {
			self.drag = DragState {
				active: true,
				node_idx: Some(idx),
				moved: false,
				start_x: sx,
				start_y: sy,
				..DragState::default()
			};
			let mut start = (0.0, 0.0);
			self.graph.visit_nodes(|node| {
				if node.index() == idx {
					start = (node.x(), node.y());
				}
			});
			(self.drag.node_start_x, self.drag.node_start_y) = start;
		} else {
			self.pan = PanState {
				active: true,
				moved: false,
				start_x: sx,
				start_y: sy,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
		}
	}

	/// Pointer motion: drag, pan or hover. Returns whether the hover changed.
	pub fn pointer_move(&mut self, sx: f64, sy: f64) -> bool {
		if self.drag.active {
			let Some(idx) = self.drag.node_idx else {
				return false;
			};
			if (sx - self.drag.start_x).hypot(sy - self.drag.start_y) > CLICK_TOLERANCE {
				self.drag.moved = true;
			}
			if !self.drag.moved {
				return false;
			}
			let (dx, dy) = (
				(sx - self.drag.start_x) / self.transform.k,
				(sy - self.drag.start_y) / self.transform.k,
			);
			let (nx, ny) = (
				self.drag.node_start_x + dx as f32,
				self.drag.node_start_y + dy as f32,
			);
			self.graph.visit_nodes_mut(|node| {
				if node.index() == idx {
					node.data.x = nx;
					node.data.y = ny;
					node.data.is_anchor = true;
				}
			});
			self.warm(self.config.drag_alpha);
			false
		} else if self.pan.active {
			if (sx - self.pan.start_x).hypot(sy - self.pan.start_y) > CLICK_TOLERANCE {
				self.pan.moved = true;
			}
			self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
			self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
			false
		} else {
			let hovered = self.node_at_position(sx, sy);
			self.set_hover(hovered)
		}
	}

	/// End a press. A dragged node stays pinned where it was dropped.
	pub fn release(&mut self) -> Release {
		let drag = std::mem::take(&mut self.drag);
		let pan = std::mem::take(&mut self.pan);
		if drag.active {
			match drag.node_idx {
				Some(_) if drag.moved => Release::Dragged,
				Some(idx) => Release::Clicked(self.node_info(idx)),
				None => Release::Idle,
			}
		} else if pan.active {
			if pan.moved {
				Release::Panned
			} else {
				Release::Clicked(None)
			}
		} else {
			Release::Idle
		}
	}

	/// Pointer left the canvas: drop any gesture and the hover.
	pub fn leave(&mut self) -> bool {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.set_hover(None)
	}

	pub fn release_node(&mut self, id: &str) -> bool {
		let Some(idx) = self.node_index(id) else {
			return false;
		};
		let mut released = false;
		self.graph.visit_nodes_mut(|node| {
			if node.index() == idx && node.data.is_anchor {
				node.data.is_anchor = false;
				released = true;
			}
		});
		if released {
			self.warm(self.config.drag_alpha);
		}
		released
	}

	pub fn release_all(&mut self) {
		let mut any = false;
		self.graph.visit_nodes_mut(|node| {
			any |= node.data.is_anchor;
			node.data.is_anchor = false;
		});
		if any {
			self.warm(self.config.drag_alpha);
		}
	}

	fn warm(&mut self, alpha: f64) {
		self.alpha = self.alpha.max(alpha);
		self.animation_running = true;
	}

	pub fn zoom_in(&mut self) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, self.config.zoom_step);
	}

	pub fn zoom_out(&mut self) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, 1.0 / self.config.zoom_step);
	}

	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		self.transform
			.zoom_about(sx, sy, factor, self.config.min_zoom, self.config.max_zoom);
	}

	pub fn zoom_to_fit(&mut self) {
		let mut circles = Vec::with_capacity(self.index.len());
		self.graph.visit_nodes(|node| {
			circles.push((
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.radius,
			));
		});
		match Bounds::of_circles(circles) {
			Some(bounds) => self.transform.fit(
				bounds,
				self.width,
				self.height,
				self.config.fit_padding,
				self.config.min_zoom,
				self.config.max_zoom,
			),
			None => self.transform = ViewTransform::centered(self.width, self.height),
		}
	}

	pub fn center_at(&mut self, x: f64, y: f64, zoom: Option<f64>) {
		let k = zoom.map(|k| k.clamp(self.config.min_zoom, self.config.max_zoom));
		self.transform.center_at(x, y, self.width, self.height, k);
	}

	pub fn center_on(&mut self, id: &str) -> bool {
		match self.node_position(id) {
			Some((x, y)) => {
				self.center_at(x, y, None);
				true
			}
			None => false,
		}
	}

	pub fn run_camera(&mut self, command: &CameraCommand) {
		match command {
			CameraCommand::FitAll => self.zoom_to_fit(),
			CameraCommand::CenterOnHub => {
				let hub_id = self
					.hub
					.and_then(|idx| self.node_info(idx))
					.map(|n| n.id);
				if let Some(id) = hub_id {
					self.focus_on(&id);
				}
			}
			CameraCommand::CenterOnNode(id) => self.focus_on(id),
		}
	}

	fn focus_on(&mut self, id: &str) {
		match self.node_position(id) {
			Some((x, y)) => self.center_at(x, y, Some(self.config.focus_zoom)),
			None => debug!("camera target {} is not in the layout", id),
		}
	}

	fn apply_radial(&mut self) {
		let (radius, strength, alpha) = (
			self.forces.radius,
			self.config.radial_strength,
			self.alpha,
		);
		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			let (x, y) = (node.data.x as f64, node.data.y as f64);
			let dist = (x * x + y * y).sqrt();
			if dist < 1e-6 {
				return;
			}
			let target = radius * node.data.user_data.age;
			let k = (target - dist) * strength * alpha / dist;
			node.data.x += (x * k) as f32;
			node.data.y += (y * k) as f32;
		});
	}

	pub fn tick(&mut self, dt: f32) {
		self.flow_time += dt as f64;

		if self.alpha >= self.config.alpha_min {
			self.graph.update(dt * self.alpha as f32);
			self.apply_radial();
			self.alpha *= 1.0 - self.config.alpha_decay;
		}

		let (target, delay, speed) = if self.hover.node.is_some() {
			(1.0, 0.08, 1.8)
		} else {
			(0.0, 0.0, 1.26)
		};

		if self.hover.node.is_some() {
			self.hover.delay_t = (self.hover.delay_t + dt as f64).min(delay);
			if self.hover.delay_t >= delay {
				self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			}
		} else {
			self.hover.highlight_t += (target - self.hover.highlight_t) * speed * dt as f64;
			if self.hover.highlight_t < 0.01 {
				self.hover.highlight_t = 0.0;
				self.hover.prev_node = None;
				self.hover.prev_neighbors.clear();
			}
		}

		if self.settle.as_ref().is_some_and(|t| self.flow_time >= t.due) {
			if let Some(timer) = self.settle.take() {
				self.run_camera(&timer.command);
			}
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}
