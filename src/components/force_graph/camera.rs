use std::cell::RefCell;
use std::rc::Rc;

use log::debug;

use super::state::ForceGraphState;

/// Screen transform: `screen = graph * k + (x, y)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self { x: 0.0, y: 0.0, k: 1.0 }
	}
}

/// Axis-aligned extent of a set of points in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
	pub min_x: f64,
	pub min_y: f64,
	pub max_x: f64,
	pub max_y: f64,
}

impl Bounds {
	/// Bounds of circles given as `(x, y, radius)`; `None` when empty.
	pub fn of_circles(circles: impl IntoIterator<Item = (f64, f64, f64)>) -> Option<Self> {
		circles.into_iter().fold(None, |acc, (x, y, r)| {
			let b = Bounds {
				min_x: x - r,
				min_y: y - r,
				max_x: x + r,
				max_y: y + r,
			};
			Some(match acc {
				None => b,
				Some(a) => Bounds {
					min_x: a.min_x.min(b.min_x),
					min_y: a.min_y.min(b.min_y),
					max_x: a.max_x.max(b.max_x),
					max_y: a.max_y.max(b.max_y),
				},
			})
		})
	}

	pub fn center(&self) -> (f64, f64) {
		((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
	}
}

impl ViewTransform {
	/// Graph origin in the middle of a `width` x `height` viewport.
	pub fn centered(width: f64, height: f64) -> Self {
		Self {
			x: width / 2.0,
			y: height / 2.0,
			k: 1.0,
		}
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	/// Scale by `factor` keeping the graph point under `(sx, sy)` fixed.
	pub fn zoom_about(&mut self, sx: f64, sy: f64, factor: f64, min_k: f64, max_k: f64) {
		let new_k = (self.k * factor).clamp(min_k, max_k);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}

	/// Put graph point `(gx, gy)` in the middle of the viewport.
	pub fn center_at(&mut self, gx: f64, gy: f64, width: f64, height: f64, k: Option<f64>) {
		if let Some(k) = k {
			self.k = k;
		}
		self.x = width / 2.0 - gx * self.k;
		self.y = height / 2.0 - gy * self.k;
	}

	/// Frame `bounds` inside the viewport leaving `padding` pixels on each side.
	pub fn fit(&mut self, bounds: Bounds, width: f64, height: f64, padding: f64, min_k: f64, max_k: f64) {
		let avail_w = if width > 2.0 * padding { width - 2.0 * padding } else { width };
		let avail_h = if height > 2.0 * padding { height - 2.0 * padding } else { height };
		let bw = (bounds.max_x - bounds.min_x).max(1.0);
		let bh = (bounds.max_y - bounds.min_y).max(1.0);
		let k = (avail_w / bw).min(avail_h / bh).clamp(min_k, max_k);
		let (cx, cy) = bounds.center();
		self.center_at(cx, cy, width, height, Some(k));
	}
}

/// Shared handle for toolbar camera actions.
///
/// Every command is a no-op until the canvas has created its simulation.
#[derive(Clone, Default)]
pub struct GraphCamera {
	state: Rc<RefCell<Option<ForceGraphState>>>,
}

impl GraphCamera {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn shared(&self) -> Rc<RefCell<Option<ForceGraphState>>> {
		self.state.clone()
	}

	pub fn is_ready(&self) -> bool {
		self.state.try_borrow().map(|s| s.is_some()).unwrap_or(false)
	}

	fn with_state<T>(&self, op: &str, f: impl FnOnce(&mut ForceGraphState) -> T) -> Option<T> {
		let Ok(mut guard) = self.state.try_borrow_mut() else {
			debug!("camera {}: simulation busy, skipped", op);
			return None;
		};
		match guard.as_mut() {
			Some(state) => Some(f(state)),
			None => {
				debug!("camera {}: simulation not initialized", op);
				None
			}
		}
	}

	pub fn zoom_in(&self) {
		self.with_state("zoom_in", |s| s.zoom_in());
	}

	pub fn zoom_out(&self) {
		self.with_state("zoom_out", |s| s.zoom_out());
	}

	pub fn zoom_to_fit(&self) {
		self.with_state("zoom_to_fit", |s| s.zoom_to_fit());
	}

	/// Center on a node by id; `false` if it is not on screen or nothing is loaded.
	pub fn center_on(&self, id: &str) -> bool {
		self.with_state("center_on", |s| s.center_on(id)).unwrap_or(false)
	}

	pub fn center_at(&self, x: f64, y: f64) {
		self.with_state("center_at", |s| s.center_at(x, y, None));
	}

	pub fn release_all(&self) {
		self.with_state("release_all", |s| s.release_all());
	}

	pub fn transform(&self) -> Option<ViewTransform> {
		self.with_state("transform", |s| s.transform.clone())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn zoom_about_keeps_anchor_point() {
		let mut t = ViewTransform::centered(800.0, 600.0);
		let before = t.screen_to_graph(100.0, 50.0);
		t.zoom_about(100.0, 50.0, 1.2, 0.1, 10.0);
		let after = t.screen_to_graph(100.0, 50.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
		assert!((t.k - 1.2).abs() < 1e-12);
	}

	#[test]
	fn zoom_is_clamped() {
		let mut t = ViewTransform::default();
		t.zoom_about(0.0, 0.0, 1000.0, 0.1, 10.0);
		assert_eq!(t.k, 10.0);
		t.zoom_about(0.0, 0.0, 1e-6, 0.1, 10.0);
		assert_eq!(t.k, 0.1);
	}

	#[test]
	fn center_at_maps_point_to_viewport_middle() {
		let mut t = ViewTransform::default();
		t.center_at(30.0, -20.0, 800.0, 600.0, Some(2.0));
		assert_eq!(t.graph_to_screen(30.0, -20.0), (400.0, 300.0));
		assert_eq!(t.k, 2.0);
	}

	#[test]
	fn fit_frames_bounds_with_padding() {
		let bounds = Bounds::of_circles([(-100.0, 0.0, 0.0), (100.0, 50.0, 0.0)]).unwrap();
		let mut t = ViewTransform::default();
		t.fit(bounds, 480.0, 400.0, 40.0, 0.1, 10.0);
		// 400px available for 200 units wide, 320px for 50 units high.
		assert!((t.k - 2.0).abs() < 1e-12);
		let (sx, _) = t.graph_to_screen(-100.0, 0.0);
		assert!((sx - 40.0).abs() < 1e-9);
	}

	#[test]
	fn bounds_of_nothing() {
		assert!(Bounds::of_circles(std::iter::empty()).is_none());
		let b = Bounds::of_circles([(0.0, 0.0, 5.0)]).unwrap();
		assert_eq!(b.center(), (0.0, 0.0));
		assert_eq!(b.max_x - b.min_x, 10.0);
	}

	#[test]
	fn uninitialized_camera_is_a_no_op() {
		let camera = GraphCamera::new();
		assert!(!camera.is_ready());
		camera.zoom_in();
		camera.zoom_out();
		camera.zoom_to_fit();
		camera.center_at(1.0, 2.0);
		camera.release_all();
		assert!(!camera.center_on("missing"));
		assert!(camera.transform().is_none());
	}
}
