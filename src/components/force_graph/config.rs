use force_graph::SimulationParameters;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::settings::Settings;

/// Settings key holding the layout overrides.
pub const SETTINGS_KEY: &str = "graph";

/// Tunables for the layout simulation and camera.
///
/// Charges are d3-style strengths, negative meaning repulsion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	pub universe_radius: f64,
	pub universe_charge: f64,
	pub focus_radius: f64,
	pub focus_charge: f64,
	pub radial_strength: f64,
	pub spring: f64,
	pub damping: f64,
	pub node_mass: f64,
	pub alpha_decay: f64,
	pub alpha_min: f64,
	/// Energy a drag or release pumps back into a cooled simulation.
	pub drag_alpha: f64,
	pub settle_delay_ms: f64,
	pub focus_zoom: f64,
	pub zoom_step: f64,
	pub fit_padding: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			universe_radius: 450.0,
			universe_charge: -600.0,
			focus_radius: 150.0,
			focus_charge: -800.0,
			radial_strength: 0.1,
			spring: 0.05,
			damping: 0.9,
			node_mass: 10.0,
			alpha_decay: 0.0228,
			alpha_min: 0.001,
			drag_alpha: 0.3,
			settle_delay_ms: 150.0,
			focus_zoom: 2.0,
			zoom_step: 1.2,
			fit_padding: 40.0,
			min_zoom: 0.1,
			max_zoom: 10.0,
		}
	}
}

impl LayoutConfig {
	/// Layout overrides from the `graph` settings subtree. Falls back to the
	/// defaults when the subtree is malformed or fails [`Self::validate`].
	pub fn from_settings(settings: &Settings) -> Self {
		let config: Self = settings.get_or(SETTINGS_KEY, Self::default());
		match config.validate() {
			Ok(()) => config,
			Err(e) => {
				warn!("ignoring `{}` settings: {}", SETTINGS_KEY, e);
				Self::default()
			}
		}
	}

	/// Camera math clamps against the zoom range, so it must be well formed.
	pub fn validate(&self) -> Result<()> {
		if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom {
			return Err(Error::InvalidConfig(format!(
				"zoom range [{}, {}] is empty or not positive",
				self.min_zoom, self.max_zoom
			)));
		}
		if self.zoom_step <= 0.0 {
			return Err(Error::InvalidConfig(format!("zoom step {} is not positive", self.zoom_step)));
		}
		if self.settle_delay_ms < 0.0 {
			return Err(Error::InvalidConfig(format!(
				"settle delay {} is negative",
				self.settle_delay_ms
			)));
		}
		Ok(())
	}

	/// force_graph wants a positive repulsion magnitude; a quarter of the
	/// d3 strength matches its per-mass scale.
	pub fn simulation_parameters(&self, charge: f64) -> SimulationParameters {
		SimulationParameters {
			force_charge: (-charge * 0.25) as f32,
			force_spring: self.spring as f32,
			force_max: 100.0,
			node_speed: 3000.0,
			damping_factor: self.damping as f32,
		}
	}
}
