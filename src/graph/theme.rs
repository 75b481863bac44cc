use rand::Rng;
use serde::Serialize;

/// Colours for the graph canvas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
	pub name: &'static str,
	pub background: &'static str,
	/// Default node and link colour.
	pub accent: &'static str,
	/// Favourite notes.
	pub secondary: &'static str,
	/// Pinned notes.
	pub moon: &'static str,
	/// The hub or focus node.
	pub central: &'static str,
	pub link_opacity: f64,
	pub particle_color: &'static str,
}

pub const THEMES: [Theme; 5] = [
	Theme {
		name: "nebula",
		background: "#0b0d1a",
		accent: "#7aa2f7",
		secondary: "#bb9af7",
		moon: "#c0caf5",
		central: "#ff9e64",
		link_opacity: 0.35,
		particle_color: "#7dcfff",
	},
	Theme {
		name: "aurora",
		background: "#06141b",
		accent: "#4fd1c5",
		secondary: "#9ae6b4",
		moon: "#e6fffa",
		central: "#f6e05e",
		link_opacity: 0.3,
		particle_color: "#81e6d9",
	},
	Theme {
		name: "ember",
		background: "#1a0f0a",
		accent: "#f6ad55",
		secondary: "#fc8181",
		moon: "#fefcbf",
		central: "#f56565",
		link_opacity: 0.4,
		particle_color: "#fbd38d",
	},
	Theme {
		name: "forest",
		background: "#0c1a10",
		accent: "#68d391",
		secondary: "#b794f4",
		moon: "#f0fff4",
		central: "#faf089",
		link_opacity: 0.3,
		particle_color: "#9ae6b4",
	},
	Theme {
		name: "midnight",
		background: "#1a1a2e",
		accent: "#64b4ff",
		secondary: "#e377c2",
		moon: "#ffffff",
		central: "#ff7f0e",
		link_opacity: 0.6,
		particle_color: "#64b4ff",
	},
];

/// Pick one of [`THEMES`] with the given source of randomness.
pub fn generate_theme_with<R: Rng + ?Sized>(rng: &mut R) -> Theme {
	THEMES[rng.gen_range(0..THEMES.len())]
}

/// Pick one of [`THEMES`] at random.
pub fn generate_theme() -> Theme {
	generate_theme_with(&mut rand::thread_rng())
}

impl Default for Theme {
	fn default() -> Self {
		THEMES[THEMES.len() - 1]
	}
}

/// `#rrggbb` as an `rgba(...)` string with the given alpha; other inputs pass through.
pub fn with_alpha(hex: &str, alpha: f64) -> String {
	let digits = hex.trim_start_matches('#');
	if digits.len() != 6 || !digits.is_ascii() {
		return hex.to_string();
	}
	let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16);
	match (channel(0), channel(2), channel(4)) {
		(Ok(r), Ok(g), Ok(b)) => format!("rgba({}, {}, {}, {})", r, g, b, alpha),
		_ => hex.to_string(),
	}
}
