use std::f64::consts::PI;

use force_graph::DefaultNodeIdx;
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::graph::Theme;
use crate::graph::theme::with_alpha;

use super::state::{ForceGraphState, NodeInfo};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

fn node_color<'a>(
	state: &ForceGraphState,
	theme: &'a Theme,
	idx: DefaultNodeIdx,
	info: &NodeInfo,
) -> &'a str {
	if state.is_central(idx) {
		theme.central
	} else if info.node.is_pinned {
		theme.moon
	} else if info.node.is_favorite {
		theme.secondary
	} else {
		theme.accent
	}
}

pub fn render(state: &ForceGraphState, theme: &Theme, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(theme.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, theme, ctx);
	draw_nodes(state, theme, ctx);
	ctx.restore();
}

fn draw_links(state: &ForceGraphState, theme: &Theme, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let (line_width, dash, gap) = (1.2 / k, 2.0 / k, 10.0 / k);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);
	let base = theme.link_opacity;

	state.graph.visit_edges(|n1, n2, _| {
		let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			return;
		}

		let is_highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());

		// t=0: every link at the theme opacity; t=1: highlighted links near opaque, the rest faded
		let (alpha, width) = if is_highlighted {
			(base + (0.9 - base) * t, line_width * (1.0 + 0.5 * t))
		} else {
			(base * (1.0 - 0.75 * t), line_width)
		};

		let (ux, uy) = (dx / dist, dy / dist);
		let (r1, r2) = (n1.data.user_data.radius, n2.data.user_data.radius);
		let (sx, sy, ex, ey) = (x1 + ux * r1, y1 + uy * r1, x2 - ux * r2, y2 - uy * r2);

		ctx.set_stroke_style_str(&with_alpha(theme.accent, alpha));
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(ex, ey);
		ctx.stroke();

		// Particles flowing from source to target.
		ctx.set_stroke_style_str(&with_alpha(theme.particle_color, alpha.min(1.0)));
		ctx.set_line_width(width * 2.0);
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(dash_offset);
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(ex, ey);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	});
}

fn draw_label(ctx: &CanvasRenderingContext2d, info: &NodeInfo, x: f64, y: f64, radius: f64, k: f64, fill: &str) {
	ctx.set_fill_style_str(fill);
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	let _ = ctx.fill_text(&info.node.title, x + radius + 3.0, y + 3.0);
}

fn draw_nodes(state: &ForceGraphState, theme: &Theme, ctx: &CanvasRenderingContext2d) {
	let (has_highlight, t, k) = (
		state.has_active_highlight(),
		ease_out_cubic(state.hover.highlight_t),
		state.transform.k,
	);

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if has_highlight && state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let (alpha, radius) = (1.0 - 0.7 * t, info.radius * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_color(state, theme, idx, info));
		ctx.fill();
		ctx.set_global_alpha(1.0);

		// Leaves only get a label once zoomed in.
		if info.node.count > 0 || k > 1.5 {
			draw_label(ctx, info, x, y, radius, k, &format!("rgba(255, 255, 255, {})", alpha * 0.8));
		}
	});

	if !has_highlight {
		return;
	}

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		if !state.is_highlighted(idx) {
			return;
		}
		let info = &node.data.user_data;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(info.radius * (1.0 + 0.35 * t), info.radius * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(info.radius * (1.0 + 0.2 * t), info.radius * (1.4 + 0.6 * t))
		} else {
			(info.radius, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius) {
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &with_alpha(theme.moon, alpha));
				let _ = gradient.add_color_stop(0.6, &with_alpha(theme.particle_color, alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node_color(state, theme, idx, info));
		ctx.fill();

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&with_alpha(theme.moon, 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_label(ctx, info, x, y, radius, k, "white");
	});
}
