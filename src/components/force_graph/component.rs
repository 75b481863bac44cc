use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::html::Canvas;
use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use crate::graph::{GraphData, GraphNode, Theme};

use super::camera::GraphCamera;
use super::config::LayoutConfig;
use super::render;
use super::state::{ForceGraphState, Release};
use super::types::ViewMode;

fn local_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

type Listener = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Unhook the window resize listener before its closure is dropped.
fn detach_resize(listener: &Listener) {
	let Some(cb) = listener.borrow_mut().take() else {
		return;
	};
	if let Some(window) = web_sys::window() {
		let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
	}
	debug!("graph canvas resize listener removed");
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Knowledge graph canvas.
///
/// `data` is the full graph; `mode` and `query` pick the visible slice. Any
/// change rebuilds the layout, reheats it and reframes the camera once it
/// settles. Pass a [`GraphCamera`] to drive zoom and centering from outside.
#[component]
pub fn KnowledgeGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] mode: Signal<ViewMode>,
	#[prop(into)] query: Signal<String>,
	#[prop(into)] theme: Signal<Theme>,
	#[prop(optional)] camera: Option<GraphCamera>,
	#[prop(optional)] config: Option<LayoutConfig>,
	#[prop(optional)] on_node_selected: Option<Callback<Option<GraphNode>>>,
	#[prop(optional)] on_node_hovered: Option<Callback<Option<GraphNode>>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = camera.unwrap_or_default().shared();
	let config = config.unwrap_or_default();
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Listener = Rc::new(RefCell::new(None));
	let alive = Arc::new(AtomicBool::new(true));
	let (state_init, animate_init, resize_cb_init, alive_init) =
		(state.clone(), animate.clone(), resize_cb.clone(), alive.clone());

	let listener = StoredValue::new_local(resize_cb.clone());
	on_cleanup(move || {
		alive.store(false, Ordering::Relaxed);
		listener.try_with_value(detach_resize);
	});

	Effect::new(move |_| {
		let mode = mode.get();
		let visible = mode.select(&data.get(), &query.get());
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let now = js_sys::Date::now();

		if let Some(ref mut s) = *state_init.borrow_mut() {
			s.load(&visible, mode, now);
			return;
		}

		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				error!("canvas has no 2d context");
				return;
			}
		};
		*state_init.borrow_mut() =
			Some(ForceGraphState::new(&visible, mode, config.clone(), w, h, now));

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, animate_inner, alive_anim, resize_anim) =
			(state_init.clone(), animate_init.clone(), alive_init.clone(), resize_cb_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !alive_anim.load(Ordering::Relaxed) {
				// Torn down: dropping the state cancels any pending camera move.
				state_anim.borrow_mut().take();
				detach_resize(&resize_anim);
				debug!("graph canvas stopped");
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &theme.get_untracked(), &ctx);
			}
			if let (Some(cb), Some(win)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.press(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let hovered = {
			let mut guard = state_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if !s.pointer_move(x, y) {
				return;
			}
			s.hover.node.and_then(|idx| s.node_info(idx))
		};
		if let Some(cb) = on_node_hovered {
			cb.run(hovered);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let release = match *state_mu.borrow_mut() {
			Some(ref mut s) => s.release(),
			None => return,
		};
		if let (Release::Clicked(node), Some(cb)) = (release, on_node_selected) {
			cb.run(node);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let changed = match *state_ml.borrow_mut() {
			Some(ref mut s) => s.leave(),
			None => false,
		};
		if let (true, Some(cb)) = (changed, on_node_hovered) {
			cb.run(None);
		}
	};

	let state_dc = state.clone();
	let on_dblclick = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_dc.borrow_mut() {
			let id = s.node_at_position(x, y).and_then(|idx| s.node_info(idx)).map(|n| n.id);
			if let Some(id) = id {
				s.release_node(&id);
			}
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			s.zoom_at(x, y, factor);
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}
