use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::error::GraphError;
use super::interaction::WheelDeltaMode;
use super::render;
use super::state::ForceGraphState;
use super::types::GraphData;

const DEFAULT_WIDTH: f64 = 800.0;
const DEFAULT_HEIGHT: f64 = 400.0;

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position relative to the canvas' top-left corner.
fn local_position(canvas: Option<HtmlCanvasElement>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = canvas?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let build_error = RwSignal::new(None::<Arc<GraphError>>);
	let disposed = Arc::new(AtomicBool::new(false));
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: Callback = Rc::new(RefCell::new(None));
	let resize_cb: Callback = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init, disposed_init) = (
		state.clone(),
		animate.clone(),
		resize_cb.clone(),
		disposed.clone(),
	);

	Effect::new(move |_| {
		let graph = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("no window available, graph not mounted");
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((DEFAULT_WIDTH, DEFAULT_HEIGHT))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.filter(|w| *w > 0.0)
						.unwrap_or(DEFAULT_WIDTH)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(DEFAULT_HEIGHT)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		match ForceGraphState::new(&graph, w, h) {
			Ok(s) => {
				info!(
					"graph mounted: {} nodes, {} links, {}x{}",
					graph.nodes.len(),
					graph.links.len(),
					w,
					h
				);
				build_error.set(None);
				*state_init.borrow_mut() = Some(s);
			}
			Err(e) => {
				error!("graph rejected: {e}");
				build_error.set(Some(Arc::new(e)));
				*state_init.borrow_mut() = None;
			}
		}

		// Listeners and the frame loop are installed once; later runs only
		// swap the state they drive.
		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = context_2d(&canvas) else {
			error!("2d canvas context unavailable");
			return;
		};

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

		let (state_anim, animate_inner, resize_anim, disposed_anim) = (
			state_init.clone(),
			animate_init.clone(),
			resize_cb_init.clone(),
			disposed_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			if disposed_anim.load(Ordering::Relaxed) {
				if let Some(cb) = resize_anim.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				if let Some(mut s) = state_anim.borrow_mut().take() {
					s.dispose();
				}
				// This closure is still running; drop it once it has returned.
				let frame_cb = animate_inner.borrow_mut().take();
				spawn_local(async move {
					drop(frame_cb);
				});
				debug!("graph frame loop stopped");
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if s.frame() {
					render::render(s, &ctx);
				}
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	on_cleanup(move || {
		disposed.store(true, Ordering::Relaxed);
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_up();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref.get(), &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.wheel(
				x,
				y,
				ev.delta_y(),
				WheelDeltaMode::from_dom(ev.delta_mode()),
				ev.ctrl_key(),
			);
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
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		// Surfaces in the nearest ErrorBoundary.
		{move || build_error.get().map(Err::<(), Arc<GraphError>>)}
	}
}
