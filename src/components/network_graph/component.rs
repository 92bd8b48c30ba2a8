use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::render;
use super::sim::{SimState, Viewport};
use super::types::{CATALOGUE, CONNECTIONS, Category, CategoryFilter};
use crate::components::effects;

/// Delay before the single retry when the canvas reports zero dimensions.
const RETRY_DELAY_MS: i32 = 250;

/// Derives a 32-bit simulation seed from a millisecond timestamp. Truncates
/// modulo `u32::MAX`; a straight `as` cast from f64 saturates there instead,
/// which would give every page load the same layout.
fn seed_from_timestamp(ms: f64) -> u32 {
	(ms as u64 % u64::from(u32::MAX)) as u32
}

fn parent_viewport(canvas: &HtmlCanvasElement) -> Viewport {
	let parent = canvas.parent_element();
	Viewport {
		width: parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(0.0),
		height: parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(0.0),
	}
}

/// Sizes the backing store for the device pixel ratio and returns a context
/// scaled so drawing stays in CSS pixels. Setting the width resets the
/// context transform, so this is safe to call again on resize.
fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) -> Option<CanvasRenderingContext2d> {
	let dpr = web_sys::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
	canvas.set_width((viewport.width * dpr) as u32);
	canvas.set_height((viewport.height * dpr) as u32);
	// Qualified: the prelude's ElementExt also has a `style` method.
	let style = web_sys::HtmlElement::style(canvas);
	let _ = style.set_property("width", &format!("{}px", viewport.width));
	let _ = style.set_property("height", &format!("{}px", viewport.height));
	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")
		.ok()
		.flatten()?
		.dyn_into()
		.ok()?;
	ctx.scale(dpr, dpr).ok()?;
	Some(ctx)
}

/// Animated environment diagram with category filter buttons and hover
/// tooltips, drawn on a 2D canvas sized to its container.
#[component]
pub fn NetworkGraph() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let (filter, set_filter) = signal(CategoryFilter::All);

	let state: Rc<RefCell<Option<SimState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let retry_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let retry_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let retried = Rc::new(Cell::new(false));

	// Builds the state and starts the frame loop; false while the canvas
	// still has zero dimensions.
	let try_init: Rc<dyn Fn(HtmlCanvasElement) -> bool> = Rc::new({
		let (state, animate, raf_handle) = (state.clone(), animate.clone(), raf_handle.clone());
		move |canvas: HtmlCanvasElement| -> bool {
			let viewport = parent_viewport(&canvas);
			if viewport.width <= 0.0 || viewport.height <= 0.0 {
				return false;
			}
			let Some(ctx) = size_canvas(&canvas, viewport) else {
				return false;
			};
			let seed = seed_from_timestamp(js_sys::Date::now());
			*state.borrow_mut() = Some(SimState::new(CATALOGUE, CONNECTIONS, viewport, seed));

			let (state_anim, animate_inner, raf_inner) =
				(state.clone(), animate.clone(), raf_handle.clone());
			*animate.borrow_mut() = Some(Closure::new(move || {
				if let Some(ref mut s) = *state_anim.borrow_mut() {
					s.step();
					render::render(s, &ctx);
				}
				if let Some(ref cb) = *animate_inner.borrow() {
					if let Some(window) = web_sys::window() {
						raf_inner
							.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
					}
				}
			}));
			if let Some(ref cb) = *animate.borrow() {
				if let Some(window) = web_sys::window() {
					raf_handle.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
				}
			}
			true
		}
	});

	Effect::new({
		let (state, resize_cb, retry_cb) = (state.clone(), resize_cb.clone(), retry_cb.clone());
		let (try_init, retried, retry_handle) =
			(try_init.clone(), retried.clone(), retry_handle.clone());
		move |_| {
			let Some(canvas) = canvas_ref.get() else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();
			let Some(window) = web_sys::window() else {
				return;
			};

			// Track container size; a resize re-runs the layout.
			let (state_rs, canvas_rs) = (state.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let viewport = parent_viewport(&canvas_rs);
				if viewport.width <= 0.0 || viewport.height <= 0.0 {
					return;
				}
				if size_canvas(&canvas_rs, viewport).is_some() {
					if let Some(ref mut s) = *state_rs.borrow_mut() {
						s.resize(viewport);
					}
				}
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}

			if try_init(canvas.clone()) || retried.replace(true) {
				return;
			}
			// Zero-dimension surface at start-up: one deferred retry, then a
			// diagnostic with no further recovery.
			log::warn!("network graph canvas has zero dimensions, retrying once");
			let try_retry = try_init.clone();
			*retry_cb.borrow_mut() = Some(Closure::new(move || {
				if !try_retry(canvas.clone()) {
					log::warn!("network graph canvas still has zero dimensions, graph disabled");
				}
			}));
			if let Some(ref cb) = *retry_cb.borrow() {
				retry_handle.set(
					window
						.set_timeout_with_callback_and_timeout_and_arguments_0(
							cb.as_ref().unchecked_ref(),
							RETRY_DELAY_MS,
						)
						.ok(),
				);
			}
		}
	});

	// Keep the state's filter in sync with the buttons.
	Effect::new({
		let state = state.clone();
		move |_| {
			let filter = filter.get();
			if let Some(ref mut s) = *state.borrow_mut() {
				s.set_filter(filter);
			}
		}
	});

	// The frame loop and every registered callback die with the component.
	// SendWrapper satisfies on_cleanup's Send + Sync bound for the JS-side
	// handles; cleanup only ever runs on the UI thread.
	on_cleanup({
		let handles = SendWrapper::new((
			animate.clone(),
			resize_cb.clone(),
			retry_cb.clone(),
			raf_handle.clone(),
			retry_handle.clone(),
		));
		move || {
			let (animate, resize_cb, retry_cb, raf_handle, retry_handle) = handles.take();
			if let Some(window) = web_sys::window() {
				if let Some(id) = raf_handle.take() {
					let _ = window.cancel_animation_frame(id);
				}
				if let Some(id) = retry_handle.take() {
					window.clear_timeout_with_handle(id);
				}
				if let Some(cb) = resize_cb.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
			}
			animate.borrow_mut().take();
			retry_cb.borrow_mut().take();
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			let hovered = s.hit_test(x, y);
			s.set_hover(hovered);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	let state_ck = state.clone();
	let on_click = move |_: MouseEvent| {
		if let Some(ref s) = *state_ck.borrow() {
			if let Some(idx) = s.hovered {
				effects::track_event("Environment", "View", s.nodes[idx].env.name);
			}
		}
	};

	view! {
		<div class="network-graph">
			<div class="graph-filters">
				<button
					class="filter-btn"
					class:active=move || filter.get() == CategoryFilter::All
					on:click=move |_| set_filter.set(CategoryFilter::All)
				>
					"All"
				</button>
				{Category::ALL
					.iter()
					.copied()
					.map(|cat| {
						view! {
							<button
								class="filter-btn"
								class:active=move || filter.get() == CategoryFilter::Only(cat)
								on:click=move |_| {
									set_filter.set(CategoryFilter::Only(cat));
									effects::track_event("Filter", "Select", cat.label());
								}
							>
								{cat.label()}
							</button>
						}
					})
					.collect_view()}
			</div>
			<canvas
				node_ref=canvas_ref
				class="network-graph-canvas"
				on:mousemove=on_mousemove
				on:mouseleave=on_mouseleave
				on:click=on_click
			/>
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::seed_from_timestamp;

	#[test]
	fn seed_varies_across_page_loads() {
		// Timestamps in the current era are far above u32::MAX; truncation
		// must keep them distinct rather than pinning the seed at the cap.
		let now = 1_756_000_000_000.0;
		assert_ne!(seed_from_timestamp(now), u32::MAX);
		assert_ne!(seed_from_timestamp(now), seed_from_timestamp(now + 7.0));
	}
}
