//! One-shot page behaviors: smooth scrolling, reveal-on-scroll animations,
//! nav chrome, the parallax starfield, button ripples, and the analytics
//! logging stub. Every listener registered here is removed on cleanup.

use std::time::Duration;

use leptos::prelude::{on_cleanup, set_timeout};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{
	Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
	IntersectionObserverInit, MouseEvent, ScrollBehavior, ScrollToOptions,
};

/// Height of the fixed navigation bar, compensated when scrolling to anchors.
const NAV_OFFSET: f64 = 80.0;
/// Star layers and their parallax speeds.
const STAR_LAYERS: &[(&str, f64)] = &[(".stars", 0.1), (".stars2", 0.2), (".stars3", 0.3)];
const RIPPLE_LIFETIME_MS: u64 = 600;

/// Placeholder analytics channel; a production build would forward these to a
/// real tracker.
pub fn track_event(category: &str, action: &str, label: &str) {
	log::info!("analytics: {category} / {action} / {label}");
}

/// Smoothly scrolls the page to the element with the given id. A missing
/// target is a no-op.
pub fn smooth_scroll_to(target_id: &str) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let Some(target) = window
		.document()
		.and_then(|d| d.get_element_by_id(target_id))
		.and_then(|el| el.dyn_into::<HtmlElement>().ok())
	else {
		return;
	};
	let options = ScrollToOptions::new();
	options.set_top(target.offset_top() as f64 - NAV_OFFSET);
	options.set_behavior(ScrollBehavior::Smooth);
	window.scroll_to_with_scroll_to_options(&options);
}

/// Fades `.reveal` elements in the first time they scroll into view, then
/// stops watching them.
pub fn wire_reveal_observer() {
	let Some(document) = web_sys::window().and_then(|w| w.document()) else {
		return;
	};
	let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
		|entries: js_sys::Array, observer: IntersectionObserver| {
			for entry in entries.iter() {
				let entry: IntersectionObserverEntry = entry.unchecked_into();
				if entry.is_intersecting() {
					let target = entry.target();
					let _ = target.class_list().add_1("visible");
					observer.unobserve(&target);
				}
			}
		},
	);

	let options = IntersectionObserverInit::new();
	options.set_threshold(&JsValue::from_f64(0.1));
	options.set_root_margin("0px 0px -100px 0px");
	let Ok(observer) =
		IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
	else {
		return;
	};

	if let Ok(nodes) = document.query_selector_all(".reveal") {
		for i in 0..nodes.length() {
			if let Some(el) = nodes.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
				observer.observe(&el);
			}
		}
	}

	// SendWrapper satisfies on_cleanup's Send + Sync bound; cleanup only
	// ever runs on the UI thread.
	let cleanup = SendWrapper::new((observer, callback));
	on_cleanup(move || {
		let (observer, callback) = cleanup.take();
		observer.disconnect();
		drop(callback);
	});
}

/// Nav chrome and starfield parallax, driven by a single window scroll
/// listener.
pub fn wire_scroll_effects() {
	let Some(window) = web_sys::window() else {
		return;
	};
	let callback = Closure::<dyn FnMut()>::new(move || {
		let Some(window) = web_sys::window() else {
			return;
		};
		let Some(document) = window.document() else {
			return;
		};
		let scrolled = window.page_y_offset().unwrap_or(0.0);

		if let Ok(Some(nav)) = document.query_selector(".nav-container") {
			let classes = nav.class_list();
			let _ = if scrolled > 100.0 {
				classes.add_1("scrolled")
			} else {
				classes.remove_1("scrolled")
			};
		}

		for &(selector, speed) in STAR_LAYERS {
			let Ok(Some(layer)) = document.query_selector(selector) else {
				continue;
			};
			let Ok(layer) = layer.dyn_into::<HtmlElement>() else {
				continue;
			};
			let _ = layer
				.style()
				.set_property("transform", &format!("translateY({}px)", scrolled * speed));
		}
	});

	if window
		.add_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref())
		.is_err()
	{
		return;
	}
	let callback = SendWrapper::new(callback);
	on_cleanup(move || {
		let callback = callback.take();
		if let Some(window) = web_sys::window() {
			let _ = window
				.remove_event_listener_with_callback("scroll", callback.as_ref().unchecked_ref());
		}
	});
}

/// Spawns an expanding ripple inside the clicked button, removed once its
/// animation has played out.
pub fn spawn_ripple(ev: &MouseEvent) {
	let Some(button) = ev
		.current_target()
		.and_then(|t| t.dyn_into::<HtmlElement>().ok())
	else {
		return;
	};
	let Some(ripple) = web_sys::window()
		.and_then(|w| w.document())
		.and_then(|d| d.create_element("span").ok())
		.and_then(|el| el.dyn_into::<HtmlElement>().ok())
	else {
		return;
	};

	let rect = button.get_bounding_client_rect();
	let size = rect.width().max(rect.height());
	let x = ev.client_x() as f64 - rect.left() - size / 2.0;
	let y = ev.client_y() as f64 - rect.top() - size / 2.0;

	ripple.set_class_name("ripple");
	let style = ripple.style();
	let _ = style.set_property("width", &format!("{size}px"));
	let _ = style.set_property("height", &format!("{size}px"));
	let _ = style.set_property("left", &format!("{x}px"));
	let _ = style.set_property("top", &format!("{y}px"));

	if button.append_child(&ripple).is_ok() {
		set_timeout(move || ripple.remove(), Duration::from_millis(RIPPLE_LIFETIME_MS));
	}
}
