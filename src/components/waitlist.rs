//! Waitlist sign-up form: local email validation, de-duplicated capture into
//! `localStorage`, and the softly growing signup counter.

use std::time::Duration;

use leptos::prelude::*;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::components::effects;

/// Fixed per-origin key holding the submitted emails as a JSON string array.
const STORAGE_KEY: &str = "opensims_waitlist";
const MESSAGE_DISMISS_MS: u64 = 5000;
const COUNT_POP_MS: u64 = 300;
/// Cadence of the simulated organic growth while the page is open.
const GROWTH_PERIOD_SECS: u64 = 15;
const STARTING_COUNT: u32 = 12_847;

/// Accepts strings shaped like `local-part@domain.tld`: no whitespace, a
/// single `@`, and a dot with something on both sides in the domain.
pub fn is_valid_email(email: &str) -> bool {
	let mut parts = email.split('@');
	let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
		return false;
	};
	if local.is_empty() || local.chars().any(char::is_whitespace) {
		return false;
	}
	if domain.chars().any(char::is_whitespace) {
		return false;
	}
	match domain.rsplit_once('.') {
		Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
		None => false,
	}
}

/// Appends the email unless an identical entry already exists. Returns
/// whether the list changed.
fn append_unique(emails: &mut Vec<String>, email: &str) -> bool {
	if emails.iter().any(|existing| existing == email) {
		return false;
	}
	emails.push(email.to_string());
	true
}

/// Formats a count with thousands separators.
pub fn format_count(n: u32) -> String {
	let digits = n.to_string();
	let mut out = String::with_capacity(digits.len() + digits.len() / 3);
	for (i, ch) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % 3 == 0 {
			out.push(',');
		}
		out.push(ch);
	}
	out
}

fn local_storage() -> Option<Storage> {
	web_sys::window()?.local_storage().ok().flatten()
}

fn load_emails(storage: &Storage) -> Vec<String> {
	let Ok(Some(raw)) = storage.get_item(STORAGE_KEY) else {
		return Vec::new();
	};
	let Ok(parsed) = js_sys::JSON::parse(&raw) else {
		return Vec::new();
	};
	js_sys::Array::from(&parsed)
		.iter()
		.filter_map(|value| value.as_string())
		.collect()
}

fn save_emails(storage: &Storage, emails: &[String]) {
	let array = js_sys::Array::new();
	for email in emails {
		array.push(&JsValue::from_str(email));
	}
	if let Ok(raw) = js_sys::JSON::stringify(&array) {
		let _ = storage.set_item(STORAGE_KEY, &String::from(raw));
	}
}

/// Persists a validated email, de-duplicating by exact string match. Absent
/// storage (blocked cookies, headless contexts) degrades to a no-op.
fn store_email(email: &str) {
	let Some(storage) = local_storage() else {
		return;
	};
	let mut emails = load_emails(&storage);
	if append_unique(&mut emails, email) {
		save_emails(&storage, &emails);
	}
}

#[derive(Clone)]
struct Message {
	text: &'static str,
	kind: &'static str,
}

/// Email capture form with a transient status message and a counter that
/// drifts upward while the page stays open.
#[component]
pub fn WaitlistForm() -> impl IntoView {
	let input_ref = NodeRef::<leptos::html::Input>::new();
	let (count, set_count) = signal(STARTING_COUNT);
	let (count_pop, set_count_pop) = signal(false);
	let (message, set_message) = signal(None::<Message>);
	let dismiss_gen = StoredValue::new(0u32);

	let show_message = move |text: &'static str, kind: &'static str| {
		let generation = dismiss_gen.get_value() + 1;
		dismiss_gen.set_value(generation);
		set_message.set(Some(Message { text, kind }));
		set_timeout(
			move || {
				// A newer message restarts the dismissal clock.
				if dismiss_gen.get_value() == generation {
					set_message.set(None);
				}
			},
			Duration::from_millis(MESSAGE_DISMISS_MS),
		);
	};

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let Some(input) = input_ref.get() else {
			return;
		};
		let email = input.value().trim().to_string();
		if !is_valid_email(&email) {
			show_message("Please enter a valid email address", "error");
			return;
		}
		store_email(&email);
		effects::track_event("Waitlist", "Signup", "Landing form");
		show_message(
			"Welcome to the multiverse! Check your inbox for confirmation.",
			"success",
		);
		input.set_value("");
		set_count.update(|c| *c += 1);
		set_count_pop.set(true);
		set_timeout(move || set_count_pop.set(false), Duration::from_millis(COUNT_POP_MS));
	};

	// Simulated real-time growth: a cancellable repeating task, not a
	// self-rescheduling timeout chain.
	if let Ok(growth) = set_interval_with_handle(
		move || {
			if js_sys::Math::random() > 0.3 {
				set_count.update(|c| *c += 1);
			}
		},
		Duration::from_secs(GROWTH_PERIOD_SECS),
	) {
		on_cleanup(move || growth.clear());
	}

	view! {
		<form class="waitlist-form" novalidate=true on:submit=on_submit>
			<p class="waitlist-count-line">
				<span class="waitlist-count" class:pop=move || count_pop.get()>
					{move || format_count(count.get())}
				</span>
				" explorers already on the list"
			</p>
			<div class="waitlist-inputs">
				<input
					node_ref=input_ref
					type="email"
					class="waitlist-email"
					placeholder="you@example.com"
					aria-label="Email address"
				/>
				<button
					type="submit"
					class="btn btn-primary"
					on:click=|ev| effects::spawn_ripple(&ev)
				>
					"Join the Waitlist"
				</button>
			</div>
			{move || {
				message
					.get()
					.map(|m| view! { <p class=format!("form-message {}", m.kind)>{m.text}</p> })
			}}
		</form>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_well_formed_emails() {
		for email in ["a@b.co", "user.name+tag@example.io", "x@sub.domain.org", "a@b..c"] {
			assert!(is_valid_email(email), "should accept {email:?}");
		}
	}

	#[test]
	fn rejects_malformed_emails() {
		let bad = [
			"",
			"plain",
			"a@b",
			"a @b.c",
			"a@b .c",
			"a@b.",
			"a@.c",
			"@b.c",
			"a@@b.c",
			"a@b.c d",
		];
		for email in bad {
			assert!(!is_valid_email(email), "should reject {email:?}");
		}
	}

	#[test]
	fn duplicate_submission_stores_one_entry() {
		let mut emails = Vec::new();
		assert!(append_unique(&mut emails, "a@b.co"));
		assert!(!append_unique(&mut emails, "a@b.co"));
		assert_eq!(emails, vec!["a@b.co".to_string()]);
	}

	#[test]
	fn dedup_is_exact_match() {
		let mut emails = Vec::new();
		assert!(append_unique(&mut emails, "a@b.co"));
		assert!(append_unique(&mut emails, "A@b.co"));
		assert_eq!(emails.len(), 2);
	}

	#[test]
	fn count_formatting() {
		assert_eq!(format_count(0), "0");
		assert_eq!(format_count(999), "999");
		assert_eq!(format_count(1_000), "1,000");
		assert_eq!(format_count(12_847), "12,847");
		assert_eq!(format_count(1_234_567), "1,234,567");
	}
}
