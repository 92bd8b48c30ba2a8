use leptos::prelude::*;

/// 404 fallback page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<section class="not-found">
			<h1>"404"</h1>
			<p>"This sector of the multiverse hasn't been simulated yet."</p>
			<a href="/">"Return home"</a>
		</section>
	}
}
