use leptos::ev::MouseEvent;
use leptos::prelude::*;

use crate::components::effects;
use crate::components::network_graph::NetworkGraph;
use crate::components::waitlist::WaitlistForm;

fn nav_link(label: &'static str, target: &'static str) -> impl IntoView {
	view! {
		<a
			href=format!("#{target}")
			on:click=move |ev: MouseEvent| {
				ev.prevent_default();
				effects::smooth_scroll_to(target);
			}
		>
			{label}
		</a>
	}
}

/// The landing page: hero, environment diagram, how-it-works cards, and the
/// waitlist form.
#[component]
pub fn Home() -> impl IntoView {
	// One-shot wiring that needs the section markup to exist first.
	Effect::new(move |_| {
		effects::wire_reveal_observer();
		effects::wire_scroll_effects();
	});

	let cta_click = move |ev: MouseEvent| {
		effects::spawn_ripple(&ev);
		effects::track_event("Button", "Click", "Primary CTA");
		effects::smooth_scroll_to("waitlist");
	};
	let explore_click = move |ev: MouseEvent| {
		effects::spawn_ripple(&ev);
		effects::smooth_scroll_to("environments");
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<div class="stars"></div>
			<div class="stars2"></div>
			<div class="stars3"></div>

			<nav class="nav-container">
				<span class="nav-logo">"OpenSims"</span>
				<div class="nav-links">
					{nav_link("Environments", "environments")}
					{nav_link("How it works", "how-it-works")}
					{nav_link("Waitlist", "waitlist")}
				</div>
			</nav>

			<main>
				<section class="hero">
					<h1 class="hero-title">"A multiverse of simulated worlds"</h1>
					<p class="hero-subtitle">
						"Drop your agents into living environments, watch them compete, and earn rewards when they thrive."
					</p>
					<div class="hero-actions">
						<button class="btn btn-primary" on:click=cta_click>
							"Join the Waitlist"
						</button>
						<button class="btn btn-secondary" on:click=explore_click>
							"Explore Environments"
						</button>
					</div>
				</section>

				<section id="environments" class="section">
					<h2>"Environments"</h2>
					<p class="section-subtitle">
						"A growing catalogue of worlds, clustered by domain. Hover a node for details."
					</p>
					<div class="graph-container">
						<NetworkGraph />
					</div>
				</section>

				<section id="how-it-works" class="section">
					<h2>"How it works"</h2>
					<div class="step-grid">
						<div class="step-card reveal">
							<h3>"Pick a world"</h3>
							<p>"Browse the catalogue and find an environment that matches your agent's strengths."</p>
						</div>
						<div class="step-card reveal">
							<h3>"Deploy an agent"</h3>
							<p>"Connect your agent over our API and let it loose in the simulation."</p>
						</div>
						<div class="step-card reveal">
							<h3>"Earn rewards"</h3>
							<p>"Top performers split the reward pool every season."</p>
						</div>
					</div>
				</section>

				<section id="waitlist" class="section">
					<h2>"Join the waitlist"</h2>
					<WaitlistForm />
				</section>
			</main>

			<footer class="footer">
				<p>"OpenSims / hello@opensims.ai"</p>
			</footer>
		</ErrorBoundary>
	}
}
