//! Headless micro-simulation behind the environment diagram.
//!
//! All state lives in [`SimState`], passed explicitly into step, render and
//! hit-test so the numeric behavior is testable without a canvas. Stepping is
//! deterministic for a given seed.

use std::collections::HashMap;
use std::f64::consts::PI;

use super::types::{Category, CategoryFilter, Environment};

/// Nodes never cross this distance from any viewport edge.
pub const EDGE_MARGIN: f64 = 40.0;
/// Clamp bounds of the rendered node radius, in px.
pub const MIN_NODE_SIZE: f64 = 8.0;
pub const MAX_NODE_SIZE: f64 = 28.0;
/// Nodes larger than this carry a popularity badge.
pub const BADGE_THRESHOLD: f64 = 20.0;

const POPULARITY_EXP: f64 = 0.45;
const AGE_EXP: f64 = 0.9;
const AGE_WEIGHT: f64 = 0.6;

const DAMPING: f64 = 0.92;
const BOUNCE_DAMPING: f64 = 0.5;
const JITTER: f64 = 0.08;
const MAX_INITIAL_SPEED: f64 = 0.6;
/// Beyond this fraction of the smaller viewport dimension from center, nodes
/// get a weak pull back toward it.
const CENTER_THRESHOLD_FRAC: f64 = 0.35;
const CENTER_ACCEL: f64 = 0.05;

/// Tiny multiplicative congruential generator, good enough for layout jitter
/// and kept inside the state so stepping stays reproducible.
#[derive(Clone, Debug)]
pub struct Lcg(u32);

impl Lcg {
	pub fn new(seed: u32) -> Self {
		Lcg(seed % 233280)
	}

	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.0 = (self.0.wrapping_mul(9301).wrapping_add(49297)) % 233280;
		self.0 as f64 / 233280.0
	}
}

/// Rendering surface dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	fn center(self) -> (f64, f64) {
		(self.width / 2.0, self.height / 2.0)
	}

	fn min_dim(self) -> f64 {
		self.width.min(self.height)
	}
}

/// One animated node: the immutable catalogue entry plus its mutable motion
/// state and precomputed visual radius.
#[derive(Clone, Debug)]
pub struct SimNode {
	pub env: Environment,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
}

/// How an edge should be drawn under the active filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeVisibility {
	/// Both endpoints match the filter.
	Full,
	/// Exactly one endpoint matches.
	Dimmed,
	/// Neither endpoint matches; not drawn at all.
	Hidden,
}

/// Full simulation state. No hidden module-level mutability; everything the
/// frame loop touches is here.
pub struct SimState {
	pub nodes: Vec<SimNode>,
	/// Edges as index pairs into `nodes`.
	pub edges: Vec<(usize, usize)>,
	pub viewport: Viewport,
	pub filter: CategoryFilter,
	pub hovered: Option<usize>,
	rng: Lcg,
}

/// Visual radius for an environment: a deterministic blend of its popularity
/// and age metrics, clamped to `[MIN_NODE_SIZE, MAX_NODE_SIZE]`. Monotone
/// non-decreasing in each input.
pub fn node_size(popularity: u32, age_weeks: f64) -> f64 {
	let raw = (popularity as f64).powf(POPULARITY_EXP) + age_weeks.powf(AGE_EXP) * AGE_WEIGHT;
	raw.clamp(MIN_NODE_SIZE, MAX_NODE_SIZE)
}

impl SimState {
	/// Builds the state from the catalogue and lays nodes out for the given
	/// viewport. Connections naming unknown ids are dropped.
	pub fn new(
		entities: &[Environment],
		connections: &[(u32, u32)],
		viewport: Viewport,
		seed: u32,
	) -> Self {
		let mut id_to_idx = HashMap::new();
		let nodes: Vec<SimNode> = entities
			.iter()
			.enumerate()
			.map(|(i, env)| {
				id_to_idx.insert(env.id, i);
				SimNode {
					env: *env,
					x: 0.0,
					y: 0.0,
					vx: 0.0,
					vy: 0.0,
					radius: node_size(env.popularity, env.age_weeks),
				}
			})
			.collect();

		let edges = connections
			.iter()
			.filter_map(|(a, b)| Some((*id_to_idx.get(a)?, *id_to_idx.get(b)?)))
			.collect();

		let mut state = Self {
			nodes,
			edges,
			viewport,
			filter: CategoryFilter::All,
			hovered: None,
			rng: Lcg::new(seed),
		};
		state.layout();
		state
	}

	/// Places every node on a spiral inside its category's angular sector
	/// around the viewport center, with a little jitter, and gives it a small
	/// random starting velocity. Re-run on every resize.
	pub fn layout(&mut self) {
		let viewport = self.viewport;
		let (cx, cy) = viewport.center();
		let min_dim = viewport.min_dim();
		let sector = 2.0 * PI / Category::COUNT as f64;
		let base_radius = 0.18 * min_dim;
		let radius_step = 0.05 * min_dim;
		let jitter = 0.02 * min_dim;

		let mut rank = [0usize; Category::COUNT];
		let (nodes, rng) = (&mut self.nodes, &mut self.rng);
		for node in nodes {
			let ci = node.env.category.index();
			let r = rank[ci];
			rank[ci] += 1;

			// Spiral: the angle sweeps the inner band of the sector while the
			// radius grows with the node's rank within its category.
			let start = ci as f64 * sector;
			let sweep = (r as f64 * 0.38).fract();
			let angle = start + sector * (0.15 + 0.7 * sweep);
			let radius = base_radius + radius_step * r as f64;

			let x = cx + radius * angle.cos() + (rng.next_f64() - 0.5) * 2.0 * jitter;
			let y = cy + radius * angle.sin() + (rng.next_f64() - 0.5) * 2.0 * jitter;
			node.x = x.clamp(EDGE_MARGIN, viewport.width - EDGE_MARGIN);
			node.y = y.clamp(EDGE_MARGIN, viewport.height - EDGE_MARGIN);
			node.vx = (rng.next_f64() - 0.5) * 2.0 * MAX_INITIAL_SPEED;
			node.vy = (rng.next_f64() - 0.5) * 2.0 * MAX_INITIAL_SPEED;
		}
	}

	/// Advances every node by one animation tick: integrate, jitter, damp,
	/// bounce off the margin box, and pull stragglers back toward center.
	/// After a step every position lies inside the margin box.
	pub fn step(&mut self) {
		let viewport = self.viewport;
		let (cx, cy) = viewport.center();
		let pull_threshold = CENTER_THRESHOLD_FRAC * viewport.min_dim();

		let (nodes, rng) = (&mut self.nodes, &mut self.rng);
		for node in nodes {
			node.x += node.vx;
			node.y += node.vy;

			node.vx += (rng.next_f64() - 0.5) * JITTER;
			node.vy += (rng.next_f64() - 0.5) * JITTER;
			node.vx *= DAMPING;
			node.vy *= DAMPING;

			// Inelastic wall bounce at a fixed margin from every edge.
			if node.x < EDGE_MARGIN {
				node.x = EDGE_MARGIN;
				node.vx = -node.vx * BOUNCE_DAMPING;
			} else if node.x > viewport.width - EDGE_MARGIN {
				node.x = viewport.width - EDGE_MARGIN;
				node.vx = -node.vx * BOUNCE_DAMPING;
			}
			if node.y < EDGE_MARGIN {
				node.y = EDGE_MARGIN;
				node.vy = -node.vy * BOUNCE_DAMPING;
			} else if node.y > viewport.height - EDGE_MARGIN {
				node.y = viewport.height - EDGE_MARGIN;
				node.vy = -node.vy * BOUNCE_DAMPING;
			}

			// Weak centering pull, only once a node has drifted far out.
			let (dx, dy) = (cx - node.x, cy - node.y);
			let dist = (dx * dx + dy * dy).sqrt();
			if dist > pull_threshold {
				node.vx += dx / dist * CENTER_ACCEL;
				node.vy += dy / dist * CENTER_ACCEL;
			}
		}
	}

	/// Updates the viewport and re-runs the layout.
	pub fn resize(&mut self, viewport: Viewport) {
		self.viewport = viewport;
		self.layout();
	}

	/// Replaces the active filter. Takes effect on the next render; the
	/// layout is untouched.
	pub fn set_filter(&mut self, filter: CategoryFilter) {
		self.filter = filter;
	}

	pub fn set_hover(&mut self, hovered: Option<usize>) {
		self.hovered = hovered;
	}

	/// Whether the node passes the active filter and gets drawn.
	pub fn node_visible(&self, idx: usize) -> bool {
		self.filter.matches(self.nodes[idx].env.category)
	}

	/// Edge treatment under the active filter.
	pub fn edge_visibility(&self, a: usize, b: usize) -> EdgeVisibility {
		match (self.node_visible(a), self.node_visible(b)) {
			(true, true) => EdgeVisibility::Full,
			(false, false) => EdgeVisibility::Hidden,
			_ => EdgeVisibility::Dimmed,
		}
	}

	/// First node in iteration order whose circle contains the point and
	/// which passes the active filter.
	pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
		self.nodes.iter().position(|node| {
			if !self.filter.matches(node.env.category) {
				return false;
			}
			let (dx, dy) = (node.x - x, node.y - y);
			dx * dx + dy * dy <= node.radius * node.radius
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::{CATALOGUE, CONNECTIONS};

	const VIEWPORT: Viewport = Viewport {
		width: 800.0,
		height: 600.0,
	};

	fn test_state() -> SimState {
		SimState::new(CATALOGUE, CONNECTIONS, VIEWPORT, 42)
	}

	fn assert_inside_margins(state: &SimState) {
		for node in &state.nodes {
			assert!(
				node.x >= EDGE_MARGIN && node.x <= VIEWPORT.width - EDGE_MARGIN,
				"{} escaped horizontally: x={}",
				node.env.name,
				node.x
			);
			assert!(
				node.y >= EDGE_MARGIN && node.y <= VIEWPORT.height - EDGE_MARGIN,
				"{} escaped vertically: y={}",
				node.env.name,
				node.y
			);
		}
	}

	#[test]
	fn layout_places_nodes_inside_margins() {
		assert_inside_margins(&test_state());
	}

	#[test]
	fn nodes_stay_inside_margins_after_many_steps() {
		let mut state = test_state();
		for _ in 0..500 {
			state.step();
			assert_inside_margins(&state);
		}
	}

	#[test]
	fn layout_clusters_categories_into_sectors() {
		let state = test_state();
		let (cx, cy) = VIEWPORT.center();
		let sector = 2.0 * PI / Category::COUNT as f64;
		for node in &state.nodes {
			let mut angle = (node.y - cy).atan2(node.x - cx);
			if angle < 0.0 {
				angle += 2.0 * PI;
			}
			let ci = node.env.category.index() as f64;
			assert!(
				angle >= ci * sector && angle < (ci + 1.0) * sector,
				"{} landed outside its sector: angle={angle}",
				node.env.name
			);
		}
	}

	#[test]
	fn size_is_monotone_in_each_metric() {
		for &(pop, age) in &[(0u32, 0.0f64), (18, 0.5), (98, 6.0), (456, 24.0)] {
			assert!(node_size(pop + 50, age) >= node_size(pop, age));
			assert!(node_size(pop, age + 5.0) >= node_size(pop, age));
		}
	}

	#[test]
	fn size_stays_inside_clamp_bounds() {
		for &(pop, age) in &[(0u32, 0.0f64), (18, 0.5), (456, 24.0), (1_000_000, 500.0)] {
			let size = node_size(pop, age);
			assert!((MIN_NODE_SIZE..=MAX_NODE_SIZE).contains(&size), "size={size}");
		}
	}

	#[test]
	fn popular_old_environment_outsizes_fresh_small_one() {
		let big = node_size(456, 24.0);
		let small = node_size(18, 0.5);
		assert!(big > small, "expected {big} > {small}");
		assert!((MIN_NODE_SIZE..=MAX_NODE_SIZE).contains(&big));
		assert!((MIN_NODE_SIZE..=MAX_NODE_SIZE).contains(&small));
	}

	#[test]
	fn hit_test_misses_empty_space() {
		let state = test_state();
		// Inside the viewport but outside the margin box, so beyond the reach
		// of every node circle (max radius < EDGE_MARGIN - 1).
		assert_eq!(state.hit_test(1.0, 1.0), None);
		assert_eq!(state.hit_test(VIEWPORT.width - 1.0, VIEWPORT.height - 1.0), None);
	}

	#[test]
	fn hit_test_finds_covering_node() {
		let state = test_state();
		let first = &state.nodes[0];
		assert_eq!(state.hit_test(first.x, first.y), Some(0));
	}

	#[test]
	fn hit_test_never_returns_filtered_out_nodes() {
		let mut state = test_state();
		state.set_filter(CategoryFilter::Only(Category::Finance));
		for idx in 0..state.nodes.len() {
			let (x, y) = (state.nodes[idx].x, state.nodes[idx].y);
			if let Some(hit) = state.hit_test(x, y) {
				assert_eq!(state.nodes[hit].env.category, Category::Finance);
			} else {
				// A miss is only acceptable over a non-finance node.
				assert_ne!(state.nodes[idx].env.category, Category::Finance);
			}
		}
	}

	#[test]
	fn finance_filter_hides_other_nodes_and_classifies_edges() {
		let mut state = test_state();
		state.set_filter(CategoryFilter::Only(Category::Finance));
		for idx in 0..state.nodes.len() {
			assert_eq!(
				state.node_visible(idx),
				state.nodes[idx].env.category == Category::Finance
			);
		}
		for &(a, b) in &state.edges {
			let finance_ends = [a, b]
				.iter()
				.filter(|&&i| state.nodes[i].env.category == Category::Finance)
				.count();
			let expected = match finance_ends {
				2 => EdgeVisibility::Full,
				1 => EdgeVisibility::Dimmed,
				_ => EdgeVisibility::Hidden,
			};
			assert_eq!(state.edge_visibility(a, b), expected);
		}
	}

	#[test]
	fn resize_relayouts_into_new_bounds() {
		let mut state = test_state();
		for _ in 0..50 {
			state.step();
		}
		let new_viewport = Viewport {
			width: 400.0,
			height: 300.0,
		};
		state.resize(new_viewport);
		for node in &state.nodes {
			assert!(node.x >= EDGE_MARGIN && node.x <= new_viewport.width - EDGE_MARGIN);
			assert!(node.y >= EDGE_MARGIN && node.y <= new_viewport.height - EDGE_MARGIN);
		}
	}

	#[test]
	fn same_seed_gives_same_trajectory() {
		let mut a = test_state();
		let mut b = test_state();
		for _ in 0..20 {
			a.step();
			b.step();
		}
		for (na, nb) in a.nodes.iter().zip(&b.nodes) {
			assert_eq!(na.x, nb.x);
			assert_eq!(na.y, nb.y);
		}
	}

	#[test]
	fn lcg_stays_in_unit_interval() {
		let mut rng = Lcg::new(7);
		for _ in 0..1000 {
			let v = rng.next_f64();
			assert!((0.0..1.0).contains(&v));
		}
	}
}
