//! Canvas drawing for the environment diagram. Reads [`SimState`], never
//! mutates it.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::sim::{BADGE_THRESHOLD, EdgeVisibility, SimNode, SimState};

const BACKGROUND: &str = "#0a0a1a";
/// Edges fade linearly with distance and vanish entirely beyond this.
const EDGE_FADE_DISTANCE: f64 = 260.0;
const EDGE_BASE_ALPHA: f64 = 0.5;
const DIMMED_EDGE_FACTOR: f64 = 0.25;

const TOOLTIP_WIDTH: f64 = 190.0;
const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
const TOOLTIP_PADDING: f64 = 10.0;

pub fn render(state: &SimState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.viewport.width, state.viewport.height);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	if let Some(idx) = state.hovered {
		draw_tooltip(state, idx, ctx);
	}
}

fn edge_alpha(dist: f64) -> f64 {
	(1.0 - dist / EDGE_FADE_DISTANCE).max(0.0) * EDGE_BASE_ALPHA
}

fn draw_edges(state: &SimState, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(1.5);
	for &(a, b) in &state.edges {
		let visibility = state.edge_visibility(a, b);
		if visibility == EdgeVisibility::Hidden {
			continue;
		}
		let (n1, n2) = (&state.nodes[a], &state.nodes[b]);
		let (dx, dy) = (n2.x - n1.x, n2.y - n1.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}
		let mut alpha = edge_alpha(dist);
		if visibility == EdgeVisibility::Dimmed {
			alpha *= DIMMED_EDGE_FACTOR;
		}
		if alpha <= 0.0 {
			continue;
		}

		// Trim the line back to the circle borders.
		let (ux, uy) = (dx / dist, dy / dist);
		ctx.set_stroke_style_str(&format!("rgba(100, 180, 255, {alpha:.3})"));
		ctx.begin_path();
		ctx.move_to(n1.x + ux * n1.radius, n1.y + uy * n1.radius);
		ctx.line_to(n2.x - ux * n2.radius, n2.y - uy * n2.radius);
		ctx.stroke();
	}
}

fn draw_nodes(state: &SimState, ctx: &CanvasRenderingContext2d) {
	for (idx, node) in state.nodes.iter().enumerate() {
		if !state.node_visible(idx) {
			continue;
		}
		let hovered = state.hovered == Some(idx);

		ctx.set_global_alpha(if hovered { 1.0 } else { 0.85 });
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.env.category.color());
		ctx.fill();
		ctx.set_stroke_style_str("rgba(255, 255, 255, 0.35)");
		ctx.set_line_width(1.0);
		ctx.stroke();
		ctx.set_global_alpha(1.0);

		if hovered {
			ctx.begin_path();
			let _ = ctx.arc(node.x, node.y, node.radius + 3.0, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str("rgba(255, 255, 255, 0.8)");
			ctx.set_line_width(1.5);
			ctx.stroke();
		}

		ctx.set_fill_style_str("rgba(255, 255, 255, 0.75)");
		ctx.set_font("11px sans-serif");
		ctx.set_text_align("center");
		let _ = ctx.fill_text(node.env.name, node.x, node.y + node.radius + 14.0);

		if node.radius > BADGE_THRESHOLD {
			draw_badge(node, ctx);
		}
	}
	ctx.set_text_align("left");
}

/// Small decorative overlay with the raw popularity count, only on nodes big
/// enough to carry it.
fn draw_badge(node: &SimNode, ctx: &CanvasRenderingContext2d) {
	let (bx, by) = (node.x + node.radius * 0.8, node.y - node.radius * 0.8);
	ctx.begin_path();
	let _ = ctx.arc(bx, by, 9.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str("rgba(255, 183, 3, 0.9)");
	ctx.fill();
	ctx.set_fill_style_str("#0a0a1a");
	ctx.set_font("bold 8px sans-serif");
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&node.env.popularity.to_string(), bx, by + 3.0);
}

fn draw_tooltip(state: &SimState, idx: usize, ctx: &CanvasRenderingContext2d) {
	let node = &state.nodes[idx];
	let lines = [
		node.env.name.to_string(),
		format!("{} / {}", node.env.category.label(), node.env.difficulty.label()),
		format!("Reward {}", node.env.reward),
		format!("Est. {}", node.env.time_estimate),
		format!("{} explorers", node.env.popularity),
	];
	let height = TOOLTIP_PADDING * 2.0 + TOOLTIP_LINE_HEIGHT * lines.len() as f64;

	// Keep the panel on screen, flipping to the left of the node if needed.
	let mut x = node.x + node.radius + 12.0;
	if x + TOOLTIP_WIDTH > state.viewport.width {
		x = node.x - node.radius - 12.0 - TOOLTIP_WIDTH;
	}
	let y = (node.y - height / 2.0).clamp(0.0, (state.viewport.height - height).max(0.0));

	ctx.set_fill_style_str("rgba(16, 16, 40, 0.92)");
	ctx.fill_rect(x, y, TOOLTIP_WIDTH, height);
	ctx.set_stroke_style_str("rgba(100, 180, 255, 0.6)");
	ctx.set_line_width(1.0);
	ctx.stroke_rect(x, y, TOOLTIP_WIDTH, height);

	ctx.set_text_align("left");
	for (i, line) in lines.iter().enumerate() {
		if i == 0 {
			ctx.set_fill_style_str("#ffffff");
			ctx.set_font("bold 12px sans-serif");
		} else {
			ctx.set_fill_style_str("#b8b8d4");
			ctx.set_font("11px sans-serif");
		}
		let line_y = y + TOOLTIP_PADDING + TOOLTIP_LINE_HEIGHT * (i as f64 + 0.75);
		let _ = ctx.fill_text(line, x + TOOLTIP_PADDING, line_y);
	}
}
