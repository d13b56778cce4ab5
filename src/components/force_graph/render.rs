use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{BACKGROUND_COLOR, LINK_COLOR};
use super::state::{ForceGraphState, NodeInfo};

const PARTICLE_RADIUS: f64 = 1.0;
/// Fraction of a link a particle travels per second.
const PARTICLE_SPEED: f64 = 0.25;
const LABEL_PADDING: f64 = 4.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND_COLOR);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
	draw_tooltip(state, ctx);
}

/// Tooltip for the hovered node, drawn in screen space so it keeps its size when zoomed.
fn draw_tooltip(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let Some(idx) = state.hover.node else {
		return;
	};
	let Some(&(x, y, radius)) = state.positions().get(&idx) else {
		return;
	};
	let Some(info) = state.node_info(idx) else {
		return;
	};
	let k = state.transform.k;
	let (sx, sy) = (x * k + state.transform.x, (y - radius) * k + state.transform.y - 12.0);

	ctx.set_font("12px sans-serif");
	let text_width = ctx
		.measure_text(&info.style.tooltip)
		.map(|m| m.width())
		.unwrap_or(0.0);
	ctx.set_global_alpha(ease_out_cubic(state.hover.highlight_t));
	ctx.set_fill_style_str("rgba(20, 27, 45, 0.95)");
	let box_height = 12.0 + LABEL_PADDING * 2.0;
	ctx.fill_rect(
		sx - text_width / 2.0 - LABEL_PADDING * 2.0,
		sy - box_height,
		text_width + LABEL_PADDING * 4.0,
		box_height,
	);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str("#fff");
	let _ = ctx.fill_text(&info.style.tooltip, sx, sy - box_height / 2.0);
	ctx.set_global_alpha(1.0);
}

fn draw_links(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.highlight_t);
	let positions = state.positions();

	for &(src, tgt, style) in &state.edges {
		let (Some(&(x1, y1, r1)), Some(&(x2, y2, r2))) = (positions.get(&src), positions.get(&tgt))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < r1 + r2 {
			continue;
		}

		let is_highlighted = state.is_highlighted(src) && state.is_highlighted(tgt);
		// t=0: all links at base alpha, t=1: highlighted links brighten, others dim
		let (alpha, width) = if is_highlighted {
			(0.7 + 0.3 * t, style.width * (1.0 + 0.3 * t))
		} else {
			(0.7 - 0.5 * t, style.width * (1.0 - 0.3 * t))
		};

		let (ux, uy) = (dx / dist, dy / dist);
		let (sx, sy) = (x1 + ux * r1, y1 + uy * r1);
		let (ex, ey) = (x2 - ux * r2, y2 - uy * r2);

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(LINK_COLOR);
		ctx.set_line_width(width.max(0.5 / k));
		ctx.begin_path();
		ctx.move_to(sx, sy);
		ctx.line_to(ex, ey);
		ctx.stroke();

		if style.particles > 0 {
			ctx.set_fill_style_str("rgba(200, 220, 255, 0.9)");
			let n = style.particles as f64;
			for i in 0..style.particles {
				let progress = (state.flow_time * PARTICLE_SPEED + i as f64 / n).fract();
				ctx.begin_path();
				let _ = ctx.arc(
					sx + (ex - sx) * progress,
					sy + (ey - sy) * progress,
					PARTICLE_RADIUS,
					0.0,
					2.0 * PI,
				);
				ctx.fill();
			}
		}
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
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
		let (alpha, radius) = (1.0 - 0.7 * t, info.style.radius * (1.0 - 0.15 * t));

		ctx.set_global_alpha(alpha);
		draw_disc(ctx, info, x, y, radius, k);
		draw_label(ctx, info, x, y, radius, k);
		ctx.set_global_alpha(1.0);
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
		let base = info.style.radius;
		let (x, y) = (node.x() as f64, node.y() as f64);
		let is_hovered = state.is_hovered(idx);
		let is_neighbor =
			state.hover.neighbors.contains(&idx) || state.hover.prev_neighbors.contains(&idx);

		let (radius, glow_radius) = if is_hovered {
			(base * (1.0 + 0.35 * t), base * (1.8 + 1.2 * t))
		} else if is_neighbor {
			(base * (1.0 + 0.2 * t), base * (1.4 + 0.6 * t))
		} else {
			(base, 0.0)
		};

		if glow_radius > 0.0 && t > 0.01 {
			if let Ok(gradient) =
				ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow_radius)
			{
				let alpha = if is_hovered { 0.35 * t } else { 0.2 * t };
				let _ = gradient.add_color_stop(0.0, &format!("rgba(255, 255, 255, {})", alpha));
				let _ = gradient
					.add_color_stop(0.6, &format!("rgba(200, 220, 255, {})", alpha * 0.3));
				let _ = gradient.add_color_stop(1.0, "rgba(255, 255, 255, 0)");
				ctx.begin_path();
				let _ = ctx.arc(x, y, glow_radius, 0.0, 2.0 * PI);
				#[allow(deprecated)]
				ctx.set_fill_style(&gradient);
				ctx.fill();
			}
		}

		draw_disc(ctx, info, x, y, radius, k);

		if is_hovered && t > 0.01 {
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.7 * t));
			ctx.set_line_width(1.5 / k);
			ctx.stroke();
		}

		draw_label(ctx, info, x, y, radius, k);
	});
}

fn draw_disc(ctx: &CanvasRenderingContext2d, info: &NodeInfo, x: f64, y: f64, radius: f64, k: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(info.style.bucket.color());
	ctx.fill();
	ctx.set_stroke_style_str("#fff");
	ctx.set_line_width(2.0 / k);
	ctx.stroke();
}

/// Label centred under the node on a dark pill.
fn draw_label(
	ctx: &CanvasRenderingContext2d,
	info: &NodeInfo,
	x: f64,
	y: f64,
	radius: f64,
	k: f64,
) {
	let font_size = 12.0 / k.max(0.5);
	ctx.set_font(&format!("{}px sans-serif", font_size));
	let text_width = ctx
		.measure_text(&info.style.label)
		.map(|m| m.width())
		.unwrap_or(0.0);

	ctx.set_fill_style_str("rgba(20, 27, 45, 0.9)");
	ctx.fill_rect(
		x - text_width / 2.0 - LABEL_PADDING,
		y + radius + 4.0,
		text_width + LABEL_PADDING * 2.0,
		font_size + LABEL_PADDING * 2.0,
	);

	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	ctx.set_fill_style_str("#fff");
	let _ = ctx.fill_text(&info.style.label, x, y + radius + font_size / 2.0 + 8.0);
}
