use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::interaction::ViewTransform;
use super::scale::{group_color, link_width};
use super::state::{ForceGraphState, NODE_RADIUS};

const LINK_COLOR: &str = "#cbd5e1";
const LINK_OPACITY: f64 = 0.8;
const NODE_STROKE: &str = "#ffffff";
const NODE_STROKE_WIDTH: f64 = 2.0;
const LABEL_COLOR: &str = "#64748b";
const LABEL_FONT: &str = "500 12px sans-serif";
/// Label anchor relative to the marker centre (12px right, 0.35em down).
const LABEL_OFFSET: (f64, f64) = (12.0, 4.2);

#[derive(Clone, Debug, PartialEq)]
pub struct LinkPrimitive {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
	pub width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodePrimitive<'a> {
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub color: &'static str,
	pub label: &'a str,
	pub label_x: f64,
	pub label_y: f64,
}

/// Everything needed to paint one frame, in graph coordinates plus the
/// single transform applied to the whole scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene<'a> {
	pub transform: ViewTransform,
	pub links: Vec<LinkPrimitive>,
	pub nodes: Vec<NodePrimitive<'a>>,
}

impl Scene<'_> {
	/// Links with a drawable stroke. A zero width would fall back to the
	/// context's previous line width, so those are left out.
	pub fn stroked_links(&self) -> impl Iterator<Item = &LinkPrimitive> {
		self.links.iter().filter(|link| link.width > 0.0)
	}
}

pub fn snapshot(state: &ForceGraphState) -> Scene<'_> {
	let nodes = state.simulation.nodes();
	let links = state
		.simulation
		.links()
		.iter()
		.map(|link| {
			let (s, t) = (&nodes[link.source], &nodes[link.target]);
			LinkPrimitive {
				x1: s.x(),
				y1: s.y(),
				x2: t.x(),
				y2: t.y(),
				width: link_width(link.weight),
			}
		})
		.collect();
	let nodes = nodes
		.iter()
		.map(|node| NodePrimitive {
			x: node.x(),
			y: node.y(),
			radius: NODE_RADIUS,
			color: group_color(node.group()),
			label: node.label(),
			label_x: node.x() + LABEL_OFFSET.0,
			label_y: node.y() + LABEL_OFFSET.1,
		})
		.collect();

	Scene {
		transform: state.transform,
		links,
		nodes,
	}
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	draw(&snapshot(state), ctx, state.width, state.height);
}

pub fn draw(scene: &Scene, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
	ctx.clear_rect(0.0, 0.0, width, height);
	ctx.save();
	let _ = ctx.translate(scene.transform.x, scene.transform.y);
	let _ = ctx.scale(scene.transform.k, scene.transform.k);
	draw_links(scene, ctx);
	draw_nodes(scene, ctx);
	ctx.restore();
}

fn draw_links(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_global_alpha(LINK_OPACITY);
	ctx.set_stroke_style_str(LINK_COLOR);
	for link in scene.stroked_links() {
		ctx.set_line_width(link.width);
		ctx.begin_path();
		ctx.move_to(link.x1, link.y1);
		ctx.line_to(link.x2, link.y2);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(scene: &Scene, ctx: &CanvasRenderingContext2d) {
	ctx.set_line_width(NODE_STROKE_WIDTH);
	ctx.set_stroke_style_str(NODE_STROKE);
	for node in &scene.nodes {
		ctx.begin_path();
		let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(node.color);
		ctx.fill();
		ctx.stroke();
	}

	// Labels go on top but are never hit-tested, so they cannot steal a drag.
	ctx.set_font(LABEL_FONT);
	ctx.set_fill_style_str(LABEL_COLOR);
	for node in &scene.nodes {
		let _ = ctx.fill_text(node.label, node.label_x, node.label_y);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphData, GraphLink, GraphNode};
	use crate::pages::home::sample_data;

	#[test]
	fn snapshot_tracks_simulation_positions() {
		let mut state = ForceGraphState::new(&sample_data(), 800.0, 400.0).unwrap();
		for _ in 0..25 {
			state.frame();
		}
		let scene = snapshot(&state);
		assert_eq!(scene.nodes.len(), 9);
		assert_eq!(scene.links.len(), 8);

		for (prim, node) in scene.nodes.iter().zip(state.simulation.nodes()) {
			assert_eq!((prim.x, prim.y), (node.x(), node.y()));
			assert_eq!(prim.label, node.label());
			assert_eq!(prim.radius, NODE_RADIUS);
			assert!((prim.label_x - prim.x - 12.0).abs() < 1e-9);
		}
		for (prim, link) in scene.links.iter().zip(state.simulation.links()) {
			let source = &state.simulation.nodes()[link.source];
			let target = &state.simulation.nodes()[link.target];
			assert_eq!((prim.x1, prim.y1), (source.x(), source.y()));
			assert_eq!((prim.x2, prim.y2), (target.x(), target.y()));
			assert_eq!(prim.width, 2.0);
		}
	}

	#[test]
	fn snapshot_encodes_group_and_weight() {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a", 1, "A"),
				GraphNode::new("b", 2, "B"),
				GraphNode::new("c", 0, "C"),
			],
			links: vec![GraphLink::new("a", "b", 4.0), GraphLink::new("b", "c", 1.0)],
		};
		let state = ForceGraphState::new(&data, 300.0, 300.0).unwrap();
		let scene = snapshot(&state);
		let colors: Vec<_> = scene.nodes.iter().map(|n| n.color).collect();
		assert_eq!(colors, ["#3b82f6", "#10b981", "#f59e0b"]);
		assert_eq!(scene.links[0].width, 4.0);
		assert!(scene.links[0].width > scene.links[1].width);
	}

	#[test]
	fn weightless_links_are_not_stroked() {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a", 1, "A"),
				GraphNode::new("b", 1, "B"),
				GraphNode::new("c", 1, "C"),
				GraphNode::new("d", 1, "D"),
			],
			links: vec![
				GraphLink::new("a", "b", 1.0),
				GraphLink::new("b", "c", 0.0),
				GraphLink::new("c", "d", -2.0),
				GraphLink::new("d", "a", f64::NAN),
			],
		};
		let state = ForceGraphState::new(&data, 300.0, 300.0).unwrap();
		let scene = snapshot(&state);
		assert_eq!(scene.links.len(), 4);
		let stroked: Vec<_> = scene.stroked_links().collect();
		assert_eq!(stroked.len(), 1);
		assert_eq!(stroked[0], &scene.links[0]);
	}

	#[test]
	fn snapshot_carries_view_transform_only() {
		let mut state = ForceGraphState::new(&sample_data(), 800.0, 400.0).unwrap();
		let plain = snapshot(&state).nodes.iter().map(|n| (n.x, n.y)).collect::<Vec<_>>();
		state.zoom_by(3.0, 10.0, 10.0);
		state.pan_by(7.0, 7.0);
		let scene = snapshot(&state);
		assert_eq!(scene.transform, state.transform);
		let zoomed = scene.nodes.iter().map(|n| (n.x, n.y)).collect::<Vec<_>>();
		assert_eq!(plain, zoomed);
	}
}
