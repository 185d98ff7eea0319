//! Force-directed layout: link springs, all-pairs charge and a centering pull,
//! integrated with velocity decay under a decaying `alpha`.

use std::collections::HashMap;
use std::f64::consts::PI;

use log::{debug, warn};

use super::error::GraphError;
use super::types::GraphData;

const INITIAL_RADIUS: f64 = 10.0;

#[derive(Clone, Debug)]
pub struct SimulationParameters {
	/// Rest length every link pulls towards.
	pub link_distance: f64,
	/// Negative values repel.
	pub charge_strength: f64,
	pub center_strength: f64,
	/// Floor applied to pair distances before computing repulsion.
	pub min_distance: f64,
	pub alpha_min: f64,
	pub alpha_decay: f64,
	pub velocity_decay: f64,
}

impl Default for SimulationParameters {
	fn default() -> Self {
		let alpha_min = 0.001;
		Self {
			link_distance: 100.0,
			charge_strength: -300.0,
			center_strength: 1.0,
			min_distance: 1.0,
			alpha_min,
			// Cools from 1 to `alpha_min` in 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
		}
	}
}

#[derive(Clone, Debug)]
pub struct SimNode {
	id: String,
	label: String,
	group: u32,
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
	pin: Option<(f64, f64)>,
	seed: (f64, f64),
}

impl SimNode {
	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn label(&self) -> &str {
		&self.label
	}

	pub fn group(&self) -> u32 {
		self.group
	}

	pub fn x(&self) -> f64 {
		self.x
	}

	pub fn y(&self) -> f64 {
		self.y
	}

	#[cfg(test)]
	pub fn velocity(&self) -> (f64, f64) {
		(self.vx, self.vy)
	}

	#[cfg(test)]
	pub fn pin(&self) -> Option<(f64, f64)> {
		self.pin
	}
}

/// A link resolved to node indices.
#[derive(Clone, Copy, Debug)]
pub struct SimLink {
	pub source: usize,
	pub target: usize,
	pub weight: f64,
	strength: f64,
	bias: f64,
}

/// Linear congruential generator used for the sub-pixel jiggle that
/// separates coincident nodes. Seeded identically per simulation.
#[derive(Clone, Debug)]
struct Lcg(u64);

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	fn next(&mut self) -> f64 {
		self.0 = (Self::A * self.0 + Self::C) % Self::M;
		self.0 as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next() - 0.5) * 1e-6
	}
}

/// Phyllotaxis spiral around `center`, used for nodes without a position.
fn spiral_position(index: usize, center: (f64, f64)) -> (f64, f64) {
	let radius = INITIAL_RADIUS * (0.5 + index as f64).sqrt();
	let angle = index as f64 * PI * (3.0 - 5f64.sqrt());
	(center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
}

fn canvas_center(width: f64, height: f64) -> (f64, f64) {
	let half = |v: f64| if v.is_finite() { v / 2.0 } else { 0.0 };
	(half(width), half(height))
}

pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	params: SimulationParameters,
	center: (f64, f64),
	alpha: f64,
	alpha_target: f64,
	running: bool,
	random: Lcg,
}

impl Simulation {
	pub fn new(
		data: &GraphData,
		width: f64,
		height: f64,
		params: SimulationParameters,
	) -> Result<Self, GraphError> {
		let center = canvas_center(width, height);
		let mut index = HashMap::with_capacity(data.nodes.len());
		let mut nodes = Vec::with_capacity(data.nodes.len());

		for (i, node) in data.nodes.iter().enumerate() {
			if index.insert(node.id.as_str(), i).is_some() {
				return Err(GraphError::DuplicateNode(node.id.clone()));
			}
			let seed = spiral_position(i, center);
			let (x, y) = match (node.x, node.y) {
				(Some(x), Some(y)) if x.is_finite() && y.is_finite() => (x, y),
				_ => seed,
			};
			nodes.push(SimNode {
				id: node.id.clone(),
				label: node.label.clone(),
				group: node.group,
				x,
				y,
				vx: 0.0,
				vy: 0.0,
				pin: None,
				seed,
			});
		}

		let mut degree = vec![0usize; nodes.len()];
		let mut links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			let resolve = |id: &str| {
				index
					.get(id)
					.copied()
					.ok_or_else(|| GraphError::DanglingLink {
						from: link.source.clone(),
						to: link.target.clone(),
						missing: id.to_string(),
					})
			};
			let source = resolve(&link.source)?;
			let target = resolve(&link.target)?;
			degree[source] += 1;
			degree[target] += 1;
			links.push(SimLink {
				source,
				target,
				weight: link.value,
				strength: 0.0,
				bias: 0.0,
			});
		}

		// Links between hubs are softer, and the lighter endpoint moves more.
		for link in &mut links {
			let (s, t) = (degree[link.source] as f64, degree[link.target] as f64);
			link.strength = 1.0 / s.min(t);
			link.bias = s / (s + t);
		}

		debug!(
			"simulation built with {} nodes and {} links",
			nodes.len(),
			links.len()
		);

		Ok(Self {
			nodes,
			links,
			params,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
			running: true,
			random: Lcg(1),
		})
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, idx: usize) -> Option<&SimNode> {
		self.nodes.get(idx)
	}

	pub fn links(&self) -> &[SimLink] {
		&self.links
	}

	#[cfg(test)]
	pub fn index_of(&self, id: &str) -> Option<usize> {
		self.nodes.iter().position(|node| node.id == id)
	}

	#[cfg(test)]
	pub fn params(&self) -> &SimulationParameters {
		&self.params
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	#[cfg(test)]
	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		if target.is_finite() {
			self.alpha_target = target.max(0.0);
		}
	}

	#[cfg(test)]
	pub fn is_running(&self) -> bool {
		self.running
	}

	/// Resume scheduling; alpha keeps its current value.
	pub fn stop(&mut self) {
		self.running = false;
	}

	pub fn restart(&mut self) {
		if !self.running {
			debug!("simulation restarted at alpha {:.4}", self.alpha);
		}
		self.running = true;
	}

	/// Hold a node at `(x, y)`. Rejects unknown nodes and non-finite positions.
	pub fn pin(&mut self, idx: usize, x: f64, y: f64) -> bool {
		if !(x.is_finite() && y.is_finite()) {
			return false;
		}
		match self.nodes.get_mut(idx) {
			Some(node) => {
				node.pin = Some((x, y));
				true
			}
			None => false,
		}
	}

	pub fn release(&mut self, idx: usize) {
		if let Some(node) = self.nodes.get_mut(idx) {
			node.pin = None;
		}
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.center = canvas_center(width, height);
	}

	/// Scheduled step: ticks while running and stops once alpha cools below
	/// the floor. Returns whether a tick happened.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.params.alpha_min {
			self.running = false;
			debug!("simulation converged");
		}
		true
	}

	/// Advance one tick regardless of the running flag.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;
		self.hold_pinned();
		self.apply_links();
		self.apply_charge();
		self.apply_center();
		self.integrate();
	}

	fn hold_pinned(&mut self) {
		for node in &mut self.nodes {
			if let Some((fx, fy)) = node.pin {
				node.x = fx;
				node.y = fy;
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}

	fn apply_links(&mut self) {
		let distance = self.params.link_distance;
		for k in 0..self.links.len() {
			let SimLink {
				source,
				target,
				strength,
				bias,
				..
			} = self.links[k];
			let (s, t) = (&self.nodes[source], &self.nodes[target]);
			let mut dx = t.x + t.vx - s.x - s.vx;
			let mut dy = t.y + t.vy - s.y - s.vy;
			if dx == 0.0 {
				dx = self.random.jiggle();
			}
			if dy == 0.0 {
				dy = self.random.jiggle();
			}
			let l = (dx * dx + dy * dy).sqrt();
			if l <= 0.0 {
				continue;
			}
			let l = (l - distance) / l * self.alpha * strength;
			dx *= l;
			dy *= l;
			self.nodes[target].vx -= dx * bias;
			self.nodes[target].vy -= dy * bias;
			self.nodes[source].vx += dx * (1.0 - bias);
			self.nodes[source].vy += dy * (1.0 - bias);
		}
	}

	fn apply_charge(&mut self) {
		let strength = self.params.charge_strength * self.alpha;
		let min_distance2 = self.params.min_distance * self.params.min_distance;
		for i in 0..self.nodes.len() {
			let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for j in 0..self.nodes.len() {
				if i == j {
					continue;
				}
				let mut dx = self.nodes[j].x - xi;
				let mut dy = self.nodes[j].y - yi;
				if dx == 0.0 {
					dx = self.random.jiggle();
				}
				if dy == 0.0 {
					dy = self.random.jiggle();
				}
				let mut l = dx * dx + dy * dy;
				if l < min_distance2 {
					l = (min_distance2 * l).sqrt();
				}
				if l <= 0.0 {
					continue;
				}
				dvx += dx * strength / l;
				dvy += dy * strength / l;
			}
			self.nodes[i].vx += dvx;
			self.nodes[i].vy += dvy;
		}
	}

	fn apply_center(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		let n = self.nodes.len() as f64;
		let (sx, sy) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let sx = (sx / n - self.center.0) * self.params.center_strength;
		let sy = (sy / n - self.center.1) * self.params.center_strength;
		if !(sx.is_finite() && sy.is_finite()) {
			return;
		}
		for node in &mut self.nodes {
			node.x -= sx;
			node.y -= sy;
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.params.velocity_decay;
		for node in &mut self.nodes {
			match node.pin {
				Some((fx, fy)) => {
					node.x = fx;
					node.y = fy;
					node.vx = 0.0;
					node.vy = 0.0;
				}
				None => {
					node.vx *= keep;
					node.vy *= keep;
					node.x += node.vx;
					node.y += node.vy;
				}
			}
			if !(node.x.is_finite() && node.y.is_finite() && node.vx.is_finite() && node.vy.is_finite())
			{
				warn!("node {} diverged, resetting to its seed position", node.id);
				(node.x, node.y) = node.seed;
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::types::{GraphLink, GraphNode};
	use crate::pages::home::sample_data;

	fn sample() -> Simulation {
		Simulation::new(&sample_data(), 800.0, 400.0, SimulationParameters::default()).unwrap()
	}

	fn positions(sim: &Simulation) -> Vec<(f64, f64)> {
		sim.nodes().iter().map(|n| (n.x(), n.y())).collect()
	}

	fn centroid(sim: &Simulation, ids: &[&str]) -> (f64, f64) {
		let (sx, sy) = ids.iter().fold((0.0, 0.0), |(sx, sy), id| {
			let node = sim.node(sim.index_of(id).unwrap()).unwrap();
			(sx + node.x(), sy + node.y())
		});
		(sx / ids.len() as f64, sy / ids.len() as f64)
	}

	fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
		((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
	}

	#[test]
	fn dangling_link_fails_construction() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a", 1, "A")],
			links: vec![GraphLink::new("a", "ghost", 1.0)],
		};
		let err = Simulation::new(&data, 800.0, 400.0, SimulationParameters::default())
			.err()
			.unwrap();
		match err {
			GraphError::DanglingLink { missing, .. } => assert_eq!(missing, "ghost"),
			other => panic!("unexpected error: {other}"),
		}
	}

	#[test]
	fn duplicate_node_fails_construction() {
		let data = GraphData {
			nodes: vec![GraphNode::new("a", 1, "A"), GraphNode::new("a", 2, "A again")],
			links: vec![],
		};
		assert!(matches!(
			Simulation::new(&data, 800.0, 400.0, SimulationParameters::default()),
			Err(GraphError::DuplicateNode(id)) if id == "a"
		));
	}

	#[test]
	fn link_strength_and_bias_follow_degree() {
		let sim = sample();
		let root = sim.index_of("Graphs").unwrap();
		let hub = sim.index_of("Wikidata").unwrap();
		let link = sim
			.links()
			.iter()
			.find(|l| l.source == root && l.target == hub)
			.unwrap();
		// root has degree 2, the hub degree 4
		assert!((link.strength - 0.5).abs() < 1e-12);
		assert!((link.bias - 2.0 / 6.0).abs() < 1e-12);
	}

	#[test]
	fn unpositioned_nodes_are_seeded_on_a_spiral() {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a", 0, "A"),
				GraphNode::new("b", 0, "B").at(5.0, 6.0),
			],
			links: vec![],
		};
		let sim = Simulation::new(&data, 200.0, 100.0, SimulationParameters::default()).unwrap();
		let a = sim.node(0).unwrap();
		assert!((a.x() - (100.0 + 10.0 * 0.5f64.sqrt())).abs() < 1e-9);
		assert!((a.y() - 50.0).abs() < 1e-9);
		assert_eq!((sim.node(1).unwrap().x(), sim.node(1).unwrap().y()), (5.0, 6.0));
	}

	#[test]
	fn alpha_cools_monotonically_and_stops() {
		let mut sim = sample();
		let mut previous = sim.alpha();
		let mut ticks = 0;
		while sim.step() {
			ticks += 1;
			assert!(sim.alpha() < previous);
			previous = sim.alpha();
			assert!(ticks <= 400, "simulation never converged");
		}
		assert!((290..=301).contains(&ticks), "converged after {ticks} ticks");
		assert!(!sim.is_running());
		assert!(sim.alpha() < sim.params().alpha_min);

		let before = positions(&sim);
		sim.tick();
		let after = positions(&sim);
		for (a, b) in before.iter().zip(&after) {
			assert!(distance(*a, *b) < 0.05);
		}
	}

	#[test]
	fn restart_with_target_reheats() {
		let mut sim = sample();
		while sim.step() {}
		let cold = sim.alpha();
		sim.set_alpha_target(0.3);
		sim.restart();
		for _ in 0..20 {
			assert!(sim.step());
		}
		assert!(sim.alpha() > cold);
		assert!(sim.alpha() < 0.3);
	}

	#[test]
	fn star_clusters_separate() {
		let mut sim = sample();
		for _ in 0..300 {
			sim.tick();
		}
		let left = ["Wikidata", "RDF", "SPARQL", "Collaborative"];
		let right = ["Spanner", "Property", "GQL", "Distributed"];
		let (cl, cr) = (centroid(&sim, &left), centroid(&sim, &right));
		assert!(distance(cl, cr) > 150.0, "centroids {cl:?} {cr:?}");

		for (cluster, center) in [(&left, cl), (&right, cr)] {
			for id in cluster.iter() {
				let node = sim.node(sim.index_of(id).unwrap()).unwrap();
				assert!(distance((node.x(), node.y()), center) < 150.0, "{id} strayed");
			}
		}
	}

	#[test]
	fn pinned_node_holds_exactly() {
		let mut sim = sample();
		let idx = sim.index_of("Spanner").unwrap();
		assert!(sim.pin(idx, 123.25, -42.5));
		for _ in 0..50 {
			sim.tick();
			let node = sim.node(idx).unwrap();
			assert_eq!((node.x(), node.y()), (123.25, -42.5));
			assert_eq!(node.pin(), Some((123.25, -42.5)));
		}
		sim.release(idx);
		sim.tick();
		assert_eq!(sim.node(idx).unwrap().pin(), None);
	}

	#[test]
	fn pin_rejects_non_finite_and_unknown() {
		let mut sim = sample();
		assert!(!sim.pin(0, f64::NAN, 1.0));
		assert!(!sim.pin(99, 1.0, 1.0));
		assert_eq!(sim.node(0).unwrap().pin(), None);
	}

	#[test]
	fn identical_inputs_tick_identically() {
		let mut a = sample();
		let mut b = sample();
		for _ in 0..120 {
			a.tick();
			b.tick();
			assert_eq!(positions(&a), positions(&b));
		}
	}

	#[test]
	fn coincident_and_isolated_nodes_stay_finite() {
		let data = GraphData {
			nodes: (0..6)
				.map(|i| GraphNode::new(i.to_string(), 0, format!("n{i}")).at(10.0, 10.0))
				.chain(std::iter::once(GraphNode::new("alone", 3, "Alone")))
				.collect(),
			links: vec![GraphLink::new("0", "1", 1.0), GraphLink::new("2", "2", 1.0)],
		};
		let mut sim = Simulation::new(&data, 800.0, 400.0, SimulationParameters::default()).unwrap();
		for _ in 0..200 {
			sim.tick();
			assert!(sim.nodes().iter().all(|n| n.x().is_finite() && n.y().is_finite()));
		}
		let spread = distance(
			(sim.node(0).unwrap().x(), sim.node(0).unwrap().y()),
			(sim.node(3).unwrap().x(), sim.node(3).unwrap().y()),
		);
		assert!(spread > 1.0);
	}

	#[test]
	fn single_node_settles_on_center() {
		let data = GraphData {
			nodes: vec![GraphNode::new("solo", 0, "Solo")],
			links: vec![],
		};
		let mut sim = Simulation::new(&data, 640.0, 480.0, SimulationParameters::default()).unwrap();
		sim.tick();
		let node = sim.node(0).unwrap();
		assert!((node.x() - 320.0).abs() < 1e-9);
		assert!((node.y() - 240.0).abs() < 1e-9);
	}

	#[test]
	fn divergence_resets_instead_of_poisoning() {
		let params = SimulationParameters {
			velocity_decay: -1e200,
			..SimulationParameters::default()
		};
		let mut sim = Simulation::new(&sample_data(), 800.0, 400.0, params).unwrap();
		for _ in 0..40 {
			sim.tick();
			for node in sim.nodes() {
				assert!(node.x().is_finite() && node.y().is_finite());
				let (vx, vy) = node.velocity();
				assert!(vx.is_finite() && vy.is_finite());
			}
		}
	}

	#[test]
	fn resize_moves_the_centering_target() {
		let mut sim = sample();
		sim.resize(1600.0, 800.0);
		for _ in 0..300 {
			sim.tick();
		}
		let n = sim.nodes().len() as f64;
		let cx = sim.nodes().iter().map(|n| n.x()).sum::<f64>() / n;
		let cy = sim.nodes().iter().map(|n| n.y()).sum::<f64>() / n;
		assert!((cx - 800.0).abs() < 1.0);
		assert!((cy - 400.0).abs() < 1.0);
	}
}
