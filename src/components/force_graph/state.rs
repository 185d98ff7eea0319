use log::debug;

use super::error::GraphError;
use super::interaction::{DragState, InteractionParameters, PanState, ViewTransform};
use super::simulation::{Simulation, SimulationParameters};
use super::types::GraphData;

pub const NODE_RADIUS: f64 = 8.0;
/// Pointer pick radius in graph space, a little wider than the marker.
pub const HIT_RADIUS: f64 = 12.0;

/// Everything one mounted diagram owns: the simulation, the view transform
/// and in-flight gestures. Driven by [`ForceGraphState::frame`] and the
/// pointer methods in `interaction`.
pub struct ForceGraphState {
	pub simulation: Simulation,
	pub transform: ViewTransform,
	pub interaction: InteractionParameters,
	pub(super) drag: DragState,
	pub(super) pan: PanState,
	pub width: f64,
	pub height: f64,
	needs_redraw: bool,
	disposed: bool,
}

impl ForceGraphState {
	pub fn new(data: &GraphData, width: f64, height: f64) -> Result<Self, GraphError> {
		Self::with_parameters(
			data,
			width,
			height,
			SimulationParameters::default(),
			InteractionParameters::default(),
		)
	}

	pub fn with_parameters(
		data: &GraphData,
		width: f64,
		height: f64,
		params: SimulationParameters,
		interaction: InteractionParameters,
	) -> Result<Self, GraphError> {
		Ok(Self {
			simulation: Simulation::new(data, width, height, params)?,
			transform: ViewTransform::default(),
			interaction,
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			needs_redraw: true,
			disposed: false,
		})
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.transform.invert(sx, sy)
	}

	#[cfg(test)]
	pub fn graph_to_screen(&self, gx: f64, gy: f64) -> (f64, f64) {
		self.transform.apply(gx, gy)
	}

	/// Topmost node whose marker is within [`HIT_RADIUS`] of the pointer.
	pub fn node_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		// Later nodes are drawn on top, so search from the back.
		self.simulation
			.nodes()
			.iter()
			.rposition(|node| {
				let (dx, dy) = (node.x() - gx, node.y() - gy);
				(dx * dx + dy * dy).sqrt() < HIT_RADIUS
			})
	}

	/// One animation frame: steps the simulation while it is hot and reports
	/// whether the surface needs repainting.
	pub fn frame(&mut self) -> bool {
		if self.disposed {
			return false;
		}
		let ticked = self.simulation.step();
		std::mem::take(&mut self.needs_redraw) || ticked
	}

	pub(super) fn mark_dirty(&mut self) {
		self.needs_redraw = true;
	}

	/// Tear down on unmount: gestures end, the simulation stops for good and
	/// every later frame or event is a no-op.
	pub fn dispose(&mut self) {
		if self.disposed {
			return;
		}
		self.pointer_up();
		self.simulation.stop();
		self.disposed = true;
		self.needs_redraw = false;
		debug!("graph disposed at alpha {:.4}", self.simulation.alpha());
	}

	pub(super) fn is_disposed(&self) -> bool {
		self.disposed
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		if self.disposed {
			return;
		}
		self.width = width;
		self.height = height;
		self.simulation.resize(width, height);
		self.simulation.restart();
		self.mark_dirty();
	}
}
