//! Pointer and wheel handling. A press on a node pins and drags it; a press
//! on empty canvas pans; the wheel zooms about the pointer. Only the view
//! transform and node pins are written here.

use log::debug;

use super::state::ForceGraphState;

/// Graph-to-screen mapping: `screen = graph * k + (x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	#[cfg(test)]
	pub fn apply(&self, gx: f64, gy: f64) -> (f64, f64) {
		(gx * self.k + self.x, gy * self.k + self.y)
	}

	pub fn invert(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Rescale to `k` keeping the graph point under `(ax, ay)` fixed.
	pub fn scale_about(&self, k: f64, ax: f64, ay: f64) -> Self {
		let (gx, gy) = self.invert(ax, ay);
		Self {
			x: ax - gx * k,
			y: ay - gy * k,
			k,
		}
	}

	pub fn translate(&self, dx: f64, dy: f64) -> Self {
		Self {
			x: self.x + dx,
			y: self.y + dy,
			k: self.k,
		}
	}
}

#[derive(Clone, Debug)]
pub struct InteractionParameters {
	pub min_scale: f64,
	pub max_scale: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for InteractionParameters {
	fn default() -> Self {
		Self {
			min_scale: 0.5,
			max_scale: 5.0,
			drag_alpha_target: 0.3,
		}
	}
}

/// Unit of `WheelEvent.deltaY`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WheelDeltaMode {
	Pixel,
	Line,
	Page,
}

impl WheelDeltaMode {
	pub fn from_dom(mode: u32) -> Self {
		match mode {
			1 => Self::Line,
			2 => Self::Page,
			_ => Self::Pixel,
		}
	}

	fn factor(self) -> f64 {
		match self {
			Self::Pixel => 0.002,
			Self::Line => 0.05,
			Self::Page => 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
	/// Pinned position minus the graph-space pointer at press time.
	pub offset_x: f64,
	pub offset_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

impl ForceGraphState {
	/// Press at canvas pixel `(x, y)`. Returns true when a node was grabbed.
	pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
		if self.is_disposed() {
			return false;
		}
		self.pointer_up();

		let Some(idx) = self.node_at_position(x, y) else {
			self.pan = PanState {
				active: true,
				start_x: x,
				start_y: y,
				transform_start_x: self.transform.x,
				transform_start_y: self.transform.y,
			};
			return false;
		};
		let Some(node) = self.simulation.node(idx) else {
			return false;
		};
		let (nx, ny) = (node.x(), node.y());
		debug!("drag start on {}", node.id());

		let (gx, gy) = self.screen_to_graph(x, y);
		self.simulation
			.set_alpha_target(self.interaction.drag_alpha_target);
		self.simulation.restart();
		self.simulation.pin(idx, nx, ny);
		self.drag = DragState {
			node_idx: Some(idx),
			offset_x: nx - gx,
			offset_y: ny - gy,
		};
		true
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.is_disposed() {
			return;
		}
		if let Some(idx) = self.drag.node_idx {
			let (gx, gy) = self.screen_to_graph(x, y);
			self.simulation
				.pin(idx, gx + self.drag.offset_x, gy + self.drag.offset_y);
		} else if self.pan.active {
			self.transform = ViewTransform {
				x: self.pan.transform_start_x,
				y: self.pan.transform_start_y,
				k: self.transform.k,
			}
			.translate(x - self.pan.start_x, y - self.pan.start_y);
			self.mark_dirty();
		}
	}

	/// Release or pointer leaving the canvas. Safe to call with no gesture.
	pub fn pointer_up(&mut self) {
		if let Some(idx) = self.drag.node_idx.take() {
			self.simulation.release(idx);
			self.simulation.set_alpha_target(0.0);
			debug!("drag end on node {idx}");
		}
		self.pan.active = false;
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64, mode: WheelDeltaMode, pinch: bool) {
		if !delta_y.is_finite() {
			return;
		}
		let speed = if pinch { 10.0 } else { 1.0 };
		self.zoom_by(2f64.powf(-delta_y * mode.factor() * speed), x, y);
	}

	/// Multiply the scale by `factor` about the canvas point `(x, y)`,
	/// clamped to the configured scale extent.
	pub fn zoom_by(&mut self, factor: f64, x: f64, y: f64) {
		if self.is_disposed() || !(factor.is_finite() && factor > 0.0) {
			return;
		}
		let k = (self.transform.k * factor)
			.clamp(self.interaction.min_scale, self.interaction.max_scale);
		if k == self.transform.k {
			return;
		}
		self.transform = self.transform.scale_about(k, x, y);
		self.mark_dirty();
	}

	#[cfg(test)]
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		if !(dx.is_finite() && dy.is_finite()) {
			return;
		}
		self.transform = self.transform.translate(dx, dy);
		self.mark_dirty();
	}

	#[cfg(test)]
	pub fn dragged_node(&self) -> Option<usize> {
		self.drag.node_idx
	}

	#[cfg(test)]
	pub fn is_panning(&self) -> bool {
		self.pan.active
	}
}
