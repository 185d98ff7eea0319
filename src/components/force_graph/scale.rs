//! Visual encodings shared by the renderer: group colours and link widths.

const PALETTE: &[(u32, &str)] = &[(1, "#3b82f6"), (2, "#10b981")];

/// Colour for groups outside the palette, including the root group 0.
pub const FALLBACK_COLOR: &str = "#f59e0b";

pub fn group_color(group: u32) -> &'static str {
	PALETTE
		.iter()
		.find(|(g, _)| *g == group)
		.map(|(_, color)| *color)
		.unwrap_or(FALLBACK_COLOR)
}

/// Square-root stroke width so heavy links stand out without dominating.
pub fn link_width(weight: f64) -> f64 {
	if weight.is_finite() && weight > 0.0 {
		weight.sqrt() * 2.0
	} else {
		0.0
	}
}
