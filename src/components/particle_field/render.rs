//! Canvas rendering for particle fields.
//!
//! Drawing goes through the [`Surface`] trait so a frame can be painted onto a
//! `CanvasRenderingContext2d` in the browser or onto a recorder in tests.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::theme::Color;

/// The handful of 2D drawing primitives a field needs.
pub trait Surface {
	/// Erase everything inside `width` x `height`.
	fn clear(&self, width: f64, height: f64);
	/// Fill a circle.
	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Color);
	/// Stroke a straight segment.
	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, color: Color);
}

impl Surface for CanvasRenderingContext2d {
	fn clear(&self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn fill_circle(&self, x: f64, y: f64, radius: f64, color: Color) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.set_fill_style_str(&color.to_css());
		self.fill();
	}

	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), width: f64, color: Color) {
		self.begin_path();
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.move_to(from.0, from.1);
		self.line_to(to.0, to.1);
		self.stroke();
	}
}

/// Opacity of a line spanning `distance`, fading linearly to nothing at `threshold`.
///
/// Returns `None` when no line should be drawn.
pub fn fade_alpha(distance: f64, threshold: f64) -> Option<f64> {
	(threshold > 0.0 && distance < threshold).then(|| 1.0 - distance / threshold)
}
