//! Keeps a field's canvas and bounds in sync with its container's size.

use web_sys::{HtmlCanvasElement, HtmlElement};

use super::field::ParticleField;

/// Canvas backing size for a container measured at `width` x `height` CSS pixels.
pub fn backing_size(width: f64, height: f64) -> (u32, u32) {
	let px = |v: f64| if v.is_finite() && v > 0.0 { v as u32 } else { 0 };
	(px(width), px(height))
}

/// Binds one container to the canvas drawn inside it.
#[derive(Clone)]
pub struct ViewportBinding {
	container: HtmlElement,
	canvas: HtmlCanvasElement,
}

impl ViewportBinding {
	pub fn new(container: HtmlElement, canvas: HtmlCanvasElement) -> Self {
		Self { container, canvas }
	}

	/// The container's layout size in CSS pixels.
	pub fn measure(&self) -> (f64, f64) {
		(
			self.container.offset_width() as f64,
			self.container.offset_height() as f64,
		)
	}

	/// Re-measure, resize the canvas and reseed `field`. Runs on mount and on
	/// every window resize.
	pub fn refresh(&self, field: &mut ParticleField) {
		let (w, h) = self.measure();
		let (cw, ch) = backing_size(w, h);
		self.canvas.set_width(cw);
		self.canvas.set_height(ch);
		field.reseed(cw as f64, ch as f64);
		log::debug!(
			"particle-field: reseeded {}x{} with {} particles",
			cw,
			ch,
			field.particles().len()
		);
	}
}
