//! Pointer position tracking in canvas-local coordinates.

/// Latest pointer sample over one container, or `None` while the pointer is
/// outside it (or has not moved yet).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerTracker {
	position: Option<(f64, f64)>,
}

impl PointerTracker {
	pub fn new() -> Self {
		Self::default()
	}

	/// Convert client coordinates to coordinates relative to `origin`, the
	/// on-screen top-left corner of the canvas.
	pub fn to_local(client: (f64, f64), origin: (f64, f64)) -> (f64, f64) {
		(client.0 - origin.0, client.1 - origin.1)
	}

	/// Record a pointer move, replacing any previous sample.
	pub fn on_move(&mut self, client: (f64, f64), origin: (f64, f64)) {
		self.position = Some(Self::to_local(client, origin));
	}

	/// The pointer left the container.
	pub fn on_leave(&mut self) {
		self.position = None;
	}

	pub fn position(&self) -> Option<(f64, f64)> {
		self.position
	}
}
