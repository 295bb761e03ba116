//! Reasons a container is left without a particle field.
//!
//! None of these ever reach the user: the registry logs them and moves on to
//! the next container.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a container was skipped.
#[derive(Debug, Error)]
pub enum MountError {
	/// The container already carries a particle canvas.
	#[error("container already has a particle canvas")]
	AlreadyMounted,

	/// The browser could not provide a 2D context.
	#[error("2d drawing context unavailable")]
	NoDrawingContext,

	/// No animation frame scheduling on this host.
	#[error("frame clock unavailable")]
	NoFrameClock,

	/// The selector matched something other than an HTML element.
	#[error("matched node is not an HTML element")]
	NotAnElement,

	/// A DOM call threw.
	#[error("DOM call failed: {0}")]
	Dom(String),
}

impl From<JsValue> for MountError {
	fn from(value: JsValue) -> Self {
		MountError::Dom(format!("{:?}", value))
	}
}
