//! Colors used to paint particles and connection lines.

use serde::Deserialize;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	#[serde(default = "opaque")]
	pub a: f64,
}

fn opaque() -> f64 {
	1.0
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Scale the existing alpha by `factor`, clamped to `[0, 1]`.
	pub fn fade(self, factor: f64) -> Self {
		Self {
			a: (self.a * factor).clamp(0.0, 1.0),
			..self
		}
	}

	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Visual style of one field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldStyle {
	/// Fill color of every particle dot.
	pub particle: Color,
	/// Base color of connection lines; alpha is replaced by the fade factor.
	pub line: Color,
	/// Stroke width of connection and pointer lines.
	pub line_width: f64,
}

/// Gold accent of the site's hero sections.
pub const ACCENT: Color = Color::rgb(199, 168, 109);

impl Default for FieldStyle {
	fn default() -> Self {
		Self {
			particle: ACCENT.with_alpha(0.4),
			line: ACCENT,
			line_width: 1.0,
		}
	}
}
