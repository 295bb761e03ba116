//! Tunables for particle fields and the page-level registry.
//!
//! Every value has a literal default so behavior is reproducible without any
//! configuration. A page may override them with a JSON document in a
//! `<script id="particle-config" type="application/json">` element, and a
//! single container may override its field with a `data-particle-field`
//! attribute.

use serde::Deserialize;

use super::theme::FieldStyle;

/// Upper bound on any resolved particle count. The connection pass is
/// quadratic, so a density divisor near zero must not turn into millions of
/// particles.
pub const MAX_PARTICLES: usize = 500;

/// How many particles a field holds for a given size.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleCount {
	/// Same count regardless of size.
	Fixed(usize),
	/// `floor(width * height / divisor)`, recomputed on every reseed.
	Density { divisor: f64 },
}

impl ParticleCount {
	/// Resolve the count for a `width` x `height` area.
	///
	/// Empty or non-finite areas always resolve to zero particles, and no
	/// count exceeds [`MAX_PARTICLES`].
	pub fn resolve(self, width: f64, height: f64) -> usize {
		let degenerate = !(width.is_finite() && height.is_finite()) || width <= 0.0 || height <= 0.0;
		if degenerate {
			return 0;
		}
		let count = match self {
			ParticleCount::Fixed(n) => n,
			ParticleCount::Density { divisor } if divisor > 0.0 => {
				(width * height / divisor).floor() as usize
			}
			ParticleCount::Density { .. } => 0,
		};
		count.min(MAX_PARTICLES)
	}
}

/// What happens when a particle reaches the edge of the field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
	/// Clamp to the edge and invert that axis's velocity.
	#[default]
	Bounce,
	/// Re-enter from the opposite edge.
	Wrap,
}

/// First partner index for the pairwise connection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStart {
	/// `j = i`: each particle also "connects" to itself with a zero-length,
	/// fully opaque segment.
	SelfInclusive,
	/// `j = i + 1`.
	#[default]
	SelfExclusive,
}

/// How the pointer interacts with nearby particles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerMode {
	/// Push particles away from the pointer.
	#[default]
	Repel,
	/// Leave velocities alone and draw fading lines from the pointer instead.
	Tether,
}

/// Physical and visual tunables of one field.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	pub count: ParticleCount,
	/// Pairs closer than this are joined by a fading line.
	pub connection_distance: f64,
	/// Particles closer than this to the pointer feel its force.
	pub pointer_influence_distance: f64,
	/// Multiplier of the pointer impulse.
	pub pointer_strength: f64,
	/// Initial velocity per axis is drawn from `[-max_speed, max_speed]`.
	pub max_speed: f64,
	pub radius_min: f64,
	pub radius_max: f64,
	pub boundary: BoundaryPolicy,
	pub connection_start: ConnectionStart,
	pub pointer_mode: PointerMode,
	pub style: FieldStyle,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			count: ParticleCount::Fixed(40),
			connection_distance: 150.0,
			pointer_influence_distance: 200.0,
			pointer_strength: 1.0,
			max_speed: 0.25,
			radius_min: 1.0,
			radius_max: 3.0,
			boundary: BoundaryPolicy::default(),
			connection_start: ConnectionStart::default(),
			pointer_mode: PointerMode::default(),
			style: FieldStyle::default(),
		}
	}
}

impl FieldConfig {
	/// Radius range ordered low to high.
	pub fn radius_range(&self) -> (f64, f64) {
		let (a, b) = (self.radius_min.max(0.0), self.radius_max.max(0.0));
		(a.min(b), a.max(b))
	}
}

/// Page-level configuration: which containers qualify and how their fields look.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct BackgroundConfig {
	/// CSS selector of qualifying containers.
	pub selector: String,
	/// Class given to the inserted canvas; also the double-mount marker.
	pub canvas_class: String,
	/// Field settings for containers without their own override.
	pub field: FieldConfig,
}

impl Default for BackgroundConfig {
	fn default() -> Self {
		Self {
			selector: ".hero-internal, .vision-mission-section".into(),
			canvas_class: "interactive-canvas".into(),
			field: FieldConfig::default(),
		}
	}
}

impl BackgroundConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}
}
