//! A single drifting point of a particle field.

use rand::Rng;

use super::config::{BoundaryPolicy, FieldConfig, PointerMode};
use super::render::Surface;
use super::theme::Color;

/// A moving point with a fixed draw radius.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub radius: f64,
}

impl Particle {
	pub fn new(x: f64, y: f64, vx: f64, vy: f64, radius: f64) -> Self {
		Self { x, y, vx, vy, radius }
	}

	/// A particle placed uniformly inside `width` x `height`.
	///
	/// Callers only seed non-empty areas; see [`super::config::ParticleCount::resolve`].
	pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64, config: &FieldConfig) -> Self {
		let speed = config.max_speed.abs();
		let (radius_min, radius_max) = config.radius_range();
		Self {
			x: rng.gen_range(0.0..=width),
			y: rng.gen_range(0.0..=height),
			vx: rng.gen_range(-speed..=speed),
			vy: rng.gen_range(-speed..=speed),
			radius: rng.gen_range(radius_min..=radius_max),
		}
	}

	/// Advance one frame: move, apply the boundary policy, then the pointer force.
	pub fn step(&mut self, bounds: (f64, f64), pointer: Option<(f64, f64)>, config: &FieldConfig) {
		let (width, height) = bounds;
		self.x += self.vx;
		self.y += self.vy;

		match config.boundary {
			BoundaryPolicy::Bounce => {
				bounce(&mut self.x, &mut self.vx, width);
				bounce(&mut self.y, &mut self.vy, height);
			}
			BoundaryPolicy::Wrap => {
				wrap(&mut self.x, width);
				wrap(&mut self.y, height);
			}
		}

		if config.pointer_mode == PointerMode::Repel {
			if let Some((ux, uy)) = self.pointer_impulse(pointer, config) {
				self.vx += ux;
				self.vy += uy;
			}
		}
	}

	/// Velocity change the pointer would apply, if any.
	///
	/// The push points from the pointer to the particle and grows linearly as the
	/// distance shrinks. Coincident points get nothing.
	fn pointer_impulse(&self, pointer: Option<(f64, f64)>, config: &FieldConfig) -> Option<(f64, f64)> {
		let (px, py) = pointer?;
		let (dx, dy) = (self.x - px, self.y - py);
		let distance = (dx * dx + dy * dy).sqrt();
		let reach = config.pointer_influence_distance;
		if !(distance > 0.0 && distance < reach) {
			return None;
		}
		let force = (reach - distance) / reach * config.pointer_strength;
		Some((dx / distance * force, dy / distance * force))
	}

	/// Distance to another point.
	pub fn distance_to(&self, x: f64, y: f64) -> f64 {
		let (dx, dy) = (self.x - x, self.y - y);
		(dx * dx + dy * dy).sqrt()
	}

	pub fn draw<S: Surface + ?Sized>(&self, surface: &S, color: Color) {
		surface.fill_circle(self.x, self.y, self.radius, color);
	}
}

fn bounce(pos: &mut f64, vel: &mut f64, bound: f64) {
	if *pos < 0.0 {
		*pos = 0.0;
		*vel = -*vel;
	} else if *pos > bound {
		*pos = bound.max(0.0);
		*vel = -*vel;
	}
}

fn wrap(pos: &mut f64, bound: f64) {
	if bound > 0.0 {
		let wrapped = pos.rem_euclid(bound);
		// rem_euclid rounds tiny negatives up to `bound`
		*pos = if wrapped < bound { wrapped } else { 0.0 };
	} else {
		*pos = 0.0;
	}
}
