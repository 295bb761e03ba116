//! Particle field state: the particle set, its bounds and the pointer.
//!
//! One field is bound to one container. It is created empty, filled by
//! [`ParticleField::reseed`] whenever the container is measured, then mutated
//! every frame by [`ParticleField::step`] and painted by [`ParticleField::render`].
//! Within a frame every particle moves before anything is drawn, so lines
//! always connect post-step positions.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::config::{ConnectionStart, FieldConfig, PointerMode};
use super::particles::Particle;
use super::render::{Surface, fade_alpha};

/// A line between two particles, identified by index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
	pub from: usize,
	pub to: usize,
	/// Line opacity in `(0, 1]`.
	pub alpha: f64,
}

/// One independent particle simulation.
pub struct ParticleField {
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	pointer: Option<(f64, f64)>,
	config: FieldConfig,
	rng: StdRng,
}

impl ParticleField {
	/// An empty, zero-sized field seeded from OS entropy.
	pub fn new(config: FieldConfig) -> Self {
		Self::with_rng(config, StdRng::from_entropy())
	}

	/// An empty field with a reproducible random sequence.
	pub fn with_seed(config: FieldConfig, seed: u64) -> Self {
		Self::with_rng(config, StdRng::seed_from_u64(seed))
	}

	fn with_rng(config: FieldConfig, rng: StdRng) -> Self {
		Self {
			particles: Vec::new(),
			width: 0.0,
			height: 0.0,
			pointer: None,
			config,
			rng,
		}
	}

	/// A field holding exactly `particles`, for scripted layouts.
	pub fn from_particles(config: FieldConfig, width: f64, height: f64, particles: Vec<Particle>) -> Self {
		Self {
			particles,
			width,
			height,
			..Self::with_seed(config, 0)
		}
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	pub fn dimensions(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn pointer(&self) -> Option<(f64, f64)> {
		self.pointer
	}

	/// Particle count [`reseed`](Self::reseed) would produce for this size.
	pub fn particle_count_for(&self, width: f64, height: f64) -> usize {
		self.config.count.resolve(width, height)
	}

	/// Replace the bounds and the whole particle set with fresh random particles.
	pub fn reseed(&mut self, width: f64, height: f64) {
		let count = self.particle_count_for(width, height);
		self.width = width.max(0.0);
		self.height = height.max(0.0);
		let (w, h, config) = (self.width, self.height, &self.config);
		let rng = &mut self.rng;
		self.particles = (0..count).map(|_| Particle::random(rng, w, h, config)).collect();
	}

	/// Advance every particle by one frame.
	pub fn step(&mut self) {
		let bounds = (self.width, self.height);
		for p in &mut self.particles {
			p.step(bounds, self.pointer, &self.config);
		}
	}

	/// Last-write-wins pointer position in canvas coordinates.
	pub fn set_pointer(&mut self, position: Option<(f64, f64)>) {
		self.pointer = position;
	}

	pub fn clear_pointer(&mut self) {
		self.pointer = None;
	}

	fn first_partner(&self, i: usize) -> usize {
		match self.config.connection_start {
			ConnectionStart::SelfInclusive => i,
			ConnectionStart::SelfExclusive => i + 1,
		}
	}

	fn connections_from(&self, i: usize) -> impl Iterator<Item = Connection> + '_ {
		let a = &self.particles[i];
		let threshold = self.config.connection_distance;
		(self.first_partner(i)..self.particles.len()).filter_map(move |j| {
			let b = &self.particles[j];
			fade_alpha(a.distance_to(b.x, b.y), threshold).map(|alpha| Connection { from: i, to: j, alpha })
		})
	}

	/// Every line the next [`render`](Self::render) will draw between particles.
	pub fn connections(&self) -> Vec<Connection> {
		(0..self.particles.len()).flat_map(|i| self.connections_from(i)).collect()
	}

	/// Paint one frame: clear, then each particle followed by its outgoing lines.
	pub fn render<S: Surface + ?Sized>(&self, surface: &S) {
		let style = &self.config.style;
		surface.clear(self.width, self.height);

		for (i, p) in self.particles.iter().enumerate() {
			p.draw(surface, style.particle);
			for c in self.connections_from(i) {
				let q = &self.particles[c.to];
				surface.stroke_line((p.x, p.y), (q.x, q.y), style.line_width, style.line.with_alpha(c.alpha));
			}
		}

		if self.config.pointer_mode == PointerMode::Tether {
			self.render_tethers(surface);
		}
	}

	fn render_tethers<S: Surface + ?Sized>(&self, surface: &S) {
		let Some((px, py)) = self.pointer else {
			return;
		};
		let style = &self.config.style;
		for p in &self.particles {
			if let Some(alpha) = fade_alpha(p.distance_to(px, py), self.config.pointer_influence_distance) {
				surface.stroke_line((px, py), (p.x, p.y), style.line_width, style.line.with_alpha(alpha));
			}
		}
	}
}
