// Host-side scenarios for the particle field: seeding, bounds, pointer force
// and connection fading, drawn onto a recording surface.

#![allow(unused_crate_dependencies)]

use std::cell::RefCell;

use particle_backdrop::{Color, FieldConfig, Particle, ParticleCount, ParticleField, Surface, fade_alpha};

#[derive(Default)]
struct Lines(RefCell<Vec<((f64, f64), (f64, f64), f64)>>);

impl Surface for Lines {
	fn clear(&self, _: f64, _: f64) {
		self.0.borrow_mut().clear();
	}
	fn fill_circle(&self, _: f64, _: f64, _: f64, _: Color) {}
	fn stroke_line(&self, from: (f64, f64), to: (f64, f64), _: f64, color: Color) {
		self.0.borrow_mut().push((from, to, color.a));
	}
}

fn in_bounds(field: &ParticleField) -> bool {
	let (w, h) = field.dimensions();
	field
		.particles()
		.iter()
		.all(|p| (0.0..=w).contains(&p.x) && (0.0..=h).contains(&p.y))
}

#[test]
fn fixed_count_field_stays_in_bounds_for_1000_steps() {
	let mut field = ParticleField::with_seed(FieldConfig::default(), 42);
	field.reseed(300.0, 200.0);
	assert_eq!(field.particles().len(), 40);
	assert!(in_bounds(&field));

	for _ in 0..1000 {
		field.step();
		assert!(in_bounds(&field));
	}
	assert_eq!(field.particles().len(), 40);
}

#[test]
fn bounds_hold_under_constant_pointer_pressure() {
	let mut field = ParticleField::with_seed(FieldConfig::default(), 9);
	field.reseed(300.0, 200.0);
	field.set_pointer(Some((150.0, 100.0)));
	for _ in 0..500 {
		field.step();
		assert!(in_bounds(&field));
		assert!(field.particles().iter().all(|p| p.vx.is_finite() && p.vy.is_finite()));
	}
}

#[test]
fn reseed_count_matches_configuration_for_many_sizes() {
	let config = FieldConfig {
		count: ParticleCount::Density { divisor: 2500.0 },
		..FieldConfig::default()
	};
	let mut field = ParticleField::with_seed(config, 3);
	for (w, h) in [(300.0, 200.0), (1280.0, 640.0), (50.0, 50.0), (0.0, 400.0)] {
		field.reseed(w, h);
		assert_eq!(field.particles().len(), field.particle_count_for(w, h));
		assert_eq!(field.particles().len(), ((w * h) / 2500.0_f64).floor() as usize);
		assert!(in_bounds(&field));
	}
}

#[test]
fn pointer_on_top_of_particle_leaves_velocity_alone() {
	let mut field = ParticleField::from_particles(
		FieldConfig::default(),
		300.0,
		200.0,
		vec![Particle::new(10.0, 10.0, 0.0, 0.0, 2.0)],
	);
	field.set_pointer(Some((10.0, 10.0)));
	let before = field.particles()[0].clone();
	field.step();
	let after = &field.particles()[0];
	assert_eq!((after.vx, after.vy), (before.vx, before.vy));
}

#[test]
fn cleared_pointer_exerts_no_force() {
	let start = vec![Particle::new(100.0, 100.0, 0.1, -0.1, 2.0)];
	let mut pushed = ParticleField::from_particles(FieldConfig::default(), 300.0, 200.0, start.clone());
	pushed.set_pointer(Some((90.0, 100.0)));
	pushed.clear_pointer();
	pushed.step();
	assert_eq!((pushed.particles()[0].vx, pushed.particles()[0].vy), (0.1, -0.1));
}

#[test]
fn connection_fades_with_distance_and_disappears_past_threshold() {
	let mut field = ParticleField::from_particles(
		FieldConfig::default(),
		300.0,
		200.0,
		vec![Particle::new(0.0, 0.0, 0.0, 0.0, 1.0), Particle::new(100.0, 0.0, 0.0, 0.0, 1.0)],
	);
	let surface = Lines::default();
	field.render(&surface);
	{
		let lines = surface.0.borrow();
		assert_eq!(lines.len(), 1);
		let (from, to, alpha) = lines[0];
		assert_eq!((from, to), ((0.0, 0.0), (100.0, 0.0)));
		assert!((alpha - (1.0 - 100.0 / 150.0)).abs() < 1e-12);
		assert!((alpha - 0.333).abs() < 1e-3);
	}

	field = ParticleField::from_particles(
		FieldConfig::default(),
		300.0,
		200.0,
		vec![Particle::new(0.0, 0.0, 0.0, 0.0, 1.0), Particle::new(200.0, 0.0, 0.0, 0.0, 1.0)],
	);
	field.render(&surface);
	assert!(surface.0.borrow().is_empty());
	assert!(field.connections().is_empty());
}

#[test]
fn opacity_is_exactly_zero_at_the_threshold() {
	assert_eq!(fade_alpha(150.0, 150.0), None);
	let just_inside = fade_alpha(149.999_999, 150.0).unwrap();
	assert!(just_inside > 0.0 && just_inside < 1e-6);
}

#[test]
fn lines_reflect_post_step_positions() {
	let mut field = ParticleField::from_particles(
		FieldConfig::default(),
		300.0,
		200.0,
		vec![Particle::new(0.0, 0.0, 0.0, 0.0, 1.0), Particle::new(149.9, 0.0, 0.2, 0.0, 1.0)],
	);
	// before the step they are connected, after it they are not
	assert_eq!(field.connections().len(), 1);
	field.step();
	let surface = Lines::default();
	field.render(&surface);
	assert!(surface.0.borrow().is_empty());
}
