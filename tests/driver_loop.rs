// A field driven frame by frame through the manual clock.

#![allow(unused_crate_dependencies)]

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::Rc;

use particle_backdrop::{AnimationDriver, Color, DriverState, FieldConfig, ManualClock, ParticleField, Surface};

#[derive(Default)]
struct Frames {
	clears: Cell<usize>,
	circles: Cell<usize>,
}

impl Surface for Frames {
	fn clear(&self, _: f64, _: f64) {
		self.clears.set(self.clears.get() + 1);
	}
	fn fill_circle(&self, _: f64, _: f64, _: f64, _: Color) {
		self.circles.set(self.circles.get() + 1);
	}
	fn stroke_line(&self, _: (f64, f64), _: (f64, f64), _: f64, _: Color) {}
}

fn driven(clock: &ManualClock) -> (AnimationDriver<ManualClock>, Rc<RefCell<ParticleField>>, Rc<Frames>) {
	let field = Rc::new(RefCell::new(ParticleField::with_seed(FieldConfig::default(), 11)));
	field.borrow_mut().reseed(300.0, 200.0);
	let surface = Rc::new(Frames::default());
	let (frame_field, frame_surface) = (field.clone(), surface.clone());
	let driver = AnimationDriver::new(clock.clone(), move || {
		let mut f = frame_field.borrow_mut();
		f.step();
		f.render(&*frame_surface);
		ControlFlow::Continue(())
	});
	(driver, field, surface)
}

#[test]
fn each_frame_steps_then_renders() {
	let clock = ManualClock::new();
	let (driver, field, surface) = driven(&clock);
	let before = field.borrow().particles().to_vec();

	assert!(driver.start());
	clock.advance();
	assert_eq!(surface.clears.get(), 1);
	assert_eq!(surface.circles.get(), 40);
	assert_ne!(field.borrow().particles(), &before[..]);

	clock.advance();
	clock.advance();
	assert_eq!(surface.clears.get(), 3);
}

#[test]
fn stopped_driver_no_longer_touches_the_field() {
	let clock = ManualClock::new();
	let (driver, field, surface) = driven(&clock);
	driver.start();
	clock.advance();
	driver.stop();
	driver.stop();
	assert_eq!(driver.state(), DriverState::Stopped);

	let frozen = field.borrow().particles().to_vec();
	for _ in 0..10 {
		clock.advance();
	}
	assert_eq!(field.borrow().particles(), &frozen[..]);
	assert_eq!(surface.clears.get(), 1);
}

#[test]
fn independent_fields_on_one_clock() {
	let clock = ManualClock::new();
	let (a, _, surface_a) = driven(&clock);
	let (b, _, surface_b) = driven(&clock);
	a.start();
	b.start();
	clock.advance();
	a.stop();
	clock.advance();
	clock.advance();
	assert_eq!(surface_a.clears.get(), 1);
	assert_eq!(surface_b.clears.get(), 3);
	assert!(b.is_running());
}

#[test]
fn resize_reseed_between_frames() {
	let clock = ManualClock::new();
	let (driver, field, surface) = driven(&clock);
	driver.start();
	clock.advance();
	field.borrow_mut().reseed(0.0, 0.0);
	clock.advance();
	assert_eq!(surface.clears.get(), 2);
	assert_eq!(surface.circles.get(), 40);
	assert!(driver.is_running());
}
