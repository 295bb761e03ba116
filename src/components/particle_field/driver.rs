//! Per-field animation loop on an injectable frame clock.
//!
//! [`AnimationDriver`] repeatedly asks a [`FrameClock`] for the next frame and
//! runs its frame callback there. In the browser the clock is
//! [`RafClock`] (`requestAnimationFrame`); tests use [`ManualClock`] and
//! advance frames by hand.

use std::cell::{Cell, RefCell};
use std::ops::ControlFlow;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::Window;

/// Something that can run a callback on the next display frame.
pub trait FrameClock {
	/// Identifies a scheduled callback for cancellation.
	type Handle: Copy;

	/// Schedule `callback` for the next frame. `None` means the host cannot
	/// schedule frames at all.
	fn request(&self, callback: Box<dyn FnOnce()>) -> Option<Self::Handle>;

	/// Drop a scheduled callback that has not run yet.
	fn cancel(&self, handle: Self::Handle);
}

/// `requestAnimationFrame` on the browser window.
#[derive(Clone)]
pub struct RafClock {
	window: Window,
}

impl RafClock {
	/// `None` outside a browser window.
	pub fn new() -> Option<Self> {
		web_sys::window().map(|window| Self { window })
	}

	pub fn window(&self) -> &Window {
		&self.window
	}
}

impl FrameClock for RafClock {
	type Handle = i32;

	fn request(&self, callback: Box<dyn FnOnce()>) -> Option<i32> {
		let callback = Closure::once_into_js(move || callback());
		self.window
			.request_animation_frame(callback.unchecked_ref::<js_sys::Function>())
			.ok()
	}

	fn cancel(&self, handle: i32) {
		let _ = self.window.cancel_animation_frame(handle);
	}
}

/// A clock that only advances when told to.
#[derive(Clone, Default)]
pub struct ManualClock {
	queue: Rc<RefCell<Vec<(u32, Box<dyn FnOnce()>)>>>,
	next_id: Rc<Cell<u32>>,
}

impl ManualClock {
	pub fn new() -> Self {
		Self::default()
	}

	/// Callbacks waiting for the next frame.
	pub fn pending(&self) -> usize {
		self.queue.borrow().len()
	}

	/// Run one frame: every callback queued before this call. Callbacks they
	/// schedule wait for the following frame. Returns how many ran.
	pub fn advance(&self) -> usize {
		let due = std::mem::take(&mut *self.queue.borrow_mut());
		let ran = due.len();
		for (_, callback) in due {
			callback();
		}
		ran
	}
}

impl FrameClock for ManualClock {
	type Handle = u32;

	fn request(&self, callback: Box<dyn FnOnce()>) -> Option<u32> {
		let id = self.next_id.get();
		self.next_id.set(id.wrapping_add(1));
		self.queue.borrow_mut().push((id, callback));
		Some(id)
	}

	fn cancel(&self, handle: u32) {
		self.queue.borrow_mut().retain(|(id, _)| *id != handle);
	}
}

/// Whether the driver has a frame loop going.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
	Stopped,
	Running,
}

/// Read-only view of a driver's state, for event handlers that must go
/// quiet once the loop has stopped.
#[derive(Clone, Debug)]
pub struct DriverWatch(Rc<Cell<DriverState>>);

impl DriverWatch {
	pub fn is_running(&self) -> bool {
		self.0.get() == DriverState::Running
	}
}

type FrameFn = Box<dyn FnMut() -> ControlFlow<()>>;

struct DriverInner<C: FrameClock> {
	clock: C,
	state: Rc<Cell<DriverState>>,
	pending: Cell<Option<C::Handle>>,
	frame: RefCell<FrameFn>,
}

/// Runs a frame callback once per clock frame until stopped.
///
/// The callback returns [`ControlFlow::Break`] to end the loop from inside,
/// e.g. when its canvas has been detached. Dropping the driver stops it.
pub struct AnimationDriver<C: FrameClock + 'static> {
	inner: Rc<DriverInner<C>>,
}

impl<C: FrameClock + 'static> AnimationDriver<C> {
	pub fn new(clock: C, frame: impl FnMut() -> ControlFlow<()> + 'static) -> Self {
		Self {
			inner: Rc::new(DriverInner {
				clock,
				state: Rc::new(Cell::new(DriverState::Stopped)),
				pending: Cell::new(None),
				frame: RefCell::new(Box::new(frame)),
			}),
		}
	}

	pub fn state(&self) -> DriverState {
		self.inner.state.get()
	}

	pub fn is_running(&self) -> bool {
		self.state() == DriverState::Running
	}

	pub fn watch(&self) -> DriverWatch {
		DriverWatch(self.inner.state.clone())
	}

	/// Begin the loop. Returns `false` if the clock refused to schedule, in
	/// which case the driver stays stopped.
	pub fn start(&self) -> bool {
		if self.is_running() {
			return true;
		}
		self.inner.state.set(DriverState::Running);
		DriverInner::schedule(&self.inner)
	}

	/// Cancel the pending frame and stop. Safe to call repeatedly and from
	/// inside the frame callback.
	pub fn stop(&self) {
		self.inner.state.set(DriverState::Stopped);
		if let Some(handle) = self.inner.pending.take() {
			self.inner.clock.cancel(handle);
		}
	}
}

impl<C: FrameClock + 'static> Drop for AnimationDriver<C> {
	fn drop(&mut self) {
		self.stop();
	}
}

impl<C: FrameClock + 'static> DriverInner<C> {
	fn schedule(inner: &Rc<Self>) -> bool {
		let weak: Weak<Self> = Rc::downgrade(inner);
		let callback = Box::new(move || {
			if let Some(inner) = weak.upgrade() {
				Self::tick(&inner);
			}
		});
		match inner.clock.request(callback) {
			Some(handle) => {
				inner.pending.set(Some(handle));
				true
			}
			None => {
				log::debug!("particle-field: frame clock unavailable, loop not started");
				inner.state.set(DriverState::Stopped);
				false
			}
		}
	}

	fn tick(inner: &Rc<Self>) {
		inner.pending.set(None);
		if inner.state.get() != DriverState::Running {
			return;
		}
		let flow = {
			let mut frame = inner.frame.borrow_mut();
			(*frame)()
		};
		if flow.is_break() {
			inner.state.set(DriverState::Stopped);
			return;
		}
		// the frame may have stopped us, or stopped and restarted us
		if inner.state.get() == DriverState::Running && inner.pending.get().is_none() {
			Self::schedule(inner);
		}
	}
}
