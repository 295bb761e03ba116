//! Page-wide discovery and lifecycle of particle fields.
//!
//! [`FieldRegistry::mount_all`] finds every container matching the configured
//! selector and gives each one its own canvas, [`ParticleField`],
//! [`ViewportBinding`], pointer listeners and [`AnimationDriver`]. Fields share
//! nothing; a container that cannot be mounted is skipped without touching its
//! siblings.

use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

use log::{debug, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, Document, Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent};

use super::config::{BackgroundConfig, FieldConfig};
use super::driver::{AnimationDriver, DriverWatch, RafClock};
use super::error::MountError;
use super::field::ParticleField;
use super::pointer::PointerTracker;
use super::viewport::ViewportBinding;

/// Per-container override of the field configuration, as JSON.
pub const FIELD_CONFIG_ATTRIBUTE: &str = "data-particle-field";

/// An event listener that unregisters itself when dropped.
struct Subscription {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Subscription {
	fn listen(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, MountError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for Subscription {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

/// Everything one mounted container owns. Dropping it stops the loop first,
/// then removes the listeners.
struct MountedField {
	canvas: HtmlCanvasElement,
	driver: AnimationDriver<RafClock>,
	_subscriptions: Vec<Subscription>,
}

impl MountedField {
	/// Stop the loop and take the canvas out of the DOM. Listeners go when
	/// the value is dropped.
	fn teardown(self) {
		self.driver.stop();
		self.canvas.remove();
	}
}

/// Mounted entries keyed by their container.
///
/// Keys compare by equality, which for DOM elements means node identity.
struct Ledger<K, V> {
	entries: Vec<(K, V)>,
}

impl<K: PartialEq, V> Ledger<K, V> {
	fn new() -> Self {
		Self { entries: Vec::new() }
	}

	fn len(&self) -> usize {
		self.entries.len()
	}

	fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	fn contains(&self, key: &K) -> bool {
		self.entries.iter().any(|(k, _)| k == key)
	}

	/// Refuse a container that is already tracked or that already carries a
	/// particle canvas from someone else.
	fn admit(&self, key: &K, has_canvas: bool) -> Result<(), MountError> {
		if has_canvas || self.contains(key) {
			return Err(MountError::AlreadyMounted);
		}
		Ok(())
	}

	fn insert(&mut self, key: K, value: V) {
		self.entries.push((key, value));
	}

	fn remove(&mut self, key: &K) -> Option<V> {
		let index = self.entries.iter().position(|(k, _)| k == key)?;
		Some(self.entries.swap_remove(index).1)
	}

	/// Hand every entry `live` rejects to `evict`. Returns how many went.
	fn prune(&mut self, live: impl Fn(&V) -> bool, mut evict: impl FnMut(V)) -> usize {
		let before = self.entries.len();
		let (kept, dead): (Vec<_>, Vec<_>) = self.entries.drain(..).partition(|(_, v)| live(v));
		self.entries = kept;
		for (_, value) in dead {
			evict(value);
		}
		before - self.entries.len()
	}

	fn drain(&mut self) -> impl Iterator<Item = V> + '_ {
		self.entries.drain(..).map(|(_, v)| v)
	}

	fn values(&self) -> impl Iterator<Item = &V> {
		self.entries.iter().map(|(_, v)| v)
	}
}

/// The container's own `data-particle-field` JSON, or `fallback` when the
/// attribute is absent or malformed.
fn resolve_field_config(attribute: Option<&str>, fallback: &FieldConfig) -> FieldConfig {
	let Some(json) = attribute else {
		return fallback.clone();
	};
	match serde_json::from_str(json) {
		Ok(config) => config,
		Err(e) => {
			warn!("particle-field: ignoring {}: {}", FIELD_CONFIG_ATTRIBUTE, e);
			fallback.clone()
		}
	}
}

/// Owns the particle fields of one document.
pub struct FieldRegistry {
	config: BackgroundConfig,
	mounted: Ledger<HtmlElement, MountedField>,
}

impl FieldRegistry {
	pub fn new(config: BackgroundConfig) -> Self {
		Self {
			config,
			mounted: Ledger::new(),
		}
	}

	/// Number of live fields.
	pub fn len(&self) -> usize {
		self.mounted.len()
	}

	pub fn is_empty(&self) -> bool {
		self.mounted.is_empty()
	}

	pub fn is_mounted(&self, container: &HtmlElement) -> bool {
		self.mounted.contains(container)
	}

	/// Mount a field in every qualifying container of `document`. Returns how
	/// many were newly mounted; already-mounted containers are skipped.
	pub fn mount_all(&mut self, document: &Document) -> usize {
		let nodes = match document.query_selector_all(&self.config.selector) {
			Ok(nodes) => nodes,
			Err(e) => {
				warn!("particle-field: bad selector {:?}: {:?}", self.config.selector, e);
				return 0;
			}
		};

		let mut count = 0;
		for i in 0..nodes.length() {
			let Some(node) = nodes.item(i) else {
				continue;
			};
			let result = node
				.dyn_into::<HtmlElement>()
				.map_err(|_| MountError::NotAnElement)
				.and_then(|container| self.mount(&container));
			match result {
				Ok(()) => count += 1,
				Err(e) => debug!("particle-field: skipped container: {}", e),
			}
		}
		if self.is_empty() {
			debug!("particle-field: nothing matched {:?}", self.config.selector);
		}
		info!("particle-field: mounted {} new field(s), {} live", count, self.len());
		count
	}

	/// Forget fields whose canvas left the document. Their loops have already
	/// ended; this drops their listeners and frees the container for a new
	/// mount.
	fn prune_detached(&mut self) {
		let pruned = self.mounted.prune(|m| m.canvas.is_connected(), MountedField::teardown);
		if pruned > 0 {
			debug!("particle-field: pruned {} detached field(s)", pruned);
		}
	}

	/// Mount one field in `container`.
	///
	/// Capability checks run before the DOM is touched, so a failed mount
	/// leaves the container as it was.
	pub fn mount(&mut self, container: &HtmlElement) -> Result<(), MountError> {
		self.prune_detached();
		let marker = format!(".{}", self.config.canvas_class);
		let has_canvas = container.query_selector(&marker)?.is_some();
		self.mounted.admit(container, has_canvas)?;

		let document = container
			.owner_document()
			.ok_or_else(|| MountError::Dom("container has no document".into()))?;
		let canvas: HtmlCanvasElement = document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| MountError::NoDrawingContext)?;
		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into().ok())
			.ok_or(MountError::NoDrawingContext)?;
		let clock = RafClock::new().ok_or(MountError::NoFrameClock)?;
		let window = clock.window().clone();

		canvas.class_list().add_1(&self.config.canvas_class)?;
		container.prepend_with_node_1(&canvas)?;

		let attribute = container.get_attribute(FIELD_CONFIG_ATTRIBUTE);
		let field_config = resolve_field_config(attribute.as_deref(), &self.config.field);
		let field = Rc::new(RefCell::new(ParticleField::new(field_config)));
		let viewport = ViewportBinding::new(container.clone(), canvas.clone());
		viewport.refresh(&mut field.borrow_mut());

		let (frame_field, frame_canvas) = (field.clone(), canvas.clone());
		let driver = AnimationDriver::new(clock, move || {
			if !frame_canvas.is_connected() {
				debug!("particle-field: canvas detached, stopping");
				return ControlFlow::Break(());
			}
			let mut field = frame_field.borrow_mut();
			field.step();
			field.render(&ctx);
			ControlFlow::Continue(())
		});

		let subscriptions = match Self::wire_events(container, &window, &canvas, &field, viewport, driver.watch()) {
			Ok(subscriptions) => subscriptions,
			Err(e) => {
				canvas.remove();
				return Err(e);
			}
		};
		if !driver.start() {
			canvas.remove();
			return Err(MountError::NoFrameClock);
		}

		self.mounted.insert(
			container.clone(),
			MountedField {
				canvas,
				driver,
				_subscriptions: subscriptions,
			},
		);
		Ok(())
	}

	/// Pointer and resize listeners for one field. They do nothing once the
	/// field's loop has stopped.
	fn wire_events(
		container: &HtmlElement,
		window: &web_sys::Window,
		canvas: &HtmlCanvasElement,
		field: &Rc<RefCell<ParticleField>>,
		viewport: ViewportBinding,
		watch: DriverWatch,
	) -> Result<Vec<Subscription>, MountError> {
		let tracker = Rc::new(RefCell::new(PointerTracker::new()));

		let (tracker_mm, field_mm, canvas_mm) = (tracker.clone(), field.clone(), canvas.clone());
		let watch_mm = watch.clone();
		let on_mousemove = move |ev: Event| {
			if !watch_mm.is_running() {
				return;
			}
			let Some(ev) = ev.dyn_ref::<MouseEvent>() else {
				return;
			};
			let rect = canvas_mm.get_bounding_client_rect();
			let mut tracker = tracker_mm.borrow_mut();
			tracker.on_move((ev.client_x() as f64, ev.client_y() as f64), (rect.left(), rect.top()));
			field_mm.borrow_mut().set_pointer(tracker.position());
		};

		let (tracker_ml, field_ml) = (tracker, field.clone());
		let on_mouseleave = move |_: Event| {
			tracker_ml.borrow_mut().on_leave();
			field_ml.borrow_mut().clear_pointer();
		};

		let field_rs = field.clone();
		let on_resize = move |_: Event| {
			if !watch.is_running() {
				return;
			}
			viewport.refresh(&mut field_rs.borrow_mut());
		};

		Ok(vec![
			Subscription::listen(container, "mousemove", on_mousemove)?,
			Subscription::listen(container, "mouseleave", on_mouseleave)?,
			Subscription::listen(window, "resize", on_resize)?,
		])
	}

	/// Stop and remove the field in `container`: cancels its frame, drops its
	/// listeners and takes its canvas out of the DOM.
	pub fn unmount(&mut self, container: &HtmlElement) -> bool {
		match self.mounted.remove(container) {
			Some(mounted) => {
				mounted.teardown();
				true
			}
			None => false,
		}
	}

	/// Unmount every field.
	pub fn unmount_all(&mut self) {
		for mounted in self.mounted.drain() {
			mounted.teardown();
		}
	}

	/// Cancel every in-flight frame but leave canvases in place.
	pub fn stop_all(&self) {
		for mounted in self.mounted.values() {
			mounted.driver.stop();
		}
	}

	/// Stop all loops when the page is being unloaded.
	pub fn install_unload_teardown(registry: &Rc<RefCell<Self>>) {
		let Some(window) = web_sys::window() else {
			return;
		};
		let registry = Rc::downgrade(registry);
		let closure = Closure::<dyn FnMut()>::new(move || {
			if let Some(registry) = registry.upgrade() {
				registry.borrow().stop_all();
			}
		});
		let _ = window.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
		closure.forget();
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;

	use super::*;
	use crate::components::particle_field::config::{BoundaryPolicy, PointerMode};

	/// Counts how many values were dropped, like a field whose listeners
	/// unregister on drop.
	struct Tracked {
		live: bool,
		drops: Rc<Cell<u32>>,
	}

	impl Drop for Tracked {
		fn drop(&mut self) {
			self.drops.set(self.drops.get() + 1);
		}
	}

	fn tracked(live: bool, drops: &Rc<Cell<u32>>) -> Tracked {
		Tracked {
			live,
			drops: drops.clone(),
		}
	}

	#[test]
	fn admit_refuses_tracked_or_marked_containers() {
		let drops = Rc::new(Cell::new(0));
		let mut ledger = Ledger::new();
		assert!(ledger.admit(&"hero", false).is_ok());
		assert!(matches!(ledger.admit(&"hero", true), Err(MountError::AlreadyMounted)));

		ledger.insert("hero", tracked(true, &drops));
		assert!(matches!(ledger.admit(&"hero", false), Err(MountError::AlreadyMounted)));
		assert!(ledger.admit(&"vision", false).is_ok());
		assert_eq!(ledger.len(), 1);
	}

	#[test]
	fn prune_frees_detached_containers_for_remount() {
		let drops = Rc::new(Cell::new(0));
		let mut ledger = Ledger::new();
		ledger.insert("hero", tracked(false, &drops));
		ledger.insert("vision", tracked(true, &drops));

		let mut evicted = 0;
		assert_eq!(ledger.prune(|t| t.live, |_| evicted += 1), 1);
		assert_eq!(evicted, 1);
		assert_eq!(drops.get(), 1);
		assert_eq!(ledger.len(), 1);
		assert!(!ledger.contains(&"hero"));
		assert!(ledger.contains(&"vision"));

		assert!(ledger.admit(&"hero", false).is_ok());
		ledger.insert("hero", tracked(true, &drops));
		assert_eq!(ledger.len(), 2);
	}

	#[test]
	fn repeated_detach_cycles_do_not_accumulate() {
		let drops = Rc::new(Cell::new(0));
		let mut ledger = Ledger::new();
		for _ in 0..10 {
			ledger.prune(|t: &Tracked| t.live, drop);
			ledger.admit(&"hero", false).unwrap();
			ledger.insert("hero", tracked(false, &drops));
		}
		assert_eq!(ledger.len(), 1);
		assert_eq!(drops.get(), 9);
	}

	#[test]
	fn prune_keeps_live_entries() {
		let drops = Rc::new(Cell::new(0));
		let mut ledger = Ledger::new();
		for key in ["a", "b", "c"] {
			ledger.insert(key, tracked(true, &drops));
		}
		assert_eq!(ledger.prune(|t| t.live, drop), 0);
		assert_eq!(ledger.len(), 3);
		assert_eq!(drops.get(), 0);
	}

	#[test]
	fn remove_and_drain_hand_back_values() {
		let drops = Rc::new(Cell::new(0));
		let mut ledger = Ledger::new();
		ledger.insert("a", tracked(true, &drops));
		ledger.insert("b", tracked(true, &drops));
		ledger.insert("c", tracked(true, &drops));

		assert!(ledger.remove(&"b").is_some());
		assert!(ledger.remove(&"b").is_none());
		assert_eq!(drops.get(), 1);
		assert_eq!(ledger.values().count(), 2);

		assert_eq!(ledger.drain().count(), 2);
		assert!(ledger.is_empty());
		assert_eq!(drops.get(), 3);
	}

	#[test]
	fn missing_attribute_uses_fallback() {
		let fallback = FieldConfig {
			connection_distance: 90.0,
			..FieldConfig::default()
		};
		assert_eq!(resolve_field_config(None, &fallback), fallback);
	}

	#[test]
	fn attribute_overrides_from_defaults() {
		let fallback = FieldConfig {
			connection_distance: 90.0,
			..FieldConfig::default()
		};
		let c = resolve_field_config(Some(r#"{"boundary":"wrap","pointer_mode":"tether"}"#), &fallback);
		assert_eq!(c.boundary, BoundaryPolicy::Wrap);
		assert_eq!(c.pointer_mode, PointerMode::Tether);
		// unspecified keys come from the defaults, not the page fallback
		assert_eq!(c.connection_distance, FieldConfig::default().connection_distance);
	}

	#[test]
	fn malformed_attribute_uses_fallback() {
		let fallback = FieldConfig {
			max_speed: 0.9,
			..FieldConfig::default()
		};
		assert_eq!(resolve_field_config(Some("{not json"), &fallback), fallback);
		assert_eq!(resolve_field_config(Some(r#"{"boundary":"sideways"}"#), &fallback), fallback);
	}
}
