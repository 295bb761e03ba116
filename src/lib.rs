//! particle-backdrop: interactive particle-field backgrounds for page sections.
//!
//! This crate mounts one self-contained particle simulation per qualifying
//! section of a page, each drawing drifting points, fading connection lines and
//! pointer repulsion onto its own canvas.

use std::cell::RefCell;
use std::rc::Rc;

// getrandom is only here for its `js` feature on wasm32.
use getrandom as _;
use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{
	AnimationDriver, BackgroundConfig, BoundaryPolicy, Color, Connection, ConnectionStart, DriverState,
	DriverWatch, FieldConfig, FieldRegistry, FieldStyle, FrameClock, MAX_PARTICLES, ManualClock, MountError,
	Particle, ParticleCount, ParticleField, PointerMode, PointerTracker, RafClock, Surface, ViewportBinding,
	backing_size, fade_alpha,
};

/// Id of the optional `<script type="application/json">` holding a [`BackgroundConfig`].
pub const CONFIG_ELEMENT_ID: &str = "particle-config";

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-backdrop: logging initialized");
}

/// Load page configuration from a script element with id="particle-config",
/// falling back to the defaults when it is missing or malformed.
pub fn load_config() -> BackgroundConfig {
	let Some(json_text) = config_text() else {
		return BackgroundConfig::default();
	};
	match BackgroundConfig::from_json(&json_text) {
		Ok(config) => {
			info!("particle-backdrop: loaded config for {:?}", config.selector);
			config
		}
		Err(e) => {
			warn!("particle-backdrop: failed to parse config: {}", e);
			BackgroundConfig::default()
		}
	}
}

fn config_text() -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(CONFIG_ELEMENT_ID)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Field override used by the second demo section.
const WRAP_TETHER_FIELD: &str = r#"{"boundary":"wrap","pointer_mode":"tether"}"#;

/// Demo page: two decorated sections with particle backgrounds.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let registry = Rc::new(RefCell::new(FieldRegistry::new(load_config())));
	FieldRegistry::install_unload_teardown(&registry);

	Effect::new(move |_| {
		let Some(document) = web_sys::window().and_then(|w| w.document()) else {
			return;
		};
		registry.borrow_mut().mount_all(&document);
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Particle Backdrop" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<section class="hero-internal">
			<h1>"Particle Backdrop"</h1>
			<p class="subtitle">"Move the pointer over a section to push the particles around."</p>
		</section>
		<section class="vision-mission-section" data-particle-field=WRAP_TETHER_FIELD>
			<h2>"Wrap + tether"</h2>
			<p>"This section wraps particles at the edges and draws lines to the pointer instead of pushing."</p>
		</section>
	}
}
