//! Interactive particle-field backgrounds.
//!
//! Each qualifying page section gets its own canvas with a few dozen drifting
//! points, fading lines between near neighbours and a pointer that pushes
//! points away:
//! - [`ParticleField`] owns the particles and the per-frame step/render
//! - [`PointerTracker`] turns mouse events into canvas-local positions
//! - [`ViewportBinding`] resizes the canvas and reseeds on window resize
//! - [`AnimationDriver`] runs the loop on a [`FrameClock`]
//! - [`FieldRegistry`] mounts one independent field per container
//!
//! # Example
//!
//! ```ignore
//! use particle_backdrop::{BackgroundConfig, FieldRegistry};
//!
//! let mut registry = FieldRegistry::new(BackgroundConfig::default());
//! registry.mount_all(&document);
//! ```

mod config;
mod driver;
mod error;
mod field;
mod particles;
mod pointer;
mod registry;
mod render;
pub mod theme;
mod viewport;

pub use config::{
	BackgroundConfig, BoundaryPolicy, ConnectionStart, FieldConfig, MAX_PARTICLES, ParticleCount, PointerMode,
};
pub use driver::{AnimationDriver, DriverState, DriverWatch, FrameClock, ManualClock, RafClock};
pub use error::MountError;
pub use field::{Connection, ParticleField};
pub use particles::Particle;
pub use pointer::PointerTracker;
pub use registry::{FIELD_CONFIG_ATTRIBUTE, FieldRegistry};
pub use render::{Surface, fade_alpha};
pub use theme::{Color, FieldStyle};
pub use viewport::{ViewportBinding, backing_size};
