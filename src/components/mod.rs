//! Page components.

pub mod particle_field;
