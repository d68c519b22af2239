//! Solar-system simulation core: celestial bodies, the owning scene arena,
//! and the authored body catalog.
//!
//! This crate is pure kinematics over `glam` types; it knows nothing about
//! the GPU. The render layer reads each body's world matrix, texture
//! identifier, and lit flag once per frame.

pub mod body;
pub mod catalog;
pub mod system;

pub use body::{BodyParams, CelestialBody};
pub use catalog::build_solar_system;
pub use system::{BodyId, SceneBuildError, SolarSystem, SolarSystemBuilder};
