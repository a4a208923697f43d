//! Tile-parallel Whitted ray tracer for sphere scenes.
//!
//! The host owns the window, the BGRA frame buffer and the clock; this crate
//! turns a [`scene::Scene`], an [`camera::OrbitCamera`] and a
//! [`frame::FrameState`] into pixels.

pub mod algebra;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod pixel;
pub mod scene;
pub mod sphere;
pub mod tiles;
pub mod tracer;

pub use algebra::{Mat4, Vec3};
pub use error::{ConfigError, RenderError};
pub use frame::{FrameClock, FrameDriver, FrameState, FrameStats};
pub use scene::Scene;
pub use sphere::Sphere;
