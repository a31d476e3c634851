//! # Trail Engine
//!
//! A per-frame simulation layer for real-time 3D visualization: a CPU particle
//! fountain and an object animated along a closed cubic B-spline.
//!
//! ## Features
//!
//! - **Particles**: fixed-capacity pool with swap-to-end culling, time-budgeted
//!   respawn and flat position/color buffers ready for upload
//! - **B-Spline Animation**: basis-matrix evaluation of position and derivatives,
//!   orientation frames and placement transforms
//! - **ECS Scheduling**: both simulations run as `bevy_ecs` resources in a chained schedule
//! - **Configuration**: TOML/JSON files with environment overrides
//!
//! ### Example
//!
//! ```rust
//! use glam::Vec3;
//! use trail_engine::config::EngineConfig;
//! use trail_engine::render::RecordingSink;
//! use trail_engine::scene::SimulationScene;
//!
//! let points = vec![
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 0.0),
//!     Vec3::new(0.0, 1.0, 0.0),
//! ];
//! let mut scene = SimulationScene::new(&EngineConfig::default(), points).unwrap();
//! let mut sink = RecordingSink::new();
//!
//! scene.update(1.0 / 60.0);
//! scene.submit(&mut sink);
//! assert!(sink.last_placement.is_some());
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Error types and shared macros
//! - [`ecs`]: Frame clock resource
//! - [`render`]: Particle system and the GPU upload boundary
//! - [`animation`]: Cubic B-spline evaluation and animation
//! - [`resources`]: Control-point file loading
//! - [`scene`]: The combined simulation schedule
//! - [`config`]: Configuration system

/// Error types and shared macros
pub mod core;
/// Frame clock for systems
pub mod ecs;
/// Particle simulation and render boundary
pub mod render;
/// Control-point loading
pub mod resources;
/// Configuration system
pub mod config;
/// Spline evaluation and animation
pub mod animation;
/// Combined simulation scene
pub mod scene;
