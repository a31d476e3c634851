//! 外部资源加载

pub mod control_points;

pub use control_points::{load_control_points, parse_control_points};
