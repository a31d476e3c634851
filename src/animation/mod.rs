//! 样条动画模块
//!
//! 提供均匀三次 B 样条求值与沿样条的物体动画。
//!
//! ## 功能特性
//!
//! - 基矩阵形式的位置、一阶导数、二阶导数求值
//! - 段参数推进，按 `M - 3` 段闭合循环
//! - 由导数构造正交朝向，并给出放置变换
//! - 折线与法线采样，用于可视化
//!
//! ## 使用示例
//!
//! ```rust
//! use glam::Vec3;
//! use trail_engine::animation::{CubicBSpline, SplineAnimator};
//!
//! let spline = CubicBSpline::new(vec![
//!     Vec3::new(0.0, 0.0, 0.0),
//!     Vec3::new(1.0, 0.0, 0.0),
//!     Vec3::new(1.0, 1.0, 0.0),
//!     Vec3::new(0.0, 1.0, 0.0),
//! ])
//! .unwrap();
//!
//! let mut animator = SplineAnimator::new(spline, 1.0).unwrap();
//! animator.advance(0.5);
//! assert_eq!(animator.segment(), 0);
//! assert_eq!(animator.parameter(), 0.5);
//!
//! let placement = animator.placement_transform();
//! assert!(placement.is_finite());
//! ```

pub mod animator;
pub mod spline;

pub use animator::{
    frame_from_derivatives, spline_advance_system, DegeneratePolicy, SplineAnimator, SplineState,
};
pub use spline::{CubicBSpline, BSPLINE_BASIS};
