use bevy_ecs::prelude::*;
use glam::{Mat3, Mat4, Vec3};
use serde::{Deserialize, Serialize};

use super::spline::{normalize_or_none, CubicBSpline};
use crate::config::SplineConfig;
use crate::core::error::{SplineError, SplineResult};
use crate::ecs::Time;

/// 导数退化（直线段、拐点）时的朝向策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// 沿用上一个有效朝向（首个有效朝向之前为单位矩阵）
    #[default]
    HoldPrevious,
    /// 用仍然有效的轴构造一个默认朝向
    Fallback,
}

/// 样条动画状态
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineState {
    /// 当前段索引
    pub segment: usize,
    /// 段内参数，范围 [0, 1)
    pub parameter: f32,
    /// 每秒前进的参数量
    pub rate: f32,
}

/// 由一阶、二阶导数构造正交朝向 `[w, u, v]`
///
/// `v` 为切线，`u` 为曲率方向（对 `v` 正交化），`w = u × v`。
/// 任一方向退化时返回 `None`。
pub fn frame_from_derivatives(velocity: Vec3, acceleration: Vec3) -> Option<Mat3> {
    let v = normalize_or_none(velocity)?;
    let u = normalize_or_none(acceleration)?;
    let w = normalize_or_none(u.cross(v))?;
    let u = v.cross(w);
    Some(Mat3::from_cols(w, u, v))
}

/// 退化时的默认朝向：切线缺失用 +Z，法线缺失取任一正交方向
fn fallback_frame(velocity: Vec3, acceleration: Vec3) -> Mat3 {
    let v = normalize_or_none(velocity).unwrap_or(Vec3::Z);
    let hint = normalize_or_none(acceleration)
        .filter(|u| normalize_or_none(u.cross(v)).is_some())
        .unwrap_or_else(|| v.any_orthonormal_vector());
    let w = hint.cross(v).normalize();
    let u = v.cross(w);
    Mat3::from_cols(w, u, v)
}

/// 沿闭合三次 B 样条移动物体的动画器
#[derive(Resource, Debug, Clone)]
pub struct SplineAnimator {
    spline: CubicBSpline,
    state: SplineState,
    policy: DegeneratePolicy,
    last_frame: Mat3,
}

impl SplineAnimator {
    pub fn new(spline: CubicBSpline, rate: f32) -> SplineResult<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(SplineError::InvalidRate(rate));
        }

        let last_frame =
            frame_from_derivatives(spline.velocity(0.0, 0), spline.acceleration(0.0, 0))
                .unwrap_or(Mat3::IDENTITY);

        Ok(Self {
            spline,
            state: SplineState {
                segment: 0,
                parameter: 0.0,
                rate,
            },
            policy: DegeneratePolicy::default(),
            last_frame,
        })
    }

    /// 从控制点和配置创建
    pub fn from_config(control_points: Vec<Vec3>, config: &SplineConfig) -> SplineResult<Self> {
        let spline = CubicBSpline::new(control_points)?;
        let animator = Self::new(spline, config.animation_rate)?;
        Ok(animator.with_degenerate_policy(config.degenerate_policy))
    }

    pub fn with_degenerate_policy(mut self, policy: DegeneratePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// 推进段参数，跨过段边界时按 `M - 3` 段循环
    pub fn advance(&mut self, delta_time: f32) {
        let step = delta_time * self.state.rate;
        if !delta_time.is_finite() || delta_time < 0.0 || !step.is_finite() {
            tracing::warn!(target: "spline", "Ignoring invalid delta time: {}", delta_time);
            return;
        }

        self.state.parameter += step;
        if self.state.parameter >= 1.0 {
            let crossings = self.state.parameter.floor();
            self.state.parameter -= crossings;

            let count = self.spline.segment_count();
            self.state.segment = (self.state.segment + crossings as usize % count) % count;

            if crossings > 1.0 {
                tracing::debug!(
                    target: "spline",
                    "Crossed {} segment boundaries in one step",
                    crossings
                );
            }
        }

        if let Some(frame) = self.orientation_frame(self.state.parameter, self.state.segment) {
            self.last_frame = frame;
        }
    }

    pub fn state(&self) -> SplineState {
        self.state
    }

    pub fn segment(&self) -> usize {
        self.state.segment
    }

    pub fn parameter(&self) -> f32 {
        self.state.parameter
    }

    pub fn rate(&self) -> f32 {
        self.state.rate
    }

    pub fn spline(&self) -> &CubicBSpline {
        &self.spline
    }

    pub fn degenerate_policy(&self) -> DegeneratePolicy {
        self.policy
    }

    pub fn evaluate(&self, t: f32, segment: usize) -> Vec3 {
        self.spline.evaluate(t, segment)
    }

    pub fn evaluate_velocity(&self, t: f32, segment: usize) -> Vec3 {
        self.spline.velocity(t, segment)
    }

    pub fn evaluate_acceleration(&self, t: f32, segment: usize) -> Vec3 {
        self.spline.acceleration(t, segment)
    }

    /// 当前位置
    pub fn position(&self) -> Vec3 {
        self.evaluate(self.state.parameter, self.state.segment)
    }

    /// 当前一阶导数（对参数）
    pub fn velocity(&self) -> Vec3 {
        self.evaluate_velocity(self.state.parameter, self.state.segment)
    }

    /// 当前二阶导数（对参数）
    pub fn acceleration(&self) -> Vec3 {
        self.evaluate_acceleration(self.state.parameter, self.state.segment)
    }

    /// 当前一阶导数换算为每秒速度
    pub fn world_velocity(&self) -> Vec3 {
        self.velocity() * self.state.rate
    }

    /// 任意参数处的朝向，退化时为 `None`
    pub fn orientation_frame(&self, t: f32, segment: usize) -> Option<Mat3> {
        frame_from_derivatives(
            self.evaluate_velocity(t, segment),
            self.evaluate_acceleration(t, segment),
        )
    }

    /// 当前朝向，退化时按策略处理
    pub fn orientation(&self) -> Mat3 {
        let velocity = self.velocity();
        let acceleration = self.acceleration();
        match frame_from_derivatives(velocity, acceleration) {
            Some(frame) => frame,
            None => match self.policy {
                DegeneratePolicy::HoldPrevious => self.last_frame,
                DegeneratePolicy::Fallback => fallback_frame(velocity, acceleration),
            },
        }
    }

    /// 放置变换：先旋转到曲线朝向，再平移到曲线位置
    pub fn placement_transform(&self) -> Mat4 {
        Mat4::from_translation(self.position()) * Mat4::from_mat3(self.orientation())
    }

    /// 控制点中心，用作场景锚点
    pub fn center(&self) -> Vec3 {
        self.spline.center()
    }
}

// ============================================================================
// ECS 系统
// ============================================================================

/// 样条推进系统
pub fn spline_advance_system(time: Res<Time>, mut animator: ResMut<SplineAnimator>) {
    animator.advance(time.delta_seconds);
}
