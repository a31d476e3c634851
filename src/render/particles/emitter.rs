//! 粒子外观与运动参数
//!
//! 决定渲染缓冲区如何从粒子状态推导：位置由 [`PhysicsMode`] 给出，
//! 颜色由 [`ColorFade`] 按 `age / life_span` 计算。

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// 默认重力
pub const DEFAULT_GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

// ============================================================================
// 初始状态
// ============================================================================

/// 新建粒子池的初始状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InitialState {
    /// 全部死亡，由重生逐步填满
    #[default]
    Dead,
    /// 全部存活，年龄为 0
    Live,
}

// ============================================================================
// 运动模式
// ============================================================================

/// 位置推导模式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PhysicsMode {
    /// `position + velocity * age`
    Linear,
    /// `position + velocity * age + gravity * age²`
    Ballistic { gravity: Vec3 },
}

impl Default for PhysicsMode {
    fn default() -> Self {
        Self::Ballistic {
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl PhysicsMode {
    /// 计算粒子在给定年龄时的位置
    #[inline]
    pub fn position_at(&self, position: Vec3, velocity: Vec3, age: f32) -> Vec3 {
        match self {
            Self::Linear => position + velocity * age,
            Self::Ballistic { gravity } => position + velocity * age + *gravity * (age * age),
        }
    }
}

// ============================================================================
// 颜色渐变
// ============================================================================

/// 颜色停止点
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// 时间点（0-1）
    pub time: f32,
    /// 颜色
    pub color: Vec4,
}

/// 颜色渐变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorGradient {
    /// 颜色停止点（按时间排序）
    pub stops: Vec<ColorStop>,
}

impl ColorGradient {
    pub fn new() -> Self {
        Self { stops: Vec::new() }
    }

    pub fn add_stop(mut self, time: f32, color: Vec4) -> Self {
        self.stops.push(ColorStop { time, color });
        self.stops.sort_by(|a, b| a.time.total_cmp(&b.time));
        self
    }

    /// 采样颜色
    pub fn sample(&self, t: f32) -> Vec4 {
        let (first, last) = match (self.stops.first(), self.stops.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Vec4::ONE,
        };

        let t = t.clamp(0.0, 1.0);
        if t <= first.time {
            return first.color;
        }

        // 找到两个相邻的停止点
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t >= a.time && t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return b.color;
                }
                return a.color.lerp(b.color, (t - a.time) / span);
            }
        }

        last.color
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::new()
            .add_stop(0.0, Vec4::new(1.0, 1.0, 1.0, 1.0))
            .add_stop(1.0, Vec4::new(1.0, 1.0, 1.0, 0.0))
    }
}

// ============================================================================
// 颜色随生命周期
// ============================================================================

/// 颜色衰减方式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ColorFade {
    /// 保持基础颜色
    Constant,
    /// 叠加高光，随年龄线性减弱：`color + highlight * (1 - life)`
    Highlight { highlight: Vec4 },
    /// 向目标颜色线性过渡
    Lerp { target: Vec4 },
    /// 渐变采样结果与基础颜色相乘
    Gradient(ColorGradient),
}

impl Default for ColorFade {
    fn default() -> Self {
        Self::Highlight {
            highlight: Vec4::new(1.0, 0.0, 0.0, 1.0),
        }
    }
}

impl ColorFade {
    /// `life` 为归一化年龄 `age / life_span`
    #[inline]
    pub fn apply(&self, color: Vec4, life: f32) -> Vec4 {
        let life = life.clamp(0.0, 1.0);
        match self {
            Self::Constant => color,
            Self::Highlight { highlight } => color + *highlight * (1.0 - life),
            Self::Lerp { target } => color.lerp(*target, life),
            Self::Gradient(gradient) => color * gradient.sample(life),
        }
    }
}
