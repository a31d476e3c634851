use super::{ConfigError, ConfigResult};
use crate::animation::DegeneratePolicy;
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 样条动画配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplineConfig {
    /// 每秒前进的段参数
    pub animation_rate: f32,

    /// 朝向退化时的处理策略
    pub degenerate_policy: DegeneratePolicy,

    /// 曲线折线的采样步长
    pub polyline_step: f32,

    /// 法线可视化的采样步长
    pub normal_step: f32,

    /// 沿曲线朝向的发射速度
    pub spawn_velocity: SpawnVelocityConfig,
}

impl_default!(SplineConfig {
    animation_rate: 1.0,
    degenerate_policy: DegeneratePolicy::HoldPrevious,
    polyline_step: 0.01,
    normal_step: 0.1,
    spawn_velocity: SpawnVelocityConfig::default(),
});

impl SplineConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.animation_rate.is_finite() || self.animation_rate < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid animation rate: {}",
                self.animation_rate
            )));
        }
        for (name, step) in [
            ("polyline_step", self.polyline_step),
            ("normal_step", self.normal_step),
        ] {
            if !step.is_finite() || step <= 0.0 || step > 1.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be in (0, 1], got {}",
                    name, step
                )));
            }
        }
        self.spawn_velocity.validate()
    }
}

/// 发射速度配置
///
/// 每次重生时沿当前朝向的三个轴分别取随机系数：
/// `tangent * v + normal * u + binormal * w`。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnVelocityConfig {
    /// 是否让发射速度跟随曲线朝向
    pub enabled: bool,

    /// 切线方向系数范围
    pub tangent: [f32; 2],

    /// 曲率方向系数范围
    pub normal: [f32; 2],

    /// 副法线方向系数范围
    pub binormal: [f32; 2],

    /// 随机种子
    pub seed: u64,
}

impl_default!(SpawnVelocityConfig {
    enabled: true,
    tangent: [0.33, 3.14],
    normal: [0.33, 3.14],
    binormal: [2.24, 4.2],
    seed: 42,
});

impl SpawnVelocityConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        let finite = self
            .tangent
            .iter()
            .chain(self.normal.iter())
            .chain(self.binormal.iter())
            .all(|v| v.is_finite());
        if !finite {
            return Err(ConfigError::ValidationError(
                "Spawn velocity ranges must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
