use super::{ConfigError, ConfigResult};
use crate::impl_default;
use crate::render::particles::{ColorFade, InitialState, PhysicsMode, VelocityDistribution};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 粒子系统配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// 粒子池容量
    pub capacity: usize,

    /// 粒子寿命（秒）
    pub life_span: f32,

    /// 初始发射原点
    pub origin: Vec3,

    /// 粒子池初始状态
    pub initial_state: InitialState,

    /// 位置推导模式
    pub physics: PhysicsMode,

    /// 颜色衰减方式
    pub color_fade: ColorFade,

    /// 随机速度分布
    pub velocity: VelocityDistribution,

    /// 随机种子
    pub seed: u64,
}

impl_default!(ParticleConfig {
    capacity: 10_000,
    life_span: 1.0,
    origin: Vec3::ZERO,
    initial_state: InitialState::Dead,
    physics: PhysicsMode::default(),
    color_fade: ColorFade::default(),
    velocity: VelocityDistribution::default(),
    seed: 42,
});

impl ParticleConfig {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.capacity == 0 {
            return Err(ConfigError::ValidationError(
                "Particle capacity must be greater than zero".to_string(),
            ));
        }
        if !self.life_span.is_finite() || self.life_span <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "Invalid particle life span: {}",
                self.life_span
            )));
        }
        if !self.origin.is_finite() {
            return Err(ConfigError::ValidationError(
                "Particle origin must be finite".to_string(),
            ));
        }

        let ranges = self
            .velocity
            .horizontal
            .iter()
            .chain(self.velocity.vertical.iter());
        if ranges
            .chain(std::iter::once(&self.velocity.position_jitter))
            .any(|v| !v.is_finite())
        {
            return Err(ConfigError::ValidationError(
                "Particle velocity distribution must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ParticleConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let config = ParticleConfig {
            capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ParticleConfig {
            life_span: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let mut config = ParticleConfig::default();
        config.velocity.vertical = [f32::NAN, 1.0];
        assert!(config.validate().is_err());
    }
}
