//! 统一错误处理模块
//!
//! 提供模拟层范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **构造期错误** (`ParticleError`, `SplineError`): 容量、寿命、控制点数量等配置错误，立即失败
//! - **资源错误** (`AssetError`): 控制点文件缺失或不可读，由加载器上报，不重试
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析、验证失败
//!
//! `EngineError` 可以同时承载以上所有错误。

use crate::config::ConfigError;
use thiserror::Error;

/// 引擎核心错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Particle system error: {0}")]
    Particle(#[from] ParticleError),

    #[error("Spline error: {0}")]
    Spline(#[from] SplineError),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

/// 粒子系统构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParticleError {
    #[error("Particle pool capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Particle life span must be positive and finite, got {0}")]
    InvalidLifeSpan(f32),
}

/// 样条曲线构造错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplineError {
    #[error("Cubic B-spline needs at least 4 control points, got {count}")]
    TooFewControlPoints { count: usize },

    #[error("Control point {index} has a non-finite coordinate")]
    NonFiniteControlPoint { index: usize },

    #[error("Animation rate must be non-negative and finite, got {0}")]
    InvalidRate(f32),
}

/// 资源加载错误
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Asset not found: {path}")]
    NotFound { path: String },

    #[error("Failed to load asset: {path}, reason: {reason}")]
    LoadFailed { path: String, reason: String },
}

/// 引擎结果类型别名
pub type EngineResult<T> = Result<T, EngineError>;
pub type ParticleResult<T> = Result<T, ParticleError>;
pub type SplineResult<T> = Result<T, SplineError>;
pub type AssetResult<T> = Result<T, AssetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let particle_error = ParticleError::ZeroCapacity;
        let engine_error: EngineError = particle_error.into();
        assert!(matches!(engine_error, EngineError::Particle(_)));

        let spline_error = SplineError::TooFewControlPoints { count: 2 };
        let engine_error: EngineError = spline_error.into();
        assert!(matches!(engine_error, EngineError::Spline(_)));
    }

    #[test]
    fn test_error_display() {
        let error = SplineError::TooFewControlPoints { count: 3 };
        assert_eq!(
            error.to_string(),
            "Cubic B-spline needs at least 4 control points, got 3"
        );

        let error = AssetError::NotFound {
            path: "points.txt".to_string(),
        };
        let engine_error = EngineError::from(error);
        assert_eq!(
            engine_error.to_string(),
            "Asset error: Asset not found: points.txt"
        );
    }
}
