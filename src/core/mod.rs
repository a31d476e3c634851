//! 核心模块
//!
//! 包含模拟层的公共基础设施：
//! - `error` - 错误类型定义
//! - `macros` - 减少样板代码的宏

pub mod error;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{
    AssetError, AssetResult, EngineError, EngineResult, ParticleError, ParticleResult,
    SplineError, SplineResult,
};
