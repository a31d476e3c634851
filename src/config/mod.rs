/// 统一配置系统
///
/// 提供TOML/JSON配置文件与环境变量覆盖
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod particles;
pub mod simulation;
pub mod spline;

pub use particles::ParticleConfig;
pub use simulation::SimulationConfig;
pub use spline::{SpawnVelocityConfig, SplineConfig};

use crate::impl_default;

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 主配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// 粒子系统配置
    #[serde(default)]
    pub particles: ParticleConfig,

    /// 样条动画配置
    #[serde(default)]
    pub spline: SplineConfig,

    /// 帧驱动配置
    #[serde(default)]
    pub simulation: SimulationConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 按扩展名加载配置文件，`.json` 之外一律按TOML解析
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// 用任意键值来源覆盖配置，无法解析的值被忽略
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(
            lookup: &dyn Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(target: "engine", "Ignoring unparsable override {}={}", key, raw);
                    None
                }
            }
        }
        let lookup: &dyn Fn(&str) -> Option<String> = &lookup;

        // 粒子配置
        if let Some(capacity) = parse(lookup, "TRAIL_PARTICLES_CAPACITY") {
            self.particles.capacity = capacity;
        }
        if let Some(life_span) = parse(lookup, "TRAIL_PARTICLES_LIFE_SPAN") {
            self.particles.life_span = life_span;
        }
        if let Some(seed) = parse(lookup, "TRAIL_PARTICLES_SEED") {
            self.particles.seed = seed;
        }

        // 样条配置
        if let Some(rate) = parse(lookup, "TRAIL_SPLINE_ANIMATION_RATE") {
            self.spline.animation_rate = rate;
        }

        // 帧驱动配置
        if let Some(fps) = parse(lookup, "TRAIL_SIMULATION_TARGET_FPS") {
            self.simulation.target_fps = fps;
        }
        if let Some(frames) = parse(lookup, "TRAIL_SIMULATION_FRAME_COUNT") {
            self.simulation.frame_count = frames;
        }

        // 日志配置
        if let Some(level) = lookup("TRAIL_LOG_LEVEL").and_then(|v| LogLevel::parse(&v)) {
            self.logging.level = level;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.particles.validate()?;
        self.spline.validate()?;
        self.simulation.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./trail.toml
    /// 2. ./trail.json
    /// 3. ~/.config/trail_engine/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("trail.toml") {
            tracing::info!(target: "engine", "Loaded config from trail.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("trail.json") {
            tracing::info!(target: "engine", "Loaded config from trail.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("trail_engine")
                .join("config.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "engine", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "engine", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别，`RUST_LOG` 未设置时生效
    pub level: LogLevel,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// 不区分大小写地解析级别名
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }

    /// `EnvFilter` 可接受的指令字符串
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::DegeneratePolicy;
    use crate::render::particles::{ColorFade, InitialState};
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.particles.capacity, 10_000);
        assert_eq!(config.simulation.target_fps, 60);
    }

    #[test]
    fn test_toml_serialization() {
        let mut config = EngineConfig::default();
        config.particles.initial_state = InitialState::Live;
        config.spline.degenerate_policy = DegeneratePolicy::Fallback;

        let toml_str = toml::to_string(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.particles.initial_state, InitialState::Live);
        assert_eq!(parsed.spline.degenerate_policy, DegeneratePolicy::Fallback);
        assert_eq!(parsed.particles.color_fade, config.particles.color_fade);
    }

    #[test]
    fn test_json_serialization() {
        let config = EngineConfig::default();
        let json_str = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json_str).unwrap();
        assert_eq!(config.particles.capacity, parsed.particles.capacity);
        assert_eq!(config.spline.animation_rate, parsed.spline.animation_rate);
    }

    #[test]
    fn test_partial_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            [particles]
            capacity = 64
            life_span = 2.5

            [particles.color_fade]
            mode = "constant"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.particles.capacity, 64);
        assert_eq!(config.particles.life_span, 2.5);
        assert_eq!(config.particles.color_fade, ColorFade::Constant);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.spline.animation_rate, 1.0);
    }

    #[test]
    fn test_parse_error() {
        let result = EngineConfig::from_toml_str("[particles\ncapacity = ");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TRAIL_PARTICLES_CAPACITY", "128"),
            ("TRAIL_SPLINE_ANIMATION_RATE", "0.5"),
            ("TRAIL_SIMULATION_TARGET_FPS", "not-a-number"),
            ("TRAIL_LOG_LEVEL", "WARN"),
        ]
        .into_iter()
        .collect();

        let mut config = EngineConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.particles.capacity, 128);
        assert_eq!(config.spline.animation_rate, 0.5);
        assert_eq!(config.simulation.target_fps, 60);
        assert_eq!(config.logging.level, LogLevel::Warn);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = EngineConfig::default();
        config.particles.capacity = 321;

        let toml_path = dir.path().join("trail.toml");
        config.save_toml(&toml_path).unwrap();
        assert_eq!(EngineConfig::from_file(&toml_path).unwrap().particles.capacity, 321);

        let json_path = dir.path().join("trail.json");
        config.save_json(&json_path).unwrap();
        assert_eq!(EngineConfig::from_file(&json_path).unwrap().particles.capacity, 321);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = EngineConfig::default();
        config.simulation.target_fps = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }
}
