//! CPU 粒子系统模块
//!
//! 管理固定容量的粒子池，每帧在单线程内完成模拟，并输出可直接上传的扁平缓冲区。
//!
//! ## 帧流程
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  ParticleSystem::tick                    │
//! ├─────────────────────────────────────────────────────────┤
//! │  1. Age & Cull                                           │
//! │     - 所有存活粒子 age += dt                              │
//! │     - 超过寿命的粒子与存活区末尾交换，存活数减一           │
//! │                                                          │
//! │  2. Respawn                                              │
//! │     - 时间预算累加 dt                                     │
//! │     - 预算足够时从死亡区头部逐个重生                       │
//! │                                                          │
//! │  3. Render Buffers                                       │
//! │     - 按运动模式计算位置                                   │
//! │     - 按颜色衰减方式计算颜色                               │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 使用示例
//!
//! ```rust
//! use trail_engine::config::ParticleConfig;
//! use trail_engine::render::particles::ParticleSystem;
//!
//! let config = ParticleConfig {
//!     capacity: 1_000,
//!     life_span: 1.0,
//!     ..Default::default()
//! };
//! let mut particles = ParticleSystem::from_config(&config).unwrap();
//!
//! particles.tick(1.0 / 60.0);
//! assert_eq!(particles.positions().len(), particles.live_count());
//! ```

pub mod emitter;
pub mod particle;
pub mod system;

pub use emitter::{
    ColorFade, ColorGradient, ColorStop, InitialState, PhysicsMode, DEFAULT_GRAVITY,
};
pub use particle::{
    FountainSource, Particle, ParticleSource, VelocityDistribution, DEFAULT_PARTICLE_COLOR,
};
pub use system::{particle_update_system, ParticleSystem, ParticleSystemStats, RenderBuffers};
