//! 粒子系统
//!
//! 固定容量的粒子池，按“存活前缀 / 死亡后缀”划分：
//!
//! ```text
//! [0, live_count)         存活粒子
//! [live_count, capacity)  可回收的死亡粒子
//! ```
//!
//! 每帧 `tick` 依次执行：老化与剔除 → 按时间预算重生 → 重建渲染缓冲区。

use bevy_ecs::prelude::*;
use glam::{Vec3, Vec4};

use crate::config::ParticleConfig;
use crate::core::error::{ParticleError, ParticleResult};
use crate::ecs::Time;
use crate::render::particles::emitter::{ColorFade, InitialState, PhysicsMode};
use crate::render::particles::particle::{FountainSource, Particle, ParticleSource};

/// 渲染缓冲区（每帧由存活粒子重建，长度恒等于存活数）
#[derive(Debug, Clone, Default)]
pub struct RenderBuffers {
    positions: Vec<Vec3>,
    colors: Vec<Vec4>,
}

impl RenderBuffers {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(capacity),
            colors: Vec::with_capacity(capacity),
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[Vec4] {
        &self.colors
    }

    /// 位置缓冲区的原始字节，可直接上传
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// 颜色缓冲区的原始字节，可直接上传
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn clear(&mut self) {
        self.positions.clear();
        self.colors.clear();
    }
}

/// 粒子系统统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParticleSystemStats {
    /// 当前存活粒子数
    pub live_count: usize,
    /// 总重生数
    pub total_spawned: u64,
    /// 本帧重生数
    pub frame_spawned: usize,
    /// 本帧剔除数
    pub frame_culled: usize,
}

/// 粒子系统
#[derive(Resource)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
    live_count: usize,
    life_span: f32,
    respawn_budget: f32,
    origin: Vec3,
    velocity_override: Option<Vec3>,
    physics: PhysicsMode,
    color_fade: ColorFade,
    source: Box<dyn ParticleSource>,
    buffers: RenderBuffers,
    stats: ParticleSystemStats,
}

impl ParticleSystem {
    /// 使用自定义生成源创建粒子系统
    ///
    /// 全部 `capacity` 个粒子在此处一次性生成。
    ///
    /// # 错误
    ///
    /// 容量为 0 或寿命不是正有限数时返回 [`ParticleError`]。
    pub fn new<S>(config: &ParticleConfig, source: S) -> ParticleResult<Self>
    where
        S: ParticleSource + 'static,
    {
        if config.capacity == 0 {
            return Err(ParticleError::ZeroCapacity);
        }
        if !config.life_span.is_finite() || config.life_span <= 0.0 {
            return Err(ParticleError::InvalidLifeSpan(config.life_span));
        }

        let mut source: Box<dyn ParticleSource> = Box::new(source);
        let particles: Vec<Particle> = (0..config.capacity)
            .map(|_| {
                let mut particle = source.spawn(config.origin);
                particle.age = 0.0;
                particle
            })
            .collect();

        let live_count = match config.initial_state {
            InitialState::Dead => 0,
            InitialState::Live => config.capacity,
        };

        let mut system = Self {
            particles,
            live_count,
            life_span: config.life_span,
            respawn_budget: 0.0,
            origin: config.origin,
            velocity_override: None,
            physics: config.physics,
            color_fade: config.color_fade.clone(),
            source,
            buffers: RenderBuffers::with_capacity(config.capacity),
            stats: ParticleSystemStats {
                live_count,
                ..Default::default()
            },
        };
        system.update_buffers();

        tracing::debug!(
            target: "particles",
            "Particle system created: capacity={}, life_span={}, initial_state={:?}",
            config.capacity,
            config.life_span,
            config.initial_state
        );

        Ok(system)
    }

    /// 使用配置中的随机速度分布创建粒子系统
    pub fn from_config(config: &ParticleConfig) -> ParticleResult<Self> {
        Self::new(config, FountainSource::new(config.velocity, config.seed))
    }

    /// 推进一帧
    ///
    /// `delta_time` 必须是非负有限数，否则本帧被忽略。
    pub fn tick(&mut self, delta_time: f32) {
        if !delta_time.is_finite() || delta_time < 0.0 {
            tracing::warn!(target: "particles", "Ignoring invalid delta time: {}", delta_time);
            return;
        }

        let culled = self.update_life(delta_time);
        let spawned = self.respawn(delta_time);
        self.update_buffers();

        self.stats.live_count = self.live_count;
        self.stats.frame_culled = culled;
        self.stats.frame_spawned = spawned;
        self.stats.total_spawned += spawned as u64;
    }

    /// 老化并剔除超过寿命的粒子，返回剔除数
    fn update_life(&mut self, delta_time: f32) -> usize {
        let mut culled = 0;
        let mut i = 0;
        while i < self.live_count {
            let particle = &mut self.particles[i];
            particle.age += delta_time;
            if particle.age > self.life_span {
                // 与最后一个存活粒子交换；换入的粒子尚未检查，索引不前进
                self.live_count -= 1;
                self.particles.swap(i, self.live_count);
                culled += 1;
            } else {
                i += 1;
            }
        }
        culled
    }

    /// 按累计时间预算重生粒子，返回重生数
    fn respawn(&mut self, delta_time: f32) -> usize {
        self.respawn_budget += delta_time;

        let capacity = self.particles.len();
        let mut spawned = 0;
        while self.live_count < capacity {
            let dead = (capacity - self.live_count).max(1);
            let trigger = self.life_span / dead as f32;
            if self.respawn_budget < trigger {
                break;
            }

            let mut particle = self.source.spawn(self.origin);
            particle.age = 0.0;
            if let Some(velocity) = self.velocity_override {
                particle.velocity = velocity;
            }
            self.particles[self.live_count] = particle;
            self.live_count += 1;
            self.respawn_budget -= trigger;
            spawned += 1;
        }

        if self.live_count == capacity {
            self.respawn_budget = self.respawn_budget.min(self.life_span);
        }

        spawned
    }

    fn update_buffers(&mut self) {
        self.buffers.clear();
        for particle in &self.particles[..self.live_count] {
            self.buffers.positions.push(self.physics.position_at(
                particle.position,
                particle.velocity,
                particle.age,
            ));
            self.buffers
                .colors
                .push(self.color_fade.apply(particle.color, particle.age / self.life_span));
        }
    }

    /// 存活粒子的渲染位置
    pub fn positions(&self) -> &[Vec3] {
        self.buffers.positions()
    }

    /// 存活粒子的渲染颜色
    pub fn colors(&self) -> &[Vec4] {
        self.buffers.colors()
    }

    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }

    /// 整个粒子池（包括死亡粒子）
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// 存活粒子
    pub fn live_particles(&self) -> &[Particle] {
        &self.particles[..self.live_count]
    }

    pub fn live_count(&self) -> usize {
        self.live_count
    }

    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    pub fn life_span(&self) -> f32 {
        self.life_span
    }

    pub fn respawn_budget(&self) -> f32 {
        self.respawn_budget
    }

    pub fn stats(&self) -> ParticleSystemStats {
        self.stats
    }

    /// 设置重生原点
    pub fn set_spawn_origin(&mut self, origin: Vec3) {
        self.origin = origin;
    }

    pub fn spawn_origin(&self) -> Vec3 {
        self.origin
    }

    /// 设置重生粒子的速度（`None` 表示使用生成源给出的速度）
    pub fn set_spawn_velocity(&mut self, velocity: Option<Vec3>) {
        self.velocity_override = velocity;
    }

    pub fn spawn_velocity(&self) -> Option<Vec3> {
        self.velocity_override
    }

    pub fn physics(&self) -> PhysicsMode {
        self.physics
    }

    pub fn color_fade(&self) -> &ColorFade {
        &self.color_fade
    }
}

// ============================================================================
// ECS 系统
// ============================================================================

/// 粒子更新系统
pub fn particle_update_system(time: Res<Time>, mut particles: ResMut<ParticleSystem>) {
    particles.tick(time.delta_seconds);
}

// ============================================================================
// 测试
// ============================================================================
