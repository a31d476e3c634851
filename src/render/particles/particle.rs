//! 粒子数据与生成源
//!
//! 粒子池中的每个槽位都由 [`ParticleSource`] 生成；系统在构造时一次性生成全部粒子，
//! 之后每次重生都会再次调用生成源。

use glam::{Vec3, Vec4};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// 新生粒子的默认颜色
pub const DEFAULT_PARTICLE_COLOR: Vec4 = Vec4::new(0.33, 0.66, 0.66, 0.2);

/// 单个粒子（值类型，由粒子池独占）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// 出生位置
    pub position: Vec3,
    /// 初速度
    pub velocity: Vec3,
    /// 基础颜色
    pub color: Vec4,
    /// 当前年龄（秒）
    pub age: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            color: DEFAULT_PARTICLE_COLOR,
            age: 0.0,
        }
    }
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3, color: Vec4) -> Self {
        Self {
            position,
            velocity,
            color,
            age: 0.0,
        }
    }
}

/// 粒子生成源
///
/// `origin` 是当前的发射原点（可能每帧随样条移动）。返回粒子的 `age` 会被系统重置为 0。
///
/// 任意 `FnMut(Vec3) -> Particle` 闭包都自动实现此 trait：
///
/// ```rust
/// use glam::Vec3;
/// use trail_engine::render::particles::{Particle, ParticleSource, DEFAULT_PARTICLE_COLOR};
///
/// let mut source = |origin: Vec3| Particle::new(origin, Vec3::Y, DEFAULT_PARTICLE_COLOR);
/// let particle = source.spawn(Vec3::X);
/// assert_eq!(particle.position, Vec3::X);
/// ```
pub trait ParticleSource: Send + Sync {
    fn spawn(&mut self, origin: Vec3) -> Particle;
}

impl<F> ParticleSource for F
where
    F: FnMut(Vec3) -> Particle + Send + Sync,
{
    fn spawn(&mut self, origin: Vec3) -> Particle {
        self(origin)
    }
}

/// 随机速度分布参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VelocityDistribution {
    /// x/z 方向速度范围
    pub horizontal: [f32; 2],
    /// y 方向速度范围
    pub vertical: [f32; 2],
    /// 出生位置在 x/z 平面上的抖动半径
    pub position_jitter: f32,
}

impl Default for VelocityDistribution {
    fn default() -> Self {
        Self {
            horizontal: [-2.2, 3.14],
            vertical: [16.9, 24.0],
            position_jitter: 0.5,
        }
    }
}

impl VelocityDistribution {
    fn sample_velocity(&self, rng: &mut StdRng) -> Vec3 {
        Vec3::new(
            sample_range(rng, self.horizontal),
            sample_range(rng, self.vertical),
            sample_range(rng, self.horizontal),
        )
    }

    fn sample_offset(&self, rng: &mut StdRng) -> Vec3 {
        let jitter = self.position_jitter.abs();
        Vec3::new(
            sample_range(rng, [-jitter, jitter]),
            0.0,
            sample_range(rng, [-jitter, jitter]),
        )
    }
}

/// 在闭区间内均匀采样，区间端点顺序无关
pub(crate) fn sample_range<R: Rng>(rng: &mut R, range: [f32; 2]) -> f32 {
    let (lo, hi) = if range[0] <= range[1] {
        (range[0], range[1])
    } else {
        (range[1], range[0])
    };
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        lo
    }
}

/// 喷泉式生成源：从原点附近以随机速度发射
pub struct FountainSource {
    distribution: VelocityDistribution,
    color: Vec4,
    rng: StdRng,
}

impl FountainSource {
    pub fn new(distribution: VelocityDistribution, seed: u64) -> Self {
        Self {
            distribution,
            color: DEFAULT_PARTICLE_COLOR,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 设置新生粒子的颜色
    pub fn with_color(mut self, color: Vec4) -> Self {
        self.color = color;
        self
    }

    pub fn distribution(&self) -> &VelocityDistribution {
        &self.distribution
    }
}

impl ParticleSource for FountainSource {
    fn spawn(&mut self, origin: Vec3) -> Particle {
        let offset = self.distribution.sample_offset(&mut self.rng);
        let velocity = self.distribution.sample_velocity(&mut self.rng);
        Particle::new(origin + offset, velocity, self.color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fountain_source_ranges() {
        let distribution = VelocityDistribution::default();
        let mut source = FountainSource::new(distribution, 7);
        let origin = Vec3::new(1.0, 2.0, 3.0);

        for _ in 0..256 {
            let particle = source.spawn(origin);
            let offset = particle.position - origin;
            assert!(offset.x.abs() <= 0.5 && offset.z.abs() <= 0.5);
            assert_eq!(offset.y, 0.0);
            assert!(particle.velocity.x >= -2.2 && particle.velocity.x <= 3.14);
            assert!(particle.velocity.y >= 16.9 && particle.velocity.y <= 24.0);
            assert_eq!(particle.color, DEFAULT_PARTICLE_COLOR);
            assert_eq!(particle.age, 0.0);
        }
    }

    #[test]
    fn test_fountain_source_is_deterministic_per_seed() {
        let mut a = FountainSource::new(VelocityDistribution::default(), 42);
        let mut b = FountainSource::new(VelocityDistribution::default(), 42);

        for _ in 0..16 {
            assert_eq!(a.spawn(Vec3::ZERO), b.spawn(Vec3::ZERO));
        }
    }

    #[test]
    fn test_reversed_range_is_accepted() {
        let distribution = VelocityDistribution {
            horizontal: [1.0, -1.0],
            vertical: [2.0, 2.0],
            position_jitter: 0.0,
        };
        let mut source = FountainSource::new(distribution, 1);
        let particle = source.spawn(Vec3::ZERO);

        assert!(particle.velocity.x.abs() <= 1.0);
        assert_eq!(particle.velocity.y, 2.0);
        assert_eq!(particle.position, Vec3::ZERO);
    }

    #[test]
    fn test_closure_source() {
        let mut counter = 0u32;
        let mut source = move |origin: Vec3| {
            counter += 1;
            Particle::new(origin, Vec3::splat(counter as f32), Vec4::ONE)
        };

        assert_eq!(source.spawn(Vec3::ZERO).velocity, Vec3::ONE);
        assert_eq!(source.spawn(Vec3::ZERO).velocity, Vec3::splat(2.0));
    }
}
