//! 模拟场景
//!
//! 把粒子系统与样条动画器装进同一个 ECS `World`，按固定顺序推进：
//!
//! ```text
//! spline_advance_system → spawn_follow_system → particle_update_system
//! ```
//!
//! 粒子从动画物体当前所在位置喷出，初速度沿曲线朝向随机分布。

use bevy_ecs::prelude::*;
use glam::{Mat3, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::animation::{spline_advance_system, SplineAnimator};
use crate::config::{EngineConfig, SpawnVelocityConfig};
use crate::core::error::EngineResult;
use crate::ecs::Time;
use crate::render::particles::particle::sample_range;
use crate::render::particles::{particle_update_system, ParticleSystem};
use crate::render::RenderSink;

/// 沿曲线朝向生成发射速度
#[derive(Resource)]
pub struct SpawnVelocity {
    config: SpawnVelocityConfig,
    rng: StdRng,
}

impl SpawnVelocity {
    pub fn new(config: SpawnVelocityConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// 朝向 `[w, u, v]` 下的随机速度
    ///
    /// 切线与曲率方向取较弱系数，副法线 `v × u` 取较强系数。
    pub fn sample(&mut self, frame: Mat3) -> Vec3 {
        let tangent = frame.z_axis;
        let normal = frame.y_axis;
        let binormal = tangent.cross(normal);

        let a = sample_range(&mut self.rng, self.config.tangent);
        let b = sample_range(&mut self.rng, self.config.normal);
        let c = sample_range(&mut self.rng, self.config.binormal);
        tangent * a + normal * b + binormal * c
    }
}

/// 让粒子发射点跟随动画物体
pub fn spawn_follow_system(
    animator: Res<SplineAnimator>,
    mut spawn_velocity: ResMut<SpawnVelocity>,
    mut particles: ResMut<ParticleSystem>,
) {
    particles.set_spawn_origin(animator.position());
    if spawn_velocity.enabled() {
        let velocity = spawn_velocity.sample(animator.orientation());
        particles.set_spawn_velocity(Some(velocity));
    }
}

/// 粒子与样条动画的组合场景
pub struct SimulationScene {
    world: World,
    schedule: Schedule,
}

impl SimulationScene {
    /// 由配置和控制点创建场景
    pub fn new(config: &EngineConfig, control_points: Vec<Vec3>) -> EngineResult<Self> {
        config.validate()?;

        let animator = SplineAnimator::from_config(control_points, &config.spline)?;
        let mut particles = ParticleSystem::from_config(&config.particles)?;
        particles.set_spawn_origin(animator.position());

        let mut world = World::new();
        world.insert_resource(Time::default());
        world.insert_resource(SpawnVelocity::new(config.spline.spawn_velocity.clone()));
        world.insert_resource(animator);
        world.insert_resource(particles);

        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                spline_advance_system,
                spawn_follow_system,
                particle_update_system,
            )
                .chain(),
        );

        tracing::info!(
            target: "engine",
            "Simulation scene ready: {} particles, {} spline segments",
            config.particles.capacity,
            world.resource::<SplineAnimator>().spline().segment_count()
        );

        Ok(Self { world, schedule })
    }

    /// 推进一帧
    pub fn update(&mut self, dt: f32) {
        self.world.resource_mut::<Time>().advance(dt);
        self.schedule.run(&mut self.world);
    }

    /// 把本帧结果交给渲染端；没有存活粒子时跳过粒子上传
    pub fn submit<R: RenderSink>(&self, sink: &mut R) {
        let particles = self.particles();
        if particles.live_count() > 0 {
            sink.upload_particles(particles.positions(), particles.colors());
        }
        sink.upload_placement(self.animator().placement_transform());
    }

    pub fn particles(&self) -> &ParticleSystem {
        self.world.resource::<ParticleSystem>()
    }

    pub fn animator(&self) -> &SplineAnimator {
        self.world.resource::<SplineAnimator>()
    }

    pub fn time(&self) -> &Time {
        self.world.resource::<Time>()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{EngineError, SplineError};
    use crate::render::RecordingSink;

    fn square() -> Vec<Vec3> {
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ]
    }

    fn small_config() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.particles.capacity = 16;
        config
    }

    #[test]
    fn test_scene_rejects_bad_input() {
        let result = SimulationScene::new(&small_config(), vec![Vec3::ZERO; 2]);
        assert!(matches!(
            result,
            Err(EngineError::Spline(SplineError::TooFewControlPoints { count: 2 }))
        ));

        let mut config = small_config();
        config.particles.capacity = 0;
        assert!(matches!(
            SimulationScene::new(&config, square()),
            Err(EngineError::Config(_))
        ));
    }

    #[test]
    fn test_systems_run_in_order() {
        let mut scene = SimulationScene::new(&small_config(), square()).unwrap();
        scene.update(0.5);

        assert_eq!(scene.time().frame_count, 1);
        assert_eq!(scene.animator().parameter(), 0.5);
        // 发射点在本帧粒子更新之前已经移动到动画物体的位置
        assert_eq!(scene.particles().spawn_origin(), scene.animator().position());
        assert!(scene.particles().spawn_velocity().is_some());
    }

    #[test]
    fn test_submit_skips_empty_particles() {
        let mut scene = SimulationScene::new(&small_config(), square()).unwrap();
        let mut sink = RecordingSink::new();

        scene.update(0.0);
        scene.submit(&mut sink);
        assert_eq!(scene.particles().live_count(), 0);
        assert_eq!(sink.particle_uploads, 0);
        assert!(sink.last_placement.is_some());

        scene.update(0.5);
        scene.submit(&mut sink);
        assert!(scene.particles().live_count() > 0);
        assert_eq!(sink.particle_uploads, 1);
        assert_eq!(sink.last_particle_count, scene.particles().live_count());
    }

    #[test]
    fn test_spawn_velocity_follows_frame() {
        let config = SpawnVelocityConfig {
            tangent: [1.0, 1.0],
            normal: [0.0, 0.0],
            binormal: [0.0, 0.0],
            ..Default::default()
        };
        let mut spawn_velocity = SpawnVelocity::new(config);
        let frame = Mat3::from_cols(Vec3::X, Vec3::Y, Vec3::Z);
        assert_eq!(spawn_velocity.sample(frame), Vec3::Z);
    }

    #[test]
    fn test_spawn_velocity_binormal() {
        let config = SpawnVelocityConfig {
            tangent: [0.0, 0.0],
            normal: [0.0, 0.0],
            binormal: [2.0, 2.0],
            ..Default::default()
        };
        let mut spawn_velocity = SpawnVelocity::new(config);
        // 切线 +Y、曲率方向 -X 时副法线为 +Z
        let frame = Mat3::from_cols(Vec3::new(0.0, 0.0, -1.0), Vec3::NEG_X, Vec3::Y);
        let velocity = spawn_velocity.sample(frame);
        assert!((velocity - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_disabled_spawn_velocity() {
        let mut config = small_config();
        config.spline.spawn_velocity.enabled = false;
        let mut scene = SimulationScene::new(&config, square()).unwrap();
        scene.update(0.25);
        assert_eq!(scene.particles().spawn_velocity(), None);
    }
}
