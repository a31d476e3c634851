//! 渲染边界
//!
//! 模拟层本身不持有任何 GPU 资源；每帧结果通过 [`RenderSink`] 交给外部上传器。

use glam::{Mat4, Vec3, Vec4};

pub mod particles;

// Re-export particle system components
pub use particles::{
    ColorFade, ColorGradient, ColorStop, FountainSource, InitialState, Particle, ParticleSource,
    ParticleSystem, ParticleSystemStats, PhysicsMode, RenderBuffers, VelocityDistribution,
};

/// GPU 上传边界
///
/// 调用方保证 `upload_particles` 不会收到空缓冲区。
pub trait RenderSink {
    /// 上传存活粒子的位置与颜色（两者长度相同且不为 0）
    fn upload_particles(&mut self, positions: &[Vec3], colors: &[Vec4]);

    /// 上传沿样条放置物体的变换
    fn upload_placement(&mut self, transform: Mat4);
}

/// 只记录上传内容的渲染端，用于无头运行和测试
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    /// 粒子上传次数
    pub particle_uploads: usize,
    /// 最近一次上传的粒子数
    pub last_particle_count: usize,
    /// 累计上传字节数
    pub uploaded_bytes: usize,
    /// 最近一次上传的放置变换
    pub last_placement: Option<Mat4>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RenderSink for RecordingSink {
    fn upload_particles(&mut self, positions: &[Vec3], colors: &[Vec4]) {
        debug_assert_eq!(positions.len(), colors.len());
        self.particle_uploads += 1;
        self.last_particle_count = positions.len();
        self.uploaded_bytes += std::mem::size_of_val(positions) + std::mem::size_of_val(colors);
    }

    fn upload_placement(&mut self, transform: Mat4) {
        self.last_placement = Some(transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink() {
        let mut sink = RecordingSink::new();
        sink.upload_particles(&[Vec3::ZERO, Vec3::ONE], &[Vec4::ONE, Vec4::ONE]);
        sink.upload_placement(Mat4::IDENTITY);

        assert_eq!(sink.particle_uploads, 1);
        assert_eq!(sink.last_particle_count, 2);
        assert_eq!(sink.uploaded_bytes, 2 * 12 + 2 * 16);
        assert_eq!(sink.last_placement, Some(Mat4::IDENTITY));
    }
}
