use bevy_ecs::prelude::*;

/// 帧时钟
///
/// 每帧由场景写入，系统通过 `Res<Time>` 读取本帧间隔。
#[derive(Resource, Clone, Copy, Debug)]
pub struct Time {
    pub delta_seconds: f32,
    pub elapsed_seconds: f64,
    pub frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            delta_seconds: 0.0,
            elapsed_seconds: 0.0,
            frame_count: 0,
        }
    }
}

impl Time {
    /// 记录新的一帧
    pub fn advance(&mut self, dt: f32) {
        self.delta_seconds = dt;
        if dt.is_finite() && dt > 0.0 {
            self.elapsed_seconds += dt as f64;
        }
        self.frame_count += 1;
    }
}
