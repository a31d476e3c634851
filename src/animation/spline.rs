use glam::{Mat4, Vec3, Vec4};

use crate::core::error::{SplineError, SplineResult};

/// 均匀三次 B 样条基矩阵（列主序，未乘 1/6）
///
/// 第 i 个控制点的混合权重为 `dot(T, column_i) / 6`，其中 `T = [t³, t², t, 1]`。
pub const BSPLINE_BASIS: Mat4 = Mat4::from_cols(
    Vec4::new(-1.0, 3.0, -3.0, 1.0),
    Vec4::new(3.0, -6.0, 0.0, 4.0),
    Vec4::new(-3.0, 3.0, 3.0, 1.0),
    Vec4::new(1.0, 0.0, 0.0, 0.0),
);

const BASIS_SCALE: f32 = 1.0 / 6.0;

/// 小于此长度的导数视为退化
pub const DEGENERATE_EPSILON: f32 = 1.0e-5;

/// 归一化；长度过小或非有限时返回 `None`
#[inline]
pub fn normalize_or_none(v: Vec3) -> Option<Vec3> {
    let length = v.length();
    if length.is_finite() && length > DEGENERATE_EPSILON {
        Some(v / length)
    } else {
        None
    }
}

/// 位置的幂基行 `[t³, t², t, 1]`
#[inline]
pub fn position_basis(t: f32) -> Vec4 {
    Vec4::new(t * t * t, t * t, t, 1.0)
}

/// 一阶导数的幂基行 `[3t², 2t, 1, 0]`
#[inline]
pub fn velocity_basis(t: f32) -> Vec4 {
    Vec4::new(3.0 * t * t, 2.0 * t, 1.0, 0.0)
}

/// 二阶导数的幂基行 `[6t, 2, 0, 0]`
#[inline]
pub fn acceleration_basis(t: f32) -> Vec4 {
    Vec4::new(6.0 * t, 2.0, 0.0, 0.0)
}

/// 幂基行乘以基矩阵，得到四个控制点的混合权重
#[inline]
pub fn blend_weights(power: Vec4) -> Vec4 {
    BSPLINE_BASIS.transpose() * power * BASIS_SCALE
}

/// 均匀三次 B 样条
///
/// 第 `idx` 段由控制点 `idx..=idx + 3` 决定，共 `M - 3` 段。
/// 所有求值函数都把段索引按段数取模，因此对任意索引都有定义。
#[derive(Debug, Clone, PartialEq)]
pub struct CubicBSpline {
    control_points: Vec<Vec3>,
}

impl CubicBSpline {
    /// 构成一段所需的控制点数
    pub const MIN_CONTROL_POINTS: usize = 4;

    pub fn new(control_points: Vec<Vec3>) -> SplineResult<Self> {
        if control_points.len() < Self::MIN_CONTROL_POINTS {
            return Err(SplineError::TooFewControlPoints {
                count: control_points.len(),
            });
        }
        if let Some(index) = control_points.iter().position(|p| !p.is_finite()) {
            return Err(SplineError::NonFiniteControlPoint { index });
        }

        Ok(Self { control_points })
    }

    pub fn control_points(&self) -> &[Vec3] {
        &self.control_points
    }

    /// 有效段数 `M - 3`
    pub fn segment_count(&self) -> usize {
        self.control_points.len() - 3
    }

    fn blend(&self, power: Vec4, segment: usize) -> Vec3 {
        let base = segment % self.segment_count();
        let w = blend_weights(power);
        let p = &self.control_points[base..base + 4];
        p[0] * w.x + p[1] * w.y + p[2] * w.z + p[3] * w.w
    }

    /// 曲线上第 `segment` 段参数 `t` 处的位置
    pub fn evaluate(&self, t: f32, segment: usize) -> Vec3 {
        self.blend(position_basis(t), segment)
    }

    /// 对 `t` 的一阶导数（不是对时间的导数）
    pub fn velocity(&self, t: f32, segment: usize) -> Vec3 {
        self.blend(velocity_basis(t), segment)
    }

    /// 对 `t` 的二阶导数
    pub fn acceleration(&self, t: f32, segment: usize) -> Vec3 {
        self.blend(acceleration_basis(t), segment)
    }

    /// 所有控制点的算术平均
    pub fn center(&self) -> Vec3 {
        let sum: Vec3 = self.control_points.iter().copied().sum();
        sum / self.control_points.len() as f32
    }

    /// 按固定步长对所有段采样，末尾补上最后一段的终点
    pub fn sample_polyline(&self, step: f32) -> Vec<Vec3> {
        let samples = samples_per_segment(step);
        let mut points = Vec::with_capacity(samples * self.segment_count() + 1);
        for segment in 0..self.segment_count() {
            for i in 0..samples {
                points.push(self.evaluate(i as f32 * step, segment));
            }
        }
        points.push(self.evaluate(1.0, self.segment_count() - 1));
        points
    }

    /// 法线可视化线段：`(p, p + length * n)`，`n` 为归一化的二阶导数
    ///
    /// 二阶导数退化的采样点被跳过。
    pub fn normal_lines(&self, step: f32, length: f32) -> Vec<(Vec3, Vec3)> {
        let samples = samples_per_segment(step);
        let mut lines = Vec::with_capacity(samples * self.segment_count());
        for segment in 0..self.segment_count() {
            for i in 0..samples {
                let t = i as f32 * step;
                let point = self.evaluate(t, segment);
                if let Some(normal) = normalize_or_none(self.acceleration(t, segment)) {
                    lines.push((point, point + normal * length));
                }
            }
        }
        lines
    }
}

/// 每段的采样数：满足 `i * step < 1` 的 `i` 的个数
fn samples_per_segment(step: f32) -> usize {
    if step.is_finite() && step > 0.0 && step < 1.0 {
        (1.0 / step).ceil() as usize
    } else {
        1
    }
}
