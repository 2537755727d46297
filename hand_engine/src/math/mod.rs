//! 向量运算与骨骼方向旋转

mod rotation;

pub use rotation::{rotate_between, DEFAULT_ROTATION_EPSILON};

use glam::Vec3;

/// 单位化；长度为零时返回零向量（不报错）
#[inline]
pub fn normalize(v: Vec3) -> Vec3 {
    v.normalize_or_zero()
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}
