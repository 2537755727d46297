//! Rodrigues 旋转：把点/向量从静止骨骼方向转到当前骨骼方向

use glam::Vec3;

use super::{cross, dot, normalize};

/// 默认退化角阈值（sin θ）
pub const DEFAULT_ROTATION_EPSILON: f32 = 0.001;

/// 将 `point` 按 `rest_dir -> curr_dir` 的旋转变换
///
/// 两个方向在内部单位化，调用方无需预先归一化。
/// 当 sin θ < `epsilon` 时原样返回：
/// 这包括几乎无旋转的情况，也包括接近 180° 的反向（叉积同样趋近于零），
/// 后者是已知的近似限制。
pub fn rotate_between(point: Vec3, rest_dir: Vec3, curr_dir: Vec3, epsilon: f32) -> Vec3 {
    let rest_dir = normalize(rest_dir);
    let curr_dir = normalize(curr_dir);

    // 旋转轴，长度即 sin θ
    let axis = cross(rest_dir, curr_dir);
    let s = axis.length();
    let c = dot(rest_dir, curr_dir);

    if s < epsilon {
        return point;
    }

    let u = normalize(axis);
    point * c + cross(u, point) * s + u * dot(u, point) * (1.0 - c)
}
