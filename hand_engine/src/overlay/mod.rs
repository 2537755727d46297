//! 叠加层：关节球体填缝、调试骨架线、顶点配色
//!
//! 与网格重建无关的独立渲染数据，不持有状态。

use glam::Vec3;
use serde::Serialize;

use crate::skeleton::{JointRole, CONNECTIONS};

/// 顶点配色（按骨骼 id 的热力图）
pub mod colors {
    /// 手腕骨骼
    pub const WRIST: [f32; 3] = [0.9, 0.9, 0.95];
    /// 其余 4 的倍数骨骼（掌指根部 / 指尖）
    pub const WARM: [f32; 3] = [1.0, 0.6, 0.6];
    /// 普通指节
    pub const SKIN: [f32; 3] = [1.0, 0.9, 0.85];
    /// 关节球体
    pub const SPHERE: [f32; 3] = [0.8, 0.7, 0.6];
}

/// 关节处的实心球，用于遮盖刚性分段在大角度弯曲处的裂缝
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct JointSphere {
    pub joint_index: usize,
    pub center: Vec3,
    pub radius: f32,
    pub color: [f32; 3],
}

/// 每个关键点一个球体，半径按关节类型查表
pub fn joint_spheres(points: &[Vec3]) -> Vec<JointSphere> {
    points
        .iter()
        .enumerate()
        .map(|(i, &center)| JointSphere {
            joint_index: i,
            center,
            radius: JointRole::of(i).sphere_radius(),
            color: colors::SPHERE,
        })
        .collect()
}

/// 骨架连线；端点越界的连线跳过
pub fn skeleton_lines(points: &[Vec3]) -> Vec<(Vec3, Vec3)> {
    CONNECTIONS
        .iter()
        .filter(|(a, b)| *a < points.len() && *b < points.len())
        .map(|&(a, b)| (points[a], points[b]))
        .collect()
}

/// 顶点颜色
pub fn vertex_color(bone_id: i32) -> [f32; 3] {
    if bone_id == 0 {
        colors::WRIST
    } else if bone_id % 4 == 0 {
        colors::WARM
    } else {
        colors::SKIN
    }
}

/// 归一化追踪坐标 -> 光栅化视图坐标（居中，Y 向上，Z 朝向观察者）
#[inline]
pub fn to_view_space(p: Vec3) -> Vec3 {
    Vec3::new(p.x - 0.5, 0.5 - p.y, -p.z)
}

/// 法线只翻转 Z
#[inline]
pub fn normal_to_view(n: Vec3) -> Vec3 {
    Vec3::new(n.x, n.y, -n.z)
}
