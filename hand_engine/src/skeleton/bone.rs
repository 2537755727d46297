//! 实时骨骼状态

use glam::Vec3;

/// 当前帧中一根骨骼的方向（未单位化）和长度
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LiveBone {
    pub direction: Vec3,
    pub length: f32,
}

impl LiveBone {
    /// 由父、子关节位置构建
    pub fn from_joints(parent: Vec3, child: Vec3) -> Self {
        let direction = child - parent;
        Self {
            direction,
            length: direction.length(),
        }
    }

    /// 相对静止长度的拉伸比
    /// 静止长度不超过 `epsilon` 时返回 1.0
    pub fn stretch(&self, rest_length: f32, epsilon: f32) -> f32 {
        if rest_length > epsilon {
            self.length / rest_length
        } else {
            1.0
        }
    }
}
