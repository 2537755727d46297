//! 逐帧骨骼状态表

use glam::Vec3;

use super::{bone_child, LiveBone, JOINT_COUNT};

/// 单只手单帧的骨骼状态表（骨骼 id -> 方向/长度）
///
/// 每帧完全重新计算，不保留历史。
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BoneStateTable {
    bones: [Option<LiveBone>; JOINT_COUNT],
}

impl BoneStateTable {
    /// 从当前帧关键点提取
    /// 两端关节都在 `points` 范围内的骨骼才会被记录
    pub fn extract(points: &[Vec3]) -> Self {
        let mut bones = [None; JOINT_COUNT];
        for parent in 0..points.len().min(JOINT_COUNT) {
            if let Some(child) = bone_child(parent).filter(|&c| c < points.len()) {
                bones[parent] = Some(LiveBone::from_joints(points[parent], points[child]));
            }
        }
        Self { bones }
    }

    /// 获取骨骼状态；末端骨骼或越界 id 返回 None
    pub fn get(&self, bone_id: usize) -> Option<&LiveBone> {
        self.bones.get(bone_id).and_then(|b| b.as_ref())
    }

    /// 已记录的骨骼数量
    pub fn bone_count(&self) -> usize {
        self.bones.iter().filter(|b| b.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.bone_count() == 0
    }
}
