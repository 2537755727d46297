//! 手部骨骼拓扑与逐帧骨骼状态

mod bone;
mod manager;

pub use bone::LiveBone;
pub use manager::BoneStateTable;

// ============================================================================
// 关键点索引（21 点手部拓扑，0 = 手腕）
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// 关键点总数
pub const JOINT_COUNT: usize = 21;

/// 骨骼 父关节 -> 子关节 映射，骨骼 id 即父关节索引
/// 手腕只连到食指根部；指尖没有子关节（末端骨骼）
pub const BONE_MAP: [(usize, usize); 16] = [
    (WRIST, INDEX_MCP),
    (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
];

/// 骨架叠加层的连线
pub const CONNECTIONS: [(usize, usize); 20] = [
    (WRIST, THUMB_CMC), (THUMB_CMC, THUMB_MCP), (THUMB_MCP, THUMB_IP), (THUMB_IP, THUMB_TIP),
    (WRIST, INDEX_MCP), (INDEX_MCP, INDEX_PIP), (INDEX_PIP, INDEX_DIP), (INDEX_DIP, INDEX_TIP),
    (WRIST, MIDDLE_MCP), (MIDDLE_MCP, MIDDLE_PIP), (MIDDLE_PIP, MIDDLE_DIP), (MIDDLE_DIP, MIDDLE_TIP),
    (WRIST, RING_MCP), (RING_MCP, RING_PIP), (RING_PIP, RING_DIP), (RING_DIP, RING_TIP),
    (WRIST, PINKY_MCP), (PINKY_MCP, PINKY_PIP), (PINKY_PIP, PINKY_DIP), (PINKY_DIP, PINKY_TIP),
];

/// 查找骨骼的子关节；不在表中的骨骼为末端骨骼
pub fn bone_child(bone_id: usize) -> Option<usize> {
    BONE_MAP
        .iter()
        .find(|(parent, _)| *parent == bone_id)
        .map(|(_, child)| *child)
}

/// 关节类型（决定叠加球体半径）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointRole {
    Wrist,
    Knuckle,
    Mid,
    Tip,
}

/// 按 JointRole 排列的球体半径
const JOINT_RADII: [(JointRole, f32); 4] = [
    (JointRole::Wrist, 0.032),
    (JointRole::Knuckle, 0.024),
    (JointRole::Mid, 0.012),
    (JointRole::Tip, 0.010),
];

impl JointRole {
    pub fn of(joint_index: usize) -> Self {
        match joint_index {
            WRIST => JointRole::Wrist,
            INDEX_MCP | MIDDLE_MCP | RING_MCP | PINKY_MCP => JointRole::Knuckle,
            i if i % 4 == 0 => JointRole::Tip,
            _ => JointRole::Mid,
        }
    }

    pub fn sphere_radius(self) -> f32 {
        JOINT_RADII
            .iter()
            .find(|(role, _)| *role == self)
            .map(|(_, r)| *r)
            .unwrap_or(0.012)
    }
}
