//! 烘焙：把参考网格分解为骨骼相对参数
//!
//! 每个顶点一次性记录控制骨骼、静止骨骼长度与方向、沿骨骼投影和垂直偏移。
//! 运行时只读取这些结果，不会重新计算。

mod baker;

pub use baker::{bake_mesh, decompose_vertex, rest_bones, vertex_normals, RestBone};

/// 参数化手部模型（MANO）的参考关节数量
pub const MANO_JOINT_COUNT: usize = 16;
