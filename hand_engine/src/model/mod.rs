//! 预烘焙手部网格

mod loader;
mod runtime;

pub use loader::{load_hand_data, load_skinned_mesh, parse_hand_data, parse_skinned_mesh, save_skinned_mesh};
pub use runtime::HandMeshes;

use glam::Vec3;

/// 骨骼相对参数化后的静止顶点
///
/// `perpendicular` 与 `normal` 都在静止骨骼方向为参考轴的坐标系中，
/// 烘焙时一次性计算，运行时只读。
#[derive(Clone, Debug, PartialEq)]
pub struct SkinnedVertex {
    /// 控制骨骼 id（= 父关节索引）
    pub bone_id: i32,
    /// 静止骨骼长度
    pub rest_length: f32,
    /// 沿静止骨骼方向的投影
    pub projection: f32,
    /// 垂直于骨骼的偏移（截面体积）
    pub perpendicular: Vec3,
    /// 静止法线
    pub normal: Vec3,
    /// 静止骨骼单位方向
    pub rest_direction: Vec3,
}

impl SkinnedVertex {
    /// 骨骼 id 对应的关节索引；负数或越界返回 None
    pub fn joint_index(&self, joint_count: usize) -> Option<usize> {
        usize::try_from(self.bone_id).ok().filter(|&i| i < joint_count)
    }
}

/// 三角面（三个顶点索引）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Triangle(pub [u32; 3]);

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self([a, b, c])
    }

    pub fn indices(&self) -> [usize; 3] {
        self.0.map(|i| i as usize)
    }
}

/// 静态网格：加载后只读，左右手实例之间共享
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkinnedMesh {
    pub vertices: Vec<SkinnedVertex>,
    pub faces: Vec<Triangle>,
}

impl SkinnedMesh {
    pub fn new(vertices: Vec<SkinnedVertex>, faces: Vec<Triangle>) -> Self {
        Self { vertices, faces }
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取面数量
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// 第一个索引越界的面
    pub fn first_invalid_face(&self) -> Option<usize> {
        let count = self.vertices.len();
        self.faces
            .iter()
            .position(|f| f.indices().iter().any(|&i| i >= count))
    }
}
