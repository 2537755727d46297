//! 顶点重建（拉伸 + 旋转）

mod skinning;

pub use skinning::{bone_target, compute_frame, compute_hand_frame, reconstruct_vertex};

use glam::Vec3;
use serde::Serialize;

use crate::config::DeformConfig;
use crate::overlay::{normal_to_view, to_view_space, JointSphere};
use crate::tracking::HandLabel;

/// 重建上下文：显式传入，不依赖全局状态
#[derive(Clone, Debug, Default)]
pub struct SkinningContext {
    pub config: DeformConfig,
}

impl SkinningContext {
    pub fn new(config: DeformConfig) -> Self {
        Self { config }
    }
}

/// 单个顶点的重建结果
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinnedVertexOut {
    pub position: Vec3,
    pub normal: Vec3,
}

/// 一只手一帧的重建输出
///
/// `positions` / `normals` / `colors` / `visible` 与静止顶点一一对应；
/// 被跳过的顶点位置和法线为零，`visible` 为 false。
/// `triangles` 只包含三个顶点都可见的面。
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SkinnedFrame {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub colors: Vec<[f32; 3]>,
    pub visible: Vec<bool>,
    pub triangles: Vec<[u32; 3]>,
}

impl SkinnedFrame {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn visible_count(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    /// 没有任何可见顶点
    pub fn is_empty(&self) -> bool {
        self.visible_count() == 0
    }

    /// 平铺的位置缓冲区（x,y,z,...），供光栅化直接上传
    pub fn positions_raw(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| p.to_array()).collect()
    }

    /// 平铺的法线缓冲区
    pub fn normals_raw(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| n.to_array()).collect()
    }
}

/// 一只检测到的手的全部渲染数据
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HandRender {
    pub label: HandLabel,
    /// 对应网格未加载或标签无法识别时为 None，只渲染骨架线
    pub mesh: Option<SkinnedFrame>,
    /// 与网格一起出现
    pub spheres: Vec<JointSphere>,
    pub skeleton: Vec<(Vec3, Vec3)>,
}

impl HandRender {
    /// 转换到光栅化视图坐标；不可见顶点保持为零
    pub fn in_view_space(&self) -> HandRender {
        let mut view = self.clone();
        if let Some(frame) = view.mesh.as_mut() {
            for ((p, n), &visible) in frame.positions.iter_mut().zip(frame.normals.iter_mut()).zip(&frame.visible) {
                if visible {
                    *p = to_view_space(*p);
                    *n = normal_to_view(*n);
                }
            }
        }
        for sphere in &mut view.spheres {
            sphere.center = to_view_space(sphere.center);
        }
        for (a, b) in &mut view.skeleton {
            *a = to_view_space(*a);
            *b = to_view_space(*b);
        }
        view
    }
}
