//! 网格烘焙实现

use glam::Vec3;

use crate::math::{cross, dot, normalize};
use crate::model::{SkinnedMesh, SkinnedVertex, Triangle};
use crate::{HandError, Result};

use super::MANO_JOINT_COUNT;

/// 骨骼末端：参考关节，或沿上一段延长（模型没有指尖关节）
#[derive(Clone, Copy, Debug)]
enum BoneEnd {
    Joint(usize),
    /// parent + (parent - prev)
    Extend(usize),
}

/// 追踪骨骼 id -> MANO 参考关节
///
/// MANO 关节顺序：0 手腕，1-3 食指，4-6 中指，7-9 小指，10-12 无名指，13-15 拇指。
/// 按 id 升序排列，最近骨骼并列时取 id 较小者。
const MANO_BONES: [(i32, usize, BoneEnd); 16] = [
    (0, 0, BoneEnd::Joint(1)),
    // 拇指
    (1, 13, BoneEnd::Joint(14)),
    (2, 14, BoneEnd::Joint(15)),
    (3, 15, BoneEnd::Extend(14)),
    // 食指
    (5, 1, BoneEnd::Joint(2)),
    (6, 2, BoneEnd::Joint(3)),
    (7, 3, BoneEnd::Extend(2)),
    // 中指
    (9, 4, BoneEnd::Joint(5)),
    (10, 5, BoneEnd::Joint(6)),
    (11, 6, BoneEnd::Extend(5)),
    // 无名指
    (13, 10, BoneEnd::Joint(11)),
    (14, 11, BoneEnd::Joint(12)),
    (15, 12, BoneEnd::Extend(11)),
    // 小指
    (17, 7, BoneEnd::Joint(8)),
    (18, 8, BoneEnd::Joint(9)),
    (19, 9, BoneEnd::Extend(8)),
];

/// 静止姿态下的一根骨骼
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestBone {
    pub bone_id: i32,
    pub parent: Vec3,
    pub child: Vec3,
}

impl RestBone {
    pub fn length(&self) -> f32 {
        (self.child - self.parent).length()
    }

    pub fn direction(&self) -> Vec3 {
        normalize(self.child - self.parent)
    }
}

/// 由 MANO 参考关节构建静止骨骼表
pub fn rest_bones(joints: &[Vec3]) -> Result<Vec<RestBone>> {
    if joints.len() != MANO_JOINT_COUNT {
        return Err(HandError::Bake(format!(
            "expected {} reference joints, got {}",
            MANO_JOINT_COUNT,
            joints.len()
        )));
    }

    Ok(MANO_BONES
        .iter()
        .map(|&(bone_id, parent, end)| {
            let parent_pos = joints[parent];
            let child = match end {
                BoneEnd::Joint(j) => joints[j],
                BoneEnd::Extend(prev) => parent_pos + (parent_pos - joints[prev]),
            };
            RestBone {
                bone_id,
                parent: parent_pos,
                child,
            }
        })
        .collect())
}

/// 顶点法线：相邻面法线（未单位化，即按面积加权）之和再单位化
pub fn vertex_normals(positions: &[Vec3], faces: &[Triangle]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for face in faces {
        let [a, b, c] = face.indices();
        let face_normal = cross(positions[b] - positions[a], positions[c] - positions[a]);
        normals[a] += face_normal;
        normals[b] += face_normal;
        normals[c] += face_normal;
    }
    normals.into_iter().map(normalize).collect()
}

/// 把一个静止顶点分解到骨骼坐标系
pub fn decompose_vertex(position: Vec3, normal: Vec3, bone: &RestBone) -> SkinnedVertex {
    let rest_direction = bone.direction();
    let offset = position - bone.parent;
    let projection = dot(offset, rest_direction);

    SkinnedVertex {
        bone_id: bone.bone_id,
        rest_length: bone.length(),
        projection,
        perpendicular: offset - rest_direction * projection,
        normal,
        rest_direction,
    }
}

/// 按最近骨骼父关节分配顶点
fn nearest_bone(position: Vec3, bones: &[RestBone]) -> Option<&RestBone> {
    let mut best: Option<(&RestBone, f32)> = None;
    for bone in bones {
        let dist = (position - bone.parent).length();
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((bone, dist));
        }
    }
    best.map(|(bone, _)| bone)
}

/// 烘焙整张网格
pub fn bake_mesh(template: &[Vec3], faces: &[Triangle], joints: &[Vec3]) -> Result<SkinnedMesh> {
    if template.is_empty() {
        return Err(HandError::Bake("template mesh has no vertices".to_string()));
    }
    if let Some(face) = faces
        .iter()
        .position(|f| f.indices().iter().any(|&i| i >= template.len()))
    {
        return Err(HandError::Bake(format!(
            "face {} references vertex outside 0..{}",
            face,
            template.len()
        )));
    }

    let bones = rest_bones(joints)?;
    let normals = vertex_normals(template, faces);

    let mut vertices = Vec::with_capacity(template.len());
    for (&position, &normal) in template.iter().zip(&normals) {
        let bone = nearest_bone(position, &bones)
            .ok_or_else(|| HandError::Bake("no rest bones".to_string()))?;
        vertices.push(decompose_vertex(position, normal, bone));
    }

    log::info!(
        "烘焙完成: {} 个顶点, {} 个面, {} 根骨骼",
        vertices.len(),
        faces.len(),
        bones.len()
    );

    Ok(SkinnedMesh::new(vertices, faces.to_vec()))
}
