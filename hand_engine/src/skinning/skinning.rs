//! 顶点重建计算

use glam::Vec3;
use rayon::prelude::*;

use crate::math::rotate_between;
use crate::model::{HandMeshes, SkinnedMesh, SkinnedVertex};
use crate::overlay::{joint_spheres, skeleton_lines, vertex_color};
use crate::skeleton::BoneStateTable;
use crate::tracking::FrameSnapshot;

use super::{HandRender, SkinnedFrame, SkinnedVertexOut, SkinningContext};

/// 计算顶点的拉伸系数和目标方向
///
/// 有实时骨骼时：目标方向 = 实时方向，拉伸 = 实时长度 / 静止长度（静止长度过小则为 1.0）；
/// 末端骨骼：拉伸取回退常数，目标方向 = 静止方向（即不旋转）。
pub fn bone_target(ctx: &SkinningContext, vertex: &SkinnedVertex, bones: &BoneStateTable) -> (f32, Vec3) {
    let live = usize::try_from(vertex.bone_id).ok().and_then(|id| bones.get(id));
    match live {
        Some(bone) => (
            bone.stretch(vertex.rest_length, ctx.config.rest_length_epsilon),
            bone.direction,
        ),
        None => (ctx.config.fallback_stretch, vertex.rest_direction),
    }
}

/// 重建单个顶点
///
/// 骨骼 id 超出当前关键点范围时返回 None（该顶点不渲染）。
/// 纯函数：相同输入总得到相同输出。
pub fn reconstruct_vertex(
    ctx: &SkinningContext,
    vertex: &SkinnedVertex,
    points: &[Vec3],
    bones: &BoneStateTable,
) -> Option<SkinnedVertexOut> {
    let joint = points[vertex.joint_index(points.len())?];
    let (stretch, target_dir) = bone_target(ctx, vertex, bones);
    let epsilon = ctx.config.rotation_epsilon;

    // 只拉伸沿骨骼分量，截面偏移保持不变（仅乘外观系数）
    let stretched_proj = vertex.projection * stretch;
    let offset = vertex.rest_direction * stretched_proj + vertex.perpendicular * ctx.config.thickness_scale;

    let offset = rotate_between(offset, vertex.rest_direction, target_dir, epsilon);
    // 法线单独旋转，不拉伸，也不重新单位化
    let normal = rotate_between(vertex.normal, vertex.rest_direction, target_dir, epsilon);

    Some(SkinnedVertexOut {
        position: joint + offset,
        normal,
    })
}

/// 对一只手重建整张网格
///
/// 骨骼状态表在此构建，只属于这一次调用。
pub fn compute_hand_frame(ctx: &SkinningContext, mesh: &SkinnedMesh, points: &[Vec3]) -> SkinnedFrame {
    let bones = BoneStateTable::extract(points);

    let results: Vec<Option<SkinnedVertexOut>> = if ctx.config.parallel {
        mesh.vertices
            .par_iter()
            .map(|v| reconstruct_vertex(ctx, v, points, &bones))
            .collect()
    } else {
        mesh.vertices
            .iter()
            .map(|v| reconstruct_vertex(ctx, v, points, &bones))
            .collect()
    };

    let vertex_count = mesh.vertices.len();
    let mut frame = SkinnedFrame {
        positions: Vec::with_capacity(vertex_count),
        normals: Vec::with_capacity(vertex_count),
        colors: Vec::with_capacity(vertex_count),
        visible: Vec::with_capacity(vertex_count),
        triangles: Vec::new(),
    };

    for (vertex, result) in mesh.vertices.iter().zip(&results) {
        let out = result.unwrap_or(SkinnedVertexOut {
            position: Vec3::ZERO,
            normal: Vec3::ZERO,
        });
        frame.positions.push(out.position);
        frame.normals.push(out.normal);
        frame.colors.push(vertex_color(vertex.bone_id));
        frame.visible.push(result.is_some());
    }

    frame.triangles = mesh
        .faces
        .iter()
        .filter(|f| {
            f.indices()
                .iter()
                .all(|&i| frame.visible.get(i).copied().unwrap_or(false))
        })
        .map(|f| f.0)
        .collect();

    frame
}

/// 对整帧快照重建所有手
///
/// 每只手按标签选择网格，各自独立构建骨骼状态表；
/// 所有顶点使用同一份快照。
pub fn compute_frame(ctx: &SkinningContext, meshes: &HandMeshes, snapshot: &FrameSnapshot) -> Vec<HandRender> {
    snapshot
        .hands
        .iter()
        .map(|hand| {
            let mesh = meshes
                .for_label(hand.label)
                .map(|mesh| compute_hand_frame(ctx, mesh, &hand.points));
            // 球体只用来填网格裂缝，没有网格就不生成
            let spheres = if mesh.is_some() {
                joint_spheres(&hand.points)
            } else {
                Vec::new()
            };
            HandRender {
                label: hand.label,
                mesh,
                spheres,
                skeleton: skeleton_lines(&hand.points),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DeformConfig;
    use crate::model::Triangle;
    use crate::overlay::{normal_to_view, to_view_space};
    use crate::skeleton::JOINT_COUNT;
    use crate::tracking::{DetectedHand, HandLabel};

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    /// 所有关节沿 +Y 排成一列，间距 1
    fn straight_hand(spacing: f32) -> Vec<Vec3> {
        (0..JOINT_COUNT).map(|i| Vec3::new(0.0, i as f32 * spacing, 0.0)).collect()
    }

    fn vertex(bone_id: i32, rest_length: f32, projection: f32, perpendicular: Vec3) -> SkinnedVertex {
        SkinnedVertex {
            bone_id,
            rest_length,
            projection,
            perpendicular,
            normal: Vec3::X,
            rest_direction: Vec3::Y,
        }
    }

    fn unit_ctx() -> SkinningContext {
        SkinningContext::new(DeformConfig {
            thickness_scale: 1.0,
            ..DeformConfig::default()
        })
    }

    #[test]
    fn test_identity_pose() {
        // 静止骨骼 (0,0,0)->(0,1,0)，实时相同：拉伸 1，偏移不变
        let ctx = unit_ctx();
        let points = straight_hand(1.0);
        let bones = BoneStateTable::extract(&points);
        let v = vertex(1, 1.0, 0.3, Vec3::new(0.2, 0.0, 0.1));

        let (stretch, dir) = bone_target(&ctx, &v, &bones);
        assert!((stretch - 1.0).abs() < 1e-6);
        assert!(approx(dir, Vec3::Y));

        let out = reconstruct_vertex(&ctx, &v, &points, &bones).unwrap();
        assert!(approx(out.position, points[1] + Vec3::new(0.2, 0.3, 0.1)));
        assert!(approx(out.normal, Vec3::X));
    }

    #[test]
    fn test_doubled_bone_length() {
        let ctx = unit_ctx();
        let points = straight_hand(2.0);
        let bones = BoneStateTable::extract(&points);
        let perp = Vec3::new(0.0, 0.0, 0.25);
        let v = vertex(1, 1.0, 0.4, perp);

        let (stretch, _) = bone_target(&ctx, &v, &bones);
        assert!((stretch - 2.0).abs() < 1e-6);

        let offset = reconstruct_vertex(&ctx, &v, &points, &bones).unwrap().position - points[1];
        // 沿骨骼分量加倍，垂直分量不变
        assert!((offset.dot(Vec3::Y) - 0.8).abs() < 1e-6);
        assert!(approx(offset - Vec3::Y * offset.dot(Vec3::Y), perp));
    }

    #[test]
    fn test_stretch_matches_ratio_for_every_bone() {
        let ctx = SkinningContext::default();
        let points: Vec<Vec3> = (0..JOINT_COUNT)
            .map(|i| Vec3::new((i as f32 * 0.37).sin(), i as f32 * 0.1, (i as f32).cos() * 0.05))
            .collect();
        let bones = BoneStateTable::extract(&points);

        for id in 0..JOINT_COUNT {
            let v = vertex(id as i32, 0.05, 0.01, Vec3::ZERO);
            let (stretch, _) = bone_target(&ctx, &v, &bones);
            match bones.get(id) {
                Some(bone) => assert!((stretch - bone.length / 0.05).abs() < 1e-4),
                None => assert_eq!(stretch, ctx.config.fallback_stretch),
            }
        }
    }

    #[test]
    fn test_degenerate_rest_length() {
        let ctx = SkinningContext::default();
        let bones = BoneStateTable::extract(&straight_hand(3.0));
        let v = vertex(1, 0.00005, 0.1, Vec3::ZERO);
        assert_eq!(bone_target(&ctx, &v, &bones).0, 1.0);
    }

    #[test]
    fn test_terminal_bone_fallback() {
        let ctx = unit_ctx();
        let points = straight_hand(1.0);
        let bones = BoneStateTable::extract(&points);
        // 指尖骨骼 8 没有子关节
        let mut v = vertex(8, 1.0, 0.1, Vec3::ZERO);
        v.rest_direction = Vec3::X;

        let (stretch, dir) = bone_target(&ctx, &v, &bones);
        assert_eq!(stretch, 3.5);
        assert_eq!(dir, Vec3::X);

        let out = reconstruct_vertex(&ctx, &v, &points, &bones).unwrap();
        assert!(approx(out.position, points[8] + Vec3::X * 0.35));
        assert_eq!(out.normal, v.normal);
    }

    #[test]
    fn test_out_of_range_bone_is_skipped() {
        let ctx = SkinningContext::default();
        let points = straight_hand(1.0);
        let bones = BoneStateTable::extract(&points);
        assert!(reconstruct_vertex(&ctx, &vertex(21, 1.0, 0.1, Vec3::ZERO), &points, &bones).is_none());
        assert!(reconstruct_vertex(&ctx, &vertex(-3, 1.0, 0.1, Vec3::ZERO), &points, &bones).is_none());
        assert!(reconstruct_vertex(&ctx, &vertex(0, 1.0, 0.1, Vec3::ZERO), &[], &BoneStateTable::default()).is_none());
    }

    #[test]
    fn test_rotation_follows_bone() {
        // 骨骼 1->2 从 +Y 转到 +X
        let ctx = unit_ctx();
        let mut points = straight_hand(1.0);
        points[2] = points[1] + Vec3::X;
        let bones = BoneStateTable::extract(&points);
        let v = vertex(1, 1.0, 0.5, Vec3::new(0.0, 0.0, 0.2));

        let out = reconstruct_vertex(&ctx, &v, &points, &bones).unwrap();
        assert!(approx(out.position, points[1] + Vec3::new(0.5, 0.0, 0.2)));
        // 法线 X 绕 -Z 转 90° 变为 -Y
        assert!(approx(out.normal, -Vec3::Y));
    }

    #[test]
    fn test_reconstruction_is_pure() {
        let ctx = SkinningContext::default();
        let mut points = straight_hand(0.05);
        points[6] += Vec3::new(0.02, -0.01, 0.03);
        let bones = BoneStateTable::extract(&points);
        let v = vertex(5, 0.04, 0.02, Vec3::new(0.003, 0.0, -0.004));

        let a = reconstruct_vertex(&ctx, &v, &points, &bones);
        let b = reconstruct_vertex(&ctx, &v, &points, &BoneStateTable::extract(&points));
        assert_eq!(a, b);
    }

    fn strip_mesh() -> SkinnedMesh {
        SkinnedMesh::new(
            vec![
                vertex(0, 5.0, 0.1, Vec3::X * 0.01),
                vertex(1, 1.0, 0.2, Vec3::Z * 0.01),
                vertex(2, 1.0, 0.3, Vec3::ZERO),
                vertex(20, 1.0, 0.0, Vec3::ZERO),
                vertex(42, 1.0, 0.0, Vec3::ZERO),
            ],
            vec![Triangle::new(0, 1, 2), Triangle::new(1, 2, 3), Triangle::new(2, 3, 4)],
        )
    }

    #[test]
    fn test_hand_frame_skips_invisible_triangles() {
        let ctx = SkinningContext::default();
        let frame = compute_hand_frame(&ctx, &strip_mesh(), &straight_hand(1.0));

        assert_eq!(frame.vertex_count(), 5);
        assert_eq!(frame.visible, vec![true, true, true, true, false]);
        assert_eq!(frame.visible_count(), 4);
        assert_eq!(frame.triangles, vec![[0, 1, 2], [1, 2, 3]]);
        assert_eq!(frame.positions[4], Vec3::ZERO);
        assert_eq!(frame.positions_raw().len(), 15);
        assert_eq!(frame.normals_raw().len(), 15);
    }

    #[test]
    fn test_hand_frame_with_no_joints_is_empty() {
        let ctx = SkinningContext::default();
        let frame = compute_hand_frame(&ctx, &strip_mesh(), &[]);
        assert_eq!(frame.visible_count(), 0);
        assert!(frame.is_empty());
        assert!(frame.triangles.is_empty());
    }

    #[test]
    fn test_faceless_mesh_is_not_empty() {
        let ctx = SkinningContext::default();
        let mesh = SkinnedMesh::new(vec![vertex(1, 1.0, 0.2, Vec3::ZERO)], vec![]);
        let frame = compute_hand_frame(&ctx, &mesh, &straight_hand(1.0));
        assert!(frame.triangles.is_empty());
        assert_eq!(frame.visible_count(), 1);
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_truncated_detection_uses_fallback() {
        // 只有 0..=5 六个点：骨骼 5 缺少子关节 6，骨骼 6 的关节本身越界
        let ctx = unit_ctx();
        let points = &straight_hand(1.0)[..6];
        let bones = BoneStateTable::extract(points);
        let mut tip_side = vertex(5, 1.0, 0.2, Vec3::new(0.0, 0.0, 0.1));
        tip_side.rest_direction = Vec3::X;

        let (stretch, dir) = bone_target(&ctx, &tip_side, &bones);
        assert_eq!(stretch, 3.5);
        assert_eq!(dir, Vec3::X);

        let out = reconstruct_vertex(&ctx, &tip_side, points, &bones).unwrap();
        assert!(approx(out.position, points[5] + Vec3::new(0.2 * 3.5, 0.0, 0.1)));
        assert_eq!(out.normal, tip_side.normal);

        assert!(reconstruct_vertex(&ctx, &vertex(6, 1.0, 0.2, Vec3::ZERO), points, &bones).is_none());

        let mesh = SkinnedMesh::new(
            vec![tip_side.clone(), vertex(6, 1.0, 0.2, Vec3::ZERO), vertex(0, 5.0, 0.1, Vec3::ZERO)],
            vec![Triangle::new(0, 1, 2)],
        );
        let frame = compute_hand_frame(&ctx, &mesh, points);
        assert_eq!(frame.visible, vec![true, false, true]);
        assert!(frame.triangles.is_empty());
        assert!(approx(frame.positions[0], out.position));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut points = straight_hand(0.04);
        points[3] += Vec3::new(0.01, 0.0, 0.02);
        let sequential = compute_hand_frame(&SkinningContext::default(), &strip_mesh(), &points);
        let parallel_ctx = SkinningContext::new(DeformConfig {
            parallel: true,
            ..DeformConfig::default()
        });
        let parallel = compute_hand_frame(&parallel_ctx, &strip_mesh(), &points);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_two_hands_use_their_own_meshes() {
        let ctx = unit_ctx();
        let right = SkinnedMesh::new(vec![vertex(1, 1.0, 0.5, Vec3::ZERO)], vec![]);
        let left = SkinnedMesh::new(vec![vertex(1, 1.0, 0.5, Vec3::ZERO), vertex(2, 1.0, 0.0, Vec3::ZERO)], vec![]);
        let meshes = HandMeshes::new(Some(right), Some(left));

        let right_points = straight_hand(1.0);
        let mut left_points = straight_hand(2.0);
        left_points[2] = left_points[1] + Vec3::X * 2.0;

        let snapshot = FrameSnapshot::new(vec![
            DetectedHand::new(HandLabel::Left, left_points.clone()),
            DetectedHand::new(HandLabel::Right, right_points.clone()),
        ]);
        let renders = compute_frame(&ctx, &meshes, &snapshot);
        assert_eq!(renders.len(), 2);

        let left_frame = renders[0].mesh.as_ref().unwrap();
        assert_eq!(renders[0].label, HandLabel::Left);
        assert_eq!(left_frame.vertex_count(), 2);
        assert!(approx(left_frame.positions[0], left_points[1] + Vec3::X * 1.0));

        // 右手不受左手骨骼状态影响
        let right_frame = renders[1].mesh.as_ref().unwrap();
        assert_eq!(right_frame.vertex_count(), 1);
        assert!(approx(right_frame.positions[0], right_points[1] + Vec3::Y * 0.5));
        assert_eq!(renders[1].spheres.len(), JOINT_COUNT);
    }

    #[test]
    fn test_missing_mesh_renders_overlay_only() {
        let ctx = SkinningContext::default();
        let meshes = HandMeshes::new(Some(strip_mesh()), None);
        let snapshot = FrameSnapshot::new(vec![DetectedHand::new(HandLabel::Left, straight_hand(1.0))]);
        let renders = compute_frame(&ctx, &meshes, &snapshot);
        assert!(renders[0].mesh.is_none());
        assert!(renders[0].spheres.is_empty());
        assert_eq!(renders[0].skeleton.len(), 20);
    }

    #[test]
    fn test_unrecognized_labels_get_no_mesh() {
        let ctx = SkinningContext::default();
        let meshes = HandMeshes::new(Some(strip_mesh()), None);
        let points: Vec<String> = (0..JOINT_COUNT)
            .map(|i| format!("{{\"x\": 0.5, \"y\": {}, \"z\": 0.0}}", i as f32 * 0.01))
            .collect();
        let json = format!(
            "[{{\"label\": \"Unknown\", \"landmarks\": [{0}]}}, {{\"label\": \"left\", \"landmarks\": [{0}]}}]",
            points.join(",")
        );
        let snapshot = FrameSnapshot::new(crate::model::parse_hand_data(&json));
        let renders = compute_frame(&ctx, &meshes, &snapshot);

        assert_eq!(renders.len(), 2);
        for render in &renders {
            assert_eq!(render.label, HandLabel::Unknown);
            assert!(render.mesh.is_none());
            assert!(render.spheres.is_empty());
            assert_eq!(render.skeleton.len(), 20);
        }
    }

    #[test]
    fn test_render_in_view_space() {
        let ctx = SkinningContext::default();
        let meshes = HandMeshes::new(Some(strip_mesh()), None);
        let points = straight_hand(0.01);
        let snapshot = FrameSnapshot::new(vec![DetectedHand::new(HandLabel::Right, points.clone())]);
        let render = compute_frame(&ctx, &meshes, &snapshot).remove(0);
        let view = render.in_view_space();

        let frame = render.mesh.as_ref().unwrap();
        let view_frame = view.mesh.as_ref().unwrap();
        assert_eq!(view_frame.positions[0], to_view_space(frame.positions[0]));
        assert_eq!(view_frame.normals[1], normal_to_view(frame.normals[1]));
        // 不可见顶点保持为零
        assert_eq!(view_frame.positions[4], Vec3::ZERO);
        assert_eq!(view.spheres[3].center, to_view_space(points[3]));
        assert_eq!(view.skeleton[0].1, to_view_space(points[1]));
    }

    #[test]
    fn test_empty_snapshot_renders_nothing() {
        let renders = compute_frame(&SkinningContext::default(), &HandMeshes::default(), &FrameSnapshot::default());
        assert!(renders.is_empty());
    }
}
