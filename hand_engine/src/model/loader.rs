//! JSON 资源加载
//!
//! 网格文件：`{ "faces": [[i,j,k],...], "vertices": [{bid,len,proj,px,py,pz,nx,ny,nz,rvx,rvy,rvz}] }`
//! 关键点文件：`[{ "label": "Left"|"Right", "landmarks": [{x,y,z},...] }]`

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::tracking::{DetectedHand, HandLabel, Landmark};
use crate::{HandError, Result};

use super::{SkinnedMesh, SkinnedVertex, Triangle};

#[derive(Serialize, Deserialize)]
struct RawVertex {
    bid: i32,
    len: f32,
    proj: f32,
    px: f32,
    py: f32,
    pz: f32,
    nx: f32,
    ny: f32,
    nz: f32,
    rvx: f32,
    rvy: f32,
    rvz: f32,
}

#[derive(Serialize, Deserialize)]
struct RawMesh {
    faces: Vec<[u32; 3]>,
    vertices: Vec<RawVertex>,
}

#[derive(Deserialize)]
struct RawHand {
    label: Option<String>,
    #[serde(default)]
    landmarks: Vec<Landmark>,
}

impl From<RawVertex> for SkinnedVertex {
    fn from(v: RawVertex) -> Self {
        Self {
            bone_id: v.bid,
            rest_length: v.len,
            projection: v.proj,
            perpendicular: Vec3::new(v.px, v.py, v.pz),
            normal: Vec3::new(v.nx, v.ny, v.nz),
            rest_direction: Vec3::new(v.rvx, v.rvy, v.rvz),
        }
    }
}

impl From<&SkinnedVertex> for RawVertex {
    fn from(v: &SkinnedVertex) -> Self {
        Self {
            bid: v.bone_id,
            len: v.rest_length,
            proj: v.projection,
            px: v.perpendicular.x,
            py: v.perpendicular.y,
            pz: v.perpendicular.z,
            nx: v.normal.x,
            ny: v.normal.y,
            nz: v.normal.z,
            rvx: v.rest_direction.x,
            rvy: v.rest_direction.y,
            rvz: v.rest_direction.z,
        }
    }
}

/// 从文件加载网格
pub fn load_skinned_mesh<P: AsRef<Path>>(path: P) -> Result<SkinnedMesh> {
    let content = fs::read_to_string(path.as_ref())?;
    let mesh = parse_skinned_mesh(&content)?;
    log::info!(
        "网格加载完成: {} ({} 个顶点, {} 个面)",
        path.as_ref().display(),
        mesh.vertex_count(),
        mesh.face_count()
    );
    Ok(mesh)
}

/// 解析网格 JSON，面索引越界视为格式错误
pub fn parse_skinned_mesh(content: &str) -> Result<SkinnedMesh> {
    let raw: RawMesh = serde_json::from_str(content)?;
    let mesh = SkinnedMesh {
        vertices: raw.vertices.into_iter().map(SkinnedVertex::from).collect(),
        faces: raw.faces.into_iter().map(Triangle).collect(),
    };

    if let Some(face) = mesh.first_invalid_face() {
        return Err(HandError::MeshFormat(format!(
            "face {} references vertex outside 0..{}",
            face,
            mesh.vertex_count()
        )));
    }
    Ok(mesh)
}

/// 保存网格（烘焙输出）
pub fn save_skinned_mesh<P: AsRef<Path>>(mesh: &SkinnedMesh, path: P) -> Result<()> {
    let raw = RawMesh {
        faces: mesh.faces.iter().map(|f| f.0).collect(),
        vertices: mesh.vertices.iter().map(RawVertex::from).collect(),
    };
    let json = serde_json::to_string(&raw)?;
    fs::write(path.as_ref(), json)?;
    log::info!("网格已保存: {}", path.as_ref().display());
    Ok(())
}

/// 读取当前帧关键点
///
/// 文件不存在、为空、写到一半或格式错误时返回空列表，不报错：
/// 没有数据就是一个空帧，下一次轮询自然恢复。
pub fn load_hand_data<P: AsRef<Path>>(path: P) -> Vec<DetectedHand> {
    match fs::read_to_string(path.as_ref()) {
        Ok(content) => parse_hand_data(&content),
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            log::debug!("读取关键点失败 {}: {}", path.as_ref().display(), e);
            Vec::new()
        }
    }
}

/// 解析关键点 JSON（容错同 `load_hand_data`）
pub fn parse_hand_data(content: &str) -> Vec<DetectedHand> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<RawHand>>(content) {
        Ok(raw) => raw
            .into_iter()
            .map(|h| DetectedHand {
                label: HandLabel::parse(h.label.as_deref()),
                points: h.landmarks.into_iter().map(Vec3::from).collect(),
            })
            .collect(),
        Err(e) => {
            log::debug!("关键点 JSON 无效，忽略本帧: {}", e);
            Vec::new()
        }
    }
}
