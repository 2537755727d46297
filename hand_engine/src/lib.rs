//! Hand Engine - 基于骨骼相对参数化的手部网格重建
//!
//! 根据实时追踪到的 21 个手部关键点，逐帧变形预烘焙的参考网格：
//! - 骨骼相对顶点分解（烘焙阶段）
//! - 逐帧骨骼状态提取
//! - Rodrigues 旋转 + 沿骨骼拉伸的顶点重建
//! - 关节球体 / 骨架叠加层
//! - 基于文件轮询的会话驱动

pub mod bake;
pub mod config;
pub mod math;
pub mod model;
pub mod overlay;
pub mod session;
pub mod skeleton;
pub mod skinning;
pub mod tracking;

pub use bake::{bake_mesh, MANO_JOINT_COUNT};
pub use config::{DeformConfig, SessionConfig};
pub use model::{load_hand_data, load_skinned_mesh, save_skinned_mesh, HandMeshes, SkinnedMesh, SkinnedVertex, Triangle};
pub use session::HandSession;
pub use skeleton::{BoneStateTable, JointRole, JOINT_COUNT};
pub use skinning::{compute_frame, compute_hand_frame, HandRender, SkinnedFrame, SkinningContext};
pub use tracking::{DetectedHand, FrameSnapshot, HandLabel, Landmark};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HandError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Mesh format error: {0}")]
    MeshFormat(String),

    #[error("Bake error: {0}")]
    Bake(String),
}

pub type Result<T> = std::result::Result<T, HandError>;
