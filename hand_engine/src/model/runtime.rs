//! 运行时网格集合（左右手）

use std::path::Path;
use std::sync::Arc;

use crate::config::SessionConfig;
use crate::tracking::HandLabel;

use super::{load_skinned_mesh, SkinnedMesh};

/// 左右手静态网格
///
/// 网格用 `Arc` 共享，加载后只读；缺失或为空的网格为 `None`，对应的手不渲染。
#[derive(Clone, Debug, Default)]
pub struct HandMeshes {
    pub right: Option<Arc<SkinnedMesh>>,
    pub left: Option<Arc<SkinnedMesh>>,
}

impl HandMeshes {
    pub fn new(right: Option<SkinnedMesh>, left: Option<SkinnedMesh>) -> Self {
        Self {
            right: right.filter(|m| !m.is_empty()).map(Arc::new),
            left: left.filter(|m| !m.is_empty()).map(Arc::new),
        }
    }

    /// 按会话配置加载左右手网格
    pub fn load(config: &SessionConfig) -> Self {
        let right = load_optional(&config.right_mesh_path(), HandLabel::Right);
        let left = load_optional(&config.left_mesh_path(), HandLabel::Left);
        Self::new(right, left)
    }

    /// 按标签选择网格；Unknown 没有网格
    pub fn for_label(&self, label: HandLabel) -> Option<&Arc<SkinnedMesh>> {
        match label {
            HandLabel::Right => self.right.as_ref(),
            HandLabel::Left => self.left.as_ref(),
            HandLabel::Unknown => None,
        }
    }

    pub fn is_loaded(&self, label: HandLabel) -> bool {
        self.for_label(label).is_some()
    }
}

fn load_optional(path: &Path, label: HandLabel) -> Option<SkinnedMesh> {
    match load_skinned_mesh(path) {
        Ok(mesh) if mesh.is_empty() => {
            log::warn!("{} 手网格没有顶点，跳过: {}", label.as_str(), path.display());
            None
        }
        Ok(mesh) => Some(mesh),
        Err(e) => {
            log::warn!("{} 手网格加载失败 {}: {}", label.as_str(), path.display(), e);
            None
        }
    }
}
