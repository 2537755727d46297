//! 变形与会话配置
//!
//! 变形参数扁平化，直接在代码中修改默认值即可。
//! 重建函数不会隐式读取全局配置，而是通过 `SkinningContext` 显式传入。

use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;

use crate::math::DEFAULT_ROTATION_EPSILON;

/// 变形配置（扁平化，不嵌套）
#[derive(Debug, Clone, PartialEq)]
pub struct DeformConfig {
    // ========== 拉伸 ==========
    /// 末端骨骼（没有实时方向）的回退拉伸系数，默认 3.5
    /// 纯经验值，没有物理含义
    pub fallback_stretch: f32,
    /// 静止骨骼长度小于此值时拉伸固定为 1.0，默认 0.0001
    pub rest_length_epsilon: f32,

    // ========== 体积 ==========
    /// 垂直偏移（截面体积）缩放，默认 2.4
    /// 纯外观调节值
    pub thickness_scale: f32,

    // ========== 旋转 ==========
    /// 旋转角正弦值低于此阈值时视为无旋转，默认 0.001
    /// 注意：接近 180° 的反向弯曲同样会落入此分支
    pub rotation_epsilon: f32,

    // ========== 性能 ==========
    /// 是否使用 rayon 并行重建顶点，默认 false
    /// 并行与串行结果完全一致
    pub parallel: bool,
}

impl Default for DeformConfig {
    fn default() -> Self {
        Self {
            fallback_stretch: 3.5,
            rest_length_epsilon: 0.0001,
            thickness_scale: 2.4,
            rotation_epsilon: DEFAULT_ROTATION_EPSILON,
            parallel: false,
        }
    }
}

/// 会话配置（文件轮询驱动）
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 资源目录
    pub asset_dir: PathBuf,
    /// 外部追踪进程写出的关键点文件
    pub landmark_file: String,
    /// 外部进程结束标志文件
    pub done_flag: String,
    /// 右手网格
    pub right_mesh_file: String,
    /// 左手网格
    pub left_mesh_file: String,
    /// 轮询间隔，默认 33ms（约 30 FPS）
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("assets"),
            landmark_file: "current.json".to_string(),
            done_flag: "done.flag".to_string(),
            right_mesh_file: "mano_right.json".to_string(),
            left_mesh_file: "mano_left.json".to_string(),
            tick_interval: Duration::from_millis(33),
        }
    }
}

impl SessionConfig {
    pub fn with_asset_dir(asset_dir: impl Into<PathBuf>) -> Self {
        Self {
            asset_dir: asset_dir.into(),
            ..Self::default()
        }
    }

    pub fn landmark_path(&self) -> PathBuf {
        self.asset_dir.join(&self.landmark_file)
    }

    pub fn done_flag_path(&self) -> PathBuf {
        self.asset_dir.join(&self.done_flag)
    }

    pub fn right_mesh_path(&self) -> PathBuf {
        self.asset_dir.join(&self.right_mesh_file)
    }

    pub fn left_mesh_path(&self) -> PathBuf {
        self.asset_dir.join(&self.left_mesh_file)
    }
}

/// 全局默认变形配置
static DEFORM_CONFIG: Lazy<RwLock<DeformConfig>> = Lazy::new(|| {
    RwLock::new(DeformConfig::default())
});

/// 获取当前默认配置（只读副本）
pub fn get_config() -> DeformConfig {
    match DEFORM_CONFIG.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// 手动设置默认配置（用于运行时调试）
pub fn set_config(config: DeformConfig) {
    match DEFORM_CONFIG.write() {
        Ok(mut guard) => *guard = config,
        Err(poisoned) => *poisoned.into_inner() = config,
    }
}

/// 重置为默认配置
pub fn reset_config() {
    set_config(DeformConfig::default());
}
