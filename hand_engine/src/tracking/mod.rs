//! 外部追踪进程的逐帧输入

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// 归一化坐标下的关键点（x/y 通常在 [0,1]，z 为相对深度）
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Landmark> for Vec3 {
    fn from(lm: Landmark) -> Self {
        Vec3::new(lm.x, lm.y, lm.z)
    }
}

impl From<Vec3> for Landmark {
    fn from(v: Vec3) -> Self {
        Self { x: v.x, y: v.y, z: v.z }
    }
}

/// 左右手标签，决定使用哪套网格
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum HandLabel {
    Left,
    Right,
    /// 无法识别的标签：不选网格，只渲染骨架线
    Unknown,
}

impl HandLabel {
    /// 缺失标签默认为右手；"Left"/"Right" 以外的显式标签为 Unknown
    pub fn parse(label: Option<&str>) -> Self {
        match label {
            None | Some("Right") => HandLabel::Right,
            Some("Left") => HandLabel::Left,
            Some(_) => HandLabel::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandLabel::Left => "Left",
            HandLabel::Right => "Right",
            HandLabel::Unknown => "Unknown",
        }
    }
}

/// 当前帧检测到的一只手
#[derive(Clone, Debug, PartialEq)]
pub struct DetectedHand {
    pub label: HandLabel,
    pub points: Vec<Vec3>,
}

impl DetectedHand {
    pub fn new(label: HandLabel, points: Vec<Vec3>) -> Self {
        Self { label, points }
    }
}

/// 一次轮询得到的完整输入快照，整体替换，不做增量更新
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameSnapshot {
    pub hands: Vec<DetectedHand>,
}

impl FrameSnapshot {
    pub fn new(hands: Vec<DetectedHand>) -> Self {
        Self { hands }
    }

    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    pub fn hand_count(&self) -> usize {
        self.hands.len()
    }
}
