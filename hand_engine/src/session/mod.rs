//! 会话驱动：定时轮询外部追踪进程的输出并逐帧重建
//!
//! 单线程、严格顺序：读取 -> 检查结束标志 -> 重建 -> 交给消费者。
//! 同一次 tick 内所有顶点使用同一份快照。

use std::fs;
use std::io::ErrorKind;
use std::thread;
use std::time::Instant;

use crate::config::{get_config, SessionConfig};
use crate::model::{load_hand_data, HandMeshes};
use crate::skinning::{compute_frame, HandRender, SkinningContext};
use crate::tracking::{FrameSnapshot, HandLabel};
use crate::Result;

/// 一次轮询的结果
#[derive(Clone, Debug, Default)]
pub struct Poll {
    pub snapshot: FrameSnapshot,
    /// 外部进程已发出结束信号
    pub done: bool,
}

/// 手部重建会话
pub struct HandSession {
    pub config: SessionConfig,
    pub context: SkinningContext,
    meshes: HandMeshes,
    frames_rendered: u64,
    debug_logged: bool,
}

impl HandSession {
    pub fn new(config: SessionConfig, context: SkinningContext, meshes: HandMeshes) -> Self {
        Self {
            config,
            context,
            meshes,
            frames_rendered: 0,
            debug_logged: false,
        }
    }

    /// 按会话配置加载网格，变形参数取全局默认配置
    pub fn open(config: SessionConfig) -> Self {
        let meshes = HandMeshes::load(&config);
        log::info!(
            "会话初始化: 右手网格={}, 左手网格={}",
            meshes.is_loaded(HandLabel::Right),
            meshes.is_loaded(HandLabel::Left)
        );
        Self::new(config, SkinningContext::new(get_config()), meshes)
    }

    pub fn meshes(&self) -> &HandMeshes {
        &self.meshes
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// 清理上一次运行残留的结束标志
    pub fn startup(&self) -> Result<()> {
        match fs::remove_file(self.config.done_flag_path()) {
            Ok(()) => {
                log::info!("已清理残留的结束标志");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// 读取一帧输入（整体替换上一帧）
    pub fn poll(&self) -> Poll {
        Poll {
            snapshot: FrameSnapshot::new(load_hand_data(self.config.landmark_path())),
            done: self.config.done_flag_path().exists(),
        }
    }

    /// 重建一帧
    pub fn render(&mut self, snapshot: &FrameSnapshot) -> Vec<HandRender> {
        let renders = compute_frame(&self.context, &self.meshes, snapshot);
        self.frames_rendered += 1;

        // 调试日志（只在首次有网格输出时执行）
        if !self.debug_logged {
            if let Some(frame) = renders.iter().find_map(|r| r.mesh.as_ref()) {
                self.debug_logged = true;
                log::debug!(
                    "首帧重建: vertex_count={}, visible={}, triangles={}",
                    frame.vertex_count(),
                    frame.visible_count(),
                    frame.triangles.len()
                );
            }
        }

        renders
    }

    /// 执行一次 tick；收到结束信号时返回 None，不再重建
    pub fn tick(&mut self) -> Option<Vec<HandRender>> {
        let poll = self.poll();
        if poll.done {
            return None;
        }
        Some(self.render(&poll.snapshot))
    }

    /// 主循环：按固定间隔 tick，直到结束标志出现或回调返回 false
    ///
    /// 返回重建的帧数。
    pub fn run<F>(&mut self, mut on_frame: F) -> Result<u64>
    where
        F: FnMut(&[HandRender]) -> bool,
    {
        self.startup()?;
        let start_frames = self.frames_rendered;

        loop {
            let tick_start = Instant::now();

            let Some(renders) = self.tick() else {
                log::info!("收到结束信号，退出");
                break;
            };
            if !on_frame(&renders) {
                break;
            }

            let elapsed = tick_start.elapsed();
            if elapsed < self.config.tick_interval {
                thread::sleep(self.config.tick_interval - elapsed);
            }
        }

        Ok(self.frames_rendered - start_frames)
    }
}
