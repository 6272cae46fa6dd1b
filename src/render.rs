use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{RestorePosition, SavePosition};
use crossterm::queue;
use crossterm::terminal::{Clear, ClearType};

use crate::config::{FMT_DW_STR, FMT_PAD, FMT_UP_STR};
use crate::error::NetspError;
use crate::format::format_bytes;
use crate::monitor::{InterfaceStats, TrafficMonitor};

/// 等待期间检查停止标志的粒度
const STOP_POLL: Duration = Duration::from_millis(100);

// ==================== 运行控制 ====================

/// 决定渲染循环跑多少帧：帧数上限 + 外部停止标志（Ctrl+C）
#[derive(Debug, Clone)]
pub struct RunControl {
    limit: Option<u64>,
    stop: Arc<AtomicBool>,
}

impl RunControl {
    pub fn forever() -> Self {
        Self {
            limit: None,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn frames(n: u64) -> Self {
        Self {
            limit: Some(n),
            ..Self::forever()
        }
    }

    pub fn from_limit(limit: Option<u64>) -> Self {
        match limit {
            Some(n) => Self::frames(n),
            None => Self::forever(),
        }
    }

    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    fn has_next(&self, drawn: u64) -> bool {
        !self.is_stopped() && self.limit.map_or(true, |n| drawn < n)
    }

    /// 睡眠 interval，收到停止请求时提前返回
    fn pause(&self, interval: Duration) {
        let deadline = Instant::now() + interval;
        while !self.is_stopped() {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(STOP_POLL));
        }
    }
}

// ==================== 渲染器 ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    /// 尚未记录光标位置
    Idle,
    /// 循环刷新中
    Rendering,
}

pub struct Renderer<W: Write> {
    out: W,
    interval: Duration,
    state: RenderState,
}

impl<W: Write> Renderer<W> {
    pub fn new(out: W, interval: Duration) -> Self {
        Self {
            out,
            interval,
            state: RenderState::Idle,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// 记录起始光标位置，之后每帧都回到这里覆盖输出
    pub fn start(&mut self) -> Result<(), NetspError> {
        queue!(self.out, SavePosition).map_err(NetspError::DisplayInit)?;
        self.out.flush().map_err(NetspError::DisplayInit)?;
        self.state = RenderState::Rendering;
        Ok(())
    }

    /// 绘制一帧
    pub fn draw<M: TrafficMonitor>(&mut self, monitor: &mut M) -> Result<(), NetspError> {
        if self.state == RenderState::Idle {
            self.start()?;
        }

        let pad = monitor.name_width();
        queue!(self.out, RestorePosition).map_err(NetspError::Display)?;
        for iface in monitor.sample() {
            self.out
                .write_all(format_line(&iface, pad).as_bytes())
                .map_err(NetspError::Display)?;
            queue!(self.out, Clear(ClearType::UntilNewLine)).map_err(NetspError::Display)?;
            self.out.write_all(b"\n").map_err(NetspError::Display)?;
        }
        self.out.flush().map_err(NetspError::Display)
    }

    /// 渲染循环，返回已绘制的帧数
    pub fn run<M: TrafficMonitor>(
        &mut self,
        monitor: &mut M,
        control: &RunControl,
    ) -> Result<u64, NetspError> {
        self.start()?;
        tracing::info!(monitor = monitor.name(), "rendering started");

        let mut drawn = 0;
        while control.has_next(drawn) {
            self.draw(monitor)?;
            drawn += 1;
            if control.has_next(drawn) {
                control.pause(self.interval);
            }
        }

        tracing::info!(frames = drawn, "rendering stopped");
        Ok(drawn)
    }
}

/// 单行输出：名称 [累计] ↑: 发送 ↓: 接收
pub fn format_line(iface: &InterfaceStats<'_>, pad: usize) -> String {
    let stats = &iface.stats;
    format!(
        "{:<pad$} [{:>w$}] {}: {:>w$} {}: {:>w$}",
        iface.name,
        format_bytes(stats.total_bytes),
        FMT_UP_STR,
        format_bytes(stats.tx_bytes),
        FMT_DW_STR,
        format_bytes(stats.rx_bytes),
        pad = pad,
        w = FMT_PAD,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::TrafficStats;

    #[test]
    fn line_layout() {
        let iface = InterfaceStats {
            name: "eth0",
            stats: TrafficStats {
                total_bytes: 1500,
                tx_bytes: 500,
                rx_bytes: 1000,
            },
        };
        assert_eq!(
            format_line(&iface, 5),
            "eth0  [  1.5k] ↑: 500.0b ↓:   1.0k"
        );
    }

    #[test]
    fn stopped_control_has_no_next_frame() {
        let control = RunControl::forever();
        assert!(control.has_next(1_000));
        control.stop();
        assert!(!control.has_next(0));
    }

    #[test]
    fn frame_limit() {
        let control = RunControl::frames(2);
        assert!(control.has_next(0));
        assert!(control.has_next(1));
        assert!(!control.has_next(2));
    }
}
