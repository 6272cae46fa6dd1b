use std::path::PathBuf;
use std::time::Duration;

// ==================== 编译期默认值 ====================

/// 网卡列表目录
pub const NET_DIR: &str = "/sys/class/net";
/// 接收字节计数器（相对于网卡目录）
pub const RX_BYTES: &str = "statistics/rx_bytes";
/// 发送字节计数器（相对于网卡目录）
pub const TX_BYTES: &str = "statistics/tx_bytes";

/// 最多监控的网卡数量
pub const INTERFACES_MAX: usize = 16;
/// 刷新间隔（微秒）
pub const DELAY_US: u64 = 1_000_000;

/// 字节换算基数
pub const FMT_BASE: f64 = 1000.0;
/// 小数位数
pub const FMT_PREC: usize = 1;
/// 上传标识
pub const FMT_UP_STR: &str = "↑";
/// 下载标识
pub const FMT_DW_STR: &str = "↓";
/// 数值列最小宽度
pub const FMT_PAD: usize = 6;

// ==================== 运行时配置 ====================

#[derive(Debug, Clone)]
pub struct Config {
    /// 网卡列表目录，默认 /sys/class/net
    pub net_dir: PathBuf,
    /// 注册表容量
    pub capacity: usize,
    /// 两帧之间的间隔，固定为 1 秒（测试中可置零）
    pub interval: Duration,
    /// 渲染帧数上限，None 表示永久运行
    pub frames: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            net_dir: PathBuf::from(NET_DIR),
            capacity: INTERFACES_MAX,
            interval: Duration::from_micros(DELAY_US),
            frames: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.net_dir.as_os_str().is_empty(),
            "net_dir must be non-empty"
        );
        anyhow::ensure!(
            self.capacity > 0,
            "capacity must be > 0, got {}",
            self.capacity
        );
        anyhow::ensure!(
            self.frames != Some(0),
            "frames must be > 0 when set (use None to run forever)"
        );
        Ok(())
    }
}
