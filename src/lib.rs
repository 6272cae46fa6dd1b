//! netsp - A simple bandwidth monitor
//!
//! 扫描 /sys/class/net 下的网卡，每秒读取 rx_bytes / tx_bytes 计数器，
//! 在终端原地刷新每个网卡的累计流量和上传/下载速率。

pub mod cli;
pub mod config;
pub mod counter;
pub mod error;
pub mod format;
pub mod monitor;
pub mod registry;
pub mod render;

use std::io::{self, Write};

use crate::config::Config;
use crate::error::NetspError;
use crate::registry::{NameFilter, Registry};
use crate::render::{RunControl, Renderer};

/// 加载网卡并开始渲染，直到达到帧数上限或收到停止请求
pub fn run<W: Write>(
    config: &Config,
    filter: &NameFilter,
    control: &RunControl,
    out: W,
) -> Result<u64, NetspError> {
    let mut registry = Registry::discover(&config.net_dir, filter, config.capacity)?;
    if registry.is_empty() {
        return Err(NetspError::NoInterfaces {
            path: config.net_dir.clone(),
        });
    }
    tracing::info!(
        interfaces = ?registry.names(),
        capacity = registry.capacity(),
        "interfaces loaded"
    );

    let mut renderer = Renderer::new(out, config.interval);
    renderer.run(&mut registry, control)
}

/// --show：每行输出一个网卡名
pub fn show<W: Write>(config: &Config, mut out: W) -> Result<(), NetspError> {
    for name in registry::list_entries(&config.net_dir)? {
        writeln!(out, "{}", name).map_err(NetspError::Display)?;
    }
    out.flush().map_err(NetspError::Display)
}

/// 标准输出，带缓冲
pub fn stdout() -> io::BufWriter<io::Stdout> {
    io::BufWriter::with_capacity(4096, io::stdout())
}
