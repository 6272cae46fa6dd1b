use std::io;
use std::path::PathBuf;

use thiserror::Error;

const EIO: i32 = 5;
const ENODEV: i32 = 19;

/// 单个计数器文件的错误，可恢复
#[derive(Debug, Error)]
pub enum CounterError {
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: invalid counter value {value:?}", path.display())]
    Parse { path: PathBuf, value: String },
}

/// 注册表已满，拒绝插入
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("registry is full ({capacity} interfaces)")]
pub struct CapacityReached {
    pub capacity: usize,
}

/// 致命错误，会终止会话
#[derive(Debug, Error)]
pub enum NetspError {
    #[error("{}: {source}", path.display())]
    ListingOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {source}", path.display())]
    ListingRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: no matching interface", path.display())]
    NoInterfaces { path: PathBuf },
    #[error("display init: {0}")]
    DisplayInit(#[source] io::Error),
    #[error("display: {0}")]
    Display(#[source] io::Error),
}

impl NetspError {
    /// errno 风格的退出码（正数）
    pub fn code(&self) -> i32 {
        match self {
            Self::ListingOpen { source, .. }
            | Self::ListingRead { source, .. }
            | Self::DisplayInit(source)
            | Self::Display(source) => source.raw_os_error().unwrap_or(EIO),
            Self::NoInterfaces { .. } => ENODEV,
        }
    }
}
