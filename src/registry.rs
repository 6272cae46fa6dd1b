use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{RX_BYTES, TX_BYTES};
use crate::counter::CounterSource;
use crate::error::{CapacityReached, CounterError, NetspError};

// ==================== 网卡过滤 ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameFilter {
    /// 所有网卡（--all）
    All,
    /// 按前缀匹配，区分大小写
    Prefixes(Vec<String>),
}

impl NameFilter {
    /// 返回匹配的过滤条件数量；同一网卡匹配多个前缀时会被加载多次
    pub fn matches(&self, name: &str) -> usize {
        match self {
            Self::All => 1,
            Self::Prefixes(prefixes) => prefixes
                .iter()
                .filter(|pfx| name.starts_with(pfx.as_str()))
                .count(),
        }
    }
}

// ==================== 网卡 ====================

#[derive(Debug)]
pub struct Interface {
    pub name: String,
    pub rx: CounterSource,
    pub tx: CounterSource,
}

impl Interface {
    /// 打开 <net_dir>/<name>/statistics/{rx,tx}_bytes，任意一个失败则整体失败
    pub fn open(net_dir: &Path, name: &str) -> Result<Self, CounterError> {
        let dir = net_dir.join(name);
        let rx = CounterSource::open(dir.join(RX_BYTES))?;
        let tx = CounterSource::open(dir.join(TX_BYTES))?;

        Ok(Self {
            name: name.to_string(),
            rx,
            tx,
        })
    }
}

// ==================== 注册表 ====================

/// 固定容量、按发现顺序排列的网卡集合
#[derive(Debug)]
pub struct Registry {
    interfaces: Vec<Interface>,
    capacity: usize,
    name_width: usize,
}

impl Registry {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            interfaces: Vec::with_capacity(capacity),
            capacity,
            name_width: 0,
        }
    }

    pub fn admit(&mut self, iface: Interface) -> Result<(), CapacityReached> {
        if self.is_full() {
            return Err(CapacityReached {
                capacity: self.capacity,
            });
        }
        self.name_width = self.name_width.max(iface.name.chars().count());
        self.interfaces.push(iface);
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.interfaces.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 名称列宽度，等于最长网卡名的字符数
    pub fn name_width(&self) -> usize {
        self.name_width
    }

    pub fn interfaces(&self) -> &[Interface] {
        &self.interfaces
    }

    pub fn interfaces_mut(&mut self) -> &mut [Interface] {
        &mut self.interfaces
    }

    pub fn names(&self) -> Vec<&str> {
        self.interfaces.iter().map(|i| i.name.as_str()).collect()
    }

    /// 扫描 net_dir 并加载匹配的网卡。
    ///
    /// 单个网卡打不开只记录警告并跳过；目录本身无法读取时返回致命错误，
    /// 已打开的计数器随注册表一起释放。
    pub fn discover(
        net_dir: &Path,
        filter: &NameFilter,
        capacity: usize,
    ) -> Result<Self, NetspError> {
        let mut registry = Self::with_capacity(capacity);

        'entries: for entry in read_listing(net_dir)? {
            // 注册表已满后不再打开任何计数器
            if registry.is_full() {
                tracing::debug!(
                    capacity = registry.capacity(),
                    "registry full, ignoring the rest"
                );
                break;
            }

            let entry = entry?;
            let Some(name) = entry.to_str() else {
                tracing::warn!(entry = ?entry, "skipping non UTF-8 interface name");
                continue;
            };

            for _ in 0..filter.matches(name) {
                if registry.is_full() {
                    tracing::debug!(
                    capacity = registry.capacity(),
                    "registry full, ignoring the rest"
                );
                    break 'entries;
                }

                let iface = match Interface::open(net_dir, name) {
                    Ok(iface) => iface,
                    Err(e) => {
                        tracing::warn!(interface = %name, error = %e, "skipping interface");
                        continue 'entries;
                    }
                };

                if let Err(full) = registry.admit(iface) {
                    tracing::debug!(interface = %name, "{}, ignoring the rest", full);
                    break 'entries;
                }
                tracing::debug!(interface = %name, "interface loaded");
            }
        }

        Ok(registry)
    }
}

// ==================== 目录枚举 ====================

/// 枚举 net_dir 下的条目名，跳过以 '.' 开头的条目
fn read_listing(
    net_dir: &Path,
) -> Result<impl Iterator<Item = Result<OsString, NetspError>>, NetspError> {
    let path: PathBuf = net_dir.to_path_buf();
    let dir = fs::read_dir(net_dir).map_err(|source| NetspError::ListingOpen {
        path: path.clone(),
        source,
    })?;

    Ok(dir.filter_map(move |entry| {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) => {
                return Some(Err(NetspError::ListingRead {
                    path: path.clone(),
                    source,
                }))
            }
        };

        let name = entry.file_name();
        if name.as_encoded_bytes().starts_with(b".") {
            return None;
        }
        Some(Ok(name))
    }))
}

/// --show：列出 net_dir 下所有非隐藏条目，非 UTF-8 名称按有损方式显示
pub fn list_entries(net_dir: &Path) -> Result<Vec<String>, NetspError> {
    read_listing(net_dir)?
        .map(|entry| entry.map(|name| name.to_string_lossy().into_owned()))
        .collect()
}
