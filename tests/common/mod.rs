// 测试辅助：在临时目录中构造假的 /sys/class/net

#![allow(dead_code)]

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use netsp::config::{Config, RX_BYTES, TX_BYTES};
use tracing_subscriber::fmt::MakeWriter;

pub struct FakeNetDir {
    dir: tempfile::TempDir,
}

impl FakeNetDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// 添加带收发计数器的网卡
    pub fn add(&self, name: &str, rx: u64, tx: u64) -> &Self {
        fs::create_dir_all(self.path().join(name).join("statistics")).unwrap();
        self.set(name, rx, tx);
        self
    }

    /// 添加没有 statistics 文件的目录
    pub fn add_broken(&self, name: &str) -> &Self {
        fs::create_dir_all(self.path().join(name)).unwrap();
        self
    }

    pub fn set(&self, name: &str, rx: u64, tx: u64) {
        fs::write(self.counter(name, RX_BYTES), rx.to_string()).unwrap();
        fs::write(self.counter(name, TX_BYTES), tx.to_string()).unwrap();
    }

    pub fn counter(&self, name: &str, which: &str) -> PathBuf {
        self.path().join(name).join(which)
    }

    pub fn config(&self) -> Config {
        Config {
            net_dir: self.path().to_path_buf(),
            interval: std::time::Duration::ZERO,
            ..Config::default()
        }
    }
}

pub fn sorted(mut names: Vec<&str>) -> Vec<&str> {
    names.sort_unstable();
    names
}

// ==================== 日志捕获 ====================

#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// 运行 f 并返回期间输出的 debug 及以上级别日志
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);

    let logs = String::from_utf8_lossy(&buffer.0.lock().unwrap())
        .lines()
        .map(|l| l.to_string())
        .collect();
    (result, logs)
}
