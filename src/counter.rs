use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::CounterError;

/// 一个可重复读取的累计字节计数器（例如 statistics/rx_bytes）
#[derive(Debug)]
pub struct CounterSource {
    path: PathBuf,
    file: File,
    /// 上一次读到的绝对值
    bytes: u64,
    buf: String,
}

impl CounterSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CounterError> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path).map_err(|source| CounterError::Open {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            file,
            bytes: 0,
            buf: String::with_capacity(24),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 上一次采样得到的绝对值
    pub fn last(&self) -> u64 {
        self.bytes
    }

    /// 读取当前绝对值，读完后回到文件开头，下次读取拿到的是最新值
    pub fn read_current(&mut self) -> Result<u64, CounterError> {
        self.buf.clear();
        let read = self.file.read_to_string(&mut self.buf);
        let rewind = self.file.seek(SeekFrom::Start(0));
        read.and(rewind).map_err(|source| CounterError::Read {
            path: self.path.clone(),
            source,
        })?;

        let value = self.buf.trim();
        value.parse::<u64>().map_err(|_| CounterError::Parse {
            path: self.path.clone(),
            value: value.to_string(),
        })
    }

    /// 采样：返回自上次采样以来的增量，并记录当前值。
    ///
    /// 首次采样时上一次的值为 0，因此返回计数器的绝对值。
    /// 计数器变小（网卡重建或计数清零）时本次增量记为 0。
    pub fn sample(&mut self) -> Result<u64, CounterError> {
        let current = self.read_current()?;
        let delta = match current.checked_sub(self.bytes) {
            Some(delta) => delta,
            None => {
                tracing::debug!(
                    path = %self.path.display(),
                    previous = self.bytes,
                    current,
                    "counter went backwards, treating as reset"
                );
                0
            }
        };
        self.bytes = current;
        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn counter_file(dir: &tempfile::TempDir, value: &str) -> PathBuf {
        let path = dir.path().join("rx_bytes");
        fs::write(&path, value).unwrap();
        path
    }

    #[test]
    fn first_sample_is_absolute_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = counter_file(&dir, "1000\n");
        let mut counter = CounterSource::open(&path).unwrap();

        assert_eq!(counter.sample().unwrap(), 1000);
        assert_eq!(counter.last(), 1000);
    }

    #[test]
    fn unchanged_counter_samples_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = counter_file(&dir, "4242");
        let mut counter = CounterSource::open(&path).unwrap();

        counter.sample().unwrap();
        assert_eq!(counter.sample().unwrap(), 0);
        assert_eq!(counter.sample().unwrap(), 0);
    }

    #[test]
    fn same_handle_sees_updated_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = counter_file(&dir, "1000");
        let mut counter = CounterSource::open(&path).unwrap();
        counter.sample().unwrap();

        fs::write(&path, "1200").unwrap();
        assert_eq!(counter.sample().unwrap(), 200);
        assert_eq!(counter.last(), 1200);
    }

    #[test]
    fn decrease_is_clamped_to_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = counter_file(&dir, "5000");
        let mut counter = CounterSource::open(&path).unwrap();
        counter.sample().unwrap();

        fs::write(&path, "100").unwrap();
        assert_eq!(counter.sample().unwrap(), 0);
        assert_eq!(counter.last(), 100);

        fs::write(&path, "350").unwrap();
        assert_eq!(counter.sample().unwrap(), 250);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = counter_file(&dir, "not a number");
        let mut counter = CounterSource::open(&path).unwrap();

        let err = counter.sample().unwrap_err();
        assert!(matches!(err, CounterError::Parse { .. }));
        assert_eq!(counter.last(), 0);
    }

    #[test]
    fn missing_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let err = CounterSource::open(dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CounterError::Open { .. }));
    }
}
