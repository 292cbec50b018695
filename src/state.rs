//! 标记存储 - 最后已读帖子 ID 的本地文件读写
//!
//! 文件内容只有一个 token（帖子 ID），文件不存在表示首次运行。
//! 写入时先写临时文件再原子替换，并持有独占文件锁，避免被外部
//! 调度器意外并发启动的两个实例写坏文件。

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// 标记文件存储
#[derive(Debug, Clone)]
pub struct MarkerStore {
    path: PathBuf,
}

impl MarkerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 默认存储路径: ~/.config/x-web-tracker/last_id.txt
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("x-web-tracker")
            .join("last_id.txt")
    }

    /// 标记文件路径
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取最后已读 ID，文件不存在或为空时返回 `None`
    pub fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("读取标记文件失败: {}", self.path.display()))?;

        let marker = content.trim();
        if marker.is_empty() {
            return Ok(None);
        }

        Ok(Some(marker.to_string()))
    }

    /// 持久化最后已读 ID（临时文件 + 原子替换）
    pub fn save(&self, post_id: &str) -> Result<()> {
        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("创建状态目录失败: {}", parent.display()))?;
        }

        // 打开（或创建）标记文件并加独占锁
        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&self.path)
            .with_context(|| format!("打开标记文件失败: {}", self.path.display()))?;
        lock_file.lock_exclusive()?;

        let temp_path = self.path.with_extension("tmp");
        {
            let mut temp_file = File::create(&temp_path)?;
            writeln!(temp_file, "{}", post_id.trim())?;
        }

        // 原子替换
        fs::rename(&temp_path, &self.path)?;

        lock_file.unlock()?;
        Ok(())
    }

    /// 删除标记文件（重置为首次运行状态）
    pub fn reset(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("删除标记文件失败: {}", self.path.display()))?;
        Ok(true)
    }

    /// 标记文件的最后修改时间
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        let metadata = fs::metadata(&self.path).ok()?;
        let modified = metadata.modified().ok()?;
        Some(DateTime::<Utc>::from(modified))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> MarkerStore {
        MarkerStore::new(dir.path().join("last_id.txt"))
    }

    #[test]
    fn test_load_missing_file_returns_none() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("1234567890").unwrap();
        assert_eq!(store.load().unwrap(), Some("1234567890".to_string()));
    }

    #[test]
    fn test_save_overwrites_previous_marker() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.save("111").unwrap();
        store.save("222").unwrap();

        assert_eq!(store.load().unwrap(), Some("222".to_string()));
    }

    #[test]
    fn test_load_trims_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_id.txt");
        fs::write(&path, "  987654321\n\n").unwrap();

        let store = MarkerStore::new(&path);
        assert_eq!(store.load().unwrap(), Some("987654321".to_string()));
    }

    #[test]
    fn test_empty_file_means_first_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("last_id.txt");
        fs::write(&path, "\n").unwrap();

        let store = MarkerStore::new(&path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state").join("last_id.txt");

        let store = MarkerStore::new(&path);
        store.save("42").unwrap();

        assert_eq!(store.load().unwrap(), Some("42".to_string()));
    }

    #[test]
    fn test_reset_removes_marker() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(!store.reset().unwrap());

        store.save("314").unwrap();
        assert!(store.reset().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_modified_at_present_after_save() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        assert!(store.modified_at().is_none());
        store.save("1").unwrap();
        assert!(store.modified_at().is_some());
    }
}
