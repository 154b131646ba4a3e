use super::relocator::{RelocateOutcome, Relocator};
use super::report::OrganizeStats;
use crate::config::{Category, CategoryTable, IgnoredFolders};
use crate::tools::{is_collision, is_empty_dir, move_file, normalize_name};
use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// 單一資料夾的處理器：刪除空子資料夾、正規化檔名、依分類搬移
///
/// 只處理直接子項目，子資料夾由掃描器另外加入佇列
pub struct FolderWorker<'a> {
    category_table: &'a CategoryTable,
    ignored_folders: &'a IgnoredFolders,
    relocator: Relocator<'a>,
    stats: &'a OrganizeStats,
}

impl<'a> FolderWorker<'a> {
    pub fn new(
        category_table: &'a CategoryTable,
        ignored_folders: &'a IgnoredFolders,
        relocator: Relocator<'a>,
        stats: &'a OrganizeStats,
    ) -> Self {
        Self {
            category_table,
            ignored_folders,
            relocator,
            stats,
        }
    }

    /// 處理一個資料夾；單一檔案失敗只記錄，不影響其他檔案
    pub fn process_folder(&self, folder: &Path) {
        self.stats.record_visit(folder);

        // 先收集再處理，避免邊改名邊讀取目錄
        let mut entries: Vec<_> = match fs::read_dir(folder) {
            Ok(entries) => entries.filter_map(|entry| self.log_entry_error(entry)).collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // 已被父資料夾的 worker 當作空資料夾刪除
                debug!("資料夾已不存在: {}", folder.display());
                return;
            }
            Err(e) => {
                warn!("無法讀取資料夾 {}: {e}", folder.display());
                OrganizeStats::bump(&self.stats.errors);
                return;
            }
        };
        entries.sort_by_key(fs::DirEntry::file_name);

        for entry in entries {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                OrganizeStats::bump(&self.stats.errors);
                continue;
            };

            if file_type.is_dir() {
                self.prune_if_empty(&path, &entry.file_name());
            } else if file_type.is_file() {
                if let Err(e) = self.process_file(folder, &path) {
                    warn!("{e:#}");
                    OrganizeStats::bump(&self.stats.errors);
                }
            }
        }
    }

    fn log_entry_error(&self, entry: io::Result<fs::DirEntry>) -> Option<fs::DirEntry> {
        match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("無法讀取目錄項目: {e}");
                OrganizeStats::bump(&self.stats.errors);
                None
            }
        }
    }

    fn prune_if_empty(&self, dir: &Path, name: &OsStr) {
        if self.ignored_folders.contains(name) {
            return;
        }

        match is_empty_dir(dir) {
            Ok(true) => {}
            Ok(false) => return,
            Err(e) => {
                debug!("{e:#}");
                return;
            }
        }

        // 檢查後可能被其他程序寫入，刪除失敗直接略過
        match fs::remove_dir(dir) {
            Ok(()) => {
                debug!("刪除空資料夾: {}", dir.display());
                OrganizeStats::bump(&self.stats.folders_pruned);
            }
            Err(e) => debug!("略過刪除資料夾 {}: {e}", dir.display()),
        }
    }

    fn process_file(&self, folder: &Path, path: &Path) -> Result<()> {
        let path = self.normalize_in_place(folder, path);

        let Some(category) = self.category_table.categorize_file(&path) else {
            return Ok(());
        };

        let outcome = match category {
            Category::Archive => self.relocator.relocate_archive(&path, folder),
            _ => self.relocator.relocate(&path, folder, category),
        }
        .with_context(|| format!("整理檔案失敗: {}", path.display()))?;

        match outcome {
            RelocateOutcome::Moved(target) => {
                debug!("移動檔案: {} -> {}", path.display(), target.display());
                self.stats.record_move(category);
            }
            RelocateOutcome::Unpacked(unpack_dir) => {
                debug!("解壓縮: {} -> {}", path.display(), unpack_dir.display());
                self.stats.record_move(category);
                OrganizeStats::bump(&self.stats.archives_unpacked);
            }
            RelocateOutcome::Skipped(existing) => {
                info!(
                    "目標已存在，跳過: {} (已有 {})",
                    path.display(),
                    existing.display()
                );
                OrganizeStats::bump(&self.stats.skipped);
            }
        }

        Ok(())
    }

    /// 將檔名正規化；目標名稱已被佔用或改名失敗時沿用原檔名
    fn normalize_in_place(&self, folder: &Path, path: &Path) -> PathBuf {
        let normalized = normalize_name(path);
        if path.file_name() == Some(OsStr::new(&normalized)) {
            return path.to_path_buf();
        }

        let target = folder.join(&normalized);
        match move_file(path, &target) {
            Ok(()) => {
                debug!("重新命名: {} -> {}", path.display(), target.display());
                OrganizeStats::bump(&self.stats.names_normalized);
                target
            }
            Err(e) if is_collision(&e) => {
                debug!("正規化名稱已被佔用，保留原檔名: {}", path.display());
                path.to_path_buf()
            }
            Err(e) => {
                warn!("{e:#}");
                path.to_path_buf()
            }
        }
    }
}
