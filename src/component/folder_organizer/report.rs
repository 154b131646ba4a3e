use crate::config::Category;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// worker 之間共用的計數器
#[derive(Debug, Default)]
pub struct OrganizeStats {
    pub folders_processed: AtomicUsize,
    pub files_moved: AtomicUsize,
    pub archives_unpacked: AtomicUsize,
    pub names_normalized: AtomicUsize,
    pub folders_pruned: AtomicUsize,
    pub skipped: AtomicUsize,
    pub errors: AtomicUsize,
    category_counts: Mutex<HashMap<Category, usize>>,
    visited: Mutex<Vec<PathBuf>>,
}

impl OrganizeStats {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_visit(&self, folder: &Path) {
        Self::bump(&self.folders_processed);
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(folder.to_path_buf());
    }

    pub fn record_move(&self, category: Category) {
        Self::bump(&self.files_moved);
        *self
            .category_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(category)
            .or_insert(0) += 1;
    }

    #[must_use]
    pub fn snapshot(&self, folders_discovered: usize, completed: bool) -> OrganizeReport {
        let load = |counter: &AtomicUsize| counter.load(Ordering::SeqCst);
        OrganizeReport {
            folders_discovered,
            folders_processed: load(&self.folders_processed),
            files_moved: load(&self.files_moved),
            archives_unpacked: load(&self.archives_unpacked),
            names_normalized: load(&self.names_normalized),
            folders_pruned: load(&self.folders_pruned),
            skipped: load(&self.skipped),
            errors: load(&self.errors),
            category_counts: self
                .category_counts
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            visited_folders: self
                .visited
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
            completed,
        }
    }
}

/// 整理結果
#[derive(Debug, Default, Clone)]
pub struct OrganizeReport {
    /// 掃描到的資料夾數
    pub folders_discovered: usize,
    /// 實際處理的資料夾數
    pub folders_processed: usize,
    /// 移入分類資料夾的檔案數（包含壓縮檔）
    pub files_moved: usize,
    pub archives_unpacked: usize,
    pub names_normalized: usize,
    /// 刪除的空資料夾數
    pub folders_pruned: usize,
    /// 目標已存在而跳過的檔案數
    pub skipped: usize,
    pub errors: usize,
    pub category_counts: HashMap<Category, usize>,
    pub visited_folders: Vec<PathBuf>,
    /// 佇列是否完整清空（中斷時為 false）
    pub completed: bool,
}
