use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

/// 壓縮檔可辨識的後綴，由長到短排列（複合後綴必須排在單一後綴之前）
pub const ARCHIVE_SUFFIXES: &[&str] = &[".tar.gz", ".tgz", ".tar", ".zip", ".gz"];

/// 固定的檔案分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Image,
    Video,
    Document,
    Audio,
    Archive,
}

impl Category {
    #[must_use]
    pub const fn all_categories() -> [Self; 5] {
        [
            Self::Image,
            Self::Video,
            Self::Document,
            Self::Audio,
            Self::Archive,
        ]
    }

    /// 分類資料夾名稱
    #[must_use]
    pub const fn folder_name(self) -> &'static str {
        match self {
            Self::Image => "images",
            Self::Video => "video",
            Self::Document => "documents",
            Self::Audio => "audio",
            Self::Archive => "archives",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Image => "圖片",
            Self::Video => "影片",
            Self::Document => "文件",
            Self::Audio => "音訊",
            Self::Archive => "壓縮檔",
        }
    }
}

/// 副檔名分類表（編譯時嵌入）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryTable {
    #[serde(rename = "IMAGE_FILE")]
    pub image_file: Vec<String>,
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
    #[serde(rename = "DOCUMENT_FILE")]
    pub document_file: Vec<String>,
    #[serde(rename = "AUDIO_FILE")]
    pub audio_file: Vec<String>,
    #[serde(rename = "ARCHIVE_FILE")]
    pub archive_file: Vec<String>,
    /// 小寫副檔名（不含前導點）-> 分類
    #[serde(skip)]
    index: HashMap<String, Category>,
}

impl CategoryTable {
    #[must_use]
    pub fn extensions_of(&self, category: Category) -> &[String] {
        match category {
            Category::Image => &self.image_file,
            Category::Video => &self.video_file,
            Category::Document => &self.document_file,
            Category::Audio => &self.audio_file,
            Category::Archive => &self.archive_file,
        }
    }

    pub(crate) fn set_index(&mut self, index: HashMap<String, Category>) {
        self.index = index;
    }

    /// 以小寫副檔名查詢分類，找不到時回傳 `None`
    #[must_use]
    pub fn classify(&self, extension: &str) -> Option<Category> {
        self.index.get(extension.trim_start_matches('.')).copied()
    }

    /// 依檔案路徑的副檔名分類（先轉小寫）
    #[must_use]
    pub fn categorize_file(&self, path: &Path) -> Option<Category> {
        path.extension()
            .and_then(OsStr::to_str)
            .and_then(|ext| self.classify(&ext.to_lowercase()))
    }
}

/// 分類資料夾名稱集合，掃描與處理時一律跳過
#[derive(Debug, Clone)]
pub struct IgnoredFolders {
    names: HashSet<String>,
}

impl IgnoredFolders {
    #[must_use]
    pub fn from_categories() -> Self {
        Self {
            names: Category::all_categories()
                .iter()
                .map(|c| c.folder_name().to_string())
                .collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|n| self.names.contains(n))
    }

    /// 路徑最後一段是否為分類資料夾
    #[must_use]
    pub fn is_ignored(&self, path: &Path) -> bool {
        path.file_name().is_some_and(|name| self.contains(name))
    }
}

impl Default for IgnoredFolders {
    fn default() -> Self {
        Self::from_categories()
    }
}

/// 整理工作的執行設定
#[derive(Debug, Clone)]
pub struct OrganizerSettings {
    /// 同時處理資料夾的最大 worker 數
    pub max_workers: usize,
    /// worker 等待佇列時檢查停止旗標的間隔
    pub poll_interval: Duration,
}

impl Default for OrganizerSettings {
    fn default() -> Self {
        Self {
            max_workers: (num_cpus::get() * 2).max(1),
            poll_interval: Duration::from_millis(50),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub category_table: CategoryTable,
    pub ignored_folders: IgnoredFolders,
    pub settings: OrganizerSettings,
}
