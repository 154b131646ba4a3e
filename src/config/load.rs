use crate::config::types::{Category, CategoryTable, Config, IgnoredFolders, OrganizerSettings};
use anyhow::{Context, Result, bail};
use std::collections::HashMap;

/// 編譯時嵌入的分類表（不需要外部檔案）
const CATEGORY_TABLE_JSON: &str = include_str!("data/category_table.json");

impl Config {
    pub fn new() -> Result<Self> {
        Ok(Self {
            category_table: Self::load_embedded_category_table()?,
            ignored_folders: IgnoredFolders::from_categories(),
            settings: OrganizerSettings::default(),
        })
    }

    #[must_use]
    pub fn with_settings(mut self, settings: OrganizerSettings) -> Self {
        self.settings = settings;
        self
    }

    fn load_embedded_category_table() -> Result<CategoryTable> {
        CategoryTable::from_json(CATEGORY_TABLE_JSON).context("無法解析嵌入的分類表")
    }
}

impl CategoryTable {
    /// 解析 JSON 分類表並建立查詢索引
    ///
    /// 同一個副檔名出現在兩個分類時視為設定錯誤
    pub fn from_json(json: &str) -> Result<Self> {
        let mut table: Self = serde_json::from_str(json)?;

        let mut index = HashMap::new();
        for category in Category::all_categories() {
            for ext in table.extensions_of(category) {
                let key = ext.trim_start_matches('.').to_lowercase();
                if let Some(previous) = index.insert(key.clone(), category) {
                    bail!(
                        "副檔名 .{key} 同時屬於 {} 與 {}",
                        previous.folder_name(),
                        category.folder_name()
                    );
                }
            }
        }

        table.set_index(index);
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_embedded_table_loads() {
        let config = Config::new().unwrap();
        let table = &config.category_table;

        assert_eq!(table.classify("jpg"), Some(Category::Image));
        assert_eq!(table.classify("heic"), Some(Category::Image));
        assert_eq!(table.classify("mkv"), Some(Category::Video));
        assert_eq!(table.classify("xlsx"), Some(Category::Document));
        assert_eq!(table.classify("amr"), Some(Category::Audio));
        assert_eq!(table.classify("gz"), Some(Category::Archive));
        assert_eq!(table.classify("rs"), None);
        assert_eq!(table.classify(""), None);
    }

    #[test]
    fn test_every_listed_extension_maps_to_its_category() {
        let table = Config::new().unwrap().category_table;

        for category in Category::all_categories() {
            for ext in table.extensions_of(category) {
                assert_eq!(table.classify(&ext.to_lowercase()), Some(category), "{ext}");
            }
        }
    }

    #[test]
    fn test_classify_expects_lowercase() {
        let table = Config::new().unwrap().category_table;

        // 呼叫端負責轉小寫
        assert_eq!(table.classify("JPG"), None);
        assert_eq!(
            table.categorize_file(Path::new("/tmp/photo.JPG")),
            Some(Category::Image)
        );
        assert_eq!(table.categorize_file(Path::new("/tmp/README")), None);
    }

    #[test]
    fn test_overlapping_extensions_rejected() {
        let json = r#"{
            "IMAGE_FILE": [".jpg"],
            "VIDEO_FILE": [".jpg"],
            "DOCUMENT_FILE": [],
            "AUDIO_FILE": [],
            "ARCHIVE_FILE": []
        }"#;

        assert!(CategoryTable::from_json(json).is_err());
    }

    #[test]
    fn test_ignored_folders() {
        let ignored = IgnoredFolders::from_categories();

        assert!(ignored.is_ignored(Path::new("/data/images")));
        assert!(ignored.is_ignored(Path::new("/data/archives")));
        assert!(!ignored.is_ignored(Path::new("/data/image")));
        assert!(!ignored.is_ignored(Path::new("/data/Images")));
    }
}
