use super::dispatch_queue::{DispatchQueue, WorkItem};
use crate::config::IgnoredFolders;
use crate::tools::validate_directory_exists;
use anyhow::Result;
use log::{debug, warn};
use std::path::Path;
use walkdir::WalkDir;

/// 掃描 `root`（含自身）底下所有資料夾
///
/// 分類資料夾不會被列入，也不會往下走，避免重複整理已分類的內容。
/// `root` 本身名稱與分類相同時只跳過 `root`，其子資料夾照常掃描
pub fn scan_folders(root: &Path, ignored: &IgnoredFolders) -> Result<Vec<WorkItem>> {
    validate_directory_exists(root)?;

    let mut folders = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && ignored.contains(entry.file_name()))
        });

    for entry in walker {
        match entry {
            Ok(entry) if entry.file_type().is_dir() => {
                if ignored.is_ignored(entry.path()) {
                    warn!(
                        "目標資料夾名稱與分類相同，不整理其本身: {}",
                        entry.path().display()
                    );
                    continue;
                }
                folders.push(WorkItem::new(entry.into_path()));
            }
            Ok(_) => {}
            Err(e) => warn!("無法讀取目錄項目: {e}"),
        }
    }

    debug!("掃描到 {} 個資料夾: {}", folders.len(), root.display());
    Ok(folders)
}

/// 掃描並把所有資料夾加入佇列，回傳加入的數量
pub fn enqueue_folders(
    root: &Path,
    ignored: &IgnoredFolders,
    queue: &DispatchQueue,
) -> Result<usize> {
    let folders = scan_folders(root, ignored)?;
    let count = folders.len();

    for folder in folders {
        queue.enqueue(folder)?;
    }

    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::TempDir;

    fn paths(items: &[WorkItem]) -> Vec<PathBuf> {
        items.iter().map(|i| i.path().to_path_buf()).collect()
    }

    #[test]
    fn test_scan_includes_root_and_nested_folders() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("d")).unwrap();
        fs::write(root.join("a/file.txt"), "x").unwrap();

        let folders = paths(&scan_folders(root, &IgnoredFolders::default()).unwrap());

        assert_eq!(
            folders,
            vec![
                root.to_path_buf(),
                root.join("a"),
                root.join("a/b"),
                root.join("a/b/c"),
                root.join("d"),
            ]
        );
    }

    #[test]
    fn test_scan_skips_category_folders_and_their_contents() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("archives/data/inner")).unwrap();
        fs::create_dir_all(root.join("a/images")).unwrap();
        fs::create_dir_all(root.join("a/photos")).unwrap();

        let folders = paths(&scan_folders(root, &IgnoredFolders::default()).unwrap());

        assert_eq!(
            folders,
            vec![root.to_path_buf(), root.join("a"), root.join("a/photos")]
        );
    }

    #[test]
    fn test_root_named_like_category_still_scans_children() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("images");
        fs::create_dir_all(root.join("trip/video")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();

        let folders = paths(&scan_folders(&root, &IgnoredFolders::default()).unwrap());

        assert_eq!(folders, vec![root.join("empty"), root.join("trip")]);
    }

    #[test]
    fn test_missing_root_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let queue = DispatchQueue::new(Duration::from_millis(10));

        let result = enqueue_folders(
            &temp_dir.path().join("missing"),
            &IgnoredFolders::default(),
            &queue,
        );

        assert!(result.is_err());
        assert_eq!(queue.enqueued_count(), 0);
    }

    #[test]
    fn test_enqueue_folders() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("x/y")).unwrap();
        let queue = DispatchQueue::new(Duration::from_millis(10));

        let count = enqueue_folders(temp_dir.path(), &IgnoredFolders::default(), &queue).unwrap();

        assert_eq!(count, 3);
        assert_eq!(queue.pending(), 3);
    }
}
