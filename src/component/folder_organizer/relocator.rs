use crate::config::Category;
use crate::tools::{
    Unpacker, ensure_directory_exists, is_collision, move_file, path_occupied, split_archive_name,
};
use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 搬移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelocateOutcome {
    /// 已移到分類資料夾
    Moved(PathBuf),
    /// 壓縮檔已解壓到此目錄，原壓縮檔已刪除
    Unpacked(PathBuf),
    /// 目標路徑已被佔用，檔案留在原處
    Skipped(PathBuf),
}

/// 把檔案搬進所在資料夾底下的分類資料夾
///
/// 分類資料夾一律建立在檔案的父資料夾內，不同資料夾之間不共用
pub struct Relocator<'a> {
    unpacker: &'a dyn Unpacker,
}

impl<'a> Relocator<'a> {
    pub fn new(unpacker: &'a dyn Unpacker) -> Self {
        Self { unpacker }
    }

    pub fn relocate(
        &self,
        file: &Path,
        parent: &Path,
        category: Category,
    ) -> Result<RelocateOutcome> {
        let file_name = file
            .file_name()
            .with_context(|| format!("無法取得檔案名稱: {}", file.display()))?;
        let category_dir = parent.join(category.folder_name());
        let target = category_dir.join(file_name);

        if path_occupied(&target) {
            return Ok(RelocateOutcome::Skipped(target));
        }

        ensure_directory_exists(&category_dir)?;
        Self::move_or_skip(file, target)
    }

    /// 移到 `archives/` 後解壓到 `archives/<主檔名>/`，成功才刪除壓縮檔
    ///
    /// 解壓失敗時壓縮檔保留在 `archives/`，並移除不完整的解壓目錄
    pub fn relocate_archive(&self, file: &Path, parent: &Path) -> Result<RelocateOutcome> {
        let file_name = file
            .file_name()
            .with_context(|| format!("無法取得檔案名稱: {}", file.display()))?;
        let name = file_name.to_string_lossy();
        let (stem, _) = split_archive_name(&name)
            .with_context(|| format!("無法辨識的壓縮檔名稱: {}", file.display()))?;

        let archives_dir = parent.join(Category::Archive.folder_name());
        let moved_path = archives_dir.join(file_name);
        let unpack_dir = archives_dir.join(stem);

        if path_occupied(&moved_path) {
            return Ok(RelocateOutcome::Skipped(moved_path));
        }
        if path_occupied(&unpack_dir) {
            return Ok(RelocateOutcome::Skipped(unpack_dir));
        }

        ensure_directory_exists(&archives_dir)?;
        if let RelocateOutcome::Skipped(target) = Self::move_or_skip(file, moved_path.clone())? {
            return Ok(RelocateOutcome::Skipped(target));
        }

        if let Err(e) = self.unpacker.unpack(&moved_path, &unpack_dir) {
            if unpack_dir.exists() {
                if let Err(cleanup) = fs::remove_dir_all(&unpack_dir) {
                    warn!("無法清除解壓目錄 {}: {cleanup}", unpack_dir.display());
                }
            }
            return Err(e.context(format!("已保留壓縮檔: {}", moved_path.display())));
        }

        fs::remove_file(&moved_path)
            .with_context(|| format!("無法刪除已解壓的壓縮檔: {}", moved_path.display()))?;

        debug!("解壓完成: {}", unpack_dir.display());
        Ok(RelocateOutcome::Unpacked(unpack_dir))
    }

    fn move_or_skip(file: &Path, target: PathBuf) -> Result<RelocateOutcome> {
        match move_file(file, &target) {
            Ok(()) => Ok(RelocateOutcome::Moved(target)),
            Err(e) if is_collision(&e) => Ok(RelocateOutcome::Skipped(target)),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ArchiveUnpacker;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path) {
        let mut writer = zip::ZipWriter::new(fs::File::create(path).unwrap());
        writer
            .start_file("inside.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"unpacked").unwrap();
        writer.finish().unwrap();
    }

    #[test]
    fn test_relocate_creates_category_folder() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path();
        let file = parent.join("photo.jpg");
        fs::write(&file, "image").unwrap();

        let relocator = Relocator::new(&ArchiveUnpacker);
        let outcome = relocator.relocate(&file, parent, Category::Image).unwrap();

        let target = parent.join("images/photo.jpg");
        assert_eq!(outcome, RelocateOutcome::Moved(target.clone()));
        assert!(!file.exists());
        assert_eq!(fs::read_to_string(target).unwrap(), "image");
    }

    #[test]
    fn test_relocate_skips_on_collision() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path();
        fs::create_dir(parent.join("images")).unwrap();
        fs::write(parent.join("images/photo.jpg"), "old").unwrap();
        let file = parent.join("photo.jpg");
        fs::write(&file, "new").unwrap();

        let relocator = Relocator::new(&ArchiveUnpacker);
        let outcome = relocator.relocate(&file, parent, Category::Image).unwrap();

        assert_eq!(
            outcome,
            RelocateOutcome::Skipped(parent.join("images/photo.jpg"))
        );
        assert_eq!(fs::read_to_string(&file).unwrap(), "new");
        assert_eq!(
            fs::read_to_string(parent.join("images/photo.jpg")).unwrap(),
            "old"
        );
    }

    #[test]
    fn test_relocate_archive_unpacks_and_deletes() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path();
        let file = parent.join("data.zip");
        write_zip(&file);

        let relocator = Relocator::new(&ArchiveUnpacker);
        let outcome = relocator.relocate_archive(&file, parent).unwrap();

        let unpack_dir = parent.join("archives/data");
        assert_eq!(outcome, RelocateOutcome::Unpacked(unpack_dir.clone()));
        assert!(!file.exists());
        assert!(!parent.join("archives/data.zip").exists());
        assert_eq!(
            fs::read_to_string(unpack_dir.join("inside.txt")).unwrap(),
            "unpacked"
        );
    }

    #[test]
    fn test_relocate_archive_keeps_file_when_unpack_fails() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path();
        let file = parent.join("broken.zip");
        fs::write(&file, "not a zip").unwrap();

        let relocator = Relocator::new(&ArchiveUnpacker);
        let result = relocator.relocate_archive(&file, parent);

        assert!(result.is_err());
        assert!(parent.join("archives/broken.zip").exists());
        assert!(!parent.join("archives/broken").exists());
    }

    #[test]
    fn test_relocate_archive_skips_existing_unpack_dir() {
        let temp_dir = TempDir::new().unwrap();
        let parent = temp_dir.path();
        fs::create_dir_all(parent.join("archives/data")).unwrap();
        let file = parent.join("data.zip");
        write_zip(&file);

        let relocator = Relocator::new(&ArchiveUnpacker);
        let outcome = relocator.relocate_archive(&file, parent).unwrap();

        assert_eq!(
            outcome,
            RelocateOutcome::Skipped(parent.join("archives/data"))
        );
        assert!(file.exists());
        assert!(!parent.join("archives/data.zip").exists());
    }
}
