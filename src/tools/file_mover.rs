use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, File};
use std::io;
use std::path::Path;

/// 路徑上是否已有任何項目（包含失效的符號連結）
#[must_use]
pub fn path_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// 移動檔案，目標已存在時回傳 `AlreadyExists` 錯誤而不覆寫
///
/// 先建立硬連結再刪除原檔，目標的存在檢查與建立是同一個操作；
/// 跨檔案系統或不支援硬連結時改為 `create_new` 複製後刪除原檔
pub fn move_file(source: &Path, target: &Path) -> Result<()> {
    match fs::hard_link(source, target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(e).with_context(|| format!("目標已存在: {}", target.display()));
        }
        Err(e) => {
            debug!(
                "無法建立硬連結（{e}），改用複製: {} -> {}",
                source.display(),
                target.display()
            );
            return copy_and_delete(source, target);
        }
    }

    if let Err(e) = fs::remove_file(source) {
        // 保持檔案完整留在原處
        let _ = fs::remove_file(target);
        return Err(e).with_context(|| format!("刪除原檔案失敗: {}", source.display()));
    }
    Ok(())
}

/// 錯誤是否來自目標已存在
#[must_use]
pub fn is_collision(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<io::Error>()
        .is_some_and(|e| e.kind() == io::ErrorKind::AlreadyExists)
}

fn copy_and_delete(source: &Path, target: &Path) -> Result<()> {
    let mut reader =
        File::open(source).with_context(|| format!("無法開啟檔案: {}", source.display()))?;
    let mut writer = File::create_new(target)
        .with_context(|| format!("無法建立目標檔案: {}", target.display()))?;

    if let Err(e) = io::copy(&mut reader, &mut writer) {
        drop(writer);
        let _ = fs::remove_file(target);
        return Err(e).with_context(|| {
            format!("複製檔案失敗: {} -> {}", source.display(), target.display())
        });
    }

    fs::remove_file(source).with_context(|| format!("刪除原檔案失敗: {}", source.display()))?;
    Ok(())
}
