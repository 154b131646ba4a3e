//! 壓縮檔解壓模組
//!
//! 支援 zip、tar、tar.gz / tgz 以及單一串流的 gz

use crate::config::ARCHIVE_SUFFIXES;
use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use log::debug;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// 解壓縮介面，失敗時回傳錯誤讓呼叫端決定是否保留原檔
pub trait Unpacker: Send + Sync {
    fn unpack(&self, archive_path: &Path, destination: &Path) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Zip,
    Tar,
    TarGz,
    Gz,
}

impl ArchiveFormat {
    #[must_use]
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy();
        let (_, suffix) = split_archive_name(&name)?;
        match suffix.to_ascii_lowercase().as_str() {
            ".zip" => Some(Self::Zip),
            ".tar" => Some(Self::Tar),
            ".tar.gz" | ".tgz" => Some(Self::TarGz),
            ".gz" => Some(Self::Gz),
            _ => None,
        }
    }
}

/// 以最長的可辨識後綴拆分壓縮檔名，回傳（主檔名, 後綴）
///
/// `data.tar.gz` -> (`data`, `.tar.gz`)；主檔名為空時不算符合
#[must_use]
pub fn split_archive_name(file_name: &str) -> Option<(&str, &str)> {
    let lower = file_name.to_ascii_lowercase();
    ARCHIVE_SUFFIXES
        .iter()
        .find(|suffix| lower.ends_with(*suffix) && lower.len() > suffix.len())
        .map(|suffix| file_name.split_at(file_name.len() - suffix.len()))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ArchiveUnpacker;

impl Unpacker for ArchiveUnpacker {
    fn unpack(&self, archive_path: &Path, destination: &Path) -> Result<()> {
        let format = ArchiveFormat::detect(archive_path)
            .with_context(|| format!("不支援的壓縮格式: {}", archive_path.display()))?;

        fs::create_dir_all(destination)
            .with_context(|| format!("無法建立解壓目錄: {}", destination.display()))?;

        let file = File::open(archive_path)
            .with_context(|| format!("無法開啟壓縮檔: {}", archive_path.display()))?;

        debug!(
            "解壓縮 {:?}: {} -> {}",
            format,
            archive_path.display(),
            destination.display()
        );

        match format {
            ArchiveFormat::Zip => extract_zip(file, destination),
            ArchiveFormat::Tar => extract_tar(file, destination),
            ArchiveFormat::TarGz => extract_tar(GzDecoder::new(file), destination),
            ArchiveFormat::Gz => extract_gz(file, archive_path, destination),
        }
        .with_context(|| format!("解壓縮失敗: {}", archive_path.display()))
    }
}

fn extract_zip(file: File, destination: &Path) -> Result<()> {
    let mut archive = zip::ZipArchive::new(file)?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(relative) = entry.enclosed_name() else {
            bail!("壓縮檔內含不安全的路徑: {}", entry.name());
        };
        let out_path = destination.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out_file = File::create(&out_path)?;
        io::copy(&mut entry, &mut out_file)?;
    }

    Ok(())
}

fn extract_tar<R: Read>(reader: R, destination: &Path) -> Result<()> {
    let mut archive = tar::Archive::new(reader);
    archive.unpack(destination)?;
    Ok(())
}

fn extract_gz(file: File, archive_path: &Path, destination: &Path) -> Result<()> {
    let name = archive_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = split_archive_name(&name).map_or(name.as_str(), |(stem, _)| stem);

    let mut decoder = GzDecoder::new(file);
    let mut out_file = File::create(destination.join(stem))?;
    io::copy(&mut decoder, &mut out_file)?;
    Ok(())
}
