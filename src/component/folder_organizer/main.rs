use super::dispatch_queue::DispatchQueue;
use super::folder_scanner::enqueue_folders;
use super::folder_worker::FolderWorker;
use super::relocator::Relocator;
use super::report::{OrganizeReport, OrganizeStats};
use super::worker_pool::WorkerPool;
use crate::config::Config;
use crate::tools::{ArchiveUnpacker, Unpacker};
use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// 依副檔名整理資料夾元件
pub struct FolderOrganizer {
    config: Config,
    shutdown_signal: Arc<AtomicBool>,
    unpacker: Box<dyn Unpacker>,
}

impl FolderOrganizer {
    pub fn new(config: Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
            unpacker: Box::new(ArchiveUnpacker),
        }
    }

    /// 替換解壓縮實作
    #[must_use]
    pub fn with_unpacker(mut self, unpacker: Box<dyn Unpacker>) -> Self {
        self.unpacker = unpacker;
        self
    }

    /// 掃描 `root` 並以 worker 池整理所有資料夾
    ///
    /// 目標不存在時在任何佇列操作之前回傳錯誤
    pub fn organize(&self, root: &Path, progress: &ProgressBar) -> Result<OrganizeReport> {
        let queue = DispatchQueue::new(self.config.settings.poll_interval);
        let discovered = enqueue_folders(root, &self.config.ignored_folders, &queue)?;
        if discovered == 0 {
            warn!("沒有可整理的資料夾: {}", root.display());
        }
        info!("掃描到 {discovered} 個資料夾: {}", root.display());
        progress.set_length(discovered as u64);

        let stats = OrganizeStats::default();
        let worker = FolderWorker::new(
            &self.config.category_table,
            &self.config.ignored_folders,
            Relocator::new(self.unpacker.as_ref()),
            &stats,
        );

        let pool = WorkerPool::new(self.config.settings.max_workers);
        let completed = pool.run(&queue, &self.shutdown_signal, |item| {
            worker.process_folder(item.path());
            progress.inc(1);
        })?;

        if !completed {
            warn!("收到中斷訊號，尚有 {} 個資料夾未處理", queue.pending());
        }

        let report = stats.snapshot(discovered, completed);
        info!(
            "資料夾整理完成 - 資料夾: {}/{}, 移動: {}, 解壓: {}, 刪除空資料夾: {}, 跳過: {}, 失敗: {}",
            report.folders_processed,
            report.folders_discovered,
            report.files_moved,
            report.archives_unpacked,
            report.folders_pruned,
            report.skipped,
            report.errors
        );
        Ok(report)
    }

    pub fn run(&self, root: &Path) -> Result<OrganizeReport> {
        println!("{}", style("=== 依類型整理資料夾 ===").cyan().bold());
        println!("{}", style(format!("目標: {}", root.display())).dim());

        let progress = ProgressBar::new(0);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} 個資料夾")?
                .progress_chars("#>-"),
        );

        let report = self.organize(root, &progress);
        progress.finish_and_clear();
        let report = report?;

        self.print_result(&report);
        Ok(report)
    }

    fn print_result(&self, report: &OrganizeReport) {
        println!();
        println!("{}", style("=== 整理結果 ===").cyan().bold());
        println!(
            "  處理資料夾: {}/{}",
            style(report.folders_processed).green(),
            report.folders_discovered
        );
        println!("  成功移動: {} 個檔案", style(report.files_moved).green());

        if report.archives_unpacked > 0 {
            println!("  已解壓: {} 個壓縮檔", style(report.archives_unpacked).green());
        }
        if report.names_normalized > 0 {
            println!("  重新命名: {} 個檔案", report.names_normalized);
        }
        if report.folders_pruned > 0 {
            println!("  刪除空資料夾: {} 個", report.folders_pruned);
        }
        if report.skipped > 0 {
            println!("  已跳過: {} 個檔案", style(report.skipped).yellow());
        }
        if report.errors > 0 {
            println!("  失敗: {} 個", style(report.errors).red());
        }
        if !report.completed {
            println!("{}", style("  整理已中斷，部分資料夾尚未處理").yellow());
        }

        if !report.category_counts.is_empty() {
            println!();
            println!("{}", style("分類統計:").dim());

            let mut sorted_counts: Vec<_> = report.category_counts.iter().collect();
            sorted_counts.sort_by(|a, b| b.1.cmp(a.1));

            for (category, count) in sorted_counts {
                println!(
                    "  {} {} ({}): {} 個",
                    style("•").dim(),
                    style(category.folder_name()).cyan(),
                    category.display_name(),
                    count
                );
            }
        }
    }
}
