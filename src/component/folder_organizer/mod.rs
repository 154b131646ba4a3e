//! 依類型整理資料夾元件
//!
//! 掃描目標資料夾樹，將每個資料夾交給 worker 池，依副檔名把檔案移到
//! 同層的分類資料夾，解壓縮壓縮檔並刪除空資料夾

mod dispatch_queue;
mod folder_scanner;
mod folder_worker;
mod main;
mod relocator;
mod report;
mod worker_pool;

pub use dispatch_queue::{CompletionGuard, DispatchQueue, WorkItem};
pub use folder_scanner::{enqueue_folders, scan_folders};
pub use folder_worker::FolderWorker;
pub use main::FolderOrganizer;
pub use relocator::{RelocateOutcome, Relocator};
pub use report::{OrganizeReport, OrganizeStats};
pub use worker_pool::WorkerPool;
