//! 資料夾工作佇列
//!
//! 多生產者多消費者的 FIFO 佇列，加上類似 wait-group 的完成計數：
//! 每個 `enqueue` 對應一次 `mark_done`，`join` 會阻塞直到兩者相等。

use anyhow::{Result, anyhow, bail};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use log::error;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// 待處理的資料夾
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WorkItem(PathBuf);

impl WorkItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.0
    }

    #[must_use]
    pub fn into_path(self) -> PathBuf {
        self.0
    }
}

pub struct DispatchQueue {
    sender: Sender<WorkItem>,
    receiver: Receiver<WorkItem>,
    /// 已加入但尚未 `mark_done` 的數量
    pending: Mutex<usize>,
    drained: Condvar,
    enqueued: AtomicUsize,
    poll_interval: Duration,
}

impl DispatchQueue {
    #[must_use]
    pub fn new(poll_interval: Duration) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            pending: Mutex::new(0),
            drained: Condvar::new(),
            enqueued: AtomicUsize::new(0),
            poll_interval,
        }
    }

    pub fn enqueue(&self, item: WorkItem) -> Result<()> {
        *self.lock_pending() += 1;

        if self.sender.send(item).is_err() {
            self.release_one();
            return Err(anyhow!("工作佇列已關閉"));
        }

        self.enqueued.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    /// 取出下一個工作；佇列為空時阻塞，`stop` 被設定後回傳 `None`
    ///
    /// 停止旗標只在兩次取出之間檢查，不會中斷正在處理的資料夾
    pub fn dequeue(&self, stop: &AtomicBool) -> Option<WorkItem> {
        loop {
            if stop.load(Ordering::SeqCst) {
                return None;
            }
            match self.receiver.recv_timeout(self.poll_interval) {
                Ok(item) => return Some(item),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    pub fn mark_done(&self) -> Result<()> {
        let mut pending = self.lock_pending();
        if *pending == 0 {
            bail!("mark_done 呼叫次數超過已加入的工作數");
        }
        *pending -= 1;
        if *pending == 0 {
            self.drained.notify_all();
        }
        Ok(())
    }

    /// 阻塞直到所有已加入的工作都 `mark_done`
    pub fn join(&self) {
        let mut pending = self.lock_pending();
        while *pending > 0 {
            pending = self
                .drained
                .wait(pending)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// 同 `join`，但 `shutdown` 被設定時提前返回；回傳佇列是否已清空
    pub fn join_until(&self, shutdown: &AtomicBool) -> bool {
        let mut pending = self.lock_pending();
        while *pending > 0 {
            if shutdown.load(Ordering::SeqCst) {
                return false;
            }
            pending = self
                .drained
                .wait_timeout(pending, self.poll_interval)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
        true
    }

    /// 取得完成守衛，離開作用域（包含 panic 展開）時自動 `mark_done`
    #[must_use]
    pub fn completion_guard(&self) -> CompletionGuard<'_> {
        CompletionGuard { queue: self }
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        *self.lock_pending()
    }

    #[must_use]
    pub fn enqueued_count(&self) -> usize {
        self.enqueued.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    fn release_one(&self) {
        let mut pending = self.lock_pending();
        *pending = pending.saturating_sub(1);
        if *pending == 0 {
            self.drained.notify_all();
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, usize> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct CompletionGuard<'a> {
    queue: &'a DispatchQueue,
}

impl Drop for CompletionGuard<'_> {
    fn drop(&mut self) {
        if let Err(e) = self.queue.mark_done() {
            error!("{e}");
        }
    }
}
