use super::dispatch_queue::{DispatchQueue, WorkItem};
use anyhow::{Result, bail};
use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// 固定上限的 worker 池
///
/// worker 數為 `min(max_workers, 待處理數)`，每個 worker 重複取出資料夾處理，
/// 直到佇列清空後被取消
pub struct WorkerPool {
    max_workers: usize,
}

impl WorkerPool {
    #[must_use]
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    #[must_use]
    pub fn worker_count(&self, pending: usize) -> usize {
        pending.min(self.max_workers)
    }

    /// 啟動 worker 處理佇列中所有工作，等待清空後取消所有 worker
    ///
    /// `shutdown` 被設定時不再等待剩餘工作；回傳佇列是否完整清空
    pub fn run<F>(
        &self,
        queue: &DispatchQueue,
        shutdown: &AtomicBool,
        handler: F,
    ) -> Result<bool>
    where
        F: Fn(WorkItem) + Sync,
    {
        let workers = self.worker_count(queue.pending());
        if workers == 0 {
            return Ok(true);
        }
        if shutdown.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let stop = AtomicBool::new(false);

        thread::scope(|scope| {
            let mut spawned = 0;
            for id in 0..workers {
                let (stop, handler) = (&stop, &handler);
                let result = thread::Builder::new()
                    .name(format!("organizer-{id}"))
                    .spawn_scoped(scope, move || worker_loop(id, queue, stop, handler));
                match result {
                    Ok(_) => spawned += 1,
                    Err(e) => warn!("無法建立 worker {id}: {e}"),
                }
            }

            if spawned == 0 {
                bail!("無法建立任何 worker");
            }
            debug!("已啟動 {spawned} 個 worker");

            let drained = queue.join_until(shutdown);
            stop.store(true, Ordering::SeqCst);
            Ok(drained)
        })
    }
}

fn worker_loop<F>(id: usize, queue: &DispatchQueue, stop: &AtomicBool, handler: &F)
where
    F: Fn(WorkItem) + Sync,
{
    while let Some(item) = queue.dequeue(stop) {
        let _done = queue.completion_guard();
        let folder = item.path().to_path_buf();

        if panic::catch_unwind(AssertUnwindSafe(|| handler(item))).is_err() {
            error!("worker {id} 處理資料夾時發生 panic: {}", folder.display());
        }
    }
    debug!("worker {id} 結束");
}
