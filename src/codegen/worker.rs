//! Background allocation queue.
//!
//! Create handlers must not block their HTTP response on a code assignment
//! (the allocator may sleep for seconds), so they enqueue a job and return;
//! clients poll the read endpoints until the code shows up. The queue is a
//! bounded channel owned by a single worker task: failures are logged, and
//! dropping the last handle closes the channel so the worker drains what is
//! left and exits with the process.

use crate::codegen::allocator::CodeAllocator;
use crate::codegen::format::CodeField;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

const QUEUE_CAPACITY: usize = 256;

#[derive(Debug)]
pub struct AllocationJob {
    pub field: CodeField,
    pub row_id: i64,
}

#[derive(Clone)]
pub struct AllocatorHandle {
    tx: mpsc::Sender<AllocationJob>,
}

impl AllocatorHandle {
    /// Queue a code assignment. Errors never reach the client that triggered
    /// the job; a full or closed queue is logged and the job dropped.
    pub fn enqueue(&self, field: CodeField, row_id: i64) {
        let job = AllocationJob { field, row_id };
        if let Err(e) = self.tx.try_send(job) {
            tracing::error!(field = %field, row_id, "allocation job dropped: {}", e);
        }
    }
}

/// Start the allocation worker. Returns the enqueue handle and the worker's
/// join handle; await the latter after dropping all handles to drain the
/// queue on shutdown.
pub fn spawn_allocator(allocator: Arc<CodeAllocator>) -> (AllocatorHandle, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<AllocationJob>(QUEUE_CAPACITY);

    let worker = tokio::spawn(async move {
        while let Some(job) = rx.recv().await {
            match allocator.allocate(job.field, job.row_id).await {
                Ok(code) => {
                    tracing::info!(field = %job.field, row_id = job.row_id, code = %code, "code assigned")
                }
                Err(e) => {
                    tracing::error!(field = %job.field, row_id = job.row_id, "allocation failed: {}", e)
                }
            }
        }
        tracing::info!("allocation queue drained");
    });

    (AllocatorHandle { tx }, worker)
}
