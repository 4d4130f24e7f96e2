//! PDF text extraction on a dedicated background worker.
//!
//! `pdf-extract` is synchronous and may panic on malformed input, so decoding
//! happens on a single long-lived thread. The thread is started lazily the
//! first time a PDF arrives; concurrent first callers share the same
//! in-flight start through `OnceCell::get_or_try_init` in a `WorkerSlot`.

use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use tokio::sync::{mpsc, oneshot, OnceCell};
use tracing::{info, warn};

use super::ExtractError;

static PDF_WORKER: WorkerSlot = WorkerSlot::new();

struct PdfJob {
    bytes: Bytes,
    reply: oneshot::Sender<Result<Vec<String>, ExtractError>>,
}

/// Handle to the process-wide PDF decoding thread.
pub struct PdfWorker {
    jobs: mpsc::UnboundedSender<PdfJob>,
}

impl PdfWorker {
    async fn start() -> Result<Self, ExtractError> {
        let (jobs_tx, mut jobs_rx) = mpsc::unbounded_channel::<PdfJob>();
        let (ready_tx, ready_rx) = oneshot::channel::<()>();

        std::thread::Builder::new()
            .name("pdf-worker".to_string())
            .spawn(move || {
                let _ = ready_tx.send(());
                while let Some(job) = jobs_rx.blocking_recv() {
                    let result = decode_pages(&job.bytes);
                    // The caller may have gone away; nothing to do then.
                    let _ = job.reply.send(result);
                }
            })
            .map_err(|e| {
                ExtractError::LibraryUnavailable(format!("failed to spawn PDF worker: {e}"))
            })?;

        ready_rx.await.map_err(|_| {
            ExtractError::LibraryUnavailable("PDF worker exited during startup".to_string())
        })?;

        info!("PDF worker started");
        Ok(Self { jobs: jobs_tx })
    }

    async fn decode(&self, bytes: Bytes) -> Result<Vec<String>, ExtractError> {
        let (reply, response) = oneshot::channel();
        self.jobs.send(PdfJob { bytes, reply }).map_err(|_| {
            ExtractError::LibraryUnavailable("PDF worker is no longer running".to_string())
        })?;

        response.await.map_err(|_| {
            ExtractError::LibraryUnavailable("PDF worker dropped the request".to_string())
        })?
    }
}

/// Lazily started worker plus a count of how often its start routine ran.
pub struct WorkerSlot {
    cell: OnceCell<PdfWorker>,
    starts: AtomicUsize,
}

impl WorkerSlot {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::const_new(),
            starts: AtomicUsize::new(0),
        }
    }

    /// Returns the worker, starting it if no start has succeeded yet.
    /// Overlapping callers wait on the same in-flight start.
    pub async fn get(&self) -> Result<&PdfWorker, ExtractError> {
        self.cell
            .get_or_try_init(|| async {
                self.starts.fetch_add(1, Ordering::SeqCst);
                PdfWorker::start().await
            })
            .await
    }

    #[cfg(test)]
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }
}

/// Returns the process-wide worker, starting it on first use.
pub async fn worker() -> Result<&'static PdfWorker, ExtractError> {
    PDF_WORKER.get().await
}

/// Decodes a PDF and returns one normalized string per page, in document order.
pub async fn extract_pages(bytes: Bytes) -> Result<Vec<String>, ExtractError> {
    worker().await?.decode(bytes).await
}

/// Joins page texts with exactly one newline between consecutive pages.
pub fn join_pages(pages: &[String]) -> String {
    pages.join("\n")
}

/// Collapses the text runs of a page into a single-space separated line.
fn normalize_page(page: &str) -> String {
    page.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
    let decoded =
        std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes));

    match decoded {
        Ok(Ok(pages)) => Ok(pages.iter().map(|p| normalize_page(p)).collect()),
        Ok(Err(e)) => Err(ExtractError::Decode(e.to_string())),
        Err(_) => {
            warn!("PDF decoder panicked on malformed input");
            Err(ExtractError::Decode(
                "PDF decoder could not read this document".to_string(),
            ))
        }
    }
}
