//! Backend worker bridging the synchronous UI loop and the async user service.
//!
//! A dedicated thread owns a tokio runtime. Each submitted [`RemoteCall`]
//! runs as its own task and its [`CallOutcome`] is sent back over a channel
//! for the UI loop to apply. Calls are never cancelled and have no timeout.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Context as _;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};
use tracing::{debug, error};

use crate::error::Result;
use crate::remote::{CallOutcome, RemoteCall, RemoteUserService};

/// Owner side of the backend thread.
///
/// Dropping the handle closes the call channel and joins the thread; tasks
/// still in flight are dropped with the runtime.
pub struct WorkerHandle {
    calls: Option<Sender<RemoteCall>>,
    outcomes: Receiver<CallOutcome>,
    thread: Option<JoinHandle<()>>,
}

/// Start the worker thread for `service`.
///
/// # Arguments
///
/// * `service` - Backend every submitted call is executed against
///
/// # Returns
///
/// * `Ok(WorkerHandle)` once the runtime and thread are up
/// * `Err(anyhow::Error)` if either could not be created
pub fn spawn(service: Arc<dyn RemoteUserService>) -> Result<WorkerHandle> {
    let (call_tx, call_rx) = unbounded::<RemoteCall>();
    let (outcome_tx, outcome_rx) = unbounded::<CallOutcome>();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("crude-remote")
        .enable_all()
        .build()
        .context("failed to build backend runtime")?;

    let thread = thread::Builder::new()
        .name("crude-backend".to_string())
        .spawn(move || {
            while let Ok(call) = call_rx.recv() {
                let service = Arc::clone(&service);
                let tx = outcome_tx.clone();
                let kind = call.kind();
                debug!(kind, "dispatching remote call");
                runtime.spawn(async move {
                    let outcome = call.execute(service.as_ref()).await;
                    if tx.send(outcome).is_err() {
                        debug!(kind, "UI gone, dropping outcome");
                    }
                });
            }
            debug!("backend worker stopped");
        })
        .context("failed to spawn backend thread")?;

    Ok(WorkerHandle {
        calls: Some(call_tx),
        outcomes: outcome_rx,
        thread: Some(thread),
    })
}

impl WorkerHandle {
    /// Hand `call` to the backend thread. Does not wait for the outcome.
    ///
    /// # Errors
    ///
    /// Fails if the backend thread has stopped.
    pub fn submit(&self, call: RemoteCall) -> Result<()> {
        let tx = self.calls.as_ref().context("backend worker already shut down")?;
        tx.send(call).map_err(|_| {
            error!("backend worker is not running");
            anyhow::anyhow!("backend worker is not running")
        })
    }

    /// Non-blocking: the next finished call, if any.
    pub fn try_recv(&self) -> Option<CallOutcome> {
        self.outcomes.try_recv().ok()
    }

    /// Block up to `timeout` for the next finished call.
    pub fn recv_timeout(&self, timeout: Duration) -> Option<CallOutcome> {
        match self.outcomes.recv_timeout(timeout) {
            Ok(outcome) => Some(outcome),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        // closing the call channel ends the worker loop
        self.calls.take();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
