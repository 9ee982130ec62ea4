use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Semaphore;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::models::{CommandRecord, CommandStatus};
use crate::store::CommandStore;

/// Diagnostic recorded when a simulated execution fails.
pub const DEVICE_UNREACHABLE: &str = "Device unreachable";

/// Creates command records and drives each one from NEW to a terminal
/// status via a detached execution task.
///
/// Ids come from a process-wide monotone counter, so every submission gets
/// a fresh id no matter how many requests race. Execution concurrency is
/// bounded by a semaphore; `drain` waits for in-flight work on shutdown.
pub struct CommandEngine {
    store: Arc<CommandStore>,
    next_id: AtomicU64,
    inflight: Arc<Semaphore>,
    max_inflight: u32,
    execution_delay: Duration,
}

impl CommandEngine {
    pub fn new(store: Arc<CommandStore>, execution_delay: Duration, max_inflight: u32) -> Self {
        Self {
            store,
            next_id: AtomicU64::new(1),
            inflight: Arc::new(Semaphore::new(max_inflight as usize)),
            max_inflight,
            execution_delay,
        }
    }

    fn allocate_id(&self) -> String {
        self.next_id.fetch_add(1, Ordering::Relaxed).to_string()
    }

    /// Creates a NEW record for an already-validated submission and
    /// schedules its execution. Returns as soon as the record is stored;
    /// the caller never waits on the simulated device.
    pub async fn submit(&self, device_id: String, command: String) -> AppResult<CommandRecord> {
        let record = CommandRecord::new(self.allocate_id(), device_id, command);
        self.store.insert(record.clone()).await?;

        info!(
            command_id = %record.id,
            device_id = %record.device_id,
            command = %record.command,
            "command accepted"
        );

        self.spawn_execution(record.id.clone());
        Ok(record)
    }

    /// One execution task per command: wait out the simulated device
    /// latency, pick an outcome, write it exactly once. The task has no
    /// failure path of its own.
    fn spawn_execution(&self, id: String) {
        let store = Arc::clone(&self.store);
        let inflight = Arc::clone(&self.inflight);
        let delay = self.execution_delay;

        tokio::spawn(async move {
            let _permit = match inflight.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    // Engine drained; the record stays NEW.
                    warn!(command_id = %id, "execution skipped, engine is shut down");
                    return;
                }
            };

            sleep(delay).await;

            let (status, error) = if rand::thread_rng().gen_bool(0.5) {
                (CommandStatus::Success, Some(String::new()))
            } else {
                (CommandStatus::Failed, Some(DEVICE_UNREACHABLE.to_string()))
            };

            if store.complete(&id, status, error).await {
                info!(command_id = %id, status = %status, "command finished");
            } else {
                debug!(command_id = %id, "terminal write skipped, record unknown or already terminal");
            }
        });
    }

    /// Waits until every in-flight execution has finished, then closes the
    /// semaphore so tasks that never started exit without running.
    ///
    /// Queued `acquire` calls are served in FIFO order, so taking the full
    /// permit count lines up behind all previously scheduled executions.
    pub async fn drain(&self) {
        if let Ok(permits) = self.inflight.acquire_many(self.max_inflight).await {
            permits.forget();
        }
        self.inflight.close();
    }
}
