//! Status batcher
//!
//! Coalesces status lookups requested within a short window into one
//! `get_statuses_by_ids` call, and optionally re-polls every known status.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chat_cache::SharedStore;
use chat_common::StatusConfig;
use chat_core::events::StatusesData;
use chat_core::traits::StatusClient;
use chat_core::Action;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, Interval};
use tracing::{debug, warn};

enum Command {
    Enqueue(Vec<String>),
    Stop,
}

/// Handle to the running batcher task
///
/// Dropping the handle without calling [`StatusBatcher::stop`] ends the task
/// once the channel closes; ids still pending are flushed first.
pub struct StatusBatcher {
    sender: mpsc::UnboundedSender<Command>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusBatcher {
    /// Spawn the batcher task on the current runtime
    pub fn start(client: Arc<dyn StatusClient>, store: SharedStore, config: &StatusConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = Worker {
            client,
            store,
            window: config.batch_window(),
            max_batch_size: config.max_batch_size.max(1),
            pending: Vec::new(),
            seen: HashSet::new(),
        };
        let task = tokio::spawn(worker.run(receiver, config.poll_interval()));

        Self {
            sender,
            task: Mutex::new(Some(task)),
        }
    }

    /// Queue user ids; never blocks
    pub fn enqueue<I>(&self, user_ids: I)
    where
        I: IntoIterator<Item = String>,
    {
        let ids: Vec<String> = user_ids.into_iter().filter(|id| !id.is_empty()).collect();
        if ids.is_empty() {
            return;
        }
        if self.sender.send(Command::Enqueue(ids)).is_err() {
            debug!("Status batcher stopped, dropping ids");
        }
    }

    /// Flush pending ids and wait for the task to finish
    pub async fn stop(&self) {
        let _ = self.sender.send(Command::Stop);
        let task = self.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!(error = %e, "Status batcher task failed");
            }
        }
    }
}

impl std::fmt::Debug for StatusBatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusBatcher")
            .field("running", &self.task.lock().is_some())
            .finish()
    }
}

struct Worker {
    client: Arc<dyn StatusClient>,
    store: SharedStore,
    window: Duration,
    max_batch_size: usize,
    pending: Vec<String>,
    seen: HashSet<String>,
}

impl Worker {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>, poll: Option<Duration>) {
        let mut deadline: Option<Instant> = None;
        let mut poll_timer: Option<Interval> =
            poll.map(|period| interval_at(Instant::now() + period, period));

        loop {
            tokio::select! {
                command = receiver.recv() => match command {
                    Some(Command::Enqueue(ids)) => {
                        self.add(ids);
                        if self.pending.len() >= self.max_batch_size {
                            self.flush().await;
                            deadline = None;
                        } else if deadline.is_none() && !self.pending.is_empty() {
                            deadline = Some(Instant::now() + self.window);
                        }
                    }
                    Some(Command::Stop) | None => {
                        self.flush().await;
                        break;
                    }
                },
                () = wait_until(deadline) => {
                    self.flush().await;
                    deadline = None;
                }
                () = tick(poll_timer.as_mut()) => {
                    let known = self.store.select(|state| state.users.status_user_ids());
                    debug!(count = known.len(), "Polling statuses");
                    self.add(known);
                    self.flush().await;
                    deadline = None;
                }
            }
        }
    }

    fn add(&mut self, ids: Vec<String>) {
        for id in ids {
            if self.seen.insert(id.clone()) {
                self.pending.push(id);
            }
        }
    }

    async fn flush(&mut self) {
        let ids = std::mem::take(&mut self.pending);
        self.seen.clear();

        for chunk in ids.chunks(self.max_batch_size) {
            match self.client.get_statuses_by_ids(chunk).await {
                Ok(statuses) => {
                    debug!(count = statuses.len(), "Received statuses");
                    self.store
                        .dispatch(Action::ReceivedStatuses(StatusesData { statuses }));
                }
                Err(e) => warn!(error = %e, "Failed to fetch statuses"),
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn tick(timer: Option<&mut Interval>) {
    match timer {
        Some(timer) => {
            timer.tick().await;
        }
        None => std::future::pending().await,
    }
}
