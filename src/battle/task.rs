//! Background work for thinking phases
//!
//! One worker thread per phase hands its result back through a
//! single-slot channel. The main loop polls once per tick and never blocks.
//! A phase resolves once it has a result (or has timed out) and its
//! minimum display time has passed. A worker that outlives its timeout
//! is abandoned and its late result dropped.

use crate::core::error::Result;
use std::fmt;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

/// How a background task ended
#[derive(Debug, Clone, PartialEq)]
pub enum TaskResult<T> {
    Completed(T),
    Failed(String),
    TimedOut,
}

pub struct BackgroundTask<T> {
    name: String,
    receiver: Receiver<Result<T>>,
    elapsed_s: f64,
    max_wait_s: f64,
    minimum_display_s: f64,
    pending: Option<TaskResult<T>>,
    delivered: bool,
}

impl<T> fmt::Debug for BackgroundTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackgroundTask")
            .field("name", &self.name)
            .field("elapsed_s", &self.elapsed_s)
            .field("max_wait_s", &self.max_wait_s)
            .field("delivered", &self.delivered)
            .finish()
    }
}

impl<T: Send + 'static> BackgroundTask<T> {
    pub fn spawn<F>(name: &str, max_wait_s: f64, minimum_display_s: f64, job: F) -> Result<Self>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (sender, receiver) = mpsc::sync_channel(1);
        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                // The receiver is gone when the phase timed out.
                let _ = sender.send(job());
            })?;

        Ok(Self {
            name: name.to_string(),
            receiver,
            elapsed_s: 0.0,
            max_wait_s,
            minimum_display_s,
            pending: None,
            delivered: false,
        })
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    #[cfg(test)]
    fn is_delivered(&self) -> bool {
        self.delivered
    }

    /// Advance the phase clock and poll the worker
    ///
    /// Returns the result exactly once.
    pub fn update(&mut self, dt: f64) -> Option<TaskResult<T>> {
        if self.delivered {
            return None;
        }
        self.elapsed_s += dt;

        if self.pending.is_none() {
            self.pending = match self.receiver.try_recv() {
                Ok(Ok(value)) => Some(TaskResult::Completed(value)),
                Ok(Err(e)) => {
                    tracing::warn!(task = %self.name, error = %e, "Background task failed");
                    Some(TaskResult::Failed(e.to_string()))
                }
                Err(TryRecvError::Disconnected) => {
                    tracing::error!(task = %self.name, "Background task exited without a result");
                    Some(TaskResult::Failed(format!(
                        "{} stopped without a result",
                        self.name
                    )))
                }
                Err(TryRecvError::Empty) if self.elapsed_s >= self.max_wait_s => {
                    tracing::warn!(task = %self.name, max_wait_s = self.max_wait_s, "Background task timed out");
                    Some(TaskResult::TimedOut)
                }
                Err(TryRecvError::Empty) => None,
            };
        }

        if self.pending.is_some() && self.elapsed_s >= self.minimum_display_s {
            self.delivered = true;
            return self.pending.take();
        }
        None
    }
}
