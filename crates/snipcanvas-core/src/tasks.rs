//! Background completions for document extraction and assistant replies.
//!
//! Each request runs on its own thread, sleeps for the simulated latency, then
//! calls the collaborator and sends the result back over a channel. The owner
//! drains the channel on its own thread, so canvas state is only ever mutated
//! there. Assistant replies are numbered at request time and released in that
//! order, however their threads finish.

use crate::error::{CanvasError, CanvasResult};
use crate::services::{AssistantService, ChatMessage, DocumentSource, FileDescriptor, Snippet};
use crate::store::CanvasSnapshot;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of a background request.
#[derive(Debug)]
pub enum Completion {
    /// Snippets extracted for an upload started at `epoch`.
    DocumentReady {
        epoch: u64,
        file: FileDescriptor,
        result: CanvasResult<Vec<Snippet>>,
    },
    /// The assistant's answer to the `seq`-th chat request.
    AssistantReply {
        seq: u64,
        result: CanvasResult<String>,
    },
}

/// Spawns background requests and collects their completions.
pub struct Dispatcher {
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
    pending: usize,
    /// Sequence number of the next assistant request.
    next_reply: u64,
    /// Sequence number of the next reply to hand out.
    release_reply: u64,
    /// Replies that arrived ahead of an earlier one.
    held: BTreeMap<u64, Completion>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            pending: 0,
            next_reply: 0,
            release_reply: 0,
            held: BTreeMap::new(),
        }
    }

    /// Number of requests that have not completed yet.
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Run `job` on a worker thread after `latency`.
    ///
    /// A panicking job sends `failed` instead, so every spawned request
    /// completes exactly once. Returns false if the thread could not start.
    fn spawn<F>(&mut self, name: &str, latency: Duration, failed: Completion, job: F) -> bool
    where
        F: FnOnce() -> Completion + Send + 'static,
    {
        let tx = self.tx.clone();
        let task = name.to_string();
        let spawned = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                if !latency.is_zero() {
                    thread::sleep(latency);
                }
                let completion = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|_| {
                    log::error!("{} worker panicked", task);
                    failed
                });
                // The receiver is gone only when the session was dropped.
                let _ = tx.send(completion);
            });
        match spawned {
            Ok(_) => {
                self.pending += 1;
                true
            }
            Err(e) => {
                log::error!("Failed to spawn {} thread: {}", name, e);
                false
            }
        }
    }

    /// Extract snippets from `file` in the background.
    pub fn extract(
        &mut self,
        source: Arc<dyn DocumentSource>,
        file: FileDescriptor,
        epoch: u64,
        latency: Duration,
    ) {
        log::debug!("Extracting {:?} (epoch {})", file.name, epoch);
        let failed = Completion::DocumentReady {
            epoch,
            file: file.clone(),
            result: Err(CanvasError::Worker("extract".into())),
        };
        self.spawn("extract", latency, failed, move || {
            let result = source.extract(&file);
            Completion::DocumentReady {
                epoch,
                file,
                result,
            }
        });
    }

    /// Ask the assistant for a reply in the background.
    ///
    /// The transcript and canvas are captured at request time.
    pub fn reply(
        &mut self,
        assistant: Arc<dyn AssistantService>,
        transcript: Vec<ChatMessage>,
        canvas: CanvasSnapshot,
        latency: Duration,
    ) {
        let seq = self.next_reply;
        let failed = Completion::AssistantReply {
            seq,
            result: Err(CanvasError::Worker("assistant".into())),
        };
        let spawned = self.spawn("assistant", latency, failed, move || {
            Completion::AssistantReply {
                seq,
                result: Ok(assistant.reply(&transcript, &canvas)),
            }
        });
        if spawned {
            self.next_reply += 1;
        }
    }

    /// Account for an arrived completion, releasing replies in request order.
    fn accept(&mut self, completion: Completion, done: &mut Vec<Completion>) {
        self.pending = self.pending.saturating_sub(1);
        let Completion::AssistantReply { seq, .. } = completion else {
            done.push(completion);
            return;
        };
        if seq != self.release_reply {
            log::debug!("Holding reply {} until {} arrives", seq, self.release_reply);
        }
        self.held.insert(seq, completion);
        while let Some(reply) = self.held.remove(&self.release_reply) {
            self.release_reply += 1;
            done.push(reply);
        }
    }

    /// Drain completions that have already arrived (non-blocking).
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.accept(completion, &mut done);
        }
        done
    }

    /// Block until every pending request completes or `timeout` elapses.
    pub fn wait(&mut self, timeout: Duration) -> Vec<Completion> {
        let deadline = Instant::now() + timeout;
        let mut done = self.poll();
        while self.pending > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => self.accept(completion, &mut done),
                Err(RecvTimeoutError::Timeout) => {
                    log::warn!("{} background request(s) still pending", self.pending);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        done
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}
