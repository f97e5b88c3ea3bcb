//! # Pending Character Queue
//!
//! Unbounded FIFO of resolved code points handed from the host's event
//! thread to the native render loop.
//!
//! ## Overview
//!
//! Unlike the bounded event queues used for desktop keyboard and IME input,
//! this queue never drops entries: every key-down the host delivers has to
//! reach the poller exactly once. The queue is backed by an unbounded
//! `crossbeam-channel`, so pushing and popping are both non-blocking and safe
//! to call from different threads without any lock visible to the caller.
//!
//! ## Usage
//!
//! ```
//! use tessera_input_bridge::PendingCharQueue;
//!
//! let queue = PendingCharQueue::new();
//! queue.push('H' as u32);
//! queue.push('i' as u32);
//!
//! assert_eq!(queue.poll(), 'H' as u32);
//! assert_eq!(queue.poll(), 'i' as u32);
//! // Empty queue yields the sentinel.
//! assert_eq!(queue.poll(), 0);
//! ```

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use tracing::trace;

use crate::key_event::NO_CHAR;

/// Thread-safe FIFO of pending code points.
///
/// Cloning is cheap and every clone refers to the same queue.
#[derive(Clone, Debug)]
pub struct PendingCharQueue {
    sender: Sender<u32>,
    receiver: Receiver<u32>,
}

impl Default for PendingCharQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingCharQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    /// Appends a code point to the back of the queue.
    pub fn push(&self, code_point: u32) {
        // Both ends live in `self`, the channel cannot be disconnected here.
        let _ = self.sender.send(code_point);
        trace!(code_point, "queued pending char");
    }

    /// Removes and returns the oldest code point, if any.
    pub fn pop(&self) -> Option<u32> {
        match self.receiver.try_recv() {
            Ok(code_point) => Some(code_point),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Removes and returns the oldest code point, or [`NO_CHAR`] when empty.
    pub fn poll(&self) -> u32 {
        self.pop().unwrap_or(NO_CHAR)
    }

    /// Number of pending code points.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Whether no code point is pending.
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Removes and returns every pending code point, oldest first.
    pub fn take_chars(&self) -> Vec<u32> {
        self.receiver.try_iter().collect()
    }

    /// Discards every pending code point and returns how many were dropped.
    pub fn clear(&self) -> usize {
        self.receiver.try_iter().count()
    }

    /// Splits the queue into a producer and a consumer handle.
    ///
    /// The handles can be moved to the dispatch thread and the render loop
    /// respectively. The original queue keeps working alongside them.
    pub fn split(&self) -> (CharProducer, CharConsumer) {
        (
            CharProducer {
                sender: self.sender.clone(),
            },
            CharConsumer {
                receiver: self.receiver.clone(),
            },
        )
    }
}

/// Producing end of a [`PendingCharQueue`].
#[derive(Debug)]
pub struct CharProducer {
    sender: Sender<u32>,
}

impl CharProducer {
    /// Appends a code point. Returns `false` once every consumer is gone.
    pub fn push(&self, code_point: u32) -> bool {
        self.sender.send(code_point).is_ok()
    }
}

/// Consuming end of a [`PendingCharQueue`].
#[derive(Debug)]
pub struct CharConsumer {
    receiver: Receiver<u32>,
}

impl CharConsumer {
    /// Removes and returns the oldest code point, if any.
    pub fn pop(&self) -> Option<u32> {
        self.receiver.try_recv().ok()
    }

    /// Removes and returns the oldest code point, or [`NO_CHAR`] when empty.
    pub fn poll(&self) -> u32 {
        self.pop().unwrap_or(NO_CHAR)
    }
}
