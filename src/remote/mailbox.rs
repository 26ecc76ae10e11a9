//! Bounded hand-off between the feed adapter and the control loop.
//!
//! Updates land here as they are decoded and are drained at the start of
//! the next tick, so the state machine always sees a consistent set of
//! fields for the whole step.  When full, the oldest entry is dropped:
//! a newer value for the same key supersedes it anyway.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use log::warn;

use crate::app::commands::FieldUpdate;

/// Queue depth.
pub const MAILBOX_DEPTH: usize = 16;

pub struct Mailbox {
    channel: Channel<NoopRawMutex, FieldUpdate, MAILBOX_DEPTH>,
    dropped: u32,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailbox {
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
            dropped: 0,
        }
    }

    /// Enqueue an update, evicting the oldest entry if the queue is full.
    pub fn post(&mut self, update: FieldUpdate) {
        if let Err(TrySendError::Full(update)) = self.channel.try_send(update) {
            if let Ok(evicted) = self.channel.try_receive() {
                self.dropped = self.dropped.saturating_add(1);
                warn!("Mailbox: full, dropped {:?}", evicted);
            }
            let _ = self.channel.try_send(update);
        }
    }

    /// Hand every queued update to `f` in arrival order.
    pub fn drain(&mut self, mut f: impl FnMut(FieldUpdate)) -> usize {
        let mut n = 0;
        while let Ok(update) = self.channel.try_receive() {
            f(update);
            n += 1;
        }
        n
    }

    pub fn len(&self) -> usize {
        self.channel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channel.is_empty()
    }

    /// Total updates evicted since boot.
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}
