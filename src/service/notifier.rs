// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reload notifications.
//!
//! Every subscriber owns a single-slot channel. A broadcast snapshots the registry
//! and hands the snapshot to a detached task that signals each slot with
//! `try_send`, so the caller never waits on a subscriber.
//!
//! # Delivery policy
//!
//! - A subscriber gets at most one pending signal. If its slot is still full from an
//!   earlier reload the new signal is dropped; the pending one already says
//!   "something changed".
//! - A subscriber whose receiver is gone, or that unsubscribed while a broadcast was
//!   in flight, is skipped silently.
//! - Ordering across subscribers is unspecified.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{self, error::TryRecvError, error::TrySendError, Receiver, Sender};

/// Opaque identifier of a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The receiving end of a subscription.
///
/// Dropping it is enough to stop receiving; unsubscribing additionally removes the
/// registration and closes the channel.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    rx: Receiver<()>,
}

impl Subscription {
    /// The identifier to pass to `unsubscribe`.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next notification. Returns `false` once the subscription is
    /// closed and drained.
    pub async fn changed(&mut self) -> bool {
        self.rx.recv().await.is_some()
    }

    /// Checks for a notification without waiting.
    ///
    /// Returns `Some(true)` if one was pending, `None` if there is none yet and
    /// `Some(false)` if the subscription is closed.
    pub fn try_changed(&mut self) -> Option<bool> {
        match self.rx.try_recv() {
            Ok(()) => Some(true),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(false),
        }
    }

    /// Blocks the current thread until the next notification.
    ///
    /// Must not be called from within an async runtime.
    pub fn blocking_changed(&mut self) -> bool {
        self.rx.blocking_recv().is_some()
    }
}

/// Registry of reload subscribers.
#[derive(Debug, Default)]
pub struct ChangeNotifier {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, Sender<()>)>>,
}

impl ChangeNotifier {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(1);
        self.registry().push((id, tx));
        tracing::debug!("Registered settings subscriber {:?}", id);
        Subscription { id, rx }
    }

    /// Removes the subscriber `id` and closes its channel.
    ///
    /// Returns `false` if `id` was not registered, in which case nothing happens.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut registry = self.registry();
        match registry.iter().position(|(sid, _)| *sid == id) {
            Some(index) => {
                // Dropping the sender closes the channel once any in-flight
                // broadcast holding a clone has finished with it.
                registry.remove(index);
                tracing::debug!("Removed settings subscriber {:?}", id);
                true
            }
            None => false,
        }
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.registry().len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.registry().is_empty()
    }

    /// Signals every current subscriber from a detached task.
    ///
    /// Returns the number of subscribers in the snapshot. Runs on the current tokio
    /// runtime if there is one, otherwise on a short-lived thread.
    pub fn broadcast(&self) -> usize {
        let senders: Vec<Sender<()>> = self.registry().iter().map(|(_, tx)| tx.clone()).collect();
        let count = senders.len();
        if count == 0 {
            return 0;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { deliver(senders) });
            }
            Err(_) => {
                let spawned = std::thread::Builder::new()
                    .name("formcfg-notify".to_string())
                    .spawn(move || deliver(senders));
                if let Err(e) = spawned {
                    tracing::warn!("Failed to dispatch settings notifications: {}", e);
                }
            }
        }
        count
    }

    fn registry(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, Sender<()>)>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn deliver(senders: Vec<Sender<()>>) {
    for tx in senders {
        match tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                tracing::trace!("Subscriber already has a pending notification");
            }
            Err(TrySendError::Closed(())) => {}
        }
    }
}
