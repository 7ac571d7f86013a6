//! Bounded connection queue (component 4.C).
//!
//! The reference implementation is a mutex-guarded linked list gated by a
//! pair of counting semaphores (one counting free slots, one counting
//! available items): `add` acquires a free-slot permit before it's allowed
//! to touch the list, `pop` acquires an available-item permit. Per §9's
//! design note, we replace that pair with a single bounded MPSC channel —
//! the channel's own internal permits already implement exactly that
//! discipline, so there's nothing left to hand-roll.
//!
//! The channel is single-consumer, but the spec requires multiple workers
//! to `pop` concurrently, so the receive half lives behind an async mutex
//! shared by every worker; whichever worker holds the lock when an item
//! arrives gets it, preserving FIFO order.

use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// The producer half. Cloned into the acceptor (there's only ever one
/// producer in this server, but the channel itself supports many).
#[derive(Clone)]
pub struct QueueSender<T> {
    inner: mpsc::Sender<T>,
}

impl<T> QueueSender<T> {
    /// Blocks while the queue is full; inserts at the tail once a slot
    /// frees up. Mirrors `queue_add`.
    pub async fn add(&self, item: T) -> Result<(), T> {
        self.inner.send(item).await.map_err(|e| e.0)
    }
}

/// The consumer half, shared by every worker behind a lock.
pub struct QueueReceiver<T> {
    inner: Arc<Mutex<mpsc::Receiver<T>>>,
}

impl<T> Clone for QueueReceiver<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> QueueReceiver<T> {
    /// Blocks while the queue is empty; returns the head once an item is
    /// available. Mirrors `queue_pop`. Returns `None` once every sender has
    /// been dropped and the queue has drained — the worker should treat
    /// that as "no more work, shut down".
    pub async fn pop(&self) -> Option<T> {
        let mut guard = self.inner.lock().await;
        guard.recv().await
    }

    /// Advisory only, per the spec's contract for `is_empty`.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}

/// Creates a bounded queue of the given capacity. `max` must be at least 1.
pub fn create<T>(max: usize) -> (QueueSender<T>, QueueReceiver<T>) {
    let (tx, rx) = mpsc::channel(max.max(1));
    (QueueSender { inner: tx }, QueueReceiver { inner: Arc::new(Mutex::new(rx)) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[tokio::test]
    async fn fifo_order_is_preserved() {
        let (tx, rx) = create::<i32>(4);
        for v in [1, 2, 3] {
            tx.add(v).await.unwrap();
        }
        for expected in [1, 2, 3] {
            assert_eq!(rx.pop().await, Some(expected));
        }
    }

    #[tokio::test]
    async fn add_to_full_queue_blocks_until_a_pop_frees_a_slot() {
        let (tx, rx) = create::<i32>(1);
        tx.add(1).await.unwrap();

        let tx2 = tx.clone();
        let started = Instant::now();
        let blocked_add = tokio::spawn(async move {
            tx2.add(2).await.unwrap();
            started.elapsed()
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(rx.pop().await, Some(1));

        let elapsed = blocked_add.await.unwrap();
        assert!(elapsed >= Duration::from_millis(15));
        assert_eq!(rx.pop().await, Some(2));
    }

    #[tokio::test]
    async fn pop_on_empty_queue_blocks_until_add() {
        let (tx, rx) = create::<i32>(4);
        let handle = tokio::spawn(async move { rx.pop().await });

        tokio::time::sleep(Duration::from_millis(10)).await;
        tx.add(42).await.unwrap();

        assert_eq!(handle.await.unwrap(), Some(42));
    }

    #[tokio::test]
    async fn concurrent_producers_never_exceed_capacity() {
        let (tx, rx) = create::<i32>(2);
        let mut handles = Vec::new();
        for i in 0..8 {
            let tx = tx.clone();
            handles.push(tokio::spawn(async move { tx.add(i).await }));
        }

        let mut seen = Vec::new();
        for _ in 0..8 {
            seen.push(rx.pop().await.unwrap());
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..8).collect::<Vec<_>>());

        for h in handles {
            h.await.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn is_empty_is_advisory() {
        let (tx, rx) = create::<i32>(4);
        assert!(rx.is_empty().await);
        tx.add(1).await.unwrap();
        assert!(!rx.is_empty().await);
    }
}
