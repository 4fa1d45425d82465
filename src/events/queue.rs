use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::sync::Notify;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::debug;

struct QueueState<E> {
    buffer: Vec<E>,
    subscribers: Vec<mpsc::UnboundedSender<E>>,
}

/// Single-writer, multi-reader buffer between a background ledger watcher
/// and whoever recomputes the reconciled feed.
///
/// Events delivered before a subscriber attaches are never lost: they stay
/// in the buffer and remain visible through `snapshot`/`drain`. Live
/// subscribers only see pushes that happen after `subscribe`. All buffer
/// mutation and fan-out happens under one lock, so every consumer observes
/// pushes in the same global order, and a slow subscriber can never block
/// `push` (subscriber channels are unbounded).
pub struct EventQueue<E> {
    state: Mutex<QueueState<E>>,
    notify: Notify,
}

impl<E: Clone> EventQueue<E> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                buffer: Vec::new(),
                subscribers: Vec::new(),
            }),
            notify: Notify::new(),
        }
    }

    /// Append one event, wake all pending `wait_for_next` callers, and fan
    /// out to every live subscriber.
    pub fn push(&self, event: E) {
        self.push_all(std::iter::once(event));
    }

    /// `push` for a batch; the batch is appended and fanned out in order.
    pub fn push_all(&self, events: impl IntoIterator<Item = E>) {
        let mut pushed = 0usize;
        {
            let mut state = self.state.lock();
            for event in events {
                for sub in &state.subscribers {
                    // Send failures mean the receiver is gone; pruned below.
                    let _ = sub.send(event.clone());
                }
                state.buffer.push(event);
                pushed += 1;
            }
            state.subscribers.retain(|sub| !sub.is_closed());
        }
        if pushed > 0 {
            debug!(count = pushed, "pending events pushed");
            self.notify.notify_waiters();
        }
    }

    /// Current buffer length.
    pub fn count(&self) -> usize {
        self.state.lock().buffer.len()
    }

    /// Full buffered sequence, without clearing it.
    pub fn snapshot(&self) -> Vec<E> {
        self.state.lock().buffer.clone()
    }

    /// Full buffered sequence, atomically clearing the buffer. Each event
    /// is delivered at most once via this path.
    pub fn drain(&self) -> Vec<E> {
        std::mem::take(&mut self.state.lock().buffer)
    }

    /// Suspend until the next `push`/`push_all`. Purely a wake-up signal:
    /// nothing is consumed, and every concurrent waiter is released by the
    /// same push. Cancelling the returned future does not affect the queue.
    pub async fn wait_for_next(&self) {
        self.notify.notified().await;
    }

    /// Fresh, independent multicast channel carrying every event pushed
    /// from now on, in push order. History is not replayed here; use
    /// `snapshot`/`drain` for that.
    pub fn subscribe(&self) -> UnboundedReceiverStream<E> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state.lock().subscribers.push(tx);
        UnboundedReceiverStream::new(rx)
    }
}

impl<E: Clone> Default for EventQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}
