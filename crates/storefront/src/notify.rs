//! User-facing notices and cache invalidation events.
//!
//! Aggregates publish on a broadcast channel; any number of views subscribe.
//! A notice with no subscriber is simply dropped.

use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Severity of a notice shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient message for the user (toast, status line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Data whose cached views are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Cart,
    Wishlist,
    Products,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Notice(Notice),
    Invalidated(Topic),
}

/// Cloneable handle for publishing [`StoreEvent`]s.
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<StoreEvent>,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { tx }
    }

    /// Receive every event published after this call.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.tx.subscribe()
    }

    pub fn notice(&self, level: NoticeLevel, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(?level, %message, "notice");
        let _ = self.tx.send(StoreEvent::Notice(Notice { level, message }));
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notice(NoticeLevel::Success, message);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notice(NoticeLevel::Info, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.notice(NoticeLevel::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notice(NoticeLevel::Error, message);
    }

    pub fn invalidate(&self, topic: Topic) {
        let _ = self.tx.send(StoreEvent::Invalidated(topic));
    }
}

/// Drain every event currently queued on `rx`.
pub fn drain(rx: &mut broadcast::Receiver<StoreEvent>) -> Vec<StoreEvent> {
    let mut events = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "notice subscriber lagged");
            }
            Err(_) => break,
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers_is_fine() {
        let notifier = Notifier::new();
        notifier.success("nobody listening");
        notifier.invalidate(Topic::Cart);
    }

    #[test]
    fn test_subscriber_sees_events_in_order() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.info("hello");
        notifier.invalidate(Topic::Wishlist);

        assert_eq!(
            drain(&mut rx),
            vec![
                StoreEvent::Notice(Notice {
                    level: NoticeLevel::Info,
                    message: "hello".to_string()
                }),
                StoreEvent::Invalidated(Topic::Wishlist),
            ]
        );
    }
}
