//! # Notifications
//!
//! Fire-and-forget success and failure messages. The controller sends them through
//! a [`Notifier`]; the console collects them into a [`ToastQueue`] that forgets
//! each one after a short time. Nothing in the controller's correctness depends on
//! a notification being seen.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// How long a toast stays on screen unless configured otherwise.
pub const DEFAULT_TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Sending half of the notification channel.
///
/// Sends never fail: a closed or absent receiver just means nobody is watching.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    sender: Option<mpsc::UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// A notifier that drops everything.
    pub fn disabled() -> Self {
        Self { sender: None }
    }

    pub fn notify(&self, notification: Notification) {
        if let Some(sender) = &self.sender {
            let _ = sender.send(notification);
        }
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(Notification::success(message));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(Notification::error(message));
    }
}

/// Notifications currently on screen, each with its expiry.
#[derive(Debug)]
pub struct ToastQueue {
    ttl: Duration,
    toasts: VecDeque<(Instant, Notification)>,
}

impl ToastQueue {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            toasts: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notification: Notification) {
        self.toasts
            .push_back((Instant::now() + self.ttl, notification));
    }

    /// Moves everything waiting on the channel into the queue.
    pub fn collect(&mut self, receiver: &mut mpsc::UnboundedReceiver<Notification>) {
        while let Ok(notification) = receiver.try_recv() {
            self.push(notification);
        }
    }

    /// Drops expired toasts and returns the ones still showing, oldest first.
    pub fn active(&mut self) -> impl Iterator<Item = &Notification> {
        let now = Instant::now();
        self.toasts.retain(|(expires, _)| *expires > now);
        self.toasts.iter().map(|(_, notification)| notification)
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

impl Default for ToastQueue {
    fn default() -> Self {
        Self::new(DEFAULT_TOAST_TTL)
    }
}
