//! Notification channel.
//!
//! Holds at most one message. A new notification replaces the current one
//! and reopens the channel; nothing is queued.

use serde::Serialize;

/// Identifies one `notify` call so an expiry timer started for it cannot
/// close a later notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NotificationTicket(u64);

#[derive(Debug, Default)]
pub struct NotificationChannel {
    message: String,
    visible: bool,
    issued: u64,
}

/// Read-only snapshot for the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NotificationView<'a> {
    pub visible: bool,
    pub message: &'a str,
}

impl NotificationChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message`, replacing whatever was shown before.
    pub fn notify(&mut self, message: impl Into<String>) -> NotificationTicket {
        self.issued += 1;
        self.message = message.into();
        self.visible = true;
        NotificationTicket(self.issued)
    }

    /// Hide the current notification. The message is kept.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }

    /// Auto-expiry: hide the notification only if it is still the one the
    /// ticket was issued for. Returns whether anything was hidden.
    pub fn expire(&mut self, ticket: NotificationTicket) -> bool {
        if self.visible && ticket.0 == self.issued {
            self.visible = false;
            true
        } else {
            false
        }
    }

    /// Ticket of the notification currently on screen.
    pub fn visible_ticket(&self) -> Option<NotificationTicket> {
        self.visible.then_some(NotificationTicket(self.issued))
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn view(&self) -> NotificationView<'_> {
        NotificationView {
            visible: self.visible,
            message: &self.message,
        }
    }
}
