//! Notification rendering.

use std::fmt::Write;

use crate::state::{Notification, NotificationLevel};

/// Render a notification line.
pub fn render_notification(out: &mut String, notification: &Notification) {
    let icon = match notification.level {
        NotificationLevel::Info => "ℹ",
        NotificationLevel::Success => "✓",
        NotificationLevel::Warning => "⚠",
    };
    let _ = writeln!(out, "{icon} {}", notification.message);
}

/// Render an error line.
pub fn render_error(out: &mut String, error: &str) {
    let _ = writeln!(out, "✗ Error: {error}");
}
