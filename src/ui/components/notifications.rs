//! Notification list component renderer.

use crate::domain::NotificationLevel;
use crate::ui::helpers::Style;
use crate::ui::viewmodel::NotificationInfo;

pub fn render_notifications(lines: &mut Vec<String>, notifications: &[NotificationInfo], style: Style) {
    for notification in notifications {
        let tag = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "ok",
            NotificationLevel::Error => "error",
        };
        lines.push(style.level(
            notification.level,
            &format!("[{tag}] {} (#{})", notification.message, notification.id),
        ));
    }
}
