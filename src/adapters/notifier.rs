use crate::domain::model::{Notification, NotificationLevel};
use crate::domain::ports::Notifier;

#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!("🎉 {}: {}", notification.title, notification.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!("📢 {}: {}", notification.title, notification.message)
            }
            NotificationLevel::Danger => {
                tracing::error!("❌ {}: {}", notification.title, notification.message)
            }
        }
    }
}
