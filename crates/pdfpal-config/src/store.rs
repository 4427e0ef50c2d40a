//! Process-wide settings store.
//!
//! Owns the current [`Settings`] value and publishes updates through a
//! [`tokio::sync::watch`] channel, so composition layers subscribe instead of
//! reaching into ambient state.

use tokio::sync::watch;
use tracing::debug;

use crate::schema::Settings;

pub struct SettingsStore {
    tx: watch::Sender<Settings>,
}

impl SettingsStore {
    pub fn new(initial: Settings) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Snapshot of the current settings.
    pub fn current(&self) -> Settings {
        self.tx.borrow().clone()
    }

    /// Replace the settings and notify all subscribers.
    pub fn update(&self, settings: Settings) {
        debug!("settings updated");
        self.tx.send_replace(settings);
    }

    /// Subscribe to settings changes. The receiver immediately sees the
    /// current value.
    pub fn subscribe(&self) -> watch::Receiver<Settings> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_reflects_updates() {
        let store = SettingsStore::default();
        let mut settings = store.current();
        settings.display.dark_mode = true;
        store.update(settings);
        assert!(store.current().display.dark_mode);
    }

    #[tokio::test]
    async fn subscribers_are_notified() {
        let store = SettingsStore::default();
        let mut rx = store.subscribe();

        let mut settings = store.current();
        settings.display.font_size = 18;
        store.update(settings);

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().display.font_size, 18);
    }
}
