use crate::category::CategorySet;
use crate::store::Settings;

/// Callback invoked with a read-only reference to the settings store when any
/// of its subscribed categories changed. Callbacks see the complete current
/// configuration, not just the fields that changed.
pub type SettingsCallback = Box<dyn Fn(&Settings)>;

struct Listener {
    subscription: CategorySet,
    callback: SettingsCallback,
}

/// Ordered collection of change listeners.
///
/// Append-only for the lifetime of the process; registration order is
/// preserved and determines dispatch order. Callbacks run synchronously,
/// never concurrently with each other, and must not re-enter the store's
/// update path (contract, not enforced).
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn register(&mut self, subscription: CategorySet, callback: SettingsCallback) {
        self.listeners.push(Listener {
            subscription,
            callback,
        });
    }

    /// Invoke, in registration order, every callback whose subscription
    /// intersects `changed`.
    pub fn dispatch(&self, changed: CategorySet, settings: &Settings) {
        for listener in &self.listeners {
            if changed.intersects(listener.subscription) {
                (listener.callback)(settings);
            }
        }
    }
}
