// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for device poll subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`EventKind`] - The enumerated set of device events
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::types::Reading;

/// The kinds of events a device emits during polling.
///
/// This is a closed set: events are not free-form string keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired on every successful, non-silent heartbeat with the new reading.
    Heartbeat,
    /// Fired after `Heartbeat` when the new reading differs from the
    /// previous one by value equality. Carries both readings.
    Change,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heartbeat => f.write_str("heartbeat"),
            Self::Change => f.write_str("change"),
        }
    }
}

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a device's lifetime.
///
/// # Examples
///
/// ```ignore
/// let sub_id = device.on_heartbeat(|reading| { /* ... */ });
///
/// // Later, unsubscribe
/// device.unsubscribe(sub_id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Creates a new subscription ID with the given value.
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

/// Type alias for heartbeat callbacks (receives the new reading).
type HeartbeatCallback = Arc<dyn Fn(&Reading) + Send + Sync>;

/// Type alias for change callbacks (receives the new and previous readings).
type ChangeCallback = Arc<dyn Fn(&Reading, Option<&Reading>) + Send + Sync>;

/// Registry for managing device subscription callbacks.
///
/// Callbacks are kept per event kind in insertion order, and dispatch
/// invokes them in exactly that order. The same closure may be registered
/// more than once; each registration gets its own ID and fires separately.
///
/// # Thread Safety
///
/// The registry uses interior mutability via `parking_lot::RwLock`, so
/// subscribing takes `&self`. Dispatch clones the callback list before
/// invoking, which means a callback may subscribe or unsubscribe
/// re-entrantly without deadlocking; such modifications take effect from
/// the next dispatch.
pub struct CallbackRegistry {
    /// Counter for generating unique subscription IDs.
    next_id: AtomicU64,
    /// Heartbeat callbacks, in registration order.
    heartbeat_callbacks: RwLock<Vec<(SubscriptionId, HeartbeatCallback)>>,
    /// Change callbacks, in registration order.
    change_callbacks: RwLock<Vec<(SubscriptionId, ChangeCallback)>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            heartbeat_callbacks: RwLock::new(Vec::new()),
            change_callbacks: RwLock::new(Vec::new()),
        }
    }

    /// Generates a new unique subscription ID.
    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a callback for heartbeat events.
    ///
    /// The callback receives the new reading on every successful,
    /// non-silent poll.
    pub fn on_heartbeat<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Reading) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.heartbeat_callbacks
            .write()
            .push((id, Arc::new(callback)));
        id
    }

    /// Registers a callback for change events.
    ///
    /// The callback receives the new reading and the previous one (absent
    /// on the first poll).
    pub fn on_change<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Reading, Option<&Reading>) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.change_callbacks.write().push((id, Arc::new(callback)));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        {
            let mut callbacks = self.heartbeat_callbacks.write();
            if let Some(pos) = callbacks.iter().position(|(sub_id, _)| *sub_id == id) {
                callbacks.remove(pos);
                return true;
            }
        }
        let mut callbacks = self.change_callbacks.write();
        if let Some(pos) = callbacks.iter().position(|(sub_id, _)| *sub_id == id) {
            callbacks.remove(pos);
            return true;
        }
        false
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.heartbeat_callbacks.write().clear();
        self.change_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    /// Dispatches a heartbeat event to all heartbeat callbacks, in
    /// registration order.
    pub fn dispatch_heartbeat(&self, reading: &Reading) {
        let callbacks: Vec<HeartbeatCallback> = self
            .heartbeat_callbacks
            .read()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        tracing::trace!(count = callbacks.len(), "dispatching heartbeat event");
        for callback in callbacks {
            callback(reading);
        }
    }

    /// Dispatches a change event to all change callbacks, in registration
    /// order.
    pub fn dispatch_change(&self, reading: &Reading, previous: Option<&Reading>) {
        let callbacks: Vec<ChangeCallback> = self
            .change_callbacks
            .read()
            .iter()
            .map(|(_, cb)| Arc::clone(cb))
            .collect();
        tracing::trace!(count = callbacks.len(), "dispatching change event");
        for callback in callbacks {
            callback(reading, previous);
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the number of callbacks registered for one event kind.
    #[must_use]
    pub fn callback_count_for(&self, kind: EventKind) -> usize {
        match kind {
            EventKind::Heartbeat => self.heartbeat_callbacks.read().len(),
            EventKind::Change => self.change_callbacks.read().len(),
        }
    }

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.heartbeat_callbacks.read().len() + self.change_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicU32;

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
    }

    #[test]
    fn event_kind_display() {
        assert_eq!(EventKind::Heartbeat.to_string(), "heartbeat");
        assert_eq!(EventKind::Change.to_string(), "change");
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn heartbeat_callback_fires() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let id = registry.on_heartbeat(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch_heartbeat(&Reading::Number(1.0));
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        registry.dispatch_heartbeat(&Reading::Number(2.0));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn change_callback_receives_both_readings() {
        let registry = CallbackRegistry::new();
        let seen = Arc::new(Mutex::new(None));
        let seen_clone = seen.clone();

        registry.on_change(move |new, previous| {
            *seen_clone.lock().unwrap() = Some((new.clone(), previous.cloned()));
        });

        registry.dispatch_change(&Reading::Number(2.0), Some(&Reading::Number(1.0)));

        let got = seen.lock().unwrap().clone().unwrap();
        assert_eq!(got.0, Reading::Number(2.0));
        assert_eq!(got.1, Some(Reading::Number(1.0)));
    }

    #[test]
    fn invocation_order_is_registration_order() {
        let registry = CallbackRegistry::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for label in ["first", "second", "third"] {
            let order = order.clone();
            registry.on_heartbeat(move |_| {
                order.lock().unwrap().push(label);
            });
        }

        registry.dispatch_heartbeat(&Reading::Number(0.0));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn same_closure_registered_twice_fires_twice() {
        let registry = CallbackRegistry::new();
        let counter = Arc::new(AtomicU32::new(0));

        let counter_clone = counter.clone();
        let callback = move |_: &Reading| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        };

        let id1 = registry.on_heartbeat(callback.clone());
        let id2 = registry.on_heartbeat(callback);
        assert_ne!(id1, id2);

        registry.dispatch_heartbeat(&Reading::Number(0.0));
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn unsubscribe_change_callback() {
        let registry = CallbackRegistry::new();
        let id = registry.on_change(|_, _| {});
        assert_eq!(registry.callback_count_for(EventKind::Change), 1);
        assert!(registry.unsubscribe(id));
        assert_eq!(registry.callback_count_for(EventKind::Change), 0);
    }

    #[test]
    fn clear_removes_everything() {
        let registry = CallbackRegistry::new();
        registry.on_heartbeat(|_| {});
        registry.on_change(|_, _| {});
        assert_eq!(registry.callback_count(), 2);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn callback_may_subscribe_reentrantly() {
        let registry = Arc::new(CallbackRegistry::new());
        let registry_clone = registry.clone();

        registry.on_heartbeat(move |_| {
            registry_clone.on_heartbeat(|_| {});
        });

        // Must not deadlock; the new callback takes effect next dispatch.
        registry.dispatch_heartbeat(&Reading::Number(0.0));
        assert_eq!(registry.callback_count_for(EventKind::Heartbeat), 2);
    }

    #[test]
    fn unique_ids() {
        let registry = CallbackRegistry::new();
        let id1 = registry.on_heartbeat(|_| {});
        let id2 = registry.on_change(|_, _| {});
        assert_ne!(id1, id2);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_heartbeat(|_| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("CallbackRegistry"));
        assert!(debug.contains("callback_count"));
    }
}
