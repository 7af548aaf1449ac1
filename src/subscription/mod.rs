// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for device poll events.
//!
//! This module provides a callback-based publish/subscribe mechanism for
//! receiving notifications from the device polling loop.
//!
//! # Overview
//!
//! - [`EventKind`] - The fixed set of events a device can emit
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Registry that stores callbacks and dispatches events
//!
//! # Event semantics
//!
//! Every successful (non-silent) heartbeat emits [`EventKind::Heartbeat`]
//! with the new reading. [`EventKind::Change`] follows only when the new
//! reading differs from the previous one by value equality.
//!
//! Callbacks run synchronously on the polling thread, in registration
//! order, before the heartbeat call returns. The registry offers no
//! isolation between listeners: a panicking callback unwinds through the
//! poll and the remaining callbacks for that event are not invoked.

mod callback;

pub use callback::{CallbackRegistry, EventKind, SubscriptionId};
