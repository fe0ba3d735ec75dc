// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// This file is part of PlexSpaces.
//
// PlexSpaces is free software: you can redistribute it and/or modify
// it under the terms of the GNU Lesser General Public License as published by
// the Free Software Foundation, either version 2.1 of the License, or
// (at your option) any later version.
//
// PlexSpaces is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Lesser General Public License for more details.
//
// You should have received a copy of the GNU Lesser General Public License
// along with PlexSpaces. If not, see <https://www.gnu.org/licenses/>.

//! One-shot event subscriptions.
//!
//! A subscription pairs a pattern with a callback and fires at most once,
//! when a matching tuple is written (or already present, for immediate
//! timing). Callbacks run in the writer's context and must return
//! promptly; a callback may re-register itself through
//! [`LindaSpace::event_register`](crate::LindaSpace::event_register), which
//! is the idiom for a persistent subscription.

use std::sync::Arc;

use tokio::runtime::Handle;
use ulid::Ulid;

use crate::tuple::{Pattern, Tuple};

/// What happens to the matched tuple when a subscription fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMode {
    /// Leave the tuple in the space
    Read,
    /// Remove the tuple from the space
    Take,
}

/// Whether registration considers tuples already in the space
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTiming {
    /// Fire right away if a matching tuple is already present
    Immediate,
    /// Only future writes can fire the subscription
    Future,
}

/// Callback fired with the matched tuple
///
/// Invoked in the writer's context while it is inside the engine, so the
/// callback must return promptly and must not wait on engine state. The
/// suspending operations are `async` and therefore out of reach here;
/// the non-blocking surface (`write`, `try_take`, `event_register`, ...)
/// is safe to call. Wrap slow work in [`AsyncCallback`].
pub trait Callback: Send + Sync {
    /// Handle a matched tuple
    fn call(&self, tuple: Tuple);
}

impl<F> Callback for F
where
    F: Fn(Tuple) + Send + Sync,
{
    fn call(&self, tuple: Tuple) {
        self(tuple)
    }
}

/// Adapter that runs the wrapped callback on a blocking thread
///
/// Use for callbacks that do real work: the writer only pays for the
/// spawn, not for the callback body.
pub struct AsyncCallback {
    inner: Arc<dyn Callback>,
    handle: Handle,
}

impl AsyncCallback {
    /// Wrap a callback; must be called from within a Tokio runtime
    pub fn new(inner: Arc<dyn Callback>) -> Self {
        AsyncCallback {
            inner,
            handle: Handle::current(),
        }
    }
}

impl Callback for AsyncCallback {
    fn call(&self, tuple: Tuple) {
        let callback = Arc::clone(&self.inner);
        self.handle.spawn_blocking(move || callback.call(tuple));
    }
}

/// A registered one-shot subscription
pub(crate) struct Subscription {
    pub(crate) id: Ulid,
    pub(crate) mode: EventMode,
    pub(crate) pattern: Pattern,
    pub(crate) callback: Arc<dyn Callback>,
}

impl Subscription {
    pub(crate) fn new(mode: EventMode, pattern: Pattern, callback: Arc<dyn Callback>) -> Self {
        Subscription {
            id: Ulid::new(),
            mode,
            pattern,
            callback,
        }
    }
}

/// Subscriptions fired by one write, already detached from the registry
///
/// All matching read subscriptions fire; at most one take subscription
/// claims the tuple.
pub(crate) struct FiringPlan {
    pub(crate) reads: Vec<Subscription>,
    pub(crate) take: Option<Subscription>,
}

impl FiringPlan {
    pub(crate) fn is_empty(&self) -> bool {
        self.reads.is_empty() && self.take.is_none()
    }
}

/// Pending subscriptions in registration order
#[derive(Default)]
pub(crate) struct SubscriptionRegistry {
    entries: Vec<Subscription>,
}

impl SubscriptionRegistry {
    pub(crate) fn register(&mut self, subscription: Subscription) {
        self.entries.push(subscription);
    }

    /// Detach the subscriptions a new tuple fires
    ///
    /// Every matching read subscription is removed and returned. Among
    /// matching take subscriptions only the earliest registered is
    /// removed; later ones stay pending because the tuple is gone once
    /// one of them consumes it.
    pub(crate) fn collect_for(&mut self, tuple: &Tuple) -> FiringPlan {
        let mut reads = Vec::new();
        let mut take = None;
        let mut kept = Vec::with_capacity(self.entries.len());

        for entry in self.entries.drain(..) {
            if !entry.pattern.matches(tuple) {
                kept.push(entry);
                continue;
            }
            match entry.mode {
                EventMode::Read => reads.push(entry),
                EventMode::Take if take.is_none() => take = Some(entry),
                EventMode::Take => kept.push(entry),
            }
        }

        self.entries = kept;
        FiringPlan { reads, take }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Subscription> {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pattern, tuple};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_callback(counter: Arc<AtomicUsize>) -> Arc<dyn Callback> {
        Arc::new(move |_tuple: Tuple| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_all_read_subscriptions_fire() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = SubscriptionRegistry::default();
        registry.register(Subscription::new(
            EventMode::Read,
            pattern!("a", 1),
            counting_callback(Arc::clone(&counter)),
        ));
        registry.register(Subscription::new(
            EventMode::Read,
            pattern!("a", 1),
            counting_callback(Arc::clone(&counter)),
        ));

        let plan = registry.collect_for(&tuple!("a", 1));
        assert_eq!(plan.reads.len(), 2);
        assert!(plan.take.is_none());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn test_single_take_subscription_claims() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = SubscriptionRegistry::default();
        let first = Subscription::new(
            EventMode::Take,
            pattern!("a", 1),
            counting_callback(Arc::clone(&counter)),
        );
        let first_id = first.id;
        registry.register(first);
        registry.register(Subscription::new(
            EventMode::Take,
            pattern!("a", 1),
            counting_callback(Arc::clone(&counter)),
        ));

        let plan = registry.collect_for(&tuple!("a", 1));
        assert_eq!(plan.take.map(|s| s.id), Some(first_id));
        assert!(plan.reads.is_empty());
        // Second take subscription stays pending
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_non_matching_subscriptions_stay_pending() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut registry = SubscriptionRegistry::default();
        registry.register(Subscription::new(
            EventMode::Read,
            pattern!("other", 7),
            counting_callback(counter),
        ));

        let plan = registry.collect_for(&tuple!("a", 1));
        assert!(plan.is_empty());
        assert_eq!(registry.len(), 1);
    }
}
