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

//! The shared-memory coordination space.
//!
//! One exclusive lock guards the tuple store, the waiting-request table,
//! and the subscription registry together; a write updates all three
//! atomically. Suspension happens only in [`LindaSpace::take`] and
//! [`LindaSpace::read`] (and their bounded variants): a caller that finds
//! no match registers a waiting request and parks on a shared
//! [`Notify`], which every write broadcasts to. Woken callers rescan the
//! store iteratively; whichever reacquires the lock first wins a
//! contended tuple and the rest keep waiting.
//!
//! The state mutex is a `std::sync::Mutex` and is never held across an
//! `await`. The notified future is armed before each scan, so a write
//! landing between the scan and the park still wakes the caller.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::Notify;
use ulid::Ulid;

use crate::config::SpaceConfig;
use crate::error::LindaError;
use crate::event::{Callback, EventMode, EventTiming, FiringPlan, Subscription, SubscriptionRegistry};
use crate::store::TupleStore;
use crate::tuple::{Pattern, Tuple};

/// Whether a suspended caller will consume the matched tuple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WaitMode {
    Read,
    Take,
}

/// A caller suspended on `take` or `read`
#[derive(Debug)]
struct WaitingRequest {
    pattern: Pattern,
    mode: WaitMode,
}

/// Everything guarded by the space's exclusive lock
struct SpaceState {
    store: TupleStore,
    waiters: HashMap<Ulid, WaitingRequest>,
    subscriptions: SubscriptionRegistry,
    stats: SpaceStats,
}

/// Operation counters for a space
#[derive(Debug, Default, Clone)]
pub struct SpaceStats {
    total_writes: u64,
    total_reads: u64,
    total_takes: u64,
    current_size: usize,
}

impl SpaceStats {
    /// Get total number of write operations
    pub fn total_writes(&self) -> u64 {
        self.total_writes
    }

    /// Get total number of read operations
    pub fn total_reads(&self) -> u64 {
        self.total_reads
    }

    /// Get total number of take operations
    pub fn total_takes(&self) -> u64 {
        self.total_takes
    }

    /// Get current number of tuples in the space
    pub fn current_size(&self) -> usize {
        self.current_size
    }

    fn record_write(&mut self, size: usize) {
        self.total_writes += 1;
        self.current_size = size;
    }

    fn record_read(&mut self) {
        self.total_reads += 1;
    }

    fn record_take(&mut self, size: usize) {
        self.total_takes += 1;
        self.current_size = size;
    }
}

/// Removes the waiting request when the blocked call returns or is dropped
///
/// Dropping the future of a suspended `take`/`read` (cancellation, timeout)
/// runs this guard, so the waiter table never leaks entries.
struct WaiterGuard {
    state: Arc<Mutex<SpaceState>>,
    id: Ulid,
}

impl Drop for WaiterGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.state);
        state.waiters.remove(&self.id);
        tracing::trace!(waiter = %self.id, "waiting request removed");
    }
}

fn lock_state(state: &Mutex<SpaceState>) -> MutexGuard<'_, SpaceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Shared-memory Linda coordination space
///
/// ## Purpose
/// An in-process, multi-writer/multi-reader container of immutable tuples
/// with pattern-based retrieval, blocking `take`/`read`, non-blocking and
/// bulk variants, and one-shot event subscriptions.
///
/// ## Concurrency
/// Share one instance behind an `Arc` across tasks. Only `take`, `read`
/// and their `_timeout` variants suspend; every other operation acquires
/// the lock, does bounded work, and returns.
pub struct LindaSpace {
    state: Arc<Mutex<SpaceState>>,
    wake: Notify,
    config: SpaceConfig,
}

impl Default for LindaSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl LindaSpace {
    /// Create an unbounded space with the default configuration
    pub fn new() -> Self {
        Self::with_config(SpaceConfig::default())
    }

    /// Create a space from an explicit configuration
    pub fn with_config(config: SpaceConfig) -> Self {
        LindaSpace {
            state: Arc::new(Mutex::new(SpaceState {
                store: TupleStore::new(config.capacity),
                waiters: HashMap::new(),
                subscriptions: SubscriptionRegistry::default(),
                stats: SpaceStats::default(),
            })),
            wake: Notify::new(),
            config,
        }
    }

    /// Create a space from environment variables, defaults otherwise
    ///
    /// See [`SpaceConfig::from_env`] for the variables consulted.
    pub fn from_env_or_default() -> Result<Self, LindaError> {
        Ok(Self::with_config(SpaceConfig::from_env()?))
    }

    /// The configuration this space was created with
    pub fn config(&self) -> &SpaceConfig {
        &self.config
    }

    /// Write a tuple into the space
    ///
    /// Inserts the tuple, fires matching subscriptions, and wakes every
    /// suspended `take`/`read` so they rescan. Fails with
    /// [`LindaError::CapacityExceeded`] when a configured limit is reached;
    /// the space is unchanged in that case and the caller may retry after
    /// a take frees room.
    pub fn write(&self, tuple: Tuple) -> Result<(), LindaError> {
        if tuple.is_empty() {
            return Err(LindaError::InvalidTuple(
                "tuples must have at least one field".to_string(),
            ));
        }

        let plan = {
            let mut state = lock_state(&self.state);
            if let Err(err) = state.store.insert(tuple.clone()) {
                tracing::warn!(space = %self.config.name, %err, "write rejected");
                return Err(err);
            }
            let size = state.store.len();
            state.stats.record_write(size);

            let plan = state.subscriptions.collect_for(&tuple);
            if plan.take.is_some() {
                // The take subscription consumes the entry just appended.
                let index = state.store.len() - 1;
                state.store.remove_at(index);
                let size = state.store.len();
                state.stats.record_take(size);
            }
            plan
        };

        // Broadcast to all suspended callers; a targeted wake would need
        // the matching predicate solved before the lock is reacquired.
        self.wake.notify_waiters();

        self.fire(plan, tuple);
        Ok(())
    }

    /// Write several tuples in order
    pub fn write_batch(&self, tuples: Vec<Tuple>) -> Result<(), LindaError> {
        for tuple in tuples {
            self.write(tuple)?;
        }
        Ok(())
    }

    /// Take a tuple matching the pattern, suspending until one exists
    ///
    /// Removes and returns the earliest inserted match. If none is
    /// present the caller suspends until a write makes one available;
    /// among several suspended takers eligible for the same tuple, the
    /// first to rescan wins and the rest keep waiting. Cancel by dropping
    /// the future, or use [`LindaSpace::take_timeout`] for a bounded wait.
    pub async fn take(&self, pattern: Pattern) -> Result<Tuple, LindaError> {
        self.block_on_match(pattern, WaitMode::Take).await
    }

    /// Read a tuple matching the pattern, suspending until one exists
    ///
    /// Like [`LindaSpace::take`] but leaves the tuple in place, so any
    /// number of concurrent readers can succeed from the same write.
    pub async fn read(&self, pattern: Pattern) -> Result<Tuple, LindaError> {
        self.block_on_match(pattern, WaitMode::Read).await
    }

    /// [`LindaSpace::take`] with a deadline
    ///
    /// Fails with [`LindaError::Timeout`] if no match appears in time; the
    /// waiting request is removed on the way out.
    pub async fn take_timeout(
        &self,
        pattern: Pattern,
        timeout: Duration,
    ) -> Result<Tuple, LindaError> {
        match tokio::time::timeout(timeout, self.take(pattern)).await {
            Ok(result) => result,
            Err(_) => Err(LindaError::Timeout),
        }
    }

    /// [`LindaSpace::read`] with a deadline
    pub async fn read_timeout(
        &self,
        pattern: Pattern,
        timeout: Duration,
    ) -> Result<Tuple, LindaError> {
        match tokio::time::timeout(timeout, self.read(pattern)).await {
            Ok(result) => result,
            Err(_) => Err(LindaError::Timeout),
        }
    }

    /// Take the earliest matching tuple if one is present, never suspends
    pub fn try_take(&self, pattern: &Pattern) -> Result<Option<Tuple>, LindaError> {
        ensure_pattern(pattern)?;
        let mut state = lock_state(&self.state);
        match state.store.find_first(pattern) {
            Some(index) => {
                let tuple = state.store.remove_at(index);
                let size = state.store.len();
                state.stats.record_take(size);
                Ok(Some(tuple))
            }
            None => Ok(None),
        }
    }

    /// Read the earliest matching tuple if one is present, never suspends
    pub fn try_read(&self, pattern: &Pattern) -> Result<Option<Tuple>, LindaError> {
        ensure_pattern(pattern)?;
        let mut state = lock_state(&self.state);
        match state.store.find_first(pattern) {
            Some(index) => {
                state.stats.record_read();
                Ok(Some(state.store.get(index).clone()))
            }
            None => Ok(None),
        }
    }

    /// Remove and return every tuple matching the pattern
    ///
    /// The scan is a consistent snapshot, but there is no atomicity
    /// across calls: writes interleaved with concurrent bulk scans may
    /// change which call sees which tuple. Two concurrent `take_all`
    /// calls partition the matches with no overlap.
    pub fn take_all(&self, pattern: &Pattern) -> Result<Vec<Tuple>, LindaError> {
        ensure_pattern(pattern)?;
        let mut state = lock_state(&self.state);
        let taken = state.store.take_all(pattern);
        let size = state.store.len();
        for _ in &taken {
            state.stats.record_take(size);
        }
        Ok(taken)
    }

    /// Return every tuple matching the pattern, leaving them in place
    pub fn read_all(&self, pattern: &Pattern) -> Result<Vec<Tuple>, LindaError> {
        ensure_pattern(pattern)?;
        let mut state = lock_state(&self.state);
        state.stats.record_read();
        Ok(state.store.read_all(pattern))
    }

    /// Register a one-shot callback for tuples matching the pattern
    ///
    /// ## Arguments
    /// * `mode` - read leaves the matched tuple in place, take removes it
    /// * `timing` - immediate also considers tuples already present;
    ///   future ignores current content entirely
    /// * `pattern` - the filtering pattern
    /// * `callback` - fired at most once with the matched tuple
    ///
    /// With immediate timing and a match already present, the callback
    /// fires synchronously before this method returns (for take mode the
    /// tuple is removed first). Otherwise the subscription is stored and
    /// fires on the first matching write. The callback may re-register
    /// itself; registration from inside a firing callback is safe.
    ///
    /// A read/immediate callback that re-registers against a pattern that
    /// is still satisfied will fire again immediately, and so on: that
    /// loop belongs to the caller.
    pub fn event_register(
        &self,
        mode: EventMode,
        timing: EventTiming,
        pattern: Pattern,
        callback: Arc<dyn Callback>,
    ) -> Result<(), LindaError> {
        ensure_pattern(&pattern)?;

        let immediate = {
            let mut state = lock_state(&self.state);
            let hit = match timing {
                EventTiming::Immediate => state.store.find_first(&pattern),
                EventTiming::Future => None,
            };
            match hit {
                Some(index) => match mode {
                    EventMode::Take => {
                        let tuple = state.store.remove_at(index);
                        let size = state.store.len();
                        state.stats.record_take(size);
                        Some(tuple)
                    }
                    EventMode::Read => {
                        state.stats.record_read();
                        Some(state.store.get(index).clone())
                    }
                },
                None => {
                    let subscription = Subscription::new(mode, pattern, Arc::clone(&callback));
                    tracing::debug!(
                        space = %self.config.name,
                        subscription = %subscription.id,
                        ?mode,
                        ?timing,
                        "subscription registered"
                    );
                    state.subscriptions.register(subscription);
                    None
                }
            }
        };

        if let Some(tuple) = immediate {
            tracing::debug!(space = %self.config.name, ?mode, "subscription fired immediately");
            callback.call(tuple);
        }
        Ok(())
    }

    /// Count tuples matching the pattern
    pub fn count(&self, pattern: &Pattern) -> usize {
        lock_state(&self.state).store.count(pattern)
    }

    /// True if at least one tuple matches the pattern
    pub fn exists(&self, pattern: &Pattern) -> bool {
        lock_state(&self.state).store.find_first(pattern).is_some()
    }

    /// Drop every tuple; waiters and subscriptions stay registered
    pub fn clear(&self) {
        let mut state = lock_state(&self.state);
        state.store.clear();
        state.stats.current_size = 0;
    }

    /// Get space statistics
    pub fn stats(&self) -> SpaceStats {
        lock_state(&self.state).stats.clone()
    }

    /// Textual snapshot of the space, prefixed per line by `prefix`
    ///
    /// Lists current tuples, suspended callers, and pending subscriptions.
    /// Read-only; also emitted at debug level. Meant for humans, not for
    /// parsing.
    pub fn debug_dump(&self, prefix: &str) -> String {
        let state = lock_state(&self.state);
        let mut out = format!(
            "{} space '{}': {} tuple(s), {} waiter(s), {} subscription(s)\n",
            prefix,
            self.config.name,
            state.store.len(),
            state.waiters.len(),
            state.subscriptions.len(),
        );
        for (index, tuple) in state.store.iter().enumerate() {
            out.push_str(&format!("{}   [{}] {}\n", prefix, index, tuple));
        }
        let mut waiters: Vec<_> = state.waiters.iter().collect();
        waiters.sort_by_key(|(id, _)| **id);
        for (id, request) in waiters {
            out.push_str(&format!(
                "{}   {} waiting on {} ({})\n",
                prefix,
                match request.mode {
                    WaitMode::Read => "read",
                    WaitMode::Take => "take",
                },
                request.pattern,
                id,
            ));
        }
        for subscription in state.subscriptions.iter() {
            out.push_str(&format!(
                "{}   {} subscription on {} ({})\n",
                prefix,
                match subscription.mode {
                    EventMode::Read => "read",
                    EventMode::Take => "take",
                },
                subscription.pattern,
                subscription.id,
            ));
        }
        drop(state);
        tracing::debug!("{}", out.trim_end());
        out
    }

    /// Scan for a match, suspending and rescanning until one appears
    async fn block_on_match(
        &self,
        pattern: Pattern,
        mode: WaitMode,
    ) -> Result<Tuple, LindaError> {
        ensure_pattern(&pattern)?;

        let notified = self.wake.notified();
        tokio::pin!(notified);
        let mut registration: Option<WaiterGuard> = None;

        loop {
            // Arm the wakeup before scanning: a write that lands after the
            // scan but before the await still gets delivered.
            notified.as_mut().enable();
            {
                let mut state = lock_state(&self.state);
                if let Some(index) = state.store.find_first(&pattern) {
                    let tuple = match mode {
                        WaitMode::Take => {
                            let tuple = state.store.remove_at(index);
                            let size = state.store.len();
                            state.stats.record_take(size);
                            tuple
                        }
                        WaitMode::Read => {
                            state.stats.record_read();
                            state.store.get(index).clone()
                        }
                    };
                    return Ok(tuple);
                }
                if registration.is_none() {
                    let id = Ulid::new();
                    state.waiters.insert(
                        id,
                        WaitingRequest {
                            pattern: pattern.clone(),
                            mode,
                        },
                    );
                    registration = Some(WaiterGuard {
                        state: Arc::clone(&self.state),
                        id,
                    });
                    tracing::debug!(
                        space = %self.config.name,
                        waiter = %id,
                        ?mode,
                        %pattern,
                        "no matching tuple, suspending"
                    );
                }
            }
            notified.as_mut().await;
            notified.set(self.wake.notified());
        }
    }

    /// Invoke detached subscriptions, outside the lock
    ///
    /// The matched tuple was already removed under the lock for a take
    /// subscription, so a callback that calls back into the space (to
    /// re-register, or to write) finds it free and consistent.
    fn fire(&self, plan: FiringPlan, tuple: Tuple) {
        if plan.is_empty() {
            return;
        }
        tracing::debug!(
            space = %self.config.name,
            reads = plan.reads.len(),
            take = plan.take.is_some(),
            "dispatching subscriptions"
        );
        for subscription in &plan.reads {
            subscription.callback.call(tuple.clone());
        }
        if let Some(subscription) = plan.take {
            subscription.callback.call(tuple);
        }
    }
}

fn ensure_pattern(pattern: &Pattern) -> Result<(), LindaError> {
    if pattern.is_empty() {
        return Err(LindaError::PatternError(
            "patterns must have at least one field".to_string(),
        ));
    }
    Ok(())
}
