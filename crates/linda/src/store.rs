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

//! In-memory tuple storage.
//!
//! A multiset of tuples in insertion order: structurally equal tuples are
//! distinct entries, and every scan resolves ties deterministically in
//! favor of the earliest inserted entry. The store does no locking of its
//! own; it is only ever touched under the space's exclusive lock.

use crate::error::LindaError;
use crate::tuple::{Pattern, Tuple};

/// Insertion-ordered multiset of tuples with an optional capacity limit
///
/// Pattern scans are linear; correctness and deterministic tie-breaking
/// take priority over throughput here, so no auxiliary index is kept.
#[derive(Debug)]
pub struct TupleStore {
    tuples: Vec<Tuple>,
    capacity: Option<usize>,
}

impl TupleStore {
    /// Create a store; `capacity` of `None` means unbounded
    pub fn new(capacity: Option<usize>) -> Self {
        TupleStore {
            tuples: Vec::new(),
            capacity,
        }
    }

    /// Append a tuple
    ///
    /// Fails with [`LindaError::CapacityExceeded`] when the store is at its
    /// configured limit; nothing is inserted in that case.
    pub fn insert(&mut self, tuple: Tuple) -> Result<(), LindaError> {
        if let Some(capacity) = self.capacity {
            if self.tuples.len() >= capacity {
                return Err(LindaError::CapacityExceeded { capacity });
            }
        }
        self.tuples.push(tuple);
        Ok(())
    }

    /// Index of the first tuple matching the pattern, earliest inserted wins
    pub fn find_first(&self, pattern: &Pattern) -> Option<usize> {
        self.tuples.iter().position(|tuple| pattern.matches(tuple))
    }

    /// Borrow the tuple at `index`
    pub fn get(&self, index: usize) -> &Tuple {
        &self.tuples[index]
    }

    /// Remove and return exactly the entry at `index`
    pub fn remove_at(&mut self, index: usize) -> Tuple {
        self.tuples.remove(index)
    }

    /// Snapshot of every tuple matching the pattern, in insertion order
    pub fn read_all(&self, pattern: &Pattern) -> Vec<Tuple> {
        self.tuples
            .iter()
            .filter(|tuple| pattern.matches(tuple))
            .cloned()
            .collect()
    }

    /// Remove and return every tuple matching the pattern, in insertion order
    pub fn take_all(&mut self, pattern: &Pattern) -> Vec<Tuple> {
        let mut taken = Vec::new();
        let mut remaining = Vec::with_capacity(self.tuples.len());

        for tuple in self.tuples.drain(..) {
            if pattern.matches(&tuple) {
                taken.push(tuple);
            } else {
                remaining.push(tuple);
            }
        }

        self.tuples = remaining;
        taken
    }

    /// Count tuples matching the pattern
    pub fn count(&self, pattern: &Pattern) -> usize {
        self.tuples
            .iter()
            .filter(|tuple| pattern.matches(tuple))
            .count()
    }

    /// Number of stored tuples
    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    /// True if the store holds no tuples
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Drop all tuples
    pub fn clear(&mut self) {
        self.tuples.clear();
    }

    /// Iterate stored tuples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }
}
