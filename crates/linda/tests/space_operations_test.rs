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

//! Integration tests for the non-blocking operation surface
//!
//! ## Purpose
//! Validates multiset semantics, deterministic matching, bulk retrieval,
//! capacity backpressure, and the operation-set trait.

use std::sync::Arc;

use plexspaces_linda::{
    pattern, tuple, FieldType, Linda, LindaError, LindaSpace, PatternField, SpaceConfig,
};

/// Test 1: written tuples are read back and takes consume them
#[tokio::test]
async fn test_write_read_take_roundtrip() {
    let space = LindaSpace::new();

    space.write(tuple!("config", "timeout", 30)).unwrap();

    let pattern = pattern!("config", PatternField::Wildcard, FieldType::Integer);
    assert_eq!(
        space.try_read(&pattern).unwrap(),
        Some(tuple!("config", "timeout", 30))
    );

    assert_eq!(
        space.try_take(&pattern).unwrap(),
        Some(tuple!("config", "timeout", 30))
    );
    assert_eq!(space.try_take(&pattern).unwrap(), None);
    assert_eq!(space.try_read(&pattern).unwrap(), None);
}

/// Test 2: the store is a multiset, structurally equal tuples coexist
#[tokio::test]
async fn test_multiset_fidelity() {
    let space = LindaSpace::new();
    let value = tuple!("v", 1);
    let pattern = pattern!("v", 1);

    space.write(value.clone()).unwrap();
    space.write(value.clone()).unwrap();
    space.write(value.clone()).unwrap();
    assert_eq!(space.count(&pattern), 3);

    space.try_take(&pattern).unwrap();
    assert_eq!(space.count(&pattern), 2);

    space.take_all(&pattern).unwrap();
    assert_eq!(space.count(&pattern), 0);
}

/// Test 3: read and read_all never reduce the store
#[tokio::test]
async fn test_reads_are_non_consuming() {
    let space = LindaSpace::new();
    space.write(tuple!("r", 1)).unwrap();

    let pattern = pattern!("r", FieldType::Integer);
    for _ in 0..5 {
        assert!(space.try_read(&pattern).unwrap().is_some());
    }
    assert_eq!(space.read_all(&pattern).unwrap().len(), 1);
    assert_eq!(space.count(&pattern), 1);
}

/// Test 4: typed wildcard with a fixed field selects only real matches
#[tokio::test]
async fn test_take_all_with_typed_wildcard() {
    let space = LindaSpace::new();
    space.write(tuple!("x", 1)).unwrap();
    space.write(tuple!("y", 2)).unwrap();

    let taken = space.take_all(&pattern!(FieldType::String, 1)).unwrap();
    assert_eq!(taken, vec![tuple!("x", 1)]);

    let remaining = space
        .read_all(&pattern!(FieldType::String, FieldType::Integer))
        .unwrap();
    assert_eq!(remaining, vec![tuple!("y", 2)]);
}

/// Test 5: bulk results come back in insertion order
#[tokio::test]
async fn test_bulk_results_are_insertion_ordered() {
    let space = LindaSpace::new();
    for i in 0..5 {
        space.write(tuple!("seq", i)).unwrap();
    }

    let all = space
        .read_all(&pattern!("seq", FieldType::Integer))
        .unwrap();
    let expected: Vec<_> = (0..5).map(|i| tuple!("seq", i)).collect();
    assert_eq!(all, expected);
}

/// Test 6: a full space rejects writes without dropping anything
#[tokio::test]
async fn test_capacity_backpressure() {
    let config = SpaceConfig::default().with_name("bounded").with_capacity(2);
    let space = LindaSpace::with_config(config);

    space.write(tuple!("a", 1)).unwrap();
    space.write(tuple!("a", 2)).unwrap();

    let err = space.write(tuple!("a", 3)).unwrap_err();
    assert!(matches!(err, LindaError::CapacityExceeded { capacity: 2 }));

    // State unchanged, and room opens up after a take
    assert_eq!(space.count(&pattern!("a", FieldType::Integer)), 2);
    space.try_take(&pattern!("a", 1)).unwrap();
    space.write(tuple!("a", 3)).unwrap();
    assert_eq!(space.count(&pattern!("a", FieldType::Integer)), 2);
}

/// Test 7: write_batch preserves order and stops at the first rejection
#[tokio::test]
async fn test_write_batch() {
    let space = LindaSpace::with_config(SpaceConfig::default().with_capacity(2));

    let result = space.write_batch(vec![tuple!("b", 1), tuple!("b", 2), tuple!("b", 3)]);
    assert!(matches!(
        result,
        Err(LindaError::CapacityExceeded { capacity: 2 })
    ));
    assert_eq!(
        space.read_all(&pattern!("b", FieldType::Integer)).unwrap(),
        vec![tuple!("b", 1), tuple!("b", 2)]
    );
}

/// Test 8: clear empties the store and the counters reflect it
#[tokio::test]
async fn test_clear_exists_and_stats() {
    let space = LindaSpace::new();
    space.write(tuple!("s", 1)).unwrap();
    space.write(tuple!("s", 2)).unwrap();

    let pattern = pattern!("s", FieldType::Integer);
    assert!(space.exists(&pattern));

    space.clear();
    assert!(!space.exists(&pattern));
    assert_eq!(space.count(&pattern), 0);

    let stats = space.stats();
    assert_eq!(stats.total_writes(), 2);
    assert_eq!(stats.current_size(), 0);
}

/// Test 9: the whole surface works through the operation-set trait
#[tokio::test]
async fn test_operations_through_trait_object() {
    let space: Arc<dyn Linda> = Arc::new(LindaSpace::new());

    space.write(tuple!("t", 1)).unwrap();
    assert_eq!(
        space.try_read(&pattern!("t", 1)).unwrap(),
        Some(tuple!("t", 1))
    );

    let taken = space.take(pattern!("t", FieldType::Integer)).await.unwrap();
    assert_eq!(taken, tuple!("t", 1));
    assert_eq!(space.read_all(&pattern!("t", 1)).unwrap(), vec![]);

    let dump = space.debug_dump("[trait]");
    assert!(dump.contains("0 tuple(s)"));
}

/// Test 10: the debug dump lists tuples with the given prefix
#[tokio::test]
async fn test_debug_dump_contents() {
    let space = LindaSpace::with_config(SpaceConfig::default().with_name("dump"));
    space.write(tuple!("x", 1)).unwrap();
    space.write(tuple!("y", 2.5)).unwrap();

    let dump = space.debug_dump("[d]");
    assert!(dump.contains("space 'dump': 2 tuple(s), 0 waiter(s), 0 subscription(s)"));
    assert!(dump.contains("[d]   [0] (\"x\", 1)"));
    assert!(dump.contains("[d]   [1] (\"y\", 2.5)"));
}
