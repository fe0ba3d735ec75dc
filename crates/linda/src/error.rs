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

//! Error types for the Linda coordination engine.
//!
//! Absence of a match on a non-blocking lookup is not an error: `try_take`
//! and `try_read` return `Ok(None)`, the bulk operations return an empty
//! vector. Errors are reserved for rejected writes, expired waits, and
//! malformed inputs, and are always propagated to the caller.

/// Errors surfaced by space operations
#[derive(Debug, thiserror::Error)]
pub enum LindaError {
    /// Write rejected because the space is at its configured capacity
    #[error("Capacity exceeded: space is limited to {capacity} tuples")]
    CapacityExceeded {
        /// The configured tuple limit
        capacity: usize,
    },

    /// A bounded wait ended before a matching tuple appeared
    #[error("Timed out waiting for a matching tuple")]
    Timeout,

    /// Tuple rejected before being stored (e.g. zero fields)
    #[error("Invalid tuple: {0}")]
    InvalidTuple(String),

    /// Pattern rejected by the operation that received it
    #[error("Pattern error: {0}")]
    PatternError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// I/O error while loading configuration
    #[error("IO error: {0}")]
    IoError(String),
}
