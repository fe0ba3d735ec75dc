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

//! The Linda operation set as a trait.
//!
//! Callers that only coordinate through the space can depend on
//! `dyn Linda` instead of the concrete [`LindaSpace`], which keeps the
//! seam open for alternative space implementations. Only `take` and
//! `read` suspend; everything else does bounded work.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::LindaError;
use crate::event::{Callback, EventMode, EventTiming};
use crate::space::LindaSpace;
use crate::tuple::{Pattern, Tuple};

/// The Linda coordination operations
#[async_trait]
pub trait Linda: Send + Sync {
    /// Write a tuple into the space
    fn write(&self, tuple: Tuple) -> Result<(), LindaError>;

    /// Take a matching tuple, suspending until one exists
    async fn take(&self, pattern: Pattern) -> Result<Tuple, LindaError>;

    /// Read a matching tuple, suspending until one exists
    async fn read(&self, pattern: Pattern) -> Result<Tuple, LindaError>;

    /// Take a matching tuple if present, never suspends
    fn try_take(&self, pattern: &Pattern) -> Result<Option<Tuple>, LindaError>;

    /// Read a matching tuple if present, never suspends
    fn try_read(&self, pattern: &Pattern) -> Result<Option<Tuple>, LindaError>;

    /// Remove and return all matching tuples
    fn take_all(&self, pattern: &Pattern) -> Result<Vec<Tuple>, LindaError>;

    /// Return all matching tuples, leaving them in place
    fn read_all(&self, pattern: &Pattern) -> Result<Vec<Tuple>, LindaError>;

    /// Register a one-shot callback for matching tuples
    fn event_register(
        &self,
        mode: EventMode,
        timing: EventTiming,
        pattern: Pattern,
        callback: Arc<dyn Callback>,
    ) -> Result<(), LindaError>;

    /// Textual snapshot of the space for debugging
    fn debug_dump(&self, prefix: &str) -> String;
}

#[async_trait]
impl Linda for LindaSpace {
    fn write(&self, tuple: Tuple) -> Result<(), LindaError> {
        LindaSpace::write(self, tuple)
    }

    async fn take(&self, pattern: Pattern) -> Result<Tuple, LindaError> {
        LindaSpace::take(self, pattern).await
    }

    async fn read(&self, pattern: Pattern) -> Result<Tuple, LindaError> {
        LindaSpace::read(self, pattern).await
    }

    fn try_take(&self, pattern: &Pattern) -> Result<Option<Tuple>, LindaError> {
        LindaSpace::try_take(self, pattern)
    }

    fn try_read(&self, pattern: &Pattern) -> Result<Option<Tuple>, LindaError> {
        LindaSpace::try_read(self, pattern)
    }

    fn take_all(&self, pattern: &Pattern) -> Result<Vec<Tuple>, LindaError> {
        LindaSpace::take_all(self, pattern)
    }

    fn read_all(&self, pattern: &Pattern) -> Result<Vec<Tuple>, LindaError> {
        LindaSpace::read_all(self, pattern)
    }

    fn event_register(
        &self,
        mode: EventMode,
        timing: EventTiming,
        pattern: Pattern,
        callback: Arc<dyn Callback>,
    ) -> Result<(), LindaError> {
        LindaSpace::event_register(self, mode, timing, pattern, callback)
    }

    fn debug_dump(&self, prefix: &str) -> String {
        LindaSpace::debug_dump(self, prefix)
    }
}
