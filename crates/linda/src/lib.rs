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

//! Shared-memory Linda coordination
//!
//! An in-process tuplespace: concurrent tasks coordinate by writing
//! immutable tuples into a shared associative store and retrieving them
//! by pattern. `take`/`read` suspend until a match exists; `try_` and
//! bulk variants never suspend; one-shot event subscriptions fire a
//! callback when a matching tuple appears.
//!
//! ```
//! use plexspaces_linda::{pattern, tuple, FieldType, LindaSpace};
//!
//! # async fn example() -> Result<(), plexspaces_linda::LindaError> {
//! let space = LindaSpace::new();
//! space.write(tuple!("job", 1))?;
//!
//! let job = space.take(pattern!("job", FieldType::Integer)).await?;
//! assert_eq!(job, tuple!("job", 1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Data model
pub mod tuple;

// Guarded multiset storage
pub mod store;

// One-shot event subscriptions
pub mod event;

// The coordination space itself
pub mod space;

// Operation-set trait
pub mod provider;

// Configuration module
pub mod config;

// Error taxonomy
pub mod error;

// Re-export main types
pub use config::SpaceConfig;
pub use error::LindaError;
pub use event::{AsyncCallback, Callback, EventMode, EventTiming};
pub use provider::Linda;
pub use space::{LindaSpace, SpaceStats};
pub use store::TupleStore;
pub use tuple::{FieldType, OrderedFloat, Pattern, PatternField, Tuple, TupleField};
