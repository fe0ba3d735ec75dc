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

//! Space configuration.
//!
//! ## Configuration Hierarchy
//! 1. **CODE**: explicit [`SpaceConfig`] in application code (highest priority)
//! 2. **ENV**: environment variables (`LINDA_SPACE_NAME`, `LINDA_CAPACITY`)
//! 3. **FILE**: YAML or TOML configuration files
//! 4. **DEFAULT**: unbounded in-memory space (lowest priority)

use serde::{Deserialize, Serialize};

use crate::error::LindaError;

/// Name of the environment variable holding the space name
pub const ENV_SPACE_NAME: &str = "LINDA_SPACE_NAME";
/// Name of the environment variable holding the capacity limit
pub const ENV_CAPACITY: &str = "LINDA_CAPACITY";

/// Configuration for a [`LindaSpace`](crate::LindaSpace)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    /// Label used in logs and debug dumps
    pub name: String,
    /// Maximum number of stored tuples; `None` means unbounded
    pub capacity: Option<usize>,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        SpaceConfig {
            name: "default".to_string(),
            capacity: None,
        }
    }
}

impl SpaceConfig {
    /// Build a configuration from environment variables
    ///
    /// Unset variables fall back to the default; a set but unparsable
    /// `LINDA_CAPACITY` is an [`LindaError::InvalidConfiguration`].
    pub fn from_env() -> Result<Self, LindaError> {
        let mut config = SpaceConfig::default();
        if let Ok(name) = std::env::var(ENV_SPACE_NAME) {
            config.name = name;
        }
        if let Ok(value) = std::env::var(ENV_CAPACITY) {
            let capacity = value.trim().parse::<usize>().map_err(|e| {
                LindaError::InvalidConfiguration(format!("{}={}: {}", ENV_CAPACITY, value, e))
            })?;
            config.capacity = Some(capacity);
        }
        Ok(config)
    }

    /// Load a configuration from a YAML or TOML file, chosen by extension
    pub fn from_file(path: &str) -> Result<Self, LindaError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LindaError::IoError(format!("{}: {}", path, e)))?;

        if path.ends_with(".toml") {
            toml::from_str(&content)
                .map_err(|e| LindaError::InvalidConfiguration(format!("{}: {}", path, e)))
        } else {
            serde_yaml::from_str(&content)
                .map_err(|e| LindaError::InvalidConfiguration(format!("{}: {}", path, e)))
        }
    }

    /// Set the label used in logs and debug dumps
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Limit the space to at most `capacity` tuples
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}
