// Sergen
// Copyright (C) 2025 Sergen Contributors

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Process-wide debugging configuration for serializer code generation

use std::sync::atomic::{AtomicBool, Ordering};

/// Debugging configuration consulted when resolving the default generation
/// mode.
///
/// Externally mutable: diagnostic tooling may flip the dump flag at any time,
/// and the registry reads it once per default manager lookup.
#[derive(Debug, Default)]
pub struct DumpConfig {
    dump_enabled: AtomicBool,
}

impl DumpConfig {
    /// Create a new configuration with diagnostic dumping disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with an explicit initial dump setting
    pub fn with_dump_enabled(enabled: bool) -> Self {
        Self {
            dump_enabled: AtomicBool::new(enabled),
        }
    }

    /// Whether diagnostic dumping of generated code is currently enabled
    pub fn is_dump_enabled(&self) -> bool {
        self.dump_enabled.load(Ordering::Relaxed)
    }

    /// Enable or disable diagnostic dumping
    pub fn set_dump_enabled(&self, enabled: bool) {
        self.dump_enabled.store(enabled, Ordering::Relaxed);
    }
}
