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

//! Host capability detection for generated-code containers
//!
//! Reduced-capability hosts never fail container construction; modes that
//! need a missing capability silently degrade to the nearest supported
//! access policy.

/// Capabilities of the host with respect to generated-code containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Whether the host can unload a container's generated code as a unit
    pub supports_collectible: bool,
    /// Whether the host can materialize a container to disk for inspection
    pub supports_persistable: bool,
}

impl HostCapabilities {
    /// Detect the capabilities of the current host.
    ///
    /// The in-memory routine-table backend supports both bulk unload and
    /// manifest persistence, so detection reports full support.
    pub fn detect() -> Self {
        Self {
            supports_collectible: true,
            supports_persistable: true,
        }
    }

    /// Capabilities of a host that cannot unload generated code
    pub fn without_collectible(self) -> Self {
        Self {
            supports_collectible: false,
            ..self
        }
    }

    /// Capabilities of a host that cannot persist generated code to disk
    pub fn without_persistable(self) -> Self {
        Self {
            supports_persistable: false,
            ..self
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detect()
    }
}
