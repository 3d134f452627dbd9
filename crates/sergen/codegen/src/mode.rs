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

//! Generation modes for serializer code generation

use serde::{Deserialize, Serialize};

/// Strategy selector governing how a generated-code container is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GenerationMode {
    /// Production mode: non-debuggable, non-collectible, maximized for repeated use
    Fast,
    /// Debuggable mode: generated code can additionally be materialized to disk for inspection
    CanDump,
    /// Collectible mode: the container and everything generated into it may be unloaded
    CanCollect,
}

impl Default for GenerationMode {
    fn default() -> Self {
        GenerationMode::Fast
    }
}

impl GenerationMode {
    /// All modes, in registry slot order
    pub const ALL: [GenerationMode; 3] = [GenerationMode::Fast, GenerationMode::CanDump, GenerationMode::CanCollect];

    /// Whether containers for this mode carry debugging metadata
    pub fn is_debuggable(self) -> bool {
        matches!(self, GenerationMode::CanDump)
    }

    /// Whether containers for this mode may be unloaded to reclaim memory
    pub fn is_collectable(self) -> bool {
        matches!(self, GenerationMode::CanCollect)
    }

    /// Decode a mode from an untyped value, falling back to `Fast` for any
    /// unrecognized residual
    pub fn from_residual(value: u8) -> Self {
        match value {
            1 => GenerationMode::CanDump,
            2 => GenerationMode::CanCollect,
            _ => GenerationMode::Fast,
        }
    }

    pub(crate) fn slot_index(self) -> usize {
        match self {
            GenerationMode::Fast => 0,
            GenerationMode::CanDump => 1,
            GenerationMode::CanCollect => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_flag_matrix() {
        assert!(!GenerationMode::Fast.is_debuggable());
        assert!(!GenerationMode::Fast.is_collectable());

        assert!(GenerationMode::CanDump.is_debuggable());
        assert!(!GenerationMode::CanDump.is_collectable());

        assert!(!GenerationMode::CanCollect.is_debuggable());
        assert!(GenerationMode::CanCollect.is_collectable());
    }

    #[test]
    fn test_residual_values_fall_back_to_fast() {
        assert_eq!(GenerationMode::from_residual(0), GenerationMode::Fast);
        assert_eq!(GenerationMode::from_residual(1), GenerationMode::CanDump);
        assert_eq!(GenerationMode::from_residual(2), GenerationMode::CanCollect);
        assert_eq!(GenerationMode::from_residual(3), GenerationMode::Fast);
        assert_eq!(GenerationMode::from_residual(255), GenerationMode::Fast);
    }

    #[test]
    fn test_slot_indices_are_distinct() {
        let indices: Vec<usize> = GenerationMode::ALL.iter().map(|m| m.slot_index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
